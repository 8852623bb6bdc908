//! Textnormalisierung für Matching und Header-Erkennung
//!
//! Zwei Varianten:
//! - `normalize_text`: Freitext-Vergleich und Cache-Schlüssel
//!   (Wortgrenzen bleiben erhalten)
//! - `normalize_key`: Header-Zellen-Vergleich (Trennzeichen werden
//!   komplett entfernt, damit "Raum-Bezeichnung", "Raumbezeichnung"
//!   und "Raum Bezeichnung" auf denselben Schlüssel fallen)

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref NON_ALNUM_SPACE: Regex = Regex::new(r"[^a-z0-9\s]").unwrap();
    static ref SPACEY: Regex = Regex::new(r"\s+").unwrap();
    static ref HEADER_JUNK: Regex = Regex::new(r"[\s.:;\-_/]+").unwrap();
}

/// Kleinschreibung, Umlaut-Transliteration (ä→ae, ö→oe, ü→ue, ß→ss),
/// danach NFKD-Zerlegung und Entfernen der kombinierenden Zeichen.
///
/// Die Umlaute werden vor der NFKD-Zerlegung ersetzt, sonst zerfällt
/// "ü" zu "u" + U+0308 und die Transliteration greift nicht mehr.
pub fn fold(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let transliterated: String = lowered
        .chars()
        .flat_map(|c| match c {
            'ä' => "ae".chars().collect::<Vec<_>>(),
            'ö' => "oe".chars().collect(),
            'ü' => "ue".chars().collect(),
            'ß' => "ss".chars().collect(),
            _ => vec![c],
        })
        .collect();
    transliterated
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Normalisierung für Freitext-Matching: alles außer Buchstaben, Ziffern
/// und Leerzeichen wird zu einem Leerzeichen, Whitespace-Läufe werden
/// auf ein Leerzeichen reduziert. Leere Eingabe ergibt `""`.
pub fn normalize_text(x: &str) -> String {
    let folded = fold(x);
    let spaced = NON_ALNUM_SPACE.replace_all(&folded, " ");
    SPACEY.replace_all(&spaced, " ").trim().to_string()
}

/// Normalisierung für Header-Zellen: Whitespace und die Trennzeichen
/// `.`, `:`, `;`, `-`, `_`, `/` werden ersatzlos entfernt.
pub fn normalize_key(x: &str) -> String {
    HEADER_JUNK.replace_all(&fold(x), "").to_string()
}
