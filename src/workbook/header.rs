//! Header-Erkennung per Alias-Abgleich
//!
//! Sucht in den ersten `max_scan_rows` Zeilen eines Blattes die
//! Header-Zeile und darin die Spalten für die Raumbezeichnung und die
//! Raumtyp-Nummer. Gewonnen hat die erste Zeile, in der mindestens
//! eine der beiden Alias-Mengen trifft; beide Spaltenindizes werden
//! ausschließlich aus dieser Zeile gelesen.

use super::SheetGrid;
use crate::normalizer::normalize_key;
use std::collections::HashMap;

/// Header-Label der angelegten Nummernspalte.
pub const NR_COLUMN_LABEL: &str = "Nummer Raumtyp";

/// Schreibvarianten von "Raumbezeichnung" (nach `normalize_key`).
const BEZ_ALIASES: &[&str] = &[
    "raumbezeichnung",
    "raumbezeich",
    "raumbez",
    "raumbezeichng",
    "raumbezchung",
];

/// Schreibvarianten von "Nummer Raumtyp" (nach `normalize_key`).
const NR_ALIASES: &[&str] = &["nummerraumtyp"];

/// Gefundene Header-Position (0-basiert). Beide Spalten können fehlen.
#[derive(Debug, Clone, Copy)]
pub struct HeaderInfo {
    pub row: usize,
    pub description_col: Option<usize>,
    pub nr_col: Option<usize>,
}

/// Scannt die ersten `max_scan_rows` Zeilen nach der Header-Zeile.
pub fn detect_header(sheet: &SheetGrid, max_scan_rows: usize) -> Option<HeaderInfo> {
    let limit = max_scan_rows.min(sheet.row_count());

    for row in 0..limit {
        let mut keys: HashMap<String, usize> = HashMap::new();
        for col in 0..sheet.col_count() {
            let key = normalize_key(&sheet.get(row, col).as_text());
            if !key.is_empty() {
                // doppelte Schlüssel in einer Zeile: die letzte Spalte gewinnt
                keys.insert(key, col);
            }
        }

        let description_col = BEZ_ALIASES.iter().find_map(|a| keys.get(*a).copied());
        let nr_col = NR_ALIASES.iter().find_map(|a| keys.get(*a).copied());

        if description_col.is_some() || nr_col.is_some() {
            return Some(HeaderInfo {
                row,
                description_col,
                nr_col,
            });
        }
    }

    None
}

/// Liefert die Nummernspalte; fehlt sie, wird sie als neue letzte
/// Spalte mit dem Label "Nummer Raumtyp" in der Header-Zeile angelegt.
pub fn ensure_nr_column(sheet: &mut SheetGrid, header_row: usize, nr_col: Option<usize>) -> usize {
    if let Some(col) = nr_col {
        return col;
    }
    let new_col = sheet.col_count();
    sheet.set(
        header_row,
        new_col,
        super::CellValue::Text(NR_COLUMN_LABEL.into()),
    );
    new_col
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::CellValue;

    fn sheet_with(rows: &[(usize, usize, &str)]) -> SheetGrid {
        let mut sheet = SheetGrid::new("Test");
        for (r, c, v) in rows {
            sheet.set(*r, *c, CellValue::Text((*v).to_string()));
        }
        sheet
    }

    #[test]
    fn test_detect_header_simple() {
        let sheet = sheet_with(&[(0, 0, "Raum-Bezeichnung"), (0, 1, "Nummer Raumtyp")]);
        let info = detect_header(&sheet, 30).expect("Header nicht gefunden");

        assert_eq!(info.row, 0);
        assert_eq!(info.description_col, Some(0));
        assert_eq!(info.nr_col, Some(1));
    }

    #[test]
    fn test_detect_header_below_preamble() {
        let sheet = sheet_with(&[
            (0, 0, "Projekt XY"),
            (1, 0, "Stand: 2024"),
            (3, 2, "Raumbezeichnung"),
        ]);
        let info = detect_header(&sheet, 30).unwrap();

        assert_eq!(info.row, 3);
        assert_eq!(info.description_col, Some(2));
        assert_eq!(info.nr_col, None);
    }

    #[test]
    fn test_detect_header_alias_abbreviations() {
        let sheet = sheet_with(&[(0, 1, "RaumBez.")]);
        let info = detect_header(&sheet, 30).unwrap();
        assert_eq!(info.description_col, Some(1));
    }

    #[test]
    fn test_detect_header_first_qualifying_row_wins() {
        // Zeile 2 hat nur die Nummernspalte, Zeile 4 nur die Bezeichnung.
        // Die erste Zeile mit irgendeinem Treffer gewinnt, beide Spalten
        // werden nur aus ihr gelesen.
        let sheet = sheet_with(&[(2, 0, "Nummer Raumtyp"), (4, 0, "Raumbezeichnung")]);
        let info = detect_header(&sheet, 30).unwrap();

        assert_eq!(info.row, 2);
        assert_eq!(info.nr_col, Some(0));
        assert_eq!(info.description_col, None);
    }

    #[test]
    fn test_detect_header_duplicate_key_last_column_wins() {
        let sheet = sheet_with(&[(0, 0, "Raumbezeichnung"), (0, 2, "Raumbezeichnung")]);
        let info = detect_header(&sheet, 30).unwrap();
        assert_eq!(info.description_col, Some(2));
    }

    #[test]
    fn test_detect_header_respects_scan_limit() {
        let sheet = sheet_with(&[(10, 0, "Raumbezeichnung")]);
        assert!(detect_header(&sheet, 5).is_none());
        assert!(detect_header(&sheet, 30).is_some());
    }

    #[test]
    fn test_detect_header_none() {
        let sheet = sheet_with(&[(0, 0, "Etage"), (0, 1, "Fläche")]);
        assert!(detect_header(&sheet, 30).is_none());
    }

    #[test]
    fn test_ensure_nr_column_existing() {
        let mut sheet = sheet_with(&[(0, 0, "Raumbezeichnung"), (0, 1, "Nummer Raumtyp")]);
        assert_eq!(ensure_nr_column(&mut sheet, 0, Some(1)), 1);
    }

    #[test]
    fn test_ensure_nr_column_created_as_trailing() {
        let mut sheet = sheet_with(&[(0, 0, "Raumbezeichnung"), (1, 0, "Büro")]);
        let col = ensure_nr_column(&mut sheet, 0, None);

        assert_eq!(col, 1);
        assert_eq!(sheet.get(0, 1).as_text(), NR_COLUMN_LABEL);
    }
}
