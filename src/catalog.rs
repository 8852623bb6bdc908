//! Raumtyp-Katalog
//!
//! Lädt die Mapping-Tabelle (Nr, Roomtype) und stellt die
//! Katalog-Validierung für LLM-Antworten bereit.

use crate::error::{MatchError, Result};
use crate::normalizer::normalize_text;
use crate::resolver::RoomtypeGuess;
use std::collections::HashSet;
use std::path::Path;

/// Ein Katalogeintrag aus der Mapping-Tabelle.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Kennung (oft numerisch, aber als String behandelt)
    pub nr: String,
    /// Kanonischer Raumtyp-Name
    pub roomtype: String,
    /// Vorberechnete normalisierte Form von `roomtype`
    pub normalized: String,
}

/// Der unveränderliche Raumtyp-Katalog eines Laufs.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Lädt den Katalog aus einer CSV-Datei mit den Spalten `Nr` und
    /// `Roomtype` (Header-Abgleich ohne Groß-/Kleinschreibung).
    ///
    /// Doppelte Raumtyp-Namen werden verworfen, der erste Treffer gewinnt.
    pub fn from_csv(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MatchError::FileNotFound(path.display().to_string()));
        }

        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let nr_idx = find_column(&headers, "nr")
            .ok_or_else(|| MatchError::Config("Spalte 'Nr' fehlt in der Mapping-Tabelle".into()))?;
        let rt_idx = find_column(&headers, "roomtype").ok_or_else(|| {
            MatchError::Config("Spalte 'Roomtype' fehlt in der Mapping-Tabelle".into())
        })?;

        let mut entries = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for record in reader.records() {
            let record = record?;
            let nr = record.get(nr_idx).unwrap_or("").trim().to_string();
            let roomtype = record.get(rt_idx).unwrap_or("").trim().to_string();

            // Deduplizierung auf dem getrimmten Namen, erster Eintrag gewinnt
            if !seen.insert(roomtype.clone()) {
                continue;
            }

            let normalized = normalize_text(&roomtype);
            entries.push(CatalogEntry {
                nr,
                roomtype,
                normalized,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_nr(&self, nr: &str) -> bool {
        self.entries.iter().any(|e| e.nr == nr)
    }

    /// Validiert eine LLM-Antwort gegen den Katalog.
    ///
    /// - Exakte `nr` im Katalog: Antwort unverändert übernehmen.
    /// - Sonst Namensabgleich über die normalisierte Form (gleich, enthält
    ///   oder ist enthalten): Antwort wird durch den Katalogeintrag ersetzt,
    ///   Konfidenz und Begründung bleiben erhalten.
    /// - Sonst: leeres Ergebnis mit Konfidenz 0.0, die Begründung bleibt
    ///   für den Audit-Report erhalten.
    ///
    /// Damit landet nie eine Kennung im Arbeitsblatt, die nicht im
    /// Katalog existiert.
    pub fn validate(&self, guess: &RoomtypeGuess) -> RoomtypeGuess {
        let nr = guess.nr.trim();
        if !nr.is_empty() && self.contains_nr(nr) {
            return guess.clone();
        }

        let normalized = normalize_text(&guess.roomtype);
        if !normalized.is_empty() {
            for entry in &self.entries {
                if entry.normalized.is_empty() {
                    continue;
                }
                if normalized == entry.normalized
                    || entry.normalized.contains(&normalized)
                    || normalized.contains(&entry.normalized)
                {
                    return RoomtypeGuess {
                        nr: entry.nr.clone(),
                        roomtype: entry.roomtype.clone(),
                        confidence: guess.confidence,
                        rationale: guess.rationale.clone(),
                    };
                }
            }
        }

        RoomtypeGuess {
            nr: String::new(),
            roomtype: String::new(),
            confidence: 0.0,
            rationale: guess.rationale.clone(),
        }
    }
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}
