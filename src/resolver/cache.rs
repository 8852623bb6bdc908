//! Persistenter Match-Cache
//!
//! JSON-Datei: normalisierter Anfragetext → {nr, roomtype, confidence,
//! rationale}. Wird einmal beim Start von `process` gelesen und nach
//! jedem aufgelösten Batch komplett neu geschrieben. Eine unlesbare
//! Datei gilt als leerer Cache, nie als Fehler.

use super::RoomtypeGuess;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchCache {
    entries: HashMap<String, RoomtypeGuess>,
}

impl MatchCache {
    /// Lädt den Cache; fehlende oder korrupte Datei ergibt einen leeren.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(cache) => cache,
            Err(_) => {
                eprintln!(
                    "Warnung: Cache {} unlesbar, starte mit leerem Cache",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Schreibt den Cache vollständig neu; Elternverzeichnisse werden
    /// bei Bedarf angelegt.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&RoomtypeGuess> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, guess: RoomtypeGuess) {
        self.entries.insert(key, guess);
    }

    pub fn extend(&mut self, other: HashMap<String, RoomtypeGuess>) {
        self.entries.extend(other);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
