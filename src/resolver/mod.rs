//! LLM-Auflösung unaufgelöster Anfragen
//!
//! Die eigentliche LLM-Fähigkeit ist eine Blackbox hinter dem
//! [`RoomtypeResolver`]-Trait: N Anfragen plus Katalog rein, N Tipps in
//! gleicher Reihenfolge raus. Batching, Wiederholungen und das Auffüllen
//! zu kurzer Antworten passieren hier an der Kollaborateur-Grenze, damit
//! der Orchestrator synchron und deterministisch bleibt.

mod gemini_cli;
pub mod cache;

pub use gemini_cli::GeminiCliResolver;

use crate::catalog::Catalog;
use crate::config::RetryPolicy;
use crate::error::{MatchError, Result};
use crate::normalizer::normalize_text;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ein Tipp des LLM bzw. ein Cache-Eintrag.
///
/// Dasselbe Format liegt im JSON-Cache unter dem normalisierten
/// Anfragetext.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomtypeGuess {
    #[serde(default)]
    pub nr: String,

    #[serde(default)]
    pub roomtype: String,

    #[serde(default)]
    pub confidence: f64,

    #[serde(default)]
    pub rationale: String,
}

impl RoomtypeGuess {
    /// Leeres Ergebnis zum Auffüllen zu kurzer Batch-Antworten.
    pub fn no_response() -> Self {
        Self {
            rationale: "no_response".into(),
            ..Default::default()
        }
    }
}

/// Blackbox-Schnittstelle zur LLM-Fähigkeit.
///
/// Implementierungen liefern pro Anfrage genau einen Tipp in
/// Eingabereihenfolge. Form-Fehler (zu kurz, zu lang, unparsebar)
/// behandelt [`resolve_queries`], nicht der Aufrufer.
pub trait RoomtypeResolver {
    fn resolve_batch(&self, queries: &[String], catalog: &Catalog) -> Result<Vec<RoomtypeGuess>>;
}

/// Löst die unaufgelösten Anfragen eines Arbeitsblatts auf.
///
/// - Dedupliziert über den normalisierten Text (pro Lauf höchstens ein
///   LLM-Aufruf je unterscheidbarer Anfrage)
/// - Zerlegt in Batches von `batch_size`, sequenziell, nie parallel
/// - Wiederholt fehlgeschlagene Batches gemäß `retry`, danach wird mit
///   leeren Null-Konfidenz-Ergebnissen aufgefüllt bzw. abgeschnitten
///
/// Rückgabe: normalisierter Anfragetext → Tipp. Fehler eines Batches
/// verlassen nie die Batch-Grenze.
pub fn resolve_queries<R: RoomtypeResolver + ?Sized>(
    resolver: &R,
    queries: &[String],
    catalog: &Catalog,
    batch_size: usize,
    retry: &RetryPolicy,
    verbose: bool,
) -> HashMap<String, RoomtypeGuess> {
    let mut seen = std::collections::HashSet::new();
    let mut unique: Vec<String> = Vec::new();
    for q in queries {
        let key = normalize_text(q);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        unique.push(q.clone());
    }

    let batch_size = batch_size.max(1);
    let mut results: HashMap<String, RoomtypeGuess> = HashMap::new();

    for (batch_idx, batch) in unique.chunks(batch_size).enumerate() {
        if verbose {
            println!("  Batch {}: {} Anfragen", batch_idx + 1, batch.len());
        }

        let mut guesses: Vec<RoomtypeGuess> = Vec::new();
        for attempt in 1..=retry.max_attempts.max(1) {
            match resolver.resolve_batch(batch, catalog) {
                Ok(g) if g.len() == batch.len() => {
                    guesses = g;
                    break;
                }
                Ok(g) => {
                    eprintln!(
                        "Warnung: Batch {} lieferte {} statt {} Ergebnisse",
                        batch_idx + 1,
                        g.len(),
                        batch.len()
                    );
                    guesses = g;
                }
                Err(e) => {
                    eprintln!("Warnung: Batch {} fehlgeschlagen: {}", batch_idx + 1, e);
                    guesses.clear();
                }
            }
            if attempt < retry.max_attempts {
                std::thread::sleep(retry.backoff(attempt));
            }
        }

        // Formfehler abfedern: abschneiden oder auffüllen
        guesses.truncate(batch.len());
        while guesses.len() < batch.len() {
            guesses.push(RoomtypeGuess::no_response());
        }

        for (query, guess) in batch.iter().zip(guesses) {
            results.insert(normalize_text(query), guess);
        }
    }

    results
}

/// Extrahiert den JSON-Teil einer LLM-Antwort.
///
/// Reihenfolge: ```json-Block, dann das äußerste `[...]`, sonst Fehler.
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(marker) = response.find("```json") {
        let start = marker + 7;
        if let Some(offset) = response[start..].find("```") {
            return Ok(response[start..start + offset].trim());
        }
    }

    if let Some(start) = response.find('[') {
        if let Some(end) = response.rfind(']') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(MatchError::ApiParse("kein JSON in der Antwort gefunden".into()))
}

/// Parst die Antwort eines Batches in Tipps.
pub fn parse_batch_response(response: &str) -> Result<Vec<RoomtypeGuess>> {
    let json = extract_json(response)?;
    let guesses: Vec<RoomtypeGuess> = serde_json::from_str(json.trim())
        .map_err(|e| MatchError::ApiParse(format!("Batch-JSON ungültig: {}", e)))?;
    Ok(guesses)
}
