//! Laufkonfiguration
//!
//! Alle Schwellwerte und Tuning-Parameter werden explizit in den
//! Orchestrator gereicht; kein globaler Zustand. Optional aus einer
//! JSON-Datei ladbar, CLI-Flags überschreiben einzelne Felder.

use crate::error::{MatchError, Result};
use crate::matcher::ScorerWeights;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Matching-Modus eines Laufs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// Cache → Volltext → LLM
    Hybrid,
    /// Cache → LLM, Volltext deaktiviert
    LlmOnly,
}

/// Wiederholungsrichtlinie für LLM-Batches, ausgeführt an der
/// Kollaborateur-Grenze.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_secs: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_secs: 1.5,
        }
    }
}

impl RetryPolicy {
    /// Linear wachsende Wartezeit vor dem nächsten Versuch.
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs_f64(self.backoff_secs.max(0.0) * attempt as f64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Annahmeschwelle für Volltext-Treffer
    pub fts_threshold: f64,
    /// Annahmeschwelle für LLM-/Cache-Konfidenz
    pub ai_threshold: f64,
    /// Wie viele Zeilen bei der Suche nach der Header-Zeile geprüft werden
    pub max_scan_rows: usize,
    /// Größe der Kandidaten-Auswahlliste für den LLM-Kontext
    pub top_k: usize,
    /// LLM-Batchgröße
    pub batch_size: usize,
    pub cache_path: PathBuf,
    pub matching_mode: MatchingMode,
    /// Cache-Einträge mit Rationale "fts" direkt wiederverwenden.
    /// Mit `false` werden sie als schwächer behandelt und neu aufgelöst.
    pub reuse_fts_cache_hits: bool,
    pub scorer: ScorerWeights,
    pub retry: RetryPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            fts_threshold: 0.05,
            ai_threshold: 0.75,
            max_scan_rows: 30,
            top_k: 25,
            batch_size: 25,
            cache_path: PathBuf::from("cache/roomtype_cache.json"),
            matching_mode: MatchingMode::Hybrid,
            reuse_fts_cache_hits: true,
            scorer: ScorerWeights::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl MatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MatchError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: MatchConfig = serde_json::from_str(&content)
            .map_err(|e| MatchError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    pub fn is_hybrid(&self) -> bool {
        self.matching_mode == MatchingMode::Hybrid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = MatchConfig::default();
        assert!(cfg.is_hybrid());
        assert_eq!(cfg.max_scan_rows, 30);
        assert_eq!(cfg.batch_size, 25);
        assert!(cfg.reuse_fts_cache_hits);
        assert_eq!(cfg.scorer.substring_score, 0.98);
    }

    #[test]
    fn test_load_partial_json_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"ai_threshold": 0.85, "matching_mode": "llm_only"}"#)
            .unwrap();

        let cfg = MatchConfig::load(file.path()).unwrap();
        assert_eq!(cfg.ai_threshold, 0.85);
        assert!(!cfg.is_hybrid());
        // nicht gesetzte Felder behalten die Defaults
        assert_eq!(cfg.top_k, 25);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MatchConfig::load(Path::new("/nirgendwo/cfg.json")).unwrap_err();
        assert!(matches!(err, MatchError::FileNotFound(_)));
    }

    #[test]
    fn test_retry_backoff_grows_linearly() {
        let retry = RetryPolicy {
            max_attempts: 3,
            backoff_secs: 1.5,
        };
        assert_eq!(retry.backoff(1), Duration::from_secs_f64(1.5));
        assert_eq!(retry.backoff(2), Duration::from_secs_f64(3.0));
    }
}
