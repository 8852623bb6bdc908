use serde::{Deserialize, Serialize};

/// Gewichte und Konstanten des Volltext-Scorers.
///
/// Die Werte sind empirisch gewählte Tuning-Parameter, keine
/// fundamentalen Invarianten, daher konfigurierbar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerWeights {
    pub coverage: f64,
    pub jaccard: f64,
    pub prefix_bonus: f64,
    pub suffix_bonus: f64,
    /// Score, wenn die Anfrage ein Teilstring des Kandidaten ist
    pub substring_score: f64,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            coverage: 0.7,
            jaccard: 0.3,
            prefix_bonus: 0.05,
            suffix_bonus: 0.03,
            substring_score: 0.98,
        }
    }
}

/// Ein Kandidat aus der Top-k-Auswahlliste.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub nr: String,
    pub roomtype: String,
    pub score: f64,
}

/// Ergebnis der Bestwert-Suche über den Katalog.
#[derive(Debug, Clone, Default)]
pub struct BestMatch {
    pub nr: String,
    pub roomtype: String,
    pub score: f64,
    /// Auswahlliste als Kontext für den LLM-Fallback, nie selbst
    /// die maßgebliche Antwort
    pub candidates: Vec<Candidate>,
}

/// Wie eine Zeile aufgelöst wurde (Spalte `Method` im Audit-Report).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Cache,
    Fts,
    Pending,
    Llm,
    LlmLowConf,
    LlmNoAnswer,
    LlmOnly,
    LlmOnlyLowConf,
    LlmOnlyNoAnswer,
}

impl MatchMethod {
    /// Label für eine LLM-aufgelöste Zeile. Bei deaktiviertem Volltext
    /// wird die `llm_only`-Familie berichtet, rein kosmetisch.
    pub fn for_llm_outcome(accepted: bool, has_nr: bool, hybrid: bool) -> Self {
        match (hybrid, accepted, has_nr) {
            (true, true, _) => MatchMethod::Llm,
            (true, false, true) => MatchMethod::LlmLowConf,
            (true, false, false) => MatchMethod::LlmNoAnswer,
            (false, true, _) => MatchMethod::LlmOnly,
            (false, false, true) => MatchMethod::LlmOnlyLowConf,
            (false, false, false) => MatchMethod::LlmOnlyNoAnswer,
        }
    }
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MatchMethod::Cache => "cache",
            MatchMethod::Fts => "fts",
            MatchMethod::Pending => "pending",
            MatchMethod::Llm => "llm",
            MatchMethod::LlmLowConf => "llm_low_conf",
            MatchMethod::LlmNoAnswer => "llm_no_answer",
            MatchMethod::LlmOnly => "llm_only",
            MatchMethod::LlmOnlyLowConf => "llm_only_low_conf",
            MatchMethod::LlmOnlyNoAnswer => "llm_only_no_answer",
        };
        write!(f, "{}", label)
    }
}
