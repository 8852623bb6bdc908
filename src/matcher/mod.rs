//! Volltext-Matching gegen den Raumtyp-Katalog
//!
//! Deterministischer Token-Überlappungs-Score mit Präfix-/Suffix-Bonus,
//! zugeschnitten auf abgekürzte, handgetippte deutsche Raumbezeichnungen.
//! Kein allgemeines Fuzzy-Matching.

mod types;

pub use types::{BestMatch, Candidate, MatchMethod, ScorerWeights};

use crate::catalog::Catalog;
use crate::normalizer::normalize_text;
use std::collections::HashSet;

/// Ähnlichkeit zweier normalisierter Strings in [0, 1].
///
/// Asymmetrisch: eine Anfrage, die Teilstring des Kandidaten ist,
/// bekommt fast die volle Punktzahl, weil Raumbezeichnungen häufig
/// verkürzte Formen der Katalognamen sind.
pub fn fulltext_score(query: &str, candidate: &str, w: &ScorerWeights) -> f64 {
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    if query == candidate {
        return 1.0;
    }
    if candidate.contains(query) {
        return w.substring_score;
    }

    let query_tokens: Vec<&str> = query.split_whitespace().collect();
    let candidate_tokens: Vec<&str> = candidate.split_whitespace().collect();
    if query_tokens.is_empty() || candidate_tokens.is_empty() {
        return 0.0;
    }

    let query_set: HashSet<&str> = query_tokens.iter().copied().collect();
    let candidate_set: HashSet<&str> = candidate_tokens.iter().copied().collect();

    let intersection = query_set.intersection(&candidate_set).count() as f64;
    let union = query_set.union(&candidate_set).count() as f64;
    let coverage = intersection / query_set.len().max(1) as f64;
    let jaccard = intersection / union.max(1.0);

    let prefix = if candidate.starts_with(query_tokens[0]) {
        w.prefix_bonus
    } else {
        0.0
    };
    let suffix = if candidate.ends_with(query_tokens[query_tokens.len() - 1]) {
        w.suffix_bonus
    } else {
        0.0
    };

    (w.coverage * coverage + w.jaccard * jaccard + prefix + suffix).min(1.0)
}

/// Lineare Suche über den Katalog: bester Treffer plus Top-k-Auswahlliste.
///
/// Gleichstände gewinnt der zuerst gelesene Katalogeintrag, die
/// Auswahlliste ist stabil nach Score absteigend sortiert.
pub fn best_match(query: &str, catalog: &Catalog, k: usize, w: &ScorerWeights) -> BestMatch {
    let normalized_query = normalize_text(query);
    if normalized_query.is_empty() || catalog.is_empty() {
        return BestMatch::default();
    }

    let scores: Vec<f64> = catalog
        .entries()
        .iter()
        .map(|e| fulltext_score(&normalized_query, &e.normalized, w))
        .collect();

    let mut best_idx = 0;
    for (i, score) in scores.iter().enumerate() {
        if *score > scores[best_idx] {
            best_idx = i;
        }
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|a, b| scores[*b].partial_cmp(&scores[*a]).unwrap_or(std::cmp::Ordering::Equal));
    let candidates = order
        .into_iter()
        .take(k)
        .map(|i| {
            let entry = &catalog.entries()[i];
            Candidate {
                nr: entry.nr.clone(),
                roomtype: entry.roomtype.clone(),
                score: scores[i],
            }
        })
        .collect();

    let best = &catalog.entries()[best_idx];
    BestMatch {
        nr: best.nr.clone(),
        roomtype: best.roomtype.clone(),
        score: scores[best_idx],
        candidates,
    }
}
