//! Auflösungs-Orchestrator
//!
//! Fährt Blatt für Blatt, Zeile für Zeile über die Arbeitsmappe:
//! Cache-Treffer → Volltext-Versuch → LLM-Fallback. Unaufgelöste
//! Anfragen werden pro Blatt gesammelt, dedupliziert im Batch
//! aufgelöst, gegen den Katalog validiert, in den Cache gemischt und
//! über den Cache auf alle betroffenen Zeilen verteilt. Geschrieben
//! wird ausschließlich die Zelle in der Spalte "Nummer Raumtyp".

use crate::catalog::Catalog;
use crate::config::MatchConfig;
use crate::error::Result;
use crate::matcher::{best_match, MatchMethod};
use crate::normalizer::normalize_text;
use crate::report::{round4, write_report, AuditRow};
use crate::resolver::cache::MatchCache;
use crate::resolver::{resolve_queries, RoomtypeGuess, RoomtypeResolver};
use crate::workbook::header::{detect_header, ensure_nr_column};
use crate::workbook::{CellValue, WorkbookGrid};
use std::collections::HashMap;
use std::path::Path;

/// Zähler eines Laufs, für Konsole und Tests.
#[derive(Debug, Clone, Default)]
pub struct ProcessSummary {
    /// Blätter mit erkannter Header-Zeile samt Bezeichnungsspalte
    pub sheets_processed: usize,
    /// Blätter ohne verwertbaren Header (unverändert durchgereicht)
    pub sheets_skipped: usize,
    /// Verarbeitete, nicht leere Beschreibungszellen
    pub rows_processed: usize,
    pub cache_hits: usize,
    pub fts_hits: usize,
    /// Über das LLM angenommene Zeilen
    pub llm_accepted: usize,
    /// Zeilen ohne angenommene Antwort
    pub unresolved: usize,
}

struct PendingRow {
    row: usize,
    audit_idx: usize,
    key: String,
}

/// Führt einen kompletten Lauf aus: Mappe lesen, Zeilen auflösen,
/// Mappe, Report und Cache schreiben.
///
/// Zweimal mit demselben Cache ausgeführt ist das Ergebnis identisch;
/// im zweiten Lauf ist jede zuvor aufgelöste Zeile ein Cache-Treffer.
pub fn process(
    mapping_csv: &Path,
    target_xlsx: &Path,
    output_xlsx: &Path,
    report_csv: &Path,
    cfg: &MatchConfig,
    resolver: &dyn RoomtypeResolver,
    verbose: bool,
) -> Result<ProcessSummary> {
    let catalog = Catalog::from_csv(mapping_csv)?;
    let mut cache = MatchCache::load(&cfg.cache_path);
    let mut workbook = WorkbookGrid::load(target_xlsx)?;

    let mut audit: Vec<AuditRow> = Vec::new();
    let mut summary = ProcessSummary::default();
    let use_fts = cfg.is_hybrid();

    for sheet in &mut workbook.sheets {
        let header = match detect_header(sheet, cfg.max_scan_rows) {
            Some(h) => h,
            None => {
                summary.sheets_skipped += 1;
                continue;
            }
        };
        let description_col = match header.description_col {
            Some(c) => c,
            None => {
                summary.sheets_skipped += 1;
                continue;
            }
        };
        summary.sheets_processed += 1;

        let nr_col = ensure_nr_column(sheet, header.row, header.nr_col);

        let mut pending: Vec<PendingRow> = Vec::new();
        let mut pending_queries: Vec<String> = Vec::new();
        // Frische Volltext-Treffer, am Blattende in den Cache gemischt
        let mut fts_updates: HashMap<String, RoomtypeGuess> = HashMap::new();

        for row in (header.row + 1)..sheet.row_count() {
            let raw = sheet.get(row, description_col).as_text();
            if raw.trim().is_empty() {
                continue;
            }
            summary.rows_processed += 1;

            let key = normalize_text(&raw);

            // 1. Cache
            if let Some(hit) = cache.get(&key) {
                let is_fts_hit = hit.rationale.trim().eq_ignore_ascii_case("fts");
                let allowed = hit.confidence >= cfg.ai_threshold && !hit.nr.is_empty();
                if allowed && (cfg.reuse_fts_cache_hits || !is_fts_hit) {
                    let hit = hit.clone();
                    sheet.set(row, nr_col, parse_nr(&hit.nr));
                    audit.push(AuditRow {
                        sheet: sheet.name.clone(),
                        row_index: row + 1,
                        description: raw.clone(),
                        matched_roomtype: hit.roomtype.clone(),
                        nr: hit.nr.clone(),
                        score: round4(hit.confidence),
                        method: MatchMethod::Cache,
                        ai_confidence: Some(round4(hit.confidence)),
                        ai_rationale: hit.rationale.clone(),
                        accepted: true,
                    });
                    summary.cache_hits += 1;
                    continue;
                }
            }

            // 2. Volltext
            if use_fts {
                let result = best_match(&raw, &catalog, cfg.top_k, &cfg.scorer);
                if result.score >= cfg.fts_threshold && !result.nr.is_empty() {
                    sheet.set(row, nr_col, parse_nr(&result.nr));
                    audit.push(AuditRow {
                        sheet: sheet.name.clone(),
                        row_index: row + 1,
                        description: raw.clone(),
                        matched_roomtype: result.roomtype.clone(),
                        nr: result.nr.clone(),
                        score: round4(result.score),
                        method: MatchMethod::Fts,
                        ai_confidence: None,
                        ai_rationale: "fts".into(),
                        accepted: true,
                    });
                    fts_updates.insert(
                        key,
                        RoomtypeGuess {
                            nr: result.nr,
                            roomtype: result.roomtype,
                            confidence: result.score,
                            rationale: "fts".into(),
                        },
                    );
                    summary.fts_hits += 1;
                    continue;
                }
            }

            // 3. Für den LLM-Batch vormerken
            pending.push(PendingRow {
                row,
                audit_idx: audit.len(),
                key,
            });
            pending_queries.push(raw.clone());
            audit.push(AuditRow {
                sheet: sheet.name.clone(),
                row_index: row + 1,
                description: raw,
                matched_roomtype: String::new(),
                nr: String::new(),
                score: 0.0,
                method: MatchMethod::Pending,
                ai_confidence: None,
                ai_rationale: String::new(),
                accepted: false,
            });
        }

        if !pending.is_empty() {
            let guesses = resolve_queries(
                resolver,
                &pending_queries,
                &catalog,
                cfg.batch_size,
                &cfg.retry,
                verbose,
            );

            let validated: HashMap<String, RoomtypeGuess> = guesses
                .into_iter()
                .map(|(key, guess)| (key, catalog.validate(&guess)))
                .collect();

            cache.extend(fts_updates);
            cache.extend(validated);
            cache.save(&cfg.cache_path)?;

            // Jede vorgemerkte Zeile liest ihren eigenen Cache-Eintrag,
            // damit identische Anfragen identisch behandelt werden
            for entry in pending {
                let guess = cache.get(&entry.key).cloned().unwrap_or_default();
                let has_nr = !guess.nr.is_empty();
                let accepted = has_nr && guess.confidence >= cfg.ai_threshold;

                if has_nr {
                    sheet.set(entry.row, nr_col, parse_nr(&guess.nr));
                }

                let row = &mut audit[entry.audit_idx];
                row.matched_roomtype = guess.roomtype.clone();
                row.nr = guess.nr.clone();
                row.score = round4(guess.confidence);
                row.method = MatchMethod::for_llm_outcome(accepted, has_nr, use_fts);
                row.ai_confidence = Some(round4(guess.confidence));
                row.ai_rationale = guess.rationale.clone();
                row.accepted = accepted;

                if accepted {
                    summary.llm_accepted += 1;
                } else {
                    summary.unresolved += 1;
                }
            }
        } else if !fts_updates.is_empty() {
            cache.extend(fts_updates);
            cache.save(&cfg.cache_path)?;
        }
    }

    workbook.save(output_xlsx)?;
    write_report(report_csv, &audit)?;

    Ok(summary)
}

/// Rein numerische Kennungen werden als Zahl geschrieben, alles andere
/// als Text (entspricht dem Verhalten der Bestandsdaten).
fn parse_nr(value: &str) -> CellValue {
    let trimmed = value.trim();
    let digits = trimmed.replacen('.', "", 1);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        match trimmed.parse::<f64>() {
            Ok(f) => CellValue::Number(f.trunc()),
            Err(_) => CellValue::Text(trimmed.to_string()),
        }
    } else {
        CellValue::Text(trimmed.to_string())
    }
}
