//! Audit-Report
//!
//! Eine Zeile pro verarbeiteter (nicht leerer) Beschreibungszelle,
//! in Blatt- und dann Zeilenreihenfolge. Wird am Ende des Laufs als
//! CSV geschrieben.

use crate::error::Result;
use crate::matcher::MatchMethod;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct AuditRow {
    #[serde(rename = "Sheet")]
    pub sheet: String,

    /// 1-basierter Zeilenindex wie in Excel angezeigt
    #[serde(rename = "RowIndex")]
    pub row_index: usize,

    #[serde(rename = "Raum-Bezeichnung")]
    pub description: String,

    #[serde(rename = "MatchedRoomtype")]
    pub matched_roomtype: String,

    #[serde(rename = "Nr")]
    pub nr: String,

    #[serde(rename = "Score")]
    pub score: f64,

    #[serde(rename = "Method")]
    pub method: MatchMethod,

    #[serde(rename = "AI_Confidence")]
    pub ai_confidence: Option<f64>,

    #[serde(rename = "AI_Rationale")]
    pub ai_rationale: String,

    #[serde(rename = "Accepted")]
    pub accepted: bool,
}

/// Rundung auf 4 Nachkommastellen für Score-Spalten.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

pub fn write_report(path: &Path, rows: &[AuditRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut out = BufWriter::new(File::create(path)?);
    // BOM, sonst öffnet Excel die Umlaut-Spalten nicht als UTF-8
    out.write_all(b"\xef\xbb\xbf")?;

    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
