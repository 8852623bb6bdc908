use crate::llm_provider::LlmProvider;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roomtype-matcher")]
#[command(about = "Raumtyp-Klassifikation für TGA-Kostenschätzungen", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Ausführliche Ausgabe
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// LLM-CLI für den Fallback-Pfad
    #[arg(long, default_value = "gemini", global = true)]
    pub llm_provider: LlmProvider,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Arbeitsmappe klassifizieren und Nummernspalte befüllen
    Process {
        /// Mapping-Tabelle (CSV mit Spalten Nr, Roomtype)
        #[arg(required = true)]
        mapping: PathBuf,

        /// Ziel-Arbeitsmappe (XLSX)
        #[arg(required = true)]
        target: PathBuf,

        /// Ausgabedatei (Default: <target>_raumtypen.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Audit-Report (Default: <target>_report.csv)
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Konfigurationsdatei (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Cache-Datei (überschreibt die Konfiguration)
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Annahmeschwelle für Volltext-Treffer
        #[arg(long)]
        fts_threshold: Option<f64>,

        /// Annahmeschwelle für LLM-/Cache-Konfidenz
        #[arg(long)]
        ai_threshold: Option<f64>,

        /// LLM-Batchgröße
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Größe der Kandidaten-Auswahlliste
        #[arg(long)]
        top_k: Option<usize>,

        /// Zeilen, die bei der Header-Suche geprüft werden
        #[arg(long)]
        max_scan_rows: Option<usize>,

        /// Volltext deaktivieren, jede Zeile über das LLM auflösen
        #[arg(long)]
        llm_only: bool,

        /// Cache-Einträge aus Volltext-Treffern nicht wiederverwenden
        #[arg(long)]
        no_fts_cache_reuse: bool,
    },

    /// Eine einzelne Anfrage gegen den Katalog scoren (Diagnose)
    Match {
        /// Freitext-Raumbezeichnung
        #[arg(required = true)]
        query: String,

        /// Mapping-Tabelle (CSV mit Spalten Nr, Roomtype)
        #[arg(required = true)]
        mapping: PathBuf,

        /// Länge der Auswahlliste
        #[arg(long, default_value = "10")]
        top_k: usize,
    },

    /// Cache anzeigen oder löschen
    Cache {
        /// Cache löschen
        #[arg(long)]
        clear: bool,

        /// Cache-Informationen anzeigen
        #[arg(long)]
        info: bool,

        /// Cache-Datei (Default: cache/roomtype_cache.json)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}
