use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Konfigurationsfehler: {0}")]
    Config(String),

    #[error("Datei nicht gefunden: {0}")]
    FileNotFound(String),

    #[error("Mapping-Tabelle ungültig: {0}")]
    InvalidMapping(String),

    #[error("Excel-Lesefehler: {0}")]
    ExcelRead(String),

    #[error("Excel-Schreibfehler: {0}")]
    ExcelWrite(String),

    #[error("LLM-Aufruf fehlgeschlagen: {0}")]
    ApiCall(String),

    #[error("LLM-Antwort nicht parsebar: {0}")]
    ApiParse(String),

    #[error("CSV-Fehler: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON-Fehler: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MatchError>;
