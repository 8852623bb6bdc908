//! Raumtyp-Klassifikation für TGA-Kostenschätzungen
//!
//! Gleicht freie deutsche Raumbezeichnungen aus Excel-Arbeitsmappen
//! gegen einen festen Raumtyp-Katalog ab: Cache → deterministisches
//! Volltext-Matching → LLM-Fallback mit Katalog-Validierung.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm_provider;
pub mod matcher;
pub mod normalizer;
pub mod report;
pub mod resolver;
pub mod service;
pub mod workbook;
