//! Produktiver Resolver über ein externes LLM-CLI
//!
//! Baut pro Batch einen Prompt aus Anweisung + JSON-Payload
//! (Katalog und Anfragen) und ruft das konfigurierte CLI auf.
//! Zeitlimits und Transportdetails sind Sache des CLIs.

use super::{parse_batch_response, RoomtypeGuess, RoomtypeResolver};
use crate::catalog::Catalog;
use crate::error::{MatchError, Result};
use crate::llm_provider::LlmProvider;
use serde_json::json;
use std::process::Command;

const INSTRUCTION: &str = "You are given a fixed catalog of room types. \
For each query, choose the best matching item from the catalog. \
If none fits well, set confidence < 0.85. \
Return ONLY a JSON array with one object per input in the same order. \
Each object must be: {\"nr\": str, \"roomtype\": str, \"confidence\": number, \"rationale\": str}. \
Do not include ellipses, code fences, or prose.";

pub struct GeminiCliResolver {
    provider: LlmProvider,
    verbose: bool,
}

impl GeminiCliResolver {
    pub fn new(provider: LlmProvider, verbose: bool) -> Self {
        Self { provider, verbose }
    }

    fn build_prompt(&self, queries: &[String], catalog: &Catalog) -> String {
        let payload = json!({
            "catalog": catalog
                .entries()
                .iter()
                .map(|e| json!({"nr": e.nr, "roomtype": e.roomtype}))
                .collect::<Vec<_>>(),
            "queries": queries,
        });
        format!("{}\n\n{}", INSTRUCTION, payload)
    }

    fn run_cli(&self, prompt: &str) -> Result<String> {
        let command = self.provider.command_name();

        // Zeilenumbrüche stören manche Shells beim Durchreichen
        let flat_prompt = prompt.replace('\n', " ");

        #[cfg(windows)]
        let output = Command::new("cmd")
            .args(["/c", command, "-p", &flat_prompt, "--output-format", "text"])
            .output()
            .map_err(|e| MatchError::ApiCall(format!("{}-CLI nicht startbar: {}", command, e)))?;

        #[cfg(not(windows))]
        let output = Command::new(command)
            .args(["-p", &flat_prompt, "--output-format", "text"])
            .output()
            .map_err(|e| MatchError::ApiCall(format!("{}-CLI nicht startbar: {}", command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MatchError::ApiCall(format!(
                "{}-CLI fehlgeschlagen (Code {:?}): {}",
                command,
                output.status.code(),
                stderr.trim()
            )));
        }

        let response = String::from_utf8_lossy(&output.stdout).to_string();

        if self.verbose {
            let preview: String = response.chars().take(500).collect();
            println!("  Antwort: {}", preview);
        }

        Ok(response)
    }
}

impl RoomtypeResolver for GeminiCliResolver {
    fn resolve_batch(&self, queries: &[String], catalog: &Catalog) -> Result<Vec<RoomtypeGuess>> {
        let prompt = self.build_prompt(queries, catalog);

        if self.verbose {
            println!("  Promptlänge: {} Zeichen", prompt.len());
        }

        let response = self.run_cli(&prompt)?;
        parse_batch_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_prompt_contains_catalog_and_queries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Nr,Roomtype\n1,B\xc3\xbcro\n").unwrap();
        let catalog = Catalog::from_csv(file.path()).unwrap();

        let resolver = GeminiCliResolver::new(LlmProvider::Gemini, false);
        let prompt = resolver.build_prompt(&["B\u{fc}ro 101".to_string()], &catalog);

        assert!(prompt.contains("\"catalog\""));
        assert!(prompt.contains("Büro"));
        assert!(prompt.contains("Büro 101"));
        assert!(prompt.contains("JSON array"));
    }
}
