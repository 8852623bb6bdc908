use clap::ValueEnum;

/// Welches LLM-CLI für den Fallback-Pfad aufgerufen wird.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LlmProvider {
    Gemini,
    Claude,
    Codex,
}

impl LlmProvider {
    pub fn command_name(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::Claude => "claude",
            LlmProvider::Codex => "codex",
        }
    }
}
