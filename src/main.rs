use clap::Parser;
use roomtype_matcher::{catalog, cli, config, error, matcher, resolver, service};

use cli::{Cli, Commands};
use config::{MatchConfig, MatchingMode};
use error::Result;
use resolver::cache::MatchCache;
use resolver::GeminiCliResolver;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            mapping,
            target,
            output,
            report,
            config,
            cache,
            fts_threshold,
            ai_threshold,
            batch_size,
            top_k,
            max_scan_rows,
            llm_only,
            no_fts_cache_reuse,
        } => {
            let mut cfg = match config {
                Some(path) => MatchConfig::load(&path)?,
                None => MatchConfig::default(),
            };
            if let Some(path) = cache {
                cfg.cache_path = path;
            }
            if let Some(v) = fts_threshold {
                cfg.fts_threshold = v;
            }
            if let Some(v) = ai_threshold {
                cfg.ai_threshold = v;
            }
            if let Some(v) = batch_size {
                cfg.batch_size = v;
            }
            if let Some(v) = top_k {
                cfg.top_k = v;
            }
            if let Some(v) = max_scan_rows {
                cfg.max_scan_rows = v;
            }
            if llm_only {
                cfg.matching_mode = MatchingMode::LlmOnly;
            }
            if no_fts_cache_reuse {
                cfg.reuse_fts_cache_hits = false;
            }

            let output = output.unwrap_or_else(|| with_suffix(&target, "_raumtypen.xlsx"));
            let report = report.unwrap_or_else(|| with_suffix(&target, "_report.csv"));

            println!("roomtype-matcher - Klassifikation\n");
            println!(
                "[1/2] Verarbeite {} (Modus: {})...",
                target.display(),
                if cfg.is_hybrid() { "hybrid" } else { "llm_only" }
            );

            let resolver = GeminiCliResolver::new(cli.llm_provider, cli.verbose);
            let summary = service::process(
                &mapping, &target, &output, &report, &cfg, &resolver, cli.verbose,
            )?;

            println!(
                "✔ {} Blätter verarbeitet, {} übersprungen",
                summary.sheets_processed, summary.sheets_skipped
            );
            println!(
                "✔ {} Zeilen: {} Cache, {} Volltext, {} LLM, {} offen\n",
                summary.rows_processed,
                summary.cache_hits,
                summary.fts_hits,
                summary.llm_accepted,
                summary.unresolved
            );

            println!("[2/2] Ergebnisse geschrieben");
            println!("  Arbeitsmappe: {}", output.display());
            println!("  Report:       {}", report.display());
            println!("  Cache:        {}", cfg.cache_path.display());
        }

        Commands::Match {
            query,
            mapping,
            top_k,
        } => {
            let catalog = catalog::Catalog::from_csv(&mapping)?;
            let weights = matcher::ScorerWeights::default();
            let result = matcher::best_match(&query, &catalog, top_k, &weights);

            println!("Anfrage: {}", query);
            println!(
                "Bester Treffer: {} (Nr {}, Score {:.4})\n",
                result.roomtype, result.nr, result.score
            );
            for (i, candidate) in result.candidates.iter().enumerate() {
                println!(
                    "  {:>2}. {:.4}  {}  (Nr {})",
                    i + 1,
                    candidate.score,
                    candidate.roomtype,
                    candidate.nr
                );
            }
        }

        Commands::Cache { clear, info, path } => {
            let cache_path = path.unwrap_or_else(|| MatchConfig::default().cache_path);

            if info || !clear {
                if cache_path.exists() {
                    let cache = MatchCache::load(&cache_path);
                    println!("Cache-Informationen:");
                    println!("  Pfad:     {}", cache_path.display());
                    println!("  Einträge: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  Größe:    {} Bytes", meta.len());
                    }
                } else {
                    println!("Cache-Datei existiert nicht: {}", cache_path.display());
                }
            }

            if clear {
                if cache_path.exists() {
                    std::fs::remove_file(&cache_path)?;
                    println!("✔ Cache gelöscht: {}", cache_path.display());
                } else {
                    println!("Cache-Datei existiert nicht");
                }
            }
        }
    }

    Ok(())
}

fn with_suffix(target: &std::path::Path, suffix: &str) -> std::path::PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".into());
    target.with_file_name(format!("{}{}", stem, suffix))
}
