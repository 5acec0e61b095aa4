// src/main.rs
use clap::Parser;
use std::path::PathBuf;
use theorem_extractor::config::AppConfig;
use theorem_extractor::dataset;
use theorem_extractor::models::RunSummary;
use theorem_extractor::oracle::{OpenAiOracle, UniquenessJudge};
use theorem_extractor::pipeline::PaperPipeline;
use theorem_extractor::storage::StorageManager;
use theorem_extractor::utils::{self, AppError};

const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Extract theorems with a single definitive answer from LaTeX papers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSONL file of papers: {"full_text": ..., "paper_link": ...} per line
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for the dataset and its metadata
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// Base name of the output files
    #[arg(short, long, default_value = "theorem_dataset")]
    name: String,

    /// TOML configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only process the first N papers
    #[arg(long)]
    sample_papers: Option<usize>,

    /// Include theorems from appendices (skipped by default)
    #[arg(long)]
    include_appendix: bool,

    /// Oracle model override
    #[arg(long)]
    model: Option<String>,

    /// Oracle retry cap override
    #[arg(long)]
    max_retries: Option<u32>,

    /// Debug mode - save annotated working text per paper
    #[arg(short, long)]
    debug: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(if args.verbose { "debug" } else { "info" });
    tracing::info!("Starting processing for args: {:?}", args);

    // 2. Configuration: file, then CLI overrides, then the injected API key
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if args.include_appendix {
        config.extractor.skip_appendix = false;
    }
    if let Some(model) = &args.model {
        config.oracle.model = model.clone();
    }
    if let Some(max_retries) = args.max_retries {
        config.oracle.max_retries = max_retries;
    }
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        config.oracle = config.oracle.with_api_key(key);
    }
    config.validate()?;

    if config.extractor.skip_appendix {
        tracing::info!("Appendix theorems: EXCLUDED (use --include-appendix to include them)");
    } else {
        tracing::info!("Appendix theorems: INCLUDED");
    }

    // 3. Initialize storage and the oracle
    let storage = StorageManager::new(&args.output_dir)?;
    let oracle = OpenAiOracle::new(&config.oracle).map_err(|e| {
        tracing::error!("Cannot build oracle client; is {} set?", API_KEY_ENV);
        e
    })?;
    tracing::info!("Judging theorems with oracle model {}", oracle.model());
    let judge = UniquenessJudge::new(oracle, &config.oracle);
    let mut pipeline = PaperPipeline::new(judge, &config.extractor);
    if args.debug {
        pipeline = pipeline.with_debug_dir(storage.base_dir().join("debug"));
    }

    // 4. Load papers (dedup and sampling are the caller's job)
    let papers = dataset::load_papers(&args.input)?;
    let papers = dataset::dedup_papers_by_link(papers);
    let papers = dataset::take_sample(papers, args.sample_papers);

    if papers.is_empty() {
        return Err(AppError::Processing(format!("No papers found in {}", args.input.display())));
    }

    // 5. Process every paper
    let outcome = pipeline.process_papers(&papers).await;
    let unique_theorems = outcome.records.len();
    let records = dataset::dedup_records_by_context(outcome.records);

    tracing::info!(
        "Processing complete. Papers: {}, theorems found: {}, unique theorems: {}, records: {}",
        outcome.papers_processed,
        outcome.total_spans,
        unique_theorems,
        records.len()
    );

    // 6. Persist
    storage.save_records(&args.name, &records)?;
    let summary = RunSummary {
        papers_processed: outcome.papers_processed,
        total_theorems: outcome.total_spans,
        unique_theorems,
        records_written: records.len(),
        model: config.oracle.model.clone(),
        skip_appendix: config.extractor.skip_appendix,
    };
    if let Err(e) = storage.save_run_metadata(&args.name, &summary) {
        tracing::error!("Failed to save run metadata: {}", e);
    }

    Ok(())
}
