use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use uxguide_catalog::Catalog;
use uxguide_search::{SearchMode, SearchOrchestrator};
use uxguide_vector_store::{detect_provider, EmbeddingMode, ProviderSettings};

mod report;
mod service;

pub use report::{render_error, render_json, render_markdown};
pub use service::{GuideSearch, SearchReport, STACK_DOMAIN};

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "uxguide")]
#[command(about = "Search UI/UX style guides with BM25, embeddings, or both", long_about = None)]
#[command(version)]
struct Cli {
    /// Search query
    query: String,

    /// Topic to search (style, color, chart, ...); resolved from the query when omitted
    #[arg(short, long)]
    domain: Option<String>,

    /// Search framework-specific guidelines instead of a topic
    #[arg(short, long)]
    stack: Option<String>,

    /// Ranking mode: lexical|semantic|fused (also bm25|vector|hybrid)
    #[arg(short, long, default_value = "lexical")]
    mode: String,

    /// Maximum number of results (default from the catalog, normally 3)
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Directory holding the CSV tables (overrides UXGUIDE_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// TOML catalog replacing the built-in topics and stacks
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Override embedding backend in this process
    #[arg(long, value_enum)]
    embed_mode: Option<EmbedMode>,

    /// Override embedding model id
    #[arg(long)]
    embed_model: Option<String>,

    /// Model cache directory (overrides UXGUIDE_MODEL_DIR)
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum EmbedMode {
    Fast,
    Stub,
    Off,
}

impl EmbedMode {
    const fn as_embedding_mode(self) -> EmbeddingMode {
        match self {
            Self::Fast => EmbeddingMode::Fast,
            Self::Stub => EmbeddingMode::Stub,
            Self::Off => EmbeddingMode::Off,
        }
    }
}

pub fn main_entry() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(text) => {
            print_stdout(&text)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            log::debug!("Search failed: {err:?}");
            print_stdout(&render_error(&err, cli.json))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || cli.json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // ORT is extremely noisy
    if !cli.verbose {
        builder.filter_module("ort", log::LevelFilter::Off);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn run(cli: &Cli) -> Result<String> {
    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => Catalog::builtin(),
    };

    let mode = SearchMode::resolve(&cli.mode);
    let result_count = cli
        .max_results
        .unwrap_or(catalog.search.default_result_count);

    let config = catalog.search;
    let orchestrator = if mode.needs_embeddings() {
        let provider = detect_provider(&provider_settings(cli)?);
        SearchOrchestrator::new(provider, config)
    } else {
        SearchOrchestrator::lexical_only(config)
    };

    let search = GuideSearch::new(catalog, data_dir(cli), orchestrator);
    let report = match &cli.stack {
        Some(stack) => search.search_stack(&cli.query, stack, mode, result_count)?,
        None => search.search_topic(&cli.query, cli.domain.as_deref(), mode, result_count)?,
    };

    if cli.json {
        render_json(&report)
    } else {
        Ok(render_markdown(&report))
    }
}

fn data_dir(cli: &Cli) -> PathBuf {
    cli.data_dir.clone().unwrap_or_else(|| {
        env::var("UXGUIDE_DATA_DIR").map_or_else(|_| PathBuf::from("data"), PathBuf::from)
    })
}

fn provider_settings(cli: &Cli) -> Result<ProviderSettings> {
    let mut settings =
        ProviderSettings::from_env_with_mode(cli.embed_mode.map(EmbedMode::as_embedding_mode))
            .context("Invalid embedding mode")?;
    if let Some(model_id) = &cli.embed_model {
        settings.model_id.clone_from(model_id);
    }
    if let Some(dir) = &cli.model_dir {
        settings.model_dir.clone_from(dir);
    }
    Ok(settings)
}
