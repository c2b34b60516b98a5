use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing::info;

use crate::catalog::Catalog;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::embedding::{ModelEmbedder, TextEmbedder, MODEL_NAME};
use crate::index::{LexicalIndex, SemanticIndex};
use crate::server;
use crate::service::{QueryRequest, QueryService, RankedProblem};

pub fn run() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();
    run_with_cli(cli)
}

pub fn run_with_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { dataset, addr } => handle_serve(dataset, addr),
        Commands::Query {
            query,
            method,
            top_k,
            dataset,
            json,
        } => handle_query(query, method, top_k, dataset, json),
        Commands::Config { init } => handle_config(init),
    }
}

fn handle_serve(dataset: Option<PathBuf>, addr: Option<SocketAddr>) -> Result<()> {
    let config = Config::load()?;
    let dataset = dataset.unwrap_or_else(|| config.dataset.path.clone());
    let addr = addr.unwrap_or(config.server.addr);

    let service = Arc::new(build_service(&dataset, &config)?);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(server::serve(addr, service))
}

fn handle_query(
    query: String,
    method: String,
    top_k: usize,
    dataset: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = Config::load()?;
    let dataset = dataset.unwrap_or_else(|| config.dataset.path.clone());

    let service = build_service(&dataset, &config)?;
    let request = QueryRequest {
        text: query,
        method,
        top_k,
    };
    let ranked = service.handle(&request)?;

    if json {
        let summaries: Vec<server::ProblemSummary> = ranked
            .into_iter()
            .map(|problem| server::ProblemSummary {
                id: problem.record.id,
                title: problem.record.title,
                difficulty: problem.record.difficulty,
                link: problem.record.url,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    render_matches(&ranked);
    Ok(())
}

fn render_matches(ranked: &[RankedProblem]) {
    if ranked.is_empty() {
        println!("{} No matches found", style("⚠").yellow());
        return;
    }

    for (position, problem) in ranked.iter().enumerate() {
        println!(
            "{:>2}. {} {} {}",
            position + 1,
            style(&problem.record.title).bold(),
            style(format!("[{}]", problem.record.difficulty)).dim(),
            style(format!("score {:.3}", problem.score)).cyan(),
        );
        println!("    {}", problem.record.url);
    }
}

fn build_service(dataset: &Path, config: &Config) -> Result<QueryService> {
    let catalog = Catalog::load(dataset)
        .with_context(|| format!("failed to load problem catalog from {}", dataset.display()))?;
    info!(problems = catalog.len(), "catalog loaded");

    let descriptions = catalog.descriptions();

    let lexical = LexicalIndex::fit(&descriptions).context("failed to fit the lexical index")?;
    info!(vocabulary = lexical.vocabulary_size(), "lexical index ready");

    eprintln!(
        "{} Loading embedding model ({MODEL_NAME})…",
        style("ℹ").cyan()
    );
    let embedder: Arc<dyn TextEmbedder> =
        Arc::new(ModelEmbedder::new(config.embedding.show_download_progress)?);

    let semantic = SemanticIndex::build(embedder, &descriptions)
        .context("failed to embed the problem catalog")?;
    info!(dimension = semantic.dimension(), "semantic index ready");

    Ok(QueryService::new(catalog, lexical, semantic))
}

fn handle_config(init: bool) -> Result<()> {
    let config_path = Config::config_path();

    if init {
        if config_path.exists() {
            println!(
                "{} Config already exists at {}",
                style("ℹ").cyan(),
                config_path.display()
            );
        } else {
            let path = Config::create_default_config()?;
            println!(
                "{} Created config at {}",
                style("✔").green(),
                path.display()
            );
        }
        return Ok(());
    }

    println!(
        "{} Config path: {}",
        style("ℹ").cyan(),
        config_path.display()
    );

    if !config_path.exists() {
        println!("  No config file found (using defaults)");
        println!(
            "  Run {} to create one",
            style("probsim config --init").cyan()
        );
    }

    Ok(())
}

fn setup_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "probsim=info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
