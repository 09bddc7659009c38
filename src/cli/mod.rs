//! Kolosal mining CLI module
//!
//! Reads a JSON mining request, runs the pipeline and prints the outcome.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::pipeline::{MiningPipeline, MiningTask, PipelineStage};
use crate::training::MiningConfig;

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}

fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn step_ok(msg: &str, detail: &str) {
    println!("  {} {} {}", ok("✓"), msg, dim(detail));
}

#[derive(Parser)]
#[command(name = "kolosal-mine")]
#[command(author = "KolosalAI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Single-shot regression and classification over column data")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a mining request end to end
    Run {
        /// Mining request file (JSON)
        #[arg(short, long)]
        request: PathBuf,

        /// Learner configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print only the result JSON
        #[arg(short, long)]
        quiet: bool,
    },

    /// Build the schema and datasets without fitting a model
    Inspect {
        /// Mining request file (JSON)
        #[arg(short, long)]
        request: PathBuf,
    },
}

fn load_task(path: &Path) -> anyhow::Result<MiningTask> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading request {}", path.display()))?;
    let task = serde_json::from_str(&json)
        .with_context(|| format!("parsing request {}", path.display()))?;
    Ok(task)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MiningConfig> {
    match path {
        Some(path) => MiningConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(MiningConfig::default()),
    }
}

/// Run a request through every stage
pub fn cmd_run(request: &Path, config: Option<&Path>, quiet: bool) -> anyhow::Result<()> {
    let task = load_task(request)?;
    let config = load_config(config)?;
    let mut pipeline = MiningPipeline::with_config(task, config);

    let start = Instant::now();
    while pipeline.stage() != PipelineStage::Evaluated {
        let stage = pipeline.step()?;
        if !quiet {
            step_ok(&stage.to_string(), &format!("{:.1?}", start.elapsed()));
        }
    }

    let result = pipeline
        .result()
        .context("pipeline finished without a result")?;
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

/// Stop after dataset assembly and describe what was built
pub fn cmd_inspect(request: &Path) -> anyhow::Result<()> {
    let task = load_task(request)?;
    let mut pipeline = MiningPipeline::new(task);

    while pipeline.stage() < PipelineStage::DatasetsAssembled {
        pipeline.step()?;
    }

    let schema = pipeline.schema().context("schema missing")?;
    let sizes = pipeline.row_count().context("row counts missing")?;

    println!("  {}", "Schema".white().bold());
    for (i, attribute) in schema.attributes().iter().enumerate() {
        let kind = match attribute.domain() {
            Some(domain) => format!("nominal {{{}}}", domain.values().join(", ")),
            None => "numeric".to_string(),
        };
        let marker = if i == schema.class_index() { " (target)" } else { "" };
        println!("    {} {}{}", attribute.name(), dim(&kind), marker);
    }
    step_ok(
        "rows",
        &format!(
            "{} values / {} columns = {} rows",
            sizes.row_size, sizes.columns, sizes.rows_per_column
        ),
    );
    if let Some(row) = pipeline.prediction_row() {
        step_ok("query", &format!("{:?}", row.features().to_vec()));
    }
    Ok(())
}
