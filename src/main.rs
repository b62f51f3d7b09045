use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use lumi_merge::{merge, ArtifactRecord, MergeOptions};

#[derive(Parser)]
#[command(name = "lumi-merge")]
#[command(author = "NL Team")]
#[command(version = "0.1.0")]
#[command(about = "Merge sharded mochawesome reports and attach Cypress run artifacts", long_about = None)]
struct Cli {
    /// Glob pattern(s) selecting the report files to merge
    #[arg(value_name = "PATTERN")]
    files: Vec<String>,

    /// JSON file holding the runner's artifact records
    /// (array of {filePath, videoPath, screenshots})
    #[arg(short, long)]
    artifacts: Option<PathBuf>,

    /// Output file path (prints to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let artifacts = match cli.artifacts {
        Some(path) => read_artifacts(&path)?,
        None => Vec::new(),
    };

    let options = MergeOptions { files: cli.files };
    let report = merge(options, artifacts).await?;

    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = cli.output {
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write merged report: {}", path.display()))?;
        println!(
            "{} Merged {} suite(s), {} test(s)",
            "▶".green().bold(),
            report.stats.suites,
            report.stats.tests
        );
        println!(
            "  Report saved to: {}",
            path.display().to_string().cyan()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn read_artifacts(path: &Path) -> anyhow::Result<Vec<ArtifactRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact file: {}", path.display()))?;
    let records = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse artifact file: {}", path.display()))?;
    Ok(records)
}
