use anyhow::Result;
use clap::Parser;
use conveyor::catalog::DirectoryCatalog;
use conveyor::validation::{PipelineDefinition, PipelineValidator};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "conveyor-validate")]
#[command(about = "Validate a pipeline definition, upgrading lagging connection configurations")]
#[command(version)]
struct Cli {
    /// Pipeline definition JSON file
    pipeline: PathBuf,

    /// Directory of per-type upgrade definitions (<type>.yaml)
    #[arg(long, short)]
    definitions: PathBuf,

    /// Write the upgraded pipeline definition back out
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let catalog = DirectoryCatalog::open(&cli.definitions)?;
    let mut pipeline = PipelineDefinition::load(&cli.pipeline)?;

    let validator = PipelineValidator::new();
    let issues = validator.validate(&catalog, &mut pipeline);

    if let Some(output) = &cli.output {
        std::fs::write(output, serde_json::to_string_pretty(&pipeline)?)?;
        tracing::info!(path = %output.display(), "wrote upgraded pipeline definition");
    }

    if issues.is_empty() {
        println!("{}: ok", pipeline.title);
        return Ok(());
    }

    for issue in &issues {
        eprintln!("{}", issue);
    }
    eprintln!("{} issue(s) found", issues.len());
    std::process::exit(1);
}
