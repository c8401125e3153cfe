use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mira_ghg::{Category, EmissionFactorTable, EngineConfig, QuantityInput, Report};

#[derive(Parser)]
#[command(name = "mira-ghg")]
#[command(about = "Greenhouse-gas calculator for agricultural inputs", long_about = None)]
struct Cli {
    /// TOML file with projection settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List emission factors, optionally for a single category
    Factors {
        #[arg(long)]
        category: Option<Category>,
    },
    /// Compute totals, comparison, projection and recommendations for a quantities file
    Calculate {
        /// JSON or TOML file keyed by category
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Override the first projected year
        #[arg(long)]
        start_year: Option<i32>,
        /// Also project each category separately
        #[arg(long)]
        per_category: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    // Logs on stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mira_ghg=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = EngineConfig::load(cli.config.as_deref()).context("loading config")?;

    match cli.command {
        Commands::Factors { category } => list_factors(category),
        Commands::Calculate {
            input,
            format,
            start_year,
            per_category,
        } => {
            if let Some(year) = start_year {
                config.projection.start_year = year;
                config.validate().context("applying --start-year")?;
            }
            calculate(&input, format, &config, per_category)
        }
    }
}

fn list_factors(only: Option<Category>) -> Result<()> {
    let table = EmissionFactorTable::standard();
    let categories: Vec<Category> = match only {
        Some(c) => vec![c],
        None => Category::ALL.to_vec(),
    };
    for category in categories {
        println!("{} (kg CO2e per {})", category.label(), category.unit());
        for (item, factor) in table.items(category) {
            println!("  {item:<20} {factor:>8.2}");
        }
    }
    Ok(())
}

fn calculate(
    path: &std::path::Path,
    format: OutputFormat,
    config: &EngineConfig,
    per_category: bool,
) -> Result<()> {
    let input = QuantityInput::load(path)
        .with_context(|| format!("reading quantities from {}", path.display()))?;
    if input.is_empty() {
        info!("no quantities entered; all totals are zero");
    }

    let report = Report::build(EmissionFactorTable::standard(), &input, config, per_category);
    info!(grand_total = report.grand_total, "emissions calculated");

    match format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
