use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use poamap::maps::{self, Written};
use poamap::{combine, population, Config};

#[derive(Parser, Debug)]
#[command(name = "poamap", version, about = "Firearms per 1000 people by postcode")]
struct Cli {
    #[arg(long, global = true, default_value = ".", help = "Project root holding data/")]
    root: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract postcode populations from the census table
    Extract,
    /// Join firearms counts with population and derive the rate
    Combine,
    /// Self-contained choropleth map
    Choropleth,
    /// Simplified single-file map for static hosting
    Optimized {
        #[arg(long, help = "Simplification tolerance in degrees")]
        tolerance: Option<f64>,
    },
    /// TopoJSON plus a map document that loads it
    Pages,
    /// Circle markers at postcode centroids
    Markers,
    /// Extract, combine and render every map except the optimized one
    All,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let mut config = Config::with_root(&cli.root);

    match cli.command {
        Commands::Extract => run_extract(&config),
        Commands::Combine => run_combine(&config),
        Commands::Choropleth => report(
            maps::choropleth(&config, None, &config.choropleth_html).context("choropleth map")?,
        ),
        Commands::Optimized { tolerance } => {
            if let Some(tolerance) = tolerance {
                config.map.simplify_tolerance = tolerance;
            }
            report(maps::optimized(&config).context("optimized map")?)
        }
        Commands::Pages => report(maps::pages(&config).context("pages map")?),
        Commands::Markers => report(maps::markers(&config).context("marker map")?),
        Commands::All => {
            run_extract(&config)?;
            run_combine(&config)?;
            report(maps::choropleth(&config, None, &config.choropleth_html)?)?;
            report(maps::markers(&config)?)?;
            report(maps::pages(&config)?)
        }
    }
}

fn run_extract(config: &Config) -> Result<()> {
    let count = population::run(config)
        .with_context(|| format!("extracting {}", config.census.display()))?;
    println!(
        "Extracted {count} postcodes with population data to {}",
        config.population.display()
    );
    Ok(())
}

fn run_combine(config: &Config) -> Result<()> {
    let summary = combine::run(config).context("combining firearms and population")?;
    println!("Combined data written to {}", config.combined.display());
    println!("{summary}");
    Ok(())
}

fn report(written: Written) -> Result<()> {
    println!("{}", written.stats);
    for (path, size) in &written.files {
        println!("Saved {} ({:.2} MB)", path.display(), *size as f64 / (1024.0 * 1024.0));
    }
    Ok(())
}
