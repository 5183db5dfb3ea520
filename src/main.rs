use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use flickr_harvester::config::DEFAULT_CONFIG_PATH;
use flickr_harvester::{FlickrHarvester, Observation, ObservationMessage};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Harvest geotagged Flickr photos as observations.
#[derive(Parser)]
#[command(name = "flickr-harvester", version)]
struct Cli {
    /// Credentials and settings (TOML).
    #[arg(long, global = true, env = "FLICKR_HARVESTER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Write the observations as JSON to this file instead of stdout.
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Photos taken around a point.
    Location {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Earliest taken date (RFC 3339).
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// Latest taken date (RFC 3339).
        #[arg(long)]
        end: Option<DateTime<Utc>>,
    },

    /// Photos carrying every given tag.
    Tags {
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Photos by Flickr id.
    Ids {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Tag search over SEARCH_TERMS from the config file.
    Terms,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let harvester = FlickrHarvester::from_config_file(&cli.config)
        .with_context(|| format!("Failed to set up harvester from {}", cli.config.display()))?;

    let observations: Vec<ObservationMessage> = match cli.command {
        Commands::Location {
            lat,
            lon,
            start,
            end,
        } => {
            info!("Searching around ({}, {})", lat, lon);
            harvester
                .search_by_location_and_time(lat, lon, start, end)
                .await?
        }
        Commands::Tags { tags } => {
            info!("Searching for tags {:?}", tags);
            harvester.search_by_tags(tags.as_slice()).await?.into_iter().collect()
        }
        Commands::Ids { ids } => harvester.get_by_ids(ids.as_slice()).await?.into_iter().collect(),
        Commands::Terms => {
            info!("Searching for configured terms {:?}", harvester.search_terms());
            harvester.harvest_search_terms().await?.into_iter().collect()
        }
    };

    info!("Harvested {} observations", observations.len());

    let json = serde_json::to_string_pretty(&observations)?;
    match cli.output {
        Some(path) => {
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            for (i, observation) in observations.iter().enumerate() {
                println!("{}. {}", i + 1, observation);
                println!("   {}", observation.result());
                println!("   URL: {}", observation.result_href());
            }
            info!("Saved observations to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
