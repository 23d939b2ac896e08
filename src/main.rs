//! Good Spots main entry point
//!
//! This is the command-line interface for the restaurant listing harvester.

use anyhow::Context;
use clap::{Parser, Subcommand};
use good_spots::config::{load_config, Config, OutputLayout};
use good_spots::crawler::{CrawlLimits, Harvester};
use good_spots::output::{FileSink, RecordSink};
use good_spots::restaurant::parse_restaurant_file;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Good Spots: a restaurant listing harvester
///
/// Walks a review site's sitemap from city to area to restaurant, saves each
/// restaurant page and extracts its metadata.
#[derive(Parser, Debug)]
#[command(name = "good-spots")]
#[command(version)]
#[command(about = "A restaurant listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Directory all output is written under
    #[arg(
        long,
        value_name = "DIR",
        env = "LOCAL_GOOD_SPOTS_OUTPUT_DIR",
        global = true
    )]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a city's areas and write them to cities/{city}.csv
    Areas {
        /// City slug, e.g. "tokyo"
        city: String,
    },

    /// List an area's restaurants and write them to {city}/{area}.txt
    Restaurants {
        /// Area sitemap URL, e.g. https://tabelog.com/sitemap/tokyo/A1316-A131602/
        area_url: String,
    },

    /// Save one restaurant page under restaurants/
    Fetch {
        /// Restaurant URL, e.g. https://tabelog.com/tokyo/A1317/A131706/13120700/
        url: String,
    },

    /// Extract metadata from a saved restaurant page
    Parse {
        /// Saved HTML file
        file: PathBuf,

        /// Also write the record to restaurants/{stem}.json
        #[arg(long)]
        write: bool,
    },

    /// Save one restaurant page and write its metadata record
    Harvest {
        /// Restaurant URL
        url: String,
    },

    /// Run the whole pipeline for a city
    Crawl {
        /// City slug, e.g. "tokyo"
        city: String,

        /// Stop after this many areas
        #[arg(long)]
        max_areas: Option<usize>,

        /// Harvest at most this many restaurants per area
        #[arg(long)]
        max_restaurants: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(cli.config.as_deref(), cli.output_dir)?;
    tracing::debug!("Output root: {}", config.output.root.display());

    let result = run(cli.command, config).await;
    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("good_spots=info,warn"),
            1 => EnvFilter::new("good_spots=debug,info"),
            2 => EnvFilter::new("good_spots=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Config file (or defaults), then the output directory override
fn resolve_config(path: Option<&Path>, output_dir: Option<PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    Ok(match output_dir {
        Some(dir) => config.with_output_root(dir),
        None => config,
    })
}

async fn run(command: Command, config: Config) -> anyhow::Result<()> {
    match command {
        Command::Areas { city } => {
            let harvester = Harvester::new(config)?;
            let areas = harvester
                .collect_city(&city)
                .await
                .with_context(|| format!("collecting areas for {}", city))?;

            println!("Found {} areas in {}:", areas.len(), city);
            for area in &areas {
                println!("{} ({}): {}", area.name, area.code, area.url);
            }
        }

        Command::Restaurants { area_url } => {
            let harvester = Harvester::new(config)?;
            let url = parse_url(&area_url)?;
            let harvest = harvester
                .collect_area(&url)
                .await
                .with_context(|| format!("collecting restaurants in {}", area_url))?;

            println!(
                "Found {} restaurants in {}",
                harvest.restaurants.len(),
                harvest.area.code
            );
            for failure in &harvest.failures {
                println!("  skipped {}", failure);
            }
        }

        Command::Fetch { url } => {
            let harvester = Harvester::new(config)?;
            let target = parse_url(&url)?;
            let captured = harvester
                .capture_restaurant(&target)
                .await
                .with_context(|| format!("capturing restaurant page {}", url))?;

            println!("Saved {} to {}", url, captured.raw_path.display());
        }

        Command::Parse { file, write } => {
            let record = parse_restaurant_file(&file)?;
            println!("{}", serde_json::to_string_pretty(&record)?);

            if write {
                let stem = file
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .with_context(|| format!("no usable file stem in {}", file.display()))?;
                let sink = FileSink::new(OutputLayout::from(&config.output));
                let path = sink.write_record(stem, &record)?;
                println!("Wrote record to {}", path.display());
            }
        }

        Command::Harvest { url } => {
            let harvester = Harvester::new(config)?;
            let target = parse_url(&url)?;
            let harvested = harvester
                .harvest_restaurant(&target)
                .await
                .with_context(|| format!("harvesting restaurant {}", url))?;

            println!("{}", serde_json::to_string_pretty(&harvested.record)?);
        }

        Command::Crawl {
            city,
            max_areas,
            max_restaurants,
        } => {
            let harvester = Harvester::new(config)?;
            let limits = CrawlLimits {
                max_areas,
                max_restaurants_per_area: max_restaurants,
            };
            let report = harvester
                .crawl_city(&city, limits)
                .await
                .with_context(|| format!("crawling {}", city))?;

            println!(
                "Crawled {}: {}/{} areas, {} restaurants, {} records, {} failures",
                city,
                report.areas_walked,
                report.areas_found,
                report.restaurants_found,
                report.records_written,
                report.failures.len()
            );
        }
    }

    Ok(())
}

fn parse_url(raw: &str) -> anyhow::Result<Url> {
    Url::parse(raw).with_context(|| format!("invalid URL {:?}", raw))
}
