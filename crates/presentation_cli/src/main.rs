//! Stratus CLI
//!
//! Command-line interface for database administration and health checks.

#![allow(clippy::print_stdout)]

mod catalog_file;

use std::{path::PathBuf, sync::Arc};

use application::CatalogService;
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, AsyncDatabase, AsyncDatabaseConfig, SqliteLocationStore};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Stratus CLI
#[derive(Parser)]
#[command(name = "stratus-cli")]
#[command(author, version, about = "Stratus weather aggregation CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "STRATUS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Import a location catalog from a JSON file
    ///
    /// The file is a JSON array of city records, for example
    /// `{"city": "Lisbon", "country": "Portugal", "lat": 38.74, "lng": -9.16}`.
    /// Existing locations keep their cached baseline.
    ImportLocations {
        /// Path to the catalog file
        file: PathBuf,
    },

    /// List the countries in the catalog
    Countries,

    /// List the cities of one country
    Cities {
        /// Country name (case-insensitive)
        country: String,
    },

    /// Check server health (used by Docker healthcheck)
    Health {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Format endpoint URL
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Open the configured database, migrating when configured to
async fn open_database(config: &AppConfig, migrate: bool) -> anyhow::Result<AsyncDatabase> {
    let db = AsyncDatabase::new(&AsyncDatabaseConfig::from_app_config(&config.database)).await?;
    if migrate || config.database.run_migrations {
        db.migrate().await?;
    }
    Ok(db)
}

fn catalog_service(db: &AsyncDatabase) -> CatalogService {
    CatalogService::new(Arc::new(SqliteLocationStore::new(db.pool().clone())))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = log_filter_from_verbosity(cli.verbose);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Health { url } => {
            let client = reqwest::Client::new();
            match client.get(endpoint_url(&url, "/ready")).send().await {
                Ok(resp) if resp.status().is_success() => {
                    println!("✅ Healthy");
                    std::process::exit(0);
                },
                Ok(resp) => {
                    println!("❌ Unhealthy: HTTP {}", resp.status());
                    std::process::exit(1);
                },
                Err(e) => {
                    println!("❌ Unhealthy: {e}");
                    std::process::exit(1);
                },
            }
        },

        command => {
            let config = AppConfig::load_from(cli.config.as_deref())?;
            run_database_command(command, &config).await?;
        },
    }

    Ok(())
}

async fn run_database_command(command: Commands, config: &AppConfig) -> anyhow::Result<()> {
    let db = open_database(config, matches!(command, Commands::Migrate)).await?;

    match command {
        Commands::Migrate => {
            println!("✅ Migrations applied to {}", config.database.path);
        },

        Commands::ImportLocations { file } => {
            let locations = catalog_file::read_catalog(&file)?;
            info!(count = locations.len(), file = %file.display(), "Catalog file read");
            let imported = catalog_service(&db).import(&locations).await?;
            println!("📥 Imported {imported} location(s) from {}", file.display());
        },

        Commands::Countries => {
            let countries = catalog_service(&db).countries().await?;
            if countries.is_empty() {
                println!("No locations imported yet");
            }
            for country in countries {
                println!("{country}");
            }
        },

        Commands::Cities { country } => {
            let cities = catalog_service(&db).cities(&country).await?;
            if cities.is_empty() {
                println!("No cities found for {country}");
            }
            for city in cities {
                let baseline = if city.has_profile() { "✓" } else { " " };
                println!(
                    "{} {baseline} {:<32} {:>9.4} {:>10.4}",
                    city.id,
                    city.name,
                    city.coordinates.latitude(),
                    city.coordinates.longitude()
                );
            }
        },

        Commands::Health { .. } => {},
    }

    db.close().await;
    Ok(())
}
