//! Countryclub CLI - seed the club database and serve the booking API

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use countryclub::config::{self, ClubConfig, Overrides};
use countryclub::seed;
use countryclub::server::{self, AppState};
use countryclub::storage::ClubStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "countryclub")]
#[command(version = "0.0.1")]
#[command(about = "Country-club booking backend - facilities, members and bookings")]
#[command(long_about = r#"
Countryclub resets its database to a fixed sample dataset on every start
and serves it over HTTP:
  • GET /api/facilities   facilities with their bookings
  • GET /api/bookings     bookings with facility and member
  • GET /api/members      members with the members they sponsor

Example usage:
  countryclub serve --port 1337
  countryclub seed --database ./club.db
  countryclub stats
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a TOML config file (defaults to ./countryclub.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset and seed the database, then serve the API
    Serve {
        /// Database connection string (path, sqlite://path or :memory:)
        #[arg(short, long)]
        database: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Reset and seed the database without serving
    Seed {
        /// Database connection string (path, sqlite://path or :memory:)
        #[arg(short, long)]
        database: Option<String>,
    },

    /// Show row counts without modifying the database
    Stats {
        /// Database connection string (path, sqlite://path or :memory:)
        #[arg(short, long)]
        database: Option<String>,
    },
}

fn resolve_config(path: Option<&PathBuf>, overrides: Overrides) -> anyhow::Result<ClubConfig> {
    let file = config::load_file(path.map(PathBuf::as_path))?;
    Ok(config::resolve(overrides, file)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { database, port } => {
            let config = resolve_config(cli.config.as_ref(), Overrides { database, port })?;
            tracing::info!("Seeding {} before serving", config.database);

            let (state, stats) = match AppState::seeded(config) {
                Ok(seeded) => seeded,
                Err(e) => {
                    tracing::error!("Seeding failed, not serving: {}", e);
                    return Err(e.into());
                }
            };
            println!("{}", stats);

            server::start_server(Arc::new(state)).await?;
        }

        Commands::Seed { database } => {
            let config = resolve_config(cli.config.as_ref(), Overrides { database, port: None })?;
            tracing::info!("Seeding {}", config.database);

            let mut store = ClubStore::connect(&config.database)?;
            let stats = seed::sync_and_seed(&mut store).inspect_err(|e| {
                tracing::error!("Seeding failed: {}", e);
            })?;

            println!("✅ Seed complete ({})", config.database);
            println!("{}", stats);
        }

        Commands::Stats { database } => {
            let config = resolve_config(cli.config.as_ref(), Overrides { database, port: None })?;
            let store = ClubStore::connect_read_only(&config.database)?;
            let stats = store.stats()?;

            println!("📊 Countryclub Statistics ({})", config.database);
            println!("------------------------------------");
            println!("{}", stats);
        }
    }

    Ok(())
}
