use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leave_engine::api::{AppState, create_router};
use leave_engine::config::{AppConfig, ConfigLoader};
use leave_engine::holidays::{GouvHolidaySource, HolidayService};
use leave_engine::models::DayCategory;
use leave_engine::session::{RosterSession, SessionOptions};
use leave_engine::store::{DocumentStore, JsonFileStore, LocalCache};

#[derive(Parser)]
#[command(name = "leave-engine")]
#[command(version)]
#[command(about = "Leave and training day accounting for a partner roster", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, default_value = "config/leave-engine.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve,
    /// Print every partner's balance
    Balances {
        /// Year to report on; defaults to the displayed year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Toggle one day for a partner in the year the date falls in
    Toggle {
        /// Partner id
        partner: String,
        /// Date as YYYY-MM-DD
        date: NaiveDate,
        /// vacation, training-given or training-received
        category: DayCategory,
    },
    /// Print the public holidays of a year
    Holidays {
        /// Calendar year
        year: i32,
    },
}

fn init_tracing(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn holiday_service(config: &AppConfig) -> anyhow::Result<HolidayService> {
    let source = GouvHolidaySource::new(
        config.holidays.base_url.clone(),
        Duration::from_millis(config.holidays.request_timeout_ms),
    )?;
    Ok(HolidayService::new(Arc::new(source)))
}

async fn open_session(config: &AppConfig) -> anyhow::Result<RosterSession> {
    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(&config.storage.data_file));
    let cache = LocalCache::new(&config.storage.cache_file);
    Ok(RosterSession::open(
        store,
        holiday_service(config)?,
        Some(cache),
        SessionOptions::from(config),
    )
    .await)
}

async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(&config.storage.data_file));
    let state = AppState::new(store, holiday_service(config)?, config.roster.clone())
        .with_load_timeout(Duration::from_millis(config.storage.load_timeout_ms));
    state
        .initialize()
        .await
        .context("failed to prepare the roster store")?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address))?;
    info!(address = %config.server.bind_address, "Leave engine listening");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ConfigLoader::load_or_default(&cli.config)?;
    init_tracing(&config);

    match cli.command {
        Commands::Serve => serve(&config).await?,
        Commands::Balances { year } => {
            let session = open_session(&config).await?;
            let year = year.unwrap_or(session.year());
            for entry in session.balances_for_year(year).await? {
                println!("{}", serde_json::to_string(&entry)?);
            }
        }
        Commands::Toggle {
            partner,
            date,
            category,
        } => {
            let mut session = open_session(&config).await?;
            let outcome = session.toggle_day(&partner, date, category).await?;
            let balance = session.balance(&partner).await?;
            println!(
                "{}",
                serde_json::json!({ "outcome": outcome, "balance": balance })
            );
        }
        Commands::Holidays { year } => {
            let holidays = holiday_service(&config)?.holidays_for(year).await;
            for (date, name) in holidays.iter() {
                println!("{}  {}", date, name);
            }
        }
    }

    Ok(())
}
