//! Swap CLI
//!
//! Command-line front end for the Swap exchange rate resolver.

mod config;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use swap_core::Exchanger;
use swap_services::ProviderRegistry;
use swap_types::{CurrencyPair, QueryOptions, RateQuery, ResolveError};

use config::Settings;

#[derive(Parser)]
#[command(name = "swap")]
#[command(author, version, about = "Exchange rate resolver", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Latest rate for a pair such as EUR/USD
    Latest {
        /// Currency pair, BASE/QUOTE
        pair: CurrencyPair,
    },
    /// Rate for a pair on a past date
    Historical {
        /// Currency pair, BASE/QUOTE
        pair: CurrencyPair,
        /// Date as YYYY-MM-DD
        date: NaiveDate,
    },
    /// List the built-in providers
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let query = match cli.command {
        Commands::Providers => {
            for name in ProviderRegistry::with_defaults().names() {
                println!("{}", name);
            }
            return Ok(());
        }
        Commands::Latest { pair } => RateQuery::latest(pair),
        Commands::Historical { pair, date } => RateQuery::historical(pair, date),
    };

    let exchanger = cli.settings.builder()?.build()?;
    debug!(query = %query, providers = ?exchanger.provider_names(), "Resolving");
    let options = if cli.settings.no_cache {
        QueryOptions::uncached()
    } else {
        QueryOptions::default()
    };

    resolve(&exchanger, &query, &options).await
}

async fn resolve(exchanger: &Exchanger, query: &RateQuery, options: &QueryOptions) -> Result<()> {
    match exchanger.resolve_with(query, options).await {
        Ok(rate) => {
            println!("{}", serde_json::to_string_pretty(&rate)?);
            Ok(())
        }
        Err(ResolveError::ChainExhausted { query, failures }) => {
            eprintln!("✗ No provider could resolve {}", query);
            for failure in &failures {
                eprintln!(
                    "  {} [{}]: {}",
                    failure.provider, failure.kind, failure.message
                );
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
