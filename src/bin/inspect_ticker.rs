use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use dividend_screener::api::{FundamentalsProvider, YahooFinanceClient};
use dividend_screener::models::Config;

/// Dump the raw provider snapshot for a single ticker.
///
/// Useful for checking what the provider actually returns before blaming
/// the deriver for an absent metric.
#[derive(Parser)]
#[command(name = "inspect_ticker")]
#[command(about = "Fetch and print the raw fundamental snapshot for one ticker")]
struct Args {
    /// Ticker symbol to inspect (e.g., JNJ)
    ticker: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let args = Args::parse();
    let config = Config::from_env()?;
    let client = YahooFinanceClient::new(&config)?;

    let symbol = args.ticker.to_uppercase();
    match client.fetch_fundamentals(&symbol).await {
        Ok(snapshot) => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
