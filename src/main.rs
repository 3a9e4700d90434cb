use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use dividend_screener::api::{ApiRateLimiter, YahooFinanceClient};
use dividend_screener::models::{
    Config, ScreeningCriteria, DIVIDEND_ARISTOCRATS, DIVIDEND_KINGS,
};
use dividend_screener::report;
use dividend_screener::screener::Screener;
use dividend_screener::watchlist;

/// Blue-chip dividend stock screener
#[derive(Parser)]
#[command(name = "dividend-screener")]
#[command(version = "1.0.0")]
#[command(about = "Screen dividend stocks for quality: dividend growth, balance sheet strength, profitability, and valuation")]
struct Args {
    /// Stock tickers to analyze (e.g., JNJ PG KO)
    tickers: Vec<String>,

    /// Screen dividend aristocrats (25+ years of dividend increases)
    #[arg(long)]
    aristocrats: bool,

    /// Screen dividend kings (50+ years of dividend increases)
    #[arg(long)]
    kings: bool,

    /// Minimum dividend yield % (default: 1.5)
    #[arg(long, default_value_t = 1.5)]
    min_yield: f64,

    /// Maximum P/E ratio (default: 25)
    #[arg(long, default_value_t = 25.0)]
    max_pe: f64,

    /// Minimum ROIC % (default: 12)
    #[arg(long, default_value_t = 12.0)]
    min_roic: f64,

    /// Show brief output only
    #[arg(long)]
    brief: bool,

    /// Export results to CSV file
    #[arg(long)]
    export: Option<String>,

    /// Load tickers from a watchlist file
    #[arg(long)]
    watchlist: Option<String>,

    /// Save tickers to a watchlist file
    #[arg(long)]
    save_watchlist: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_env_filter("dividend_screener=warn")
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("❌ Configuration Error: {}", e);
            std::process::exit(1);
        }
    };

    // No arguments at all: walk the user through the prompts instead
    if args.tickers.is_empty()
        && !args.aristocrats
        && !args.kings
        && args.watchlist.is_none()
    {
        return interactive_mode(&config).await;
    }

    let tickers = if let Some(path) = &args.watchlist {
        let tickers = match watchlist::load_watchlist(path) {
            Ok(tickers) => tickers,
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        };
        println!("Screening tickers from watchlist: {}", path);
        tickers
    } else if !args.tickers.is_empty() {
        args.tickers.iter().map(|t| t.to_uppercase()).collect()
    } else if args.kings {
        println!("Screening Dividend Kings (50+ years of consecutive dividend increases)");
        DIVIDEND_KINGS.iter().map(|t| t.to_string()).collect()
    } else {
        println!("Screening Dividend Aristocrats (25+ years of consecutive dividend increases)");
        DIVIDEND_ARISTOCRATS.iter().map(|t| t.to_string()).collect()
    };

    let criteria = ScreeningCriteria {
        min_dividend_yield: args.min_yield,
        max_pe_ratio: args.max_pe,
        min_roic: args.min_roic,
        ..ScreeningCriteria::default()
    };

    run_screening(
        &config,
        criteria,
        tickers,
        !args.brief,
        args.export,
        args.save_watchlist,
    )
    .await
}

/// Run the screening pipeline over the resolved ticker list and handle
/// the summary, export, and watchlist-save follow-ups.
async fn run_screening(
    config: &Config,
    criteria: ScreeningCriteria,
    tickers: Vec<String>,
    verbose: bool,
    export: Option<String>,
    save_watchlist: Option<String>,
) -> Result<()> {
    print_criteria(&criteria);

    let client = YahooFinanceClient::new(config)?;
    let screener = Screener::new(
        Arc::new(client),
        ApiRateLimiter::new(config.rate_limit_per_minute),
        criteria,
    );

    let run = screener.run(&tickers, verbose).await;

    if !run.results.is_empty() {
        println!("\n{}", "=".repeat(60));
        println!("SUMMARY - Sorted by Score");
        println!("{}", "=".repeat(60));
        report::print_summary(&run.results);

        println!(
            "\n{} of {} stocks passed the screen",
            run.passing_count(),
            run.results.len()
        );

        if let Some(path) = export {
            report::export_csv(&run.results, &path)?;
            println!("\nResults exported to {}", path);
        }
    }

    if let Some(path) = save_watchlist {
        watchlist::save_watchlist(&tickers, &path)?;
        println!("Saved {} tickers to {}", tickers.len(), path);
    }

    Ok(())
}

fn print_criteria(criteria: &ScreeningCriteria) {
    println!("\nScreening Criteria:");
    println!("  Min Dividend Yield: {}%", criteria.min_dividend_yield);
    println!("  Max P/E Ratio: {}", criteria.max_pe_ratio);
    println!("  Min ROIC: {}%", criteria.min_roic);
    println!("  Max Payout Ratio: {}%", criteria.max_payout_ratio);
    println!("  Min Interest Coverage: {}x", criteria.min_interest_coverage);
    println!();
}

/// Prompt for a line of input
fn prompt_line(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Prompt for yes/no input
fn prompt_yes(message: &str) -> Result<bool> {
    Ok(prompt_line(message)?.to_lowercase().starts_with('y'))
}

/// Interactive mode for non-technical users.
async fn interactive_mode(config: &Config) -> Result<()> {
    println!("\n{}", "=".repeat(60));
    println!("Welcome to the Blue-Chip Dividend Stock Screener!");
    println!("{}", "=".repeat(60));
    println!("\nThis tool helps you evaluate dividend stocks based on");
    println!("quality metrics like dividend growth, balance sheet strength,");
    println!("profitability, and valuation.");

    // Step 1: Choose what to screen
    println!("\n{}", "-".repeat(60));
    println!("STEP 1: Choose what to screen");
    println!("{}", "-".repeat(60));
    println!("\n1. Enter custom stock tickers");
    println!("2. Screen Dividend Aristocrats (25+ years of dividend growth)");
    println!("3. Screen Dividend Kings (50+ years of dividend growth)");
    println!("4. Load from a watchlist file");
    println!("5. Exit");

    let choice = loop {
        let choice = prompt_line("\nEnter your choice (1-5): ")?;
        if ["1", "2", "3", "4", "5"].contains(&choice.as_str()) {
            break choice;
        }
        println!("Invalid choice. Please enter 1, 2, 3, 4, or 5.");
    };

    let tickers: Vec<String> = match choice.as_str() {
        "1" => {
            println!("\nEnter stock tickers separated by spaces (e.g., JNJ PG KO MSFT):");
            let input = prompt_line("Tickers: ")?.to_uppercase();
            if input.is_empty() {
                println!("No tickers entered. Exiting.");
                return Ok(());
            }
            input.split_whitespace().map(|t| t.to_string()).collect()
        }
        "2" => {
            let tickers: Vec<String> =
                DIVIDEND_ARISTOCRATS.iter().map(|t| t.to_string()).collect();
            println!("\nScreening {} Dividend Aristocrats", tickers.len());
            tickers
        }
        "3" => {
            let tickers: Vec<String> = DIVIDEND_KINGS.iter().map(|t| t.to_string()).collect();
            println!("\nScreening {} Dividend Kings", tickers.len());
            tickers
        }
        "4" => {
            let filename = choose_watchlist_file()?;
            if filename.is_empty() {
                println!("No filename entered. Exiting.");
                return Ok(());
            }
            let tickers = match watchlist::load_watchlist(&filename) {
                Ok(tickers) => tickers,
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            };
            println!("Loaded {} tickers from {}", tickers.len(), filename);
            tickers
        }
        _ => {
            println!("Goodbye!");
            return Ok(());
        }
    };

    // Step 2: Customize criteria (optional)
    println!("\n{}", "-".repeat(60));
    println!("STEP 2: Screening criteria (optional)");
    println!("{}", "-".repeat(60));
    println!("\nWould you like to customize the screening criteria?");

    let mut criteria = ScreeningCriteria::default();
    if prompt_yes("Customize? (y/n, default=n): ")? {
        println!("\nPress Enter to keep default values:");

        let min_yield = prompt_line(&format!(
            "Minimum dividend yield % (default={}): ",
            criteria.min_dividend_yield
        ))?;
        if let Ok(value) = min_yield.parse::<f64>() {
            criteria.min_dividend_yield = value;
        }

        let max_pe = prompt_line(&format!(
            "Maximum P/E ratio (default={}): ",
            criteria.max_pe_ratio
        ))?;
        if let Ok(value) = max_pe.parse::<f64>() {
            criteria.max_pe_ratio = value;
        }

        let min_roic = prompt_line(&format!("Minimum ROIC % (default={}): ", criteria.min_roic))?;
        if let Ok(value) = min_roic.parse::<f64>() {
            criteria.min_roic = value;
        }
    }

    // Step 3: Output options
    println!("\n{}", "-".repeat(60));
    println!("STEP 3: Output options");
    println!("{}", "-".repeat(60));

    let verbose = !prompt_line("\nShow detailed analysis? (y/n, default=y): ")?
        .to_lowercase()
        .starts_with('n');

    let export = if prompt_yes("Export results to CSV? (y/n, default=n): ")? {
        let filename = prompt_line("Enter filename (e.g., results.csv): ")?;
        Some(if filename.is_empty() {
            "screener_results.csv".to_string()
        } else {
            filename
        })
    } else {
        None
    };

    let save = if prompt_yes("Save these tickers to a watchlist? (y/n, default=n): ")? {
        let filename = prompt_line("Enter watchlist filename (e.g., my_stocks.txt): ")?;
        Some(if filename.is_empty() {
            "watchlist.txt".to_string()
        } else {
            filename
        })
    } else {
        None
    };

    println!("\n{}", "=".repeat(60));
    println!("Starting analysis...");
    println!("{}", "=".repeat(60));

    run_screening(config, criteria, tickers, verbose, export, save).await?;

    println!("\n{}", "=".repeat(60));
    println!("Screening complete!");
    println!("{}", "=".repeat(60));

    Ok(())
}

/// List .txt files in the working directory and let the user pick one,
/// falling back to a typed-in filename.
fn choose_watchlist_file() -> Result<String> {
    let mut watchlists: Vec<String> = std::fs::read_dir(".")?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".txt"))
        .collect();
    watchlists.sort();

    if watchlists.is_empty() {
        return prompt_line("Enter watchlist filename: ");
    }

    println!("\nAvailable watchlist files:");
    for (i, name) in watchlists.iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
    println!("  {}. Enter custom filename", watchlists.len() + 1);

    let choice = prompt_line(&format!("\nChoose a file (1-{}): ", watchlists.len() + 1))?;
    match choice.parse::<usize>() {
        Ok(index) if index >= 1 && index <= watchlists.len() => {
            Ok(watchlists[index - 1].clone())
        }
        _ => prompt_line("Enter watchlist filename: "),
    }
}
