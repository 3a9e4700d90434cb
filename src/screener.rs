use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analysis::{derive_analysis, screen_stock};
use crate::api::{ApiRateLimiter, FundamentalsProvider};
use crate::models::{ScreeningCriteria, StockAnalysis};
use crate::report;

/// Results of one screening run: analyses sorted by descending score,
/// plus the tickers the provider had no data for.
pub struct ScreeningRun {
    pub results: Vec<StockAnalysis>,
    pub failed: Vec<String>,
}

impl ScreeningRun {
    pub fn passing_count(&self) -> usize {
        self.results.iter().filter(|r| r.passes_screen).count()
    }
}

/// Sequential per-ticker screening pipeline: fetch, derive, evaluate.
///
/// Tickers are processed one at a time in input order; a fetch failure is
/// logged and the ticker skipped, never aborting the run.
pub struct Screener {
    provider: Arc<dyn FundamentalsProvider>,
    rate_limiter: ApiRateLimiter,
    criteria: ScreeningCriteria,
}

impl Screener {
    pub fn new(
        provider: Arc<dyn FundamentalsProvider>,
        rate_limiter: ApiRateLimiter,
        criteria: ScreeningCriteria,
    ) -> Self {
        Self {
            provider,
            rate_limiter,
            criteria,
        }
    }

    /// Screen the given tickers, printing a per-ticker report as each one
    /// completes, and return the collected results sorted by score.
    pub async fn run(&self, tickers: &[String], verbose: bool) -> ScreeningRun {
        let mut results: Vec<StockAnalysis> = Vec::new();
        let mut failed: Vec<String> = Vec::new();

        for ticker in tickers {
            print!("Analyzing {}... ", ticker);
            let _ = std::io::stdout().flush();

            self.rate_limiter.wait().await;

            match self.provider.fetch_fundamentals(ticker).await {
                Ok(snapshot) => {
                    debug!("Fetched fundamentals for {}", ticker);
                    let mut analysis = derive_analysis(&snapshot);
                    screen_stock(&mut analysis, &self.criteria);
                    report::print_analysis(&analysis, verbose);
                    results.push(analysis);
                }
                Err(e) => {
                    println!("Failed");
                    warn!("Skipping {}: {}", ticker, e);
                    failed.push(ticker.clone());
                }
            }
        }

        results.sort_by(|a, b| b.score.cmp(&a.score));
        info!(
            "Screened {} tickers: {} analyzed, {} failed",
            tickers.len(),
            results.len(),
            failed.len()
        );

        ScreeningRun { results, failed }
    }
}
