use serde::{Deserialize, Serialize};

/// Screening thresholds applied by the rule evaluator.
///
/// Defaults follow the blue-chip dividend principles the screener is built
/// around: a meaningful but not suspicious yield, a sustainable payout,
/// a balance sheet that can service its debt, and a sane valuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningCriteria {
    // Dividend criteria
    pub min_dividend_yield: f64,
    pub max_dividend_yield: f64,
    pub max_payout_ratio: f64,
    pub max_payout_ratio_high_leverage: f64,

    // Balance sheet criteria
    pub min_interest_coverage: f64,
    pub min_interest_coverage_high_leverage: f64,
    pub max_debt_to_equity: f64,

    // Profitability criteria
    pub min_roic: f64,
    pub min_roe: f64,

    // Valuation criteria
    pub max_pe_ratio: f64,
    pub min_expected_return: f64,
}

impl Default for ScreeningCriteria {
    fn default() -> Self {
        Self {
            min_dividend_yield: 1.5,
            max_dividend_yield: 8.0, // above this, suspect a yield trap
            max_payout_ratio: 50.0,
            max_payout_ratio_high_leverage: 85.0, // REITs/utilities pay out more
            min_interest_coverage: 10.0,
            min_interest_coverage_high_leverage: 4.0,
            max_debt_to_equity: 1.0,
            min_roic: 12.0,
            min_roe: 15.0,
            max_pe_ratio: 25.0,
            min_expected_return: 8.0,
        }
    }
}

/// Everything we know about a single stock after metric derivation,
/// plus the screening outputs filled in by the rule evaluator.
///
/// Every metric is optional: `None` means the provider had no usable data,
/// not that the metric is zero. The evaluator treats absent metrics as
/// neutral (no score, no flag) except where the rules say otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub ticker: String,
    pub name: String,
    pub sector: String,

    // Dividend metrics (percentages)
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub dividend_growth_5yr: Option<f64>,

    // Balance sheet metrics
    pub interest_coverage: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,

    // Profitability metrics (percentages)
    pub roic: Option<f64>,
    pub roe: Option<f64>,
    pub profit_margin: Option<f64>,

    // Valuation metrics
    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,

    // Derived
    pub expected_return: Option<f64>,

    // Screening results
    pub score: i32,
    pub passes_screen: bool,
    pub flags: Vec<String>,
}

impl StockAnalysis {
    /// Create an analysis shell with identity only; metrics start absent.
    pub fn new(ticker: &str, name: &str, sector: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: name.to_string(),
            sector: sector.to_string(),
            dividend_yield: None,
            payout_ratio: None,
            dividend_growth_5yr: None,
            interest_coverage: None,
            debt_to_equity: None,
            current_ratio: None,
            roic: None,
            roe: None,
            profit_margin: None,
            pe_ratio: None,
            forward_pe: None,
            price_to_book: None,
            expected_return: None,
            score: 0,
            passes_screen: false,
            flags: Vec::new(),
        }
    }
}

/// Raw provider fields for one ticker, before unit normalization.
///
/// Field units are whatever the provider reports: dividend yield is already
/// a percentage, payout ratio / ROE / ROA / profit margin / earnings growth
/// are fractions, debt-to-equity is a percentage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,

    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub profit_margin: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub earnings_growth: Option<f64>,

    /// Per-distribution dividend payments, oldest first.
    pub dividends: Vec<DividendPayment>,
    /// Annual income statement periods, newest first.
    pub income_statements: Vec<IncomePeriod>,
}

/// A single dividend distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendPayment {
    pub date: chrono::NaiveDate,
    pub amount: f64,
}

/// Income statement line items for one reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomePeriod {
    pub end_date: chrono::NaiveDate,
    pub ebit: Option<f64>,
    pub interest_expense: Option<f64>,
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub provider_base_url: String,
    pub request_timeout_secs: u64,
    pub rate_limit_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            provider_base_url: std::env::var("PROVIDER_BASE_URL")
                .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string()),
            request_timeout_secs: std::env::var("PROVIDER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            rate_limit_per_minute: std::env::var("RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
        })
    }
}

/// Dividend aristocrats: 25+ years of consecutive dividend increases.
pub const DIVIDEND_ARISTOCRATS: &[&str] = &[
    "JNJ",  // Johnson & Johnson
    "PG",   // Procter & Gamble
    "KO",   // Coca-Cola
    "PEP",  // PepsiCo
    "MMM",  // 3M
    "ABT",  // Abbott Laboratories
    "ABBV", // AbbVie
    "MCD",  // McDonald's
    "WMT",  // Walmart
    "XOM",  // Exxon Mobil
    "CVX",  // Chevron
    "HD",   // Home Depot
    "LOW",  // Lowe's
    "TGT",  // Target
    "CL",   // Colgate-Palmolive
    "GPC",  // Genuine Parts
    "SWK",  // Stanley Black & Decker
    "EMR",  // Emerson Electric
    "ITW",  // Illinois Tool Works
    "ADP",  // Automatic Data Processing
];

/// Dividend kings: 50+ years of consecutive dividend increases.
pub const DIVIDEND_KINGS: &[&str] = &[
    "PG",  // Procter & Gamble (68+ years)
    "KO",  // Coca-Cola (62+ years)
    "JNJ", // Johnson & Johnson (62+ years)
    "CL",  // Colgate-Palmolive (61+ years)
    "EMR", // Emerson Electric (67+ years)
    "MMM", // 3M (66+ years)
    "GPC", // Genuine Parts (68+ years)
    "DOV", // Dover Corporation (69+ years)
    "NWN", // Northwest Natural (68+ years)
    "PH",  // Parker Hannifin (68+ years)
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_criteria_values() {
        let criteria = ScreeningCriteria::default();
        assert_eq!(criteria.min_dividend_yield, 1.5);
        assert_eq!(criteria.max_dividend_yield, 8.0);
        assert_eq!(criteria.max_payout_ratio, 50.0);
        assert_eq!(criteria.max_payout_ratio_high_leverage, 85.0);
        assert_eq!(criteria.min_interest_coverage, 10.0);
        assert_eq!(criteria.min_interest_coverage_high_leverage, 4.0);
        assert_eq!(criteria.max_debt_to_equity, 1.0);
        assert_eq!(criteria.min_roic, 12.0);
        assert_eq!(criteria.max_pe_ratio, 25.0);
        assert_eq!(criteria.min_expected_return, 8.0);
    }

    #[test]
    fn test_new_analysis_starts_empty() {
        let analysis = StockAnalysis::new("JNJ", "Johnson & Johnson", "Healthcare");
        assert_eq!(analysis.ticker, "JNJ");
        assert!(analysis.dividend_yield.is_none());
        assert!(analysis.expected_return.is_none());
        assert_eq!(analysis.score, 0);
        assert!(!analysis.passes_screen);
        assert!(analysis.flags.is_empty());
    }

    #[test]
    fn test_preset_lists_are_uppercase_symbols() {
        for symbol in DIVIDEND_ARISTOCRATS.iter().chain(DIVIDEND_KINGS) {
            assert!(!symbol.is_empty());
            assert!(symbol.chars().all(|c| c.is_ascii_uppercase()));
        }
    }
}
