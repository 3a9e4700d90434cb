use anyhow::{Context, Result};
use tracing::info;

use crate::models::StockAnalysis;

/// Format an optional metric for display; absent values render as N/A.
pub fn format_value(value: Option<f64>, suffix: &str, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}{}", decimals, v, suffix),
        None => "N/A".to_string(),
    }
}

/// Print the per-ticker analysis report.
pub fn print_analysis(analysis: &StockAnalysis, verbose: bool) {
    let status = if analysis.passes_screen { "PASS" } else { "REVIEW" };

    println!("\n{}", "=".repeat(60));
    println!("{} - {}", analysis.ticker, analysis.name);
    println!("Sector: {}", analysis.sector);
    println!("Score: {}/15 | Status: {}", analysis.score, status);
    println!("{}", "=".repeat(60));

    if verbose {
        println!("\nDividend Metrics:");
        println!(
            "  Dividend Yield:     {}",
            format_value(analysis.dividend_yield, "%", 1)
        );
        println!(
            "  Payout Ratio:       {}",
            format_value(analysis.payout_ratio, "%", 1)
        );
        println!(
            "  5-Year Div Growth:  {}",
            format_value(analysis.dividend_growth_5yr, "%", 1)
        );

        println!("\nBalance Sheet:");
        println!(
            "  Interest Coverage:  {}",
            format_value(analysis.interest_coverage, "x", 1)
        );
        println!(
            "  Debt/Equity:        {}",
            format_value(analysis.debt_to_equity, "", 2)
        );
        println!(
            "  Current Ratio:      {}",
            format_value(analysis.current_ratio, "", 2)
        );

        println!("\nProfitability:");
        println!(
            "  ROIC (est):         {}",
            format_value(analysis.roic, "%", 1)
        );
        println!(
            "  ROE:                {}",
            format_value(analysis.roe, "%", 1)
        );
        println!(
            "  Profit Margin:      {}",
            format_value(analysis.profit_margin, "%", 1)
        );

        println!("\nValuation:");
        println!(
            "  P/E Ratio:          {}",
            format_value(analysis.pe_ratio, "", 1)
        );
        println!(
            "  Forward P/E:        {}",
            format_value(analysis.forward_pe, "", 1)
        );
        println!(
            "  Price/Book:         {}",
            format_value(analysis.price_to_book, "", 2)
        );

        println!(
            "\nExpected Return:      {}",
            format_value(analysis.expected_return, "%", 1)
        );
        println!("  (Dividend Yield + Growth Rate)");
    }

    if !analysis.flags.is_empty() {
        println!("\nFlags/Concerns:");
        for flag in &analysis.flags {
            println!("  - {}", flag);
        }
    }
}

/// Print the aligned summary table, one row per analyzed ticker.
pub fn print_summary(results: &[StockAnalysis]) {
    println!(
        "{:<8} {:>5} {:>5} {:>10} {:>8} {:>16}",
        "Ticker", "Score", "Pass", "Div Yield", "P/E", "Expected Return"
    );
    for analysis in results {
        println!(
            "{:<8} {:>5} {:>5} {:>10} {:>8} {:>16}",
            analysis.ticker,
            analysis.score,
            if analysis.passes_screen { "Yes" } else { "No" },
            format_value(analysis.dividend_yield, "%", 2),
            format_value(analysis.pe_ratio, "", 1),
            format_value(analysis.expected_return, "%", 1),
        );
    }
}

fn csv_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Export results to a CSV file; one row per ticker, flags semicolon-joined.
pub fn export_csv(results: &[StockAnalysis], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot write export file '{}'", path))?;

    writer.write_record([
        "Ticker",
        "Name",
        "Sector",
        "Score",
        "Pass",
        "Div Yield",
        "Payout Ratio",
        "Div Growth 5Y",
        "Interest Cov",
        "Debt/Equity",
        "ROIC",
        "ROE",
        "P/E",
        "Expected Return",
        "Flags",
    ])?;

    for analysis in results {
        writer.write_record([
            analysis.ticker.clone(),
            analysis.name.clone(),
            analysis.sector.clone(),
            analysis.score.to_string(),
            analysis.passes_screen.to_string(),
            csv_number(analysis.dividend_yield),
            csv_number(analysis.payout_ratio),
            csv_number(analysis.dividend_growth_5yr),
            csv_number(analysis.interest_coverage),
            csv_number(analysis.debt_to_equity),
            csv_number(analysis.roic),
            csv_number(analysis.roe),
            csv_number(analysis.pe_ratio),
            csv_number(analysis.expected_return),
            analysis.flags.join("; "),
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush export file '{}'", path))?;
    info!("Exported {} results to {}", results.len(), path);
    Ok(())
}
