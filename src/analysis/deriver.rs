use chrono::Datelike;
use std::collections::BTreeMap;

use crate::models::{DividendPayment, FundamentalSnapshot, IncomePeriod, StockAnalysis};

/// Turn raw provider fields into a `StockAnalysis` with consistent units:
/// percentages as whole numbers (2.5 = 2.5%), ratios as plain multiples.
///
/// Never fails. A metric that cannot be computed from the snapshot is left
/// absent; the remaining metrics are derived regardless.
pub fn derive_analysis(snapshot: &FundamentalSnapshot) -> StockAnalysis {
    let name = snapshot
        .name
        .clone()
        .unwrap_or_else(|| snapshot.symbol.clone());
    let sector = snapshot
        .sector
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());
    let mut analysis = StockAnalysis::new(&snapshot.symbol, &name, &sector);

    // Provider reports dividend yield as a percentage already
    analysis.dividend_yield = snapshot.dividend_yield;
    analysis.payout_ratio = snapshot.payout_ratio.map(|r| r * 100.0);
    analysis.dividend_growth_5yr = dividend_growth_5yr(&snapshot.dividends);

    // Provider reports debt/equity as a percentage
    analysis.debt_to_equity = snapshot.debt_to_equity.map(|d| d / 100.0);
    analysis.current_ratio = snapshot.current_ratio;
    analysis.interest_coverage = interest_coverage(&snapshot.income_statements);

    analysis.roe = snapshot.return_on_equity.map(|r| r * 100.0);
    analysis.profit_margin = snapshot.profit_margin.map(|m| m * 100.0);
    analysis.roic = approximate_roic(snapshot.return_on_assets, analysis.debt_to_equity);

    analysis.pe_ratio = snapshot.trailing_pe;
    analysis.forward_pe = snapshot.forward_pe;
    analysis.price_to_book = snapshot.price_to_book;

    analysis.expected_return = expected_return(
        analysis.dividend_yield,
        analysis.dividend_growth_5yr,
        snapshot.earnings_growth,
    );

    analysis
}

/// Annualized 5-year dividend growth in percent.
///
/// Distributions are summed into calendar-year buckets; the growth rate is
/// `(newest / fifth-from-newest)^(1/5) - 1`. Requires at least five buckets
/// and a positive base-year total.
fn dividend_growth_5yr(dividends: &[DividendPayment]) -> Option<f64> {
    let mut annual: BTreeMap<i32, f64> = BTreeMap::new();
    for payment in dividends {
        *annual.entry(payment.date.year()).or_insert(0.0) += payment.amount;
    }
    if annual.len() < 5 {
        return None;
    }

    let totals: Vec<f64> = annual.values().copied().collect();
    let newest = totals[totals.len() - 1];
    let base = totals[totals.len() - 5];
    if base <= 0.0 {
        return None;
    }

    Some(((newest / base).powf(0.2) - 1.0) * 100.0)
}

/// Interest coverage from the most recent reporting period: |EBIT / interest|.
fn interest_coverage(periods: &[IncomePeriod]) -> Option<f64> {
    let latest = periods.first()?;
    let ebit = latest.ebit?;
    let interest = latest.interest_expense?;
    if interest == 0.0 {
        return None;
    }
    Some((ebit / interest).abs())
}

/// ROIC estimate from return on assets.
///
/// When leverage is known, ROA is scaled by `(1 + debt/equity)` and a 0.8
/// conservatism multiplier; otherwise the bare ROA percentage is used.
/// This is a deliberate approximation, not a standard ROIC computation,
/// and downstream thresholds are calibrated against it.
fn approximate_roic(return_on_assets: Option<f64>, debt_to_equity: Option<f64>) -> Option<f64> {
    let roa_pct = return_on_assets? * 100.0;
    match debt_to_equity {
        Some(d2e) => Some(roa_pct * (1.0 + d2e) * 0.8),
        None => Some(roa_pct),
    }
}

/// Expected return: dividend yield plus growth.
///
/// Prefers the realized 5-year dividend growth; falls back to the provider's
/// forward earnings growth estimate when no dividend history is available.
fn expected_return(
    dividend_yield: Option<f64>,
    dividend_growth_5yr: Option<f64>,
    earnings_growth: Option<f64>,
) -> Option<f64> {
    match (dividend_yield, dividend_growth_5yr) {
        (Some(dy), Some(growth)) => Some(dy + growth),
        (Some(dy), None) => earnings_growth.map(|eg| dy + eg * 100.0),
        _ => None,
    }
}
