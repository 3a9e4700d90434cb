use crate::models::{ScreeningCriteria, StockAnalysis};

/// REITs and utilities carry structurally higher leverage, so they get the
/// relaxed payout ceiling and interest-coverage floor.
pub fn is_high_leverage_sector(sector: &str) -> bool {
    sector.contains("REIT") || sector.contains("Real Estate") || sector.contains("Utilities")
}

/// Pass verdict over the finished score and flag list.
///
/// The substring test on WARNING / AT RISK is the entire gating policy:
/// any flag carrying either marker disqualifies regardless of score.
pub fn passes_screen(score: i32, flags: &[String]) -> bool {
    score >= 8
        && !flags
            .iter()
            .any(|f| f.contains("WARNING") || f.contains("AT RISK"))
}

/// Apply the screening rules to a derived analysis, filling in score,
/// flags, and the pass verdict.
///
/// Each metric group is evaluated independently; a rule either adds to the
/// score, appends a flag, or both. Absent metrics contribute nothing except
/// the missing-dividend flag. Branch ordering within a group is part of the
/// contract: the payout-ratio ceiling check precedes the >90% check, and the
/// high-leverage debt exemption precedes the strong-balance-sheet bonus.
pub fn screen_stock(analysis: &mut StockAnalysis, criteria: &ScreeningCriteria) {
    let mut score = 0;
    let mut flags: Vec<String> = Vec::new();
    let high_leverage = is_high_leverage_sector(&analysis.sector);

    // --- Dividend yield ---
    match analysis.dividend_yield {
        Some(dy) => {
            if dy < criteria.min_dividend_yield {
                flags.push(format!("Low dividend yield: {:.2}%", dy));
            } else if dy > criteria.max_dividend_yield {
                flags.push(format!("YIELD TRAP WARNING: {:.2}% (unusually high)", dy));
            } else {
                score += 2;
            }
        }
        None => flags.push("No dividend data".to_string()),
    }

    // --- Payout ratio ---
    if let Some(payout) = analysis.payout_ratio {
        let max_payout = if high_leverage {
            criteria.max_payout_ratio_high_leverage
        } else {
            criteria.max_payout_ratio
        };
        if payout > max_payout {
            flags.push(format!("High payout ratio: {:.1}%", payout));
        } else if payout > 90.0 {
            flags.push(format!("DIVIDEND AT RISK: Payout ratio {:.1}%", payout));
        } else {
            score += 2;
        }
    }

    // --- Dividend growth ---
    if let Some(growth) = analysis.dividend_growth_5yr {
        if growth > 5.0 {
            score += 2;
            if growth > 10.0 {
                score += 1; // Bonus for strong growth
            }
        } else if growth < 0.0 {
            flags.push(format!("Declining dividends: {:.1}%", growth));
        }
    }

    // --- Interest coverage ---
    if let Some(coverage) = analysis.interest_coverage {
        let min_coverage = if high_leverage {
            criteria.min_interest_coverage_high_leverage
        } else {
            criteria.min_interest_coverage
        };
        if coverage < min_coverage {
            flags.push(format!("Low interest coverage: {:.1}x", coverage));
        } else {
            score += 2;
        }
    }

    // --- Debt to equity ---
    if let Some(d2e) = analysis.debt_to_equity {
        if !high_leverage && d2e > criteria.max_debt_to_equity {
            flags.push(format!("High debt/equity: {:.2}", d2e));
        } else if d2e < 0.5 {
            score += 2; // Strong balance sheet
        } else {
            score += 1;
        }
    }

    // --- ROIC / ROE ---
    if analysis.roic.map_or(false, |r| r >= criteria.min_roic) {
        score += 2;
    } else if analysis.roe.map_or(false, |r| r >= criteria.min_roe) {
        score += 1;
    } else if let Some(roe) = analysis.roe {
        if roe < 10.0 {
            flags.push(format!("Low return on equity: {:.1}%", roe));
        }
    }

    // --- Valuation ---
    if let Some(pe) = analysis.pe_ratio {
        if pe > criteria.max_pe_ratio {
            flags.push(format!("High P/E ratio: {:.1}", pe));
        } else if pe < 15.0 {
            score += 2; // Attractive valuation
        } else {
            score += 1;
        }
    }

    // --- Expected return ---
    if let Some(expected) = analysis.expected_return {
        if expected >= criteria.min_expected_return {
            score += 2;
        } else if expected >= 6.0 {
            score += 1;
        }
    }

    analysis.score = score;
    analysis.flags = flags;
    analysis.passes_screen = passes_screen(analysis.score, &analysis.flags);
}
