//! End-to-end pipeline tests: mocked provider -> deriver -> rule evaluator.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dividend_screener::api::{
    ApiRateLimiter, FundamentalsProvider, ProviderError, YahooFinanceClient,
};
use dividend_screener::models::{Config, ScreeningCriteria};
use dividend_screener::screener::Screener;

fn test_config(server: &MockServer) -> Config {
    Config {
        provider_base_url: server.uri(),
        request_timeout_secs: 5,
        rate_limit_per_minute: 60_000, // effectively no delay in tests
    }
}

fn epoch(year: i32, month: u32, day: u32) -> i64 {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp()
}

/// quoteSummary body for a healthy dividend payer.
fn jnj_quote_summary() -> Value {
    json!({
        "quoteSummary": {
            "result": [{
                "price": {"shortName": "Johnson & Johnson"},
                "summaryProfile": {"sector": "Healthcare"},
                "summaryDetail": {
                    "dividendYield": {"raw": 2.96, "fmt": "2.96%"},
                    "payoutRatio": {"raw": 0.437, "fmt": "43.70%"},
                    "trailingPE": {"raw": 14.8, "fmt": "14.80"},
                    "forwardPE": {"raw": 14.1, "fmt": "14.10"}
                },
                "financialData": {
                    "debtToEquity": {"raw": 44.5, "fmt": "44.50%"},
                    "currentRatio": {"raw": 1.16, "fmt": "1.16"},
                    "returnOnEquity": {"raw": 0.231, "fmt": "23.10%"},
                    "returnOnAssets": {"raw": 0.081, "fmt": "8.10%"},
                    "profitMargins": {"raw": 0.186, "fmt": "18.60%"},
                    "earningsGrowth": {"raw": 0.062, "fmt": "6.20%"}
                },
                "defaultKeyStatistics": {
                    "priceToBook": {"raw": 5.2, "fmt": "5.20"}
                },
                "incomeStatementHistory": {
                    "incomeStatementHistory": [
                        {
                            "endDate": {"raw": epoch(2025, 12, 31), "fmt": "2025-12-31"},
                            "ebit": {"raw": 25_000_000_000.0_f64},
                            "interestExpense": {"raw": -1_000_000_000.0_f64}
                        },
                        {
                            "endDate": {"raw": epoch(2024, 12, 31), "fmt": "2024-12-31"},
                            "ebit": {"raw": 23_000_000_000.0_f64},
                            "interestExpense": {"raw": -900_000_000.0_f64}
                        }
                    ]
                }
            }],
            "error": null
        }
    })
}

/// chart body with annual dividend totals 10, 10, 10, 10, 20.
fn jnj_dividends() -> Value {
    let mut dividends = serde_json::Map::new();
    for year in 2021..=2024 {
        let ts = epoch(year, 3, 15);
        dividends.insert(ts.to_string(), json!({"amount": 10.0, "date": ts}));
    }
    let ts = epoch(2025, 3, 15);
    dividends.insert(ts.to_string(), json!({"amount": 20.0, "date": ts}));

    json!({
        "chart": {
            "result": [{"events": {"dividends": Value::Object(dividends)}}],
            "error": null
        }
    })
}

fn not_found_body() -> Value {
    json!({
        "quoteSummary": {
            "result": null,
            "error": {"code": "Not Found", "description": "Quote not found"}
        }
    })
}

async fn mount_ticker(server: &MockServer, symbol: &str, summary: Value, chart: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v10/finance/quoteSummary/{}", symbol)))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v8/finance/chart/{}", symbol)))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart))
        .mount(server)
        .await;
}

#[test_log::test(tokio::test)]
async fn full_pipeline_scores_a_healthy_dividend_payer() {
    let server = MockServer::start().await;
    mount_ticker(&server, "JNJ", jnj_quote_summary(), jnj_dividends()).await;

    let client = YahooFinanceClient::new(&test_config(&server)).unwrap();
    let screener = Screener::new(
        Arc::new(client),
        ApiRateLimiter::new(60_000),
        ScreeningCriteria::default(),
    );

    let run = screener.run(&["JNJ".to_string()], false).await;
    assert_eq!(run.results.len(), 1);
    assert!(run.failed.is_empty());

    let analysis = &run.results[0];
    assert_eq!(analysis.name, "Johnson & Johnson");
    assert_eq!(analysis.sector, "Healthcare");

    // Units normalized by the deriver
    assert_eq!(analysis.dividend_yield, Some(2.96));
    assert_eq!(analysis.payout_ratio, Some(43.7));
    assert_eq!(analysis.debt_to_equity, Some(0.445));
    assert_eq!(analysis.interest_coverage, Some(25.0));
    assert_eq!(analysis.roe, Some(23.1));

    // Annual totals 10,10,10,10,20 -> ~14.87% annualized growth
    let growth = analysis.dividend_growth_5yr.unwrap();
    assert!((growth - 14.87).abs() < 0.01, "got {growth}");

    // Expected return prefers realized dividend growth over earnings growth
    let expected = analysis.expected_return.unwrap();
    assert!((expected - (2.96 + growth)).abs() < 1e-9);

    // yield +2, payout +2, growth +3, coverage +2, low debt +2,
    // ROE fallback +1, cheap P/E +2, expected return +2
    assert_eq!(analysis.score, 16);
    assert!(analysis.flags.is_empty());
    assert!(analysis.passes_screen);
}

#[test_log::test(tokio::test)]
async fn unknown_ticker_is_reported_failed_and_rest_continue() {
    let server = MockServer::start().await;
    mount_ticker(&server, "JNJ", jnj_quote_summary(), jnj_dividends()).await;
    Mock::given(method("GET"))
        .and(path("/v10/finance/quoteSummary/ZZZZ"))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
        .mount(&server)
        .await;

    let client = YahooFinanceClient::new(&test_config(&server)).unwrap();
    let screener = Screener::new(
        Arc::new(client),
        ApiRateLimiter::new(60_000),
        ScreeningCriteria::default(),
    );

    let tickers = vec!["ZZZZ".to_string(), "JNJ".to_string()];
    let run = screener.run(&tickers, false).await;

    assert_eq!(run.failed, vec!["ZZZZ".to_string()]);
    assert_eq!(run.results.len(), 1);
    assert_eq!(run.results[0].ticker, "JNJ");
}

#[test_log::test(tokio::test)]
async fn empty_result_array_maps_to_symbol_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v10/finance/quoteSummary/EMPT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "quoteSummary": {"result": [], "error": null}
        })))
        .mount(&server)
        .await;

    let client = YahooFinanceClient::new(&test_config(&server)).unwrap();
    let err = client.fetch_fundamentals("EMPT").await.unwrap_err();
    assert_matches!(err, ProviderError::SymbolNotFound { .. });
}

#[test_log::test(tokio::test)]
async fn missing_company_name_maps_to_symbol_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v10/finance/quoteSummary/NONM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "quoteSummary": {
                "result": [{"summaryProfile": {"sector": "Technology"}}],
                "error": null
            }
        })))
        .mount(&server)
        .await;

    let client = YahooFinanceClient::new(&test_config(&server)).unwrap();
    let err = client.fetch_fundamentals("NONM").await.unwrap_err();
    assert_matches!(err, ProviderError::SymbolNotFound { .. });
}

#[test_log::test(tokio::test)]
async fn dividend_history_failure_degrades_to_empty_series() {
    let server = MockServer::start().await;
    // quoteSummary succeeds but the chart endpoint errors out
    Mock::given(method("GET"))
        .and(path("/v10/finance/quoteSummary/JNJ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jnj_quote_summary()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/JNJ"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = YahooFinanceClient::new(&test_config(&server)).unwrap();
    let snapshot = client.fetch_fundamentals("JNJ").await.unwrap();

    assert!(snapshot.dividends.is_empty());
    // The rest of the snapshot is intact
    assert_eq!(snapshot.dividend_yield, Some(2.96));
    assert_eq!(snapshot.income_statements.len(), 2);
}

#[test_log::test(tokio::test)]
async fn yield_trap_is_flagged_and_blocks_pass() {
    let server = MockServer::start().await;

    let mut summary = jnj_quote_summary();
    summary["quoteSummary"]["result"][0]["summaryDetail"]["dividendYield"] =
        json!({"raw": 11.2, "fmt": "11.20%"});
    mount_ticker(&server, "TRAP", summary, jnj_dividends()).await;

    let client = YahooFinanceClient::new(&test_config(&server)).unwrap();
    let screener = Screener::new(
        Arc::new(client),
        ApiRateLimiter::new(60_000),
        ScreeningCriteria::default(),
    );

    let run = screener.run(&["TRAP".to_string()], false).await;
    let analysis = &run.results[0];

    assert!(analysis
        .flags
        .iter()
        .any(|f| f.contains("YIELD TRAP WARNING")));
    // Plenty of score, but the warning flag vetoes the pass
    assert!(analysis.score >= 8);
    assert!(!analysis.passes_screen);
}
