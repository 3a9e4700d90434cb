use chrono::{DateTime, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::{FundamentalsProvider, ProviderError};
use crate::models::{Config, DividendPayment, FundamentalSnapshot, IncomePeriod};

const QUOTE_SUMMARY_MODULES: &str =
    "price,summaryProfile,summaryDetail,financialData,defaultKeyStatistics,incomeStatementHistory";

/// Yahoo Finance quote-summary client.
///
/// Two requests per ticker: the quoteSummary endpoint for named fundamental
/// fields and annual income statements, and the chart endpoint for the
/// per-distribution dividend history. The dividend request is best-effort;
/// a failure there leaves the series empty rather than failing the ticker.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

/// Yahoo wraps numeric fields as {"raw": 123.4, "fmt": "123.40"}
#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

fn raw(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw)
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    #[serde(rename = "summaryProfile")]
    summary_profile: Option<SummaryProfileModule>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(rename = "financialData")]
    financial_data: Option<FinancialDataModule>,
    #[serde(rename = "defaultKeyStatistics")]
    key_statistics: Option<KeyStatisticsModule>,
    #[serde(rename = "incomeStatementHistory")]
    income_statement_history: Option<IncomeStatementHistoryModule>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(rename = "longName")]
    long_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryProfileModule {
    sector: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SummaryDetailModule {
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<RawValue>,
    #[serde(rename = "payoutRatio")]
    payout_ratio: Option<RawValue>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<RawValue>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FinancialDataModule {
    #[serde(rename = "debtToEquity")]
    debt_to_equity: Option<RawValue>,
    #[serde(rename = "currentRatio")]
    current_ratio: Option<RawValue>,
    #[serde(rename = "returnOnEquity")]
    return_on_equity: Option<RawValue>,
    #[serde(rename = "returnOnAssets")]
    return_on_assets: Option<RawValue>,
    #[serde(rename = "profitMargins")]
    profit_margins: Option<RawValue>,
    #[serde(rename = "earningsGrowth")]
    earnings_growth: Option<RawValue>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct KeyStatisticsModule {
    #[serde(rename = "priceToBook")]
    price_to_book: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct IncomeStatementHistoryModule {
    #[serde(rename = "incomeStatementHistory")]
    statements: Vec<IncomeStatementEntry>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct IncomeStatementEntry {
    #[serde(rename = "endDate")]
    end_date: Option<RawValue>,
    ebit: Option<RawValue>,
    #[serde(rename = "interestExpense")]
    interest_expense: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ChartResult {
    events: Option<ChartEvents>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ChartEvents {
    dividends: Option<BTreeMap<String, DividendEvent>>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: Option<f64>,
    date: Option<i64>,
}

fn epoch_to_date(seconds: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(seconds, 0).map(|dt| dt.date_naive())
}

impl YahooFinanceClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .user_agent("dividend-screener/1.0")
            .build()?;

        Ok(Self {
            client,
            base_url: config.provider_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_quote_summary(
        &self,
        symbol: &str,
    ) -> Result<QuoteSummaryResult, ProviderError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[("modules", QUOTE_SUMMARY_MODULES)])
            .send()
            .await?;

        // Yahoo answers 404 with an error envelope for unknown tickers
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let response = response.error_for_status()?;

        let envelope: QuoteSummaryEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        envelope
            .quote_summary
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| ProviderError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }

    async fn fetch_dividends(&self, symbol: &str) -> Result<Vec<DividendPayment>, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[("range", "10y"), ("interval", "1mo"), ("events", "div")])
            .send()
            .await?
            .error_for_status()?;

        let envelope: ChartEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let mut payments: Vec<DividendPayment> = envelope
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| r.events)
            .filter_map(|e| e.dividends)
            .flat_map(|divs| divs.into_values())
            .filter_map(|event| {
                let date = event.date.and_then(epoch_to_date)?;
                let amount = event.amount?;
                Some(DividendPayment { date, amount })
            })
            .collect();

        payments.sort_by_key(|p| p.date);
        Ok(payments)
    }

    fn build_snapshot(
        symbol: &str,
        summary: QuoteSummaryResult,
        dividends: Vec<DividendPayment>,
    ) -> FundamentalSnapshot {
        let detail = summary.summary_detail.unwrap_or_default();
        let financial = summary.financial_data.unwrap_or_default();
        let statistics = summary.key_statistics.unwrap_or_default();

        let income_statements = summary
            .income_statement_history
            .map(|h| h.statements)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| {
                let end_date = raw(&entry.end_date).and_then(|ts| epoch_to_date(ts as i64))?;
                Some(IncomePeriod {
                    end_date,
                    ebit: raw(&entry.ebit),
                    interest_expense: raw(&entry.interest_expense),
                })
            })
            .collect();

        FundamentalSnapshot {
            symbol: symbol.to_string(),
            name: summary
                .price
                .as_ref()
                .and_then(|p| p.short_name.clone().or_else(|| p.long_name.clone())),
            sector: summary.summary_profile.and_then(|p| p.sector),
            dividend_yield: raw(&detail.dividend_yield),
            payout_ratio: raw(&detail.payout_ratio),
            debt_to_equity: raw(&financial.debt_to_equity),
            current_ratio: raw(&financial.current_ratio),
            return_on_equity: raw(&financial.return_on_equity),
            return_on_assets: raw(&financial.return_on_assets),
            profit_margin: raw(&financial.profit_margins),
            trailing_pe: raw(&detail.trailing_pe),
            forward_pe: raw(&detail.forward_pe),
            price_to_book: raw(&statistics.price_to_book),
            earnings_growth: raw(&financial.earnings_growth),
            dividends,
            income_statements,
        }
    }
}

#[async_trait::async_trait]
impl FundamentalsProvider for YahooFinanceClient {
    async fn fetch_fundamentals(
        &self,
        symbol: &str,
    ) -> Result<FundamentalSnapshot, ProviderError> {
        let summary = self.fetch_quote_summary(symbol).await?;

        // A ticker without a company name is treated as unknown
        let has_name = summary
            .price
            .as_ref()
            .map(|p| p.short_name.is_some() || p.long_name.is_some())
            .unwrap_or(false);
        if !has_name {
            return Err(ProviderError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let dividends = match self.fetch_dividends(symbol).await {
            Ok(payments) => payments,
            Err(e) => {
                debug!("No dividend history for {}: {}", symbol, e);
                Vec::new()
            }
        };

        Ok(Self::build_snapshot(symbol, summary, dividends))
    }
}
