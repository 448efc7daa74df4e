use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::debug;

use crate::domain::entities::fundamentals::FundamentalSnapshot;
use crate::domain::repositories::market_data::{
    HistoryRange, MarketDataError, MarketDataProvider, MarketDataResult,
};
use crate::domain::services::indicators::Candle;

const CHART_API_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_API_BASE: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const QUOTE_SUMMARY_MODULES: &str = "price,summaryDetail,financialData,defaultKeyStatistics";

// The public endpoints reject the default reqwest user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Yahoo Finance client configuration
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub chart_api_base: String,
    pub quote_summary_api_base: String,
    /// Outbound request budget shared by all scan tasks.
    pub requests_per_minute: u32,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            chart_api_base: CHART_API_BASE.to_string(),
            quote_summary_api_base: QUOTE_SUMMARY_API_BASE.to_string(),
            requests_per_minute: 120,
        }
    }
}

/// Client for the public Yahoo Finance chart and quoteSummary endpoints.
///
/// One instance is shared across all scan tasks; the rate limiter makes the
/// whole scan respect the per-minute budget no matter how many tasks run.
pub struct YahooFinanceClient {
    client: Client,
    config: YahooConfig,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl YahooFinanceClient {
    pub fn new(config: YahooConfig) -> MarketDataResult<Self> {
        let requests_per_minute = NonZeroU32::new(config.requests_per_minute.max(1))
            .expect("max(1) keeps the quota non-zero");
        let limiter = RateLimiter::direct(Quota::per_minute(requests_per_minute));
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            config,
            limiter,
        })
    }

    async fn get_chart(&self, symbol: &str, range: HistoryRange) -> MarketDataResult<ChartResult> {
        self.limiter.until_ready().await;

        let url = format!("{}/{}", self.config.chart_api_base, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[("range", range.as_query()), ("interval", "1d")])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketDataError::NoData(symbol.to_string()));
        }
        let body: ChartResponse = response.error_for_status()?.json().await?;

        if let Some(error) = body.chart.error {
            debug!(symbol = %symbol, code = %error.code, "Chart endpoint returned an error");
            return Err(MarketDataError::NoData(symbol.to_string()));
        }
        body.chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.swap_remove(0))
                }
            })
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))
    }

    async fn get_quote_summary(&self, symbol: &str) -> MarketDataResult<QuoteSummaryResult> {
        self.limiter.until_ready().await;

        let url = format!("{}/{}", self.config.quote_summary_api_base, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[("modules", QUOTE_SUMMARY_MODULES)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketDataError::NoData(symbol.to_string()));
        }
        let body: QuoteSummaryResponse = response.error_for_status()?.json().await?;

        body.quote_summary
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.swap_remove(0))
                }
            })
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn daily_history(
        &self,
        symbol: &str,
        range: HistoryRange,
    ) -> MarketDataResult<Vec<Candle>> {
        let result = self.get_chart(symbol, range).await?;
        let candles = parse_chart_result(symbol, result)?;
        debug!(symbol = %symbol, bars = candles.len(), "Fetched daily history");
        Ok(candles)
    }

    async fn fundamentals(&self, symbol: &str) -> MarketDataResult<FundamentalSnapshot> {
        let result = self.get_quote_summary(symbol).await?;
        Ok(result.into_snapshot())
    }
}

fn parse_chart_result(symbol: &str, result: ChartResult) -> MarketDataResult<Vec<Candle>> {
    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Err(MarketDataError::NoData(symbol.to_string()));
    }
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| MarketDataError::payload(symbol, "missing quote series"))?;

    let len = timestamps.len();
    for (name, series) in [
        ("open", &quote.open),
        ("high", &quote.high),
        ("low", &quote.low),
        ("close", &quote.close),
        ("volume", &quote.volume),
    ] {
        if series.len() != len {
            return Err(MarketDataError::payload(
                symbol,
                format!("{} series length mismatch", name),
            ));
        }
    }

    let mut candles = Vec::with_capacity(len);
    for i in 0..len {
        // Bars with a null close or volume (holidays, stale listings) are dropped
        let (open, high, low, close, volume) = match (
            quote.open[i],
            quote.high[i],
            quote.low[i],
            quote.close[i],
            quote.volume[i],
        ) {
            (Some(o), Some(h), Some(l), Some(c), Some(v)) => (o, h, l, c, v),
            _ => continue,
        };
        let timestamp = Utc
            .timestamp_opt(timestamps[i], 0)
            .single()
            .ok_or_else(|| MarketDataError::payload(symbol, "bad bar timestamp"))?;
        let candle = Candle::new(open, high, low, close, volume, timestamp)
            .map_err(|e| MarketDataError::payload(symbol, e))?;
        candles.push(candle);
    }

    if candles.is_empty() {
        return Err(MarketDataError::NoData(symbol.to_string()));
    }
    Ok(candles)
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail", default)]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(rename = "financialData", default)]
    financial_data: Option<FinancialDataModule>,
    #[serde(rename = "defaultKeyStatistics", default)]
    key_statistics: Option<KeyStatisticsModule>,
}

impl QuoteSummaryResult {
    fn into_snapshot(self) -> FundamentalSnapshot {
        let price = self.price.unwrap_or_default();
        let summary = self.summary_detail.unwrap_or_default();
        let financial = self.financial_data.unwrap_or_default();
        let stats = self.key_statistics.unwrap_or_default();

        FundamentalSnapshot {
            current_price: financial
                .current_price
                .and_then(|v| v.raw)
                .or(price.regular_market_price.and_then(|v| v.raw)),
            two_hundred_day_average: summary.two_hundred_day_average.and_then(|v| v.raw),
            trailing_pe: summary.trailing_pe.and_then(|v| v.raw),
            peg_ratio: stats.peg_ratio.and_then(|v| v.raw),
            revenue_growth: financial.revenue_growth.and_then(|v| v.raw),
            debt_to_equity: financial.debt_to_equity.and_then(|v| v.raw),
            trailing_eps: stats.trailing_eps.and_then(|v| v.raw),
            free_cash_flow: financial.free_cashflow.and_then(|v| v.raw),
            short_name: price.short_name,
        }
    }
}

/// Numbers arrive wrapped as `{"raw": 1.23, "fmt": "1.23"}`.
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceModule {
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<RawValue>,
    #[serde(rename = "shortName", default)]
    short_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDetailModule {
    #[serde(rename = "twoHundredDayAverage", default)]
    two_hundred_day_average: Option<RawValue>,
    #[serde(rename = "trailingPE", default)]
    trailing_pe: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
struct FinancialDataModule {
    #[serde(rename = "currentPrice", default)]
    current_price: Option<RawValue>,
    #[serde(rename = "revenueGrowth", default)]
    revenue_growth: Option<RawValue>,
    #[serde(rename = "debtToEquity", default)]
    debt_to_equity: Option<RawValue>,
    #[serde(rename = "freeCashflow", default)]
    free_cashflow: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
struct KeyStatisticsModule {
    #[serde(rename = "pegRatio", default)]
    peg_ratio: Option<RawValue>,
    #[serde(rename = "trailingEps", default)]
    trailing_eps: Option<RawValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_result_from_json(json: &str) -> ChartResult {
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        response.chart.result.unwrap().swap_remove(0)
    }

    #[test]
    fn test_parse_chart_result_skips_null_bars() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700086400, 1700172800],
                    "indicators": {
                        "quote": [{
                            "open": [100.0, null, 102.0],
                            "high": [101.0, null, 103.0],
                            "low": [99.0, null, 101.0],
                            "close": [100.5, null, 102.5],
                            "volume": [1000.0, null, 1200.0]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let candles = parse_chart_result("TEST", chart_result_from_json(json)).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].close.value(), 100.5);
        assert_eq!(candles[1].volume, 1200.0);
        assert!(candles[0].timestamp < candles[1].timestamp);
    }

    #[test]
    fn test_parse_chart_result_length_mismatch_is_payload_error() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700086400],
                    "indicators": {
                        "quote": [{
                            "open": [100.0],
                            "high": [101.0],
                            "low": [99.0],
                            "close": [100.5],
                            "volume": [1000.0]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let err = parse_chart_result("TEST", chart_result_from_json(json)).unwrap_err();
        assert!(matches!(err, MarketDataError::Payload { .. }));
    }

    #[test]
    fn test_parse_chart_result_all_null_is_no_data() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000000],
                    "indicators": {
                        "quote": [{
                            "open": [null],
                            "high": [null],
                            "low": [null],
                            "close": [null],
                            "volume": [null]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let err = parse_chart_result("TEST", chart_result_from_json(json)).unwrap_err();
        assert!(matches!(err, MarketDataError::NoData(_)));
    }

    #[test]
    fn test_quote_summary_into_snapshot() {
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {
                        "regularMarketPrice": {"raw": 187.3, "fmt": "187.30"},
                        "shortName": "Test Corp"
                    },
                    "summaryDetail": {
                        "twoHundredDayAverage": {"raw": 170.1},
                        "trailingPE": {"raw": 14.2}
                    },
                    "financialData": {
                        "revenueGrowth": {"raw": 0.12},
                        "debtToEquity": {"raw": 95.0},
                        "freeCashflow": {"raw": 2.5e9}
                    },
                    "defaultKeyStatistics": {
                        "pegRatio": {"raw": 1.4},
                        "trailingEps": {"raw": 6.1}
                    }
                }]
            }
        }"#;
        let response: QuoteSummaryResponse = serde_json::from_str(json).unwrap();
        let snapshot = response.quote_summary.result.unwrap().swap_remove(0).into_snapshot();
        // No financialData.currentPrice: falls back to the price module
        assert_eq!(snapshot.current_price, Some(187.3));
        assert_eq!(snapshot.two_hundred_day_average, Some(170.1));
        assert_eq!(snapshot.peg_ratio, Some(1.4));
        assert_eq!(snapshot.trailing_eps, Some(6.1));
        assert_eq!(snapshot.short_name.as_deref(), Some("Test Corp"));
    }

    #[test]
    fn test_quote_summary_missing_modules_yield_empty_snapshot() {
        let json = r#"{"quoteSummary": {"result": [{}]}}"#;
        let response: QuoteSummaryResponse = serde_json::from_str(json).unwrap();
        let snapshot = response.quote_summary.result.unwrap().swap_remove(0).into_snapshot();
        assert!(snapshot.current_price.is_none());
        assert!(snapshot.free_cash_flow.is_none());
    }
}
