//! Yahoo Finance market data client.
//!
//! Serves the two screening universes (predefined "day losers" and crypto
//! screeners) and per-symbol daily history from the public JSON endpoints.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client};
use reversion_core::error::DataError;
use reversion_core::traits::MarketData;
use reversion_core::types::Bar;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// Yahoo rejects requests without a browser-looking user agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

const DAY_LOSERS_SCREEN: &str = "day_losers";
const CRYPTO_SCREEN: &str = "all_cryptocurrencies_us";

/// Screener API response types
#[derive(Debug, Deserialize)]
struct ScreenerResponse {
    finance: ScreenerFinance,
}

#[derive(Debug, Deserialize)]
struct ScreenerFinance {
    result: Option<Vec<ScreenerResult>>,
}

#[derive(Debug, Deserialize)]
struct ScreenerResult {
    #[serde(default)]
    quotes: Vec<ScreenerQuote>,
}

#[derive(Debug, Deserialize)]
struct ScreenerQuote {
    symbol: String,
}

/// Chart API response types
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
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

fn screener_symbols(response: ScreenerResponse, count: usize) -> Vec<String> {
    response
        .finance
        .result
        .unwrap_or_default()
        .into_iter()
        .flat_map(|r| r.quotes)
        .map(|q| q.symbol)
        .take(count)
        .collect()
}

/// Convert a chart result into bars, dropping rows with missing prices.
fn bars_from_chart(result: ChartResult) -> Vec<Bar> {
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return vec![];
    };

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);

        if let (Some(open), Some(high), Some(low), Some(close)) = (open, high, low, close) {
            bars.push(Bar::new(ts * 1000, open, high, low, close, volume));
        }
    }
    bars
}

/// Yahoo Finance client.
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    /// Create a new client against the public endpoints.
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, DataError> {
        let resp = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::ApiError(format!("{}: {}", status, text)));
        }

        resp.json()
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))
    }

    async fn screener(&self, screen_id: &str, count: usize) -> Result<Vec<String>, DataError> {
        let url = format!("{}/v1/finance/screener/predefined/saved", self.base_url);
        let params = [
            ("scrIds", screen_id.to_string()),
            ("count", count.to_string()),
        ];

        let response: ScreenerResponse = self.get_json(&url, &params).await?;
        let symbols = screener_symbols(response, count);
        debug!(screen_id, symbols = symbols.len(), "fetched screener page");
        Ok(symbols)
    }
}

#[async_trait]
impl MarketData for YahooClient {
    async fn day_losers(&self, count: usize) -> Result<Vec<String>, DataError> {
        self.screener(DAY_LOSERS_SCREEN, count).await
    }

    async fn top_crypto(&self, count: usize) -> Result<Vec<String>, DataError> {
        self.screener(CRYPTO_SCREEN, count).await
    }

    async fn daily_history(&self, symbol: &str, days: u32) -> Result<Vec<Bar>, DataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let now = Utc::now().timestamp();
        let start = now - i64::from(days) * 86_400;
        let params = [
            ("period1", start.to_string()),
            ("period2", now.to_string()),
            ("interval", "1d".to_string()),
        ];

        let response: ChartResponse = self.get_json(&url, &params).await?;
        let result = response
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(DataError::NoDataAvailable)?;

        Ok(bars_from_chart(result))
    }

    fn name(&self) -> &str {
        "Yahoo Finance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screener_symbols_from_payload() {
        let payload = r#"{
            "finance": {
                "result": [{
                    "quotes": [
                        {"symbol": "AAA", "regularMarketPrice": 1.23},
                        {"symbol": "BBB"},
                        {"symbol": "CCC"}
                    ]
                }]
            }
        }"#;

        let response: ScreenerResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(screener_symbols(response, 2), vec!["AAA", "BBB"]);
    }

    #[test]
    fn test_screener_handles_missing_result() {
        let payload = r#"{"finance": {"result": null}}"#;
        let response: ScreenerResponse = serde_json::from_str(payload).unwrap();
        assert!(screener_symbols(response, 10).is_empty());
    }

    #[test]
    fn test_chart_rows_with_nulls_are_dropped() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700086400, 1700172800],
                    "indicators": {
                        "quote": [{
                            "open":   [100.0, null, 102.0],
                            "high":   [101.0, 102.0, 103.0],
                            "low":    [99.0, 100.0, 101.0],
                            "close":  [100.5, 101.5, 102.5],
                            "volume": [1000.0, 2000.0, null]
                        }]
                    }
                }]
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(payload).unwrap();
        let result = response.chart.result.unwrap().into_iter().next().unwrap();
        let bars = bars_from_chart(result);

        // Middle row has a null open and is dropped; null volume becomes 0
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp, 1_700_000_000_000);
        assert!((bars[0].close - 100.5).abs() < 1e-10);
        assert!((bars[1].close - 102.5).abs() < 1e-10);
        assert!((bars[1].volume - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_chart_without_quotes_is_empty() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "timestamp": [],
                    "indicators": {"quote": []}
                }]
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(payload).unwrap();
        let result = response.chart.result.unwrap().into_iter().next().unwrap();
        assert!(bars_from_chart(result).is_empty());
    }
}
