//! Polygon.io REST client
//!
//! Two read-only endpoints: last-trade price lookup and the full
//! option-chain snapshot for an underlying. Every logical GET runs
//! through the bounded-retry helper; exhaustion degrades to `None` so
//! a dead ticker never aborts a screening run.

use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::warn;
use url::Url;

use super::models::{LastTradeResponse, OptionChainSnapshot};
use crate::constants::{LAST_TRADE_PATH, OPTION_CHAIN_PATH, POLYGON_REST_URL};
use crate::error::{Error, Result};
use crate::utils::retry::{with_retry, FetchFailure, RetryPolicy};

pub struct PolygonClient {
    http: HttpClient,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl PolygonClient {
    pub fn new(api_key: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            http: HttpClient::new(),
            api_key: api_key.into(),
            base_url: POLYGON_REST_URL.to_string(),
            retry,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str, ticker: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}/{}", self.base_url, path, ticker))?;
        url.query_pairs_mut().append_pair("apiKey", &self.api_key);
        Ok(url)
    }

    /// Last traded price for `ticker`. `None` when the provider has no
    /// price or the request degrades after retries.
    pub async fn last_trade_price(&self, ticker: &str) -> Option<f64> {
        let resp: LastTradeResponse = self
            .fetch_json(LAST_TRADE_PATH, ticker, &format!("last trade for {}", ticker))
            .await?;

        resp.results.and_then(|t| t.p).filter(|p| *p > 0.0)
    }

    /// Full option-chain snapshot for `ticker`.
    pub async fn option_chain_snapshot(&self, ticker: &str) -> Option<OptionChainSnapshot> {
        self.fetch_json(
            OPTION_CHAIN_PATH,
            ticker,
            &format!("option chain for {}", ticker),
        )
        .await
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        ticker: &str,
        what: &str,
    ) -> Option<T> {
        let url = match self.endpoint(path, ticker) {
            Ok(url) => url,
            Err(e) => {
                warn!("{}: bad request URL: {}", what, e);
                return None;
            }
        };

        with_retry(&self.retry, what, || self.try_fetch(url.clone())).await
    }

    async fn try_fetch<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> std::result::Result<T, FetchFailure> {
        let resp = self.http.get(url).send().await.map_err(|e| {
            // Connection errors and timeouts are worth another try.
            FetchFailure::Transient(Error::Http(e.to_string()))
        })?;

        match resp.status() {
            StatusCode::UNAUTHORIZED => {
                return Err(FetchFailure::Terminal(Error::Unauthorized(
                    "Polygon rejected the API key".into(),
                )));
            }
            StatusCode::NOT_FOUND => {
                return Err(FetchFailure::Terminal(Error::NotFound(
                    resp.url().path().to_string(),
                )));
            }
            status if !status.is_success() => {
                let body = resp.text().await.unwrap_or_default();
                return Err(FetchFailure::Transient(Error::Http(format!(
                    "HTTP {}: {}",
                    status, body
                ))));
            }
            _ => {}
        }

        // A body that does not decode will not decode on a retry either.
        resp.json::<T>()
            .await
            .map_err(|e| FetchFailure::Terminal(Error::Http(e.to_string())))
    }
}
