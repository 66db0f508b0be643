//! Token price lookup — an external service treated as a black box.
//!
//! Given a token symbol and a unix timestamp, the service returns the USD
//! price at that instant.  The trait seam keeps handlers testable without
//! the network; transient failures are retried with a short back-off
//! before giving up.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::errors::{ApiError, Result};

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF_SECS: u64 = 1;

#[async_trait]
pub trait PriceSource: Send + Sync {
    /// USD price of one unit of `token` at unix timestamp `at`.
    async fn usd_price_at(&self, token: &str, at: i64) -> Result<f64>;
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: f64,
}

/// HTTP client for the price service.
pub struct HttpPriceSource {
    client: Client,
    base_url: String,
}

impl HttpPriceSource {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn usd_price_at(&self, token: &str, at: i64) -> Result<f64> {
        let url = format!("{}/v1/price", self.base_url);
        let mut backoff = INITIAL_BACKOFF_SECS;

        for attempt in 1..=MAX_ATTEMPTS {
            let response = self
                .client
                .get(&url)
                .query(&[("symbol", token), ("timestamp", &at.to_string())])
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let body: PriceResponse = resp
                        .json()
                        .await
                        .map_err(|e| ApiError::Price(format!("malformed price response: {e}")))?;
                    return Ok(body.price);
                }
                Ok(resp) => {
                    warn!(
                        "Price service returned {} for {token} (attempt {attempt}/{MAX_ATTEMPTS})",
                        resp.status()
                    );
                }
                Err(e) => {
                    warn!("Price request failed for {token}: {e} (attempt {attempt}/{MAX_ATTEMPTS})");
                }
            }

            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff *= 2;
            }
        }

        Err(ApiError::Price(format!(
            "no USD price for {token} after {MAX_ATTEMPTS} attempts"
        )))
    }
}
