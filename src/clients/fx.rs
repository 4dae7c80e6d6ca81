//! USD exchange-rate provider and the process-wide rate cache.
//!
//! The cache is the only shared mutable state in the service: lazily
//! refreshed on read after the freshness window expires, and never a hard
//! failure: when the provider is unreachable the last known rate is served
//! indefinitely. Concurrent refreshes are not mutually exclusive; a
//! duplicate fetch under races is harmless.

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::FxConfig;

/// Source of the current USD market rate.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self) -> Result<f64>;
}

/// Time source, injectable so tests can step through the freshness window.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Deserialize)]
struct ErApiResponse {
    rates: HashMap<String, f64>,
}

/// open.er-api.com rate lookup (USD base).
pub struct ErApiProvider {
    client: Client,
    api_url: String,
    quote_currency: String,
}

impl ErApiProvider {
    #[must_use]
    pub fn new(client: Client, config: &FxConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            quote_currency: config.quote_currency.clone(),
        }
    }
}

#[async_trait::async_trait]
impl RateProvider for ErApiProvider {
    async fn fetch_rate(&self) -> Result<f64> {
        let response = self.client.get(&self.api_url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("FX provider returned status {}", response.status());
        }

        let body: ErApiResponse = response.json().await?;
        body.rates
            .get(&self.quote_currency)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("rate for {} missing from response", self.quote_currency))
    }
}

struct CachedRate {
    rate: f64,
    updated_at: Option<DateTime<Utc>>,
}

/// Time-bounded holder of the current USD rate.
pub struct FxRateCache {
    provider: Option<Arc<dyn RateProvider>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    inner: RwLock<CachedRate>,
}

impl FxRateCache {
    #[must_use]
    pub fn new(config: &FxConfig, client: Client) -> Self {
        let provider: Option<Arc<dyn RateProvider>> = if config.refresh_enabled {
            Some(Arc::new(ErApiProvider::new(client, config)))
        } else {
            None
        };

        Self::with_parts(
            provider,
            Arc::new(SystemClock),
            config.default_rate,
            Duration::from_secs(config.ttl_seconds),
        )
    }

    /// Assemble a cache from explicit parts. Tests inject a fake provider
    /// and clock here.
    #[must_use]
    pub fn with_parts(
        provider: Option<Arc<dyn RateProvider>>,
        clock: Arc<dyn Clock>,
        default_rate: f64,
        ttl: Duration,
    ) -> Self {
        Self {
            provider,
            clock,
            ttl,
            inner: RwLock::new(CachedRate {
                rate: default_rate,
                updated_at: None,
            }),
        }
    }

    /// Current rate, refreshed lazily once the freshness window has passed.
    /// Never fails: a provider error leaves the last known rate in place.
    pub async fn current_rate(&self) -> f64 {
        let now = self.clock.now();

        {
            let cached = self.inner.read().await;
            if let Some(updated_at) = cached.updated_at {
                let age = (now - updated_at).num_seconds().max(0) as u64;
                if age < self.ttl.as_secs() {
                    return cached.rate;
                }
            }
        }

        let Some(provider) = &self.provider else {
            return self.inner.read().await.rate;
        };

        match provider.fetch_rate().await {
            Ok(rate) => {
                let rate = round4(rate);
                let mut cached = self.inner.write().await;
                cached.rate = rate;
                cached.updated_at = Some(now);
                info!("USD rate refreshed: {rate}");
                rate
            }
            Err(e) => {
                let cached = self.inner.read().await;
                warn!("USD rate refresh failed, serving cached rate: {e}");
                cached.rate
            }
        }
    }
}

fn round4(rate: f64) -> f64 {
    (rate * 10_000.0).round() / 10_000.0
}
