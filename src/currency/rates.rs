use crate::currency::{Currency, RateTable};
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where exchange rates come from
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch(&self) -> Result<RateTable>;

    fn source_name(&self) -> &'static str;
}

/// Body returned by the hosted rates endpoint
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    base: Option<String>,
    rates: HashMap<String, f64>,
}

impl RatesResponse {
    /// Rebase onto GHS and keep only supported currencies
    fn into_table(self) -> Result<RateTable> {
        let base = match self.base.as_deref() {
            Some(code) => code
                .parse::<Currency>()
                .map_err(MarketError::Rates)?,
            None => Currency::BASE,
        };

        let mut by_currency: HashMap<Currency, f64> = HashMap::new();
        for (code, rate) in &self.rates {
            match code.parse::<Currency>() {
                Ok(currency) => {
                    by_currency.insert(currency, *rate);
                }
                Err(_) => debug!("Skipping unsupported rate code {}", code),
            }
        }
        by_currency.insert(base, 1.0);

        let base_per_ghs = match by_currency.get(&Currency::BASE) {
            Some(rate) if rate.is_finite() && *rate > 0.0 => *rate,
            _ => {
                return Err(MarketError::Rates(format!(
                    "no usable GHS rate in table based on {}",
                    base
                )))
            }
        };

        let mut table = RateTable::new();
        for (currency, rate) in by_currency {
            table.insert(currency, rate / base_per_ghs);
        }
        Ok(table)
    }
}

/// Rates fetched from a JSON endpoint
pub struct HttpRateSource {
    client: Client,
    endpoint: String,
}

impl HttpRateSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("home-market/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch(&self) -> Result<RateTable> {
        debug!("Fetching rates from {}", self.endpoint);

        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: RatesResponse = response.json().await?;
        body.into_table()
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

/// Built-in defaults, used when no endpoint is configured
#[derive(Debug, Default)]
pub struct StaticRateSource;

#[async_trait]
impl RateSource for StaticRateSource {
    async fn fetch(&self) -> Result<RateTable> {
        Ok(RateTable::defaults())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// Fetch rates, degrading to the built-in defaults on any failure.
pub async fn load_rates(source: &dyn RateSource) -> RateTable {
    match source.fetch().await {
        Ok(table) => {
            info!("Loaded {} exchange rates from {} source", table.len(), source.source_name());
            table
        }
        Err(e) => {
            warn!("Rate lookup via {} failed, using defaults: {}", source.source_name(), e);
            RateTable::defaults()
        }
    }
}
