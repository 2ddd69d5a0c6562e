//! Application configuration

use crate::cards::{CardLayout, DEFAULT_PLACEHOLDER_IMAGE};
use crate::currency::Currency;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const ENV_BACKEND_URL: &str = "HOME_MARKET_BACKEND_URL";
pub const ENV_API_KEY: &str = "HOME_MARKET_API_KEY";
pub const ENV_RATES_URL: &str = "HOME_MARKET_RATES_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub rates: RatesSettings,
    pub display: DisplaySettings,
}

/// Hosted database connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Project URL, e.g. https://abc.supabase.co
    pub base_url: String,
    /// Public (anon) key sent with every request
    pub api_key: Option<String>,
    pub properties_table: String,
    pub agents_table: String,
    pub timeout_secs: u64,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: None,
            properties_table: "properties".to_string(),
            agents_table: "agents".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatesSettings {
    /// JSON rates endpoint; built-in defaults are used when unset
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl RatesSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for RatesSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub default_currency: Currency,
    /// Diaspora currencies shown under the primary price
    pub alternate_currencies: Vec<Currency>,
    pub page_size: usize,
    pub placeholder_image: String,
    pub layout: CardLayout,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            default_currency: Currency::Ghs,
            alternate_currencies: vec![Currency::Usd, Currency::Gbp, Currency::Eur],
            page_size: 12,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            layout: CardLayout::Grid,
        }
    }
}

impl Settings {
    /// Load from a TOML file when given, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_toml(&raw)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            None => Settings::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(raw)?;
        Ok(settings)
    }

    /// Apply overrides from `lookup` (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_BACKEND_URL) {
            debug!("Backend URL overridden from {}", ENV_BACKEND_URL);
            self.backend.base_url = url;
        }
        if let Some(key) = non_empty(ENV_API_KEY) {
            self.backend.api_key = Some(key);
        }
        if let Some(url) = non_empty(ENV_RATES_URL) {
            self.rates.endpoint = Some(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            [display]
            default_currency = "USD"
            alternate_currencies = ["GHS", "GBP"]
            layout = "list"

            [rates]
            endpoint = "https://rates.example/latest"
            "#,
        )
        .unwrap();

        assert_eq!(settings.display.default_currency, Currency::Usd);
        assert_eq!(settings.display.alternate_currencies, vec![Currency::Ghs, Currency::Gbp]);
        assert_eq!(settings.display.layout, CardLayout::List);
        assert_eq!(settings.display.page_size, 12);
        assert_eq!(settings.rates.timeout_secs, 5);
        assert_eq!(settings.backend.properties_table, "properties");
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            (ENV_BACKEND_URL, "https://abc.supabase.co"),
            (ENV_API_KEY, "anon-key"),
            (ENV_RATES_URL, "  "),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.backend.base_url, "https://abc.supabase.co");
        assert_eq!(settings.backend.api_key.as_deref(), Some("anon-key"));
        assert_eq!(settings.rates.endpoint, None);
    }

    #[test]
    fn load_reads_file_and_reports_bad_toml() {
        let mut good = tempfile::NamedTempFile::new().unwrap();
        writeln!(good, "[backend]\ntimeout_secs = 3").unwrap();
        let settings = Settings::load(Some(good.path())).unwrap();
        assert_eq!(settings.backend.timeout(), Duration::from_secs(3));

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "[display]\npage_size = \"many\"").unwrap();
        let err = Settings::load(Some(bad.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}
