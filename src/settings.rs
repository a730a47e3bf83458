//! Runtime settings: built-in defaults, then an optional `ob-aggregator.toml`,
//! then `OBAGG_*` environment variables (`OBAGG_COINBASE__URL` for nested keys).

use std::path::PathBuf;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::market_data::adapters::http::HttpOptions;
use crate::market_data::normaliser::Normaliser;

pub const COINBASE_URL: &str =
    "https://api.exchange.coinbase.com/products/ETH-USD/book?level=2";
pub const GEMINI_URL: &str = "https://api.gemini.com/v1/book/ETHUSD";

#[derive(Debug, Clone, Deserialize)]
pub struct VenueSettings {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Display name of the base asset of the configured pair.
    pub asset: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub default_quantity: Decimal,
    pub fetch_timeout_secs: f64,
    pub rate_limit_secs: f64,
    pub rate_lock_path: PathBuf,
    /// Most fractional digits accepted from a venue price or quantity.
    pub decimal_scale: u32,
    pub accept_invalid_certs: bool,
    pub coinbase: VenueSettings,
    pub gemini: VenueSettings,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("ob-aggregator").required(false))
            .add_source(Environment::with_prefix("OBAGG").prefix_separator("_").separator("__"));
        Self::from_builder(builder)
    }

    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("asset", "ETH")?
            .set_default("default_quantity", "10")?
            .set_default("fetch_timeout_secs", 5.0)?
            .set_default("rate_limit_secs", 2.0)?
            .set_default("rate_lock_path", "./rates.lock")?
            .set_default("decimal_scale", 18_i64)?
            .set_default("accept_invalid_certs", false)?
            .set_default("coinbase.url", COINBASE_URL)?
            .set_default("gemini.url", GEMINI_URL)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // A zero cooldown is allowed and disables the rate limit
        if seconds("fetch_timeout_secs", self.fetch_timeout_secs)?.is_zero() {
            return Err(ConfigError::Message("fetch_timeout_secs must be greater than 0".into()));
        }
        seconds("rate_limit_secs", self.rate_limit_secs)?;
        if self.default_quantity.is_sign_negative() && !self.default_quantity.is_zero() {
            return Err(ConfigError::Message(format!(
                "default_quantity {} is negative",
                self.default_quantity
            )));
        }
        if self.decimal_scale > 28 {
            return Err(ConfigError::Message(format!(
                "decimal_scale {} exceeds 28",
                self.decimal_scale
            )));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.fetch_timeout_secs).unwrap_or(Duration::from_secs(5))
    }

    pub fn cooldown(&self) -> Duration {
        Duration::try_from_secs_f64(self.rate_limit_secs).unwrap_or(Duration::from_secs(2))
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            timeout: self.fetch_timeout(),
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }

    pub fn normaliser(&self) -> Normaliser {
        Normaliser::new(self.decimal_scale)
    }
}

fn seconds(key: &str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| ConfigError::Message(format!("{key} = {value}: {e}")))
}
