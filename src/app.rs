use std::process::ExitCode;

use anyhow::Context;
use rust_decimal::Decimal;
use tracing::{error, info, instrument};

use crate::cli::parse_quantity;
use crate::engine::types::Quote;
use crate::market_data::adapters::coinbase::CoinbaseAdapter;
use crate::market_data::adapters::gemini::GeminiAdapter;
use crate::market_data::adapters::VenueAdapter;
use crate::market_data::router;
use crate::persist::FileStampStore;
use crate::rate_limit::{Guarded, RateLimiter};
use crate::report::quote_lines;
use crate::settings::Settings;

/// What the binary prints and how it exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conclusion {
    pub stdout: Vec<String>,
    pub stderr: Option<String>,
    pub success: bool,
}

impl Conclusion {
    fn failure(message: String) -> Self {
        Self { stdout: Vec::new(), stderr: Some(message), success: false }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

pub fn build_adapters(settings: &Settings) -> anyhow::Result<Vec<Box<dyn VenueAdapter>>> {
    let http = settings.http_options();
    let normaliser = settings.normaliser();
    let coinbase = CoinbaseAdapter::new(&settings.coinbase.url, &http, normaliser)
        .context("building Coinbase client")?;
    let gemini = GeminiAdapter::new(&settings.gemini.url, &http, normaliser)
        .context("building Gemini client")?;
    Ok(vec![Box::new(coinbase), Box::new(gemini)])
}

/// Validate `--qty` (falling back to the configured quantity), then run.
/// An invalid quantity fails before any venue is contacted.
pub async fn execute(settings: &Settings, qty: Option<&str>) -> Conclusion {
    let quantity = match qty.map(parse_quantity) {
        None => settings.default_quantity,
        Some(Ok(qty)) => qty,
        Some(Err(e)) => return Conclusion::failure(e.to_string()),
    };
    conclude(settings, run(settings, quantity).await)
}

/// Rate-limited runs count as success; any error fails without printing prices.
pub fn conclude(settings: &Settings, outcome: anyhow::Result<Guarded<Quote>>) -> Conclusion {
    match outcome {
        Ok(Guarded::Ran(quote)) => Conclusion {
            stdout: quote_lines(&quote, &settings.asset).to_vec(),
            stderr: None,
            success: true,
        },
        Ok(Guarded::RateLimited { .. }) => Conclusion {
            stdout: vec![format!(
                "Rate-limit enforced: subsequent executions allowed every {} seconds",
                settings.rate_limit_secs
            )],
            stderr: None,
            success: true,
        },
        Err(e) => {
            error!(error = %e, "Data aggregation failed");
            Conclusion::failure(format!("Data aggregation failed: {e:#}"))
        }
    }
}

/// One rate-limited quote request against every configured venue.
#[instrument(skip_all, fields(quantity = %quantity, asset = %settings.asset))]
pub async fn run(settings: &Settings, quantity: Decimal) -> anyhow::Result<Guarded<Quote>> {
    let adapters = build_adapters(settings)?;
    let limiter =
        RateLimiter::new(FileStampStore::new(&settings.rate_lock_path), settings.cooldown());
    let timeout = settings.fetch_timeout();

    limiter
        .guard(|| async {
            info!("Starting Order Book Aggregator for {} {}", quantity, settings.asset);
            let quote = router::quote(&adapters, timeout, quantity).await?;
            Ok(quote)
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{BookError, Side};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn defaults() -> Settings {
        Settings::from_builder(Settings::defaults().unwrap()).unwrap()
    }

    #[test]
    fn test_conclude_quote() {
        let quote =
            Quote { quantity: dec!(2), buy_cost: dec!(6002.375), sell_proceeds: dec!(6000) };
        let conclusion = conclude(&defaults(), Ok(Guarded::Ran(quote)));
        assert!(conclusion.success);
        assert_eq!(conclusion.stdout, vec!["To buy 2 ETH: $6,002.38", "To sell 2 ETH: $6,000.00"]);
        assert_eq!(conclusion.stderr, None);
    }

    #[test]
    fn test_conclude_rate_limited_is_success() {
        let outcome = Ok(Guarded::RateLimited { retry_in: Duration::from_millis(800) });
        let conclusion = conclude(&defaults(), outcome);
        assert!(conclusion.success);
        assert_eq!(
            conclusion.stdout,
            vec!["Rate-limit enforced: subsequent executions allowed every 2 seconds"]
        );
    }

    #[test]
    fn test_conclude_failure_prints_no_prices() {
        let err = anyhow::Error::new(BookError::InsufficientDepth {
            side: Side::Ask,
            requested: dec!(5),
        });
        let conclusion = conclude(&defaults(), Err(err));
        assert!(!conclusion.success);
        assert!(conclusion.stdout.is_empty());
        let stderr = conclusion.stderr.unwrap();
        assert!(stderr.starts_with("Data aggregation failed: desired quantity of 5"));
    }

    #[tokio::test]
    async fn test_execute_rejects_bad_quantity() {
        let conclusion = execute(&defaults(), Some("-1")).await;
        assert_eq!(conclusion, Conclusion::failure("Provided --qty (-1) is negative!".to_string()));
        let conclusion = execute(&defaults(), Some("abc")).await;
        assert_eq!(conclusion.stderr.as_deref(), Some("Provided --qty (abc) is not a number!"));
        assert!(!conclusion.success);
    }

    #[test]
    fn test_build_adapters_from_defaults() {
        let adapters = build_adapters(&defaults()).unwrap();
        let venues: Vec<_> = adapters.iter().map(|a| a.venue()).collect();
        assert_eq!(venues, vec!["Coinbase", "Gemini"]);
    }
}
