use clap::Parser;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "ob-aggregator", version, about = "Order Book Aggregator")]
pub struct Cli {
    /// Quantity of the base asset to price, e.g. 20. Defaults to the configured quantity.
    #[arg(long, allow_hyphen_values = true)]
    pub qty: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("Provided --qty ({0}) is not a number!")]
    NotANumber(String),
    #[error("Provided --qty ({0}) is negative!")]
    Negative(String),
}

/// Accepts plain (`2.5`) and scientific (`2.5e1`) notation; zero is allowed.
pub fn parse_quantity(raw: &str) -> Result<Decimal, QuantityError> {
    let text = raw.trim();
    let qty = Decimal::from_str_exact(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| QuantityError::NotANumber(raw.to_string()))?;
    if qty.is_sign_negative() && !qty.is_zero() {
        return Err(QuantityError::Negative(raw.to_string()));
    }
    Ok(qty)
}
