// Convert wire strings into exact decimals.
// Values are parsed from their text, never through f64, and never rounded.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::engine::types::PriceLevel;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormaliseError {
    #[error("'{0}' is not a decimal number")]
    NotANumber(String),
    #[error("'{0}' is negative")]
    Negative(String),
    #[error("'{value}' has more than {max_scale} fractional digits")]
    TooPrecise { value: String, max_scale: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct Normaliser {
    pub max_scale: u32, // fractional digits accepted from a venue
}

impl Normaliser {
    pub fn new(max_scale: u32) -> Self {
        Self { max_scale }
    }

    pub fn decimal(&self, s: &str) -> Result<Decimal, NormaliseError> {
        let value = Decimal::from_str_exact(s.trim())
            .map_err(|_| NormaliseError::NotANumber(s.to_string()))?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(NormaliseError::Negative(s.to_string()));
        }
        if value.scale() > self.max_scale {
            return Err(NormaliseError::TooPrecise {
                value: s.to_string(),
                max_scale: self.max_scale,
            });
        }
        Ok(value)
    }

    pub fn level(&self, price: &str, quantity: &str) -> Result<PriceLevel, NormaliseError> {
        Ok(PriceLevel::new(self.decimal(price)?, self.decimal(quantity)?))
    }
}

impl Default for Normaliser {
    fn default() -> Self {
        Self::new(18)
    }
}
