// Human-readable quote lines
use rust_decimal::{Decimal, RoundingStrategy};

use crate::engine::types::Quote;

/// `$1,234,567.89`; half-even rounding to cents.
pub fn format_usd(value: Decimal) -> String {
    let cents = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let text = format!("{:.2}", cents.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if cents.is_sign_negative() && !cents.is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}

pub fn quote_lines(quote: &Quote, asset: &str) -> [String; 2] {
    [
        format!("To buy {} {}: {}", quote.quantity, asset, format_usd(quote.buy_cost)),
        format!("To sell {} {}: {}", quote.quantity, asset, format_usd(quote.sell_proceeds)),
    ]
}
