// exchange/utils.rs
// Number formatting and symbol helpers for the Hyperliquid wire format

use super::ExchangeError;
use router_common::TradeSide;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Maximum decimals sent on the wire
pub const WIRE_DECIMALS: u32 = 8;

/// Exchange-internal spot names -> display symbols
const SPOT_ALIASES: &[(&str, &str)] = &[("UBTC", "BTC"), ("UETH", "ETH"), ("USOL", "SOL")];

/// Display symbol for an exchange spot token name (UBTC -> BTC).
pub fn display_name(coin: &str) -> &str {
    SPOT_ALIASES
        .iter()
        .find(|(spot, _)| *spot == coin)
        .map(|(_, display)| *display)
        .unwrap_or(coin)
}

/// Exchange spot token name for a display symbol (BTC -> UBTC).
pub fn spot_name(display: &str) -> &str {
    SPOT_ALIASES
        .iter()
        .find(|(_, d)| *d == display)
        .map(|(spot, _)| *spot)
        .unwrap_or(display)
}

/// Validate a display symbol before it reaches pair resolution
pub fn validate_symbol(symbol: &str) -> Result<String, ExchangeError> {
    if symbol.is_empty() {
        return Err(ExchangeError::InvalidSymbol(
            "Symbol cannot be empty".to_string(),
        ));
    }

    let symbol = symbol.to_uppercase();

    if !symbol.chars().all(char::is_alphanumeric) {
        return Err(ExchangeError::InvalidSymbol(format!(
            "Symbol '{}' contains invalid characters",
            symbol
        )));
    }

    if symbol.len() > 10 {
        return Err(ExchangeError::InvalidSymbol(format!(
            "Symbol '{}' has invalid length",
            symbol
        )));
    }

    Ok(symbol)
}

/// Parse price string to Decimal
pub fn parse_price(price_str: &str) -> Result<Decimal, ExchangeError> {
    Decimal::from_str(price_str)
        .map_err(|e| ExchangeError::ParseError(format!("Invalid price '{}': {}", price_str, e)))
}

/// Parse size/quantity string to Decimal
pub fn parse_size(size_str: &str) -> Result<Decimal, ExchangeError> {
    Decimal::from_str(size_str)
        .map_err(|e| ExchangeError::ParseError(format!("Invalid size '{}': {}", size_str, e)))
}

/// Wire format: at most 8 decimals, trailing zeros stripped, "-0" -> "0".
pub fn float_to_wire(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(WIRE_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.is_zero() {
        return "0".to_string();
    }
    rounded.to_string()
}

/// floor(log10(value)) for value > 0
fn magnitude(value: Decimal) -> i32 {
    let mut m = 0;
    let mut x = value;
    while x >= Decimal::TEN {
        x /= Decimal::TEN;
        m += 1;
    }
    while x < Decimal::ONE {
        x *= Decimal::TEN;
        m -= 1;
    }
    m
}

/// Round a price to `sig_figs` significant figures.
///
/// Buys round up and sells round down, so the limit never becomes stricter
/// than requested. The result is capped at [`WIRE_DECIMALS`] decimals.
pub fn round_price(price: Decimal, side: TradeSide, sig_figs: u32) -> Decimal {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let strategy = match side {
        TradeSide::Buy => RoundingStrategy::ToPositiveInfinity,
        TradeSide::Sell => RoundingStrategy::ToNegativeInfinity,
    };

    let integer_digits = magnitude(price) + 1;
    let decimals = sig_figs as i32 - integer_digits;

    let rounded = if decimals >= 0 {
        price.round_dp_with_strategy(decimals as u32, strategy)
    } else {
        // more integer digits than significant figures: round to tens, hundreds, ...
        let factor = (0..-decimals).try_fold(Decimal::ONE, |f, _| f.checked_mul(Decimal::TEN));
        match factor.and_then(|f| {
            (price / f)
                .round_dp_with_strategy(0, strategy)
                .checked_mul(f)
        }) {
            Some(rounded) => rounded,
            // rounding up past Decimal::MAX
            None => price,
        }
    };

    rounded
        .round_dp_with_strategy(WIRE_DECIMALS, strategy)
        .normalize()
}

/// Floor a size to the asset's size precision.
pub fn round_size(size: Decimal, sz_decimals: u32) -> Decimal {
    size.round_dp_with_strategy(sz_decimals, RoundingStrategy::ToZero)
        .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_symbol_validation() {
        assert!(validate_symbol("BTC").is_ok());
        assert_eq!(validate_symbol("hype").unwrap(), "HYPE");
        assert!(validate_symbol("").is_err());
        assert!(validate_symbol("BTC-USD").is_err());
    }

    #[test]
    fn test_aliases() {
        assert_eq!(display_name("UBTC"), "BTC");
        assert_eq!(display_name("HYPE"), "HYPE");
        assert_eq!(spot_name("ETH"), "UETH");
        assert_eq!(spot_name("PURR"), "PURR");
    }

    #[test]
    fn test_float_to_wire() {
        assert_eq!(float_to_wire(dec!(1.50000000)), "1.5");
        assert_eq!(float_to_wire(dec!(100)), "100");
        assert_eq!(float_to_wire(dec!(0.123456789)), "0.12345679");
        assert_eq!(float_to_wire(dec!(-0.000000001)), "0");
        assert_eq!(float_to_wire(dec!(-0)), "0");
        assert_eq!(float_to_wire(dec!(-2.25)), "-2.25");
    }

    #[test]
    fn test_round_price_sig_figs() {
        assert_eq!(round_price(dec!(24.512345), TradeSide::Buy, 5), dec!(24.513));
        assert_eq!(round_price(dec!(24.512345), TradeSide::Sell, 5), dec!(24.512));
        assert_eq!(round_price(dec!(0.00081234567), TradeSide::Sell, 5), dec!(0.00081234));
        assert_eq!(round_price(dec!(97512.5), TradeSide::Buy, 5), dec!(97513));
        assert_eq!(round_price(dec!(123456), TradeSide::Sell, 5), dec!(123450));
        assert_eq!(round_price(dec!(100), TradeSide::Buy, 5), dec!(100));
        assert_eq!(round_price(Decimal::ZERO, TradeSide::Buy, 5), Decimal::ZERO);
    }

    #[test]
    fn test_round_price_huge_values() {
        let huge = dec!(123456789000000000000000000);
        assert_eq!(
            round_price(huge, TradeSide::Sell, 5),
            dec!(123450000000000000000000000)
        );
        assert_eq!(
            round_price(Decimal::MAX, TradeSide::Sell, 5),
            dec!(79228000000000000000000000000)
        );
        // ceiling would exceed the representable range
        assert_eq!(round_price(Decimal::MAX, TradeSide::Buy, 5), Decimal::MAX);
    }

    #[test]
    fn test_round_size_floors() {
        assert_eq!(round_size(dec!(4.0399), 2), dec!(4.03));
        assert_eq!(round_size(dec!(0.009), 2), Decimal::ZERO);
        assert_eq!(round_size(dec!(12), 0), dec!(12));
    }
}
