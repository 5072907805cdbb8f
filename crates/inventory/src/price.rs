use std::{fmt, str::FromStr};

use crate::InventoryError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceFilter {
    #[default]
    All,
    Under10,
    From10To20,
    Over20,
}

impl PriceFilter {
    /// Books without a readable price only pass [`PriceFilter::All`].
    pub fn matches(self, price_display: Option<&str>) -> bool {
        if self == PriceFilter::All {
            return true;
        }
        let Some(price) = price_display.and_then(parse_price) else {
            return false;
        };
        match self {
            PriceFilter::All => true,
            PriceFilter::Under10 => price < 10.0,
            PriceFilter::From10To20 => (10.0..=20.0).contains(&price),
            PriceFilter::Over20 => price > 20.0,
        }
    }
}

impl FromStr for PriceFilter {
    type Err = InventoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(PriceFilter::All),
            "lt10" => Ok(PriceFilter::Under10),
            "10to20" => Ok(PriceFilter::From10To20),
            "gt20" => Ok(PriceFilter::Over20),
            other => Err(InventoryError::UnknownPriceFilter(other.to_string())),
        }
    }
}

impl fmt::Display for PriceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PriceFilter::All => "all",
            PriceFilter::Under10 => "lt10",
            PriceFilter::From10To20 => "10to20",
            PriceFilter::Over20 => "gt20",
        };
        f.write_str(label)
    }
}

/// Reads a display price such as `"$31.17"` or `"USD 9.5"`.
///
/// Everything except digits and dots is dropped, then the longest numeric
/// prefix is parsed.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut seen_dot = false;
    let numeric: String = cleaned
        .chars()
        .take_while(|c| {
            if *c == '.' {
                if seen_dot {
                    return false;
                }
                seen_dot = true;
            }
            true
        })
        .collect();

    numeric.parse::<f64>().ok().filter(|price| price.is_finite())
}

pub fn format_price(raw: &str) -> Result<String, InventoryError> {
    let price = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
        .ok_or_else(|| InventoryError::InvalidPrice(raw.to_string()))?;
    Ok(format!("${price:.2}"))
}
