//! Price formatting and localized labels for the rendering layer.
//!
//! Amounts stay decimal strings until formatting, where they are parsed to
//! integer minor units. Floating point is never involved.

use crate::types::{LanguageTag, Money};
use serde::Serialize;

/// Display symbol and minor-unit digits for a currency
fn currency_format(code: &str) -> Option<(&'static str, u32)> {
    let format = match code {
        "USD" => ("$", 2),
        "EUR" => ("\u{20ac}", 2),
        "GBP" => ("\u{00a3}", 2),
        "JPY" => ("\u{00a5}", 0),
        "CAD" => ("CA$", 2),
        "AUD" => ("A$", 2),
        "CHF" => ("CHF", 2),
        "CNY" => ("CN\u{00a5}", 2),
        "INR" => ("\u{20b9}", 2),
        "MXN" => ("MX$", 2),
        _ => return None,
    };
    Some(format)
}

/// Number conventions of a display language
struct NumberStyle {
    group: &'static str,
    decimal: char,
    symbol_first: bool,
}

impl NumberStyle {
    fn for_language(language: &LanguageTag) -> Self {
        match language.primary().as_str() {
            "fr" => Self {
                group: "\u{202f}",
                decimal: ',',
                symbol_first: false,
            },
            "de" => Self {
                group: ".",
                decimal: ',',
                symbol_first: false,
            },
            _ => Self {
                group: ",",
                decimal: '.',
                symbol_first: true,
            },
        }
    }
}

/// Parse a decimal amount into minor units
///
/// Digits past `decimals` round half up. Returns `None` for anything that is
/// not a plain decimal number or does not fit in an `i64`.
#[must_use]
pub fn parse_minor_units(amount: &str, decimals: u32) -> Option<i64> {
    let amount = amount.trim();
    let (negative, digits) = match amount.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, amount),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let scale = 10_i64.checked_pow(decimals)?;
    let whole = if whole.is_empty() { 0 } else { whole.parse::<i64>().ok()? };
    let mut minor = whole.checked_mul(scale)?;

    let mut fraction = fraction.bytes();
    let mut place = scale;
    for _ in 0..decimals {
        place /= 10;
        let digit = fraction.next().map_or(0, |b| i64::from(b - b'0'));
        minor = minor.checked_add(digit * place)?;
    }
    if fraction.next().is_some_and(|b| b >= b'5') {
        minor = minor.checked_add(1)?;
    }

    Some(if negative { -minor } else { minor })
}

fn group_thousands(whole: u64, separator: &str) -> String {
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }
    grouped
}

/// Render a price for the shopper's language
///
/// ```
/// use checkout_upsell::format::format_price;
/// use checkout_upsell::types::{LanguageTag, Money};
///
/// assert_eq!(format_price(&Money::new("10.00", "USD"), &LanguageTag::new("en-US")), "$10.00");
/// assert_eq!(format_price(&Money::new("1234.5", "EUR"), &LanguageTag::new("de-DE")), "1.234,50\u{a0}€");
/// ```
///
/// Unknown currencies and unparseable amounts render as `"<amount> <code>"`.
#[must_use]
pub fn format_price(price: &Money, language: &LanguageTag) -> String {
    let code = price.currency_code.as_str();
    let Some((symbol, decimals)) = currency_format(code) else {
        return format!("{} {code}", price.amount);
    };
    let Some(minor) = parse_minor_units(&price.amount, decimals) else {
        tracing::debug!(amount = %price.amount, currency = code, "Unparseable price amount");
        return format!("{} {code}", price.amount);
    };

    let style = NumberStyle::for_language(language);
    let scale = 10_u64.pow(decimals);
    let abs = minor.unsigned_abs();
    let mut number = group_thousands(abs / scale, style.group);
    if decimals > 0 {
        number.push(style.decimal);
        number.push_str(&format!("{:0width$}", abs % scale, width = decimals as usize));
    }

    let sign = if minor < 0 { "-" } else { "" };
    if style.symbol_first {
        format!("{sign}{symbol}{number}")
    } else {
        format!("{sign}{number}\u{a0}{symbol}")
    }
}

/// Static strings the widget renders
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Labels {
    /// Section heading above the offer
    pub heading: &'static str,
    /// Add-to-order button text
    pub add_button: &'static str,
    /// Transient banner shown after a failed add
    pub error_banner: &'static str,
}

impl Labels {
    /// Labels for the shopper's language, English when unsupported
    #[must_use]
    pub fn for_language(language: &LanguageTag) -> Self {
        match language.primary().as_str() {
            "fr" => Self {
                heading: "Vous aimerez aussi",
                add_button: "Ajouter",
                error_banner: "Impossible d'ajouter cet article. Veuillez réessayer.",
            },
            "de" => Self {
                heading: "Das könnte Ihnen auch gefallen",
                add_button: "Hinzufügen",
                error_banner: "Der Artikel konnte nicht hinzugefügt werden. Bitte erneut versuchen.",
            },
            _ => Self::default(),
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            heading: "You may also like",
            add_button: "Add",
            error_banner: "We couldn't add this item. Please try again.",
        }
    }
}
