use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::money::{normalize_currency_code, Money, DEFAULT_CURRENCY};
use crate::models::settings::Locale;

/// Format an amount the way the dashboard shows it, using the German
/// convention: `-4,50 €`, `142.500,00 €`.
///
/// Malformed currency codes fall back to EUR. Never fails.
pub fn format_money(amount: Decimal, currency_code: &str) -> String {
    format_money_with(Locale::De, amount, currency_code)
}

/// Locale-aware currency formatting with two fraction digits.
///
/// - `Locale::De`: `-1.234,50 €` (symbol trails after a space)
/// - `Locale::En`: `-€1,234.50` (single-char symbol leads; codes lead with a space)
pub fn format_money_with(locale: Locale, amount: Decimal, currency_code: &str) -> String {
    let code = normalize_currency_code(currency_code).unwrap_or_else(|| DEFAULT_CURRENCY.into());
    let symbol = currency_symbol(&code);

    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.set_sign_positive(true);
    rounded.rescale(2);

    let digits = rounded.to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let sign = if negative { "-" } else { "" };

    match locale {
        Locale::De => {
            let grouped = group_thousands(int_part, '.');
            format!("{sign}{grouped},{frac_part} {symbol}")
        }
        Locale::En => {
            let grouped = group_thousands(int_part, ',');
            if symbol.chars().count() == 1 {
                format!("{sign}{symbol}{grouped}.{frac_part}")
            } else {
                format!("{sign}{symbol} {grouped}.{frac_part}")
            }
        }
    }
}

/// Formats `Money` values with a fixed locale.
pub struct FormatService {
    locale: Locale,
}

impl FormatService {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn format(&self, money: &Money) -> String {
        format_money_with(self.locale, money.amount, &money.currency)
    }

    /// Like `format`, but positive amounts get an explicit `+` (transaction rows).
    pub fn format_signed(&self, money: &Money) -> String {
        let text = self.format(money);
        if money.is_inflow() {
            format!("+{text}")
        } else {
            text
        }
    }
}

impl Default for FormatService {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

fn currency_symbol(code: &str) -> &str {
    match code {
        "EUR" => "€",
        "USD" => "$",
        "GBP" => "£",
        "JPY" => "¥",
        other => other,
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands("1", '.'), "1");
        assert_eq!(group_thousands("999", '.'), "999");
        assert_eq!(group_thousands("1000", '.'), "1.000");
        assert_eq!(group_thousands("1250400", ','), "1,250,400");
    }

    #[test]
    fn symbol_lookup() {
        assert_eq!(currency_symbol("EUR"), "€");
        assert_eq!(currency_symbol("CHF"), "CHF");
    }
}
