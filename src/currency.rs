//! # Currency Formatting
//!
//! Receipt amounts are whole sums in the local currency: the integer part
//! grouped by thousands with a space, followed by a fixed unit label.
//!
//! ```
//! use chekprint::currency::format_amount;
//!
//! assert_eq!(format_amount(12500.0), "12 500 so'm");
//! assert_eq!(format_amount(0.0), "0 so'm");
//! ```

/// Unit label appended to every formatted amount.
pub const CURRENCY_SUFFIX: &str = "so'm";

/// Group separator between thousands.
const GROUP_SEPARATOR: char = ' ';

/// Format an amount as `"<grouped integer> so'm"`.
///
/// The amount is rounded to the nearest whole unit; no decimals are
/// printed. Amounts are expected to be finite and non-negative (callers
/// validate upstream); non-finite input formats as zero.
pub fn format_amount(amount: f64) -> String {
    format!("{} {}", group_digits(amount), CURRENCY_SUFFIX)
}

/// Group the rounded integer part of `amount` by thousands.
pub fn group_digits(amount: f64) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Format a quantity: whole numbers without decimals, fractions with up to
/// three decimals and no trailing zeros.
///
/// ```
/// use chekprint::currency::format_quantity;
///
/// assert_eq!(format_quantity(2.0), "2");
/// assert_eq!(format_quantity(1.5), "1.5");
/// assert_eq!(format_quantity(0.125), "0.125");
/// ```
pub fn format_quantity(quantity: f64) -> String {
    if !quantity.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.3}", quantity);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
