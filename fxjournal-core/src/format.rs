//! Pair-aware pip math and display formatting.
//!
//! All functions are total: any finite input produces a value or string.

/// Pips per unit of price: 100 for JPY-quoted pairs, 10 000 otherwise.
pub fn pip_scale(pair: &str) -> f64 {
    if is_jpy_pair(pair) {
        100.0
    } else {
        10_000.0
    }
}

/// JPY classification is a case-insensitive substring test on the symbol.
pub fn is_jpy_pair(pair: &str) -> bool {
    pair.to_ascii_uppercase().contains("JPY")
}

/// Absolute pip distance for a price difference.
pub fn calculate_pips(price_diff: f64, pair: &str) -> f64 {
    price_diff.abs() * pip_scale(pair)
}

/// Render a pip count for display.
///
/// Bands on the magnitude as it would be displayed:
///
/// | magnitude    | standard pairs           | JPY pairs                |
/// |--------------|--------------------------|--------------------------|
/// | >= 1000      | 0 decimals, `,` grouping | 0 decimals, `,` grouping |
/// | >= 100       | 0 decimals               | 0 decimals               |
/// | >= 10        | 1 decimal                | 0 decimals               |
/// | < 10         | 1 decimal                | 1 decimal                |
///
/// A value that rounds up across a boundary takes the upper band, so 999.6
/// renders as `1,000` and a JPY 9.96 as `10`. A missing pair is treated as a
/// standard pair. The sign is kept unless the value rounds to zero.
pub fn format_pips(pips: f64, pair: Option<&str>) -> String {
    let decimal_limit = if pair.is_some_and(is_jpy_pair) {
        10.0
    } else {
        100.0
    };
    let magnitude = pips.abs();

    let tenths = format!("{magnitude:.1}");
    let body = if tenths.parse::<f64>().is_ok_and(|v| v < decimal_limit) {
        tenths
    } else {
        let whole = format!("{magnitude:.0}");
        if whole.len() > 3 {
            group_thousands(&whole)
        } else {
            whole
        }
    };

    format!("{}{body} pips", sign_prefix(pips, &body))
}

/// en-US currency string with two decimals, e.g. `-$1,234.50`.
///
/// Codes without a dedicated symbol render as `"CODE 1,234.50"`.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let code = currency.trim().to_ascii_uppercase();
    let digits = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let body = format!("{}.{frac_part}", group_thousands(int_part));
    let sign = sign_prefix(amount, &body);

    match currency_symbol(&code) {
        Some(symbol) => format!("{sign}{symbol}{body}"),
        None => format!("{sign}{code} {body}"),
    }
}

/// Fixed-decimal percentage, e.g. `format_percentage(66.666, 1) == "66.7%"`.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "AUD" => Some("A$"),
        "CAD" => Some("CA$"),
        "NZD" => Some("NZ$"),
        _ => None,
    }
}

/// "-" when the value is negative and the rendered digits are not all zero.
fn sign_prefix(value: f64, rendered: &str) -> &'static str {
    let nonzero = rendered.chars().any(|c| c.is_ascii_digit() && c != '0');
    if value < 0.0 && nonzero {
        "-"
    } else {
        ""
    }
}

/// Insert `,` every three digits of an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
