//! US-style number formatting for tables.

/// Formats a dollar amount with thousands separators and no cents.
///
/// ```
/// use tx_congestion_analytics::format::format_currency;
///
/// assert_eq!(format_currency(1_234_567.5), "$1,234,568");
/// assert_eq!(format_currency(-42.0), "-$42");
/// ```
#[must_use]
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }
    let rounded = round_half_away(value.abs(), 0);
    let sign = if value < 0.0 && rounded != "0" { "-" } else { "" };
    format!("{sign}${}", group_thousands(&rounded))
}

/// Formats a number with thousands separators and up to three decimals,
/// trimming trailing zeros.
///
/// ```
/// use tx_congestion_analytics::format::format_number;
///
/// assert_eq!(format_number(18_400.0), "18,400");
/// assert_eq!(format_number(1_234.5678), "1,234.568");
/// assert_eq!(format_number(2.50), "2.5");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = round_half_away(value.abs(), 3);
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let is_zero = whole == "0" && fraction.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if fraction.is_empty() {
        format!("{sign}{}", group_thousands(whole))
    } else {
        format!("{sign}{}.{fraction}", group_thousands(whole))
    }
}

/// Formats a percentage (already scaled to 0-100) with one decimal.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Formats a duration in minutes as hours and minutes.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_time(minutes: f64) -> String {
    let total = (minutes + 0.5).floor().max(0.0) as u64;
    let (hours, mins) = (total / 60, total % 60);
    match (hours, mins) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} hr"),
        (h, m) => format!("{h} hr {m} min"),
    }
}

/// Rounds a non-negative value to `decimals` places, halves away from zero.
fn round_half_away(value: f64, decimals: usize) -> String {
    let factor = 10_f64.powi(i32::try_from(decimals).unwrap_or(0));
    let scaled = (value * factor).round() / factor;
    format!("{scaled:.decimals$}")
}

/// Inserts `,` every three digits from the right of an integer string.
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
