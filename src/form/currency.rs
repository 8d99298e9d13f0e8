//! Currency display strings and recovery of the underlying amount
//!
//! Calculated money fields are stored the way the form shows them ("$54,320").
//! Every downstream calculation reads them back through `parse_currency`, so
//! format followed by parse must give back the same amount for anything with
//! at most cents precision.

/// Format an amount for display; zero renders as an empty string
pub fn format_currency(amount: f64) -> String {
    if amount == 0.0 || !amount.is_finite() {
        return String::new();
    }
    format!("${}", group_digits(amount))
}

/// Format an amount for display; zero renders as "$0"
pub fn format_dollars(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }
    format!("${}", group_digits(amount))
}

/// Recover the numeric amount from a display string
///
/// Strips everything except digits, '.' and '-', then takes the longest
/// numeric prefix. Anything unparseable is 0.
pub fn parse_currency(value: &str) -> f64 {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_float(&cleaned).unwrap_or(0.0)
}

/// Parse the longest leading decimal number, ignoring leading whitespace
///
/// "3.75 weighted" -> 3.75, "abc" -> None
pub fn leading_float(value: &str) -> Option<f64> {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            digits += 1;
        }
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }
    s[..end].parse().ok()
}

/// Parse the longest leading integer, ignoring leading whitespace
///
/// "4 people" -> 4, "4.9" -> 4, "" -> None
pub fn leading_int(value: &str) -> Option<i64> {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let start_digits = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == start_digits {
        return None;
    }
    s[..end].parse().ok()
}

/// Round to the nearest multiple of `step`, halves rounding up
pub fn round_to_nearest(amount: f64, step: f64) -> f64 {
    (amount / step + 0.5).floor() * step
}

fn group_digits(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 4);
    if negative {
        grouped.push('-');
    }
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if fraction != 0 {
        grouped.push_str(&format!(".{fraction:02}"));
    }
    grouped
}
