//! Pure formatting helpers consumed by the views.

use chrono::NaiveDate;

/// Format a currency amount the way the portal displays it: exactly two
/// fractional digits, comma as the decimal separator, dot as the thousands
/// separator.
///
/// ```
/// use portal_igreja::money;
///
/// assert_eq!(money(30.5), "30,50");
/// assert_eq!(money(1234567.891), "1.234.567,89");
/// ```
///
/// Non-finite values fall back to their plain fixed-point rendering
/// instead of panicking.
pub fn money(valor: f64) -> String {
    if !valor.is_finite() {
        return format!("{valor:.2}");
    }

    let negative = valor < 0.0;
    let fixed = format!("{:.2}", valor.abs());
    let (inteiro, centavos) = fixed
        .split_once('.')
        .expect("fixed-point rendering always contains a separator");

    let mut grouped = String::with_capacity(inteiro.len() + inteiro.len() / 3);
    let len = inteiro.len();
    for (i, c) in inteiro.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{centavos}")
}

/// Render a calendar day as an ISO `YYYY-MM-DD` string.
///
/// An absent date renders as the empty string, which the views show as a
/// blank cell.
pub fn iso_day(data: Option<NaiveDate>) -> String {
    match data {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}
