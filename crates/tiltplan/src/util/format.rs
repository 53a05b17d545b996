/// Group the integer part of a non-negative amount with thousands separators
fn group_thousands(whole: i64) -> String {
    let digits = whole.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a currency value
pub fn format_currency(value: f64) -> String {
    // Round to whole cents before splitting dollars and cents
    let total_cents = (value.abs() * 100.0).round() as i64;
    let dollars = group_thousands(total_cents / 100);
    let cents = total_cents % 100;

    if value >= 0.0 {
        format!("${dollars}.{cents:02}")
    } else {
        format!("-${dollars}.{cents:02}")
    }
}

/// Format a percentage value
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format an optional figure, or a dash when it is unavailable
pub fn format_or_dash(value: Option<f64>, format: fn(f64) -> String) -> String {
    value.map_or_else(|| "-".to_string(), format)
}
