//! Display helpers shared by the text report and log messages.

/// Format a record count with thousands separators.
///
/// # Examples
///
/// ```
/// use survey_core::formatting::format_count;
///
/// assert_eq!(format_count(7), "7");
/// assert_eq!(format_count(1_234), "1,234");
/// assert_eq!(format_count(12_345_678), "12,345,678");
/// ```
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Render a ratio in `[0, 1]` as a percentage string.
///
/// # Examples
///
/// ```
/// use survey_core::formatting::format_percent;
///
/// assert_eq!(format_percent(0.7, 0), "70%");
/// assert_eq!(format_percent(0.8567, 1), "85.7%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
pub fn format_percent(ratio: f64, decimals: usize) -> String {
    format!("{:.prec$}%", ratio * 100.0, prec = decimals)
}

/// Render an optional mean confidence, `"n/a"` when there is nothing to average.
///
/// # Examples
///
/// ```
/// use survey_core::formatting::format_mean_confidence;
///
/// assert_eq!(format_mean_confidence(Some(0.8567)), "85.7%");
/// assert_eq!(format_mean_confidence(None), "n/a");
/// ```
pub fn format_mean_confidence(mean: Option<f64>) -> String {
    match mean {
        Some(m) => format_percent(m, 1),
        None => "n/a".to_string(),
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
///
/// # Examples
///
/// ```
/// use survey_core::formatting::percentage;
///
/// assert!((percentage(2, 3, 1) - 66.7).abs() < 1e-9);
/// assert_eq!(percentage(0, 0, 2), 0.0);
/// ```
pub fn percentage(part: usize, whole: usize, decimal_places: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = (part as f64 / whole as f64) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}
