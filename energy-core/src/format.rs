//! Display formatting shared by the table and export paths.

/// Placeholder shown for missing or non-finite values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formats a value with exactly two decimal places.
///
/// ```
/// use energy_core::format::fixed2;
///
/// assert_eq!(fixed2(15.0), "15.00");
/// assert_eq!(fixed2(1.005), "1.00");
/// assert_eq!(fixed2(-2.5), "-2.50");
/// ```
pub fn fixed2(value: f64) -> String {
    format!("{value:.2}")
}

/// Formats an optional value, using [`NOT_AVAILABLE`] for `None`, NaN and
/// infinities so that neither `"null"` nor `"NaN"` ever reaches a reader.
pub fn display_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => fixed2(v),
        _ => NOT_AVAILABLE.to_string(),
    }
}
