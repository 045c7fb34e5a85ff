//! Numeric helpers for live-edited form fields.

/// Coerces a form field to a number for summing.
///
/// Partial entry is expected while the user types, so empty or non-numeric
/// input counts as `0`. Thousands separators are tolerated.
///
/// ```
/// use energy_core::calculations::common::coerce_form_number;
///
/// assert_eq!(coerce_form_number("1,250.5"), 1250.5);
/// assert_eq!(coerce_form_number(""), 0.0);
/// assert_eq!(coerce_form_number("12a"), 0.0);
/// ```
pub fn coerce_form_number(input: &str) -> f64 {
    let normalized = input.trim().replace(',', "");
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parses an optional form field: `None` when empty or unparseable.
pub fn parse_optional_number(input: &str) -> Option<f64> {
    let normalized = input.trim().replace(',', "");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a year typed into a form.
pub fn parse_form_year(input: &str) -> Option<i32> {
    input.trim().parse::<i32>().ok()
}
