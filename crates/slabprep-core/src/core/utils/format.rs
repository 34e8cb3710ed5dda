/// Renders a float the way the control-script and data-file readers expect plain
/// numbers: shortest round-trip digits, with a trailing `.0` on integral values.
pub fn plain_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Renders a float with exactly `decimals` digits after the point.
pub fn fixed_float(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}
