//! Instrument-precision rounding.

/// Rounds `x` to `digits` significant figures, the way qPCR exports report
/// Ct differences. Zero and non-finite values pass through unchanged.
pub fn round_sig(x: f64, digits: u32) -> f64 {
    if x == 0.0 || !x.is_finite() || digits == 0 {
        return x;
    }
    let magnitude = x.abs().log10().floor() as i32;
    let exp = digits as i32 - 1 - magnitude;
    let factor = 10f64.powi(exp);
    let rounded = (x * factor).round() / factor;
    if rounded.is_finite() { rounded } else { x }
}

/// Three significant figures, the convention used for every delta.
pub fn round3(x: f64) -> f64 {
    round_sig(x, 3)
}
