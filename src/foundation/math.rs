/// Tolerance used when comparing accumulated durations.
pub const DURATION_EPSILON: f64 = 1e-9;

/// Return `true` when `a` and `b` differ by no more than `eps`.
#[inline]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Convert a percentage (100 = unity) into a multiplicative factor.
#[inline]
pub fn percent_to_factor(percent: f64) -> f64 {
    percent / 100.0
}

#[inline]
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
