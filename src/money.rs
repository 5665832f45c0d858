//! Cent-precision rounding shared by the balance and settlement code.

/// Balances within this band of zero count as settled. Absorbs the rounding
/// noise that floating-point shares leave behind.
pub const DEAD_ZONE: f64 = 0.009;

/// Round to the nearest cent, halves away from zero.
///
/// Applied exactly once per value, at storage or classification time.
/// Re-rounding an already rounded value is a no-op, but compounding rounds
/// through intermediate arithmetic is what drifts, so callers keep raw
/// values raw until the last step.
pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}
