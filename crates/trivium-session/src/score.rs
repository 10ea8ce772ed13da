//! The time-decay scoring function.

/// Time window, in seconds, over which credit scales up to full value.
pub(crate) const FULL_CREDIT_SECS: f32 = 24.0;

/// Computes the points awarded for a correct answer.
///
/// The multiplier is `min(elapsed_secs / 24, 1)`: full credit at 24
/// seconds and beyond, linear scaling below that, zero at zero. Only the
/// upper bound is clamped — a pathological negative reading is the
/// caller's bug and is passed through rather than masked here.
///
/// Pure in its two inputs; this is the scoring contract, so everything
/// that awards solo points funnels through it.
pub fn score_points(value: i32, elapsed_secs: f32) -> i32 {
    let multiplier = (elapsed_secs / FULL_CREDIT_SECS).min(1.0);
    (value as f32 * multiplier).round() as i32
}
