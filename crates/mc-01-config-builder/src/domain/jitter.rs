//! Deterministic interval jitter
//!
//! Spreads fleet-wide periodic work (state sync) across time without any
//! shared randomness: the offset is derived from a MurmurHash3 of the
//! device key, so the same `(base, key)` always yields the same interval.

use std::io::Cursor;

/// Fraction of the base interval the state sync interval may move by.
pub const STATE_SYNC_JITTER_FRACTION: f32 = 0.25;

/// Seed for the jitter hash. Changing it reshuffles every device.
const JITTER_SEED: u32 = 0x6d63_6667;

/// Map `key` to a point in `[0, 1)`.
fn unit_interval(key: &str) -> f64 {
    let mut cursor = Cursor::new(key.as_bytes());
    // Reading from an in-memory cursor cannot fail
    let hash = murmur3::murmur3_x64_128(&mut cursor, JITTER_SEED).unwrap_or(0);
    // 53 high bits fill an f64 mantissa exactly
    let bits = (hash >> 75) as u64;
    bits as f64 / (1u64 << 53) as f64
}

/// Perturb `base` by up to `±fraction * base`, keyed by `key`.
///
/// The result always lies in `[base * (1 - fraction), base * (1 + fraction)]`
/// (rounded, saturating at the `u32` range). A non-finite or negative
/// fraction disables jitter; fractions above 1 are capped at 1.
pub fn jitter_u32(base: u32, key: &str, fraction: f32) -> u32 {
    if !fraction.is_finite() || fraction <= 0.0 || base == 0 {
        return base;
    }
    let fraction = f64::from(fraction.min(1.0));
    let base_f = f64::from(base);

    let offset = (unit_interval(key) * 2.0 - 1.0) * fraction * base_f;
    let low = (base_f * (1.0 - fraction)).ceil();
    let high = (base_f * (1.0 + fraction)).floor().min(f64::from(u32::MAX));

    (base_f + offset).round().clamp(low, high) as u32
}
