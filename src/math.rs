//! Protocol math utilities
//!
//! Small helpers shared by the movement and terrain codecs. The packed
//! float/u16 pair matches the wire quantization used by the protocol: a value
//! is mapped onto a 16-bit lattice over a known `[lower, upper]` range, so
//! both ends must agree on the range to round-trip it.

/// Clamp `value` into `[min, max]`
pub fn clamp_f32(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Linear interpolation between `a` and `b` by `t` in `[0, 1]`
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * clamp_f32(t, 0.0, 1.0)
}

/// Squared euclidean distance between two points
pub fn distance_squared(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Quantize a float in `[lower, upper]` to a wire u16
///
/// Values outside the range are clamped onto its ends.
pub fn float_to_u16(value: f32, lower: f32, upper: f32) -> u16 {
    let delta = upper - lower;
    let mut normalized = (value - lower) / delta;
    normalized = clamp_f32(normalized, 0.0, 1.0);
    (normalized * u16::MAX as f32) as u16
}

/// Expand a wire u16 back into a float over `[lower, upper]`
///
/// Results within one quantization step of zero snap to exactly zero, so
/// zeroes survive the round trip.
pub fn u16_to_float(value: u16, lower: f32, upper: f32) -> f32 {
    const ONE_OVER_U16_MAX: f32 = 1.0 / u16::MAX as f32;

    let delta = upper - lower;
    let mut result = value as f32 * ONE_OVER_U16_MAX * delta + lower;

    let max_error = delta * ONE_OVER_U16_MAX;
    if result.abs() < max_error {
        result = 0.0;
    }
    result
}
