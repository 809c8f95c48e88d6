//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Floor a f32 and clamp it to the u32 range, returning 0 for NaN or negative
/// values and saturating at the maximum for oversized or infinite ones.
///
/// The clamp runs through f64, where `u32::MAX` is exactly representable; the
/// nearest f32 sits above it and would round-trip to `None`.
#[must_use]
pub fn floor_f32_to_u32(value: f32) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = f64::from(value).min(max).floor();
    cast::<f64, u32>(clamped).unwrap_or(u32::MAX)
}

/// Convert u32 to f32 while allowing precision loss in a single location.
#[must_use]
pub fn u32_to_f32(value: u32) -> f32 {
    cast::<u32, f32>(value).unwrap_or(0.0)
}

/// Clamp a percentage to the displayable 0-100 window, mapping NaN to 0.
#[must_use]
pub fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_handles_non_finite_and_negative() {
        assert_eq!(floor_f32_to_u32(f32::NAN), 0);
        assert_eq!(floor_f32_to_u32(-3.0), 0);
        assert_eq!(floor_f32_to_u32(7.9), 7);
    }

    #[test]
    fn floor_saturates_above_the_u32_range() {
        assert_eq!(floor_f32_to_u32(f32::INFINITY), u32::MAX);
        assert_eq!(floor_f32_to_u32(1e11), u32::MAX);
        // The nearest f32 to u32::MAX lies just above it; the f64 clamp must
        // still land inside the range.
        #[allow(clippy::cast_precision_loss)]
        let boundary = u32::MAX as f32;
        assert_eq!(floor_f32_to_u32(boundary), u32::MAX);
    }

    #[test]
    fn percent_clamps_both_ends() {
        assert!((clamp_percent(140.0) - 100.0).abs() < f32::EPSILON);
        assert!((clamp_percent(-5.0) - 0.0).abs() < f32::EPSILON);
        assert!((clamp_percent(f32::NAN) - 0.0).abs() < f32::EPSILON);
    }
}
