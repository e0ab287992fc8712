//! Pattern subtype classification
//!
//! Pure helpers deciding zigzag vs flat, the flat variant, the diagonal
//! shape from its trendline slopes and the triangle shape from its boundary
//! points. All comparisons are direction-aware through [`Trend`].

use crate::{CorrectiveType, Subtype, Trend, WavePoint};

/// B/A retracement at or above which a correction is a flat
pub const FLAT_THRESHOLD: f64 = 0.90;
/// Slope difference below which two diagonal trendlines count as parallel
pub const SLOPE_EPSILON: f64 = 0.0001;

/// Zigzag vs flat from the B/A retracement. Inclusive at [`FLAT_THRESHOLD`].
#[inline]
pub fn classify_corrective(b_over_a: f64) -> CorrectiveType {
    if b_over_a >= FLAT_THRESHOLD {
        CorrectiveType::Flat
    } else {
        CorrectiveType::Zigzag
    }
}

/// Flat variant.
///
/// `trend` is the direction of wave A. B beyond the start is checked first:
/// with it, C reaching A's end makes the flat expanded, otherwise running.
/// Without it the flat is regular whatever C does.
pub fn classify_flat(trend: Trend, origin: f64, a: f64, b: f64, c: f64) -> Subtype {
    // B travels against wave A, so "beyond the start" is the opposite sense
    let b_exceeds_start = trend.beyond(origin, b);
    let c_reaches_a = trend.reaches(c, a);

    match (b_exceeds_start, c_reaches_a) {
        (true, true) => Subtype::Expanded,
        (true, false) => Subtype::Running,
        (false, _) => Subtype::Regular,
    }
}

/// Slope of the line through two points, in price per second.
///
/// Falls back to bar index when timestamps coincide; 0.0 when both do.
pub fn slope(from: &WavePoint, to: &WavePoint) -> f64 {
    let rise = to.price - from.price;
    let dt = (to.time - from.time) as f64;
    if dt != 0.0 {
        return rise / dt;
    }
    let di = to.index as f64 - from.index as f64;
    if di != 0.0 {
        rise / di
    } else {
        0.0
    }
}

/// Diagonal shape from the 1-3 and 2-4 trendline slopes.
///
/// In an uptrend the 2-4 line is the lower boundary, so the lines converge
/// when it rises faster than the 1-3 line; in a downtrend the sense flips.
pub fn classify_diagonal(trend: Trend, slope_13: f64, slope_24: f64) -> Subtype {
    let convergence = match trend {
        Trend::Up => slope_24 - slope_13,
        Trend::Down => slope_13 - slope_24,
    };

    if convergence > SLOPE_EPSILON {
        Subtype::Contracting
    } else if convergence < -SLOPE_EPSILON {
        Subtype::Expanding
    } else {
        Subtype::Parallel
    }
}

/// Triangle shape from its upper and lower boundary points
pub fn classify_triangle(highs: [f64; 3], lows: [f64; 3]) -> Option<Subtype> {
    let highs_falling = strictly_decreasing(&highs);
    let lows_rising = strictly_increasing(&lows);

    if highs_falling && lows_rising {
        Some(Subtype::Contracting)
    } else if strictly_increasing(&highs) && strictly_decreasing(&lows) {
        Some(Subtype::Expanding)
    } else {
        None
    }
}

#[inline]
pub(crate) fn strictly_decreasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[1] < w[0])
}

#[inline]
pub(crate) fn strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[1] > w[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_threshold_is_inclusive() {
        assert_eq!(classify_corrective(45.0 / 50.0), CorrectiveType::Flat);
        assert_eq!(classify_corrective(0.8999), CorrectiveType::Zigzag);
        assert_eq!(classify_corrective(1.3), CorrectiveType::Flat);
    }

    #[test]
    fn test_flat_variants_downward_a() {
        // 0 = 100, A = 50
        assert_eq!(classify_flat(Trend::Down, 100.0, 50.0, 105.0, 45.0), Subtype::Expanded);
        assert_eq!(classify_flat(Trend::Down, 100.0, 50.0, 105.0, 60.0), Subtype::Running);
        assert_eq!(classify_flat(Trend::Down, 100.0, 50.0, 96.0, 52.0), Subtype::Regular);
    }

    #[test]
    fn test_flat_variants_upward_a() {
        // 0 = 50, A = 100
        assert_eq!(classify_flat(Trend::Up, 50.0, 100.0, 45.0, 105.0), Subtype::Expanded);
        assert_eq!(classify_flat(Trend::Up, 50.0, 100.0, 45.0, 90.0), Subtype::Running);
        assert_eq!(classify_flat(Trend::Up, 50.0, 100.0, 54.0, 98.0), Subtype::Regular);
    }

    // B inside the start while C runs past A folds into "regular":
    // the B check decides first and there is no fourth variant.
    #[test]
    fn test_flat_b_inside_c_beyond_a_folds_to_regular() {
        assert_eq!(classify_flat(Trend::Down, 100.0, 50.0, 96.0, 40.0), Subtype::Regular);
        assert_eq!(classify_flat(Trend::Up, 50.0, 100.0, 54.0, 110.0), Subtype::Regular);
    }

    #[test]
    fn test_slope_fallbacks() {
        let a = WavePoint::new(0, "1", 100.0, 0);
        let b = WavePoint::new(10, "3", 120.0, 100);
        assert_eq!(slope(&a, &b), 0.2);

        let b_same_time = WavePoint::new(10, "3", 120.0, 0);
        assert_eq!(slope(&a, &b_same_time), 2.0);

        let same = WavePoint::new(0, "3", 120.0, 0);
        assert_eq!(slope(&a, &same), 0.0);
    }

    #[test]
    fn test_diagonal_shapes() {
        assert_eq!(classify_diagonal(Trend::Up, 0.1, 0.3), Subtype::Contracting);
        assert_eq!(classify_diagonal(Trend::Up, 0.3, 0.1), Subtype::Expanding);
        assert_eq!(classify_diagonal(Trend::Up, 0.2, 0.20005), Subtype::Parallel);

        assert_eq!(classify_diagonal(Trend::Down, -0.1, -0.3), Subtype::Contracting);
        assert_eq!(classify_diagonal(Trend::Down, -0.3, -0.1), Subtype::Expanding);
        assert_eq!(classify_diagonal(Trend::Down, -0.2, -0.2), Subtype::Parallel);
    }

    #[test]
    fn test_triangle_shapes() {
        assert_eq!(
            classify_triangle([110.0, 105.0, 102.0], [90.0, 94.0, 97.0]),
            Some(Subtype::Contracting)
        );
        assert_eq!(
            classify_triangle([102.0, 105.0, 110.0], [97.0, 94.0, 90.0]),
            Some(Subtype::Expanding)
        );
        assert_eq!(classify_triangle([110.0, 105.0, 102.0], [90.0, 88.0, 97.0]), None);
    }
}
