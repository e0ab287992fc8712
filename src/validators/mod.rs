//! Structural validation of labelled wave counts
//!
//! One pure validator per pattern family. Hard-rule breaches land in
//! [`ValidationResult::errors`] and make the count invalid; heuristic
//! deviations land in [`ValidationResult::warnings`] only. Every internal
//! wave is also scored against its Fibonacci rule.
//!
//! # Example
//!
//! ```rust
//! use wavecount::prelude::*;
//!
//! let points = [
//!     WavePoint::new(0, "0", 100.0, 0),
//!     WavePoint::new(5, "A", 50.0, 300),
//!     WavePoint::new(9, "B", 95.0, 540),
//!     WavePoint::new(14, "C", 40.0, 840),
//! ];
//! let result = validate(PatternType::Corrective(None), &points);
//! assert_eq!(result.detected_type, Some(PatternType::Corrective(Some(CorrectiveType::Flat))));
//! ```

use serde::Serialize;
use tracing::trace;

use crate::{PatternType, ValidationResult, WavePoint};

pub mod corrective;
pub mod diagonal;
pub mod impulse;
pub mod triangle;

pub use corrective::validate_corrective;
pub use diagonal::validate_diagonal;
pub use impulse::validate_impulse;
pub use triangle::validate_triangle;

// ============================================================
// FINDINGS
// ============================================================

/// Hard-rule breach; any one makes a count invalid
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[serde(into = "String")]
pub enum Violation {
    #[error("{pattern} pattern requires exactly {expected} points, got {got}")]
    PointCount {
        pattern: PatternType,
        expected: usize,
        got: usize,
    },

    #[error("Wave 2 retraces beyond the start of Wave 1")]
    Wave2BeyondOrigin,

    #[error("Wave 3 does not extend beyond the end of Wave 1")]
    Wave3NotBeyondWave1,

    #[error("Wave 4 overlaps Wave 1 territory")]
    Wave4OverlapsWave1,

    #[error("Wave 3 is the shortest of waves 1, 3 and 5")]
    Wave3Shortest,

    #[error("Wave B retraces {ratio:.3} of Wave A, beyond the 1.618 limit")]
    WaveBTooDeep { ratio: f64 },
}

impl From<Violation> for String {
    fn from(value: Violation) -> Self {
        value.to_string()
    }
}

/// Advisory deviation; never affects validity
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[serde(into = "String")]
pub enum Warning {
    #[error("Wave 5 does not exceed the end of Wave 3 (possible truncation)")]
    Wave5Truncated,

    #[error("Wave B exceeds the start of Wave A, unusual for a zigzag")]
    ZigzagBBeyondStart,

    #[error("Wave B retraces only {ratio:.3} of Wave A; a flat expects B near its start")]
    FlatBShallow { ratio: f64 },

    #[error("Wave C does not extend beyond the end of Wave A")]
    WaveCShort,

    #[error("Wave A has zero length")]
    WaveAZeroLength,

    #[error("Triangle boundaries do not converge")]
    TriangleNotConverging,

    #[error("Wave 4 does not overlap Wave 1; the structure may be an impulse")]
    DiagonalWithoutOverlap,

    #[error("Points are not in chronological order")]
    OutOfOrder,
}

impl From<Warning> for String {
    fn from(value: Warning) -> Self {
        value.to_string()
    }
}

// ============================================================
// DISPATCH
// ============================================================

/// Validate `points` as a structure of the given family
pub fn validate(pattern_type: PatternType, points: &[WavePoint]) -> ValidationResult {
    let result = match pattern_type {
        PatternType::Impulse => validate_impulse(points),
        PatternType::Corrective(kind) => validate_corrective(points, kind),
        PatternType::Triangle => validate_triangle(points),
        PatternType::Diagonal => validate_diagonal(points),
    };

    trace!(
        pattern = %pattern_type,
        valid = result.is_valid,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "validated wave count"
    );
    result
}

// ============================================================
// SHARED HELPERS
// ============================================================

/// Pass `points` through when their count matches
/// [`PatternType::point_count`], otherwise the short-circuit result
pub(crate) fn expect_points(
    pattern: PatternType,
    points: &[WavePoint],
) -> Result<&[WavePoint], ValidationResult> {
    let expected = pattern.point_count();
    if points.len() != expected {
        return Err(ValidationResult::rejected(Violation::PointCount {
            pattern,
            expected,
            got: points.len(),
        }));
    }
    Ok(points)
}

/// Price length of the move between two points
#[inline]
pub(crate) fn leg(from: &WavePoint, to: &WavePoint) -> f64 {
    (to.price - from.price).abs()
}

pub(crate) fn check_chronology(points: &[WavePoint], result: &mut ValidationResult) {
    if points.windows(2).any(|w| w[1].time <= w[0].time) {
        result.warn(Warning::OutOfOrder);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(prices: &[f64]) -> Vec<WavePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| WavePoint::new(i * 10, i.to_string(), p, i as i64 * 600))
            .collect()
    }

    #[test]
    fn test_wrong_point_count_short_circuits() {
        for pattern in [
            PatternType::Impulse,
            PatternType::Corrective(None),
            PatternType::Triangle,
            PatternType::Diagonal,
        ] {
            let result = validate(pattern, &points(&[100.0, 110.0, 105.0]));
            assert!(!result.is_valid);
            assert_eq!(result.errors.len(), 1);
            assert!(result.fibonacci_ratios.is_empty());
            assert!(matches!(
                result.errors[0],
                Violation::PointCount { got: 3, .. }
            ));
        }
    }

    #[test]
    fn test_expected_count_follows_pattern_type() {
        for pattern in [
            PatternType::Impulse,
            PatternType::Corrective(None),
            PatternType::Corrective(Some(crate::CorrectiveType::Flat)),
            PatternType::Triangle,
            PatternType::Diagonal,
        ] {
            let short = validate(pattern, &points(&[100.0, 110.0]));
            match &short.errors[0] {
                Violation::PointCount { expected, got, .. } => {
                    assert_eq!(*expected, pattern.point_count());
                    assert_eq!(*got, 2);
                }
                other => panic!("expected PointCount, got {other:?}"),
            }

            let exact = vec![100.0; pattern.point_count()];
            let result = validate(pattern, &points(&exact));
            assert!(!result
                .errors
                .iter()
                .any(|e| matches!(e, Violation::PointCount { .. })));
        }
    }

    #[test]
    fn test_point_count_message() {
        let result = validate(PatternType::Impulse, &[]);
        assert_eq!(
            result.errors[0].to_string(),
            "impulse pattern requires exactly 6 points, got 0"
        );
    }

    #[test]
    fn test_chronology_warning() {
        let mut pts = points(&[100.0, 150.0, 119.0, 200.0, 169.0, 219.0]);
        pts[3].time = pts[2].time;
        let result = validate(PatternType::Impulse, &pts);
        assert!(result.is_valid);
        assert!(result.warnings.contains(&Warning::OutOfOrder));
    }
}
