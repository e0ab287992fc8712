//! Five-wave impulse (points 0-5)

use super::{check_chronology, expect_points, leg, Violation, Warning};
use crate::fibonacci::{FibonacciRatio, WaveRole};
use crate::{PatternType, Trend, ValidationResult, WavePoint};

/// Validate an impulse.
///
/// Hard rules: wave 2 never retraces past point 0, wave 3 ends beyond
/// wave 1, wave 4 never enters wave 1 territory, wave 3 is not the shortest
/// of 1/3/5. Wave 5 failing to pass wave 3 is only a truncation warning.
pub fn validate_impulse(points: &[WavePoint]) -> ValidationResult {
    let p = match expect_points(PatternType::Impulse, points) {
        Ok(p) => p,
        Err(rejected) => return rejected,
    };

    let mut result = ValidationResult {
        detected_type: Some(PatternType::Impulse),
        ..ValidationResult::default()
    };
    check_chronology(p, &mut result);

    let trend = Trend::of(p[0].price, p[1].price);
    let w1 = leg(&p[0], &p[1]);
    let w2 = leg(&p[1], &p[2]);
    let w3 = leg(&p[2], &p[3]);
    let w4 = leg(&p[3], &p[4]);
    let w5 = leg(&p[4], &p[5]);

    if trend.beyond(p[0].price, p[2].price) {
        result.violate(Violation::Wave2BeyondOrigin);
    }
    if !trend.beyond(p[3].price, p[1].price) {
        result.violate(Violation::Wave3NotBeyondWave1);
    }
    if trend.beyond(p[1].price, p[4].price) {
        result.violate(Violation::Wave4OverlapsWave1);
    }
    if w3 < w1 && w3 < w5 {
        result.violate(Violation::Wave3Shortest);
    }

    if !trend.beyond(p[5].price, p[3].price) {
        result.warn(Warning::Wave5Truncated);
    }

    result.fibonacci_ratios = vec![
        FibonacciRatio::measure("2", WaveRole::Wave2, w2, w1),
        FibonacciRatio::measure("3", WaveRole::Wave3, w3, w1),
        FibonacciRatio::measure("4", WaveRole::Wave4, w4, w3),
        FibonacciRatio::measure("5", WaveRole::Wave5, w5, w1),
    ];

    result
}
