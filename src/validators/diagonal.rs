//! Leading/ending diagonal (points 0-5)

use super::{check_chronology, expect_points, leg, Violation, Warning};
use crate::fibonacci::{FibonacciRatio, WaveRole};
use crate::subtype::{classify_diagonal, slope};
use crate::{PatternType, Trend, ValidationResult, WavePoint};

/// Validate a diagonal.
///
/// Wave 3 must end beyond wave 1. Overlap between waves 4 and 1 is allowed
/// and expected; its absence and a truncated fifth are warnings. The shape
/// comes from the slopes of the 1-3 and 2-4 trendlines.
pub fn validate_diagonal(points: &[WavePoint]) -> ValidationResult {
    let p = match expect_points(PatternType::Diagonal, points) {
        Ok(p) => p,
        Err(rejected) => return rejected,
    };

    let mut result = ValidationResult {
        detected_type: Some(PatternType::Diagonal),
        ..ValidationResult::default()
    };
    check_chronology(p, &mut result);

    let trend = Trend::of(p[0].price, p[1].price);

    if !trend.beyond(p[3].price, p[1].price) {
        result.violate(Violation::Wave3NotBeyondWave1);
    }
    if !trend.beyond(p[5].price, p[3].price) {
        result.warn(Warning::Wave5Truncated);
    }
    if !trend.beyond(p[1].price, p[4].price) {
        result.warn(Warning::DiagonalWithoutOverlap);
    }

    result.detected_subtype = Some(classify_diagonal(
        trend,
        slope(&p[1], &p[3]),
        slope(&p[2], &p[4]),
    ));

    let w1 = leg(&p[0], &p[1]);
    let w2 = leg(&p[1], &p[2]);
    let w3 = leg(&p[2], &p[3]);
    let w4 = leg(&p[3], &p[4]);
    let w5 = leg(&p[4], &p[5]);
    result.fibonacci_ratios = vec![
        FibonacciRatio::measure("2", WaveRole::Wave2Diagonal, w2, w1),
        FibonacciRatio::measure("3", WaveRole::Wave3Diagonal, w3, w1),
        FibonacciRatio::measure("4", WaveRole::Wave4Diagonal, w4, w3),
        FibonacciRatio::measure("5", WaveRole::Wave5Diagonal, w5, w3),
    ];

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Subtype;

    fn diagonal(prices: [f64; 6]) -> Vec<WavePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| WavePoint::new(i * 10, i.to_string(), p, i as i64 * 100))
            .collect()
    }

    #[test]
    fn test_contracting_ending_diagonal() {
        // 1-3 line: 150 -> 165 over 200s (0.075/s); 2-4 line: 120 -> 145 over 200s (0.125/s)
        let result = validate_diagonal(&diagonal([100.0, 150.0, 120.0, 165.0, 145.0, 172.0]));
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(result.detected_subtype, Some(Subtype::Contracting));
    }

    #[test]
    fn test_expanding_diagonal() {
        // 1-3 slope 0.4/s, 2-4 slope 0.1/s
        let result = validate_diagonal(&diagonal([100.0, 140.0, 115.0, 220.0, 135.0, 260.0]));
        assert!(result.is_valid);
        assert_eq!(result.detected_subtype, Some(Subtype::Expanding));
    }

    #[test]
    fn test_downtrend_contracting_diagonal() {
        let result = validate_diagonal(&diagonal([185.0, 135.0, 165.0, 110.0, 125.0, 100.0]));
        assert!(result.is_valid);
        assert_eq!(result.detected_subtype, Some(Subtype::Contracting));
    }

    #[test]
    fn test_parallel_diagonal() {
        let result = validate_diagonal(&diagonal([100.0, 150.0, 130.0, 180.0, 160.0, 190.0]));
        assert_eq!(result.detected_subtype, Some(Subtype::Parallel));
        assert!(result.warnings.contains(&Warning::DiagonalWithoutOverlap));
    }

    #[test]
    fn test_wave3_must_pass_wave1() {
        let result = validate_diagonal(&diagonal([100.0, 150.0, 120.0, 145.0, 130.0, 148.0]));
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![Violation::Wave3NotBeyondWave1]);
    }

    #[test]
    fn test_truncated_fifth() {
        let result = validate_diagonal(&diagonal([100.0, 150.0, 120.0, 175.0, 145.0, 170.0]));
        assert!(result.is_valid);
        assert!(result.warnings.contains(&Warning::Wave5Truncated));
    }
}
