//! Contracting/expanding triangle (points 0, A, B, C, D, E)

use super::{check_chronology, expect_points, leg, Warning};
use crate::fibonacci::{FibonacciRatio, WaveRole};
use crate::subtype::{classify_triangle, strictly_decreasing, strictly_increasing};
use crate::{PatternType, Trend, ValidationResult, WavePoint};

/// Validate a triangle.
///
/// Triangles carry no hard rules; only leg ratios separate good from poor
/// ones. A warning is raised when neither the highs (0, B, D) fall nor the
/// lows (A, C, E) rise. The subtype reads the boundaries direction-aware:
/// a rising first leg puts A/C/E on top.
pub fn validate_triangle(points: &[WavePoint]) -> ValidationResult {
    let p = match expect_points(PatternType::Triangle, points) {
        Ok(p) => p,
        Err(rejected) => return rejected,
    };

    let mut result = ValidationResult {
        detected_type: Some(PatternType::Triangle),
        ..ValidationResult::default()
    };
    check_chronology(p, &mut result);

    let highs = [p[0].price, p[2].price, p[4].price];
    let lows = [p[1].price, p[3].price, p[5].price];
    if !strictly_decreasing(&highs) && !strictly_increasing(&lows) {
        result.warn(Warning::TriangleNotConverging);
    }

    let (upper, lower) = match Trend::of(p[0].price, p[1].price) {
        Trend::Down => (highs, lows),
        Trend::Up => (lows, highs),
    };
    result.detected_subtype = classify_triangle(upper, lower);

    let legs: Vec<f64> = p.windows(2).map(|w| leg(&w[0], &w[1])).collect();
    result.fibonacci_ratios = ["B", "C", "D", "E"]
        .iter()
        .zip(legs.windows(2))
        .map(|(&wave, pair)| FibonacciRatio::measure(wave, WaveRole::Triangle, pair[1], pair[0]))
        .collect();

    result
}
