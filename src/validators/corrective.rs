//! Corrective ABC (points 0, A, B, C)

use super::{check_chronology, expect_points, leg, Violation, Warning};
use crate::fibonacci::{FibonacciRatio, WaveRole};
use crate::subtype::{classify_corrective, classify_flat, FLAT_THRESHOLD};
use crate::{CorrectiveType, PatternType, Trend, ValidationResult, WavePoint};

/// Deepest B/A retracement a correction survives
pub const MAX_B_RETRACEMENT: f64 = 1.618;

/// Validate an ABC correction.
///
/// With `requested = None` the zigzag/flat split is decided from B/A. The
/// only hard rule is B/A <= [`MAX_B_RETRACEMENT`]; B placement and C
/// extension are advisory. Flats also get a regular/expanded/running subtype.
pub fn validate_corrective(
    points: &[WavePoint],
    requested: Option<CorrectiveType>,
) -> ValidationResult {
    let p = match expect_points(PatternType::Corrective(requested), points) {
        Ok(p) => p,
        Err(rejected) => return rejected,
    };

    let mut result = ValidationResult::default();
    check_chronology(p, &mut result);

    let (origin, a, b, c) = (p[0].price, p[1].price, p[2].price, p[3].price);
    let trend = Trend::of(origin, a);
    let wave_a = leg(&p[0], &p[1]);
    let wave_b = leg(&p[1], &p[2]);
    let wave_c = leg(&p[2], &p[3]);

    let b_ratio = (wave_a > 0.0).then(|| wave_b / wave_a);
    if b_ratio.is_none() {
        result.warn(Warning::WaveAZeroLength);
    }

    let kind = requested
        .or_else(|| b_ratio.map(classify_corrective))
        .unwrap_or(CorrectiveType::Zigzag);
    result.detected_type = Some(PatternType::Corrective(Some(kind)));

    if let Some(ratio) = b_ratio {
        if ratio > MAX_B_RETRACEMENT {
            result.violate(Violation::WaveBTooDeep { ratio });
        }
    }

    let (role_b, role_c) = match kind {
        CorrectiveType::Zigzag => {
            if trend.beyond(origin, b) {
                result.warn(Warning::ZigzagBBeyondStart);
            }
            (WaveRole::WaveBZigzag, WaveRole::WaveCZigzag)
        }
        CorrectiveType::Flat => {
            if let Some(ratio) = b_ratio.filter(|&r| r < FLAT_THRESHOLD) {
                result.warn(Warning::FlatBShallow { ratio });
            }
            result.detected_subtype = Some(classify_flat(trend, origin, a, b, c));
            (WaveRole::WaveBFlat, WaveRole::WaveCFlat)
        }
    };

    if !trend.beyond(c, a) {
        result.warn(Warning::WaveCShort);
    }

    result.fibonacci_ratios = vec![
        FibonacciRatio::measure("B", role_b, wave_b, wave_a),
        FibonacciRatio::measure("C", role_c, wave_c, wave_a),
    ];

    result
}
