//! Auto-analysis over a candle window
//!
//! candles -> pivots -> alternating subsequence -> hypothesis points ->
//! structural validation -> Fibonacci quality -> confidence.
//!
//! At most one impulse and one corrective hypothesis are proposed per
//! window, both anchored on the earliest alternating pivots.

use std::ops::Range;

use tracing::debug;

use crate::pivots::{detect_pivots, extract_alternating};
use crate::validators::validate;
use crate::{
    AnalyzerConfig, AutoAnalysis, DetectedPattern, PatternType, Pivot, PivotType, WavePoint, OHLCV,
};

/// Confidence as a function of validity and Fibonacci score
#[derive(Debug, Clone, Copy)]
struct ConfidenceModel {
    valid_base: f64,
    valid_weight: f64,
    invalid_weight: f64,
}

impl ConfidenceModel {
    #[inline]
    fn score(&self, is_valid: bool, fib_score: f64) -> f64 {
        if is_valid {
            (self.valid_base + self.valid_weight * fib_score).min(1.0)
        } else {
            self.invalid_weight * fib_score
        }
    }
}

const IMPULSE_CONFIDENCE: ConfidenceModel = ConfidenceModel {
    valid_base: 0.7,
    valid_weight: 0.3,
    invalid_weight: 0.5,
};

const CORRECTIVE_CONFIDENCE: ConfidenceModel = ConfidenceModel {
    valid_base: 0.6,
    valid_weight: 0.3,
    invalid_weight: 0.4,
};

/// Inclusive `start..=end` clamped to `len`, `None` when nothing remains
pub(crate) fn window_range(len: usize, start: usize, end: usize) -> Option<Range<usize>> {
    if start >= len || start > end {
        return None;
    }
    Some(start..end.min(len - 1) + 1)
}

/// Run the full pipeline on `bars[start..=end]` with an explicit config.
///
/// Pivot and point indices in the output are absolute indices into `bars`.
pub fn auto_analyze_with<T: OHLCV>(
    config: &AnalyzerConfig,
    bars: &[T],
    start: usize,
    end: usize,
) -> AutoAnalysis {
    let Some(range) = window_range(bars.len(), start, end) else {
        debug!(start, end, len = bars.len(), "empty analysis window");
        return AutoAnalysis::default();
    };
    let offset = range.start;
    let window = &bars[range];
    let lookback = config.lookback_for(window.len());

    let pivots: Vec<Pivot> = detect_pivots(window, lookback)
        .into_iter()
        .map(|mut p| {
            if window[p.index].timestamp().is_none() {
                p.time = (p.index + offset) as i64;
            }
            p.index += offset;
            p
        })
        .collect();
    debug!(bars = window.len(), lookback, pivots = pivots.len(), "detected pivots");

    let mut patterns = Vec::with_capacity(2);
    if pivots.len() >= 5 {
        patterns.extend(impulse_hypothesis(config, window, offset, &pivots));
    }
    if pivots.len() >= 3 {
        patterns.extend(corrective_hypothesis(config, window, offset, &pivots));
    }

    let confidence = patterns.iter().map(|p| p.confidence).fold(0.0, f64::max);
    AutoAnalysis {
        patterns,
        pivots,
        confidence,
    }
}

fn impulse_hypothesis<T: OHLCV>(
    config: &AnalyzerConfig,
    window: &[T],
    offset: usize,
    pivots: &[Pivot],
) -> Option<DetectedPattern> {
    let anchors = anchor_pivots(window, offset, pivots, 6)?;

    let wave1 = (anchors[1].price - anchors[0].price).abs();
    let wave3 = (anchors[3].price - anchors[2].price).abs();
    if wave3 < config.impulse_wave3_gate.get() * wave1 {
        debug!(wave1, wave3, "impulse hypothesis rejected by wave 3 gate");
        return None;
    }

    Some(evaluate(
        config,
        PatternType::Impulse,
        &anchors,
        &IMPULSE_CONFIDENCE,
    ))
}

fn corrective_hypothesis<T: OHLCV>(
    config: &AnalyzerConfig,
    window: &[T],
    offset: usize,
    pivots: &[Pivot],
) -> Option<DetectedPattern> {
    let anchors = anchor_pivots(window, offset, pivots, 4)?;

    let wave_a = (anchors[1].price - anchors[0].price).abs();
    let wave_b = (anchors[2].price - anchors[1].price).abs();
    if wave_b > config.corrective_b_gate.get() * wave_a {
        debug!(wave_a, wave_b, "corrective hypothesis rejected by wave B gate");
        return None;
    }

    Some(evaluate(
        config,
        PatternType::Corrective(None),
        &anchors,
        &CORRECTIVE_CONFIDENCE,
    ))
}

/// Pick `needed` alternating pivots. One short is tolerated by anchoring
/// point 0 on the window's first bar, on the side opposite the first pivot.
fn anchor_pivots<T: OHLCV>(
    window: &[T],
    offset: usize,
    pivots: &[Pivot],
    needed: usize,
) -> Option<Vec<Pivot>> {
    let mut anchors = extract_alternating(pivots, needed - 1);
    if anchors.len() + 1 == needed {
        let first = anchors.first()?;
        let bar = window.first()?;
        let origin = match first.pivot_type {
            PivotType::High => Pivot {
                index: offset,
                price: bar.low(),
                time: bar.timestamp().unwrap_or(offset as i64),
                pivot_type: PivotType::Low,
            },
            PivotType::Low => Pivot {
                index: offset,
                price: bar.high(),
                time: bar.timestamp().unwrap_or(offset as i64),
                pivot_type: PivotType::High,
            },
        };
        anchors.insert(0, origin);
    }

    if anchors.len() < needed {
        debug!(needed, found = anchors.len(), "not enough alternating pivots");
        return None;
    }
    anchors.truncate(needed);
    Some(anchors)
}

fn evaluate(
    config: &AnalyzerConfig,
    requested: PatternType,
    anchors: &[Pivot],
    model: &ConfidenceModel,
) -> DetectedPattern {
    let labels = config.degree.labels(requested);
    let points: Vec<WavePoint> = anchors
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(i, (pivot, label))| {
            WavePoint::from_pivot(pivot, *label).with_correction(requested.is_corrective() && i > 0)
        })
        .collect();

    let result = validate(requested, &points);
    let fibonacci_score = result.fib_score();
    let confidence = model.score(result.is_valid, fibonacci_score);
    debug!(
        pattern = %requested,
        valid = result.is_valid,
        fibonacci_score,
        confidence,
        "evaluated hypothesis"
    );

    let start_index = points.first().map_or(0, |p| p.index);
    let end_index = points.last().map_or(0, |p| p.index);
    DetectedPattern {
        pattern_type: result.detected_type.unwrap_or(requested),
        subtype: result.detected_subtype,
        points,
        is_valid: result.is_valid,
        confidence,
        fibonacci_score,
        start_index,
        end_index,
    }
}
