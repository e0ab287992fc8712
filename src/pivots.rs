//! Swing pivot detection
//!
//! [`detect_pivots`] marks strict local extrema over a symmetric lookback,
//! [`extract_alternating`] reduces them to the high/low alternation a wave
//! count needs, and [`label_swings`] tags each pivot against the previous
//! pivot of the same side.

use serde::Serialize;

use crate::{Pivot, PivotType, OHLCV};

/// Find swing highs and lows.
///
/// Bar `i` (with `lookback <= i < n - lookback`) is a high pivot when its
/// high is strictly greater than every other high in `i-lookback..=i+lookback`,
/// and a low pivot under the mirrored rule on lows. A bar may be both; the
/// high is emitted first. A `lookback` of 0 is treated as 1.
pub fn detect_pivots<T: OHLCV>(bars: &[T], lookback: usize) -> Vec<Pivot> {
    let lookback = lookback.max(1);
    let n = bars.len();
    if n <= 2 * lookback {
        return Vec::new();
    }

    let mut pivots = Vec::new();
    for i in lookback..n - lookback {
        let bar = &bars[i];
        let neighbours = (i - lookback..=i + lookback).filter(|&j| j != i);

        let high = bar.high();
        if neighbours.clone().all(|j| bars[j].high() < high) {
            pivots.push(pivot_at(bar, i, high, PivotType::High));
        }

        let low = bar.low();
        if neighbours.clone().all(|j| bars[j].low() > low) {
            pivots.push(pivot_at(bar, i, low, PivotType::Low));
        }
    }

    pivots
}

#[inline]
fn pivot_at<T: OHLCV>(bar: &T, index: usize, price: f64, pivot_type: PivotType) -> Pivot {
    Pivot {
        index,
        price,
        time: bar.timestamp().unwrap_or(index as i64),
        pivot_type,
    }
}

/// Reduce `pivots` to a strictly alternating subsequence of at most
/// `min_count + 1` pivots.
///
/// Seeds with the first pivot and keeps each later pivot whose side differs
/// from the last kept one. The result may be shorter than requested.
pub fn extract_alternating(pivots: &[Pivot], min_count: usize) -> Vec<Pivot> {
    let wanted = min_count + 1;
    let mut out: Vec<Pivot> = Vec::with_capacity(wanted);

    for pivot in pivots {
        if out.len() >= wanted {
            break;
        }
        match out.last() {
            Some(last) if last.pivot_type == pivot.pivot_type => {}
            _ => out.push(*pivot),
        }
    }

    out
}

/// Market-structure tag of a pivot relative to the previous same-side pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SwingLabel {
    #[serde(rename = "HH")]
    HigherHigh,
    #[serde(rename = "LH")]
    LowerHigh,
    #[serde(rename = "HL")]
    HigherLow,
    #[serde(rename = "LL")]
    LowerLow,
}

impl SwingLabel {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, SwingLabel::HigherHigh | SwingLabel::HigherLow)
    }
}

/// Pivot with its swing-structure tag
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StructurePoint {
    #[serde(flatten)]
    pub pivot: Pivot,
    pub label: SwingLabel,
}

/// Tag every pivot that has a predecessor on its own side.
///
/// Highs become HH when strictly above the previous high, otherwise LH;
/// lows become HL when strictly above the previous low, otherwise LL.
/// The first high and the first low carry no tag and are skipped.
pub fn label_swings(pivots: &[Pivot]) -> Vec<StructurePoint> {
    let mut last_high: Option<f64> = None;
    let mut last_low: Option<f64> = None;
    let mut out = Vec::new();

    for pivot in pivots {
        let (previous, higher, lower) = match pivot.pivot_type {
            PivotType::High => (&mut last_high, SwingLabel::HigherHigh, SwingLabel::LowerHigh),
            PivotType::Low => (&mut last_low, SwingLabel::HigherLow, SwingLabel::LowerLow),
        };
        if let Some(prev) = *previous {
            let label = if pivot.price > prev { higher } else { lower };
            out.push(StructurePoint {
                pivot: *pivot,
                label,
            });
        }
        *previous = Some(pivot.price);
    }

    out
}

// ============================================================
// TESTS
// ============================================================
