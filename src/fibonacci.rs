//! Fibonacci ratio scoring
//!
//! Each wave role carries a [`FibRule`]: a valid ratio range plus the
//! canonical targets inside it. [`score_wave`] rates an actual ratio on the
//! [`Quality`] scale by its relative error to the nearest target, with a soft
//! band just outside the range where ratios close to an edge target are
//! downgraded instead of rejected.

use serde::{Deserialize, Serialize};

// ============================================================
// TOLERANCES
// ============================================================

/// Relative error to the nearest target for an excellent rating
pub const EXCELLENT_TOLERANCE: f64 = 0.02;
/// Relative error to the nearest target for a good rating
pub const GOOD_TOLERANCE: f64 = 0.04;
/// Relative error to the nearest target for an ok rating
pub const OK_TOLERANCE: f64 = 0.06;
/// Largest relative overflow past a range edge that can still be forgiven
pub const SOFT_OVERFLOW: f64 = 0.05;
/// Max relative error to an edge target for overflow forgiveness
pub const EDGE_PROXIMITY: f64 = 0.06;

// ============================================================
// QUALITY
// ============================================================

/// How closely an actual ratio matches a canonical target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Excellent,
    Good,
    Ok,
    Valid,
    Poor,
}

impl Quality {
    /// Rating earned by a ratio inside its valid range
    pub fn from_error(relative_error: f64) -> Self {
        match relative_error {
            e if e <= EXCELLENT_TOLERANCE => Quality::Excellent,
            e if e <= GOOD_TOLERANCE => Quality::Good,
            e if e <= OK_TOLERANCE => Quality::Ok,
            _ => Quality::Valid,
        }
    }

    /// One tier down, bottoming out at valid
    pub fn downgrade(self) -> Self {
        match self {
            Quality::Excellent => Quality::Good,
            Quality::Good => Quality::Ok,
            Quality::Ok | Quality::Valid => Quality::Valid,
            Quality::Poor => Quality::Poor,
        }
    }

    #[inline]
    pub fn is_poor(self) -> bool {
        matches!(self, Quality::Poor)
    }
}

// ============================================================
// RULE TABLE
// ============================================================

/// Valid range and canonical targets for one wave role
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FibRule {
    pub valid_min: f64,
    pub valid_max: f64,
    /// Ascending, all inside `valid_min..=valid_max`
    pub ideal_targets: &'static [f64],
}

/// Where a ratio sits relative to a rule's valid range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFit {
    Inside,
    /// Outside by at most [`SOFT_OVERFLOW`]
    SoftOverflow { near_edge_target: bool },
    HardOverflow,
}

impl FibRule {
    #[inline]
    pub fn contains(&self, ratio: f64) -> bool {
        (self.valid_min..=self.valid_max).contains(&ratio)
    }

    /// Nearest target and the relative error to it
    pub fn nearest_target(&self, ratio: f64) -> (f64, f64) {
        self.ideal_targets
            .iter()
            .map(|&target| (target, relative_error(ratio, target)))
            .fold((self.ideal_targets[0], f64::INFINITY), |best, cur| {
                if cur.1 < best.1 {
                    cur
                } else {
                    best
                }
            })
    }

    /// First and last targets
    #[inline]
    pub fn edge_targets(&self) -> (f64, f64) {
        let first = self.ideal_targets[0];
        let last = self.ideal_targets[self.ideal_targets.len() - 1];
        (first, last)
    }

    /// Relative distance outside the valid range, 0.0 inside it
    pub fn overflow(&self, ratio: f64) -> f64 {
        if ratio > self.valid_max {
            (ratio - self.valid_max) / self.valid_max
        } else if ratio < self.valid_min {
            (self.valid_min - ratio) / self.valid_min
        } else {
            0.0
        }
    }

    pub fn fit(&self, ratio: f64) -> RangeFit {
        if self.contains(ratio) {
            return RangeFit::Inside;
        }
        if self.overflow(ratio) > SOFT_OVERFLOW {
            return RangeFit::HardOverflow;
        }
        let (first, last) = self.edge_targets();
        let near_edge_target = relative_error(ratio, first) <= EDGE_PROXIMITY
            || relative_error(ratio, last) <= EDGE_PROXIMITY;
        RangeFit::SoftOverflow { near_edge_target }
    }
}

#[inline]
fn relative_error(actual: f64, target: f64) -> f64 {
    (actual - target).abs() / target
}

const WAVE2: FibRule = FibRule {
    valid_min: 0.236,
    valid_max: 0.886,
    ideal_targets: &[0.382, 0.5, 0.618, 0.786],
};
const WAVE3: FibRule = FibRule {
    valid_min: 1.0,
    valid_max: 2.618,
    ideal_targets: &[1.272, 1.618, 2.0, 2.618],
};
const WAVE4: FibRule = FibRule {
    valid_min: 0.146,
    valid_max: 0.5,
    ideal_targets: &[0.236, 0.382, 0.5],
};
const WAVE5: FibRule = FibRule {
    valid_min: 0.382,
    valid_max: 1.618,
    ideal_targets: &[0.618, 1.0, 1.618],
};
const WAVE_B_ZIGZAG: FibRule = FibRule {
    valid_min: 0.236,
    valid_max: 0.886,
    ideal_targets: &[0.382, 0.5, 0.618, 0.786],
};
const WAVE_B_FLAT: FibRule = FibRule {
    valid_min: 0.9,
    valid_max: 1.382,
    ideal_targets: &[0.9, 1.0, 1.236, 1.382],
};
const WAVE_C_ZIGZAG: FibRule = FibRule {
    valid_min: 0.618,
    valid_max: 1.618,
    ideal_targets: &[0.618, 1.0, 1.272, 1.618],
};
const WAVE_C_FLAT: FibRule = FibRule {
    valid_min: 0.9,
    valid_max: 1.618,
    ideal_targets: &[1.0, 1.272, 1.618],
};
const TRIANGLE: FibRule = FibRule {
    valid_min: 0.382,
    valid_max: 0.886,
    ideal_targets: &[0.5, 0.618, 0.786],
};
const WAVE2_DIAGONAL: FibRule = FibRule {
    valid_min: 0.5,
    valid_max: 0.886,
    ideal_targets: &[0.618, 0.786],
};
const WAVE3_DIAGONAL: FibRule = FibRule {
    valid_min: 0.5,
    valid_max: 1.618,
    ideal_targets: &[0.618, 1.0, 1.618],
};
const WAVE4_DIAGONAL: FibRule = FibRule {
    valid_min: 0.5,
    valid_max: 0.886,
    ideal_targets: &[0.618, 0.786],
};
const WAVE5_DIAGONAL: FibRule = FibRule {
    valid_min: 0.382,
    valid_max: 1.382,
    ideal_targets: &[0.618, 1.0, 1.236],
};

/// Role a wave plays inside its pattern, selecting its [`FibRule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveRole {
    #[serde(rename = "wave2")]
    Wave2,
    #[serde(rename = "wave3")]
    Wave3,
    #[serde(rename = "wave4")]
    Wave4,
    #[serde(rename = "wave5")]
    Wave5,
    #[serde(rename = "waveB_zigzag")]
    WaveBZigzag,
    #[serde(rename = "waveB_flat")]
    WaveBFlat,
    #[serde(rename = "waveC_zigzag")]
    WaveCZigzag,
    #[serde(rename = "waveC_flat")]
    WaveCFlat,
    #[serde(rename = "triangle")]
    Triangle,
    #[serde(rename = "wave2_diagonal")]
    Wave2Diagonal,
    #[serde(rename = "wave3_diagonal")]
    Wave3Diagonal,
    #[serde(rename = "wave4_diagonal")]
    Wave4Diagonal,
    #[serde(rename = "wave5_diagonal")]
    Wave5Diagonal,
}

impl WaveRole {
    pub const ALL: [WaveRole; 13] = [
        WaveRole::Wave2,
        WaveRole::Wave3,
        WaveRole::Wave4,
        WaveRole::Wave5,
        WaveRole::WaveBZigzag,
        WaveRole::WaveBFlat,
        WaveRole::WaveCZigzag,
        WaveRole::WaveCFlat,
        WaveRole::Triangle,
        WaveRole::Wave2Diagonal,
        WaveRole::Wave3Diagonal,
        WaveRole::Wave4Diagonal,
        WaveRole::Wave5Diagonal,
    ];

    pub fn rule(self) -> &'static FibRule {
        match self {
            WaveRole::Wave2 => &WAVE2,
            WaveRole::Wave3 => &WAVE3,
            WaveRole::Wave4 => &WAVE4,
            WaveRole::Wave5 => &WAVE5,
            WaveRole::WaveBZigzag => &WAVE_B_ZIGZAG,
            WaveRole::WaveBFlat => &WAVE_B_FLAT,
            WaveRole::WaveCZigzag => &WAVE_C_ZIGZAG,
            WaveRole::WaveCFlat => &WAVE_C_FLAT,
            WaveRole::Triangle => &TRIANGLE,
            WaveRole::Wave2Diagonal => &WAVE2_DIAGONAL,
            WaveRole::Wave3Diagonal => &WAVE3_DIAGONAL,
            WaveRole::Wave4Diagonal => &WAVE4_DIAGONAL,
            WaveRole::Wave5Diagonal => &WAVE5_DIAGONAL,
        }
    }
}

// ============================================================
// SCORING
// ============================================================

/// Rating of one ratio against its role's rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveScore {
    pub quality: Quality,
    pub ideal_ratio: f64,
    pub valid_min: f64,
    pub valid_max: f64,
}

impl WaveScore {
    fn poor(rule: &FibRule) -> Self {
        Self {
            quality: Quality::Poor,
            ideal_ratio: rule.ideal_targets[0],
            valid_min: rule.valid_min,
            valid_max: rule.valid_max,
        }
    }
}

/// Decision table for the final tier.
///
/// | fit                            | quality                        |
/// |--------------------------------|--------------------------------|
/// | inside                         | tolerance band of `error`      |
/// | soft overflow, near edge target| tolerance band, one tier lower |
/// | soft overflow, no edge target  | poor                           |
/// | hard overflow                  | poor                           |
pub fn decide(fit: RangeFit, nearest_error: f64) -> Quality {
    match fit {
        RangeFit::Inside => Quality::from_error(nearest_error),
        RangeFit::SoftOverflow {
            near_edge_target: true,
        } => Quality::from_error(nearest_error).downgrade(),
        RangeFit::SoftOverflow {
            near_edge_target: false,
        }
        | RangeFit::HardOverflow => Quality::Poor,
    }
}

/// Rate an actual wave-length ratio for a role. Total over all inputs:
/// non-finite ratios rate poor.
pub fn score_wave(actual: f64, role: WaveRole) -> WaveScore {
    let rule = role.rule();
    if !actual.is_finite() {
        return WaveScore::poor(rule);
    }

    let (ideal_ratio, error) = rule.nearest_target(actual);
    WaveScore {
        quality: decide(rule.fit(actual), error),
        ideal_ratio,
        valid_min: rule.valid_min,
        valid_max: rule.valid_max,
    }
}

/// Fraction of qualities better than poor, 0.0 for an empty set
pub fn fib_score(qualities: impl IntoIterator<Item = Quality>) -> f64 {
    let (scored, passing) = qualities
        .into_iter()
        .fold((0usize, 0usize), |(n, ok), q| (n + 1, ok + usize::from(!q.is_poor())));
    if scored == 0 {
        return 0.0;
    }
    passing as f64 / scored as f64
}

/// One measured wave ratio as reported in a validation result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FibonacciRatio {
    /// Label of the measured wave ("2", "B", ...)
    pub wave: &'static str,
    pub role: WaveRole,
    pub ratio: f64,
    pub quality: Quality,
    pub ideal_ratio: f64,
    pub valid_min: f64,
    pub valid_max: f64,
}

impl FibonacciRatio {
    /// Measure `length / reference` for a role. A zero-length reference
    /// wave yields ratio 0.0 rated poor.
    pub fn measure(wave: &'static str, role: WaveRole, length: f64, reference: f64) -> Self {
        let ratio = if reference > 0.0 {
            length / reference
        } else {
            f64::NAN
        };

        if !ratio.is_finite() {
            let score = WaveScore::poor(role.rule());
            return Self::from_score(wave, role, 0.0, score);
        }
        Self::from_score(wave, role, ratio, score_wave(ratio, role))
    }

    fn from_score(wave: &'static str, role: WaveRole, ratio: f64, score: WaveScore) -> Self {
        Self {
            wave,
            role,
            ratio,
            quality: score.quality,
            ideal_ratio: score.ideal_ratio,
            valid_min: score.valid_min,
            valid_max: score.valid_max,
        }
    }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table_is_well_formed() {
        for role in WaveRole::ALL {
            let rule = role.rule();
            assert!(rule.valid_min > 0.0, "{role:?}");
            assert!(rule.valid_min < rule.valid_max, "{role:?}");
            assert!(!rule.ideal_targets.is_empty(), "{role:?}");
            for pair in rule.ideal_targets.windows(2) {
                assert!(pair[0] < pair[1], "{role:?} targets not ascending");
            }
            for &t in rule.ideal_targets {
                assert!(rule.contains(t), "{role:?} target {t} outside range");
            }
        }
    }

    #[test]
    fn test_tolerance_bands() {
        assert_eq!(Quality::from_error(0.0), Quality::Excellent);
        assert_eq!(Quality::from_error(0.02), Quality::Excellent);
        assert_eq!(Quality::from_error(0.03), Quality::Good);
        assert_eq!(Quality::from_error(0.05), Quality::Ok);
        assert_eq!(Quality::from_error(0.08), Quality::Valid);
        assert_eq!(Quality::from_error(0.5), Quality::Valid);
    }

    #[test]
    fn test_downgrade_ladder() {
        assert_eq!(Quality::Excellent.downgrade(), Quality::Good);
        assert_eq!(Quality::Good.downgrade(), Quality::Ok);
        assert_eq!(Quality::Ok.downgrade(), Quality::Valid);
        assert_eq!(Quality::Valid.downgrade(), Quality::Valid);
        assert_eq!(Quality::Poor.downgrade(), Quality::Poor);
    }

    #[test]
    fn test_decision_table() {
        assert_eq!(decide(RangeFit::Inside, 0.01), Quality::Excellent);
        assert_eq!(decide(RangeFit::Inside, 0.2), Quality::Valid);
        assert_eq!(
            decide(RangeFit::SoftOverflow { near_edge_target: true }, 0.01),
            Quality::Good
        );
        assert_eq!(
            decide(RangeFit::SoftOverflow { near_edge_target: true }, 0.05),
            Quality::Valid
        );
        assert_eq!(
            decide(RangeFit::SoftOverflow { near_edge_target: false }, 0.01),
            Quality::Poor
        );
        assert_eq!(decide(RangeFit::HardOverflow, 0.0), Quality::Poor);
    }

    #[test]
    fn test_range_fit() {
        let rule = WaveRole::WaveCZigzag.rule();
        assert_eq!(rule.fit(1.0), RangeFit::Inside);
        // 163% on a 161.8% ceiling: 0.74% over, next to the last target
        assert_eq!(
            rule.fit(1.63),
            RangeFit::SoftOverflow {
                near_edge_target: true
            }
        );
        assert_eq!(rule.fit(1.8), RangeFit::HardOverflow);

        // Soft overflow below the floor of a rule whose first target sits well inside
        let rule = WaveRole::Wave2.rule();
        assert_eq!(
            rule.fit(0.23),
            RangeFit::SoftOverflow {
                near_edge_target: false
            }
        );
    }

    #[test]
    fn test_score_wave_at_targets() {
        let score = score_wave(0.618, WaveRole::Wave2);
        assert_eq!(score.quality, Quality::Excellent);
        assert_eq!(score.ideal_ratio, 0.618);

        let score = score_wave(1.65, WaveRole::Wave3);
        assert_eq!(score.quality, Quality::Excellent);
        assert_eq!(score.ideal_ratio, 1.618);
    }

    #[test]
    fn test_score_wave_soft_overflow() {
        // 1.63 vs 1.618 is a 0.74% error, excellent in range, good after downgrade
        let score = score_wave(1.63, WaveRole::WaveCZigzag);
        assert_eq!(score.quality, Quality::Good);
        assert_eq!(score.ideal_ratio, 1.618);

        // 1.70 overflows by ~5.07%
        assert_eq!(score_wave(1.70, WaveRole::WaveCZigzag).quality, Quality::Poor);
    }

    #[test]
    fn test_score_wave_is_total() {
        assert_eq!(score_wave(f64::NAN, WaveRole::Wave4).quality, Quality::Poor);
        assert_eq!(
            score_wave(f64::INFINITY, WaveRole::Wave4).quality,
            Quality::Poor
        );
        assert_eq!(score_wave(0.0, WaveRole::Wave4).quality, Quality::Poor);
        assert_eq!(score_wave(-1.0, WaveRole::Wave4).quality, Quality::Poor);
    }

    #[test]
    fn test_measure_zero_reference() {
        let r = FibonacciRatio::measure("2", WaveRole::Wave2, 10.0, 0.0);
        assert_eq!(r.quality, Quality::Poor);
        assert_eq!(r.ratio, 0.0);
        assert!(r.ideal_ratio.is_finite());
    }

    #[test]
    fn test_fib_score() {
        assert_eq!(fib_score(Vec::<Quality>::new()), 0.0);
        assert_eq!(fib_score([Quality::Poor, Quality::Poor]), 0.0);
        assert_eq!(
            fib_score([Quality::Excellent, Quality::Valid, Quality::Poor, Quality::Ok]),
            0.75
        );
    }
}
