//! # wavecount - Elliott Wave validation and auto-detection
//!
//! Validates labelled Elliott Wave structures (impulse, corrective ABC,
//! triangle, diagonal) against their topological rules, scores each internal
//! wave against canonical Fibonacci targets, and scans raw OHLCV data for a
//! plausible impulse and corrective count.
//!
//! ## Quick Start
//!
//! ```rust
//! use wavecount::prelude::*;
//!
//! let points = [
//!     WavePoint::new(0, "0", 100.0, 0),
//!     WavePoint::new(10, "1", 150.0, 600),
//!     WavePoint::new(20, "2", 119.0, 1200),
//!     WavePoint::new(30, "3", 200.0, 1800),
//!     WavePoint::new(40, "4", 169.0, 2400),
//!     WavePoint::new(50, "5", 219.0, 3000),
//! ];
//!
//! let result = validate(PatternType::Impulse, &points);
//! assert!(result.is_valid);
//! assert_eq!(result.fibonacci_ratios[0].quality, Quality::Excellent);
//!
//! // Scan candles for pivots and a best-effort wave count
//! let candles: Vec<Candle> = vec![];
//! let analysis = auto_analyze(&candles, 0, 0);
//! assert!(analysis.patterns.is_empty());
//! ```

use serde::{Deserialize, Serialize};

pub mod analyzer;
pub mod degree;
pub mod fibonacci;
pub mod params;
pub mod pivots;
pub mod subtype;
pub mod validators;

pub mod prelude {
    pub use crate::{
        // Parallel
        analyze_parallel,
        // Orchestration
        auto_analyze,
        // Degrees
        degree::Degree,
        // Fibonacci scoring
        fibonacci::{fib_score, score_wave, FibRule, FibonacciRatio, Quality, WaveRole, WaveScore},
        // Parameters
        params::{get_factor, get_period, ParamMeta, ParamType, Parameterized},
        // Pivots
        pivots::{detect_pivots, extract_alternating, label_swings, StructurePoint, SwingLabel},
        // Validation
        validators::{validate, Violation, Warning},
        Analyzer,
        AnalyzerBuilder,
        AnalyzerConfig,
        AutoAnalysis,
        Candle,
        CorrectiveType,
        DetectedPattern,
        Factor,
        OHLCVExt,
        PatternType,
        Period,
        Pivot,
        PivotType,
        Result,
        ScanError,
        ScanResult,
        Subtype,
        Trend,
        ValidationResult,
        WaveError,
        WavePoint,
        OHLCV,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, WaveError>;

/// Errors raised by configuration and input checks.
///
/// Structural findings about a wave count are never errors; they are
/// reported inside [`ValidationResult`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum WaveError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid OHLCV at index {index}: {reason}")]
    InvalidOHLCV { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Strictly positive, finite multiplier
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Factor(f64);

impl Factor {
    /// Create a new Factor, validating the value is finite and > 0
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(WaveError::InvalidValue("Factor cannot be NaN or infinite"));
        }
        if value <= 0.0 {
            return Err(WaveError::InvalidValue("Factor must be > 0"));
        }
        Ok(Self(value))
    }

    /// Create a Factor from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Serialize for Factor {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> Deserialize<'de> for Factor {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Factor::new(value).map_err(serde::de::Error::custom)
    }
}

/// Period (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(WaveError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;

    /// Unix seconds. Bars without a timestamp fall back to their index.
    fn timestamp(&self) -> Option<i64> {
        None
    }
}

/// Extension trait with consistency checks for OHLCV data
pub trait OHLCVExt: OHLCV {
    /// Validate OHLCV data consistency
    fn validate(&self) -> Result<()> {
        if self.open().is_nan()
            || self.high().is_nan()
            || self.low().is_nan()
            || self.close().is_nan()
        {
            return Err(WaveError::InvalidOHLCV {
                index: 0,
                reason: "NaN in OHLCV",
            });
        }
        if self.open().is_infinite()
            || self.high().is_infinite()
            || self.low().is_infinite()
            || self.close().is_infinite()
        {
            return Err(WaveError::InvalidOHLCV {
                index: 0,
                reason: "Infinite value in OHLCV",
            });
        }
        if self.high() < self.low() {
            return Err(WaveError::InvalidOHLCV {
                index: 0,
                reason: "high < low",
            });
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

/// Plain candle record, as delivered by a market-data collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Unix seconds, ascending across a series
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl OHLCV for Candle {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn timestamp(&self) -> Option<i64> {
        Some(self.time)
    }
}

// ============================================================
// TREND
// ============================================================

/// Direction of the first leg of a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Trend of the move `from -> to`. A flat move counts as up.
    #[inline]
    pub fn of(from: f64, to: f64) -> Self {
        if to >= from {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    /// True if `a` lies strictly further along the trend than `b`
    #[inline]
    pub fn beyond(self, a: f64, b: f64) -> bool {
        match self {
            Trend::Up => a > b,
            Trend::Down => a < b,
        }
    }

    /// True if `a` reaches or passes `b` along the trend
    #[inline]
    pub fn reaches(self, a: f64, b: f64) -> bool {
        match self {
            Trend::Up => a >= b,
            Trend::Down => a <= b,
        }
    }
}

// ============================================================
// PIVOTS & WAVE POINTS
// ============================================================

/// Side of a swing pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotType {
    High,
    Low,
}

/// Local price extremum derived from a candle series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub index: usize,
    pub price: f64,
    pub time: i64,
    #[serde(rename = "type")]
    pub pivot_type: PivotType,
}

/// Labelled anchor point of a wave count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WavePoint {
    pub index: usize,
    pub label: String,
    pub price: f64,
    pub time: i64,
    #[serde(default)]
    pub is_correction: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapped_to_high: Option<bool>,
}

impl WavePoint {
    pub fn new(index: usize, label: impl Into<String>, price: f64, time: i64) -> Self {
        Self {
            index,
            label: label.into(),
            price,
            time,
            is_correction: false,
            snapped_to_high: None,
        }
    }

    pub fn with_correction(mut self, is_correction: bool) -> Self {
        self.is_correction = is_correction;
        self
    }

    /// Anchor a point on a pivot, recording which side it was snapped to
    pub fn from_pivot(pivot: &Pivot, label: impl Into<String>) -> Self {
        Self {
            index: pivot.index,
            label: label.into(),
            price: pivot.price,
            time: pivot.time,
            is_correction: false,
            snapped_to_high: Some(pivot.pivot_type == PivotType::High),
        }
    }
}

// ============================================================
// PATTERN TYPES
// ============================================================

/// Corrective ABC flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrectiveType {
    Zigzag,
    Flat,
}

/// Pattern family requested from or reported by validation.
///
/// `Corrective(None)` asks the validator to classify zigzag vs flat itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PatternType {
    Impulse,
    Corrective(Option<CorrectiveType>),
    Triangle,
    Diagonal,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Impulse => "impulse",
            PatternType::Corrective(None) => "corrective",
            PatternType::Corrective(Some(CorrectiveType::Zigzag)) => "zigzag",
            PatternType::Corrective(Some(CorrectiveType::Flat)) => "flat",
            PatternType::Triangle => "triangle",
            PatternType::Diagonal => "diagonal",
        }
    }

    /// Number of labelled points the family requires
    pub fn point_count(&self) -> usize {
        match self {
            PatternType::Impulse | PatternType::Triangle | PatternType::Diagonal => 6,
            PatternType::Corrective(_) => 4,
        }
    }

    #[inline]
    pub fn is_corrective(&self) -> bool {
        matches!(self, PatternType::Corrective(_))
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PatternType {
    type Err = WaveError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "impulse" => Ok(PatternType::Impulse),
            "corrective" | "abc" => Ok(PatternType::Corrective(None)),
            "zigzag" => Ok(PatternType::Corrective(Some(CorrectiveType::Zigzag))),
            "flat" => Ok(PatternType::Corrective(Some(CorrectiveType::Flat))),
            "triangle" => Ok(PatternType::Triangle),
            "diagonal" => Ok(PatternType::Diagonal),
            other => Err(WaveError::InvalidConfig(format!(
                "unknown pattern type '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for PatternType {
    type Error = WaveError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PatternType> for String {
    fn from(value: PatternType) -> Self {
        value.as_str().to_string()
    }
}

/// Sub-classification of a detected pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subtype {
    // Flats
    Regular,
    Expanded,
    Running,
    // Diagonals and triangles
    Contracting,
    Expanding,
    Parallel,
}

// ============================================================
// RESULTS
// ============================================================

/// Outcome of validating one labelled structure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<validators::Violation>,
    pub warnings: Vec<validators::Warning>,
    pub fibonacci_ratios: Vec<fibonacci::FibonacciRatio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_type: Option<PatternType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_subtype: Option<Subtype>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            fibonacci_ratios: Vec::new(),
            detected_type: None,
            detected_subtype: None,
        }
    }
}

impl ValidationResult {
    /// Short-circuit result for a structure that cannot be evaluated at all
    pub fn rejected(violation: validators::Violation) -> Self {
        Self {
            is_valid: false,
            errors: vec![violation],
            ..Self::default()
        }
    }

    /// Record a hard-rule breach
    pub fn violate(&mut self, violation: validators::Violation) {
        self.is_valid = false;
        self.errors.push(violation);
    }

    /// Record an advisory deviation
    pub fn warn(&mut self, warning: validators::Warning) {
        self.warnings.push(warning);
    }

    /// Fraction of scored waves rated better than poor
    pub fn fib_score(&self) -> f64 {
        fibonacci::fib_score(self.fibonacci_ratios.iter().map(|r| r.quality))
    }
}

/// Hypothesis proposed by the auto-analyzer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPattern {
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<Subtype>,
    pub points: Vec<WavePoint>,
    pub is_valid: bool,
    /// 0.0..=1.0
    pub confidence: f64,
    /// Fraction of waves rated better than poor
    pub fibonacci_score: f64,
    pub start_index: usize,
    pub end_index: usize,
}

/// Output of one auto-analysis window
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutoAnalysis {
    pub patterns: Vec<DetectedPattern>,
    pub pivots: Vec<Pivot>,
    /// Best hypothesis confidence, 0.0 when nothing was proposed
    pub confidence: f64,
}

// ============================================================
// ANALYZER
// ============================================================

/// Tunables of the auto-analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Lower bound of the pivot lookback
    pub min_lookback: Period,
    /// Window length divisor used to scale the lookback
    pub lookback_divisor: Period,
    /// Impulse gate: wave 3 must be at least this multiple of wave 1
    pub impulse_wave3_gate: Factor,
    /// Corrective gate: wave B may be at most this multiple of wave A
    pub corrective_b_gate: Factor,
    /// Degree used to label proposed points
    pub degree: degree::Degree,
    /// Check candles for NaN/inf/high<low before scanning
    pub validate_data: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_lookback: Period::new_const(3),
            lookback_divisor: Period::new_const(50),
            impulse_wave3_gate: Factor::new_const(0.5),
            corrective_b_gate: Factor::new_const(1.2),
            degree: degree::Degree::Minor,
            validate_data: false,
        }
    }
}

impl AnalyzerConfig {
    /// Pivot lookback for a window of `len` bars
    #[inline]
    pub fn lookback_for(&self, len: usize) -> usize {
        self.min_lookback
            .get()
            .max(len / self.lookback_divisor.get())
    }

    /// Check every tunable against its parameter range
    pub fn validate(&self) -> Result<()> {
        use params::Parameterized;

        for meta in Self::param_meta() {
            meta.validate(self.value_of(meta.name))?;
        }
        Ok(())
    }
}

/// Auto-analysis engine holding a validated configuration
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze the inclusive window `start..=end` of `bars`.
    ///
    /// Fails only when data validation is enabled and a bar in the window
    /// is malformed.
    pub fn analyze<T: OHLCV>(&self, bars: &[T], start: usize, end: usize) -> Result<AutoAnalysis> {
        if self.config.validate_data {
            self.validate_bars(bars, start, end)?;
        }
        Ok(analyzer::auto_analyze_with(&self.config, bars, start, end))
    }

    fn validate_bars<T: OHLCV>(&self, bars: &[T], start: usize, end: usize) -> Result<()> {
        let Some(range) = analyzer::window_range(bars.len(), start, end) else {
            return Ok(());
        };
        for (i, bar) in bars[range.clone()].iter().enumerate() {
            bar.validate().map_err(|e| match e {
                WaveError::InvalidOHLCV { reason, .. } => WaveError::InvalidOHLCV {
                    index: range.start + i,
                    reason,
                },
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Analyze the inclusive window `start..=end` with the default configuration
pub fn auto_analyze<T: OHLCV>(bars: &[T], start: usize, end: usize) -> AutoAnalysis {
    analyzer::auto_analyze_with(&AnalyzerConfig::default(), bars, start, end)
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating Analyzer instances
#[derive(Debug, Clone, Default)]
pub struct AnalyzerBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_lookback(mut self, period: Period) -> Self {
        self.config.min_lookback = period;
        self
    }

    pub fn lookback_divisor(mut self, period: Period) -> Self {
        self.config.lookback_divisor = period;
        self
    }

    pub fn impulse_wave3_gate(mut self, gate: Factor) -> Self {
        self.config.impulse_wave3_gate = gate;
        self
    }

    pub fn corrective_b_gate(mut self, gate: Factor) -> Self {
        self.config.corrective_b_gate = gate;
        self
    }

    pub fn degree(mut self, degree: degree::Degree) -> Self {
        self.config.degree = degree;
        self
    }

    /// Enable/disable data validation
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.config.validate_data = enable;
        self
    }

    /// Build the analyzer
    pub fn build(self) -> Result<Analyzer> {
        Analyzer::new(self.config)
    }
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Result of analyzing a single instrument window
#[derive(Debug)]
pub struct ScanResult {
    pub symbol: String,
    pub analysis: AutoAnalysis,
}

/// Error from analyzing a single instrument window
#[derive(Debug)]
pub struct ScanError {
    pub symbol: String,
    pub error: WaveError,
}

/// Parallel analysis of multiple `(symbol, bars, start, end)` windows
pub fn analyze_parallel<'a, T, I>(
    analyzer: &Analyzer,
    instruments: I,
) -> (Vec<ScanResult>, Vec<ScanError>)
where
    T: OHLCV + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T], usize, usize)>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, bars, start, end)| {
            analyzer
                .analyze(bars, start, end)
                .map(|analysis| ScanResult {
                    symbol: symbol.to_string(),
                    analysis,
                })
                .map_err(|error| ScanError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test OHLCV bar without a timestamp
    #[derive(Debug, Clone)]
    struct Bar {
        h: f64,
        l: f64,
    }

    impl OHLCV for Bar {
        fn open(&self) -> f64 {
            self.l
        }

        fn high(&self) -> f64 {
            self.h
        }

        fn low(&self) -> f64 {
            self.l
        }

        fn close(&self) -> f64 {
            self.h
        }

        fn volume(&self) -> f64 {
            1000.0
        }
    }

    #[test]
    fn test_factor_validation() {
        assert!(Factor::new(0.5).is_ok());
        assert!(Factor::new(1.2).is_ok());
        assert!(Factor::new(0.0).is_err());
        assert!(Factor::new(-0.1).is_err());
        assert!(Factor::new(f64::NAN).is_err());
        assert!(Factor::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(1).is_ok());
        assert!(Period::new(100).is_ok());
        assert!(Period::new(0).is_err());
    }

    #[test]
    fn test_ohlcv_validate() {
        assert!(Candle::new(0, 10.0, 12.0, 9.0, 11.0, 1.0).validate().is_ok());
        assert!(Candle::new(0, 10.0, 8.0, 9.0, 11.0, 1.0).validate().is_err());
        assert!(Candle::new(0, f64::NAN, 12.0, 9.0, 11.0, 1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_trend_helpers() {
        assert_eq!(Trend::of(100.0, 150.0), Trend::Up);
        assert_eq!(Trend::of(100.0, 50.0), Trend::Down);
        assert_eq!(Trend::of(100.0, 100.0), Trend::Up);
        assert!(Trend::Up.beyond(2.0, 1.0));
        assert!(!Trend::Up.beyond(1.0, 1.0));
        assert!(Trend::Up.reaches(1.0, 1.0));
        assert!(Trend::Down.beyond(1.0, 2.0));
        assert!(Trend::Down.reaches(2.0, 2.0));
    }

    #[test]
    fn test_pattern_type_strings() {
        for s in ["impulse", "corrective", "zigzag", "flat", "triangle", "diagonal"] {
            let parsed: PatternType = s.parse().unwrap();
            assert_eq!(parsed.as_str(), s);
        }
        assert!("wedge".parse::<PatternType>().is_err());
        assert_eq!(PatternType::Impulse.point_count(), 6);
        assert_eq!(PatternType::Corrective(None).point_count(), 4);
    }

    #[test]
    fn test_lookback_scaling() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.lookback_for(10), 3);
        assert_eq!(config.lookback_for(149), 3);
        assert_eq!(config.lookback_for(200), 4);
        assert_eq!(config.lookback_for(1000), 20);
    }

    #[test]
    fn test_builder_rejects_out_of_range() {
        assert!(AnalyzerBuilder::new().build().is_ok());
        let err = AnalyzerBuilder::new()
            .corrective_b_gate(Factor::new(5.0).unwrap())
            .build();
        assert!(matches!(err, Err(WaveError::OutOfRange { .. })));
    }

    #[test]
    fn test_validate_data_reports_absolute_index() {
        let mut bars: Vec<Bar> = (0..20).map(|_| Bar { h: 11.0, l: 9.0 }).collect();
        bars[12] = Bar { h: 8.0, l: 9.0 };

        let analyzer = AnalyzerBuilder::new().validate_data(true).build().unwrap();
        match analyzer.analyze(&bars, 5, 15) {
            Err(WaveError::InvalidOHLCV { index, .. }) => assert_eq!(index, 12),
            other => panic!("expected InvalidOHLCV, got {other:?}"),
        }

        // Outside the window the bad bar is not looked at
        assert!(analyzer.analyze(&bars, 0, 10).is_ok());
    }

    #[test]
    fn test_empty_analysis() {
        let bars: Vec<Bar> = vec![];
        let analysis = auto_analyze(&bars, 0, 0);
        assert!(analysis.patterns.is_empty());
        assert!(analysis.pivots.is_empty());
        assert_eq!(analysis.confidence, 0.0);
    }
}
