//! Parameter metadata for the auto-analyzer
//!
//! This module describes the analyzer's tunables, enabling:
//! - Grid search over lookback and plausibility gates
//! - Parameter documentation
//! - Building a configuration from loosely-typed key/value input
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use wavecount::prelude::*;
//!
//! for param in AnalyzerConfig::param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//!
//! let mut params = HashMap::new();
//! params.insert("min_lookback", 5.0);
//! let config = AnalyzerConfig::with_params(&params).unwrap();
//! assert_eq!(config.min_lookback.get(), 5);
//! ```

use std::collections::HashMap;

use crate::{AnalyzerConfig, Factor, Period, Result, WaveError};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Positive multiplier
  Factor,
  /// Period value (positive integer)
  Period,
}

/// Metadata for a single tunable
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "min_lookback")
  pub name: &'static str,
  /// Parameter type (Factor or Period)
  pub param_type: ParamType,
  /// Default value
  pub default: f64,
  /// Range for optimization: (min, max, step)
  pub range: (f64, f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  /// Create a new ParamMeta for a Factor parameter
  pub const fn factor(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Factor, default, range, description }
  }

  /// Create a new ParamMeta for a Period parameter
  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    let mut values = Vec::new();
    let mut i = 0u32;
    loop {
      let v = min + step * f64::from(i);
      if v > max + f64::EPSILON {
        break;
      }
      values.push(v);
      i += 1;
    }
    values
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if value < min || value > max {
      return Err(WaveError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Factor => Ok(()),
      ParamType::Period => {
        if value < 1.0 || value.fract() != 0.0 {
          return Err(WaveError::InvalidValue("Period must be a positive integer"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// PARAMETERIZED TRAIT
// ============================================================

/// Trait for configurations that support parameterization
pub trait Parameterized: Sized {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Creates a configuration from a HashMap
  ///
  /// Missing parameters use their default values.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;
}

const ANALYZER_PARAMS: [ParamMeta; 4] = [
  ParamMeta::period("min_lookback", 3.0, (1.0, 20.0, 1.0), "Lower bound of the pivot lookback"),
  ParamMeta::period(
    "lookback_divisor",
    50.0,
    (10.0, 200.0, 10.0),
    "Window length divided by this scales the pivot lookback",
  ),
  ParamMeta::factor(
    "impulse_wave3_gate",
    0.5,
    (0.1, 1.0, 0.1),
    "Minimum wave 3 / wave 1 length before an impulse is validated",
  ),
  ParamMeta::factor(
    "corrective_b_gate",
    1.2,
    (0.5, 1.618, 0.1),
    "Maximum wave B / wave A length before a correction is validated",
  ),
];

impl Parameterized for AnalyzerConfig {
  fn param_meta() -> &'static [ParamMeta] {
    &ANALYZER_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    let config = AnalyzerConfig {
      min_lookback: get_period(params, "min_lookback", 3)?,
      lookback_divisor: get_period(params, "lookback_divisor", 50)?,
      impulse_wave3_gate: get_factor(params, "impulse_wave3_gate", 0.5)?,
      corrective_b_gate: get_factor(params, "corrective_b_gate", 1.2)?,
      ..AnalyzerConfig::default()
    };
    config.validate()?;
    Ok(config)
  }
}

impl AnalyzerConfig {
  /// Current value of a named tunable, NaN for unknown names
  pub fn value_of(&self, name: &str) -> f64 {
    match name {
      "min_lookback" => self.min_lookback.get() as f64,
      "lookback_divisor" => self.lookback_divisor.get() as f64,
      "impulse_wave3_gate" => self.impulse_wave3_gate.get(),
      "corrective_b_gate" => self.corrective_b_gate.get(),
      _ => f64::NAN,
    }
  }
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a Factor from params with default fallback
pub fn get_factor(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Factor> {
  let value = params.get(key).copied().unwrap_or(default);
  Factor::new(value)
}

/// Helper to get a Period from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if value < 0.0 || value.fract() != 0.0 {
    return Err(WaveError::InvalidValue("Period must be a positive integer"));
  }
  Period::new(value as usize)
}

// ============================================================
// TESTS
// ============================================================
