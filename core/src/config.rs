//! BM25 tuning parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_K1: f64 = 1.5;
pub const DEFAULT_B: f64 = 0.75;

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("k1 must be a finite non-negative number, got {0}")]
    K1(f64),
    #[error("b must be within [0, 1], got {0}")]
    B(f64),
}

/// `k1` controls term-frequency saturation, `b` document-length
/// normalization (0 = none, 1 = full).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    #[serde(default = "default_k1")]
    pub k1: f64,
    #[serde(default = "default_b")]
    pub b: f64,
}

fn default_k1() -> f64 {
    DEFAULT_K1
}

fn default_b() -> f64 {
    DEFAULT_B
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: DEFAULT_K1, b: DEFAULT_B }
    }
}

impl Bm25Params {
    pub fn new(k1: f64, b: f64) -> Result<Self, ParamError> {
        let params = Self { k1, b };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(ParamError::K1(self.k1));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(ParamError::B(self.b));
        }
        Ok(())
    }

    /// Copy with any provided value replacing the configured one, validated.
    pub fn with_overrides(self, k1: Option<f64>, b: Option<f64>) -> Result<Self, ParamError> {
        Self::new(k1.unwrap_or(self.k1), b.unwrap_or(self.b))
    }
}
