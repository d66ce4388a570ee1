//! Maps raw readings onto the normalized parameter and risk tiers.

use crate::config::{DANGER_FROM, MAX_READING, MIN_READING, WARNING_FROM};
use serde::Serialize;

/// Closed range of accepted readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub min: i32,
    pub max: i32,
}

impl ValueRange {
    pub const READING: ValueRange = ValueRange {
        min: MIN_READING,
        max: MAX_READING,
    };

    /// Width of the range, widened so extreme bounds cannot overflow.
    pub fn span(&self) -> i64 {
        self.max as i64 - self.min as i64
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.max(self.min).min(self.max)
    }

    /// `(value - min) / (max - min)` clamped into `[0, 1]`.
    ///
    /// A degenerate range maps everything to 0.
    pub fn normalize(&self, value: i32) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        let t = (value as f64 - self.min as f64) / self.span() as f64;
        t.clamp(0.0, 1.0)
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::READING
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskTier {
    Safe,
    Warning,
    Danger,
}

/// Lower bounds (inclusive) of the Warning and Danger tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoints {
    pub warning_from: f64,
    pub danger_from: f64,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            warning_from: WARNING_FROM,
            danger_from: DANGER_FROM,
        }
    }
}

impl Breakpoints {
    pub fn tier(&self, t: f64) -> RiskTier {
        let t = if t.is_finite() { t } else { 0.0 };
        if t < self.warning_from {
            RiskTier::Safe
        } else if t < self.danger_from {
            RiskTier::Warning
        } else {
            RiskTier::Danger
        }
    }
}

/// Normalizer output for one reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: i32,
    pub t: f64,
    pub tier: RiskTier,
}

pub fn read(value: i32, range: ValueRange, breakpoints: Breakpoints) -> Reading {
    let t = range.normalize(value);
    Reading {
        value,
        t,
        tier: breakpoints.tier(t),
    }
}
