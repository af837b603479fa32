// Limit classification - continuous red/yellow thresholds or discrete desirability
use serde::Serialize;

use super::metadata::{Desirability, StateConversion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitType {
    Good,
    Warn,
    Bad,
}

/// Complete set of continuous thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub red_low: f64,
    pub red_high: f64,
    pub yellow_low: f64,
    pub yellow_high: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViolationCounts {
    pub yellow: usize,
    pub red: usize,
}

impl ViolationCounts {
    pub fn record(&mut self, limit: Option<LimitType>) {
        match limit {
            Some(LimitType::Warn) => self.yellow += 1,
            Some(LimitType::Bad) => self.red += 1,
            _ => {}
        }
    }
}

/// Which classifier applies to a series, decided from its metadata.
#[derive(Debug, Clone, Copy)]
pub enum LimitMode<'a> {
    Discrete(&'a [StateConversion]),
    Continuous(Thresholds),
}

impl LimitMode<'_> {
    /// Classify one point. `y_min`/`y_max` fall back to `y` by the caller when
    /// the series has no range data.
    pub fn classify(&self, y: Option<f64>, y_min: Option<f64>, y_max: Option<f64>) -> Option<LimitType> {
        match self {
            LimitMode::Discrete(conversions) => classify_discrete(y?, conversions),
            LimitMode::Continuous(thresholds) => classify_continuous(y_min?, y_max?, thresholds),
        }
    }
}

pub fn classify_discrete(y: f64, conversions: &[StateConversion]) -> Option<LimitType> {
    let conversion = conversions.iter().find(|c| c.value == y)?;
    Some(match conversion.desirability {
        Some(Desirability::Bad) => LimitType::Bad,
        Some(Desirability::Caution) => LimitType::Warn,
        _ => LimitType::Good,
    })
}

/// Branches are tested good, then warn, then bad. A point straddling both
/// sides lands in whichever branch matches first.
pub fn classify_continuous(y_min: f64, y_max: f64, t: &Thresholds) -> Option<LimitType> {
    if y_min > t.yellow_low && y_max < t.yellow_high {
        Some(LimitType::Good)
    } else if (y_min <= t.yellow_low && y_min > t.red_low)
        || (y_max >= t.yellow_high && y_max < t.red_high)
    {
        Some(LimitType::Warn)
    } else if y_min <= t.red_low || y_max >= t.red_high {
        Some(LimitType::Bad)
    } else {
        // only reachable with NaN values or inverted thresholds
        None
    }
}
