//! Rates and rate bands

use serde::{Deserialize, Serialize};
use std::fmt;

/// Percentage of `matched` over `total`, one decimal, clamped to `[0, 100]`
///
/// A zero total gives `0.0`.
///
/// ```
/// use classroll::core::aggregate::rate;
///
/// assert_eq!(rate(2, 3), 66.7);
/// assert_eq!(rate(0, 0), 0.0);
/// assert_eq!(rate(5, 4), 100.0);
/// ```
pub fn rate(matched: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = 100.0 * matched as f64 / total as f64;
    round1(pct).clamp(0.0, 100.0)
}

/// Assignment completion: `round(100 * (submitted + late) / total_students)`
///
/// Whole percent, clamped to `[0, 100]`; zero students gives `0`.
pub fn completion_rate(submitted: u64, late: u64, total_students: u64) -> u32 {
    if total_students == 0 {
        return 0;
    }
    let pct = 100.0 * (submitted + late) as f64 / total_students as f64;
    pct.round().clamp(0.0, 100.0) as u32
}

/// Mean of percentages, one decimal; `None` for no values
pub fn average(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let mean = finite.iter().sum::<f64>() / finite.len() as f64;
    Some(round1(mean).clamp(0.0, 100.0))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Ordered rate bands, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBand {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl RateBand {
    pub const ALL: [RateBand; 4] = [
        RateBand::Excellent,
        RateBand::Good,
        RateBand::Fair,
        RateBand::NeedsImprovement,
    ];

    /// Band for a rate; a missing rate lands in the lowest band
    pub fn classify(rate: Option<f64>) -> Self {
        match rate {
            Some(r) if r >= 90.0 => RateBand::Excellent,
            Some(r) if r >= 80.0 => RateBand::Good,
            Some(r) if r >= 70.0 => RateBand::Fair,
            _ => RateBand::NeedsImprovement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RateBand::Excellent => "Excellent (90-100)",
            RateBand::Good => "Good (80-89)",
            RateBand::Fair => "Fair (70-79)",
            RateBand::NeedsImprovement => "Needs improvement (<70)",
        }
    }
}

impl fmt::Display for RateBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Count of values per [`RateBand`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandDistribution {
    pub excellent: u64,
    pub good: u64,
    pub fair: u64,
    pub needs_improvement: u64,
}

impl BandDistribution {
    pub fn from_rates<I>(rates: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut distribution = Self::default();
        for r in rates {
            distribution.add(RateBand::classify(r));
        }
        distribution
    }

    pub fn add(&mut self, band: RateBand) {
        match band {
            RateBand::Excellent => self.excellent += 1,
            RateBand::Good => self.good += 1,
            RateBand::Fair => self.fair += 1,
            RateBand::NeedsImprovement => self.needs_improvement += 1,
        }
    }

    pub fn count(&self, band: RateBand) -> u64 {
        match band {
            RateBand::Excellent => self.excellent,
            RateBand::Good => self.good,
            RateBand::Fair => self.fair,
            RateBand::NeedsImprovement => self.needs_improvement,
        }
    }

    pub fn total(&self) -> u64 {
        self.excellent + self.good + self.fair + self.needs_improvement
    }
}
