use std::fmt;

use serde::{Deserialize, Serialize};

/// A 0–10 mark with one decimal place, stored as tenths.
///
/// `correct / total * 10` is rounded half up on exact integer arithmetic, so
/// 27 of 40 (6.75) is always `6.8` regardless of float formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Score {
    tenths: u32,
}

impl Score {
    pub const ZERO: Score = Score { tenths: 0 };
    pub const MAX: Score = Score { tenths: 100 };

    /// Scores `correct` out of `total`. An empty set scores zero.
    #[must_use]
    pub fn from_counts(correct: usize, total: usize) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let total = u64::try_from(total).unwrap_or(u64::MAX);
        let correct = u64::try_from(correct).unwrap_or(u64::MAX).min(total);
        // floor(correct * 100 / total + 1/2)
        let tenths = correct
            .saturating_mul(200)
            .saturating_add(total)
            / total.saturating_mul(2);
        Self {
            tenths: u32::try_from(tenths).unwrap_or(100).min(100),
        }
    }

    #[must_use]
    pub fn tenths(self) -> u32 {
        self.tenths
    }

    /// Percentage of the maximum mark; the summary progress bar width.
    #[must_use]
    pub fn percent(self) -> u32 {
        self.tenths
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.tenths) / 10.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
    }
}
