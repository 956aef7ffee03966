//! Descriptive statistics and effect sizes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::summary::DegeneracyReason;

/// Mean, sample SD and count of one DV in one condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionStats {
    pub mean: f64,
    /// Sample standard deviation (n - 1). Zero when `n < 2`.
    pub sd: f64,
    pub n: usize,
}

impl ConditionStats {
    /// Describes a set of scores. `None` when there are no scores.
    #[must_use]
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        let n = scores.len();
        if n == 0 {
            return None;
        }
        let mean = scores.iter().sum::<f64>() / n as f64;
        let sd = if n < 2 {
            0.0
        } else {
            let ss: f64 = scores.iter().map(|x| (x - mean) * (x - mean)).sum();
            (ss / (n - 1) as f64).sqrt()
        };
        Some(Self { mean, sd, n })
    }

    /// True when the condition has enough observations to estimate variance.
    #[must_use]
    pub const fn has_variance_estimate(&self) -> bool {
        self.n >= 2
    }
}

/// Pooled standard deviation of two conditions.
///
/// `None` when either condition has fewer than two observations.
#[must_use]
pub fn pooled_sd(a: &ConditionStats, b: &ConditionStats) -> Option<f64> {
    if !a.has_variance_estimate() || !b.has_variance_estimate() {
        return None;
    }
    let (n1, n2) = (a.n as f64, b.n as f64);
    let pooled_var = ((n1 - 1.0) * a.sd * a.sd + (n2 - 1.0) * b.sd * b.sd) / (n1 + n2 - 2.0);
    Some(pooled_var.sqrt())
}

/// Cohen's d for `a` relative to `b`: `(mean_a - mean_b) / pooled_sd`.
///
/// # Errors
///
/// Returns the reason the comparison is undefined when either side has
/// fewer than two observations or the pooled SD is zero.
pub fn cohens_d(a: &ConditionStats, b: &ConditionStats) -> Result<f64, DegeneracyReason> {
    let pooled = pooled_sd(a, b).ok_or(DegeneracyReason::InsufficientSamples {
        n_a: a.n,
        n_b: b.n,
    })?;
    if pooled == 0.0 || !pooled.is_finite() {
        return Err(DegeneracyReason::ZeroPooledVariance);
    }
    Ok((a.mean - b.mean) / pooled)
}

/// Conventional interpretation of |d|.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSizeBand {
    /// |d| < 0.2
    Negligible,
    /// 0.2 <= |d| < 0.5
    Small,
    /// 0.5 <= |d| < 0.8
    Medium,
    /// |d| >= 0.8
    Large,
}

impl EffectSizeBand {
    /// Band for an effect size; the sign of `d` is ignored.
    #[must_use]
    pub fn classify(d: f64) -> Self {
        let magnitude = d.abs();
        if magnitude < 0.2 {
            Self::Negligible
        } else if magnitude < 0.5 {
            Self::Small
        } else if magnitude < 0.8 {
            Self::Medium
        } else {
            Self::Large
        }
    }
}

impl fmt::Display for EffectSizeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negligible => write!(f, "negligible"),
            Self::Small => write!(f, "small"),
            Self::Medium => write!(f, "medium"),
            Self::Large => write!(f, "large"),
        }
    }
}
