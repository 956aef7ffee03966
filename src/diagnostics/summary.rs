//! The simulation summary and its records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::stats::{ConditionStats, EffectSizeBand};
use crate::error::SimResult;
use crate::persona::{AttachmentStyle, ParticipantId};

/// Statistics of one condition for one DV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub condition_id: String,
    #[serde(flatten)]
    pub stats: ConditionStats,
}

/// Per-condition statistics of one DV, in design order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DvSummary {
    pub dv: String,
    pub conditions: Vec<ConditionSummary>,
}

impl DvSummary {
    /// Statistics of one condition, if it had responses.
    #[must_use]
    pub fn condition(&self, condition_id: &str) -> Option<&ConditionStats> {
        self.conditions
            .iter()
            .find(|c| c.condition_id == condition_id)
            .map(|c| &c.stats)
    }
}

/// A condition pair whose separation on a DV is below the weak-effect threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakEffect {
    pub dv: String,
    pub condition_a: String,
    pub condition_b: String,
    pub cohens_d: f64,
    pub message: String,
}

impl WeakEffect {
    /// True if this entry compares the two conditions, in either order.
    #[must_use]
    pub fn involves(&self, a: &str, b: &str) -> bool {
        (self.condition_a == a && self.condition_b == b) || (self.condition_a == b && self.condition_b == a)
    }
}

/// Effect size of one computable condition comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectEstimate {
    pub dv: String,
    pub condition_a: String,
    pub condition_b: String,
    pub cohens_d: f64,
    /// `mean_a - mean_b`.
    pub mean_diff: f64,
    pub interpretation: EffectSizeBand,
}

/// Why a statistic could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegeneracyReason {
    /// One side of a comparison has fewer than two observations.
    InsufficientSamples { n_a: usize, n_b: usize },
    /// Both conditions have zero spread.
    ZeroPooledVariance,
    /// No response was recorded for the condition.
    NoResponses,
    /// No condition has enough observations to judge the DV's variance.
    NoVarianceWitness,
}

impl fmt::Display for DegeneracyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientSamples { n_a, n_b } => {
                write!(f, "insufficient samples (n={n_a} vs n={n_b}, need at least 2 each)")
            }
            Self::ZeroPooledVariance => write!(f, "pooled standard deviation is zero"),
            Self::NoResponses => write!(f, "no responses recorded"),
            Self::NoVarianceWitness => write!(f, "no condition has at least 2 responses"),
        }
    }
}

/// Non-fatal note that a statistic was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegenerateStatisticWarning {
    pub dv: String,
    /// The condition or condition pair concerned; empty for DV-wide notes.
    pub conditions: Vec<String>,
    pub reason: DegeneracyReason,
}

impl fmt::Display for DegenerateStatisticWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            write!(f, "{}: skipped, {}", self.dv, self.reason)
        } else {
            write!(f, "{} [{}]: skipped, {}", self.dv, self.conditions.join(" vs "), self.reason)
        }
    }
}

/// An open-text response kept for qualitative inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResponse {
    pub participant_id: ParticipantId,
    pub attachment_style: AttachmentStyle,
    pub condition_id: String,
    pub text: String,
}

/// Diagnostics output for one simulated population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Per-DV, per-condition statistics, in design order.
    pub dv_summary: Vec<DvSummary>,
    /// DVs whose SD is below threshold in every condition.
    pub dead_vars: Vec<String>,
    pub weak_effects: Vec<WeakEffect>,
    pub effect_estimates: Vec<EffectEstimate>,
    pub sample_responses: Vec<SampleResponse>,
    /// Comparisons and checks that were skipped.
    pub warnings: Vec<DegenerateStatisticWarning>,
    pub participant_count: usize,
    pub response_count: usize,
}

impl SimulationSummary {
    /// Statistics of one DV.
    #[must_use]
    pub fn dv(&self, dv: &str) -> Option<&DvSummary> {
        self.dv_summary.iter().find(|s| s.dv == dv)
    }

    /// Statistics of one DV in one condition.
    #[must_use]
    pub fn stats(&self, dv: &str, condition_id: &str) -> Option<&ConditionStats> {
        self.dv(dv).and_then(|s| s.condition(condition_id))
    }

    /// True if the DV was flagged dead.
    #[must_use]
    pub fn is_dead(&self, dv: &str) -> bool {
        self.dead_vars.iter().any(|d| d == dv)
    }

    /// Weak-effect entry for a DV and condition pair, if flagged.
    #[must_use]
    pub fn weak_effect(&self, dv: &str, a: &str, b: &str) -> Option<&WeakEffect> {
        self.weak_effects.iter().find(|w| w.dv == dv && w.involves(a, b))
    }

    /// Human-readable notes for every skipped statistic.
    #[must_use]
    pub fn notes(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Serializes the summary as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::Serialization` if encoding fails.
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
