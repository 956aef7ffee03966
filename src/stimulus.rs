//! Stimulus records and their scoring-relevant metadata.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::design::ExperimentDesign;
use crate::error::ValidationError;

/// Affective direction of a stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Valence {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl fmt::Display for Valence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

/// How strongly a stimulus pushes its valence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    /// Multiplier applied to the valence-driven score delta.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Low => 0.5,
            Self::Medium => 1.0,
            Self::High => 1.5,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

fn default_relationship_type() -> String {
    "partner".to_string()
}

/// One stimulus from the bank, assigned to a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stimulus {
    pub id: String,
    /// Condition this stimulus belongs to.
    pub condition_id: String,
    pub valence: Valence,
    pub intensity: Intensity,
    /// Relationship the scenario is about, e.g. "partner", "friend", "colleague".
    #[serde(default = "default_relationship_type")]
    pub relationship_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Stimulus {
    /// Creates a stimulus with the default relationship type.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        condition_id: impl Into<String>,
        valence: Valence,
        intensity: Intensity,
    ) -> Self {
        Self {
            id: id.into(),
            condition_id: condition_id.into(),
            valence,
            intensity,
            relationship_type: default_relationship_type(),
            text: None,
        }
    }

    /// Sets the relationship type.
    #[must_use]
    pub fn with_relationship_type(mut self, relationship_type: impl Into<String>) -> Self {
        self.relationship_type = relationship_type.into();
        self
    }

    /// Sets the stimulus text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Checks that this stimulus is assigned to a declared condition.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownCondition` otherwise.
    pub fn validate_against(&self, design: &ExperimentDesign) -> Result<(), ValidationError> {
        if design.has_condition(&self.condition_id) {
            Ok(())
        } else {
            Err(ValidationError::UnknownCondition {
                stimulus_id: self.id.clone(),
                condition_id: self.condition_id.clone(),
            })
        }
    }
}

/// Validates a whole stimulus bank against a design.
///
/// The bank must be non-empty, ids unique and every stimulus assigned to a
/// declared condition.
///
/// # Errors
///
/// Returns the first offending stimulus as a `ValidationError`.
pub fn validate_bank(stimuli: &[Stimulus], design: &ExperimentDesign) -> Result<(), ValidationError> {
    if stimuli.is_empty() {
        return Err(ValidationError::EmptyStimulusBank);
    }
    let mut seen = HashSet::new();
    for stimulus in stimuli {
        if stimulus.id.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "stimulus.id".to_string(),
            });
        }
        if !seen.insert(stimulus.id.as_str()) {
            return Err(ValidationError::DuplicateStimulus {
                id: stimulus.id.clone(),
            });
        }
        stimulus.validate_against(design)?;
    }
    Ok(())
}
