//! Error types for cohortsim.
//!
//! All errors are strongly typed using thiserror. Input problems surface as
//! [`ValidationError`] and name the offending record; statistical
//! degeneracies are not errors at all and are recorded in the summary as
//! [`crate::diagnostics::DegenerateStatisticWarning`] instead.

use thiserror::Error;

/// Validation errors raised before any simulation work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Participant count must be positive, got {count}")]
    InvalidParticipantCount {
        count: i64,
    },

    #[error("Experiment design declares no conditions")]
    NoConditions,

    #[error("Experiment design declares no measures")]
    NoMeasures,

    #[error("Condition '{id}' is declared more than once")]
    DuplicateCondition {
        id: String,
    },

    #[error("Measure '{name}' is declared more than once")]
    DuplicateMeasure {
        name: String,
    },

    #[error("Measure '{measure}' has invalid scale bounds [{min}, {max}]")]
    InvalidScale {
        measure: String,
        min: f64,
        max: f64,
    },

    #[error("Sample size plan has invalid per-condition range [{low}, {high}]")]
    InvalidSampleSizePlan {
        low: usize,
        high: usize,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Stimulus bank is empty")]
    EmptyStimulusBank,

    #[error("Stimulus '{id}' appears more than once in the bank")]
    DuplicateStimulus {
        id: String,
    },

    #[error("Stimulus '{stimulus_id}' references undeclared condition '{condition_id}'")]
    UnknownCondition {
        stimulus_id: String,
        condition_id: String,
    },

    #[error("Invalid simulation config: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Top-level error type for cohortsim.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimulationError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a serialization error.
    #[must_use]
    pub const fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }

    /// Returns the underlying validation error, if any.
    #[must_use]
    pub const fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Serialization(_) => None,
        }
    }
}

/// Result type alias for cohortsim operations.
pub type SimResult<T> = Result<T, SimulationError>;
