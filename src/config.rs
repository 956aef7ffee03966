//! Simulation configuration (tunable thresholds and noise).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Tunable parameters for a simulation run.
///
/// Defaults: dead-variable SD threshold 0.3, weak-effect |d| threshold 0.3
/// and response noise SD 0.5, calibrated for 1–7 scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Standard deviation of the Gaussian noise added to every DV score.
    pub noise_sd: f64,
    /// A DV is dead when its SD is below this value in every condition.
    pub dead_variable_sd_threshold: f64,
    /// A condition pair is weak when |Cohen's d| is below this value.
    pub weak_effect_threshold: f64,
    /// Number of open-text samples kept in the summary.
    pub sample_response_count: usize,
    /// Participants per condition when the design carries no sample size plan.
    pub default_per_condition: usize,
    /// Case-insensitive pattern marking anxiety/stress-related measures.
    pub distress_measure_pattern: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            noise_sd: 0.5,
            dead_variable_sd_threshold: 0.3,
            weak_effect_threshold: 0.3,
            sample_response_count: 10,
            default_per_condition: 50,
            distress_measure_pattern: "anxi|stress".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Validate the config.
    ///
    /// This must be called before handing the config to a simulator or
    /// diagnostics engine.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidConfig` naming the bad field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.noise_sd.is_finite() || self.noise_sd < 0.0 {
            return Err(ValidationError::InvalidConfig {
                reason: format!("noise_sd must be finite and >= 0, got {}", self.noise_sd),
            });
        }
        if !self.dead_variable_sd_threshold.is_finite() || self.dead_variable_sd_threshold < 0.0 {
            return Err(ValidationError::InvalidConfig {
                reason: "dead_variable_sd_threshold must be finite and >= 0".to_string(),
            });
        }
        if !self.weak_effect_threshold.is_finite() || self.weak_effect_threshold < 0.0 {
            return Err(ValidationError::InvalidConfig {
                reason: "weak_effect_threshold must be finite and >= 0".to_string(),
            });
        }
        if self.default_per_condition == 0 {
            return Err(ValidationError::InvalidConfig {
                reason: "default_per_condition must be > 0".to_string(),
            });
        }
        if self.distress_measure_pattern.trim().is_empty() {
            return Err(ValidationError::InvalidConfig {
                reason: "distress_measure_pattern must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Returns a copy with a different noise SD.
    #[must_use]
    pub fn with_noise_sd(mut self, noise_sd: f64) -> Self {
        self.noise_sd = noise_sd;
        self
    }

    /// Returns a copy with a different weak-effect threshold.
    #[must_use]
    pub fn with_weak_effect_threshold(mut self, threshold: f64) -> Self {
        self.weak_effect_threshold = threshold;
        self
    }

    /// Returns a copy with a different dead-variable threshold.
    #[must_use]
    pub fn with_dead_variable_sd_threshold(mut self, threshold: f64) -> Self {
        self.dead_variable_sd_threshold = threshold;
        self
    }
}
