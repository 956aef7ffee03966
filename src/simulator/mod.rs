//! Response simulation.
//!
//! - [`scoring`]: pure per-DV scoring effects
//! - [`text`]: attachment-style keyed open-text templates
//!
//! [`ResponseSimulator`] composes both. It holds no state besides its
//! compiled configuration; all randomness comes from the caller's RNG.

pub mod scoring;
pub mod text;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use regex::{Regex, RegexBuilder};

use crate::config::SimulationConfig;
use crate::design::{ExperimentDesign, Measure};
use crate::error::ValidationError;
use crate::persona::Persona;
use crate::response::Response;
use crate::stimulus::Stimulus;

/// Simulates one persona's response to one stimulus.
#[derive(Debug, Clone)]
pub struct ResponseSimulator {
    noise: Normal<f64>,
    distress_pattern: Regex,
}

impl ResponseSimulator {
    /// Builds a simulator from a config.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidConfig` if the config fails validation
    /// or the distress-measure pattern is not a valid regex.
    pub fn new(config: &SimulationConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let noise = Normal::new(0.0, config.noise_sd).map_err(|e| ValidationError::InvalidConfig {
            reason: format!("noise distribution: {e}"),
        })?;
        let distress_pattern = RegexBuilder::new(&config.distress_measure_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ValidationError::InvalidConfig {
                reason: format!("invalid distress_measure_pattern: {e}"),
            })?;
        Ok(Self {
            noise,
            distress_pattern,
        })
    }

    /// Returns true if the measure is anxiety/stress-related.
    #[must_use]
    pub fn is_distress_measure(&self, measure: &Measure) -> bool {
        self.distress_pattern.is_match(&measure.label) || self.distress_pattern.is_match(&measure.id)
    }

    /// Simulates one response.
    ///
    /// Scores are drawn for each declared measure in design order, then the
    /// open text; the same RNG state always yields the same response.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownCondition` if the stimulus is assigned
    /// to a condition the design does not declare.
    pub fn simulate_response<R: Rng + ?Sized>(
        &self,
        persona: &Persona,
        stimulus: &Stimulus,
        design: &ExperimentDesign,
        rng: &mut R,
    ) -> Result<Response, ValidationError> {
        stimulus.validate_against(design)?;

        let mut dv_scores = BTreeMap::new();
        for measure in &design.measures {
            let expected = scoring::expected_score(
                persona,
                stimulus.valence,
                stimulus.intensity,
                measure.scale,
                self.is_distress_measure(measure),
            );
            let noise = self.noise.sample(rng);
            dv_scores.insert(
                measure.label.clone(),
                scoring::finalize_score(expected, noise, measure.scale),
            );
        }

        Ok(Response {
            stimulus_id: stimulus.id.clone(),
            condition_id: stimulus.condition_id.clone(),
            dv_scores,
            open_text: text::open_text(persona, stimulus, rng),
        })
    }

    /// Simulates responses to a sequence of stimuli, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first stimulus assigned to an undeclared condition.
    pub fn simulate_responses<'a, R, I>(
        &self,
        persona: &Persona,
        stimuli: I,
        design: &ExperimentDesign,
        rng: &mut R,
    ) -> Result<Vec<Response>, ValidationError>
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = &'a Stimulus>,
    {
        stimuli
            .into_iter()
            .map(|stimulus| self.simulate_response(persona, stimulus, design, rng))
            .collect()
    }
}

static DEFAULT_SIMULATOR: OnceLock<Result<ResponseSimulator, ValidationError>> = OnceLock::new();

/// Shared simulator built once from [`SimulationConfig::default`].
///
/// # Errors
///
/// Returns the config error if the default config fails to compile.
pub fn default_simulator() -> Result<&'static ResponseSimulator, ValidationError> {
    DEFAULT_SIMULATOR
        .get_or_init(|| ResponseSimulator::new(&SimulationConfig::default()))
        .as_ref()
        .map_err(Clone::clone)
}

/// Simulates one response with the default configuration.
///
/// # Errors
///
/// Same as [`ResponseSimulator::simulate_response`].
pub fn simulate_response<R: Rng + ?Sized>(
    persona: &Persona,
    stimulus: &Stimulus,
    design: &ExperimentDesign,
    rng: &mut R,
) -> Result<Response, ValidationError> {
    default_simulator()?.simulate_response(persona, stimulus, design, rng)
}
