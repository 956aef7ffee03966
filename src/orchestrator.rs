//! End-to-end simulation: personas, stimulus assignment, responses, diagnostics.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::design::{DesignType, ExperimentDesign};
use crate::diagnostics::{DiagnosticsEngine, SimulationSummary};
use crate::error::{SimResult, ValidationError};
use crate::generator::PersonaGenerator;
use crate::persona::Persona;
use crate::response::SyntheticParticipant;
use crate::seeding::{participant_rng, RngStream};
use crate::simulator::ResponseSimulator;
use crate::stimulus::{validate_bank, Stimulus};

/// Result of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Base seed the run was derived from.
    pub seed: u64,
    /// Participants in index order.
    pub participants: Vec<SyntheticParticipant>,
    pub summary: SimulationSummary,
}

impl SimulationOutcome {
    /// Splits the outcome into raw participants and summary.
    #[must_use]
    pub fn into_parts(self) -> (Vec<SyntheticParticipant>, SimulationSummary) {
        (self.participants, self.summary)
    }
}

/// Stimuli presented to participant `index`, and the condition it was
/// assigned under a between-subjects design.
///
/// Between-subjects participants are assigned round-robin over the declared
/// conditions; within-subjects and mixed participants see the whole bank.
#[must_use]
pub fn assign_stimuli<'a>(
    design: &'a ExperimentDesign,
    stimuli: &'a [Stimulus],
    index: usize,
) -> (Option<&'a str>, Vec<&'a Stimulus>) {
    match design.design_type {
        DesignType::BetweenSubjects => {
            if design.conditions.is_empty() {
                return (None, Vec::new());
            }
            let condition = design.conditions[index % design.conditions.len()].id.as_str();
            let assigned = stimuli.iter().filter(|s| s.condition_id == condition).collect();
            (Some(condition), assigned)
        }
        DesignType::WithinSubjects | DesignType::Mixed => (None, stimuli.iter().collect()),
    }
}

/// Sequences persona generation, response simulation and diagnostics.
#[derive(Debug, Clone)]
pub struct SimulationOrchestrator {
    config: SimulationConfig,
    generator: PersonaGenerator,
    simulator: ResponseSimulator,
    diagnostics: DiagnosticsEngine,
}

impl SimulationOrchestrator {
    /// Builds an orchestrator.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidConfig` if the config is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, ValidationError> {
        let simulator = ResponseSimulator::new(&config)?;
        let diagnostics = DiagnosticsEngine::new(&config)?;
        Ok(Self {
            config,
            generator: PersonaGenerator::new(),
            simulator,
            diagnostics,
        })
    }

    /// The configuration this orchestrator was built with.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Validates design, stimulus bank and participant count.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, naming the offending record.
    pub fn validate_inputs(
        design: &ExperimentDesign,
        stimuli: &[Stimulus],
        n_participants: usize,
    ) -> Result<(), ValidationError> {
        if n_participants == 0 {
            return Err(ValidationError::InvalidParticipantCount { count: 0 });
        }
        design.validate()?;
        validate_bank(stimuli, design)
    }

    /// Runs a full simulation of `n_participants` participants.
    ///
    /// Results depend only on the inputs and `seed`, not on the number of
    /// worker threads.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed inputs; nothing is simulated
    /// in that case.
    pub fn run(
        &self,
        design: &ExperimentDesign,
        stimuli: &[Stimulus],
        n_participants: usize,
        seed: u64,
    ) -> SimResult<SimulationOutcome> {
        Self::validate_inputs(design, stimuli, n_participants)?;
        if design.design_type == DesignType::BetweenSubjects {
            for condition in &design.conditions {
                if !stimuli.iter().any(|s| s.condition_id == condition.id) {
                    warn!(condition = %condition.id, "condition has no stimuli; its participants will have no responses");
                }
            }
        }

        info!(
            n_participants,
            stimuli = stimuli.len(),
            design_type = %design.design_type,
            seed,
            "starting simulation"
        );

        let personas = self.generator.create_personas(n_participants, design, seed)?;
        let participants = personas
            .into_par_iter()
            .enumerate()
            .map(|(index, persona)| self.simulate_participant(persona, index, design, stimuli, seed))
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let summary = self.diagnostics.compute_diagnostics(&participants, design);
        info!(
            participants = summary.participant_count,
            responses = summary.response_count,
            "simulation complete"
        );

        Ok(SimulationOutcome {
            seed,
            participants,
            summary,
        })
    }

    /// Runs a simulation sized by the design's sample size plan.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run`], plus `InvalidSampleSizePlan` for an unusable
    /// per-condition range.
    pub fn run_planned(
        &self,
        design: &ExperimentDesign,
        stimuli: &[Stimulus],
        seed: u64,
    ) -> SimResult<SimulationOutcome> {
        let n = design.planned_sample_size(self.config.default_per_condition)?;
        self.run(design, stimuli, n, seed)
    }

    fn simulate_participant(
        &self,
        persona: Persona,
        index: usize,
        design: &ExperimentDesign,
        stimuli: &[Stimulus],
        seed: u64,
    ) -> Result<SyntheticParticipant, ValidationError> {
        let (assigned_condition, presented) = assign_stimuli(design, stimuli, index);
        let mut rng = participant_rng(seed, index, RngStream::Response);
        let responses = self
            .simulator
            .simulate_responses(&persona, presented, design, &mut rng)?;
        Ok(SyntheticParticipant {
            persona,
            assigned_condition: assigned_condition.map(str::to_string),
            responses,
        })
    }
}

/// Runs a simulation with the default configuration.
///
/// # Errors
///
/// Returns a validation error for malformed inputs.
pub fn run_simulation(
    design: &ExperimentDesign,
    stimuli: &[Stimulus],
    n_participants: usize,
    seed: u64,
) -> SimResult<(Vec<SyntheticParticipant>, SimulationSummary)> {
    let orchestrator = SimulationOrchestrator::new(SimulationConfig::default())?;
    Ok(orchestrator.run(design, stimuli, n_participants, seed)?.into_parts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{Measure, SampleSizePlan};
    use crate::error::SimulationError;
    use crate::stimulus::{Intensity, Valence};

    fn design(design_type: DesignType) -> ExperimentDesign {
        ExperimentDesign::new(design_type)
            .with_condition("neg", "Negative")
            .with_condition("pos", "Positive")
            .with_measure(Measure::new("anx", "State Anxiety"))
    }

    fn bank() -> Vec<Stimulus> {
        vec![
            Stimulus::new("s1", "neg", Valence::Negative, Intensity::High),
            Stimulus::new("s2", "pos", Valence::Positive, Intensity::Medium),
            Stimulus::new("s3", "neg", Valence::Negative, Intensity::Low),
        ]
    }

    #[test]
    fn between_assignment_is_round_robin() {
        let d = design(DesignType::BetweenSubjects);
        let stimuli = bank();
        let (c0, s0) = assign_stimuli(&d, &stimuli, 0);
        let (c1, s1) = assign_stimuli(&d, &stimuli, 1);
        let (c2, _) = assign_stimuli(&d, &stimuli, 2);
        assert_eq!(c0, Some("neg"));
        assert_eq!(c1, Some("pos"));
        assert_eq!(c2, Some("neg"));
        assert_eq!(s0.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(), vec!["s1", "s3"]);
        assert_eq!(s1.len(), 1);
    }

    #[test]
    fn within_and_mixed_see_whole_bank() {
        let stimuli = bank();
        for t in [DesignType::WithinSubjects, DesignType::Mixed] {
            let d = design(t);
            let (c, s) = assign_stimuli(&d, &stimuli, 5);
            assert!(c.is_none());
            assert_eq!(s.len(), 3);
        }
    }

    #[test]
    fn run_produces_one_response_per_presented_stimulus() {
        let (participants, summary) =
            run_simulation(&design(DesignType::WithinSubjects), &bank(), 12, 3).unwrap();
        assert_eq!(participants.len(), 12);
        assert!(participants.iter().all(|p| p.responses.len() == 3));
        assert_eq!(summary.response_count, 36);

        let (participants, _) =
            run_simulation(&design(DesignType::BetweenSubjects), &bank(), 12, 3).unwrap();
        for p in &participants {
            let assigned = p.assigned_condition.as_deref().unwrap();
            assert!(p.responses.iter().all(|r| r.condition_id == assigned));
        }
    }

    #[test]
    fn run_rejects_invalid_inputs() {
        let err = run_simulation(&design(DesignType::WithinSubjects), &bank(), 0, 1).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Validation(ValidationError::InvalidParticipantCount { .. })
        ));

        let mut stimuli = bank();
        stimuli.push(Stimulus::new("s4", "nowhere", Valence::Mixed, Intensity::Low));
        let err = run_simulation(&design(DesignType::WithinSubjects), &stimuli, 4, 1).unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::UnknownCondition { stimulus_id, .. }) if stimulus_id == "s4"
        ));

        let err = run_simulation(&design(DesignType::WithinSubjects), &[], 4, 1).unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::EmptyStimulusBank));
    }

    #[test]
    fn run_is_reproducible() {
        let orchestrator = SimulationOrchestrator::new(SimulationConfig::default()).unwrap();
        let d = design(DesignType::BetweenSubjects);
        let a = orchestrator.run(&d, &bank(), 30, 99).unwrap();
        let b = orchestrator.run(&d, &bank(), 30, 99).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn planned_run_uses_sample_size_plan() {
        let orchestrator = SimulationOrchestrator::new(SimulationConfig::default()).unwrap();
        let d = design(DesignType::BetweenSubjects).with_sample_size_plan(SampleSizePlan {
            assumed_effect_size: None,
            per_condition_range: Some([10, 14]),
        });
        let outcome = orchestrator.run_planned(&d, &bank(), 5).unwrap();
        assert_eq!(outcome.participants.len(), 24);
    }

    #[test]
    fn planned_run_rejects_unusable_plan() {
        let orchestrator = SimulationOrchestrator::new(SimulationConfig::default()).unwrap();
        for range in [[usize::MAX, 2], [60, 40], [usize::MAX - 1, usize::MAX]] {
            let d = design(DesignType::BetweenSubjects).with_sample_size_plan(SampleSizePlan {
                assumed_effect_size: None,
                per_condition_range: Some(range),
            });
            let err = orchestrator.run_planned(&d, &bank(), 5).unwrap_err();
            assert!(matches!(
                err.as_validation(),
                Some(ValidationError::InvalidSampleSizePlan { .. })
            ));
        }
    }
}
