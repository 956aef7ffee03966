//! # cohortsim - Synthetic Participant Simulation & Design Diagnostics
//!
//! cohortsim pre-validates a behavioral-science study design before real
//! participants are recruited. Given an experiment design and a bank of
//! stimuli assigned to its conditions, it generates a population of
//! synthetic participants, simulates their condition-dependent responses and
//! flags design weaknesses: measures with no variance and condition pairs
//! with negligible separation.
//!
//! ## Core Concepts
//!
//! - **Persona**: a synthetic participant's stable trait profile
//! - **Response**: DV scores and free text for one persona and one stimulus
//! - **Dead variable**: a measure with no meaningful variance in any condition
//! - **Weak effect**: a condition pair whose |Cohen's d| is below threshold
//!
//! ## Pipeline
//!
//! | Step | Module | Description |
//! |------|--------|-------------|
//! | 1 | [`generator`] | Balanced, trait-coherent personas |
//! | 2 | [`orchestrator`] | Stimulus assignment per design type |
//! | 3 | [`simulator`] | Per-DV scores and open text |
//! | 4 | [`diagnostics`] | Condition statistics, dead variables, weak effects |
//!
//! Every random draw comes from an RNG derived from the run seed and the
//! participant index ([`seeding`]), so a run is reproducible regardless of
//! how rayon schedules it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cohortsim::{run_simulation, DesignType, ExperimentDesign, Intensity, Measure, Stimulus, Valence};
//!
//! let design = ExperimentDesign::new(DesignType::BetweenSubjects)
//!     .with_condition("low", "Low anxiety stimulus")
//!     .with_condition("high", "High anxiety stimulus")
//!     .with_measure(Measure::new("stai", "State Anxiety"));
//! let stimuli = vec![
//!     Stimulus::new("s1", "low", Valence::Neutral, Intensity::Low),
//!     Stimulus::new("s2", "high", Valence::Negative, Intensity::High),
//! ];
//!
//! let (participants, summary) = run_simulation(&design, &stimuli, 40, 7)?;
//! assert!(summary.dead_vars.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod design;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod orchestrator;
pub mod persona;
pub mod response;
pub mod seeding;
pub mod simulator;
pub mod stimulus;

// Re-export primary types at crate root for convenience
pub use config::SimulationConfig;
pub use design::{Condition, DesignType, ExperimentDesign, Measure, SampleSizePlan, ScaleBounds};
pub use diagnostics::{
    compute_diagnostics, ConditionStats, DegeneracyReason, DegenerateStatisticWarning,
    DiagnosticsEngine, DvSummary, EffectEstimate, EffectSizeBand, SampleResponse,
    SimulationSummary, WeakEffect,
};
pub use error::{SimResult, SimulationError, ValidationError};
pub use generator::{create_personas, PersonaGenerator};
pub use orchestrator::{run_simulation, SimulationOrchestrator, SimulationOutcome};
pub use persona::{
    AttachmentStyle, Culture, Demographics, EducationLevel, Gender, ParticipantId, Persona,
    PersonalityTraits, RelationshipStatus, SelfCriticism, Trait,
};
pub use response::{Response, SyntheticParticipant};
pub use simulator::{default_simulator, simulate_response, ResponseSimulator};
pub use stimulus::{Intensity, Stimulus, Valence};
