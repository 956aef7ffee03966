//! Persona generation.
//!
//! Produces a population balanced across attachment styles whose Big Five
//! traits and self-criticism levels are coupled to the style the way the
//! attachment literature describes: anxious participants run higher on
//! neuroticism, secure participants lower, and high neuroticism makes high
//! self-criticism more likely.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::design::ExperimentDesign;
use crate::error::ValidationError;
use crate::persona::{
    AttachmentStyle, Culture, Demographics, EducationLevel, Gender, ParticipantId, Persona,
    PersonalityTraits, RelationshipStatus, SelfCriticism, Trait,
};
use crate::seeding::{participant_rng, run_rng, RngStream};

/// Lower bound of the base trait draw.
pub const BASE_TRAIT_MIN: f64 = 30.0;

/// Upper bound of the base trait draw.
pub const BASE_TRAIT_MAX: f64 = 70.0;

/// Generates balanced, trait-coherent persona populations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonaGenerator;

impl PersonaGenerator {
    /// Creates a generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generates `n` personas for `design`.
    ///
    /// Output is bit-for-bit reproducible for a fixed `(n, seed)`: each
    /// persona draws from its own RNG seeded with `seed + index`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `n == 0` or the design has no conditions.
    pub fn create_personas(
        &self,
        n: usize,
        design: &ExperimentDesign,
        seed: u64,
    ) -> Result<Vec<Persona>, ValidationError> {
        if n == 0 {
            return Err(ValidationError::InvalidParticipantCount { count: 0 });
        }
        design.validate_conditions()?;

        let mut styles = balanced_styles(n);
        styles.shuffle(&mut run_rng(seed, RngStream::StylePool));

        let personas: Vec<Persona> = styles
            .into_par_iter()
            .enumerate()
            .map(|(index, style)| generate_persona(seed, index, style))
            .collect();

        debug!(counts = ?style_counts(&personas), "attachment style balance");
        info!(count = personas.len(), seed, "generated personas");
        Ok(personas)
    }
}

/// Convenience wrapper around [`PersonaGenerator::create_personas`].
///
/// # Errors
///
/// Same as [`PersonaGenerator::create_personas`].
pub fn create_personas(
    n: usize,
    design: &ExperimentDesign,
    seed: u64,
) -> Result<Vec<Persona>, ValidationError> {
    PersonaGenerator::new().create_personas(n, design, seed)
}

/// `n / 4` of each style with the remainder going round-robin to the first
/// styles, in [`AttachmentStyle::ALL`] order.
#[must_use]
pub fn balanced_styles(n: usize) -> Vec<AttachmentStyle> {
    (0..n)
        .map(|i| AttachmentStyle::ALL[i % AttachmentStyle::ALL.len()])
        .collect()
}

/// Number of personas per style, in [`AttachmentStyle::ALL`] order.
#[must_use]
pub fn style_counts(personas: &[Persona]) -> [(AttachmentStyle, usize); 4] {
    AttachmentStyle::ALL.map(|style| {
        let count = personas.iter().filter(|p| p.attachment_style == style).count();
        (style, count)
    })
}

/// Probabilities of low, medium and high self-criticism for a neuroticism score.
///
/// With `z = neuroticism / 100` the weights are `(1-z)^2`, `2z(1-z)` and
/// `z^2`, which sum to one.
#[must_use]
pub fn self_criticism_weights(neuroticism: f64) -> [f64; 3] {
    let z = (neuroticism / PersonalityTraits::MAX_SCORE).clamp(0.0, 1.0);
    [(1.0 - z) * (1.0 - z), 2.0 * z * (1.0 - z), z * z]
}

fn sample_self_criticism(rng: &mut SmallRng, neuroticism: f64) -> SelfCriticism {
    let [low, medium, _] = self_criticism_weights(neuroticism);
    let u: f64 = rng.gen();
    if u < low {
        SelfCriticism::Low
    } else if u < low + medium {
        SelfCriticism::Medium
    } else {
        SelfCriticism::High
    }
}

fn pick<T: Copy, const N: usize>(rng: &mut SmallRng, options: &[T; N]) -> T {
    options[rng.gen_range(0..N)]
}

fn generate_traits(rng: &mut SmallRng, style: AttachmentStyle) -> PersonalityTraits {
    let mut traits = PersonalityTraits::neutral();
    for t in Trait::ALL {
        traits.set(t, rng.gen_range(BASE_TRAIT_MIN..=BASE_TRAIT_MAX));
    }
    for &(t, delta) in style.trait_deltas() {
        traits.set(t, traits.get(t) + delta);
    }
    traits
}

fn generate_demographics(rng: &mut SmallRng) -> Demographics {
    Demographics {
        age: rng.gen_range(Demographics::MIN_AGE..=Demographics::MAX_AGE),
        gender: pick(rng, &Gender::ALL),
        education_level: pick(rng, &EducationLevel::ALL),
        relationship_status: pick(rng, &RelationshipStatus::ALL),
        baseline_stress: rng.gen_range(1.0..=7.0),
        social_support: rng.gen_range(1.0..=7.0),
    }
}

fn generate_persona(seed: u64, index: usize, style: AttachmentStyle) -> Persona {
    let mut rng = participant_rng(seed, index, RngStream::Persona);

    let personality_traits = generate_traits(&mut rng, style);
    let self_criticism = sample_self_criticism(&mut rng, personality_traits.neuroticism);
    let culture = pick(&mut rng, &Culture::ALL);
    let demographics = generate_demographics(&mut rng);

    Persona {
        id: ParticipantId::derive(seed, index),
        label: format!("persona_{:04}", index + 1),
        attachment_style: style,
        personality_traits,
        self_criticism,
        culture,
        demographics,
    }
}
