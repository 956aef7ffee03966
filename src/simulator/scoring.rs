//! Scoring effects.
//!
//! Each effect is a pure function of the persona and stimulus. They compose
//! in a fixed order: valence, then intensity scaling of the valence delta,
//! then self-criticism (distress measures only), then noise, then clamping.

use crate::design::ScaleBounds;
use crate::persona::{AttachmentStyle, Persona, SelfCriticism};
use crate::stimulus::{Intensity, Valence};

/// Points added per unit of normalized neuroticism on negative stimuli.
pub const NEGATIVE_NEUROTICISM_WEIGHT: f64 = 2.0;
/// Extra reactivity of anxious personas to negative stimuli.
pub const ANXIOUS_NEGATIVE_BOOST: f64 = 0.8;
/// Relief every persona gets from positive stimuli.
pub const POSITIVE_RELIEF: f64 = -0.5;
/// Additional relief secure personas get from positive stimuli.
pub const SECURE_POSITIVE_RELIEF: f64 = -0.5;
/// Shift on distress measures for high self-criticism.
pub const HIGH_SELF_CRITICISM_SHIFT: f64 = 0.7;
/// Shift on distress measures for low self-criticism.
pub const LOW_SELF_CRITICISM_SHIFT: f64 = -0.5;

/// Valence-driven delta before intensity scaling.
#[must_use]
pub fn valence_effect(valence: Valence, persona: &Persona) -> f64 {
    match valence {
        Valence::Negative => {
            let reactivity = persona.neuroticism_normalized() * NEGATIVE_NEUROTICISM_WEIGHT;
            if persona.attachment_style == AttachmentStyle::Anxious {
                reactivity + ANXIOUS_NEGATIVE_BOOST
            } else {
                reactivity
            }
        }
        Valence::Positive => {
            if persona.attachment_style == AttachmentStyle::Secure {
                POSITIVE_RELIEF + SECURE_POSITIVE_RELIEF
            } else {
                POSITIVE_RELIEF
            }
        }
        Valence::Neutral | Valence::Mixed => 0.0,
    }
}

/// Scales a valence delta by stimulus intensity.
#[must_use]
pub fn intensity_scaled(delta: f64, intensity: Intensity) -> f64 {
    delta * intensity.multiplier()
}

/// Self-criticism shift. Zero unless the measure is distress-related.
#[must_use]
pub fn self_criticism_effect(level: SelfCriticism, distress_measure: bool) -> f64 {
    if !distress_measure {
        return 0.0;
    }
    match level {
        SelfCriticism::High => HIGH_SELF_CRITICISM_SHIFT,
        SelfCriticism::Medium => 0.0,
        SelfCriticism::Low => LOW_SELF_CRITICISM_SHIFT,
    }
}

/// Score before noise and clamping.
#[must_use]
pub fn expected_score(
    persona: &Persona,
    valence: Valence,
    intensity: Intensity,
    scale: ScaleBounds,
    distress_measure: bool,
) -> f64 {
    let valence_delta = intensity_scaled(valence_effect(valence, persona), intensity);
    scale.midpoint() + valence_delta + self_criticism_effect(persona.self_criticism, distress_measure)
}

/// Adds noise and clamps into the scale.
#[must_use]
pub fn finalize_score(expected: f64, noise: f64, scale: ScaleBounds) -> f64 {
    scale.clamp(expected + noise)
}
