//! Rule-based open-text responses.
//!
//! The attachment style selects a template family; personality then
//! modulates the text. High openness adds elaboration, high extraversion
//! adds an interpersonal framing that names the stimulus relationship.

use rand::Rng;

use crate::persona::{AttachmentStyle, Persona};
use crate::stimulus::{Stimulus, Valence};

/// Trait score above which openness/extraversion modulate the text.
pub const HIGH_TRAIT_THRESHOLD: f64 = 60.0;

fn templates(style: AttachmentStyle) -> &'static [&'static str] {
    match style {
        AttachmentStyle::Anxious => &[
            "This situation really worries me. I feel {emotion} and can't stop thinking about what might go wrong.",
            "I'm feeling quite {emotion} about this. I keep replaying the scenario in my mind.",
            "This makes me feel {emotion}. I would probably seek reassurance from others.",
        ],
        AttachmentStyle::Avoidant => &[
            "I don't think this would affect me much. I prefer to handle things independently.",
            "This situation is {emotion}, but I would likely distance myself emotionally.",
            "I would try not to dwell on this. It's better to stay self-reliant.",
        ],
        AttachmentStyle::Secure => &[
            "This situation feels {emotion}, but I think I could manage it with support if needed.",
            "I feel {emotion} about this, and I would communicate my feelings openly.",
            "This makes me feel {emotion}, but I'm confident I can cope with it.",
        ],
        AttachmentStyle::FearfulAvoidant => &[
            "This situation is confusing. Part of me wants to {action}, but another part wants to withdraw.",
            "I feel {emotion} and uncertain about how to respond. I might alternate between seeking help and avoiding it.",
            "This creates mixed feelings. I'm both {emotion} and hesitant to engage fully.",
        ],
    }
}

fn emotions(valence: Valence) -> &'static [&'static str] {
    match valence {
        Valence::Negative => &["anxious", "stressed", "uncomfortable", "worried", "upset"],
        Valence::Positive => &["happy", "content", "relieved", "pleased", "calm"],
        Valence::Neutral => &["neutral", "uncertain", "okay", "mixed"],
        Valence::Mixed => &["conflicted", "ambivalent", "uncertain", "torn"],
    }
}

const ACTIONS: [&str; 4] = ["reach out", "connect", "engage", "respond"];

const ELABORATIONS: [&str; 3] = [
    " I think this relates to past experiences.",
    " This reminds me of similar situations.",
    " I would want to understand the deeper meaning.",
];

const INTERPERSONAL: [&str; 3] = [
    " I'd want to talk it through with my {relationship} right away.",
    " I'd probably bring it up with my {relationship} and see how they feel.",
    " Getting my {relationship}'s perspective would matter a lot to me.",
];

fn choose<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

/// Builds the open-text response for a persona reacting to a stimulus.
pub fn open_text<R: Rng + ?Sized>(persona: &Persona, stimulus: &Stimulus, rng: &mut R) -> String {
    let template = choose(rng, templates(persona.attachment_style));
    let emotion = choose(rng, emotions(stimulus.valence));
    let action = choose(rng, &ACTIONS);

    let mut text = template
        .replace("{emotion}", emotion)
        .replace("{action}", action);

    let traits = &persona.personality_traits;
    if traits.openness > HIGH_TRAIT_THRESHOLD && rng.gen_bool(0.5) {
        text.push_str(choose(rng, &ELABORATIONS));
    }
    if traits.extraversion > HIGH_TRAIT_THRESHOLD {
        let relationship = stimulus.relationship_type.trim();
        let relationship = if relationship.is_empty() { "partner" } else { relationship };
        text.push_str(&choose(rng, &INTERPERSONAL).replace("{relationship}", relationship));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::{
        Culture, Demographics, EducationLevel, Gender, ParticipantId, PersonalityTraits,
        RelationshipStatus, SelfCriticism,
    };
    use crate::stimulus::Intensity;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn persona(style: AttachmentStyle, openness: f64, extraversion: f64) -> Persona {
        let mut traits = PersonalityTraits::neutral();
        traits.openness = openness;
        traits.extraversion = extraversion;
        Persona {
            id: ParticipantId::derive(0, 0),
            label: "persona_0001".to_string(),
            attachment_style: style,
            personality_traits: traits,
            self_criticism: SelfCriticism::Medium,
            culture: Culture::Individualistic,
            demographics: Demographics {
                age: 25,
                gender: Gender::NonBinary,
                education_level: EducationLevel::Undergraduate,
                relationship_status: RelationshipStatus::Dating,
                baseline_stress: 3.0,
                social_support: 5.0,
            },
        }
    }

    fn stimulus() -> Stimulus {
        Stimulus::new("s1", "neg", Valence::Negative, Intensity::High).with_relationship_type("colleague")
    }

    #[test]
    fn placeholders_are_always_filled() {
        let mut rng = SmallRng::seed_from_u64(1);
        for style in AttachmentStyle::ALL {
            for _ in 0..20 {
                let text = open_text(&persona(style, 80.0, 80.0), &stimulus(), &mut rng);
                assert!(!text.contains('{'), "unfilled template: {text}");
            }
        }
    }

    #[test]
    fn template_family_follows_style() {
        let mut rng = SmallRng::seed_from_u64(2);
        let text = open_text(&persona(AttachmentStyle::Anxious, 40.0, 40.0), &stimulus(), &mut rng);
        assert!(templates(AttachmentStyle::Anxious)
            .iter()
            .any(|t| text.starts_with(t.split('{').next().unwrap_or(t))));
    }

    #[test]
    fn extraversion_adds_interpersonal_framing() {
        let mut rng = SmallRng::seed_from_u64(3);
        let text = open_text(&persona(AttachmentStyle::Secure, 40.0, 85.0), &stimulus(), &mut rng);
        assert!(text.contains("colleague"));

        let mut rng = SmallRng::seed_from_u64(3);
        let text = open_text(&persona(AttachmentStyle::Secure, 40.0, 30.0), &stimulus(), &mut rng);
        assert!(!text.contains("colleague"));
    }

    #[test]
    fn openness_lengthens_text_on_average() {
        let mut rng = SmallRng::seed_from_u64(4);
        let total = |openness: f64, rng: &mut SmallRng| -> usize {
            (0..200)
                .map(|_| open_text(&persona(AttachmentStyle::Avoidant, openness, 40.0), &stimulus(), rng).len())
                .sum()
        };
        let closed = total(30.0, &mut rng);
        let open = total(90.0, &mut rng);
        assert!(open > closed);
    }

    #[test]
    fn same_rng_state_same_text() {
        let p = persona(AttachmentStyle::FearfulAvoidant, 70.0, 70.0);
        let a = open_text(&p, &stimulus(), &mut SmallRng::seed_from_u64(9));
        let b = open_text(&p, &stimulus(), &mut SmallRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
