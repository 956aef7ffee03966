//! Persona types: the stable trait profile of a synthetic participant.
//!
//! Every categorical attribute is a closed enum so that downstream dispatch
//! (scoring effects, text templates) is exhaustive.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for deterministic participant ids.
const PARTICIPANT_NAMESPACE: Uuid = Uuid::from_u128(0x5c1f_9a2e_4b7d_4e31_a0c6_d2f8_7e1b_93a4);

/// Participant identifier, derived deterministically from the run seed and
/// participant index.
///
/// # Examples
///
/// ```
/// use cohortsim::ParticipantId;
///
/// assert_eq!(ParticipantId::derive(42, 0), ParticipantId::derive(42, 0));
/// assert_ne!(ParticipantId::derive(42, 0), ParticipantId::derive(42, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// Derives the id for participant `index` of a run seeded with `seed`.
    #[must_use]
    pub fn derive(seed: u64, index: usize) -> Self {
        let name = format!("{seed}:{index}");
        Self(Uuid::new_v5(&PARTICIPANT_NAMESPACE, name.as_bytes()))
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Adult attachment style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttachmentStyle {
    Secure,
    Anxious,
    Avoidant,
    FearfulAvoidant,
}

impl AttachmentStyle {
    /// All styles, in balancing order.
    pub const ALL: [Self; 4] = [
        Self::Secure,
        Self::Anxious,
        Self::Avoidant,
        Self::FearfulAvoidant,
    ];

    /// Deterministic trait shifts that make the profile psychologically coherent.
    ///
    /// Fearful-avoidant personas get no shift; their traits keep the full
    /// spread of the base draw.
    #[must_use]
    pub const fn trait_deltas(self) -> &'static [(Trait, f64)] {
        match self {
            Self::Anxious => &[(Trait::Neuroticism, 15.0), (Trait::Extraversion, -10.0)],
            Self::Avoidant => &[(Trait::Openness, -10.0), (Trait::Agreeableness, -10.0)],
            Self::Secure => &[(Trait::Agreeableness, 10.0), (Trait::Neuroticism, -10.0)],
            Self::FearfulAvoidant => &[],
        }
    }
}

impl fmt::Display for AttachmentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secure => write!(f, "secure"),
            Self::Anxious => write!(f, "anxious"),
            Self::Avoidant => write!(f, "avoidant"),
            Self::FearfulAvoidant => write!(f, "fearful-avoidant"),
        }
    }
}

/// Big Five personality trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl Trait {
    /// All traits, in draw order.
    pub const ALL: [Self; 5] = [
        Self::Openness,
        Self::Conscientiousness,
        Self::Extraversion,
        Self::Agreeableness,
        Self::Neuroticism,
    ];
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Openness => write!(f, "openness"),
            Self::Conscientiousness => write!(f, "conscientiousness"),
            Self::Extraversion => write!(f, "extraversion"),
            Self::Agreeableness => write!(f, "agreeableness"),
            Self::Neuroticism => write!(f, "neuroticism"),
        }
    }
}

/// Big Five scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl PersonalityTraits {
    /// Lowest valid trait score.
    pub const MIN_SCORE: f64 = 0.0;

    /// Highest valid trait score.
    pub const MAX_SCORE: f64 = 100.0;

    /// All traits at the scale midpoint.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            openness: 50.0,
            conscientiousness: 50.0,
            extraversion: 50.0,
            agreeableness: 50.0,
            neuroticism: 50.0,
        }
    }

    /// Returns the score for a trait.
    #[must_use]
    pub const fn get(&self, t: Trait) -> f64 {
        match t {
            Trait::Openness => self.openness,
            Trait::Conscientiousness => self.conscientiousness,
            Trait::Extraversion => self.extraversion,
            Trait::Agreeableness => self.agreeableness,
            Trait::Neuroticism => self.neuroticism,
        }
    }

    /// Sets a trait, clamped into [0, 100].
    pub fn set(&mut self, t: Trait, value: f64) {
        let value = value.clamp(Self::MIN_SCORE, Self::MAX_SCORE);
        match t {
            Trait::Openness => self.openness = value,
            Trait::Conscientiousness => self.conscientiousness = value,
            Trait::Extraversion => self.extraversion = value,
            Trait::Agreeableness => self.agreeableness = value,
            Trait::Neuroticism => self.neuroticism = value,
        }
    }

    /// Returns true if every score lies in [0, 100].
    #[must_use]
    pub fn in_bounds(&self) -> bool {
        Trait::ALL
            .iter()
            .all(|t| (Self::MIN_SCORE..=Self::MAX_SCORE).contains(&self.get(*t)))
    }
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Trait-level self-criticism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfCriticism {
    Low,
    Medium,
    High,
}

impl SelfCriticism {
    /// All levels, low to high.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];
}

impl fmt::Display for SelfCriticism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Cultural orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Culture {
    Individualistic,
    Collectivistic,
    Mixed,
}

impl Culture {
    /// All orientations.
    pub const ALL: [Self; 3] = [Self::Individualistic, Self::Collectivistic, Self::Mixed];
}

/// Reported gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
}

impl Gender {
    /// All values, drawn uniformly.
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::NonBinary];
}

/// Highest completed education.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Undergraduate,
    Graduate,
    Postgraduate,
}

impl EducationLevel {
    /// All levels, drawn uniformly.
    pub const ALL: [Self; 4] = [
        Self::HighSchool,
        Self::Undergraduate,
        Self::Graduate,
        Self::Postgraduate,
    ];
}

/// Current relationship status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    Single,
    Dating,
    Committed,
    Married,
}

impl RelationshipStatus {
    /// All statuses, drawn uniformly.
    pub const ALL: [Self; 4] = [Self::Single, Self::Dating, Self::Committed, Self::Married];
}

/// Reporting-only demographics. Nothing here feeds the scoring model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    /// Age in years, 18–65.
    pub age: u8,
    pub gender: Gender,
    pub education_level: EducationLevel,
    pub relationship_status: RelationshipStatus,
    /// Self-reported baseline stress on 1–7.
    pub baseline_stress: f64,
    /// Perceived social support on 1–7.
    pub social_support: f64,
}

impl Demographics {
    pub const MIN_AGE: u8 = 18;
    pub const MAX_AGE: u8 = 65;
}

/// A simulated participant's stable profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: ParticipantId,
    /// Human-readable label, `persona_0001` onwards.
    pub label: String,
    pub attachment_style: AttachmentStyle,
    pub personality_traits: PersonalityTraits,
    pub self_criticism: SelfCriticism,
    pub culture: Culture,
    pub demographics: Demographics,
}

impl Persona {
    /// Neuroticism rescaled to [0, 1].
    #[must_use]
    pub fn neuroticism_normalized(&self) -> f64 {
        self.personality_traits.neuroticism / PersonalityTraits::MAX_SCORE
    }
}
