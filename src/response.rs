//! Simulated responses and the participants that produced them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::persona::{ParticipantId, Persona};

/// One simulated reaction of a persona to one stimulus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub stimulus_id: String,
    pub condition_id: String,
    /// Score per DV name, each within the measure's scale.
    pub dv_scores: BTreeMap<String, f64>,
    pub open_text: String,
}

impl Response {
    /// Score for a DV, if present.
    #[must_use]
    pub fn score(&self, dv: &str) -> Option<f64> {
        self.dv_scores.get(dv).copied()
    }
}

/// A persona together with its ordered responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticParticipant {
    pub persona: Persona,
    /// Condition assigned under a between-subjects design.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_condition: Option<String>,
    pub responses: Vec<Response>,
}

impl SyntheticParticipant {
    /// Id of the underlying persona.
    #[must_use]
    pub const fn id(&self) -> ParticipantId {
        self.persona.id
    }

    /// Responses given under one condition.
    pub fn responses_in<'a>(&'a self, condition_id: &'a str) -> impl Iterator<Item = &'a Response> + 'a {
        self.responses
            .iter()
            .filter(move |r| r.condition_id == condition_id)
    }
}
