//! Experiment design types: conditions, measures and the design structure.
//!
//! A design is supplied by an upstream collaborator as plain data. It is
//! validated once at the orchestration boundary; downstream components
//! assume a validated design.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How participants are exposed to conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignType {
    /// Each participant sees one condition.
    #[serde(alias = "between")]
    BetweenSubjects,
    /// Each participant sees every condition.
    #[serde(alias = "within")]
    WithinSubjects,
    /// Mixed factors. Simulated like a within-subjects design.
    Mixed,
}

impl fmt::Display for DesignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BetweenSubjects => write!(f, "between_subjects"),
            Self::WithinSubjects => write!(f, "within_subjects"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

/// One level of the experimental manipulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Stable identifier referenced by stimuli.
    pub id: String,
    /// Human-readable label.
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manipulation_description: Option<String>,
}

impl Condition {
    /// Creates a condition.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            manipulation_description: None,
        }
    }
}

/// Inclusive bounds of a response scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl ScaleBounds {
    /// The conventional 1–7 Likert range.
    pub const LIKERT_7: Self = Self { min: 1.0, max: 7.0 };

    /// Creates scale bounds with validation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidScale` unless `min < max` and both are finite.
    pub fn new(measure: &str, min: f64, max: f64) -> Result<Self, ValidationError> {
        let bounds = Self { min, max };
        bounds.validate(measure)?;
        Ok(bounds)
    }

    fn validate(&self, measure: &str) -> Result<(), ValidationError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(ValidationError::InvalidScale {
                measure: measure.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Scale midpoint (4.0 on a 1–7 scale).
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Clamps a value into the scale.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Returns true if the value lies within the scale.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self::LIKERT_7
    }
}

/// A dependent measure scored on every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub id: String,
    /// DV name; keys `Response::dv_scores`.
    pub label: String,
    #[serde(default)]
    pub scale: ScaleBounds,
    /// Named instrument, e.g. "STAI-S". Informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<String>,
}

impl Measure {
    /// Creates a measure on the default 1–7 scale.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            scale: ScaleBounds::default(),
            instrument: None,
        }
    }

    /// Sets the scale bounds.
    #[must_use]
    pub fn with_scale(mut self, scale: ScaleBounds) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the instrument name.
    #[must_use]
    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instrument = Some(instrument.into());
        self
    }
}

/// Planned recruitment per condition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SampleSizePlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumed_effect_size: Option<String>,
    /// Inclusive `[low, high]` participants per condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_condition_range: Option<[usize; 2]>,
}

/// The experiment design handed in by the orchestrating application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDesign {
    pub design_type: DesignType,
    /// Ordered conditions.
    pub conditions: Vec<Condition>,
    /// Ordered dependent measures.
    pub measures: Vec<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size_plan: Option<SampleSizePlan>,
}

impl ExperimentDesign {
    /// Creates an empty design of the given type.
    #[must_use]
    pub fn new(design_type: DesignType) -> Self {
        Self {
            design_type,
            conditions: Vec::new(),
            measures: Vec::new(),
            sample_size_plan: None,
        }
    }

    /// Appends a condition.
    #[must_use]
    pub fn with_condition(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.conditions.push(Condition::new(id, label));
        self
    }

    /// Appends a measure.
    #[must_use]
    pub fn with_measure(mut self, measure: Measure) -> Self {
        self.measures.push(measure);
        self
    }

    /// Sets the sample size plan.
    #[must_use]
    pub fn with_sample_size_plan(mut self, plan: SampleSizePlan) -> Self {
        self.sample_size_plan = Some(plan);
        self
    }

    /// Looks up a condition by id.
    #[must_use]
    pub fn condition(&self, id: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.id == id)
    }

    /// Returns true if the condition id is declared.
    #[must_use]
    pub fn has_condition(&self, id: &str) -> bool {
        self.condition(id).is_some()
    }

    /// Checks that at least one condition is declared and ids are unique.
    ///
    /// This is the minimum persona generation needs.
    ///
    /// # Errors
    ///
    /// Returns `NoConditions`, `MissingField` or `DuplicateCondition`.
    pub fn validate_conditions(&self) -> Result<(), ValidationError> {
        if self.conditions.is_empty() {
            return Err(ValidationError::NoConditions);
        }
        let mut seen = HashSet::new();
        for condition in &self.conditions {
            if condition.id.trim().is_empty() {
                return Err(ValidationError::MissingField {
                    field: "condition.id".to_string(),
                });
            }
            if !seen.insert(condition.id.as_str()) {
                return Err(ValidationError::DuplicateCondition {
                    id: condition.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Full structural validation of conditions, measures and the sample
    /// size plan.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, naming the offending record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_conditions()?;
        if self.measures.is_empty() {
            return Err(ValidationError::NoMeasures);
        }
        let mut labels = HashSet::new();
        let mut ids = HashSet::new();
        for measure in &self.measures {
            if measure.label.trim().is_empty() {
                return Err(ValidationError::MissingField {
                    field: "measure.label".to_string(),
                });
            }
            if !labels.insert(measure.label.as_str()) {
                return Err(ValidationError::DuplicateMeasure {
                    name: measure.label.clone(),
                });
            }
            if !ids.insert(measure.id.as_str()) {
                return Err(ValidationError::DuplicateMeasure {
                    name: measure.id.clone(),
                });
            }
            measure.scale.validate(&measure.label)?;
        }
        if let Some(range) = self.sample_size_plan.as_ref().and_then(|p| p.per_condition_range) {
            validate_range(range)?;
        }
        Ok(())
    }

    /// Number of participants implied by the sample size plan.
    ///
    /// Uses the midpoint of `per_condition_range` times the number of
    /// conditions, falling back to `default_per_condition` per condition.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidSampleSizePlan` if the range is
    /// inverted or empty, or the total does not fit in `usize`.
    pub fn planned_sample_size(&self, default_per_condition: usize) -> Result<usize, ValidationError> {
        let range = self
            .sample_size_plan
            .as_ref()
            .and_then(|p| p.per_condition_range)
            .unwrap_or([default_per_condition, default_per_condition]);
        let [lo, hi] = validate_range(range)?;
        (lo + (hi - lo) / 2)
            .checked_mul(self.conditions.len())
            .ok_or(ValidationError::InvalidSampleSizePlan { low: lo, high: hi })
    }
}

fn validate_range([lo, hi]: [usize; 2]) -> Result<[usize; 2], ValidationError> {
    if lo > hi || hi == 0 {
        return Err(ValidationError::InvalidSampleSizePlan { low: lo, high: hi });
    }
    Ok([lo, hi])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_condition_design() -> ExperimentDesign {
        ExperimentDesign::new(DesignType::BetweenSubjects)
            .with_condition("control", "Control")
            .with_condition("treatment", "Treatment")
            .with_measure(Measure::new("anx", "State Anxiety"))
    }

    #[test]
    fn test_valid_design() {
        two_condition_design().validate().unwrap();
    }

    #[test]
    fn test_design_rejects_no_conditions() {
        let d = ExperimentDesign::new(DesignType::WithinSubjects)
            .with_measure(Measure::new("anx", "State Anxiety"));
        assert_eq!(d.validate(), Err(ValidationError::NoConditions));
        assert_eq!(d.validate_conditions(), Err(ValidationError::NoConditions));
    }

    #[test]
    fn test_design_rejects_no_measures() {
        let d = ExperimentDesign::new(DesignType::WithinSubjects).with_condition("a", "A");
        assert_eq!(d.validate(), Err(ValidationError::NoMeasures));
        // Persona generation only needs conditions.
        d.validate_conditions().unwrap();
    }

    #[test]
    fn test_design_rejects_duplicates() {
        let d = two_condition_design().with_condition("control", "Again");
        assert!(matches!(
            d.validate(),
            Err(ValidationError::DuplicateCondition { id }) if id == "control"
        ));

        let d = two_condition_design().with_measure(Measure::new("anx2", "State Anxiety"));
        assert!(matches!(
            d.validate(),
            Err(ValidationError::DuplicateMeasure { name }) if name == "State Anxiety"
        ));
    }

    #[test]
    fn test_design_rejects_inverted_scale() {
        let d = two_condition_design().with_measure(
            Measure::new("mood", "Mood").with_scale(ScaleBounds { min: 5.0, max: 1.0 }),
        );
        assert!(matches!(d.validate(), Err(ValidationError::InvalidScale { .. })));
        assert!(ScaleBounds::new("Mood", 0.0, 0.0).is_err());
        assert!(ScaleBounds::new("Mood", 0.0, 10.0).is_ok());
    }

    #[test]
    fn test_scale_midpoint_and_clamp() {
        let s = ScaleBounds::LIKERT_7;
        assert_eq!(s.midpoint(), 4.0);
        assert_eq!(s.clamp(9.3), 7.0);
        assert_eq!(s.clamp(-2.0), 1.0);
        assert!(s.contains(1.0));
        assert!(!s.contains(7.01));
    }

    #[test]
    fn test_planned_sample_size() {
        let d = two_condition_design();
        assert_eq!(d.planned_sample_size(50), Ok(100));

        let d = d.with_sample_size_plan(SampleSizePlan {
            assumed_effect_size: Some("medium".to_string()),
            per_condition_range: Some([40, 60]),
        });
        assert_eq!(d.planned_sample_size(50), Ok(100));

        let mut d = d;
        d.sample_size_plan = Some(SampleSizePlan {
            assumed_effect_size: None,
            per_condition_range: Some([25, 30]),
        });
        assert_eq!(d.planned_sample_size(50), Ok(54));
    }

    #[test]
    fn test_bad_sample_size_plan_is_rejected() {
        let plan = |range| {
            two_condition_design().with_sample_size_plan(SampleSizePlan {
                assumed_effect_size: None,
                per_condition_range: Some(range),
            })
        };

        let huge = plan([usize::MAX - 1, usize::MAX]);
        huge.validate().unwrap();
        assert_eq!(
            huge.planned_sample_size(50),
            Err(ValidationError::InvalidSampleSizePlan {
                low: usize::MAX - 1,
                high: usize::MAX,
            })
        );

        let inverted = plan([usize::MAX, 2]);
        let expected = ValidationError::InvalidSampleSizePlan { low: usize::MAX, high: 2 };
        assert_eq!(inverted.validate(), Err(expected.clone()));
        assert_eq!(inverted.planned_sample_size(50), Err(expected));

        let inverted = plan([60, 40]);
        let expected = ValidationError::InvalidSampleSizePlan { low: 60, high: 40 };
        assert_eq!(inverted.validate(), Err(expected.clone()));
        assert_eq!(inverted.planned_sample_size(50), Err(expected));

        assert!(plan([0, 0]).validate().is_err());
        assert_eq!(plan([0, 3]).planned_sample_size(50), Ok(2));
    }

    #[test]
    fn test_design_from_json_defaults_scale() {
        let json = r#"{
            "design_type": "between",
            "conditions": [{"id": "a", "label": "A"}],
            "measures": [{"id": "anx", "label": "State Anxiety"}]
        }"#;
        let d: ExperimentDesign = serde_json::from_str(json).unwrap();
        assert_eq!(d.design_type, DesignType::BetweenSubjects);
        assert_eq!(d.measures[0].scale, ScaleBounds::LIKERT_7);
        d.validate().unwrap();
    }
}
