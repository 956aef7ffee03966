//! Design diagnostics over a simulated population.
//!
//! - [`stats`]: descriptive statistics, pooled SD, Cohen's d
//! - [`summary`]: the [`SimulationSummary`] record and its parts
//!
//! Diagnostics is a single read-only pass from responses to summary. DVs
//! are independent partitions and are analysed in parallel, then
//! reassembled in design order, so the summary does not depend on thread
//! scheduling.

pub mod stats;
pub mod summary;

pub use stats::{cohens_d, pooled_sd, ConditionStats, EffectSizeBand};
pub use summary::{
    ConditionSummary, DegeneracyReason, DegenerateStatisticWarning, DvSummary, EffectEstimate,
    SampleResponse, SimulationSummary, WeakEffect,
};

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::design::ExperimentDesign;
use crate::error::ValidationError;
use crate::persona::AttachmentStyle;
use crate::response::SyntheticParticipant;

/// Computes summary statistics and flags design weaknesses.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsEngine {
    dead_variable_sd_threshold: f64,
    weak_effect_threshold: f64,
    sample_response_count: usize,
}

impl Default for DiagnosticsEngine {
    fn default() -> Self {
        let config = SimulationConfig::default();
        Self {
            dead_variable_sd_threshold: config.dead_variable_sd_threshold,
            weak_effect_threshold: config.weak_effect_threshold,
            sample_response_count: config.sample_response_count,
        }
    }
}

/// Everything learned about one DV.
struct DvAnalysis {
    summary: DvSummary,
    dead: bool,
    weak_effects: Vec<WeakEffect>,
    estimates: Vec<EffectEstimate>,
    warnings: Vec<DegenerateStatisticWarning>,
}

impl DiagnosticsEngine {
    /// Builds an engine from a config.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidConfig` if the config fails validation.
    pub fn new(config: &SimulationConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            dead_variable_sd_threshold: config.dead_variable_sd_threshold,
            weak_effect_threshold: config.weak_effect_threshold,
            sample_response_count: config.sample_response_count,
        })
    }

    /// Computes the summary for a simulated population.
    ///
    /// Pure: the same participants and design always produce an equal summary.
    #[must_use]
    pub fn compute_diagnostics(
        &self,
        participants: &[SyntheticParticipant],
        design: &ExperimentDesign,
    ) -> SimulationSummary {
        let analyses: Vec<DvAnalysis> = design
            .measures
            .par_iter()
            .map(|measure| self.analyze_dv(&measure.label, participants, design))
            .collect();

        let mut summary = SimulationSummary {
            dv_summary: Vec::with_capacity(analyses.len()),
            dead_vars: Vec::new(),
            weak_effects: Vec::new(),
            effect_estimates: Vec::new(),
            sample_responses: self.sample_responses(participants),
            warnings: Vec::new(),
            participant_count: participants.len(),
            response_count: participants.iter().map(|p| p.responses.len()).sum(),
        };
        for analysis in analyses {
            if analysis.dead {
                summary.dead_vars.push(analysis.summary.dv.clone());
            }
            summary.dv_summary.push(analysis.summary);
            summary.weak_effects.extend(analysis.weak_effects);
            summary.effect_estimates.extend(analysis.estimates);
            summary.warnings.extend(analysis.warnings);
        }

        info!(
            dead_vars = summary.dead_vars.len(),
            weak_effects = summary.weak_effects.len(),
            skipped = summary.warnings.len(),
            "diagnostics complete"
        );
        summary
    }

    fn analyze_dv(
        &self,
        dv: &str,
        participants: &[SyntheticParticipant],
        design: &ExperimentDesign,
    ) -> DvAnalysis {
        let mut warnings = Vec::new();
        let mut conditions = Vec::new();

        for condition in &design.conditions {
            let scores: Vec<f64> = participants
                .iter()
                .flat_map(|p| p.responses_in(&condition.id))
                .filter_map(|r| r.score(dv))
                .collect();
            match ConditionStats::from_scores(&scores) {
                Some(stats) => conditions.push(ConditionSummary {
                    condition_id: condition.id.clone(),
                    stats,
                }),
                None => warnings.push(DegenerateStatisticWarning {
                    dv: dv.to_string(),
                    conditions: vec![condition.id.clone()],
                    reason: DegeneracyReason::NoResponses,
                }),
            }
        }

        let dead = self.is_dead(dv, &conditions, &mut warnings);

        let mut weak_effects = Vec::new();
        let mut estimates = Vec::new();
        for (i, a) in conditions.iter().enumerate() {
            for b in &conditions[i + 1..] {
                let d = match cohens_d(&a.stats, &b.stats) {
                    Ok(d) => d,
                    Err(reason) => {
                        debug!(dv, a = %a.condition_id, b = %b.condition_id, %reason, "comparison skipped");
                        warnings.push(DegenerateStatisticWarning {
                            dv: dv.to_string(),
                            conditions: vec![a.condition_id.clone(), b.condition_id.clone()],
                            reason,
                        });
                        continue;
                    }
                };

                estimates.push(EffectEstimate {
                    dv: dv.to_string(),
                    condition_a: a.condition_id.clone(),
                    condition_b: b.condition_id.clone(),
                    cohens_d: d,
                    mean_diff: a.stats.mean - b.stats.mean,
                    interpretation: EffectSizeBand::classify(d),
                });

                if d.abs() < self.weak_effect_threshold {
                    warn!(dv, a = %a.condition_id, b = %b.condition_id, d, "weak effect");
                    weak_effects.push(WeakEffect {
                        dv: dv.to_string(),
                        condition_a: a.condition_id.clone(),
                        condition_b: b.condition_id.clone(),
                        cohens_d: d,
                        message: format!(
                            "Weak effect between {} and {} on {dv} (d={d:.3}, {})",
                            a.condition_id,
                            b.condition_id,
                            EffectSizeBand::classify(d)
                        ),
                    });
                }
            }
        }

        DvAnalysis {
            summary: DvSummary {
                dv: dv.to_string(),
                conditions,
            },
            dead,
            weak_effects,
            estimates,
            warnings,
        }
    }

    /// A DV is dead when every condition able to show variance shows less
    /// than the threshold. Conditions with `n < 2` cannot witness variance.
    fn is_dead(
        &self,
        dv: &str,
        conditions: &[ConditionSummary],
        warnings: &mut Vec<DegenerateStatisticWarning>,
    ) -> bool {
        let mut witnesses = conditions
            .iter()
            .filter(|c| c.stats.has_variance_estimate())
            .peekable();
        if witnesses.peek().is_none() {
            warnings.push(DegenerateStatisticWarning {
                dv: dv.to_string(),
                conditions: Vec::new(),
                reason: DegeneracyReason::NoVarianceWitness,
            });
            return false;
        }
        let dead = witnesses.all(|c| c.stats.sd < self.dead_variable_sd_threshold);
        if dead {
            warn!(dv, threshold = self.dead_variable_sd_threshold, "dead variable");
        }
        dead
    }

    /// Picks open-text samples, diversity first.
    ///
    /// The first response of the first participant of each attachment style
    /// comes first, then remaining responses in participant order.
    fn sample_responses(&self, participants: &[SyntheticParticipant]) -> Vec<SampleResponse> {
        let limit = self.sample_response_count;
        let mut picked: Vec<(usize, usize)> = Vec::with_capacity(limit);
        let mut seen_styles: HashSet<AttachmentStyle> = HashSet::new();

        for (pi, participant) in participants.iter().enumerate() {
            if picked.len() >= limit {
                break;
            }
            let has_text = participant
                .responses
                .first()
                .is_some_and(|r| !r.open_text.is_empty());
            if has_text && seen_styles.insert(participant.persona.attachment_style) {
                picked.push((pi, 0));
            }
        }

        'fill: for (pi, participant) in participants.iter().enumerate() {
            for (ri, response) in participant.responses.iter().enumerate() {
                if picked.len() >= limit {
                    break 'fill;
                }
                if !response.open_text.is_empty() && !picked.contains(&(pi, ri)) {
                    picked.push((pi, ri));
                }
            }
        }

        picked
            .into_iter()
            .map(|(pi, ri)| {
                let participant = &participants[pi];
                let response = &participant.responses[ri];
                SampleResponse {
                    participant_id: participant.id(),
                    attachment_style: participant.persona.attachment_style,
                    condition_id: response.condition_id.clone(),
                    text: response.open_text.clone(),
                }
            })
            .collect()
    }
}

/// Computes diagnostics with the default thresholds.
#[must_use]
pub fn compute_diagnostics(
    participants: &[SyntheticParticipant],
    design: &ExperimentDesign,
) -> SimulationSummary {
    DiagnosticsEngine::default().compute_diagnostics(participants, design)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::design::{DesignType, Measure};
    use crate::generator::create_personas;
    use crate::response::Response;

    fn design() -> ExperimentDesign {
        ExperimentDesign::new(DesignType::BetweenSubjects)
            .with_condition("a", "A")
            .with_condition("b", "B")
            .with_measure(Measure::new("flat", "Flat"))
            .with_measure(Measure::new("anx", "State Anxiety"))
    }

    /// Participants with hand-picked scores: `scores[i]` is `(condition, flat, anxiety)`.
    fn participants(scores: &[(&str, f64, f64)]) -> Vec<SyntheticParticipant> {
        let personas = create_personas(scores.len(), &design(), 1).unwrap();
        personas
            .into_iter()
            .zip(scores)
            .enumerate()
            .map(|(i, (persona, (condition, flat, anx)))| {
                let mut dv_scores = BTreeMap::new();
                dv_scores.insert("Flat".to_string(), *flat);
                dv_scores.insert("State Anxiety".to_string(), *anx);
                SyntheticParticipant {
                    persona,
                    assigned_condition: Some((*condition).to_string()),
                    responses: vec![Response {
                        stimulus_id: format!("s{i}"),
                        condition_id: (*condition).to_string(),
                        dv_scores,
                        open_text: format!("text {i}"),
                    }],
                }
            })
            .collect()
    }

    #[test]
    fn constant_dv_is_dead() {
        let ps = participants(&[
            ("a", 4.0, 2.0),
            ("a", 4.0, 3.0),
            ("a", 4.0, 2.5),
            ("b", 4.0, 6.0),
            ("b", 4.0, 5.0),
            ("b", 4.0, 5.5),
        ]);
        let summary = compute_diagnostics(&ps, &design());
        assert_eq!(summary.dead_vars, vec!["Flat".to_string()]);
        assert!(!summary.is_dead("State Anxiety"));
        // Flat has zero pooled SD: skipped with a warning, not flagged weak.
        assert!(summary.weak_effect("Flat", "a", "b").is_none());
        assert!(summary
            .warnings
            .iter()
            .any(|w| w.dv == "Flat" && w.reason == DegeneracyReason::ZeroPooledVariance));
    }

    #[test]
    fn near_identical_means_are_flagged_weak() {
        // Means 4.0 vs 4.05, SD 1.0 in both conditions.
        let ps = participants(&[
            ("a", 3.0, 1.0),
            ("a", 4.0, 1.0),
            ("a", 5.0, 1.0),
            ("b", 3.05, 7.0),
            ("b", 4.05, 7.0),
            ("b", 5.05, 7.0),
        ]);
        let summary = compute_diagnostics(&ps, &design());
        let a = summary.stats("Flat", "a").unwrap();
        let b = summary.stats("Flat", "b").unwrap();
        assert!((a.mean - 4.0).abs() < 1e-9);
        assert!((b.mean - 4.05).abs() < 1e-9);
        assert!((a.sd - 1.0).abs() < 1e-9);
        assert!((b.sd - 1.0).abs() < 1e-9);

        let weak = summary.weak_effect("Flat", "a", "b").unwrap();
        assert!((weak.cohens_d + 0.05).abs() < 1e-9);
        assert!(!summary.is_dead("Flat"));
    }

    #[test]
    fn well_separated_conditions_are_not_weak() {
        let ps = participants(&[
            ("a", 3.0, 2.0),
            ("a", 5.0, 3.0),
            ("a", 4.0, 2.5),
            ("b", 3.5, 6.0),
            ("b", 4.5, 5.0),
            ("b", 4.0, 5.5),
        ]);
        let summary = compute_diagnostics(&ps, &design());
        assert!(summary.weak_effect("State Anxiety", "a", "b").is_none());
        let estimate = summary
            .effect_estimates
            .iter()
            .find(|e| e.dv == "State Anxiety")
            .unwrap();
        assert_eq!(estimate.interpretation, EffectSizeBand::Large);
        assert!(estimate.mean_diff < 0.0);

        // Flat has equal means: d = 0, flagged weak.
        let weak = summary.weak_effect("Flat", "a", "b").unwrap();
        assert_eq!(weak.cohens_d, 0.0);
        assert!(weak.message.contains("Flat"));
    }

    #[test]
    fn per_condition_stats() {
        let ps = participants(&[("a", 1.0, 2.0), ("a", 3.0, 4.0), ("b", 5.0, 6.0)]);
        let summary = compute_diagnostics(&ps, &design());
        let a = summary.stats("Flat", "a").unwrap();
        assert_eq!(a.n, 2);
        assert!((a.mean - 2.0).abs() < 1e-12);
        assert!((a.sd - 2f64.sqrt()).abs() < 1e-12);
        let b = summary.stats("Flat", "b").unwrap();
        assert_eq!(b.n, 1);
        assert_eq!(b.sd, 0.0);
        // n < 2 in b: comparison skipped with a warning per DV.
        assert!(summary.weak_effects.is_empty());
        assert_eq!(
            summary
                .warnings
                .iter()
                .filter(|w| matches!(w.reason, DegeneracyReason::InsufficientSamples { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn empty_condition_is_reported() {
        let ps = participants(&[("a", 1.0, 2.0), ("a", 3.0, 4.0)]);
        let summary = compute_diagnostics(&ps, &design());
        assert!(summary.stats("Flat", "b").is_none());
        assert!(summary
            .warnings
            .iter()
            .any(|w| w.reason == DegeneracyReason::NoResponses && w.conditions == vec!["b".to_string()]));
    }

    #[test]
    fn single_responses_cannot_witness_variance() {
        let ps = participants(&[("a", 4.0, 4.0), ("b", 4.0, 4.0)]);
        let summary = compute_diagnostics(&ps, &design());
        assert!(summary.dead_vars.is_empty());
        assert!(summary
            .warnings
            .iter()
            .any(|w| w.reason == DegeneracyReason::NoVarianceWitness));
    }

    #[test]
    fn thresholds_are_configurable() {
        let ps = participants(&[
            ("a", 3.0, 2.0),
            ("a", 5.0, 3.0),
            ("a", 4.0, 2.5),
            ("b", 3.5, 6.0),
            ("b", 4.5, 5.0),
            ("b", 4.0, 5.5),
        ]);
        let config = SimulationConfig::default().with_weak_effect_threshold(100.0);
        let engine = DiagnosticsEngine::new(&config).unwrap();
        let summary = engine.compute_diagnostics(&ps, &design());
        assert!(summary.weak_effect("State Anxiety", "a", "b").is_some());
    }

    #[test]
    fn samples_span_styles_first() {
        let ps = participants(&[
            ("a", 1.0, 1.0),
            ("a", 2.0, 2.0),
            ("a", 3.0, 3.0),
            ("b", 4.0, 4.0),
            ("b", 5.0, 5.0),
            ("b", 6.0, 6.0),
            ("b", 6.0, 6.0),
            ("b", 6.0, 6.0),
        ]);
        let mut config = SimulationConfig::default();
        config.sample_response_count = 4;
        let engine = DiagnosticsEngine::new(&config).unwrap();
        let summary = engine.compute_diagnostics(&ps, &design());
        let styles: HashSet<_> = summary.sample_responses.iter().map(|s| s.attachment_style).collect();
        assert_eq!(summary.sample_responses.len(), 4);
        assert_eq!(styles.len(), 4);
    }

    #[test]
    fn diagnostics_are_idempotent() {
        let ps = participants(&[("a", 1.0, 2.0), ("a", 3.0, 4.5), ("b", 5.0, 6.0), ("b", 2.0, 6.5)]);
        let d = design();
        assert_eq!(compute_diagnostics(&ps, &d), compute_diagnostics(&ps, &d));
    }
}
