//! Accuracy, precision, recall and F1 over one recommendation window.
//!
//! All inputs are index-aligned slices for the rows of the window the engine
//! returned. "Relevant" means the true label is 1.
//!
//! Precision and recall share the same numerator (positions where the
//! prediction matches the truth on a relevant row) and the same denominator
//! (number of relevant rows). Any ratio whose denominator is zero is 0.0,
//! including every metric on an empty window.

use data_loader::Label;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Threshold applied to classifier scores in [`EvaluationMode::ModelPredictions`]
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Where the predicted labels for a window come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationMode {
    /// Predictions are copied from the true labels. Every metric is 1.0 on a
    /// window with positives; useful only to check the plumbing.
    #[default]
    SanityCheck,
    /// Predictions are `score >= 0.5` from the classifier
    ModelPredictions,
}

impl EvaluationMode {
    /// Predicted labels for a window given its true labels and scores
    pub fn predictions(&self, true_labels: &[Label], scores: &[f32]) -> Vec<Label> {
        match self {
            Self::SanityCheck => true_labels.to_vec(),
            Self::ModelPredictions => scores
                .iter()
                .map(|&s| Label::from(s >= DECISION_THRESHOLD))
                .collect(),
        }
    }
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SanityCheck => write!(f, "sanity-check"),
            Self::ModelPredictions => write!(f, "model-predictions"),
        }
    }
}

impl FromStr for EvaluationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sanity-check" | "sanity" => Ok(Self::SanityCheck),
            "model-predictions" | "model" => Ok(Self::ModelPredictions),
            other => Err(format!(
                "unknown evaluation mode '{other}' (expected sanity-check or model-predictions)"
            )),
        }
    }
}

/// The four window metrics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Metrics {
    pub accuracy: f32,
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
}

impl Metrics {
    pub fn compute(true_labels: &[Label], predicted: &[Label], relevant: &[Label]) -> Self {
        let precision = precision(true_labels, predicted, relevant);
        let recall = recall(true_labels, predicted, relevant);
        Self {
            accuracy: accuracy(true_labels, predicted),
            precision,
            recall,
            f1: f1_score(precision, recall),
        }
    }

    /// Metrics for a window: relevance is derived from the true labels and
    /// predictions from `mode`.
    pub fn for_window(true_labels: &[Label], scores: &[f32], mode: EvaluationMode) -> Self {
        let predicted = mode.predictions(true_labels, scores);
        let relevant = relevant_from_labels(true_labels);
        Self::compute(true_labels, &predicted, &relevant)
    }
}

/// 1 where the true label is positive
pub fn relevant_from_labels(true_labels: &[Label]) -> Vec<Label> {
    true_labels.iter().map(|&l| Label::from(l == 1)).collect()
}

/// Share of positions where prediction equals truth
pub fn accuracy(true_labels: &[Label], predicted: &[Label]) -> f32 {
    let correct = true_labels
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    ratio(correct, predicted.len())
}

/// Correct relevant positions over relevant positions
pub fn precision(true_labels: &[Label], predicted: &[Label], relevant: &[Label]) -> f32 {
    ratio(correct_relevant(true_labels, predicted, relevant), relevant_count(relevant))
}

/// Correct relevant positions over relevant items
pub fn recall(true_labels: &[Label], predicted: &[Label], relevant: &[Label]) -> f32 {
    ratio(correct_relevant(true_labels, predicted, relevant), relevant_count(relevant))
}

/// Harmonic mean, 0.0 when both inputs are 0
pub fn f1_score(precision: f32, recall: f32) -> f32 {
    let sum = precision + recall;
    if sum <= 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / sum
}

fn correct_relevant(true_labels: &[Label], predicted: &[Label], relevant: &[Label]) -> usize {
    true_labels
        .iter()
        .zip(predicted)
        .zip(relevant)
        .filter(|((t, p), r)| t == p && **r == 1)
        .count()
}

fn relevant_count(relevant: &[Label]) -> usize {
    relevant.iter().filter(|&&r| r == 1).count()
}

fn ratio(numerator: usize, denominator: usize) -> f32 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f32 / denominator as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_reference_fixture() {
        let truth = [1, 0, 1, 1];
        let predicted = [1, 0, 0, 1];
        let relevant = [1, 0, 1, 1];

        let m = Metrics::compute(&truth, &predicted, &relevant);

        assert!(close(m.accuracy, 0.75));
        assert!(close(m.precision, 2.0 / 3.0));
        assert!(close(m.recall, 2.0 / 3.0));
        assert!(close(m.f1, 0.667));
    }

    #[test]
    fn test_empty_window_is_all_zero() {
        let m = Metrics::compute(&[], &[], &[]);
        assert_eq!(m, Metrics::default());
        assert_eq!(m.accuracy, 0.0);
        assert_eq!(m.f1, 0.0);
    }

    #[test]
    fn test_no_relevant_items() {
        let m = Metrics::compute(&[0, 0, 0], &[0, 1, 0], &[0, 0, 0]);
        assert!(close(m.accuracy, 2.0 / 3.0));
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f1, 0.0);
    }

    #[test]
    fn test_sanity_check_mode_copies_labels() {
        let truth = [1, 0, 1];
        let m = Metrics::for_window(&truth, &[0.1, 0.9, 0.2], EvaluationMode::SanityCheck);
        assert_eq!(m.accuracy, 1.0);
        assert_eq!(m.precision, 1.0);
        assert_eq!(m.recall, 1.0);
        assert_eq!(m.f1, 1.0);
    }

    #[test]
    fn test_model_mode_thresholds_scores() {
        let truth = [1, 0, 1, 1];
        let scores = [0.9, 0.2, 0.4, 0.5];
        assert_eq!(
            EvaluationMode::ModelPredictions.predictions(&truth, &scores),
            vec![1, 0, 0, 1]
        );

        let m = Metrics::for_window(&truth, &scores, EvaluationMode::ModelPredictions);
        assert!(close(m.accuracy, 0.75));
        assert!(close(m.recall, 2.0 / 3.0));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("sanity-check".parse(), Ok(EvaluationMode::SanityCheck));
        assert_eq!("Model".parse(), Ok(EvaluationMode::ModelPredictions));
        assert!("nope".parse::<EvaluationMode>().is_err());
        assert_eq!(EvaluationMode::ModelPredictions.to_string(), "model-predictions");
    }
}
