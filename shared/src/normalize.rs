use crate::algorithm::Algorithm;
use crate::category::{Category, CategoryTable};
use crate::consensus::{analyze, Consensus};
use crate::error::{PipelineError, PipelineResult};
use crate::wire::{RawComparisonResponse, RawModelResult, RawPredictionResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCategory {
    pub category: Category,
    pub probability: f64,
}

/// Non-fatal skew between the backend payload and the category table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizeWarning {
    CategoryMismatch { index: usize, known: usize },
    ProbabilityCountMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionView {
    pub predicted: Category,
    pub confidence: f64,
    pub ranked: Vec<RankedCategory>,
    pub warnings: Vec<NormalizeWarning>,
}

impl PredictionView {
    pub fn top(&self, count: usize) -> &[RankedCategory] {
        &self.ranked[..count.min(self.ranked.len())]
    }

    pub fn probability_of(&self, category_id: usize) -> Option<f64> {
        self.ranked
            .iter()
            .find(|entry| entry.category.id == category_id)
            .map(|entry| entry.probability)
    }
}

/// Builds the view model for one prediction.
///
/// The probability vector is authoritative: the stated `predicted_class` is
/// only kept when its probability is the maximum.
pub fn normalize(raw: &RawPredictionResponse, categories: &CategoryTable) -> PipelineResult<PredictionView> {
    let probabilities = &raw.all_probabilities;

    if probabilities.is_empty() {
        return Err(PipelineError::MalformedResponse(
            "probability vector is empty".into(),
        ));
    }

    if let Some((index, value)) = probabilities
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p < 0.0 || **p > 1.0)
    {
        return Err(PipelineError::MalformedResponse(format!(
            "probability {} at index {} is outside [0, 1]",
            value, index
        )));
    }

    let mut warnings = Vec::new();
    if probabilities.len() != categories.len() {
        log::warn!(
            "Probability vector has {} entries, category table has {}",
            probabilities.len(),
            categories.len()
        );
        warnings.push(NormalizeWarning::ProbabilityCountMismatch {
            expected: categories.len(),
            actual: probabilities.len(),
        });
    }

    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    // sort_by is stable, so equal probabilities keep ascending index order
    order.sort_by(|a, b| probabilities[*b].total_cmp(&probabilities[*a]));

    let argmax = order[0];
    let max = probabilities[argmax];
    let predicted_index = match raw.predicted_class {
        Some(stated) => match usize::try_from(stated).ok().filter(|i| *i < probabilities.len()) {
            Some(index) if probabilities[index] == max => index,
            _ => {
                log::debug!(
                    "Stated predicted_class {} disagrees with probabilities, using index {}",
                    stated,
                    argmax
                );
                argmax
            }
        },
        None => argmax,
    };

    let mut resolve = |index: usize| -> Category {
        match categories.get(index) {
            Some(category) => category.clone(),
            None => {
                log::warn!(
                    "CategoryMismatch: backend index {} has no category ({} known)",
                    index,
                    categories.len()
                );
                let warning = NormalizeWarning::CategoryMismatch {
                    index,
                    known: categories.len(),
                };
                if !warnings.contains(&warning) {
                    warnings.push(warning);
                }
                Category::placeholder(index)
            }
        }
    };

    let ranked: Vec<RankedCategory> = order
        .iter()
        .map(|&index| RankedCategory {
            category: resolve(index),
            probability: probabilities[index],
        })
        .collect();
    let predicted = resolve(predicted_index);

    Ok(PredictionView {
        predicted,
        confidence: ranked[0].probability,
        ranked,
        warnings,
    })
}

/// Per-model result of a comparison request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelOutcome {
    Success { algorithm: String, view: PredictionView },
    Failure { algorithm: String, reason: String },
}

impl ModelOutcome {
    pub fn algorithm(&self) -> &str {
        match self {
            ModelOutcome::Success { algorithm, .. } | ModelOutcome::Failure { algorithm, .. } => {
                algorithm
            }
        }
    }

    pub fn view(&self) -> Option<&PredictionView> {
        match self {
            ModelOutcome::Success { view, .. } => Some(view),
            ModelOutcome::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ModelOutcome::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonView {
    pub outcomes: Vec<ModelOutcome>,
}

impl ComparisonView {
    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// What a finished prediction produced, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredictionOutcome {
    Single { algorithm: Algorithm, view: PredictionView },
    Comparison(ComparisonView),
}

impl PredictionOutcome {
    pub fn consensus(&self) -> Option<Consensus> {
        match self {
            PredictionOutcome::Single { .. } => None,
            PredictionOutcome::Comparison(comparison) => Some(analyze(&comparison.outcomes)),
        }
    }
}

pub fn normalize_comparison(raw: &RawComparisonResponse, categories: &CategoryTable) -> ComparisonView {
    let outcomes: Vec<ModelOutcome> = raw
        .comparison_results
        .iter()
        .map(|result| match result {
            RawModelResult::Success { algorithm, prediction } => match normalize(prediction, categories) {
                Ok(view) => ModelOutcome::Success {
                    algorithm: algorithm.clone(),
                    view,
                },
                Err(e) => {
                    log::error!("Discarding {} result: {}", algorithm, e);
                    ModelOutcome::Failure {
                        algorithm: algorithm.clone(),
                        reason: e.to_string(),
                    }
                }
            },
            RawModelResult::Error { algorithm, error } => ModelOutcome::Failure {
                algorithm: algorithm.clone(),
                reason: error.clone(),
            },
        })
        .collect();

    let view = ComparisonView { outcomes };

    if let Some(reported) = raw.successful_models {
        if reported != view.successful() {
            log::warn!(
                "Backend reported {} successful models, {} normalized",
                reported,
                view.successful()
            );
        }
    }
    if let Some(reported) = raw.total_models {
        if reported != view.total() {
            log::warn!("Backend reported {} models, received {}", reported, view.total());
        }
    }

    view
}
