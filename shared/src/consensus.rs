use crate::category::Category;
use crate::normalize::ModelOutcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusGroup {
    pub category: Category,
    pub count: usize,
    /// Share of successful models, 0-100.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Consensus {
    /// No model produced a prediction.
    NoData,
    Unanimous(Category),
    /// Groups sorted by count, then by category id.
    Split(Vec<ConsensusGroup>),
}

pub fn analyze(outcomes: &[ModelOutcome]) -> Consensus {
    let predictions: Vec<&Category> = outcomes
        .iter()
        .filter_map(|outcome| outcome.view())
        .map(|view| &view.predicted)
        .collect();

    let Some(first) = predictions.first() else {
        return Consensus::NoData;
    };

    if predictions.iter().all(|p| p.id == first.id) {
        return Consensus::Unanimous((*first).clone());
    }

    let mut groups: Vec<ConsensusGroup> = Vec::new();
    for category in &predictions {
        match groups.iter_mut().find(|g| g.category.id == category.id) {
            Some(group) => group.count += 1,
            None => groups.push(ConsensusGroup {
                category: (*category).clone(),
                count: 1,
                percentage: 0.0,
            }),
        }
    }

    let successful = predictions.len() as f64;
    for group in &mut groups {
        group.percentage = group.count as f64 * 100.0 / successful;
    }
    groups.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.id.cmp(&b.category.id)));

    Consensus::Split(groups)
}
