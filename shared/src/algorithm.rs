use crate::error::{PipelineError, PipelineResult};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{EnumIter, EnumString};

/// Backend prediction strategies. The variant names are the wire names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    Default,
    strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Algorithm {
    #[default]
    LFME,
    ERM,
    CORAL,
    Mixup,
}

/// Non-empty set of algorithms for a comparison request, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection(BTreeSet<Algorithm>);

impl ModelSelection {
    pub fn new<I: IntoIterator<Item = Algorithm>>(algorithms: I) -> PipelineResult<Self> {
        let set: BTreeSet<Algorithm> = algorithms.into_iter().collect();
        if set.is_empty() {
            return Err(PipelineError::NoModelSelected);
        }
        Ok(Self(set))
    }

    pub fn iter(&self) -> impl Iterator<Item = Algorithm> + '_ {
        self.0.iter().copied()
    }

}

/// Opaque value forwarded as the `seed` form field.
#[derive(Debug, Clone, PartialEq, Eq, Display, From, Serialize, Deserialize)]
pub struct Seed(String);

impl Seed {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Seed {
    fn default() -> Self {
        Seed("0".to_string())
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Seed::default()
        } else {
            Seed(trimmed.to_string())
        }
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Seed(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn algorithms_use_backend_names() {
        let names: Vec<String> = Algorithm::iter().map(|a| a.to_string()).collect();
        assert_eq!(names, vec!["LFME", "ERM", "CORAL", "Mixup"]);
        assert_eq!(Algorithm::from_str("mixup").unwrap(), Algorithm::Mixup);
        assert!(Algorithm::from_str("ResNet").is_err());
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert_eq!(ModelSelection::new(Vec::new()), Err(PipelineError::NoModelSelected));
    }

    #[test]
    fn selection_is_deduplicated_and_ordered() {
        let selection =
            ModelSelection::new(vec![Algorithm::Mixup, Algorithm::LFME, Algorithm::Mixup]).unwrap();
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![Algorithm::LFME, Algorithm::Mixup]);
    }

    #[test]
    fn blank_seed_falls_back_to_zero() {
        assert_eq!(Seed::from("  ").as_str(), "0");
        assert_eq!(Seed::from(" 3 ").as_str(), "3");
        assert_eq!(Seed::from(2u32).to_string(), "2");
    }
}
