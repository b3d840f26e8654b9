//! Browser-independent prediction pipeline shared by the web frontend and the CLI:
//! intake, request building, normalization and consensus.

pub mod algorithm;
pub mod category;
pub mod config;
pub mod consensus;
pub mod dispatch;
pub mod error;
pub mod i18n;
pub mod intake;
pub mod normalize;
pub mod wire;

pub use algorithm::{Algorithm, ModelSelection, Seed};
pub use category::{Category, CategoryTable};
pub use config::{ApiConfig, Endpoint};
pub use consensus::{analyze, Consensus, ConsensusGroup};
pub use dispatch::{
    complete_prediction, interpret_response, PredictionRequest, RequestKind, RequestSequence,
    RequestTicket,
};
pub use error::{PipelineError, PipelineResult};
pub use i18n::{Locale, TranslationProvider, Translator};
pub use intake::{validate, validate_first, validate_strict, FileMeta, ValidatedFile, ValidationReport};
pub use normalize::{
    normalize, normalize_comparison, ComparisonView, ModelOutcome, NormalizeWarning,
    PredictionOutcome, PredictionView, RankedCategory,
};
pub use wire::{RawComparisonResponse, RawModelResult, RawPredictionResponse};
