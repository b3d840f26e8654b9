use crate::algorithm::{Algorithm, ModelSelection, Seed};
use crate::config::Endpoint;
use crate::error::{PipelineError, PipelineResult};
use crate::category::CategoryTable;
use crate::intake::ValidatedFile;
use crate::normalize::{normalize, normalize_comparison, PredictionOutcome};
use crate::wire::{ErrorBody, RawComparisonResponse, RawPredictionResponse};
use serde::de::DeserializeOwned;

pub const FILE_FIELD: &str = "file";
pub const ALGORITHM_FIELD: &str = "algorithm";
pub const MODELS_FIELD: &str = "models";
pub const SEED_FIELD: &str = "seed";

/// Which endpoint a request targets and how its answer is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Single(Algorithm),
    Comparison,
}

impl RequestKind {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            RequestKind::Single(_) => Endpoint::Predict,
            RequestKind::Comparison => Endpoint::PredictAll,
        }
    }
}

/// A multipart prediction request, independent of the HTTP client that sends it.
///
/// The file always goes first under [`FILE_FIELD`]; `text_fields` follow in order.
#[derive(Debug)]
pub struct PredictionRequest<'a, B> {
    pub kind: RequestKind,
    pub file: &'a ValidatedFile<B>,
    pub text_fields: Vec<(&'static str, String)>,
}

impl<'a, B> PredictionRequest<'a, B> {
    pub fn single(file: &'a ValidatedFile<B>, algorithm: Algorithm, seed: &Seed) -> Self {
        Self {
            kind: RequestKind::Single(algorithm),
            file,
            text_fields: vec![
                (ALGORITHM_FIELD, algorithm.to_string()),
                (SEED_FIELD, seed.to_string()),
            ],
        }
    }

    pub fn multi(file: &'a ValidatedFile<B>, seed: &Seed, models: &ModelSelection) -> Self {
        let mut text_fields = vec![(SEED_FIELD, seed.to_string())];
        text_fields.extend(models.iter().map(|m| (MODELS_FIELD, m.to_string())));
        Self {
            kind: RequestKind::Comparison,
            file,
            text_fields,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.kind.endpoint()
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        std::iter::once(FILE_FIELD)
            .chain(self.text_fields.iter().map(|(name, _)| *name))
            .collect()
    }
}

/// Turns a finished HTTP exchange into the expected payload.
///
/// Non-2xx statuses become [`PipelineError::HttpError`], carrying the body's
/// `error` field when the backend sent one.
pub fn interpret_response<T: DeserializeOwned>(status: u16, body: &str) -> PipelineResult<T> {
    if !(200..300).contains(&status) {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) if !body.trim().is_empty() => body.trim().to_string(),
            Err(_) => canonical_reason(status).to_string(),
        };
        return Err(PipelineError::HttpError {
            status: Some(status),
            message,
        });
    }

    serde_json::from_str(body).map_err(|e| PipelineError::MalformedResponse(e.to_string()))
}

/// Interprets and normalizes the answer to a request of the given kind.
pub fn complete_prediction(
    kind: RequestKind,
    status: u16,
    body: &str,
    categories: &CategoryTable,
) -> PipelineResult<PredictionOutcome> {
    match kind {
        RequestKind::Single(algorithm) => {
            let raw: RawPredictionResponse = interpret_response(status, body)?;
            let view = normalize(&raw, categories)?;
            Ok(PredictionOutcome::Single { algorithm, view })
        }
        RequestKind::Comparison => {
            let raw: RawComparisonResponse = interpret_response(status, body)?;
            Ok(PredictionOutcome::Comparison(normalize_comparison(&raw, categories)))
        }
    }
}

fn canonical_reason(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        404 => "Not Found",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown error",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// At most one prediction in flight; late answers to superseded requests are dropped.
#[derive(Debug, Default)]
pub struct RequestSequence {
    last_issued: u64,
    in_flight: Option<RequestTicket>,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> PipelineResult<RequestTicket> {
        if self.in_flight.is_some() {
            return Err(PipelineError::Busy);
        }
        self.last_issued += 1;
        let ticket = RequestTicket(self.last_issued);
        self.in_flight = Some(ticket);
        Ok(ticket)
    }

    /// Returns true when `ticket` is the current request and its response
    /// should be applied. Either way the ticket is finished afterwards.
    pub fn settle(&mut self, ticket: RequestTicket) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            true
        } else {
            log::debug!("Ignoring stale response for request #{}", ticket.id());
            false
        }
    }

    /// Forgets the in-flight request so its response will be ignored.
    pub fn invalidate(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            log::debug!("Request #{} superseded", ticket.id());
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::{validate, FileMeta};

    fn image() -> ValidatedFile<Vec<u8>> {
        validate(vec![0xff, 0xd8], FileMeta::new("cat.jpg", "image/jpeg", 2)).unwrap()
    }

    #[test]
    fn single_request_carries_algorithm_and_seed() {
        let file = image();
        let request = PredictionRequest::single(&file, Algorithm::CORAL, &Seed::default());

        assert_eq!(request.endpoint(), Endpoint::Predict);
        assert_eq!(request.field_names(), vec!["file", "algorithm", "seed"]);
        assert_eq!(
            request.text_fields,
            vec![("algorithm", "CORAL".to_string()), ("seed", "0".to_string())]
        );
    }

    #[test]
    fn multi_request_repeats_the_models_field() {
        let file = image();
        let models = ModelSelection::new(vec![Algorithm::Mixup, Algorithm::LFME, Algorithm::ERM]).unwrap();
        let request = PredictionRequest::multi(&file, &Seed::from("2"), &models);

        assert_eq!(request.endpoint(), Endpoint::PredictAll);
        assert_eq!(request.field_names(), vec!["file", "seed", "models", "models", "models"]);
        let models: Vec<&str> = request
            .text_fields
            .iter()
            .filter(|(name, _)| *name == MODELS_FIELD)
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(models, vec!["LFME", "ERM", "Mixup"]);
    }

    #[test]
    fn success_bodies_are_parsed() {
        let raw: RawPredictionResponse =
            interpret_response(200, r#"{"predicted_class": 1, "all_probabilities": [0.2, 0.8]}"#).unwrap();
        assert_eq!(raw.predicted_class, Some(1));
    }

    #[test]
    fn unparseable_success_is_malformed() {
        let result: PipelineResult<RawPredictionResponse> = interpret_response(200, "<html>");
        assert!(matches!(result, Err(PipelineError::MalformedResponse(_))));
    }

    #[test]
    fn error_statuses_collapse_into_http_errors() {
        let with_json: PipelineResult<RawPredictionResponse> =
            interpret_response(400, r#"{"error": "Unsupported file type"}"#);
        assert_eq!(
            with_json.unwrap_err(),
            PipelineError::HttpError {
                status: Some(400),
                message: "Unsupported file type".into()
            }
        );

        let with_text: PipelineResult<RawPredictionResponse> = interpret_response(502, " upstream down ");
        assert_eq!(
            with_text.unwrap_err(),
            PipelineError::HttpError {
                status: Some(502),
                message: "upstream down".into()
            }
        );

        let empty: PipelineResult<RawPredictionResponse> = interpret_response(500, "");
        assert_eq!(
            empty.unwrap_err(),
            PipelineError::HttpError {
                status: Some(500),
                message: "Internal Server Error".into()
            }
        );
    }

    #[test]
    fn completed_single_prediction_is_normalized() {
        let table = CategoryTable::pacs();
        let body = r#"{"predicted_class": 2, "all_probabilities": [0.1, 0.1, 0.6, 0.05, 0.05, 0.05, 0.05]}"#;

        match complete_prediction(RequestKind::Single(Algorithm::ERM), 200, body, &table).unwrap() {
            PredictionOutcome::Single { algorithm, view } => {
                assert_eq!(algorithm, Algorithm::ERM);
                assert_eq!(view.predicted.canonical_name, "giraffe");
            }
            other => panic!("expected a single outcome, got {:?}", other),
        }
    }

    #[test]
    fn completed_comparison_is_normalized() {
        let table = CategoryTable::pacs();
        let body = r#"{
            "comparison_results": [
                {"status": "success", "algorithm": "LFME", "predicted_class": 6,
                 "all_probabilities": [0.0, 0.0, 0.0, 0.0, 0.1, 0.1, 0.8]},
                {"status": "error", "algorithm": "ERM", "error": "out of memory"}
            ],
            "successful_models": 1,
            "total_models": 2
        }"#;

        let outcome = complete_prediction(RequestKind::Comparison, 200, body, &table).unwrap();
        let PredictionOutcome::Comparison(comparison) = &outcome else {
            panic!("expected a comparison");
        };
        assert_eq!((comparison.successful(), comparison.total()), (1, 2));
        assert!(matches!(outcome.consensus(), Some(crate::Consensus::Unanimous(c)) if c.id == 6));
    }

    #[test]
    fn failed_status_short_circuits_normalization() {
        let table = CategoryTable::pacs();
        let result = complete_prediction(RequestKind::Comparison, 503, "", &table);
        assert!(matches!(result, Err(PipelineError::HttpError { status: Some(503), .. })));
    }

    #[test]
    fn second_begin_while_busy_is_rejected() {
        let mut sequence = RequestSequence::new();
        let first = sequence.begin().unwrap();

        assert!(sequence.is_busy());
        assert_eq!(sequence.begin(), Err(PipelineError::Busy));
        assert!(sequence.settle(first));
        assert!(!sequence.is_busy());

        let second = sequence.begin().unwrap();
        assert!(second > first);
    }

    #[test]
    fn invalidated_tickets_are_not_applied() {
        let mut sequence = RequestSequence::new();
        let stale = sequence.begin().unwrap();
        sequence.invalidate();

        let fresh = sequence.begin().unwrap();
        assert!(!sequence.settle(stale));
        assert!(sequence.is_busy());
        assert!(sequence.settle(fresh));
        assert!(!sequence.settle(fresh));
    }
}
