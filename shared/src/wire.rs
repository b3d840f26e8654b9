use serde::{Deserialize, Serialize};

/// Body of a `/api/predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPredictionResponse {
    #[serde(default)]
    pub predicted_class: Option<i64>,
    #[serde(default)]
    pub all_probabilities: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl RawPredictionResponse {
    pub fn new(predicted_class: Option<i64>, all_probabilities: Vec<f64>) -> Self {
        Self {
            predicted_class,
            all_probabilities,
            algorithm: None,
            predicted_class_name: None,
            confidence: None,
        }
    }
}

/// One entry of a `/api/predict-all` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RawModelResult {
    Success {
        algorithm: String,
        #[serde(flatten)]
        prediction: RawPredictionResponse,
    },
    Error {
        algorithm: String,
        #[serde(default)]
        error: String,
    },
}

/// Body of a `/api/predict-all` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawComparisonResponse {
    #[serde(default)]
    pub comparison_results: Vec<RawModelResult>,
    #[serde(default)]
    pub successful_models: Option<usize>,
    #[serde(default)]
    pub total_models: Option<usize>,
}

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comparison_entries_are_tagged_by_status() {
        let body = json!({
            "comparison_results": [
                {
                    "status": "success",
                    "algorithm": "LFME",
                    "predicted_class": 4,
                    "predicted_class_name": "horse",
                    "confidence": 0.8,
                    "all_probabilities": [0.05, 0.05, 0.0, 0.0, 0.8, 0.05, 0.05]
                },
                { "status": "error", "algorithm": "CORAL", "error": "checkpoint missing" }
            ],
            "successful_models": 1,
            "total_models": 2
        });

        let parsed: RawComparisonResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.comparison_results.len(), 2);

        match &parsed.comparison_results[0] {
            RawModelResult::Success { algorithm, prediction } => {
                assert_eq!(algorithm, "LFME");
                assert_eq!(prediction.predicted_class, Some(4));
                assert_eq!(prediction.all_probabilities.len(), 7);
                assert_eq!(prediction.confidence, Some(0.8));
            }
            other => panic!("expected success, got {:?}", other),
        }
        assert_eq!(
            parsed.comparison_results[1],
            RawModelResult::Error {
                algorithm: "CORAL".into(),
                error: "checkpoint missing".into()
            }
        );
    }

    #[test]
    fn predicted_class_may_be_null_or_missing() {
        let null: RawPredictionResponse =
            serde_json::from_value(json!({ "predicted_class": null, "all_probabilities": [1.0] }))
                .unwrap();
        let missing: RawPredictionResponse =
            serde_json::from_value(json!({ "all_probabilities": [1.0] })).unwrap();

        assert_eq!(null.predicted_class, None);
        assert_eq!(null, missing);
    }
}
