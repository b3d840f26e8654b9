use std::fmt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Unsupported file type: {mime}")]
    InvalidType { mime: String },
    #[error("File is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
    #[error("{}", HttpErrorDisplay(*status, message))]
    HttpError { status: Option<u16>, message: String },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("No file selected for analysis")]
    NoSelection,
    #[error("Select at least one model")]
    NoModelSelected,
    #[error("A prediction request is already in flight")]
    Busy,
    #[error("Configuration error: {0}")]
    Config(String),
}

struct HttpErrorDisplay<'a>(Option<u16>, &'a String);

impl fmt::Display for HttpErrorDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(status) => write!(f, "HTTP error {}: {}", status, self.1),
            None => write!(f, "Network error: {}", self.1),
        }
    }
}

impl PipelineError {
    /// Translation key of the notice shown to the user.
    ///
    /// Network, payload and configuration failures share one generic notice;
    /// their details only go to the log.
    pub fn toast_key(&self) -> &'static str {
        match self {
            PipelineError::InvalidType { .. } => "toastMessages.invalidFileType",
            PipelineError::TooLarge { .. } => "toastMessages.fileTooLarge",
            PipelineError::NoSelection => "toastMessages.noImageSelected",
            PipelineError::NoModelSelected => "toastMessages.noModelSelected",
            PipelineError::Busy => "toastMessages.requestInFlight",
            PipelineError::HttpError { .. }
            | PipelineError::MalformedResponse(_)
            | PipelineError::Config(_) => "toastMessages.analysisFailed",
        }
    }

    /// Intake and selection problems are resolved on the spot; everything
    /// else aborts the prediction attempt.
    pub fn aborts_prediction(&self) -> bool {
        matches!(
            self,
            PipelineError::HttpError { .. }
                | PipelineError::MalformedResponse(_)
                | PipelineError::Config(_)
        )
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
