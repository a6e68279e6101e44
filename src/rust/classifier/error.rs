use std::io;
use std::path::PathBuf;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

/// Reasons an image is refused before it ever reaches a classifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The declared media type is not an `image/*` type
    #[error("Please upload an image file")]
    UnsupportedType { media_type: String },
    /// The image is larger than the configured upload limit
    #[error(
        "Image file is too large. Please upload an image smaller than {}",
        limit_text(.limit)
    )]
    TooLarge { size: u64, limit: u64 },
}

/// Upload limit rounded up to whole MB, or whole KB below one MB.
fn limit_text(limit: &u64) -> String {
    if *limit >= MIB {
        format!("{}MB", limit.div_ceil(MIB))
    } else {
        format!("{}KB", limit.div_ceil(KIB))
    }
}

/// Failures of a single predict request. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("No image selected")]
    NoImageSelected,
    #[error("HTTP error! status: {status}")]
    HttpError { status: u16 },
    #[error("Malformed classifier response: {0}")]
    DecodeError(String),
    #[error("Classifier endpoint not configured")]
    EndpointNotConfigured,
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PredictionError {
    /// The message shown on the error panel. The full cause is only logged.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoImageSelected => "Please upload an image first".to_string(),
            Self::EndpointNotConfigured => {
                "No classifier endpoint is configured. Set one and try again.".to_string()
            }
            _ => "Failed to predict image. Please try again.".to_string(),
        }
    }
}

impl From<serde_json::Error> for PredictionError {
    fn from(err: serde_json::Error) -> Self {
        PredictionError::DecodeError(err.to_string())
    }
}

/// Top-level error for callers that drive a session end to end.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    #[error("Could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
