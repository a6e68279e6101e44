mod backend;
mod error;
mod prediction;
mod remote;
mod stand_in;
mod upload;

pub use backend::{Backend, BackendKind};
pub use error::{ClientError, PredictionError, ValidationError};
pub use prediction::{decode_response, Label, Prediction, ResultView};
pub use remote::RemoteClassifier;
pub use stand_in::StandInClassifier;
pub use upload::{validate, SelectedImage, MAX_UPLOAD_BYTES};
