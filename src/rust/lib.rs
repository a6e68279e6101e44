//! A small client that previews an image and asks an inference service
//! whether it shows a cat or a dog.
//!
//! # Basic Usage
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pawprint::{ClientConfig, ConsoleSurface, Session};
//!
//! let config = ClientConfig::default().with_endpoint("http://localhost:7860");
//! let mut session = Session::new(config, ConsoleSurface::stdout());
//!
//! session.select_path("cat_photo.png").await?;
//! let prediction = session.predict().await?;
//! println!("{} ({})", prediction.label, prediction.percent());
//! # Ok(())
//! # }
//! ```
//!
//! # Without an endpoint
//!
//! When no endpoint is configured, a stand-in classifier guesses from the
//! file name. It exists for demos only and can be switched off, in which
//! case predictions fail with [`PredictionError::EndpointNotConfigured`]:
//!
//! ```
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pawprint::{BackendKind, ClientConfig, Label, RecordingSurface, SelectedImage, Session};
//!
//! let mut session = Session::new(ClientConfig::default(), RecordingSurface::new());
//! assert_eq!(session.backend_kind(), Some(BackendKind::StandIn));
//!
//! session.select(SelectedImage::new("dog1.jpg", "image/jpeg", vec![0xFF, 0xD8])).await?;
//! assert_eq!(session.predict().await?.label, Label::Dog);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod session;
pub mod surface;

pub use classifier::{
    decode_response, validate, Backend, BackendKind, ClientError, Label, Prediction,
    PredictionError, RemoteClassifier, ResultView, SelectedImage, StandInClassifier,
    ValidationError, MAX_UPLOAD_BYTES,
};
pub use config::ClientConfig;
pub use session::{Session, UiState};
pub use surface::{ConsoleSurface, Panels, RecordingSurface, Surface, SurfaceCall};

pub fn init_logger() {
    env_logger::init();
}
