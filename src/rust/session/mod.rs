//! A classifier session: one selected image, one endpoint setting, one set of
//! panels.

pub mod state;

use std::path::Path;

use log::{error, info, warn};

pub use state::{Effect, Event, State, UiState};

use crate::classifier::{
    validate, Backend, BackendKind, ClientError, Prediction, PredictionError, SelectedImage,
    ValidationError,
};
use crate::config::ClientConfig;
use crate::surface::Surface;

/// Owns the session context and renders every state change on its surface.
///
/// Methods take `&mut self`, so a session never runs two operations at once.
/// A predict future dropped before it resolves still clears the loading
/// indicator.
pub struct Session<S: Surface> {
    config: ClientConfig,
    surface: S,
    state: State,
    image: Option<SelectedImage>,
    backend: Option<Backend>,
}

impl<S: Surface> Session<S> {
    pub fn new(config: ClientConfig, surface: S) -> Self {
        Self {
            config,
            surface,
            state: state::init(),
            image: None,
            backend: None,
        }
    }

    pub fn ui_state(&self) -> UiState {
        self.state.ui
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn selected_image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.config.endpoint()
    }

    /// Points later predict calls at a new inference service.
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.config.set_endpoint(endpoint);
        self.backend = None;
        match self.config.endpoint() {
            Some(endpoint) => info!("Classifier endpoint set to: {}", endpoint),
            None => info!("Classifier endpoint cleared"),
        }
    }

    pub fn clear_endpoint(&mut self) {
        self.set_endpoint("");
    }

    /// The strategy the next predict call would use, if any
    pub fn backend_kind(&self) -> Option<BackendKind> {
        match (self.config.endpoint(), self.config.stand_in) {
            (Some(_), _) => Some(BackendKind::Remote),
            (None, true) => Some(BackendKind::StandIn),
            (None, false) => None,
        }
    }

    /// Validates `image`, makes it the selected image and renders its preview.
    ///
    /// A rejected image leaves the previous selection in place.
    pub async fn select(&mut self, image: SelectedImage) -> Result<(), ValidationError> {
        if let Err(err) = validate(&image, self.config.max_upload_bytes) {
            warn!("Rejected {:?}: {:?}", image.name(), err);
            self.apply(Event::ImageRejected { message: err.to_string() });
            return Err(err);
        }

        info!("Selected {:?} ({}, {} bytes)", image.name(), image.media_type(), image.size());
        self.image = Some(image.clone());
        self.apply(Event::ImageSelected);

        let selection = self.state.selection;
        let data_url = image.load_preview().await;
        self.apply(Event::PreviewLoaded { selection, data_url });
        Ok(())
    }

    /// Reads `path` and selects it. Files that fail validation are refused
    /// from their metadata, without reading them.
    pub async fn select_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ClientError> {
        let image = match SelectedImage::from_path(path, self.config.max_upload_bytes).await {
            Ok(image) => image,
            Err(ClientError::Validation(err)) => {
                warn!("Rejected selection: {}", err);
                self.apply(Event::ImageRejected { message: err.to_string() });
                return Err(err.into());
            }
            Err(err) => {
                error!("{}", err);
                self.apply(Event::ImageRejected {
                    message: "Could not read the selected file".to_string(),
                });
                return Err(err);
            }
        };
        self.select(image).await?;
        Ok(())
    }

    /// Classifies the selected image with the configured strategy.
    pub async fn predict(&mut self) -> Result<Prediction, PredictionError> {
        let image = self.image.clone();
        let dispatched = self.apply(Event::PredictRequested);
        // Loading never outlives a predict call, so a refused dispatch means
        // there is nothing to classify.
        let (Some(request), Some(image)) = (dispatched, image) else {
            warn!("Predict requested without an image");
            return Err(PredictionError::NoImageSelected);
        };

        let backend = self.resolve_backend();
        let mut pending = PendingRequest::new(self, request);
        let outcome = match backend {
            Ok(backend) => backend.classify(&image).await,
            Err(err) => Err(err),
        };
        pending.finish(&outcome);
        outcome
    }

    fn resolve_backend(&mut self) -> Result<Backend, PredictionError> {
        if let Some(backend) = &self.backend {
            return Ok(backend.clone());
        }
        let backend = Backend::from_config(&self.config)?;
        self.backend = Some(backend.clone());
        Ok(backend)
    }

    /// Runs the transition function and renders its effects, returning the
    /// request ticket when the transition dispatched one.
    fn apply(&mut self, event: Event) -> Option<u64> {
        let (next, effects) = state::transition(std::mem::take(&mut self.state), event);
        self.state = next;

        let mut dispatched = None;
        for effect in effects {
            match effect {
                Effect::ShowPreview { data_url } => self.surface.show_preview(&data_url),
                Effect::ShowPredict => self.surface.show_predict(),
                Effect::HidePredict => self.surface.hide_predict(),
                Effect::ShowLoading => self.surface.show_loading(),
                Effect::HideLoading => self.surface.hide_loading(),
                Effect::ShowResult(view) => self.surface.show_result(&view),
                Effect::HideResult => self.surface.hide_result(),
                Effect::ShowError(message) => self.surface.show_error(&message),
                Effect::HideError => self.surface.hide_error(),
                Effect::Dispatch { request } => dispatched = Some(request),
            }
        }
        dispatched
    }
}

/// Clears the loading state of a request on every exit path.
struct PendingRequest<'a, S: Surface> {
    session: &'a mut Session<S>,
    request: u64,
    finished: bool,
}

impl<'a, S: Surface> PendingRequest<'a, S> {
    fn new(session: &'a mut Session<S>, request: u64) -> Self {
        Self { session, request, finished: false }
    }

    fn finish(&mut self, outcome: &Result<Prediction, PredictionError>) {
        if let Err(err) = outcome {
            error!("Prediction error: {}", err);
        }
        let outcome = match outcome {
            Ok(prediction) => Ok(*prediction),
            Err(err) => Err(err.user_message()),
        };
        self.session.apply(Event::PredictionFinished { request: self.request, outcome });
        self.finished = true;
    }
}

impl<S: Surface> Drop for PendingRequest<'_, S> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("Prediction request {} cancelled", self.request);
            self.session.apply(Event::PredictionCancelled { request: self.request });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::classifier::Label;
    use crate::surface::{RecordingSurface, SurfaceCall};

    fn session() -> Session<RecordingSurface> {
        Session::new(ClientConfig::default(), RecordingSurface::new())
    }

    fn png(name: &str) -> SelectedImage {
        SelectedImage::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[tokio::test]
    async fn test_select_shows_preview() {
        let mut session = session();
        session.select(png("cat.png")).await.unwrap();

        assert_eq!(session.ui_state(), UiState::PreviewReady);
        let panels = session.surface().panels();
        assert_eq!(panels.preview.as_deref(), Some("data:image/png;base64,iVBORw=="));
        assert!(panels.predict_visible);
    }

    #[tokio::test]
    async fn test_rejected_selection_keeps_previous_image() {
        let mut session = session();
        session.select(png("cat.png")).await.unwrap();

        let err = session
            .select(SelectedImage::new("notes.txt", "text/plain", b"hi".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedType { .. }));
        assert_eq!(session.selected_image().map(|i| i.name()), Some("cat.png"));
        assert_eq!(
            session.surface().panels().error.as_deref(),
            Some("Please upload an image file")
        );
    }

    #[tokio::test]
    async fn test_predict_with_stand_in() {
        let mut session = session();
        session.select(png("dog1.jpg")).await.unwrap();
        let prediction = session.predict().await.unwrap();

        assert_eq!(prediction.label, Label::Dog);
        assert_eq!(session.ui_state(), UiState::ResultShown);
        let surface = session.surface();
        assert_eq!(surface.count(&SurfaceCall::ShowLoading), 1);
        assert_eq!(surface.count(&SurfaceCall::HideLoading), 1);
        assert_eq!(surface.panels().result.as_ref().map(|r| r.label), Some(Label::Dog));
    }

    #[tokio::test]
    async fn test_predict_without_image() {
        let mut session = session();
        let err = session.predict().await.unwrap_err();
        assert!(matches!(err, PredictionError::NoImageSelected));
        assert_eq!(session.ui_state(), UiState::ErrorShown);
        assert_eq!(session.surface().count(&SurfaceCall::ShowLoading), 0);
    }

    #[tokio::test]
    async fn test_endpoint_not_configured() {
        let config = ClientConfig::default().with_stand_in(false);
        let mut session = Session::new(config, RecordingSurface::new());
        assert_eq!(session.backend_kind(), None);

        session.select(png("cat.png")).await.unwrap();
        let err = session.predict().await.unwrap_err();
        assert!(matches!(err, PredictionError::EndpointNotConfigured));

        let surface = session.surface();
        assert_eq!(surface.count(&SurfaceCall::HideLoading), 1);
        assert!(surface.panels().predict_enabled);
        assert_eq!(session.ui_state(), UiState::ErrorShown);
    }

    #[tokio::test]
    async fn test_set_endpoint_switches_strategy() {
        let mut session = session();
        assert_eq!(session.backend_kind(), Some(BackendKind::StandIn));
        session.set_endpoint("http://localhost:7860/");
        assert_eq!(session.endpoint(), Some("http://localhost:7860"));
        assert_eq!(session.backend_kind(), Some(BackendKind::Remote));
        session.clear_endpoint();
        assert_eq!(session.backend_kind(), Some(BackendKind::StandIn));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_predict_clears_loading() {
        let config = ClientConfig::default().with_stand_in_delay(Duration::from_secs(2));
        let mut session = Session::new(config, RecordingSurface::new());
        session.select(png("cat.png")).await.unwrap();

        let timed_out = tokio::time::timeout(Duration::from_millis(10), session.predict()).await;
        assert!(timed_out.is_err());

        assert_eq!(session.ui_state(), UiState::PreviewReady);
        let surface = session.surface();
        assert_eq!(surface.count(&SurfaceCall::ShowLoading), 1);
        assert_eq!(surface.count(&SurfaceCall::HideLoading), 1);
        assert!(!surface.panels().loading);

        let prediction = session.predict().await.unwrap();
        assert_eq!(prediction.label, Label::Cat);
    }
}
