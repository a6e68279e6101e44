use super::Surface;
use crate::classifier::ResultView;

/// A single call made on a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    ShowPreview(String),
    ShowPredict,
    HidePredict,
    ShowLoading,
    HideLoading,
    ShowResult(ResultView),
    HideResult,
    ShowError(String),
    HideError,
}

/// What is currently visible.
#[derive(Debug, Clone, PartialEq)]
pub struct Panels {
    pub preview: Option<String>,
    pub predict_visible: bool,
    pub predict_enabled: bool,
    pub loading: bool,
    pub result: Option<ResultView>,
    pub error: Option<String>,
}

impl Default for Panels {
    fn default() -> Self {
        Self {
            preview: None,
            predict_visible: false,
            predict_enabled: true,
            loading: false,
            result: None,
            error: None,
        }
    }
}

/// Headless surface that remembers every call, for tests and embedding.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    panels: Panels,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    /// Number of recorded calls equal to `call`
    pub fn count(&self, call: &SurfaceCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Surface for RecordingSurface {
    fn show_preview(&mut self, data_url: &str) {
        self.panels.preview = Some(data_url.to_string());
        self.calls.push(SurfaceCall::ShowPreview(data_url.to_string()));
    }

    fn show_predict(&mut self) {
        self.panels.predict_visible = true;
        self.calls.push(SurfaceCall::ShowPredict);
    }

    fn hide_predict(&mut self) {
        self.panels.predict_visible = false;
        self.calls.push(SurfaceCall::HidePredict);
    }

    fn show_loading(&mut self) {
        self.panels.loading = true;
        self.panels.predict_enabled = false;
        self.calls.push(SurfaceCall::ShowLoading);
    }

    fn hide_loading(&mut self) {
        self.panels.loading = false;
        self.panels.predict_enabled = true;
        self.calls.push(SurfaceCall::HideLoading);
    }

    fn show_result(&mut self, result: &ResultView) {
        self.panels.result = Some(result.clone());
        self.calls.push(SurfaceCall::ShowResult(result.clone()));
    }

    fn hide_result(&mut self) {
        self.panels.result = None;
        self.calls.push(SurfaceCall::HideResult);
    }

    fn show_error(&mut self, message: &str) {
        self.panels.error = Some(message.to_string());
        self.calls.push(SurfaceCall::ShowError(message.to_string()));
    }

    fn hide_error(&mut self) {
        self.panels.error = None;
        self.calls.push(SurfaceCall::HideError);
    }
}
