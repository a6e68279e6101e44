//! The single authoritative transition function of a classifier session.
//!
//! Every change to what the user sees goes through [`transition`], which
//! returns the next state plus the effects to render. Completions carry the
//! ticket of the selection or request that started them; stale ones are
//! dropped instead of overwriting newer output.

use crate::classifier::{Prediction, PredictionError, ResultView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    PreviewReady,
    Loading,
    ResultShown,
    ErrorShown,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    pub ui: UiState,
    pub has_image: bool,
    /// Bumped on every accepted selection
    pub selection: u64,
    /// Bumped on every dispatched request
    pub request: u64,
    /// Request currently awaited, if any
    pub pending: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A file failed validation; the message goes to the error panel.
    ImageRejected { message: String },
    /// A valid file became the selected image.
    ImageSelected,
    PreviewLoaded { selection: u64, data_url: String },
    PredictRequested,
    PredictionFinished {
        request: u64,
        outcome: Result<Prediction, String>,
    },
    /// The caller stopped waiting for the request.
    PredictionCancelled { request: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ShowPreview { data_url: String },
    ShowPredict,
    HidePredict,
    ShowLoading,
    HideLoading,
    ShowResult(ResultView),
    HideResult,
    ShowError(String),
    HideError,
    /// Start classifying the selected image under this request ticket.
    Dispatch { request: u64 },
}

pub fn init() -> State {
    State::default()
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    match event {
        Event::ImageRejected { message } => {
            let mut effects = Vec::new();
            let mut next = state;
            // A rejected file supersedes whatever request was in flight.
            if next.pending.take().is_some() {
                effects.push(Effect::HideLoading);
            }
            next.ui = UiState::ErrorShown;
            effects.push(Effect::HideResult);
            effects.push(Effect::ShowError(message));
            (next, effects)
        }

        Event::ImageSelected => {
            let mut effects = Vec::new();
            let mut next = state;
            if next.pending.take().is_some() {
                effects.push(Effect::HideLoading);
            }
            next.selection += 1;
            next.has_image = true;
            next.ui = UiState::Idle;
            effects.extend([Effect::HideError, Effect::HideResult, Effect::HidePredict]);
            (next, effects)
        }

        Event::PreviewLoaded { selection, data_url } => {
            if selection != state.selection {
                return (state, Vec::new());
            }
            let mut next = state;
            if next.ui == UiState::Idle {
                next.ui = UiState::PreviewReady;
            }
            (next, vec![Effect::ShowPreview { data_url }, Effect::ShowPredict])
        }

        Event::PredictRequested => {
            if state.ui == UiState::Loading {
                return (state, Vec::new());
            }
            if !state.has_image {
                let message = PredictionError::NoImageSelected.user_message();
                let next = State { ui: UiState::ErrorShown, ..state };
                return (next, vec![Effect::HideResult, Effect::ShowError(message)]);
            }
            let request = state.request + 1;
            let next = State {
                ui: UiState::Loading,
                request,
                pending: Some(request),
                ..state
            };
            (
                next,
                vec![
                    Effect::ShowLoading,
                    Effect::HideError,
                    Effect::HideResult,
                    Effect::Dispatch { request },
                ],
            )
        }

        Event::PredictionFinished { request, outcome } => {
            if state.pending != Some(request) {
                return (state, Vec::new());
            }
            let (ui, shown) = match outcome {
                Ok(prediction) => (
                    UiState::ResultShown,
                    Effect::ShowResult(ResultView::from(&prediction)),
                ),
                Err(message) => (UiState::ErrorShown, Effect::ShowError(message)),
            };
            let next = State { ui, pending: None, ..state };
            (next, vec![Effect::HideLoading, shown])
        }

        Event::PredictionCancelled { request } => {
            if state.pending != Some(request) {
                return (state, Vec::new());
            }
            let next = State {
                ui: UiState::PreviewReady,
                pending: None,
                ..state
            };
            (next, vec![Effect::HideLoading])
        }
    }
}
