use std::fmt;

use log::info;

use super::error::PredictionError;
use super::prediction::Prediction;
use super::remote::RemoteClassifier;
use super::stand_in::StandInClassifier;
use super::upload::SelectedImage;
use crate::config::ClientConfig;

/// Which strategy answers predict requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Remote,
    StandIn,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Remote => f.write_str("remote"),
            BackendKind::StandIn => f.write_str("stand-in"),
        }
    }
}

/// The classification strategy behind a session.
///
/// The stand-in is only ever picked when no endpoint is configured, so a
/// reachable service is never shadowed by the placeholder.
#[derive(Debug, Clone)]
pub enum Backend {
    Remote(RemoteClassifier),
    StandIn(StandInClassifier),
}

impl Backend {
    pub fn from_config(config: &ClientConfig) -> Result<Self, PredictionError> {
        let backend = match (config.endpoint(), config.stand_in) {
            (Some(endpoint), _) => {
                Backend::Remote(RemoteClassifier::new(endpoint, config.request_timeout)?)
            }
            (None, true) => {
                Backend::StandIn(StandInClassifier::new().with_delay(config.stand_in_delay))
            }
            (None, false) => return Err(PredictionError::EndpointNotConfigured),
        };
        info!("Using {} classifier", backend.kind());
        Ok(backend)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Remote(_) => BackendKind::Remote,
            Backend::StandIn(_) => BackendKind::StandIn,
        }
    }

    pub async fn classify(&self, image: &SelectedImage) -> Result<Prediction, PredictionError> {
        match self {
            Backend::Remote(remote) => remote.classify(image).await,
            Backend::StandIn(stand_in) => Ok(stand_in.classify(image).await),
        }
    }
}
