use std::time::Duration;

use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use super::error::PredictionError;
use super::prediction::{decode_response, Prediction};
use super::upload::SelectedImage;

/// Talks to a remote inference service over HTTP.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its pool.
#[derive(Debug, Clone)]
pub struct RemoteClassifier {
    http: Client,
    endpoint: String,
}

impl RemoteClassifier {
    /// Creates a client for the service rooted at `endpoint`.
    /// No timeout is applied unless one is given.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, PredictionError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.endpoint)
    }

    /// Posts the image as the `file` field of a multipart form and decodes
    /// the answer.
    pub async fn classify(&self, image: &SelectedImage) -> Result<Prediction, PredictionError> {
        let url = self.predict_url();
        let part = Part::bytes(image.content().to_vec())
            .file_name(image.name().to_string())
            .mime_str(image.media_type())?;
        let form = Form::new().part("file", part);

        debug!("Posting {:?} ({} bytes) to {}", image.name(), image.size(), url);
        let response = self.http.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Classifier at {} answered {}", url, status);
            return Err(PredictionError::HttpError { status: status.as_u16() });
        }

        let body = response.bytes().await?;
        debug!("Received {} byte response", body.len());
        let prediction = decode_response(&body)?;
        info!("Remote classifier answered {} ({})", prediction.label, prediction.percent());
        Ok(prediction)
    }
}
