use std::ops::Range;
use std::time::Duration;

use log::info;
use rand::Rng;

use super::prediction::{Label, Prediction};
use super::upload::SelectedImage;

const KEYWORD_CONFIDENCE: Range<f32> = 0.85..0.99;
const GUESS_CONFIDENCE: Range<f32> = 0.60..0.95;

/// Placeholder used when no inference endpoint is configured.
///
/// It never looks at pixels: the label comes from the file name and the
/// confidence is random. Only meant for demos.
#[derive(Debug, Clone, Default)]
pub struct StandInClassifier {
    delay: Duration,
}

impl StandInClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated request latency before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn classify(&self, image: &SelectedImage) -> Prediction {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let prediction = self.classify_name(image.name(), &mut rand::rng());
        info!(
            "Stand-in classifier guessed {} ({}) for {:?}",
            prediction.label,
            prediction.percent(),
            image.name()
        );
        prediction
    }

    /// Guesses from the display name alone. "cat" is checked before "dog".
    pub fn classify_name<R: Rng>(&self, name: &str, rng: &mut R) -> Prediction {
        let name = name.to_lowercase();
        let keyword = if name.contains("cat") {
            Some(Label::Cat)
        } else if name.contains("dog") {
            Some(Label::Dog)
        } else {
            None
        };

        match keyword {
            Some(label) => Prediction::new(label, rng.random_range(KEYWORD_CONFIDENCE)),
            None => {
                let label = if rng.random_bool(0.5) { Label::Cat } else { Label::Dog };
                Prediction::new(label, rng.random_range(GUESS_CONFIDENCE))
            }
        }
    }
}
