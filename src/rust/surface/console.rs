use std::io::{self, Write};

use log::{debug, warn};

use super::Surface;
use crate::classifier::ResultView;

/// Renders panels as lines of text. Hiding is silent.
pub struct ConsoleSurface<W: Write> {
    out: W,
}

impl ConsoleSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            warn!("Failed to write to console: {}", e);
        }
    }
}

impl<W: Write> Surface for ConsoleSurface<W> {
    fn show_preview(&mut self, data_url: &str) {
        let kind = data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or("unknown");
        self.line(&format!("Preview ready ({}, {} bytes encoded)", kind, data_url.len()));
    }

    fn show_predict(&mut self) {
        debug!("Predict control visible");
    }

    fn hide_predict(&mut self) {
        debug!("Predict control hidden");
    }

    fn show_loading(&mut self) {
        self.line("Analyzing image...");
    }

    fn hide_loading(&mut self) {
        debug!("Loading indicator hidden");
    }

    fn show_result(&mut self, result: &ResultView) {
        self.line(&result.headline);
        self.line(&result.confidence_text);
    }

    fn hide_result(&mut self) {}

    fn show_error(&mut self, message: &str) {
        self.line(&format!("Error: {}", message));
    }

    fn hide_error(&mut self) {}
}
