//! The visible panels a session drives.

mod console;
mod recording;

pub use console::ConsoleSurface;
pub use recording::{Panels, RecordingSurface, SurfaceCall};

use crate::classifier::ResultView;

/// Everything the user can see of a session.
///
/// Implementations only render; all decisions about what to show are made by
/// the session's transition function.
pub trait Surface {
    /// Reveal the preview of the selected image
    fn show_preview(&mut self, data_url: &str);

    /// Reveal the predict control
    fn show_predict(&mut self);

    fn hide_predict(&mut self);

    /// Show the loading indicator and disable the predict control
    fn show_loading(&mut self);

    /// Hide the loading indicator and re-enable the predict control
    fn hide_loading(&mut self);

    fn show_result(&mut self, result: &ResultView);

    fn hide_result(&mut self);

    fn show_error(&mut self, message: &str);

    fn hide_error(&mut self);
}
