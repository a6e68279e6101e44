use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::ImageFormat;
use log::debug;
use tokio::io::AsyncReadExt;

use super::error::{ClientError, ValidationError};

/// Largest image accepted for upload (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// The image currently chosen by the user.
///
/// Content is shared behind an `Arc` so a pending request can hold on to the
/// bytes while the session keeps accepting new selections.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedImage {
    name: String,
    media_type: String,
    content: Arc<[u8]>,
}

impl SelectedImage {
    /// Creates an image from raw parts, as handed over by a file picker or a drop.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        let content: Vec<u8> = content.into();
        Self {
            name: name.into(),
            media_type: media_type.into(),
            content: Arc::from(content),
        }
    }

    /// Reads an image from disk. The declared media type comes from the file
    /// extension, the way a browser file picker reports it.
    ///
    /// Type and size are checked from metadata before any content is read,
    /// and the read itself stops one byte past `max_bytes`.
    pub async fn from_path<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let read_error = |source: io::Error| ClientError::Read {
            path: path.to_path_buf(),
            source,
        };

        let metadata = tokio::fs::metadata(path).await.map_err(read_error)?;
        if !metadata.is_file() {
            return Err(read_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        let media_type = media_type_for_path(path);
        check(media_type, metadata.len(), max_bytes)?;

        let file = tokio::fs::File::open(path).await.map_err(read_error)?;
        let mut content = Vec::with_capacity(metadata.len() as usize);
        file.take(max_bytes.saturating_add(1))
            .read_to_end(&mut content)
            .await
            .map_err(read_error)?;
        // The file may have grown since it was inspected.
        check(media_type, content.len() as u64, max_bytes)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        debug!("Read {} bytes from {:?} ({})", content.len(), path, media_type);
        Ok(Self::new(name, media_type, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Encodes the image as a `data:` URL for inline display.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.content))
    }

    /// Produces the preview data URL. Yields to the scheduler first so a
    /// selection never blocks other work queued on the same task.
    pub async fn load_preview(&self) -> String {
        tokio::task::yield_now().await;
        self.data_url()
    }
}

impl fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedImage")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.content.len())
            .finish()
    }
}

/// Checks the declared media type, then the size.
pub fn validate(image: &SelectedImage, max_bytes: u64) -> Result<(), ValidationError> {
    check(image.media_type(), image.size(), max_bytes)
}

fn check(media_type: &str, size: u64, max_bytes: u64) -> Result<(), ValidationError> {
    if !is_image_media_type(media_type) {
        return Err(ValidationError::UnsupportedType {
            media_type: media_type.to_string(),
        });
    }
    if size > max_bytes {
        return Err(ValidationError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    Ok(())
}

fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

pub(crate) fn media_type_for_path(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MEDIA_TYPE)
}
