//! Image layer payload.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Raster format of an image source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
    Svg,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/webp" => Some(ImageFormat::WebP),
            "image/gif" => Some(ImageFormat::Gif),
            "image/svg+xml" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "gif" => Some(ImageFormat::Gif),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// An image referenced by URL or embedded as a data URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLayer {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
}

impl ImageLayer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: None,
            transparency: None,
        }
    }

    pub fn is_data_uri(&self) -> bool {
        self.url.starts_with("data:")
    }

    /// Split a `data:<mime>;base64,<payload>` URI into its MIME type and payload.
    fn data_uri_parts(&self) -> Option<(&str, &str)> {
        let rest = self.url.strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let mime = header.strip_suffix(";base64")?;
        Some((mime, payload))
    }

    /// Decode the bytes of a base64 data URI.
    pub fn decode_data(&self) -> Option<Vec<u8>> {
        let (_, payload) = self.data_uri_parts()?;
        STANDARD.decode(payload.trim()).ok()
    }

    /// Best-effort detection of the image format.
    ///
    /// Data URIs are identified by their declared MIME type, falling back to
    /// the payload's magic bytes. Paths and URLs use their file extension.
    pub fn format(&self) -> Option<ImageFormat> {
        if self.is_data_uri() {
            let declared = self
                .data_uri_parts()
                .and_then(|(mime, _)| ImageFormat::from_mime_type(mime));
            return declared.or_else(|| {
                self.decode_data()
                    .and_then(|bytes| ImageFormat::from_magic_bytes(&bytes))
            });
        }

        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        let file_name = path.rsplit('/').next().unwrap_or_default();
        let (_, ext) = file_name.rsplit_once('.')?;
        ImageFormat::from_extension(ext)
    }

    pub(crate) fn apply(&mut self, patch: ImagePatch) {
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(alt) = patch.alt {
            self.alt = alt;
        }
        if let Some(transparency) = patch.transparency {
            self.transparency = transparency.map(|t| t.clamp(0.0, 1.0));
        }
    }
}

/// Partial update for an [`ImageLayer`]. Optional fields take `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImagePatch {
    pub url: Option<String>,
    pub alt: Option<Option<String>>,
    pub transparency: Option<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    #[test]
    fn test_format_from_data_uri() {
        let image = ImageLayer::new(PNG_DATA_URI);
        assert!(image.is_data_uri());
        assert_eq!(image.format(), Some(ImageFormat::Png));
        let bytes = image.decode_data().unwrap();
        assert_eq!(ImageFormat::from_magic_bytes(&bytes), Some(ImageFormat::Png));
    }

    #[test]
    fn test_format_from_magic_when_mime_unknown() {
        let uri = PNG_DATA_URI.replace("image/png", "application/octet-stream");
        assert_eq!(ImageLayer::new(uri).format(), Some(ImageFormat::Png));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ImageLayer::new("/placeholder.svg?height=300&width=300").format(),
            Some(ImageFormat::Svg)
        );
        assert_eq!(
            ImageLayer::new("https://cdn.example.com/a/photo.JPG").format(),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageLayer::new("no-extension").format(), None);
    }

    #[test]
    fn test_patch_clears_optional_fields() {
        let mut image = ImageLayer::new("a.png");
        image.apply(ImagePatch {
            alt: Some(Some("logo".into())),
            transparency: Some(Some(1.5)),
            ..Default::default()
        });
        assert_eq!(image.alt.as_deref(), Some("logo"));
        assert_eq!(image.transparency, Some(1.0));

        image.apply(ImagePatch {
            alt: Some(None),
            ..Default::default()
        });
        assert_eq!(image.alt, None);
        assert_eq!(image.url, "a.png");
    }
}
