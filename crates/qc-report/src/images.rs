//! Image references for report and dashboard graphics.
//!
//! A graphic is either linked by path or embedded as a `data:` URI.

use crate::error::{ReportError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use tracing::debug;

/// MIME type for an image file, from its extension.
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Read an image and encode it as a `data:` URI.
///
/// A missing or unreadable file is an error.
pub fn encode_image(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| ReportError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "Encoded image");
    Ok(format!(
        "data:{};base64,{}",
        mime_type(path),
        STANDARD.encode(&bytes)
    ))
}

/// Resolve an image to the value of an `src` attribute (unescaped).
pub fn image_src(path: &Path, encode: bool) -> Result<String> {
    if encode {
        encode_image(path)
    } else {
        Ok(path.display().to_string())
    }
}

/// Resolve a list of images, failing on the first unreadable one.
pub fn image_srcs<P: AsRef<Path>>(paths: &[P], encode: bool) -> Result<Vec<String>> {
    paths
        .iter()
        .map(|p| image_src(p.as_ref(), encode))
        .collect()
}
