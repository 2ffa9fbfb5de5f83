//! Image decoding.
//!
//! Decodes raw bytes and `data:` URIs far enough to learn the format and
//! natural dimensions needed to place an image on the canvas.

use base64::Engine;
use image::{GenericImageView, ImageFormat};

use crate::error::{AssetError, AssetResult};

/// Natural dimensions and format of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Format the bytes were decoded as.
    pub format: ImageFormat,
}

/// Decode image bytes to their natural dimensions.
///
/// The format is sniffed from the bytes; `hint` (from a MIME type or file
/// extension) is only used when sniffing fails.
///
/// # Errors
///
/// Returns [`AssetError::Decode`] if no format can be determined, the bytes
/// do not decode as that format, or the image has no area.
pub fn decode_info(data: &[u8], hint: Option<ImageFormat>) -> AssetResult<ImageInfo> {
    let format = match (image::guess_format(data), hint) {
        (Ok(format), _) | (Err(_), Some(format)) => format,
        (Err(_), None) => {
            return Err(AssetError::Decode("unrecognized image format".to_string()));
        }
    };
    let img = image::load_from_memory_with_format(data, format)?;
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::Decode(format!("image has no area ({width}x{height})")));
    }

    Ok(ImageInfo {
        width,
        height,
        format,
    })
}

/// Extract the payload bytes of a data URI.
///
/// Supports forms like `data:image/png;base64,iVBORw0KGgo...` and
/// percent-encoded payloads without `;base64`.
///
/// # Errors
///
/// Returns [`AssetError::InvalidDataUri`] if the URI is malformed.
pub fn data_uri_bytes(uri: &str) -> AssetResult<Vec<u8>> {
    let uri_data = uri
        .strip_prefix("data:")
        .ok_or_else(|| AssetError::InvalidDataUri("missing data: prefix".to_string()))?;

    let (metadata, encoded) = uri_data
        .split_once(',')
        .ok_or_else(|| AssetError::InvalidDataUri("missing comma".to_string()))?;

    if metadata.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| AssetError::InvalidDataUri(format!("bad base64: {e}")))
    } else {
        percent_decode(encoded)
    }
}

/// MIME type declared by a data URI, if any.
#[must_use]
pub fn data_uri_mime(uri: &str) -> Option<&str> {
    let metadata = uri.strip_prefix("data:")?.split_once(',')?.0;
    let mime = metadata.split(';').next()?;
    (!mime.is_empty()).then_some(mime)
}

/// Decode a data URI to its natural dimensions, using its MIME type as
/// the format hint.
///
/// # Errors
///
/// Returns an error if the URI is malformed or its payload is not an image.
pub fn decode_data_uri(uri: &str) -> AssetResult<ImageInfo> {
    let bytes = data_uri_bytes(uri)?;
    let hint = data_uri_mime(uri).and_then(ImageFormat::from_mime_type);
    decode_info(&bytes, hint)
}

/// Percent-decoding for non-base64 data URIs.
fn percent_decode(input: &str) -> AssetResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = input
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| AssetError::InvalidDataUri("invalid percent-encoding".to_string()))?;
            result.push(byte);
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }

    Ok(result)
}
