use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;

/// An inline image uploaded as a `data:image/...;base64,` URL.
///
/// The payload is decoded eagerly so that a malformed upload is caught
/// during request validation instead of when the file is written out.
#[derive(Debug)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl TryFrom<String> for ImagePayload {
    type Error = InvalidImage;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let data = value
            .strip_prefix("data:")
            .ok_or(InvalidImage::MissingPrefix)?;
        let (mime, encoded) = data
            .split_once(";base64,")
            .ok_or(InvalidImage::MissingPrefix)?;
        if !mime.starts_with("image") {
            return Err(InvalidImage::NotAnImage);
        }
        let bytes = STANDARD.decode(encoded)?;
        let format = image::guess_format(&bytes)
            .map_err(|_| InvalidImage::UnknownFormat)?;
        Ok(Self { bytes, format })
    }
}

impl ImagePayload {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// File extension inferred from the decoded bytes, not the declared mime.
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InvalidImage {
    #[error("Image must be sent as a 'data:image/...;base64,' payload.")]
    MissingPrefix,
    #[error("Payload does not declare an image mime type.")]
    NotAnImage,
    #[error("Image payload is not valid base64.")]
    MalformedBase64(#[from] base64::DecodeError),
    #[error("Could not infer the image type from the payload.")]
    UnknownFormat,
}
