#![forbid(unsafe_code)]

//! PNG snapshot of a raster, embeddable as a `data:` URL.

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, RgbaImage};

use crate::raster::Raster;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A committed drawing: PNG bytes at the surface's logical resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    png: Vec<u8>,
}

impl EncodedImage {
    /// Encode the raster as PNG.
    ///
    /// The encoder settings are fixed, so equal rasters produce equal bytes.
    pub fn from_raster(raster: &Raster) -> Result<Self, ImageError> {
        let image = RgbaImage::from_raw(raster.width(), raster.height(), raster.as_raw().to_vec())
            .ok_or(ImageError::BufferSize {
                width: raster.width(),
                height: raster.height(),
            })?;
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(ImageError::Encode)?;
        Ok(Self {
            png: out.into_inner(),
        })
    }

    /// Wrap PNG bytes produced elsewhere. The bytes are validated on decode.
    #[must_use]
    pub fn from_png_bytes(png: Vec<u8>) -> Self {
        Self { png }
    }

    /// Parse a `data:image/png;base64,` URL.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let payload = url
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or(ImageError::InvalidDataUrl)?;
        let png = STANDARD.decode(payload.trim())?;
        Ok(Self { png })
    }

    #[must_use]
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,...` form of the snapshot.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        let mut url = String::with_capacity(DATA_URL_PREFIX.len() + self.png.len() * 4 / 3 + 4);
        url.push_str(DATA_URL_PREFIX);
        STANDARD.encode_string(&self.png, &mut url);
        url
    }

    /// Decode back into RGBA pixels.
    pub fn decode(&self) -> Result<RgbaImage, ImageError> {
        let image = image::load_from_memory_with_format(&self.png, ImageFormat::Png)
            .map_err(ImageError::Decode)?;
        Ok(image.into_rgba8())
    }
}

#[derive(Debug)]
pub enum ImageError {
    Encode(image::ImageError),
    Decode(image::ImageError),
    BufferSize { width: u32, height: u32 },
    InvalidDataUrl,
    Base64(base64::DecodeError),
}

impl From<base64::DecodeError> for ImageError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64(err)
    }
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "image encode error: {err}"),
            Self::Decode(err) => write!(f, "image decode error: {err}"),
            Self::BufferSize { width, height } => {
                write!(f, "raster buffer does not match {width}x{height}")
            }
            Self::InvalidDataUrl => f.write_str("not a data:image/png;base64 URL"),
            Self::Base64(err) => write!(f, "base64 decode error: {err}"),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Decode(err) => Some(err),
            Self::Base64(err) => Some(err),
            Self::BufferSize { .. } | Self::InvalidDataUrl => None,
        }
    }
}
