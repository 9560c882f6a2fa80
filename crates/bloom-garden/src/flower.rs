#![forbid(unsafe_code)]

//! The persisted flower record and its wire format.
//!
//! Field names on the wire follow the `flowers` table: `data_url`, `size`
//! and `date` carry the image, the scale draw and the publish timestamp.

use std::fmt;

use bloom_canvas::{EncodedImage, ImageError};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::placement::Placement;

const ID_SUFFIX_LEN: usize = 8;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Client-generated flower identifier.
///
/// A base36 millisecond timestamp followed by eight random base36 digits.
/// Uniqueness across sessions is probabilistic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowerId(String);

impl FlowerId {
    /// Generate an id for a flower published at `now`.
    pub fn generate<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Self {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let mut id = to_base36(millis);
        id.extend((0..ID_SUFFIX_LEN).map(|_| char::from(BASE36[rng.random_range(0..36)])));
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FlowerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for FlowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// The committed drawing as a `data:image/png;base64,` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageDataUrl(String);

impl ImageDataUrl {
    #[must_use]
    pub fn from_encoded(image: &EncodedImage) -> Self {
        Self(image.to_data_url())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse back into PNG bytes.
    pub fn to_encoded(&self) -> Result<EncodedImage, ImageError> {
        EncodedImage::from_data_url(&self.0)
    }
}

impl From<String> for ImageDataUrl {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One published drawing with its placement in the garden.
///
/// Never mutated after publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flower {
    pub id: FlowerId,
    #[serde(rename = "data_url")]
    pub image: ImageDataUrl,
    /// Horizontal position, percent of viewport width.
    pub x: f64,
    /// Vertical position from the bottom, percent of viewport height.
    pub y: f64,
    #[serde(rename = "size")]
    pub scale: f64,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

impl Flower {
    /// Assemble a new record from a committed image.
    pub fn plant<R: Rng>(image: &EncodedImage, now: DateTime<Utc>, rng: &mut R) -> Self {
        let id = FlowerId::generate(now, rng);
        let placement = Placement::sample(rng);
        Self {
            id,
            image: ImageDataUrl::from_encoded(image),
            x: placement.x,
            y: placement.y,
            scale: placement.scale,
            created_at: now,
        }
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        Placement {
            x: self.x,
            y: self.y,
            scale: self.scale,
        }
    }
}
