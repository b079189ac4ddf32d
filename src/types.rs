//! Shared value types used by every stage of rendition resolution.
//!
//! These types flow from metadata parsing through the resolver into the
//! parameter builders, and must mean the same thing in all of them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Failure to parse a dimension or crop from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected}, got {input:?}")]
pub struct ParseError {
    pub expected: &'static str,
    pub input: String,
}

fn parse_parts<const N: usize>(
    input: &str,
    separator: char,
    expected: &'static str,
) -> Result<[u32; N], ParseError> {
    let error = || ParseError {
        expected,
        input: input.to_string(),
    };
    let parts: Vec<u32> = input
        .split(separator)
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|_| error())?;
    parts.try_into().map_err(|_| error())
}

/// Pixel dimensions of an asset or rendition.
///
/// A zero in either axis means "unknown". Use [`Dimension::is_known`] rather
/// than comparing against zero at call sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_known(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// `width / height`, or `None` for an unknown dimension.
    pub fn ratio(&self) -> Option<f64> {
        self.is_known()
            .then(|| self.width as f64 / self.height as f64)
    }
}

/// Parses a `width:height` pair such as `16:9`.
impl FromStr for Dimension {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [width, height] = parse_parts(s, ':', "width:height")?;
        Ok(Self::new(width, height))
    }
}

/// Parses a manual `left,top,width,height` rectangle.
impl FromStr for CropDimension {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [left, top, width, height] = parse_parts(s, ',', "left,top,width,height")?;
        Ok(Self::manual(left, top, width, height))
    }
}

/// A crop rectangle in absolute pixels of the original asset.
///
/// `is_automatic` separates crops computed by the system (smart crops, aspect
/// fitting) from crops an author drew by hand. Manual crops always win.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropDimension {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub is_automatic: bool,
}

impl CropDimension {
    pub fn manual(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            is_automatic: false,
        }
    }

    pub fn automatic(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            is_automatic: true,
            ..Self::manual(left, top, width, height)
        }
    }

    /// Zero-area crops are treated as no crop at all.
    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// `width / height`, 0 when the height is 0.
    pub fn ratio(&self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f64 / self.height as f64
        }
    }

    /// Comma-separated absolute rectangle: `left,top,width,height`.
    pub fn to_absolute_string(&self) -> String {
        format!("{},{},{},{}", self.left, self.top, self.width, self.height)
    }
}

/// Coarse classification of an asset, decided once from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Scalable vector image (SVG). Never resampled.
    Vector,
    /// Bitmap image the delivery endpoints can scale and crop.
    Raster,
    /// Anything else: videos, documents, generic downloads.
    Other,
}

impl AssetKind {
    pub fn from_mime(mime_type: &str) -> Self {
        let mime = mime_type.trim().to_ascii_lowercase();
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence == "image/svg+xml" {
            AssetKind::Vector
        } else if essence.starts_with("image/") {
            AssetKind::Raster
        } else {
            AssetKind::Other
        }
    }

    pub fn is_transformable(self) -> bool {
        self == AssetKind::Raster
    }
}

/// An abstract rendition request, before any asset metadata is consulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Explicit target aspect ratio (`width / height`).
    pub aspect_ratio: Option<f64>,
    pub crop_dimension: Option<CropDimension>,
    /// A `width:height` pair asking the endpoint to pick the best smart crop
    /// for that ratio. Not a rectangle.
    pub crop_smart_ratio_dimension: Option<Dimension>,
    /// Name of a smart crop stored with the asset.
    pub smart_crop_name: Option<String>,
    /// Degrees; 0 means no rotation.
    pub rotation_degrees: Option<i32>,
    pub quality_percent: Option<u32>,
    pub enforce_output_extension: Option<String>,
}

impl DeliveryRequest {
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    pub fn with_crop(mut self, crop: CropDimension) -> Self {
        self.crop_dimension = Some(crop);
        self
    }

    pub fn with_smart_ratio(mut self, width: u32, height: u32) -> Self {
        self.crop_smart_ratio_dimension = Some(Dimension::new(width, height));
        self
    }

    pub fn with_smart_crop(mut self, name: impl Into<String>) -> Self {
        self.smart_crop_name = Some(name.into());
        self
    }

    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.rotation_degrees = Some(degrees);
        self
    }

    pub fn with_quality(mut self, percent: u32) -> Self {
        self.quality_percent = Some(percent);
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.enforce_output_extension = Some(extension.into());
        self
    }

    /// The crop rectangle, if one with a non-zero area was requested.
    pub fn effective_crop(&self) -> Option<CropDimension> {
        self.crop_dimension.filter(CropDimension::has_area)
    }

    /// Rotation in degrees, if non-zero.
    pub fn effective_rotation(&self) -> Option<i32> {
        self.rotation_degrees.filter(|&r| r != 0)
    }
}
