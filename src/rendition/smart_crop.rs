//! Smart-crop geometry.
//!
//! Smart crops arrive in asset metadata as named regions of interest, each
//! expressed as normalized (0..1) fractions of the original image. This
//! module turns them into absolute pixel rectangles.
//!
//! Malformed definitions are dropped silently. A smart crop is a hint to the
//! delivery endpoint, and one bad entry must never make the whole asset
//! undeliverable.

use super::calculations::scale_normalized;
use crate::types::{CropDimension, Dimension};
use serde::Serialize;

/// A smart crop as received from metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSmartCrop {
    pub name: String,
    pub normalized_left: f64,
    pub normalized_top: f64,
    pub normalized_width: f64,
    pub normalized_height: f64,
}

impl NamedSmartCrop {
    /// A usable definition has a name, a positive extent and a non-negative
    /// origin. NaN fails every comparison and is rejected with the rest.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && self.normalized_width > 0.0
            && self.normalized_height > 0.0
            && self.normalized_left >= 0.0
            && self.normalized_top >= 0.0
    }
}

/// A smart crop resolved against the asset's original dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSmartCrop {
    pub name: String,
    pub crop_dimension: CropDimension,
    pub ratio: f64,
}

/// Resolve one smart crop to absolute pixels.
///
/// Returns `None` for invalid definitions, unknown originals, and crops that
/// round down to zero area.
pub fn resolve(crop: &NamedSmartCrop, original: Dimension) -> Option<ResolvedSmartCrop> {
    if !crop.is_valid() || !original.is_known() {
        return None;
    }
    let crop_dimension = CropDimension::automatic(
        scale_normalized(original.width, crop.normalized_left),
        scale_normalized(original.height, crop.normalized_top),
        scale_normalized(original.width, crop.normalized_width),
        scale_normalized(original.height, crop.normalized_height),
    );
    if !crop_dimension.has_area() {
        return None;
    }
    Some(ResolvedSmartCrop {
        name: crop.name.clone(),
        ratio: crop_dimension.ratio(),
        crop_dimension,
    })
}

/// Resolve every valid smart crop, preserving input order.
///
/// Empty when the original dimensions are unknown.
pub fn resolve_all<'a, I>(crops: I, original: Dimension) -> Vec<ResolvedSmartCrop>
where
    I: IntoIterator<Item = &'a NamedSmartCrop>,
{
    if !original.is_known() {
        return Vec::new();
    }
    crops
        .into_iter()
        .filter_map(|crop| resolve(crop, original))
        .collect()
}

/// The smart crop called `name`.
pub fn find<'a>(crops: &'a [ResolvedSmartCrop], name: &str) -> Option<&'a ResolvedSmartCrop> {
    crops.iter().find(|crop| crop.name == name)
}

/// The smart crop whose ratio is closest to `ratio`.
///
/// Ties go to the earlier crop.
pub fn closest_to_ratio(crops: &[ResolvedSmartCrop], ratio: f64) -> Option<&ResolvedSmartCrop> {
    crops.iter().fold(None, |best: Option<&ResolvedSmartCrop>, crop| {
        let distance = (crop.ratio - ratio).abs();
        match best {
            Some(b) if (b.ratio - ratio).abs() <= distance => Some(b),
            _ => Some(crop),
        }
    })
}
