//! Pure calculation functions for rendition geometry.
//!
//! All functions here are pure and testable without any I/O or metadata
//! lookups. Rounding is part of the output contract: delivery URLs built from
//! these numbers are cached by CDNs, so the same input must always produce
//! the same string.

use crate::types::{CropDimension, Dimension};

/// Derive a target height from a width and an aspect ratio (`width / height`).
///
/// Rounds half up. Returns `None` for a non-positive or non-finite ratio, and
/// when the height would not fit in a `u32`.
///
/// ```
/// # use rendition_resolver::rendition::derive_height;
/// assert_eq!(derive_height(100, 2.0), Some(50));
/// assert_eq!(derive_height(101, 3.0), Some(34));
/// ```
pub fn derive_height(width: u32, ratio: f64) -> Option<u32> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return None;
    }
    let height = (width as f64 / ratio).round();
    (height <= u32::MAX as f64).then_some(height as u32)
}

/// Scale a normalized (0..1) fraction to pixels of `extent`, rounding half up.
pub fn scale_normalized(extent: u32, fraction: f64) -> u32 {
    (extent as f64 * fraction).round().max(0.0) as u32
}

/// `part / whole` as a percentage rounded to one decimal place.
///
/// Computed as `round(part * 1000 / whole) / 10` so that exact tenths
/// (6.5, 52.5) never drift through binary floating point.
fn percent_of(part: u32, whole: u32) -> f64 {
    (part as f64 * 1000.0 / whole as f64).round() / 10.0
}

/// Encode a crop as four percentages of the original dimensions.
///
/// Format: `"<left>p,<top>p,<width>p,<height>p"`, each value with exactly one
/// decimal. Returns `None` when the original dimensions are unknown; callers
/// fall back to [`CropDimension::to_absolute_string`] in that case.
///
/// ```
/// # use rendition_resolver::rendition::relative_crop_string;
/// # use rendition_resolver::types::{CropDimension, Dimension};
/// let crop = CropDimension::manual(13, 55, 105, 67);
/// assert_eq!(
///     relative_crop_string(&crop, Dimension::new(200, 100)).as_deref(),
///     Some("6.5p,55.0p,52.5p,67.0p")
/// );
/// ```
pub fn relative_crop_string(crop: &CropDimension, original: Dimension) -> Option<String> {
    if !original.is_known() {
        return None;
    }
    let Dimension { width, height } = original;
    Some(format!(
        "{:.1}p,{:.1}p,{:.1}p,{:.1}p",
        percent_of(crop.left, width),
        percent_of(crop.top, height),
        percent_of(crop.width, width),
        percent_of(crop.height, height),
    ))
}

/// Whether delivering `target` from `original` would require upscaling.
///
/// Unknown originals never count as upscaling: there is nothing to compare
/// against. Unset target axes are ignored.
pub fn requires_upscale(original: Dimension, width: Option<u32>, height: Option<u32>) -> bool {
    if !original.is_known() {
        return false;
    }
    width.is_some_and(|w| w > original.width) || height.is_some_and(|h| h > original.height)
}
