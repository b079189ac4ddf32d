//! The rendition decision procedure.
//!
//! Given a [`DeliveryRequest`] and what is known about the source asset,
//! decide whether a transformed rendition can be delivered at all, and if so
//! with which parameters. There are three terminal outcomes:
//!
//! ```text
//!              ┌─ not a raster image ──────────────→ BinaryPassthrough
//! request ─────┼─ target larger than original ─────→ Invalid (never upscale)
//!              └─ otherwise ───────────────────────→ Scaled(params)
//! ```
//!
//! ## Target dimensions
//!
//! The request's own width/height win. Only when the request pins neither
//! does the caller's driving format (the first format matching the asset's
//! context) supply its minimum width/height.
//!
//! When a width and a ratio are both known, the height is derived from them
//! and replaces any height carried over. The ratio comes from, in order: the
//! request's explicit aspect ratio, its smart-crop ratio pair, the driving
//! format.
//!
//! ## Crop precedence
//!
//! 1. A manual rectangle from the request.
//! 2. A smart-crop ratio pair (the endpoint picks the region).
//! 3. An automatic rectangle from the request (upstream aspect fitting).
//!
//! Everything here is pure: no I/O, no shared state.

use super::calculations::{derive_height, requires_upscale};
use super::params::{CropInstruction, QualityPolicy, RequestedQuality, ScaledParams};
use crate::metadata::AssetMetadata;
use crate::types::{AssetKind, DeliveryRequest, Dimension};
use tracing::debug;

/// Constraints from the format driving this delivery, used when the request
/// itself pins no dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FormatConstraints {
    pub min_width: Option<u32>,
    pub min_height: Option<u32>,
    /// `width / height`.
    pub ratio: Option<f64>,
}

/// The facts about an asset the resolver needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceAsset {
    pub kind: AssetKind,
    /// May be unknown (0x0).
    pub original: Dimension,
}

impl From<&AssetMetadata> for SourceAsset {
    fn from(metadata: &AssetMetadata) -> Self {
        Self {
            kind: metadata.kind,
            original: metadata.original(),
        }
    }
}

/// Why no rendition can be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The target exceeds the original in at least one axis.
    Upscale {
        original: Dimension,
        width: Option<u32>,
        height: Option<u32>,
    },
}

/// Terminal state of a resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Serve the original binary untouched.
    BinaryPassthrough,
    /// No URL can be produced for this request.
    Invalid(InvalidReason),
    /// Serve a scaled and/or cropped rendition.
    Scaled(ScaledParams),
}

impl Resolution {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Resolution::Invalid(_))
    }

    pub fn scaled(&self) -> Option<&ScaledParams> {
        match self {
            Resolution::Scaled(params) => Some(params),
            _ => None,
        }
    }
}

pub struct RenditionResolver<P = RequestedQuality> {
    quality: P,
}

impl RenditionResolver<RequestedQuality> {
    pub fn new() -> Self {
        Self {
            quality: RequestedQuality,
        }
    }
}

impl Default for RenditionResolver<RequestedQuality> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: QualityPolicy> RenditionResolver<P> {
    /// A resolver whose output quality comes from `policy`.
    pub fn with_quality_policy(policy: P) -> Self {
        Self { quality: policy }
    }

    pub fn resolve(
        &self,
        request: &DeliveryRequest,
        source: SourceAsset,
        format: Option<&FormatConstraints>,
    ) -> Resolution {
        if !source.kind.is_transformable() {
            debug!(kind = ?source.kind, "binary passthrough");
            return Resolution::BinaryPassthrough;
        }

        let (width, mut height) = target_dimensions(request, format);
        let original = source.original;

        if requires_upscale(original, width, height) {
            debug!(?original, ?width, ?height, "refusing to upscale");
            return Resolution::Invalid(InvalidReason::Upscale {
                original,
                width,
                height,
            });
        }

        if let (Some(w), Some(ratio)) = (width, target_ratio(request, format)) {
            height = derive_height(w, ratio).or(height);
        }
        // A derived height can still overshoot a short original.
        if requires_upscale(original, width, height) {
            debug!(?original, ?width, ?height, "derived height would upscale");
            return Resolution::Invalid(InvalidReason::Upscale {
                original,
                width,
                height,
            });
        }

        let params = ScaledParams {
            width: width.unwrap_or(original.width),
            height: height.unwrap_or(original.height),
            target_width: width,
            target_height: height,
            crop: crop_instruction(request),
            rotation: request.effective_rotation(),
            quality: self.quality.quality(request, source.kind),
            enforce_extension: request.enforce_output_extension.clone(),
            original,
        };
        debug!(width = params.width, height = params.height, crop = ?params.crop, "scaled delivery");
        Resolution::Scaled(params)
    }
}

fn non_zero(value: Option<u32>) -> Option<u32> {
    value.filter(|&v| v > 0)
}

/// Request dimensions if it pins any, otherwise the driving format's minimums.
fn target_dimensions(
    request: &DeliveryRequest,
    format: Option<&FormatConstraints>,
) -> (Option<u32>, Option<u32>) {
    let width = non_zero(request.width);
    let height = non_zero(request.height);
    if width.is_some() || height.is_some() {
        return (width, height);
    }
    format
        .map(|f| (non_zero(f.min_width), non_zero(f.min_height)))
        .unwrap_or((None, None))
}

fn target_ratio(request: &DeliveryRequest, format: Option<&FormatConstraints>) -> Option<f64> {
    let usable = |r: f64| r.is_finite() && r > 0.0;
    request
        .aspect_ratio
        .filter(|&r| usable(r))
        .or_else(|| request.crop_smart_ratio_dimension.and_then(|d| d.ratio()))
        .or_else(|| format.and_then(|f| f.ratio).filter(|&r| usable(r)))
}

fn crop_instruction(request: &DeliveryRequest) -> Option<CropInstruction> {
    let rect = request.effective_crop();
    let smart = request
        .crop_smart_ratio_dimension
        .filter(Dimension::is_known)
        .map(CropInstruction::SmartRatio);
    match rect {
        Some(crop) if !crop.is_automatic => Some(CropInstruction::Rect(crop)),
        Some(crop) => smart.or(Some(CropInstruction::Rect(crop))),
        None => smart,
    }
}
