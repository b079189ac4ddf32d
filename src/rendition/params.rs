//! Parameter types for rendition delivery.
//!
//! These structs describe *what* the delivery endpoint should do, not how a
//! URL for it is spelled. They are the interface between the
//! [`resolver`](super::resolver) (which decides whether and how an asset can
//! be delivered) and the [`builder`](super::builder) implementations (which
//! encode the decision for one particular endpoint).
//!
//! ## Types
//!
//! - [`Quality`]: Output quality percentage (1-100). Clamped on construction.
//! - [`QualityPolicy`]: Caller-supplied rule choosing the quality for a request.
//! - [`CropInstruction`]: Explicit rectangle, or "best smart crop for this ratio".
//! - [`ScaledParams`]: Everything a builder needs to encode a scaled rendition.

use crate::types::{AssetKind, CropDimension, DeliveryRequest, Dimension};

/// Output quality percentage (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Chooses the output quality for a request.
///
/// The engine never invents a quality on its own; it forwards whatever the
/// caller's policy returns.
pub trait QualityPolicy: Sync {
    fn quality(&self, request: &DeliveryRequest, kind: AssetKind) -> Option<Quality>;
}

/// Forwards the request's own `quality_percent`, clamped to 1-100.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestedQuality;

impl QualityPolicy for RequestedQuality {
    fn quality(&self, request: &DeliveryRequest, _kind: AssetKind) -> Option<Quality> {
        request.quality_percent.map(Quality::new)
    }
}

impl<F> QualityPolicy for F
where
    F: Fn(&DeliveryRequest, AssetKind) -> Option<u32> + Sync,
{
    fn quality(&self, request: &DeliveryRequest, kind: AssetKind) -> Option<Quality> {
        self(request, kind).map(Quality::new)
    }
}

/// How the delivered rendition should be cropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropInstruction {
    /// Crop to this absolute rectangle of the original.
    Rect(CropDimension),
    /// Crop to this `width:height` ratio, letting the endpoint pick the best
    /// smart-crop region.
    SmartRatio(Dimension),
}

/// Fully resolved parameters for a scaled rendition.
///
/// `width` and `height` are the values reported back to callers (defaulted
/// from the original where the request left them open). `target_width` and
/// `target_height` are the values actually pinned by the request or its
/// format; only these are encoded into delivery URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledParams {
    pub width: u32,
    pub height: u32,
    pub target_width: Option<u32>,
    pub target_height: Option<u32>,
    pub crop: Option<CropInstruction>,
    pub rotation: Option<i32>,
    pub quality: Option<Quality>,
    pub enforce_extension: Option<String>,
    /// Original dimensions, needed for relative crop encoding.
    pub original: Dimension,
}

impl ScaledParams {
    /// Parameters that only fix the output format: no geometry at all.
    pub fn unscaled(original: Dimension) -> Self {
        Self {
            width: original.width,
            height: original.height,
            target_width: None,
            target_height: None,
            crop: None,
            rotation: None,
            quality: None,
            enforce_extension: None,
            original,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn requested_quality_forwards_request_value() {
        let request = DeliveryRequest::default().with_quality(82);
        assert_eq!(
            RequestedQuality.quality(&request, AssetKind::Raster),
            Some(Quality::new(82))
        );
        assert_eq!(
            RequestedQuality.quality(&DeliveryRequest::default(), AssetKind::Raster),
            None
        );
    }

    #[test]
    fn closure_policy() {
        let policy = |_: &DeliveryRequest, kind: AssetKind| (kind == AssetKind::Raster).then_some(75);
        assert_eq!(
            policy.quality(&DeliveryRequest::default(), AssetKind::Raster),
            Some(Quality::new(75))
        );
        assert_eq!(policy.quality(&DeliveryRequest::default(), AssetKind::Other), None);
    }
}
