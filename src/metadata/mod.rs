//! Remote asset metadata.
//!
//! The remote repository answers a metadata lookup with a JSON document of
//! two halves:
//!
//! ```json
//! {
//!   "repositoryMetadata": {
//!     "repo:name": "beach.jpg",
//!     "dc:format": "image/jpeg",
//!     "repo:size": 482113,
//!     "smartcrops": {
//!       "Landscape": { "left": 0.1, "top": 0.2, "normalizedWidth": 0.8, "normalizedHeight": 0.45 }
//!     }
//!   },
//!   "assetMetadata": {
//!     "tiff:ImageWidth": 4000,
//!     "tiff:ImageLength": 3000,
//!     "dam:assetStatus": "approved"
//!   }
//! }
//! ```
//!
//! Parsing is forward compatible: unknown fields are ignored, and so are
//! smart crops that don't make geometric sense. Only a body that is not JSON
//! at all, or whose known fields have the wrong type, is a parse error.
//!
//! ## Dimensions
//!
//! Width and height come from `assetMetadata`, trying image properties before
//! video ones (see [`WIDTH_PROPERTIES`], [`HEIGHT_PROPERTIES`]). Values may be
//! JSON numbers or numeric strings.

mod fetch;

pub use fetch::{MetadataFetcher, metadata_url};

use crate::rendition::smart_crop::{self, NamedSmartCrop, ResolvedSmartCrop};
use crate::types::{AssetKind, Dimension};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// MIME type reported for assets that don't declare one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Width properties, image first, then video.
pub const WIDTH_PROPERTIES: &[&str] = &["tiff:ImageWidth", "exif:PixelXDimension", "dam:videoWidth"];

/// Height properties, image first, then video.
pub const HEIGHT_PROPERTIES: &[&str] = &["tiff:ImageLength", "exif:PixelYDimension", "dam:videoHeight"];

/// Property carrying the asset's review status.
pub const ASSET_STATUS_PROPERTY: &str = "dam:assetStatus";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("metadata lookup is not configured")]
    NotConfigured,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no metadata at {0}")]
    NotFound(String),
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("metadata from {0} declares no MIME type")]
    Invalid(String),
}

/// Parsed, validated metadata for one remote asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetMetadata {
    mime_type: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub dimension: Option<Dimension>,
    pub asset_status: Option<String>,
    /// The free-form `assetMetadata` map, in document order.
    pub properties: Map<String, Value>,
    pub smart_crops: Vec<ResolvedSmartCrop>,
    pub kind: AssetKind,
}

impl AssetMetadata {
    /// Metadata for a local description of an asset (tests, CLI fixtures).
    pub fn new(mime_type: &str, dimension: Option<Dimension>) -> Self {
        Self {
            mime_type: Some(mime_type.to_string()),
            file_name: None,
            file_size: None,
            dimension: dimension.filter(Dimension::is_known),
            asset_status: None,
            properties: Map::new(),
            smart_crops: Vec::new(),
            kind: AssetKind::from_mime(mime_type),
        }
    }

    pub fn mime_type(&self) -> &str {
        self.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE)
    }

    /// Metadata is usable only if the repository declared a MIME type.
    pub fn is_valid(&self) -> bool {
        self.mime_type.is_some()
    }

    /// Original dimensions, or the unknown (0x0) dimension.
    pub fn original(&self) -> Dimension {
        self.dimension.unwrap_or_default()
    }

    pub fn smart_crop(&self, name: &str) -> Option<&ResolvedSmartCrop> {
        smart_crop::find(&self.smart_crops, name)
    }
}

#[derive(Debug, Deserialize)]
struct MetadataDocument {
    #[serde(rename = "repositoryMetadata", default)]
    repository: Option<RepositoryMetadata>,
    #[serde(rename = "assetMetadata", default)]
    asset: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct RepositoryMetadata {
    #[serde(rename = "dc:format")]
    format: Option<String>,
    #[serde(rename = "repo:name")]
    name: Option<String>,
    #[serde(rename = "repo:size")]
    size: Option<Value>,
    #[serde(default)]
    smartcrops: Option<Map<String, Value>>,
}

/// Parse a metadata response body.
pub fn parse_metadata(body: &[u8]) -> Result<AssetMetadata, MetadataError> {
    let document: MetadataDocument = serde_json::from_slice(body)?;
    let repository = document.repository.unwrap_or_default();
    let properties = document.asset.unwrap_or_default();

    let dimension = match (
        first_dimension(&properties, WIDTH_PROPERTIES),
        first_dimension(&properties, HEIGHT_PROPERTIES),
    ) {
        (Some(width), Some(height)) => Some(Dimension::new(width, height)),
        _ => None,
    };

    let named = repository
        .smartcrops
        .as_ref()
        .map(named_smart_crops)
        .unwrap_or_default();
    let smart_crops = dimension
        .map(|original| smart_crop::resolve_all(&named, original))
        .unwrap_or_default();

    let kind = repository
        .format
        .as_deref()
        .map(AssetKind::from_mime)
        .unwrap_or(AssetKind::Other);

    Ok(AssetMetadata {
        mime_type: repository.format,
        file_name: repository.name,
        file_size: repository.size.as_ref().and_then(as_u64),
        dimension,
        asset_status: properties
            .get(ASSET_STATUS_PROPERTY)
            .and_then(Value::as_str)
            .map(String::from),
        properties,
        smart_crops,
        kind,
    })
}

/// First property among `names` holding a positive integer.
fn first_dimension(properties: &Map<String, Value>, names: &[&str]) -> Option<u32> {
    names
        .iter()
        .filter_map(|name| properties.get(*name))
        .filter_map(as_u64)
        .filter_map(|v| u32::try_from(v).ok())
        .find(|&v| v > 0)
}

/// Accept JSON numbers and numeric strings alike.
fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Lift the raw `smartcrops` object into [`NamedSmartCrop`]s.
///
/// Entries that aren't objects are skipped. Missing coordinates read as 0 and
/// then fail validation, so they disappear in [`smart_crop::resolve_all`].
fn named_smart_crops(raw: &Map<String, Value>) -> Vec<NamedSmartCrop> {
    raw.iter()
        .filter_map(|(name, value)| {
            let obj = value.as_object()?;
            let coord = |key: &str| obj.get(key).and_then(as_f64).unwrap_or(0.0);
            Some(NamedSmartCrop {
                name: name.clone(),
                normalized_left: coord("left"),
                normalized_top: coord("top"),
                normalized_width: coord("normalizedWidth"),
                normalized_height: coord("normalizedHeight"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CropDimension;
    use serde_json::json;

    fn parse(value: Value) -> AssetMetadata {
        parse_metadata(value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn parses_full_document() {
        let meta = parse(json!({
            "assetId": "urn:aaid:aem:1",
            "repositoryMetadata": {
                "repo:name": "beach.jpg",
                "dc:format": "image/jpeg",
                "repo:size": 482113,
                "smartcrops": {
                    "Landscape": { "left": 0.1, "top": 0.25, "normalizedWidth": 0.5, "normalizedHeight": 0.5 }
                }
            },
            "assetMetadata": {
                "tiff:ImageWidth": 200,
                "tiff:ImageLength": 100,
                "dam:assetStatus": "approved",
                "dc:title": "Beach"
            }
        }));

        assert!(meta.is_valid());
        assert_eq!(meta.mime_type(), "image/jpeg");
        assert_eq!(meta.kind, AssetKind::Raster);
        assert_eq!(meta.file_name.as_deref(), Some("beach.jpg"));
        assert_eq!(meta.file_size, Some(482113));
        assert_eq!(meta.dimension, Some(Dimension::new(200, 100)));
        assert_eq!(meta.asset_status.as_deref(), Some("approved"));
        assert_eq!(meta.properties.get("dc:title"), Some(&json!("Beach")));
        assert_eq!(meta.smart_crops.len(), 1);
        assert_eq!(
            meta.smart_crop("Landscape").unwrap().crop_dimension,
            CropDimension::automatic(20, 25, 100, 50)
        );
    }

    #[test]
    fn missing_format_is_invalid_with_default_mime() {
        let meta = parse(json!({ "repositoryMetadata": {}, "assetMetadata": {} }));
        assert!(!meta.is_valid());
        assert_eq!(meta.mime_type(), DEFAULT_MIME_TYPE);
        assert_eq!(meta.kind, AssetKind::Other);
    }

    #[test]
    fn empty_object_parses() {
        let meta = parse(json!({}));
        assert!(!meta.is_valid());
        assert_eq!(meta.dimension, None);
    }

    #[test]
    fn falls_back_to_video_dimension_properties() {
        let meta = parse(json!({
            "repositoryMetadata": { "dc:format": "video/mp4" },
            "assetMetadata": { "dam:videoWidth": "1920", "dam:videoHeight": 1080 }
        }));
        assert_eq!(meta.dimension, Some(Dimension::new(1920, 1080)));
        assert_eq!(meta.kind, AssetKind::Other);
    }

    #[test]
    fn image_properties_win_over_later_fallbacks() {
        let meta = parse(json!({
            "repositoryMetadata": { "dc:format": "image/png" },
            "assetMetadata": {
                "exif:PixelXDimension": 10, "exif:PixelYDimension": 10,
                "tiff:ImageWidth": 300, "tiff:ImageLength": 200
            }
        }));
        assert_eq!(meta.dimension, Some(Dimension::new(300, 200)));
    }

    #[test]
    fn zero_dimension_property_is_skipped() {
        let meta = parse(json!({
            "repositoryMetadata": { "dc:format": "image/png" },
            "assetMetadata": { "tiff:ImageWidth": 0, "exif:PixelXDimension": 640, "tiff:ImageLength": 480 }
        }));
        assert_eq!(meta.dimension, Some(Dimension::new(640, 480)));
    }

    #[test]
    fn half_known_dimension_is_unknown() {
        let meta = parse(json!({
            "repositoryMetadata": { "dc:format": "image/png" },
            "assetMetadata": { "tiff:ImageWidth": 640 }
        }));
        assert_eq!(meta.dimension, None);
    }

    #[test]
    fn smart_crops_dropped_without_dimensions() {
        let meta = parse(json!({
            "repositoryMetadata": {
                "dc:format": "image/jpeg",
                "smartcrops": { "Square": { "left": 0, "top": 0, "normalizedWidth": 0.5, "normalizedHeight": 0.5 } }
            },
            "assetMetadata": {}
        }));
        assert!(meta.smart_crops.is_empty());
    }

    #[test]
    fn invalid_smart_crops_are_filtered_silently() {
        let meta = parse(json!({
            "repositoryMetadata": {
                "dc:format": "image/jpeg",
                "smartcrops": {
                    "NoWidth": { "left": 0, "top": 0, "normalizedWidth": 0, "normalizedHeight": 0.5 },
                    "NegLeft": { "left": -0.1, "top": 0, "normalizedWidth": 0.5, "normalizedHeight": 0.5 },
                    "NotAnObject": 42,
                    "Missing": { "left": 0.1 },
                    "Square": { "left": "0", "top": 0, "normalizedWidth": "0.5", "normalizedHeight": 1 }
                }
            },
            "assetMetadata": { "tiff:ImageWidth": 200, "tiff:ImageLength": 100 }
        }));
        let names: Vec<_> = meta.smart_crops.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Square"]);
        assert_eq!(meta.smart_crops[0].crop_dimension, CropDimension::automatic(0, 0, 100, 100));
    }

    #[test]
    fn smart_crops_keep_document_order() {
        let meta = parse(json!({
            "repositoryMetadata": {
                "dc:format": "image/jpeg",
                "smartcrops": {
                    "Zeta": { "left": 0, "top": 0, "normalizedWidth": 0.5, "normalizedHeight": 0.5 },
                    "Alpha": { "left": 0, "top": 0, "normalizedWidth": 0.5, "normalizedHeight": 0.5 }
                }
            },
            "assetMetadata": { "tiff:ImageWidth": 200, "tiff:ImageLength": 100 }
        }));
        let names: Vec<_> = meta.smart_crops.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha"]);
    }

    #[test]
    fn svg_is_vector() {
        let meta = parse(json!({ "repositoryMetadata": { "dc:format": "image/svg+xml" } }));
        assert_eq!(meta.kind, AssetKind::Vector);
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(matches!(parse_metadata(b"{not json"), Err(MetadataError::Json(_))));
    }

    #[test]
    fn wrong_type_for_known_field_is_error() {
        let body = json!({ "repositoryMetadata": { "dc:format": 12 } }).to_string();
        assert!(parse_metadata(body.as_bytes()).is_err());
    }

    #[test]
    fn null_halves_are_tolerated() {
        let meta = parse(json!({ "repositoryMetadata": null, "assetMetadata": null }));
        assert!(!meta.is_valid());
    }
}
