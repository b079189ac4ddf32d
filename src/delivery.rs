//! Delivery facades: from an asset reference and a request to a URL.
//!
//! Both facades run the same pipeline and differ only in where facts about
//! the asset come from:
//!
//! ```text
//! RemoteDelivery:  reference ─► metadata (cached fetch) ─┐
//!                                                        ├─► resolver ─► builder ─► DeliveryOutcome
//! NativeDelivery:  repository path ─► probe (memoized) ──┘
//! ```
//!
//! Nothing here returns an error. Every failure becomes
//! [`DeliveryOutcome::Invalid`] with a [`Rejection`] saying why, and a log
//! line from the layer that failed.

use crate::auth::{AccessTokenCache, HttpTokenExchange};
use crate::cache::{CacheStats, MetadataCache};
use crate::config::{Config, fill_template};
use crate::lock::StripedKeyLock;
use crate::metadata::{AssetMetadata, MetadataFetcher};
use crate::naming::{RemoteAssetRef, seo_name};
use crate::rendition::smart_crop::{self, ResolvedSmartCrop};
use crate::rendition::{
    CropInstruction, DeliveryAsset, DeliveryParameterBuilder, DimensionProbe, FormatConstraints,
    ImageProbe, InvalidReason, MemoizedProbe, NativeParameterBuilder, ParameterSet, QualityPolicy,
    RemoteParameterBuilder, RenditionResolver, RequestedQuality, Resolution, ScaledParams,
    SourceAsset,
};
use crate::types::{AssetKind, DeliveryRequest, Dimension};
use rayon::prelude::*;
use std::borrow::Cow;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Extension used for passthrough URLs of files without one.
const UNKNOWN_EXTENSION: &str = "bin";

/// Why a request produced no URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Remote delivery has no repository configured.
    NotConfigured,
    /// Metadata could not be fetched or was incomplete.
    MetadataUnavailable,
    Rendition(InvalidReason),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotConfigured => write!(f, "remote delivery is not configured"),
            Rejection::MetadataUnavailable => write!(f, "asset metadata unavailable"),
            Rejection::Rendition(InvalidReason::Upscale {
                original,
                width,
                height,
            }) => {
                let axis = |v: &Option<u32>| v.map_or("auto".to_string(), |v| v.to_string());
                write!(
                    f,
                    "{}x{} would upscale the {}x{} original",
                    axis(width),
                    axis(height),
                    original.width,
                    original.height
                )
            }
        }
    }
}

/// Result of a delivery request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    /// The original binary, untransformed.
    Passthrough { url: String },
    Scaled {
        url: String,
        width: u32,
        height: u32,
        parameters: ParameterSet,
    },
    Invalid { reason: Rejection },
}

impl DeliveryOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            DeliveryOutcome::Passthrough { url } | DeliveryOutcome::Scaled { url, .. } => Some(url),
            DeliveryOutcome::Invalid { .. } => None,
        }
    }

    fn invalid(reason: Rejection) -> Self {
        debug!(%reason, "no delivery");
        DeliveryOutcome::Invalid { reason }
    }
}

/// Substitute a named smart crop into the request, unless it already
/// carries a manual rectangle.
fn with_named_crop<'r>(
    request: &'r DeliveryRequest,
    crops: &[ResolvedSmartCrop],
) -> Cow<'r, DeliveryRequest> {
    let Some(name) = request.smart_crop_name.as_deref() else {
        return Cow::Borrowed(request);
    };
    if request.effective_crop().is_some_and(|c| !c.is_automatic) {
        return Cow::Borrowed(request);
    }
    match smart_crop::find(crops, name) {
        Some(crop) => {
            let mut request = request.clone();
            request.crop_dimension = Some(crop.crop_dimension);
            Cow::Owned(request)
        }
        None => {
            debug!(name = %name, "smart crop not defined for asset");
            Cow::Borrowed(request)
        }
    }
}

fn scaled_outcome(
    builder: &impl DeliveryParameterBuilder,
    asset: &DeliveryAsset<'_>,
    params: &ScaledParams,
) -> DeliveryOutcome {
    let parameters = builder.build(asset, params);
    let url = builder.render_url(asset, &parameters);
    DeliveryOutcome::Scaled {
        url,
        width: params.width,
        height: params.height,
        parameters,
    }
}

// ============================================================================
// Remote
// ============================================================================

/// Delivery of assets living in the remote repository.
pub struct RemoteDelivery<P = RequestedQuality> {
    fetcher: MetadataFetcher,
    cache: MetadataCache,
    resolver: RenditionResolver<P>,
    repository_base: Option<String>,
}

impl RemoteDelivery<RequestedQuality> {
    /// Wire up HTTP client, token cache and metadata cache from `config`.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        let client = config.http.client()?;
        let tokens = config.remote.auth.as_ref().map(|auth| {
            Arc::new(AccessTokenCache::new(HttpTokenExchange::new(
                client.clone(),
                &auth.token_url,
            )))
        });
        let fetcher = MetadataFetcher::new(client, config.remote.clone(), tokens);
        Ok(Self::new(fetcher, RenditionResolver::new()))
    }
}

impl<P: QualityPolicy> RemoteDelivery<P> {
    pub fn new(fetcher: MetadataFetcher, resolver: RenditionResolver<P>) -> Self {
        let config = fetcher.config();
        Self {
            cache: MetadataCache::new(config.metadata_cache_ttl()),
            repository_base: config.repository_base(),
            resolver,
            fetcher,
        }
    }

    /// Cached metadata for an asset id.
    pub fn metadata(&self, asset_id: &str) -> Option<Arc<AssetMetadata>> {
        self.cache
            .get_or_fetch(asset_id, |id| self.fetcher.fetch_metadata(id))
    }

    /// Deliver a remote reference.
    ///
    /// `None` when `reference` is not a remote reference at all, so callers
    /// can fall back to native delivery.
    pub fn deliver(
        &self,
        reference: &str,
        request: &DeliveryRequest,
        format: Option<&FormatConstraints>,
    ) -> Option<DeliveryOutcome> {
        let asset = RemoteAssetRef::parse(reference)?;
        if self.repository_base.is_none() {
            return Some(DeliveryOutcome::invalid(Rejection::NotConfigured));
        }
        let Some(metadata) = self.metadata(&asset.asset_id) else {
            return Some(DeliveryOutcome::invalid(Rejection::MetadataUnavailable));
        };
        Some(self.deliver_with_metadata(&asset, &metadata, request, format))
    }

    /// Deliver `asset` using metadata obtained elsewhere.
    pub fn deliver_with_metadata(
        &self,
        asset: &RemoteAssetRef,
        metadata: &AssetMetadata,
        request: &DeliveryRequest,
        format: Option<&FormatConstraints>,
    ) -> DeliveryOutcome {
        let Some(base) = self.repository_base.as_deref() else {
            return DeliveryOutcome::invalid(Rejection::NotConfigured);
        };
        let request = with_named_crop(request, &metadata.smart_crops);
        let config = self.fetcher.config();
        match self
            .resolver
            .resolve(&request, SourceAsset::from(metadata), format)
        {
            Resolution::BinaryPassthrough => {
                let extension = asset
                    .extension()
                    .unwrap_or_else(|| UNKNOWN_EXTENSION.to_string());
                let path = fill_template(
                    &config.original_path_template,
                    &asset.asset_id,
                    &asset.seo_name(),
                    &extension,
                );
                DeliveryOutcome::Passthrough {
                    url: format!("{base}{path}"),
                }
            }
            Resolution::Invalid(reason) => DeliveryOutcome::invalid(Rejection::Rendition(reason)),
            Resolution::Scaled(params) => {
                let builder = RemoteParameterBuilder::new(base, &config.delivery_path_template);
                let target = DeliveryAsset {
                    path: &asset.asset_id,
                    file_name: &asset.file_name,
                };
                scaled_outcome(&builder, &target, &params)
            }
        }
    }

    /// Deliver many references in parallel, preserving input order.
    pub fn deliver_all(
        &self,
        jobs: &[(String, DeliveryRequest)],
        format: Option<&FormatConstraints>,
    ) -> Vec<Option<DeliveryOutcome>> {
        let outcomes: Vec<_> = jobs
            .par_iter()
            .map(|(reference, request)| self.deliver(reference, request, format))
            .collect();
        info!(jobs = jobs.len(), cache = %self.cache.stats(), "batch delivered");
        outcomes
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

// ============================================================================
// Native
// ============================================================================

/// A repository-native asset.
#[derive(Debug, Clone, Copy)]
pub struct NativeAsset<'a> {
    /// Repository path, e.g. `/content/dam/photo.jpg`.
    pub path: &'a str,
    pub mime_type: &'a str,
    /// Stored original size. Probed from the file when absent.
    pub original: Option<Dimension>,
    /// Smart crops computed for this asset, if any.
    pub smart_crops: &'a [ResolvedSmartCrop],
}

/// Delivery of assets stored in the repository itself.
///
/// Repository paths are mapped to files under `root` to read original
/// dimensions.
pub struct NativeDelivery<P = RequestedQuality, D = ImageProbe> {
    root: PathBuf,
    probe: MemoizedProbe<D>,
    resolver: RenditionResolver<P>,
    builder: NativeParameterBuilder,
}

impl NativeDelivery<RequestedQuality, ImageProbe> {
    pub fn from_config(config: &Config, root: impl Into<PathBuf>) -> Self {
        Self::new(
            root,
            ImageProbe,
            StripedKeyLock::new(config.locks.stripes),
            RenditionResolver::new(),
            NativeParameterBuilder::new(&config.delivery),
        )
    }
}

impl<P: QualityPolicy, D: DimensionProbe> NativeDelivery<P, D> {
    pub fn new(
        root: impl Into<PathBuf>,
        probe: D,
        locks: StripedKeyLock,
        resolver: RenditionResolver<P>,
        builder: NativeParameterBuilder,
    ) -> Self {
        Self {
            root: root.into(),
            probe: MemoizedProbe::new(probe, locks),
            resolver,
            builder,
        }
    }

    /// The file under `root` holding `path`, or `None` if the path would
    /// leave `root`.
    fn file_for(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        contained.then(|| self.root.join(relative))
    }

    /// Original dimensions of the file behind `path`; unknown (0x0) if it
    /// can't be read or lies outside `root`.
    pub fn original(&self, path: &str) -> Dimension {
        match self.file_for(path) {
            Some(file) => self.probe.original(&file),
            None => {
                warn!(path = %path, "repository path escapes the root; original unknown");
                Dimension::default()
            }
        }
    }

    pub fn deliver(
        &self,
        asset: &NativeAsset<'_>,
        request: &DeliveryRequest,
        format: Option<&FormatConstraints>,
    ) -> DeliveryOutcome {
        let kind = AssetKind::from_mime(asset.mime_type);
        let original = match asset.original {
            Some(stored) if stored.is_known() => stored,
            _ if kind.is_transformable() => self.original(asset.path),
            _ => Dimension::default(),
        };

        let request = with_named_crop(request, asset.smart_crops);
        match self
            .resolver
            .resolve(&request, SourceAsset { kind, original }, format)
        {
            Resolution::BinaryPassthrough => DeliveryOutcome::Passthrough {
                url: asset.path.to_string(),
            },
            Resolution::Invalid(reason) => DeliveryOutcome::invalid(Rejection::Rendition(reason)),
            Resolution::Scaled(mut params) => {
                params.crop = pin_smart_ratio(params.crop, asset.smart_crops);
                let file_name = Path::new(asset.path)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(asset.path);
                let target = DeliveryAsset {
                    path: asset.path,
                    file_name,
                };
                scaled_outcome(&self.builder, &target, &params)
            }
        }
    }

    /// Deliver many assets in parallel, preserving input order.
    pub fn deliver_all(
        &self,
        jobs: &[(NativeAsset<'_>, DeliveryRequest)],
        format: Option<&FormatConstraints>,
    ) -> Vec<DeliveryOutcome> {
        jobs.par_iter()
            .map(|(asset, request)| self.deliver(asset, request, format))
            .collect()
    }
}

/// The native endpoint cannot choose a smart crop itself, so a ratio-only
/// crop becomes the asset's smart crop closest to that ratio.
fn pin_smart_ratio(
    crop: Option<CropInstruction>,
    crops: &[ResolvedSmartCrop],
) -> Option<CropInstruction> {
    match crop {
        Some(CropInstruction::SmartRatio(ratio)) => ratio
            .ratio()
            .and_then(|r| smart_crop::closest_to_ratio(crops, r))
            .map(|c| CropInstruction::Rect(c.crop_dimension)),
        other => other,
    }
}

/// SEO name for a reference of either kind.
pub fn reference_seo_name(reference: &str) -> String {
    match RemoteAssetRef::parse(reference) {
        Some(asset) => asset.seo_name(),
        None => seo_name(reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteConfig;
    use crate::rendition::smart_crop::NamedSmartCrop;
    use crate::types::CropDimension;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;
    use tempfile::TempDir;

    const REFERENCE: &str = "/urn:aaid:aem:42/Beach Day.jpg";

    fn remote_for(server: &MockServer) -> RemoteDelivery {
        let mut config = Config::default();
        config.remote = RemoteConfig {
            repository_id: Some(server.address().to_string()),
            scheme: "http".into(),
            ..RemoteConfig::default()
        };
        RemoteDelivery::from_config(&config).unwrap()
    }

    fn serve_metadata<'a>(server: &'a MockServer, mime: &str) -> httpmock::Mock<'a> {
        let mime = mime.to_string();
        server.mock(move |when, then| {
            when.method(GET).path("/adobe/assets/urn:aaid:aem:42/metadata");
            then.status(200).json_body(json!({
                "repositoryMetadata": {
                    "dc:format": mime,
                    "smartcrops": {
                        "square": { "left": 0.25, "top": 0.0, "normalizedWidth": 0.5, "normalizedHeight": 1.0 }
                    }
                },
                "assetMetadata": { "tiff:ImageWidth": 200, "tiff:ImageLength": 100 }
            }));
        })
    }

    // =========================================================================
    // Remote
    // =========================================================================

    #[test]
    fn remote_scaled_url() {
        let server = MockServer::start();
        serve_metadata(&server, "image/jpeg");
        let delivery = remote_for(&server);

        let request = DeliveryRequest::default().with_width(100).with_ratio(2.0);
        let outcome = delivery.deliver(REFERENCE, &request, None).unwrap();

        let DeliveryOutcome::Scaled {
            url,
            width,
            height,
            parameters,
        } = outcome
        else {
            panic!("expected Scaled, got {outcome:?}");
        };
        assert_eq!((width, height), (100, 50));
        assert_eq!(parameters.get("crop"), None);
        assert_eq!(parameters.get("rotate"), None);
        assert_eq!(
            url,
            format!(
                "http://{}/adobe/dynamicmedia/deliver/urn:aaid:aem:42/beach-day.jpeg?preferwebp=true&width=100&height=50",
                server.address()
            )
        );
    }

    #[test]
    fn remote_upscale_is_invalid() {
        let server = MockServer::start();
        serve_metadata(&server, "image/jpeg");
        let delivery = remote_for(&server);

        let outcome = delivery
            .deliver(REFERENCE, &DeliveryRequest::default().with_width(300), None)
            .unwrap();
        assert!(matches!(
            outcome,
            DeliveryOutcome::Invalid {
                reason: Rejection::Rendition(InvalidReason::Upscale { .. })
            }
        ));
        assert_eq!(outcome.url(), None);
    }

    #[test]
    fn remote_svg_passes_through() {
        let server = MockServer::start();
        serve_metadata(&server, "image/svg+xml");
        let delivery = remote_for(&server);

        let outcome = delivery
            .deliver("/urn:aaid:aem:42/Logo.svg", &DeliveryRequest::default().with_width(5000), None)
            .unwrap();
        assert_eq!(
            outcome.url(),
            Some(format!("http://{}/adobe/assets/urn:aaid:aem:42/original/as/logo.svg", server.address()).as_str())
        );
    }

    #[test]
    fn remote_named_smart_crop() {
        let server = MockServer::start();
        serve_metadata(&server, "image/jpeg");
        let delivery = remote_for(&server);

        let request = DeliveryRequest::default().with_width(50).with_smart_crop("square");
        let outcome = delivery.deliver(REFERENCE, &request, None).unwrap();
        let DeliveryOutcome::Scaled { parameters, .. } = outcome else {
            panic!("expected Scaled");
        };
        assert_eq!(parameters.get("crop"), Some("50,0,100,100"));
    }

    #[test]
    fn remote_metadata_is_cached() {
        let server = MockServer::start();
        let mock = serve_metadata(&server, "image/jpeg");
        let delivery = remote_for(&server);

        for _ in 0..3 {
            delivery.deliver(REFERENCE, &DeliveryRequest::default(), None);
        }
        mock.assert_hits(1);
        assert_eq!(delivery.cache_stats().hits, 2);
    }

    #[test]
    fn remote_metadata_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(404);
        });
        let delivery = remote_for(&server);

        let outcome = delivery.deliver(REFERENCE, &DeliveryRequest::default(), None);
        assert_eq!(
            outcome,
            Some(DeliveryOutcome::Invalid {
                reason: Rejection::MetadataUnavailable
            })
        );
    }

    #[test]
    fn remote_not_configured() {
        let delivery = RemoteDelivery::from_config(&Config::default()).unwrap();
        assert_eq!(
            delivery.deliver(REFERENCE, &DeliveryRequest::default(), None),
            Some(DeliveryOutcome::Invalid {
                reason: Rejection::NotConfigured
            })
        );
    }

    #[test]
    fn non_remote_reference_is_none() {
        let delivery = RemoteDelivery::from_config(&Config::default()).unwrap();
        assert_eq!(
            delivery.deliver("/content/dam/a.jpg", &DeliveryRequest::default(), None),
            None
        );
    }

    #[test]
    fn remote_batch_preserves_order() {
        let server = MockServer::start();
        serve_metadata(&server, "image/jpeg");
        let delivery = remote_for(&server);

        let jobs: Vec<(String, DeliveryRequest)> = (1..=8)
            .map(|i| (REFERENCE.to_string(), DeliveryRequest::default().with_width(i * 25)))
            .collect();
        let outcomes = delivery.deliver_all(&jobs, None);

        assert_eq!(outcomes.len(), 8);
        for (i, outcome) in outcomes.iter().enumerate() {
            let expect_valid = (i as u32 + 1) * 25 <= 200;
            assert_eq!(outcome.as_ref().unwrap().url().is_some(), expect_valid, "job {i}");
        }
    }

    // =========================================================================
    // Native
    // =========================================================================

    fn native_root() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("content/dam");
        std::fs::create_dir_all(&dir).unwrap();
        image::RgbImage::new(200, 100).save(dir.join("photo.png")).unwrap();
        tmp
    }

    fn asset<'a>(path: &'a str, mime: &'a str, crops: &'a [ResolvedSmartCrop]) -> NativeAsset<'a> {
        NativeAsset {
            path,
            mime_type: mime,
            original: None,
            smart_crops: crops,
        }
    }

    #[test]
    fn native_scaled_with_relative_crop() {
        let tmp = native_root();
        let delivery = NativeDelivery::from_config(&Config::default(), tmp.path());

        let request = DeliveryRequest::default()
            .with_width(100)
            .with_crop(CropDimension::manual(13, 55, 105, 45));
        let outcome = delivery.deliver(&asset("/content/dam/photo.png", "image/png", &[]), &request, None);

        let DeliveryOutcome::Scaled { url, parameters, .. } = outcome else {
            panic!("expected Scaled");
        };
        assert_eq!(parameters.get("c"), Some("6.5p,55.0p,52.5p,45.0p"));
        assert_eq!(parameters.get("format"), Some("png"));
        assert!(url.starts_with("/asset/delivery/content/dam/photo.png?"));
    }

    #[test]
    fn native_upscale_is_invalid() {
        let tmp = native_root();
        let delivery = NativeDelivery::from_config(&Config::default(), tmp.path());
        let outcome = delivery.deliver(
            &asset("/content/dam/photo.png", "image/png", &[]),
            &DeliveryRequest::default().with_width(201),
            None,
        );
        assert!(matches!(outcome, DeliveryOutcome::Invalid { .. }));
    }

    #[test]
    fn native_missing_file_has_unknown_original() {
        let tmp = native_root();
        let delivery = NativeDelivery::from_config(&Config::default(), tmp.path());
        let outcome = delivery.deliver(
            &asset("/content/dam/missing.jpg", "image/jpeg", &[]),
            &DeliveryRequest::default().with_width(4000),
            None,
        );
        let DeliveryOutcome::Scaled { width, height, .. } = outcome else {
            panic!("expected Scaled");
        };
        assert_eq!((width, height), (4000, 0));
    }

    #[test]
    fn native_path_outside_root_is_not_read() {
        let tmp = native_root();
        let root = tmp.path().join("content");
        image::RgbImage::new(40, 30).save(tmp.path().join("secret.png")).unwrap();
        let delivery = NativeDelivery::from_config(&Config::default(), root.clone());

        assert_eq!(delivery.original("/../secret.png"), Dimension::default());
        assert_eq!(delivery.original("/dam/../../secret.png"), Dimension::default());
        assert_eq!(delivery.original("/dam/./photo.png"), Dimension::new(200, 100));

        let outcome = delivery.deliver(
            &asset("/../secret.png", "image/png", &[]),
            &DeliveryRequest::default().with_width(100),
            None,
        );
        assert!(matches!(outcome, DeliveryOutcome::Scaled { width: 100, height: 0, .. }));
    }

    #[test]
    fn native_stored_dimension_skips_probe() {
        let tmp = native_root();
        let delivery = NativeDelivery::from_config(&Config::default(), tmp.path());
        let stored = NativeAsset {
            original: Some(Dimension::new(4000, 3000)),
            ..asset("/content/dam/photo.png", "image/png", &[])
        };
        let outcome = delivery.deliver(&stored, &DeliveryRequest::default().with_width(1000), None);
        assert!(matches!(outcome, DeliveryOutcome::Scaled { width: 1000, height: 3000, .. }));
    }

    #[test]
    fn native_pdf_passes_through() {
        let tmp = native_root();
        let delivery = NativeDelivery::from_config(&Config::default(), tmp.path());
        let outcome = delivery.deliver(
            &asset("/content/dam/doc.pdf", "application/pdf", &[]),
            &DeliveryRequest::default().with_width(10),
            None,
        );
        assert_eq!(
            outcome,
            DeliveryOutcome::Passthrough {
                url: "/content/dam/doc.pdf".into()
            }
        );
    }

    #[test]
    fn native_smart_ratio_pins_closest_crop() {
        let tmp = native_root();
        let delivery = NativeDelivery::from_config(&Config::default(), tmp.path());
        let original = Dimension::new(200, 100);
        let crops = smart_crop::resolve_all(
            &[
                NamedSmartCrop {
                    name: "wide".into(),
                    normalized_left: 0.0,
                    normalized_top: 0.25,
                    normalized_width: 1.0,
                    normalized_height: 0.5,
                },
                NamedSmartCrop {
                    name: "square".into(),
                    normalized_left: 0.25,
                    normalized_top: 0.0,
                    normalized_width: 0.5,
                    normalized_height: 1.0,
                },
            ],
            original,
        );

        let request = DeliveryRequest::default().with_width(50).with_smart_ratio(1, 1);
        let outcome = delivery.deliver(&asset("/content/dam/photo.png", "image/png", &crops), &request, None);
        let DeliveryOutcome::Scaled { parameters, height, .. } = outcome else {
            panic!("expected Scaled");
        };
        assert_eq!(height, 50);
        assert_eq!(parameters.get("c"), Some("25.0p,0.0p,50.0p,100.0p"));
    }

    #[test]
    fn reference_seo_names() {
        assert_eq!(reference_seo_name(REFERENCE), "beach-day");
        assert_eq!(reference_seo_name("/content/dam/Summer Fun.png"), "summer-fun");
    }
}
