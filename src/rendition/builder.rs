//! Encoding [`ScaledParams`] for a concrete delivery endpoint.
//!
//! Two endpoints share one parameter vocabulary and differ in detail:
//!
//! | Key | Remote | Native |
//! |---|---|---|
//! | `path` | asset id | repository path |
//! | `seoname`, `format`, `preferwebp` | always | always |
//! | `width` | when pinned | when pinned |
//! | `height` | when pinned | never |
//! | crop | `crop=l,t,w,h` or `crop=w:h,smart` | `c=` relative or absolute |
//! | rotation | `rotate=` | `r=` |
//! | `quality` | when chosen | when chosen |
//!
//! Parameter order is fixed (the order of the table) so that identical
//! inputs always produce byte-identical URLs.

use super::calculations::relative_crop_string;
use super::params::{CropInstruction, ScaledParams};
use crate::config::{CropEncoding, DeliveryConfig, default_supported_formats, fill_template};
use crate::naming::{extension_of, seo_name};
use crate::types::Dimension;
use tracing::debug;
use url::form_urlencoded;

/// Output format used when nothing better can be negotiated.
pub const FALLBACK_FORMAT: &str = "jpeg";

/// Ordered `key=value` pairs for one delivery URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet(Vec<(&'static str, String)>);

impl ParameterSet {
    pub fn push(&mut self, key: &'static str, value: impl ToString) {
        self.0.push((key, value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// URL-encoded query string of every pair whose key is not in `skip`.
    pub fn query_string(&self, skip: &[&str]) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter().filter(|(k, _)| !skip.contains(k)) {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

/// The asset a parameter set is built for.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryAsset<'a> {
    /// Asset id (remote) or repository path (native).
    pub path: &'a str,
    /// Source file name, for the SEO name and the default format.
    pub file_name: &'a str,
}

/// Turns resolved parameters into an endpoint's parameter set and URL.
pub trait DeliveryParameterBuilder: Sync {
    fn build(&self, asset: &DeliveryAsset<'_>, params: &ScaledParams) -> ParameterSet;

    fn render_url(&self, asset: &DeliveryAsset<'_>, parameters: &ParameterSet) -> String;
}

/// Pick the output format.
///
/// The enforced extension wins over the file's own; `jpg` is spelled `jpeg`;
/// anything outside `supported` becomes [`FALLBACK_FORMAT`].
pub fn negotiate_format(file_name: &str, enforced: Option<&str>, supported: &[String]) -> String {
    let candidate = enforced
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .or_else(|| extension_of(file_name));

    match candidate.as_deref() {
        Some("jpg") => FALLBACK_FORMAT.to_string(),
        Some(ext) if supported.iter().any(|s| s.eq_ignore_ascii_case(ext)) => ext.to_string(),
        _ => FALLBACK_FORMAT.to_string(),
    }
}

/// Keys every endpoint starts with.
fn common_parameters(
    asset: &DeliveryAsset<'_>,
    params: &ScaledParams,
    supported: &[String],
) -> ParameterSet {
    let mut set = ParameterSet::default();
    set.push("path", asset.path);
    set.push("seoname", seo_name(asset.file_name));
    set.push(
        "format",
        negotiate_format(asset.file_name, params.enforce_extension.as_deref(), supported),
    );
    set.push("preferwebp", true);
    set
}

// ============================================================================
// Remote
// ============================================================================

/// Builder for the remote dynamic-media delivery endpoint.
///
/// URLs have the shape
/// `<repository base><delivery template>?<query>`, with the asset id, SEO
/// name and format substituted into the template.
#[derive(Debug, Clone)]
pub struct RemoteParameterBuilder {
    repository_base: String,
    path_template: String,
    supported_formats: Vec<String>,
}

impl RemoteParameterBuilder {
    pub fn new(repository_base: impl Into<String>, path_template: impl Into<String>) -> Self {
        Self {
            repository_base: repository_base.into(),
            path_template: path_template.into(),
            supported_formats: default_supported_formats(),
        }
    }

    fn crop_value(crop: &CropInstruction) -> String {
        match crop {
            CropInstruction::Rect(rect) => rect.to_absolute_string(),
            CropInstruction::SmartRatio(Dimension { width, height }) => {
                format!("{width}:{height},smart")
            }
        }
    }
}

impl DeliveryParameterBuilder for RemoteParameterBuilder {
    fn build(&self, asset: &DeliveryAsset<'_>, params: &ScaledParams) -> ParameterSet {
        let mut set = common_parameters(asset, params, &self.supported_formats);
        if let Some(width) = params.target_width {
            set.push("width", width);
        }
        if let Some(height) = params.target_height {
            set.push("height", height);
        }
        if let Some(crop) = &params.crop {
            set.push("crop", Self::crop_value(crop));
        }
        if let Some(rotation) = params.rotation {
            set.push("rotate", rotation);
        }
        if let Some(quality) = params.quality {
            set.push("quality", quality.value());
        }
        set
    }

    fn render_url(&self, _asset: &DeliveryAsset<'_>, parameters: &ParameterSet) -> String {
        let path = fill_template(
            &self.path_template,
            parameters.get("path").unwrap_or_default(),
            parameters.get("seoname").unwrap_or_default(),
            parameters.get("format").unwrap_or(FALLBACK_FORMAT),
        );
        let query = parameters.query_string(&["path", "seoname", "format"]);
        format!("{}{path}?{query}", self.repository_base)
    }
}

// ============================================================================
// Native
// ============================================================================

/// Builder for the repository's own delivery servlet.
///
/// URLs have the shape `<base_url><path>?<query>`. Crops are expressed
/// relative to the original (`6.5p,55.0p,52.5p,67.0p`) unless configured
/// otherwise; when the original's size is unknown the absolute form is used.
/// Smart-ratio crops have no native encoding and are left out.
#[derive(Debug, Clone)]
pub struct NativeParameterBuilder {
    base_url: String,
    supported_formats: Vec<String>,
    crop_encoding: CropEncoding,
}

impl NativeParameterBuilder {
    pub fn new(config: &DeliveryConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            supported_formats: config.supported_formats.clone(),
            crop_encoding: config.crop_encoding,
        }
    }

    fn crop_value(&self, crop: &CropInstruction, original: Dimension) -> Option<String> {
        match crop {
            CropInstruction::Rect(rect) => match self.crop_encoding {
                CropEncoding::Relative => relative_crop_string(rect, original)
                    .or_else(|| Some(rect.to_absolute_string())),
                CropEncoding::Absolute => Some(rect.to_absolute_string()),
            },
            CropInstruction::SmartRatio(ratio) => {
                debug!(?ratio, "smart-ratio crop not expressible natively");
                None
            }
        }
    }
}

impl DeliveryParameterBuilder for NativeParameterBuilder {
    fn build(&self, asset: &DeliveryAsset<'_>, params: &ScaledParams) -> ParameterSet {
        let mut set = common_parameters(asset, params, &self.supported_formats);
        if let Some(width) = params.target_width {
            set.push("width", width);
        }
        if let Some(c) = params
            .crop
            .as_ref()
            .and_then(|crop| self.crop_value(crop, params.original))
        {
            set.push("c", c);
        }
        if let Some(rotation) = params.rotation {
            set.push("r", rotation);
        }
        if let Some(quality) = params.quality {
            set.push("quality", quality.value());
        }
        set
    }

    fn render_url(&self, asset: &DeliveryAsset<'_>, parameters: &ParameterSet) -> String {
        let path = if asset.path.starts_with('/') {
            asset.path.to_string()
        } else {
            format!("/{}", asset.path)
        };
        let query = parameters.query_string(&["path"]);
        format!("{}{path}?{query}", self.base_url)
    }
}
