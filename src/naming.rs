//! Asset references and SEO names.
//!
//! ## Remote references
//!
//! Remote assets are referenced as `/urn:aaid:aem:<uuid>/<file name>`. The
//! URN part is the asset id used in metadata and delivery paths; the file
//! name only feeds the SEO name and the default output format.
//!
//! ## SEO names
//!
//! Delivery URLs end in a human-readable name derived from the file name:
//! - `Café Crème.JPG` → `cafe-creme`
//! - `001_My  Museum!.png` → `001-my-museum`
//! - `写真.jpg` → `image` (nothing ASCII survives)

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Prefix every remote asset reference starts with.
pub const REMOTE_REFERENCE_PREFIX: &str = "/urn:aaid:aem:";

/// Used when sanitizing leaves nothing behind.
const FALLBACK_SEO_NAME: &str = "image";

/// A parsed `/urn:aaid:aem:<uuid>/<file name>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAssetRef {
    /// `urn:aaid:aem:<uuid>`, without the leading slash.
    pub asset_id: String,
    pub file_name: String,
}

impl RemoteAssetRef {
    /// Parse a remote reference. Returns `None` for anything else, including
    /// references missing either the id or the file name.
    pub fn parse(reference: &str) -> Option<Self> {
        let rest = reference.trim().strip_prefix('/')?;
        if !reference.trim().starts_with(REMOTE_REFERENCE_PREFIX) {
            return None;
        }
        let (asset_id, file_name) = rest.split_once('/')?;
        let urn_tail = asset_id.strip_prefix(&REMOTE_REFERENCE_PREFIX[1..])?;
        if urn_tail.is_empty() || file_name.is_empty() || file_name.contains('/') {
            return None;
        }
        Some(Self {
            asset_id: asset_id.to_string(),
            file_name: file_name.to_string(),
        })
    }

    pub fn is_remote(reference: &str) -> bool {
        reference.trim().starts_with(REMOTE_REFERENCE_PREFIX)
    }

    pub fn seo_name(&self) -> String {
        seo_name(&self.file_name)
    }

    pub fn extension(&self) -> Option<String> {
        extension_of(&self.file_name)
    }
}

/// Lowercased extension of a file name, if it has one.
pub fn extension_of(file_name: &str) -> Option<String> {
    let name = file_name.rsplit('/').next().unwrap_or(file_name);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// MIME type implied by a file name's extension.
///
/// Only needed where no repository metadata says otherwise.
pub fn mime_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("tif" | "tiff") => "image/tiff",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// File name without its extension (and without any directory part).
pub fn file_stem(file_name: &str) -> &str {
    let name = file_name.rsplit('/').next().unwrap_or(file_name);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// SEO-friendly name for a file.
///
/// - Drops the extension
/// - Decomposes accented characters and strips the combining marks
/// - Replaces every run of non-alphanumeric characters with one dash
/// - Lowercases, and strips leading and trailing dashes
pub fn seo_name(file_name: &str) -> String {
    let ascii: String = file_stem(file_name)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let mut collapsed = String::with_capacity(ascii.len());
    let mut prev_dash = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            collapsed.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            collapsed.push('-');
            prev_dash = true;
        }
    }

    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        FALLBACK_SEO_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // RemoteAssetRef tests
    // =========================================================================

    #[test]
    fn parses_remote_reference() {
        let r = RemoteAssetRef::parse("/urn:aaid:aem:9f4a-11/Summer Beach.jpg").unwrap();
        assert_eq!(r.asset_id, "urn:aaid:aem:9f4a-11");
        assert_eq!(r.file_name, "Summer Beach.jpg");
        assert_eq!(r.seo_name(), "summer-beach");
        assert_eq!(r.extension().as_deref(), Some("jpg"));
    }

    #[test]
    fn rejects_repository_paths() {
        assert!(RemoteAssetRef::parse("/content/dam/photo.jpg").is_none());
        assert!(!RemoteAssetRef::is_remote("/content/dam/photo.jpg"));
    }

    #[test]
    fn rejects_incomplete_references() {
        assert!(RemoteAssetRef::parse("/urn:aaid:aem:").is_none());
        assert!(RemoteAssetRef::parse("/urn:aaid:aem:/photo.jpg").is_none());
        assert!(RemoteAssetRef::parse("/urn:aaid:aem:abc").is_none());
        assert!(RemoteAssetRef::parse("/urn:aaid:aem:abc/").is_none());
        assert!(RemoteAssetRef::parse("/urn:aaid:aem:abc/a/b.jpg").is_none());
        assert!(RemoteAssetRef::parse("urn:aaid:aem:abc/photo.jpg").is_none());
    }

    // =========================================================================
    // extension / stem tests
    // =========================================================================

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of("photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("/content/dam/a.b/photo.Png").as_deref(), Some("png"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
    }

    #[test]
    fn no_extension() {
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".hidden"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn stem_strips_directory_and_extension() {
        assert_eq!(file_stem("/content/dam/photo.final.jpg"), "photo.final");
        assert_eq!(file_stem("photo"), "photo");
        assert_eq!(file_stem(".hidden"), ".hidden");
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for("/content/dam/a.JPG"), "image/jpeg");
        assert_eq!(mime_for("logo.svg"), "image/svg+xml");
        assert_eq!(mime_for("scan.bmp"), "image/bmp");
        assert_eq!(mime_for("README"), "application/octet-stream");
    }

    // =========================================================================
    // seo_name tests
    // =========================================================================

    #[test]
    fn seo_name_strips_diacritics() {
        assert_eq!(seo_name("Café Crème.JPG"), "cafe-creme");
        assert_eq!(seo_name("Ångström-Übung.png"), "angstrom-ubung");
    }

    #[test]
    fn seo_name_collapses_runs() {
        assert_eq!(seo_name("001_My  Museum!.png"), "001-my-museum");
        assert_eq!(seo_name("--a--b--.jpg"), "a-b");
    }

    #[test]
    fn seo_name_falls_back_when_nothing_survives() {
        assert_eq!(seo_name("写真.jpg"), "image");
        assert_eq!(seo_name("!!!.png"), "image");
    }

    #[test]
    fn seo_name_keeps_inner_dots_as_dashes() {
        assert_eq!(seo_name("photo.final.jpg"), "photo-final");
    }
}
