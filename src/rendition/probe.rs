//! Original dimensions for repository-native assets.
//!
//! Remote assets report their size in metadata. Native assets are files,
//! so their size is read from the image header (no full decode). Results
//! are memoized per path; concurrent lookups for the same path are
//! serialized on a [`StripedKeyLock`] stripe so each file is read once.

use crate::lock::StripedKeyLock;
use crate::types::Dimension;
use dashmap::DashMap;
use image::ImageReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read dimensions of {path}: {message}")]
    Decode { path: String, message: String },
}

/// Reads the original dimensions of an image file.
pub trait DimensionProbe: Sync {
    fn dimensions(&self, path: &Path) -> Result<Dimension, ProbeError>;
}

/// Header-only probe backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageProbe;

impl DimensionProbe for ImageProbe {
    fn dimensions(&self, path: &Path) -> Result<Dimension, ProbeError> {
        let decode_error = |e: image::ImageError| ProbeError::Decode {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(decode_error)?;
        Ok(Dimension::new(width, height))
    }
}

/// Memoizing wrapper around another probe.
///
/// Failures are not memoized: a file that appears later is probed again.
pub struct MemoizedProbe<P> {
    inner: P,
    locks: StripedKeyLock,
    known: DashMap<PathBuf, Dimension>,
}

impl<P: DimensionProbe> MemoizedProbe<P> {
    pub fn new(inner: P, locks: StripedKeyLock) -> Self {
        Self {
            inner,
            locks,
            known: DashMap::new(),
        }
    }

    /// Dimensions of `path`, or unknown (0x0) when it cannot be read.
    pub fn original(&self, path: &Path) -> Dimension {
        match self.dimensions(path) {
            Ok(dimension) => dimension,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read original dimensions");
                Dimension::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

impl<P: DimensionProbe> DimensionProbe for MemoizedProbe<P> {
    fn dimensions(&self, path: &Path) -> Result<Dimension, ProbeError> {
        if let Some(hit) = self.known.get(path) {
            return Ok(*hit);
        }
        self.locks.with_lock(path, || {
            if let Some(hit) = self.known.get(path) {
                return Ok(*hit);
            }
            let dimension = self.inner.dimensions(path)?;
            debug!(path = %path.display(), ?dimension, "probed original");
            self.known.insert(path.to_path_buf(), dimension);
            Ok(dimension)
        })
    }
}
