//! Authenticated metadata lookups against the remote repository.
//!
//! Outcomes and how they are reported:
//!
//! | Response | Result | Log level |
//! |---|---|---|
//! | 200 with a MIME type | metadata | none |
//! | 404 | unavailable (not computed yet) | trace |
//! | 200 without a MIME type | unavailable | warn |
//! | any other status | unavailable | warn |
//! | transport or JSON failure | unavailable | warn, with URL |
//! | missing configuration | unavailable | debug |

use super::{AssetMetadata, MetadataError, parse_metadata};
use crate::auth::AccessTokenCache;
use crate::config::{ASSET_ID_PLACEHOLDER, AuthConfig, RemoteConfig};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Full metadata URL for an asset, or `None` when the repository or the
/// path template is not configured.
pub fn metadata_url(config: &RemoteConfig, asset_id: &str) -> Option<String> {
    let base = config.repository_base()?;
    let template = config
        .metadata_path_template
        .as_deref()
        .filter(|t| !t.trim().is_empty())?;
    Some(format!(
        "{base}{}",
        template.replace(ASSET_ID_PLACEHOLDER, asset_id)
    ))
}

pub struct MetadataFetcher {
    client: reqwest::blocking::Client,
    config: RemoteConfig,
    tokens: Option<Arc<AccessTokenCache>>,
}

impl MetadataFetcher {
    /// A fetcher using `client`.
    ///
    /// `tokens` is consulted only when `config.auth` is set.
    pub fn new(
        client: reqwest::blocking::Client,
        config: RemoteConfig,
        tokens: Option<Arc<AccessTokenCache>>,
    ) -> Self {
        Self {
            client,
            config,
            tokens,
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Metadata for `asset_id`, or `None` if it is unavailable for any reason.
    pub fn fetch_metadata(&self, asset_id: &str) -> Option<AssetMetadata> {
        match self.try_fetch(asset_id) {
            Ok(metadata) => Some(metadata),
            Err(MetadataError::NotConfigured) => {
                debug!(asset_id = %asset_id, "remote metadata lookup not configured");
                None
            }
            Err(MetadataError::NotFound(url)) => {
                trace!(url = %url, "asset metadata not available yet");
                None
            }
            Err(err @ (MetadataError::UnexpectedStatus { .. } | MetadataError::Invalid(_))) => {
                warn!(asset_id = %asset_id, error = %err, "unexpected metadata response");
                None
            }
            Err(err) => {
                let url = metadata_url(&self.config, asset_id).unwrap_or_default();
                warn!(url = %url, error = %err, "metadata request failed");
                None
            }
        }
    }

    /// Like [`fetch_metadata`](Self::fetch_metadata) but keeps the reason.
    pub fn try_fetch(&self, asset_id: &str) -> Result<AssetMetadata, MetadataError> {
        let url = metadata_url(&self.config, asset_id).ok_or(MetadataError::NotConfigured)?;

        let mut request = self.client.get(&url);
        for (name, value) in &self.config.headers {
            request = request.header(name, value);
        }
        if let Some(token) = self.bearer_token() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send()?;
        match response.status() {
            StatusCode::OK => {
                let body = response.bytes()?;
                let metadata = parse_metadata(&body)?;
                if !metadata.is_valid() {
                    return Err(MetadataError::Invalid(url));
                }
                Ok(metadata)
            }
            StatusCode::NOT_FOUND => Err(MetadataError::NotFound(url)),
            status => Err(MetadataError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            }),
        }
    }

    /// A bearer token when auth is configured and the exchange succeeds.
    ///
    /// A failed exchange falls through to an unauthenticated request.
    fn bearer_token(&self) -> Option<String> {
        let AuthConfig {
            client_id,
            client_secret,
            scope,
            ..
        } = self.config.auth.as_ref()?;
        self.tokens
            .as_ref()?
            .get_access_token(client_id, client_secret, scope)
    }
}
