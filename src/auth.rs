//! Bearer tokens for the remote asset repository.
//!
//! Tokens come from an OAuth2 client-credentials exchange and are cached per
//! `(client id, scope)`. A cached token is retired [`EXPIRY_BUFFER`] before
//! the expiry the server declared, so a request never leaves with a token
//! that dies in flight.
//!
//! ## Failure semantics
//!
//! A failed exchange is logged and yields no token. Callers carry on
//! unauthenticated; nothing here returns an error to the engine's callers.
//!
//! ## Concurrency
//!
//! The cache lock is never held across the network call. Two threads that
//! miss on the same key at the same moment will both perform an exchange and
//! the later insert wins. That costs one redundant request and keeps the
//! cache free of per-key coordination.

use dashmap::DashMap;
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Safety margin subtracted from the server-declared lifetime.
pub const EXPIRY_BUFFER: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token endpoint {url} answered {status}")]
    Status { status: u16, url: String },
}

/// Successful token endpoint response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: u64,
}

/// Performs the client-credentials exchange.
pub trait TokenExchange: Send + Sync {
    fn exchange(
        &self,
        client_id: &str,
        client_secret: &str,
        scope: &str,
    ) -> Result<TokenResponse, TokenError>;
}

/// Client-credentials exchange against a real token endpoint.
pub struct HttpTokenExchange {
    client: reqwest::blocking::Client,
    token_url: String,
}

impl HttpTokenExchange {
    pub fn new(client: reqwest::blocking::Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
        }
    }
}

impl TokenExchange for HttpTokenExchange {
    fn exchange(
        &self,
        client_id: &str,
        client_secret: &str,
        scope: &str,
    ) -> Result<TokenResponse, TokenError> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("scope", scope),
            ])
            .send()?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(TokenError::Status {
                status: status.as_u16(),
                url: self.token_url.clone(),
            });
        }
        Ok(response.json()?)
    }
}

/// Source of monotonic time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A cached token and the instant it stops being handed out.
#[derive(Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: Instant,
}

impl AccessToken {
    /// Build from a server response received at `now`.
    ///
    /// Expiry is fixed here, once. Reads never extend it.
    pub fn issued(response: TokenResponse, now: Instant) -> Self {
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_BUFFER);
        Self {
            value: response.access_token,
            expires_at: now + lifetime,
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// Keep token values out of logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn cache_key(client_id: &str, scope: &str) -> String {
    format!("{client_id}::{scope}")
}

/// Token cache keyed by `client_id::scope`.
pub struct AccessTokenCache {
    exchange: Box<dyn TokenExchange>,
    clock: Box<dyn Clock>,
    tokens: DashMap<String, AccessToken>,
}

impl AccessTokenCache {
    pub fn new(exchange: impl TokenExchange + 'static) -> Self {
        Self::with_clock(exchange, SystemClock)
    }

    pub fn with_clock(exchange: impl TokenExchange + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            exchange: Box::new(exchange),
            clock: Box::new(clock),
            tokens: DashMap::new(),
        }
    }

    /// A valid bearer token for `(client_id, scope)`, or `None` if the
    /// exchange failed.
    pub fn get_access_token(
        &self,
        client_id: &str,
        client_secret: &str,
        scope: &str,
    ) -> Option<String> {
        let key = cache_key(client_id, scope);
        let now = self.clock.now();

        if let Some(token) = self.tokens.get(&key)
            && !token.is_expired_at(now)
        {
            debug!(key = %key, "access token cache hit");
            return Some(token.value.clone());
        }

        debug!(key = %key, "access token cache miss");
        match self.exchange.exchange(client_id, client_secret, scope) {
            Ok(response) => {
                let token = AccessToken::issued(response, self.clock.now());
                let value = token.value.clone();
                self.tokens.insert(key, token);
                Some(value)
            }
            Err(err) => {
                warn!(client_id = %client_id, scope = %scope, error = %err, "token exchange failed");
                None
            }
        }
    }

    /// Drop every cached token.
    pub fn clear(&self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
