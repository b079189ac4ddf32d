//! # Rendition Resolver
//!
//! Decides whether and how an image rendition can be delivered, and builds
//! the exact URL for the delivery endpoint that serves it.
//!
//! Given an abstract request (target size or aspect ratio, crop, rotation,
//! quality, forced format) and what is known about the source asset
//! (original size, MIME type, smart crops), the engine arrives at one of
//! three outcomes:
//!
//! ```text
//! Passthrough   serve the original binary (vectors, videos, documents)
//! Invalid       the request would upscale; no URL
//! Scaled        a parameterized URL for a resized/cropped rendition
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Value types shared by every stage (`Dimension`, `CropDimension`, `DeliveryRequest`) |
//! | [`naming`] | Remote asset references, SEO names, extensions |
//! | [`metadata`] | Remote metadata fetching and parsing |
//! | [`auth`] | OAuth2 client-credentials token cache |
//! | [`cache`] | TTL cache for fetched metadata |
//! | [`lock`] | Striped per-key locking |
//! | [`rendition`] | The resolver, parameter builders, and dimension probing |
//! | [`delivery`] | Remote and native facades tying the above together |
//! | [`config`] | `rendition.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Never Upscale
//!
//! A request larger than the original in either axis yields no URL at all,
//! not a clamped one. Callers can tell "no rendition" from "smaller
//! rendition" and pick a different source.
//!
//! ## Failures Degrade, They Don't Propagate
//!
//! Missing configuration, network failures, and malformed responses all end
//! in "unavailable" plus a log line. A broken token endpoint means
//! unauthenticated requests; a broken metadata endpoint means no scaled
//! delivery. Nothing in the delivery path returns `Err` to the caller.
//!
//! ## Blocking I/O
//!
//! Token exchange and metadata lookups use `reqwest`'s blocking client. Work
//! fans out over `rayon` for batches; there is no async runtime to manage.
//!
//! ## Caches Tolerate Duplicate Work
//!
//! The token and metadata caches never hold a lock across a network call.
//! Two concurrent misses on the same key both fetch, and the later result
//! wins. [`lock::StripedKeyLock`] exists for work that must not be
//! duplicated, such as reading a native file's dimensions.

pub mod auth;
pub mod cache;
pub mod config;
pub mod delivery;
pub mod lock;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod rendition;
pub mod types;
