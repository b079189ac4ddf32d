//! Rendition decisions and their encoding as delivery parameters.
//!
//! ## Architecture
//!
//! ```text
//! DeliveryRequest + SourceAsset
//!         │
//!         ▼
//!   resolver ──► Resolution::{BinaryPassthrough, Invalid, Scaled(ScaledParams)}
//!                                                         │
//!                                                         ▼
//!                                      builder ──► ParameterSet ──► URL
//! ```
//!
//! ## Modules
//!
//! - **`calculations`**: Pure math (ratio-derived heights, relative crop
//!   strings, the upscale guard)
//! - **`smart_crop`**: Normalized smart crops resolved against an original
//! - **`params`**: Data types passed from resolver to builder
//! - **`resolver`**: The decision procedure
//! - **`builder`**: Remote and native parameter encodings
//! - **`probe`**: Original dimensions of native files, memoized

pub mod builder;
pub mod calculations;
pub mod params;
pub mod probe;
pub mod resolver;
pub mod smart_crop;

pub use builder::{
    DeliveryAsset, DeliveryParameterBuilder, NativeParameterBuilder, ParameterSet,
    RemoteParameterBuilder, negotiate_format,
};
pub use calculations::{derive_height, relative_crop_string, requires_upscale};
pub use params::{CropInstruction, Quality, QualityPolicy, RequestedQuality, ScaledParams};
pub use probe::{DimensionProbe, ImageProbe, MemoizedProbe, ProbeError};
pub use resolver::{FormatConstraints, InvalidReason, RenditionResolver, Resolution, SourceAsset};
pub use smart_crop::{NamedSmartCrop, ResolvedSmartCrop};
