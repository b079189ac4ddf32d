//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Resolve
//!
//! ```text
//! /urn:aaid:aem:42/Beach Day.jpg
//!     Scaled: 100x50
//!     URL: https://delivery.example.com/adobe/dynamicmedia/deliver/urn:aaid:aem:42/beach-day.jpeg?preferwebp=true&width=100&height=50
//!     Parameters:
//!         seoname = beach-day
//!         format = jpeg
//!         ...
//! ```
//!
//! ## Fetch
//!
//! ```text
//! urn:aaid:aem:42
//!     MIME type: image/jpeg (raster)
//!     Original: 200x100
//!     File: Beach Day.jpg (482113 bytes)
//!     Smart crops:
//!         Square 50,0,100,100 (1.00)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::delivery::DeliveryOutcome;
use crate::metadata::AssetMetadata;
use crate::types::Dimension;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn dimension(d: Dimension) -> String {
    if d.is_known() {
        format!("{}x{}", d.width, d.height)
    } else {
        "unknown".to_string()
    }
}

// ============================================================================
// Resolve
// ============================================================================

/// Format a delivery outcome for one reference.
pub fn format_outcome(reference: &str, outcome: Option<&DeliveryOutcome>) -> Vec<String> {
    let mut lines = vec![reference.to_string()];
    let i1 = indent(1);
    let i2 = indent(2);

    match outcome {
        None => lines.push(format!("{i1}Not a remote asset reference")),
        Some(DeliveryOutcome::Passthrough { url }) => {
            lines.push(format!("{i1}Passthrough (original binary)"));
            lines.push(format!("{i1}URL: {url}"));
        }
        Some(DeliveryOutcome::Invalid { reason }) => {
            lines.push(format!("{i1}No delivery: {reason}"));
        }
        Some(DeliveryOutcome::Scaled {
            url,
            width,
            height,
            parameters,
        }) => {
            lines.push(format!("{i1}Scaled: {width}x{height}"));
            lines.push(format!("{i1}URL: {url}"));
            lines.push(format!("{i1}Parameters:"));
            for (key, value) in parameters.iter() {
                lines.push(format!("{i2}{key} = {value}"));
            }
        }
    }
    lines
}

pub fn print_outcome(reference: &str, outcome: Option<&DeliveryOutcome>) {
    for line in format_outcome(reference, outcome) {
        println!("{}", line);
    }
}

// ============================================================================
// Fetch
// ============================================================================

/// Format parsed metadata for an asset.
pub fn format_metadata(asset_id: &str, metadata: &AssetMetadata) -> Vec<String> {
    let mut lines = vec![asset_id.to_string()];
    let i1 = indent(1);
    let i2 = indent(2);

    lines.push(format!(
        "{i1}MIME type: {} ({})",
        metadata.mime_type(),
        format!("{:?}", metadata.kind).to_lowercase()
    ));
    lines.push(format!("{i1}Original: {}", dimension(metadata.original())));

    match (&metadata.file_name, metadata.file_size) {
        (Some(name), Some(size)) => lines.push(format!("{i1}File: {name} ({size} bytes)")),
        (Some(name), None) => lines.push(format!("{i1}File: {name}")),
        (None, Some(size)) => lines.push(format!("{i1}Size: {size} bytes")),
        (None, None) => {}
    }
    if let Some(status) = &metadata.asset_status {
        lines.push(format!("{i1}Status: {status}"));
    }

    if !metadata.smart_crops.is_empty() {
        lines.push(format!("{i1}Smart crops:"));
        for crop in &metadata.smart_crops {
            lines.push(format!(
                "{i2}{} {} ({:.2})",
                crop.name,
                crop.crop_dimension.to_absolute_string(),
                crop.ratio
            ));
        }
    }
    lines
}

pub fn print_metadata(asset_id: &str, metadata: &AssetMetadata) {
    for line in format_metadata(asset_id, metadata) {
        println!("{}", line);
    }
}
