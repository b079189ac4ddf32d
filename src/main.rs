use clap::{Parser, Subcommand};
use rendition_resolver::config;
use rendition_resolver::delivery::{NativeAsset, NativeDelivery, RemoteDelivery};
use rendition_resolver::metadata;
use rendition_resolver::naming::{RemoteAssetRef, mime_for};
use rendition_resolver::output;
use rendition_resolver::rendition::FormatConstraints;
use rendition_resolver::types::{CropDimension, DeliveryRequest, Dimension};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// The rendition a caller asks for.
#[derive(clap::Args, Clone, Debug)]
struct RequestArgs {
    /// Target width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Target height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Target aspect ratio (width / height), e.g. 1.5
    #[arg(long)]
    ratio: Option<f64>,

    /// Manual crop rectangle: left,top,width,height
    #[arg(long)]
    crop: Option<CropDimension>,

    /// Let the endpoint pick the best smart crop for this ratio, e.g. 16:9
    #[arg(long)]
    smart_ratio: Option<Dimension>,

    /// Use the asset's smart crop with this name
    #[arg(long)]
    smart_crop: Option<String>,

    /// Rotation in degrees
    #[arg(long)]
    rotate: Option<i32>,

    /// Output quality percentage (1-100)
    #[arg(long)]
    quality: Option<u32>,

    /// Force the output format, e.g. png
    #[arg(long)]
    format: Option<String>,
}

impl From<RequestArgs> for DeliveryRequest {
    fn from(args: RequestArgs) -> Self {
        DeliveryRequest {
            width: args.width,
            height: args.height,
            aspect_ratio: args.ratio,
            crop_dimension: args.crop,
            crop_smart_ratio_dimension: args.smart_ratio,
            smart_crop_name: args.smart_crop,
            rotation_degrees: args.rotate,
            quality_percent: args.quality,
            enforce_output_extension: args.format,
        }
    }
}

/// Constraints of the format driving the request, used when the request
/// pins no dimensions.
#[derive(clap::Args, Clone, Debug)]
struct FormatArgs {
    /// Driving format's minimum width
    #[arg(long)]
    format_min_width: Option<u32>,

    /// Driving format's minimum height
    #[arg(long)]
    format_min_height: Option<u32>,

    /// Driving format's aspect ratio (width / height)
    #[arg(long)]
    format_ratio: Option<f64>,
}

impl FormatArgs {
    fn constraints(&self) -> Option<FormatConstraints> {
        let constraints = FormatConstraints {
            min_width: self.format_min_width,
            min_height: self.format_min_height,
            ratio: self.format_ratio,
        };
        (constraints != FormatConstraints::default()).then_some(constraints)
    }
}

#[derive(Parser)]
#[command(name = "rendition-resolver")]
#[command(about = "Resolve image rendition requests into delivery URLs")]
#[command(long_about = "\
Resolve image rendition requests into delivery URLs

References starting with /urn:aaid:aem: are remote assets: their metadata is
fetched from the configured repository and URLs point at its dynamic-media
endpoint. Anything else is a repository path, read from --root and delivered
through the native endpoint.

  rendition-resolver resolve '/urn:aaid:aem:42/Beach.jpg' --width 800 --ratio 1.5
  rendition-resolver resolve /content/dam/photo.jpg --width 640 --crop 10,10,400,300
  rendition-resolver fetch urn:aaid:aem:42

Outcomes:
  Scaled       a URL for a resized/cropped rendition
  Passthrough  the original binary (SVGs, videos, documents)
  No delivery  the request would upscale, or metadata is unavailable

Logging is controlled with RUST_LOG, e.g. RUST_LOG=rendition_resolver=debug.

Run 'rendition-resolver gen-config' to generate a documented rendition.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing rendition.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Directory repository paths are resolved against
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a request for one asset into a delivery URL
    Resolve {
        /// Remote reference or repository path
        reference: String,

        #[command(flatten)]
        request: RequestArgs,

        #[command(flatten)]
        format: FormatArgs,

        /// Read remote metadata from this JSON file instead of fetching it
        #[arg(long)]
        metadata: Option<PathBuf>,

        /// MIME type of a repository asset (guessed from the extension otherwise)
        #[arg(long)]
        mime: Option<String>,
    },
    /// Fetch and show the metadata of a remote asset
    Fetch {
        /// Asset id (urn:aaid:aem:...) or remote reference
        asset: String,
    },
    /// Print a stock rendition.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve {
            reference,
            request,
            format,
            metadata: metadata_file,
            mime,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            let constraints = format.constraints();
            let request = DeliveryRequest::from(request);

            match RemoteAssetRef::parse(&reference) {
                Some(asset) => {
                    let delivery = RemoteDelivery::from_config(&config)?;
                    let outcome = match metadata_file {
                        Some(path) => {
                            let parsed = metadata::parse_metadata(&std::fs::read(path)?)?;
                            Some(delivery.deliver_with_metadata(
                                &asset,
                                &parsed,
                                &request,
                                constraints.as_ref(),
                            ))
                        }
                        None => delivery.deliver(&reference, &request, constraints.as_ref()),
                    };
                    output::print_outcome(&reference, outcome.as_ref());
                }
                None => {
                    let delivery = NativeDelivery::from_config(&config, &cli.root);
                    let mime_type = mime.as_deref().unwrap_or_else(|| mime_for(&reference));
                    let asset = NativeAsset {
                        path: &reference,
                        mime_type,
                        original: None,
                        smart_crops: &[],
                    };
                    let outcome = delivery.deliver(&asset, &request, constraints.as_ref());
                    output::print_outcome(&reference, Some(&outcome));
                }
            }
        }
        Command::Fetch { asset } => {
            let config = config::load_config(&cli.config_dir)?;
            let asset_id = match RemoteAssetRef::parse(&asset) {
                Some(reference) => reference.asset_id,
                None => asset.trim_start_matches('/').to_string(),
            };
            let delivery = RemoteDelivery::from_config(&config)?;
            match delivery.metadata(&asset_id) {
                Some(found) => output::print_metadata(&asset_id, &found),
                None => {
                    return Err(format!(
                        "{asset_id}: metadata unavailable (set RUST_LOG=debug for details)"
                    )
                    .into());
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
