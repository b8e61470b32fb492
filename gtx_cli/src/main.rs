mod error;
mod extract;

use crate::error::Error;
use crate::extract::{ExtractOptions, extract};
use clap::{Parser, Subcommand};
use gtx::Gtx;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "gtx")]
#[command(about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// decode gtx textures into image files
    Extract {
        /// gtx file or a directory of gtx files
        #[arg(short, long, value_name = "FILE | DIRECTORY", value_hint = clap::ValueHint::AnyPath)]
        input: PathBuf,
        /// output image, or output directory when input is a directory
        #[arg(short, long, value_name = "FILE | DIRECTORY", value_hint = clap::ValueHint::AnyPath)]
        output: Option<PathBuf>,
        /// cut the tiling padding back to the declared size
        #[arg(short, long, action = clap::ArgAction::SetTrue)]
        crop: bool,
        /// extension of derived output names, selects the image encoder
        #[arg(short, long, value_name = "EXTENSION", default_value = "bmp")]
        extension: String,
    },
    /// print gtx surface information
    Info {
        /// gtx file path
        #[arg(short, long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,
    },
}

fn info_command(input: PathBuf) -> Result<(), Error> {
    let gtx = Gtx::open(&input)?;
    let header = gtx.header();
    let surface = gtx.surface();
    let (padded_width, padded_height) = surface.padded_size()?;

    println!("Version: {}.{}", header.major_version, header.minor_version);
    println!("Width: {} - Height: {}", surface.width, surface.height);
    println!(
        "Format: 0x{:x} ({}) - Supported: {}",
        surface.format.code(),
        surface.format,
        gtx::is_supported(surface.format.code())
    );
    println!(
        "Size: {} ({:x})",
        gtx.image_data().len(),
        gtx.image_data().len()
    );
    println!("Padded Width: {padded_width} - Padded Height: {padded_height}");
    println!(
        "Mips: {} - Tile Mode: {} - Swizzle: {:#x} - Pitch: {}",
        surface.mip_count, surface.tile_mode, surface.swizzle, surface.pitch
    );
    Ok(())
}

/// `info` unless `directives` (the value of `RUST_LOG`) say otherwise.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

fn main() -> Result<(), Error> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            output,
            crop,
            extension,
        } => extract(
            &input,
            output.as_deref(),
            &ExtractOptions { crop, extension },
        ),
        Commands::Info { input } => info_command(input),
    }
}
