//! The `convert` subcommand: single-file format conversion.

use std::path::Path;

use clap::Args;

use enfpack::imageio;

use crate::error::CliError;

/// Convert one image between supported formats
/// (png, tga, tiff, bmp, dds, edds).
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input file: png, tga, tiff, bmp, dds, edds
    #[arg(value_name = "input")]
    pub input: String,

    /// Output file: png, tga, tiff, bmp, dds, edds
    #[arg(value_name = "output")]
    pub output: String,

    /// Color key as RRGGBB -> alpha=0 (optional)
    #[arg(long = "alpha-key")]
    pub alpha_key: Option<String>,

    /// Disable color key processing
    #[arg(long = "alpha-key-off")]
    pub alpha_key_off: bool,
}

/// Run the convert command.
pub fn run(args: &ConvertArgs) -> Result<(), CliError> {
    let mut img = imageio::read(Path::new(&args.input))?;

    if !args.alpha_key_off {
        if let Some(key) = args.alpha_key.as_deref().filter(|k| !k.is_empty()) {
            let rgb = imageio::parse_hex_rgb(key)?;
            img = imageio::apply_color_key(img, rgb);
        }
    }

    let output = Path::new(&args.output);
    if output.extension().is_none() {
        return Err(CliError::Config(format!(
            "output has no extension: {:?}",
            args.output
        )));
    }

    imageio::write(output, &img)?;
    Ok(())
}
