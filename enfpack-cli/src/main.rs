//! enfpack CLI - pack, unpack and convert Enfusion imageset atlases.
//!
//! The binary is a thin wrapper over the `enfpack` library:
//! - `Cli` / `Commands`: argument parsing (clap)
//! - `commands::*`: one module per subcommand
//! - `CliError`: centralized error formatting and exit codes
//!
//! Exit codes: 0 on success and `--help`, 1 on any error.

mod cache;
mod commands;
mod error;

use clap::{Parser, Subcommand};

use error::CliError;

#[derive(Parser)]
#[command(name = "enfpack")]
#[command(version = enfpack::VERSION)]
#[command(about = "Enfusion imageset/EDDS texture atlas packer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack images into an .imageset + .edds atlas
    Pack(commands::pack::PackArgs),

    /// Unpack an .imageset + .edds pair into images
    Unpack(commands::unpack::UnpackArgs),

    /// Convert a single image file between formats
    Convert(commands::convert::ConvertArgs),

    /// Build projects from .enfpack.yaml
    Build(commands::build::BuildArgs),

    /// Print build metadata
    Version,
}

fn main() {
    enfpack::logging::init();

    let cli = Cli::parse();
    let result: Result<(), CliError> = match cli.command {
        Commands::Pack(args) => commands::pack::run(&args),
        Commands::Unpack(args) => commands::unpack::run(&args),
        Commands::Convert(args) => commands::convert::run(&args),
        Commands::Build(args) => commands::build::run(&args),
        Commands::Version => {
            println!("enfpack {}", enfpack::VERSION);
            Ok(())
        }
    };

    if let Err(err) = result {
        err.exit();
    }
}
