//! CLI error handling.
//!
//! Centralizes error formatting and exit codes: every failure prints a
//! single `Error: ...` line to stderr and exits with code 1.

use std::fmt;
use std::io;
use std::process;

use enfpack::edds::EddsError;
use enfpack::imageio::ImageIoError;
use enfpack::imageset::ImageSetError;
use enfpack::packer::PackError;

/// CLI-level errors.
#[derive(Debug)]
pub enum CliError {
    /// Invalid flag or configuration value.
    Config(String),
    /// Two inputs normalize to the same image name.
    NameCollision {
        name: String,
        first: String,
        second: String,
    },
    /// An output file exists and `--force` was not given.
    OutputExists(String),
    Pack(PackError),
    ImageSet(ImageSetError),
    ImageIo(ImageIoError),
    Edds(EddsError),
    /// Filesystem failure with the offending path.
    File { path: String, source: io::Error },
    /// Build configuration problems.
    Build(String),
}

impl CliError {
    /// Print the error and terminate with exit code 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {self}");
        process::exit(1)
    }

    pub fn file(path: &std::path::Path, source: io::Error) -> CliError {
        CliError::File {
            path: path.display().to_string(),
            source,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{msg}"),
            CliError::NameCollision { name, first, second } => write!(
                f,
                "duplicate image name {name:?} (paths: {first:?} and {second:?}); \
                 rename or enable a grouping separator/dirs"
            ),
            CliError::OutputExists(path) => {
                write!(f, "output file {path:?} already exists (use --force)")
            }
            CliError::Pack(err) => write!(f, "failed to pack images: {err}"),
            CliError::ImageSet(err) => write!(f, "{err}"),
            CliError::ImageIo(err) => write!(f, "{err}"),
            CliError::Edds(err) => write!(f, "{err}"),
            CliError::File { path, source } => write!(f, "{path}: {source}"),
            CliError::Build(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<PackError> for CliError {
    fn from(err: PackError) -> Self {
        CliError::Pack(err)
    }
}

impl From<ImageSetError> for CliError {
    fn from(err: ImageSetError) -> Self {
        CliError::ImageSet(err)
    }
}

impl From<ImageIoError> for CliError {
    fn from(err: ImageIoError) -> Self {
        CliError::ImageIo(err)
    }
}

impl From<EddsError> for CliError {
    fn from(err: EddsError) -> Self {
        CliError::Edds(err)
    }
}
