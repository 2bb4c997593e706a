//! Process exit codes for `duotone`.
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | success |
//! | 2    | argument error reported by clap |
//! | 10   | trait generation or rendering failed |
//! | 11   | a file could not be read or written |
//! | 12   | the palette, a color or the config was rejected |
//! | 13   | JSON output failed |

use duotone_core::ArtError;
use std::fmt;

/// Failure of a subcommand, carrying its exit code.
#[derive(Debug)]
pub enum CliError {
    /// Trait generation, layer rendering or compositing failed.
    Art(ArtError),
    /// Reading or writing a file failed.
    Io(String),
    /// A user-supplied palette, color or config was rejected.
    Input(String),
    /// JSON output failed.
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Art(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Art(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<ArtError> for CliError {
    fn from(e: ArtError) -> Self {
        match e {
            ArtError::Io(msg) => CliError::Io(msg),
            e @ (ArtError::InvalidPalette(_) | ArtError::InvalidColor(_)) => {
                CliError::Input(e.to_string())
            }
            other => CliError::Art(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
