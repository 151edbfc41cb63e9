//! I/O error taxonomy for the command-line surface

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the caller. Malformed playlist records are never an
/// error; they degrade silently inside the pure conversion paths.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The input source could not be read; conversion never starts.
    #[error("cannot read input {}: {}", .path.display(), .source)]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output sink rejected the fully computed document. The document
    /// itself was already assembled in memory and is simply not persisted.
    #[error("cannot write output {}: {}", .path.display(), .source)]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
