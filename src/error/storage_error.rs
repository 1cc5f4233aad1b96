use std::io;

use thiserror::Error;

/// Errors raised by a [`ProfileStore`](crate::storage::ProfileStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the profile failed.
    #[error("cannot access profile {profile}: {source}")]
    Io {
        /// The profile name.
        profile: String,
        /// The underlying I/O error.
        #[source]
        source:  io::Error,
    },
    /// The profile has never been saved.
    #[error("profile {profile} does not exist")]
    Missing {
        /// The profile name.
        profile: String,
    },
    /// The profile contents could not be encoded or decoded.
    #[error("invalid profile contents: {0}")]
    Encoding(#[from] serde_json::Error),
}
