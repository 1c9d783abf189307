use std::path::PathBuf;

use thiserror::Error;
use warp::reject;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Represents a locale code outside the supported set.
    #[error("unknown locale: {code}")]
    UnknownLocale { code: String },

    /// Represents a missing English message table. English is the
    /// fallback reference and must always be present.
    #[error("missing reference message table for English")]
    MissingReferenceMessages,

    /// Represents a message file that could not be read.
    #[error("could not read message table at {path}")]
    UnreadableMessages {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Represents a message file that could not be parsed.
    #[error("malformed message table for locale {locale}")]
    MalformedMessages {
        locale: &'static str,
        source: serde_json::Error,
    },
}

/// Enumerates errors returned by the attribution store subsystem.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Represents a failure to read the persistent slot.
    #[error("could not read attribution record")]
    ReadFailed { source: std::io::Error },

    /// Represents a failure to write the persistent slot.
    #[error("could not write attribution record")]
    WriteFailed { source: std::io::Error },

    /// Represents a stored blob that no longer parses as a record.
    #[error("malformed attribution record")]
    MalformedRecord { source: serde_json::Error },
}

impl reject::Reject for BackendError {}

impl reject::Reject for StoreError {}
