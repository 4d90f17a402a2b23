use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AwsPsError>;

/// Every failure is fatal: callers report it and exit non-zero.
#[derive(Debug, Error)]
pub enum AwsPsError {
    #[error("could not determine home directory")]
    HomeDirUnavailable,

    #[error("failed to read AWS config {}: {reason}", path.display())]
    ConfigUnavailable { path: PathBuf, reason: String },

    #[error("malformed section [{section}] in AWS config: {reason}")]
    ConfigMalformed { section: String, reason: String },

    #[error("no profiles found in {}", path.display())]
    NoProfiles { path: PathBuf },

    #[error("profile selection cancelled")]
    SelectionCancelled,

    #[error("failed to run the profile selector")]
    Prompt(#[source] io::Error),

    #[error("failed to save selected profile to {}", path.display())]
    StatePersistFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AwsPsError {
    pub(crate) fn malformed(section: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigMalformed {
            section: section.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn persist(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::StatePersistFailed {
            path: path.into(),
            source,
        }
    }
}
