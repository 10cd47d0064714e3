//! Error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::template::TemplateError;

/// Errors raised while resolving configuration, before any scanning starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("unknown encoding label \"{0}\"")]
    UnknownEncoding(String),

    /// A centralized list template was given without anywhere to put the
    /// artifacts.
    #[error("a centralized list template requires a lists folder (-l)")]
    ListsTemplateWithoutFolder,

    #[error("invalid filter pattern \"{pattern}\": {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot scan directory \"{}\": {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("filter hook failed on \"{entry}\": {source}")]
    FilterHook {
        entry: String,
        #[source]
        source: HookError,
    },

    #[error("output hook failed on \"{entry}\": {source}")]
    OutputHook {
        entry: String,
        #[source]
        source: HookError,
    },
}

/// Errors returned by scan observers.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    FileOp(#[from] FileOpError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl HookError {
    /// Convenience constructor for ad-hoc observer failures.
    pub fn msg(message: impl Into<String>) -> Self {
        HookError::Message(message.into())
    }
}

/// Errors from the file-operations handle.
#[derive(Debug, Error)]
pub enum FileOpError {
    #[error("source \"{}\" does not exist", .0.display())]
    MissingSource(PathBuf),

    #[error("destination \"{}\" already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("cannot create directory \"{}\": {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Transfer(#[from] fs_extra::error::Error),
}
