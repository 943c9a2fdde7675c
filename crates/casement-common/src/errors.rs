use std::path::PathBuf;

use crate::registry::Handle;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("cannot write config to {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Caller-recoverable failures of the window tree API.
///
/// These never leave the tree in a modified state: the operation that
/// reports one has had no effect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("a root window already exists")]
    DuplicateRoot,

    #[error("unknown window: {0}")]
    UnknownWindow(Handle),

    #[error("window {0} is not a pair window")]
    NotPair(Handle),

    #[error("window {0} is already closing")]
    AlreadyClosed(Handle),

    #[error("pair windows cannot be opened directly")]
    PairNotAllowed,

    #[error("key window {key} is not inside pair {pair}")]
    KeyNotInPair { pair: Handle, key: Handle },

    #[error("invalid split method: {0:#x}")]
    InvalidMethod(u32),

    #[error("unknown window kind: {0}")]
    UnknownKind(u32),
}

/// Failures of a cross-thread task, converted to values before the
/// caller is released.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task loop is no longer running")]
    Disconnected,

    #[error("task was dropped before it ran")]
    Dropped,

    #[error("task panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CasementError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("event loop interrupted")]
    Interrupted,

    #[error("{0}")]
    Other(String),
}
