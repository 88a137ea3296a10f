//! Operation-level error kinds
//!
//! Every user-facing operation fails with exactly one of these kinds and a
//! one-line message. Internal plumbing uses `anyhow` with context; the kinds
//! below are the conditions a command can surface to the terminal.
//! Recoverable conditions (a missing cache file, an absent TOPCOMMIT) are
//! mapped to empty state by the callers instead of becoming errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("no repository has been initialized here")]
    NotInitialized,

    #[error("a repository already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("invalid arguments: {0}")]
    BadArgs(String),

    #[error("path does not exist: {0}")]
    MissingPath(PathBuf),

    #[error("already staged: {0}")]
    DuplicateStage(String),

    #[error("there are no staged files")]
    EmptyIndex,

    #[error("not a valid object id: {0}")]
    BadDigestFormat(String),

    #[error("object not found in store: {0}")]
    UnknownObject(String),

    #[error("HEAD is empty; there is nothing checked out")]
    EmptyHead,

    #[error("HEAD is detached from the latest commit {0}; check it out before committing")]
    DetachedHead(String),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record: {0}")]
    Parse(String),

    #[error("could not compile {source_path}: {output}")]
    CompileFailed { source_path: PathBuf, output: String },

    #[error("could not link {executable}: {output}")]
    LinkFailed { executable: PathBuf, output: String },
}
