// file: src/error.rs
// version: 2.1.0
// guid: 6b42e8d9-1f5a-4c07-9e38-d5a20c71b4f6

//! Error taxonomy for the administration tool.
//!
//! Datastore failures form a closed set of kinds ([`TableError`]) so the
//! command layer maps each kind to a result code by pattern matching. The
//! distinguishable kinds are plain values carrying a message key plus
//! formatting arguments; [`crate::messages`] turns them into text.

use std::fmt;

use thiserror::Error;

use crate::messages;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, PntadmError>;

/// Crate-level error for failures outside the datastore taxonomy
#[derive(Error, Debug)]
pub enum PntadmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Table(#[from] TableError),
}

impl PntadmError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Failure kinds signalled by the datastore and the network manager.
///
/// The set is closed: callers match on it instead of downcasting.
#[derive(Error, Debug)]
pub enum TableError {
    /// The targeted client entry does not exist
    #[error("{0}")]
    NoEntry(NoEntryError),

    /// The object being created already exists
    #[error("{0}")]
    Exists(ExistsError),

    /// No table exists for the named network
    #[error("{0}")]
    NoTable(NoTableError),

    /// A table line that does not parse as a client record
    #[error("malformed client record: {0}")]
    BadRecord(String),

    #[error("datastore IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// "Object already exists" failure state: a message key plus the formatting
/// arguments for it. Built by the datastore layer when a create or add
/// collides with an existing object; the command layer only renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistsError {
    key: &'static str,
    args: Vec<String>,
}

impl ExistsError {
    const KEY: &'static str = "object_exists";

    /// Build from the name of the object that already exists.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            key: Self::KEY,
            args: vec![name.into()],
        }
    }

    /// Build from a pre-assembled argument list. `code` is a caller-native
    /// status value; it is accepted and ignored. Kept so call sites that
    /// already hold `(status, args)` pairs do not have to unpack them.
    pub fn from_raw_args(_code: i32, args: Vec<String>) -> Self {
        Self { key: Self::KEY, args }
    }

    /// Message key for catalog lookup
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Formatting arguments, in positional order
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for ExistsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&messages::render(self.key, &self.args))
    }
}

/// "No such entry" failure state for a client identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoEntryError {
    key: &'static str,
    args: Vec<String>,
}

impl NoEntryError {
    /// Build from the client identifier that failed to match an entry.
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            key: "no_such_entry",
            args: vec![client.into()],
        }
    }

    /// Message key for catalog lookup
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Formatting arguments, in positional order
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for NoEntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&messages::render(self.key, &self.args))
    }
}

/// "No table for network" failure state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoTableError {
    key: &'static str,
    args: Vec<String>,
}

impl NoTableError {
    /// Build from the network name that has no table.
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            key: "no_such_table",
            args: vec![network.into()],
        }
    }

    /// Message key for catalog lookup
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Formatting arguments, in positional order
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for NoTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&messages::render(self.key, &self.args))
    }
}
