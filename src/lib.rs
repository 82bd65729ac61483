// file: src/lib.rs
// version: 1.2.0
// guid: 3f8c1a47-9d2e-4b61-8a05-c7e94d2b6f10

//! # pntadm
//!
//! DHCP network table administration. Client records live in per-network
//! tables held by a pluggable datastore (the `files` datastore ships
//! in-tree), and may be mirrored into the system hosts table when that table
//! is locally managed.
//!
//! Every subcommand runs synchronously on the invoking thread, performs at
//! most one delegated mutating call, and terminates in one of a closed set
//! of result codes.

pub mod cli;
pub mod config;
pub mod error;
pub mod hosts;
pub mod logging;
pub mod messages;
pub mod table;

pub use error::{PntadmError, Result, TableError};

/// Version information for the tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
