// file: src/logging/logger.rs
// version: 1.1.0
// guid: f27a94c8-5b0d-4e16-a3c9-61e84f0b2d57

//! Logger initialization and configuration

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::Result;

/// Initialize the logging system.
///
/// Diagnostics go to stderr; stdout is reserved for command output.
pub fn init_logger(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| crate::PntadmError::config(format!("Failed to initialize logger: {}", e)))?;

    Ok(())
}
