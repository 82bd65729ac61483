// file: src/cli/mod.rs
// version: 1.2.0
// guid: 2c91e5d7-0b48-4f3a-96e2-d74a8f15c0b3

//! Command line interface: argument definitions, subcommand
//! implementations, and the closed set of result codes.

pub mod args;
pub mod commands;

use tracing::debug;

use crate::config::ConfigLoader;
use crate::table::NetworkManager;

/// Terminal status of one subcommand invocation, used as the process exit
/// status. The set is closed; every command path ends in exactly one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    /// The operation completed as requested
    Success = 0,
    /// The targeted object does not exist
    NotFound = 1,
    /// The operation failed, or completed with a recorded deviation
    Warning = 2,
    /// The invocation could not start: bad input or configuration
    Critical = 3,
}

impl ReturnCode {
    /// The numeric process exit status
    pub fn exit_code(self) -> i32 {
        self as i32
    }
}

/// Load configuration, build the manager, and run the selected subcommand.
pub fn run(cli: args::Cli) -> ReturnCode {
    let loader = ConfigLoader::new();
    let mut config = match loader.load(cli.config_file.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pntadm: {}", e);
            return ReturnCode::Critical;
        }
    };
    config.apply_overrides(
        cli.resource.as_deref(),
        cli.path.as_deref(),
        cli.resource_config.as_deref(),
    );
    debug!(
        "datastore resource={} path={}",
        config.datastore.resource,
        config.datastore.path.display()
    );

    let manager = match NetworkManager::from_config(&config) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("pntadm: {}", e);
            return ReturnCode::Critical;
        }
    };

    match &cli.command {
        args::Commands::CreateNetwork(a) => commands::create_network(a, &config, &manager),
        args::Commands::RemoveNetwork(a) => commands::remove_network(a, &config, &manager),
        args::Commands::ListNetworks => commands::list_networks(&manager),
        args::Commands::AddClient(a) => commands::add_client(a, &config, &manager),
        args::Commands::ModifyClient(a) => commands::modify_client(a, &config, &manager),
        args::Commands::DeleteClient(a) => commands::delete_client(a, &config, &manager),
        args::Commands::PrintNetwork(a) => {
            commands::print_network(a, cli.verbose, &config, &manager)
        }
    }
}
