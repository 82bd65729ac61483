// file: src/cli/args.rs
// version: 1.1.0
// guid: 5a07c3e8-2d96-4b41-80f5-6e19d2c8a7b4

//! Command line argument definitions

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pntadm")]
#[command(about = "Manage DHCP client records in per-network tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Datastore resource type (built-in: files)
    #[arg(short, long, global = true)]
    pub resource: Option<String>,

    /// Datastore location; table directory for the files resource
    #[arg(short, long, global = true)]
    pub path: Option<PathBuf>,

    /// Uninterpreted resource configuration string
    #[arg(short = 'u', long, global = true)]
    pub resource_config: Option<String>,

    /// Configuration file
    #[arg(short = 'c', long, global = true, env = "PNTADM_CONFIG")]
    pub config_file: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty DHCP network table
    CreateNetwork(NetworkOperand),

    /// Remove a DHCP network table and all of its entries
    RemoveNetwork(NetworkOperand),

    /// List the networks that have tables in the datastore
    ListNetworks,

    /// Add a client entry to a network table
    AddClient(AddClientArgs),

    /// Modify an existing client entry
    ModifyClient(ModifyClientArgs),

    /// Delete a client entry, optionally with its hosts-table entry
    DeleteClient(DeleteClientArgs),

    /// Print the client entries of a network table
    PrintNetwork(PrintNetworkArgs),
}

#[derive(Args)]
pub struct NetworkOperand {
    /// Network address or name; the configured default network when omitted
    pub network: Option<String>,
}

#[derive(Args)]
pub struct AddClientArgs {
    /// Client to add, by hostname or IP address
    pub client: String,

    /// Target network; the configured default network when omitted
    pub network: Option<String>,

    /// Client identifier, hex octets
    #[arg(short = 'i', long)]
    pub client_id: Option<String>,

    /// Entry flags: numeric, or keywords joined with '+'
    #[arg(short, long)]
    pub flags: Option<String>,

    /// Owning server address
    #[arg(short, long)]
    pub server: Option<Ipv4Addr>,

    /// Lease expiration: 0, forever, RFC 3339, or YYYY-MM-DD
    #[arg(short, long)]
    pub expire: Option<String>,

    /// Configuration macro name
    #[arg(short, long = "macro")]
    pub macro_name: Option<String>,

    /// Entry comment
    #[arg(long)]
    pub comment: Option<String>,

    /// Also create a hosts-table entry under this name
    #[arg(long)]
    pub hostname: Option<String>,
}

#[derive(Args)]
pub struct ModifyClientArgs {
    /// Client to modify, by hostname or IP address
    pub client: String,

    /// Target network; the configured default network when omitted
    pub network: Option<String>,

    /// Move the entry to a new client IP address
    #[arg(short = 'n', long)]
    pub new_ip: Option<Ipv4Addr>,

    /// Client identifier, hex octets
    #[arg(short = 'i', long)]
    pub client_id: Option<String>,

    /// Entry flags: numeric, or keywords joined with '+'
    #[arg(short, long)]
    pub flags: Option<String>,

    /// Owning server address
    #[arg(short, long)]
    pub server: Option<Ipv4Addr>,

    /// Lease expiration: 0, forever, RFC 3339, or YYYY-MM-DD
    #[arg(short, long)]
    pub expire: Option<String>,

    /// Configuration macro name
    #[arg(short, long = "macro")]
    pub macro_name: Option<String>,

    /// Entry comment
    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(Args)]
pub struct DeleteClientArgs {
    /// Client to delete, by hostname or IP address
    pub client: String,

    /// Target network; the configured default network when omitted
    pub network: Option<String>,

    /// Also remove the matching hosts-table entry
    #[arg(short = 'y', long)]
    pub delete_host: bool,
}

#[derive(Args)]
pub struct PrintNetworkArgs {
    /// Network to print; the configured default network when omitted
    pub network: Option<String>,

    /// Emit the table as JSON
    #[arg(long)]
    pub json: bool,
}
