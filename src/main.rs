// file: src/main.rs
// version: 1.1.0
// guid: 9e5a27d4-6b80-4f3c-81d9-a24c07e8f165

//! pntadm - DHCP network table administration entry point

use clap::Parser;
use pntadm::cli::{self, args::Cli, ReturnCode};
use pntadm::logging::logger;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_logger(cli.verbose, cli.quiet) {
        eprintln!("pntadm: {}", e);
        std::process::exit(ReturnCode::Critical.exit_code());
    }

    let code = cli::run(cli);
    std::process::exit(code.exit_code());
}
