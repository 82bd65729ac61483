// file: src/cli/commands.rs
// version: 1.5.0
// guid: d380b9a6-7e52-4c14-a90d-3f68e1b72c05

//! Subcommand implementations.
//!
//! Each command performs at most one delegated mutating call and maps the
//! closed set of failure kinds to a [`ReturnCode`]. Failure paths print one
//! rendered line to stderr; stdout carries data only.

use tracing::debug;

use super::args::{
    AddClientArgs, DeleteClientArgs, ModifyClientArgs, NetworkOperand, PrintNetworkArgs,
};
use super::ReturnCode;
use crate::config::DhcpConfig;
use crate::error::TableError;
use crate::messages;
use crate::table::{
    ClientEntry, ClientRecord, ClientUpdate, Network, NetworkManager, TableStore,
};

/// Resolve the target network from the operand or the configured default.
///
/// Failure is terminal: the rendered message is printed and the warning
/// result returned, before any mutation is attempted.
fn resolve_target<S: TableStore>(
    operand: Option<&str>,
    config: &DhcpConfig,
    manager: &NetworkManager<'_, S>,
) -> Result<Network, ReturnCode> {
    let name = match operand.or(config.default_network.as_deref()) {
        Some(name) => name,
        None => {
            eprintln!("pntadm: {}", messages::text("network_not_named"));
            return Err(ReturnCode::Warning);
        }
    };
    match manager.lookup_network(name) {
        Some(network) => Ok(network),
        None => {
            eprintln!("pntadm: {}", messages::render("network_unresolved", &[name]));
            Err(ReturnCode::Warning)
        }
    }
}

/// Delete one client entry, optionally with its hosts-table entry.
pub fn delete_client<S: TableStore>(
    args: &DeleteClientArgs,
    config: &DhcpConfig,
    manager: &NetworkManager<'_, S>,
) -> ReturnCode {
    // Requested host deletion is downgraded, not refused, when hosts are
    // not managed; the deviation is recorded in the result code.
    let mut delete_host = args.delete_host;
    let mut downgraded = false;
    if delete_host && !config.hosts_managed() {
        eprintln!("pntadm: {}", messages::text("hosts_not_managed"));
        delete_host = false;
        downgraded = true;
    }

    let network = match resolve_target(args.network.as_deref(), config, manager) {
        Ok(network) => network,
        Err(code) => return code,
    };

    let record = ClientRecord::new(&args.client);
    debug!("deleting {} from {}", record.identifier(), network);

    match manager.delete_client(&record, &network.to_string(), delete_host) {
        Ok(()) if downgraded => ReturnCode::Warning,
        Ok(()) => ReturnCode::Success,
        Err(TableError::NoEntry(e)) => {
            eprintln!("pntadm: {}", e);
            ReturnCode::NotFound
        }
        Err(e) => {
            eprintln!("pntadm: {}", e);
            ReturnCode::Warning
        }
    }
}

/// Add one client entry, optionally with a hosts-table entry.
pub fn add_client<S: TableStore>(
    args: &AddClientArgs,
    config: &DhcpConfig,
    manager: &NetworkManager<'_, S>,
) -> ReturnCode {
    let mut hostname = args.hostname.as_deref();
    let mut downgraded = false;
    if hostname.is_some() && !config.hosts_managed() {
        eprintln!("pntadm: {}", messages::text("hosts_not_managed"));
        hostname = None;
        downgraded = true;
    }

    let network = match resolve_target(args.network.as_deref(), config, manager) {
        Ok(network) => network,
        Err(code) => return code,
    };

    let record = ClientRecord::new(&args.client);
    let client_ip = match manager.resolve_client(&record) {
        Ok(ip) => ip,
        Err(e) => {
            eprintln!("pntadm: {}", e);
            return ReturnCode::Warning;
        }
    };

    let mut entry = ClientEntry::new(client_ip, args.server.unwrap_or_else(|| config.server_address()));
    if let Some(client_id) = &args.client_id {
        entry.client_id = match client_id.parse() {
            Ok(id) => id,
            Err(e) => return invalid_option(e),
        };
    }
    if let Some(flags) = &args.flags {
        entry.flags = match flags.parse() {
            Ok(flags) => flags,
            Err(e) => return invalid_option(e),
        };
    }
    if let Some(expire) = &args.expire {
        entry.expiration = match expire.parse() {
            Ok(expiration) => expiration,
            Err(e) => return invalid_option(e),
        };
    }
    entry.macro_name = args.macro_name.clone();
    entry.comment = args.comment.clone();

    debug!("adding {} to {}", entry.client_ip, network);
    match manager.add_client(&entry, &network.to_string(), hostname) {
        Ok(()) if downgraded => ReturnCode::Warning,
        Ok(()) => ReturnCode::Success,
        Err(e) => {
            eprintln!("pntadm: {}", e);
            ReturnCode::Warning
        }
    }
}

/// Modify an existing client entry in place.
pub fn modify_client<S: TableStore>(
    args: &ModifyClientArgs,
    config: &DhcpConfig,
    manager: &NetworkManager<'_, S>,
) -> ReturnCode {
    let mut update = ClientUpdate {
        server_ip: args.server,
        new_ip: args.new_ip,
        macro_name: args.macro_name.clone(),
        comment: args.comment.clone(),
        ..ClientUpdate::default()
    };
    if let Some(client_id) = &args.client_id {
        update.client_id = match client_id.parse() {
            Ok(id) => Some(id),
            Err(e) => return invalid_option(e),
        };
    }
    if let Some(flags) = &args.flags {
        update.flags = match flags.parse() {
            Ok(flags) => Some(flags),
            Err(e) => return invalid_option(e),
        };
    }
    if let Some(expire) = &args.expire {
        update.expiration = match expire.parse() {
            Ok(expiration) => Some(expiration),
            Err(e) => return invalid_option(e),
        };
    }
    if update.is_empty() {
        eprintln!("pntadm: {}", messages::text("nothing_to_modify"));
        return ReturnCode::Critical;
    }

    let network = match resolve_target(args.network.as_deref(), config, manager) {
        Ok(network) => network,
        Err(code) => return code,
    };

    let record = ClientRecord::new(&args.client);
    debug!("modifying {} on {}", record.identifier(), network);

    match manager.modify_client(&record, &network.to_string(), &update) {
        Ok(()) => ReturnCode::Success,
        Err(TableError::NoEntry(e)) => {
            eprintln!("pntadm: {}", e);
            ReturnCode::NotFound
        }
        Err(e) => {
            eprintln!("pntadm: {}", e);
            ReturnCode::Warning
        }
    }
}

/// Create an empty table for a network.
pub fn create_network<S: TableStore>(
    args: &NetworkOperand,
    config: &DhcpConfig,
    manager: &NetworkManager<'_, S>,
) -> ReturnCode {
    let network = match resolve_target(args.network.as_deref(), config, manager) {
        Ok(network) => network,
        Err(code) => return code,
    };

    match manager.create_network(&network.to_string()) {
        Ok(()) => ReturnCode::Success,
        Err(e) => {
            eprintln!("pntadm: {}", e);
            ReturnCode::Warning
        }
    }
}

/// Remove a network's table and all of its entries.
pub fn remove_network<S: TableStore>(
    args: &NetworkOperand,
    config: &DhcpConfig,
    manager: &NetworkManager<'_, S>,
) -> ReturnCode {
    let network = match resolve_target(args.network.as_deref(), config, manager) {
        Ok(network) => network,
        Err(code) => return code,
    };

    match manager.remove_network(&network.to_string()) {
        Ok(()) => ReturnCode::Success,
        Err(TableError::NoTable(e)) => {
            eprintln!("pntadm: {}", e);
            ReturnCode::NotFound
        }
        Err(e) => {
            eprintln!("pntadm: {}", e);
            ReturnCode::Warning
        }
    }
}

/// Print the networks that have tables in the datastore.
pub fn list_networks<S: TableStore>(manager: &NetworkManager<'_, S>) -> ReturnCode {
    match manager.list_networks() {
        Ok(networks) => {
            for network in networks {
                println!("{}", network);
            }
            ReturnCode::Success
        }
        Err(e) => {
            eprintln!("pntadm: {}", e);
            ReturnCode::Warning
        }
    }
}

/// Print the client entries of a network table.
pub fn print_network<S: TableStore>(
    args: &PrintNetworkArgs,
    verbose: bool,
    config: &DhcpConfig,
    manager: &NetworkManager<'_, S>,
) -> ReturnCode {
    let network = match resolve_target(args.network.as_deref(), config, manager) {
        Ok(network) => network,
        Err(code) => return code,
    };

    let entries = match manager.list_clients(&network.to_string()) {
        Ok(entries) => entries,
        Err(TableError::NoTable(e)) => {
            eprintln!("pntadm: {}", e);
            return ReturnCode::NotFound;
        }
        Err(e) => {
            eprintln!("pntadm: {}", e);
            return ReturnCode::Warning;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&entries) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("pntadm: {}", e);
                return ReturnCode::Warning;
            }
        }
    } else {
        print_table(&entries, verbose);
    }
    ReturnCode::Success
}

fn print_table(entries: &[ClientEntry], verbose: bool) {
    println!(
        "{:<20} {:<18} {:<16} {:<16} {:<20} {:<12} {}",
        "Client ID", "Flags", "Client IP", "Server IP", "Expires", "Macro", "Comment"
    );
    for entry in entries {
        let flags = if verbose {
            entry.flags.keywords()
        } else {
            entry.flags.to_string()
        };
        let expires = if verbose {
            entry.expiration.describe()
        } else {
            entry.expiration.as_secs().to_string()
        };
        println!(
            "{:<20} {:<18} {:<16} {:<16} {:<20} {:<12} {}",
            entry.client_id,
            flags,
            entry.client_ip,
            entry.server_ip,
            expires,
            entry.macro_name.as_deref().unwrap_or("-"),
            entry.comment.as_deref().unwrap_or("")
        );
    }
}

fn invalid_option(e: crate::PntadmError) -> ReturnCode {
    eprintln!("pntadm: {}", e);
    ReturnCode::Critical
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::net::Ipv4Addr;
    use std::rc::Rc;

    use crate::config::HostsResource;
    use crate::error::{NoEntryError, TableError};

    type CallLog = Rc<RefCell<Vec<String>>>;

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    enum DeleteBehavior {
        Succeed,
        NoEntry,
        Fail,
    }

    struct RecordingStore {
        calls: CallLog,
        delete: DeleteBehavior,
    }

    impl RecordingStore {
        fn new(delete: DeleteBehavior) -> (Self, CallLog) {
            let calls = CallLog::default();
            (
                Self {
                    calls: Rc::clone(&calls),
                    delete,
                },
                calls,
            )
        }

        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl TableStore for RecordingStore {
        fn create_table(&self, network: &Network) -> Result<(), TableError> {
            self.record(format!("create_table {}", network));
            Ok(())
        }

        fn remove_table(&self, network: &Network) -> Result<(), TableError> {
            self.record(format!("remove_table {}", network));
            Ok(())
        }

        fn list_tables(&self) -> Result<Vec<Ipv4Addr>, TableError> {
            Ok(Vec::new())
        }

        fn list_entries(&self, _network: &Network) -> Result<Vec<ClientEntry>, TableError> {
            Ok(Vec::new())
        }

        fn add_entry(&self, network: &Network, entry: &ClientEntry) -> Result<(), TableError> {
            self.record(format!("add_entry {} {}", network, entry.client_ip));
            Ok(())
        }

        fn modify_entry(
            &self,
            network: &Network,
            client_ip: Ipv4Addr,
            _entry: &ClientEntry,
        ) -> Result<(), TableError> {
            self.record(format!("modify_entry {} {}", network, client_ip));
            Ok(())
        }

        fn delete_entry(
            &self,
            network: &Network,
            client_ip: Ipv4Addr,
        ) -> Result<ClientEntry, TableError> {
            self.record(format!("delete_entry {} {}", network, client_ip));
            match self.delete {
                DeleteBehavior::Succeed => Ok(ClientEntry::new(client_ip, Ipv4Addr::LOCALHOST)),
                DeleteBehavior::NoEntry => {
                    Err(TableError::NoEntry(NoEntryError::new(client_ip.to_string())))
                }
                DeleteBehavior::Fail => Err(TableError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "datastore offline",
                ))),
            }
        }
    }

    fn test_config(hosts_managed: bool) -> DhcpConfig {
        let mut config = DhcpConfig::default();
        config
            .netmasks
            .insert("10.0.0.0".to_string(), "255.255.255.0".to_string());
        if !hosts_managed {
            config.hosts.resource = HostsResource::Dns;
        }
        config
    }

    fn delete_args(client: &str, network: Option<&str>, delete_host: bool) -> DeleteClientArgs {
        DeleteClientArgs {
            client: client.to_string(),
            network: network.map(str::to_string),
            delete_host,
        }
    }

    fn add_args(client: &str, network: Option<&str>) -> AddClientArgs {
        AddClientArgs {
            client: client.to_string(),
            network: network.map(str::to_string),
            client_id: None,
            flags: None,
            server: None,
            expire: None,
            macro_name: None,
            comment: None,
            hostname: None,
        }
    }

    #[test]
    fn test_delete_without_host_flag_makes_exactly_one_delegated_call() {
        let config = test_config(true);
        let (store, calls) = RecordingStore::new(DeleteBehavior::Succeed);
        let manager = NetworkManager::with_store(&config, store, None);

        let code = delete_client(
            &delete_args("10.0.0.5", Some("10.0.0.0"), false),
            &config,
            &manager,
        );

        assert_eq!(code, ReturnCode::Success);
        assert_eq!(*calls.borrow(), vec!["delete_entry 10.0.0.0 10.0.0.5".to_string()]);
    }

    #[test]
    fn test_delete_host_downgrades_to_warning_when_hosts_unmanaged() {
        let config = test_config(false);
        let (store, calls) = RecordingStore::new(DeleteBehavior::Succeed);
        let manager = NetworkManager::with_store(&config, store, None);

        let code = delete_client(
            &delete_args("10.0.0.5", Some("10.0.0.0"), true),
            &config,
            &manager,
        );

        // Delete succeeded, but the downgrade is still a recorded deviation.
        assert_eq!(code, ReturnCode::Warning);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_unresolved_network_warns_without_delegated_calls() {
        let config = test_config(true);
        let (store, calls) = RecordingStore::new(DeleteBehavior::Succeed);
        let manager = NetworkManager::with_store(&config, store, None);

        let code = delete_client(
            &delete_args("10.0.0.5", Some("no-such-net"), false),
            &config,
            &manager,
        );

        assert_eq!(code, ReturnCode::Warning);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_network_and_default_warns_without_delegated_calls() {
        let config = test_config(true);
        let (store, calls) = RecordingStore::new(DeleteBehavior::Succeed);
        let manager = NetworkManager::with_store(&config, store, None);

        let code = delete_client(&delete_args("10.0.0.5", None, false), &config, &manager);

        assert_eq!(code, ReturnCode::Warning);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_default_network_fallback_is_used() {
        let mut config = test_config(true);
        config.default_network = Some("10.0.0.0".to_string());
        let (store, calls) = RecordingStore::new(DeleteBehavior::Succeed);
        let manager = NetworkManager::with_store(&config, store, None);

        let code = delete_client(&delete_args("10.0.0.5", None, false), &config, &manager);

        assert_eq!(code, ReturnCode::Success);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_delete_maps_no_entry_to_not_found() {
        let config = test_config(true);
        let (store, _calls) = RecordingStore::new(DeleteBehavior::NoEntry);
        let manager = NetworkManager::with_store(&config, store, None);

        let code = delete_client(
            &delete_args("10.0.0.5", Some("10.0.0.0"), false),
            &config,
            &manager,
        );

        assert_eq!(code, ReturnCode::NotFound);
    }

    #[test]
    fn test_delete_maps_other_failures_to_warning() {
        let config = test_config(true);
        let (store, _calls) = RecordingStore::new(DeleteBehavior::Fail);
        let manager = NetworkManager::with_store(&config, store, None);

        let code = delete_client(
            &delete_args("10.0.0.5", Some("10.0.0.0"), false),
            &config,
            &manager,
        );

        assert_eq!(code, ReturnCode::Warning);
    }

    #[test]
    fn test_add_hostname_downgrades_to_warning_when_hosts_unmanaged() {
        let config = test_config(false);
        let (store, calls) = RecordingStore::new(DeleteBehavior::Succeed);
        let manager = NetworkManager::with_store(&config, store, None);

        let mut args = add_args("10.0.0.5", Some("10.0.0.0"));
        args.hostname = Some("build".to_string());

        let code = add_client(&args, &config, &manager);
        assert_eq!(code, ReturnCode::Warning);
        assert_eq!(*calls.borrow(), vec!["add_entry 10.0.0.0 10.0.0.5".to_string()]);
    }

    #[test]
    fn test_add_with_bad_flags_is_critical() {
        let config = test_config(true);
        let (store, calls) = RecordingStore::new(DeleteBehavior::Succeed);
        let manager = NetworkManager::with_store(&config, store, None);

        let mut args = add_args("10.0.0.5", Some("10.0.0.0"));
        args.flags = Some("STICKY".to_string());

        let code = add_client(&args, &config, &manager);
        assert_eq!(code, ReturnCode::Critical);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_modify_with_no_options_is_critical() {
        let config = test_config(true);
        let (store, calls) = RecordingStore::new(DeleteBehavior::Succeed);
        let manager = NetworkManager::with_store(&config, store, None);

        let args = ModifyClientArgs {
            client: "10.0.0.5".to_string(),
            network: Some("10.0.0.0".to_string()),
            new_ip: None,
            client_id: None,
            flags: None,
            server: None,
            expire: None,
            macro_name: None,
            comment: None,
        };

        let code = modify_client(&args, &config, &manager);
        assert_eq!(code, ReturnCode::Critical);
        assert!(calls.borrow().is_empty());
    }
}
