// file: src/table/manager.rs
// version: 1.3.0
// guid: b6d09f24-3a71-4e58-9c16-f02d84c7e5a9

//! Network manager: name resolution and the delegated table operations.
//!
//! The manager owns the datastore built from the active descriptor and the
//! hosts-table coupling. Commands hand it a client record and a network
//! string and get back either success or one of the closed failure kinds.

use std::net::Ipv4Addr;

use tracing::{debug, warn};

use super::network::Network;
use super::store::{FilesTableStore, TableStore};
use super::{ClientEntry, ClientId, ClientRecord, Flags, LeaseExpiration};
use crate::config::DhcpConfig;
use crate::error::{ExistsError, NoEntryError, NoTableError, TableError};
use crate::hosts::HostsFile;
use crate::messages;

/// Field changes to apply to an existing client entry
#[derive(Debug, Default, Clone)]
pub struct ClientUpdate {
    pub client_id: Option<ClientId>,
    pub flags: Option<Flags>,
    pub server_ip: Option<Ipv4Addr>,
    pub expiration: Option<LeaseExpiration>,
    pub macro_name: Option<String>,
    pub comment: Option<String>,
    /// Move the entry to a new client address
    pub new_ip: Option<Ipv4Addr>,
}

impl ClientUpdate {
    /// Whether no change was requested
    pub fn is_empty(&self) -> bool {
        self.client_id.is_none()
            && self.flags.is_none()
            && self.server_ip.is_none()
            && self.expiration.is_none()
            && self.macro_name.is_none()
            && self.comment.is_none()
            && self.new_ip.is_none()
    }
}

/// Resolves network names and performs the delegated operations
pub struct NetworkManager<'a, S: TableStore> {
    config: &'a DhcpConfig,
    store: S,
    hosts: Option<HostsFile>,
}

impl<'a> NetworkManager<'a, FilesTableStore> {
    /// Build a manager for the configured datastore descriptor
    pub fn from_config(config: &'a DhcpConfig) -> crate::Result<Self> {
        let store = match config.datastore.resource.as_str() {
            "files" => FilesTableStore::new(&config.datastore.path),
            other => {
                return Err(crate::PntadmError::config(messages::render(
                    "unsupported_resource",
                    &[other],
                )))
            }
        };
        let hosts = config
            .hosts_managed()
            .then(|| HostsFile::new(&config.hosts.path));
        Ok(Self::with_store(config, store, hosts))
    }
}

impl<'a, S: TableStore> NetworkManager<'a, S> {
    /// Build a manager over an explicit store and hosts editor
    pub fn with_store(config: &'a DhcpConfig, store: S, hosts: Option<HostsFile>) -> Self {
        Self {
            config,
            store,
            hosts,
        }
    }

    /// Resolve a network name: a literal address (canonicalized through the
    /// netmasks tables) or a configured alias. `None` when neither matches.
    pub fn lookup_network(&self, name: &str) -> Option<Network> {
        if let Ok(addr) = name.parse::<Ipv4Addr>() {
            return Some(Network::new(addr, self.config.netmask_for(addr)));
        }
        let alias = self.config.networks.get(name)?;
        let addr = alias.parse().ok()?;
        Some(Network::new(addr, self.config.netmask_for(addr)))
    }

    fn network_for(&self, name: &str) -> Result<Network, TableError> {
        self.lookup_network(name)
            .ok_or_else(|| TableError::NoTable(NoTableError::new(name)))
    }

    /// Resolve a client record to its address: a literal address, or a
    /// managed-hosts lookup for a hostname identifier.
    pub fn resolve_client(&self, record: &ClientRecord) -> Result<Ipv4Addr, TableError> {
        if let Some(ip) = record.ip() {
            return Ok(ip);
        }
        if let Some(hosts) = &self.hosts {
            if let Some(ip) = hosts.lookup_by_name(record.identifier())? {
                return Ok(ip);
            }
        }
        Err(TableError::NoEntry(NoEntryError::new(record.identifier())))
    }

    /// Delete a client entry, optionally removing its hosts-table entry.
    ///
    /// The sole mutating pass for the delete subcommand; never retried.
    pub fn delete_client(
        &self,
        record: &ClientRecord,
        network: &str,
        delete_host: bool,
    ) -> Result<(), TableError> {
        let network = self.network_for(network)?;
        let addr = self.resolve_client(record)?;
        let removed = self.store.delete_entry(&network, addr)?;

        if delete_host {
            if let Some(hosts) = &self.hosts {
                if !hosts.remove_by_addr(removed.client_ip)? {
                    warn!("no hosts entry for {}", removed.client_ip);
                }
            }
        }
        Ok(())
    }

    /// Add a client entry, optionally creating a hosts-table entry for it
    pub fn add_client(
        &self,
        entry: &ClientEntry,
        network: &str,
        hostname: Option<&str>,
    ) -> Result<(), TableError> {
        let network = self.network_for(network)?;
        if !network.contains(entry.client_ip) {
            return Err(TableError::BadRecord(messages::render(
                "bad_client_address",
                &[entry.client_ip.to_string(), network.to_string()],
            )));
        }

        if let (Some(name), Some(hosts)) = (hostname, &self.hosts) {
            if hosts.lookup_by_name(name)?.is_some() {
                return Err(TableError::Exists(ExistsError::new(name)));
            }
        }

        self.store.add_entry(&network, entry)?;

        if let (Some(name), Some(hosts)) = (hostname, &self.hosts) {
            hosts.add(entry.client_ip, name)?;
        }
        debug!("added {} to {}", entry.client_ip, network);
        Ok(())
    }

    /// Apply field changes to an existing client entry
    pub fn modify_client(
        &self,
        record: &ClientRecord,
        network: &str,
        update: &ClientUpdate,
    ) -> Result<(), TableError> {
        let network = self.network_for(network)?;
        let addr = self.resolve_client(record)?;

        let entries = self.store.list_entries(&network)?;
        let current = entries
            .iter()
            .find(|e| e.client_ip == addr)
            .ok_or_else(|| TableError::NoEntry(NoEntryError::new(record.identifier())))?;

        let mut updated = current.clone();
        if let Some(client_id) = &update.client_id {
            updated.client_id = client_id.clone();
        }
        if let Some(flags) = update.flags {
            updated.flags = flags;
        }
        if let Some(server_ip) = update.server_ip {
            updated.server_ip = server_ip;
        }
        if let Some(expiration) = update.expiration {
            updated.expiration = expiration;
        }
        if let Some(macro_name) = &update.macro_name {
            updated.macro_name = Some(macro_name.clone());
        }
        if let Some(comment) = &update.comment {
            updated.comment = Some(comment.clone());
        }
        if let Some(new_ip) = update.new_ip {
            if !network.contains(new_ip) {
                return Err(TableError::BadRecord(messages::render(
                    "bad_client_address",
                    &[new_ip.to_string(), network.to_string()],
                )));
            }
            updated.client_ip = new_ip;
        }

        self.store.modify_entry(&network, addr, &updated)
    }

    /// All entries of a network's table
    pub fn list_clients(&self, network: &str) -> Result<Vec<ClientEntry>, TableError> {
        let network = self.network_for(network)?;
        self.store.list_entries(&network)
    }

    /// Create an empty table for a network
    pub fn create_network(&self, network: &str) -> Result<(), TableError> {
        let network = self.network_for(network)?;
        self.store.create_table(&network)
    }

    /// Remove a network's table and all of its entries
    pub fn remove_network(&self, network: &str) -> Result<(), TableError> {
        let network = self.network_for(network)?;
        self.store.remove_table(&network)
    }

    /// Networks that have tables in the datastore
    pub fn list_networks(&self) -> Result<Vec<Network>, TableError> {
        Ok(self
            .store
            .list_tables()?
            .into_iter()
            .map(|addr| Network::new(addr, self.config.netmask_for(addr)))
            .collect())
    }
}
