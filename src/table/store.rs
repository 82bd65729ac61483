// file: src/table/store.rs
// version: 1.2.0
// guid: 7a5f90e3-4d28-4c6b-b1f7-8c03e6a2d594

//! Datastore access for per-network tables.
//!
//! [`TableStore`] is the seam in front of the persistent layer; the `files`
//! resource ships in-tree as [`FilesTableStore`], one ASCII table file per
//! network. Rewrites go through a temp file in the table directory followed
//! by a rename.

use std::fs;
use std::io::Write;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::network::{address_from_table_name, Network};
use super::ClientEntry;
use crate::error::{ExistsError, NoEntryError, NoTableError, TableError};

/// Operations a datastore resource must provide.
///
/// Every failure is one of the closed [`TableError`] kinds.
pub trait TableStore {
    /// Create an empty table for a network
    fn create_table(&self, network: &Network) -> Result<(), TableError>;

    /// Remove a network's table and all of its entries
    fn remove_table(&self, network: &Network) -> Result<(), TableError>;

    /// Network addresses that have tables, in ascending order
    fn list_tables(&self) -> Result<Vec<Ipv4Addr>, TableError>;

    /// All entries of a network's table
    fn list_entries(&self, network: &Network) -> Result<Vec<ClientEntry>, TableError>;

    /// Add an entry; the client address must not already be present
    fn add_entry(&self, network: &Network, entry: &ClientEntry) -> Result<(), TableError>;

    /// Replace the entry keyed by `client_ip` with `entry`
    fn modify_entry(
        &self,
        network: &Network,
        client_ip: Ipv4Addr,
        entry: &ClientEntry,
    ) -> Result<(), TableError>;

    /// Delete the entry keyed by `client_ip`, returning it
    fn delete_entry(&self, network: &Network, client_ip: Ipv4Addr)
        -> Result<ClientEntry, TableError>;
}

/// File-backed datastore: one table file per network under a directory.
pub struct FilesTableStore {
    dir: PathBuf,
}

impl FilesTableStore {
    /// Create a store over the given table directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The table directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn table_path(&self, network: &Network) -> PathBuf {
        self.dir.join(network.table_name())
    }

    fn load(&self, network: &Network) -> Result<Vec<ClientEntry>, TableError> {
        let path = self.table_path(network);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TableError::NoTable(NoTableError::new(network.to_string())))
            }
            Err(e) => return Err(TableError::Io(e)),
        };

        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::parse)
            .collect()
    }

    fn write_entries(
        &self,
        network: &Network,
        entries: &[ClientEntry],
    ) -> Result<(), TableError> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        write_header(&mut tmp, network)?;
        for entry in entries {
            writeln!(tmp, "{}", entry)?;
        }
        tmp.persist(self.table_path(network)).map_err(|e| TableError::Io(e.error))?;
        Ok(())
    }
}

fn write_header(out: &mut impl Write, network: &Network) -> std::io::Result<()> {
    writeln!(out, "# DHCP network table for {}", network)?;
    writeln!(out, "# client_id|flags|client_ip|server_ip|expire|macro|comment")
}

impl TableStore for FilesTableStore {
    fn create_table(&self, network: &Network) -> Result<(), TableError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.table_path(network);
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(TableError::Exists(ExistsError::new(format!(
                    "network table for {}",
                    network
                ))))
            }
            Err(e) => return Err(TableError::Io(e)),
        };
        write_header(&mut file, network)?;
        debug!("created table {}", path.display());
        Ok(())
    }

    fn remove_table(&self, network: &Network) -> Result<(), TableError> {
        let path = self.table_path(network);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("removed table {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TableError::NoTable(NoTableError::new(network.to_string())))
            }
            Err(e) => Err(TableError::Io(e)),
        }
    }

    fn list_tables(&self) -> Result<Vec<Ipv4Addr>, TableError> {
        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(TableError::Io(e)),
        };

        let mut networks = Vec::new();
        for entry in dir {
            let entry = entry?;
            if let Some(addr) = entry.file_name().to_str().and_then(address_from_table_name) {
                networks.push(addr);
            }
        }
        networks.sort();
        Ok(networks)
    }

    fn list_entries(&self, network: &Network) -> Result<Vec<ClientEntry>, TableError> {
        self.load(network)
    }

    fn add_entry(&self, network: &Network, entry: &ClientEntry) -> Result<(), TableError> {
        let mut entries = self.load(network)?;
        if entries.iter().any(|e| e.client_ip == entry.client_ip) {
            return Err(TableError::Exists(ExistsError::new(entry.client_ip.to_string())));
        }
        entries.push(entry.clone());
        self.write_entries(network, &entries)
    }

    fn modify_entry(
        &self,
        network: &Network,
        client_ip: Ipv4Addr,
        entry: &ClientEntry,
    ) -> Result<(), TableError> {
        let mut entries = self.load(network)?;
        let index = entries
            .iter()
            .position(|e| e.client_ip == client_ip)
            .ok_or_else(|| TableError::NoEntry(NoEntryError::new(client_ip.to_string())))?;

        if entry.client_ip != client_ip && entries.iter().any(|e| e.client_ip == entry.client_ip)
        {
            return Err(TableError::Exists(ExistsError::new(entry.client_ip.to_string())));
        }

        entries[index] = entry.clone();
        self.write_entries(network, &entries)
    }

    fn delete_entry(
        &self,
        network: &Network,
        client_ip: Ipv4Addr,
    ) -> Result<ClientEntry, TableError> {
        let mut entries = self.load(network)?;
        let index = entries
            .iter()
            .position(|e| e.client_ip == client_ip)
            .ok_or_else(|| TableError::NoEntry(NoEntryError::new(client_ip.to_string())))?;

        let removed = entries.remove(index);
        self.write_entries(network, &entries)?;
        debug!("deleted {} from {}", removed.client_ip, network);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_network() -> Network {
        Network::new("10.0.0.0".parse().unwrap(), "255.255.255.0".parse().unwrap())
    }

    fn entry(ip: &str) -> ClientEntry {
        ClientEntry::new(ip.parse().unwrap(), "10.0.0.1".parse().unwrap())
    }

    #[test]
    fn test_create_then_create_again_is_exists() {
        let dir = TempDir::new().unwrap();
        let store = FilesTableStore::new(dir.path());
        let net = test_network();

        store.create_table(&net).unwrap();
        match store.create_table(&net) {
            Err(TableError::Exists(e)) => {
                assert_eq!(e.to_string(), "network table for 10.0.0.0 already exists")
            }
            other => panic!("expected Exists, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_add_list_delete_cycle() {
        let dir = TempDir::new().unwrap();
        let store = FilesTableStore::new(dir.path());
        let net = test_network();
        store.create_table(&net).unwrap();

        store.add_entry(&net, &entry("10.0.0.5")).unwrap();
        store.add_entry(&net, &entry("10.0.0.6")).unwrap();
        assert!(matches!(
            store.add_entry(&net, &entry("10.0.0.5")),
            Err(TableError::Exists(_))
        ));

        let entries = store.list_entries(&net).unwrap();
        assert_eq!(entries.len(), 2);

        let removed = store.delete_entry(&net, "10.0.0.5".parse().unwrap()).unwrap();
        assert_eq!(removed.client_ip, "10.0.0.5".parse::<Ipv4Addr>().unwrap());
        assert_eq!(store.list_entries(&net).unwrap().len(), 1);

        assert!(matches!(
            store.delete_entry(&net, "10.0.0.5".parse().unwrap()),
            Err(TableError::NoEntry(_))
        ));
    }

    #[test]
    fn test_modify_guards_target_collisions() {
        let dir = TempDir::new().unwrap();
        let store = FilesTableStore::new(dir.path());
        let net = test_network();
        store.create_table(&net).unwrap();
        store.add_entry(&net, &entry("10.0.0.5")).unwrap();
        store.add_entry(&net, &entry("10.0.0.6")).unwrap();

        let mut moved = entry("10.0.0.6");
        assert!(matches!(
            store.modify_entry(&net, "10.0.0.5".parse().unwrap(), &moved),
            Err(TableError::Exists(_))
        ));

        moved.client_ip = "10.0.0.7".parse().unwrap();
        store.modify_entry(&net, "10.0.0.5".parse().unwrap(), &moved).unwrap();
        let entries = store.list_entries(&net).unwrap();
        assert!(entries.iter().any(|e| e.client_ip == moved.client_ip));
        assert!(!entries.iter().any(|e| e.client_ip.to_string() == "10.0.0.5"));
    }

    #[test]
    fn test_missing_table_is_no_table() {
        let dir = TempDir::new().unwrap();
        let store = FilesTableStore::new(dir.path());
        assert!(matches!(
            store.list_entries(&test_network()),
            Err(TableError::NoTable(_))
        ));
        assert!(matches!(
            store.remove_table(&test_network()),
            Err(TableError::NoTable(_))
        ));
    }

    #[test]
    fn test_list_tables_ignores_foreign_files() {
        let dir = TempDir::new().unwrap();
        let store = FilesTableStore::new(dir.path());
        let net = test_network();
        store.create_table(&net).unwrap();
        fs::write(dir.path().join("README"), "not a table\n").unwrap();

        assert_eq!(store.list_tables().unwrap(), vec![net.address()]);
    }

    #[test]
    fn test_comments_and_blank_lines_tolerated() {
        let dir = TempDir::new().unwrap();
        let store = FilesTableStore::new(dir.path());
        let net = test_network();
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(
            dir.path().join(net.table_name()),
            "# hand-written header\n\n00|00|10.0.0.9|10.0.0.1|0||\n",
        )
        .unwrap();

        let entries = store.list_entries(&net).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].client_ip, "10.0.0.9".parse::<Ipv4Addr>().unwrap());
    }
}
