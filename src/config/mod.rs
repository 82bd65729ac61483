// file: src/config/mod.rs
// version: 1.3.0
// guid: c5e17d92-8a4b-4f60-93d8-0b6f2ae51c73

//! Configuration for the administration tool.
//!
//! Holds the datastore descriptor (which backing store to target), the hosts
//! table settings, and the name/netmask lookup tables used when resolving a
//! network operand.

pub mod loader;

pub use loader::ConfigLoader;

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::table::network::{is_valid_netmask, Network};
use crate::Result;

/// Datastore descriptor: identifies which backing store to target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Datastore {
    /// Resource type (built-in: `files`)
    pub resource: String,
    /// Resource location; the table directory for the `files` resource
    pub path: PathBuf,
    /// Uninterpreted resource configuration string, passed through to the store
    pub resource_config: Option<String>,
}

impl Default for Datastore {
    fn default() -> Self {
        Self {
            resource: "files".to_string(),
            path: PathBuf::from("/var/dhcp"),
            resource_config: None,
        }
    }
}

/// Which resource manages hosts-table entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HostsResource {
    /// Local hosts file, editable by this tool
    #[serde(rename = "files")]
    #[default]
    Files,
    /// Name service holds hosts entries; not locally editable
    #[serde(rename = "dns")]
    Dns,
    /// No hosts-table mirroring at all
    #[serde(rename = "none")]
    None,
}

impl HostsResource {
    /// Get the resource as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            HostsResource::Files => "files",
            HostsResource::Dns => "dns",
            HostsResource::None => "none",
        }
    }
}

/// Hosts table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostsConfig {
    /// Resource that owns the hosts table
    pub resource: HostsResource,
    /// Hosts file location, used only by the `files` resource
    pub path: PathBuf,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            resource: HostsResource::Files,
            path: PathBuf::from("/etc/inet/hosts"),
        }
    }
}

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DhcpConfig {
    /// Active datastore descriptor
    pub datastore: Datastore,
    /// Ambient target network, used when a subcommand omits its network operand
    pub default_network: Option<String>,
    /// Owning server address recorded in new client entries
    pub server: Option<Ipv4Addr>,
    /// Hosts table settings
    pub hosts: HostsConfig,
    /// Network address → dotted netmask, consulted before the classful fallback
    pub netmasks: HashMap<String, String>,
    /// Network name aliases → network address
    pub networks: HashMap<String, String>,
}

impl Default for DhcpConfig {
    fn default() -> Self {
        Self {
            datastore: Datastore::default(),
            default_network: None,
            server: None,
            hosts: HostsConfig::default(),
            netmasks: HashMap::new(),
            networks: HashMap::new(),
        }
    }
}

impl DhcpConfig {
    /// Whether hosts-table entries can be edited under this configuration
    pub fn hosts_managed(&self) -> bool {
        self.hosts.resource == HostsResource::Files
    }

    /// Owning server address for new entries
    pub fn server_address(&self) -> Ipv4Addr {
        self.server.unwrap_or(Ipv4Addr::LOCALHOST)
    }

    /// Netmask for an address: the `netmasks` table keyed by the classful
    /// network number, falling back to the classful mask itself.
    pub fn netmask_for(&self, addr: Ipv4Addr) -> Ipv4Addr {
        let classful = Network::classful_mask(addr);
        let classful_net = Ipv4Addr::from(u32::from(addr) & u32::from(classful));
        if let Some(mask) = self.netmasks.get(&classful_net.to_string()) {
            if let Ok(mask) = mask.parse() {
                return mask;
            }
        }
        classful
    }

    /// Apply command-line overrides to the datastore descriptor
    pub fn apply_overrides(
        &mut self,
        resource: Option<&str>,
        path: Option<&std::path::Path>,
        resource_config: Option<&str>,
    ) {
        if let Some(resource) = resource {
            self.datastore.resource = resource.to_string();
        }
        if let Some(path) = path {
            self.datastore.path = path.to_path_buf();
        }
        if let Some(config) = resource_config {
            self.datastore.resource_config = Some(config.to_string());
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.datastore.resource.is_empty() {
            return Err(crate::PntadmError::validation(
                "datastore resource cannot be empty".to_string(),
            ));
        }

        for (net, mask) in &self.netmasks {
            net.parse::<Ipv4Addr>().map_err(|_| {
                crate::PntadmError::validation(format!("netmasks key is not an address: {}", net))
            })?;
            let mask: Ipv4Addr = mask.parse().map_err(|_| {
                crate::PntadmError::validation(format!(
                    "netmask for {} is not an address: {}",
                    net, mask
                ))
            })?;
            if !is_valid_netmask(mask) {
                return Err(crate::PntadmError::validation(format!(
                    "netmask for {} is not contiguous: {}",
                    net, mask
                )));
            }
        }

        for (name, addr) in &self.networks {
            if name.is_empty() {
                return Err(crate::PntadmError::validation(
                    "network alias name cannot be empty".to_string(),
                ));
            }
            addr.parse::<Ipv4Addr>().map_err(|_| {
                crate::PntadmError::validation(format!(
                    "network alias {} is not an address: {}",
                    name, addr
                ))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DhcpConfig::default();
        assert_eq!(config.datastore.resource, "files");
        assert_eq!(config.datastore.path, PathBuf::from("/var/dhcp"));
        assert!(config.hosts_managed());
        assert_eq!(config.server_address(), Ipv4Addr::LOCALHOST);
    }

    #[test]
    fn test_netmask_lookup_with_classful_fallback() {
        let mut config = DhcpConfig::default();
        assert_eq!(
            config.netmask_for("10.1.2.3".parse().unwrap()),
            "255.0.0.0".parse::<Ipv4Addr>().unwrap()
        );

        config
            .netmasks
            .insert("10.0.0.0".to_string(), "255.255.255.0".to_string());
        assert_eq!(
            config.netmask_for("10.1.2.3".parse().unwrap()),
            "255.255.255.0".parse::<Ipv4Addr>().unwrap()
        );
    }

    #[test]
    fn test_validate_rejects_bad_netmask() {
        let mut config = DhcpConfig::default();
        config
            .netmasks
            .insert("10.0.0.0".to_string(), "255.0.255.0".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_replace_descriptor_fields() {
        let mut config = DhcpConfig::default();
        config.apply_overrides(
            Some("files"),
            Some(std::path::Path::new("/tmp/dhcp")),
            Some("nfs=off"),
        );
        assert_eq!(config.datastore.path, PathBuf::from("/tmp/dhcp"));
        assert_eq!(config.datastore.resource_config.as_deref(), Some("nfs=off"));
    }
}
