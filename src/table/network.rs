// file: src/table/network.rs
// version: 1.0.0
// guid: 0d74a2c9-6e3f-48b5-91a8-5c2e7f60d413

//! Network addresses and netmask arithmetic

use std::fmt;
use std::net::Ipv4Addr;

/// An IPv4 network: a canonicalized network address plus its mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Network {
    address: Ipv4Addr,
    mask: Ipv4Addr,
}

impl Network {
    /// Build a network from any address on it; the host bits are cleared.
    pub fn new(address: Ipv4Addr, mask: Ipv4Addr) -> Self {
        Self {
            address: Ipv4Addr::from(u32::from(address) & u32::from(mask)),
            mask,
        }
    }

    /// The classful mask for an address (class A /8, B /16, otherwise /24)
    pub fn classful_mask(address: Ipv4Addr) -> Ipv4Addr {
        match address.octets()[0] {
            0..=127 => Ipv4Addr::new(255, 0, 0, 0),
            128..=191 => Ipv4Addr::new(255, 255, 0, 0),
            _ => Ipv4Addr::new(255, 255, 255, 0),
        }
    }

    /// The network address
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// The netmask
    pub fn mask(&self) -> Ipv4Addr {
        self.mask
    }

    /// Whether `ip` lies on this network
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        u32::from(ip) & u32::from(self.mask) == u32::from(self.address)
    }

    /// Table-file name form: the address with dots replaced by underscores
    pub fn table_name(&self) -> String {
        let o = self.address.octets();
        format!("{}_{}_{}_{}", o[0], o[1], o[2], o[3])
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// Recover a network address from a table-file name, if it is one
pub fn address_from_table_name(name: &str) -> Option<Ipv4Addr> {
    let octets: Vec<u8> = name
        .split('_')
        .map(|part| {
            // reject forms like "010" so table names stay canonical
            if part.len() > 1 && part.starts_with('0') {
                None
            } else {
                part.parse().ok()
            }
        })
        .collect::<Option<Vec<u8>>>()?;
    match octets[..] {
        [a, b, c, d] => Some(Ipv4Addr::new(a, b, c, d)),
        _ => None,
    }
}

/// Whether a mask has contiguous leading one bits
pub fn is_valid_netmask(mask: Ipv4Addr) -> bool {
    let bits = u32::from(mask);
    bits.checked_shl(bits.leading_ones()).map_or(true, |rest| rest == 0)
}
