// file: src/table/mod.rs
// version: 1.4.0
// guid: 91c36f5e-2d80-4b17-a6c4-7e50d9a8b321

//! DHCP network table model.
//!
//! A client entry binds a client IP address to a client identifier, a flag
//! set, the owning server, a lease expiration and optional macro/comment
//! fields. Entries round-trip through a pipe-separated record line, one per
//! line in a table file.

pub mod manager;
pub mod network;
pub mod store;

pub use manager::{ClientUpdate, NetworkManager};
pub use network::Network;
pub use store::{FilesTableStore, TableStore};

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};

use crate::error::TableError;
use crate::PntadmError;

/// Client identifier: an even-length hex string of 1–64 octets.
///
/// `00` marks an entry with no associated client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    /// The identifier of an entry with no associated client
    pub fn unassociated() -> Self {
        Self("00".to_string())
    }

    /// Get the identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::unassociated()
    }
}

impl FromStr for ClientId {
    type Err = PntadmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() % 2 != 0 || s.len() > 128 {
            return Err(PntadmError::validation(format!(
                "client ID must be 1-64 hex octets: {}",
                s
            )));
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PntadmError::validation(format!(
                "client ID contains non-hex characters: {}",
                s
            )));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ClientId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Entry flag set.
///
/// `DYNAMIC` is the empty set; the named bits combine with `+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u8);

impl Flags {
    pub const DYNAMIC: Flags = Flags(0x00);
    pub const PERMANENT: Flags = Flags(0x01);
    pub const MANUAL: Flags = Flags(0x02);
    pub const UNUSABLE: Flags = Flags(0x04);
    pub const BOOTP: Flags = Flags(0x08);

    const ALL: u8 = 0x0F;

    const NAMES: &'static [(u8, &'static str)] = &[
        (0x01, "PERMANENT"),
        (0x02, "MANUAL"),
        (0x04, "UNUSABLE"),
        (0x08, "BOOTP"),
    ];

    /// Whether every bit of `other` is set
    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the bits of `other`
    pub fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    /// Raw bit value
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Keyword form, e.g. `PERMANENT+MANUAL`; `DYNAMIC` for the empty set
    pub fn keywords(self) -> String {
        if self.0 == 0 {
            return "DYNAMIC".to_string();
        }
        Self::NAMES
            .iter()
            .filter(|(bit, _)| self.0 & bit != 0)
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl FromStr for Flags {
    type Err = PntadmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PntadmError::validation("flags cannot be empty".to_string()));
        }

        if s.chars().all(|c| c.is_ascii_digit()) {
            let value: u8 = s.parse().map_err(|_| {
                PntadmError::validation(format!("flag value out of range: {}", s))
            })?;
            if value > Self::ALL {
                return Err(PntadmError::validation(format!(
                    "flag value out of range: {}",
                    s
                )));
            }
            return Ok(Self(value));
        }

        let mut flags = Flags::DYNAMIC;
        for keyword in s.split('+') {
            match keyword.to_ascii_uppercase().as_str() {
                "DYNAMIC" => {}
                "PERMANENT" => flags.insert(Flags::PERMANENT),
                "MANUAL" => flags.insert(Flags::MANUAL),
                "UNUSABLE" => flags.insert(Flags::UNUSABLE),
                "BOOTP" => flags.insert(Flags::BOOTP),
                other => {
                    return Err(PntadmError::validation(format!(
                        "unknown flag keyword: {}",
                        other
                    )))
                }
            }
        }
        Ok(flags)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl Serialize for Flags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// Lease expiration: available now, never expiring, or an absolute instant.
///
/// The wire form is signed unix seconds: `0`, `-1`, or a positive timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaseExpiration {
    /// No active lease; the entry is available
    #[default]
    Zero,
    /// The lease never expires
    Forever,
    /// The lease expires at the given instant
    At(DateTime<Utc>),
}

impl LeaseExpiration {
    /// Signed unix-seconds wire form
    pub fn as_secs(self) -> i64 {
        match self {
            LeaseExpiration::Zero => 0,
            LeaseExpiration::Forever => -1,
            LeaseExpiration::At(t) => t.timestamp(),
        }
    }

    /// Build from the signed unix-seconds wire form
    pub fn from_secs(secs: i64) -> Self {
        match secs {
            0 => LeaseExpiration::Zero,
            s if s < 0 => LeaseExpiration::Forever,
            s => match DateTime::from_timestamp(s, 0) {
                Some(t) => LeaseExpiration::At(t),
                None => LeaseExpiration::Zero,
            },
        }
    }

    /// Human-readable form for verbose listings
    pub fn describe(self) -> String {
        match self {
            LeaseExpiration::Zero => "0".to_string(),
            LeaseExpiration::Forever => "forever".to_string(),
            LeaseExpiration::At(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl FromStr for LeaseExpiration {
    type Err = PntadmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => return Ok(LeaseExpiration::Zero),
            "-1" => return Ok(LeaseExpiration::Forever),
            _ => {}
        }
        if s.eq_ignore_ascii_case("forever") {
            return Ok(LeaseExpiration::Forever);
        }
        if let Ok(secs) = s.parse::<i64>() {
            return Ok(LeaseExpiration::from_secs(secs));
        }
        if let Ok(t) = DateTime::parse_from_rfc3339(s) {
            return Ok(LeaseExpiration::At(t.with_timezone(&Utc)));
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            let midnight = d.and_hms_opt(0, 0, 0).ok_or_else(|| {
                PntadmError::validation(format!("invalid expiration date: {}", s))
            })?;
            return Ok(LeaseExpiration::At(midnight.and_utc()));
        }
        Err(PntadmError::validation(format!(
            "invalid lease expiration: {}",
            s
        )))
    }
}

impl fmt::Display for LeaseExpiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_secs())
    }
}

impl Serialize for LeaseExpiration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_secs())
    }
}

/// One client entry in a network table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientEntry {
    /// Client identifier bound to the address
    pub client_id: ClientId,
    /// Entry flags
    pub flags: Flags,
    /// Client IP address; the table key
    pub client_ip: Ipv4Addr,
    /// Address of the server owning the entry
    pub server_ip: Ipv4Addr,
    /// Lease expiration
    pub expiration: LeaseExpiration,
    /// Configuration macro applied to the client
    pub macro_name: Option<String>,
    /// Free-form comment
    pub comment: Option<String>,
}

impl ClientEntry {
    /// New entry with default identifier, flags and expiration
    pub fn new(client_ip: Ipv4Addr, server_ip: Ipv4Addr) -> Self {
        Self {
            client_id: ClientId::unassociated(),
            flags: Flags::DYNAMIC,
            client_ip,
            server_ip,
            expiration: LeaseExpiration::Zero,
            macro_name: None,
            comment: None,
        }
    }
}

impl fmt::Display for ClientEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{}",
            self.client_id,
            self.flags,
            self.client_ip,
            self.server_ip,
            self.expiration,
            self.macro_name.as_deref().unwrap_or(""),
            self.comment.as_deref().unwrap_or("")
        )
    }
}

impl FromStr for ClientEntry {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('|').collect();
        if fields.len() != 7 {
            return Err(TableError::BadRecord(format!(
                "expected 7 fields, got {}: {}",
                fields.len(),
                s
            )));
        }

        let bad = |e: PntadmError| TableError::BadRecord(e.to_string());
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());

        Ok(Self {
            client_id: fields[0].parse().map_err(bad)?,
            flags: fields[1].parse().map_err(bad)?,
            client_ip: fields[2]
                .parse()
                .map_err(|_| TableError::BadRecord(format!("bad client address: {}", fields[2])))?,
            server_ip: fields[3]
                .parse()
                .map_err(|_| TableError::BadRecord(format!("bad server address: {}", fields[3])))?,
            expiration: fields[4].parse().map_err(bad)?,
            macro_name: opt(fields[5]),
            comment: opt(fields[6]),
        })
    }
}

/// Client identifier as supplied on the command line, carried as an opaque
/// value until the delegated operation resolves it to an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    identifier: String,
}

impl ClientRecord {
    /// Build from a hostname-or-address identifier
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    /// The identifier as given
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The identifier as an address, when it parses as one
    pub fn ip(&self) -> Option<Ipv4Addr> {
        self.identifier.parse().ok()
    }
}
