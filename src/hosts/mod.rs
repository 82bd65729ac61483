// file: src/hosts/mod.rs
// version: 1.1.0
// guid: e4b82c60-9f15-4d3a-87c2-1a6e5d90f437

//! System hosts table editing.
//!
//! Line-oriented editor for an `/etc/inet/hosts`-style file. Edits preserve
//! unrelated lines and comments byte for byte; only whole entries matching
//! the targeted address are touched. Consulted only when the configuration
//! says hosts entries are locally managed.

use std::fs;
use std::io::{self, Write};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

/// Editor over one hosts file
pub struct HostsFile {
    path: PathBuf,
}

impl HostsFile {
    /// Create an editor for the given hosts file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The hosts file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> io::Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    fn rewrite(&self, content: &str) -> io::Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Address registered for a host name, if any
    pub fn lookup_by_name(&self, name: &str) -> io::Result<Option<Ipv4Addr>> {
        Ok(self.read()?.lines().find_map(|line| {
            let (addr, names) = parse_line(line)?;
            names
                .iter()
                .any(|n| n.eq_ignore_ascii_case(name))
                .then_some(addr)
        }))
    }

    /// Canonical host name registered for an address, if any
    pub fn lookup_by_addr(&self, addr: Ipv4Addr) -> io::Result<Option<String>> {
        Ok(self.read()?.lines().find_map(|line| {
            let (line_addr, names) = parse_line(line)?;
            (line_addr == addr).then(|| names[0].to_string())
        }))
    }

    /// Append an entry for `addr` under `name`
    pub fn add(&self, addr: Ipv4Addr, name: &str) -> io::Result<()> {
        let mut content = self.read()?;
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&format!("{}\t{}\n", addr, name));
        self.rewrite(&content)?;
        debug!("added hosts entry {} {}", addr, name);
        Ok(())
    }

    /// Remove every entry for `addr`. Returns whether anything was removed.
    pub fn remove_by_addr(&self, addr: Ipv4Addr) -> io::Result<bool> {
        let content = self.read()?;
        let mut kept = String::with_capacity(content.len());
        let mut removed = false;

        for line in content.lines() {
            match parse_line(line) {
                Some((line_addr, _)) if line_addr == addr => removed = true,
                _ => {
                    kept.push_str(line);
                    kept.push('\n');
                }
            }
        }

        if removed {
            self.rewrite(&kept)?;
            debug!("removed hosts entries for {}", addr);
        }
        Ok(removed)
    }
}

/// Split a hosts line into its address and names; `None` for lines that are
/// blank, comments, or otherwise not entries (those are preserved verbatim).
fn parse_line(line: &str) -> Option<(Ipv4Addr, Vec<&str>)> {
    let data = line.split('#').next().unwrap_or("");
    let mut fields = data.split_whitespace();
    let addr = fields.next()?.parse().ok()?;
    let names: Vec<&str> = fields.collect();
    if names.is_empty() {
        return None;
    }
    Some((addr, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn hosts_with(content: &str) -> (TempDir, HostsFile) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, content).unwrap();
        (dir, HostsFile::new(path))
    }

    #[test]
    fn test_lookup_by_name_and_aliases() {
        let (_dir, hosts) = hosts_with("127.0.0.1 localhost\n10.0.0.5 build build.example.com\n");
        assert_eq!(
            hosts.lookup_by_name("BUILD").unwrap(),
            Some("10.0.0.5".parse().unwrap())
        );
        assert_eq!(
            hosts.lookup_by_name("build.example.com").unwrap(),
            Some("10.0.0.5".parse().unwrap())
        );
        assert_eq!(hosts.lookup_by_name("missing").unwrap(), None);
    }

    #[test]
    fn test_lookup_by_addr_returns_canonical_name() {
        let (_dir, hosts) = hosts_with("10.0.0.5 build build.example.com\n");
        assert_eq!(
            hosts.lookup_by_addr("10.0.0.5".parse().unwrap()).unwrap(),
            Some("build".to_string())
        );
    }

    #[test]
    fn test_add_and_remove_preserve_other_lines() {
        let (_dir, hosts) =
            hosts_with("# local additions\n127.0.0.1 localhost # loopback\n\n10.0.0.5 build\n");

        hosts.add("10.0.0.9".parse().unwrap(), "scratch").unwrap();
        assert_eq!(
            hosts.lookup_by_name("scratch").unwrap(),
            Some("10.0.0.9".parse().unwrap())
        );

        assert!(hosts.remove_by_addr("10.0.0.5".parse().unwrap()).unwrap());
        assert!(!hosts.remove_by_addr("10.0.0.5".parse().unwrap()).unwrap());

        let content = fs::read_to_string(hosts.path()).unwrap();
        assert!(content.contains("# local additions"));
        assert!(content.contains("127.0.0.1 localhost # loopback"));
        assert!(content.contains("10.0.0.9\tscratch"));
        assert!(!content.contains("10.0.0.5"));
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let hosts = HostsFile::new(dir.path().join("hosts"));
        assert_eq!(hosts.lookup_by_name("any").unwrap(), None);
        assert!(!hosts.remove_by_addr("10.0.0.5".parse().unwrap()).unwrap());

        hosts.add("10.0.0.5".parse().unwrap(), "first").unwrap();
        assert_eq!(
            hosts.lookup_by_addr("10.0.0.5".parse().unwrap()).unwrap(),
            Some("first".to_string())
        );
    }
}
