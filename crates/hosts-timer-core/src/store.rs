//! Hosts store
//!
//! `HostsStore` is the contract the blocking logic is written against.
//! `FileHostsStore` is the real implementation: it keeps a parsed copy of
//! the hosts file in memory and writes it back atomically on save.

use std::fs;
use std::io::{self, Write};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::hosts::HostsFile;

/// Errors reading or writing the hosts file
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read hosts file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("hosts file {} is not valid UTF-8", .path.display())]
    Malformed { path: PathBuf },

    #[error("failed to write hosts file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Persistent hosts file, edited in memory and written back explicitly
pub trait HostsStore {
    /// Throw away in-memory edits and re-read the backing file
    fn reload(&mut self) -> Result<(), StoreError>;

    /// Map each hostname to `address` unless it already is
    fn add(&mut self, address: IpAddr, hostnames: &[String]);

    /// Remove each hostname from whatever address it is mapped to
    fn remove(&mut self, hostnames: &[String]);

    /// Persist in-memory state
    fn save(&mut self) -> Result<(), StoreError>;
}

/// Hosts store backed by a file on disk
#[derive(Debug)]
pub struct FileHostsStore {
    path: PathBuf,
    hosts: HostsFile,
}

impl FileHostsStore {
    /// Read and parse the hosts file at `path`
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let hosts = read_hosts(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            hosts,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current in-memory document
    pub fn hosts(&self) -> &HostsFile {
        &self.hosts
    }
}

impl HostsStore for FileHostsStore {
    fn reload(&mut self) -> Result<(), StoreError> {
        self.hosts = read_hosts(&self.path)?;
        Ok(())
    }

    fn add(&mut self, address: IpAddr, hostnames: &[String]) {
        debug!(%address, ?hostnames, "adding hosts entries");
        self.hosts.add(address, hostnames);
    }

    fn remove(&mut self, hostnames: &[String]) {
        debug!(?hostnames, "removing hosts entries");
        self.hosts.remove(hostnames);
    }

    fn save(&mut self) -> Result<(), StoreError> {
        let content = self.hosts.render();
        write_atomic(&self.path, content.as_bytes()).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), bytes = content.len(), "saved hosts file");
        Ok(())
    }
}

fn read_hosts(path: &Path) -> Result<HostsFile, StoreError> {
    let bytes = fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|_| StoreError::Malformed {
        path: path.to_path_buf(),
    })?;

    let hosts = HostsFile::parse(&content);
    debug!(
        path = %path.display(),
        lines = hosts.lines().count(),
        "loaded hosts file"
    );
    Ok(hosts)
}

/// Write to a sibling temp file, then rename it over `path`
fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;

    // Keep the original mode; the temp file is created 0600
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), meta.permissions())?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BLOCKED_ADDR;
    use tempfile::TempDir;

    const HOSTS: &str = "# static table\n127.0.0.1\tlocalhost\n::1\tlocalhost\n";

    fn aliases() -> Vec<String> {
        vec!["example.com".to_string(), "www.example.com".to_string()]
    }

    fn hosts_file(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = FileHostsStore::load(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn test_load_non_utf8_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, [0x31, 0x32, 0xff, 0xfe, b'\n']).unwrap();

        let err = FileHostsStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn test_save_writes_changes() {
        let (_dir, path) = hosts_file(HOSTS);
        let mut store = FileHostsStore::load(&path).unwrap();

        store.add(BLOCKED_ADDR, &aliases());
        store.save().unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(HOSTS));
        assert!(written.contains("127.0.0.1 example.com www.example.com\n"));
    }

    #[test]
    fn test_unsaved_edits_do_not_touch_disk() {
        let (_dir, path) = hosts_file(HOSTS);
        let mut store = FileHostsStore::load(&path).unwrap();

        store.add(BLOCKED_ADDR, &aliases());
        assert_eq!(fs::read_to_string(&path).unwrap(), HOSTS);
    }

    #[test]
    fn test_reload_discards_edits_and_sees_external_changes() {
        let (_dir, path) = hosts_file(HOSTS);
        let mut store = FileHostsStore::load(&path).unwrap();
        store.add(BLOCKED_ADDR, &aliases());

        let external = format!("{}10.1.1.1 printer.lan\n", HOSTS);
        fs::write(&path, &external).unwrap();

        store.reload().unwrap();
        assert!(!store.hosts().contains(BLOCKED_ADDR, "example.com"));
        assert_eq!(store.hosts().render(), external);
    }

    #[test]
    fn test_reload_after_file_removed_fails() {
        let (_dir, path) = hosts_file(HOSTS);
        let mut store = FileHostsStore::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(matches!(store.reload(), Err(StoreError::Read { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, path) = hosts_file(HOSTS);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut store = FileHostsStore::load(&path).unwrap();
        store.remove(&aliases());
        store.save().unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let (_src_dir, src) = hosts_file(HOSTS);
        let mut store = FileHostsStore::load(&src).unwrap();
        store.path = dir.path().join("gone").join("hosts");

        assert!(matches!(store.save(), Err(StoreError::Write { .. })));
    }
}
