//! In-memory hosts store for tests

use std::io;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use hosts_timer_core::{HostsFile, HostsStore, StoreError, BLOCKED_ADDR};

/// Store operation, recorded in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Reload,
    Add(Vec<String>),
    Remove(Vec<String>),
    Save,
}

#[derive(Debug)]
struct Inner {
    disk: HostsFile,
    working: HostsFile,
    ops: Vec<Op>,
    saves_left: Option<usize>,
}

/// Shared-handle fake: clones see the same "disk" and operation log
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new(content: &str) -> Self {
        let hosts = HostsFile::parse(content);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                disk: hosts.clone(),
                working: hosts,
                ops: Vec::new(),
                saves_left: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Rendered content of the last successful save
    pub fn disk(&self) -> String {
        self.lock().disk.render()
    }

    /// Simulate another program editing the file
    pub fn write_external(&self, content: &str) {
        self.lock().disk = HostsFile::parse(content);
    }

    pub fn is_blocked(&self, alias: &str) -> bool {
        self.lock().disk.contains(BLOCKED_ADDR, alias)
    }

    pub fn ops(&self) -> Vec<Op> {
        self.lock().ops.clone()
    }

    pub fn count(&self, wanted: fn(&Op) -> bool) -> usize {
        self.lock().ops.iter().filter(|op| wanted(op)).count()
    }

    /// Let `n` more saves succeed, then fail every save after that
    pub fn fail_saves_after(&self, n: usize) {
        self.lock().saves_left = Some(n);
    }
}

impl HostsStore for MemoryStore {
    fn reload(&mut self) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.ops.push(Op::Reload);
        inner.working = inner.disk.clone();
        Ok(())
    }

    fn add(&mut self, address: IpAddr, hostnames: &[String]) {
        let mut inner = self.lock();
        inner.ops.push(Op::Add(hostnames.to_vec()));
        inner.working.add(address, hostnames);
    }

    fn remove(&mut self, hostnames: &[String]) {
        let mut inner = self.lock();
        inner.ops.push(Op::Remove(hostnames.to_vec()));
        inner.working.remove(hostnames);
    }

    fn save(&mut self) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.ops.push(Op::Save);

        if let Some(left) = inner.saves_left.as_mut() {
            if *left == 0 {
                return Err(StoreError::Write {
                    path: PathBuf::from("memory"),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            *left -= 1;
        }

        inner.disk = inner.working.clone();
        Ok(())
    }
}
