//! Blocking controller
//!
//! Applies or lifts the loopback redirect for a set of aliases and writes
//! the result straight back to the hosts store.

use hosts_timer_core::{HostsStore, StoreError, BLOCKED_ADDR};
use tracing::info;

use crate::domain::AliasSet;

pub struct Blocker<S> {
    store: S,
}

impl<S: HostsStore> Blocker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Block: point every alias at the loopback address and save
    pub fn disable(&mut self, aliases: &AliasSet) -> Result<(), StoreError> {
        self.store.add(BLOCKED_ADDR, aliases.as_slice());
        self.store.save()?;
        info!(%aliases, "blocked");
        Ok(())
    }

    /// Unblock: drop every alias from the hosts file and save
    pub fn enable(&mut self, aliases: &AliasSet) -> Result<(), StoreError> {
        self.store.remove(aliases.as_slice());
        self.store.save()?;
        info!(%aliases, "unblocked");
        Ok(())
    }

    /// Re-read the hosts file, discarding anything not yet saved
    pub fn refresh(&mut self) -> Result<(), StoreError> {
        self.store.reload()
    }
}
