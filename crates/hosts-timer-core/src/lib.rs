//! hosts-timer core - shared functionality for the hosts-timer tool
//!
//! Owns everything that touches the hosts file on disk: the line-preserving
//! document model, the `HostsStore` contract the blocking logic is written
//! against, and where the file and the tool's configuration live.

pub mod config;
pub mod hosts;
pub mod paths;
pub mod store;

pub use config::Config;
pub use hosts::{HostsFile, Line};
pub use paths::Paths;
pub use store::{FileHostsStore, HostsStore, StoreError};

use std::net::{IpAddr, Ipv4Addr};

/// Address blocked hostnames are redirected to. Nothing else is ever written.
pub const BLOCKED_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
