//! hosts-timer - block distracting domains via the hosts file
//!
//! Blocked domains are pointed at 127.0.0.1 in the system hosts file.
//! Three modes:
//! - disable: block the domains
//! - enable: unblock them indefinitely
//! - time: unblock them for a while, then block them again when the time
//!   runs out or the process is interrupted (SIGINT/SIGTERM)

pub mod app;
pub mod blocker;
pub mod cli;
pub mod domain;
pub mod duration;
pub mod error;
pub mod session;
pub mod signals;

#[cfg(test)]
mod testing;

pub use app::Outcome;
pub use blocker::Blocker;
pub use cli::{Cli, Invocation, Mode};
pub use domain::{AliasSet, Domain};
pub use error::{AppError, UsageError};
pub use session::{FinishGate, SessionReport, TimedSession, Trigger};
