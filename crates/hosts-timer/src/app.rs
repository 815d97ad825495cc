//! Running a validated invocation
//!
//! Everything here returns a `Result`; only `main` turns outcomes into
//! process exit statuses.

use std::future::Future;
use std::io;
use std::path::Path;

use hosts_timer_core::{Config, FileHostsStore, HostsStore, Paths};
use tracing::debug;

use crate::blocker::Blocker;
use crate::cli::{Invocation, Mode};
use crate::domain::AliasSet;
use crate::error::AppError;
use crate::session::{SessionReport, TimedSession};

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Disabled(AliasSet),
    Enabled(AliasSet),
    Timed(AliasSet, SessionReport),
}

/// Load config and open the hosts file to operate on
pub fn open_store(paths: &Paths, override_path: Option<&Path>) -> Result<FileHostsStore, AppError> {
    let config = Config::load(&paths.config_file()).map_err(AppError::Config)?;
    let hosts_path = config.resolve_hosts_path(paths, override_path);
    debug!(path = %hosts_path.display(), "using hosts file");
    Ok(FileHostsStore::load(&hosts_path)?)
}

/// Carry out `invocation` against `store`.
///
/// `arm_interrupt` is only called for timed sessions, from inside the
/// runtime that drives the session.
pub fn run<S, F, Fut>(invocation: Invocation, store: S, arm_interrupt: F) -> Result<Outcome, AppError>
where
    S: HostsStore,
    F: FnOnce() -> io::Result<Fut>,
    Fut: Future<Output = ()> + Send + 'static,
{
    let Invocation { mode, aliases, .. } = invocation;
    let mut blocker = Blocker::new(store);

    match mode {
        Mode::Disable => {
            blocker.disable(&aliases)?;
            Ok(Outcome::Disabled(aliases))
        }
        Mode::Enable => {
            blocker.enable(&aliases)?;
            Ok(Outcome::Enabled(aliases))
        }
        Mode::Timed(duration) => {
            let rt = tokio::runtime::Runtime::new().map_err(AppError::Runtime)?;
            let report = rt.block_on(async {
                let interrupt = arm_interrupt().map_err(AppError::Runtime)?;
                let session = TimedSession::new(blocker, aliases.clone(), duration);
                Ok::<_, AppError>(session.run(interrupt).await?)
            })?;
            Ok(Outcome::Timed(aliases, report))
        }
    }
}
