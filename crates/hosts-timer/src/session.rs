//! Timed sessions
//!
//! A timed session unblocks a set of aliases, then re-blocks them when the
//! timer runs out or an interrupt arrives, whichever comes first.
//!
//! Both waiters run as their own tasks. The first one to become ready
//! claims the [`FinishGate`] and reports its [`Trigger`]; a waiter that
//! finds the gate already claimed does nothing. The session re-reads the
//! hosts file before re-blocking so edits made by other programs while it
//! was waiting are kept.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hosts_timer_core::{HostsStore, StoreError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::blocker::Blocker;
use crate::domain::AliasSet;

/// Lifecycle of a timed session, traced at debug level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    /// Created, nothing touched yet
    Idle,
    /// Aliases unblocked
    Enabled,
    /// Timer and interrupt listener armed
    Racing,
    /// Aliases blocked again
    Disabled,
    /// Finished; the process may exit
    Terminated,
}

/// What ended the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Timer,
    Interrupt,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Timer => "timer elapsed",
            Trigger::Interrupt => "interrupted",
        }
    }
}

/// One-shot gate: exactly one caller of [`FinishGate::try_claim`] ever wins
#[derive(Debug, Default)]
pub struct FinishGate {
    claimed: AtomicBool,
}

impl FinishGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true for the first caller only
    pub fn try_claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }
}

/// Summary of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub trigger: Trigger,
    /// How long the aliases were reachable
    pub unblocked_for: Duration,
}

pub struct TimedSession<S> {
    blocker: Blocker<S>,
    aliases: AliasSet,
    duration: Duration,
    gate: Arc<FinishGate>,
    state: SessionState,
}

impl<S: HostsStore> TimedSession<S> {
    pub fn new(blocker: Blocker<S>, aliases: AliasSet, duration: Duration) -> Self {
        Self {
            blocker,
            aliases,
            duration,
            gate: Arc::new(FinishGate::new()),
            state: SessionState::Idle,
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }

    /// Run the session to completion.
    ///
    /// `interrupt` must already be listening when passed in, so a signal
    /// sent while the aliases are being unblocked is not missed. On error
    /// the aliases may be left unblocked.
    pub async fn run<F>(mut self, interrupt: F) -> Result<SessionReport, StoreError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.blocker.enable(&self.aliases)?;
        let enabled_at = Instant::now();
        self.transition(SessionState::Enabled);

        let (tx, mut rx) = mpsc::channel(1);
        let waiters = [
            spawn_waiter(
                Trigger::Timer,
                tokio::time::sleep(self.duration),
                Arc::clone(&self.gate),
                tx.clone(),
            ),
            spawn_waiter(Trigger::Interrupt, interrupt, Arc::clone(&self.gate), tx),
        ];
        self.transition(SessionState::Racing);

        let trigger = match rx.recv().await {
            Some(trigger) => trigger,
            None => {
                // Only possible if both waiters died; the aliases still have to go back
                warn!("session waiters exited without reporting");
                self.gate.try_claim();
                Trigger::Timer
            }
        };
        let unblocked_for = enabled_at.elapsed();
        for waiter in &waiters {
            waiter.abort();
        }

        info!(trigger = trigger.as_str(), aliases = %self.aliases, "ending session");
        self.blocker.refresh()?;
        self.blocker.disable(&self.aliases)?;
        self.transition(SessionState::Disabled);

        self.transition(SessionState::Terminated);
        Ok(SessionReport {
            trigger,
            unblocked_for,
        })
    }
}

fn spawn_waiter<F>(
    trigger: Trigger,
    ready: F,
    gate: Arc<FinishGate>,
    tx: mpsc::Sender<Trigger>,
) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        ready.await;
        if gate.try_claim() {
            debug!(?trigger, "claimed finish gate");
            let _ = tx.send(trigger).await;
        } else {
            debug!(?trigger, "finish gate already claimed");
        }
    })
}
