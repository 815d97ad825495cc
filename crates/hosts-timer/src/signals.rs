//! Interrupt handling
//!
//! SIGINT and SIGTERM end a timed session the same way the timer does.
//! Handlers are registered as soon as [`arm_interrupt`] returns, before the
//! returned future is ever polled, so a signal that arrives early is still
//! delivered to it. Must be called from inside a tokio runtime.

use std::future::Future;
use std::io;

use tracing::info;

#[cfg(unix)]
pub fn arm_interrupt() -> io::Result<impl Future<Output = ()> + Send + 'static> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => info!("received SIGINT"),
            _ = terminate.recv() => info!("received SIGTERM"),
        }
    })
}

#[cfg(not(unix))]
pub fn arm_interrupt() -> io::Result<impl Future<Output = ()> + Send + 'static> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl-C"),
            Err(e) => {
                tracing::warn!("cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await
            }
        }
    })
}
