//! Stop the promotion sweep and drain the server on SIGINT or SIGTERM.

use std::io;

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::{signal, task::JoinHandle};
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),
}

/// Wait for a stop signal, then cancel the sweep and stop accepting requests.
///
/// In-flight requests are allowed to finish.
pub(crate) async fn listen(
    handle: ServerHandle,
    sweep: Option<JoinHandle<()>>,
) -> Result<(), ShutdownSignalError> {
    let signal = received().await?;

    info!(signal, "shutdown requested");

    if let Some(sweep) = sweep {
        sweep.abort();

        info!("promotion sweep stopped");
    }

    handle.stop_graceful(None);

    Ok(())
}

#[cfg(unix)]
async fn received() -> Result<&'static str, ShutdownSignalError> {
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(ShutdownSignalError::SigTerm)?;

    tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(ShutdownSignalError::CtrlC)?;

            Ok("ctrl_c")
        }
        _ = terminate.recv() => Ok("sigterm"),
    }
}

#[cfg(not(unix))]
async fn received() -> Result<&'static str, ShutdownSignalError> {
    signal::ctrl_c().await.map_err(ShutdownSignalError::CtrlC)?;

    Ok("ctrl_c")
}
