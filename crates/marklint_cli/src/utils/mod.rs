//! CLI utility functions

use marklint_core::CancellationToken;
use miette::{IntoDiagnostic, Result};
use tokio::runtime::Runtime;
use tracing::warn;

/// A small runtime for background listeners; the lint run itself stays on
/// the rayon pool.
pub fn create_tokio_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .into_diagnostic()
}

/// Cancels `token` on the first Ctrl-C received while `runtime` is alive.
pub fn spawn_ctrl_c_listener(runtime: &Runtime, token: CancellationToken) {
    runtime.spawn(async move {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if signal.is_ok() {
                    warn!("Interrupted, cancelling remaining files");
                    token.cancel();
                }
            }
            _ = token.cancelled() => {}
        }
    });
}
