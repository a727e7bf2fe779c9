//! Blocking until the daemon is asked to terminate

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

/// Slots for signals arriving before the first one is consumed
pub const SIGNAL_QUEUE: usize = 3;

/// Termination requests honoured by [`run_wait`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    /// SIGTERM
    Term,
    /// SIGINT (Ctrl+C)
    Int,
}

/// Block the calling thread until SIGTERM or SIGINT is delivered
///
/// Default for the `RunWait` option. There is no timeout.
pub fn run_wait() {
    match wait_for_termination() {
        Ok(sig) => log::info!("received {:?}, stopping", sig),
        Err(e) => log::error!("waiting for termination signal: {}", e),
    }
}

/// Block until the first termination signal and return it
pub fn wait_for_termination() -> std::io::Result<TerminationSignal> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let (tx, mut rx) = mpsc::channel(SIGNAL_QUEUE);

        tokio::spawn(async move {
            loop {
                let sig = tokio::select! {
                    _ = sigterm.recv() => TerminationSignal::Term,
                    _ = sigint.recv() => TerminationSignal::Int,
                };
                if tx.send(sig).await.is_err() {
                    // Receiver dropped, exit
                    break;
                }
            }
        });

        rx.recv().await.ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "signal listener stopped")
        })
    })
}
