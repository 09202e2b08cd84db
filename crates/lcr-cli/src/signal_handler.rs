//! Ctrl+C handling for benchmark runs

use futures::stream::StreamExt;
use signal_hook::consts::SIGINT;
use signal_hook_tokio::{Handle, Signals};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Turns the first SIGINT into a cancellation of the run; a second SIGINT
/// exits immediately with code 130.
pub struct InterruptListener {
    handle: Handle,
    task: JoinHandle<()>,
}

impl InterruptListener {
    pub fn spawn(cancel: CancellationToken) -> std::io::Result<Self> {
        let signals = Signals::new([SIGINT])?;
        let handle = signals.handle();
        let task = tokio::spawn(listen(signals, cancel));
        Ok(Self { handle, task })
    }

    /// Stop listening and wait for the listener task to end
    pub async fn shutdown(self) {
        self.handle.close();
        if let Err(e) = self.task.await {
            tracing::debug!(error = %e, "signal listener ended abnormally");
        }
    }
}

async fn listen(mut signals: Signals, cancel: CancellationToken) {
    while let Some(signal) = signals.next().await {
        if signal != SIGINT {
            continue;
        }
        if cancel.is_cancelled() {
            eprintln!("\nForced exit");
            std::process::exit(130);
        }
        eprintln!("\n🛑 Interrupting run... (Ctrl+C again to force exit)");
        eprintln!("   Completed results are kept; rerun with --save-to to resume.");
        cancel.cancel();
    }
}
