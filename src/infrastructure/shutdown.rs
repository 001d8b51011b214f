use tokio::sync::watch;

#[derive(Clone)]
pub struct Shutdown {
    sender: watch::Sender<bool>,
}

#[derive(Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

impl ShutdownListener {
    /// Resolves once shutdown has been triggered, immediately if it already was.
    pub async fn notified(&mut self) {
        let _ = self.receiver.wait_for(|triggered| *triggered).await;
    }
}

/// Triggers `shutdown` on Ctrl-C and, on Unix, SIGTERM.
pub fn install_signal_handlers(shutdown: Shutdown) {
    let ctrlc = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!(target: "lifecycle", signal = "SIGINT", "shutdown requested");
            ctrlc.trigger();
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let term = shutdown;
        tokio::spawn(async move {
            if let Ok(mut sig) = signal(SignalKind::terminate()) {
                sig.recv().await;
                tracing::info!(target: "lifecycle", signal = "SIGTERM", "shutdown requested");
                term.trigger();
            }
        });
    }
}
