//! Graceful shutdown coordination.

use tokio::sync::broadcast;

/// Fan-out shutdown notification for the accept loop and open connections.
#[derive(Clone)]
pub struct ShutdownCoordinator {
	sender: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
	pub fn new() -> Self {
		let (sender, _) = broadcast::channel(1);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<()> {
		self.sender.subscribe()
	}

	/// Ask every subscriber to stop.
	pub fn shutdown(&self) {
		// No receivers means nothing is running.
		let _ = self.sender.send(());
	}
}

impl Default for ShutdownCoordinator {
	fn default() -> Self {
		Self::new()
	}
}

/// Completes on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %e, "failed to install Ctrl+C handler");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(e) => {
				tracing::error!(error = %e, "failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
	tracing::info!("shutdown signal received");
}
