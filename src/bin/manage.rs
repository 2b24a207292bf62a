//! Management commands for booksblog
//!
//! ```text
//! manage runserver [ADDRESS]
//! manage migrate
//! manage clearsessions
//! ```

use anyhow::Context;
use booksblog::config::{AppContext, build_application, get_settings};
use booksblog::server::{HttpServer, ShutdownCoordinator, shutdown_signal};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "manage")]
#[command(about = "booksblog management interface", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
	/// Apply migrations, then serve HTTP until Ctrl+C or SIGTERM
	Runserver {
		/// Address to bind (default: `bind_address` from settings)
		#[arg(value_name = "ADDRESS")]
		address: Option<SocketAddr>,
	},

	/// Apply database migrations
	Migrate,

	/// Delete expired sessions
	Clearsessions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	let settings = get_settings().context("failed to load settings")?;

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
		)
		.init();

	let ctx = Arc::new(
		AppContext::from_settings(settings)
			.await
			.context("failed to initialize application")?,
	);

	match cli.command {
		Commands::Runserver { address } => runserver(ctx, address).await,
		Commands::Migrate => {
			ctx.db.migrate().await?;
			tracing::info!("migrations applied");
			Ok(())
		}
		Commands::Clearsessions => {
			let removed = ctx.sessions.cleanup_expired().await?;
			tracing::info!(removed, "expired sessions deleted");
			Ok(())
		}
	}
}

async fn runserver(ctx: Arc<AppContext>, address: Option<SocketAddr>) -> anyhow::Result<()> {
	ctx.db.migrate().await?;

	let address = address.unwrap_or(ctx.settings.bind_address);
	let listener = TcpListener::bind(address)
		.await
		.with_context(|| format!("failed to bind {}", address))?;

	if ctx.settings.debug {
		tracing::warn!("debug is enabled, do not use this server in production");
	}

	let server = HttpServer::new(build_application(ctx.clone())?);

	let coordinator = ShutdownCoordinator::new();
	let trigger = coordinator.clone();
	tokio::spawn(async move {
		shutdown_signal().await;
		trigger.shutdown();
	});

	server.listen_with_shutdown(listener, coordinator).await?;
	ctx.db.close().await;
	Ok(())
}
