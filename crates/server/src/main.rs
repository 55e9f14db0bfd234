mod config;
mod routes;

use std::process::ExitCode;

use clap::Parser;
use raw_http::server::serve_with_config;
use tokio::select;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::routes::Routes;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(config.log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
        return ExitCode::FAILURE;
    }

    let mut server = match serve_with_config(config.server_config(), Routes).await {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "couldn't start server");
            return ExitCode::FAILURE;
        }
    };

    info!(address = %server.local_addr(), "server started");

    shutdown_signal().await;

    if let Err(e) = server.close().await {
        warn!(cause = %e, "failed to close server");
    }

    info!("server shutdown");
    ExitCode::SUCCESS
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => {
                warn!(cause = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    select! {
        result = ctrl_c => {
            if let Err(e) = result {
                warn!(cause = %e, "failed to listen for SIGINT");
            }
        }
        () = terminate => {}
    }
}
