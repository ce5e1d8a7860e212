mod error;

use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use netload_core::Reporter;

use crate::error::DaemonError;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

async fn run() -> Result<(), DaemonError> {
    let config = netload_config::load()?;
    info!(
        url = %config.report_url,
        host = %config.host,
        interval = ?config.interval,
        window = ?config.window,
        source = %config.source_path.display(),
        "starting netloadd"
    );

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            info!("shutdown signal received");
            cancel.cancel();
        }
    });

    let mut reporter = Reporter::new(config, cancel)?;
    reporter.run().await?;
    Ok(())
}

/// Resolves on SIGINT (Ctrl-C) or, on unix, SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM; Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
