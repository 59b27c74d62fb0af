//! Webhook receiver server.
//!
//! Serves `GET /` and `POST /postreceive` until SIGINT or SIGTERM.

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

use webhook_receiver::web::is_signature_verification_enabled;
use webhook_receiver::{router, telemetry, AppState, Config, Dispatcher, WEBHOOK_PATH};

#[tokio::main]
async fn main() -> Result<()> {
    // LOG_FORMAT lives in the config, so fallbacks are reported after init.
    let (config, invalid) = Config::from_env();
    telemetry::init(config.log_format);
    invalid.iter().for_each(|var| var.report());

    info!("webhook_receiver_starting");
    info!(
        host = %config.host,
        port = config.port,
        signature_verification = is_signature_verification_enabled(&config.webhook_secret),
        log_format = ?config.log_format,
        "config_loaded"
    );

    let shutdown = Shutdown::install()?;

    let addr = config.bind_addr();
    let state = AppState::new(config, Dispatcher::with_default_hooks());
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(address = %addr, webhook_path = WEBHOOK_PATH, "webhook_receiver_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.wait())
        .await
        .context("Server error")?;

    info!("webhook_receiver_stopped");

    Ok(())
}

/// Termination signals, registered before the server starts accepting.
struct Shutdown {
    #[cfg(unix)]
    terminate: signal::unix::Signal,
}

impl Shutdown {
    fn install() -> Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: signal::unix::signal(signal::unix::SignalKind::terminate())
                .context("Failed to install SIGTERM handler")?,
        })
    }

    /// Resolve on the first SIGINT or SIGTERM.
    async fn wait(self) {
        let interrupt = async {
            if let Err(e) = signal::ctrl_c().await {
                // Without a SIGINT listener only SIGTERM can stop the server.
                error!(error = %e, "sigint_listener_failed");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = {
            let mut terminate = self.terminate;
            async move {
                terminate.recv().await;
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = interrupt => info!(signal = "SIGINT", "shutdown_requested"),
            _ = terminate => info!(signal = "SIGTERM", "shutdown_requested"),
        }
    }
}
