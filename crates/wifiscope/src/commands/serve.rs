//! `wifiscope serve`: run the poller behind the HTTP server.

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use wifiscope_core::Poller;

use crate::cli::{GlobalOpts, ServeArgs};
use crate::config;
use crate::error::CliError;
use crate::server::{self, AppState};

pub async fn handle(args: &ServeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::resolve(global)?;
    config::apply_serve(&mut cfg, args);

    let client = cfg.router.client()?;
    let poller_config = cfg.polling.poller_config()?;
    info!(router = %client.base_url(), user = client.username(), "polling router");

    // Bind before polling so a taken port fails fast.
    let addr = cfg.server.listen;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| CliError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    let poller = Poller::new(client, poller_config);
    poller.start().await?;

    let shutdown = CancellationToken::new();
    let state = AppState {
        poller: poller.clone(),
        snapshot_timeout: cfg.server.snapshot_timeout(),
        shutdown: shutdown.clone(),
    };
    let app = server::router(state, cfg.server.static_dir.as_deref());

    let served = server::run(listener, app, server::shutdown_signal(shutdown.clone())).await;

    shutdown.cancel();
    poller.stop().await;
    served?;
    Ok(())
}
