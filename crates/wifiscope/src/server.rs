//! HTTP surface: the joined client view, poller status and the static UI.
//!
//! - `GET /api/graph`  -- client MAC → client object, waits for the first
//!   snapshot (bounded when a snapshot timeout is configured)
//! - `GET /api/status` -- readiness and per-source freshness
//! - everything else   -- files from the static directory, when configured

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use wifiscope_core::{Poller, RouterApi};

/// Application state injected into handlers.
pub struct AppState<A: RouterApi> {
    pub poller: Poller<A>,
    /// Bound on how long `/api/graph` waits for the first snapshot.
    pub snapshot_timeout: Option<Duration>,
    /// Cancelled on shutdown so waiting requests are released.
    pub shutdown: CancellationToken,
}

impl<A: RouterApi> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            poller: self.poller.clone(),
            snapshot_timeout: self.snapshot_timeout,
            shutdown: self.shutdown.clone(),
        }
    }
}

/// Build the Axum router with all routes and middleware layers.
pub fn router<A: RouterApi>(state: AppState<A>, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/graph", get(graph::<A>))
        .route("/api/status", get(status::<A>))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(TraceLayer::new_for_http())
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn run(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(address = %addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM, then cancels `token`.
pub async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
        () = token.cancelled() => {}
    }
    info!("shutdown signal received");
    token.cancel();
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn graph<A: RouterApi>(State(state): State<AppState<A>>) -> Response {
    let snapshot = async {
        match state.snapshot_timeout {
            Some(wait) => state.poller.snapshot_timeout(wait).await,
            None => Ok(state.poller.snapshot().await),
        }
    };

    let result = tokio::select! {
        result = snapshot => result,
        () = state.shutdown.cancelled() => {
            return unavailable("server is shutting down");
        }
    };

    match result {
        Ok(view) => Json(view).into_response(),
        Err(e) => unavailable(&e.to_string()),
    }
}

async fn status<A: RouterApi>(State(state): State<AppState<A>>) -> Response {
    Json(state.poller.current_status()).into_response()
}

fn unavailable(message: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": message })),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::{self, Body};
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use wifiscope_api::{DhcpLease, RegistrationEntry, WifiInterface, WifiRadio};
    use wifiscope_core::PollerConfig;

    /// Answers every table with one fixed client on `wifi1`.
    struct OneClient {
        reachable: bool,
    }

    impl OneClient {
        fn check(&self) -> Result<(), wifiscope_api::Error> {
            if self.reachable {
                Ok(())
            } else {
                Err(wifiscope_api::Error::Api {
                    status: 503,
                    message: "unreachable".into(),
                })
            }
        }
    }

    impl RouterApi for OneClient {
        async fn dhcp_leases(&self) -> Result<Vec<DhcpLease>, wifiscope_api::Error> {
            self.check()?;
            Ok(vec![DhcpLease {
                mac_address: "AA:BB".into(),
                active_address: "10.0.0.5".into(),
                host_name: "phone".into(),
                ..DhcpLease::default()
            }])
        }

        async fn registration_table(
            &self,
        ) -> Result<Vec<RegistrationEntry>, wifiscope_api::Error> {
            self.check()?;
            Ok(vec![RegistrationEntry {
                mac_address: "AA:BB".into(),
                interface: "wifi1".into(),
                signal: "-50".into(),
                ssid: "Home".into(),
                ..RegistrationEntry::default()
            }])
        }

        async fn wifi_radios(&self) -> Result<Vec<WifiRadio>, wifiscope_api::Error> {
            self.check()?;
            Ok(vec![WifiRadio {
                radio_mac: "R1".into(),
                cap: "ax@5ghz".into(),
                ..WifiRadio::default()
            }])
        }

        async fn wifi_interfaces(&self) -> Result<Vec<WifiInterface>, wifiscope_api::Error> {
            self.check()?;
            Ok(vec![WifiInterface {
                name: "wifi1".into(),
                mac_address: "R1".into(),
                ..WifiInterface::default()
            }])
        }
    }

    fn state(reachable: bool, snapshot_timeout: Option<Duration>) -> AppState<OneClient> {
        AppState {
            poller: Poller::new(OneClient { reachable }, PollerConfig::default()),
            snapshot_timeout,
            shutdown: CancellationToken::new(),
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn graph_returns_client_object_keyed_by_mac() {
        let state = state(true, None);
        state.poller.start().await.unwrap();
        let app = router(state.clone(), None);

        let (status, body) = get_json(app, "/api/graph").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "AA:BB": {
                    "activeAddress": "10.0.0.5",
                    "hostName": "phone",
                    "macAddress": "AA:BB",
                    "rssi": "-50",
                    "ssid": "Home",
                    "cap": "ax",
                    "band": "",
                    "comment": ""
                }
            })
        );
        state.poller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn graph_is_unavailable_when_bounded_wait_elapses() {
        let state = state(false, Some(Duration::from_secs(5)));
        state.poller.start().await.unwrap();
        let app = router(state.clone(), None);

        let (status, body) = get_json(app, "/api/graph").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("5s"));
        state.poller.stop().await;
    }

    #[tokio::test]
    async fn shutdown_releases_waiting_graph_requests() {
        let state = state(false, None);
        let app = router(state.clone(), None);
        state.shutdown.cancel();

        let (status, body) = get_json(app, "/api/graph").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "server is shutting down");
    }

    #[tokio::test]
    async fn status_reports_not_ready_before_start() {
        let state = state(true, None);
        let (status, body) = get_json(router(state, None), "/api/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], false);
        assert_eq!(body["running"], false);
        assert_eq!(body["cycles"], 0);
    }

    #[tokio::test]
    async fn static_files_served_from_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>wifiscope</h1>").unwrap();
        let app = router(state(true, None), Some(dir.path()));

        let resp = app
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>wifiscope</h1>");
    }

    #[tokio::test]
    async fn unknown_path_without_static_dir_is_not_found() {
        let app = router(state(true, None), None);
        let resp = app
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
