//! A stand-in for a node's HTTP gateway. Accepts PFB/PFD submissions, checks
//! their shape and answers with a fake transaction result.
use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pfb_core::{constants::NAMESPACE_ID_HEX_SIZE, SubmitRequest, SubmitResponse};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct AppState {
    next_height: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(start_height: u64) -> Self {
        Self {
            next_height: Arc::new(AtomicU64::new(start_height)),
        }
    }

    /// Height the next accepted submission will be reported at.
    pub fn next_height(&self) -> u64 {
        self.next_height.load(Ordering::SeqCst)
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(Health { status: "ok" }) }))
        .route(
            "/submit_pfb",
            post({
                let state = state.clone();
                move |Json(req): Json<SubmitRequest>| {
                    let state = state.clone();
                    async move { accept(&state, "PFB", req) }
                }
            }),
        )
        .route(
            "/submit_pfd",
            post({
                let state = state.clone();
                move |Json(req): Json<SubmitRequest>| {
                    let state = state.clone();
                    async move { accept(&state, "PFD", req) }
                }
            }),
        )
        .layer(TraceLayer::new_for_http())
}

fn accept(
    state: &AppState,
    kind: &str,
    req: SubmitRequest,
) -> Result<Json<SubmitResponse>, (StatusCode, String)> {
    if let Err(reason) = validate(&req) {
        warn!(kind, %reason, "rejecting submission");
        return Err((StatusCode::BAD_REQUEST, reason));
    }
    let height = state.next_height.fetch_add(1, Ordering::SeqCst);
    let txhash = tx_hash(&req);
    info!(kind, height, %txhash, namespace_id = %req.namespace_id, "accepted submission");
    Ok(Json(SubmitResponse { height, txhash }))
}

/// Checks the namespace ID is 8 hex-encoded bytes and the data is non-empty hex.
pub fn validate(req: &SubmitRequest) -> Result<(), String> {
    if req.namespace_id.len() != NAMESPACE_ID_HEX_SIZE || hex::decode(&req.namespace_id).is_err() {
        return Err(format!(
            "namespace_id must be {NAMESPACE_ID_HEX_SIZE} hex characters"
        ));
    }
    if req.data.is_empty() {
        return Err("data must not be empty".to_string());
    }
    if hex::decode(&req.data).is_err() {
        return Err("data must be hex encoded".to_string());
    }
    Ok(())
}

/// Uppercase hex SHA-256 of the request's JSON encoding.
pub fn tx_hash(req: &SubmitRequest) -> String {
    let bytes = serde_json::to_vec(req).unwrap_or_default();
    hex::encode_upper(Sha256::digest(&bytes))
}

/// Bind `addr` and serve the gateway in the background. Pass port 0 to get an
/// ephemeral port; the bound address is returned.
pub async fn spawn(addr: SocketAddr, state: AppState) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(state)).await {
            warn!("gateway stopped: {e}");
        }
    });
    Ok(local)
}
