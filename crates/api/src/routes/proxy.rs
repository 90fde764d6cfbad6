//! Forwarding endpoints under `/api/proxy`
//!
//! Each route relays its JSON body unchanged to one fixed upstream path.
//! Upstream errors keep their status; anything that breaks on the way
//! (bad JSON, unreachable upstream, non-JSON success body) becomes a 500
//! with the route's fixed message.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::{debug, error, warn};
use unchained_types::endpoints;

use crate::{error::ApiError, state::AppState};

const SERVICE_PREFIX: &str = "/simplicity-unchained";
const WEB_PROXY_PREFIX: &str = "/simplicity-unchained-web-proxy-demo";

/// Which backend a route forwards to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Service,
    WebProxy,
}

impl Upstream {
    fn prefix(self) -> &'static str {
        match self {
            Upstream::Service => SERVICE_PREFIX,
            Upstream::WebProxy => WEB_PROXY_PREFIX,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProxyRoute {
    /// Path below `/api/proxy`
    pub path: &'static str,
    pub upstream: Upstream,
    /// Path below the upstream prefix
    pub upstream_path: &'static str,
    /// Used when a failed upstream response carries no message
    pub default_error: &'static str,
    /// Returned with 500 when forwarding itself fails
    pub failure_message: &'static str,
}

impl ProxyRoute {
    pub fn upstream_url(&self, state: &AppState) -> String {
        format!(
            "{}{}{}",
            state.base_url(self.upstream),
            self.upstream.prefix(),
            self.upstream_path
        )
    }
}

const fn service(
    path: &'static str,
    default_error: &'static str,
    failure_message: &'static str,
) -> ProxyRoute {
    ProxyRoute {
        path,
        upstream: Upstream::Service,
        upstream_path: path,
        default_error,
        failure_message,
    }
}

const fn web_proxy(
    path: &'static str,
    upstream_path: &'static str,
    default_error: &'static str,
    failure_message: &'static str,
) -> ProxyRoute {
    ProxyRoute {
        path,
        upstream: Upstream::WebProxy,
        upstream_path,
        default_error,
        failure_message,
    }
}

pub const ROUTES: &[ProxyRoute] = &[
    web_proxy(endpoints::FINALIZE, "/finalize", "Failed to finalize PSET", "Internal server error"),
    web_proxy(
        endpoints::SIGN_MESSAGE,
        "/sign_message",
        "Sign message request failed",
        "Failed to process sign message request",
    ),
    web_proxy(
        endpoints::SIGN_PSET,
        "/sign_pset",
        "Sign PSET request failed",
        "Failed to process sign PSET request",
    ),
    web_proxy(
        endpoints::GENERATE_KEYPAIR,
        "/generate_keypair",
        "Keypair generation failed",
        "Failed to process keypair request",
    ),
    service(endpoints::TWEAK, "Tweak request failed", "Failed to process tweak request"),
    service(endpoints::COMPILE, "Compile request failed", "Failed to process compile request"),
    service(endpoints::CONVERT, "Convert request failed", "Failed to process convert request"),
    service(
        endpoints::CREATE_PSET,
        "Create PSET request failed",
        "Failed to process create PSET request",
    ),
    service(
        endpoints::CREATE_PSBT,
        "Create PSBT request failed",
        "Failed to process create PSBT request",
    ),
    service(endpoints::SIGHASH_PSET, "Sighash request failed", "Failed to process sighash request"),
    service(endpoints::SIGHASH_PSBT, "Sighash request failed", "Failed to process sighash request"),
    service(endpoints::FINALIZE_PSBT, "Failed to finalize PSBT", "Internal server error"),
    service(
        endpoints::SIMPLICITY_SIGN,
        "Simplicity sign request failed",
        "Failed to process simplicity sign request",
    ),
    service(
        endpoints::SIMPLICITY_SIGN_PSBT,
        "Simplicity sign request failed",
        "Failed to process simplicity sign request",
    ),
];

/// One POST route per [`ROUTES`] entry.
pub fn router() -> Router<AppState> {
    ROUTES.iter().fold(Router::new(), |router, route| {
        router.route(
            route.path,
            post(move |State(state): State<AppState>, body: Bytes| async move {
                forward(&state, route, body).await
            }),
        )
    })
}

async fn forward(state: &AppState, route: &ProxyRoute, body: Bytes) -> Result<Response, ApiError> {
    match relay(state, route, body).await {
        Ok(Relayed::Success(status, data)) => Ok((status, Json(data)).into_response()),
        Ok(Relayed::Failure(status, text)) => {
            let message = upstream_error_message(&text).unwrap_or_else(|| route.default_error.to_string());
            warn!("Upstream {} returned {}: {}", route.upstream_path, status, message);
            Err(ApiError::Upstream { status, message })
        }
        Err(e) => {
            error!("Proxy error on {}: {:#}", route.path, e);
            Err(ApiError::InternalError(route.failure_message.to_string()))
        }
    }
}

enum Relayed {
    Success(StatusCode, Value),
    Failure(StatusCode, String),
}

async fn relay(state: &AppState, route: &ProxyRoute, body: Bytes) -> anyhow::Result<Relayed> {
    let payload: Value = serde_json::from_slice(&body)?;
    let url = route.upstream_url(state);
    debug!("Forwarding {} to {}", route.path, url);

    let response = state.client.post(&url).json(&payload).send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Ok(Relayed::Failure(status, text));
    }
    Ok(Relayed::Success(status, serde_json::from_str(&text)?))
}

/// The `error` string of a JSON error body, else the raw body if non-blank.
fn upstream_error_message(body: &str) -> Option<String> {
    let from_json = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.as_str().map(str::to_string));
    from_json.or_else(|| (!body.trim().is_empty()).then(|| body.to_string()))
}
