//! Shared application state for the proxy server

use crate::routes::proxy::Upstream;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// HTTP client reused across forwarded requests
    pub client: reqwest::Client,
    /// Base URL of the Simplicity service
    pub service_url: String,
    /// Base URL of the signing web proxy
    pub web_proxy_url: String,
}

impl AppState {
    pub fn new(service_url: impl Into<String>, web_proxy_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            service_url: service_url.into().trim_end_matches('/').to_string(),
            web_proxy_url: web_proxy_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self, upstream: Upstream) -> &str {
        match upstream {
            Upstream::Service => &self.service_url,
            Upstream::WebProxy => &self.web_proxy_url,
        }
    }
}
