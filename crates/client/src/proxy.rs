use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use unchained_types::endpoints;
use unchained_types::*;

use crate::{ClientError, Result, SimplicityService, DEFAULT_PROXY_URL};

/// HTTP implementation of [`SimplicityService`].
#[derive(Debug, Clone)]
pub struct ProxyApi {
    base_url: String,
    client: reqwest::Client,
}

impl ProxyApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req, Resp>(&self, endpoint: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                text
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

impl Default for ProxyApi {
    fn default() -> Self {
        Self::new(DEFAULT_PROXY_URL)
    }
}

#[async_trait]
impl SimplicityService for ProxyApi {
    async fn compile(&self, req: &CompileRequest) -> Result<CompileResponse> {
        self.post(endpoints::COMPILE, req).await
    }

    async fn convert(&self, req: &ConvertRequest) -> Result<ConvertResponse> {
        self.post(endpoints::CONVERT, req).await
    }

    async fn create_pset(&self, req: &CreatePsetRequest) -> Result<CreatePsetResponse> {
        self.post(endpoints::CREATE_PSET, req).await
    }

    async fn sighash_pset(&self, req: &SighashPsetRequest) -> Result<SighashResponse> {
        self.post(endpoints::SIGHASH_PSET, req).await
    }

    async fn simplicity_sign_pset(
        &self,
        req: &SimplicitySignPsetRequest,
    ) -> Result<SimplicitySignPsetResponse> {
        self.post(endpoints::SIMPLICITY_SIGN, req).await
    }

    async fn sign_pset(&self, req: &SignPsetRequest) -> Result<SignPsetResponse> {
        self.post(endpoints::SIGN_PSET, req).await
    }

    async fn finalize_pset(&self, req: &FinalizePsetRequest) -> Result<FinalizeResponse> {
        self.post(endpoints::FINALIZE, req).await
    }

    async fn create_psbt(&self, req: &CreatePsbtRequest) -> Result<CreatePsbtResponse> {
        self.post(endpoints::CREATE_PSBT, req).await
    }

    async fn sighash_psbt(&self, req: &SighashPsbtRequest) -> Result<SighashResponse> {
        self.post(endpoints::SIGHASH_PSBT, req).await
    }

    async fn simplicity_sign_psbt(
        &self,
        req: &SimplicitySignPsbtRequest,
    ) -> Result<SimplicitySignPsbtResponse> {
        self.post(endpoints::SIMPLICITY_SIGN_PSBT, req).await
    }

    async fn finalize_psbt(&self, req: &FinalizePsbtRequest) -> Result<FinalizeResponse> {
        self.post(endpoints::FINALIZE_PSBT, req).await
    }

    async fn tweak(&self, req: &TweakRequest) -> Result<TweakResponse> {
        self.post(endpoints::TWEAK, req).await
    }

    async fn sign_message(&self, req: &SignMessageRequest) -> Result<SignMessageResponse> {
        self.post(endpoints::SIGN_MESSAGE, req).await
    }

    async fn generate_keypair(&self) -> Result<KeypairResponse> {
        self.post(endpoints::GENERATE_KEYPAIR, &serde_json::json!({})).await
    }
}
