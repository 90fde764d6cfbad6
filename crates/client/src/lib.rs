//! Client for the compiler/signing service.
//!
//! [`SimplicityService`] lists every operation the toolkit needs from the
//! service. [`ProxyApi`] implements it over HTTP against the proxy routes.

mod proxy;

pub use proxy::ProxyApi;

use async_trait::async_trait;
use thiserror::Error;
use unchained_types::*;

/// Default base URL of the proxy routes.
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000/api/proxy";

/// Errors returned by service calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Non-success HTTP status; `message` is the response text or the
    /// status reason when the body is empty.
    #[error("Request failed: API Error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request failed: invalid response body: {0}")]
    Parse(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Operations offered by the compiler/signing service.
#[async_trait]
pub trait SimplicityService: Send + Sync {
    /// Compile SimplicityHL source, optionally satisfying it with a witness.
    async fn compile(&self, req: &CompileRequest) -> Result<CompileResponse>;

    /// Human-readable script to hex and P2WSH address.
    async fn convert(&self, req: &ConvertRequest) -> Result<ConvertResponse>;

    async fn create_pset(&self, req: &CreatePsetRequest) -> Result<CreatePsetResponse>;

    async fn sighash_pset(&self, req: &SighashPsetRequest) -> Result<SighashResponse>;

    /// Let the service run the program and add its signature.
    async fn simplicity_sign_pset(
        &self,
        req: &SimplicitySignPsetRequest,
    ) -> Result<SimplicitySignPsetResponse>;

    /// Sign with a caller-supplied secret key.
    async fn sign_pset(&self, req: &SignPsetRequest) -> Result<SignPsetResponse>;

    async fn finalize_pset(&self, req: &FinalizePsetRequest) -> Result<FinalizeResponse>;

    async fn create_psbt(&self, req: &CreatePsbtRequest) -> Result<CreatePsbtResponse>;

    async fn sighash_psbt(&self, req: &SighashPsbtRequest) -> Result<SighashResponse>;

    async fn simplicity_sign_psbt(
        &self,
        req: &SimplicitySignPsbtRequest,
    ) -> Result<SimplicitySignPsbtResponse>;

    async fn finalize_psbt(&self, req: &FinalizePsbtRequest) -> Result<FinalizeResponse>;

    /// Commitment root of a program and the key tweaked with it.
    async fn tweak(&self, req: &TweakRequest) -> Result<TweakResponse>;

    async fn sign_message(&self, req: &SignMessageRequest) -> Result<SignMessageResponse>;

    async fn generate_keypair(&self) -> Result<KeypairResponse>;
}
