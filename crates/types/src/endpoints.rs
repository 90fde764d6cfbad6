//! Paths of the proxy operations, relative to the proxy base URL.

pub const COMPILE: &str = "/compile";
pub const CONVERT: &str = "/convert";
pub const CREATE_PSET: &str = "/create-pset";
pub const CREATE_PSBT: &str = "/create-psbt";
pub const SIGHASH_PSET: &str = "/sighash-pset";
pub const SIGHASH_PSBT: &str = "/sighash-psbt";
pub const FINALIZE: &str = "/finalize";
pub const FINALIZE_PSBT: &str = "/finalize-psbt";
pub const SIMPLICITY_SIGN: &str = "/simplicity-sign";
pub const SIMPLICITY_SIGN_PSBT: &str = "/simplicity-sign-psbt";
pub const TWEAK: &str = "/tweak";
pub const SIGN_PSET: &str = "/sign-pset";
pub const SIGN_MESSAGE: &str = "/sign-message";
pub const GENERATE_KEYPAIR: &str = "/generate-keypair";

/// Mount point of the proxy routes on the demo server.
pub const PROXY_BASE_PATH: &str = "/api/proxy";
