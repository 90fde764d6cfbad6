//! User-facing actions over the store.
//!
//! Each action validates its input, calls the service, records the outcome
//! in the activity log and raises a toast. Errors are also returned so
//! callers can decide their exit status.

use std::sync::Arc;
use tracing::{debug, info, warn};
use unchained_bitcoin::{EsploraClient, Explorer};
use unchained_client::{ProxyApi, SimplicityService};
use unchained_types::{
    BroadcastResult, CompileRequest, ConvertRequest, KeypairResponse, SignMessageRequest,
    SignMessageResponse, TweakRequest, WitnessValues,
};

use crate::config::AppConfig;
use crate::error::{OrchestrationError, Result};
use crate::presets::PresetLoader;
use crate::store::AppStore;
use crate::workflow::{SendParams, SendState, SendWorkflow};

pub struct Controller {
    config: AppConfig,
    store: AppStore,
    service: Arc<dyn SimplicityService>,
    explorer: Arc<dyn Explorer>,
    workflow: SendWorkflow,
    presets: PresetLoader,
}

impl Controller {
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AppStore {
        &mut self.store
    }

    pub fn send_state(&self) -> SendState {
        self.workflow.state()
    }

    pub fn workflow(&self) -> &SendWorkflow {
        &self.workflow
    }

    /// Compile the program buffer, then ask for the tweaked key.
    ///
    /// The witness buffer is only sent when `include_witness` is set and it
    /// is non-blank. A failed tweak is logged and does not fail the compile.
    pub async fn compile_program(&mut self, include_witness: bool) -> Result<()> {
        let state = self.store.state();
        if state.simplicity_program.trim().is_empty() {
            let message = "Please enter a Simplicity program (simf is required)";
            self.store.show_notification(message, false);
            return Err(OrchestrationError::Validation(message.to_string()));
        }

        let witness = if include_witness && !state.simplicity_witness.trim().is_empty() {
            match WitnessValues::parse(&state.simplicity_witness) {
                Ok(values) => Some(values),
                Err(e) => {
                    warn!("Rejected witness: {}", e);
                    self.store.show_notification("Invalid witness JSON format", true);
                    return Err(e.into());
                }
            }
        } else {
            None
        };

        let request = CompileRequest {
            script: state.simplicity_program.clone(),
            include_debug: false,
            witness,
            environment: Some(self.config.environment),
        };

        let compiled = match self.service.compile(&request).await {
            Ok(compiled) => compiled,
            Err(e) => {
                self.store
                    .add_log(format!("Failed to compile Simplicity program: {}", e));
                self.store
                    .show_notification("Failed to compile Simplicity program", true);
                return Err(e.into());
            }
        };
        debug!("Compiled program: {}", compiled.program_base64);

        let tweak = self
            .service
            .tweak(&TweakRequest {
                program: compiled.program_base64.clone(),
                jet_env: self.config.environment,
            })
            .await;
        let tweaked_public_key = match tweak {
            Ok(tweak) => {
                debug!("CMR: {}", tweak.cmr_hex);
                Some(tweak.tweaked_public_key_hex)
            }
            Err(e) => {
                self.store
                    .add_log(format!("Failed to compute tweaked public key: {}", e));
                None
            }
        };

        self.store.save_program(
            &compiled.program_base64,
            compiled.witness_base64.as_deref().unwrap_or_default(),
            tweaked_public_key.as_deref(),
            include_witness,
        );
        Ok(())
    }

    /// Compile the script buffer into its P2WSH form.
    pub async fn convert_script(&mut self) -> Result<()> {
        let script = self.store.state().bitcoin_script.clone();
        if script.trim().is_empty() {
            let message = "Please enter a Bitcoin script";
            self.store.show_notification(message, false);
            return Err(OrchestrationError::Validation(message.to_string()));
        }

        let request = ConvertRequest {
            script,
            network: self.config.network,
        };
        match self.service.convert(&request).await {
            Ok(converted) => {
                debug!("Script hex: {}", converted.hex);
                self.store.save_script(&converted.hex, &converted.address);
                Ok(())
            }
            Err(e) => {
                self.store
                    .add_log(format!("Failed to compile Bitcoin script: {}", e));
                self.store
                    .show_notification("Failed to compile Bitcoin script", true);
                Err(e.into())
            }
        }
    }

    /// Generate a keypair and put its secret into the cosign key field.
    pub async fn generate_keypair(&mut self) -> Result<KeypairResponse> {
        match self.service.generate_keypair().await {
            Ok(keypair) => {
                let state = self.store.state();
                let (hash, index) = (
                    state.input_transaction_hash.clone(),
                    state.input_index.clone(),
                );
                self.store
                    .update_transaction_form(hash, index, keypair.secret_key.clone());
                self.store
                    .add_log(format!("Keypair generated - Public Key: {}", keypair.public_key));
                self.store
                    .show_notification("Keypair generated successfully", false);
                Ok(keypair)
            }
            Err(e) => {
                self.store
                    .add_log(format!("Failed to generate keypair: {}", e));
                self.store
                    .show_notification("Failed to generate keypair", true);
                Err(e.into())
            }
        }
    }

    /// Sign `message` with the cosign key. In text mode the UTF-8 bytes are
    /// hex-encoded first; in hex mode the message is sent as typed.
    pub async fn sign_message(
        &mut self,
        message: &str,
        hex_mode: bool,
    ) -> Result<SignMessageResponse> {
        if message.trim().is_empty() {
            let text = "Please enter a message to sign";
            self.store.show_notification(text, true);
            return Err(OrchestrationError::Validation(text.to_string()));
        }
        let secret_key_hex = self.store.state().cosign_secret_key.clone();
        if secret_key_hex.is_empty() {
            let text = "Please enter a secret key";
            self.store.show_notification(text, true);
            return Err(OrchestrationError::Validation(text.to_string()));
        }

        let message = if hex_mode {
            message.to_string()
        } else {
            hex::encode(message.as_bytes())
        };

        let request = SignMessageRequest {
            message,
            secret_key_hex,
        };
        match self.service.sign_message(&request).await {
            Ok(signed) => {
                self.store.add_log("Message signed successfully");
                self.store
                    .add_log(format!("Message Hash: {}", signed.digest_hex));
                self.store
                    .add_log(format!("Signature: {}", signed.signature_hex));
                debug!("Signing public key: {}", signed.public_key_hex);
                self.store
                    .show_notification("Message signed successfully!", false);
                Ok(signed)
            }
            Err(e) => {
                self.store.add_log(format!("Failed to sign message: {}", e));
                self.store.show_notification("Failed to sign message", true);
                Err(e.into())
            }
        }
    }

    /// Run the five-step send.
    pub async fn send_transaction(&mut self) -> Result<BroadcastResult> {
        let params = SendParams {
            network: self.config.network,
            send_amount: self.config.send_amount,
            fee_amount: self.config.fee_amount,
            resolve_prevouts: self.config.resolve_prevouts,
        };
        self.workflow
            .run(
                &mut self.store,
                self.service.as_ref(),
                self.explorer.as_ref(),
                &params,
            )
            .await
    }

    /// Replace both program buffers with a bundled preset. A preset without a
    /// witness file clears the witness buffer.
    pub async fn load_program_preset(&mut self, file_name: &str) -> Result<()> {
        let preset = self.presets.load_program(file_name).await?;
        self.store.update_program(preset.source);
        self.store
            .update_witness(preset.witness.unwrap_or_default());
        info!("Loaded program preset {}", file_name);
        Ok(())
    }

    pub async fn load_script_preset(&mut self, file_name: &str) -> Result<()> {
        let script = self.presets.load_script(file_name).await?;
        self.store.update_script(script);
        info!("Loaded script preset {}", file_name);
        Ok(())
    }
}

/// Builder for [`Controller`]. Unset collaborators are created from the
/// config.
pub struct ControllerBuilder {
    config: Option<AppConfig>,
    service: Option<Arc<dyn SimplicityService>>,
    explorer: Option<Arc<dyn Explorer>>,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            service: None,
            explorer: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_service(mut self, service: Arc<dyn SimplicityService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_explorer(mut self, explorer: Arc<dyn Explorer>) -> Self {
        self.explorer = Some(explorer);
        self
    }

    pub fn build(self) -> Result<Controller> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let service: Arc<dyn SimplicityService> = match self.service {
            Some(service) => service,
            None => Arc::new(ProxyApi::new(config.proxy_url.clone())),
        };
        let explorer: Arc<dyn Explorer> = match (self.explorer, &config.explorer_url) {
            (Some(explorer), _) => explorer,
            (None, Some(url)) => Arc::new(EsploraClient::with_api_url(config.network, url.clone())),
            (None, None) => Arc::new(EsploraClient::new(config.network)?),
        };

        Ok(Controller {
            store: AppStore::new(config.notification_ttl),
            presets: PresetLoader::new(config.presets_dir.clone()),
            workflow: SendWorkflow::new(),
            service,
            explorer,
            config,
        })
    }
}

impl Default for ControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::watch;
    use unchained_bitcoin::ExplorerError;
    use unchained_client::{ClientError, Result as ClientResult};
    use unchained_types::*;

    const SIG: &str = "0x00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000";

    /// Records each call and fails the named one.
    #[derive(Default)]
    struct FakeService {
        calls: Mutex<Vec<&'static str>>,
        fail: Option<&'static str>,
        requests: Mutex<Vec<serde_json::Value>>,
        /// Workflow state seen by each call, once `observe` is set.
        observer: Mutex<Option<watch::Receiver<SendState>>>,
        states: Mutex<Vec<(&'static str, SendState)>>,
    }

    impl FakeService {
        fn failing(step: &'static str) -> Self {
            Self {
                fail: Some(step),
                ..Default::default()
            }
        }

        fn observe(&self, rx: watch::Receiver<SendState>) {
            *self.observer.lock().unwrap() = Some(rx);
        }

        fn call<T>(&self, name: &'static str, req: impl serde::Serialize, ok: T) -> ClientResult<T> {
            self.calls.lock().unwrap().push(name);
            if let Some(rx) = self.observer.lock().unwrap().as_ref() {
                self.states.lock().unwrap().push((name, *rx.borrow()));
            }
            self.requests
                .lock()
                .unwrap()
                .push(serde_json::to_value(req).unwrap());
            if self.fail == Some(name) {
                return Err(ClientError::Api {
                    status: 500,
                    message: format!("{} exploded", name),
                });
            }
            Ok(ok)
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn last_request(&self) -> serde_json::Value {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl SimplicityService for FakeService {
        async fn compile(&self, req: &CompileRequest) -> ClientResult<CompileResponse> {
            let witness = req.witness.as_ref().map(|_| "d2l0bmVzcw==".to_string());
            self.call("compile", req, CompileResponse {
                program_base64: "cHJvZ3JhbQ==".into(),
                witness_base64: witness,
            })
        }

        async fn convert(&self, req: &ConvertRequest) -> ClientResult<ConvertResponse> {
            self.call("convert", req, ConvertResponse {
                hex: "5221".into(),
                address: "tex1qaddress".into(),
            })
        }

        async fn create_pset(&self, req: &CreatePsetRequest) -> ClientResult<CreatePsetResponse> {
            self.call("create_pset", req, CreatePsetResponse {
                asset: "bitcoin".into(),
                inputs: 1,
                network: "testnet".into(),
                outputs: 2,
                pset: "pset-1".into(),
            })
        }

        async fn sighash_pset(&self, req: &SighashPsetRequest) -> ClientResult<SighashResponse> {
            self.call("sighash_pset", req, SighashResponse::default())
        }

        async fn simplicity_sign_pset(
            &self,
            req: &SimplicitySignPsetRequest,
        ) -> ClientResult<SimplicitySignPsetResponse> {
            self.call("simplicity_sign_pset", req, SimplicitySignPsetResponse {
                pset_hex: "pset-2".into(),
                signature_hex: String::new(),
                public_key_hex: String::new(),
                input_index: 0,
                partial_sigs_count: 1,
            })
        }

        async fn sign_pset(&self, req: &SignPsetRequest) -> ClientResult<SignPsetResponse> {
            self.call("sign_pset", req, SignPsetResponse {
                pset: "pset-3".into(),
                partial_sigs_count: 2,
            })
        }

        async fn finalize_pset(&self, req: &FinalizePsetRequest) -> ClientResult<FinalizeResponse> {
            self.call("finalize_pset", req, FinalizeResponse {
                finalized: true,
                inputs: 1,
                outputs: 2,
                transaction_hex: "0200".into(),
                txid: "ab".repeat(32),
                witnesses: vec![],
            })
        }

        async fn create_psbt(&self, req: &CreatePsbtRequest) -> ClientResult<CreatePsbtResponse> {
            self.call("create_psbt", req, CreatePsbtResponse::default())
        }

        async fn sighash_psbt(&self, req: &SighashPsbtRequest) -> ClientResult<SighashResponse> {
            self.call("sighash_psbt", req, SighashResponse::default())
        }

        async fn simplicity_sign_psbt(
            &self,
            req: &SimplicitySignPsbtRequest,
        ) -> ClientResult<SimplicitySignPsbtResponse> {
            self.call("simplicity_sign_psbt", req, SimplicitySignPsbtResponse::default())
        }

        async fn finalize_psbt(&self, req: &FinalizePsbtRequest) -> ClientResult<FinalizeResponse> {
            self.call("finalize_psbt", req, FinalizeResponse::default())
        }

        async fn tweak(&self, req: &TweakRequest) -> ClientResult<TweakResponse> {
            self.call("tweak", req, TweakResponse {
                cmr_hex: "cc".repeat(32),
                tweaked_public_key_hex: "02abcd".into(),
            })
        }

        async fn sign_message(&self, req: &SignMessageRequest) -> ClientResult<SignMessageResponse> {
            self.call("sign_message", req, SignMessageResponse {
                digest_hex: "dd".into(),
                signature_hex: "ee".into(),
                public_key_hex: "ff".into(),
            })
        }

        async fn generate_keypair(&self) -> ClientResult<KeypairResponse> {
            self.call("generate_keypair", serde_json::json!({}), KeypairResponse {
                secret_key: "11".repeat(32),
                public_key: "02".to_string() + &"22".repeat(32),
            })
        }
    }

    struct FakeExplorer {
        reject: bool,
    }

    #[async_trait]
    impl Explorer for FakeExplorer {
        fn network(&self) -> Network {
            Network::LiquidTestnet
        }

        async fn broadcast_tx(&self, _tx_hex: &str) -> std::result::Result<BroadcastResult, ExplorerError> {
            if self.reject {
                return Err(ExplorerError::Broadcast {
                    status: 400,
                    body: "bad-txns".into(),
                });
            }
            let txid = "ab".repeat(32);
            Ok(BroadcastResult {
                explorer_url: Network::LiquidTestnet.tx_url(&txid),
                txid,
            })
        }

        async fn get_prevout(&self, _txid: &str, _vout: u32) -> std::result::Result<UtxoData, ExplorerError> {
            Ok(UtxoData {
                asset: None,
                value: 100_000,
                scriptpubkey: "0020".into(),
            })
        }
    }

    fn controller(service: Arc<FakeService>, reject: bool) -> Controller {
        let config = AppConfig::builder()
            .network(Network::LiquidTestnet)
            .presets_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/../../presets"))
            .build();
        ControllerBuilder::new()
            .with_config(config)
            .with_service(service)
            .with_explorer(Arc::new(FakeExplorer { reject }))
            .build()
            .unwrap()
    }

    fn witness_json() -> String {
        format!(r#"{{"SIG": {{"value": "{}", "type": "Signature"}}}}"#, SIG)
    }

    async fn ready(controller: &mut Controller) {
        controller.store_mut().update_program("fn main() {}");
        controller.store_mut().update_witness(witness_json());
        controller.compile_program(true).await.unwrap();
        controller.store_mut().update_script("OP_2 OP_CHECKMULTISIG");
        controller.convert_script().await.unwrap();
        controller
            .store_mut()
            .update_transaction_form("ab".repeat(32), "0", "11".repeat(32));
    }

    fn log_messages(controller: &Controller) -> Vec<String> {
        controller
            .store()
            .state()
            .logs
            .iter()
            .map(|l| l.message.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_compile_saves_program_and_tweak() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service.clone(), false);
        controller.store_mut().update_program("fn main() {}");
        controller.store_mut().update_witness(witness_json());

        controller.compile_program(true).await.unwrap();

        let state = controller.store().state();
        assert!(state.saved_simplicity_program);
        assert!(state.witness_included_for_transaction);
        assert_eq!(state.compiled_witness_base64, "d2l0bmVzcw==");
        assert_eq!(state.tweaked_public_key, "02abcd");
        assert_eq!(service.calls(), vec!["compile", "tweak"]);
        assert_eq!(service.last_request()["jet_env"], "elements");
    }

    #[tokio::test]
    async fn test_compile_without_witness_skips_buffer() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service.clone(), false);
        controller.store_mut().update_program("fn main() {}");
        controller.store_mut().update_witness("not json");

        controller.compile_program(false).await.unwrap();

        let state = controller.store().state();
        assert!(state.saved_simplicity_program);
        assert!(!state.witness_included_for_transaction);
        assert_eq!(state.compiled_witness_base64, "");
    }

    #[tokio::test]
    async fn test_compile_rejects_empty_program_and_bad_witness() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service.clone(), false);

        let err = controller.compile_program(true).await.unwrap_err();
        assert!(matches!(err, OrchestrationError::Validation(_)));

        controller.store_mut().update_program("fn main() {}");
        controller.store_mut().update_witness("{broken");
        let err = controller.compile_program(true).await.unwrap_err();
        assert!(matches!(err, OrchestrationError::Witness(_)));

        let toasts = controller.store().notifications();
        assert_eq!(toasts.len(), 2);
        assert!(!toasts[0].is_error);
        assert_eq!(toasts[1].message, "Invalid witness JSON format");
        assert!(toasts[1].is_error);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_tweak_failure_still_saves() {
        let service = Arc::new(FakeService::failing("tweak"));
        let mut controller = controller(service, false);
        controller.store_mut().update_program("fn main() {}");

        controller.compile_program(false).await.unwrap();

        let state = controller.store().state();
        assert!(state.saved_simplicity_program);
        assert_eq!(state.tweaked_public_key, "");
        let logs = log_messages(&controller);
        assert!(logs[0].starts_with("Failed to compute tweaked public key: "));
        assert_eq!(logs[1], "Simplicity program compiled and saved successfully");
    }

    #[tokio::test]
    async fn test_compile_failure_logs_and_toasts() {
        let service = Arc::new(FakeService::failing("compile"));
        let mut controller = controller(service, false);
        controller.store_mut().update_program("fn main() {}");

        assert!(controller.compile_program(false).await.is_err());
        assert!(!controller.store().state().saved_simplicity_program);
        assert_eq!(
            log_messages(&controller),
            vec!["Failed to compile Simplicity program: Request failed: API Error (500): compile exploded"]
        );
        let toasts = controller.store().notifications();
        assert!(toasts[0].is_error);
    }

    #[tokio::test]
    async fn test_convert_script() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service.clone(), false);
        assert!(controller.convert_script().await.is_err());

        controller.store_mut().update_script("OP_2 OP_CHECKMULTISIG");
        controller.convert_script().await.unwrap();

        let state = controller.store().state();
        assert!(state.saved_bitcoin_script);
        assert_eq!(state.compiled_address, "tex1qaddress");
        assert_eq!(service.last_request()["network"], "liquid_testnet");
        assert_eq!(
            log_messages(&controller),
            vec!["Bitcoin script compiled - Address: tex1qaddress"]
        );
    }

    #[tokio::test]
    async fn test_generate_keypair_fills_cosign_key() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service, false);
        controller.store_mut().update_transaction_form("aa", "1", "");

        let keypair = controller.generate_keypair().await.unwrap();

        let state = controller.store().state();
        assert_eq!(state.cosign_secret_key, keypair.secret_key);
        assert_eq!(state.input_transaction_hash, "aa");
        assert_eq!(state.input_index, "1");
        assert!(log_messages(&controller)[0].starts_with("Keypair generated - Public Key: 02"));
    }

    #[tokio::test]
    async fn test_sign_message_hex_encodes_text() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service.clone(), false);

        assert!(controller.sign_message("hi", false).await.is_err());
        controller.store_mut().update_transaction_form("", "", "11".repeat(32));

        controller.sign_message("hi", false).await.unwrap();
        assert_eq!(service.last_request()["message"], "6869");

        controller.sign_message("cafe", true).await.unwrap();
        assert_eq!(service.last_request()["message"], "cafe");

        let logs = log_messages(&controller);
        assert_eq!(
            &logs[..3],
            &["Message signed successfully", "Message Hash: dd", "Signature: ee"]
        );
    }

    #[tokio::test]
    async fn test_send_transaction_happy_path() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service.clone(), false);
        ready(&mut controller).await;

        let result = controller.send_transaction().await.unwrap();

        assert_eq!(controller.send_state(), SendState::Done);
        assert!(result.explorer_url.ends_with("?expand"));
        assert_eq!(
            &service.calls()[3..],
            &["create_pset", "simplicity_sign_pset", "sign_pset", "finalize_pset"]
        );

        let logs = log_messages(&controller);
        let tail: Vec<_> = logs.iter().skip(2).map(String::as_str).collect();
        assert_eq!(tail[0], "PSET created with 1 input(s) and 2 output(s)");
        assert_eq!(tail[1], "Simplicity signature added (1 partial signature(s))");
        assert_eq!(tail[2], "Cosign signature added (2 partial signature(s))");
        assert_eq!(tail[3], "Finalized transaction hex: 0200");
        assert_eq!(tail[4], "Transaction broadcast successfully!");
        assert_eq!(tail[5], format!("View transaction: {}", result.explorer_url));

        let toasts = controller.store().notifications();
        assert_eq!(toasts.last().unwrap().message, "Transaction sent successfully!");
    }

    #[tokio::test]
    async fn test_send_builds_expected_pset_request() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service.clone(), false);
        ready(&mut controller).await;
        controller.send_transaction().await.unwrap();

        let requests = service.requests.lock().unwrap().clone();
        let create = &requests[3];
        assert_eq!(create["inputs"][0], format!("{}:0", "ab".repeat(32)));
        assert_eq!(create["outputs"][0], "tex1qaddress:99000");
        assert_eq!(create["outputs"][1], "fee:1000");
        assert!(create["asset_id"].is_null());
        assert!(create.get("utxos").is_none());
        assert_eq!(requests[4]["pset_hex"], "pset-1");
        assert_eq!(requests[4]["witness"], "d2l0bmVzcw==");
        assert_eq!(requests[5]["pset_hex"], "pset-2");
        assert_eq!(requests[6]["pset_hex"], "pset-3");
    }

    #[tokio::test]
    async fn test_send_stops_after_failed_cosign() {
        let service = Arc::new(FakeService::failing("sign_pset"));
        let mut controller = controller(service.clone(), false);
        ready(&mut controller).await;

        let err = controller.send_transaction().await.unwrap_err();

        assert!(matches!(err, OrchestrationError::Service(_)));
        assert_eq!(controller.send_state(), SendState::Failed);
        assert!(!service.calls().contains(&"finalize_pset"));
        let logs = log_messages(&controller);
        assert_eq!(
            logs.last().unwrap(),
            "Transaction failed: Request failed: API Error (500): sign_pset exploded"
        );
        let toast = controller.store().notifications().pop().unwrap();
        assert_eq!(toast.message, "Transaction failed");
        assert!(toast.is_error);

        // A fresh attempt starts over from step one.
        service.calls.lock().unwrap().clear();
        assert!(controller.send_transaction().await.is_err());
        assert_eq!(service.calls()[0], "create_pset");
    }

    #[tokio::test]
    async fn test_send_broadcast_rejection() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service, true);
        ready(&mut controller).await;

        let err = controller.send_transaction().await.unwrap_err();
        assert!(matches!(err, OrchestrationError::Broadcast(_)));
        assert_eq!(
            log_messages(&controller).last().unwrap(),
            "Transaction failed: Failed to broadcast transaction: Broadcast failed (400): bad-txns"
        );
    }

    #[tokio::test]
    async fn test_send_guard() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service.clone(), false);

        let err = controller.send_transaction().await.unwrap_err();
        assert!(matches!(err, OrchestrationError::NotReady(_)));
        assert_eq!(controller.send_state(), SendState::Idle);
        let toast = controller.store().notifications().pop().unwrap();
        assert_eq!(
            toast.message,
            "Simplicity Program not compiled, Bitcoin Script not compiled, Witness not included in compilation"
        );
        assert!(!toast.is_error);

        ready(&mut controller).await;
        controller.store_mut().update_transaction_form("", "0", "11");
        let err = controller.send_transaction().await.unwrap_err();
        assert!(matches!(err, OrchestrationError::Validation(_)));
        assert!(!service.calls().contains(&"create_pset"));
    }

    #[tokio::test]
    async fn test_send_refused_while_in_flight() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service.clone(), false);
        ready(&mut controller).await;
        let calls_before = service.calls();

        controller.workflow().transition(SendState::Cosigning);
        let err = controller.send_transaction().await.unwrap_err();

        assert!(matches!(err, OrchestrationError::InvalidState(_)));
        assert_eq!(controller.send_state(), SendState::Cosigning);
        assert_eq!(service.calls(), calls_before);
        assert!(!log_messages(&controller)
            .iter()
            .any(|l| l.starts_with("Transaction failed")));
    }

    #[tokio::test]
    async fn test_each_step_runs_in_its_state() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service.clone(), false);
        ready(&mut controller).await;
        service.observe(controller.workflow().subscribe());

        controller.send_transaction().await.unwrap();

        assert_eq!(
            *service.states.lock().unwrap(),
            vec![
                ("create_pset", SendState::CreatingTransaction),
                ("simplicity_sign_pset", SendState::ProgramSigning),
                ("sign_pset", SendState::Cosigning),
                ("finalize_pset", SendState::Finalizing),
            ]
        );
        assert_eq!(controller.send_state(), SendState::Done);
    }

    #[tokio::test]
    async fn test_cosign_failure_stops_in_cosigning() {
        let service = Arc::new(FakeService::failing("sign_pset"));
        let mut controller = controller(service.clone(), false);
        ready(&mut controller).await;
        service.observe(controller.workflow().subscribe());

        assert!(controller.send_transaction().await.is_err());

        let states = service.states.lock().unwrap().clone();
        assert_eq!(states.last(), Some(&("sign_pset", SendState::Cosigning)));
        assert_eq!(states.len(), 3);
        assert_eq!(controller.send_state(), SendState::Failed);
        assert!(!log_messages(&controller)
            .iter()
            .any(|l| l.starts_with("Finalized transaction hex:")));
    }

    #[tokio::test]
    async fn test_send_with_prevouts() {
        let service = Arc::new(FakeService::default());
        let config = AppConfig::builder()
            .network(Network::LiquidTestnet)
            .resolve_prevouts(true)
            .build();
        let mut controller = ControllerBuilder::new()
            .with_config(config)
            .with_service(service.clone())
            .with_explorer(Arc::new(FakeExplorer { reject: false }))
            .build()
            .unwrap();
        ready(&mut controller).await;

        controller.send_transaction().await.unwrap();
        let create = service.requests.lock().unwrap()[3].clone();
        assert_eq!(create["utxos"][0]["value"], 100_000);
    }

    #[tokio::test]
    async fn test_load_presets() {
        let service = Arc::new(FakeService::default());
        let mut controller = controller(service, false);

        controller
            .load_program_preset("sig_verify_with_pubkey_from_script.simf")
            .await
            .unwrap();
        assert!(controller.store().state().simplicity_program.contains("fn main"));
        assert!(!controller.store().state().simplicity_witness.is_empty());

        controller.load_program_preset("check_opcode.simf").await.unwrap();
        assert_eq!(controller.store().state().simplicity_witness, "");

        controller.load_script_preset("2-of-2-multisig.bs").await.unwrap();
        assert!(controller.store().state().bitcoin_script.contains("OP_CHECKMULTISIG"));

        let err = controller.load_script_preset("missing.bs").await.unwrap_err();
        assert!(matches!(err, OrchestrationError::PresetNotFound(_)));
    }

    #[test]
    fn test_builder_rejects_bitcoin_network() {
        let config = AppConfig::builder().network(Network::Testnet).build();
        assert!(ControllerBuilder::new().with_config(config).build().is_err());
    }
}
