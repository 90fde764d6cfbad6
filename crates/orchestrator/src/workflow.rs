//! Send-transaction workflow.
//!
//! ```text
//! Idle -> CreatingTransaction -> ProgramSigning -> Cosigning
//!      -> Finalizing -> Broadcasting -> Done
//! ```
//!
//! Any step failure moves to `Failed`. Nothing already done upstream is
//! undone; a new attempt starts again from `Idle`.

use futures::future::try_join_all;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info};
use unchained_bitcoin::Explorer;
use unchained_client::SimplicityService;
use unchained_types::{
    BroadcastResult, CreatePsetRequest, FinalizePsetRequest, Network, SignPsetRequest,
    SimplicitySignPsetRequest, UtxoData,
};

use crate::error::{OrchestrationError, Result};
use crate::store::AppStore;

/// Toast shown when the guard rejects a send and no specific reason applies.
pub const NOT_READY_MESSAGE: &str =
    "Please compile Simplicity Program (with witness included) and Bitcoin Script first";

const SIGNED_INPUT: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendState {
    Idle,
    CreatingTransaction,
    ProgramSigning,
    Cosigning,
    Finalizing,
    Broadcasting,
    Done,
    Failed,
}

impl SendState {
    /// A step is running.
    pub fn is_in_flight(&self) -> bool {
        !matches!(self, SendState::Idle | SendState::Done | SendState::Failed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SendState::Done | SendState::Failed)
    }
}

/// Amounts and network a send is built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendParams {
    pub network: Network,
    pub send_amount: u64,
    pub fee_amount: u64,
    pub resolve_prevouts: bool,
}

/// Inputs copied out of the store when a send starts.
struct SendInputs {
    txid: String,
    vout: String,
    secret_key: String,
    address: String,
    redeem_script_hex: String,
    program: String,
    witness: String,
}

/// Drives one send at a time and publishes its state.
pub struct SendWorkflow {
    state: watch::Sender<SendState>,
}

impl SendWorkflow {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SendState::Idle);
        Self { state }
    }

    pub fn state(&self) -> SendState {
        *self.state.borrow()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SendState> {
        self.state.subscribe()
    }

    /// Return to `Idle` after `Done` or `Failed`.
    pub fn reset(&self) -> Result<()> {
        let current = self.state();
        if current.is_in_flight() {
            return Err(OrchestrationError::InvalidState(format!(
                "cannot reset while {:?}",
                current
            )));
        }
        self.transition(SendState::Idle);
        Ok(())
    }

    pub(crate) fn transition(&self, next: SendState) {
        debug!("Send workflow -> {:?}", next);
        self.state.send_replace(next);
    }

    /// Check the guard, then run all five steps.
    ///
    /// Guard failures leave the workflow in `Idle` and surface a toast. Step
    /// failures end in `Failed` with a log line and an error toast.
    pub async fn run(
        &self,
        store: &mut AppStore,
        service: &dyn SimplicityService,
        explorer: &dyn Explorer,
        params: &SendParams,
    ) -> Result<BroadcastResult> {
        let current = self.state();
        if current.is_in_flight() {
            return Err(OrchestrationError::InvalidState(format!(
                "a send is already in progress ({:?})",
                current
            )));
        }
        if current.is_terminal() {
            self.transition(SendState::Idle);
        }

        if !store.can_send_transaction() {
            let reason = store.missing_requirements();
            let reason = if reason.is_empty() {
                NOT_READY_MESSAGE.to_string()
            } else {
                reason
            };
            store.show_notification(reason.clone(), false);
            return Err(OrchestrationError::NotReady(reason));
        }

        let state = store.state();
        if state.input_transaction_hash.is_empty()
            || state.input_index.is_empty()
            || state.cosign_secret_key.is_empty()
        {
            let message = "Please fill in all transaction fields";
            store.show_notification(message, false);
            return Err(OrchestrationError::Validation(message.to_string()));
        }

        let inputs = SendInputs {
            txid: state.input_transaction_hash.clone(),
            vout: state.input_index.clone(),
            secret_key: state.cosign_secret_key.clone(),
            address: state.compiled_address.clone(),
            redeem_script_hex: state.compiled_hex.clone(),
            program: state.compiled_program_base64.clone(),
            witness: state.compiled_witness_base64.clone(),
        };

        info!("Sending {} sat to {}", params.send_amount, inputs.address);
        match self.execute(store, service, explorer, params, &inputs).await {
            Ok(result) => {
                self.transition(SendState::Done);
                store.add_log("Transaction broadcast successfully!");
                store.add_log(format!("View transaction: {}", result.explorer_url));
                store.show_notification("Transaction sent successfully!", false);
                Ok(result)
            }
            Err(e) => {
                error!("Send failed in {:?}: {}", self.state(), e);
                self.transition(SendState::Failed);
                store.add_log(format!("Transaction failed: {}", e));
                store.show_notification("Transaction failed", true);
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        store: &mut AppStore,
        service: &dyn SimplicityService,
        explorer: &dyn Explorer,
        params: &SendParams,
        inputs: &SendInputs,
    ) -> Result<BroadcastResult> {
        // Step 1: create the PSET
        self.transition(SendState::CreatingTransaction);
        let declared = vec![(inputs.txid.clone(), inputs.vout.clone())];
        let utxos = if params.resolve_prevouts {
            Some(resolve_prevouts(explorer, &declared).await?)
        } else {
            None
        };
        let created = service
            .create_pset(&CreatePsetRequest {
                inputs: declared.iter().map(|(txid, vout)| format!("{}:{}", txid, vout)).collect(),
                outputs: vec![
                    format!("{}:{}", inputs.address, params.send_amount),
                    format!("fee:{}", params.fee_amount),
                ],
                asset_id: None,
                network: params.network,
                utxos,
            })
            .await?;
        store.add_log(format!(
            "PSET created with {} input(s) and {} output(s)",
            created.inputs, created.outputs
        ));
        debug!("Created PSET: {}", created.pset);

        // Step 2: the service runs the program and signs
        self.transition(SendState::ProgramSigning);
        let program_signed = service
            .simplicity_sign_pset(&SimplicitySignPsetRequest {
                pset_hex: created.pset,
                input_index: SIGNED_INPUT,
                redeem_script_hex: inputs.redeem_script_hex.clone(),
                program: inputs.program.clone(),
                witness: inputs.witness.clone(),
            })
            .await?;
        store.add_log(format!(
            "Simplicity signature added ({} partial signature(s))",
            program_signed.partial_sigs_count
        ));

        // Step 3: cosign with the form key
        self.transition(SendState::Cosigning);
        let cosigned = service
            .sign_pset(&SignPsetRequest {
                pset_hex: program_signed.pset_hex,
                secret_key_hex: inputs.secret_key.clone(),
                input_index: SIGNED_INPUT,
                redeem_script_hex: inputs.redeem_script_hex.clone(),
            })
            .await?;
        store.add_log(format!(
            "Cosign signature added ({} partial signature(s))",
            cosigned.partial_sigs_count
        ));

        // Step 4: finalize
        self.transition(SendState::Finalizing);
        let finalized = service
            .finalize_pset(&FinalizePsetRequest {
                pset_hex: cosigned.pset,
                ..Default::default()
            })
            .await?;
        store.add_log(format!("Finalized transaction hex: {}", finalized.transaction_hex));

        // Step 5: broadcast
        self.transition(SendState::Broadcasting);
        explorer
            .broadcast_tx(&finalized.transaction_hex)
            .await
            .map_err(OrchestrationError::Broadcast)
    }
}

impl Default for SendWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up every declared input concurrently.
async fn resolve_prevouts(
    explorer: &dyn Explorer,
    declared: &[(String, String)],
) -> Result<Vec<UtxoData>> {
    let lookups = declared.iter().map(|(txid, vout)| async move {
        let vout: u32 = vout.trim().parse().map_err(|_| {
            OrchestrationError::Validation(format!("Invalid output index: {}", vout))
        })?;
        explorer.get_prevout(txid, vout).await.map_err(OrchestrationError::from)
    });
    try_join_all(lookups).await
}
