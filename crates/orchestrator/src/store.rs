//! Application state and its mutation rules.
//!
//! Editing a buffer always invalidates what was compiled from it. A compile
//! result is only accepted while the matching buffer is non-blank.

use chrono::Utc;
use std::fmt;
use std::time::Duration;
use tracing::info;
use unchained_types::{LogEntry, Notification};
use uuid::Uuid;

use crate::notifications::NotificationCenter;

pub const PROGRAM_NOT_COMPILED: &str = "Simplicity Program not compiled";
pub const SCRIPT_NOT_COMPILED: &str = "Bitcoin Script not compiled";
pub const WITNESS_NOT_INCLUDED: &str = "Witness not included in compilation";

/// Editable buffers, compiled artifacts and readiness flags.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub simplicity_program: String,
    pub simplicity_witness: String,
    pub compiled_program_base64: String,
    pub compiled_witness_base64: String,
    pub tweaked_public_key: String,
    pub saved_simplicity_program: bool,
    pub witness_included_for_transaction: bool,

    pub bitcoin_script: String,
    pub compiled_hex: String,
    pub compiled_address: String,
    pub saved_bitcoin_script: bool,

    pub input_transaction_hash: String,
    pub input_index: String,
    pub cosign_secret_key: String,

    pub logs: Vec<LogEntry>,
}

// Keeps the cosign key out of debug output.
impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("saved_simplicity_program", &self.saved_simplicity_program)
            .field("witness_included_for_transaction", &self.witness_included_for_transaction)
            .field("saved_bitcoin_script", &self.saved_bitcoin_script)
            .field("compiled_address", &self.compiled_address)
            .field("input_transaction_hash", &self.input_transaction_hash)
            .field("input_index", &self.input_index)
            .field("logs", &self.logs.len())
            .finish_non_exhaustive()
    }
}

/// Single owner of [`AppState`] plus the toast queue.
pub struct AppStore {
    state: AppState,
    notifications: NotificationCenter,
}

impl AppStore {
    pub fn new(notification_ttl: Duration) -> Self {
        Self {
            state: AppState::default(),
            notifications: NotificationCenter::new(notification_ttl),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn update_program(&mut self, text: impl Into<String>) {
        self.state.simplicity_program = text.into();
        self.clear_program_artifacts();
    }

    pub fn update_witness(&mut self, text: impl Into<String>) {
        self.state.simplicity_witness = text.into();
        self.clear_program_artifacts();
    }

    fn clear_program_artifacts(&mut self) {
        self.state.compiled_program_base64.clear();
        self.state.compiled_witness_base64.clear();
        self.state.tweaked_public_key.clear();
        self.state.saved_simplicity_program = false;
        self.state.witness_included_for_transaction = false;
    }

    pub fn update_script(&mut self, text: impl Into<String>) {
        self.state.bitcoin_script = text.into();
        self.state.compiled_hex.clear();
        self.state.compiled_address.clear();
        self.state.saved_bitcoin_script = false;
    }

    /// Set all three form fields at once. Callers pass the current values
    /// for fields they are not changing.
    pub fn update_transaction_form(
        &mut self,
        hash: impl Into<String>,
        index: impl Into<String>,
        key: impl Into<String>,
    ) {
        self.state.input_transaction_hash = hash.into();
        self.state.input_index = index.into();
        self.state.cosign_secret_key = key.into();
    }

    /// Record a compile result. Ignored (returns false) when the program
    /// buffer is blank or no program was produced.
    pub fn save_program(
        &mut self,
        program_base64: &str,
        witness_base64: &str,
        tweaked_public_key: Option<&str>,
        witness_included: bool,
    ) -> bool {
        if self.state.simplicity_program.trim().is_empty() || program_base64.is_empty() {
            return false;
        }

        let tweaked = tweaked_public_key.filter(|k| !k.is_empty());
        self.state.compiled_program_base64 = program_base64.to_string();
        self.state.compiled_witness_base64 = witness_base64.to_string();
        self.state.tweaked_public_key = tweaked.unwrap_or_default().to_string();
        self.state.saved_simplicity_program = true;
        self.state.witness_included_for_transaction = witness_included;

        match tweaked {
            Some(key) => self.add_log(format!(
                "Simplicity program compiled and saved successfully. Tweaked Public Key: {}",
                key
            )),
            None => self.add_log("Simplicity program compiled and saved successfully"),
        }
        self.show_notification("Simplicity program compiled and saved successfully", false);
        true
    }

    /// Record a script conversion. Ignored (returns false) when the script
    /// buffer is blank or either artifact is missing.
    pub fn save_script(&mut self, hex: &str, address: &str) -> bool {
        if self.state.bitcoin_script.trim().is_empty() || hex.is_empty() || address.is_empty() {
            return false;
        }

        self.state.compiled_hex = hex.to_string();
        self.state.compiled_address = address.to_string();
        self.state.saved_bitcoin_script = true;

        self.add_log(format!("Bitcoin script compiled - Address: {}", address));
        self.show_notification("Bitcoin script saved and P2WSH address generated", false);
        true
    }

    pub fn can_send_transaction(&self) -> bool {
        self.state.saved_simplicity_program
            && self.state.saved_bitcoin_script
            && self.state.witness_included_for_transaction
    }

    /// Why sending is not possible, one phrase per unmet requirement.
    /// Empty when [`can_send_transaction`](Self::can_send_transaction) holds.
    pub fn missing_requirements(&self) -> String {
        let mut missing = Vec::new();
        if !self.state.saved_simplicity_program {
            missing.push(PROGRAM_NOT_COMPILED);
        }
        if !self.state.saved_bitcoin_script {
            missing.push(SCRIPT_NOT_COMPILED);
        }
        if !self.state.witness_included_for_transaction {
            missing.push(WITNESS_NOT_INCLUDED);
        }
        missing.join(", ")
    }

    pub fn add_log(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(target: "unchained::activity", "{}", message);
        self.state.logs.push(LogEntry {
            timestamp: Utc::now(),
            message,
        });
    }

    /// Log entries, newest first.
    pub fn logs_recent_first(&self) -> impl Iterator<Item = &LogEntry> {
        self.state.logs.iter().rev()
    }

    pub fn show_notification(&self, message: impl Into<String>, is_error: bool) -> Uuid {
        self.notifications.show(message, is_error)
    }

    pub fn remove_notification(&self, id: Uuid) {
        self.notifications.remove(id)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.list()
    }
}
