//! Application core for the Simplicity Unchained toolkit
//!
//! Holds the editable program/script/form state, runs the user-facing
//! actions against the Simplicity service and drives the five-step send:
//!
//! 1. create a PSET spending the declared input
//! 2. have the service execute the program and sign
//! 3. cosign with the form key
//! 4. finalize
//! 5. broadcast through the explorer

pub mod config;
pub mod controller;
pub mod error;
pub mod notifications;
pub mod presets;
pub mod settings;
pub mod store;
pub mod workflow;

pub use config::{AppConfig, AppConfigBuilder};
pub use controller::{Controller, ControllerBuilder};
pub use error::{OrchestrationError, Result};
pub use notifications::NotificationCenter;
pub use presets::{PresetLoader, ProgramPreset, JETS, SCRIPT_PRESETS, SIMPLICITY_PRESETS};
pub use settings::{Settings, SettingsStore};
pub use store::{AppState, AppStore};
pub use workflow::{SendParams, SendState, SendWorkflow};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::controller::{Controller, ControllerBuilder};
    pub use crate::error::{OrchestrationError, Result};
    pub use crate::store::AppStore;
    pub use crate::workflow::SendState;
}
