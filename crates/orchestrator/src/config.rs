//! Configuration for the toolkit

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use unchained_client::DEFAULT_PROXY_URL;
use unchained_types::{Environment, Network};

use crate::error::{OrchestrationError, Result};

/// Configuration for the toolkit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the proxy routes
    pub proxy_url: String,

    /// Network used for script conversion, PSET creation and broadcast
    pub network: Network,

    /// Jet environment for compile and tweak
    pub environment: Environment,

    /// Explorer API override (required for networks without a public one)
    pub explorer_url: Option<String>,

    /// Amount sent to the compiled address, in satoshis
    pub send_amount: u64,

    /// Fee output, in satoshis
    pub fee_amount: u64,

    /// How long a toast stays before it removes itself
    pub notification_ttl: Duration,

    /// Look up spent outputs on the explorer before creating the PSET
    pub resolve_prevouts: bool,

    /// Directory holding `simplicity/` and `bitcoin_script/` presets
    pub presets_dir: PathBuf,

    /// Directory for persisted settings
    pub state_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            network: Network::LiquidTestnet,
            environment: Environment::Elements,
            explorer_url: None,
            send_amount: 99_000,
            fee_amount: 1_000,
            notification_ttl: Duration::from_millis(7000),
            resolve_prevouts: false,
            presets_dir: PathBuf::from("presets"),
            state_dir: PathBuf::from(".unchained"),
        }
    }
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// Load from `UNCHAINED_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("UNCHAINED_PROXY_URL") {
            config.proxy_url = url;
        }
        if let Some(network) = lookup("UNCHAINED_NETWORK") {
            config.network = network
                .parse()
                .map_err(|e| OrchestrationError::Config(format!("UNCHAINED_NETWORK: {}", e)))?;
        }
        if let Some(env) = lookup("UNCHAINED_ENVIRONMENT") {
            config.environment = env
                .parse()
                .map_err(|e| OrchestrationError::Config(format!("UNCHAINED_ENVIRONMENT: {}", e)))?;
        }
        config.explorer_url = lookup("UNCHAINED_EXPLORER_URL").filter(|s| !s.trim().is_empty());

        if let Some(amount) = lookup("UNCHAINED_SEND_AMOUNT") {
            config.send_amount = parse_var("UNCHAINED_SEND_AMOUNT", &amount)?;
        }
        if let Some(fee) = lookup("UNCHAINED_FEE_AMOUNT") {
            config.fee_amount = parse_var("UNCHAINED_FEE_AMOUNT", &fee)?;
        }
        if let Some(ms) = lookup("UNCHAINED_NOTIFICATION_TTL_MS") {
            config.notification_ttl =
                Duration::from_millis(parse_var("UNCHAINED_NOTIFICATION_TTL_MS", &ms)?);
        }
        if let Some(flag) = lookup("UNCHAINED_RESOLVE_PREVOUTS") {
            config.resolve_prevouts = parse_var("UNCHAINED_RESOLVE_PREVOUTS", &flag)?;
        }
        if let Some(dir) = lookup("UNCHAINED_PRESETS_DIR") {
            config.presets_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("UNCHAINED_STATE_DIR") {
            config.state_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations that can never send a transaction.
    pub fn validate(&self) -> Result<()> {
        if self.send_amount == 0 {
            return Err(OrchestrationError::InvalidConfig(
                "send amount must be positive".to_string(),
            ));
        }
        if self.network.environment() != Environment::Elements {
            return Err(OrchestrationError::InvalidConfig(format!(
                "transactions are built as PSETs; {} is not an Elements network",
                self.network
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| OrchestrationError::Config(format!("{}: {}", key, e)))
}

/// Builder for AppConfig
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.config.proxy_url = url.into();
        self
    }

    pub fn network(mut self, network: Network) -> Self {
        self.config.network = network;
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.environment = environment;
        self
    }

    pub fn explorer_url(mut self, url: impl Into<String>) -> Self {
        self.config.explorer_url = Some(url.into());
        self
    }

    pub fn send_amount(mut self, sats: u64) -> Self {
        self.config.send_amount = sats;
        self
    }

    pub fn fee_amount(mut self, sats: u64) -> Self {
        self.config.fee_amount = sats;
        self
    }

    pub fn notification_ttl(mut self, ttl: Duration) -> Self {
        self.config.notification_ttl = ttl;
        self
    }

    pub fn resolve_prevouts(mut self, enable: bool) -> Self {
        self.config.resolve_prevouts = enable;
        self
    }

    pub fn presets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.presets_dir = dir.into();
        self
    }

    pub fn state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.state_dir = dir.into();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
