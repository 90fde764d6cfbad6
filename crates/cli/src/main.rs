//! `unchained`: compile, inspect and spend Simplicity programs from the shell

mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::Source;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use unchained_orchestrator::{AppConfig, SettingsStore};
use unchained_types::Network;

#[derive(Parser)]
#[command(name = "unchained", version, about = "Simplicity Unchained demo toolkit")]
struct Cli {
    /// Proxy base URL (overrides UNCHAINED_PROXY_URL)
    #[arg(long, global = true)]
    proxy_url: Option<String>,

    /// Network (overrides UNCHAINED_NETWORK)
    #[arg(long, global = true)]
    network: Option<Network>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a source file with syntax highlighting
    Highlight {
        file: PathBuf,
        /// Treat the file as Bitcoin script instead of SimplicityHL
        #[arg(long)]
        script: bool,
    },
    /// Compile a SimplicityHL program and request its tweaked key
    Compile {
        #[arg(required_unless_present = "preset")]
        program: Option<PathBuf>,
        /// Bundled program, e.g. `check_opcode.simf` (see `presets`)
        #[arg(long, conflicts_with = "program")]
        preset: Option<String>,
        /// Witness JSON file
        #[arg(long)]
        witness: Option<PathBuf>,
        /// Compile without the witness
        #[arg(long)]
        no_witness: bool,
    },
    /// Compile a Bitcoin script to hex and a P2WSH address
    Convert {
        #[arg(required_unless_present_any = ["file", "preset"])]
        script: Option<String>,
        #[arg(long, conflicts_with_all = ["script", "preset"])]
        file: Option<PathBuf>,
        /// Bundled script, e.g. `2-of-2-multisig.bs` (see `presets`)
        #[arg(long, conflicts_with = "script")]
        preset: Option<String>,
    },
    /// Spend a UTXO locked by a compiled program and script
    Send {
        #[arg(long)]
        program: PathBuf,
        #[arg(long)]
        witness: PathBuf,
        /// Bitcoin script file
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        txid: String,
        #[arg(long)]
        vout: String,
        /// Cosign secret key (hex)
        #[arg(long, env = "UNCHAINED_COSIGN_KEY", hide_env_values = true)]
        key: String,
    },
    /// Generate a keypair
    Keygen,
    /// Sign a message with a secret key
    SignMessage {
        message: String,
        #[arg(long, env = "UNCHAINED_COSIGN_KEY", hide_env_values = true)]
        key: String,
        /// The message is already hex
        #[arg(long)]
        hex: bool,
    },
    /// List bundled presets
    Presets,
    /// Show the jet reference
    Jets,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.proxy_url {
        config.proxy_url = url;
    }
    if let Some(network) = cli.network {
        config.network = network;
    }

    let settings = SettingsStore::new(&config.state_dir);
    if !settings.load().await?.security_warning_dismissed {
        render::print_security_warning();
        settings.dismiss_security_warning().await?;
    }

    match cli.command {
        Command::Highlight { file, script } => commands::highlight(&file, script).await,
        Command::Compile {
            program,
            preset,
            witness,
            no_witness,
        } => {
            let source = match (preset, program) {
                (Some(name), _) => Source::Preset(name),
                (None, Some(path)) => Source::File(path),
                (None, None) => Source::Text(String::new()),
            };
            commands::compile(config, source, witness.as_deref(), !no_witness).await
        }
        Command::Convert {
            script,
            file,
            preset,
        } => {
            let source = match (preset, file, script) {
                (Some(name), _, _) => Source::Preset(name),
                (None, Some(path), _) => Source::File(path),
                (None, None, text) => Source::Text(text.unwrap_or_default()),
            };
            commands::convert(config, source).await
        }
        Command::Send {
            program,
            witness,
            script,
            txid,
            vout,
            key,
        } => {
            let inputs = commands::SendArgs {
                program,
                witness,
                script,
                txid,
                vout,
                key,
            };
            commands::send(config, inputs).await
        }
        Command::Keygen => commands::keygen(config).await,
        Command::SignMessage { message, key, hex } => {
            commands::sign_message(config, &message, key, hex).await
        }
        Command::Presets => {
            commands::list_presets();
            Ok(())
        }
        Command::Jets => {
            commands::list_jets();
            Ok(())
        }
    }
}
