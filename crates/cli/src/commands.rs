//! Command handlers

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use unchained_highlight::Grammar;
use unchained_orchestrator::{
    AppConfig, Controller, ControllerBuilder, JETS, SCRIPT_PRESETS, SIMPLICITY_PRESETS,
};
use unchained_types::BroadcastResult;

use crate::render;

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

fn controller(config: AppConfig) -> Result<Controller> {
    Ok(ControllerBuilder::new().with_config(config).build()?)
}

/// Print the activity and turn a failed action into a non-zero exit.
fn finish<T>(controller: &Controller, outcome: unchained_orchestrator::Result<T>) -> Result<T> {
    render::print_activity(controller.store());
    Ok(outcome?)
}

pub async fn highlight(file: &Path, script: bool) -> Result<()> {
    let source = read(file).await?;
    let grammar = if script { Grammar::Script } else { Grammar::Program };
    render::print_highlighted(grammar, &source);
    Ok(())
}

/// Where a command takes its source buffer from.
pub enum Source {
    File(PathBuf),
    Text(String),
    Preset(String),
}

pub async fn compile(
    config: AppConfig,
    program: Source,
    witness: Option<&Path>,
    include_witness: bool,
) -> Result<()> {
    let mut controller = controller(config)?;
    match program {
        Source::Preset(name) => controller.load_program_preset(&name).await?,
        Source::File(path) => controller.store_mut().update_program(read(&path).await?),
        Source::Text(text) => controller.store_mut().update_program(text),
    }
    // An explicit witness file replaces whatever the preset brought.
    if let Some(path) = witness {
        controller.store_mut().update_witness(read(path).await?);
    }

    info!("Compiling program (witness: {})", include_witness);
    let outcome = controller.compile_program(include_witness).await;
    finish(&controller, outcome)?;

    let state = controller.store().state();
    println!("program: {}", state.compiled_program_base64);
    if !state.compiled_witness_base64.is_empty() {
        println!("witness: {}", state.compiled_witness_base64);
    }
    if !state.tweaked_public_key.is_empty() {
        println!("tweaked public key: {}", state.tweaked_public_key);
    }
    Ok(())
}

pub async fn convert(config: AppConfig, script: Source) -> Result<()> {
    let mut controller = controller(config)?;
    match script {
        Source::Preset(name) => controller.load_script_preset(&name).await?,
        Source::File(path) => controller.store_mut().update_script(read(&path).await?.trim()),
        Source::Text(text) => controller.store_mut().update_script(text.trim()),
    }

    info!("Converting script on {}", controller.config().network);
    let outcome = controller.convert_script().await;
    finish(&controller, outcome)?;

    let state = controller.store().state();
    println!("hex: {}", state.compiled_hex);
    println!("address: {}", state.compiled_address);
    Ok(())
}

pub struct SendArgs {
    pub program: PathBuf,
    pub witness: PathBuf,
    pub script: PathBuf,
    pub txid: String,
    pub vout: String,
    pub key: String,
}

pub async fn send(config: AppConfig, args: SendArgs) -> Result<()> {
    let mut controller = controller(config)?;
    controller.store_mut().update_program(read(&args.program).await?);
    controller.store_mut().update_witness(read(&args.witness).await?);
    controller.store_mut().update_script(read(&args.script).await?.trim());
    controller
        .store_mut()
        .update_transaction_form(args.txid, args.vout, args.key);

    let outcome = compile_and_send(&mut controller).await;
    let result = finish(&controller, outcome)?;
    println!("txid: {}", result.txid);
    println!("{}", result.explorer_url);
    Ok(())
}

/// Compile both buffers, then send. Stops at the first failing step so the
/// exit reason is that step's error.
async fn compile_and_send(
    controller: &mut Controller,
) -> unchained_orchestrator::Result<BroadcastResult> {
    controller.compile_program(true).await?;
    controller.convert_script().await?;
    debug!("Program and script compiled, starting send");
    controller.send_transaction().await
}

pub async fn keygen(config: AppConfig) -> Result<()> {
    let mut controller = controller(config)?;
    debug!("Requesting keypair");
    let outcome = controller.generate_keypair().await;
    let keypair = finish(&controller, outcome)?;
    println!("secret key: {}", keypair.secret_key);
    println!("public key: {}", keypair.public_key);
    Ok(())
}

pub async fn sign_message(config: AppConfig, message: &str, key: String, hex: bool) -> Result<()> {
    let mut controller = controller(config)?;
    controller.store_mut().update_transaction_form("", "", key);
    let outcome = controller.sign_message(message, hex).await;
    let signed = finish(&controller, outcome)?;
    println!("public key: {}", signed.public_key_hex);
    Ok(())
}

pub fn list_presets() {
    println!("Simplicity programs:");
    for preset in SIMPLICITY_PRESETS {
        println!("  {:<45} {}", preset.file_name, preset.label);
    }
    println!("Bitcoin scripts:");
    for preset in SCRIPT_PRESETS {
        println!("  {:<45} {}", preset.file_name, preset.label);
        if let Some(description) = preset.description {
            println!("      {}", description);
        }
    }
}

pub fn list_jets() {
    for jet in JETS {
        render::print_highlighted(Grammar::Program, jet.signature);
        println!("    {}", jet.description);
    }
}
