//! Bundled example programs and scripts, and the jet reference.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{OrchestrationError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub file_name: &'static str,
    pub label: &'static str,
    pub description: Option<&'static str>,
}

pub const SIMPLICITY_PRESETS: &[Preset] = &[
    Preset {
        file_name: "check_opcode.simf",
        label: "Check Opcode",
        description: None,
    },
    Preset {
        file_name: "sig_verify_with_pubkey_from_script.simf",
        label: "Sig Verify With Pubkey From Script",
        description: None,
    },
];

pub const SCRIPT_PRESETS: &[Preset] = &[Preset {
    file_name: "2-of-2-multisig.bs",
    label: "2-of-2 Multisig",
    description: Some(
        "Standard m-of-n multisig. https://github.com/bitcoin/bips/blob/master/bip-0011.mediawiki",
    ),
}];

/// Reference entry for a jet available to programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JetDoc {
    pub name: &'static str,
    pub signature: &'static str,
    pub description: &'static str,
}

pub const JETS: &[JetDoc] = &[
    JetDoc {
        name: "get_opcode_from_script",
        signature: "jet::get_opcode_from_script(U8) -> U8",
        description: "Given an index, return the opcode at that index.",
    },
    JetDoc {
        name: "get_pubkey_from_script",
        signature: "jet::get_pubkey_from_script(U8) -> Pubkey",
        description: "Each pubkey is encoded as: [OP_PUSHBYTES_33][0x02 or 0x03][32 bytes X coordinate]. \
                      Returns X only pubkeys from a script at the given index. \
                      Index should point to OP_PUSHBYTES_33 opcode in the script.",
    },
];

/// A program preset and its witness, if one ships with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramPreset {
    pub source: String,
    pub witness: Option<String>,
}

/// Reads presets from `<root>/simplicity` and `<root>/bitcoin_script`.
#[derive(Debug, Clone)]
pub struct PresetLoader {
    root: PathBuf,
}

impl PresetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load a `.simf` preset and its `.wit` companion. A missing companion
    /// is normal.
    pub async fn load_program(&self, file_name: &str) -> Result<ProgramPreset> {
        let dir = self.root.join("simplicity");
        let source = read_preset(&dir, file_name).await?;

        let stem = file_name.strip_suffix(".simf").unwrap_or(file_name);
        let wit_path = dir.join(format!("{}.wit", stem));
        let witness = match tokio::fs::read_to_string(&wit_path).await {
            Ok(text) => Some(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No wit file found for {}", file_name);
                None
            }
            Err(e) => return Err(e.into()),
        };

        debug!("Loaded program preset {}", file_name);
        Ok(ProgramPreset { source, witness })
    }

    pub async fn load_script(&self, file_name: &str) -> Result<String> {
        read_preset(&self.root.join("bitcoin_script"), file_name).await
    }
}

async fn read_preset(dir: &Path, file_name: &str) -> Result<String> {
    // Preset names are bare file names.
    if file_name.is_empty() || file_name.contains(|c: char| c == '/' || c == '\\') || file_name == ".." {
        return Err(OrchestrationError::PresetNotFound(file_name.to_string()));
    }
    match tokio::fs::read_to_string(dir.join(file_name)).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(OrchestrationError::PresetNotFound(file_name.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let simf = dir.path().join("simplicity");
        let bs = dir.path().join("bitcoin_script");
        std::fs::create_dir_all(&simf).unwrap();
        std::fs::create_dir_all(&bs).unwrap();
        std::fs::write(simf.join("with_wit.simf"), "fn main() {}").unwrap();
        std::fs::write(simf.join("with_wit.wit"), "{}").unwrap();
        std::fs::write(simf.join("bare.simf"), "fn main() { }").unwrap();
        std::fs::write(bs.join("one.bs"), "OP_1").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_program_with_companion() {
        let dir = fixture();
        let loader = PresetLoader::new(dir.path());
        let preset = loader.load_program("with_wit.simf").await.unwrap();
        assert_eq!(preset.source, "fn main() {}");
        assert_eq!(preset.witness.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_missing_companion_is_not_an_error() {
        let dir = fixture();
        let loader = PresetLoader::new(dir.path());
        let preset = loader.load_program("bare.simf").await.unwrap();
        assert_eq!(preset.witness, None);
    }

    #[tokio::test]
    async fn test_missing_preset() {
        let dir = fixture();
        let loader = PresetLoader::new(dir.path());
        assert!(matches!(
            loader.load_program("nope.simf").await,
            Err(OrchestrationError::PresetNotFound(_))
        ));
        assert!(matches!(
            loader.load_script("../simplicity/bare.simf").await,
            Err(OrchestrationError::PresetNotFound(_))
        ));
        assert_eq!(loader.load_script("one.bs").await.unwrap(), "OP_1");
    }

    #[tokio::test]
    async fn test_bundled_presets_exist() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../presets");
        let loader = PresetLoader::new(root);
        for preset in SIMPLICITY_PRESETS {
            loader.load_program(preset.file_name).await.unwrap();
        }
        for preset in SCRIPT_PRESETS {
            loader.load_script(preset.file_name).await.unwrap();
        }
    }
}
