//! Reading compiled contract artifacts

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::json_abi::JsonAbi;
use alloy_primitives::Bytes;
use serde::Deserialize;

use crate::errors::ScriptError;

/// A compiled contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// The contract name
    pub name: String,
    /// The contract interface
    pub abi: JsonAbi,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl Artifact {
    /// The deployment code: creation bytecode followed by the ABI-encoded
    /// constructor arguments
    pub fn deploy_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = self.bytecode.to_vec();
        code.extend_from_slice(constructor_args);
        code.into()
    }
}

/// The on-disk layout of an artifact
#[derive(Deserialize)]
struct ArtifactFile {
    /// The contract interface
    abi: JsonAbi,
    /// The creation bytecode
    bytecode: BytecodeField,
}

/// Brownie and Hardhat store bytecode as a hex string, Foundry nests it
/// under `object`
#[derive(Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    /// A bare hex string
    Hex(Bytes),
    /// A Foundry bytecode object
    Object {
        /// The hex-encoded bytecode
        object: Bytes,
    },
}

impl From<BytecodeField> for Bytes {
    fn from(field: BytecodeField) -> Self {
        match field {
            BytecodeField::Hex(bytes) | BytecodeField::Object { object: bytes } => bytes,
        }
    }
}

/// Compiled artifacts read from a build directory, cached by name
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    /// The directory holding `<Name>.json` artifacts
    dir: Option<PathBuf>,
    /// Artifacts already read
    cache: HashMap<String, Artifact>,
}

impl ArtifactStore {
    /// An artifact store reading from the given directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: Some(dir.as_ref().to_path_buf()),
            cache: HashMap::new(),
        }
    }

    /// Add an artifact to the store directly
    pub fn insert(&mut self, artifact: Artifact) {
        self.cache.insert(artifact.name.clone(), artifact);
    }

    /// Get the artifact for the given contract
    pub fn get(&mut self, name: &str) -> Result<Artifact, ScriptError> {
        if let Some(artifact) = self.cache.get(name) {
            return Ok(artifact.clone());
        }

        let dir = self
            .dir
            .as_ref()
            .ok_or_else(|| ScriptError::Artifact(format!("no artifact for {}", name)))?;
        let artifact = read_artifact(&dir.join(format!("{name}.json")), name)?;
        self.cache.insert(name.to_string(), artifact.clone());
        Ok(artifact)
    }
}

/// Read and validate a single artifact file
fn read_artifact(path: &Path, name: &str) -> Result<Artifact, ScriptError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ScriptError::Artifact(format!("{}: {}", path.display(), e)))?;
    let file: ArtifactFile = serde_json::from_str(&contents)
        .map_err(|e| ScriptError::Artifact(format!("{}: {}", path.display(), e)))?;

    let bytecode = Bytes::from(file.bytecode);
    if bytecode.is_empty() {
        return Err(ScriptError::Artifact(format!("{} has no bytecode", name)));
    }

    Ok(Artifact {
        name: name.to_string(),
        abi: file.abi,
        bytecode,
    })
}
