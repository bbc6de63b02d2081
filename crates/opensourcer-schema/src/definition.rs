use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the definition file inside every catalog entry.
pub const DEFINITION_FILE: &str = "app.json";

const SECRET_INPUT_TYPE: &str = "password";

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read definition file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse definition: {0}")]
    ParseJson(#[from] serde_json::Error),
}

/// A deployable piece of software as described by its catalog entry.
///
/// Unknown fields are ignored so older binaries keep reading newer catalogs.
/// The slug is never read from the file; the catalog reader fills it in from
/// the entry's directory name, and uses it as the name when the file has none.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SoftwareDefinition {
    #[serde(default, skip_deserializing)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub inputs: BTreeMap<String, InputSpec>,
    #[serde(default)]
    pub services: BTreeMap<String, ServiceInfo>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct InputSpec {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
    /// Declared value type: `text`, `password`, or anything else (treated as text).
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: String,
}

impl InputSpec {
    /// Whether a missing value for this input must be generated.
    pub fn is_secret(&self) -> bool {
        self.kind.eq_ignore_ascii_case(SECRET_INPUT_TYPE)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServiceInfo {
    #[serde(default)]
    pub exposed: bool,
    #[serde(default)]
    pub stateless: bool,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub managed_option: String,
}

impl SoftwareDefinition {
    /// Declared inputs that are generated when the user leaves them empty.
    pub fn secret_inputs(&self) -> impl Iterator<Item = (&String, &InputSpec)> {
        self.inputs.iter().filter(|(_, spec)| spec.is_secret())
    }

    /// Services the catalog marks as reachable from outside the composition.
    pub fn exposed_services(&self) -> impl Iterator<Item = &String> {
        self.services
            .iter()
            .filter(|(_, info)| info.exposed && !info.internal)
            .map(|(name, _)| name)
    }
}

pub fn parse_definition_str(input: &str) -> Result<SoftwareDefinition, DefinitionError> {
    Ok(serde_json::from_str(input)?)
}

pub fn parse_definition_file(path: impl AsRef<Path>) -> Result<SoftwareDefinition, DefinitionError> {
    let content = fs::read_to_string(path)?;
    parse_definition_str(&content)
}
