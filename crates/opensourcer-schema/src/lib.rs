//! Catalog definition schema for Opensourcer.
//!
//! This crate defines the data read from a catalog entry: the
//! `SoftwareDefinition` parsed from `app.json`, its declared inputs
//! (`InputSpec`) and services (`ServiceInfo`), and the `EnvironmentSet`
//! handed to the container engine when a deployment is brought up.

pub mod definition;
pub mod environment;

pub use definition::{
    parse_definition_file, parse_definition_str, DefinitionError, InputSpec, ServiceInfo,
    SoftwareDefinition, DEFINITION_FILE,
};
pub use environment::EnvironmentSet;
