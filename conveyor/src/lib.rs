//! Conveyor — versioned configuration upgrade engine for data pipelines.
//!
//! When a stored connection or stage configuration was produced by an older
//! software version, this crate detects the version gap, loads the type's
//! declarative YAML upgrade definition, applies the missing transformation
//! steps in order, and reports every failure as a structured [`Issue`]
//! instead of an error, so one broken configuration never aborts validation
//! of the rest of a pipeline.

pub mod catalog;
pub mod config;
pub mod definition;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod issue;
pub mod registry;
pub mod runner;
pub mod upgrader;
pub mod validation;

pub use config::{Config, ConnectionConfiguration};
pub use descriptor::{ConnectionCatalog, TypeDescriptor};
pub use error::{Error, Result};
pub use issue::{Issue, IssueCode};
pub use registry::DefinitionRegistry;
pub use upgrader::ConfigurationUpgrader;
