use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Upgrade definition not found: {0}")]
    DefinitionNotFound(String),

    #[error("Upgrade definition malformed: {0}")]
    DefinitionMalformed(String),

    #[error("Unknown connection type: {0}")]
    UnknownType(String),

    #[error("Configuration version {actual} of type '{type_name}' exceeds supported version {supported}")]
    VersionExceedsSupported {
        type_name: String,
        actual: u64,
        supported: u64,
    },

    #[error("Pipeline definition error in '{path}': {message}")]
    PipelineDefinition { path: PathBuf, message: String },

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Stage error: {0}")]
    Stage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
