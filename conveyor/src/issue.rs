//! Non-fatal validation diagnostics.
//!
//! An [`Issue`] is how the upgrade engine reports problems: it is appended to
//! a caller-owned list instead of being raised, so one broken connection never
//! aborts validation of its siblings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifiers a consumer may match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// The stored configuration is newer than anything this build supports.
    VersionExceedsSupported,
    /// The declared upgrade definition does not exist or cannot be read.
    DefinitionNotFound,
    /// The upgrade definition exists but is structurally invalid.
    DefinitionMalformed,
    /// The catalog has no entry for the configuration's type.
    UnknownType,
}

impl IssueCode {
    /// Stable string form; these never change across releases.
    pub fn code(&self) -> &'static str {
        match self {
            IssueCode::VersionExceedsSupported => "UPGRADER_001",
            IssueCode::DefinitionNotFound => "UPGRADER_002",
            IssueCode::DefinitionMalformed => "UPGRADER_003",
            IssueCode::UnknownType => "UPGRADER_004",
        }
    }
}

/// One structured diagnostic tied to a single connection or stage instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub code: IssueCode,
    /// Configuration type the issue applies to.
    pub type_name: String,
    /// Caller-supplied identifier of the specific instance, when available.
    pub instance: Option<String>,
    pub message: String,
}

impl Issue {
    pub fn new(
        code: IssueCode,
        type_name: impl Into<String>,
        instance: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            type_name: type_name.into(),
            instance: instance.map(|s| s.to_string()),
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.code.code()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(
                f,
                "[{}] {} ({}): {}",
                self.error_code(),
                self.type_name,
                instance,
                self.message
            ),
            None => write!(
                f,
                "[{}] {}: {}",
                self.error_code(),
                self.type_name,
                self.message
            ),
        }
    }
}
