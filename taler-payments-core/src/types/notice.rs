use serde::{Deserialize, Serialize};

/// Severity of a user-facing notice. Informational only; never affects
/// control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeSeverity {
    /// The save was rejected or a check failed.
    Error,
    /// A change was applied.
    Updated,
    /// Neutral information.
    Info,
}

/// One user-facing outcome message, unique per `(scope, code)` within a
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Settings scope the notice belongs to.
    pub scope: String,
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable message; never contains a secret.
    pub message: String,
    /// Display severity.
    pub severity: NoticeSeverity,
}
