//! Core type definitions

mod form;
mod notice;
mod settings;

pub use form::{FieldInput, FormGroup, SettingsForm, OPTION_PAGE_KEY};
pub use notice::{Notice, NoticeSeverity};
pub use settings::{SettingsRecord, OPTION_NAME};

use taler_payments_merchant::{AuthKind, ClientConfig};

/// Which credential family a save must prove reachable before commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
    /// Token beats user/password; skip if neither is configured.
    Auto,
    /// Require a token; ignore user/password entirely.
    Token,
    /// Require the user/password/instance triple; ignore any token.
    UserPass,
}

impl VerifyMode {
    /// Stable identifier used in the per-request run guard.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Token => "token",
            Self::UserPass => "userpass",
        }
    }
}

/// Caller capability snapshot for one save request.
#[derive(Debug, Clone, Copy)]
pub struct SaveContext {
    /// Whether the caller may manage settings at all.
    pub can_manage_options: bool,
}

/// Typed payload for one backend login-check attempt.
#[derive(Debug, Clone)]
pub struct LoginCheckContext {
    /// Connection parameters built from the candidate record.
    pub config: ClientConfig,
    /// Which credential family was selected, for notice labels.
    pub auth_kind: AuthKind,
}
