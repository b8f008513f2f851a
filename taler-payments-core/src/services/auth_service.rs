//! Credential resolution service
//!
//! Centralizes auth normalization and typed connection-parameter building:
//! decrypts stored secrets, applies the token-beats-user/pass priority rule,
//! and keeps verification credentials on a conservative scope distinct from
//! the runtime scope used for live order operations.

use taler_payments_merchant::{ClientConfig, MerchantAuth};

use crate::crypto::SecretBox;
use crate::types::{LoginCheckContext, SettingsRecord, VerifyMode};

/// Scope requested when only testing connectivity.
const USERPASS_SCOPE_CHECK: &str = "readonly";
/// Scope requested for live order operations.
const USERPASS_SCOPE_RUNTIME: &str = "order-full";
/// Login token lifetime (1 hour, in microseconds).
const TOKEN_DURATION_US: i64 = 3_600_000_000;
const DESCRIPTION_CHECK: &str = "taler-payments settings check";
const DESCRIPTION_RUNTIME: &str = "taler-payments";

/// Decrypted, trimmed view of a [`SettingsRecord`]. In-memory only.
#[derive(Debug, Clone, Default)]
pub struct ParsedSettings {
    /// Trimmed base URL, empty when not configured.
    pub base_url: String,
    /// Decrypted token, normalized to a full `Authorization` header value.
    pub token: String,
    /// Trimmed username.
    pub username: String,
    /// Decrypted password (not trimmed; whitespace is significant).
    pub password: String,
    /// Trimmed instance ID.
    pub instance: String,
}

impl ParsedSettings {
    fn has_userpass(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty() && !self.instance.is_empty()
    }
}

/// Builds typed connection parameters from the raw settings record.
pub struct AuthService {
    secret_box: SecretBox,
}

impl AuthService {
    /// Create an auth service over the given secret box.
    #[must_use]
    pub fn new(secret_box: SecretBox) -> Self {
        Self { secret_box }
    }

    /// Normalize a token value to a full `Authorization` header value.
    ///
    /// A bare opaque token gets a `Bearer ` prefix; values already carrying a
    /// `Bearer` or `Basic` scheme (case-insensitive) pass through.
    #[must_use]
    pub fn normalize_auth_token(token: &str) -> String {
        let token = token.trim();
        if token.is_empty() {
            return String::new();
        }
        if has_auth_scheme(token) {
            token.to_string()
        } else {
            format!("Bearer {token}")
        }
    }

    /// Decrypt and trim every field of the record.
    #[must_use]
    pub fn parse(&self, record: &SettingsRecord) -> ParsedSettings {
        let decrypt_opt = |blob: &Option<String>| match blob.as_deref() {
            Some(blob) if !blob.is_empty() => self.secret_box.decrypt(blob),
            _ => String::new(),
        };
        let trim_opt =
            |value: &Option<String>| value.as_deref().map(str::trim).unwrap_or_default().to_string();

        ParsedSettings {
            base_url: trim_opt(&record.base_url),
            token: Self::normalize_auth_token(&decrypt_opt(&record.token_encrypted)),
            username: trim_opt(&record.username),
            password: decrypt_opt(&record.password_encrypted),
            instance: trim_opt(&record.instance),
        }
    }

    /// Connection parameters for live order operations.
    ///
    /// Token has priority when both credential sets are configured. With
    /// nothing configured the result carries [`MerchantAuth::None`] — the
    /// caller still attempts the config discovery so the backend can report
    /// its own state.
    #[must_use]
    pub fn runtime_config(&self, record: &SettingsRecord) -> ClientConfig {
        let parsed = self.parse(record);

        let auth = if !parsed.token.is_empty() {
            MerchantAuth::Token {
                authorization: parsed.token,
            }
        } else if parsed.has_userpass() {
            Self::userpass_auth(&parsed, USERPASS_SCOPE_RUNTIME, DESCRIPTION_RUNTIME)
        } else {
            MerchantAuth::None
        };

        ClientConfig {
            base_url: parsed.base_url,
            auth,
        }
    }

    /// Connection parameters for a pre-commit login check, or `None` when
    /// verification must be skipped (no base URL, or the selected mode's
    /// required fields are absent). Skipping is a deliberate no-op, not an
    /// error.
    #[must_use]
    pub fn login_check_context(
        &self,
        record: &SettingsRecord,
        mode: VerifyMode,
    ) -> Option<LoginCheckContext> {
        let parsed = self.parse(record);
        if parsed.base_url.is_empty() {
            return None;
        }

        let auth = match mode {
            VerifyMode::Token => {
                if parsed.token.is_empty() {
                    return None;
                }
                MerchantAuth::Token {
                    authorization: parsed.token.clone(),
                }
            }
            VerifyMode::UserPass => {
                if !parsed.has_userpass() {
                    return None;
                }
                Self::userpass_auth(&parsed, USERPASS_SCOPE_CHECK, DESCRIPTION_CHECK)
            }
            VerifyMode::Auto => {
                if !parsed.token.is_empty() {
                    MerchantAuth::Token {
                        authorization: parsed.token.clone(),
                    }
                } else if parsed.has_userpass() {
                    Self::userpass_auth(&parsed, USERPASS_SCOPE_CHECK, DESCRIPTION_CHECK)
                } else {
                    return None;
                }
            }
        };

        let auth_kind = auth.kind();
        Some(LoginCheckContext {
            config: ClientConfig {
                base_url: parsed.base_url,
                auth,
            },
            auth_kind,
        })
    }

    fn userpass_auth(parsed: &ParsedSettings, scope: &str, description: &str) -> MerchantAuth {
        MerchantAuth::UserPass {
            username: parsed.username.clone(),
            password: parsed.password.clone(),
            instance: parsed.instance.clone(),
            scope: scope.to_string(),
            duration_us: TOKEN_DURATION_US,
            description: description.to_string(),
        }
    }
}

/// Whether the value already starts with `Bearer` or `Basic` followed by
/// whitespace, case-insensitive.
fn has_auth_scheme(token: &str) -> bool {
    for scheme in ["bearer", "basic"] {
        if token.len() > scheme.len()
            && token[..scheme.len()].eq_ignore_ascii_case(scheme)
            && token[scheme.len()..].starts_with(char::is_whitespace)
        {
            return true;
        }
    }
    false
}
