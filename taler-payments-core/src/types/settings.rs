use serde::{Deserialize, Serialize};

/// Name of the persisted option the whole record lives under.
pub const OPTION_NAME: &str = "taler_options";

/// The single persisted settings mapping.
///
/// Every field is independently optional: partial states are legal at rest
/// (e.g. a base URL with no credentials yet). Group invariants are enforced
/// only at the moment that group is saved. Absence of a key and an empty
/// string are both "not configured"; serialization preserves absence.
///
/// Secrets (`password_encrypted`, `token_encrypted`) hold [`SecretBox`]
/// blobs, never plaintext, and are never rendered back into a form.
///
/// [`SecretBox`]: crate::crypto::SecretBox
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    /// Merchant backend base URL (`https` only).
    #[serde(rename = "taler_base_url", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Login username for user/password auth.
    #[serde(rename = "ext_username", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Encrypted login password.
    #[serde(rename = "ext_password", skip_serializing_if = "Option::is_none")]
    pub password_encrypted: Option<String>,

    /// Merchant instance ID the user/password login is scoped to.
    #[serde(rename = "taler_instance", skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Encrypted access token.
    #[serde(rename = "taler_token", skip_serializing_if = "Option::is_none")]
    pub token_encrypted: Option<String>,
}

impl SettingsRecord {
    /// Whether a non-empty encrypted password is already stored.
    ///
    /// Supports "leave the password blank to keep the existing one" on
    /// resubmission.
    #[must_use]
    pub fn has_stored_password(&self) -> bool {
        self.password_encrypted
            .as_deref()
            .is_some_and(|blob| !blob.is_empty())
    }
}
