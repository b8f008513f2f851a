//! Secret-at-rest encryption.
//!
//! Provides AES-256-GCM encryption/decryption for credentials stored in the
//! settings record. The key is derived from site-local secret material, so
//! blobs are only readable by the installation that wrote them.
//!
//! The API deliberately signals failure with an empty string instead of a
//! `Result`: callers treat "could not encrypt" and "nothing stored" the same
//! way, and a decryption failure must never abort a request that merely
//! *displays* settings.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

const NONCE_LENGTH: usize = 12;
const KEY_LENGTH: usize = 32; // AES-256

/// Site-local secret material the encryption key is derived from.
///
/// The three primary keys are concatenated and hashed; `site_salt` is the
/// fallback source used only when all three are empty.
#[derive(Debug, Clone, Default)]
pub struct SiteSecrets {
    /// Primary authentication key.
    pub auth_key: String,
    /// Primary nonce key.
    pub nonce_key: String,
    /// Primary logged-in key.
    pub logged_in_key: String,
    /// Secondary salt source, used when the primary material is empty.
    pub site_salt: String,
}

/// Symmetric authenticated encryption of a single string.
///
/// Blob layout: `base64(nonce ‖ ciphertext)`, fresh random nonce per call.
#[derive(Clone)]
pub struct SecretBox {
    key: [u8; KEY_LENGTH],
}

impl SecretBox {
    /// Derive the encryption key from site secret material.
    #[must_use]
    pub fn from_site_secrets(secrets: &SiteSecrets) -> Self {
        let primary = format!(
            "{}{}{}",
            secrets.auth_key, secrets.nonce_key, secrets.logged_in_key
        );
        let material: &str = if primary.is_empty() {
            &secrets.site_salt
        } else {
            &primary
        };

        let digest = Sha256::digest(material.as_bytes());
        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Encrypt a string for storage.
    ///
    /// Returns a base64 string containing nonce+ciphertext, or an empty
    /// string on empty input or cipher failure.
    #[must_use]
    pub fn encrypt(&self, plaintext: &str) -> String {
        if plaintext.is_empty() {
            return String::new();
        }

        let Ok(cipher) = Aes256Gcm::new_from_slice(&self.key) else {
            return String::new();
        };

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        match cipher.encrypt(nonce, plaintext.as_bytes()) {
            Ok(ciphertext) => {
                let mut blob = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
                blob.extend_from_slice(&nonce_bytes);
                blob.extend_from_slice(&ciphertext);
                BASE64.encode(blob)
            }
            Err(_) => String::new(),
        }
    }

    /// Decrypt a string previously encrypted with [`encrypt`](Self::encrypt).
    ///
    /// Returns the decrypted string, or an empty string on any failure
    /// (empty input, malformed base64, blob shorter than the nonce,
    /// authentication failure). Never panics.
    #[must_use]
    pub fn decrypt(&self, blob: &str) -> String {
        if blob.is_empty() {
            return String::new();
        }

        let Ok(data) = BASE64.decode(blob) else {
            return String::new();
        };

        if data.len() < NONCE_LENGTH {
            return String::new();
        }

        let Ok(cipher) = Aes256Gcm::new_from_slice(&self.key) else {
            return String::new();
        };

        let (nonce_bytes, ciphertext) = data.split_at(NONCE_LENGTH);
        let nonce = Nonce::from_slice(nonce_bytes);

        match cipher.decrypt(nonce, ciphertext) {
            Ok(plaintext) => String::from_utf8(plaintext).unwrap_or_default(),
            Err(_) => String::new(),
        }
    }
}
