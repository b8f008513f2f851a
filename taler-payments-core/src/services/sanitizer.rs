//! Per-group settings sanitization
//!
//! Validates and encrypts one submitted form group, producing a candidate
//! record plus the verification mode the save must pass before commit.
//! Every rejection path returns the untouched previous record — partial
//! writes into the persisted mapping are forbidden.

use std::sync::Arc;

use url::Url;

use crate::crypto::SecretBox;
use crate::services::notices::SettingsNotices;
use crate::types::{
    FormGroup, NoticeSeverity, SaveContext, SettingsForm, SettingsRecord, VerifyMode, OPTION_NAME,
};

/// Result of sanitizing one submission.
#[derive(Debug, Clone)]
pub struct SanitizeOutcome {
    /// Candidate record on acceptance; the previous record otherwise.
    pub record: SettingsRecord,
    /// Verification the save must pass before commit, when required.
    pub verify_mode: Option<VerifyMode>,
    /// Whether the candidate may be committed at all.
    pub accepted: bool,
}

impl SanitizeOutcome {
    fn accepted(record: SettingsRecord, verify_mode: Option<VerifyMode>) -> Self {
        Self {
            record,
            verify_mode,
            accepted: true,
        }
    }

    fn rejected(previous: &SettingsRecord) -> Self {
        Self {
            record: previous.clone(),
            verify_mode: None,
            accepted: false,
        }
    }
}

/// Sanitize callback for the settings option.
pub struct Sanitizer {
    notices: Arc<SettingsNotices>,
    secret_box: SecretBox,
}

impl Sanitizer {
    /// Create a sanitizer instance.
    #[must_use]
    pub fn new(notices: Arc<SettingsNotices>, secret_box: SecretBox) -> Self {
        Self {
            notices,
            secret_box,
        }
    }

    fn notice(&self, code: &str, message: impl Into<String>, severity: NoticeSeverity) {
        self.notices.add_once(OPTION_NAME, code, message, severity);
    }

    /// Sanitize one submission against the current record.
    #[must_use]
    pub fn sanitize(
        &self,
        form: &SettingsForm,
        current: &SettingsRecord,
        ctx: &SaveContext,
    ) -> SanitizeOutcome {
        if !ctx.can_manage_options {
            self.notice(
                "taler_options_permission_denied",
                "You do not have permission to do this.",
                NoticeSeverity::Error,
            );
            return SanitizeOutcome::rejected(current);
        }

        match form.group() {
            Some(FormGroup::BaseUrl) => self.sanitize_base_url(form, current),
            Some(FormGroup::UserPass) => self.sanitize_userpass(form, current),
            Some(FormGroup::Token) => self.sanitize_token(form, current),
            // Unknown group (unexpected): don't change anything.
            None => SanitizeOutcome::rejected(current),
        }
    }

    fn sanitize_base_url(&self, form: &SettingsForm, current: &SettingsRecord) -> SanitizeOutcome {
        let mut new = current.clone();

        if form.delete {
            new.base_url = None;
            self.notice(
                "taler_baseurl_deleted",
                "Base URL deleted.",
                NoticeSeverity::Updated,
            );
            return SanitizeOutcome::accepted(new, None);
        }

        let submitted = form.base_url.value().unwrap_or_default().trim();
        if submitted.is_empty() {
            self.notice(
                "taler_baseurl_required",
                "Please provide a base URL.",
                NoticeSeverity::Error,
            );
            return SanitizeOutcome::rejected(current);
        }

        match Url::parse(submitted) {
            Ok(url) if url.scheme() == "https" && url.host_str().is_some() => {
                new.base_url = Some(url.to_string());
                // If credentials are present, verify we can reach/authenticate.
                SanitizeOutcome::accepted(new, Some(VerifyMode::Auto))
            }
            _ => {
                self.notice(
                    "taler_baseurl_invalid",
                    "Base URL must start with https://",
                    NoticeSeverity::Error,
                );
                SanitizeOutcome::rejected(current)
            }
        }
    }

    fn sanitize_userpass(&self, form: &SettingsForm, current: &SettingsRecord) -> SanitizeOutcome {
        let mut new = current.clone();

        if form.delete {
            new.username = None;
            new.password_encrypted = None;
            new.instance = None;
            self.notice(
                "taler_userpass_deleted",
                "Username and password deleted.",
                NoticeSeverity::Updated,
            );
            return SanitizeOutcome::accepted(new, None);
        }

        let username = form.username.value().unwrap_or_default().trim();
        let instance = form.instance.value().unwrap_or_default().trim();
        // Passwords are taken verbatim; leading/trailing whitespace is legal.
        let password = form.password.value().unwrap_or_default();

        if username.is_empty() {
            self.notice(
                "taler_username_required",
                "Please provide a username.",
                NoticeSeverity::Error,
            );
            return SanitizeOutcome::rejected(current);
        }

        if instance.is_empty() {
            self.notice(
                "taler_instance_required",
                "Please provide an instance ID.",
                NoticeSeverity::Error,
            );
            return SanitizeOutcome::rejected(current);
        }

        // Blank password is allowed only when one is already stored
        // ("leave blank to keep existing").
        if password.is_empty() && !current.has_stored_password() {
            self.notice(
                "taler_password_required",
                "Please provide a password.",
                NoticeSeverity::Error,
            );
            return SanitizeOutcome::rejected(current);
        }

        new.username = Some(username.to_string());
        new.instance = Some(instance.to_string());
        if !password.is_empty() {
            let encrypted = self.secret_box.encrypt(password);
            if encrypted.is_empty() {
                self.notice(
                    "taler_userpass_encrypt_failed",
                    "Could not encrypt password. Credentials were not saved.",
                    NoticeSeverity::Error,
                );
                return SanitizeOutcome::rejected(current);
            }
            new.password_encrypted = Some(encrypted);
        }

        // If base URL is present, verify we can reach/authenticate.
        SanitizeOutcome::accepted(new, Some(VerifyMode::UserPass))
    }

    fn sanitize_token(&self, form: &SettingsForm, current: &SettingsRecord) -> SanitizeOutcome {
        let mut new = current.clone();

        if form.delete {
            new.token_encrypted = None;
            self.notice(
                "taler_token_deleted",
                "Access token deleted.",
                NoticeSeverity::Updated,
            );
            return SanitizeOutcome::accepted(new, None);
        }

        // Unlike passwords, tokens are never "kept blank": a blank submission
        // is always an error.
        let token = form.token.value().unwrap_or_default();
        if token.is_empty() {
            self.notice(
                "taler_token_required",
                "Please provide an access token.",
                NoticeSeverity::Error,
            );
            return SanitizeOutcome::rejected(current);
        }

        let encrypted = self.secret_box.encrypt(token);
        if encrypted.is_empty() {
            self.notice(
                "taler_token_encrypt_failed",
                "Could not encrypt access token. Token was not saved.",
                NoticeSeverity::Error,
            );
            return SanitizeOutcome::rejected(current);
        }
        new.token_encrypted = Some(encrypted);

        // If base URL is present, verify we can reach/authenticate.
        SanitizeOutcome::accepted(new, Some(VerifyMode::Token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_secret_box;
    use crate::types::FieldInput;

    fn sanitizer() -> (Sanitizer, Arc<SettingsNotices>) {
        let notices = Arc::new(SettingsNotices::new());
        (
            Sanitizer::new(notices.clone(), test_secret_box()),
            notices,
        )
    }

    fn allowed() -> SaveContext {
        SaveContext {
            can_manage_options: true,
        }
    }

    fn base_url_form(value: &str) -> SettingsForm {
        SettingsForm {
            option_page: FormGroup::BaseUrl.option_page().to_string(),
            base_url: FieldInput::from_raw(Some(value)),
            ..SettingsForm::default()
        }
    }

    fn userpass_form(username: &str, password: &str, instance: &str) -> SettingsForm {
        SettingsForm {
            option_page: FormGroup::UserPass.option_page().to_string(),
            username: FieldInput::from_raw(Some(username)),
            password: FieldInput::from_raw(Some(password)),
            instance: FieldInput::from_raw(Some(instance)),
            ..SettingsForm::default()
        }
    }

    fn token_form(token: &str) -> SettingsForm {
        SettingsForm {
            option_page: FormGroup::Token.option_page().to_string(),
            token: FieldInput::from_raw(Some(token)),
            ..SettingsForm::default()
        }
    }

    fn delete_form(group: FormGroup) -> SettingsForm {
        SettingsForm {
            option_page: group.option_page().to_string(),
            delete: true,
            ..SettingsForm::default()
        }
    }

    // ---- permission ----

    #[test]
    fn missing_capability_rejects_before_validation() {
        let (sanitizer, notices) = sanitizer();
        let current = SettingsRecord::default();
        let ctx = SaveContext {
            can_manage_options: false,
        };

        let outcome = sanitizer.sanitize(&token_form("secret-token:abc"), &current, &ctx);
        assert!(!outcome.accepted);
        assert!(outcome.verify_mode.is_none());
        assert_eq!(outcome.record, current);
        assert!(notices.has(OPTION_NAME, "taler_options_permission_denied"));
    }

    // ---- base URL group ----

    #[test]
    fn https_base_url_is_accepted_with_auto_verification() {
        let (sanitizer, _) = sanitizer();
        let outcome = sanitizer.sanitize(
            &base_url_form("https://backend.example.com"),
            &SettingsRecord::default(),
            &allowed(),
        );
        assert!(outcome.accepted);
        assert_eq!(outcome.verify_mode, Some(VerifyMode::Auto));
        assert_eq!(
            outcome.record.base_url.as_deref(),
            Some("https://backend.example.com/")
        );
    }

    #[test]
    fn http_base_url_is_rejected() {
        let (sanitizer, notices) = sanitizer();
        let current = SettingsRecord::default();
        let outcome =
            sanitizer.sanitize(&base_url_form("http://example.com"), &current, &allowed());
        assert!(!outcome.accepted);
        assert_eq!(outcome.record, current);
        assert!(notices.has(OPTION_NAME, "taler_baseurl_invalid"));
    }

    #[test]
    fn schemeless_base_url_is_rejected() {
        let (sanitizer, notices) = sanitizer();
        let outcome = sanitizer.sanitize(
            &base_url_form("backend.example.com"),
            &SettingsRecord::default(),
            &allowed(),
        );
        assert!(!outcome.accepted);
        assert!(notices.has(OPTION_NAME, "taler_baseurl_invalid"));
    }

    #[test]
    fn empty_base_url_is_rejected_as_required() {
        let (sanitizer, notices) = sanitizer();
        let outcome = sanitizer.sanitize(
            &base_url_form("   "),
            &SettingsRecord::default(),
            &allowed(),
        );
        assert!(!outcome.accepted);
        assert!(notices.has(OPTION_NAME, "taler_baseurl_required"));
    }

    #[test]
    fn base_url_delete_removes_only_that_field() {
        let (sanitizer, notices) = sanitizer();
        let current = SettingsRecord {
            base_url: Some("https://backend.example.com/".to_string()),
            username: Some("alice".to_string()),
            ..SettingsRecord::default()
        };

        let outcome = sanitizer.sanitize(&delete_form(FormGroup::BaseUrl), &current, &allowed());
        assert!(outcome.accepted);
        assert!(outcome.verify_mode.is_none());
        assert!(outcome.record.base_url.is_none());
        assert_eq!(outcome.record.username.as_deref(), Some("alice"));
        assert!(notices.has(OPTION_NAME, "taler_baseurl_deleted"));
    }

    // ---- user/password group ----

    #[test]
    fn userpass_submission_encrypts_password() {
        let (sanitizer, _) = sanitizer();
        let outcome = sanitizer.sanitize(
            &userpass_form("alice", "s3cret", "sandbox"),
            &SettingsRecord::default(),
            &allowed(),
        );
        assert!(outcome.accepted);
        assert_eq!(outcome.verify_mode, Some(VerifyMode::UserPass));
        assert_eq!(outcome.record.username.as_deref(), Some("alice"));
        assert_eq!(outcome.record.instance.as_deref(), Some("sandbox"));

        let blob = outcome.record.password_encrypted.unwrap();
        assert_ne!(blob, "s3cret");
        assert_eq!(test_secret_box().decrypt(&blob), "s3cret");
    }

    #[test]
    fn missing_username_is_rejected() {
        let (sanitizer, notices) = sanitizer();
        let outcome = sanitizer.sanitize(
            &userpass_form("  ", "s3cret", "sandbox"),
            &SettingsRecord::default(),
            &allowed(),
        );
        assert!(!outcome.accepted);
        assert!(notices.has(OPTION_NAME, "taler_username_required"));
    }

    #[test]
    fn missing_instance_is_rejected() {
        let (sanitizer, notices) = sanitizer();
        let outcome = sanitizer.sanitize(
            &userpass_form("alice", "s3cret", ""),
            &SettingsRecord::default(),
            &allowed(),
        );
        assert!(!outcome.accepted);
        assert!(notices.has(OPTION_NAME, "taler_instance_required"));
    }

    #[test]
    fn blank_password_without_stored_one_is_rejected() {
        let (sanitizer, notices) = sanitizer();
        let outcome = sanitizer.sanitize(
            &userpass_form("alice", "", "sandbox"),
            &SettingsRecord::default(),
            &allowed(),
        );
        assert!(!outcome.accepted);
        assert!(notices.has(OPTION_NAME, "taler_password_required"));
    }

    #[test]
    fn blank_password_keeps_stored_blob() {
        let (sanitizer, _) = sanitizer();
        let current = SettingsRecord {
            username: Some("old-name".to_string()),
            password_encrypted: Some("stored-blob".to_string()),
            instance: Some("old-instance".to_string()),
            ..SettingsRecord::default()
        };

        let outcome = sanitizer.sanitize(
            &userpass_form("alice", "", "sandbox"),
            &current,
            &allowed(),
        );
        assert!(outcome.accepted);
        assert_eq!(outcome.record.username.as_deref(), Some("alice"));
        assert_eq!(outcome.record.instance.as_deref(), Some("sandbox"));
        assert_eq!(
            outcome.record.password_encrypted.as_deref(),
            Some("stored-blob")
        );
    }

    #[test]
    fn userpass_delete_removes_all_three_fields() {
        let (sanitizer, _) = sanitizer();
        let current = SettingsRecord {
            base_url: Some("https://backend.example.com/".to_string()),
            username: Some("alice".to_string()),
            password_encrypted: Some("blob".to_string()),
            instance: Some("sandbox".to_string()),
            ..SettingsRecord::default()
        };

        let outcome = sanitizer.sanitize(&delete_form(FormGroup::UserPass), &current, &allowed());
        assert!(outcome.accepted);
        assert!(outcome.verify_mode.is_none());
        assert!(outcome.record.username.is_none());
        assert!(outcome.record.password_encrypted.is_none());
        assert!(outcome.record.instance.is_none());
        assert_eq!(
            outcome.record.base_url.as_deref(),
            Some("https://backend.example.com/")
        );
    }

    #[test]
    fn userpass_delete_ignores_missing_required_fields() {
        // Delete must bypass validation even when the form carries nothing.
        let (sanitizer, notices) = sanitizer();
        let outcome = sanitizer.sanitize(
            &delete_form(FormGroup::UserPass),
            &SettingsRecord::default(),
            &allowed(),
        );
        assert!(outcome.accepted);
        assert!(!notices.has(OPTION_NAME, "taler_username_required"));
    }

    // ---- token group ----

    #[test]
    fn token_submission_encrypts_token() {
        let (sanitizer, _) = sanitizer();
        let outcome = sanitizer.sanitize(
            &token_form("secret-token:abc"),
            &SettingsRecord::default(),
            &allowed(),
        );
        assert!(outcome.accepted);
        assert_eq!(outcome.verify_mode, Some(VerifyMode::Token));

        let blob = outcome.record.token_encrypted.unwrap();
        assert_eq!(test_secret_box().decrypt(&blob), "secret-token:abc");
    }

    #[test]
    fn blank_token_is_always_rejected() {
        let (sanitizer, notices) = sanitizer();
        let current = SettingsRecord {
            token_encrypted: Some("stored-blob".to_string()),
            ..SettingsRecord::default()
        };

        let outcome = sanitizer.sanitize(&token_form(""), &current, &allowed());
        assert!(!outcome.accepted);
        assert_eq!(outcome.record, current);
        assert!(notices.has(OPTION_NAME, "taler_token_required"));
    }

    #[test]
    fn token_delete_removes_token() {
        let (sanitizer, notices) = sanitizer();
        let current = SettingsRecord {
            token_encrypted: Some("blob".to_string()),
            username: Some("alice".to_string()),
            ..SettingsRecord::default()
        };

        let outcome = sanitizer.sanitize(&delete_form(FormGroup::Token), &current, &allowed());
        assert!(outcome.accepted);
        assert!(outcome.record.token_encrypted.is_none());
        assert_eq!(outcome.record.username.as_deref(), Some("alice"));
        assert!(notices.has(OPTION_NAME, "taler_token_deleted"));
    }

    // ---- unknown group ----

    #[test]
    fn unknown_group_changes_nothing() {
        let (sanitizer, notices) = sanitizer();
        let current = SettingsRecord {
            username: Some("alice".to_string()),
            ..SettingsRecord::default()
        };
        let form = SettingsForm {
            option_page: "mystery_group".to_string(),
            ..SettingsForm::default()
        };

        let outcome = sanitizer.sanitize(&form, &current, &allowed());
        assert!(!outcome.accepted);
        assert_eq!(outcome.record, current);
        assert!(notices.entries().is_empty());
    }
}
