//! Settings save orchestration
//!
//! Top-level entry point for one settings save: route the submission,
//! sanitize the targeted group, verify candidate credentials against the
//! backend when required, then commit through the options store — or roll
//! back to the previous record. Rejections and failed verifications never
//! touch storage, so a syntactically valid but practically wrong credential
//! is never committed.

use std::sync::Arc;

use crate::crypto::SecretBox;
use crate::error::CoreResult;
use crate::services::auth_service::AuthService;
use crate::services::backend_check_service::BackendCheckService;
use crate::services::notices::SettingsNotices;
use crate::services::sanitizer::Sanitizer;
use crate::traits::{MerchantConnector, OptionsStore};
use crate::types::{SaveContext, SettingsForm, SettingsRecord};

/// Orchestrates the settings save flow (sanitization, connectivity
/// validation, commit/rollback).
///
/// Construct one instance per request: the notice sink and the check
/// service's run guard are request-scoped dedup state.
pub struct SettingsSaveService {
    store: Arc<dyn OptionsStore>,
    sanitizer: Sanitizer,
    checker: BackendCheckService,
}

impl SettingsSaveService {
    /// Wire a save service from its per-request collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn OptionsStore>,
        secret_box: SecretBox,
        connector: Arc<dyn MerchantConnector>,
        notices: Arc<SettingsNotices>,
    ) -> Self {
        let sanitizer = Sanitizer::new(notices.clone(), secret_box.clone());
        let checker =
            BackendCheckService::new(AuthService::new(secret_box), connector, notices);
        Self {
            store,
            sanitizer,
            checker,
        }
    }

    /// Process one settings submission.
    ///
    /// Returns the record that is now current: the committed candidate on
    /// success, the previous record on any rejection or failed verification.
    /// Outcome details are reported through the notice sink; only storage I/O
    /// surfaces as `Err`.
    pub async fn save(
        &self,
        form: &SettingsForm,
        ctx: &SaveContext,
    ) -> CoreResult<SettingsRecord> {
        let current = self.store.get().await?;

        let outcome = self.sanitizer.sanitize(form, &current, ctx);
        if !outcome.accepted {
            return Ok(current);
        }

        if let Some(mode) = outcome.verify_mode {
            // Probe the candidate, not the stored record: a save only commits
            // once its credentials are proven reachable.
            if !self.checker.test_login(&outcome.record, mode).await {
                return Ok(current);
            }
        }

        self.store.set(&outcome.record).await?;
        Ok(outcome.record)
    }
}
