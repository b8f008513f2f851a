//! Pre-commit backend verification
//!
//! Performs a lightweight merchant backend login/config check on a *candidate*
//! settings record and surfaces the outcome as settings notices. One instance
//! lives per request: its run guard suppresses duplicate identical checks so
//! a single save never issues the same remote call (or notice) twice.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sha2::{Digest, Sha256};

use taler_payments_merchant::{ClientConfig, ConfigCheckReport, MerchantError};

use crate::services::auth_service::AuthService;
use crate::services::notices::SettingsNotices;
use crate::traits::MerchantConnector;
use crate::types::{NoticeSeverity, SettingsRecord, VerifyMode, OPTION_NAME};

/// Merchant backend login check with per-request deduplication.
pub struct BackendCheckService {
    auth: AuthService,
    connector: Arc<dyn MerchantConnector>,
    notices: Arc<SettingsNotices>,
    ran: Mutex<HashSet<String>>,
}

impl BackendCheckService {
    /// Create a check service instance for one request.
    #[must_use]
    pub fn new(
        auth: AuthService,
        connector: Arc<dyn MerchantConnector>,
        notices: Arc<SettingsNotices>,
    ) -> Self {
        Self {
            auth,
            connector,
            notices,
            ran: Mutex::new(HashSet::new()),
        }
    }

    fn ran_guard(&self) -> MutexGuard<'_, HashSet<String>> {
        self.ran.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Test whether the credentials in `record` authenticate against the
    /// backend.
    ///
    /// Checks only run when a base URL is set and the selected mode's
    /// credentials are present; otherwise the check is skipped and counts as
    /// passed. A repeated check for the same `(mode, candidate)` within this
    /// request is also reported as passed without a remote call.
    pub async fn test_login(&self, record: &SettingsRecord, mode: VerifyMode) -> bool {
        let Some(context) = self.auth.login_check_context(record, mode) else {
            return true;
        };

        let label = context.auth_kind.label();
        let hint = context.auth_kind.credential_hint();

        let run_key = format!("{}|{}", mode.as_str(), fingerprint(&context.config));
        if !self.ran_guard().insert(run_key) {
            return true;
        }

        match self.connector.config_check(&context.config).await {
            Ok(report) if report.ok => {
                self.notices.add_once(
                    OPTION_NAME,
                    "taler_backend_login_ok",
                    format!("Merchant backend login test successful ({label})."),
                    NoticeSeverity::Updated,
                );
                true
            }
            Ok(report) => {
                self.add_failure_notice(label, &report);
                false
            }
            Err(MerchantError::InvalidConfiguration { detail }) => {
                log::warn!("backend check: invalid configuration: {detail}");
                self.notices.add_once(
                    OPTION_NAME,
                    "taler_backend_login_invalid",
                    "Merchant backend login test failed: invalid configuration \
                     (is this a Taler merchant backend base URL?)",
                    NoticeSeverity::Error,
                );
                false
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("backend check failed: {e}");
                } else {
                    log::error!("backend check failed: {e}");
                }
                // Keep the message generic; the error may carry request details.
                self.notices.add_once(
                    OPTION_NAME,
                    "taler_backend_login_exception",
                    format!(
                        "Merchant backend login test failed (error: {label}). \
                         Please verify the base URL and {hint}."
                    ),
                    NoticeSeverity::Error,
                );
                false
            }
        }
    }

    fn add_failure_notice(&self, label: &str, report: &ConfigCheckReport) {
        let (stage, status, error) = report
            .failing_stage()
            .map(|(stage, outcome)| (stage.as_str(), outcome.status, outcome.error.clone()))
            .unwrap_or(("auth", None, None));

        let status_text = status.map(|s| format!(" (HTTP {s})")).unwrap_or_default();
        let error_text = error.map(|e| format!(" {e}")).unwrap_or_default();

        self.notices.add_once(
            OPTION_NAME,
            "taler_backend_login_failed",
            format!(
                "Merchant backend login test failed (error: {label}): \
                 {stage}{status_text}.{error_text}"
            ),
            NoticeSeverity::Error,
        );
    }
}

/// Stable digest of a candidate configuration, for the run guard.
fn fingerprint(config: &ClientConfig) -> String {
    serde_json::to_vec(config)
        .map(|bytes| hex::encode(Sha256::digest(&bytes)))
        .unwrap_or_default()
}
