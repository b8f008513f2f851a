//! Test helpers
//!
//! Mock implementations and convenient test factory methods.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use taler_payments_merchant::{
    CheckStage, ClientConfig, ConfigCheckReport, CreatedOrder, MerchantError, OrderRequest,
    OrderStatus, Result as MerchantResult, StageOutcome,
};

use crate::crypto::{SecretBox, SiteSecrets};
use crate::error::CoreResult;
use crate::services::{SettingsNotices, SettingsSaveService};
use crate::traits::{MerchantConnector, OptionsStore};
use crate::types::SettingsRecord;

// ===== MockOptionsStore =====

/// In-memory store that counts commits, so tests can assert that rejected
/// saves never write.
pub struct MockOptionsStore {
    record: RwLock<SettingsRecord>,
    set_calls: RwLock<u32>,
}

impl MockOptionsStore {
    pub fn with_record(record: SettingsRecord) -> Self {
        Self {
            record: RwLock::new(record),
            set_calls: RwLock::new(0),
        }
    }

    /// Number of times `set` was called.
    pub async fn set_calls(&self) -> u32 {
        *self.set_calls.read().await
    }
}

#[async_trait]
impl OptionsStore for MockOptionsStore {
    async fn get(&self) -> CoreResult<SettingsRecord> {
        Ok(self.record.read().await.clone())
    }

    async fn set(&self, record: &SettingsRecord) -> CoreResult<()> {
        *self.record.write().await = record.clone();
        *self.set_calls.write().await += 1;
        Ok(())
    }

    async fn load_raw_json(&self) -> CoreResult<String> {
        let record = self.record.read().await;
        serde_json::to_string(&*record)
            .map_err(|e| crate::error::CoreError::SerializationError(e.to_string()))
    }
}

// ===== MockMerchantConnector =====

/// Scripted connector: returns a fixed report (or error) for every check and
/// a fixed order for order operations, recording call counts and the last
/// config it was handed.
pub struct MockMerchantConnector {
    error: Option<MerchantError>,
    report: ConfigCheckReport,
    order: Option<(String, OrderStatus)>,
    check_calls: RwLock<u32>,
    last_order_config: RwLock<Option<ClientConfig>>,
}

impl MockMerchantConnector {
    /// Connector whose checks always pass.
    pub fn passing() -> Self {
        Self::with_report(passed_report())
    }

    /// Connector that returns the given report from every check.
    pub fn with_report(report: ConfigCheckReport) -> Self {
        Self {
            error: None,
            report,
            order: None,
            check_calls: RwLock::new(0),
            last_order_config: RwLock::new(None),
        }
    }

    /// Connector whose every call fails with the given error.
    pub fn erroring(error: MerchantError) -> Self {
        Self {
            error: Some(error),
            report: ConfigCheckReport::default(),
            order: None,
            check_calls: RwLock::new(0),
            last_order_config: RwLock::new(None),
        }
    }

    /// Script the order returned by `create_order`/`get_order`.
    #[must_use]
    pub fn with_order(mut self, order_id: &str, status: OrderStatus) -> Self {
        self.order = Some((order_id.to_string(), status));
        self
    }

    /// Number of `config_check` calls observed.
    pub async fn config_check_calls(&self) -> u32 {
        *self.check_calls.read().await
    }

    /// The config the last order operation was handed, if any.
    pub async fn last_order_config(&self) -> Option<ClientConfig> {
        self.last_order_config.read().await.clone()
    }
}

#[async_trait]
impl MerchantConnector for MockMerchantConnector {
    async fn config_check(&self, _config: &ClientConfig) -> MerchantResult<ConfigCheckReport> {
        *self.check_calls.write().await += 1;
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self.report.clone())
    }

    async fn create_order(
        &self,
        config: &ClientConfig,
        _request: &OrderRequest,
    ) -> MerchantResult<CreatedOrder> {
        *self.last_order_config.write().await = Some(config.clone());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        let order_id = self
            .order
            .as_ref()
            .map_or_else(|| "order-1".to_string(), |(id, _)| id.clone());
        Ok(CreatedOrder { order_id })
    }

    async fn get_order(
        &self,
        config: &ClientConfig,
        _order_id: &str,
    ) -> MerchantResult<OrderStatus> {
        *self.last_order_config.write().await = Some(config.clone());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self
            .order
            .as_ref()
            .map_or(OrderStatus::Claimed, |(_, status)| status.clone()))
    }
}

// ===== Report helpers =====

/// Report with every attempted stage passed.
pub fn passed_report() -> ConfigCheckReport {
    ConfigCheckReport {
        ok: true,
        config: StageOutcome::passed(200),
        instance: None,
        auth: Some(StageOutcome::passed(200)),
    }
}

/// Report failing at the given stage, earlier stages passed.
pub fn failed_report(
    stage: CheckStage,
    status: Option<u16>,
    error: Option<String>,
) -> ConfigCheckReport {
    let failed = StageOutcome::failed(status, error);
    match stage {
        CheckStage::Config => ConfigCheckReport {
            ok: false,
            config: failed,
            instance: None,
            auth: None,
        },
        CheckStage::Instance => ConfigCheckReport {
            ok: false,
            config: StageOutcome::passed(200),
            instance: Some(failed),
            auth: None,
        },
        CheckStage::Auth => ConfigCheckReport {
            ok: false,
            config: StageOutcome::passed(200),
            instance: None,
            auth: Some(failed),
        },
    }
}

// ===== Factory methods =====

/// Secret box with fixed key material, shared by tests that need to decrypt
/// what the pipeline encrypted.
pub fn test_secret_box() -> SecretBox {
    SecretBox::from_site_secrets(&SiteSecrets {
        auth_key: "test-auth-key".to_string(),
        nonce_key: "test-nonce-key".to_string(),
        logged_in_key: "test-logged-in-key".to_string(),
        site_salt: String::new(),
    })
}

/// Save service wired over mocks, seeded with `current`.
pub fn create_test_save_service(
    current: SettingsRecord,
    connector: Arc<MockMerchantConnector>,
) -> (
    SettingsSaveService,
    Arc<MockOptionsStore>,
    Arc<SettingsNotices>,
) {
    let store = Arc::new(MockOptionsStore::with_record(current));
    let notices = Arc::new(SettingsNotices::new());
    let service = SettingsSaveService::new(
        store.clone(),
        test_secret_box(),
        connector,
        notices.clone(),
    );
    (service, store, notices)
}
