//! Merchant backend connection abstraction trait

use async_trait::async_trait;

use taler_payments_merchant::{
    create_client, ClientConfig, ConfigCheckReport, CreatedOrder, OrderRequest, OrderStatus,
    Result as MerchantResult,
};

/// Seam between the settings core and the merchant backend network client.
///
/// Every call receives the full [`ClientConfig`] because the pipeline probes
/// *candidate* configurations that are not persisted yet — there is no
/// long-lived connection to reuse. Tests substitute a scripted
/// implementation.
#[async_trait]
pub trait MerchantConnector: Send + Sync {
    /// One-attempt handshake against the backend described by `config`.
    async fn config_check(&self, config: &ClientConfig) -> MerchantResult<ConfigCheckReport>;

    /// Create an order.
    async fn create_order(
        &self,
        config: &ClientConfig,
        request: &OrderRequest,
    ) -> MerchantResult<CreatedOrder>;

    /// Fetch an order's payment status.
    async fn get_order(&self, config: &ClientConfig, order_id: &str)
        -> MerchantResult<OrderStatus>;
}

/// Connector backed by real HTTP clients, one per call.
pub struct HttpMerchantConnector;

#[async_trait]
impl MerchantConnector for HttpMerchantConnector {
    async fn config_check(&self, config: &ClientConfig) -> MerchantResult<ConfigCheckReport> {
        create_client(config.clone())?.config_check().await
    }

    async fn create_order(
        &self,
        config: &ClientConfig,
        request: &OrderRequest,
    ) -> MerchantResult<CreatedOrder> {
        create_client(config.clone())?.create_order(request).await
    }

    async fn get_order(
        &self,
        config: &ClientConfig,
        order_id: &str,
    ) -> MerchantResult<OrderStatus> {
        create_client(config.clone())?.get_order(order_id).await
    }
}
