use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AuthKind, ConfigCheckReport, CreatedOrder, OrderRequest, OrderStatus};

/// Merchant backend operations consumed by the settings core.
///
/// Implemented by [`MerchantClient`](crate::MerchantClient); mock
/// implementations stand in for the network in tests.
#[async_trait]
pub trait MerchantBackend: Send + Sync {
    /// Credential family this client was configured with.
    fn auth_kind(&self) -> AuthKind;

    /// Lightweight handshake: config discovery, instance existence (when
    /// applicable), authenticated access. Single attempt; the first failing
    /// stage short-circuits the rest.
    async fn config_check(&self) -> Result<ConfigCheckReport>;

    /// Create an order on the backend.
    async fn create_order(&self, request: &OrderRequest) -> Result<CreatedOrder>;

    /// Fetch the payment status of an order.
    async fn get_order(&self, order_id: &str) -> Result<OrderStatus>;
}
