//! Order operations using the runtime credential
//!
//! Thin consumer of [`AuthService::runtime_config`]: creates an order on the
//! backend and fetches its unpaid status to hand the `taler://` pay URI to
//! the payment surface.

use std::sync::Arc;

use taler_payments_merchant::{Order, OrderRequest, OrderStatus};

use crate::error::CoreResult;
use crate::services::auth_service::AuthService;
use crate::traits::{MerchantConnector, OptionsStore};

const FULFILLMENT_MESSAGE: &str =
    "Thank you for your purchase. Your order will be fulfilled after payment.";

/// Order creation and status lookup against the configured backend.
pub struct OrderService {
    store: Arc<dyn OptionsStore>,
    auth: AuthService,
    connector: Arc<dyn MerchantConnector>,
}

impl OrderService {
    /// Create an order service instance.
    #[must_use]
    pub fn new(
        store: Arc<dyn OptionsStore>,
        auth: AuthService,
        connector: Arc<dyn MerchantConnector>,
    ) -> Self {
        Self {
            store,
            auth,
            connector,
        }
    }

    /// Create a new order and return its `taler://` pay URI.
    ///
    /// Returns `Ok(None)` when the created order is not in the unpaid state
    /// or carries no pay URI — the caller decides how to surface that.
    ///
    /// # Arguments
    /// * `amount` - amount string, `CURRENCY:VALUE` (the currency must be
    ///   supported by the backend's exchange)
    /// * `summary` - human-readable order summary
    pub async fn create_order_pay_uri(
        &self,
        amount: &str,
        summary: &str,
    ) -> CoreResult<Option<String>> {
        let record = self.store.get().await?;
        let config = self.auth.runtime_config(&record);

        let request = OrderRequest {
            order: Order {
                summary: summary.trim().to_string(),
                amount: amount.trim().to_string(),
                fulfillment_message: Some(FULFILLMENT_MESSAGE.to_string()),
            },
        };

        let created = self.connector.create_order(&config, &request).await?;
        let status = self
            .connector
            .get_order(&config, &created.order_id)
            .await?;

        match status {
            OrderStatus::Unpaid { taler_pay_uri } => Ok(taler_pay_uri),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::test_utils::{test_secret_box, MockMerchantConnector};
    use crate::traits::InMemoryOptionsStore;
    use crate::types::SettingsRecord;
    use taler_payments_merchant::{MerchantAuth, MerchantError};

    fn service_with(connector: Arc<MockMerchantConnector>) -> OrderService {
        let sbox = test_secret_box();
        let store = Arc::new(InMemoryOptionsStore::with_record(SettingsRecord {
            base_url: Some("https://backend.example.com/".to_string()),
            token_encrypted: Some(sbox.encrypt("secret-token:abc")),
            ..SettingsRecord::default()
        }));
        OrderService::new(store, AuthService::new(sbox), connector)
    }

    #[tokio::test]
    async fn returns_pay_uri_for_unpaid_order() {
        let connector = Arc::new(MockMerchantConnector::passing().with_order(
            "order-1",
            OrderStatus::Unpaid {
                taler_pay_uri: Some("taler://pay/backend.example.com/order-1".to_string()),
            },
        ));
        let svc = service_with(connector.clone());

        let uri = svc
            .create_order_pay_uri("KUDOS:1.00", "Donation")
            .await
            .unwrap();
        assert_eq!(
            uri.as_deref(),
            Some("taler://pay/backend.example.com/order-1")
        );

        // The runtime credential (token priority) was used for both calls
        let config = connector.last_order_config().await.unwrap();
        assert_eq!(
            config.auth,
            MerchantAuth::Token {
                authorization: "Bearer secret-token:abc".to_string()
            }
        );
    }

    #[tokio::test]
    async fn returns_none_when_order_already_claimed() {
        let connector = Arc::new(
            MockMerchantConnector::passing().with_order("order-1", OrderStatus::Claimed),
        );
        let svc = service_with(connector);

        let uri = svc
            .create_order_pay_uri("KUDOS:1.00", "Donation")
            .await
            .unwrap();
        assert!(uri.is_none());
    }

    #[tokio::test]
    async fn returns_none_when_pay_uri_missing() {
        let connector = Arc::new(MockMerchantConnector::passing().with_order(
            "order-1",
            OrderStatus::Unpaid {
                taler_pay_uri: None,
            },
        ));
        let svc = service_with(connector);

        let uri = svc
            .create_order_pay_uri("KUDOS:1.00", "Donation")
            .await
            .unwrap();
        assert!(uri.is_none());
    }

    #[tokio::test]
    async fn backend_errors_surface_as_core_errors() {
        let connector = Arc::new(MockMerchantConnector::erroring(
            MerchantError::InvalidCredentials {
                http_status: Some(401),
                raw_hint: None,
            },
        ));
        let svc = service_with(connector);

        let result = svc.create_order_pay_uri("KUDOS:1.00", "Donation").await;
        assert!(matches!(result, Err(CoreError::Merchant(_))));
    }
}
