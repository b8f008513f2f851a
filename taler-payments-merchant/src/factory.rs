//! Client factory.

use std::sync::Arc;

use crate::client::MerchantClient;
use crate::error::Result;
use crate::traits::MerchantBackend;
use crate::types::ClientConfig;

/// Creates a [`MerchantBackend`] client from connection parameters.
///
/// The returned client is wrapped in `Arc<dyn MerchantBackend>` for easy
/// sharing across async tasks.
///
/// # Errors
///
/// Returns [`MerchantError::InvalidConfiguration`](crate::MerchantError::InvalidConfiguration)
/// if the base URL does not parse.
///
/// # Examples
///
/// ```rust,no_run
/// use taler_payments_merchant::{create_client, ClientConfig, MerchantAuth};
///
/// let client = create_client(ClientConfig {
///     base_url: "https://backend.demo.taler.net".to_string(),
///     auth: MerchantAuth::Token {
///         authorization: "Bearer secret-token:...".to_string(),
///     },
/// }).unwrap();
/// ```
pub fn create_client(config: ClientConfig) -> Result<Arc<dyn MerchantBackend>> {
    Ok(Arc::new(MerchantClient::new(config)?))
}
