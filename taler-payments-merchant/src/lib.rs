//! # taler-payments-merchant
//!
//! HTTP client for the GNU Taler merchant backend private API, covering the
//! operations the settings core needs: config discovery, instance existence,
//! authenticated-access probing, login-token acquisition, and order
//! create/status.
//!
//! ## Auth Methods
//!
//! | Method | How it authenticates |
//! |--------|----------------------|
//! | [`MerchantAuth::Token`] | Pre-issued token sent as the `Authorization` header |
//! | [`MerchantAuth::UserPass`] | HTTP Basic login that obtains a scoped bearer token |
//! | [`MerchantAuth::None`] | Unauthenticated; only `/config` discovery is meaningful |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taler_payments_merchant::{create_client, ClientConfig, MerchantAuth, MerchantBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = create_client(ClientConfig {
//!         base_url: "https://backend.demo.taler.net".to_string(),
//!         auth: MerchantAuth::Token {
//!             authorization: "Bearer secret-token:...".to_string(),
//!         },
//!     })?;
//!
//!     let report = client.config_check().await?;
//!     if let Some((stage, outcome)) = report.failing_stage() {
//!         println!("handshake failed at {}: {:?}", stage.as_str(), outcome);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, MerchantError>`](MerchantError). The
//! handshake is deliberately single-attempt — the caller decides whether a
//! failure means "surface it" or "roll back" — so there is no retry layer.

mod client;
mod error;
mod factory;
mod http;
mod traits;
mod types;

// Re-export error types
pub use error::{MerchantError, Result};

// Re-export factory function
pub use factory::create_client;

// Re-export core trait
pub use traits::MerchantBackend;

// Re-export types
pub use types::{
    AuthKind, CheckStage, ClientConfig, ConfigCheckReport, CreatedOrder, LoginTokenRequest,
    LoginTokenResponse, MerchantAuth, MerchantConfig, Order, OrderRequest, OrderStatus,
    RelativeTime, StageOutcome,
};

// Re-export concrete client
pub use client::MerchantClient;
