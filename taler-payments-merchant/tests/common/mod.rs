//! Shared helpers for live backend tests.

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use taler_payments_merchant::{
    create_client, ClientConfig, MerchantAuth, MerchantBackend,
};

/// Skip the test when an environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_backend {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Live test context built from environment variables.
pub struct TestContext {
    pub client: Arc<dyn MerchantBackend>,
}

impl TestContext {
    /// Token-auth context: `TALER_BASE_URL` + `TALER_TOKEN`.
    pub fn with_token() -> Option<Self> {
        let base_url = env::var("TALER_BASE_URL").ok()?;
        let token = env::var("TALER_TOKEN").ok()?;
        let client = create_client(ClientConfig {
            base_url,
            auth: MerchantAuth::Token {
                authorization: format!("Bearer {token}"),
            },
        })
        .ok()?;
        Some(Self { client })
    }

    /// User/pass context: `TALER_BASE_URL` + `TALER_USERNAME` +
    /// `TALER_PASSWORD` + `TALER_INSTANCE`.
    pub fn with_userpass() -> Option<Self> {
        let base_url = env::var("TALER_BASE_URL").ok()?;
        let client = create_client(ClientConfig {
            base_url,
            auth: MerchantAuth::UserPass {
                username: env::var("TALER_USERNAME").ok()?,
                password: env::var("TALER_PASSWORD").ok()?,
                instance: env::var("TALER_INSTANCE").ok()?,
                scope: "readonly".to_string(),
                duration_us: 3_600_000_000,
                description: "taler-payments-merchant live test".to_string(),
            },
        })
        .ok()?;
        Some(Self { client })
    }

    /// Unauthenticated context: `TALER_BASE_URL` only.
    pub fn unauthenticated() -> Option<Self> {
        let base_url = env::var("TALER_BASE_URL").ok()?;
        let client = create_client(ClientConfig::unauthenticated(base_url)).ok()?;
        Some(Self { client })
    }
}
