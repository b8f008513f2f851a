//! Shared HTTP plumbing for the merchant client.
//!
//! Requests stay flexible (the client builds its own `RequestBuilder` per
//! endpoint); sending, logging, and body reading are unified here. The
//! handshake used before a settings save is single-attempt, so there is no
//! retry machinery.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::MerchantError;

/// Default connect timeout (seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds).
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of bytes of a response body to include in logs.
const TRUNCATE_LIMIT: usize = 256;

/// Create an HTTP client with bounded timeouts.
pub fn create_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
}

/// HTTP tool function set.
pub struct HttpUtils;

impl HttpUtils {
    /// Perform an HTTP request and return `(status_code, response_text)`.
    ///
    /// Transport failures map to [`MerchantError::Timeout`] or
    /// [`MerchantError::NetworkError`]; any received response is returned
    /// as-is for the caller to classify.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        path: &str,
    ) -> Result<(u16, String), MerchantError> {
        log::debug!("[merchant] {method_name} {path}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                MerchantError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                MerchantError::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[merchant] Response Status: {status_code}");

        let response_text = response
            .text()
            .await
            .map_err(|e| MerchantError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[merchant] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    pub fn parse_json<T>(response_text: &str) -> Result<T, MerchantError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[merchant] JSON parse failed: {e}");
            log::error!(
                "[merchant] Raw response: {}",
                truncate_for_log(response_text)
            );
            MerchantError::ParseError {
                detail: e.to_string(),
            }
        })
    }
}

/// Largest index `<= index` that lies on a char boundary of `s`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a response body for safe logging.
///
/// Keeps tokens and order payloads from being fully exposed in debug logs.
pub(crate) fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}
