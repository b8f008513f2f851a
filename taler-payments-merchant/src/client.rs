//! Merchant backend HTTP client.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{MerchantError, Result};
use crate::http::{create_http_client, HttpUtils};
use crate::traits::MerchantBackend;
use crate::types::{
    AuthKind, ClientConfig, ConfigCheckReport, CreatedOrder, LoginTokenRequest, LoginTokenResponse,
    MerchantAuth, MerchantConfig, OrderRequest, OrderStatus, RelativeTime, StageOutcome,
};

/// Client for one merchant backend, bound to one [`ClientConfig`].
///
/// Construction validates the base URL but performs no network I/O; every
/// operation is a single attempt bounded by the client's timeouts.
pub struct MerchantClient {
    pub(crate) client: Client,
    /// Normalized base URL, no trailing slash.
    pub(crate) base_url: String,
    pub(crate) auth: MerchantAuth,
}

/// Standard Taler error body, `{"code": <EC>, "hint": "..."}`.
#[derive(Deserialize)]
struct ErrorDetail {
    code: Option<i64>,
    hint: Option<String>,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Extract a short error identifier from a backend error body.
///
/// Prefers the numeric Taler error code (`ec-<n>`); falls back to the hint.
fn error_slug_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorDetail>(body)
        .ok()
        .and_then(|d| d.code.map(|c| format!("ec-{c}")).or(d.hint))
}

impl MerchantClient {
    /// Create a client from connection parameters.
    ///
    /// # Errors
    ///
    /// Returns [`MerchantError::InvalidConfiguration`] if the base URL does
    /// not parse as an absolute `http(s)` URL.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let trimmed = config.base_url.trim();
        let parsed = Url::parse(trimmed).map_err(|e| MerchantError::InvalidConfiguration {
            detail: format!("invalid base URL: {e}"),
        })?;
        if parsed.scheme() != "https" && parsed.scheme() != "http" {
            return Err(MerchantError::InvalidConfiguration {
                detail: format!("unsupported URL scheme '{}'", parsed.scheme()),
            });
        }
        if parsed.host_str().is_none() {
            return Err(MerchantError::InvalidConfiguration {
                detail: "base URL has no host".to_string(),
            });
        }

        let client = create_http_client().map_err(|e| MerchantError::NetworkError {
            detail: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            auth: config.auth,
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Base of the authenticated API for the configured auth method.
    ///
    /// Token auth addresses an instance-scoped base URL directly; user/pass
    /// auth goes through the instance management prefix.
    pub(crate) fn private_base(&self) -> String {
        match &self.auth {
            MerchantAuth::UserPass { instance, .. } => {
                format!("{}/instances/{instance}/private", self.base_url)
            }
            _ => format!("{}/private", self.base_url),
        }
    }

    /// Raw login token request, `POST /instances/{id}/private/token`.
    async fn login_token_raw(&self) -> Result<(u16, String)> {
        let MerchantAuth::UserPass {
            username,
            password,
            instance,
            scope,
            duration_us,
            description,
        } = &self.auth
        else {
            return Err(MerchantError::InvalidConfiguration {
                detail: "login token requested without user/pass credentials".to_string(),
            });
        };

        let path = format!("instances/{instance}/private/token");
        let body = LoginTokenRequest {
            scope: scope.clone(),
            duration: RelativeTime {
                d_us: *duration_us,
            },
            description: Some(description.clone()),
        };
        let builder = self
            .client
            .post(self.endpoint(&path))
            .basic_auth(username, Some(password))
            .json(&body);
        HttpUtils::execute_request(builder, "POST", &path).await
    }

    /// Obtain a login token, mapping rejections to typed errors.
    async fn obtain_login_token(&self) -> Result<String> {
        let (status, body) = self.login_token_raw().await?;
        if !is_success(status) {
            return Err(self.classify_api_error(status, &body));
        }
        let response: LoginTokenResponse = HttpUtils::parse_json(&body)?;
        Ok(response.token)
    }

    /// Authorization header value for order operations, if any.
    async fn authorization_header(&self) -> Result<Option<String>> {
        match &self.auth {
            MerchantAuth::None => Ok(None),
            MerchantAuth::Token { authorization } => Ok(Some(authorization.clone())),
            MerchantAuth::UserPass { .. } => {
                let token = self.obtain_login_token().await?;
                Ok(Some(format!("Bearer {token}")))
            }
        }
    }

    fn classify_api_error(&self, status: u16, body: &str) -> MerchantError {
        let slug = error_slug_from_body(body);
        match status {
            401 => MerchantError::InvalidCredentials {
                http_status: Some(status),
                raw_hint: slug,
            },
            403 => MerchantError::PermissionDenied { raw_hint: slug },
            404 => {
                if let MerchantAuth::UserPass { instance, .. } = &self.auth {
                    MerchantError::InstanceNotFound {
                        instance: instance.clone(),
                        http_status: Some(status),
                    }
                } else {
                    MerchantError::ApiError {
                        http_status: status,
                        error_slug: slug,
                    }
                }
            }
            _ => MerchantError::ApiError {
                http_status: status,
                error_slug: slug,
            },
        }
    }
}

#[async_trait]
impl MerchantBackend for MerchantClient {
    fn auth_kind(&self) -> AuthKind {
        self.auth.kind()
    }

    async fn config_check(&self) -> Result<ConfigCheckReport> {
        let mut report = ConfigCheckReport::default();

        // Stage 1: config discovery.
        let (status, body) =
            HttpUtils::execute_request(self.client.get(self.endpoint("config")), "GET", "/config")
                .await?;
        if !is_success(status) {
            report.config = StageOutcome::failed(Some(status), error_slug_from_body(&body));
            return Ok(report);
        }
        // A 2xx body that is not a merchant config means the URL points at
        // something else entirely.
        serde_json::from_str::<MerchantConfig>(&body).map_err(|_| {
            MerchantError::InvalidConfiguration {
                detail: "config endpoint did not return a merchant config".to_string(),
            }
        })?;
        report.config = StageOutcome::passed(status);

        // Stage 2: instance existence (user/pass only; token auth is already
        // scoped to an instance by its base URL).
        if let MerchantAuth::UserPass { instance, .. } = &self.auth {
            let path = format!("instances/{instance}/config");
            let (status, body) =
                HttpUtils::execute_request(self.client.get(self.endpoint(&path)), "GET", &path)
                    .await?;
            if !is_success(status) {
                report.instance = Some(StageOutcome::failed(
                    Some(status),
                    error_slug_from_body(&body),
                ));
                return Ok(report);
            }
            report.instance = Some(StageOutcome::passed(status));
        }

        // Stage 3: authenticated access.
        match &self.auth {
            MerchantAuth::None => {
                // Nothing to authenticate; the bare config check is the result.
                report.ok = true;
            }
            MerchantAuth::Token { authorization } => {
                let url = format!("{}/private", self.base_url);
                let builder = self
                    .client
                    .get(&url)
                    .header(AUTHORIZATION, authorization.as_str());
                let (status, body) =
                    HttpUtils::execute_request(builder, "GET", "/private").await?;
                if is_success(status) {
                    report.auth = Some(StageOutcome::passed(status));
                    report.ok = true;
                } else {
                    report.auth = Some(StageOutcome::failed(
                        Some(status),
                        error_slug_from_body(&body),
                    ));
                }
            }
            MerchantAuth::UserPass { .. } => {
                let (status, body) = self.login_token_raw().await?;
                if is_success(status) {
                    report.auth = Some(StageOutcome::passed(status));
                    report.ok = true;
                } else {
                    report.auth = Some(StageOutcome::failed(
                        Some(status),
                        error_slug_from_body(&body),
                    ));
                }
            }
        }

        Ok(report)
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<CreatedOrder> {
        let url = format!("{}/orders", self.private_base());
        let mut builder = self.client.post(&url).json(request);
        if let Some(header) = self.authorization_header().await? {
            builder = builder.header(AUTHORIZATION, header);
        }
        let (status, body) = HttpUtils::execute_request(builder, "POST", "private/orders").await?;
        if !is_success(status) {
            return Err(self.classify_api_error(status, &body));
        }
        HttpUtils::parse_json(&body)
    }

    async fn get_order(&self, order_id: &str) -> Result<OrderStatus> {
        let url = format!("{}/orders/{order_id}", self.private_base());
        let mut builder = self.client.get(&url);
        if let Some(header) = self.authorization_header().await? {
            builder = builder.header(AUTHORIZATION, header);
        }
        let (status, body) =
            HttpUtils::execute_request(builder, "GET", "private/orders/{id}").await?;
        if !is_success(status) {
            return Err(self.classify_api_error(status, &body));
        }
        HttpUtils::parse_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_config() -> ClientConfig {
        ClientConfig {
            base_url: "https://backend.demo.taler.net/".to_string(),
            auth: MerchantAuth::Token {
                authorization: "Bearer secret-token:abc".to_string(),
            },
        }
    }

    fn userpass_config() -> ClientConfig {
        ClientConfig {
            base_url: "https://backend.demo.taler.net".to_string(),
            auth: MerchantAuth::UserPass {
                username: "alice".to_string(),
                password: "s3cret".to_string(),
                instance: "sandbox".to_string(),
                scope: "readonly".to_string(),
                duration_us: 3_600_000_000,
                description: "settings check".to_string(),
            },
        }
    }

    #[test]
    fn new_strips_trailing_slash() {
        let client = MerchantClient::new(token_config()).unwrap();
        assert_eq!(client.base_url, "https://backend.demo.taler.net");
    }

    #[test]
    fn new_rejects_garbage_url() {
        let config = ClientConfig::unauthenticated("not a url");
        let result = MerchantClient::new(config);
        assert!(matches!(
            result,
            Err(MerchantError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn new_rejects_non_http_scheme() {
        let config = ClientConfig::unauthenticated("ftp://backend.example.com");
        let result = MerchantClient::new(config);
        assert!(matches!(
            result,
            Err(MerchantError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn endpoint_joins_paths() {
        let client = MerchantClient::new(token_config()).unwrap();
        assert_eq!(
            client.endpoint("config"),
            "https://backend.demo.taler.net/config"
        );
        assert_eq!(
            client.endpoint("/instances/x/config"),
            "https://backend.demo.taler.net/instances/x/config"
        );
    }

    #[test]
    fn private_base_for_token_auth() {
        let client = MerchantClient::new(token_config()).unwrap();
        assert_eq!(
            client.private_base(),
            "https://backend.demo.taler.net/private"
        );
    }

    #[test]
    fn private_base_for_userpass_auth() {
        let client = MerchantClient::new(userpass_config()).unwrap();
        assert_eq!(
            client.private_base(),
            "https://backend.demo.taler.net/instances/sandbox/private"
        );
    }

    #[test]
    fn error_slug_prefers_numeric_code() {
        let slug = error_slug_from_body(r#"{"code":2000,"hint":"instance unknown"}"#);
        assert_eq!(slug.as_deref(), Some("ec-2000"));
    }

    #[test]
    fn error_slug_falls_back_to_hint() {
        let slug = error_slug_from_body(r#"{"hint":"instance unknown"}"#);
        assert_eq!(slug.as_deref(), Some("instance unknown"));
    }

    #[test]
    fn error_slug_none_for_non_json() {
        assert_eq!(error_slug_from_body("<html>504</html>"), None);
    }

    #[test]
    fn classify_401_as_invalid_credentials() {
        let client = MerchantClient::new(token_config()).unwrap();
        let err = client.classify_api_error(401, r#"{"code":1000}"#);
        assert!(matches!(
            err,
            MerchantError::InvalidCredentials {
                http_status: Some(401),
                ..
            }
        ));
    }

    #[test]
    fn classify_404_as_instance_not_found_for_userpass() {
        let client = MerchantClient::new(userpass_config()).unwrap();
        let err = client.classify_api_error(404, "");
        assert!(matches!(
            err,
            MerchantError::InstanceNotFound { instance, .. } if instance == "sandbox"
        ));
    }
}
