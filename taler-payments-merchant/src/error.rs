use serde::{Deserialize, Serialize};

/// Unified error type for all merchant backend operations.
///
/// Variants carry enough context (HTTP status, backend error hint) for the
/// caller to produce an actionable message without echoing credentials.
/// All variants are serializable for structured error reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum MerchantError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The configured endpoint does not behave like a Taler merchant backend
    /// (unparseable base URL, or `/config` did not return a merchant config).
    InvalidConfiguration {
        /// What made the endpoint look wrong.
        detail: String,
    },

    /// The backend rejected the presented credentials.
    InvalidCredentials {
        /// HTTP status of the rejecting response, if available.
        http_status: Option<u16>,
        /// Backend error hint, if available.
        raw_hint: Option<String>,
    },

    /// The named merchant instance does not exist on the backend.
    InstanceNotFound {
        /// Instance ID that was not found.
        instance: String,
        /// HTTP status of the response, if available.
        http_status: Option<u16>,
    },

    /// The credentials are valid but lack the required scope.
    PermissionDenied {
        /// Backend error hint, if available.
        raw_hint: Option<String>,
    },

    /// The backend returned a non-success status not covered by a more
    /// specific variant.
    ApiError {
        /// HTTP status of the failing response.
        http_status: u16,
        /// Short error identifier extracted from the response body, if any.
        error_slug: Option<String>,
    },

    /// A response body could not be parsed.
    ParseError {
        /// Error details.
        detail: String,
    },
}

impl MerchantError {
    /// Whether this is expected behavior (bad input, wrong credentials) rather
    /// than an infrastructure fault. Used for log-level classification:
    /// `warn` when `true`, `error` when `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration { .. }
                | Self::InvalidCredentials { .. }
                | Self::InstanceNotFound { .. }
                | Self::PermissionDenied { .. }
        )
    }

    /// HTTP status attached to this error, if any.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::InvalidCredentials { http_status, .. }
            | Self::InstanceNotFound { http_status, .. } => *http_status,
            Self::ApiError { http_status, .. } => Some(*http_status),
            _ => None,
        }
    }

    /// Short machine-readable identifier for user-facing failure hints.
    #[must_use]
    pub fn error_slug(&self) -> Option<String> {
        match self {
            Self::NetworkError { .. } => Some("network".to_string()),
            Self::Timeout { .. } => Some("timeout".to_string()),
            Self::InvalidConfiguration { .. } => Some("not-a-merchant-backend".to_string()),
            Self::InvalidCredentials { .. } => Some("unauthorized".to_string()),
            Self::InstanceNotFound { .. } => Some("instance-unknown".to_string()),
            Self::PermissionDenied { .. } => Some("forbidden".to_string()),
            Self::ApiError { error_slug, .. } => error_slug.clone(),
            Self::ParseError { .. } => Some("bad-response".to_string()),
        }
    }
}

impl std::fmt::Display for MerchantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timed out: {detail}"),
            Self::InvalidConfiguration { detail } => {
                write!(f, "Invalid merchant backend configuration: {detail}")
            }
            Self::InvalidCredentials {
                http_status,
                raw_hint,
            } => match (http_status, raw_hint) {
                (Some(status), Some(hint)) => {
                    write!(f, "Invalid credentials (HTTP {status}): {hint}")
                }
                (Some(status), None) => write!(f, "Invalid credentials (HTTP {status})"),
                (None, Some(hint)) => write!(f, "Invalid credentials: {hint}"),
                (None, None) => write!(f, "Invalid credentials"),
            },
            Self::InstanceNotFound { instance, .. } => {
                write!(f, "Instance '{instance}' not found")
            }
            Self::PermissionDenied { raw_hint } => {
                if let Some(hint) = raw_hint {
                    write!(f, "Permission denied: {hint}")
                } else {
                    write!(f, "Permission denied")
                }
            }
            Self::ApiError {
                http_status,
                error_slug,
            } => {
                if let Some(slug) = error_slug {
                    write!(f, "Backend error (HTTP {http_status}): {slug}")
                } else {
                    write!(f, "Backend error (HTTP {http_status})")
                }
            }
            Self::ParseError { detail } => write!(f, "Parse error: {detail}"),
        }
    }
}

impl std::error::Error for MerchantError {}

/// Convenience type alias for `Result<T, MerchantError>`.
pub type Result<T> = std::result::Result<T, MerchantError>;
