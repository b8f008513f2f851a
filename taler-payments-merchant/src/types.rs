use serde::{Deserialize, Serialize};

// ============ Authentication ============

/// Which credential family a configuration uses, for labeling and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthKind {
    /// No credentials configured.
    None,
    /// Pre-issued access token.
    Token,
    /// Username/password login against a named instance.
    UserPass,
}

impl AuthKind {
    /// Human-readable label for notices.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "Credentials",
            Self::Token => "Access Token",
            Self::UserPass => "Username & Password",
        }
    }

    /// Hint naming the fields the operator should double-check.
    #[must_use]
    pub fn credential_hint(&self) -> &'static str {
        match self {
            Self::None => "credentials",
            Self::Token => "access token",
            Self::UserPass => "username, password, and instance ID",
        }
    }
}

/// Type-safe credential container for merchant backend access.
///
/// Built fresh per request from decrypted settings; never persisted.
///
/// # Serialization
///
/// Serialized as a tagged enum with `"method"` as the tag and `"credentials"`
/// as the content. Serialization exists for request fingerprinting and
/// structured logging of *shape*, not for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "credentials")]
pub enum MerchantAuth {
    /// No credentials; only unauthenticated endpoints are reachable.
    #[serde(rename = "none")]
    None,

    /// Pre-issued access token.
    #[serde(rename = "token")]
    Token {
        /// Full `Authorization` header value (e.g. `Bearer secret-token:...`).
        authorization: String,
    },

    /// Username/password login against a named instance.
    #[serde(rename = "userpass")]
    UserPass {
        /// Login username.
        username: String,
        /// Login password (plaintext, in memory only).
        password: String,
        /// Merchant instance ID the login is scoped to.
        instance: String,
        /// Requested token scope (e.g. `readonly`, `order-full`).
        scope: String,
        /// Requested token lifetime in microseconds.
        duration_us: i64,
        /// Token description shown in the backend's token list.
        description: String,
    },
}

impl MerchantAuth {
    /// The credential family of this value.
    #[must_use]
    pub fn kind(&self) -> AuthKind {
        match self {
            Self::None => AuthKind::None,
            Self::Token { .. } => AuthKind::Token,
            Self::UserPass { .. } => AuthKind::UserPass,
        }
    }
}

/// Connection parameters for one merchant backend client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL (`https` only).
    pub base_url: String,
    /// Credentials to present.
    pub auth: MerchantAuth,
}

impl ClientConfig {
    /// Unauthenticated configuration for the given base URL.
    #[must_use]
    pub fn unauthenticated(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: MerchantAuth::None,
        }
    }
}

// ============ Backend config discovery ============

/// Response of `GET /config` on a merchant backend.
///
/// Only the fields needed to recognize a merchant backend are modeled;
/// unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantConfig {
    /// Protocol version (`current:revision:age`).
    pub version: String,
    /// Default currency of the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Implementation name, `taler-merchant` on the reference backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ============ Login tokens ============

/// Microsecond-precision relative time, as the backend encodes durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeTime {
    /// Duration in microseconds.
    pub d_us: i64,
}

/// Body of `POST /instances/{id}/private/token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginTokenRequest {
    /// Requested scope.
    pub scope: String,
    /// Requested lifetime.
    pub duration: RelativeTime,
    /// Free-form description shown in the backend's token list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response of a successful login token request.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginTokenResponse {
    /// The issued bearer token.
    pub token: String,
}

// ============ Config check report ============

/// Phase of the pre-save handshake, ordered `config → instance → auth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStage {
    /// Config discovery (`GET /config`).
    Config,
    /// Instance existence (`GET /instances/{id}/config`).
    Instance,
    /// Authenticated access (token probe or login).
    Auth,
}

impl CheckStage {
    /// Stable identifier used in notices.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Instance => "instance",
            Self::Auth => "auth",
        }
    }
}

/// Outcome of a single handshake stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutcome {
    /// Whether the stage passed.
    pub ok: bool,
    /// HTTP status observed, if a response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Short error identifier, if the stage failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageOutcome {
    /// A passed stage.
    #[must_use]
    pub fn passed(status: u16) -> Self {
        Self {
            ok: true,
            status: Some(status),
            error: None,
        }
    }

    /// A failed stage with optional status and error slug.
    #[must_use]
    pub fn failed(status: Option<u16>, error: Option<String>) -> Self {
        Self {
            ok: false,
            status,
            error,
        }
    }
}

/// Structured result of [`config_check`](crate::MerchantBackend::config_check).
///
/// `instance` and `auth` are `None` when the stage does not apply to the
/// configured auth method (e.g. no instance stage for token auth) or when an
/// earlier stage already failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigCheckReport {
    /// Overall verdict: every attempted stage passed.
    pub ok: bool,
    /// Config discovery outcome.
    pub config: StageOutcome,
    /// Instance existence outcome, when attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<StageOutcome>,
    /// Authenticated access outcome, when attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<StageOutcome>,
}

impl ConfigCheckReport {
    /// First failing stage in the order `config → instance → auth`.
    #[must_use]
    pub fn failing_stage(&self) -> Option<(CheckStage, &StageOutcome)> {
        if !self.config.ok {
            return Some((CheckStage::Config, &self.config));
        }
        if let Some(instance) = &self.instance {
            if !instance.ok {
                return Some((CheckStage::Instance, instance));
            }
        }
        if let Some(auth) = &self.auth {
            if !auth.ok {
                return Some((CheckStage::Auth, auth));
            }
        }
        None
    }
}

// ============ Orders ============

/// Minimal order payload (`OrderV0` shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Human-readable order summary.
    pub summary: String,
    /// Amount string, `CURRENCY:VALUE` (e.g. `KUDOS:1.00`).
    pub amount: String,
    /// Message shown to the customer once the order is paid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_message: Option<String>,
}

/// Body of `POST …/private/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// The order to create.
    pub order: Order,
}

/// Response of a successful order creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    /// Backend-assigned order ID.
    pub order_id: String,
}

/// Payment state of an order, tagged by the backend's `order_status` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "order_status", rename_all = "lowercase")]
pub enum OrderStatus {
    /// Not yet claimed by a wallet; carries the pay URI.
    Unpaid {
        /// `taler://pay/...` URI for the wallet hand-off.
        #[serde(skip_serializing_if = "Option::is_none")]
        taler_pay_uri: Option<String>,
    },
    /// Claimed by a wallet but not paid.
    Claimed,
    /// Payment completed.
    Paid {
        /// Whether (part of) the payment was refunded.
        #[serde(skip_serializing_if = "Option::is_none")]
        refunded: Option<bool>,
    },
}
