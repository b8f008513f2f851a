//! Submission routing: which form group a request targets, and the
//! three-way state of each submitted field.

use std::collections::HashMap;

/// Request key naming the submitted form group.
pub const OPTION_PAGE_KEY: &str = "option_page";

/// One of the three independently submitted settings forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormGroup {
    /// Base URL form.
    BaseUrl,
    /// Username/password/instance form.
    UserPass,
    /// Access token form.
    Token,
}

impl FormGroup {
    /// Resolve a group token to a form group; `None` for unrecognized tokens.
    #[must_use]
    pub fn from_option_page(option_page: &str) -> Option<Self> {
        match option_page {
            "taler_baseurl_group" => Some(Self::BaseUrl),
            "taler_userpass_group" => Some(Self::UserPass),
            "taler_token_group" => Some(Self::Token),
            _ => None,
        }
    }

    /// The group token this form submits under.
    #[must_use]
    pub fn option_page(&self) -> &'static str {
        match self {
            Self::BaseUrl => "taler_baseurl_group",
            Self::UserPass => "taler_userpass_group",
            Self::Token => "taler_token_group",
        }
    }

    /// Name of the group-specific delete-intent flag.
    #[must_use]
    pub fn delete_flag(&self) -> &'static str {
        match self {
            Self::BaseUrl => "taler_baseurl_delete",
            Self::UserPass => "taler_userpass_delete",
            Self::Token => "taler_token_delete",
        }
    }
}

/// Three-way state of one submitted field.
///
/// "Field omitted" and "field cleared" are distinct: a password left out of
/// the request keeps the stored one, while a password submitted empty is an
/// explicit (and for some fields invalid) value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldInput {
    /// The field was not part of the submission.
    #[default]
    NotProvided,
    /// The field was submitted with an empty value.
    Empty,
    /// The field was submitted with a non-empty value.
    Value(String),
}

impl FieldInput {
    /// Classify a raw request value.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => Self::NotProvided,
            Some(v) if v.is_empty() => Self::Empty,
            Some(v) => Self::Value(v.to_string()),
        }
    }

    /// The submitted value, if one was provided.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        if let Self::Value(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

/// One parsed settings submission.
///
/// Produced by [`from_request`](Self::from_request); carries the raw group
/// token (so unrecognized groups can be reported as a no-op) plus the
/// delete-intent flag and every known field in three-way form.
#[derive(Debug, Clone, Default)]
pub struct SettingsForm {
    /// Raw group token from the request.
    pub option_page: String,
    /// Whether the group's delete flag was set.
    pub delete: bool,
    /// Submitted base URL.
    pub base_url: FieldInput,
    /// Submitted username.
    pub username: FieldInput,
    /// Submitted password (plaintext, in memory only).
    pub password: FieldInput,
    /// Submitted instance ID.
    pub instance: FieldInput,
    /// Submitted access token (plaintext, in memory only).
    pub token: FieldInput,
}

/// `"0"` and `""` are falsy flag values; anything else sets the flag.
fn is_flag_set(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.is_empty() && v != "0")
}

impl SettingsForm {
    /// Parse a raw request mapping into a routed submission.
    #[must_use]
    pub fn from_request(request: &HashMap<String, String>) -> Self {
        let option_page = request.get(OPTION_PAGE_KEY).cloned().unwrap_or_default();
        let delete = FormGroup::from_option_page(&option_page)
            .is_some_and(|group| is_flag_set(request.get(group.delete_flag())));

        let field = |name: &str| FieldInput::from_raw(request.get(name).map(String::as_str));

        Self {
            option_page,
            delete,
            base_url: field("taler_base_url"),
            username: field("ext_username"),
            password: field("ext_password"),
            instance: field("taler_instance"),
            token: field("taler_token"),
        }
    }

    /// The recognized form group, if any.
    #[must_use]
    pub fn group(&self) -> Option<FormGroup> {
        FormGroup::from_option_page(&self.option_page)
    }
}
