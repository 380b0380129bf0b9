use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{APPLICATION_JSON, DEFAULT_HTTP_URL, DEFAULT_TIMEOUT_SECS};

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }

    pub fn next(&self) -> HttpMethod {
        match self {
            HttpMethod::GET => HttpMethod::POST,
            HttpMethod::POST => HttpMethod::PUT,
            HttpMethod::PUT => HttpMethod::PATCH,
            HttpMethod::PATCH => HttpMethod::DELETE,
            HttpMethod::DELETE => HttpMethod::HEAD,
            HttpMethod::HEAD => HttpMethod::OPTIONS,
            HttpMethod::OPTIONS => HttpMethod::GET,
        }
    }

    /// Methods that conventionally carry no request body
    pub fn usually_bodyless(&self) -> bool {
        matches!(self, HttpMethod::GET | HttpMethod::HEAD)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "PATCH" => Ok(HttpMethod::PATCH),
            "DELETE" => Ok(HttpMethod::DELETE),
            "HEAD" => Ok(HttpMethod::HEAD),
            "OPTIONS" => Ok(HttpMethod::OPTIONS),
            other => Err(format!("Unknown HTTP method: {}", other)),
        }
    }
}

/// How the body editor content is attached to the request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyMode {
    #[default]
    None,
    Json,
    Raw,
}

impl BodyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyMode::None => "none",
            BodyMode::Json => "json",
            BodyMode::Raw => "raw",
        }
    }

    pub fn next(&self) -> BodyMode {
        match self {
            BodyMode::None => BodyMode::Json,
            BodyMode::Json => BodyMode::Raw,
            BodyMode::Raw => BodyMode::None,
        }
    }
}

/// Authentication settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum AuthConfig {
    #[default]
    None,
    Bearer {
        token: String,
    },
    Basic {
        username: String,
        password: String,
    },
}

impl AuthConfig {
    pub fn label(&self) -> &'static str {
        match self {
            AuthConfig::None => "None",
            AuthConfig::Bearer { .. } => "Bearer",
            AuthConfig::Basic { .. } => "Basic",
        }
    }

    /// Cycle None -> Bearer -> Basic -> None with empty credentials
    pub fn next(&self) -> AuthConfig {
        match self {
            AuthConfig::None => AuthConfig::Bearer {
                token: String::new(),
            },
            AuthConfig::Bearer { .. } => AuthConfig::Basic {
                username: String::new(),
                password: String::new(),
            },
            AuthConfig::Basic { .. } => AuthConfig::None,
        }
    }
}

/// One row of the query-param or header table
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Rows with a blank key are kept in the editor but never sent
    pub fn is_blank(&self) -> bool {
        self.key.trim().is_empty()
    }
}

/// The full, editable description of a request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    pub method: HttpMethod,
    pub url: String,
    pub query_params: Vec<KeyValue>,
    pub headers: Vec<KeyValue>,
    pub body_mode: BodyMode,
    pub body: String,
    pub auth: AuthConfig,
    pub timeout_secs: f64,
    /// When false, TLS certificate errors are ignored (testing environments only)
    pub verify_ssl: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        RequestConfig {
            method: HttpMethod::GET,
            url: String::from(DEFAULT_HTTP_URL),
            query_params: vec![KeyValue::default()],
            headers: vec![KeyValue::new("Accept", APPLICATION_JSON)],
            body_mode: BodyMode::None,
            body: String::new(),
            auth: AuthConfig::None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verify_ssl: true,
        }
    }
}

/// A response as returned by the transport. Never mutated after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseResult {
    pub status: u16,
    pub elapsed: Duration,
    /// Headers in the order received; repeated names appear more than once
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// URL after query expansion and redirects
    pub final_url: String,
}

impl ResponseResult {
    /// Case-insensitive header lookup, first match wins
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A named snapshot of a request configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub snapshot: RequestConfig,
    pub saved_at: chrono::DateTime<chrono::Utc>,
}
