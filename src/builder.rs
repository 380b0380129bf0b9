//! Request builder - turns the editable form into a ready-to-send request
//!
//! Header precedence: an `Authorization` header derived from auth settings
//! replaces whatever the user typed; `Content-Type` and `Accept` are only
//! filled in when the user left them out.

use std::time::Duration;

use url::Url;

use crate::constants::{APPLICATION_JSON, DEFAULT_TIMEOUT_SECS};
use crate::curl;
use crate::error::BuildError;
use crate::models::{AuthConfig, BodyMode, HttpMethod, KeyValue, RequestConfig};

/// Username/password handed to the transport, which does the encoding
#[derive(Clone, PartialEq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fully resolved request, ready for the transport
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    /// Base URL with the query params already appended
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub basic_auth: Option<BasicCredentials>,
    pub timeout: Duration,
    pub verify_ssl: bool,
}

impl RequestSpec {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A request spec plus its command-line preview
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRequest {
    pub spec: RequestSpec,
    pub curl: String,
}

/// Build a request from the given form state
pub fn build_request(config: &RequestConfig) -> Result<PreparedRequest, BuildError> {
    let url = resolve_url(&config.url, &config.query_params)?;
    let mut headers = collect_headers(&config.headers);
    let body = resolve_body(config.body_mode, &config.body, &mut headers)?;

    let basic_auth = match &config.auth {
        AuthConfig::None => None,
        AuthConfig::Bearer { token } => {
            let token = token.trim();
            if !token.is_empty() {
                set_header(&mut headers, "Authorization", format!("Bearer {}", token));
            }
            None
        }
        AuthConfig::Basic { username, password } => {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case("Authorization"));
            Some(BasicCredentials {
                username: username.clone(),
                password: password.clone(),
            })
        }
    };

    set_default_header(&mut headers, "Accept", APPLICATION_JSON);

    let spec = RequestSpec {
        method: config.method,
        url: url.to_string(),
        headers,
        body,
        basic_auth,
        timeout: timeout_from_secs(config.timeout_secs),
        verify_ssl: config.verify_ssl,
    };
    let curl = curl::to_curl(&spec);

    Ok(PreparedRequest { spec, curl })
}

/// Parse the base URL and append the non-blank query params
fn resolve_url(raw: &str, params: &[KeyValue]) -> Result<Url, BuildError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BuildError::InvalidUrl("URL is empty".to_string()));
    }

    let mut url = Url::parse(raw).map_err(|e| BuildError::InvalidUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BuildError::InvalidUrl(format!(
            "unsupported scheme '{}', use http or https",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(BuildError::InvalidUrl("URL has no host".to_string()));
    }

    let pairs: Vec<(&str, &str)> = params
        .iter()
        .filter(|p| !p.is_blank())
        .map(|p| (p.key.trim(), p.value.trim()))
        .collect();

    // Only touch the query when there is something to add, otherwise a bare `?` appears
    if !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in pairs {
            query.append_pair(key, value);
        }
    }

    Ok(url)
}

/// Non-blank header rows as an ordered map; later duplicates win
fn collect_headers(rows: &[KeyValue]) -> Vec<(String, String)> {
    let mut headers = Vec::with_capacity(rows.len() + 2);
    for row in rows.iter().filter(|r| !r.is_blank()) {
        set_header(&mut headers, row.key.trim(), row.value.trim().to_string());
    }
    headers
}

fn resolve_body(
    mode: BodyMode,
    content: &str,
    headers: &mut Vec<(String, String)>,
) -> Result<Option<String>, BuildError> {
    match mode {
        BodyMode::None => Ok(None),
        BodyMode::Json => {
            if content.trim().is_empty() {
                return Ok(None);
            }
            serde_json::from_str::<serde_json::Value>(content)
                .map_err(|e| BuildError::InvalidBody(e.to_string()))?;
            set_default_header(headers, "Content-Type", APPLICATION_JSON);
            Ok(Some(content.to_string()))
        }
        BodyMode::Raw => Ok(Some(content.to_string())),
    }
}

/// Insert or replace, keeping the position of an existing entry
fn set_header(headers: &mut Vec<(String, String)>, key: &str, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
        Some(entry) => entry.1 = value,
        None => headers.push((key.to_string(), value)),
    }
}

fn set_default_header(headers: &mut Vec<(String, String)>, key: &str, value: &str) {
    if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(key)) {
        headers.push((key.to_string(), value.to_string()));
    }
}

fn timeout_from_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
        .unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> RequestConfig {
        RequestConfig {
            url: url.to_string(),
            query_params: Vec::new(),
            headers: Vec::new(),
            ..RequestConfig::default()
        }
    }

    #[test]
    fn test_query_params_appended_to_url() {
        let mut cfg = config("https://httpbin.org/get");
        cfg.query_params = vec![KeyValue::new("hello", "world")];

        let prepared = build_request(&cfg).unwrap();
        assert!(prepared.spec.url.ends_with("?hello=world"));
        assert_eq!(prepared.spec.url, "https://httpbin.org/get?hello=world");
    }

    #[test]
    fn test_blank_keys_dropped_and_empty_values_kept() {
        let mut cfg = config("https://example.com/search");
        cfg.query_params = vec![
            KeyValue::new("", "ignored"),
            KeyValue::new("   ", "also ignored"),
            KeyValue::new("q", ""),
            KeyValue::new("page", "2"),
        ];

        let prepared = build_request(&cfg).unwrap();
        assert_eq!(prepared.spec.url, "https://example.com/search?q=&page=2");
    }

    #[test]
    fn test_duplicate_params_and_existing_query_are_kept() {
        let mut cfg = config("https://example.com/items?tag=a");
        cfg.query_params = vec![KeyValue::new("tag", "a"), KeyValue::new("tag", "b c")];

        let prepared = build_request(&cfg).unwrap();
        assert_eq!(prepared.spec.url, "https://example.com/items?tag=a&tag=a&tag=b+c");
    }

    #[test]
    fn test_no_params_leaves_url_untouched() {
        let mut cfg = config("https://example.com/items");
        cfg.query_params = vec![KeyValue::default()];

        let prepared = build_request(&cfg).unwrap();
        assert_eq!(prepared.spec.url, "https://example.com/items");
    }

    #[test]
    fn test_invalid_urls_rejected() {
        for raw in ["", "   ", "not a url", "ftp://example.com/file", "http://"] {
            let err = build_request(&config(raw)).unwrap_err();
            assert!(matches!(err, BuildError::InvalidUrl(_)), "{raw:?} gave {err:?}");
        }
    }

    #[test]
    fn test_json_body_sets_content_type_and_keeps_text() {
        let mut cfg = config("https://example.com/items");
        cfg.method = HttpMethod::POST;
        cfg.body_mode = BodyMode::Json;
        cfg.body = "{\n  \"b\": 1,\n  \"a\": [true, null]\n}".to_string();

        let prepared = build_request(&cfg).unwrap();
        assert_eq!(prepared.spec.header("Content-Type"), Some(APPLICATION_JSON));
        assert_eq!(prepared.spec.body.as_deref(), Some(cfg.body.as_str()));
    }

    #[test]
    fn test_json_body_respects_user_content_type() {
        let mut cfg = config("https://example.com/items");
        cfg.body_mode = BodyMode::Json;
        cfg.body = "[1, 2]".to_string();
        cfg.headers = vec![KeyValue::new("content-type", "application/vnd.api+json")];

        let prepared = build_request(&cfg).unwrap();
        assert_eq!(
            prepared.spec.header("Content-Type"),
            Some("application/vnd.api+json")
        );
        let content_types = prepared
            .spec
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .count();
        assert_eq!(content_types, 1);
    }

    #[test]
    fn test_invalid_json_body_fails() {
        let mut cfg = config("https://example.com/items");
        cfg.body_mode = BodyMode::Json;
        cfg.body = "{invalid".to_string();

        let err = build_request(&cfg).unwrap_err();
        assert!(matches!(err, BuildError::InvalidBody(_)));
    }

    #[test]
    fn test_blank_json_body_sends_nothing() {
        let mut cfg = config("https://example.com/items");
        cfg.body_mode = BodyMode::Json;
        cfg.body = "  \n".to_string();

        let prepared = build_request(&cfg).unwrap();
        assert_eq!(prepared.spec.body, None);
        assert_eq!(prepared.spec.header("Content-Type"), None);
    }

    #[test]
    fn test_body_mode_none_never_attaches_body() {
        let mut cfg = config("https://example.com/items");
        cfg.method = HttpMethod::PUT;
        cfg.body_mode = BodyMode::None;

        for body in ["", "{\"a\": 1}", "{invalid", "plain text"] {
            cfg.body = body.to_string();
            let prepared = build_request(&cfg).unwrap();
            assert_eq!(prepared.spec.body, None);
            assert_eq!(prepared.spec.header("Content-Type"), None);
        }
    }

    #[test]
    fn test_raw_body_is_verbatim_without_content_type() {
        let mut cfg = config("https://example.com/items");
        cfg.body_mode = BodyMode::Raw;
        cfg.body = "  not json at all \n".to_string();

        let prepared = build_request(&cfg).unwrap();
        assert_eq!(prepared.spec.body.as_deref(), Some("  not json at all \n"));
        assert_eq!(prepared.spec.header("Content-Type"), None);
    }

    #[test]
    fn test_bearer_overrides_user_authorization() {
        let mut cfg = config("https://example.com/me");
        cfg.headers = vec![KeyValue::new("authorization", "Token something-else")];
        cfg.auth = AuthConfig::Bearer {
            token: "abc123".to_string(),
        };

        let prepared = build_request(&cfg).unwrap();
        assert_eq!(prepared.spec.header("Authorization"), Some("Bearer abc123"));
        let auth_headers = prepared
            .spec
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("authorization"))
            .count();
        assert_eq!(auth_headers, 1);
    }

    #[test]
    fn test_empty_bearer_token_adds_nothing() {
        let mut cfg = config("https://example.com/me");
        cfg.auth = AuthConfig::Bearer {
            token: String::new(),
        };

        let prepared = build_request(&cfg).unwrap();
        assert_eq!(prepared.spec.header("Authorization"), None);
    }

    #[test]
    fn test_basic_auth_goes_to_transport_not_headers() {
        let mut cfg = config("https://example.com/me");
        cfg.headers = vec![KeyValue::new("Authorization", "Bearer stale")];
        cfg.auth = AuthConfig::Basic {
            username: "alice".to_string(),
            password: "s3cret".to_string(),
        };

        let prepared = build_request(&cfg).unwrap();
        assert_eq!(prepared.spec.header("Authorization"), None);
        let creds = prepared.spec.basic_auth.unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "s3cret");
    }

    #[test]
    fn test_accept_default_and_override() {
        let prepared = build_request(&config("https://example.com")).unwrap();
        assert_eq!(prepared.spec.header("Accept"), Some(APPLICATION_JSON));

        let mut cfg = config("https://example.com");
        cfg.headers = vec![KeyValue::new("accept", "text/html")];
        let prepared = build_request(&cfg).unwrap();
        assert_eq!(prepared.spec.header("Accept"), Some("text/html"));
    }

    #[test]
    fn test_header_rows_trimmed_and_later_duplicates_win() {
        let mut cfg = config("https://example.com");
        cfg.headers = vec![
            KeyValue::new(" X-Trace ", " one "),
            KeyValue::new("", "dropped"),
            KeyValue::new("x-trace", "two"),
            KeyValue::new("X-Empty", ""),
        ];

        let prepared = build_request(&cfg).unwrap();
        assert_eq!(
            prepared.spec.headers,
            vec![
                ("X-Trace".to_string(), "two".to_string()),
                ("X-Empty".to_string(), String::new()),
                ("Accept".to_string(), APPLICATION_JSON.to_string()),
            ]
        );
    }

    #[test]
    fn test_timeout_and_ssl_flag_carried() {
        let mut cfg = config("https://example.com");
        cfg.timeout_secs = 2.5;
        cfg.verify_ssl = false;
        let prepared = build_request(&cfg).unwrap();
        assert_eq!(prepared.spec.timeout, Duration::from_millis(2500));
        assert!(!prepared.spec.verify_ssl);

        cfg.timeout_secs = -1.0;
        let prepared = build_request(&cfg).unwrap();
        assert_eq!(prepared.spec.timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_basic_credentials_debug_redacts_password() {
        let creds = BasicCredentials {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
