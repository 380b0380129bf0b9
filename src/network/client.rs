//! HTTP transport - executes resolved requests and reports typed failures

use std::error::Error as _;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::builder::RequestSpec;
use crate::error::{TransportError, TransportErrorKind};
use crate::models::{HttpMethod, ResponseResult};

/// Performs the actual network I/O for one request. One attempt, no retries.
pub trait Transport: Send + Sync + 'static {
    fn execute(
        &self,
        spec: RequestSpec,
    ) -> impl Future<Output = Result<ResponseResult, TransportError>> + Send;
}

/// `reqwest`-backed transport
///
/// Certificate verification is a client-level setting in reqwest, so two
/// clients are kept and picked per request.
#[derive(Clone)]
pub struct ReqwestTransport {
    verifying: reqwest::Client,
    insecure: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let verifying = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::new(TransportErrorKind::Other, e.to_string()))?;
        let insecure = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| TransportError::new(TransportErrorKind::Other, e.to_string()))?;
        Ok(ReqwestTransport {
            verifying,
            insecure,
        })
    }

    /// Build a reqwest request from a resolved spec
    fn build_request(&self, spec: &RequestSpec) -> reqwest::RequestBuilder {
        let client = if spec.verify_ssl {
            &self.verifying
        } else {
            &self.insecure
        };

        let method = match spec.method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::PATCH => reqwest::Method::PATCH,
            HttpMethod::DELETE => reqwest::Method::DELETE,
            HttpMethod::HEAD => reqwest::Method::HEAD,
            HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
        };

        let mut req_builder = client.request(method, &spec.url).timeout(spec.timeout);

        for (key, value) in &spec.headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(creds) = &spec.basic_auth {
            req_builder = req_builder.basic_auth(&creds.username, Some(&creds.password));
        }

        if let Some(body) = &spec.body {
            req_builder = req_builder.body(body.clone());
        }

        req_builder
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, spec: RequestSpec) -> Result<ResponseResult, TransportError> {
        let start = Instant::now();
        let resp = self
            .build_request(&spec)
            .send()
            .await
            .map_err(|e| classify(&e, spec.timeout))?;

        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let headers = resp
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = resp
            .bytes()
            .await
            .map_err(|e| classify(&e, spec.timeout))?
            .to_vec();

        Ok(ResponseResult {
            status,
            elapsed: start.elapsed(),
            headers,
            body,
            final_url,
        })
    }
}

/// Map a reqwest failure to a user-facing error kind
fn classify(error: &reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        return TransportError::new(
            TransportErrorKind::Timeout,
            format!("no response within {:.1}s", timeout.as_secs_f64()),
        );
    }

    // reqwest's own message embeds the request URL; only the causes are matched
    let causes = source_chain(error);
    let detail = if causes.is_empty() {
        error.to_string()
    } else {
        format!("{}: {}", error, causes)
    };

    if looks_like_tls(&causes) {
        return TransportError::new(TransportErrorKind::Ssl, detail);
    }
    if error.is_connect() {
        return TransportError::new(TransportErrorKind::Connection, detail);
    }
    TransportError::new(TransportErrorKind::Other, detail)
}

/// All sources below the error itself, joined with ": "
fn source_chain(error: &reqwest::Error) -> String {
    let mut causes = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes.join(": ")
}

fn looks_like_tls(detail: &str) -> bool {
    let lower = detail.to_ascii_lowercase();
    ["certificate", "tls", "ssl", "handshake"]
        .iter()
        .any(|needle| lower.contains(needle))
}
