//! Response viewer - decides how a response body is shown and exposes the
//! pieces the response panel needs.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::ResponseResult;

/// Display form of a response body
#[derive(Clone, Debug, PartialEq)]
pub enum BodyView {
    /// Pretty-printed JSON
    Json(String),
    /// Body decoded as text, unchanged
    Text(String),
}

impl BodyView {
    pub fn content(&self) -> &str {
        match self {
            BodyView::Json(s) | BodyView::Text(s) => s,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, BodyView::Json(_))
    }
}

/// Pick JSON or text rendering for a body.
///
/// JSON when the Content-Type mentions json, or when there is no Content-Type
/// and the body parses anyway. Malformed JSON always falls back to text.
pub fn render_body(headers: &[(String, String)], body: &[u8]) -> BodyView {
    let content_type = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        .map(|(_, v)| v.to_ascii_lowercase());

    let try_json = match &content_type {
        Some(ct) => ct.contains("json"),
        None => true,
    };

    if try_json {
        if let Some(pretty) = pretty_json(body) {
            return BodyView::Json(pretty);
        }
    }
    BodyView::Text(String::from_utf8_lossy(body).into_owned())
}

fn pretty_json(body: &[u8]) -> Option<String> {
    let value = serde_json::from_slice::<serde_json::Value>(body).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

/// Headers keyed by name; repeated headers are joined with ", "
pub fn sorted_headers(headers: &[(String, String)]) -> BTreeMap<String, String> {
    let mut sorted: BTreeMap<String, String> = BTreeMap::new();
    for (key, value) in headers {
        sorted
            .entry(key.clone())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.clone());
    }
    sorted
}

/// Everything the response panel shows for one completed send
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseDisplay {
    pub status: u16,
    pub elapsed_ms: u64,
    pub final_url: String,
    pub headers: BTreeMap<String, String>,
    pub body: BodyView,
    pub size_bytes: usize,
}

impl ResponseDisplay {
    pub fn from_result(result: &ResponseResult) -> Self {
        ResponseDisplay {
            status: result.status,
            elapsed_ms: result.elapsed.as_millis() as u64,
            final_url: result.final_url.clone(),
            headers: sorted_headers(&result.headers),
            body: render_body(&result.headers, &result.body),
            size_bytes: result.body.len(),
        }
    }

    /// Headers rendered as an indented JSON object
    pub fn headers_json(&self) -> String {
        serde_json::to_string_pretty(&self.headers).unwrap_or_default()
    }
}

/// Write the raw body bytes to `dir/filename`.
///
/// `filename` must be a plain file name; anything that would escape `dir` is refused.
pub fn save_body(body: &[u8], dir: &Path, filename: &str) -> io::Result<PathBuf> {
    let filename = filename.trim();
    let is_plain = !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\']);
    if !is_plain {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' is not a valid file name", filename),
        ));
    }

    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(filename);
    fs::write(&path, body)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn header(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_json_by_content_type() {
        let headers = vec![header("Content-Type", "application/json; charset=utf-8")];
        let view = render_body(&headers, br#"{"args":{"hello":"world"}}"#);
        assert_eq!(
            view,
            BodyView::Json("{\n  \"args\": {\n    \"hello\": \"world\"\n  }\n}".to_string())
        );
    }

    #[test]
    fn test_vendor_json_content_type() {
        let headers = vec![header("content-type", "application/problem+JSON")];
        assert!(render_body(&headers, b"[1,2]").is_json());
    }

    #[test]
    fn test_json_sniffed_without_content_type() {
        let view = render_body(&[], b"  [1, {\"z\": 1, \"a\": 2}] ");
        // Key order is kept as received
        assert_eq!(
            view.content(),
            "[\n  1,\n  {\n    \"z\": 1,\n    \"a\": 2\n  }\n]"
        );
    }

    #[test]
    fn test_non_json_content_type_is_text_even_if_parseable() {
        let headers = vec![header("Content-Type", "text/plain")];
        assert_eq!(
            render_body(&headers, b"{\"a\":1}"),
            BodyView::Text("{\"a\":1}".to_string())
        );
    }

    #[test]
    fn test_malformed_json_falls_back_to_text() {
        let headers = vec![header("Content-Type", "application/json")];
        assert_eq!(
            render_body(&headers, b"{oops"),
            BodyView::Text("{oops".to_string())
        );
        assert_eq!(render_body(&headers, b""), BodyView::Text(String::new()));
        assert_eq!(
            render_body(&[], b"<html></html>"),
            BodyView::Text("<html></html>".to_string())
        );
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let view = render_body(&[], &[0x66, 0x6f, 0xff]);
        assert_eq!(view, BodyView::Text("fo\u{fffd}".to_string()));
    }

    #[test]
    fn test_display_from_result() {
        let result = ResponseResult {
            status: 200,
            elapsed: Duration::from_micros(12_345_678),
            headers: vec![
                header("x-b", "2"),
                header("Set-Cookie", "a=1"),
                header("Content-Type", "application/json"),
                header("Set-Cookie", "b=2"),
            ],
            body: br#"{"ok":true}"#.to_vec(),
            final_url: "https://httpbin.org/get?hello=world".to_string(),
        };

        let display = ResponseDisplay::from_result(&result);
        assert_eq!(display.status, 200);
        assert_eq!(display.elapsed_ms, 12_345);
        assert_eq!(display.size_bytes, 11);
        assert!(display.body.is_json());
        let keys: Vec<&str> = display.headers.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Content-Type", "Set-Cookie", "x-b"]);
        assert_eq!(display.headers["Set-Cookie"], "a=1, b=2");
        assert!(display.headers_json().contains("\"x-b\": \"2\""));
    }

    #[test]
    fn test_save_body_writes_raw_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");
        let bytes = [0u8, 159, 146, 150];

        let path = save_body(&bytes, &target, "response.bin").unwrap();
        assert_eq!(path, target.join("response.bin"));
        assert_eq!(std::fs::read(path).unwrap(), bytes);
    }

    #[test]
    fn test_save_body_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["", "  ", "..", "../escape.bin", "a/b.bin", "a\\b.bin"] {
            let err = save_body(b"x", dir.path(), name).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "{name:?}");
        }
    }
}
