//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default URL for new HTTP requests
pub const DEFAULT_HTTP_URL: &str = "https://httpbin.org/get";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: f64 = 20.0;

/// Lower bound for the request timeout, in seconds
pub const MIN_TIMEOUT_SECS: f64 = 1.0;

/// Upper bound for the request timeout, in seconds
pub const MAX_TIMEOUT_SECS: f64 = 120.0;

/// Step used by the timeout +/- keys
pub const TIMEOUT_STEP_SECS: f64 = 1.0;

pub const APPLICATION_JSON: &str = "application/json";

/// Name used when a preset is saved without one
pub const DEFAULT_PRESET_NAME: &str = "Preset";

/// Default filename offered when saving a response body
pub const DEFAULT_DOWNLOAD_NAME: &str = "response.bin";

/// Default log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "courier.log";

/// Application name
pub const APP_NAME: &str = "Courier";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
