//! # Courier TUI
//!
//! A terminal HTTP request composer, in the spirit of Postman/Insomnia.
//!
//! ## Features
//! - HTTP methods: GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS
//! - Query param and header tables
//! - JSON or raw request bodies, with JSON validated before sending
//! - Auth support (Bearer, Basic)
//! - Per-request timeout and SSL verification toggle
//! - Session presets
//! - Pretty-printed JSON responses, cURL preview, saving bodies to disk
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod builder;
pub mod config;
pub mod constants;
pub mod curl;
pub mod error;
pub mod form;
pub mod models;
pub mod presets;
pub mod viewer;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use builder::{build_request, PreparedRequest, RequestSpec};
pub use config::Settings;
pub use error::{BuildError, PresetError, TransportError, TransportErrorKind};
pub use form::{FieldUpdate, FormState, Table};
pub use models::{AuthConfig, BodyMode, HttpMethod, KeyValue, Preset, RequestConfig, ResponseResult};
pub use curl::to_curl;
pub use viewer::{render_body, save_body, BodyView, ResponseDisplay};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::{NetworkActor, ReqwestTransport, Transport};
