//! Render state - data structure sent from App layer to UI for rendering

use crate::error::{BuildError, TransportError};
use crate::messages::ui_events::{AuthField, InputMode, Panel, Prompt, ResponseView, RowField};
use crate::models::{HttpMethod, RequestConfig};
use crate::viewer::ResponseDisplay;

/// What the response panel has to show
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponsePane {
    #[default]
    Empty,
    Loading,
    Received(ResponseDisplay),
    Failed(TransportError),
}

/// One line of the preset sidebar
#[derive(Debug, Clone, PartialEq)]
pub struct PresetEntry {
    pub name: String,
    pub method: HttpMethod,
    /// Local time the preset was saved, `HH:MM:SS`
    pub saved_at: String,
}

/// Severity of the status-line notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Request form
    pub request: RequestConfig,
    /// Validation failure from the last send attempt, shown next to its field
    pub build_error: Option<BuildError>,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub selected_param: usize,
    pub selected_header: usize,
    pub row_field: RowField,
    pub auth_field: AuthField,

    // Response
    pub response: ResponsePane,
    pub response_view: ResponseView,
    pub response_scroll: u16,
    pub curl_preview: Option<String>,

    // Presets
    pub presets: Vec<PresetEntry>,
    pub selected_preset: usize,

    // Popups and status line
    pub show_help: bool,
    pub prompt: Option<Prompt>,
    pub prompt_buffer: String,
    pub notice: Option<Notice>,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            request: RequestConfig::default(),
            build_error: None,
            active_panel: Panel::Url,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            selected_param: 0,
            selected_header: 0,
            row_field: RowField::Key,
            auth_field: AuthField::Token,
            response: ResponsePane::Empty,
            response_view: ResponseView::Body,
            response_scroll: 0,
            curl_preview: None,
            presets: Vec::new(),
            selected_preset: 0,
            show_help: false,
            prompt: None,
            prompt_buffer: String::new(),
            notice: None,
        }
    }
}

impl RenderState {
    pub fn is_loading(&self) -> bool {
        matches!(self.response, ResponsePane::Loading)
    }
}
