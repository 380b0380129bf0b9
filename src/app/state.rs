//! App state - pure data structure with no I/O logic

use crate::config::Settings;
use crate::error::BuildError;
use crate::form::{FormState, Table};
use crate::messages::render::{Notice, NoticeLevel, PresetEntry, ResponsePane};
use crate::messages::ui_events::{AuthField, InputMode, Panel, Prompt, ResponseView, RowField};
use crate::messages::RenderState;
use crate::models::{AuthConfig, ResponseResult};

/// Main application state for one session - pure data, no I/O
pub struct AppState {
    // Request form and presets
    pub form: FormState,
    pub settings: Settings,
    pub build_error: Option<BuildError>,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub selected_param: usize,
    pub selected_header: usize,
    pub row_field: RowField,
    pub auth_field: AuthField,

    // HTTP Response
    pub response: ResponsePane,
    /// Raw result of the last successful send, kept for saving the body
    pub last_result: Option<ResponseResult>,
    pub response_view: ResponseView,
    pub response_scroll: u16,
    pub curl_preview: Option<String>,
    pub next_request_id: u64,
    pub pending_request_id: Option<u64>,

    // Presets sidebar
    pub selected_preset: usize,

    // Popups and status line
    pub show_help: bool,
    pub prompt: Option<Prompt>,
    pub prompt_buffer: String,
    pub notice: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let form = FormState::new(settings.initial_request());
        let cursor_position = form.config.url.len();
        AppState {
            form,
            settings,
            build_error: None,
            active_panel: Panel::Url,
            input_mode: InputMode::Normal,
            cursor_position,
            selected_param: 0,
            selected_header: 0,
            row_field: RowField::Key,
            auth_field: AuthField::Token,
            response: ResponsePane::Empty,
            last_result: None,
            response_view: ResponseView::Body,
            response_scroll: 0,
            curl_preview: None,
            next_request_id: 1,
            pending_request_id: None,
            selected_preset: 0,
            show_help: false,
            prompt: None,
            prompt_buffer: String::new(),
            notice: None,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn is_loading(&self) -> bool {
        self.pending_request_id.is_some()
    }

    /// Table shown by the focused panel, if any
    pub fn active_table(&self) -> Option<Table> {
        match self.active_panel {
            Panel::Params => Some(Table::QueryParams),
            Panel::Headers => Some(Table::Headers),
            _ => None,
        }
    }

    pub fn selected_row(&self, table: Table) -> usize {
        match table {
            Table::QueryParams => self.selected_param,
            Table::Headers => self.selected_header,
        }
    }

    pub fn selected_row_mut(&mut self, table: Table) -> &mut usize {
        match table {
            Table::QueryParams => &mut self.selected_param,
            Table::Headers => &mut self.selected_header,
        }
    }

    /// Get the current input field content
    pub fn current_input(&self) -> Option<&str> {
        let config = &self.form.config;
        match self.active_panel {
            Panel::Url => Some(config.url.as_str()),
            Panel::Body => Some(config.body.as_str()),
            Panel::Params | Panel::Headers => {
                let table = self.active_table()?;
                let row = self.form.rows(table).get(self.selected_row(table))?;
                Some(match self.row_field {
                    RowField::Key => row.key.as_str(),
                    RowField::Value => row.value.as_str(),
                })
            }
            Panel::Auth => match &config.auth {
                AuthConfig::Bearer { token } => Some(token.as_str()),
                AuthConfig::Basic { username, password } => match self.auth_field {
                    AuthField::Username | AuthField::Token => Some(username.as_str()),
                    AuthField::Password => Some(password.as_str()),
                },
                AuthConfig::None => None,
            },
            Panel::Response | Panel::Presets => None,
        }
    }

    /// Get mutable reference to current input field
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        let table = self.active_table();
        let row_field = self.row_field;
        let auth_field = self.auth_field;
        let row_index = table.map(|t| self.selected_row(t));

        match self.active_panel {
            Panel::Url => Some(&mut self.form.config.url),
            Panel::Body => Some(&mut self.form.config.body),
            Panel::Params | Panel::Headers => {
                let row = self.form.rows_mut(table?).get_mut(row_index?)?;
                Some(match row_field {
                    RowField::Key => &mut row.key,
                    RowField::Value => &mut row.value,
                })
            }
            Panel::Auth => match &mut self.form.config.auth {
                AuthConfig::Bearer { token } => Some(token),
                AuthConfig::Basic { username, password } => match auth_field {
                    AuthField::Username | AuthField::Token => Some(username),
                    AuthField::Password => Some(password),
                },
                AuthConfig::None => None,
            },
            Panel::Response | Panel::Presets => None,
        }
    }

    pub fn set_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            text: text.into(),
        });
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let presets = self
            .form
            .presets()
            .iter()
            .map(|p| PresetEntry {
                name: p.name.clone(),
                method: p.snapshot.method,
                saved_at: p
                    .saved_at
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
                    .to_string(),
            })
            .collect();

        RenderState {
            request: self.form.config.clone(),
            build_error: self.build_error.clone(),
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            selected_param: self.selected_param,
            selected_header: self.selected_header,
            row_field: self.row_field,
            auth_field: self.auth_field,
            response: self.response.clone(),
            response_view: self.response_view,
            response_scroll: self.response_scroll,
            curl_preview: self.curl_preview.clone(),
            presets,
            selected_preset: self.selected_preset,
            show_help: self.show_help,
            prompt: self.prompt,
            prompt_buffer: self.prompt_buffer.clone(),
            notice: self.notice.clone(),
        }
    }
}
