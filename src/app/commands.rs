//! Command handlers - business logic for processing UI events

use crate::app::AppState;
use crate::constants::{DEFAULT_DOWNLOAD_NAME, TIMEOUT_STEP_SECS};
use crate::error::BuildError;
use crate::form::FieldUpdate;
use crate::messages::render::{NoticeLevel, ResponsePane};
use crate::messages::ui_events::{AuthField, InputMode, Panel, Prompt, RowField};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::AuthConfig;
use crate::viewer::{self, ResponseDisplay};

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
        self.row_field = RowField::Key;
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
        self.row_field = RowField::Key;
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if let Some(table) = self.active_table() {
            if self.form.rows(table).is_empty() {
                let index = self.form.add_row(table);
                *self.selected_row_mut(table) = index;
            }
        }

        match self.current_input() {
            Some(input) => {
                self.cursor_position = input.len();
                self.input_mode = InputMode::Editing;
            }
            None if self.active_panel == Panel::Auth => {
                self.set_notice(NoticeLevel::Info, "Press 't' to choose an auth type");
            }
            None => {}
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let Some(input) = self.current_input() else {
            return;
        };
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let Some(input) = self.current_input() else {
            return;
        };
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        let Some(input) = self.current_input_mut() else {
            return;
        };
        if cursor_pos <= input.len() {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        let Some(input) = self.current_input_mut() else {
            return;
        };
        let prev_pos = input[..cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        input.remove(prev_pos);
        self.cursor_position = prev_pos;
    }

    /// Switch between the two text fields of a row or of Basic auth
    pub fn next_field(&mut self) {
        if self.active_table().is_some() {
            self.row_field = match self.row_field {
                RowField::Key => RowField::Value,
                RowField::Value => RowField::Key,
            };
        } else if matches!(self.form.config.auth, AuthConfig::Basic { .. }) {
            self.auth_field = match self.auth_field {
                AuthField::Username => AuthField::Password,
                AuthField::Password | AuthField::Token => AuthField::Username,
            };
        }
        self.cursor_position = self.current_input().map_or(0, str::len);
    }

    // ========================
    // Request fields
    // ========================

    pub fn cycle_method(&mut self) {
        let method = self.form.config.method.next();
        self.form.update_field(FieldUpdate::Method(method));
    }

    pub fn cycle_body_mode(&mut self) {
        let mode = self.form.config.body_mode.next();
        self.form.update_field(FieldUpdate::BodyMode(mode));
    }

    pub fn cycle_auth(&mut self) {
        let auth = self.form.config.auth.next();
        self.auth_field = match auth {
            AuthConfig::Basic { .. } => AuthField::Username,
            _ => AuthField::Token,
        };
        self.form.update_field(FieldUpdate::Auth(auth));
    }

    pub fn timeout_up(&mut self) {
        let secs = self.form.config.timeout_secs + TIMEOUT_STEP_SECS;
        self.form.update_field(FieldUpdate::Timeout(secs));
    }

    pub fn timeout_down(&mut self) {
        let secs = self.form.config.timeout_secs - TIMEOUT_STEP_SECS;
        self.form.update_field(FieldUpdate::Timeout(secs));
    }

    pub fn toggle_ssl(&mut self) {
        let verify = !self.form.config.verify_ssl;
        self.form.update_field(FieldUpdate::VerifySsl(verify));
        if !verify {
            self.set_notice(
                NoticeLevel::Info,
                "SSL verification off - only use this against test servers",
            );
        }
    }

    // ========================
    // Params / headers rows
    // ========================

    pub fn next_row(&mut self) {
        let Some(table) = self.active_table() else {
            return;
        };
        let len = self.form.rows(table).len();
        if len > 0 {
            let selected = self.selected_row_mut(table);
            *selected = (*selected + 1) % len;
        }
    }

    pub fn prev_row(&mut self) {
        let Some(table) = self.active_table() else {
            return;
        };
        let len = self.form.rows(table).len();
        if len > 0 {
            let selected = self.selected_row_mut(table);
            *selected = selected.checked_sub(1).unwrap_or(len - 1);
        }
    }

    /// Add an empty row and start editing its key
    pub fn add_row(&mut self) {
        let Some(table) = self.active_table() else {
            return;
        };
        let index = self.form.add_row(table);
        *self.selected_row_mut(table) = index;
        self.row_field = RowField::Key;
        self.start_editing();
    }

    pub fn delete_row(&mut self) {
        let Some(table) = self.active_table() else {
            return;
        };
        let index = self.selected_row(table);
        if self.form.remove_row(table, index) {
            let len = self.form.rows(table).len();
            *self.selected_row_mut(table) = index.min(len.saturating_sub(1));
        }
    }

    // ========================
    // Presets
    // ========================

    pub fn next_preset(&mut self) {
        let len = self.form.presets().len();
        if len > 0 {
            self.selected_preset = (self.selected_preset + 1) % len;
        }
    }

    pub fn prev_preset(&mut self) {
        let len = self.form.presets().len();
        if len > 0 {
            self.selected_preset = self.selected_preset.checked_sub(1).unwrap_or(len - 1);
        }
    }

    pub fn save_preset(&mut self, name: &str) {
        let saved = self.form.save_preset(name);
        tracing::info!(preset = %saved, "Preset saved");
        self.selected_preset = self.form.presets().len().saturating_sub(1);
        self.set_notice(NoticeLevel::Success, format!("Saved preset: {}", saved));
    }

    /// Load the preset selected in the sidebar
    pub fn load_selected_preset(&mut self) {
        let Some(name) = self
            .form
            .presets()
            .get_index(self.selected_preset)
            .map(|p| p.name.clone())
        else {
            self.set_notice(NoticeLevel::Info, "No presets saved yet - press 'p' to save one");
            return;
        };
        self.load_preset(&name);
    }

    pub fn load_preset(&mut self, name: &str) {
        match self.form.load_preset(name) {
            Ok(()) => {
                tracing::info!(preset = %name, "Preset loaded");
                self.selected_param = 0;
                self.selected_header = 0;
                self.row_field = RowField::Key;
                self.auth_field = match self.form.config.auth {
                    AuthConfig::Basic { .. } => AuthField::Username,
                    _ => AuthField::Token,
                };
                self.cursor_position = self.form.config.url.len();
                self.build_error = None;
                self.set_notice(NoticeLevel::Success, format!("Loaded preset: {}", name));
            }
            Err(e) => {
                tracing::warn!(preset = %name, "Preset load failed: {}", e);
                self.set_notice(NoticeLevel::Error, e.to_string());
            }
        }
    }

    pub fn delete_selected_preset(&mut self) {
        let Some(name) = self
            .form
            .presets()
            .get_index(self.selected_preset)
            .map(|p| p.name.clone())
        else {
            return;
        };
        match self.form.delete_preset(&name) {
            Ok(_) => {
                tracing::info!(preset = %name, "Preset deleted");
                let len = self.form.presets().len();
                self.selected_preset = self.selected_preset.min(len.saturating_sub(1));
                self.set_notice(NoticeLevel::Info, format!("Deleted preset: {}", name));
            }
            Err(e) => self.set_notice(NoticeLevel::Error, e.to_string()),
        }
    }

    // ========================
    // Prompts
    // ========================

    pub fn open_prompt(&mut self, prompt: Prompt) {
        self.input_mode = InputMode::Normal;
        match prompt {
            Prompt::PresetName => {
                self.prompt_buffer.clear();
            }
            Prompt::DownloadName => {
                if self.last_result.is_none() {
                    self.set_notice(NoticeLevel::Info, "No response body to save yet");
                    return;
                }
                self.prompt_buffer = String::from(DEFAULT_DOWNLOAD_NAME);
            }
        }
        self.prompt = Some(prompt);
    }

    pub fn prompt_char(&mut self, c: char) {
        self.prompt_buffer.push(c);
    }

    pub fn prompt_backspace(&mut self) {
        self.prompt_buffer.pop();
    }

    pub fn prompt_submit(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let input = std::mem::take(&mut self.prompt_buffer);
        match prompt {
            Prompt::PresetName => self.save_preset(&input),
            Prompt::DownloadName => self.save_response_body(&input),
        }
    }

    pub fn prompt_cancel(&mut self) {
        self.prompt = None;
        self.prompt_buffer.clear();
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Response panel
    // ========================

    pub fn scroll_up(&mut self) {
        self.response_scroll = self.response_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.response_scroll = self.response_scroll.saturating_add(1);
    }

    pub fn cycle_response_view(&mut self) {
        self.response_view = self.response_view.next();
        self.response_scroll = 0;
    }

    /// Write the raw body of the last response into the download directory
    pub fn save_response_body(&mut self, filename: &str) {
        let Some(result) = &self.last_result else {
            self.set_notice(NoticeLevel::Info, "No response body to save yet");
            return;
        };
        match viewer::save_body(&result.body, &self.settings.download_dir, filename) {
            Ok(path) => {
                tracing::info!(path = %path.display(), bytes = result.body.len(), "Response body saved");
                self.set_notice(NoticeLevel::Success, format!("Saved {}", path.display()));
            }
            Err(e) => {
                tracing::warn!(filename, "Saving response body failed: {}", e);
                self.set_notice(NoticeLevel::Error, format!("Could not save body: {}", e));
            }
        }
    }

    // ========================
    // Request sending
    // ========================

    /// Validate and resolve the form; on success hand back the command to send
    pub fn prepare_request(&mut self) -> Option<NetworkCommand> {
        if self.is_loading() {
            self.set_notice(NoticeLevel::Info, "A request is already in flight");
            return None;
        }

        let prepared = match self.form.prepare() {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::warn!("Request not sent: {}", e);
                self.active_panel = match e {
                    BuildError::InvalidUrl(_) => Panel::Url,
                    BuildError::InvalidBody(_) => Panel::Body,
                };
                self.input_mode = InputMode::Normal;
                self.set_notice(NoticeLevel::Error, e.to_string());
                self.build_error = Some(e);
                return None;
            }
        };

        self.build_error = None;
        self.notice = None;
        self.curl_preview = Some(prepared.curl);
        self.response = ResponsePane::Loading;
        self.last_result = None;
        self.response_scroll = 0;

        let id = self.next_id();
        self.pending_request_id = Some(id);

        Some(NetworkCommand::Execute {
            id,
            spec: prepared.spec,
        })
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        // Only process if it matches the pending request
        if self.pending_request_id != Some(response.id()) {
            tracing::debug!(id = response.id(), "Dropping stale response");
            return;
        }
        self.pending_request_id = None;
        self.response_scroll = 0;

        match response {
            NetworkResponse::Completed { result, .. } => {
                self.response = ResponsePane::Received(ResponseDisplay::from_result(&result));
                self.last_result = Some(result);
            }
            NetworkResponse::Failed { error, .. } => {
                self.response = ResponsePane::Failed(error);
                self.last_result = None;
            }
        }
    }
}
