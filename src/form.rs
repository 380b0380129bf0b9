//! Form state - the active request configuration and the session's presets
//!
//! All mutation of the request being composed goes through here. Nothing in
//! this module touches the disk or the network.

use crate::builder::{build_request, PreparedRequest};
use crate::constants::{DEFAULT_PRESET_NAME, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS};
use crate::error::{BuildError, PresetError};
use crate::models::{AuthConfig, BodyMode, HttpMethod, KeyValue, Preset, RequestConfig};
use crate::presets::PresetStore;

/// Editable key/value tables
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Table {
    QueryParams,
    Headers,
}

/// A single-field change to the active configuration
#[derive(Clone, Debug, PartialEq)]
pub enum FieldUpdate {
    Method(HttpMethod),
    Url(String),
    BodyMode(BodyMode),
    Body(String),
    Auth(AuthConfig),
    Timeout(f64),
    VerifySsl(bool),
}

#[derive(Debug, Default)]
pub struct FormState {
    pub config: RequestConfig,
    presets: PresetStore,
}

impl FormState {
    pub fn new(config: RequestConfig) -> Self {
        FormState {
            config,
            presets: PresetStore::new(),
        }
    }

    pub fn update_field(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Method(method) => self.config.method = method,
            FieldUpdate::Url(url) => self.config.url = url,
            FieldUpdate::BodyMode(mode) => self.config.body_mode = mode,
            FieldUpdate::Body(body) => self.config.body = body,
            FieldUpdate::Auth(auth) => self.config.auth = auth,
            FieldUpdate::Timeout(secs) => self.config.timeout_secs = clamp_timeout(secs),
            FieldUpdate::VerifySsl(verify) => self.config.verify_ssl = verify,
        }
    }

    pub fn rows(&self, table: Table) -> &[KeyValue] {
        match table {
            Table::QueryParams => &self.config.query_params,
            Table::Headers => &self.config.headers,
        }
    }

    pub fn rows_mut(&mut self, table: Table) -> &mut Vec<KeyValue> {
        match table {
            Table::QueryParams => &mut self.config.query_params,
            Table::Headers => &mut self.config.headers,
        }
    }

    /// Append an empty row and return its index
    pub fn add_row(&mut self, table: Table) -> usize {
        let rows = self.rows_mut(table);
        rows.push(KeyValue::default());
        rows.len() - 1
    }

    pub fn remove_row(&mut self, table: Table, index: usize) -> bool {
        let rows = self.rows_mut(table);
        if index < rows.len() {
            rows.remove(index);
            true
        } else {
            false
        }
    }

    pub fn set_row(
        &mut self,
        table: Table,
        index: usize,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        match self.rows_mut(table).get_mut(index) {
            Some(row) => {
                *row = KeyValue::new(key, value);
                true
            }
            None => false,
        }
    }

    /// Snapshot the active configuration. Returns the name actually used.
    pub fn save_preset(&mut self, name: &str) -> String {
        let name = match name.trim() {
            "" => DEFAULT_PRESET_NAME,
            trimmed => trimmed,
        };
        self.presets.save(name, &self.config).name.clone()
    }

    /// Replace the active configuration with a copy of the named preset
    pub fn load_preset(&mut self, name: &str) -> Result<(), PresetError> {
        let preset = self.presets.get(name)?;
        self.config = preset.snapshot.clone();
        Ok(())
    }

    pub fn delete_preset(&mut self, name: &str) -> Result<Preset, PresetError> {
        self.presets.remove(name)
    }

    pub fn presets(&self) -> &PresetStore {
        &self.presets
    }

    /// Resolve the active configuration into a sendable request
    pub fn prepare(&self) -> Result<PreparedRequest, BuildError> {
        build_request(&self.config)
    }
}

fn clamp_timeout(secs: f64) -> f64 {
    if secs.is_nan() {
        return MIN_TIMEOUT_SECS;
    }
    secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS)
}
