use crate::error::PresetError;
use crate::models::{Preset, RequestConfig};

/// In-memory named snapshots of request configurations.
///
/// Lives for one session only. Presets are listed in save order; re-saving a
/// name moves it to the end.
#[derive(Debug, Default)]
pub struct PresetStore {
    presets: Vec<Preset>,
}

impl PresetStore {
    pub fn new() -> Self {
        PresetStore {
            presets: Vec::new(),
        }
    }

    /// Store a copy of `config` under `name`, replacing any preset with that name
    pub fn save(&mut self, name: &str, config: &RequestConfig) -> &Preset {
        self.presets.retain(|p| p.name != name);
        self.presets.push(Preset {
            name: name.to_string(),
            snapshot: config.clone(),
            saved_at: chrono::Utc::now(),
        });
        // Just pushed, so the store is non-empty
        &self.presets[self.presets.len() - 1]
    }

    pub fn get(&self, name: &str) -> Result<&Preset, PresetError> {
        self.presets
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| PresetError::NotFound(name.to_string()))
    }

    /// Preset at a list position (used by the sidebar selection)
    pub fn get_index(&self, index: usize) -> Option<&Preset> {
        self.presets.get(index)
    }

    pub fn remove(&mut self, name: &str) -> Result<Preset, PresetError> {
        let index = self
            .presets
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| PresetError::NotFound(name.to_string()))?;
        Ok(self.presets.remove(index))
    }

    pub fn names(&self) -> Vec<String> {
        self.presets.iter().map(|p| p.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;

    #[test]
    fn test_save_overwrites_same_name() {
        let mut store = PresetStore::new();
        let mut cfg = RequestConfig::default();
        store.save("users", &cfg);
        store.save("orders", &cfg);

        cfg.method = HttpMethod::DELETE;
        store.save("users", &cfg);

        assert_eq!(store.len(), 2);
        assert_eq!(store.names(), vec!["orders".to_string(), "users".to_string()]);
        assert_eq!(store.get("users").unwrap().snapshot.method, HttpMethod::DELETE);
    }

    #[test]
    fn test_snapshot_is_detached_from_source() {
        let mut store = PresetStore::new();
        let mut cfg = RequestConfig::default();
        store.save("a", &cfg);

        cfg.url.push_str("/changed");
        assert_eq!(store.get("a").unwrap().snapshot, RequestConfig::default());
    }

    #[test]
    fn test_missing_names() {
        let mut store = PresetStore::new();
        assert_eq!(
            store.get("nope").unwrap_err(),
            PresetError::NotFound("nope".to_string())
        );
        assert!(store.remove("nope").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_returns_preset() {
        let mut store = PresetStore::new();
        store.save("a", &RequestConfig::default());
        let removed = store.remove("a").unwrap();
        assert_eq!(removed.name, "a");
        assert!(store.get_index(0).is_none());
    }
}
