use std::collections::BTreeMap;

use crate::foundation::kind::AudioKind;

/// Supplies the volume an audio clip gets when the caller does not give one.
pub trait DefaultsProvider {
    fn default_volume(&self, kind: AudioKind) -> f64;
}

/// Built-in levels: narration at unity, music bedded under it, effects slightly below.
pub fn builtin_volume(kind: AudioKind) -> f64 {
    match kind {
        AudioKind::Voice => 1.0,
        AudioKind::Music => 0.5,
        AudioKind::Sfx => 0.8,
    }
}

/// Flat key/value store of defaults.
///
/// Volumes are read from `voice_volume`, `music_volume` and `sfx_volume`. A missing key, or a
/// value that is not a number within `[0, 2]`, falls back to [`builtin_volume`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DefaultsManager {
    values: BTreeMap<String, serde_json::Value>,
}

impl DefaultsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn update<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        for (k, v) in entries {
            self.set(k, v);
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn all(&self) -> BTreeMap<String, serde_json::Value> {
        self.values.clone()
    }

    fn volume_key(kind: AudioKind) -> &'static str {
        match kind {
            AudioKind::Voice => "voice_volume",
            AudioKind::Music => "music_volume",
            AudioKind::Sfx => "sfx_volume",
        }
    }
}

impl DefaultsProvider for DefaultsManager {
    fn default_volume(&self, kind: AudioKind) -> f64 {
        self.get(Self::volume_key(kind))
            .and_then(serde_json::Value::as_f64)
            .filter(|v| v.is_finite() && (0.0..=2.0).contains(v))
            .unwrap_or_else(|| builtin_volume(kind))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/defaults/manager.rs"]
mod tests;
