use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::PathBuf;

/// Storage key for the "write a JSON export after each submit" toggle.
/// The key is part of the persisted format; renaming it would drop every
/// saved preference.
pub const PREF_AUTO_JSON_KEY: &str = "survey_pref_auto_json_v1";

#[derive(Debug)]
pub struct PrefsError(pub String);

impl Display for PrefsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PrefsError {}

/// Client-side preferences, one flat JSON object on disk. Read at
/// startup, written on change; a missing or unreadable file behaves as
/// all-defaults.
pub struct Preferences {
    path: PathBuf,
}

impl Preferences {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location under the user's config directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
            let trimmed = xdg_config_home.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed).join("binsight").join("prefs.json");
            }
        }
        if let Ok(home) = std::env::var("HOME") {
            let trimmed = home.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed)
                    .join(".config")
                    .join("binsight")
                    .join("prefs.json");
            }
        }
        PathBuf::from(".binsight").join("prefs.json")
    }

    #[must_use]
    pub fn auto_json(&self) -> bool {
        self.load()
            .get(PREF_AUTO_JSON_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_auto_json(&self, enabled: bool) -> Result<(), PrefsError> {
        let mut map = self.load();
        map.insert(PREF_AUTO_JSON_KEY.to_string(), Value::Bool(enabled));
        self.store(&map)
    }

    fn load(&self) -> Map<String, Value> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
            .and_then(|value| value.as_object().cloned())
            .unwrap_or_default()
    }

    fn store(&self, map: &Map<String, Value>) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PrefsError(e.to_string()))?;
        }
        let bytes = serde_json::to_vec_pretty(&Value::Object(map.clone()))
            .map_err(|e| PrefsError(e.to_string()))?;
        fs::write(&self.path, bytes).map_err(|e| PrefsError(e.to_string()))
    }
}
