use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::PoptrendError;

use super::{MAX_YEAR, MIN_YEAR};

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub country_code: String,
    pub country_name: String,
    pub start_year: u16,
    pub end_year: u16,
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            country_code: "AF".to_string(),
            country_name: "Afghanistan".to_string(),
            start_year: 2020,
            end_year: 2020,
            api_key: None,
        }
    }
}

impl AppConfig {
    pub fn from_local_file() -> Option<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub(crate) fn load_from(config_path: &Path) -> Option<Self> {
        if config_path.exists() {
            let file = std::fs::File::open(config_path).expect("Could not open config file");
            Some(serde_json::from_reader(file).expect("Could not parse config file"))
        } else {
            None
        }
    }

    pub fn save(&self) -> Result<(), PoptrendError> {
        self.save_to(&config_file_path().ok_or(PoptrendError::NoConfigDir)?)
    }

    pub(crate) fn save_to(&self, config_path: &Path) -> Result<(), PoptrendError> {
        if !config_path.exists() {
            std::fs::create_dir_all(config_path.parent().unwrap())
                .map_err(|e| PoptrendError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| PoptrendError::ConfigIOError { source: e })?;
        serde_json::to_writer(file, self)
            .map_err(|e| PoptrendError::ConfigSerializeError { source: e })
    }

    /// Switch to another country. The display name is only known for the
    /// default country; for any other code the label falls back to the code
    /// itself.
    pub fn set_country(&mut self, code: String) {
        if code != self.country_code {
            self.country_code = code;
            self.country_name = String::new();
        }
    }

    pub fn country_label(&self) -> &str {
        if self.country_name.is_empty() {
            &self.country_code
        } else {
            &self.country_name
        }
    }

    /// Force the persisted or CLI-provided range back into slider bounds.
    pub fn clamp_range(&mut self) {
        self.end_year = self.end_year.clamp(MIN_YEAR, MAX_YEAR);
        self.start_year = self.start_year.clamp(MIN_YEAR, self.end_year);
    }

    /// Resolves the API key: the command line wins, then the environment,
    /// then the config file. There is deliberately no built-in default key.
    pub fn resolve_api_key(
        &self,
        cli_key: Option<String>,
        env_key: Option<String>,
    ) -> Result<String, PoptrendError> {
        cli_key
            .or(env_key)
            .or_else(|| self.api_key.clone())
            .ok_or(PoptrendError::MissingApiKey)
    }
}

fn config_file_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("poptrend").join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poptrend").join(CONFIG_FILE_NAME);

        let config = AppConfig {
            country_code: "SO".to_string(),
            country_name: String::new(),
            start_year: 2016,
            end_year: 2019,
            api_key: Some("test-key".to_string()),
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.country_code, "SO");
        assert_eq!(loaded.start_year, 2016);
        assert_eq!(loaded.end_year, 2019);
        assert_eq!(loaded.api_key.as_deref(), Some("test-key"));
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from(&dir.path().join(CONFIG_FILE_NAME)).is_none());
    }

    #[test]
    fn test_api_key_resolution_order() {
        let mut config = AppConfig::default();
        config.api_key = Some("file".to_string());

        let key = config
            .resolve_api_key(Some("cli".to_string()), Some("env".to_string()))
            .unwrap();
        assert_eq!(key, "cli");

        let key = config
            .resolve_api_key(None, Some("env".to_string()))
            .unwrap();
        assert_eq!(key, "env");

        assert_eq!(config.resolve_api_key(None, None).unwrap(), "file");

        config.api_key = None;
        assert!(matches!(
            config.resolve_api_key(None, None),
            Err(PoptrendError::MissingApiKey)
        ));
    }

    #[test]
    fn test_clamp_range_enforces_slider_bounds() {
        let mut config = AppConfig {
            start_year: 1990,
            end_year: 2030,
            ..Default::default()
        };
        config.clamp_range();
        assert_eq!((config.start_year, config.end_year), (MIN_YEAR, MAX_YEAR));

        let mut config = AppConfig {
            start_year: 2021,
            end_year: 2005,
            ..Default::default()
        };
        config.clamp_range();
        assert_eq!((config.start_year, config.end_year), (2005, 2005));
    }

    #[test]
    fn test_country_label_falls_back_to_code() {
        let mut config = AppConfig::default();
        assert_eq!(config.country_label(), "Afghanistan");
        config.set_country("YE".to_string());
        assert_eq!(config.country_label(), "YE");
    }
}
