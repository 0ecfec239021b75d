use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::{Result, StroopError};
use crate::localization::{Localization, DEFAULT_LANGUAGE};
use crate::palette::{default_colors, ColorCatalog, ColorEntry, Rgb};
use crate::round::MatchPolicy;

/// Digit keys 1-9 pick options, so no more slots than that.
pub const MAX_OPTION_SLOTS: usize = 9;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub colors: Vec<ColorEntry>,
    /// Number of answer buttons shown each round.
    pub option_slots: usize,
    pub pause_key: char,
    pub language: String,
    /// Extra or replacement translations layered over the language pack.
    pub translations: HashMap<String, String>,
    pub policy: MatchPolicy,
    /// Color of menu titles and highlights.
    pub accent: Rgb,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            option_slots: 4,
            pause_key: 'p',
            language: DEFAULT_LANGUAGE.to_string(),
            translations: HashMap::new(),
            policy: MatchPolicy::default(),
            accent: Rgb::new(255, 200, 60),
        }
    }
}

/// Checked, immutable settings a game is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub catalog: ColorCatalog,
    pub option_slots: usize,
    pub pause_key: char,
    pub policy: MatchPolicy,
    pub accent: Rgb,
}

impl Default for GameSettings {
    fn default() -> Self {
        let cfg = Config::default();
        Self {
            catalog: ColorCatalog::default(),
            option_slots: cfg.option_slots,
            pause_key: cfg.pause_key,
            policy: cfg.policy,
            accent: cfg.accent,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<GameSettings> {
        let catalog = ColorCatalog::new(self.colors.clone())?;

        if self.option_slots < 2 {
            return Err(StroopError::config(format!(
                "option_slots must be at least 2, got {}",
                self.option_slots
            )));
        }
        if self.option_slots > MAX_OPTION_SLOTS {
            return Err(StroopError::config(format!(
                "option_slots must be at most {MAX_OPTION_SLOTS}, got {}",
                self.option_slots
            )));
        }
        if self.option_slots > catalog.len() {
            return Err(StroopError::config(format!(
                "{} option slots need at least as many colors, catalog has {}",
                self.option_slots,
                catalog.len()
            )));
        }
        if self.pause_key.is_ascii_digit() || self.pause_key.is_control() {
            return Err(StroopError::config(format!(
                "pause key {:?} collides with option keys",
                self.pause_key
            )));
        }

        Ok(GameSettings {
            catalog,
            option_slots: self.option_slots,
            pause_key: self.pause_key,
            policy: self.policy,
            accent: self.accent,
        })
    }

    pub fn localization(&self) -> Result<Localization> {
        Ok(Localization::load(&self.language)?.with_overrides(self.translations.clone()))
    }
}

pub trait ConfigStore {
    /// A missing file yields the defaults; an unreadable one is an error.
    fn load(&self) -> Result<Config>;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Config> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", self.path.display());
                return Ok(Config::default());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice::<Config>(&bytes).map_err(|e| {
            StroopError::config(format!("{}: {e}", self.path.display()))
        })
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::LocalizationProvider;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            colors: vec![
                ColorEntry::new("Red", Rgb::new(255, 0, 0)),
                ColorEntry::new("Green", Rgb::new(0, 255, 0)),
                ColorEntry::new("Blue", Rgb::new(0, 0, 255)),
            ],
            option_slots: 3,
            pause_key: ' ',
            language: "german".into(),
            translations: HashMap::from([("#pause".to_string(), "Halt".to_string())]),
            policy: MatchPolicy::InkMatch,
            accent: Rgb::new(1, 2, 3),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load().unwrap(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"option_slots": 3, "policy": "ink-match"}"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load().unwrap();
        assert_eq!(cfg.option_slots, 3);
        assert_eq!(cfg.policy, MatchPolicy::InkMatch);
        assert_eq!(cfg.colors, default_colors());
    }

    #[test]
    fn garbage_file_is_configuration_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ colors: nope").unwrap();
        assert_matches!(
            FileConfigStore::with_path(&path).load(),
            Err(StroopError::Configuration(_))
        );
    }

    #[test]
    fn default_config_validates() {
        let settings = Config::default().validate().unwrap();
        assert_eq!(settings, GameSettings::default());
    }

    #[test]
    fn too_many_slots_for_catalog() {
        let cfg = Config {
            colors: default_colors().into_iter().take(3).collect(),
            option_slots: 4,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(StroopError::Configuration(_)));
    }

    #[test]
    fn slot_bounds() {
        for slots in [0, 1, MAX_OPTION_SLOTS + 1] {
            let cfg = Config {
                option_slots: slots,
                ..Config::default()
            };
            assert!(cfg.validate().is_err(), "slots={slots}");
        }
    }

    #[test]
    fn duplicate_colors_rejected_at_validation() {
        let mut colors = default_colors();
        colors.push(ColorEntry::new("Scarlet", colors[0].color));
        let cfg = Config {
            colors,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(StroopError::Configuration(_)));
    }

    #[test]
    fn digit_pause_key_rejected() {
        let cfg = Config {
            pause_key: '3',
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn localization_applies_translations() {
        let cfg = Config {
            translations: HashMap::from([("Red".to_string(), "Crimson".to_string())]),
            ..Config::default()
        };
        let lang = cfg.localization().unwrap();
        assert_eq!(lang.translate("Red"), "Crimson");
        assert_eq!(lang.translate("#quit"), "Quit");
    }
}
