use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{Result, StroopError};

static LANG_DIR: Dir = include_dir!("src/lang");

pub const DEFAULT_LANGUAGE: &str = "english";

/// Turns display keys (`#pause`, color names, ...) into text.
pub trait LocalizationProvider {
    /// Returns the key itself when there is no translation.
    fn translate(&self, key: &str) -> String;
}

#[derive(Deserialize, Clone, Debug)]
struct LanguagePack {
    name: String,
    definitions: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct Localization {
    pub language_name: String,
    definitions: HashMap<String, String>,
}

impl Localization {
    /// Loads an embedded language pack. An empty name means english.
    pub fn load(language: &str) -> Result<Self> {
        let name = match language.trim() {
            "" => DEFAULT_LANGUAGE,
            other => other,
        };
        let pack = read_pack(&name.to_lowercase())?;
        Ok(Self {
            language_name: pack.name,
            definitions: pack.definitions,
        })
    }

    /// Lookup table without any translations: every key maps to itself.
    pub fn passthrough() -> Self {
        Self::default()
    }

    pub fn available() -> Vec<String> {
        let mut names: Vec<String> = LANG_DIR
            .files()
            .filter_map(|f| {
                let path = f.path();
                match path.extension().and_then(|e| e.to_str()) {
                    Some("json") => path.file_stem()?.to_str().map(str::to_string),
                    _ => None,
                }
            })
            .collect();
        names.sort();
        names
    }

    /// Later definitions win; used for translations from the config file.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.definitions
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

}

impl LocalizationProvider for Localization {
    fn translate(&self, key: &str) -> String {
        self.definitions
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

impl<L: LocalizationProvider + ?Sized> LocalizationProvider for &L {
    fn translate(&self, key: &str) -> String {
        (**self).translate(key)
    }
}

fn read_pack(name: &str) -> Result<LanguagePack> {
    let file = LANG_DIR.get_file(format!("{name}.json")).ok_or_else(|| {
        StroopError::config(format!(
            "unknown language '{name}' (available: {})",
            Localization::available().join(", ")
        ))
    })?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| StroopError::config(format!("language pack '{name}' is not utf-8")))?;

    Ok(serde_json::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_pack_loads() {
        let lang = Localization::load("english").unwrap();
        assert_eq!(lang.language_name, "english");
        assert_eq!(lang.translate("#pause"), "Paused");
        assert_eq!(lang.translate("#start"), "Start");
    }

    #[test]
    fn empty_name_falls_back_to_english() {
        let lang = Localization::load("  ").unwrap();
        assert_eq!(lang.language_name, DEFAULT_LANGUAGE);
    }

    #[test]
    fn names_are_case_insensitive() {
        let lang = Localization::load("German").unwrap();
        assert_eq!(lang.translate("Red"), "Rot");
    }

    #[test]
    fn unknown_key_returns_key() {
        let lang = Localization::load("english").unwrap();
        assert_eq!(lang.translate("#no-such-key"), "#no-such-key");
        assert_eq!(lang.translate("Red"), "Red");
    }

    #[test]
    fn unknown_language_is_configuration_error() {
        let err = Localization::load("klingon").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("english"));
    }

    #[test]
    fn overrides_replace_pack_entries() {
        let lang = Localization::load("english")
            .unwrap()
            .with_overrides([("#pause", "Hold on"), ("Teal", "Petrol")]);
        assert_eq!(lang.translate("#pause"), "Hold on");
        assert_eq!(lang.translate("Teal"), "Petrol");
    }

    #[test]
    fn available_lists_embedded_packs() {
        let names = Localization::available();
        assert!(names.contains(&"english".to_string()));
        assert!(names.contains(&"german".to_string()));
    }

    #[test]
    fn passthrough_translates_nothing() {
        let lang = Localization::passthrough();
        assert_eq!(lang.translate("#winner"), "#winner");
    }
}
