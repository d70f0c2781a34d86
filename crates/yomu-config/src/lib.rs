use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
use self::lookup::LookupConfig;
use self::search::SearchConfig;

pub mod dictionary;
pub mod lookup;
pub mod search;

pub use dictionary::DictionaryPath;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryConfig,
    pub lookup: LookupConfig,
    pub search: SearchConfig,
}

impl Config {
    /// Defaults, with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Load a JSON profile, then apply environment overrides
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        tracing::info!("Loading config from {}", path.display());
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(debounce_ms) = env_parse("YOMU_DEBOUNCE_MS") {
            self.search.debounce_ms = debounce_ms;
        }

        if let Some(page_size) = env_parse("YOMU_PAGE_SIZE") {
            self.search.page_size = page_size;
        }

        if let Some(result_cap) = env_parse("YOMU_RESULT_CAP") {
            self.lookup.result_cap = result_cap;
        }

        if let Some(enabled) = env_parse("YOMU_FREQUENCY_ENABLED") {
            self.lookup.frequency_data_enabled = enabled;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use yomu_core::SourceId;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.dictionary.enabled);
        assert_eq!(config.lookup.result_cap, 100);
        assert_eq!(config.lookup.max_deinflection_depth, 10);
        assert!(!config.lookup.frequency_data_enabled);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.page_size, 20);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{
            "dictionary": { "builtin": [{ "id": "jmdict", "path": "jmdict.json" }] },
            "lookup": { "enabled_sources": [{ "built_in": "jmdict" }], "frequency_data_enabled": true }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert!(config.dictionary.enabled);
        assert_eq!(config.dictionary.builtin[0].id, "jmdict");
        assert!(config.lookup.frequency_data_enabled);
        assert_eq!(config.lookup.result_cap, 100);
        assert!(config.lookup.is_enabled(&SourceId::built_in("jmdict")));
        assert!(!config.lookup.is_enabled(&SourceId::built_in("obunsha")));
    }

    #[test]
    fn test_empty_enabled_sources_means_all() {
        let lookup = LookupConfig::default();
        assert!(lookup.is_enabled(&SourceId::built_in("anything")));
    }

    #[test]
    fn test_display_rank() {
        let lookup = LookupConfig {
            source_order: vec![SourceId::built_in("obunsha"), SourceId::built_in("jmdict")],
            ..LookupConfig::default()
        };
        assert_eq!(lookup.display_rank(&SourceId::built_in("jmdict")), 1);
        assert_eq!(lookup.display_rank(&SourceId::imported("x")), 2);
    }
}
