use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// A dictionary file and the id it is registered under
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DictionaryPath {
    pub id: String,
    pub path: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct DictionaryConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// jmdict-simplified JSON files, loaded as built-in sources
    #[serde(default)]
    pub builtin: Vec<DictionaryPath>,
    /// Term-bank JSON files, loaded as imported sources
    #[serde(default)]
    pub imported: Vec<DictionaryPath>,
    /// TSV: term, reading, pattern[,pattern]
    #[serde(default)]
    pub pitch_accent_path: Option<String>,
    /// TSV: term, [reading,] rank
    #[serde(default)]
    pub frequency_path: Option<String>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            builtin: vec![],
            imported: vec![],
            pitch_accent_path: None,
            frequency_path: None,
        }
    }
}
