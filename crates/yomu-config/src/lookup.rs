use serde::{Deserialize, Serialize};
use yomu_core::SourceId;

fn default_result_cap() -> usize {
    100
}

fn default_max_deinflection_depth() -> usize {
    10
}

fn default_meaning_search_limit() -> usize {
    50
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LookupConfig {
    /// Built-in sources to query. Empty means all of them.
    #[serde(default)]
    pub enabled_sources: Vec<SourceId>,
    /// Preferred section order for callers presenting combined entries
    #[serde(default)]
    pub source_order: Vec<SourceId>,
    #[serde(default)]
    pub frequency_data_enabled: bool,
    /// Ceiling on Japanese-path results before merging
    #[serde(default = "default_result_cap")]
    pub result_cap: usize,
    #[serde(default = "default_max_deinflection_depth")]
    pub max_deinflection_depth: usize,
    #[serde(default = "default_meaning_search_limit")]
    pub meaning_search_limit: usize,
}

impl LookupConfig {
    pub fn is_enabled(&self, source: &SourceId) -> bool {
        self.enabled_sources.is_empty() || self.enabled_sources.contains(source)
    }

    /// Position of `source` in the preferred display order, unknown sources last
    pub fn display_rank(&self, source: &SourceId) -> usize {
        self.source_order
            .iter()
            .position(|s| s == source)
            .unwrap_or(self.source_order.len())
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled_sources: vec![],
            source_order: vec![],
            frequency_data_enabled: false,
            result_cap: default_result_cap(),
            max_deinflection_depth: default_max_deinflection_depth(),
            meaning_search_limit: default_meaning_search_limit(),
        }
    }
}
