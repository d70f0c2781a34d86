use crate::types::DictionaryEntry;

/// Query pipeline for one language: normalize the raw query, pick a
/// lookup strategy, merge and annotate the hits.
pub trait LanguageProcessor: Send + Sync {
    /// Language identifier (ISO 639-1 code: "ja", "zh", "ko", etc.)
    fn language_code(&self) -> &str;

    /// Normalize text (Unicode normalization, whitespace, etc.)
    fn normalize(&self, text: &str) -> String;

    /// Run a raw query end to end. No hits is an empty list, never an error.
    fn search(&self, query: &str) -> Vec<DictionaryEntry>;
}

/// Optional trait for word frequency data
pub trait FrequencyProvider: Send + Sync {
    /// Get frequency rank (lower = more common), None if not in list
    fn frequency(&self, term: &str, reading: &str) -> Option<u32>;

    /// Rank formatted for display
    fn formatted_rank(&self, term: &str, reading: &str) -> Option<String> {
        self.frequency(term, reading).map(|rank| format!("#{rank}"))
    }
}
