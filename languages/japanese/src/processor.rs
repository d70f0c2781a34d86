use std::path::Path;
use std::sync::Arc;

use yomu_config::Config;
use yomu_config::lookup::LookupConfig;
use yomu_core::preprocess::{DefaultPreprocessor, Preprocessor, is_japanese};
use yomu_core::{
    DictionaryEntry, DictionarySource, DictionaryStore, FrequencyProvider, LanguageProcessor,
    LoadError, SourceId,
};

use crate::annotate::Annotator;
use crate::deconjugator::Deinflection;
use crate::frequency::JapaneseFrequency;
use crate::loader::{JMdictLoader, TermBankLoader};
use crate::merger::merge_entries;
use crate::orchestrator::LookupOrchestrator;
use crate::pitch_accent::JapanesePitchAccent;

/// Japanese language processor
///
/// Built once at startup and shared behind an `Arc`. Every query method is
/// a read over the loaded data; only `import_dictionary` changes what later
/// queries can see.
pub struct JapaneseProcessor {
    orchestrator: LookupOrchestrator,
    pitch_accent: Option<JapanesePitchAccent>,
    frequency: Option<JapaneseFrequency>,
}

impl JapaneseProcessor {
    pub fn new(store: Arc<DictionaryStore>, config: LookupConfig) -> Self {
        Self {
            orchestrator: LookupOrchestrator::new(store, config),
            pitch_accent: None,
            frequency: None,
        }
    }

    pub fn with_pitch_accent(mut self, pitch_accent: JapanesePitchAccent) -> Self {
        self.pitch_accent = Some(pitch_accent);
        self
    }

    pub fn with_frequency(mut self, frequency: JapaneseFrequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Load every configured dictionary and side table.
    ///
    /// A file that fails to load is logged and left out; the processor
    /// starts with whatever did load.
    pub fn from_config(config: &Config) -> Self {
        let dictionaries = &config.dictionary;

        let mut built_in: Vec<Arc<dyn DictionarySource>> = Vec::new();
        if dictionaries.enabled {
            for entry in &dictionaries.builtin {
                let source = SourceId::built_in(entry.id.as_str());
                match JMdictLoader::load_from_file(Path::new(&entry.path), source) {
                    Ok(dict) => built_in.push(Arc::new(dict)),
                    Err(e) => tracing::error!(
                        "Failed to load dictionary {} from {}: {}",
                        entry.id,
                        entry.path,
                        e
                    ),
                }
            }
        } else {
            tracing::warn!("Dictionaries disabled in config, starting empty");
        }

        let mut processor = Self::new(
            Arc::new(DictionaryStore::new(built_in)),
            config.lookup.clone(),
        );

        if dictionaries.enabled {
            for entry in &dictionaries.imported {
                if let Err(e) = processor.import_dictionary(&entry.id, Path::new(&entry.path)) {
                    tracing::warn!(
                        "Failed to import dictionary {} from {}: {}",
                        entry.id,
                        entry.path,
                        e
                    );
                }
            }
        }

        if let Some(path) = &dictionaries.pitch_accent_path {
            match JapanesePitchAccent::load_from_file(Path::new(path)) {
                Ok(index) => processor.pitch_accent = Some(index),
                Err(e) => tracing::warn!("Failed to load pitch accents from {}: {}", path, e),
            }
        }

        if let Some(path) = &dictionaries.frequency_path {
            match JapaneseFrequency::load_from_file(Path::new(path)) {
                Ok(frequency) => processor.frequency = Some(frequency),
                Err(e) => tracing::warn!("Failed to load frequency list from {}: {}", path, e),
            }
        }

        processor
    }

    /// Load a term bank and register it as an imported source.
    ///
    /// Returns the number of entries that made it into the new source.
    pub fn import_dictionary(&self, id: &str, path: &Path) -> Result<usize, LoadError> {
        let dict = TermBankLoader::load(path, SourceId::imported(id))?;
        let count = dict.entry_count();
        self.orchestrator.store().add_imported(Arc::new(dict))?;
        Ok(count)
    }

    pub fn store(&self) -> &Arc<DictionaryStore> {
        self.orchestrator.store()
    }

    pub fn config(&self) -> &LookupConfig {
        self.orchestrator.config()
    }

    pub fn source_ids(&self) -> Vec<SourceId> {
        self.store().source_ids()
    }

    pub fn lookup(&self, word: &str) -> Vec<DictionaryEntry> {
        self.annotated(self.orchestrator.lookup(word))
    }

    pub fn lookup_with_deinflection(&self, word: &str) -> Vec<DictionaryEntry> {
        self.annotated(self.orchestrator.lookup_with_deinflection(word))
    }

    pub fn search_by_prefix(&self, prefix: &str, limit: usize) -> Vec<DictionaryEntry> {
        self.annotated(self.orchestrator.search_by_prefix(prefix, limit))
    }

    pub fn search_imported_dictionaries_by_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Vec<DictionaryEntry> {
        self.annotated(
            self.orchestrator
                .search_imported_dictionaries_by_prefix(prefix, limit),
        )
    }

    pub fn search_by_meaning(&self, text: &str, limit: usize) -> Vec<DictionaryEntry> {
        self.annotated(self.orchestrator.search_by_meaning(text, limit))
    }

    pub fn deinflect(&self, surface: &str) -> Vec<Deinflection> {
        self.orchestrator.deinflect(&self.normalize(surface))
    }

    /// Pick a strategy from the query's script. Results are raw.
    fn dispatch(&self, query: &str) -> Vec<DictionaryEntry> {
        let config = self.config();

        if !is_japanese(query) {
            tracing::debug!("Meaning search for {:?}", query);
            return self.orchestrator.search_by_meaning(query, config.meaning_search_limit);
        }

        let cap = config.result_cap;
        let mut results = self.orchestrator.lookup_with_deinflection(query);
        if results.is_empty() {
            tracing::debug!("No deinflected hits for {:?}, falling back to prefix search", query);
            results = self.orchestrator.search_by_prefix(query, cap);
            results.extend(
                self.orchestrator
                    .search_imported_dictionaries_by_prefix(query, cap),
            );
        }

        results.truncate(cap);
        results
    }

    fn annotated(&self, mut entries: Vec<DictionaryEntry>) -> Vec<DictionaryEntry> {
        let frequency = self
            .frequency
            .as_ref()
            .filter(|_| self.config().frequency_data_enabled)
            .map(|f| f as &dyn FrequencyProvider);

        Annotator::new(self.pitch_accent.as_ref(), frequency).annotate(&mut entries);
        entries
    }
}

impl LanguageProcessor for JapaneseProcessor {
    fn language_code(&self) -> &str {
        "ja"
    }

    fn normalize(&self, text: &str) -> String {
        DefaultPreprocessor.process(text)
    }

    fn search(&self, query: &str) -> Vec<DictionaryEntry> {
        let query = self.normalize(query);
        if query.is_empty() {
            return Vec::new();
        }

        let merged = merge_entries(self.dispatch(&query));
        self.annotated(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::IndexedDictionary;

    fn processor() -> JapaneseProcessor {
        let mut jmdict = IndexedDictionary::new(SourceId::built_in("jmdict"), "JMdict");
        let mut entry = DictionaryEntry::new("1", "走る", "はしる", SourceId::built_in("jmdict"))
            .with_meanings(["to run"]);
        entry.meaning_tags = vec!["v5r".to_string()];
        jmdict.insert(entry, []);
        jmdict.insert(
            DictionaryEntry::new("2", "走り書き", "はしりがき", SourceId::built_in("jmdict"))
                .with_meanings(["scribbling"]),
            [],
        );

        let store = DictionaryStore::new(vec![Arc::new(jmdict)]);
        JapaneseProcessor::new(Arc::new(store), LookupConfig::default())
    }

    #[test]
    fn test_japanese_query_uses_deinflection() {
        let results = processor().search("走った");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].term, "走る");
        assert!(results[0].transformed);
    }

    #[test]
    fn test_prefix_fallback_when_nothing_deinflects() {
        let results = processor().search("走り書");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].term, "走り書き");
        assert!(!results[0].transformed);
    }

    #[test]
    fn test_english_query_uses_meaning_search() {
        let results = processor().search("  run ");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].term, "走る");
    }

    #[test]
    fn test_empty_query() {
        assert!(processor().search("   ").is_empty());
    }

    #[test]
    fn test_frequency_gated_by_config() {
        let freq = JapaneseFrequency::from_tsv("走る\tはしる\t800\n");
        let off = processor().with_frequency(freq);
        assert_eq!(off.lookup("走る")[0].frequency, None);

        let store = off.store().clone();
        let config = LookupConfig {
            frequency_data_enabled: true,
            ..LookupConfig::default()
        };
        let on = JapaneseProcessor::new(store, config)
            .with_frequency(JapaneseFrequency::from_tsv("走る\tはしる\t800\n"));
        assert_eq!(
            on.lookup("走る")[0].frequency.as_deref(),
            Some("#800 (Very Common)")
        );
    }
}
