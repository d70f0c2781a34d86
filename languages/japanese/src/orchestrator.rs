use std::collections::HashSet;
use std::sync::Arc;

use yomu_config::lookup::LookupConfig;
use yomu_core::{DictionaryEntry, DictionarySource, DictionaryStore, SourceId};

use crate::deconjugator::{Deinflection, JapaneseDeconjugator};
use crate::dictionary::meaning_rank;

/// Sequences dictionary and deinflection calls for one query.
///
/// Every operation is a pure read over the store as of the call; results are
/// raw, unmerged and unannotated.
pub struct LookupOrchestrator {
    store: Arc<DictionaryStore>,
    deconjugator: JapaneseDeconjugator,
    config: LookupConfig,
}

impl LookupOrchestrator {
    pub fn new(store: Arc<DictionaryStore>, config: LookupConfig) -> Self {
        let deconjugator = JapaneseDeconjugator::with_max_depth(config.max_deinflection_depth);
        Self {
            store,
            deconjugator,
            config,
        }
    }

    pub fn store(&self) -> &Arc<DictionaryStore> {
        &self.store
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Exact term lookup across enabled built-in sources, no deinflection
    pub fn lookup(&self, word: &str) -> Vec<DictionaryEntry> {
        let results: Vec<DictionaryEntry> = self
            .built_in_sources()
            .flat_map(|source| source.exact_lookup(word))
            .collect();

        tracing::debug!("lookup({}) -> {} entries", word, results.len());
        results
    }

    /// Exact lookup of every deinflection candidate, shallowest chains first.
    ///
    /// A whole depth level is always tried before checking the result cap, so
    /// equally likely candidates are never cut off by order alone.
    pub fn lookup_with_deinflection(&self, word: &str) -> Vec<DictionaryEntry> {
        let cap = self.config.result_cap;
        let candidates = self.deconjugator.deconjugate(word);

        let mut results = Vec::new();
        let mut seen: HashSet<(SourceId, String)> = HashSet::new();

        let mut level_start = 0;
        while level_start < candidates.len() && results.len() < cap {
            let depth = candidates[level_start].depth();
            let level_end = candidates[level_start..]
                .iter()
                .position(|c| c.depth() != depth)
                .map_or(candidates.len(), |offset| level_start + offset);

            for candidate in &candidates[level_start..level_end] {
                self.collect_candidate(word, candidate, &mut seen, &mut results);
            }

            level_start = level_end;
        }

        results.truncate(cap);
        tracing::debug!(
            "lookup_with_deinflection({}) -> {} entries from {} candidates",
            word,
            results.len(),
            candidates.len()
        );
        results
    }

    fn collect_candidate(
        &self,
        surface: &str,
        candidate: &Deinflection,
        seen: &mut HashSet<(SourceId, String)>,
        results: &mut Vec<DictionaryEntry>,
    ) {
        let suru_stem = candidate.suru_stem();

        for source in self.built_in_sources() {
            let hits = source
                .exact_lookup(&candidate.text)
                .into_iter()
                .filter(|entry| candidate.accepts(entry));
            let suru_hits = suru_stem
                .map(|stem| source.exact_lookup(stem))
                .unwrap_or_default()
                .into_iter()
                .filter(|entry| candidate.accepts_suru_noun(entry));

            for mut entry in hits.chain(suru_hits) {
                if !seen.insert((entry.source.clone(), entry.id.clone())) {
                    continue;
                }

                if !candidate.is_identity() {
                    entry.rules = candidate.rule_names();
                    entry.transformed = true;
                    entry.transformation_notes = Some(candidate.describe(surface));
                }
                results.push(entry);
            }
        }
    }

    /// Prefix lookup over enabled built-in sources, at most `limit` entries
    pub fn search_by_prefix(&self, prefix: &str, limit: usize) -> Vec<DictionaryEntry> {
        let results = collect_prefix(self.built_in_sources(), prefix, limit);
        tracing::debug!("search_by_prefix({}) -> {} entries", prefix, results.len());
        results
    }

    /// Prefix lookup over the imported sources present when the call starts
    pub fn search_imported_dictionaries_by_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Vec<DictionaryEntry> {
        let snapshot = self.store.imported();
        let results = collect_prefix(snapshot.iter(), prefix, limit);
        tracing::debug!(
            "search_imported_dictionaries_by_prefix({}) -> {} entries from {} sources",
            prefix,
            results.len(),
            snapshot.len()
        );
        results
    }

    /// Gloss search over enabled built-in sources. Imported sources are never asked.
    ///
    /// Every source is asked for `limit` hits and the pooled hits are ranked
    /// together; equal ranks keep source order.
    pub fn search_by_meaning(&self, text: &str, limit: usize) -> Vec<DictionaryEntry> {
        if limit == 0 {
            return Vec::new();
        }

        let query = text.trim().to_lowercase();
        let mut ranked: Vec<(u8, DictionaryEntry)> = self
            .built_in_sources()
            .flat_map(|source| source.meaning_search(text, limit))
            .map(|entry| (meaning_rank(&entry, &query).unwrap_or(u8::MAX), entry))
            .collect();

        ranked.sort_by_key(|(rank, _)| *rank);
        let results: Vec<DictionaryEntry> = ranked
            .into_iter()
            .take(limit)
            .map(|(_, entry)| entry)
            .collect();

        tracing::debug!("search_by_meaning({}) -> {} entries", text, results.len());
        results
    }

    pub fn deinflect(&self, surface: &str) -> Vec<Deinflection> {
        self.deconjugator.deconjugate(surface)
    }

    fn built_in_sources(&self) -> impl Iterator<Item = &Arc<dyn DictionarySource>> {
        self.store
            .built_in()
            .iter()
            .filter(|source| {
                source.source().is_built_in() && self.config.is_enabled(source.source())
            })
    }
}

fn collect_prefix<'a>(
    sources: impl Iterator<Item = &'a Arc<dyn DictionarySource>>,
    prefix: &str,
    limit: usize,
) -> Vec<DictionaryEntry> {
    let mut results = Vec::new();
    for source in sources {
        let remaining = limit.saturating_sub(results.len());
        if remaining == 0 {
            break;
        }
        results.extend(source.prefix_lookup(prefix, remaining));
    }

    results.truncate(limit);
    results
}
