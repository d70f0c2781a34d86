use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;

use yomu_core::{DictionaryEntry, DictionaryMetadata, DictionarySource, SourceId};

/// In-memory dictionary indexed by every headword and reading.
///
/// The index is ordered, so prefix lookups walk a contiguous key range and
/// come back in key order.
pub struct IndexedDictionary {
    source: SourceId,
    name: String,
    entries: Vec<DictionaryEntry>,
    index: BTreeMap<String, Vec<usize>>,
    meaning_search: bool,
}

impl IndexedDictionary {
    pub fn new(source: SourceId, name: impl Into<String>) -> Self {
        let meaning_search = source.is_built_in();
        Self {
            source,
            name: name.into(),
            entries: Vec::new(),
            index: BTreeMap::new(),
            meaning_search,
        }
    }

    /// Override whether glosses can be searched. On by default for built-in sources.
    pub fn with_meaning_search(mut self, enabled: bool) -> Self {
        self.meaning_search = enabled;
        self
    }

    /// Add an entry reachable by its term, its reading and any extra `keys`.
    pub fn insert(&mut self, mut entry: DictionaryEntry, keys: impl IntoIterator<Item = String>) {
        entry.source = self.source.clone();

        let idx = self.entries.len();
        let mut own_keys: Vec<String> = Vec::new();
        let candidates = [entry.term.clone(), entry.reading.clone()]
            .into_iter()
            .chain(keys);
        for key in candidates {
            if !key.is_empty() && !own_keys.contains(&key) {
                own_keys.push(key);
            }
        }

        for key in own_keys {
            self.index.entry(key).or_default().push(idx);
        }
        self.entries.push(entry);
    }

    /// Get the number of entries in the dictionary
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn collect(&self, indices: impl IntoIterator<Item = usize>) -> Vec<DictionaryEntry> {
        indices
            .into_iter()
            .filter_map(|idx| self.entries.get(idx))
            .cloned()
            .collect()
    }
}

impl DictionarySource for IndexedDictionary {
    fn source(&self) -> &SourceId {
        &self.source
    }

    fn exact_lookup(&self, term: &str) -> Vec<DictionaryEntry> {
        match self.index.get(term) {
            Some(indices) => self.collect(indices.iter().copied()),
            None => Vec::new(),
        }
    }

    fn prefix_lookup(&self, prefix: &str, limit: usize) -> Vec<DictionaryEntry> {
        if prefix.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut indices = Vec::new();

        let range = self
            .index
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix));

        'keys: for (_, postings) in range {
            for &idx in postings {
                if seen.insert(idx) {
                    indices.push(idx);
                    if indices.len() == limit {
                        break 'keys;
                    }
                }
            }
        }

        self.collect(indices)
    }

    fn meaning_search(&self, text: &str, limit: usize) -> Vec<DictionaryEntry> {
        if !self.meaning_search || limit == 0 {
            return Vec::new();
        }

        let query = text.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<(u8, usize)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| meaning_rank(entry, &query).map(|rank| (rank, idx)))
            .collect();

        // Stable, so equal ranks keep dictionary order
        ranked.sort_by_key(|&(rank, _)| rank);
        ranked.truncate(limit);

        self.collect(ranked.into_iter().map(|(_, idx)| idx))
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: self.name.clone(),
            version: "1.0".to_string(),
            language: "ja".to_string(),
            entry_count: self.entries.len(),
        }
    }
}

/// Best gloss rank of `entry` for an already lowercased query.
pub(crate) fn meaning_rank(entry: &DictionaryEntry, query: &str) -> Option<u8> {
    entry
        .meanings
        .iter()
        .filter_map(|gloss| gloss_rank(&gloss.to_lowercase(), query))
        .min()
}

/// 0: the gloss is the query ("run", "to run"); 1: it starts with the query
/// as a word; 2: the query appears as a whole word somewhere.
fn gloss_rank(gloss: &str, query: &str) -> Option<u8> {
    let bare = gloss.strip_prefix("to ").unwrap_or(gloss);
    if gloss == query || bare == query {
        return Some(0);
    }

    if starts_with_word(gloss, query) || starts_with_word(bare, query) {
        return Some(1);
    }

    gloss
        .match_indices(query)
        .any(|(pos, _)| is_word_boundary(gloss, pos, query.len()))
        .then_some(2)
}

fn starts_with_word(gloss: &str, query: &str) -> bool {
    gloss.starts_with(query) && is_word_boundary(gloss, 0, query.len())
}

fn is_word_boundary(text: &str, start: usize, len: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[start + len..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}
