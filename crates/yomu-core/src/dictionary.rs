use std::sync::{Arc, PoisonError, RwLock};

use crate::error::LoadError;
use crate::types::{DictionaryEntry, SourceId};

/// Query contract of a single loaded dictionary.
///
/// Implementations are read-only after construction and must return
/// entries in a stable order for the same query.
pub trait DictionarySource: Send + Sync {
    /// Identity stamped on every entry this source returns
    fn source(&self) -> &SourceId;

    /// Entries whose headword or reading equals `term`
    fn exact_lookup(&self, term: &str) -> Vec<DictionaryEntry>;

    /// Entries whose headword or reading starts with `prefix`, at most `limit`
    fn prefix_lookup(&self, prefix: &str, limit: usize) -> Vec<DictionaryEntry>;

    /// Entries whose glosses mention `text`, at most `limit`.
    ///
    /// Sources that cannot search by meaning return nothing.
    fn meaning_search(&self, _text: &str, _limit: usize) -> Vec<DictionaryEntry> {
        Vec::new()
    }

    /// Get dictionary metadata
    fn metadata(&self) -> DictionaryMetadata;
}

#[derive(Debug, Clone)]
pub struct DictionaryMetadata {
    pub name: String,
    pub version: String,
    pub language: String,
    pub entry_count: usize,
}

pub type SourceList = Arc<Vec<Arc<dyn DictionarySource>>>;

/// Every dictionary the engine can query.
///
/// Built-in sources are fixed at construction. Imported sources only grow:
/// each append publishes a fresh list, so a reader holding a snapshot keeps
/// a consistent view for the rest of its call.
pub struct DictionaryStore {
    built_in: Vec<Arc<dyn DictionarySource>>,
    imported: RwLock<SourceList>,
}

impl DictionaryStore {
    pub fn new(built_in: Vec<Arc<dyn DictionarySource>>) -> Self {
        Self {
            built_in,
            imported: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn built_in(&self) -> &[Arc<dyn DictionarySource>] {
        &self.built_in
    }

    /// Current imported sources, in the order they were added
    pub fn imported(&self) -> SourceList {
        self.imported
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Append an imported source. Existing sources keep their position.
    pub fn add_imported(&self, source: Arc<dyn DictionarySource>) -> Result<(), LoadError> {
        let id = source.source().clone();
        if !id.is_imported() {
            return Err(LoadError::InvalidFormat(format!(
                "{id} is not an imported source"
            )));
        }

        let mut guard = self
            .imported
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if guard.iter().any(|s| s.source() == &id) {
            return Err(LoadError::DuplicateSource(id.to_string()));
        }

        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(source);
        *guard = Arc::new(next);

        tracing::info!("Imported dictionary added: {}", id);
        Ok(())
    }

    /// Ids of every loaded source, built-in first
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.built_in
            .iter()
            .map(|s| s.source().clone())
            .chain(self.imported().iter().map(|s| s.source().clone()))
            .collect()
    }
}

impl Default for DictionaryStore {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource {
        id: SourceId,
    }

    impl DictionarySource for FixedSource {
        fn source(&self) -> &SourceId {
            &self.id
        }

        fn exact_lookup(&self, term: &str) -> Vec<DictionaryEntry> {
            vec![DictionaryEntry::new("1", term, "", self.id.clone())]
        }

        fn prefix_lookup(&self, prefix: &str, _limit: usize) -> Vec<DictionaryEntry> {
            self.exact_lookup(prefix)
        }

        fn metadata(&self) -> DictionaryMetadata {
            DictionaryMetadata {
                name: self.id.to_string(),
                version: "1".to_string(),
                language: "ja".to_string(),
                entry_count: 1,
            }
        }
    }

    fn imported(id: &str) -> Arc<dyn DictionarySource> {
        Arc::new(FixedSource {
            id: SourceId::imported(id),
        })
    }

    #[test]
    fn test_snapshot_is_stable_across_append() {
        let store = DictionaryStore::empty();
        store.add_imported(imported("a")).unwrap();

        let snapshot = store.imported();
        store.add_imported(imported("b")).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.imported().len(), 2);
        assert_eq!(
            store.source_ids(),
            vec![SourceId::imported("a"), SourceId::imported("b")]
        );
    }

    #[test]
    fn test_rejects_duplicate_and_built_in() {
        let store = DictionaryStore::empty();
        store.add_imported(imported("a")).unwrap();

        assert!(matches!(
            store.add_imported(imported("a")),
            Err(LoadError::DuplicateSource(_))
        ));

        let built_in: Arc<dyn DictionarySource> = Arc::new(FixedSource {
            id: SourceId::built_in("jmdict"),
        });
        assert!(store.add_imported(built_in).is_err());
        assert_eq!(store.imported().len(), 1);
    }

    #[test]
    fn test_default_meaning_search_is_empty() {
        let source = FixedSource {
            id: SourceId::imported("a"),
        };
        assert!(source.meaning_search("run", 10).is_empty());
    }
}
