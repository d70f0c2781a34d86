use yomu_core::DictionaryEntry;

/// One page of a finished query
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub generation: u64,
    pub query: String,
    /// Zero-based
    pub page: usize,
    pub entries: Vec<DictionaryEntry>,
    /// Entries in the whole result set
    pub total: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// First page of a query that is still the latest one
    Results(SearchPage),
    NoResults { generation: u64, query: String },
}

impl SearchEvent {
    pub fn generation(&self) -> u64 {
        match self {
            SearchEvent::Results(page) => page.generation,
            SearchEvent::NoResults { generation, .. } => *generation,
        }
    }

    pub fn query(&self) -> &str {
        match self {
            SearchEvent::Results(page) => &page.query,
            SearchEvent::NoResults { query, .. } => query,
        }
    }
}

/// Full result set of the latest delivered query, paged on demand
pub(crate) struct ResultSet {
    pub generation: u64,
    pub query: String,
    pub entries: Vec<DictionaryEntry>,
    pub next_page: usize,
}

impl ResultSet {
    pub fn new(generation: u64, query: String, entries: Vec<DictionaryEntry>) -> Self {
        Self {
            generation,
            query,
            entries,
            next_page: 0,
        }
    }

    /// Hand out the next page, or None once every entry has been paged
    pub fn take_page(&mut self, page_size: usize) -> Option<SearchPage> {
        let page_size = page_size.max(1);
        let start = self.next_page * page_size;
        if start >= self.entries.len() {
            return None;
        }

        let end = (start + page_size).min(self.entries.len());
        let page = SearchPage {
            generation: self.generation,
            query: self.query.clone(),
            page: self.next_page,
            entries: self.entries[start..end].to_vec(),
            total: self.entries.len(),
            has_more: end < self.entries.len(),
        };

        self.next_page += 1;
        Some(page)
    }
}
