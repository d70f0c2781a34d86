use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a dictionary entry came from.
///
/// `Combined` never names a loaded dictionary; it is only produced when
/// entries from two or more distinct sources are merged into one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// Ships with the engine, supports term and meaning search
    BuiltIn(String),
    /// Added by the user, only guaranteed to support term/prefix search
    Imported(String),
    Combined,
}

impl SourceId {
    pub fn built_in(id: impl Into<String>) -> Self {
        SourceId::BuiltIn(id.into())
    }

    pub fn imported(id: impl Into<String>) -> Self {
        SourceId::Imported(id.into())
    }

    pub fn is_built_in(&self) -> bool {
        matches!(self, SourceId::BuiltIn(_))
    }

    pub fn is_imported(&self) -> bool {
        matches!(self, SourceId::Imported(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            SourceId::BuiltIn(id) | SourceId::Imported(id) => id,
            SourceId::Combined => "combined",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pitch-accent record for a `(term, reading)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchAccent {
    pub term: String,
    pub reading: String,
    /// Drop position: 0 = heiban, 1 = atamadaka, 2+ = nakadaka/odaka
    pub pitch_accent: u8,
}

/// All patterns known for one lookup, in index order. Variants that
/// disagree are all kept.
pub type PitchAccentData = Vec<PitchAccent>;

/// One headword record as returned by a lookup.
///
/// Entries are plain values built per query; nothing in the engine holds
/// on to them after the call returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Unique within `source`. Merged entries get `merged_<term>-<reading>`.
    pub id: String,
    pub term: String,
    /// May equal `term` or be empty
    pub reading: String,
    /// Source order, not deduplicated
    pub meanings: Vec<String>,
    pub meaning_tags: Vec<String>,
    pub term_tags: Vec<String>,
    /// Higher is better
    pub score: f64,
    /// Deinflection rules applied to reach this entry, outermost first
    pub rules: Vec<String>,
    pub transformed: bool,
    pub transformation_notes: Option<String>,
    pub popularity: f64,
    pub source: SourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_accents: Option<PitchAccentData>,
    /// Formatted frequency rank, only present when frequency data is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

impl DictionaryEntry {
    pub fn new(
        id: impl Into<String>,
        term: impl Into<String>,
        reading: impl Into<String>,
        source: SourceId,
    ) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            reading: reading.into(),
            meanings: Vec::new(),
            meaning_tags: Vec::new(),
            term_tags: Vec::new(),
            score: 0.0,
            rules: Vec::new(),
            transformed: false,
            transformation_notes: None,
            popularity: 0.0,
            source,
            pitch_accents: None,
            frequency: None,
        }
    }

    pub fn with_meanings<I, S>(mut self, meanings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meanings = meanings.into_iter().map(Into::into).collect();
        self
    }

    /// Key used to group entries for merging: the literal `(term, reading)` pair.
    pub fn grouping_key(&self) -> (String, String) {
        (self.term.clone(), self.reading.clone())
    }

    /// Id given to an entry that several entries were merged into.
    pub fn merged_id(&self) -> String {
        format!("merged_{}-{}", self.term, self.reading)
    }

    /// Reading worth showing next to the term, if any.
    pub fn display_reading(&self) -> Option<&str> {
        if self.reading.is_empty() || self.reading == self.term {
            None
        } else {
            Some(&self.reading)
        }
    }

    /// All classification tags, meaning tags first.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.meaning_tags
            .iter()
            .chain(self.term_tags.iter())
            .map(String::as_str)
    }
}
