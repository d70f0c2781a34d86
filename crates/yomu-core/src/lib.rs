pub mod dictionary;
pub mod error;
pub mod language;
pub mod preprocess;
pub mod types;

pub use dictionary::{DictionaryMetadata, DictionarySource, DictionaryStore, SourceList};
pub use error::LoadError;
pub use language::{FrequencyProvider, LanguageProcessor};
pub use types::{DictionaryEntry, PitchAccent, PitchAccentData, SourceId};
