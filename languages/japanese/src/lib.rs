pub mod annotate;
pub mod deconjugator;
pub mod dictionary;
pub mod frequency;
pub mod loader;
pub mod merger;
pub mod orchestrator;
pub mod pitch_accent;
pub mod processor;

pub use annotate::Annotator;
pub use deconjugator::{Deinflection, JapaneseDeconjugator, RuleTag};
pub use dictionary::IndexedDictionary;
pub use frequency::{FrequencyLevel, JapaneseFrequency};
pub use loader::{JMdictLoader, TermBankLoader};
pub use merger::merge_entries;
pub use orchestrator::LookupOrchestrator;
pub use pitch_accent::{JapanesePitchAccent, PatternType, PitchPattern};
pub use processor::JapaneseProcessor;
