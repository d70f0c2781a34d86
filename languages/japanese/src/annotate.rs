use yomu_core::{DictionaryEntry, FrequencyProvider};

use crate::pitch_accent::JapanesePitchAccent;

/// Read-only side lookups joined onto entries after merging.
pub struct Annotator<'a> {
    pitch_accent: Option<&'a JapanesePitchAccent>,
    frequency: Option<&'a dyn FrequencyProvider>,
}

impl<'a> Annotator<'a> {
    pub fn new(
        pitch_accent: Option<&'a JapanesePitchAccent>,
        frequency: Option<&'a dyn FrequencyProvider>,
    ) -> Self {
        Self {
            pitch_accent,
            frequency,
        }
    }

    /// Attach pitch accents by exact `(term, reading)` and the formatted
    /// frequency rank. Missing data leaves the field `None`.
    pub fn annotate(&self, entries: &mut [DictionaryEntry]) {
        for entry in entries.iter_mut() {
            entry.pitch_accents = self
                .pitch_accent
                .and_then(|index| index.lookup(&entry.term, &entry.reading));

            entry.frequency = self
                .frequency
                .and_then(|provider| provider.formatted_rank(&entry.term, &entry.reading));
        }
    }
}
