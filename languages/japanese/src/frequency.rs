use std::collections::HashMap;
use std::path::Path;

use yomu_core::{FrequencyProvider, LoadError};

/// Japanese word frequency provider
#[derive(Default)]
pub struct JapaneseFrequency {
    by_reading: HashMap<(String, String), u32>,
    by_term: HashMap<String, u32>,
}

impl JapaneseFrequency {
    /// Create empty frequency database
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rank; the best (lowest) rank wins on duplicates.
    ///
    /// Rows without a reading apply to every reading of the term.
    pub fn insert(&mut self, term: &str, reading: Option<&str>, rank: u32) {
        let best = match reading {
            Some(reading) => self
                .by_reading
                .entry((term.to_string(), reading.to_string()))
                .or_insert(rank),
            None => self.by_term.entry(term.to_string()).or_insert(rank),
        };
        *best = (*best).min(rank);
    }

    /// Load frequency data from TSV file (term\t[reading\t]rank format)
    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        tracing::info!("Loading frequency list from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))?;
        let frequency = Self::from_tsv(&content);
        tracing::info!(
            "Loaded {} frequency ranks",
            frequency.by_reading.len() + frequency.by_term.len()
        );
        Ok(frequency)
    }

    pub fn from_tsv(content: &str) -> Self {
        let mut frequency = Self::new();

        for line in content.lines() {
            let parts: Vec<&str> = line.split('\t').collect();
            let (term, reading, rank) = match parts.as_slice() {
                [term, rank] => (*term, None, *rank),
                [term, reading, rank, ..] => (*term, Some(*reading), *rank),
                _ => continue,
            };

            if term.is_empty() {
                continue;
            }
            if let Ok(rank) = rank.trim().parse::<u32>() {
                frequency.insert(term, reading.filter(|r| !r.is_empty()), rank);
            }
        }

        frequency
    }

    /// Get frequency rank for a word (lower = more common)
    pub fn get_rank(&self, term: &str, reading: &str) -> Option<u32> {
        self.by_reading
            .get(&(term.to_string(), reading.to_string()))
            .or_else(|| self.by_term.get(term))
            .copied()
    }

    /// Get frequency level (Common, Uncommon, Rare)
    pub fn get_level(&self, term: &str, reading: &str) -> FrequencyLevel {
        FrequencyLevel::from_rank(self.get_rank(term, reading))
    }
}

impl FrequencyProvider for JapaneseFrequency {
    fn frequency(&self, term: &str, reading: &str) -> Option<u32> {
        self.get_rank(term, reading)
    }

    fn formatted_rank(&self, term: &str, reading: &str) -> Option<String> {
        self.get_rank(term, reading).map(|rank| {
            format!("#{} ({})", rank, FrequencyLevel::from_rank(Some(rank)).as_str())
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyLevel {
    VeryCommon,
    Common,
    Uncommon,
    Rare,
    Unknown,
}

impl FrequencyLevel {
    pub fn from_rank(rank: Option<u32>) -> Self {
        match rank {
            Some(rank) if rank <= 1000 => FrequencyLevel::VeryCommon,
            Some(rank) if rank <= 5000 => FrequencyLevel::Common,
            Some(rank) if rank <= 10000 => FrequencyLevel::Uncommon,
            Some(_) => FrequencyLevel::Rare,
            None => FrequencyLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyLevel::VeryCommon => "Very Common",
            FrequencyLevel::Common => "Common",
            FrequencyLevel::Uncommon => "Uncommon",
            FrequencyLevel::Rare => "Rare",
            FrequencyLevel::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "食べる\tたべる\t100\n日本\tにほん\t67\n日本\tにっぽん\t4000\n上手\t7200\n\
                       下手\t\t12000\nbad\tline\tx\n\n";

    #[test]
    fn test_rank_by_reading_then_term() {
        let freq = JapaneseFrequency::from_tsv(TSV);
        assert_eq!(freq.get_rank("日本", "にっぽん"), Some(4000));
        assert_eq!(freq.get_rank("日本", "にほん"), Some(67));
        // Another reading's rank is not borrowed
        assert_eq!(freq.get_rank("日本", "ひのもと"), None);
        assert_eq!(freq.get_rank("上手", "じょうず"), Some(7200));
        assert_eq!(freq.get_rank("bad", "line"), None);
    }

    #[test]
    fn test_homograph_keeps_own_rank() {
        let freq = JapaneseFrequency::from_tsv("橋\tはし\t2500\n箸\t9000\n");
        assert_eq!(freq.get_rank("橋", "はし"), Some(2500));
        assert_eq!(freq.get_rank("橋", "きょう"), None);
        // Readingless rows cover every reading
        assert_eq!(freq.get_rank("箸", "はし"), Some(9000));
    }

    #[test]
    fn test_levels_and_format() {
        let freq = JapaneseFrequency::from_tsv(TSV);
        assert_eq!(freq.get_level("食べる", "たべる"), FrequencyLevel::VeryCommon);
        assert_eq!(freq.get_level("上手", ""), FrequencyLevel::Uncommon);
        assert_eq!(freq.get_level("下手", ""), FrequencyLevel::Rare);
        assert_eq!(freq.get_level("猫", "ねこ"), FrequencyLevel::Unknown);

        assert_eq!(
            freq.formatted_rank("食べる", "たべる").as_deref(),
            Some("#100 (Very Common)")
        );
        assert_eq!(freq.formatted_rank("猫", "ねこ"), None);
    }
}
