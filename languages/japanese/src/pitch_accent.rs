use std::collections::HashMap;
use std::path::Path;

use yomu_core::{LoadError, PitchAccent, PitchAccentData};

/// Pitch accent patterns keyed by exact `(term, reading)`.
#[derive(Default)]
pub struct JapanesePitchAccent {
    accents: HashMap<(String, String), Vec<u8>>,
}

impl JapanesePitchAccent {
    /// Create empty pitch accent database
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pattern. Repeated patterns for the same pair are all kept.
    pub fn insert(&mut self, term: &str, reading: &str, drop_position: u8) {
        self.accents
            .entry((term.to_string(), reading.to_string()))
            .or_default()
            .push(drop_position);
    }

    /// Load pitch accent data from TSV file (term\treading\tdrop[,drop...] format)
    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        tracing::info!("Loading pitch accents from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))?;
        let index = Self::from_tsv(&content);
        tracing::info!("Loaded pitch accents for {} readings", index.len());
        Ok(index)
    }

    /// Parse TSV content; lines that don't parse are skipped.
    pub fn from_tsv(content: &str) -> Self {
        let mut index = Self::new();

        for line in content.lines() {
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() < 3 || parts[0].is_empty() {
                continue;
            }

            let Ok(patterns) = parts[2]
                .split(',')
                .map(|p| p.trim().parse::<u8>())
                .collect::<Result<Vec<u8>, _>>()
            else {
                continue;
            };

            for drop in patterns {
                index.insert(parts[0], parts[1], drop);
            }
        }

        index
    }

    pub fn len(&self) -> usize {
        self.accents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accents.is_empty()
    }

    /// Every pattern for exactly this pair, or None. No fuzzy matching.
    pub fn lookup(&self, term: &str, reading: &str) -> Option<PitchAccentData> {
        self.accents
            .get(&(term.to_string(), reading.to_string()))
            .map(|drops| {
                drops
                    .iter()
                    .map(|&pitch_accent| PitchAccent {
                        term: term.to_string(),
                        reading: reading.to_string(),
                        pitch_accent,
                    })
                    .collect()
            })
    }
}

/// Display classification of a drop position against a reading.
#[derive(Debug, Clone)]
pub struct PitchPattern {
    /// Drop position (0 = heiban, 1 = atamadaka, 2+ = nakadaka/odaka)
    pub drop_position: u8,
    /// Pattern type
    pub pattern_type: PatternType,
}

impl PitchPattern {
    pub fn classify(accent: &PitchAccent) -> Self {
        let morae = mora_count(&accent.reading);
        let pattern_type = match accent.pitch_accent {
            0 => PatternType::Heiban,
            1 => PatternType::Atamadaka,
            drop if usize::from(drop) == morae => PatternType::Odaka,
            _ => PatternType::Nakadaka,
        };

        Self {
            drop_position: accent.pitch_accent,
            pattern_type,
        }
    }

    /// e.g. `[2] Nakadaka (Mid-high)`
    pub fn to_notation(&self) -> String {
        format!("[{}] {}", self.drop_position, self.pattern_type.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternType {
    Heiban,    // 平板型 - flat (no drop)
    Atamadaka, // 頭高型 - head-high (drop after 1st mora)
    Nakadaka,  // 中高型 - mid-high (drop in middle)
    Odaka,     // 尾高型 - tail-high (drop at end)
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Heiban => "Heiban (Flat)",
            PatternType::Atamadaka => "Atamadaka (Head-high)",
            PatternType::Nakadaka => "Nakadaka (Mid-high)",
            PatternType::Odaka => "Odaka (Tail-high)",
        }
    }
}

/// Morae in a kana reading; small ゃゅょ-type kana merge with the previous one.
pub fn mora_count(reading: &str) -> usize {
    reading
        .chars()
        .filter(|c| !"ゃゅょぁぃぅぇぉゎャュョァィゥェォヮ".contains(*c))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "箸\tはし\t1\n橋\tはし\t2\n端\tはし\t0\n日本\tにほん\t2\n日本\tにっぽん\t3\n\
                       先生\tせんせい\t3\n今日\tきょう\t1,0\nbroken line\n悪い\tわるい\tx\n";

    #[test]
    fn test_exact_pair_lookup() {
        let index = JapanesePitchAccent::from_tsv(TSV);

        let hashi = index.lookup("橋", "はし").unwrap();
        assert_eq!(hashi.len(), 1);
        assert_eq!(hashi[0].pitch_accent, 2);

        assert_eq!(index.lookup("日本", "にっぽん").unwrap()[0].pitch_accent, 3);
        assert!(index.lookup("日本", "にってん").is_none());
        assert!(index.lookup("悪い", "わるい").is_none());
    }

    #[test]
    fn test_variants_are_kept() {
        let index = JapanesePitchAccent::from_tsv(TSV);
        let kyou: Vec<u8> = index
            .lookup("今日", "きょう")
            .unwrap()
            .iter()
            .map(|a| a.pitch_accent)
            .collect();
        assert_eq!(kyou, vec![1, 0]);
    }

    #[test]
    fn test_classify() {
        let accent = |reading: &str, drop| PitchAccent {
            term: String::new(),
            reading: reading.to_string(),
            pitch_accent: drop,
        };

        assert_eq!(PitchPattern::classify(&accent("はし", 0)).pattern_type, PatternType::Heiban);
        assert_eq!(PitchPattern::classify(&accent("はし", 1)).pattern_type, PatternType::Atamadaka);
        assert_eq!(PitchPattern::classify(&accent("はし", 2)).pattern_type, PatternType::Odaka);
        assert_eq!(
            PitchPattern::classify(&accent("せんせい", 3)).pattern_type,
            PatternType::Nakadaka
        );
        assert_eq!(mora_count("きょう"), 2);
        assert_eq!(
            PitchPattern::classify(&accent("はし", 2)).to_notation(),
            "[2] Odaka (Tail-high)"
        );
    }
}
