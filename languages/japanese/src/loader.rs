use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use yomu_core::{DictionaryEntry, LoadError, SourceId};

use crate::dictionary::IndexedDictionary;

// JSON structures for parsing jmdict-simplified format
#[derive(Debug, Deserialize)]
struct JMdictJson {
    words: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct JMdictJsonEntry {
    id: String,
    #[serde(default)]
    kanji: Vec<TextElement>,
    #[serde(default)]
    kana: Vec<TextElement>,
    sense: Vec<Sense>,
}

#[derive(Debug, Deserialize)]
struct TextElement {
    text: String,
    #[serde(default)]
    common: bool,
}

#[derive(Debug, Deserialize)]
struct Sense {
    #[serde(rename = "partOfSpeech", default)]
    part_of_speech: Vec<String>,
    #[serde(default)]
    misc: Vec<String>,
    gloss: Vec<Gloss>,
}

#[derive(Debug, Deserialize)]
struct Gloss {
    lang: String,
    text: String,
}

/// Popularity given to entries JMdict marks as common
const COMMON_POPULARITY: f64 = 1.0;

pub struct JMdictLoader;

impl JMdictLoader {
    /// Load dictionary from file path
    pub fn load_from_file(path: &Path, source: SourceId) -> Result<IndexedDictionary, LoadError> {
        tracing::info!("Loading JMdict from file: {}", path.display());
        let json = fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))?;
        let dict = Self::from_json(&json, source)?;
        tracing::info!("Loaded {} dictionary entries from file", dict.entry_count());
        Ok(dict)
    }

    /// Parse jmdict-simplified JSON. Words that do not parse, or have no
    /// English gloss, are skipped.
    pub fn from_json(json: &str, source: SourceId) -> Result<IndexedDictionary, LoadError> {
        let data: JMdictJson = serde_json::from_str(json)?;
        let mut dict = IndexedDictionary::new(source.clone(), source.to_string());
        let mut skipped = 0usize;

        for word in data.words {
            let parsed = match serde_json::from_value::<JMdictJsonEntry>(word) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::debug!("Skipping malformed JMdict word: {}", e);
                    skipped += 1;
                    continue;
                }
            };

            match Self::convert(parsed, &source) {
                Some((entry, keys)) => dict.insert(entry, keys),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!("{}: skipped {} unusable words", source, skipped);
        }

        Ok(dict)
    }

    fn convert(
        json_entry: JMdictJsonEntry,
        source: &SourceId,
    ) -> Option<(DictionaryEntry, Vec<String>)> {
        let mut meanings = Vec::new();
        let mut pos = Vec::new();
        let mut misc = Vec::new();

        for sense in json_entry.sense {
            // Only use English glosses
            meanings.extend(
                sense
                    .gloss
                    .into_iter()
                    .filter(|gloss| gloss.lang == "eng")
                    .map(|gloss| gloss.text),
            );
            push_unique(&mut pos, sense.part_of_speech);
            push_unique(&mut misc, sense.misc);
        }

        if meanings.is_empty() {
            return None;
        }

        let common = json_entry
            .kanji
            .iter()
            .chain(json_entry.kana.iter())
            .any(|e| e.common);

        let reading = json_entry.kana.first().map(|k| k.text.clone());
        let term = json_entry
            .kanji
            .first()
            .map(|k| k.text.clone())
            .or_else(|| reading.clone())?;

        let keys: Vec<String> = json_entry
            .kanji
            .into_iter()
            .chain(json_entry.kana)
            .map(|e| e.text)
            .collect();

        let mut entry = DictionaryEntry::new(
            json_entry.id,
            term,
            reading.unwrap_or_default(),
            source.clone(),
        )
        .with_meanings(meanings);
        entry.meaning_tags = pos;
        entry.term_tags = misc;
        if common {
            entry.popularity = COMMON_POPULARITY;
        }

        Some((entry, keys))
    }
}

/// Loader for user-imported term banks: a JSON array of rows
/// `[term, reading, definitionTags, rules, score, glossary, sequence, termTags]`.
pub struct TermBankLoader;

impl TermBankLoader {
    /// Load a single bank file, or every `term_bank_*.json` in a directory.
    pub fn load(path: &Path, source: SourceId) -> Result<IndexedDictionary, LoadError> {
        tracing::info!("Loading term bank from: {}", path.display());

        let banks = if path.is_dir() {
            Self::bank_files(path)?
        } else {
            vec![path.to_path_buf()]
        };

        let mut dict = IndexedDictionary::new(source.clone(), source.to_string());
        for (bank, file) in banks.iter().enumerate() {
            let json = fs::read_to_string(file).map_err(|e| LoadError::from_io(file, e))?;
            Self::extend_from_json(&mut dict, bank, &json)?;
        }

        tracing::info!("Loaded {} entries into {}", dict.entry_count(), source);
        Ok(dict)
    }

    pub fn from_json(json: &str, source: SourceId) -> Result<IndexedDictionary, LoadError> {
        let mut dict = IndexedDictionary::new(source.clone(), source.to_string());
        Self::extend_from_json(&mut dict, 0, json)?;
        Ok(dict)
    }

    /// Add every usable row. Only a document that is not an array fails.
    fn extend_from_json(
        dict: &mut IndexedDictionary,
        bank: usize,
        json: &str,
    ) -> Result<usize, LoadError> {
        let rows = match serde_json::from_str::<Value>(json)? {
            Value::Array(rows) => rows,
            _ => {
                return Err(LoadError::InvalidFormat(
                    "term bank must be a JSON array".to_string(),
                ));
            }
        };

        let mut added = 0usize;
        let total = rows.len();
        for (row_idx, row) in rows.iter().enumerate() {
            match parse_term_row(row, format!("{bank}:{row_idx}")) {
                Some(entry) => {
                    dict.insert(entry, []);
                    added += 1;
                }
                None => tracing::debug!("Skipping malformed term bank row {}", row_idx),
            }
        }

        if added < total {
            tracing::warn!(
                "Term bank {}: skipped {} of {} rows",
                bank,
                total - added,
                total
            );
        }

        Ok(added)
    }

    fn bank_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| LoadError::from_io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("term_bank_") && name.ends_with(".json"))
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(LoadError::FileNotFound(format!(
                "{}/term_bank_*.json",
                dir.display()
            )));
        }
        Ok(files)
    }
}

fn parse_term_row(row: &Value, id: String) -> Option<DictionaryEntry> {
    let row = row.as_array()?;

    let term = row.first()?.as_str().filter(|t| !t.is_empty())?;
    let reading = row.get(1)?.as_str()?;
    let score = row.get(4).and_then(Value::as_f64).unwrap_or(0.0);

    let meanings: Vec<String> = row
        .get(5)?
        .as_array()?
        .iter()
        .filter_map(|gloss| match gloss {
            Value::String(text) => Some(text.clone()),
            Value::Object(obj) => obj.get("text").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .collect();
    if meanings.is_empty() {
        return None;
    }

    let mut entry = DictionaryEntry::new(id, term, reading, SourceId::Combined)
        .with_meanings(meanings);
    entry.score = score;
    entry.meaning_tags = split_tags(row.get(2));

    // Deinflection rules (v1, v5, adj-i, ...) and term tags
    let mut term_tags = split_tags(row.get(3));
    push_unique(&mut term_tags, split_tags(row.get(7)));
    entry.term_tags = term_tags;

    Some(entry)
}

fn split_tags(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_str)
        .map(|tags| tags.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn push_unique(target: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}
