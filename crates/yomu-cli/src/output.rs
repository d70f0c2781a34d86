use std::io::Write;

use clap::ValueEnum;
use serde_json::json;
use yomu_config::lookup::LookupConfig;
use yomu_core::DictionaryEntry;
use yomu_lang_japanese::{Deinflection, PitchPattern};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct Printer<'a> {
    format: OutputFormat,
    lookup: &'a LookupConfig,
}

impl<'a> Printer<'a> {
    pub fn new(format: OutputFormat, lookup: &'a LookupConfig) -> Self {
        Self { format, lookup }
    }

    pub fn entries(&self, out: &mut impl Write, entries: &[DictionaryEntry]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, entries)?;
                writeln!(out)?;
            }
            OutputFormat::Text => {
                if entries.is_empty() {
                    writeln!(out, "No results")?;
                    return Ok(());
                }

                // Sections follow the configured source order; stable within a source
                let mut ordered: Vec<&DictionaryEntry> = entries.iter().collect();
                ordered.sort_by_key(|entry| self.lookup.display_rank(&entry.source));

                for entry in ordered {
                    write_entry(out, entry)?;
                }
            }
        }

        Ok(())
    }

    pub fn deinflections(
        &self,
        out: &mut impl Write,
        surface: &str,
        candidates: &[Deinflection],
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<_> = candidates
                    .iter()
                    .map(|c| {
                        json!({
                            "text": c.text,
                            "rules": c.rule_names(),
                            "score": c.score,
                        })
                    })
                    .collect();
                serde_json::to_writer_pretty(&mut *out, &rows)?;
                writeln!(out)?;
            }
            OutputFormat::Text => {
                for candidate in candidates {
                    if candidate.is_identity() {
                        writeln!(out, "{:.3}  {}", candidate.score, candidate.text)?;
                    } else {
                        writeln!(out, "{:.3}  {}", candidate.score, candidate.describe(surface))?;
                    }
                }
            }
        }

        Ok(())
    }
}

fn write_entry(out: &mut impl Write, entry: &DictionaryEntry) -> anyhow::Result<()> {
    let mut headline = entry.term.clone();
    if let Some(reading) = entry.display_reading() {
        headline.push_str(&format!(" 【{reading}】"));
    }
    headline.push_str(&format!(" [{}]", entry.source));
    if let Some(frequency) = &entry.frequency {
        headline.push_str(&format!("  {frequency}"));
    }
    writeln!(out, "{headline}")?;

    if let Some(notes) = &entry.transformation_notes {
        writeln!(out, "  {notes}")?;
    }

    let tags: Vec<&str> = entry.tags().collect();
    if !tags.is_empty() {
        writeln!(out, "  ({})", tags.join(", "))?;
    }

    for (i, meaning) in entry.meanings.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, meaning)?;
    }

    if let Some(accents) = &entry.pitch_accents {
        let patterns: Vec<String> = accents
            .iter()
            .map(|accent| PitchPattern::classify(accent).to_notation())
            .collect();
        writeln!(out, "  pitch: {}", patterns.join(" / "))?;
    }

    writeln!(out)?;
    Ok(())
}
