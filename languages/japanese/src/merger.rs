use indexmap::{IndexMap, IndexSet};
use yomu_core::{DictionaryEntry, SourceId};

/// Collapse entries sharing `(term, reading)` into one, in first-seen order.
///
/// A lone entry passes through untouched. A group becomes one entry with the
/// first member's fields, every member's meanings appended in order, and
/// source `Combined` when more than one source contributed.
pub fn merge_entries(entries: Vec<DictionaryEntry>) -> Vec<DictionaryEntry> {
    let mut groups: IndexMap<(String, String), Vec<DictionaryEntry>> = IndexMap::new();
    for entry in entries {
        groups.entry(entry.grouping_key()).or_default().push(entry);
    }

    groups.into_values().filter_map(merge_group).collect()
}

fn merge_group(group: Vec<DictionaryEntry>) -> Option<DictionaryEntry> {
    let mut members = group.into_iter();
    let first = members.next()?;
    let rest: Vec<DictionaryEntry> = members.collect();
    if rest.is_empty() {
        return Some(first);
    }

    let mut sources: IndexSet<SourceId> = IndexSet::new();
    sources.insert(first.source.clone());

    let mut merged = DictionaryEntry {
        id: first.merged_id(),
        ..first
    };

    for member in rest {
        sources.insert(member.source);
        merged.meanings.extend(member.meanings);
        for tag in member.meaning_tags {
            if !merged.meaning_tags.contains(&tag) {
                merged.meaning_tags.push(tag);
            }
        }
    }

    if sources.len() >= 2 {
        merged.source = SourceId::Combined;
    }

    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        id: &str,
        term: &str,
        reading: &str,
        source: &str,
        meanings: &[&str],
    ) -> DictionaryEntry {
        DictionaryEntry::new(id, term, reading, SourceId::built_in(source))
            .with_meanings(meanings.iter().copied())
    }

    #[test]
    fn test_cross_source_group_is_combined() {
        let mut jmdict = entry("1", "走る", "はしる", "jmdict", &["to run"]);
        jmdict.score = 5.0;
        jmdict.rules = vec!["past".to_string()];
        jmdict.transformed = true;
        let obunsha = entry("9", "走る", "はしる", "obunsha", &["to run", "to dash"]);

        let merged = merge_entries(vec![jmdict, obunsha]);
        assert_eq!(merged.len(), 1);

        let m = &merged[0];
        assert_eq!(m.id, "merged_走る-はしる");
        assert_eq!(m.source, SourceId::Combined);
        // Duplicate glosses from different sources are kept
        assert_eq!(m.meanings, vec!["to run", "to run", "to dash"]);
        assert_eq!(m.score, 5.0);
        assert_eq!(m.rules, vec!["past"]);
        assert!(m.transformed);
    }

    #[test]
    fn test_same_source_group_keeps_source() {
        let merged = merge_entries(vec![
            entry("1", "生", "なま", "jmdict", &["raw"]),
            entry("2", "生", "なま", "jmdict", &["draft beer"]),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, SourceId::built_in("jmdict"));
        assert_eq!(merged[0].meanings.len(), 2);
    }

    #[test]
    fn test_different_readings_never_merge() {
        let merged = merge_entries(vec![
            entry("1", "日本", "にほん", "jmdict", &["Japan"]),
            entry("2", "日本", "にっぽん", "obunsha", &["Japan"]),
        ]);
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|e| e.source != SourceId::Combined));
    }

    #[test]
    fn test_hyphenated_terms_do_not_collide() {
        let merged = merge_entries(vec![
            entry("1", "a-b", "c", "jmdict", &["first"]),
            entry("2", "a", "b-c", "obunsha", &["second"]),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].reading, "c");
        assert_eq!(merged[1].reading, "b-c");
        assert!(merged.iter().all(|e| e.source != SourceId::Combined));
    }

    #[test]
    fn test_first_seen_order_and_partition() {
        let input = vec![
            entry("1", "b", "b", "jmdict", &["b1"]),
            entry("2", "a", "a", "jmdict", &["a1"]),
            entry("3", "b", "b", "obunsha", &["b2", "b3"]),
            entry("4", "c", "", "obunsha", &[]),
            entry("5", "a", "a", "obunsha", &["a2"]),
        ];
        let total_meanings: usize = input.iter().map(|e| e.meanings.len()).sum();

        let merged = merge_entries(input.clone());
        let terms: Vec<&str> = merged.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, vec!["b", "a", "c"]);
        assert!(merged.len() <= input.len());
        assert_eq!(
            merged.iter().map(|e| e.meanings.len()).sum::<usize>(),
            total_meanings
        );
        assert_eq!(merged[2], input[3]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge_entries(vec![
            entry("1", "走る", "はしる", "jmdict", &["to run"]),
            entry("2", "走る", "はしる", "obunsha", &["to run"]),
            entry("3", "歩く", "あるく", "jmdict", &["to walk"]),
        ]);
        let twice = merge_entries(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_meaning_tags_union() {
        let mut a = entry("1", "走る", "はしる", "jmdict", &["to run"]);
        a.meaning_tags = vec!["v5r".to_string(), "vi".to_string()];
        let mut b = entry("2", "走る", "はしる", "obunsha", &["to run"]);
        b.meaning_tags = vec!["vi".to_string(), "uk".to_string()];

        let merged = merge_entries(vec![a, b]);
        assert_eq!(merged[0].meaning_tags, vec!["v5r", "vi", "uk"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_entries(Vec::new()).is_empty());
    }
}
