use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::BitOr;

use yomu_core::DictionaryEntry;

mod rules;

/// Score multiplier applied per rule; shorter chains rank higher.
const DEPTH_DECAY: f32 = 0.9;

pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Grammatical classes a (partially) deinflected form can belong to.
///
/// The empty set is the raw surface form, which any rule may apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Conditions(u16);

impl Conditions {
    pub const NONE: Self = Self(0);
    /// Ichidan verb
    pub const V1: Self = Self(1 << 0);
    /// Godan verb
    pub const V5: Self = Self(1 << 1);
    /// 来る
    pub const VK: Self = Self(1 << 2);
    /// する and suru-compounds
    pub const VS: Self = Self(1 << 3);
    pub const ADJ_I: Self = Self(1 << 4);
    /// Still carries ます
    pub const MASU: Self = Self(1 << 5);
    /// Still carries ません
    pub const MASEN: Self = Self(1 << 6);
    /// Ends in the て/で connective
    pub const TE: Self = Self(1 << 7);

    pub const VERB: Self = Self::V1.union(Self::V5).union(Self::VK).union(Self::VS);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Dictionary word classes named by JMdict-style part-of-speech tags.
    pub fn from_part_of_speech<'a>(tags: impl IntoIterator<Item = &'a str>) -> Self {
        tags.into_iter().fold(Self::NONE, |acc, tag| {
            let class = match tag {
                "v1" | "v1-s" => Self::V1,
                "vk" => Self::VK,
                "vs" | "vs-i" | "vs-s" | "vz" => Self::VS,
                "adj-i" | "adj-ix" => Self::ADJ_I,
                // v5k, v5r-i, v5aru, plain "v5" from term banks, ...
                t if t.starts_with("v5") => Self::V5,
                _ => Self::NONE,
            };
            acc | class
        })
    }
}

impl BitOr for Conditions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Grammatical transformation undone by one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleTag {
    Negative,
    Past,
    TeForm,
    Polite,
    Passive,
    Potential,
    PotentialOrPassive,
    Causative,
    Volitional,
    Imperative,
    PoliteImperative,
    Conditional,
    Tara,
    Tari,
    Desiderative,
    Zu,
    Chau,
    Progressive,
    Shimau,
    Oku,
    Appearance,
    Excessive,
    Nagara,
    Adverbial,
    Noun,
    Becoming,
}

impl RuleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleTag::Negative => "negative",
            RuleTag::Past => "past",
            RuleTag::TeForm => "te-form",
            RuleTag::Polite => "polite",
            RuleTag::Passive => "passive",
            RuleTag::Potential => "potential",
            RuleTag::PotentialOrPassive => "potential or passive",
            RuleTag::Causative => "causative",
            RuleTag::Volitional => "volitional",
            RuleTag::Imperative => "imperative",
            RuleTag::PoliteImperative => "-nasai",
            RuleTag::Conditional => "-ba",
            RuleTag::Tara => "-tara",
            RuleTag::Tari => "-tari",
            RuleTag::Desiderative => "-tai",
            RuleTag::Zu => "-zu",
            RuleTag::Chau => "-chau",
            RuleTag::Progressive => "-te iru",
            RuleTag::Shimau => "-te shimau",
            RuleTag::Oku => "-te oku",
            RuleTag::Appearance => "-sou",
            RuleTag::Excessive => "-sugiru",
            RuleTag::Nagara => "-nagara",
            RuleTag::Adverbial => "adverbial",
            RuleTag::Noun => "-sa",
            RuleTag::Becoming => "-ku naru",
        }
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replace `suffix` with `replacement` when the current form satisfies
/// `conditions_in`; the result belongs to `conditions_out`.
#[derive(Debug, Clone)]
pub struct DeinflectRule {
    pub suffix: String,
    pub replacement: String,
    pub conditions_in: Conditions,
    pub conditions_out: Conditions,
    pub tag: RuleTag,
}

/// One candidate dictionary form.
#[derive(Debug, Clone, PartialEq)]
pub struct Deinflection {
    pub text: String,
    /// Rules in the order they were undone, surface side first
    pub rules: Vec<RuleTag>,
    pub conditions: Conditions,
    pub score: f32,
}

impl Deinflection {
    fn identity(text: &str) -> Self {
        Self {
            text: text.to_string(),
            rules: Vec::new(),
            conditions: Conditions::NONE,
            score: 1.0,
        }
    }

    pub fn depth(&self) -> usize {
        self.rules.len()
    }

    pub fn is_identity(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_names(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.as_str().to_string()).collect()
    }

    /// e.g. `食べなかった → 食べる (past, negative)`
    pub fn describe(&self, surface: &str) -> String {
        format!(
            "{} → {} ({})",
            surface,
            self.text,
            self.rule_names().join(", ")
        )
    }

    /// The noun in front of する when this candidate is a suru-verb form.
    ///
    /// Dictionaries list suru-verbs under the bare noun tagged `vs`, so
    /// `運営する` has to be looked up as `運営`.
    pub fn suru_stem(&self) -> Option<&str> {
        if !self.conditions.intersects(Conditions::VS) {
            return None;
        }
        self.text.strip_suffix("する").filter(|stem| !stem.is_empty())
    }

    /// Whether a dictionary hit for the suru stem can be this candidate.
    pub fn accepts_suru_noun(&self, entry: &DictionaryEntry) -> bool {
        Conditions::from_part_of_speech(entry.tags()).intersects(Conditions::VS)
    }

    /// Whether a dictionary hit for `text` can really be this candidate.
    ///
    /// Entries without a recognised part of speech are accepted.
    pub fn accepts(&self, entry: &DictionaryEntry) -> bool {
        if self.is_identity() {
            return true;
        }

        let pos = Conditions::from_part_of_speech(entry.tags());
        pos.is_empty() || pos.intersects(self.conditions)
    }
}

pub struct JapaneseDeconjugator {
    rules: Vec<DeinflectRule>,
    by_last_char: HashMap<char, Vec<usize>>,
    max_depth: usize,
}

impl JapaneseDeconjugator {
    pub fn new() -> Self {
        Self::with_rules(rules::japanese_rules(), DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self::with_rules(rules::japanese_rules(), max_depth)
    }

    pub fn with_rules(rules: Vec<DeinflectRule>, max_depth: usize) -> Self {
        let mut by_last_char: HashMap<char, Vec<usize>> = HashMap::new();
        for (idx, rule) in rules.iter().enumerate() {
            if let Some(c) = rule.suffix.chars().last() {
                by_last_char.entry(c).or_default().push(idx);
            }
        }

        Self {
            rules,
            by_last_char,
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Deconjugate a word to its possible base forms.
    ///
    /// The first candidate is always the word itself with no rules. The
    /// rest come breadth-first, so shallower chains precede deeper ones.
    pub fn deconjugate(&self, word: &str) -> Vec<Deinflection> {
        let mut results = vec![Deinflection::identity(word)];
        let mut seen: HashSet<(String, Conditions)> = HashSet::new();
        seen.insert((word.to_string(), Conditions::NONE));

        let mut cursor = 0;
        while cursor < results.len() {
            let current = results[cursor].clone();
            cursor += 1;

            if current.depth() >= self.max_depth {
                continue;
            }

            let Some(last) = current.text.chars().last() else {
                continue;
            };
            let Some(candidates) = self.by_last_char.get(&last) else {
                continue;
            };

            for &idx in candidates {
                let rule = &self.rules[idx];

                if !current.conditions.is_empty()
                    && !current.conditions.intersects(rule.conditions_in)
                {
                    continue;
                }
                let Some(stem) = current.text.strip_suffix(rule.suffix.as_str()) else {
                    continue;
                };

                let text = format!("{}{}", stem, rule.replacement);
                if text.is_empty() || !seen.insert((text.clone(), rule.conditions_out)) {
                    continue;
                }

                let mut chain = current.rules.clone();
                chain.push(rule.tag);

                results.push(Deinflection {
                    text,
                    rules: chain,
                    conditions: rule.conditions_out,
                    score: current.score * DEPTH_DECAY,
                });
            }
        }

        results
    }
}

impl Default for JapaneseDeconjugator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use yomu_core::SourceId;

    use super::*;

    fn find<'a>(results: &'a [Deinflection], text: &str) -> Vec<&'a Deinflection> {
        results.iter().filter(|d| d.text == text).collect()
    }

    fn has_chain(results: &[Deinflection], text: &str, chain: &[RuleTag]) -> bool {
        find(results, text).iter().any(|d| d.rules == chain)
    }

    #[test]
    fn test_identity_is_first() {
        let deconjugator = JapaneseDeconjugator::new();
        for word in ["食べる", "走った", "", "abc", "た"] {
            let results = deconjugator.deconjugate(word);
            assert_eq!(results[0].text, word);
            assert!(results[0].rules.is_empty());
            assert_eq!(results[0].score, 1.0);
        }
    }

    #[test]
    fn test_negative_past_potential() {
        let results = JapaneseDeconjugator::new().deconjugate("食べられなかった");
        assert!(has_chain(
            &results,
            "食べる",
            &[RuleTag::Past, RuleTag::Negative, RuleTag::PotentialOrPassive]
        ));
    }

    #[test]
    fn test_common_verb_forms() {
        let d = JapaneseDeconjugator::new();

        assert!(has_chain(&d.deconjugate("食べた"), "食べる", &[RuleTag::Past]));
        assert!(has_chain(&d.deconjugate("書いて"), "書く", &[RuleTag::TeForm]));
        assert!(has_chain(&d.deconjugate("読んだ"), "読む", &[RuleTag::Past]));
        assert!(has_chain(&d.deconjugate("話します"), "話す", &[RuleTag::Polite]));
        assert!(has_chain(&d.deconjugate("買わない"), "買う", &[RuleTag::Negative]));
        assert!(has_chain(&d.deconjugate("行った"), "行く", &[RuleTag::Past]));
        assert!(has_chain(
            &d.deconjugate("勉強しました"),
            "勉強する",
            &[RuleTag::Past, RuleTag::Polite]
        ));
        assert!(has_chain(
            &d.deconjugate("来なかった"),
            "来る",
            &[RuleTag::Past, RuleTag::Negative]
        ));
        assert!(has_chain(
            &d.deconjugate("食べている"),
            "食べる",
            &[RuleTag::Progressive, RuleTag::TeForm]
        ));
        assert!(has_chain(
            &d.deconjugate("食べさせられた"),
            "食べる",
            &[RuleTag::Past, RuleTag::PotentialOrPassive, RuleTag::Causative]
        ));
        assert!(has_chain(
            &d.deconjugate("食べませんでした"),
            "食べる",
            &[RuleTag::Past, RuleTag::Negative, RuleTag::Polite]
        ));
    }

    #[test]
    fn test_adjective_forms() {
        let d = JapaneseDeconjugator::new();

        assert!(has_chain(&d.deconjugate("高かった"), "高い", &[RuleTag::Past]));
        assert!(has_chain(&d.deconjugate("高くない"), "高い", &[RuleTag::Negative]));
        assert!(has_chain(&d.deconjugate("高くて"), "高い", &[RuleTag::TeForm]));
        assert!(has_chain(
            &d.deconjugate("食べたくなかった"),
            "食べる",
            &[RuleTag::Past, RuleTag::Negative, RuleTag::Desiderative]
        ));
    }

    #[test]
    fn test_suru_stem() {
        let results = JapaneseDeconjugator::new().deconjugate("運営した");
        let suru = find(&results, "運営する");
        assert!(!suru.is_empty());
        assert_eq!(suru[0].suru_stem(), Some("運営"));
        assert_eq!(suru[0].rules, vec![RuleTag::Past]);

        // Identity and bare する have no stem
        assert_eq!(results[0].suru_stem(), None);
        let bare = JapaneseDeconjugator::new().deconjugate("した");
        assert!(bare.iter().all(|d| d.suru_stem().is_none()));

        let noun = DictionaryEntry {
            meaning_tags: vec!["n".to_string(), "vs".to_string()],
            ..DictionaryEntry::new("1", "運営", "うんえい", SourceId::built_in("jmdict"))
        };
        let plain = DictionaryEntry {
            meaning_tags: vec!["n".to_string()],
            ..DictionaryEntry::new("2", "運営", "うんえい", SourceId::built_in("jmdict"))
        };
        assert!(suru[0].accepts_suru_noun(&noun));
        assert!(!suru[0].accepts_suru_noun(&plain));
    }

    #[test]
    fn test_breadth_first_order() {
        let results = JapaneseDeconjugator::new().deconjugate("食べられなかった");
        let depths: Vec<usize> = results.iter().map(Deinflection::depth).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_depth_is_bounded() {
        let shallow = JapaneseDeconjugator::with_max_depth(2);
        let results = shallow.deconjugate("食べられなかった");
        assert!(results.iter().all(|d| d.depth() <= 2));
        assert!(!has_chain(
            &results,
            "食べる",
            &[RuleTag::Past, RuleTag::Negative, RuleTag::PotentialOrPassive]
        ));

        let none = JapaneseDeconjugator::with_max_depth(0);
        assert_eq!(none.deconjugate("食べた").len(), 1);
    }

    #[test]
    fn test_self_referential_rules_terminate() {
        let looping = vec![
            DeinflectRule {
                suffix: "あ".to_string(),
                replacement: "い".to_string(),
                conditions_in: Conditions::V1,
                conditions_out: Conditions::V1,
                tag: RuleTag::Past,
            },
            DeinflectRule {
                suffix: "い".to_string(),
                replacement: "あ".to_string(),
                conditions_in: Conditions::V1,
                conditions_out: Conditions::V1,
                tag: RuleTag::Negative,
            },
        ];
        let d = JapaneseDeconjugator::with_rules(looping, 50);
        let results = d.deconjugate("かあ");

        // かあ (surface), かい, then かあ again as V1 and nothing further
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.depth() <= 50));
    }

    #[test]
    fn test_unmatched_suffix_yields_identity_only() {
        let results = JapaneseDeconjugator::new().deconjugate("猫");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_scores_decay_with_depth() {
        let results = JapaneseDeconjugator::new().deconjugate("食べなかった");
        for r in &results {
            let expected = DEPTH_DECAY.powi(r.depth() as i32);
            assert!((r.score - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_part_of_speech_gating() {
        let results = JapaneseDeconjugator::new().deconjugate("食べた");
        let v1 = find(&results, "食べる")
            .into_iter()
            .find(|d| d.conditions == Conditions::V1)
            .unwrap();

        let mut entry = DictionaryEntry::new("1", "食べる", "たべる", SourceId::built_in("jmdict"));
        entry.meaning_tags = vec!["v1".to_string(), "vt".to_string()];
        assert!(v1.accepts(&entry));

        entry.meaning_tags = vec!["v5r".to_string()];
        assert!(!v1.accepts(&entry));

        entry.meaning_tags = vec!["n".to_string()];
        assert!(v1.accepts(&entry));
    }

    #[test]
    fn test_describe() {
        let results = JapaneseDeconjugator::new().deconjugate("食べなかった");
        let hit = find(&results, "食べる")
            .into_iter()
            .find(|d| d.conditions == Conditions::V1)
            .unwrap();
        assert_eq!(hit.describe("食べなかった"), "食べなかった → 食べる (past, negative)");
    }
}
