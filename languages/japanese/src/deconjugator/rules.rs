use super::{Conditions, DeinflectRule, RuleTag};

const NONE: Conditions = Conditions::NONE;
const V1: Conditions = Conditions::V1;
const V5: Conditions = Conditions::V5;
const VK: Conditions = Conditions::VK;
const VS: Conditions = Conditions::VS;
const ADJ_I: Conditions = Conditions::ADJ_I;
const MASU: Conditions = Conditions::MASU;
const MASEN: Conditions = Conditions::MASEN;
const TE: Conditions = Conditions::TE;

/// Godan rows: dictionary ending, a/i/e/o stems, te and ta forms
const GODAN_ROWS: [[&str; 7]; 9] = [
    ["う", "わ", "い", "え", "お", "って", "った"],
    ["く", "か", "き", "け", "こ", "いて", "いた"],
    ["ぐ", "が", "ぎ", "げ", "ご", "いで", "いだ"],
    ["す", "さ", "し", "せ", "そ", "して", "した"],
    ["つ", "た", "ち", "て", "と", "って", "った"],
    ["ぬ", "な", "に", "ね", "の", "んで", "んだ"],
    ["ぶ", "ば", "び", "べ", "ぼ", "んで", "んだ"],
    ["む", "ま", "み", "め", "も", "んで", "んだ"],
    ["る", "ら", "り", "れ", "ろ", "って", "った"],
];

struct RuleSet(Vec<DeinflectRule>);

impl RuleSet {
    fn add(
        &mut self,
        suffix: impl Into<String>,
        replacement: impl Into<String>,
        conditions_in: Conditions,
        conditions_out: Conditions,
        tag: RuleTag,
    ) {
        self.0.push(DeinflectRule {
            suffix: suffix.into(),
            replacement: replacement.into(),
            conditions_in,
            conditions_out,
            tag,
        });
    }
}

pub(super) fn japanese_rules() -> Vec<DeinflectRule> {
    let mut rules = RuleSet(Vec::new());

    polite_rules(&mut rules);
    auxiliary_rules(&mut rules);
    ichidan_rules(&mut rules);
    godan_rules(&mut rules);
    suru_rules(&mut rules);
    kuru_rules(&mut rules);
    adjective_rules(&mut rules);

    rules.0
}

/// ました / ません / ませんでした / ましょう back to ます
fn polite_rules(rules: &mut RuleSet) {
    rules.add("ました", "ます", NONE, MASU, RuleTag::Past);
    rules.add("ませんでした", "ません", NONE, MASEN, RuleTag::Past);
    rules.add("ません", "ます", MASEN, MASU, RuleTag::Negative);
    rules.add("ましょう", "ます", NONE, MASU, RuleTag::Volitional);
    rules.add("まして", "ます", TE, MASU, RuleTag::TeForm);
}

/// Auxiliaries that attach to the te-form
fn auxiliary_rules(rules: &mut RuleSet) {
    for (te, iru, contracted) in [("て", "ている", "てる"), ("で", "でいる", "でる")] {
        rules.add(iru, te, V1, TE, RuleTag::Progressive);
        rules.add(contracted, te, V1, TE, RuleTag::Progressive);
    }

    rules.add("てしまう", "て", V5, TE, RuleTag::Shimau);
    rules.add("でしまう", "で", V5, TE, RuleTag::Shimau);
    rules.add("ておく", "て", V5, TE, RuleTag::Oku);
    rules.add("でおく", "で", V5, TE, RuleTag::Oku);
    rules.add("とく", "て", V5, TE, RuleTag::Oku);
    rules.add("どく", "で", V5, TE, RuleTag::Oku);
}

fn ichidan_rules(rules: &mut RuleSet) {
    let forms = [
        ("ない", ADJ_I, RuleTag::Negative),
        ("た", NONE, RuleTag::Past),
        ("て", TE, RuleTag::TeForm),
        ("ます", MASU, RuleTag::Polite),
        ("られる", V1, RuleTag::PotentialOrPassive),
        ("れる", V1, RuleTag::Potential),
        ("させる", V1, RuleTag::Causative),
        ("よう", NONE, RuleTag::Volitional),
        ("ろ", NONE, RuleTag::Imperative),
        ("よ", NONE, RuleTag::Imperative),
        ("なさい", NONE, RuleTag::PoliteImperative),
        ("れば", NONE, RuleTag::Conditional),
        ("たら", NONE, RuleTag::Tara),
        ("たり", NONE, RuleTag::Tari),
        ("たい", ADJ_I, RuleTag::Desiderative),
        ("ず", NONE, RuleTag::Zu),
        ("ぬ", NONE, RuleTag::Zu),
        ("ちゃう", V5, RuleTag::Chau),
        ("そう", NONE, RuleTag::Appearance),
        ("すぎる", V1, RuleTag::Excessive),
        ("ながら", NONE, RuleTag::Nagara),
    ];

    for (suffix, conditions_in, tag) in forms {
        rules.add(suffix, "る", conditions_in, V1, tag);
    }
}

fn godan_rules(rules: &mut RuleSet) {
    for [u, a, i, e, o, te, ta] in GODAN_ROWS {
        let chau = match te.strip_suffix('て') {
            Some(head) => format!("{head}ちゃう"),
            None => format!("{}じゃう", te.trim_end_matches('で')),
        };

        let forms = [
            (format!("{a}ない"), ADJ_I, RuleTag::Negative),
            (ta.to_string(), NONE, RuleTag::Past),
            (te.to_string(), TE, RuleTag::TeForm),
            (format!("{i}ます"), MASU, RuleTag::Polite),
            (format!("{a}れる"), V1, RuleTag::Passive),
            (format!("{e}る"), V1, RuleTag::Potential),
            (format!("{a}せる"), V1, RuleTag::Causative),
            (format!("{o}う"), NONE, RuleTag::Volitional),
            (e.to_string(), NONE, RuleTag::Imperative),
            (format!("{i}なさい"), NONE, RuleTag::PoliteImperative),
            (format!("{e}ば"), NONE, RuleTag::Conditional),
            (format!("{ta}ら"), NONE, RuleTag::Tara),
            (format!("{ta}り"), NONE, RuleTag::Tari),
            (format!("{i}たい"), ADJ_I, RuleTag::Desiderative),
            (format!("{a}ず"), NONE, RuleTag::Zu),
            (format!("{a}ぬ"), NONE, RuleTag::Zu),
            (chau, V5, RuleTag::Chau),
            (format!("{i}そう"), NONE, RuleTag::Appearance),
            (format!("{i}すぎる"), V1, RuleTag::Excessive),
            (format!("{i}ながら"), NONE, RuleTag::Nagara),
        ];

        for (suffix, conditions_in, tag) in forms {
            rules.add(suffix, u, conditions_in, V5, tag);
        }
    }

    // 行く takes って/った instead of いて/いた
    for stem in ["行", "い"] {
        let base = format!("{stem}く");
        rules.add(format!("{stem}って"), base.clone(), TE, V5, RuleTag::TeForm);
        rules.add(format!("{stem}った"), base.clone(), NONE, V5, RuleTag::Past);
        rules.add(format!("{stem}ったら"), base.clone(), NONE, V5, RuleTag::Tara);
        rules.add(format!("{stem}ったり"), base.clone(), NONE, V5, RuleTag::Tari);
        rules.add(format!("{stem}っちゃう"), base, V5, V5, RuleTag::Chau);
    }
}

fn suru_rules(rules: &mut RuleSet) {
    let forms = [
        ("しない", ADJ_I, RuleTag::Negative),
        ("した", NONE, RuleTag::Past),
        ("して", TE, RuleTag::TeForm),
        ("します", MASU, RuleTag::Polite),
        ("される", V1, RuleTag::Passive),
        ("させる", V1, RuleTag::Causative),
        ("できる", V1, RuleTag::Potential),
        ("しよう", NONE, RuleTag::Volitional),
        ("しろ", NONE, RuleTag::Imperative),
        ("せよ", NONE, RuleTag::Imperative),
        ("しなさい", NONE, RuleTag::PoliteImperative),
        ("すれば", NONE, RuleTag::Conditional),
        ("したら", NONE, RuleTag::Tara),
        ("したり", NONE, RuleTag::Tari),
        ("したい", ADJ_I, RuleTag::Desiderative),
        ("せず", NONE, RuleTag::Zu),
        ("しちゃう", V5, RuleTag::Chau),
        ("しそう", NONE, RuleTag::Appearance),
        ("しすぎる", V1, RuleTag::Excessive),
        ("しながら", NONE, RuleTag::Nagara),
    ];

    for (suffix, conditions_in, tag) in forms {
        rules.add(suffix, "する", conditions_in, VS, tag);
    }
}

/// 来る in kanji and kana. The kanji spelling keeps 来 in every stem.
fn kuru_rules(rules: &mut RuleSet) {
    for [u, i, o] in [["来", "来", "来"], ["く", "き", "こ"]] {
        let base = format!("{u}る");
        let forms = [
            (format!("{o}ない"), ADJ_I, RuleTag::Negative),
            (format!("{i}た"), NONE, RuleTag::Past),
            (format!("{i}て"), TE, RuleTag::TeForm),
            (format!("{i}ます"), MASU, RuleTag::Polite),
            (format!("{o}られる"), V1, RuleTag::PotentialOrPassive),
            (format!("{o}れる"), V1, RuleTag::Potential),
            (format!("{o}させる"), V1, RuleTag::Causative),
            (format!("{o}よう"), NONE, RuleTag::Volitional),
            (format!("{o}い"), NONE, RuleTag::Imperative),
            (format!("{i}なさい"), NONE, RuleTag::PoliteImperative),
            (format!("{u}れば"), NONE, RuleTag::Conditional),
            (format!("{i}たら"), NONE, RuleTag::Tara),
            (format!("{i}たり"), NONE, RuleTag::Tari),
            (format!("{i}たい"), ADJ_I, RuleTag::Desiderative),
            (format!("{o}ず"), NONE, RuleTag::Zu),
            (format!("{i}ちゃう"), V5, RuleTag::Chau),
            (format!("{i}そう"), NONE, RuleTag::Appearance),
            (format!("{i}すぎる"), V1, RuleTag::Excessive),
            (format!("{i}ながら"), NONE, RuleTag::Nagara),
        ];

        for (suffix, conditions_in, tag) in forms {
            rules.add(suffix, base.clone(), conditions_in, VK, tag);
        }
    }
}

fn adjective_rules(rules: &mut RuleSet) {
    let forms = [
        ("くない", ADJ_I, RuleTag::Negative),
        ("かった", NONE, RuleTag::Past),
        ("くて", TE, RuleTag::TeForm),
        ("ければ", NONE, RuleTag::Conditional),
        ("かったら", NONE, RuleTag::Tara),
        ("かったり", NONE, RuleTag::Tari),
        ("かろう", NONE, RuleTag::Volitional),
        ("く", NONE, RuleTag::Adverbial),
        ("くなる", V5, RuleTag::Becoming),
        ("さ", NONE, RuleTag::Noun),
        ("そう", NONE, RuleTag::Appearance),
        ("すぎる", V1, RuleTag::Excessive),
    ];

    for (suffix, conditions_in, tag) in forms {
        rules.add(suffix, "い", conditions_in, ADJ_I, tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table_shape() {
        let rules = japanese_rules();
        assert!(rules.iter().all(|r| !r.suffix.is_empty()));
        assert!(rules.iter().all(|r| !r.conditions_out.is_empty()));
    }

    #[test]
    fn test_godan_chau_forms() {
        let rules = japanese_rules();
        let chau: Vec<(&str, &str)> = rules
            .iter()
            .filter(|r| r.tag == RuleTag::Chau && r.conditions_out == V5)
            .map(|r| (r.suffix.as_str(), r.replacement.as_str()))
            .collect();

        assert!(chau.contains(&("んじゃう", "む")));
        assert!(chau.contains(&("いちゃう", "く")));
        assert!(chau.contains(&("しちゃう", "す")));
        assert!(chau.contains(&("っちゃう", "う")));
    }
}
