use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default JP preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Full-width ASCII and half-width katakana fold to their canonical forms
        let text: String = text.nfkc().collect();

        text.replace(['\n', '\r'], "").trim().to_string()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

pub fn is_hiragana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{309F}')
}

pub fn is_katakana(c: char) -> bool {
    matches!(c, '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}')
}

pub fn is_han(c: char) -> bool {
    matches!(
        c,
        '\u{3005}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{20000}'..='\u{2A6DF}'
            | '\u{2A700}'..='\u{2EBEF}'
    )
}

pub fn is_japanese_char(c: char) -> bool {
    is_hiragana(c) || is_katakana(c) || is_han(c)
}

/// True if any character is Hiragana, Katakana or Han.
pub fn is_japanese(text: &str) -> bool {
    text.chars().any(is_japanese_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_nfkc_and_newlines() {
        let p = DefaultPreprocessor;
        assert_eq!(p.process("  ﾀﾍﾞﾙ\n"), "タベル");
        assert_eq!(p.process("ＡＢＣ"), "ABC");
        assert_eq!(p.process("   "), "");
    }

    #[test]
    fn test_script_detection() {
        assert!(is_japanese("食べる"));
        assert!(is_japanese("たべる"));
        assert!(is_japanese("テスト"));
        assert!(is_japanese("run 走る"));
        assert!(!is_japanese("run"));
        assert!(!is_japanese(""));
        assert!(!is_japanese("１２３"));
    }
}
