use once_cell::sync::Lazy;
use regex::Regex;

static PUNCT_OR_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{P}\p{S}]").expect("Invalid regex"));

static NUMERAL_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*년").expect("Invalid regex"));

/// Which canonicalization steps to apply before comparing texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Strip punctuation/symbols, collapse whitespace, and lowercase.
    pub normalize_punctuation: bool,
    /// Join digit sequences to a trailing year marker ("2024 년" becomes "2024년").
    pub normalize_numerals: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            normalize_punctuation: true,
            normalize_numerals: true,
        }
    }
}

/// Replaces Unicode punctuation and symbol characters with spaces, collapses
/// whitespace runs, trims, and lowercases.
pub fn strip_punctuation(text: &str) -> String {
    let spaced = PUNCT_OR_SYMBOL_RE.replace_all(text, " ");
    spaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Removes incidental whitespace between a number and the year marker, so a
/// spoken "2024 년" grades the same as the written "2024년".
pub fn join_numeral_units(text: &str) -> String {
    let joined = NUMERAL_YEAR_RE.replace_all(text, "$1년");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Applies the enabled canonicalization steps in order: punctuation stripping
/// first, then numeral-unit joining. With both options off the text passes
/// through untouched.
pub fn normalize(text: &str, options: NormalizeOptions) -> String {
    let mut out = text.to_string();
    if options.normalize_punctuation {
        out = strip_punctuation(&out);
    }
    if options.normalize_numerals {
        out = join_numeral_units(&out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::period_and_comma("안녕하세요, 반갑습니다.", "안녕하세요 반갑습니다")]
    #[case::symbols("a+b=c", "a b c")]
    #[case::lowercases("Hello World", "hello world")]
    #[case::collapses_runs("one   two\t three", "one two three")]
    #[case::trims("  padded  ", "padded")]
    #[case::empty("", "")]
    #[case::only_punctuation("?!...", "")]
    fn test_strip_punctuation(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_punctuation(input), expected);
    }

    #[rstest]
    #[case::joins_spaced_year("2024 년", "2024년")]
    #[case::already_joined("2024년", "2024년")]
    #[case::mid_sentence("올해는 2024 년 입니다", "올해는 2024년 입니다")]
    #[case::multiple("1 년 2 년", "1년 2년")]
    #[case::no_marker_untouched("2024 일", "2024 일")]
    #[case::empty("", "")]
    fn test_join_numeral_units(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(join_numeral_units(input), expected);
    }

    #[test]
    fn test_normalize_defaults_apply_both_rules() {
        let out = normalize("올해는 2024 년!", NormalizeOptions::default());
        assert_eq!(out, "올해는 2024년");
    }

    #[test]
    fn test_normalize_both_off_is_identity() {
        let options = NormalizeOptions {
            normalize_punctuation: false,
            normalize_numerals: false,
        };
        assert_eq!(normalize("Hello, 2024 년!", options), "Hello, 2024 년!");
    }

    #[test]
    fn test_normalize_punctuation_only_keeps_numeral_spacing() {
        let options = NormalizeOptions {
            normalize_punctuation: true,
            normalize_numerals: false,
        };
        assert_eq!(normalize("2024 년.", options), "2024 년");
    }

    #[test]
    fn test_normalize_numerals_only_keeps_case_and_punctuation() {
        let options = NormalizeOptions {
            normalize_punctuation: false,
            normalize_numerals: true,
        };
        assert_eq!(normalize("Read 2024 년.", options), "Read 2024년.");
    }

    #[test]
    fn test_punctuation_strip_runs_before_numeral_join() {
        // The hyphen becomes a space, which the numeral rule then swallows.
        let out = normalize("2024-년", NormalizeOptions::default());
        assert_eq!(out, "2024년");
    }
}
