//! Tokenizer: lowercases, blanks out punctuation, and applies light suffix stemming.
//!
//! Pure and deterministic: the coverage and ATS scores are only reproducible
//! because identical text always yields the identical token set.

use std::collections::BTreeSet;

/// Ordered set so that anything derived from it (debug output, reports) is stable.
pub type TokenSet = BTreeSet<String>;

/// `(suffix, minimum stem length exclusive)`, tried in priority order.
/// At most one rule applies per token.
const SUFFIX_RULES: &[(&str, usize)] = &[("ing", 4), ("ed", 3), ("es", 4), ("s", 3)];

/// Tokenizes free text into a set of normalized stems.
pub fn tokenize(text: &str) -> TokenSet {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();

    cleaned
        .split_whitespace()
        .map(stem)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Union of the token sets of every value.
pub fn tokenize_all<'a, I>(values: I) -> TokenSet
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().flat_map(tokenize).collect()
}

/// Strips the first matching suffix whose remaining stem is long enough.
pub fn stem(token: &str) -> String {
    for (suffix, min_len) in SUFFIX_RULES {
        if let Some(base) = token.strip_suffix(suffix) {
            if base.chars().count() > *min_len {
                return base.to_string();
            }
        }
    }
    token.to_string()
}

/// True when every token of `needle` is present in `haystack`.
/// An empty needle never counts as covered.
pub fn is_covered(needle: &TokenSet, haystack: &TokenSet) -> bool {
    !needle.is_empty() && needle.is_subset(haystack)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> TokenSet {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(tokenize("Python, SQL & AWS!"), set(&["python", "sql", "aws"]));
    }

    #[test]
    fn test_ing_suffix_stripped_when_stem_long_enough() {
        assert_eq!(stem("designing"), "design");
        // "test" would be only 4 chars
        assert_eq!(stem("testing"), "testing");
    }

    #[test]
    fn test_ed_suffix() {
        assert_eq!(stem("automated"), "automat");
        assert_eq!(stem("used"), "used");
    }

    #[test]
    fn test_es_then_s_fallthrough() {
        assert_eq!(stem("processes"), "process");
        // "es" leaves "cas" (too short), so the plain "s" rule applies
        assert_eq!(stem("cases"), "case");
    }

    #[test]
    fn test_plural_s() {
        assert_eq!(stem("systems"), "system");
        assert_eq!(stem("apis"), "apis");
        assert_eq!(stem("aws"), "aws");
    }

    #[test]
    fn test_single_rule_applied() {
        // "ings" ends in "s", not "ing"; only the "s" rule fires
        assert_eq!(stem("buildings"), "building");
    }

    #[test]
    fn test_deterministic() {
        let text = "Designing ML systems, writing Python code.";
        assert_eq!(tokenize(text), tokenize(text));
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("!!! ... ---").is_empty());
    }

    #[test]
    fn test_tokenize_all_unions() {
        let tokens = tokenize_all(["Python", "SQL pipelines"]);
        // "es" outranks "s": pipelines -> pipelin
        assert_eq!(tokens, set(&["python", "sql", "pipelin"]));
    }

    #[test]
    fn test_is_covered() {
        let haystack = tokenize("Designing ML systems for analytics");
        assert!(is_covered(&tokenize("Design ML systems"), &haystack));
        assert!(!is_covered(&tokenize("Write Python code"), &haystack));
        assert!(!is_covered(&TokenSet::new(), &haystack));
    }
}
