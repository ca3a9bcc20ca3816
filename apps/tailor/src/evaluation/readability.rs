//! Flesch-Kincaid grade level with a vowel-group syllable approximation.

use tracing::debug;

use super::round_to;

/// Grade reported when there is no text to measure.
pub const EMPTY_TEXT_GRADE: f64 = 12.0;
const MIN_GRADE: f64 = 1.0;
const VOWELS: &str = "aeiouy";

/// `0.39 * words/sentences + 11.8 * syllables/words - 15.59`, floored at 1.0.
///
/// Sentences are counted as periods (at least one).
pub fn readability_grade(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        debug!("readability: no words, using default grade");
        return EMPTY_TEXT_GRADE;
    }

    let sentences = text.matches('.').count().max(1) as f64;
    let syllables: usize = words.iter().map(|w| approx_syllables(w)).sum();
    let word_count = words.len() as f64;

    let grade = 0.39 * (word_count / sentences) + 11.8 * (syllables as f64 / word_count) - 15.59;
    round_to(grade.max(MIN_GRADE), 2)
}

/// Vowel groups in the word, minus a trailing silent `e`; never below one.
pub fn approx_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    let mut count = 0;
    let mut previous_vowel = false;
    for c in word.chars() {
        let vowel = VOWELS.contains(c);
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }
    if word.ends_with('e') && count > 1 {
        count -= 1;
    }
    count.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_grade_twelve() {
        assert_eq!(readability_grade(""), 12.0);
        assert_eq!(readability_grade("   \n "), 12.0);
    }

    #[test]
    fn test_syllables() {
        assert_eq!(approx_syllables("data"), 2);
        assert_eq!(approx_syllables("queue"), 1);
        assert_eq!(approx_syllables("engineered"), 4);
        assert_eq!(approx_syllables("make"), 1);
        assert_eq!(approx_syllables("the"), 1);
        assert_eq!(approx_syllables("SQL"), 1);
        assert_eq!(approx_syllables("analytics"), 4);
    }

    #[test]
    fn test_floor_at_one() {
        // 3 words, 3 sentences, 3 syllables
        assert_eq!(readability_grade("Go. Run. Fix."), 1.0);
    }

    #[test]
    fn test_grade_formula() {
        // 4 words, 1 sentence, 8 syllables: 1.56 + 23.6 - 15.59
        assert_eq!(readability_grade("Led platform data migration."), 9.57);
    }
}
