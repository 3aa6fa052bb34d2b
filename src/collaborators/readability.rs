//! Flesch reading ease, scaled to [0,1].
//!
//! `206.835 − 1.015·(words/sentences) − 84.6·(syllables/words)`, clamped to
//! [0,100] and divided by 100. Syllables are estimated from vowel groups.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingLevel {
    VeryEasy,
    Easy,
    Moderate,
    Hard,
    VeryHard,
}

impl ReadingLevel {
    pub fn from_ease(ease: f64) -> Self {
        if ease >= 0.8 {
            ReadingLevel::VeryEasy
        } else if ease >= 0.6 {
            ReadingLevel::Easy
        } else if ease >= 0.4 {
            ReadingLevel::Moderate
        } else if ease >= 0.2 {
            ReadingLevel::Hard
        } else {
            ReadingLevel::VeryHard
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadingLevel::VeryEasy => "very easy",
            ReadingLevel::Easy => "easy",
            ReadingLevel::Moderate => "moderate",
            ReadingLevel::Hard => "hard",
            ReadingLevel::VeryHard => "very hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityReading {
    /// Reading ease in [0,1], 3 decimals.
    pub ease: f64,
    pub level: ReadingLevel,
}

/// Reading ease of `text`; `None` when it contains no words.
pub fn reading_ease(text: &str) -> Option<ReadabilityReading> {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .collect();
    if words.is_empty() {
        return None;
    }

    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
        .max(1);
    let syllables: usize = words.iter().map(|w| syllable_count(w)).sum();

    let n_words = words.len() as f64;
    let fre = 206.835 - 1.015 * (n_words / sentences as f64) - 84.6 * (syllables as f64 / n_words);
    let ease = (fre.clamp(0.0, 100.0) / 100.0 * 1000.0).round() / 1000.0;

    Some(ReadabilityReading {
        ease,
        level: ReadingLevel::from_ease(ease),
    })
}

/// Vowel-group syllable estimate; at least one per word.
fn syllable_count(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if letters.is_empty() {
        // Numbers and emoji still take time to read.
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0;
    let mut prev_vowel = false;
    for &c in &letters {
        let v = is_vowel(c);
        if v && !prev_vowel {
            count += 1;
        }
        prev_vowel = v;
    }

    // Silent final "e" ("make"), but not "-le" ("table").
    let n = letters.len();
    if n > 2 && letters[n - 1] == 'e' && letters[n - 2] != 'l' && !is_vowel(letters[n - 2]) {
        count -= 1;
    }

    count.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syllables() {
        assert_eq!(syllable_count("cat"), 1);
        assert_eq!(syllable_count("make"), 1);
        assert_eq!(syllable_count("table"), 2);
        assert_eq!(syllable_count("beautiful"), 3);
        assert_eq!(syllable_count("Sunny!"), 2);
        assert_eq!(syllable_count("2024"), 1);
    }

    #[test]
    fn short_simple_sentence_is_very_easy() {
        let r = reading_ease("The cat sat on the mat.").unwrap();
        assert_eq!(r.ease, 1.0);
        assert_eq!(r.level, ReadingLevel::VeryEasy);
    }

    #[test]
    fn dense_polysyllabic_text_is_hard() {
        let r = reading_ease(
            "Institutional considerations regarding organizational responsibility \
             necessitate comprehensive administrative documentation",
        )
        .unwrap();
        assert!(r.ease < 0.2, "ease = {}", r.ease);
        assert_eq!(r.level, ReadingLevel::VeryHard);
    }

    #[test]
    fn no_words_no_reading() {
        assert!(reading_ease("   ").is_none());
        assert!(reading_ease("!!! ...").is_none());
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(ReadingLevel::from_ease(0.8), ReadingLevel::VeryEasy);
        assert_eq!(ReadingLevel::from_ease(0.79), ReadingLevel::Easy);
        assert_eq!(ReadingLevel::from_ease(0.4), ReadingLevel::Moderate);
        assert_eq!(ReadingLevel::from_ease(0.2), ReadingLevel::Hard);
        assert_eq!(ReadingLevel::from_ease(0.0), ReadingLevel::VeryHard);
    }

    #[test]
    fn level_follows_ease() {
        let r = reading_ease("The cat sat on the mat.").unwrap();
        assert_eq!(r.level.label(), "very easy");
        assert_eq!(ReadingLevel::from_ease(0.5).label(), "moderate");
        assert_eq!(ReadingLevel::from_ease(0.1).label(), "very hard");
    }
}
