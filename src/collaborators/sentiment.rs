//! Lexicon sentiment: local, dependency-free stand-in for a sentiment model.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::{SentimentModel, SentimentReading};
use crate::error::SignalError;

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../../data/sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

/// Tokens looked back from each lexicon hit for a negator.
const NEGATION_WINDOW: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Returns (summed score, token count).
    /// A negator within the previous 1..=3 tokens flips the sign of a hit.
    pub fn score_text(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score: i32 = 0;

        for i in 0..tokens.len() {
            let base = self.word_score(tokens[i].as_str());
            if base == 0 {
                continue;
            }
            let negated =
                (1..=NEGATION_WINDOW).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
        }

        (score, tokens.len())
    }

    /// Label plus a pseudo-confidence that grows with the magnitude of the score.
    pub fn classify(&self, text: &str) -> SentimentReading {
        let (score, _) = self.score_text(text);
        let label = match score.signum() {
            1 => "positive",
            -1 => "negative",
            _ => "neutral",
        };
        let magnitude = score.unsigned_abs() as f64;
        let confidence = 0.5 + 0.5 * magnitude / (magnitude + 2.0);
        SentimentReading {
            label: label.to_string(),
            score: (confidence * 1000.0).round() / 1000.0,
        }
    }
}

#[async_trait]
impl SentimentModel for LexiconSentiment {
    async fn sentiment(&self, caption: &str) -> Result<SentimentReading, SignalError> {
        if caption.trim().is_empty() {
            return Err(SignalError::NoInput {
                collaborator: "lexicon",
            });
        }
        Ok(self.classify(caption))
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Lower-cased alphanumeric tokens; apostrophes stay so "isn't" is one token.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
        .map(|t| t.trim_matches(|c: char| c == '\'' || c == '’'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase().replace('’', "'"))
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "don't"
            | "didn't"
            | "doesn't"
            | "without"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_caption() {
        let s = LexiconSentiment::new();
        let r = s.classify("What a beautiful, sunny day with friends!");
        assert_eq!(r.label, "positive");
        assert!(r.score > 0.7, "score = {}", r.score);
    }

    #[test]
    fn negation_flips_sign() {
        let s = LexiconSentiment::new();
        assert_eq!(s.score_text("this is good").0, 2);
        assert_eq!(s.score_text("this is not good").0, -2);
        assert_eq!(s.score_text("it isn’t really that good").0, -2);
        assert_eq!(s.classify("not good at all").label, "negative");
    }

    #[test]
    fn neutral_without_hits() {
        let r = LexiconSentiment::new().classify("Meeting at 5pm in the lobby");
        assert_eq!(r.label, "neutral");
        assert_eq!(r.score, 0.5);
    }

    #[tokio::test]
    async fn empty_caption_is_no_input() {
        let err = LexiconSentiment::new().sentiment("   ").await.unwrap_err();
        assert!(matches!(err, SignalError::NoInput { .. }));
    }
}
