// src/request.rs
//! Splits the raw post text into caption and hashtags.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// \w is Unicode-aware by default, so `#café` and `#東京` count.
static HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").expect("hashtag regex"));

/// Post text as sent by clients: either one string or a list of fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostText {
    One(String),
    Many(Vec<String>),
}

impl Default for PostText {
    fn default() -> Self {
        PostText::Many(Vec::new())
    }
}

impl PostText {
    /// Fragments joined with single spaces.
    pub fn joined(&self) -> String {
        match self {
            PostText::One(s) => s.clone(),
            PostText::Many(parts) => parts.join(" "),
        }
    }
}

/// Caption and hashtags extracted from one post.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedPost {
    /// Text with hashtags removed and trimmed; `None` when nothing is left.
    pub caption: Option<String>,
    /// Every hashtag match, `#` included, in order of appearance (duplicates kept).
    pub hashtags: Vec<String>,
}

impl ParsedPost {
    pub fn hashtag_count(&self) -> usize {
        self.hashtags.len()
    }
}

/// Extract hashtags and the remaining caption from `raw`.
pub fn parse_post(raw: &str) -> ParsedPost {
    let hashtags = HASHTAG
        .find_iter(raw)
        .map(|m| m.as_str().to_string())
        .collect();
    let stripped = HASHTAG.replace_all(raw, "");
    let caption = stripped.trim();
    ParsedPost {
        caption: (!caption.is_empty()).then(|| caption.to_string()),
        hashtags,
    }
}
