use std::path::Path;
use anyhow::{Context, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use crate::textgrid::WordInterval;

// @module: Script text handling and casing re-injection

// @const: Whitespace-separated token regex
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

// @const: Characters dropped when matching tokens against aligner output
static STRIP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

/// The original script text, tokenized for re-injection.
///
/// The aligner lowercases words and strips punctuation before alignment;
/// the transcript keeps the script's original tokens so casing,
/// punctuation and emoji can be restored on the aligned output.
#[derive(Debug, Clone)]
pub struct Transcript {
    tokens: Vec<String>,
}

impl Transcript {
    /// Build a transcript from raw script text
    pub fn from_text(text: &str) -> Self {
        let tokens = TOKEN_REGEX
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        Transcript { tokens }
    }

    /// Load a transcript from a script file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script file: {}", path.display()))?;
        Ok(Self::from_text(&content))
    }

    /// Original whitespace-separated tokens, in script order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether the script contained no tokens at all
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Normalize a token for loose matching: strip everything that is not a
/// letter or digit, then lowercase.
pub fn normalize_token(token: &str) -> String {
    STRIP_REGEX.replace_all(token, "").to_lowercase()
}

/// Replace aligner word text with the original script tokens.
///
/// Walks the intervals in time order with a single forward cursor over the
/// script tokens. When the normalized forms match, the interval takes the
/// script token verbatim (casing, punctuation, emoji included). An aligner
/// word with no matching token ahead of the cursor keeps its aligner
/// spelling; the cursor never moves backwards, so a skipped token cannot be
/// claimed by a later word. Silence intervals are dropped.
pub fn reinject_casing(intervals: Vec<WordInterval>, transcript: &Transcript) -> Vec<WordInterval> {
    let tokens = transcript.tokens();
    let mut updated = Vec::with_capacity(intervals.len());
    let mut cursor = 0;
    let mut unmatched = 0;

    for mut interval in intervals {
        if interval.is_silence() {
            continue;
        }

        let clean_word = normalize_token(&interval.text);
        let mut matched = false;
        while cursor < tokens.len() {
            let candidate = &tokens[cursor];
            cursor += 1;
            if normalize_token(candidate) == clean_word {
                interval.text = candidate.clone();
                matched = true;
                break;
            }
        }
        if !matched {
            unmatched += 1;
        }

        updated.push(interval);
    }

    if unmatched > 0 {
        debug!(
            "{} aligned word(s) had no matching script token and keep the aligner spelling",
            unmatched
        );
    }

    updated
}
