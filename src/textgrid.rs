use std::fs;
use std::path::Path;
use crate::errors::TextGridError;

// @module: TextGrid interval parsing

/// A single time-aligned word interval extracted from a TextGrid.
///
/// Times are kept as seconds the way the aligner writes them; millisecond
/// conversion happens at the subtitle boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct WordInterval {
    /// Interval start in seconds
    pub start_secs: f64,

    /// Interval end in seconds
    pub end_secs: f64,

    /// Word text as written by the aligner (lowercased, punctuation stripped)
    pub text: String,
}

impl WordInterval {
    /// Creates a new word interval
    pub fn new(start_secs: f64, end_secs: f64, text: impl Into<String>) -> Self {
        WordInterval {
            start_secs,
            end_secs,
            text: text.into(),
        }
    }

    /// Whether this interval carries no word (a silence/pause marker)
    pub fn is_silence(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Interval start rounded to milliseconds
    pub fn start_ms(&self) -> u64 {
        secs_to_ms(self.start_secs)
    }

    /// Interval end rounded to milliseconds
    pub fn end_ms(&self) -> u64 {
        secs_to_ms(self.end_secs)
    }
}

fn secs_to_ms(secs: f64) -> u64 {
    (secs.max(0.0) * 1000.0).round() as u64
}

/// Parse a TextGrid file and extract its word intervals.
///
/// Silence intervals (empty text) are kept; callers filter them when
/// building cue text so word timings stay anchored to real speech.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<WordInterval>, TextGridError> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_str(&content)
}

/// Parse TextGrid content into word intervals.
///
/// The parser is line-based over the long TextGrid format: each interval is
/// an `xmin = `, `xmax = `, `text = "…"` triple, completed when the text
/// line is seen. The aligner writes two tiers, `words` and `phones`; only
/// intervals from the words tier are returned. Input without any tier
/// headers is treated as a single implicit words tier.
pub fn parse_str(content: &str) -> Result<Vec<WordInterval>, TextGridError> {
    let mut intervals = Vec::new();
    let mut current_xmin: Option<f64> = None;
    let mut current_xmax: Option<f64> = None;
    let mut in_word_tier = true;
    let mut saw_tier_header = false;

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();

        if let Some(value) = line.strip_prefix("name =") {
            // Tier header. Everything until the next header belongs to it.
            let tier = unquote(value.trim());
            in_word_tier = tier.eq_ignore_ascii_case("words");
            saw_tier_header = true;
            // A new tier restates its own xmin/xmax; drop any partial state.
            current_xmin = None;
            current_xmax = None;
            continue;
        }

        if !in_word_tier && saw_tier_header {
            continue;
        }

        if let Some(value) = line.strip_prefix("xmin =") {
            current_xmin = Some(parse_time(value, idx, raw_line)?);
        } else if let Some(value) = line.strip_prefix("xmax =") {
            current_xmax = Some(parse_time(value, idx, raw_line)?);
        } else if let Some(value) = line.strip_prefix("text =") {
            // The header carries a file-level xmin/xmax pair before any
            // interval; a text line closes a triple only when both ends
            // were restated since the last push.
            if let (Some(xmin), Some(xmax)) = (current_xmin.take(), current_xmax.take()) {
                intervals.push(WordInterval::new(xmin, xmax, unquote(value.trim())));
            }
        }
    }

    if intervals.is_empty() {
        return Err(TextGridError::Empty);
    }

    Ok(intervals)
}

fn parse_time(value: &str, line_idx: usize, raw_line: &str) -> Result<f64, TextGridError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| TextGridError::Malformed {
            line: line_idx + 1,
            content: raw_line.trim().to_string(),
        })
}

/// Strip the surrounding quotes from a TextGrid string value and unescape
/// the doubled-quote escape the format uses.
fn unquote(value: &str) -> String {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    inner.replace("\"\"", "\"")
}
