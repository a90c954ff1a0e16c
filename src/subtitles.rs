use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::warn;
use crate::errors::SubtitleError;
use crate::textgrid::WordInterval;

// @module: Subtitle cue construction and SRT output

// @const: Sentence-final characters that close a cue early
const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

// @struct: Single subtitle cue
#[derive(Debug, Clone)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Cue text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    pub fn new_validated(
        seq_num: usize,
        start_time_ms: u64,
        end_time_ms: u64,
        text: String,
    ) -> Result<Self, SubtitleError> {
        if end_time_ms <= start_time_ms {
            return Err(SubtitleError::InvalidTimeRange {
                start_ms: start_time_ms,
                end_ms: end_time_ms,
            });
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(SubtitleError::EmptyText(seq_num));
        }

        Ok(SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: trimmed_text.to_string(),
        })
    }

    /// Parse an SRT timestamp to milliseconds - used by tests
    #[allow(dead_code)]
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        // Parse HH:MM:SS,mmm format
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            anyhow::bail!("Invalid timestamp format: {}", timestamp);
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            anyhow::bail!("Invalid time components in timestamp: {}", timestamp);
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Ordered collection of subtitle cues bound for one SRT file
#[derive(Debug)]
pub struct SubtitleDocument {
    /// Script file the cues were generated from
    pub source_file: PathBuf,

    /// List of subtitle cues
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleDocument {
    /// Create an empty subtitle document
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleDocument {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Group word intervals into subtitle cues.
    ///
    /// Words accumulate into a cue until either the line would grow past
    /// `max_line_chars` or a word ends with sentence-final punctuation;
    /// the closing word is included in the cue it closes, so a line can
    /// exceed the limit by one word. A trailing partial cue is flushed
    /// with the last word's end time.
    pub fn from_word_intervals(
        source_file: PathBuf,
        intervals: &[WordInterval],
        max_line_chars: usize,
    ) -> Self {
        let mut doc = SubtitleDocument::new(source_file);
        let mut current_line = String::new();
        let mut cue_start_ms: Option<u64> = None;
        let mut last_end_ms = 0;

        for interval in intervals {
            let word = interval.text.trim();
            if word.is_empty() {
                continue;
            }

            let start_ms = cue_start_ms.get_or_insert(interval.start_ms());
            let cue_start = *start_ms;
            last_end_ms = interval.end_ms();

            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };

            let ends_sentence = word
                .chars()
                .next_back()
                .is_some_and(|c| SENTENCE_TERMINATORS.contains(&c));

            if candidate.chars().count() > max_line_chars || ends_sentence {
                doc.push_cue(cue_start, interval.end_ms(), &candidate);
                current_line.clear();
                cue_start_ms = None;
            } else {
                current_line = candidate;
            }
        }

        // Flush any leftover partial cue
        if !current_line.is_empty() {
            if let Some(start_ms) = cue_start_ms {
                doc.push_cue(start_ms, last_end_ms, &current_line);
            }
        }

        doc
    }

    fn push_cue(&mut self, start_ms: u64, end_ms: u64, text: &str) {
        // Sub-millisecond words can round to a zero-width cue; widen so
        // every emitted cue satisfies end > start.
        let end_ms = if end_ms <= start_ms { start_ms + 1 } else { end_ms };
        let seq_num = self.entries.len() + 1;

        match SubtitleEntry::new_validated(seq_num, start_ms, end_ms, text.to_string()) {
            Ok(entry) => self.entries.push(entry),
            Err(e) => warn!("Skipping invalid cue {}: {}", seq_num, e),
        }
    }

    /// Write the cues to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Renumber entries to ensure sequential order
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        Ok(())
    }

    /// Total characters of cue text, used for run reporting
    pub fn total_chars(&self) -> usize {
        self.entries.iter().map(|e| e.text.chars().count()).sum()
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Document")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
