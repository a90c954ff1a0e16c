/*!
 * Error types for the alignsrt application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - the top-level wrapper is for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when invoking the external forced aligner
#[derive(Error, Debug)]
pub enum AlignerError {
    /// The aligner executable could not be resolved on the search path
    #[error("aligner executable '{0}' was not found on PATH (is Montreal Forced Aligner installed?)")]
    NotFound(String),

    /// The aligner process could not be spawned
    #[error("failed to launch aligner: {0}")]
    LaunchFailed(#[source] std::io::Error),

    /// Corpus staging or output collection failed
    #[error("failed to stage alignment corpus: {0}")]
    Staging(#[from] std::io::Error),

    /// The aligner ran but exited with a non-zero status
    #[error("aligner exited with {status}: {stderr}")]
    AlignmentFailed {
        /// Exit status as reported by the OS
        status: String,
        /// Filtered stderr output from the aligner
        stderr: String,
    },

    /// The aligner did not finish within the configured timeout
    #[error("aligner timed out after {0} seconds")]
    TimedOut(u64),

    /// The aligner exited successfully but produced no TextGrid
    #[error("no TextGrid found at {0} after alignment")]
    MissingTextGrid(PathBuf),
}

/// Errors that can occur while parsing a TextGrid file
#[derive(Error, Debug)]
pub enum TextGridError {
    /// Error reading the TextGrid from disk
    #[error("failed to read TextGrid: {0}")]
    Io(#[from] std::io::Error),

    /// A numeric field could not be parsed
    #[error("malformed TextGrid value at line {line}: '{content}'")]
    Malformed {
        /// 1-based line number of the offending line
        line: usize,
        /// The offending line content
        content: String,
    },

    /// The file parsed but contained no word intervals
    #[error("no word intervals found in TextGrid")]
    Empty,
}

/// Errors that can occur when constructing subtitle entries
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// End time does not come after start time
    #[error("invalid time range: end time {end_ms} <= start time {start_ms}")]
    InvalidTimeRange {
        /// Start of the cue in milliseconds
        start_ms: u64,
        /// End of the cue in milliseconds
        end_ms: u64,
    },

    /// Cue text is empty after trimming
    #[error("empty subtitle text for entry {0}")]
    EmptyText(usize),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the forced aligner
    #[error("Aligner error: {0}")]
    Aligner(#[from] AlignerError),

    /// Error from TextGrid parsing
    #[error("TextGrid error: {0}")]
    TextGrid(#[from] TextGridError),

    /// Error from subtitle construction
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
