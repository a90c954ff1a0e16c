/*!
 * # alignsrt - Forced-alignment SRT subtitle generator
 *
 * A Rust library for generating SRT subtitles from an audio narration and
 * its script via external forced alignment.
 *
 * ## Features
 *
 * - Orchestrate the Montreal Forced Aligner as a subprocess
 * - Parse the TextGrid word alignments it produces
 * - Restore the script's original casing, punctuation and emoji on the
 *   lowercased aligner output
 * - Group aligned words into subtitle-length cues (narrow cues for
 *   vertical/short-form video, wide cues for horizontal video)
 * - Emit standard SRT files
 * - Cache completed alignments so unchanged inputs skip the aligner
 * - Batch mode pairing scripts with audio files by stem
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `aligner`: External forced-aligner orchestration
 * - `textgrid`: TextGrid interval parsing
 * - `transcript`: Script tokenization and casing re-injection
 * - `subtitles`: Cue grouping and SRT output
 * - `align_cache`: Content-addressed cache of completed alignments
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod align_cache;
pub mod aligner;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod subtitles;
pub mod textgrid;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::{Config, Profile};
pub use app_controller::{Controller, RunOptions};
pub use subtitles::{SubtitleDocument, SubtitleEntry};
pub use textgrid::WordInterval;
pub use transcript::Transcript;
pub use errors::{AlignerError, AppError, SubtitleError, TextGridError};
