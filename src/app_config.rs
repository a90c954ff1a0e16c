use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Script language code (ISO)
    #[serde(default = "default_language")]
    pub language: String,

    /// Cue width profile
    #[serde(default)]
    pub profile: Profile,

    /// Explicit max characters per cue line, overriding the profile preset
    #[serde(default)]
    pub max_line_chars: Option<usize>,

    /// Forced-aligner config
    #[serde(default)]
    pub aligner: AlignerConfig,

    /// Alignment cache config
    #[serde(default)]
    pub cache: CacheConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Cue width profile for the target video format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    // @profile: Vertical/short-form video, narrow cues
    #[default]
    Shorts,
    // @profile: Horizontal/long-form video, wide cues
    Long,
}

impl Profile {
    // @returns: Capitalized profile name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Shorts => "Shorts",
            Self::Long => "Long",
        }
    }

    // @returns: Lowercase profile identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Shorts => "shorts".to_string(),
            Self::Long => "long".to_string(),
        }
    }

    // @returns: Max characters per cue line for this profile
    pub fn max_line_chars(&self) -> usize {
        match self {
            // Fewer words per line for smaller screens
            Self::Shorts => 30,
            Self::Long => 60,
        }
    }
}

// Implement Display trait for Profile
impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for Profile
impl std::str::FromStr for Profile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "shorts" => Ok(Self::Shorts),
            "long" => Ok(Self::Long),
            _ => Err(anyhow!("Invalid profile: {}", s)),
        }
    }
}

/// Forced-aligner configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AlignerConfig {
    // @field: Aligner executable name or path
    #[serde(default = "default_aligner_executable")]
    pub executable: String,

    // @field: Acoustic model path or MFA-managed model name
    #[serde(default)]
    pub acoustic_model: Option<String>,

    // @field: Pronunciation dictionary path or MFA-managed name
    #[serde(default)]
    pub dictionary: Option<String>,

    // @field: Let the aligner G2P out-of-dictionary words
    #[serde(default = "default_true")]
    pub use_g2p: bool,

    // @field: Single-speaker alignment mode
    #[serde(default = "default_true")]
    pub single_speaker: bool,

    // @field: Decoding beam width
    #[serde(default)]
    pub beam: Option<u32>,

    // @field: Aligner worker processes
    #[serde(default)]
    pub num_jobs: Option<u32>,

    // @field: Timeout seconds
    #[serde(default = "default_aligner_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            executable: default_aligner_executable(),
            acoustic_model: None,
            dictionary: None,
            use_g2p: true,
            single_speaker: true,
            beam: None,
            num_jobs: None,
            timeout_secs: default_aligner_timeout_secs(),
        }
    }
}

impl AlignerConfig {
    /// Acoustic model identifier for the given language: the configured
    /// path/name, else the aligner's pretrained-model naming convention
    pub fn model_id(&self, language: &str) -> Result<String> {
        match &self.acoustic_model {
            Some(model) if !model.is_empty() => Ok(model.clone()),
            _ => crate::language_utils::mfa_resource_name(language),
        }
    }

    /// Dictionary identifier for the given language, derived the same way
    pub fn dictionary_id(&self, language: &str) -> Result<String> {
        match &self.dictionary {
            Some(dictionary) if !dictionary.is_empty() => Ok(dictionary.clone()),
            _ => crate::language_utils::mfa_resource_name(language),
        }
    }
}

/// Alignment cache configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    /// Whether completed alignments are cached on disk
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cache directory override (default: under the user cache directory)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_aligner_executable() -> String {
    "mfa".to_string()
}

fn default_aligner_timeout_secs() -> u64 {
    // Alignment of long-form audio is slow; half an hour of headroom
    1800
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            profile: Profile::default(),
            max_line_chars: None,
            aligner: AlignerConfig::default(),
            cache: CacheConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Effective max characters per cue line after overrides
    pub fn line_width(&self) -> usize {
        self.max_line_chars
            .unwrap_or_else(|| self.profile.max_line_chars())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate the language code resolves to a real language
        let _language_name = crate::language_utils::get_language_name(&self.language)?;

        if self.aligner.executable.trim().is_empty() {
            return Err(anyhow!("Aligner executable must not be empty"));
        }

        if self.aligner.timeout_secs == 0 {
            return Err(anyhow!("Aligner timeout must be greater than zero"));
        }

        if self.max_line_chars == Some(0) {
            return Err(anyhow!("max_line_chars must be greater than zero"));
        }

        // Both must resolve so the aligner argv can be assembled
        let _model = self.aligner.model_id(&self.language)?;
        let _dictionary = self.aligner.dictionary_id(&self.language)?;

        Ok(())
    }
}
