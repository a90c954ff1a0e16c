/*!
 * Alignment result caching.
 *
 * Forced alignment is by far the slowest stage of a run; re-aligning an
 * unchanged audio/script pair is pure waste. Completed TextGrids are kept
 * on disk, keyed by a content digest over both input files and the
 * alignment-relevant options, so repeat runs skip the aligner entirely.
 */

use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};
use log::debug;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use crate::app_config::CacheConfig;

/// Disk-backed cache of completed alignments
pub struct AlignmentCache {
    /// Directory holding `<digest>.TextGrid` entries
    dir: PathBuf,

    /// Cache hit counter
    hits: RwLock<usize>,

    /// Cache miss counter
    misses: RwLock<usize>,

    /// Whether caching is enabled
    enabled: bool,
}

impl AlignmentCache {
    /// Create a cache from config, resolving the default cache directory
    /// under the user cache dir when none is configured
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let dir = match &config.dir {
            Some(dir) => dir.clone(),
            None => default_cache_dir()?,
        };

        Ok(AlignmentCache {
            dir,
            hits: RwLock::new(0),
            misses: RwLock::new(0),
            enabled: config.enabled,
        })
    }

    /// Create a disabled cache that never hits and never stores
    pub fn disabled() -> Self {
        AlignmentCache {
            dir: PathBuf::new(),
            hits: RwLock::new(0),
            misses: RwLock::new(0),
            enabled: false,
        }
    }

    /// Look up a TextGrid by fingerprint.
    ///
    /// A missing or unreadable entry degrades to a miss, never an error.
    pub fn get(&self, fingerprint: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        match std::fs::read_to_string(self.entry_path(fingerprint)) {
            Ok(content) => {
                let mut hits = self.hits.write();
                *hits += 1;
                debug!("Alignment cache hit for {}", fingerprint);
                Some(content)
            }
            Err(_) => {
                let mut misses = self.misses.write();
                *misses += 1;
                debug!("Alignment cache miss for {}", fingerprint);
                None
            }
        }
    }

    /// Store a TextGrid under its fingerprint
    pub fn store(&self, fingerprint: &str, textgrid: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache directory: {}", self.dir.display()))?;
        std::fs::write(self.entry_path(fingerprint), textgrid)
            .with_context(|| format!("Failed to write cache entry {}", fingerprint))?;

        debug!("Cached alignment as {}", fingerprint);
        Ok(())
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };
        (hits, misses, hit_rate)
    }

    fn entry_path(&self, fingerprint: &str) -> PathBuf {
        self.dir.join(format!("{}.TextGrid", fingerprint))
    }
}

/// Compute the cache fingerprint for an audio/script pair.
///
/// The salt carries the model, dictionary, and alignment flags so a config
/// change invalidates entries produced under different settings.
pub fn fingerprint(audio_file: &Path, script_file: &Path, salt: &str) -> Result<String> {
    let audio_bytes = std::fs::read(audio_file)
        .with_context(|| format!("Failed to read audio file: {}", audio_file.display()))?;
    let script_bytes = std::fs::read(script_file)
        .with_context(|| format!("Failed to read script file: {}", script_file.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&audio_bytes);
    hasher.update(&script_bytes);
    hasher.update(salt.as_bytes());

    let digest = hasher.finalize();
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

fn default_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join("alignsrt"))
        .ok_or_else(|| anyhow!("Could not determine the user cache directory"))
}
