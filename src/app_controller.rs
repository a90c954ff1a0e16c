use anyhow::{Context, Result};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle, MultiProgress};
use crate::align_cache::{self, AlignmentCache};
use crate::aligner::Aligner;
use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::subtitles::SubtitleDocument;
use crate::textgrid;
use crate::transcript::{self, Transcript};

// @module: Application controller for the alignment pipeline

/// Per-run options collected from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit output path for the SRT file
    pub output: Option<PathBuf>,

    /// Overwrite an existing output file
    pub force_overwrite: bool,

    /// Copy the raw TextGrid next to the SRT
    pub keep_textgrid: bool,

    /// Bypass the alignment cache for this run
    pub no_cache: bool,
}

/// Main application controller for subtitle generation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.language.is_empty() && !self.config.aligner.executable.is_empty()
    }

    /// Run the full pipeline for one audio/script pair
    pub async fn run(&self, audio_file: PathBuf, script_file: PathBuf, options: RunOptions) -> Result<PathBuf> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(audio_file, script_file, options, &multi_progress)
            .await
    }

    /// Run the pipeline with progress reporting
    async fn run_with_progress(
        &self,
        audio_file: PathBuf,
        script_file: PathBuf,
        options: RunOptions,
        multi_progress: &MultiProgress,
    ) -> Result<PathBuf> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        self.check_input_files(&audio_file, &script_file)?;

        // Load the script up front so an empty script fails before the
        // (slow) alignment stage
        let script = Transcript::load(&script_file)?;
        if script.is_empty() {
            return Err(anyhow::anyhow!(
                "Script file contains no words: {}",
                script_file.display()
            ));
        }

        let output_path = options.output.clone().unwrap_or_else(|| {
            FileManager::generate_output_path(&script_file, self.config.profile.display_name())
        });

        if output_path.exists() && !options.force_overwrite {
            warn!(
                "Skipping file, subtitle already exists: {} (use -f to force overwrite)",
                output_path.display()
            );
            return Ok(output_path);
        }

        let aligner = Aligner::from_config(&self.config.aligner, &self.config.language)?;
        let cache = if options.no_cache {
            AlignmentCache::disabled()
        } else {
            AlignmentCache::from_config(&self.config.cache)?
        };

        let textgrid_content = self
            .obtain_textgrid(&audio_file, &script_file, &aligner, &cache, multi_progress)
            .await?;
        let alignment_elapsed = start_time.elapsed();

        if options.keep_textgrid {
            let textgrid_path = output_path.with_extension("TextGrid");
            FileManager::write_to_file(&textgrid_path, &textgrid_content)?;
            info!("TextGrid kept at {}", textgrid_path.display());
        }

        // Post-processing: parse, restore casing/punctuation, group into cues
        let intervals = textgrid::parse_str(&textgrid_content)
            .context("Failed to parse aligner TextGrid output")?;
        debug!("Parsed {} intervals from TextGrid", intervals.len());

        let words = transcript::reinject_casing(intervals, &script);
        if words.is_empty() {
            return Err(anyhow::anyhow!(
                "Alignment produced no word intervals for {}",
                audio_file.display()
            ));
        }

        let mut document = SubtitleDocument::from_word_intervals(
            script_file.clone(),
            &words,
            self.config.line_width(),
        );
        if document.entries.is_empty() {
            return Err(anyhow::anyhow!("No subtitle cues could be built from the alignment"));
        }

        document.write_to_srt(&output_path)?;

        let elapsed = start_time.elapsed();
        let postprocess_elapsed = elapsed.checked_sub(alignment_elapsed).unwrap_or_default();
        info!(
            "Success: {} ({} cues, {} words). Alignment: {} - Post-processing: {}",
            output_path.display(),
            document.entries.len(),
            words.len(),
            Self::format_duration(alignment_elapsed),
            Self::format_duration(postprocess_elapsed)
        );

        Ok(output_path)
    }

    /// Fetch the TextGrid from the cache, or run the aligner on a miss
    async fn obtain_textgrid(
        &self,
        audio_file: &Path,
        script_file: &Path,
        aligner: &Aligner,
        cache: &AlignmentCache,
        multi_progress: &MultiProgress,
    ) -> Result<String> {
        let salt = format!(
            "{}|{}|g2p={}|single={}|beam={:?}",
            aligner.model(),
            aligner.dictionary(),
            self.config.aligner.use_g2p,
            self.config.aligner.single_speaker,
            self.config.aligner.beam
        );
        let fingerprint = align_cache::fingerprint(audio_file, script_file, &salt)?;

        if let Some(cached) = cache.get(&fingerprint) {
            info!("Reusing cached alignment for {}", audio_file.display());
            return Ok(cached);
        }

        // Fail fast with an actionable message before staging anything
        let version = aligner.verify_installation().await?;
        debug!("Aligner version: {}", version);

        info!(
            "Aligning with model '{}' and dictionary '{}'",
            aligner.model(),
            aligner.dictionary()
        );

        // The aligner gives no progress stream worth parsing; show a
        // spinner with elapsed time while it runs
        let spinner = multi_progress.add(ProgressBar::new_spinner());
        let template_result = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(template_result);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message("Aligning audio to script, please wait…");

        let result = aligner.align(audio_file, script_file).await;
        spinner.finish_and_clear();

        let textgrid_content = result?;

        if let Err(e) = cache.store(&fingerprint, &textgrid_content) {
            warn!("Failed to cache alignment: {}", e);
        }

        Ok(textgrid_content)
    }

    fn check_input_files(&self, audio_file: &Path, script_file: &Path) -> Result<()> {
        if !audio_file.exists() {
            return Err(anyhow::anyhow!("Audio file does not exist: {:?}", audio_file));
        }
        if !script_file.exists() {
            return Err(anyhow::anyhow!("Script file does not exist: {:?}", script_file));
        }

        match FileManager::detect_file_type(audio_file)? {
            FileType::Audio => {}
            other => {
                return Err(anyhow::anyhow!(
                    "Expected an audio file (wav/mp3), got {:?}: {:?}",
                    other,
                    audio_file
                ));
            }
        }

        match FileManager::detect_file_type(script_file)? {
            FileType::Script => {}
            other => {
                return Err(anyhow::anyhow!(
                    "Expected a plain-text script file, got {:?}: {:?}",
                    other,
                    script_file
                ));
            }
        }

        Ok(())
    }

    /// Process every script/audio pair found under a directory.
    ///
    /// Scripts are `*.txt` files; each is paired with an audio file of the
    /// same stem in the same directory. Pairs run sequentially, one aligner
    /// subprocess at a time, and a failure in one pair does not stop the
    /// rest of the batch.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        info!("Scanning for script/audio pairs in {:?}", input_dir);

        let scripts = FileManager::find_files(&input_dir, "txt")?;
        let pairs: Vec<(PathBuf, PathBuf)> = scripts
            .into_iter()
            .filter_map(|script| {
                Self::find_audio_sibling(&script).map(|audio| (audio, script))
            })
            .collect();

        if pairs.is_empty() {
            warn!("No script/audio pairs found in {:?}", input_dir);
            return Ok(());
        }

        let multi_progress = MultiProgress::new();
        let progress_bar = multi_progress.add(ProgressBar::new(pairs.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pairs ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let mut processed_count = 0;
        let mut failed_count = 0;

        for (audio_file, script_file) in &pairs {
            progress_bar.set_message(
                script_file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );

            let options = RunOptions {
                force_overwrite,
                ..RunOptions::default()
            };
            match self
                .run_with_progress(audio_file.clone(), script_file.clone(), options, &multi_progress)
                .await
            {
                Ok(_) => processed_count += 1,
                Err(e) => {
                    failed_count += 1;
                    error!("Error processing {:?}: {}", script_file, e);

                    // Keep a persistent record of batch failures
                    let issues_log = input_dir.join("alignsrt.issues.log");
                    let message = format!("{:?}: {}", script_file, e);
                    if let Err(log_err) = FileManager::append_to_log_file(&issues_log, &message) {
                        warn!("Failed to write issues log: {}", log_err);
                    }
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();

        if failed_count > 0 {
            info!(
                "Finished: {} pair(s) processed, {} failed (see alignsrt.issues.log)",
                processed_count, failed_count
            );
        } else {
            info!("Finished: {} pair(s) processed", processed_count);
        }

        Ok(())
    }

    /// Look for an audio file sharing the script's stem
    fn find_audio_sibling(script_file: &Path) -> Option<PathBuf> {
        let parent = script_file.parent()?;
        let stem = script_file.file_stem()?;

        for ext in ["wav", "mp3"] {
            let candidate = parent.join(format!("{}.{}", stem.to_string_lossy(), ext));
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        debug!("No audio sibling found for script {:?}", script_file);
        None
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
