use std::path::Path;
use std::time::Duration;
use log::{debug, info};
use tempfile::TempDir;
use tokio::process::Command;
use crate::app_config::AlignerConfig;
use crate::errors::AlignerError;

// @module: External forced-aligner orchestration

/// Driver for the external Montreal Forced Aligner executable.
///
/// One alignment run stages a single-utterance corpus in a temp directory,
/// invokes `mfa align` against the configured acoustic model and
/// pronunciation dictionary, and returns the produced TextGrid content.
pub struct Aligner {
    config: AlignerConfig,
    model: String,
    dictionary: String,
}

impl Aligner {
    /// Build an aligner from config, resolving the model and dictionary
    /// identifiers for the script language
    pub fn from_config(config: &AlignerConfig, language: &str) -> anyhow::Result<Self> {
        let model = config.model_id(language)?;
        let dictionary = config.dictionary_id(language)?;
        Ok(Aligner {
            config: config.clone(),
            model,
            dictionary,
        })
    }

    /// Acoustic model path or MFA-managed model name used for this run
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Dictionary path or MFA-managed dictionary name used for this run
    pub fn dictionary(&self) -> &str {
        &self.dictionary
    }

    /// Check that the aligner executable is present and responsive.
    ///
    /// Runs `mfa version` so a missing installation fails fast with an
    /// actionable message instead of midway through corpus staging.
    pub async fn verify_installation(&self) -> Result<String, AlignerError> {
        let output = Command::new(&self.config.executable)
            .arg("version")
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    AlignerError::NotFound(self.config.executable.clone())
                }
                _ => AlignerError::LaunchFailed(e),
            })?;

        if !output.status.success() {
            return Err(AlignerError::AlignmentFailed {
                status: output.status.to_string(),
                stderr: filter_aligner_stderr(&String::from_utf8_lossy(&output.stderr)),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run forced alignment for one audio/script pair.
    ///
    /// Returns the raw TextGrid content. The corpus and output directories
    /// are temporary and removed when the run finishes, so the TextGrid is
    /// read into memory before they drop.
    pub async fn align(&self, audio_file: &Path, script_file: &Path) -> Result<String, AlignerError> {
        let corpus_dir = TempDir::new()?;
        let output_dir = TempDir::new()?;

        let stem = self.stage_corpus(audio_file, script_file, corpus_dir.path())?;

        let args = self.build_align_args(corpus_dir.path(), output_dir.path());
        debug!("Aligner command: {} {}", self.config.executable, args.join(" "));

        let align_future = Command::new(&self.config.executable).args(&args).output();

        let timeout_secs = self.config.timeout_secs;
        let result = tokio::select! {
            result = align_future => {
                result.map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => {
                        AlignerError::NotFound(self.config.executable.clone())
                    }
                    _ => AlignerError::LaunchFailed(e),
                })?
            },
            _ = tokio::time::sleep(Duration::from_secs(timeout_secs)) => {
                return Err(AlignerError::TimedOut(timeout_secs));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(AlignerError::AlignmentFailed {
                status: result.status.to_string(),
                stderr: filter_aligner_stderr(&stderr),
            });
        }

        let textgrid_path = output_dir.path().join(format!("{}.TextGrid", stem));
        if !textgrid_path.exists() {
            // Some aligner versions nest output one directory deeper
            if let Some(found) = find_textgrid(output_dir.path(), &stem) {
                return Ok(std::fs::read_to_string(found)?);
            }
            return Err(AlignerError::MissingTextGrid(textgrid_path));
        }

        info!("Alignment finished, reading {}", textgrid_path.display());
        Ok(std::fs::read_to_string(textgrid_path)?)
    }

    /// Copy the audio/script pair into the corpus directory under a shared
    /// stem; the aligner pairs transcript and audio by stem
    fn stage_corpus(
        &self,
        audio_file: &Path,
        script_file: &Path,
        corpus_dir: &Path,
    ) -> Result<String, AlignerError> {
        let stem = script_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "utterance".to_string());

        let audio_ext = audio_file
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "wav".to_string());

        std::fs::copy(script_file, corpus_dir.join(format!("{}.txt", stem)))?;
        std::fs::copy(audio_file, corpus_dir.join(format!("{}.{}", stem, audio_ext)))?;

        Ok(stem)
    }

    /// Assemble the `mfa align` argument vector for the staged corpus
    pub fn build_align_args(&self, corpus_dir: &Path, output_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "align".to_string(),
            corpus_dir.to_string_lossy().to_string(),
            self.dictionary.clone(),
            self.model.clone(),
            output_dir.to_string_lossy().to_string(),
        ];

        if self.config.use_g2p {
            args.push("--use_g2p".to_string());
            args.push("True".to_string());
        }
        if self.config.single_speaker {
            args.push("--single_speaker".to_string());
        }
        if let Some(beam) = self.config.beam {
            args.push("--beam".to_string());
            args.push(beam.to_string());
        }
        if let Some(num_jobs) = self.config.num_jobs {
            args.push("--num_jobs".to_string());
            args.push(num_jobs.to_string());
        }

        args.push("--clean".to_string());
        args.push("--quiet".to_string());

        args
    }
}

/// Search the output directory recursively for the expected TextGrid;
/// aligner versions differ on whether output is nested per speaker
fn find_textgrid(output_dir: &Path, stem: &str) -> Option<std::path::PathBuf> {
    let target = format!("{}.TextGrid", stem);
    walkdir::WalkDir::new(output_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| {
            e.file_type().is_file()
                && e.file_name()
                    .to_string_lossy()
                    .eq_ignore_ascii_case(&target)
        })
        .map(|e| e.path().to_path_buf())
}

/// Filter aligner stderr to only show meaningful error lines, stripping the
/// progress bars, banner, and per-stage status noise.
pub fn filter_aligner_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "INFO",
        "DEBUG",
        "Setting up corpus",
        "Generating base features",
        "Creating corpus split",
        "Compiling training graphs",
        "Performing first-pass alignment",
        "Performing second-pass alignment",
        "Collecting phone and word alignments",
        "Exporting alignment TextGrids",
        "All done!",
        "Done!",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            // tqdm-style progress bars
            if trimmed.contains("%|") {
                return false;
            }
            !dominated_prefixes.iter().any(|p| trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown aligner error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
