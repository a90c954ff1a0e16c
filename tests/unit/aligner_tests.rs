/*!
 * Tests for aligner command construction and stderr filtering
 */

use std::path::Path;
use alignsrt::aligner::{Aligner, filter_aligner_stderr};
use alignsrt::app_config::AlignerConfig;

/// Test default argument vector for an alignment run
#[test]
fn test_build_align_args_withDefaults_shouldMatchAlignerContract() {
    let config = AlignerConfig::default();
    let aligner = Aligner::from_config(&config, "en").unwrap();

    let args = aligner.build_align_args(Path::new("/tmp/corpus"), Path::new("/tmp/out"));

    assert_eq!(
        args,
        vec![
            "align",
            "/tmp/corpus",
            "english_mfa",
            "english_mfa",
            "/tmp/out",
            "--use_g2p",
            "True",
            "--single_speaker",
            "--clean",
            "--quiet",
        ]
    );
}

/// Test that explicit model and dictionary paths override the derived names
#[test]
fn test_from_config_withExplicitPaths_shouldUseThem() {
    let config = AlignerConfig {
        acoustic_model: Some("models/english_mfa.zip".to_string()),
        dictionary: Some("dictionaries/english_india_mfa.dict".to_string()),
        ..AlignerConfig::default()
    };
    let aligner = Aligner::from_config(&config, "en").unwrap();

    assert_eq!(aligner.model(), "models/english_mfa.zip");
    assert_eq!(aligner.dictionary(), "dictionaries/english_india_mfa.dict");
}

/// Test optional beam and worker flags
#[test]
fn test_build_align_args_withBeamAndJobs_shouldIncludeFlags() {
    let config = AlignerConfig {
        beam: Some(100),
        num_jobs: Some(4),
        ..AlignerConfig::default()
    };
    let aligner = Aligner::from_config(&config, "en").unwrap();

    let args = aligner.build_align_args(Path::new("corpus"), Path::new("out"));

    let beam_pos = args.iter().position(|a| a == "--beam").unwrap();
    assert_eq!(args[beam_pos + 1], "100");
    let jobs_pos = args.iter().position(|a| a == "--num_jobs").unwrap();
    assert_eq!(args[jobs_pos + 1], "4");
}

/// Test that disabled toggles drop their flags
#[test]
fn test_build_align_args_withTogglesOff_shouldOmitFlags() {
    let config = AlignerConfig {
        use_g2p: false,
        single_speaker: false,
        ..AlignerConfig::default()
    };
    let aligner = Aligner::from_config(&config, "en").unwrap();

    let args = aligner.build_align_args(Path::new("corpus"), Path::new("out"));

    assert!(!args.contains(&"--use_g2p".to_string()));
    assert!(!args.contains(&"--single_speaker".to_string()));
    // Cleanup flags stay
    assert!(args.contains(&"--clean".to_string()));
    assert!(args.contains(&"--quiet".to_string()));
}

/// Test that a non-English language derives its own resource names
#[test]
fn test_from_config_withSpanishLanguage_shouldDeriveSpanishResources() {
    let config = AlignerConfig::default();
    let aligner = Aligner::from_config(&config, "es").unwrap();

    assert_eq!(aligner.model(), "spanish_mfa");
    assert_eq!(aligner.dictionary(), "spanish_mfa");
}

/// Test stderr filtering keeps the error lines and drops the noise
#[test]
fn test_filter_aligner_stderr_withMixedOutput_shouldKeepMeaningfulLines() {
    let stderr = "INFO Setting up corpus information...\n\
                  Setting up corpus information...\n\
                   45%|████▌     | 45/100\n\
                  \n\
                  Could not find acoustic model 'klingon_mfa'\n\
                  All done!\n";

    let filtered = filter_aligner_stderr(stderr);

    assert_eq!(filtered, "Could not find acoustic model 'klingon_mfa'");
}

/// Test stderr filtering when nothing meaningful remains
#[test]
fn test_filter_aligner_stderr_withOnlyNoise_shouldExplainEmptiness() {
    let filtered = filter_aligner_stderr("INFO all good\n 100%|██████| 100/100\n");
    assert!(filtered.contains("stderr was empty after filtering"));
}
