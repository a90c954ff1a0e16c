/*!
 * Tests for the application controller
 */

use alignsrt::app_config::Config;
use alignsrt::app_controller::{Controller, RunOptions};
use crate::common;

/// Test controller creation with default configuration
#[test]
fn test_new_for_test_withDefaults_shouldBeInitialized() {
    let controller = Controller::new_for_test().unwrap();
    assert!(controller.is_initialized());
}

/// Test that a controller without a language is not initialized
#[test]
fn test_is_initialized_withEmptyLanguage_shouldBeFalse() {
    let config = Config {
        language: String::new(),
        ..Config::default()
    };
    let controller = Controller::with_config(config).unwrap();
    assert!(!controller.is_initialized());
}

/// Test default run options
#[test]
fn test_run_options_withDefaults_shouldBeAllOff() {
    let options = RunOptions::default();
    assert!(options.output.is_none());
    assert!(!options.force_overwrite);
    assert!(!options.keep_textgrid);
    assert!(!options.no_cache);
}

/// Test that a run with a missing audio file fails early
#[tokio::test]
async fn test_run_withMissingAudio_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let script = common::create_test_script(&dir, "script.txt").unwrap();

    let controller = Controller::new_for_test().unwrap();
    let result = controller
        .run(dir.join("ghost.wav"), script, RunOptions::default())
        .await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("does not exist"));
}

/// Test that a run with a non-audio input fails type detection
#[tokio::test]
async fn test_run_withScriptAsAudio_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let script = common::create_test_script(&dir, "script.txt").unwrap();
    let not_audio = common::create_test_file(&dir, "fake.txt", "words").unwrap();

    let controller = Controller::new_for_test().unwrap();
    let result = controller
        .run(not_audio, script, RunOptions::default())
        .await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Expected an audio file"));
}

/// Test that an empty script is rejected before alignment
#[tokio::test]
async fn test_run_withEmptyScript_shouldFailBeforeAligning() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let audio = common::create_test_audio(&dir, "clip.wav").unwrap();
    let script = common::create_test_file(&dir, "script.txt", "   \n").unwrap();

    let controller = Controller::new_for_test().unwrap();
    let result = controller.run(audio, script, RunOptions::default()).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("no words"));
}

/// Test that an existing output is skipped without force
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkip() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let audio = common::create_test_audio(&dir, "clip.wav").unwrap();
    let script = common::create_test_script(&dir, "clip.txt").unwrap();
    // Default output path for the default Shorts profile
    let existing = common::create_test_file(&dir, "clip_Shorts.srt", "1\n").unwrap();

    let controller = Controller::new_for_test().unwrap();
    let result = controller
        .run(audio, script, RunOptions::default())
        .await
        .unwrap();

    assert_eq!(result, existing);
    // Untouched content proves nothing ran
    assert_eq!(std::fs::read_to_string(&existing).unwrap(), "1\n");
}

/// Test folder mode with no pairs present
#[tokio::test]
async fn test_run_folder_withNoPairs_shouldSucceedQuietly() {
    let temp_dir = common::create_temp_dir().unwrap();
    // A script with no audio sibling is not a pair
    common::create_test_script(&temp_dir.path().to_path_buf(), "lonely.txt").unwrap();

    let controller = Controller::new_for_test().unwrap();
    let result = controller
        .run_folder(temp_dir.path().to_path_buf(), false)
        .await;

    assert!(result.is_ok());
}
