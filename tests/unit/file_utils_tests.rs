/*!
 * Tests for file utility functions
 */

use std::path::Path;
use alignsrt::file_utils::{FileManager, FileType};
use crate::common;

/// Test file existence checks
#[test]
fn test_file_exists_withRealAndMissingFiles_shouldDetectCorrectly() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let file = common::create_test_file(&dir, "present.txt", "content").unwrap();

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(dir.join("absent.txt")));
    // A directory is not a file
    assert!(!FileManager::file_exists(&dir));
    assert!(FileManager::dir_exists(&dir));
}

/// Test directory creation
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAll() {
    let temp_dir = common::create_temp_dir().unwrap();
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested).unwrap();
    assert!(FileManager::dir_exists(&nested));

    // Idempotent on an existing directory
    assert!(FileManager::ensure_dir(&nested).is_ok());
}

/// Test output path derivation from a script path and profile
#[test]
fn test_generate_output_path_withScriptAndProfile_shouldBuildSiblingPath() {
    let output = FileManager::generate_output_path(Path::new("/videos/ghibli_art.txt"), "Shorts");
    assert_eq!(output, Path::new("/videos/ghibli_art_Shorts.srt"));

    let output = FileManager::generate_output_path(Path::new("script.txt"), "Long");
    assert_eq!(output, Path::new("script_Long.srt"));
}

/// Test recursive file discovery by extension
#[test]
fn test_find_files_withMixedTree_shouldReturnOnlyMatchingExtension() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "one.txt", "a").unwrap();
    common::create_test_file(&dir, "two.TXT", "b").unwrap();
    common::create_test_file(&dir, "skip.srt", "c").unwrap();
    let sub = dir.join("nested");
    FileManager::ensure_dir(&sub).unwrap();
    common::create_test_file(&sub, "three.txt", "d").unwrap();

    let found = FileManager::find_files(&dir, "txt").unwrap();
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|p| {
        p.extension()
            .map(|e| e.to_string_lossy().eq_ignore_ascii_case("txt"))
            .unwrap_or(false)
    }));
}

/// Test read and write round trip
#[test]
fn test_write_and_read_withContent_shouldRoundTrip() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("nested").join("file.txt");

    FileManager::write_to_file(&path, "round trip").unwrap();
    assert_eq!(FileManager::read_to_string(&path).unwrap(), "round trip");
}

/// Test file copy creates the target directory
#[test]
fn test_copy_file_withNestedTarget_shouldCopy() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let source = common::create_test_file(&dir, "src.txt", "payload").unwrap();
    let target = dir.join("deep").join("dst.txt");

    FileManager::copy_file(&source, &target).unwrap();
    assert_eq!(FileManager::read_to_string(&target).unwrap(), "payload");
}

/// Test copying a missing source fails
#[test]
fn test_copy_file_withMissingSource_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let result = FileManager::copy_file(
        temp_dir.path().join("ghost.txt"),
        temp_dir.path().join("dst.txt"),
    );
    assert!(result.is_err());
}

/// Test appending to a log file
#[test]
fn test_append_to_log_file_withTwoLines_shouldAccumulate() {
    let temp_dir = common::create_temp_dir().unwrap();
    let log_path = temp_dir.path().join("issues.log");

    FileManager::append_to_log_file(&log_path, "first failure").unwrap();
    FileManager::append_to_log_file(&log_path, "second failure").unwrap();

    let content = FileManager::read_to_string(&log_path).unwrap();
    assert!(content.contains("first failure"));
    assert!(content.contains("second failure"));
    assert_eq!(content.lines().count(), 2);
}

/// Test file type detection by extension
#[test]
fn test_detect_file_type_withKnownExtensions_shouldClassify() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let audio = common::create_test_audio(&dir, "clip.wav").unwrap();
    let script = common::create_test_file(&dir, "script.txt", "Hello").unwrap();
    let textgrid = common::create_test_textgrid(&dir, "clip.TextGrid").unwrap();

    assert_eq!(FileManager::detect_file_type(&audio).unwrap(), FileType::Audio);
    assert_eq!(FileManager::detect_file_type(&script).unwrap(), FileType::Script);
    assert_eq!(FileManager::detect_file_type(&textgrid).unwrap(), FileType::TextGrid);
}

/// Test content sniffing for extensionless files
#[test]
fn test_detect_file_type_withoutExtension_shouldSniffContent() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let audio = common::create_test_audio(&dir, "riff_no_ext").unwrap();
    let grid = common::create_test_file(&dir, "grid_no_ext", &common::sample_textgrid()).unwrap();
    let text = common::create_test_file(&dir, "text_no_ext", "plain words").unwrap();

    assert_eq!(FileManager::detect_file_type(&audio).unwrap(), FileType::Audio);
    assert_eq!(FileManager::detect_file_type(&grid).unwrap(), FileType::TextGrid);
    assert_eq!(FileManager::detect_file_type(&text).unwrap(), FileType::Script);
}

/// Test detection of a missing file
#[test]
fn test_detect_file_type_withMissingFile_shouldFail() {
    assert!(FileManager::detect_file_type("no/such/file").is_err());
}
