/*!
 * Tests for the alignment cache
 */

use alignsrt::align_cache::{self, AlignmentCache};
use alignsrt::app_config::CacheConfig;
use crate::common;

fn cache_in(dir: &std::path::Path) -> AlignmentCache {
    let config = CacheConfig {
        enabled: true,
        dir: Some(dir.to_path_buf()),
    };
    AlignmentCache::from_config(&config).unwrap()
}

/// Test that a fingerprint is stable for unchanged inputs
#[test]
fn test_fingerprint_withSameInputs_shouldBeStable() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let audio = common::create_test_audio(&dir, "a.wav").unwrap();
    let script = common::create_test_script(&dir, "a.txt").unwrap();

    let first = align_cache::fingerprint(&audio, &script, "salt").unwrap();
    let second = align_cache::fingerprint(&audio, &script, "salt").unwrap();

    assert_eq!(first, second);
    // SHA-256 hex digest
    assert_eq!(first.len(), 64);
}

/// Test that the salt participates in the fingerprint
#[test]
fn test_fingerprint_withDifferentSalt_shouldDiffer() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let audio = common::create_test_audio(&dir, "a.wav").unwrap();
    let script = common::create_test_script(&dir, "a.txt").unwrap();

    let first = align_cache::fingerprint(&audio, &script, "english_mfa").unwrap();
    let second = align_cache::fingerprint(&audio, &script, "spanish_mfa").unwrap();

    assert_ne!(first, second);
}

/// Test that changed script content changes the fingerprint
#[test]
fn test_fingerprint_withChangedScript_shouldDiffer() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let audio = common::create_test_audio(&dir, "a.wav").unwrap();
    let script_one = common::create_test_file(&dir, "one.txt", "Hello.").unwrap();
    let script_two = common::create_test_file(&dir, "two.txt", "Goodbye.").unwrap();

    let first = align_cache::fingerprint(&audio, &script_one, "salt").unwrap();
    let second = align_cache::fingerprint(&audio, &script_two, "salt").unwrap();

    assert_ne!(first, second);
}

/// Test store and retrieval round trip
#[test]
fn test_store_and_get_withEnabledCache_shouldHit() {
    let temp_dir = common::create_temp_dir().unwrap();
    let cache = cache_in(temp_dir.path());

    assert!(cache.get("abc123").is_none());
    cache.store("abc123", &common::sample_textgrid()).unwrap();

    let cached = cache.get("abc123").unwrap();
    assert_eq!(cached, common::sample_textgrid());

    let (hits, misses, hit_rate) = cache.stats();
    assert_eq!(hits, 1);
    assert_eq!(misses, 1);
    assert!((hit_rate - 0.5).abs() < f64::EPSILON);
}

/// Test that a disabled cache neither hits nor stores
#[test]
fn test_disabled_cache_shouldNeverHitOrStore() {
    let cache = AlignmentCache::disabled();

    cache.store("abc123", "content").unwrap();
    assert!(cache.get("abc123").is_none());

    let (hits, misses, _) = cache.stats();
    assert_eq!(hits, 0);
    assert_eq!(misses, 0);
}

/// Test that a missing entry is a miss, not an error
#[test]
fn test_get_withMissingEntry_shouldCountMiss() {
    let temp_dir = common::create_temp_dir().unwrap();
    let cache = cache_in(temp_dir.path());

    assert!(cache.get("does-not-exist").is_none());

    let (hits, misses, _) = cache.stats();
    assert_eq!(hits, 0);
    assert_eq!(misses, 1);
}
