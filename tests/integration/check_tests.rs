use spotcheck::checker::reference::files_equal;
use spotcheck::checker::{CheckTier, CheckerConfig, SpotChecker};
use spotcheck::sampler::SampleError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Deterministic non-repeating content.
fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

fn write(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn flipped(mut content: Vec<u8>, index: usize) -> Vec<u8> {
    content[index] ^= 0xFF;
    content
}

#[test]
fn test_identical_large_files_match_by_sampling() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.bin", &pattern(10_000));
    let b = write(&dir, "b.bin", &pattern(10_000));

    let result = SpotChecker::with_defaults().check(&a, &b).unwrap();
    assert!(result.matched);
    assert_eq!(result.tier, CheckTier::Sampled { samples: 5 });
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_difference_between_offsets_goes_unnoticed() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.bin", &pattern(10_000));
    let b = write(&dir, "b.bin", &flipped(pattern(10_000), 600));

    // Byte 600 lies between sample offsets 0 and 2500
    let result = SpotChecker::with_defaults().check(&a, &b).unwrap();
    assert!(result.matched);
    assert!(!files_equal(&a, &b).unwrap());
}

#[test]
fn test_difference_at_sample_offset_is_caught() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.bin", &pattern(10_000));
    let b = write(&dir, "b.bin", &flipped(pattern(10_000), 5000));

    let result = SpotChecker::with_defaults().check(&a, &b).unwrap();
    assert!(!result.matched);
    assert_eq!(result.diagnostics, vec!["Sample #2 failed match at offset 5000"]);
}

#[test]
fn test_last_byte_is_always_sampled() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.bin", &pattern(12_345));
    let b = write(&dir, "b.bin", &flipped(pattern(12_345), 12_344));

    let checker = SpotChecker::with_defaults();
    for samples in [2, 3, 5, 8, 100] {
        let result = checker.check_with_samples(&a, &b, samples).unwrap();
        assert!(!result.matched, "{samples} samples missed the last byte");
    }
}

#[test]
fn test_file_checked_against_itself() {
    let dir = TempDir::new().unwrap();
    let small = write(&dir, "small.bin", &pattern(100));
    let large = write(&dir, "large.bin", &pattern(50_000));

    let checker = SpotChecker::with_defaults();
    for samples in [1, 2, 5, 17] {
        assert!(checker.check_with_samples(&small, &small, samples).unwrap().matched);
        assert!(checker.check_with_samples(&large, &large, samples).unwrap().matched);
    }
}

#[test]
fn test_length_mismatch_rejected_without_content() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.bin", &pattern(10_000));
    let b = write(&dir, "b.bin", &pattern(10_001));

    let result = SpotChecker::with_defaults().check(&a, &b).unwrap();
    assert!(!result.matched);
    assert_eq!(result.tier, CheckTier::SizeMismatch);
}

#[cfg(unix)]
#[test]
fn test_length_gate_does_not_open_files() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.bin", &pattern(10));
    let b = write(&dir, "b.bin", &pattern(20));
    fs::set_permissions(&a, fs::Permissions::from_mode(0o000)).unwrap();
    fs::set_permissions(&b, fs::Permissions::from_mode(0o000)).unwrap();

    let result = SpotChecker::with_defaults().check(&a, &b).unwrap();
    assert_eq!(result.tier, CheckTier::SizeMismatch);

    fs::set_permissions(&a, fs::Permissions::from_mode(0o644)).unwrap();
    fs::set_permissions(&b, fs::Permissions::from_mode(0o644)).unwrap();
}

#[test]
fn test_threshold_boundary() {
    let dir = TempDir::new().unwrap();

    // At the threshold: exact comparison catches a byte between offsets
    let a = write(&dir, "a5000", &pattern(5000));
    let b = write(&dir, "b5000", &flipped(pattern(5000), 600));
    let result = SpotChecker::with_defaults().check(&a, &b).unwrap();
    assert!(!result.matched);
    assert_eq!(result.tier, CheckTier::Exact);
    assert_eq!(result.diagnostics, vec!["Byte #600 differs"]);

    // One byte over: sampling takes over and misses it
    let a = write(&dir, "a5001", &pattern(5001));
    let b = write(&dir, "b5001", &flipped(pattern(5001), 600));
    let result = SpotChecker::with_defaults().check(&a, &b).unwrap();
    assert!(result.matched);
    assert_eq!(result.tier, CheckTier::Sampled { samples: 5 });
}

#[test]
fn test_custom_threshold() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a", &pattern(10_000));
    let b = write(&dir, "b", &flipped(pattern(10_000), 600));

    let checker = SpotChecker::new(CheckerConfig::default().with_exact_threshold(20_000));
    let result = checker.check(&a, &b).unwrap();
    assert!(!result.matched);
    assert_eq!(result.tier, CheckTier::Exact);
}

#[test]
fn test_empty_files_match() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a", b"");
    let b = write(&dir, "b", b"");

    let result = SpotChecker::with_defaults().check(&a, &b).unwrap();
    assert!(result.matched);
    assert!(result.tier.is_exact());
}

#[test]
fn test_reference_agrees_with_exact_tier() {
    let dir = TempDir::new().unwrap();
    let base = pattern(3000);
    let checker = SpotChecker::with_defaults();

    let cases = [
        base.clone(),
        flipped(base.clone(), 0),
        flipped(base.clone(), 1234),
        flipped(base.clone(), 2999),
    ];
    let a = write(&dir, "base", &base);
    for (i, content) in cases.iter().enumerate() {
        let b = write(&dir, &format!("case{i}"), content);
        let verdict = checker.check(&a, &b).unwrap().matched;
        assert_eq!(verdict, files_equal(&a, &b).unwrap(), "case {i}");
    }
}

#[test]
fn test_zero_samples_fail_fast() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a", &pattern(10));

    let err = SpotChecker::with_defaults()
        .check_with_samples(&a, &dir.path().join("missing"), 0)
        .unwrap_err();
    assert!(matches!(err, SampleError::InvalidSampleCount { samples: 0, .. }));
}

#[test]
fn test_more_samples_than_bytes() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a", &pattern(5001));
    let b = write(&dir, "b", &pattern(5001));

    let err = SpotChecker::with_defaults()
        .check_with_samples(&a, &b, 6000)
        .unwrap_err();
    assert!(matches!(
        err,
        SampleError::InvalidSampleCount {
            samples: 6000,
            len: 5001
        }
    ));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a", b"data");
    let missing = dir.path().join("nope");

    let err = SpotChecker::with_defaults().check(&a, &missing).unwrap_err();
    assert!(matches!(err, SampleError::FileNotFound(p) if p == missing));
}

#[test]
fn test_directory_is_not_a_file() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a", b"data");

    let err = SpotChecker::with_defaults().check(&a, dir.path()).unwrap_err();
    assert!(matches!(err, SampleError::FileUnreadable { .. }));
}

#[test]
fn test_micro_check_skips_length_gate() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a", &[7u8; 100]);
    let b = write(&dir, "b", &[7u8; 200]);

    let result = SpotChecker::with_defaults().micro_check(&a, &b).unwrap();
    assert!(result.matched);
    assert_eq!(result.tier, CheckTier::Sampled { samples: 5 });
}

#[test]
fn test_micro_check_on_tiny_file() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a", b"abc");
    let b = write(&dir, "b", b"abc");

    let err = SpotChecker::with_defaults().micro_check(&a, &b).unwrap_err();
    assert!(matches!(err, SampleError::InvalidSampleCount { samples: 5, len: 3 }));
}

#[test]
fn test_meta_check_ignores_content() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a", b"hello");
    let b = write(&dir, "b", b"world");
    let c = write(&dir, "c", b"hello!");

    let checker = SpotChecker::with_defaults();
    let same_len = checker.meta_check(&a, &b).unwrap();
    assert!(same_len.matched);
    assert_eq!(same_len.tier, CheckTier::Metadata);

    let other_len = checker.meta_check(&a, &c).unwrap();
    assert!(!other_len.matched);
    assert_eq!(other_len.tier, CheckTier::SizeMismatch);
}

#[test]
fn test_meta_check_readonly_flag() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a", b"hello");
    let b = write(&dir, "b", b"hello");

    let mut perms = fs::metadata(&b).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&b, perms).unwrap();

    let result = SpotChecker::with_defaults().meta_check(&a, &b).unwrap();
    assert!(!result.matched);
    assert_eq!(result.tier, CheckTier::AttributeMismatch);

    let mut perms = fs::metadata(&b).unwrap().permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    fs::set_permissions(&b, perms).unwrap();
}

#[test]
fn test_hard_check_runs_content_check() {
    let dir = TempDir::new().unwrap();
    let sub_a = dir.path().join("left");
    let sub_b = dir.path().join("right");
    fs::create_dir(&sub_a).unwrap();
    fs::create_dir(&sub_b).unwrap();

    let a = sub_a.join("f.bin");
    let b = sub_b.join("f.bin");
    let c = sub_b.join("g.bin");
    fs::write(&a, pattern(4000)).unwrap();
    fs::write(&b, pattern(4000)).unwrap();
    fs::write(&c, flipped(pattern(4000), 10)).unwrap();

    let checker = SpotChecker::with_defaults();
    let same = checker.hard_check(&a, &b).unwrap();
    assert!(same.matched);
    assert_eq!(same.tier, CheckTier::Exact);

    let differ = checker.hard_check(&a, &c).unwrap();
    assert!(!differ.matched);
    assert_eq!(differ.tier, CheckTier::Exact);
}
