use spotcheck::checker::{BatchError, CheckerConfig, SpotChecker};
use spotcheck::progress::ProgressCallback;
use spotcheck::scanner::ScanError;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(7).wrapping_add(seed)).collect()
}

/// Root with `SourceFiles/{s1,s2}` and top-level `{t1,t2,t3}`; `s1` equals `t2`.
fn setup_batch_root() -> TempDir {
    let root = TempDir::new().unwrap();
    let sources = root.path().join("SourceFiles");
    fs::create_dir(&sources).unwrap();

    fs::write(sources.join("s1"), pattern(8000, 1)).unwrap();
    fs::write(sources.join("s2"), pattern(300, 2)).unwrap();

    fs::write(root.path().join("t1"), pattern(8000, 9)).unwrap();
    fs::write(root.path().join("t2"), pattern(8000, 1)).unwrap();
    fs::write(root.path().join("t3"), pattern(100, 2)).unwrap();
    root
}

#[test]
fn test_batch_checks_full_cross_product() {
    let root = setup_batch_root();

    let report = SpotChecker::with_defaults().batch_check(root.path()).unwrap();

    assert_eq!(report.source_files, 2);
    assert_eq!(report.target_files, 3);
    assert_eq!(report.checks_performed, 6);
    assert_eq!(report.failed_checks, 0);
    assert!(!report.interrupted);

    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].source, root.path().join("SourceFiles").join("s1"));
    assert_eq!(report.matches[0].target, root.path().join("t2"));
}

#[test]
fn test_batch_report_lines() {
    let root = setup_batch_root();
    let report = SpotChecker::with_defaults().batch_check(root.path()).unwrap();

    let lines = report.report_lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Matches found. See detail results below.");
    assert_eq!(
        lines[1],
        format!(
            "SourceFile: {}\nTargetFile: {}",
            root.path().join("SourceFiles").join("s1").display(),
            root.path().join("t2").display()
        )
    );
}

#[test]
fn test_batch_reports_every_matching_pair() {
    let root = TempDir::new().unwrap();
    let sources = root.path().join("SourceFiles");
    fs::create_dir(&sources).unwrap();
    fs::write(sources.join("a"), b"same").unwrap();
    fs::write(sources.join("b"), b"same").unwrap();
    fs::write(root.path().join("x"), b"same").unwrap();
    fs::write(root.path().join("y"), b"same").unwrap();

    let report = SpotChecker::with_defaults().batch_check(root.path()).unwrap();
    assert_eq!(report.checks_performed, 4);
    assert_eq!(report.matches.len(), 4);

    // Source-major order
    let names: Vec<_> = report
        .matches
        .iter()
        .map(|m| {
            (
                m.source.file_name().unwrap().to_string_lossy().into_owned(),
                m.target.file_name().unwrap().to_string_lossy().into_owned(),
            )
        })
        .collect();
    assert_eq!(
        names,
        vec![
            ("a".to_string(), "x".to_string()),
            ("a".to_string(), "y".to_string()),
            ("b".to_string(), "x".to_string()),
            ("b".to_string(), "y".to_string()),
        ]
    );
}

#[test]
fn test_batch_without_matches() {
    let root = TempDir::new().unwrap();
    fs::create_dir(root.path().join("SourceFiles")).unwrap();
    fs::write(root.path().join("SourceFiles").join("a"), b"left").unwrap();
    fs::write(root.path().join("b"), b"right").unwrap();

    let report = SpotChecker::with_defaults().batch_check(root.path()).unwrap();
    assert_eq!(report.checks_performed, 1);
    assert!(!report.has_matches());
    assert!(report.report_lines().is_empty());
}

#[test]
fn test_batch_custom_source_dir_and_threads() {
    let root = TempDir::new().unwrap();
    let sources = root.path().join("Incoming");
    fs::create_dir(&sources).unwrap();
    fs::write(sources.join("a"), b"payload").unwrap();
    fs::write(root.path().join("a-copy"), b"payload").unwrap();

    let checker = SpotChecker::new(
        CheckerConfig::default()
            .with_source_dir("Incoming")
            .with_io_threads(1),
    );
    let report = checker.batch_check(root.path()).unwrap();
    assert_eq!(report.matches.len(), 1);
}

#[test]
fn test_batch_missing_source_dir() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("a"), b"x").unwrap();

    let err = SpotChecker::with_defaults().batch_check(root.path()).unwrap_err();
    assert!(matches!(err, BatchError::Scan(ScanError::NotFound(_))));
}

#[test]
fn test_batch_missing_root() {
    let err = SpotChecker::with_defaults()
        .batch_check(Path::new("/definitely/not/here"))
        .unwrap_err();
    assert!(matches!(err, BatchError::Scan(_)));
}

#[test]
fn test_batch_shutdown_before_start() {
    let root = setup_batch_root();
    let flag = Arc::new(AtomicBool::new(true));

    let checker = SpotChecker::new(CheckerConfig::default().with_shutdown_flag(flag));
    let report = checker.batch_check(root.path()).unwrap();
    assert!(report.interrupted);
    assert_eq!(report.checks_performed, 0);
    assert!(report.matches.is_empty());
}

struct CountingProgress {
    started: AtomicUsize,
    ticks: AtomicUsize,
    ended: AtomicBool,
}

impl ProgressCallback for CountingProgress {
    fn on_phase_start(&self, _phase: &str, total: usize) {
        self.started.store(total, Ordering::SeqCst);
    }

    fn on_progress(&self, _current: usize, _path: &str) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_phase_end(&self, _phase: &str) {
        self.ended.store(true, Ordering::SeqCst);
    }
}

#[test]
fn test_batch_progress_callback() {
    let root = setup_batch_root();
    let progress = Arc::new(CountingProgress {
        started: AtomicUsize::new(0),
        ticks: AtomicUsize::new(0),
        ended: AtomicBool::new(false),
    });

    let checker =
        SpotChecker::new(CheckerConfig::default().with_progress_callback(progress.clone()));
    checker.batch_check(root.path()).unwrap();

    assert_eq!(progress.started.load(Ordering::SeqCst), 6);
    assert_eq!(progress.ticks.load(Ordering::SeqCst), 6);
    assert!(progress.ended.load(Ordering::SeqCst));
}
