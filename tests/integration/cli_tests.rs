use clap::Parser;
use spotcheck::cli::Cli;
use spotcheck::error::ExitCode;
use spotcheck::run_app;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Workspace with an empty config file so the user's own config is never read.
struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "").unwrap();
        Self { dir, config }
    }

    fn file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<ExitCode> {
        let config = self.config.to_string_lossy().into_owned();
        let mut argv = vec!["spotcheck", "-q", "--config", config.as_str()];
        argv.extend_from_slice(args);
        run_app(Cli::try_parse_from(argv).unwrap())
    }
}

fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_check_exit_codes() {
    let ws = Workspace::new();
    let a = ws.file("a", b"same content");
    let b = ws.file("b", b"same content");
    let c = ws.file("c", b"other content");

    assert_eq!(ws.run(&["check", s(&a), s(&b)]).unwrap(), ExitCode::Success);
    assert_eq!(ws.run(&["check", s(&a), s(&c)]).unwrap(), ExitCode::NoMatch);
}

#[test]
fn test_check_json_output() {
    let ws = Workspace::new();
    let a = ws.file("a", b"abc");
    let b = ws.file("b", b"abc");

    let code = ws
        .run(&["check", s(&a), s(&b), "--samples", "3", "--output", "json"])
        .unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_check_missing_file_is_error() {
    let ws = Workspace::new();
    let a = ws.file("a", b"abc");
    let missing = ws.dir.path().join("missing");

    let err = ws.run(&["check", s(&a), s(&missing)]).unwrap_err();
    assert!(format!("{err:#}").contains("File not found") || format!("{err:#}").contains("missing"));
}

#[test]
fn test_variant_commands() {
    let ws = Workspace::new();
    let a = ws.file("left/a", b"0123456789");
    let b = ws.file("right/b", b"0123456789");

    for cmd in ["micro", "meta", "hard", "hash"] {
        assert_eq!(
            ws.run(&[cmd, s(&a), s(&b)]).unwrap(),
            ExitCode::Success,
            "{cmd}"
        );
    }
}

#[test]
fn test_hash_detects_difference() {
    let ws = Workspace::new();
    let a = ws.file("a", b"0123456789");
    let b = ws.file("b", b"0123456780");

    assert_eq!(ws.run(&["hash", s(&a), s(&b)]).unwrap(), ExitCode::NoMatch);
}

#[test]
fn test_batch_exit_codes() {
    let ws = Workspace::new();
    let root = ws.dir.path().join("root");
    fs::create_dir_all(root.join("SourceFiles")).unwrap();
    fs::write(root.join("SourceFiles").join("x"), b"alpha").unwrap();
    fs::write(root.join("y"), b"beta!").unwrap();

    assert_eq!(ws.run(&["batch", s(&root)]).unwrap(), ExitCode::NoMatch);

    fs::write(root.join("z"), b"alpha").unwrap();
    assert_eq!(
        ws.run(&["batch", s(&root), "--io-threads", "2"]).unwrap(),
        ExitCode::Success
    );
}

#[test]
fn test_batch_source_dir_override() {
    let ws = Workspace::new();
    let root = ws.dir.path().join("root");
    fs::create_dir_all(root.join("Inbox")).unwrap();
    fs::write(root.join("Inbox").join("x"), b"alpha").unwrap();
    fs::write(root.join("y"), b"alpha").unwrap();

    assert!(ws.run(&["batch", s(&root)]).is_err());
    assert_eq!(
        ws.run(&["batch", s(&root), "--source-dir", "Inbox", "--output", "json"])
            .unwrap(),
        ExitCode::Success
    );
}

#[test]
fn test_config_file_is_applied() {
    let ws = Workspace::new();
    fs::write(&ws.config, "exact_threshold = 10\n").unwrap();

    // 20-byte files differing between sample offsets only match when sampled
    let a = ws.file("a", b"aaaaaaaaaaaaaaaaaaaa");
    let b = ws.file("b", b"aaaaaaaaaXaaaaaaaaaa");
    assert_eq!(ws.run(&["check", s(&a), s(&b)]).unwrap(), ExitCode::Success);

    fs::write(&ws.config, "").unwrap();
    assert_eq!(ws.run(&["check", s(&a), s(&b)]).unwrap(), ExitCode::NoMatch);
}

#[test]
fn test_invalid_config_is_error() {
    let ws = Workspace::new();
    fs::write(&ws.config, "sample_count = 0\n").unwrap();
    let a = ws.file("a", b"abc");

    assert!(ws.run(&["check", s(&a), s(&a)]).is_err());
}

#[test]
fn test_config_save() {
    let ws = Workspace::new();
    let target = ws.dir.path().join("nested").join("saved.toml");
    let target_str = target.to_string_lossy().into_owned();

    let cli = Cli::try_parse_from(["spotcheck", "-q", "--config", &target_str, "config", "--save"])
        .unwrap();
    // An explicit config path must exist before loading
    assert!(run_app(cli).is_err());

    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(&target, "io_threads = 2\n").unwrap();
    let cli = Cli::try_parse_from(["spotcheck", "-q", "--config", &target_str, "config", "--save"])
        .unwrap();
    assert_eq!(run_app(cli).unwrap(), ExitCode::Success);

    let saved = fs::read_to_string(&target).unwrap();
    assert!(saved.contains("io_threads = 2"));
    assert!(saved.contains("sample_count = 5"));
}
