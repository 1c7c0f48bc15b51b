//! SpotCheck - Sampling-Based Duplicate File Detection
//!
//! Decides whether two files are likely duplicates without reading them in
//! full. Small files are compared exactly; large files of equal length are
//! compared at a few evenly spaced byte offsets. A batch mode checks a
//! folder of source files against the files of a root folder.

pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod sampler;
pub mod scanner;
pub mod signal;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use yansi::Paint;

use crate::checker::reference::{content_hash, hash_to_hex};
use crate::checker::{CheckResult, SpotChecker};
use crate::cli::{BatchArgs, CheckArgs, Cli, Commands, ConfigArgs, OutputFormat, PairArgs};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::json::{JsonBatchOutput, JsonCheckOutput, JsonHashOutput};
use crate::output::text;
use crate::progress::Progress;

/// Run the application for parsed command-line arguments.
///
/// Returns the exit code describing the outcome. Errors are returned for
/// configuration problems, unreadable inputs and failed output.
///
/// # Errors
///
/// Returns an error if configuration loading, a check, or writing the
/// results fails.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Check(args) => handle_check(args, config, quiet),
        Commands::Batch(args) => handle_batch(args, config, quiet),
        Commands::Micro(args) => {
            let checker = SpotChecker::new(config.checker_config());
            let result = checker
                .micro_check(&args.a, &args.b)
                .context("Micro check failed")?;
            emit_check("micro", &args, &result, None, quiet)
        }
        Commands::Meta(args) => {
            let checker = SpotChecker::new(config.checker_config());
            let result = checker
                .meta_check(&args.a, &args.b)
                .context("Metadata check failed")?;
            emit_check("meta", &args, &result, None, quiet)
        }
        Commands::Hard(args) => {
            let checker = SpotChecker::new(config.checker_config());
            let result = checker
                .hard_check(&args.a, &args.b)
                .context("Hard check failed")?;
            emit_check("hard", &args, &result, common_len(&args.a, &args.b), quiet)
        }
        Commands::Hash(args) => handle_hash(&args, quiet),
        Commands::Config(args) => handle_config(&args, cli.config.as_deref(), &config),
    }
}

fn handle_check(args: CheckArgs, mut config: Config, quiet: bool) -> anyhow::Result<ExitCode> {
    if let Some(samples) = args.samples {
        config.sample_count = usize::try_from(samples).context("Sample count is too large")?;
    }

    let checker = SpotChecker::new(config.checker_config());
    let result = checker
        .check(&args.pair.a, &args.pair.b)
        .with_context(|| {
            format!(
                "Failed to check {} against {}",
                args.pair.a.display(),
                args.pair.b.display()
            )
        })?;

    let len = common_len(&args.pair.a, &args.pair.b);
    emit_check("check", &args.pair, &result, len, quiet)
}

fn handle_batch(args: BatchArgs, mut config: Config, quiet: bool) -> anyhow::Result<ExitCode> {
    if let Some(samples) = args.samples {
        config.sample_count = usize::try_from(samples).context("Sample count is too large")?;
    }
    if let Some(name) = args.source_dir {
        config.source_dir = name;
    }
    if let Some(threads) = args.io_threads {
        config.io_threads = usize::try_from(threads).context("Thread count is too large")?;
    }
    config.validate()?;

    let handler = signal::install_handler()?;
    let mut checker_config = config.checker_config().with_shutdown_flag(handler.flag());

    let show_progress = !quiet && args.output == OutputFormat::Text;
    if show_progress {
        checker_config = checker_config.with_progress_callback(Arc::new(Progress::new()));
    }

    let report = SpotChecker::new(checker_config)
        .batch_check(&args.root)
        .with_context(|| format!("Batch check of {} failed", args.root.display()))?;

    log::info!(
        "Batch finished: {} matches in {} checks ({} failed) in {:.2?}",
        report.matches.len(),
        report.checks_performed,
        report.failed_checks,
        report.duration
    );

    let exit_code = if report.interrupted {
        ExitCode::Interrupted
    } else if report.failed_checks > 0 {
        ExitCode::PartialSuccess
    } else {
        ExitCode::from_verdict(report.has_matches())
    };

    let mut stdout = std::io::stdout().lock();
    match args.output {
        OutputFormat::Json => JsonBatchOutput::new(&report, exit_code).write_to(&mut stdout, true)?,
        OutputFormat::Text if !quiet => text::write_lines(&mut stdout, &text::batch_lines(&report))?,
        OutputFormat::Text => {}
    }

    Ok(exit_code)
}

fn handle_hash(args: &PairArgs, quiet: bool) -> anyhow::Result<ExitCode> {
    let hash_a = hash_to_hex(&content_hash(&args.a).context("Failed to hash first file")?);
    let hash_b = hash_to_hex(&content_hash(&args.b).context("Failed to hash second file")?);
    let exit_code = ExitCode::from_verdict(hash_a == hash_b);

    let mut stdout = std::io::stdout().lock();
    match args.output {
        OutputFormat::Json => {
            JsonHashOutput::new(&args.a, &args.b, hash_a, hash_b).write_to(&mut stdout, true)?;
        }
        OutputFormat::Text if !quiet => {
            let lines = text::hash_lines(&args.a, &args.b, &hash_a, &hash_b);
            text::write_lines(&mut stdout, &lines)?;
        }
        OutputFormat::Text => {}
    }

    Ok(exit_code)
}

fn handle_config(
    args: &ConfigArgs,
    explicit_path: Option<&Path>,
    config: &Config,
) -> anyhow::Result<ExitCode> {
    if args.save {
        let Some(path) = explicit_path
            .map(Path::to_path_buf)
            .or_else(Config::default_path)
        else {
            bail!("No configuration directory available; pass --config PATH");
        };
        config.save(&path)?;
        eprintln!("{} {}", "Saved".green(), path.display());
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(config.to_toml()?.as_bytes())?;
    }
    Ok(ExitCode::Success)
}

fn emit_check(
    command: &str,
    args: &PairArgs,
    result: &CheckResult,
    len: Option<u64>,
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    let exit_code = ExitCode::from_verdict(result.matched);
    log::debug!(
        "{} {} vs {}: {} ({})",
        command,
        args.a.display(),
        args.b.display(),
        result.matched,
        result.tier
    );

    let mut stdout = std::io::stdout().lock();
    match args.output {
        OutputFormat::Json => {
            JsonCheckOutput::new(command, &args.a, &args.b, result, exit_code)
                .write_to(&mut stdout, true)?;
        }
        OutputFormat::Text if !quiet => {
            text::write_lines(&mut stdout, &text::verdict_lines(result, len))?;
        }
        OutputFormat::Text => {}
    }

    Ok(exit_code)
}

/// Length shared by both files, if they have one.
fn common_len(a: &Path, b: &Path) -> Option<u64> {
    let len_a = std::fs::metadata(a).ok()?.len();
    let len_b = std::fs::metadata(b).ok()?.len();
    (len_a == len_b).then_some(len_a)
}
