//! Purpose: Hold top-level CLI command dispatch for `frostlang`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Batch commands always print a summary, even when some files failed.
//! Invariants: A batch with failures exits with the code of its first failure.

use super::*;

use clap::CommandFactory;
use frostlang::UnsupportedValuePolicy;
use frostlang::batch::{self, BatchOptions, BatchReport, Direction, FileOutcome};
use frostlang::convert;
use frostlang::core::render::{self, Style};
use serde::Serialize;

pub(super) fn dispatch_command(
    command: Command,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "frostlang", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::ToJson(args) => {
            let options = BatchOptions {
                overwrite: args.overwrite,
                policy: UnsupportedValuePolicy::Skip,
            };
            run_batch("to-json", &args.path, Direction::LangToJson, options, color_mode)
        }
        Command::ToLang { args, strict } => {
            let policy = if strict {
                UnsupportedValuePolicy::Reject
            } else {
                UnsupportedValuePolicy::Skip
            };
            let options = BatchOptions {
                overwrite: args.overwrite,
                policy,
            };
            run_batch("to-lang", &args.path, Direction::JsonToLang, options, color_mode)
        }
        Command::Show { file } => {
            let bytes = std::fs::read(&file).map_err(|err| {
                let kind = if err.kind() == io::ErrorKind::NotFound {
                    ErrorKind::NotFound
                } else {
                    ErrorKind::Io
                };
                Error::new(kind)
                    .with_message("failed to read .lang file")
                    .with_path(&file)
                    .with_source(err)
            })?;
            let tree = convert::lang_to_tree(&bytes).map_err(|err| err.with_path(&file))?;
            let style = if color_mode.use_color(io::stdout().is_terminal()) {
                Style::Ansi
            } else {
                Style::Plain
            };
            println!("{}", render::render_styled(&tree, style));
            Ok(RunOutcome::ok())
        }
    }
}

fn run_batch(
    cmd: &str,
    path: &std::path::Path,
    direction: Direction,
    options: BatchOptions,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    let report = batch::convert_path(path, direction, options)?;

    for file in &report.files {
        let time = notice_time_now().unwrap_or_default();
        if let Some(notice) = Notice::for_file(cmd, file, time) {
            emit_notice(&notice, color_mode);
        }
    }
    for (_, err) in report.failures() {
        emit_error(err, color_mode);
    }

    emit_json(summary_json(&report));

    let exit_code = report
        .first_failure()
        .map(|err| to_exit_code(err.kind()))
        .unwrap_or(0);
    Ok(RunOutcome::with_code(exit_code))
}

#[derive(Serialize)]
struct BatchSummary {
    direction: &'static str,
    converted: Vec<ConvertedSummary>,
    skipped: Vec<SkippedSummary>,
    failed: Vec<FailedSummary>,
}

#[derive(Serialize)]
struct ConvertedSummary {
    source: String,
    target: String,
    entries: usize,
    skipped_values: usize,
}

#[derive(Serialize)]
struct SkippedSummary {
    source: String,
    reason: &'static str,
}

#[derive(Serialize)]
struct FailedSummary {
    source: String,
    kind: String,
    message: String,
}

fn summary_json(report: &BatchReport) -> Value {
    let mut summary = BatchSummary {
        direction: match report.direction {
            Direction::LangToJson => "lang-to-json",
            Direction::JsonToLang => "json-to-lang",
        },
        converted: Vec::new(),
        skipped: Vec::new(),
        failed: Vec::new(),
    };
    for file in &report.files {
        let source = file.source.display().to_string();
        match &file.outcome {
            FileOutcome::Converted {
                target,
                entries,
                skipped_values,
            } => summary.converted.push(ConvertedSummary {
                source,
                target: target.display().to_string(),
                entries: *entries,
                skipped_values: *skipped_values,
            }),
            FileOutcome::SkippedExisting { .. } => summary.skipped.push(SkippedSummary {
                source,
                reason: "exists",
            }),
            FileOutcome::SkippedPartial => summary.skipped.push(SkippedSummary {
                source,
                reason: "partial",
            }),
            FileOutcome::Failed(err) => summary.failed.push(FailedSummary {
                source,
                kind: format!("{:?}", err.kind()),
                message: error_message(err),
            }),
        }
    }
    serde_json::to_value(summary).unwrap_or_else(|_| json!({"error": "json encode failed"}))
}
