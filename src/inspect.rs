use crate::config;
use crate::diag::Diagnostic;
use crate::logging::ndjson::mirror_diagnostic;
use crate::records::ndjson::read_records;
use crate::status::{AggregateOutput, OperationStatus, StatusSummary, aggregate, operation_status};
use crate::tree::Event;
use crate::tree::builder::build_tree;
use anyhow::Result;
use serde_json::json;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub struct InspectCommand {
    pub records_file: PathBuf,
    pub json: bool,
    pub log: Option<PathBuf>,
}

pub struct StatusCommand {
    pub records_file: PathBuf,
    pub json: bool,
    pub config_root: Option<PathBuf>,
    pub log: Option<PathBuf>,
}

pub fn execute_inspect(cmd: InspectCommand) -> Result<()> {
    let records = read_records(&cmd.records_file)?;
    let built = build_tree(&records);
    mirror_diagnostics(cmd.log.as_deref(), &built.diagnostics)?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&built.forest)?);
    } else {
        print!("{}", render_forest(&built.forest));
    }
    Ok(())
}

pub fn execute_status(cmd: StatusCommand) -> Result<()> {
    let records = read_records(&cmd.records_file)?;
    let repo_root = cmd.config_root.unwrap_or_else(|| PathBuf::from("."));
    let repo_config = config::load_repo_config(&repo_root)?;
    let options = config::resolve_aggregate_options(repo_config.as_ref());

    let built = build_tree(&records);
    let AggregateOutput {
        summary,
        diagnostics,
    } = aggregate(&built.forest, &options);
    let status = operation_status(&records);

    mirror_diagnostics(cmd.log.as_deref(), &built.diagnostics)?;
    mirror_diagnostics(cmd.log.as_deref(), &diagnostics)?;

    if cmd.json {
        let payload = json!({
            "status": status,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", render_status(&summary, &status));
    }
    Ok(())
}

fn mirror_diagnostics(path: Option<&Path>, diagnostics: &[Diagnostic]) -> Result<()> {
    if let Some(path) = path {
        for diag in diagnostics {
            mirror_diagnostic(path, diag)?;
        }
    }
    Ok(())
}

/// Plain-text rendering of a reconstructed forest, one line per event,
/// indented by nesting depth.
pub fn render_forest(forest: &[Event]) -> String {
    let mut out = String::new();
    for event in forest {
        render_event(&mut out, event, 0);
    }
    out
}

fn render_event(out: &mut String, event: &Event, depth: usize) {
    let indent = "  ".repeat(depth);
    if event.is_in_progress() {
        let _ = writeln!(out, "{indent}{} [in progress]", event.start.step_type);
    } else {
        let _ = writeln!(
            out,
            "{indent}{} [{}] {}",
            event.start.step_type, event.end.outcome, event.end.message
        );
    }
    for child in &event.sub_events {
        render_event(out, child, depth + 1);
    }
}

pub fn render_status(summary: &StatusSummary, status: &OperationStatus) -> String {
    let mut out = String::new();
    let status_text = match status {
        OperationStatus::InProgress => "in progress".to_string(),
        OperationStatus::Finished(outcome) => outcome.clone(),
    };
    let _ = writeln!(out, "status: {status_text}");
    let _ = writeln!(out, "warnings: {}", summary.warning_count);
    for message in &summary.warning_messages {
        let _ = writeln!(out, "  - {message}");
    }
    let _ = writeln!(out, "errors: {}", summary.error_count);
    for message in &summary.error_messages {
        let _ = writeln!(out, "  - {message}");
    }
    out
}
