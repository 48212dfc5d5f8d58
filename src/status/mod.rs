use crate::diag::Diagnostic;
use crate::records::{LogRecord, Outcome};
use crate::tree::Event;
use serde::Serialize;
use tracing::warn;

pub const DEFAULT_OPERATION_MARKER: &str = "PROCESS_SIP_UNITARY";
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Knobs for [`aggregate`]. `operation_marker` names the synthetic terminal
/// record type that carries the whole-operation result and must not be
/// counted as a sub-step; `max_depth` bounds the sub-event walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOptions {
    pub operation_marker: String,
    pub max_depth: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        AggregateOptions {
            operation_marker: DEFAULT_OPERATION_MARKER.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub warning_count: usize,
    pub error_count: usize,
    pub warning_messages: Vec<String>,
    pub error_messages: Vec<String>,
}

#[derive(Debug)]
pub struct AggregateOutput {
    pub summary: StatusSummary,
    pub diagnostics: Vec<Diagnostic>,
}

/// Counts warning- and error-outcome leaves across the forest and collects
/// their messages in depth-first, left-to-right order. A node with children
/// defers entirely to its children; a childless node is classified by its
/// own end record.
pub fn aggregate(forest: &[Event], options: &AggregateOptions) -> AggregateOutput {
    let mut summary = StatusSummary::default();
    let mut diagnostics = Vec::new();
    for event in forest {
        if !event.sub_events.is_empty() {
            walk_sub_events(event, options, &mut summary, &mut diagnostics);
        } else if event.end.step_type != options.operation_marker {
            classify(&event.end, &mut summary);
        }
    }
    AggregateOutput {
        summary,
        diagnostics,
    }
}

fn walk_sub_events(
    event: &Event,
    options: &AggregateOptions,
    summary: &mut StatusSummary,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Iterative depth-first walk; push children in reverse so the leftmost
    // child is classified first and message order stays stable.
    let mut stack: Vec<(&Event, usize)> = Vec::new();
    for child in event.sub_events.iter().rev() {
        stack.push((child, 1));
    }
    let mut capped = false;
    while let Some((node, depth)) = stack.pop() {
        if node.sub_events.is_empty() {
            classify(&node.end, summary);
            continue;
        }
        if depth >= options.max_depth {
            capped = true;
            continue;
        }
        for child in node.sub_events.iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    if capped {
        warn!(cap = options.max_depth, "sub-event walk hit depth cap");
        diagnostics.push(Diagnostic::DepthCapExceeded {
            cap: options.max_depth,
        });
    }
}

fn classify(record: &LogRecord, summary: &mut StatusSummary) {
    match record.outcome() {
        Outcome::Warning => {
            summary.warning_count += 1;
            summary.warning_messages.push(record.message.clone());
        }
        Outcome::Ko | Outcome::Fatal => {
            summary.error_count += 1;
            summary.error_messages.push(record.message.clone());
        }
        Outcome::Ok | Outcome::Started | Outcome::Other => {}
    }
}

/// Overall outcome of one operation, derived from its flat record list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "outcome")]
pub enum OperationStatus {
    InProgress,
    Finished(String),
}

/// The operation is finished when the last record's type matches the type
/// of the record that started it; its outcome is then the operation's
/// status. An empty record list reads as a lost logbook and fails closed.
pub fn terminal_status(operation_type: &str, records: &[LogRecord]) -> OperationStatus {
    match records.last() {
        None => OperationStatus::Finished("KO".to_string()),
        Some(last) if last.step_type == operation_type => {
            OperationStatus::Finished(last.outcome.clone())
        }
        Some(_) => OperationStatus::InProgress,
    }
}

/// [`terminal_status`] against the type of the record that opened the
/// operation, i.e. the first record of the flat list.
pub fn operation_status(records: &[LogRecord]) -> OperationStatus {
    match records.first() {
        None => terminal_status("", records),
        Some(first) => terminal_status(&first.step_type, records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::builder::build_tree;
    use chrono::{Duration, TimeZone, Utc};

    fn record(seq: i64, id: &str, parent: Option<&str>, step_type: &str, outcome: &str) -> LogRecord {
        LogRecord {
            id: id.to_string(),
            parent_id: parent.map(ToString::to_string),
            step_type: step_type.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap() + Duration::seconds(seq),
            outcome: outcome.to_string(),
            detail: None,
            message: format!("{step_type} {outcome}"),
        }
    }

    #[test]
    fn step_with_children_defers_to_children() {
        let records = vec![
            record(0, "1", None, "STP_A", "STARTED"),
            record(1, "2", Some("1"), "ACT_A", "KO"),
            record(2, "1", None, "STP_A", "KO"),
        ];
        let out = build_tree(&records);
        let agg = aggregate(&out.forest, &AggregateOptions::default());
        assert_eq!(agg.summary.error_count, 1);
        assert_eq!(agg.summary.error_messages, vec!["ACT_A KO".to_string()]);
    }

    #[test]
    fn operation_marker_is_not_counted() {
        let records = vec![record(0, "1", None, DEFAULT_OPERATION_MARKER, "KO")];
        let out = build_tree(&records);
        let agg = aggregate(&out.forest, &AggregateOptions::default());
        assert_eq!(agg.summary.error_count, 0);
    }

    #[test]
    fn empty_record_list_fails_closed() {
        assert_eq!(
            terminal_status("PROCESS_SIP", &[]),
            OperationStatus::Finished("KO".to_string())
        );
    }
}
