use crate::diag::Diagnostic;
use crate::records::{LogRecord, Outcome};
use crate::tree::Event;
use tracing::warn;

#[derive(Debug)]
pub struct BuildOutput {
    pub forest: Vec<Event>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Reconstructs the step/action/task forest implied by a flat,
/// timestamp-ordered record sequence. Single left-to-right pass; a record
/// list that is not sorted by timestamp yields an unspecified tree.
pub fn build_tree(records: &[LogRecord]) -> BuildOutput {
    let mut state = TreeBuilder::default();
    let last = records.len().saturating_sub(1);
    for (idx, record) in records.iter().enumerate() {
        state.apply(record, idx == last);
    }
    state.finish()
}

/// Cursor state carried across the pass: the forest built so far, the index
/// of the step the pass is currently inside, the index of the last action
/// appended under it, and whether that step still awaits its terminal.
#[derive(Debug, Default)]
struct TreeBuilder {
    forest: Vec<Event>,
    current_root: Option<usize>,
    current_action: Option<usize>,
    started: bool,
    diagnostics: Vec<Diagnostic>,
}

impl TreeBuilder {
    fn apply(&mut self, record: &LogRecord, is_last: bool) {
        match record.parent_id.as_deref() {
            None => self.apply_root(record, is_last),
            Some(parent_id) => self.apply_nested(record, parent_id),
        }
    }

    fn apply_root(&mut self, record: &LogRecord, is_last: bool) {
        if record.outcome() == Outcome::Started {
            // A new step opens. A previous step that never saw its terminal
            // stays behind as-is, signalling in-progress downstream.
            self.forest.push(Event::single(record));
            self.current_root = Some(self.forest.len() - 1);
            self.current_action = None;
            self.started = true;
            return;
        }

        if self.started
            && let Some(idx) = self.current_root
        {
            // Terminal for the open step: fold it into the node appended for
            // the STARTED record so the step shows up once, not twice. The
            // step stays addressable under its start record id.
            self.forest[idx].end = record.clone();
            if !is_last && record.outcome() != Outcome::Fatal {
                self.started = false;
            }
            return;
        }

        // Terminal with no open step. Inconsistent input; keep the record
        // visible as a standalone node rather than dropping it.
        warn!(
            id = %record.id,
            step_type = %record.step_type,
            "terminal record with no open step"
        );
        self.diagnostics.push(Diagnostic::UnmatchedTerminal {
            id: record.id.clone(),
            step_type: record.step_type.clone(),
        });
        self.forest.push(Event::single(record));
    }

    fn apply_nested(&mut self, record: &LogRecord, parent_id: &str) {
        if let Some(root_idx) = self.current_root {
            if self.forest[root_idx].start.id == parent_id {
                // Action directly under the current step.
                let root = &mut self.forest[root_idx];
                root.sub_events.push(Event::single(record));
                self.current_action = Some(root.sub_events.len() - 1);
                return;
            }
            if let Some(action_idx) = self.current_action
                && self.forest[root_idx].sub_events[action_idx].start.id == parent_id
            {
                // Task under the last action.
                self.forest[root_idx].sub_events[action_idx]
                    .sub_events
                    .push(Event::single(record));
                return;
            }
        }

        warn!(
            id = %record.id,
            parent_id = %parent_id,
            "nested record matches neither open step nor open action"
        );
        self.diagnostics.push(Diagnostic::OrphanRecord {
            id: record.id.clone(),
            parent_id: parent_id.to_string(),
        });
    }

    fn finish(self) -> BuildOutput {
        BuildOutput {
            forest: self.forest,
            diagnostics: self.diagnostics,
        }
    }
}
