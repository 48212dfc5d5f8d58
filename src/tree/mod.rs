pub mod builder;

use crate::records::{LogRecord, Outcome};
use serde::Serialize;

/// One node of the reconstructed operation tree: a step at the root level,
/// an action one level down, a task below that. `end` equals `start` while
/// the step is still in progress or when only a single record was observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub start: LogRecord,
    pub end: LogRecord,
    pub sub_events: Vec<Event>,
}

impl Event {
    pub(crate) fn single(record: &LogRecord) -> Self {
        Event {
            start: record.clone(),
            end: record.clone(),
            sub_events: Vec::new(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.end.outcome()
    }

    /// True when no terminal record has been observed for this node yet.
    pub fn is_in_progress(&self) -> bool {
        self.start.id == self.end.id && self.end.outcome() == Outcome::Started
    }
}
