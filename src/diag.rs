use thiserror::Error;

/// Inconsistencies recovered from while reconstructing or aggregating an
/// operation's event tree. None of these abort processing; they are
/// accumulated so the caller can decide whether to surface, mirror, or
/// ignore them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("record {id} references parent {parent_id} which is neither the open step nor the open action; record dropped")]
    OrphanRecord { id: String, parent_id: String },

    #[error("terminal record {id} ({step_type}) arrived with no open step; kept as standalone event")]
    UnmatchedTerminal { id: String, step_type: String },

    #[error("sub-event nesting exceeds {cap} levels; deeper events were not counted")]
    DepthCapExceeded { cap: usize },
}
