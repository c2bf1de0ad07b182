use thiserror::Error;

use crate::constraint::connectivity::VertexState;
use crate::lit::Value;

/// Failures that are never part of the search itself.
///
/// A logical conflict is reported through `Ok(false)` from
/// [`crate::constraint::Constraint::propagate`]; every variant here is either a
/// malformed constraint or a broken agreement between a constraint's cached
/// view and the trail, and must not be fed into conflict analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("vertex {vertex} (var {var}) is cached as {cached:?} but the trail holds {actual:?}")]
    StateMismatch {
        vertex: usize,
        var: u32,
        cached: VertexState,
        actual: Value,
    },
    #[error("var {var} was handed to propagate but is unassigned on the trail")]
    UnassignedPropagation { var: u32 },
    #[error("{lits} vertex literals were given for a graph with {vertices} vertices")]
    VertexCountMismatch { lits: usize, vertices: usize },
    #[error("var {var} labels both vertex {first} and vertex {second}")]
    DuplicateVariable { var: u32, first: usize, second: usize },
    #[error("edge ({u}, {v}) references a vertex outside 0..{num_vertices}")]
    EdgeOutOfRange {
        u: usize,
        v: usize,
        num_vertices: usize,
    },
    #[error("constraint '{name}' watches var {var}, but only {num_vars} vars exist")]
    UnknownVariable {
        name: String,
        var: u32,
        num_vars: usize,
    },
    #[error("constraints can only be attached at decision level 0 (current level {level})")]
    AttachAboveRoot { level: usize },
}

impl ConstraintError {
    /// True for failures raised while the search was running, as opposed to
    /// rejected construction input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ConstraintError::StateMismatch { .. } | ConstraintError::UnassignedPropagation { .. }
        )
    }
}
