use std::collections::HashMap;

use indexmap::IndexSet;
use tracing::debug;

use crate::error::ConstraintError;
use crate::graph::Graph;
use crate::lit::{Lit, Value};
use crate::trail::{PropagationContext, Trail};

use super::Constraint;
use super::forest::Forest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexState {
    Undecided,
    Active,
    Inactive,
}

impl VertexState {
    pub fn from_value(v: Value) -> Self {
        match v {
            Value::True => VertexState::Active,
            Value::False => VertexState::Inactive,
            Value::Undef => VertexState::Undecided,
        }
    }
}

/// Requires the vertices whose literal is true to induce one connected piece
/// of a fixed graph.
///
/// Every propagation rebuilds a DFS forest over the non-inactive vertices.
/// Two trees with active vertices are a conflict. With exactly one such tree,
/// undecided vertices outside it are forced inactive, and undecided vertices
/// inside it whose removal would separate active vertices are forced active.
#[derive(Debug, Clone)]
pub struct ActiveVerticesConnected {
    lits: Vec<Lit>,
    graph: Graph,
    var_to_vertex: HashMap<u32, usize>,
    state: Vec<VertexState>,
    forest: Forest,
}

impl ActiveVerticesConnected {
    /// `lits[i]` activates vertex `i`; `edges` index into `lits`.
    pub fn new(lits: Vec<Lit>, edges: &[(usize, usize)]) -> Result<Self, ConstraintError> {
        let graph = Graph::from_edges(lits.len(), edges)?;
        Self::with_graph(lits, graph)
    }

    /// Each variable may label at most one vertex.
    pub fn with_graph(lits: Vec<Lit>, graph: Graph) -> Result<Self, ConstraintError> {
        if lits.len() != graph.num_vertices() {
            return Err(ConstraintError::VertexCountMismatch {
                lits: lits.len(),
                vertices: graph.num_vertices(),
            });
        }
        let mut var_to_vertex = HashMap::with_capacity(lits.len());
        for (v, lit) in lits.iter().enumerate() {
            if let Some(&first) = var_to_vertex.get(&lit.var) {
                return Err(ConstraintError::DuplicateVariable {
                    var: lit.var,
                    first,
                    second: v,
                });
            }
            var_to_vertex.insert(lit.var, v);
        }
        let n = lits.len();
        Ok(Self {
            lits,
            graph,
            var_to_vertex,
            state: vec![VertexState::Undecided; n],
            forest: Forest::new(n),
        })
    }

    pub fn num_vertices(&self) -> usize {
        self.lits.len()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn states(&self) -> &[VertexState] {
        &self.state
    }

    /// Classification from the most recent propagation.
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    fn vertex_of(&self, var: u32) -> Option<usize> {
        self.var_to_vertex.get(&var).copied()
    }

    fn refresh(&mut self, ctx: &PropagationContext<'_>, var: u32) -> Result<(), ConstraintError> {
        let Some(v) = self.vertex_of(var) else {
            return Ok(());
        };
        self.state[v] = match ctx.value(self.lits[v]) {
            Value::True => VertexState::Active,
            Value::False => VertexState::Inactive,
            Value::Undef => return Err(ConstraintError::UnassignedPropagation { var }),
        };
        Ok(())
    }

    /// The literal the current classification forces for undecided vertex
    /// `v`, if any.
    fn forced_literal(&self, v: usize, root: usize) -> Option<Lit> {
        if self.forest.cluster(v) != Some(root) {
            return Some(!self.lits[v]);
        }
        if self.forest.branches_without(&self.graph, v) >= 2 {
            return Some(self.lits[v]);
        }
        None
    }
}

impl Constraint for ActiveVerticesConnected {
    fn name(&self) -> &str {
        "active-vertices-connected"
    }

    fn watchers(&self) -> Vec<Lit> {
        let mut unique = IndexSet::with_capacity(self.lits.len() * 2);
        for &lit in &self.lits {
            unique.insert(lit);
            unique.insert(!lit);
        }
        unique.into_iter().collect()
    }

    fn propagate(&mut self, ctx: &mut PropagationContext<'_>, p: Lit) -> Result<bool, ConstraintError> {
        ctx.register_undo(p.var);
        self.refresh(ctx, p.var)?;
        self.forest.rebuild(&self.graph, &self.state);

        let mut nonempty = self.forest.nonempty_roots();
        let Some(root) = nonempty.next() else {
            return Ok(true);
        };
        if let Some(other) = nonempty.next() {
            debug!(trigger = ?p, root, other, "active vertices span two components");
            return Ok(false);
        }

        for v in 0..self.lits.len() {
            if self.state[v] != VertexState::Undecided {
                continue;
            }
            let Some(forced) = self.forced_literal(v, root) else {
                continue;
            };
            debug!(vertex = v, lit = ?forced, "forcing vertex");
            if !ctx.enqueue(forced) {
                debug!(vertex = v, lit = ?forced, "forced vertex literal is already false");
                return Ok(false);
            }
        }
        Ok(true)
    }

    // Conservative: the whole current assignment of the other vertices.
    fn calc_reason(&self, trail: &Trail, p: Lit) -> Result<Vec<Lit>, ConstraintError> {
        let mut reason = Vec::new();
        for (v, (&lit, &state)) in self.lits.iter().zip(&self.state).enumerate() {
            let held = match state {
                VertexState::Active => lit,
                VertexState::Inactive => !lit,
                VertexState::Undecided => continue,
            };
            if trail.value(held) != Value::True {
                return Err(ConstraintError::StateMismatch {
                    vertex: v,
                    var: lit.var,
                    cached: state,
                    actual: trail.value(lit),
                });
            }
            if lit.var != p.var {
                reason.push(held);
            }
        }
        Ok(reason)
    }

    fn undo(&mut self, p: Lit) {
        if let Some(v) = self.vertex_of(p.var) {
            self.state[v] = VertexState::Undecided;
        }
    }

    fn load_state(&mut self, ctx: &mut PropagationContext<'_>) -> Result<(), ConstraintError> {
        for v in 0..self.lits.len() {
            let lit = self.lits[v];
            let value = ctx.value(lit);
            self.state[v] = VertexState::from_value(value);
            if value.is_assigned() {
                ctx.register_undo(lit.var);
            }
        }
        Ok(())
    }
}
