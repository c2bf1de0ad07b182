use tracing::{debug, trace};

use crate::constraint::{Constraint, ConstraintId};
use crate::error::ConstraintError;
use crate::lit::{Lit, Value};
use crate::solver::SolverStats;
use crate::trail::{PropagationContext, Trail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub constraint: ConstraintId,
    pub lit: Lit,
    /// A literal the constraint tried to force but found already false.
    pub refused: Option<Lit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Fixpoint,
    Conflict(Conflict),
}

/// Trail plus a registry of pluggable constraints, driven to fixpoint after
/// every assignment.
pub struct Engine {
    trail: Trail,
    constraints: Vec<Box<dyn Constraint>>,
    watches: Vec<Vec<ConstraintId>>,
    pending_attach: Vec<(ConstraintId, Lit)>,
    conflict: Option<Conflict>,
    stats: SolverStats,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            trail: Trail::new(),
            constraints: Vec::new(),
            watches: vec![Vec::new(); 2],
            pending_attach: Vec::new(),
            conflict: None,
            stats: SolverStats::default(),
        }
    }

    pub fn new_var(&mut self) -> u32 {
        let v = self.trail.new_var();
        self.watches.resize(Lit::pos(v).code() + 1, Vec::new());
        v
    }

    pub fn num_vars(&self) -> usize {
        self.trail.num_vars()
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn value(&self, lit: Lit) -> Value {
        self.trail.value(lit)
    }

    pub fn model_value(&self, var: u32) -> Option<bool> {
        self.trail.var_value(var).as_bool()
    }

    pub fn decision_level(&self) -> usize {
        self.trail.decision_level()
    }

    pub fn stats(&self) -> SolverStats {
        self.stats
    }

    pub fn conflict(&self) -> Option<Conflict> {
        self.conflict
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&dyn Constraint> {
        self.constraints.get(id.0).map(|c| c.as_ref())
    }

    pub(crate) fn begin_solve(&mut self) {
        self.stats.solve_calls += 1;
    }

    /// Register a constraint. Only allowed at decision level 0; variables
    /// already fixed there are loaded into the constraint and its first
    /// propagation is scheduled.
    pub fn add_constraint(&mut self, mut constraint: Box<dyn Constraint>) -> Result<ConstraintId, ConstraintError> {
        if self.decision_level() > 0 {
            return Err(ConstraintError::AttachAboveRoot {
                level: self.decision_level(),
            });
        }
        let watchers = constraint.watchers();
        for lit in &watchers {
            if lit.var == 0 || lit.var as usize > self.num_vars() {
                return Err(ConstraintError::UnknownVariable {
                    name: constraint.name().to_owned(),
                    var: lit.var,
                    num_vars: self.num_vars(),
                });
            }
        }

        let id = ConstraintId(self.constraints.len());
        let mut ctx = PropagationContext::new(&mut self.trail, id);
        if let Err(err) = constraint.load_state(&mut ctx) {
            // `id` is handed out again on the next attach
            self.trail.forget_constraint(id);
            return Err(err);
        }
        for lit in watchers {
            let list = &mut self.watches[lit.code()];
            if !list.contains(&id) {
                list.push(id);
            }
        }

        let latest = self
            .trail
            .propagated()
            .iter()
            .rev()
            .find(|lit| self.watches[lit.code()].contains(&id))
            .copied();
        if let Some(lit) = latest {
            self.pending_attach.push((id, lit));
        }

        debug!(constraint = constraint.name(), id = id.0, "attached constraint");
        self.constraints.push(constraint);
        Ok(id)
    }

    pub fn assume(&mut self, lit: Lit) -> bool {
        self.trail.enqueue(lit, None)
    }

    pub fn decide(&mut self, lit: Lit) -> bool {
        self.trail.new_level();
        self.stats.decisions += 1;
        trace!(lit = ?lit, level = self.decision_level(), "decide");
        self.trail.enqueue(lit, None)
    }

    pub fn new_level(&mut self) {
        self.trail.new_level();
    }

    pub fn first_unassigned(&self) -> Option<u32> {
        self.trail.first_unassigned()
    }

    pub fn propagate(&mut self) -> Result<Propagation, ConstraintError> {
        if let Some(conflict) = self.conflict {
            return Ok(Propagation::Conflict(conflict));
        }

        while let Some((id, p)) = self.pending_attach.pop() {
            if let Some(conflict) = self.run(id, p)? {
                return Ok(self.record(conflict));
            }
        }

        while let Some(p) = self.trail.next_pending() {
            self.stats.propagations += 1;
            let code = p.code();
            for i in 0..self.watches[code].len() {
                let id = self.watches[code][i];
                if let Some(conflict) = self.run(id, p)? {
                    return Ok(self.record(conflict));
                }
            }
        }
        Ok(Propagation::Fixpoint)
    }

    fn run(&mut self, id: ConstraintId, p: Lit) -> Result<Option<Conflict>, ConstraintError> {
        let constraint = &mut self.constraints[id.0];
        let mut ctx = PropagationContext::new(&mut self.trail, id);
        trace!(constraint = constraint.name(), lit = ?p, "propagate");
        if constraint.propagate(&mut ctx, p)? {
            return Ok(None);
        }
        Ok(Some(Conflict {
            constraint: id,
            lit: p,
            refused: ctx.refused(),
        }))
    }

    fn record(&mut self, conflict: Conflict) -> Propagation {
        self.stats.conflicts += 1;
        debug!(
            constraint = self.constraints[conflict.constraint.0].name(),
            lit = ?conflict.lit,
            level = self.decision_level(),
            "conflict"
        );
        self.conflict = Some(conflict);
        Propagation::Conflict(conflict)
    }

    /// Undo every level above `level`, telling constraints about each
    /// unassigned variable they registered for, newest assignment first.
    pub fn backtrack_to(&mut self, level: usize) {
        if level >= self.decision_level() {
            return;
        }
        for gone in self.trail.backtrack_to(level) {
            for id in gone.notify {
                self.constraints[id.0].undo(gone.lit);
            }
        }
        self.conflict = None;
        let trail = &self.trail;
        self.pending_attach
            .retain(|&(_, lit)| trail.value(lit) == Value::True);
    }

    /// Antecedents of a forced literal, or `None` for decisions and
    /// unassigned variables.
    pub fn reason(&self, lit: Lit) -> Result<Option<Vec<Lit>>, ConstraintError> {
        let Some(id) = self.trail.reason(lit.var) else {
            return Ok(None);
        };
        let p = if self.trail.value(lit) == Value::True { lit } else { !lit };
        self.constraints[id.0].calc_reason(&self.trail, p).map(Some)
    }

    pub fn reason_clause(&self, lit: Lit) -> Result<Option<Vec<Lit>>, ConstraintError> {
        let Some(reason) = self.reason(lit)? else {
            return Ok(None);
        };
        let p = if self.trail.value(lit) == Value::True { lit } else { !lit };
        let mut clause = Vec::with_capacity(reason.len() + 1);
        clause.push(p);
        clause.extend(reason.into_iter().map(|r| !r));
        Ok(Some(clause))
    }

    /// A clause falsified by the current assignment that explains the pending
    /// conflict.
    pub fn conflict_clause(&self) -> Result<Option<Vec<Lit>>, ConstraintError> {
        let Some(conflict) = self.conflict else {
            return Ok(None);
        };
        let reason = self.constraints[conflict.constraint.0].calc_reason(&self.trail, conflict.lit)?;
        let mut clause = Vec::with_capacity(reason.len() + 2);
        clause.push(!conflict.lit);
        clause.extend(reason.into_iter().map(|r| !r));
        if let Some(refused) = conflict.refused {
            if !clause.iter().any(|l| l.var == refused.var) {
                clause.push(refused);
            }
        }
        Ok(Some(clause))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
