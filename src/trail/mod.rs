use crate::constraint::ConstraintId;
use crate::lit::{Lit, Value};

/// Chronological assignment record with decision levels.
///
/// Variables are 1-based; slot 0 of every per-variable table is unused.
#[derive(Debug, Clone)]
pub struct Trail {
    values: Vec<Value>,
    levels: Vec<usize>,
    reasons: Vec<Option<ConstraintId>>,
    undo_lists: Vec<Vec<ConstraintId>>,
    assigned: Vec<Lit>,
    level_starts: Vec<usize>,
    qhead: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unassigned {
    pub lit: Lit,
    pub notify: Vec<ConstraintId>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            values: vec![Value::Undef],
            levels: vec![0],
            reasons: vec![None],
            undo_lists: vec![Vec::new()],
            assigned: Vec::new(),
            level_starts: Vec::new(),
            qhead: 0,
        }
    }

    pub fn new_var(&mut self) -> u32 {
        self.values.push(Value::Undef);
        self.levels.push(0);
        self.reasons.push(None);
        self.undo_lists.push(Vec::new());
        (self.values.len() - 1) as u32
    }

    pub fn num_vars(&self) -> usize {
        self.values.len() - 1
    }

    pub fn var_value(&self, var: u32) -> Value {
        self.values
            .get(var as usize)
            .copied()
            .unwrap_or(Value::Undef)
    }

    pub fn value(&self, lit: Lit) -> Value {
        let v = self.var_value(lit.var);
        if lit.sign { v } else { !v }
    }

    pub fn level(&self, var: u32) -> Option<usize> {
        if self.var_value(var).is_assigned() {
            self.levels.get(var as usize).copied()
        } else {
            None
        }
    }

    /// The constraint that forced `var`, or `None` for decisions, assumptions
    /// and unassigned variables.
    pub fn reason(&self, var: u32) -> Option<ConstraintId> {
        if self.var_value(var).is_assigned() {
            self.reasons.get(var as usize).copied().flatten()
        } else {
            None
        }
    }

    pub fn decision_level(&self) -> usize {
        self.level_starts.len()
    }

    pub fn assigned(&self) -> &[Lit] {
        &self.assigned
    }

    pub fn is_complete(&self) -> bool {
        self.assigned.len() == self.num_vars()
    }

    pub fn first_unassigned(&self) -> Option<u32> {
        (1..self.values.len())
            .find(|&i| self.values[i] == Value::Undef)
            .map(|i| i as u32)
    }

    /// Make `lit` true. Returns false if `lit` is already false or its
    /// variable does not exist; an already-true literal is accepted unchanged.
    pub fn enqueue(&mut self, lit: Lit, reason: Option<ConstraintId>) -> bool {
        match self.value(lit) {
            Value::True => true,
            Value::False => false,
            Value::Undef => {
                let idx = lit.var as usize;
                if idx == 0 || idx >= self.values.len() {
                    return false;
                }
                self.values[idx] = Value::of(Some(lit.sign));
                self.levels[idx] = self.decision_level();
                self.reasons[idx] = reason;
                self.assigned.push(lit);
                true
            }
        }
    }

    pub fn register_undo(&mut self, var: u32, constraint: ConstraintId) {
        if let Some(list) = self.undo_lists.get_mut(var as usize) {
            if !list.contains(&constraint) {
                list.push(constraint);
            }
        }
    }

    pub fn forget_constraint(&mut self, constraint: ConstraintId) {
        for list in &mut self.undo_lists {
            list.retain(|&c| c != constraint);
        }
    }

    pub fn next_pending(&mut self) -> Option<Lit> {
        let lit = self.assigned.get(self.qhead).copied()?;
        self.qhead += 1;
        Some(lit)
    }

    pub fn propagated(&self) -> &[Lit] {
        &self.assigned[..self.qhead]
    }

    pub fn has_pending(&self) -> bool {
        self.qhead < self.assigned.len()
    }

    pub fn new_level(&mut self) {
        self.level_starts.push(self.assigned.len());
    }

    /// Unassign everything above `level`, newest first.
    pub fn backtrack_to(&mut self, level: usize) -> Vec<Unassigned> {
        if level >= self.decision_level() {
            return Vec::new();
        }
        let keep = self.level_starts[level];
        self.level_starts.truncate(level);

        let mut out = Vec::with_capacity(self.assigned.len() - keep);
        while self.assigned.len() > keep {
            let Some(lit) = self.assigned.pop() else {
                break;
            };
            let idx = lit.var as usize;
            self.values[idx] = Value::Undef;
            self.reasons[idx] = None;
            let notify = std::mem::take(&mut self.undo_lists[idx]);
            out.push(Unassigned { lit, notify });
        }
        self.qhead = self.qhead.min(keep);
        out
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::new()
    }
}

/// The host operations one `propagate` call may use, bound to the calling
/// constraint so forced literals are attributed to it.
pub struct PropagationContext<'a> {
    trail: &'a mut Trail,
    constraint: ConstraintId,
    refused: Option<Lit>,
}

impl<'a> PropagationContext<'a> {
    pub fn new(trail: &'a mut Trail, constraint: ConstraintId) -> Self {
        Self {
            trail,
            constraint,
            refused: None,
        }
    }

    pub fn constraint(&self) -> ConstraintId {
        self.constraint
    }

    pub fn trail(&self) -> &Trail {
        self.trail
    }

    pub fn value(&self, lit: Lit) -> Value {
        self.trail.value(lit)
    }

    pub fn enqueue(&mut self, lit: Lit) -> bool {
        let ok = self.trail.enqueue(lit, Some(self.constraint));
        if !ok && self.refused.is_none() {
            self.refused = Some(lit);
        }
        ok
    }

    /// First literal this call tried to force that was already false.
    pub fn refused(&self) -> Option<Lit> {
        self.refused
    }

    pub fn register_undo(&mut self, var: u32) {
        self.trail.register_undo(var, self.constraint);
    }
}
