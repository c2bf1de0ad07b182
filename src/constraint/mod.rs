pub mod connectivity;
pub mod forest;

use crate::error::ConstraintError;
use crate::lit::Lit;
use crate::trail::{PropagationContext, Trail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub usize);

/// A propagator plugged into the trail's assign/backtrack cycle.
///
/// The host calls [`Constraint::propagate`] once for every watched literal that
/// becomes true, in trail order, before it considers propagation complete.
/// Forced literals go through [`PropagationContext::enqueue`] and are explained
/// later by [`Constraint::calc_reason`].
pub trait Constraint {
    fn name(&self) -> &str;

    /// Literals whose assignment must be reported. Queried once, at attach time.
    fn watchers(&self) -> Vec<Lit>;

    /// `p` has just become true. Returns `Ok(false)` on a logical conflict,
    /// including the case where one of this call's own `enqueue`s failed.
    fn propagate(&mut self, ctx: &mut PropagationContext<'_>, p: Lit)
        -> Result<bool, ConstraintError>;

    /// Currently true literals whose conjunction forces `p`. For a failed
    /// `propagate(p)`, the literals that together with `p` are contradictory.
    /// Never mentions `p`'s own variable.
    fn calc_reason(&self, trail: &Trail, p: Lit) -> Result<Vec<Lit>, ConstraintError>;

    /// `p`'s variable has been unassigned by backtracking. Only called for
    /// variables passed to [`PropagationContext::register_undo`].
    fn undo(&mut self, _p: Lit) {}

    /// Rebuild any cached view from the trail. Called when the constraint is
    /// attached after some of its variables were already fixed.
    fn load_state(&mut self, _ctx: &mut PropagationContext<'_>) -> Result<(), ConstraintError> {
        Ok(())
    }
}
