use std::ops::ControlFlow;

use crate::error::ConstraintError;
use crate::lit::Lit;
use crate::solver::SolveResult;
use crate::solver::engine::{Engine, Propagation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Polarity tried first for every decision.
    pub phase: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { phase: true }
    }
}

/// Find one complete assignment consistent with every attached constraint.
/// On `Sat` the engine is left on the model so `model_value` can be read.
pub fn solve(
    engine: &mut Engine,
    assumptions: &[Lit],
    options: SearchOptions,
) -> Result<SolveResult, ConstraintError> {
    let found = enumerate_models(engine, assumptions, options, |_| ControlFlow::Break(()))?;
    Ok(if found > 0 {
        SolveResult::Sat
    } else {
        SolveResult::Unsat
    })
}

/// Chronological DPLL over the engine: decide the first unassigned variable,
/// propagate, and flip the newest unflipped decision on conflict or after a
/// model. Every complete model is handed to `visit` exactly once. Returns the
/// number of models visited; when `visit` breaks, the engine stays on the
/// last model, otherwise it is back at level 0.
pub fn enumerate_models<F>(
    engine: &mut Engine,
    assumptions: &[Lit],
    options: SearchOptions,
    mut visit: F,
) -> Result<usize, ConstraintError>
where
    F: FnMut(&Engine) -> ControlFlow<()>,
{
    engine.backtrack_to(0);
    engine.begin_solve();
    if let Propagation::Conflict(_) = engine.propagate()? {
        return Ok(0);
    }

    engine.new_level();
    for &a in assumptions {
        if !engine.assume(a) {
            engine.backtrack_to(0);
            return Ok(0);
        }
    }
    let base = engine.decision_level();

    let mut decisions = Vec::<(Lit, bool)>::new();
    let mut visited = 0usize;
    loop {
        if let Propagation::Fixpoint = engine.propagate()? {
            match engine.first_unassigned() {
                Some(var) => {
                    let lit = Lit::new(var, options.phase);
                    engine.decide(lit);
                    decisions.push((lit, false));
                    continue;
                }
                None => {
                    visited += 1;
                    if visit(engine).is_break() {
                        return Ok(visited);
                    }
                }
            }
        }

        // flip the newest decision that has not been flipped yet
        loop {
            let Some((lit, flipped)) = decisions.pop() else {
                engine.backtrack_to(0);
                return Ok(visited);
            };
            if flipped {
                continue;
            }
            engine.backtrack_to(base + decisions.len());
            engine.decide(!lit);
            decisions.push((!lit, true));
            break;
        }
    }
}
