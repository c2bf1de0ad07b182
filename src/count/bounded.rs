use std::ops::ControlFlow;

use anyhow::Result;

use crate::lit::Lit;
use crate::solver::engine::Engine;
use crate::solver::search::{SearchOptions, enumerate_models};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedCount {
    pub count: usize,
    pub hit_cap: bool,
}

/// Count complete models under `assumptions`, stopping once the count
/// exceeds `cap`. The engine is returned to level 0 either way.
pub fn count_models_bounded(engine: &mut Engine, assumptions: &[Lit], cap: usize) -> Result<BoundedCount> {
    let mut count = 0usize;
    let mut hit_cap = false;
    enumerate_models(engine, assumptions, SearchOptions::default(), |_| {
        count += 1;
        if count > cap {
            hit_cap = true;
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;
    engine.backtrack_to(0);
    Ok(BoundedCount { count, hit_cap })
}
