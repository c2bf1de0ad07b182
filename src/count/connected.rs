use anyhow::{Result, bail};
use tracing::info;

use crate::constraint::connectivity::ActiveVerticesConnected;
use crate::count::bounded::count_models_bounded;
use crate::graph::Graph;
use crate::lit::Lit;
use crate::solver::engine::Engine;
use crate::solver::search::{SearchOptions, solve};
use crate::solver::{SolveResult, SolverStats};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountOptions {
    pub cap: usize,
    pub required: Vec<usize>,
    pub forbidden: Vec<usize>,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self {
            cap: usize::MAX,
            required: Vec::new(),
            forbidden: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountReport {
    pub vertices: usize,
    pub edges: usize,
    pub count: usize,
    pub hit_cap: bool,
    pub stats: SolverStats,
}

/// An engine whose only constraint asks the active vertices of `graph` to be
/// connected. Vertex `i` is activated by variable `i + 1`.
pub struct ConnectivityModel {
    pub engine: Engine,
    pub vertex_lits: Vec<Lit>,
}

impl ConnectivityModel {
    pub fn new(graph: &Graph) -> Result<Self> {
        let mut engine = Engine::new();
        let vertex_lits = (0..graph.num_vertices())
            .map(|_| Lit::pos(engine.new_var()))
            .collect::<Vec<_>>();
        let constraint = ActiveVerticesConnected::with_graph(vertex_lits.clone(), graph.clone())?;
        engine.add_constraint(Box::new(constraint))?;
        Ok(Self {
            engine,
            vertex_lits,
        })
    }

    pub fn assumptions(&self, required: &[usize], forbidden: &[usize]) -> Result<Vec<Lit>> {
        let n = self.vertex_lits.len();
        let mut out = Vec::with_capacity(required.len() + forbidden.len());
        for &v in required {
            if v >= n {
                bail!("required vertex {} outside 0..{}", v, n);
            }
            if forbidden.contains(&v) {
                bail!("vertex {} is both required and forbidden", v);
            }
            out.push(self.vertex_lits[v]);
        }
        for &v in forbidden {
            if v >= n {
                bail!("forbidden vertex {} outside 0..{}", v, n);
            }
            out.push(!self.vertex_lits[v]);
        }
        Ok(out)
    }

    pub fn active_vertices(&self) -> Vec<usize> {
        self.vertex_lits
            .iter()
            .enumerate()
            .filter(|(_, lit)| self.engine.model_value(lit.var) == Some(lit.sign))
            .map(|(v, _)| v)
            .collect()
    }
}

/// Number of vertex subsets, the empty one included, that induce a connected
/// subgraph and respect the required/forbidden vertices.
pub fn count_connected_subsets(graph: &Graph, options: &CountOptions) -> Result<CountReport> {
    let mut model = ConnectivityModel::new(graph)?;
    let assumptions = model.assumptions(&options.required, &options.forbidden)?;
    let counted = count_models_bounded(&mut model.engine, &assumptions, options.cap)?;
    let stats = model.engine.stats();
    info!(
        count = counted.count,
        hit_cap = counted.hit_cap,
        decisions = stats.decisions,
        conflicts = stats.conflicts,
        "counted connected subsets"
    );
    Ok(CountReport {
        vertices: graph.num_vertices(),
        edges: graph.num_edges(),
        count: counted.count,
        hit_cap: counted.hit_cap,
        stats,
    })
}

/// A connected vertex set containing every required vertex and none of the
/// forbidden ones. Decisions try "inactive" first; the set is not guaranteed
/// to be minimal.
pub fn connect_terminals(graph: &Graph, required: &[usize], forbidden: &[usize]) -> Result<Option<Vec<usize>>> {
    let mut model = ConnectivityModel::new(graph)?;
    let assumptions = model.assumptions(required, forbidden)?;
    match solve(&mut model.engine, &assumptions, SearchOptions { phase: false })? {
        SolveResult::Sat => Ok(Some(model.active_vertices())),
        SolveResult::Unsat => Ok(None),
    }
}
