use anyhow::{Result, bail};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::Graph;

/// Erdős–Rényi G(n, p) with a reproducible seed.
pub fn random_graph(num_vertices: usize, p: f64, seed: u64) -> Result<Graph> {
    if !(0.0..=1.0).contains(&p) {
        bail!("edge probability must be in [0,1], got {}", p);
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for u in 0..num_vertices {
        for v in (u + 1)..num_vertices {
            if rng.random::<f64>() < p {
                edges.push((u, v));
            }
        }
    }
    Ok(Graph::from_edges(num_vertices, &edges)?)
}
