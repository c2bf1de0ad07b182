pub mod dimacs;
pub mod random;

use std::collections::VecDeque;

use crate::error::ConstraintError;

/// Fixed undirected simple graph over vertices `0..n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    adj: Vec<Vec<usize>>,
    num_edges: usize,
}

impl Graph {
    /// Self-loops are dropped and parallel edges merged: neither changes which
    /// vertex sets are connected, and each DFS child must appear once per
    /// adjacency list.
    pub fn from_edges(num_vertices: usize, edges: &[(usize, usize)]) -> Result<Self, ConstraintError> {
        let mut adj = vec![Vec::new(); num_vertices];
        for &(u, v) in edges {
            if u >= num_vertices || v >= num_vertices {
                return Err(ConstraintError::EdgeOutOfRange { u, v, num_vertices });
            }
            if u == v {
                continue;
            }
            adj[u].push(v);
            adj[v].push(u);
        }
        let mut num_edges = 0usize;
        for list in &mut adj {
            list.sort_unstable();
            list.dedup();
            num_edges += list.len();
        }
        Ok(Self {
            adj,
            num_edges: num_edges / 2,
        })
    }

    pub fn num_vertices(&self) -> usize {
        self.adj.len()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.adj[v]
    }

    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(u, list)| list.iter().filter(move |&&v| u < v).map(move |&v| (u, v)))
    }

    /// BFS reference check: do the vertices flagged in `mask` induce a
    /// connected subgraph? The empty set counts as connected; a mask of the
    /// wrong length never does.
    pub fn is_connected_subset(&self, mask: &[bool]) -> bool {
        if mask.len() != self.num_vertices() {
            return false;
        }
        let Some(start) = mask.iter().position(|&b| b) else {
            return true;
        };
        let mut seen = vec![false; self.num_vertices()];
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(v) = queue.pop_front() {
            for &w in &self.adj[v] {
                if mask[w] && !seen[w] {
                    seen[w] = true;
                    queue.push_back(w);
                }
            }
        }
        mask.iter().zip(&seen).all(|(&m, &s)| !m || s)
    }
}
