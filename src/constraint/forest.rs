use crate::graph::Graph;

use super::connectivity::VertexState;

/// DFS forest of the subgraph induced by the non-inactive vertices.
///
/// Working memory only: [`Forest::rebuild`] overwrites everything, and nothing
/// here means anything between two rebuilds.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    rank: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    active_mass: Vec<usize>,
    cluster: Vec<Option<usize>>,
    parent: Vec<Option<usize>>,
    roots: Vec<usize>,
    stack: Vec<(usize, usize)>,
    next_rank: usize,
}

impl Forest {
    pub fn new(num_vertices: usize) -> Self {
        Self {
            rank: vec![None; num_vertices],
            lowlink: vec![0; num_vertices],
            active_mass: vec![0; num_vertices],
            cluster: vec![None; num_vertices],
            parent: vec![None; num_vertices],
            roots: Vec::new(),
            stack: Vec::new(),
            next_rank: 0,
        }
    }

    pub fn rebuild(&mut self, graph: &Graph, states: &[VertexState]) {
        let n = graph.num_vertices();
        self.rank.clear();
        self.rank.resize(n, None);
        self.lowlink.clear();
        self.lowlink.resize(n, 0);
        self.active_mass.clear();
        self.active_mass.resize(n, 0);
        self.cluster.clear();
        self.cluster.resize(n, None);
        self.parent.clear();
        self.parent.resize(n, None);
        self.roots.clear();
        self.next_rank = 0;

        for v in 0..n {
            if states[v] != VertexState::Inactive && self.rank[v].is_none() {
                self.grow_tree(graph, states, v);
                self.roots.push(v);
            }
        }
    }

    // Iterative form of the recursive low-link DFS. A frame is (vertex, next
    // adjacency position); a child's lowlink and mass fold into its parent
    // when the child's frame is exhausted.
    fn grow_tree(&mut self, graph: &Graph, states: &[VertexState], root: usize) {
        self.enter(root, None, root, states);
        self.stack.push((root, 0));

        while let Some((v, pos)) = self.stack.pop() {
            if let Some(&w) = graph.neighbors(v).get(pos) {
                self.stack.push((v, pos + 1));
                if Some(w) == self.parent[v] || states[w] == VertexState::Inactive {
                    continue;
                }
                match self.rank[w] {
                    None => {
                        self.enter(w, Some(v), root, states);
                        self.stack.push((w, 0));
                    }
                    Some(rw) => self.lowlink[v] = self.lowlink[v].min(rw),
                }
            } else if let Some(p) = self.parent[v] {
                self.lowlink[p] = self.lowlink[p].min(self.lowlink[v]);
                self.active_mass[p] += self.active_mass[v];
            }
        }
    }

    fn enter(&mut self, v: usize, parent: Option<usize>, root: usize, states: &[VertexState]) {
        let rank = self.next_rank;
        self.next_rank += 1;
        self.rank[v] = Some(rank);
        self.lowlink[v] = rank;
        self.cluster[v] = Some(root);
        self.parent[v] = parent;
        self.active_mass[v] = usize::from(states[v] == VertexState::Active);
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Roots of trees holding at least one active vertex.
    pub fn nonempty_roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.roots
            .iter()
            .copied()
            .filter(|&r| self.active_mass[r] > 0)
    }

    pub fn rank(&self, v: usize) -> Option<usize> {
        self.rank[v]
    }

    pub fn lowlink(&self, v: usize) -> usize {
        self.lowlink[v]
    }

    pub fn active_mass(&self, v: usize) -> usize {
        self.active_mass[v]
    }

    pub fn cluster(&self, v: usize) -> Option<usize> {
        self.cluster[v]
    }

    pub fn parent(&self, v: usize) -> Option<usize> {
        self.parent[v]
    }

    /// Number of pieces still holding active mass once `v` is removed from its
    /// tree. Children whose lowlink climbs above `v` stay attached to the
    /// parent side; every other child with mass is severed on its own.
    pub fn branches_without(&self, graph: &Graph, v: usize) -> usize {
        let (Some(root), Some(rank_v)) = (self.cluster[v], self.rank[v]) else {
            return 0;
        };
        let mut parent_side = self.active_mass[root] - self.active_mass[v];
        let mut branches = 0usize;
        for &w in graph.neighbors(v) {
            if self.parent[w] != Some(v) {
                continue;
            }
            if self.lowlink[w] < rank_v {
                parent_side += self.active_mass[w];
            } else if self.active_mass[w] > 0 {
                branches += 1;
            }
        }
        if parent_side > 0 {
            branches += 1;
        }
        branches
    }
}
