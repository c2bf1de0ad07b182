use proptest::prelude::*;

use connprop::constraint::connectivity::{ActiveVerticesConnected, VertexState};
use connprop::constraint::{Constraint, ConstraintId};
use connprop::count::connected::{CountOptions, count_connected_subsets};
use connprop::graph::Graph;
use connprop::lit::{Lit, Value};
use connprop::trail::{PropagationContext, Trail};

const ID: ConstraintId = ConstraintId(0);

fn arb_graph() -> impl Strategy<Value = Graph> {
    (1usize..=7).prop_flat_map(|n| {
        let pairs = n * (n - 1) / 2;
        prop::collection::vec(any::<bool>(), pairs).prop_map(move |mask| {
            let mut edges = Vec::new();
            let mut k = 0;
            for u in 0..n {
                for v in (u + 1)..n {
                    if mask[k] {
                        edges.push((u, v));
                    }
                    k += 1;
                }
            }
            Graph::from_edges(n, &edges).expect("graph")
        })
    })
}

fn brute_force_count(g: &Graph) -> usize {
    let n = g.num_vertices();
    (0u32..(1 << n))
        .filter(|bits| {
            let mask = (0..n).map(|v| bits & (1 << v) != 0).collect::<Vec<_>>();
            g.is_connected_subset(&mask)
        })
        .count()
}

/// Do the active vertices sit in pieces of the non-inactive subgraph that
/// stay connected? `skip` is treated as removed.
fn active_connected(g: &Graph, states: &[VertexState], skip: Option<usize>) -> bool {
    let n = g.num_vertices();
    let open = (0..n)
        .map(|v| states[v] != VertexState::Inactive && Some(v) != skip)
        .collect::<Vec<_>>();
    let Some(start) = (0..n).find(|&v| open[v] && states[v] == VertexState::Active) else {
        return true;
    };
    let mut seen = vec![false; n];
    let mut stack = vec![start];
    seen[start] = true;
    while let Some(v) = stack.pop() {
        for &w in g.neighbors(v) {
            if open[w] && !seen[w] {
                seen[w] = true;
                stack.push(w);
            }
        }
    }
    (0..n).all(|v| !open[v] || states[v] != VertexState::Active || seen[v])
}

fn reaches_active(g: &Graph, states: &[VertexState], from: usize) -> bool {
    let mut with_from = states.to_vec();
    with_from[from] = VertexState::Active;
    active_connected(g, &with_from, None)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn count_matches_brute_force(g in arb_graph()) {
        let rep = count_connected_subsets(&g, &CountOptions::default()).expect("count");
        prop_assert!(!rep.hit_cap);
        prop_assert_eq!(rep.count, brute_force_count(&g));
    }

    #[test]
    fn full_assignment_conflicts_iff_disconnected(g in arb_graph(), bits in any::<u32>()) {
        let n = g.num_vertices();
        let mut trail = Trail::new();
        let lits = (0..n).map(|_| Lit::pos(trail.new_var())).collect::<Vec<_>>();
        let mut c = ActiveVerticesConnected::with_graph(lits.clone(), g.clone()).expect("constraint");
        let mask = (0..n).map(|v| bits & (1 << v) != 0).collect::<Vec<_>>();
        for v in 0..n {
            trail.enqueue(Lit::new(lits[v].var, mask[v]), None);
        }
        let last = Lit::new(lits[n - 1].var, mask[n - 1]);
        let mut ctx = PropagationContext::new(&mut trail, ID);
        c.load_state(&mut ctx).expect("load");
        let ok = c.propagate(&mut ctx, last).expect("propagate");
        prop_assert_eq!(ok, g.is_connected_subset(&mask));
    }

    #[test]
    fn forcing_is_sound_and_undo_is_exact(
        g in arb_graph(),
        steps in prop::collection::vec((0usize..7, any::<bool>()), 1..8),
    ) {
        let n = g.num_vertices();
        let mut trail = Trail::new();
        let lits = (0..n).map(|_| Lit::pos(trail.new_var())).collect::<Vec<_>>();
        let mut c = ActiveVerticesConnected::with_graph(lits.clone(), g.clone()).expect("constraint");
        let initial = c.states().to_vec();

        for (v, active) in steps {
            let lit = Lit::new(lits[v % n].var, active);
            if trail.value(lit) != Value::Undef {
                continue;
            }
            trail.new_level();
            let before = trail.assigned().len();
            trail.enqueue(lit, None);
            let mut ctx = PropagationContext::new(&mut trail, ID);
            let ok = c.propagate(&mut ctx, lit).expect("propagate");
            let states = c.states().to_vec();

            if !ok {
                let refused = ctx.refused().is_some();
                prop_assert!(refused || !active_connected(&g, &states, None));
                break;
            }
            prop_assert!(active_connected(&g, &states, None));

            for &forced in &trail.assigned()[before + 1..] {
                let u = (forced.var - 1) as usize;
                prop_assert_eq!(states[u], VertexState::Undecided);
                if forced.sign {
                    prop_assert!(!active_connected(&g, &states, Some(u)));
                } else {
                    prop_assert!(!reaches_active(&g, &states, u));
                }
            }
        }

        for gone in trail.backtrack_to(0) {
            if gone.notify.contains(&ID) {
                c.undo(gone.lit);
            }
        }
        prop_assert_eq!(c.states(), initial.as_slice());
    }
}
