use connprop::count::bounded::count_models_bounded;
use connprop::count::connected::{
    ConnectivityModel, CountOptions, connect_terminals, count_connected_subsets,
};
use connprop::graph::Graph;
use connprop::graph::dimacs::parse_graph_str;

fn graph(n: usize, edges: &[(usize, usize)]) -> Graph {
    Graph::from_edges(n, edges).expect("graph")
}

fn cycle(n: usize) -> Graph {
    let edges = (0..n).map(|v| (v, (v + 1) % n)).collect::<Vec<_>>();
    graph(n, &edges)
}

fn count(g: &Graph) -> usize {
    count_connected_subsets(g, &CountOptions::default())
        .expect("count")
        .count
}

#[test]
fn closed_form_counts() {
    // connected subsets plus the empty set
    let path = graph(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
    assert_eq!(count(&path), 5 * 6 / 2 + 1);
    assert_eq!(count(&cycle(5)), 5 * 4 + 1 + 1);

    let k4 = graph(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    assert_eq!(count(&k4), 16);

    let star = graph(4, &[(0, 1), (0, 2), (0, 3)]);
    assert_eq!(count(&star), 8 + 3 + 1);

    assert_eq!(count(&graph(4, &[])), 5);
    assert_eq!(count(&graph(0, &[])), 1);
}

#[test]
fn cap_stops_enumeration() {
    let path = graph(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
    let rep = count_connected_subsets(
        &path,
        &CountOptions {
            cap: 5,
            ..CountOptions::default()
        },
    )
    .expect("count");
    assert!(rep.hit_cap);
    assert_eq!(rep.count, 6);
}

#[test]
fn required_and_forbidden_vertices() {
    let path = graph(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
    let ends = count_connected_subsets(
        &path,
        &CountOptions {
            required: vec![0, 4],
            ..CountOptions::default()
        },
    )
    .expect("count");
    assert_eq!(ends.count, 1);
    // everything between the ends was forced, nothing was guessed wrong
    assert_eq!(ends.stats.conflicts, 0);

    let cut = count_connected_subsets(
        &path,
        &CountOptions {
            required: vec![0],
            forbidden: vec![2],
            ..CountOptions::default()
        },
    )
    .expect("count");
    assert_eq!(cut.count, 2);

    let bad = count_connected_subsets(
        &path,
        &CountOptions {
            required: vec![1],
            forbidden: vec![1],
            ..CountOptions::default()
        },
    );
    assert!(bad.is_err());
    assert!(
        count_connected_subsets(
            &path,
            &CountOptions {
                required: vec![7],
                ..CountOptions::default()
            }
        )
        .is_err()
    );
}

#[test]
fn repeated_counts_on_one_engine_agree() {
    let mut model = ConnectivityModel::new(&cycle(4)).expect("model");
    let a = count_models_bounded(&mut model.engine, &[], 1000).expect("count");
    let b = count_models_bounded(&mut model.engine, &[], 1000).expect("count");
    assert_eq!(a, b);
    assert_eq!(a.count, 4 * 3 + 1 + 1);
    assert_eq!(model.engine.stats().solve_calls, 2);
    assert_eq!(model.engine.decision_level(), 0);
}

#[test]
fn terminals_on_a_path_take_the_whole_path() {
    let path = graph(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
    let set = connect_terminals(&path, &[0, 4], &[]).expect("solve");
    assert_eq!(set, Some(vec![0, 1, 2, 3, 4]));
}

#[test]
fn terminals_route_around_a_forbidden_vertex() {
    let set = connect_terminals(&cycle(6), &[0, 2], &[1])
        .expect("solve")
        .expect("sat");
    assert_eq!(set, vec![0, 2, 3, 4, 5]);
    let mut mask = vec![false; 6];
    for v in set {
        mask[v] = true;
    }
    assert!(cycle(6).is_connected_subset(&mask));
}

#[test]
fn terminals_in_different_components_are_unsat() {
    let g = graph(4, &[(0, 1), (2, 3)]);
    assert_eq!(connect_terminals(&g, &[0, 3], &[]).expect("solve"), None);
}

#[test]
fn count_from_dimacs_text() {
    let src = "\
c triangle with a tail
p edge 4 4
e 1 2
e 2 3
e 3 1
e 3 4
";
    let g = parse_graph_str(src).expect("parse").build().expect("graph");
    // triangle gives 7, adding vertex 4 to any set holding vertex 3 gives 4 more, plus {4} and {}
    assert_eq!(count(&g), 7 + 4 + 1 + 1);
}
