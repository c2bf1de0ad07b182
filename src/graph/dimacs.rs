use std::io::BufRead;

use anyhow::{Context, Result, bail};

use super::Graph;

/// Parsed `p edge` instance: vertex count plus 0-based edge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphInstance {
    pub num_vertices: usize,
    pub edges: Vec<(usize, usize)>,
}

impl GraphInstance {
    pub fn build(&self) -> Result<Graph> {
        Ok(Graph::from_edges(self.num_vertices, &self.edges)?)
    }
}

pub fn parse_graph_str(s: &str) -> Result<GraphInstance> {
    parse_graph_reader(std::io::Cursor::new(s.as_bytes()))
}

pub fn parse_graph_reader<R: BufRead>(r: R) -> Result<GraphInstance> {
    let mut header = None::<(usize, usize)>;
    let mut edges = Vec::<(usize, usize)>::new();

    for (idx, line) in r.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.context("failed to read graph line")?;
        let clean = line.trim();
        if clean.is_empty() || clean.starts_with('c') {
            continue;
        }

        let mut parts = clean.split_whitespace();
        match parts.next() {
            Some("p") => {
                if header.is_some() {
                    bail!("line {}: duplicate problem line", line_no);
                }
                let kind = parts.next().unwrap_or_default();
                if kind != "edge" && kind != "col" {
                    bail!("line {}: expected 'p edge', got 'p {}'", line_no, kind);
                }
                let n = parse_count(parts.next(), line_no, "vertex count")?;
                let m = parse_count(parts.next(), line_no, "edge count")?;
                header = Some((n, m));
            }
            Some("e") => {
                let Some((n, _)) = header else {
                    bail!("line {}: edge before problem line", line_no);
                };
                let u = parse_vertex(parts.next(), n, line_no)?;
                let v = parse_vertex(parts.next(), n, line_no)?;
                edges.push((u, v));
            }
            Some(other) => bail!("line {}: unknown line kind '{}'", line_no, other),
            None => {}
        }
    }

    let Some((num_vertices, declared)) = header else {
        bail!("missing 'p edge' problem line");
    };
    if declared != edges.len() {
        bail!(
            "problem line declares {} edges but {} were given",
            declared,
            edges.len()
        );
    }
    Ok(GraphInstance {
        num_vertices,
        edges,
    })
}

fn parse_count(tok: Option<&str>, line_no: usize, what: &str) -> Result<usize> {
    let tok = tok.with_context(|| format!("line {}: missing {}", line_no, what))?;
    tok.parse::<usize>()
        .with_context(|| format!("line {}: invalid {} '{}'", line_no, what, tok))
}

fn parse_vertex(tok: Option<&str>, n: usize, line_no: usize) -> Result<usize> {
    let v = parse_count(tok, line_no, "vertex")?;
    if v == 0 || v > n {
        bail!("line {}: vertex {} outside 1..={}", line_no, v, n);
    }
    Ok(v - 1)
}

pub fn to_dimacs_graph(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str(&format!("p edge {} {}\n", graph.num_vertices(), graph.num_edges()));
    for (u, v) in graph.edges() {
        out.push_str(&format!("e {} {}\n", u + 1, v + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{parse_graph_str, to_dimacs_graph};

    #[test]
    fn parse_with_comments() {
        let src = "\
c a path
p edge 3 2
e 1 2
c middle
e 2 3
";
        let inst = match parse_graph_str(src) {
            Ok(v) => v,
            Err(e) => panic!("parse failed: {e}"),
        };
        assert_eq!(inst.num_vertices, 3);
        assert_eq!(inst.edges, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn emitted_text_parses_back() {
        let inst = parse_graph_str("p edge 4 3\ne 1 2\ne 2 3\ne 4 1\n").expect("parse");
        let graph = inst.build().expect("graph");
        let again = parse_graph_str(&to_dimacs_graph(&graph)).expect("reparse");
        assert_eq!(again.build().expect("graph"), graph);
    }

    #[test]
    fn rejects_vertex_zero() {
        let err = parse_graph_str("p edge 2 1\ne 0 1\n").expect_err("must fail");
        assert!(err.to_string().contains("outside 1..=2"));
    }

    #[test]
    fn rejects_edge_count_mismatch() {
        assert!(parse_graph_str("p edge 2 2\ne 1 2\n").is_err());
    }
}
