//! Fallback region extraction: when union/polygonize produces no usable
//! faces (e.g. a single dangling-free loop with no crossing lines),
//! enumerate the planar graph's fundamental cycle basis instead and
//! polygonize each cycle directly.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use core_model::Point;

use crate::graph::PlanarGraph;

const MAX_CYCLE_LENGTH: usize = 50;

/// Fundamental cycles of the graph's spanning forest: for each non-tree
/// edge, the cycle formed by that edge plus the tree path between its
/// endpoints. Mirrors `networkx.cycle_basis`'s algorithm (DFS spanning
/// tree + one cycle per back edge), filtered to length <= 50.
pub fn cycle_basis_faces(graph: &PlanarGraph) -> Vec<Vec<Point>> {
    if graph.edges.is_empty() {
        return Vec::new();
    }

    let mut pg: UnGraph<(), ()> = UnGraph::new_undirected();
    let nodes: Vec<NodeIndex> = (0..graph.points.len()).map(|_| pg.add_node(())).collect();
    for edge in &graph.edges {
        pg.add_edge(nodes[edge.a], nodes[edge.b], ());
    }

    let mut visited = vec![false; graph.points.len()];
    let mut parent: Vec<Option<usize>> = vec![None; graph.points.len()];
    let mut cycles: Vec<Vec<usize>> = Vec::new();

    for start in 0..graph.points.len() {
        if visited[start] {
            continue;
        }
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(node) = stack.pop() {
            for edge_ref in pg.edges(nodes[node]) {
                let other = if edge_ref.source() == nodes[node] { edge_ref.target() } else { edge_ref.source() };
                let other_idx = other.index();
                if Some(other_idx) == parent[node] {
                    continue;
                }
                if !visited[other_idx] {
                    visited[other_idx] = true;
                    parent[other_idx] = Some(node);
                    stack.push(other_idx);
                } else if let Some(cycle) = build_cycle(&parent, node, other_idx) {
                    if cycle.len() >= 3 && cycle.len() <= MAX_CYCLE_LENGTH {
                        cycles.push(cycle);
                    }
                }
            }
        }
    }

    cycles
        .into_iter()
        .map(|cycle| cycle.into_iter().map(|id| graph.points[id]).collect())
        .collect()
}

/// Reconstruct the cycle formed by the back-edge `(from, to)` plus the tree
/// paths from each endpoint up to their lowest common ancestor.
fn build_cycle(parent: &[Option<usize>], from: usize, to: usize) -> Option<Vec<usize>> {
    let path_to_root = |mut node: usize| -> Vec<usize> {
        let mut path = vec![node];
        while let Some(p) = parent[node] {
            path.push(p);
            node = p;
        }
        path
    };

    let path_a = path_to_root(from);
    let path_b = path_to_root(to);
    let set_b: std::collections::HashSet<usize> = path_b.iter().copied().collect();

    let lca_pos_a = path_a.iter().position(|n| set_b.contains(n))?;
    let lca = path_a[lca_pos_a];
    let lca_pos_b = path_b.iter().position(|n| *n == lca)?;

    let mut cycle: Vec<usize> = path_a[..=lca_pos_a].to_vec();
    cycle.extend(path_b[..lca_pos_b].iter().rev());
    Some(cycle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{EntityType, Segment};

    #[test]
    fn closed_square_yields_one_cycle() {
        let segments = vec![
            Segment::new((0.0, 0.0).into(), (10.0, 0.0).into(), "a", EntityType::Line),
            Segment::new((10.0, 0.0).into(), (10.0, 10.0).into(), "a", EntityType::Line),
            Segment::new((10.0, 10.0).into(), (0.0, 10.0).into(), "a", EntityType::Line),
            Segment::new((0.0, 10.0).into(), (0.0, 0.0).into(), "a", EntityType::Line),
        ];
        let graph = PlanarGraph::build(&segments);
        let cycles = cycle_basis_faces(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 4);
    }

    #[test]
    fn open_chain_has_no_cycle() {
        let segments = vec![
            Segment::new((0.0, 0.0).into(), (10.0, 0.0).into(), "a", EntityType::Line),
            Segment::new((10.0, 0.0).into(), (10.0, 10.0).into(), "a", EntityType::Line),
        ];
        let graph = PlanarGraph::build(&segments);
        assert!(cycle_basis_faces(&graph).is_empty());
    }
}
