//! Closed-face tracing over the planar graph: the rotational-system
//! technique used by planar-graph polygonizers (e.g. JTS's
//! `PolygonizeGraph`) — at each node, outgoing half-edges are sorted by
//! angle, and a face is traced by always turning onto the edge immediately
//! before the arrival edge in that sorted order. Every directed half-edge
//! belongs to exactly one traced face, so this partitions the graph into
//! bounded interior faces (traced counter-clockwise) and one unbounded
//! "outer" trace per connected component (traced clockwise).

use std::collections::HashSet;

use core_model::Point;

use crate::graph::PlanarGraph;

#[derive(Clone, Copy)]
struct AdjEntry {
    edge_id: usize,
    other: usize,
    angle: f64,
}

/// Directed half-edge: `edge_id` plus which endpoint it departs from.
type HalfEdge = (usize, bool);

fn endpoints(graph: &PlanarGraph, he: HalfEdge) -> (usize, usize) {
    let edge = &graph.edges[he.0];
    if he.1 {
        (edge.a, edge.b)
    } else {
        (edge.b, edge.a)
    }
}

fn build_adjacency(graph: &PlanarGraph) -> Vec<Vec<AdjEntry>> {
    let mut adjacency: Vec<Vec<AdjEntry>> = vec![Vec::new(); graph.points.len()];
    for (edge_id, edge) in graph.edges.iter().enumerate() {
        let pa = graph.points[edge.a];
        let pb = graph.points[edge.b];
        adjacency[edge.a].push(AdjEntry {
            edge_id,
            other: edge.b,
            angle: (pb.y - pa.y).atan2(pb.x - pa.x),
        });
        adjacency[edge.b].push(AdjEntry {
            edge_id,
            other: edge.a,
            angle: (pa.y - pb.y).atan2(pa.x - pb.x),
        });
    }
    for entries in &mut adjacency {
        entries.sort_by(|a, b| a.angle.partial_cmp(&b.angle).unwrap());
    }
    adjacency
}

fn next_half_edge(graph: &PlanarGraph, adjacency: &[Vec<AdjEntry>], arrived_at: usize, via_edge: usize) -> Option<HalfEdge> {
    let entries = &adjacency[arrived_at];
    let pos = entries.iter().position(|e| e.edge_id == via_edge)?;
    let prev = entries[(pos + entries.len() - 1) % entries.len()];
    let departs_from_a = graph.edges[prev.edge_id].a == arrived_at;
    Some((prev.edge_id, departs_from_a))
}

/// Trace every bounded face of the graph, returning closed vertex rings
/// (first point implicitly equal to the last, not repeated in the output).
pub fn trace_faces(graph: &PlanarGraph) -> Vec<Vec<Point>> {
    if graph.edges.is_empty() {
        return Vec::new();
    }
    let adjacency = build_adjacency(graph);
    let mut visited: HashSet<HalfEdge> = HashSet::new();
    let max_steps = graph.edges.len() * 2 + 4;
    let mut faces = Vec::new();

    for edge_id in 0..graph.edges.len() {
        for dir in [true, false] {
            let start: HalfEdge = (edge_id, dir);
            if visited.contains(&start) {
                continue;
            }

            let mut ring_nodes = Vec::new();
            let mut current = start;
            let mut steps = 0;
            loop {
                visited.insert(current);
                let (from, to) = endpoints(graph, current);
                ring_nodes.push(from);
                steps += 1;
                if steps > max_steps {
                    // Degenerate/malformed graph; abandon this trace rather
                    // than loop forever.
                    ring_nodes.clear();
                    break;
                }
                let next = match next_half_edge(graph, &adjacency, to, current.0) {
                    Some(n) => n,
                    None => {
                        ring_nodes.clear();
                        break;
                    }
                };
                if next == start {
                    break;
                }
                if visited.contains(&next) {
                    // A well-formed rotation system never revisits a
                    // half-edge before closing its own ring; bail out
                    // defensively if it does.
                    ring_nodes.clear();
                    break;
                }
                current = next;
            }

            if ring_nodes.len() >= 3 {
                let ring: Vec<Point> = ring_nodes.into_iter().map(|id| graph.points[id]).collect();
                faces.push(ring);
            }
        }
    }

    faces
}

fn signed_area(ring: &[Point]) -> f64 {
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Bounded interior faces come out of `trace_faces` with positive signed
/// area under this rotation convention; the per-component unbounded trace
/// comes out negative. Callers that only want interior candidates should
/// filter with this.
pub fn is_interior_face(ring: &[Point]) -> bool {
    signed_area(ring) > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{EntityType, Segment};

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new((x1, y1).into(), (x2, y2).into(), "a", EntityType::Line)
    }

    #[test]
    fn single_square_traces_one_interior_and_one_outer_face() {
        let segments = vec![
            seg(0.0, 0.0, 10.0, 0.0),
            seg(10.0, 0.0, 10.0, 10.0),
            seg(10.0, 10.0, 0.0, 10.0),
            seg(0.0, 10.0, 0.0, 0.0),
        ];
        let graph = PlanarGraph::build(&segments);
        let faces = trace_faces(&graph);
        assert_eq!(faces.len(), 2);
        let interior: Vec<&Vec<Point>> = faces.iter().filter(|f| is_interior_face(f)).collect();
        assert_eq!(interior.len(), 1);
        assert_eq!(interior[0].len(), 4);
    }
}
