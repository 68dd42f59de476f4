//! The planar multigraph built from cleaned-up segments: nodes are rounded
//! endpoints, edges are the segments themselves. `faces` traces it into
//! closed rings.

use std::collections::HashMap;

use core_model::{Point, Segment};

#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub a: usize,
    pub b: usize,
    pub contributor_layers: Vec<String>,
}

pub struct PlanarGraph {
    pub points: Vec<Point>,
    pub edges: Vec<GraphEdge>,
    key_to_id: HashMap<(i64, i64), usize>,
}

impl PlanarGraph {
    pub fn build(segments: &[Segment]) -> Self {
        let mut graph = PlanarGraph {
            points: Vec::new(),
            edges: Vec::new(),
            key_to_id: HashMap::new(),
        };
        for s in segments {
            if s.is_zero_length() {
                continue;
            }
            let a = graph.node_id(s.start);
            let b = graph.node_id(s.end);
            if a == b {
                continue;
            }
            graph.edges.push(GraphEdge {
                a,
                b,
                contributor_layers: s.contributor_layers.clone(),
            });
        }
        graph
    }

    fn node_id(&mut self, p: Point) -> usize {
        let key = p.rounded_key();
        if let Some(&id) = self.key_to_id.get(&key) {
            return id;
        }
        let id = self.points.len();
        self.points.push(p);
        self.key_to_id.insert(key, id);
        id
    }
}
