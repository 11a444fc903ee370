use std::collections::{HashMap, HashSet};

use super::{GraphLibrary, WeightedEdge, DUMMY_LIBRARY};

/// In-memory reference library.
///
/// Keeps a plain vertex set and a weighted edge map. It is not meant to be
/// fast; it gives the driver something to run against when no real library
/// is linked in. Undirected edges are stored once, as (min, max).
#[derive(Debug, Default)]
pub struct DummyLibrary {
    directed: bool,
    vertices: HashSet<u64>,
    edges: HashMap<(u64, u64), f64>,
    snapshots: u64,
}

impl DummyLibrary {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            ..Self::default()
        }
    }

    /// Number of times `build` has been invoked
    pub fn snapshots_built(&self) -> u64 {
        self.snapshots
    }

    fn key(&self, source: u64, destination: u64) -> (u64, u64) {
        if self.directed || source <= destination {
            (source, destination)
        } else {
            (destination, source)
        }
    }
}

impl GraphLibrary for DummyLibrary {
    fn name(&self) -> &str {
        DUMMY_LIBRARY
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn num_vertices(&self) -> u64 {
        self.vertices.len() as u64
    }

    fn num_edges(&self) -> u64 {
        self.edges.len() as u64
    }

    fn has_vertex(&self, vertex: u64) -> bool {
        self.vertices.contains(&vertex)
    }

    fn has_edge(&self, source: u64, destination: u64) -> bool {
        self.edges.contains_key(&self.key(source, destination))
    }

    fn get_weight(&self, source: u64, destination: u64) -> Option<f64> {
        self.edges.get(&self.key(source, destination)).copied()
    }

    fn add_vertex(&mut self, vertex: u64) -> bool {
        self.vertices.insert(vertex)
    }

    fn remove_vertex(&mut self, vertex: u64) -> bool {
        if !self.vertices.remove(&vertex) {
            return false;
        }
        self.edges.retain(|&(src, dst), _| src != vertex && dst != vertex);
        true
    }

    fn add_edge(&mut self, edge: WeightedEdge) -> bool {
        if !self.has_vertex(edge.source) || !self.has_vertex(edge.destination) {
            return false;
        }
        let key = self.key(edge.source, edge.destination);
        if self.edges.contains_key(&key) {
            return false;
        }
        self.edges.insert(key, edge.weight);
        true
    }

    fn remove_edge(&mut self, source: u64, destination: u64) -> bool {
        let key = self.key(source, destination);
        self.edges.remove(&key).is_some()
    }

    fn build(&mut self) {
        self.snapshots += 1;
    }
}
