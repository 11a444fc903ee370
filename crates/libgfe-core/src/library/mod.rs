//! Graph libraries under test and the registry that names them

mod dummy;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ConfigurationError, Result};

pub use dummy::DummyLibrary;

/// Name of the built-in reference library
pub const DUMMY_LIBRARY: &str = "dummy";

/// An edge with its weight, as handed to the library by the loaders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge {
    pub source: u64,
    pub destination: u64,
    pub weight: f64,
}

impl WeightedEdge {
    pub fn new(source: u64, destination: u64, weight: f64) -> Self {
        Self {
            source,
            destination,
            weight,
        }
    }
}

/// Common capability set of a graph library under evaluation.
///
/// Mutators return `false` when the operation had no effect (vertex already
/// present, missing endpoint, edge not found, ...).
pub trait GraphLibrary: Send {
    /// Registry name of the implementation
    fn name(&self) -> &str;

    fn is_directed(&self) -> bool;

    fn num_vertices(&self) -> u64;

    fn num_edges(&self) -> u64;

    fn has_vertex(&self, vertex: u64) -> bool;

    fn has_edge(&self, source: u64, destination: u64) -> bool;

    /// Weight of the edge, `None` if absent
    fn get_weight(&self, source: u64, destination: u64) -> Option<f64>;

    fn add_vertex(&mut self, vertex: u64) -> bool;

    /// Removes the vertex together with its incident edges
    fn remove_vertex(&mut self, vertex: u64) -> bool;

    /// Both endpoints must already exist
    fn add_edge(&mut self, edge: WeightedEdge) -> bool;

    fn remove_edge(&mut self, source: u64, destination: u64) -> bool;

    /// Materialise a new read snapshot, invoked periodically by the aging workload
    fn build(&mut self) {}
}

/// Builds a fresh library instance for the given directedness
pub type LibraryFactory = Arc<dyn Fn(bool) -> Box<dyn GraphLibrary> + Send + Sync>;

/// Lookup from library name to its factory
#[derive(Clone, Default)]
pub struct LibraryRegistry {
    factories: BTreeMap<String, LibraryFactory>,
}

impl fmt::Debug for LibraryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryRegistry")
            .field("libraries", &self.names())
            .finish()
    }
}

impl LibraryRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in libraries already present
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.factories.insert(
            DUMMY_LIBRARY.to_string(),
            Arc::new(|directed: bool| Box::new(DummyLibrary::new(directed)) as Box<dyn GraphLibrary>),
        );
        registry
    }

    /// Register a factory under `name`
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<()>
    where
        F: Fn(bool) -> Box<dyn GraphLibrary> + Send + Sync + 'static,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigurationError::invalid("library", "name must not be empty"));
        }
        if self.factories.contains_key(name) {
            return Err(ConfigurationError::DuplicateLibrary(name.to_string()));
        }
        self.factories.insert(name.to_string(), Arc::new(factory));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<LibraryFactory> {
        self.factories.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Resolve `name`, failing with the list of known libraries
    pub fn resolve(&self, name: &str) -> Result<LibraryFactory> {
        self.get(name).ok_or_else(|| ConfigurationError::UnknownLibrary {
            name: name.to_string(),
            available: self.names(),
        })
    }
}
