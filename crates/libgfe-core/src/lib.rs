//! Core library for gfe, the graph-library benchmark driver
//!
//! Holds the run parameters, the registry of graph libraries under test and
//! the results database.

pub mod config;
pub mod database;
pub mod error;
pub mod global;
pub mod library;
pub mod logging;
pub mod params;

pub use config::Configuration;
pub use database::Database;
pub use error::{ConfigurationError, Result};
pub use library::{DummyLibrary, GraphLibrary, LibraryFactory, LibraryRegistry, WeightedEdge};
pub use logging::{LineSink, SerializedSink};
pub use params::{load_parameter_file, ParamName, Parameters, ThreadsType};

/// Version of the driver, recorded with every saved run
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
