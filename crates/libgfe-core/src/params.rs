//! Run parameters: the plain-data half of the configuration
//!
//! Every recognised parameter has a canonical name (see [`ParamName`]) and a
//! setter that enforces its domain. Setters never touch the field when they
//! reject a value.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ConfigurationError, Result};

/// Default random seed shared by all experiments
pub const DEFAULT_SEED: u64 = 5_051_789;

/// Default interval between snapshot rebuilds in the aging workload
pub const DEFAULT_BUILD_FREQUENCY: Duration = Duration::from_millis(5 * 60 * 1000);

/// Default budget per benchmark operation, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 3600;

/// Category of worker threads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadsType {
    Read,
    Write,
    Total,
}

impl FromStr for ThreadsType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "read" => Ok(ThreadsType::Read),
            "write" => Ok(ThreadsType::Write),
            "total" => Ok(ThreadsType::Total),
            other => Err(ConfigurationError::UnknownParameter(format!(
                "threads type '{}'",
                other
            ))),
        }
    }
}

/// Names of the parameters accepted by [`crate::Configuration::initialise`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamName {
    Library,
    Graph,
    Directed,
    Undirected,
    UpdateLog,
    ThreadsRead,
    ThreadsWrite,
    Repetitions,
    Timeout,
    Seed,
    MaxWeight,
    AgingCoeff,
    EfVertices,
    EfEdges,
    BuildFrequency,
    Validate,
    Database,
}

impl ParamName {
    pub const ALL: [ParamName; 17] = [
        ParamName::Library,
        ParamName::Graph,
        ParamName::Directed,
        ParamName::Undirected,
        ParamName::UpdateLog,
        ParamName::ThreadsRead,
        ParamName::ThreadsWrite,
        ParamName::Repetitions,
        ParamName::Timeout,
        ParamName::Seed,
        ParamName::MaxWeight,
        ParamName::AgingCoeff,
        ParamName::EfVertices,
        ParamName::EfEdges,
        ParamName::BuildFrequency,
        ParamName::Validate,
        ParamName::Database,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamName::Library => "library",
            ParamName::Graph => "graph",
            ParamName::Directed => "directed",
            ParamName::Undirected => "undirected",
            ParamName::UpdateLog => "update-log",
            ParamName::ThreadsRead => "threads-read",
            ParamName::ThreadsWrite => "threads-write",
            ParamName::Repetitions => "repetitions",
            ParamName::Timeout => "timeout",
            ParamName::Seed => "seed",
            ParamName::MaxWeight => "max-weight",
            ParamName::AgingCoeff => "aging-coeff",
            ParamName::EfVertices => "ef-vertices",
            ParamName::EfEdges => "ef-edges",
            ParamName::BuildFrequency => "build-frequency",
            ParamName::Validate => "validate",
            ParamName::Database => "database",
        }
    }
}

impl FromStr for ParamName {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self> {
        // `path` is the historical alias of `graph`; underscores are accepted
        // so parameter files can use TOML-style keys.
        let normalised = s.trim().replace('_', "-");
        if normalised == "path" {
            return Ok(ParamName::Graph);
        }
        ParamName::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == normalised)
            .ok_or_else(|| ConfigurationError::UnknownParameter(s.to_string()))
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed run parameters with their documented defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    build_frequency: Duration,
    coeff_aging: f64,
    ef_vertices: f64,
    ef_edges: f64,
    graph_directed: bool,
    library_name: String,
    max_weight: f64,
    num_repetitions: u64,
    num_threads_read: usize,
    num_threads_write: usize,
    path_graph_to_load: PathBuf,
    seed: u64,
    timeout_seconds: u64,
    update_log: PathBuf,
    validate_output: bool,
    database_path: PathBuf,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            build_frequency: DEFAULT_BUILD_FREQUENCY,
            coeff_aging: 0.0,
            ef_vertices: 1.0,
            ef_edges: 1.0,
            graph_directed: true,
            library_name: String::new(),
            max_weight: 1.0,
            num_repetitions: 5,
            num_threads_read: 1,
            num_threads_write: 1,
            path_graph_to_load: PathBuf::new(),
            seed: DEFAULT_SEED,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            update_log: PathBuf::new(),
            validate_output: false,
            database_path: PathBuf::new(),
        }
    }
}

impl Parameters {
    /// Parse `value` and hand it to the setter of `name`
    pub(crate) fn apply(&mut self, name: ParamName, value: &str) -> Result<()> {
        let key = name.as_str();
        match name {
            ParamName::Library => self.set_library_name(value),
            ParamName::Graph => self.set_graph(value),
            ParamName::Directed => {
                self.set_directed(parse_bool(key, value)?);
                Ok(())
            }
            ParamName::Undirected => {
                self.set_directed(!parse_bool(key, value)?);
                Ok(())
            }
            ParamName::UpdateLog => {
                self.set_update_log(value);
                Ok(())
            }
            ParamName::ThreadsRead => self.set_num_threads_read(parse_num(key, value)?),
            ParamName::ThreadsWrite => self.set_num_threads_write(parse_num(key, value)?),
            ParamName::Repetitions => self.set_num_repetitions(parse_num(key, value)?),
            ParamName::Timeout => self.set_timeout(parse_num(key, value)?),
            ParamName::Seed => {
                self.set_seed(parse_num(key, value)?);
                Ok(())
            }
            ParamName::MaxWeight => self.set_max_weight(parse_num(key, value)?),
            ParamName::AgingCoeff => self.set_coeff_aging(parse_num(key, value)?),
            ParamName::EfVertices => self.set_ef_vertices(parse_num(key, value)?),
            ParamName::EfEdges => self.set_ef_edges(parse_num(key, value)?),
            ParamName::BuildFrequency => {
                self.set_build_frequency(Duration::from_millis(parse_num(key, value)?))
            }
            ParamName::Validate => {
                self.set_validate_output(parse_bool(key, value)?);
                Ok(())
            }
            ParamName::Database => {
                self.set_database_path(value);
                Ok(())
            }
        }
    }

    pub(crate) fn set_library_name(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigurationError::invalid("library", "name must not be empty"));
        }
        self.library_name = name.to_string();
        Ok(())
    }

    /// Existence of the file is checked by the graph loader, not here.
    pub(crate) fn set_graph(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ConfigurationError::invalid("graph", "path must not be empty"));
        }
        self.path_graph_to_load = path.to_path_buf();
        Ok(())
    }

    pub(crate) fn set_directed(&mut self, directed: bool) {
        self.graph_directed = directed;
    }

    pub(crate) fn set_update_log(&mut self, path: impl AsRef<Path>) {
        self.update_log = path.as_ref().to_path_buf();
    }

    pub(crate) fn set_build_frequency(&mut self, interval: Duration) -> Result<()> {
        self.build_frequency = interval;
        Ok(())
    }

    /// `0` disables the timeout.
    pub(crate) fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        self.timeout_seconds = seconds;
        Ok(())
    }

    pub(crate) fn set_coeff_aging(&mut self, value: f64) -> Result<()> {
        check_at_least("aging-coeff", value, 0.0)?;
        self.coeff_aging = value;
        Ok(())
    }

    pub(crate) fn set_ef_vertices(&mut self, value: f64) -> Result<()> {
        check_at_least("ef-vertices", value, 1.0)?;
        self.ef_vertices = value;
        Ok(())
    }

    pub(crate) fn set_ef_edges(&mut self, value: f64) -> Result<()> {
        check_at_least("ef-edges", value, 1.0)?;
        self.ef_edges = value;
        Ok(())
    }

    pub(crate) fn set_max_weight(&mut self, value: f64) -> Result<()> {
        check_at_least("max-weight", value, 0.0)?;
        self.max_weight = value;
        Ok(())
    }

    pub(crate) fn set_num_repetitions(&mut self, value: u64) -> Result<()> {
        if value < 1 {
            return Err(ConfigurationError::invalid("repetitions", "must be at least 1"));
        }
        self.num_repetitions = value;
        Ok(())
    }

    pub(crate) fn set_num_threads_read(&mut self, value: usize) -> Result<()> {
        if value < 1 {
            return Err(ConfigurationError::invalid("threads-read", "must be at least 1"));
        }
        self.num_threads_read = value;
        Ok(())
    }

    pub(crate) fn set_num_threads_write(&mut self, value: usize) -> Result<()> {
        if value < 1 {
            return Err(ConfigurationError::invalid("threads-write", "must be at least 1"));
        }
        self.num_threads_write = value;
        Ok(())
    }

    pub(crate) fn set_seed(&mut self, value: u64) {
        self.seed = value;
    }

    pub(crate) fn set_validate_output(&mut self, value: bool) {
        self.validate_output = value;
    }

    pub(crate) fn set_database_path(&mut self, path: impl AsRef<Path>) {
        self.database_path = path.as_ref().to_path_buf();
    }

    // Accessors

    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    pub fn update_log(&self) -> &Path {
        &self.update_log
    }

    pub fn is_graph_directed(&self) -> bool {
        self.graph_directed
    }

    pub fn validate_output(&self) -> bool {
        self.validate_output
    }

    /// Surplus of updates w.r.t. the final graph, as a fraction of its size
    pub fn coefficient_aging(&self) -> f64 {
        self.coeff_aging
    }

    pub fn num_repetitions(&self) -> u64 {
        self.num_repetitions
    }

    pub fn num_threads(&self, kind: ThreadsType) -> usize {
        match kind {
            ThreadsType::Read => self.num_threads_read,
            ThreadsType::Write => self.num_threads_write,
            ThreadsType::Total => self.num_threads_read.saturating_add(self.num_threads_write),
        }
    }

    pub fn path_graph(&self) -> &Path {
        &self.path_graph_to_load
    }

    /// Raw budget per operation in seconds, `0` meaning unbounded
    pub fn timeout_per_operation(&self) -> u64 {
        self.timeout_seconds
    }

    /// Budget per operation, `None` when unbounded
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn ef_vertices(&self) -> f64 {
        self.ef_vertices
    }

    pub fn ef_edges(&self) -> f64 {
        self.ef_edges
    }

    pub fn build_frequency(&self) -> Duration {
        self.build_frequency
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    /// Every parameter as `(name, value)`, in the form stored in the database
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let pairs: [(&str, String); 16] = [
            ("aging-coeff", self.coeff_aging.to_string()),
            ("build-frequency", self.build_frequency.as_millis().to_string()),
            ("database", self.database_path.display().to_string()),
            ("directed", self.graph_directed.to_string()),
            ("ef-edges", self.ef_edges.to_string()),
            ("ef-vertices", self.ef_vertices.to_string()),
            ("graph", self.path_graph_to_load.display().to_string()),
            ("library", self.library_name.clone()),
            ("max-weight", self.max_weight.to_string()),
            ("repetitions", self.num_repetitions.to_string()),
            ("seed", self.seed.to_string()),
            ("threads-read", self.num_threads_read.to_string()),
            ("threads-write", self.num_threads_write.to_string()),
            ("timeout", self.timeout_seconds.to_string()),
            ("update-log", self.update_log.display().to_string()),
            ("validate", self.validate_output.to_string()),
        ];
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

/// Read `(name, value)` pairs from a TOML parameter file.
///
/// The file is a flat table of scalar values, e.g. `threads_read = 4`.
/// Keys are checked against the known parameter names; values are handed
/// to [`crate::Configuration::initialise`] as strings.
pub fn load_parameter_file(path: &Path) -> Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&content)?;

    let mut pairs = Vec::with_capacity(table.len());
    for (key, value) in table {
        let name: ParamName = key.parse()?;
        let value = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            other => {
                return Err(ConfigurationError::invalid(
                    name.as_str(),
                    format!("expected a scalar value, got {}", other.type_str()),
                ))
            }
        };
        pairs.push((name.as_str().to_string(), value));
    }
    Ok(pairs)
}

fn parse_num<T>(name: &'static str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigurationError::invalid(name, format!("'{}': {}", value, e)))
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigurationError::invalid(
            name,
            format!("'{}' is not a boolean", other),
        )),
    }
}

fn check_at_least(name: &'static str, value: f64, floor: f64) -> Result<()> {
    if !value.is_finite() || value < floor {
        return Err(ConfigurationError::invalid(
            name,
            format!("must be a finite number >= {}, got {}", floor, value),
        ));
    }
    Ok(())
}
