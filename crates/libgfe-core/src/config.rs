//! Configuration of a benchmark run
//!
//! Built with defaults, initialised once from the invocation parameters, then
//! shared read-only (typically as `Arc<Configuration>`) by every subsystem of
//! the driver. The only state materialised after initialisation is the
//! results database, opened on first use.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::database::Database;
use crate::error::{ConfigurationError, Result};
use crate::library::{GraphLibrary, LibraryFactory, LibraryRegistry};
use crate::logging::LineSink;
use crate::params::{ParamName, Parameters, ThreadsType};

/// Run-wide settings of the driver
pub struct Configuration {
    params: Parameters,
    library_factory: Option<LibraryFactory>,
    database: OnceCell<Database>,
    initialised: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            params: Parameters::default(),
            library_factory: None,
            database: OnceCell::new(),
            initialised: false,
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("params", &self.params)
            .field("library_factory", &self.library_factory.as_ref().map(|_| "<factory>"))
            .field("database", &self.database.get())
            .field("initialised", &self.initialised)
            .finish()
    }
}

impl Configuration {
    /// Configuration with the documented defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the invocation parameters and resolve the library under test.
    ///
    /// Every `(name, value)` pair goes through the setter of its parameter.
    /// Validation runs against a staged copy: on error nothing is committed
    /// and the configuration stays uninitialised. May only succeed once.
    pub fn initialise<I, K, V>(&mut self, args: I, registry: &LibraryRegistry) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if self.initialised {
            return Err(ConfigurationError::AlreadyInitialised);
        }

        let mut staged = self.params.clone();
        for (name, value) in args {
            let name: ParamName = name.as_ref().parse()?;
            staged.apply(name, value.as_ref())?;
        }

        if staged.library_name().is_empty() {
            return Err(ConfigurationError::MissingParameter("library"));
        }
        let factory = registry.resolve(staged.library_name())?;

        self.params = staged;
        self.library_factory = Some(factory);
        self.initialised = true;

        info!(
            library = self.params.library_name(),
            graph = %self.params.path_graph().display(),
            "configuration initialised"
        );
        debug!(params = ?self.params, "resolved parameters");
        Ok(())
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Fresh instance of the library under test, honouring the directedness
    pub fn generate_graph_library(&self) -> Result<Box<dyn GraphLibrary>> {
        let factory = self
            .library_factory
            .as_ref()
            .ok_or(ConfigurationError::NotInitialised)?;
        Ok(factory(self.params.is_graph_directed()))
    }

    /// Whether results are persisted
    pub fn has_database(&self) -> bool {
        !self.params.database_path().as_os_str().is_empty()
    }

    /// Handle to the results database, opened on the first call.
    ///
    /// Concurrent first calls open it once; the others wait and get the same
    /// handle.
    pub fn db(&self) -> Result<&Database> {
        if !self.has_database() {
            return Err(ConfigurationError::NoDatabase);
        }
        self.database
            .get_or_try_init(|| Database::open(self.params.database_path()))
    }

    /// Persist the parameters of this run into the database
    pub fn save_parameters(&self) -> Result<()> {
        let db = self.db()?;

        let mut params = self.params.to_pairs();
        params.push(("driver-version".to_string(), crate::VERSION.to_string()));
        params.push(("time-start".to_string(), chrono::Utc::now().to_rfc3339()));
        db.store_parameters(&params)?;
        db.flush()?;

        debug!(count = params.len(), "saved parameters");
        Ok(())
    }

    /// Print one `name: value` line per parameter
    pub fn log_summary(&self, sink: &dyn LineSink) {
        for (name, value) in self.params.to_pairs() {
            let value = if value.is_empty() { "-" } else { value.as_str() };
            sink.write_line(&format!("{}: {}", name, value));
        }
    }

    // Accessors

    pub fn library_name(&self) -> &str {
        self.params.library_name()
    }

    pub fn update_log(&self) -> &Path {
        self.params.update_log()
    }

    pub fn is_graph_directed(&self) -> bool {
        self.params.is_graph_directed()
    }

    pub fn validate_output(&self) -> bool {
        self.params.validate_output()
    }

    pub fn coefficient_aging(&self) -> f64 {
        self.params.coefficient_aging()
    }

    pub fn num_repetitions(&self) -> u64 {
        self.params.num_repetitions()
    }

    pub fn num_threads(&self, kind: ThreadsType) -> usize {
        self.params.num_threads(kind)
    }

    pub fn path_graph(&self) -> &Path {
        self.params.path_graph()
    }

    /// Seconds per operation; `0` means no timeout
    pub fn timeout_per_operation(&self) -> u64 {
        self.params.timeout_per_operation()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.params.timeout()
    }

    pub fn ef_vertices(&self) -> f64 {
        self.params.ef_vertices()
    }

    pub fn ef_edges(&self) -> f64 {
        self.params.ef_edges()
    }

    pub fn build_frequency(&self) -> Duration {
        self.params.build_frequency()
    }

    pub fn seed(&self) -> u64 {
        self.params.seed()
    }

    pub fn max_weight(&self) -> f64 {
        self.params.max_weight()
    }

    pub fn database_path(&self) -> &Path {
        self.params.database_path()
    }
}
