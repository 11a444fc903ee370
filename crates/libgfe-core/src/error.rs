use thiserror::Error;

/// Error raised by the configuration layer and its collaborators
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unknown library '{name}' (available: {})", .available.join(", "))]
    UnknownLibrary { name: String, available: Vec<String> },

    #[error("library already registered: {0}")]
    DuplicateLibrary(String),

    #[error("configuration has not been initialised")]
    NotInitialised,

    #[error("configuration has already been initialised")]
    AlreadyInitialised,

    #[error("a process-wide configuration is already installed")]
    AlreadyInstalled,

    #[error("no database configured")]
    NoDatabase,

    #[error("database busy: {0}")]
    DatabaseBusy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ConfigurationError {
    /// Shorthand for an out-of-domain parameter value
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Stable code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigurationError::UnknownParameter(_) => "unknown_parameter",
            ConfigurationError::MissingParameter(_) => "missing_parameter",
            ConfigurationError::InvalidParameter { .. } => "invalid_parameter",
            ConfigurationError::UnknownLibrary { .. } => "unknown_library",
            ConfigurationError::DuplicateLibrary(_) => "duplicate_library",
            ConfigurationError::NotInitialised => "not_initialised",
            ConfigurationError::AlreadyInitialised => "already_initialised",
            ConfigurationError::AlreadyInstalled => "already_installed",
            ConfigurationError::NoDatabase => "no_database",
            ConfigurationError::DatabaseBusy(_) => "db_busy",
            ConfigurationError::Io(_) => "io_error",
            ConfigurationError::Sled(_) => "db_error",
            ConfigurationError::Json(_) => "internal_error",
            ConfigurationError::TomlParse(_) => "invalid_parameter",
        }
    }

    /// Exit code for the driver binary
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigurationError::UnknownParameter(_)
            | ConfigurationError::MissingParameter(_)
            | ConfigurationError::InvalidParameter { .. }
            | ConfigurationError::UnknownLibrary { .. }
            | ConfigurationError::TomlParse(_) => 2,
            ConfigurationError::NoDatabase
            | ConfigurationError::DatabaseBusy(_)
            | ConfigurationError::Sled(_) => 5,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
