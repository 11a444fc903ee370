//! Error types for gfe-driver

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Config(#[from] libgfe_core::ConfigurationError),
}

impl DriverError {
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::Config(e) => e.exit_code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DriverError>;
