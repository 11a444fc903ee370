//! Process-wide access to the configuration
//!
//! The driver builds and initialises its [`Configuration`] in `main` and hands
//! `Arc` clones to the subsystems it spawns. Code that cannot be reached that
//! way reads the instance published here.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::Configuration;
use crate::error::{ConfigurationError, Result};

static CONFIGURATION: OnceCell<Arc<Configuration>> = OnceCell::new();

/// Publish `config` as the configuration of this process.
///
/// Fails with `AlreadyInstalled` if an instance was published before,
/// including the default one created by an early [`configuration`] call.
pub fn install(config: Configuration) -> Result<Arc<Configuration>> {
    let config = Arc::new(config);
    CONFIGURATION
        .set(Arc::clone(&config))
        .map_err(|_| ConfigurationError::AlreadyInstalled)?;
    Ok(config)
}

/// The configuration of this process.
///
/// If nothing has been installed yet, a default configuration is published
/// and returned; every later call sees that same instance.
pub fn configuration() -> Arc<Configuration> {
    Arc::clone(CONFIGURATION.get_or_init(|| Arc::new(Configuration::default())))
}

/// Whether a configuration has been published
pub fn is_installed() -> bool {
    CONFIGURATION.get().is_some()
}
