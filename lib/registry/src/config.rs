//! Engine configuration.
//!
//! Policy knobs the embedding service sets through the environment, e.g.
//! `GREENLIGHT__REBIND=mark_orphaned` or `GREENLIGHT__EMPTY_ROLES=admin_only`.

use greenlight_workflow::RolePolicy;
use serde::Deserialize;

use crate::registry::RebindPolicy;

/// Engine policy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// What to do when a rebind would strand live instances.
    #[serde(default)]
    pub rebind: RebindPolicy,
    /// How empty node role lists are interpreted.
    #[serde(default)]
    pub empty_roles: RolePolicy,
}

impl EngineConfig {
    /// Loads configuration from `GREENLIGHT__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value that does not parse.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("GREENLIGHT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
