pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod runtime;

pub use application::{agent, client, coral, tooling};
pub use config::{AgentSettings, ConfigError, RuntimeMode};
pub use domain::types;
pub use infrastructure::model;
pub use runtime::{StartupError, run};

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber once. `RUST_LOG` overrides the default
/// `info` level.
pub fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
