pub mod defaults;
pub mod error;
pub mod loader;
pub mod mode;
pub mod server;
pub mod settings;
pub mod source;

pub use error::ConfigError;
pub use loader::{load_env_file, load_settings, missing_keys};
pub use mode::RuntimeMode;
pub use server::{ServerConfig, ServerTransport};
pub use settings::{AgentSettings, CoralSettings, JfrogSettings, ModelSettings, ProviderKind, Secret};
pub use source::{EnvSource, OptionsMap, ProcessEnv};
