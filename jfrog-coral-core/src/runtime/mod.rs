//! Process start-up: pick the runtime mode, load configuration, bind the tool
//! servers and serve Coral mentions until shutdown.

mod error;

pub use error::StartupError;

use crate::application::agent::Agent;
use crate::application::client::{ChatClient, ChatParameters};
use crate::application::coral::CoralSession;
use crate::application::tooling::{
    LOCAL_SERVER_NAME, LocalToolSet, ToolCatalogue, ToolRegistry, ToolServerInterface,
};
use crate::config::defaults::JFROG_SERVER_NAME;
use crate::config::{
    AgentSettings, EnvSource, ProcessEnv, RuntimeMode, load_env_file, load_settings,
};
use crate::constants::ORCHESTRATION_RUNTIME;
use crate::model::ProviderFactory;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Reads `CORAL_ORCHESTRATION_RUNTIME` from `source`.
pub fn detect_mode(source: &impl EnvSource) -> RuntimeMode {
    RuntimeMode::from_runtime_value(source.get(ORCHESTRATION_RUNTIME).as_deref())
}

/// Resolves the settings for this process. Dev mode merges the `.env` file
/// (or `env_file`) into the environment first; executable mode only reads
/// what the orchestrator injected.
pub fn prepare(env_file: Option<&Path>) -> Result<AgentSettings, StartupError> {
    let mode = detect_mode(&ProcessEnv);
    info!(mode = mode.as_str(), "Runtime mode selected");
    if mode.reads_env_file() {
        load_env_file(env_file)?;
    } else if env_file.is_some() {
        warn!("Ignoring --env-file in executable mode");
    }
    Ok(load_settings(&ProcessEnv, mode)?)
}

/// Full start-up with Ctrl-C as the shutdown signal.
pub async fn run(env_file: Option<&Path>) -> Result<(), StartupError> {
    let settings = prepare(env_file)?;
    serve(settings, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
        }
    })
    .await
}

/// Binds every tool server and runs the Coral session until `shutdown`.
pub async fn serve(
    settings: AgentSettings,
    shutdown: impl Future<Output = ()>,
) -> Result<(), StartupError> {
    info!(
        mode = settings.mode.as_str(),
        provider = settings.model.provider.as_str(),
        model = settings.model.model.as_str(),
        agent_id = settings.coral.agent_id.as_str(),
        "Starting JFrog Coral agent"
    );

    let mut registry = ToolRegistry::connect(&settings.servers()).await?;
    let mut tool_servers = vec![JFROG_SERVER_NAME];
    if settings.jfrog.local_tools {
        registry = registry.with_local_tools(LocalToolSet::standard());
        tool_servers.push(LOCAL_SERVER_NAME);
    }
    let registry = Arc::new(registry);
    info!("Coral server and JFrog MCP connection established");

    let catalogue = match ToolCatalogue::discover(registry.as_ref(), &tool_servers).await {
        Ok(catalogue) => catalogue,
        Err(err) => {
            registry.shutdown().await;
            return Err(err.into());
        }
    };

    let provider = ProviderFactory::create(&settings.model);
    let client = Arc::new(ChatClient::new(provider, ChatParameters::from(&settings.model)));
    let bridge: Arc<dyn ToolServerInterface> = registry.clone();
    let agent = Agent::new(client, catalogue.tools, bridge.clone());

    let outcome = CoralSession::new(bridge, agent).run(shutdown).await;
    registry.shutdown().await;
    Ok(outcome?)
}
