//! Environment variable names
//!
//! Single source of truth for every key the agent reads at startup.

/// Selects dev mode (unset) or executable mode (`executable` / `docker`)
pub const ORCHESTRATION_RUNTIME: &str = "CORAL_ORCHESTRATION_RUNTIME";

pub const MODEL_API_KEY: &str = "MODEL_API_KEY";
/// Legacy alias of [`MODEL_API_KEY`]
pub const API_KEY: &str = "API_KEY";
pub const MODEL_NAME: &str = "MODEL_NAME";
pub const MODEL_PROVIDER: &str = "MODEL_PROVIDER";
pub const MODEL_TEMPERATURE: &str = "MODEL_TEMPERATURE";
pub const MODEL_MAX_TOKENS: &str = "MODEL_MAX_TOKENS";
/// Legacy alias of [`MODEL_MAX_TOKENS`]
pub const MODEL_TOKEN: &str = "MODEL_TOKEN";
pub const MODEL_BASE_URL: &str = "MODEL_BASE_URL";

pub const JFROG_ACCESS_TOKEN: &str = "JFROG_ACCESS_TOKEN";
pub const JFROG_URL: &str = "JFROG_URL";
pub const JFROG_MCP_COMMAND: &str = "JFROG_MCP_COMMAND";
pub const JFROG_MCP_ARGS: &str = "JFROG_MCP_ARGS";
pub const JFROG_LOCAL_TOOLS: &str = "JFROG_LOCAL_TOOLS";

pub const CORAL_SSE_URL: &str = "CORAL_SSE_URL";
pub const CORAL_AGENT_ID: &str = "CORAL_AGENT_ID";
pub const CORAL_AGENT_DESCRIPTION: &str = "CORAL_AGENT_DESCRIPTION";
pub const CORAL_TIMEOUT_SECS: &str = "CORAL_TIMEOUT_SECS";

/// Keys that must be present before the agent may start, in reporting order.
/// The API key is listed by its primary name; [`API_KEY`] also satisfies it.
pub const REQUIRED_KEYS: &[&str] = &[
    MODEL_API_KEY,
    MODEL_NAME,
    MODEL_PROVIDER,
    JFROG_ACCESS_TOKEN,
    JFROG_URL,
    CORAL_SSE_URL,
    CORAL_AGENT_ID,
];

/// Default local environment file read in dev mode
pub const ENV_PATH: &str = ".env";
