use std::time::Duration;

pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_DEV_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_EXECUTABLE_MAX_TOKENS: u32 = 8000;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(600);
/// How long Coral holds a `wait_for_mentions` call open. The request timeout
/// must outlast it.
pub const MENTION_WAIT: Duration = Duration::from_secs(30);

pub const DEFAULT_JFROG_MCP_COMMAND: &str = "npm";
pub const DEFAULT_JFROG_MCP_ARGS: &str = "exec -y github:jfrog/mcp-jfrog";

pub const CORAL_SERVER_NAME: &str = "coral";
pub const JFROG_SERVER_NAME: &str = "jfrog";

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_GROQ_ENDPOINT: &str = "https://api.groq.com/openai";
pub const DEFAULT_MISTRAL_ENDPOINT: &str = "https://api.mistral.ai";
pub const DEFAULT_ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com";
pub const DEFAULT_OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api";
pub const DEFAULT_TOGETHER_ENDPOINT: &str = "https://api.together.xyz";
pub const DEFAULT_DEEPSEEK_ENDPOINT: &str = "https://api.deepseek.com";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://127.0.0.1:11434";

pub const DEFAULT_AGENT_DESCRIPTION: &str = "I am an MCP-JFrog agent capable of managing and interacting with software repositories, including creating and configuring local, remote, and virtual repositories, setting properties on folders, listing repositories, builds, clusters, and environments, managing projects and permission targets, executing AQL queries, and retrieving package and vulnerability information within an Artifactory environment.";
