use super::defaults::*;
use super::error::ConfigError;
use super::mode::RuntimeMode;
use super::settings::{
    AgentSettings, CoralSettings, JfrogSettings, ModelSettings, ProviderKind, Secret,
};
use super::source::EnvSource;
use crate::constants::{self as keys, ENV_PATH};
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Merges a `.env` file into the process environment without overriding
/// variables that are already set.
///
/// With `path == None` the default `.env` is optional and a missing file is not
/// an error. An explicitly named file must exist.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    let (target, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(ENV_PATH), false),
    };

    match dotenvy::from_filename(&target) {
        Ok(loaded) => {
            info!(path = %loaded.display(), "Loaded environment file");
            Ok(Some(loaded))
        }
        Err(err) if err.not_found() && !required => {
            debug!(path = %target.display(), "No environment file found, using process environment");
            Ok(None)
        }
        Err(source) => Err(ConfigError::EnvFile {
            path: target,
            source,
        }),
    }
}

/// Reads and validates every key the agent needs.
pub fn load_settings(
    source: &impl EnvSource,
    mode: RuntimeMode,
) -> Result<AgentSettings, ConfigError> {
    if let Some(key) = missing_keys(source).into_iter().next() {
        return Err(ConfigError::Missing { key });
    }

    let provider = require(source, keys::MODEL_PROVIDER)?.to_ascii_lowercase();
    let kind = ProviderKind::detect(&provider);
    let endpoint = match source.get_non_empty(keys::MODEL_BASE_URL) {
        Some(url) => {
            parse_url(keys::MODEL_BASE_URL, &url)?;
            url
        }
        None => kind.default_endpoint(&provider).to_string(),
    };

    let default_max_tokens = match mode {
        RuntimeMode::Dev => DEFAULT_DEV_MAX_TOKENS,
        RuntimeMode::Executable => DEFAULT_EXECUTABLE_MAX_TOKENS,
    };

    let model = ModelSettings {
        provider,
        kind,
        model: require(source, keys::MODEL_NAME)?,
        api_key: Secret::new(
            source
                .first_of(&[keys::MODEL_API_KEY, keys::API_KEY])
                .ok_or(ConfigError::Missing {
                    key: keys::MODEL_API_KEY,
                })?,
        ),
        temperature: parse_temperature(source)?,
        max_tokens: parse_max_tokens(source, default_max_tokens)?,
        endpoint,
    };

    let jfrog_url = require(source, keys::JFROG_URL)?;
    parse_url(keys::JFROG_URL, &jfrog_url)?;
    let mcp_args = source
        .get_non_empty(keys::JFROG_MCP_ARGS)
        .unwrap_or_else(|| DEFAULT_JFROG_MCP_ARGS.to_string())
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let jfrog = JfrogSettings {
        url: jfrog_url,
        access_token: Secret::new(require(source, keys::JFROG_ACCESS_TOKEN)?),
        mcp_command: source
            .get_non_empty(keys::JFROG_MCP_COMMAND)
            .unwrap_or_else(|| DEFAULT_JFROG_MCP_COMMAND.to_string()),
        mcp_args,
        local_tools: parse_bool(source, keys::JFROG_LOCAL_TOOLS, true)?,
    };

    let coral = CoralSettings {
        sse_url: parse_url(keys::CORAL_SSE_URL, &require(source, keys::CORAL_SSE_URL)?)?,
        agent_id: require(source, keys::CORAL_AGENT_ID)?,
        agent_description: source
            .get_non_empty(keys::CORAL_AGENT_DESCRIPTION)
            .unwrap_or_else(|| DEFAULT_AGENT_DESCRIPTION.to_string()),
        timeout: parse_timeout(source)?,
    };

    debug!(
        mode = %mode,
        provider = model.provider.as_str(),
        model = model.model.as_str(),
        temperature = model.temperature,
        max_tokens = model.max_tokens,
        jfrog_url = jfrog.url.as_str(),
        agent_id = coral.agent_id.as_str(),
        "Configuration validated"
    );

    Ok(AgentSettings {
        mode,
        model,
        jfrog,
        coral,
    })
}

/// Required keys that are unset or blank, in reporting order.
pub fn missing_keys(source: &impl EnvSource) -> Vec<&'static str> {
    keys::REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| {
            if *key == keys::MODEL_API_KEY {
                source.first_of(&[keys::MODEL_API_KEY, keys::API_KEY]).is_none()
            } else {
                source.get_non_empty(key).is_none()
            }
        })
        .collect()
}

fn require(source: &impl EnvSource, key: &'static str) -> Result<String, ConfigError> {
    source
        .get_non_empty(key)
        .ok_or(ConfigError::Missing { key })
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|err| ConfigError::invalid(key, err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::invalid(
            key,
            format!("unsupported URL scheme '{other}'"),
        )),
    }
}

fn parse_temperature(source: &impl EnvSource) -> Result<f32, ConfigError> {
    let Some(raw) = source.get_non_empty(keys::MODEL_TEMPERATURE) else {
        return Ok(DEFAULT_TEMPERATURE);
    };
    let value: f32 = raw.parse().map_err(|_| {
        ConfigError::invalid(keys::MODEL_TEMPERATURE, format!("'{raw}' is not a number"))
    })?;
    if !(0.0..=2.0).contains(&value) {
        return Err(ConfigError::invalid(
            keys::MODEL_TEMPERATURE,
            format!("{value} is outside 0.0..=2.0"),
        ));
    }
    Ok(value)
}

fn parse_max_tokens(source: &impl EnvSource, default: u32) -> Result<u32, ConfigError> {
    let Some(raw) = source.first_of(&[keys::MODEL_MAX_TOKENS, keys::MODEL_TOKEN]) else {
        return Ok(default);
    };
    match raw.parse::<u32>() {
        Ok(0) => Err(ConfigError::invalid(
            keys::MODEL_MAX_TOKENS,
            "must be greater than zero",
        )),
        Ok(value) => Ok(value),
        Err(_) => Err(ConfigError::invalid(
            keys::MODEL_MAX_TOKENS,
            format!("'{raw}' is not a positive integer"),
        )),
    }
}

fn parse_timeout(source: &impl EnvSource) -> Result<Duration, ConfigError> {
    let Some(raw) = source.get_non_empty(keys::CORAL_TIMEOUT_SECS) else {
        return Ok(DEFAULT_REQUEST_TIMEOUT);
    };
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::invalid(
            keys::CORAL_TIMEOUT_SECS,
            format!("'{raw}' is not a positive number of seconds"),
        )),
        Ok(secs) if secs <= MENTION_WAIT.as_secs() => Err(ConfigError::invalid(
            keys::CORAL_TIMEOUT_SECS,
            format!(
                "{secs}s does not outlast the {}s mention wait",
                MENTION_WAIT.as_secs()
            ),
        )),
        Ok(secs) => Ok(Duration::from_secs(secs)),
    }
}

fn parse_bool(source: &impl EnvSource, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = source.get_non_empty(key) else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, format!("'{raw}' is not a boolean"))),
    }
}
