// Environment loading tests - .env merging and required-key validation
//
// These tests mutate the process environment, so every test is #[serial].

use jfrog_coral_core::config::{
    ConfigError, ProcessEnv, RuntimeMode, load_env_file, load_settings, missing_keys,
};
use jfrog_coral_core::constants::{self as keys, REQUIRED_KEYS};
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const ALL_KEYS: &[&str] = &[
    keys::MODEL_API_KEY,
    keys::API_KEY,
    keys::MODEL_NAME,
    keys::MODEL_PROVIDER,
    keys::MODEL_TEMPERATURE,
    keys::MODEL_MAX_TOKENS,
    keys::MODEL_TOKEN,
    keys::MODEL_BASE_URL,
    keys::JFROG_ACCESS_TOKEN,
    keys::JFROG_URL,
    keys::JFROG_MCP_COMMAND,
    keys::JFROG_MCP_ARGS,
    keys::JFROG_LOCAL_TOOLS,
    keys::CORAL_SSE_URL,
    keys::CORAL_AGENT_ID,
    keys::CORAL_AGENT_DESCRIPTION,
    keys::CORAL_TIMEOUT_SECS,
];

const COMPLETE_ENV: &str = r#"
MODEL_API_KEY=sk-test
MODEL_NAME=gpt-4.1
MODEL_PROVIDER=openai
JFROG_ACCESS_TOKEN=jfrog-token
JFROG_URL=https://example.jfrog.io
CORAL_SSE_URL=http://localhost:5555/devmode/exampleApplication/privkey/session1/sse
CORAL_AGENT_ID=jfrog_agent
"#;

/// Removes every agent variable for the duration of a test.
struct CleanEnv;

impl CleanEnv {
    fn new() -> Self {
        clear();
        CleanEnv
    }
}

impl Drop for CleanEnv {
    fn drop(&mut self) {
        clear();
    }
}

fn clear() {
    for key in ALL_KEYS {
        // SAFETY: tests touching the environment run serially.
        unsafe { std::env::remove_var(key) };
    }
}

fn write_env(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(".env");
    fs::write(&path, content).expect("write .env");
    (dir, path)
}

#[test]
#[serial]
fn complete_env_file_produces_settings() {
    let _env = CleanEnv::new();
    let (_dir, path) = write_env(COMPLETE_ENV);

    let loaded = load_env_file(Some(&path)).expect("env file loads");
    assert_eq!(loaded.as_deref(), Some(path.as_path()));

    let settings = load_settings(&ProcessEnv, RuntimeMode::Dev).expect("settings valid");
    assert_eq!(settings.model.model, "gpt-4.1");
    assert_eq!(settings.model.provider, "openai");
    assert_eq!(settings.model.api_key.expose(), "sk-test");
    assert_eq!(settings.model.max_tokens, 4000);
    assert_eq!(settings.jfrog.url, "https://example.jfrog.io");
    assert_eq!(settings.coral.agent_id, "jfrog_agent");
}

#[test]
#[serial]
fn existing_variables_are_not_overridden() {
    let _env = CleanEnv::new();
    // SAFETY: serial test.
    unsafe { std::env::set_var(keys::MODEL_NAME, "llama3.1") };
    let (_dir, path) = write_env(COMPLETE_ENV);

    load_env_file(Some(&path)).unwrap();
    let settings = load_settings(&ProcessEnv, RuntimeMode::Dev).unwrap();
    assert_eq!(settings.model.model, "llama3.1");
}

#[test]
#[serial]
fn each_missing_required_key_prevents_startup() {
    for removed in REQUIRED_KEYS {
        let _env = CleanEnv::new();
        let (_dir, path) = write_env(COMPLETE_ENV);
        load_env_file(Some(&path)).unwrap();
        // SAFETY: serial test.
        unsafe { std::env::remove_var(removed) };

        let err = load_settings(&ProcessEnv, RuntimeMode::Dev).unwrap_err();
        assert!(
            matches!(err, ConfigError::Missing { key } if key == *removed),
            "expected {removed} to be reported, got {err}"
        );
        assert_eq!(missing_keys(&ProcessEnv), vec![*removed]);
    }
}

#[test]
#[serial]
fn legacy_api_key_alias_is_accepted() {
    let _env = CleanEnv::new();
    let (_dir, path) = write_env(&COMPLETE_ENV.replace("MODEL_API_KEY=", "API_KEY="));
    load_env_file(Some(&path)).unwrap();

    let settings = load_settings(&ProcessEnv, RuntimeMode::Dev).unwrap();
    assert_eq!(settings.model.api_key.expose(), "sk-test");
}

#[test]
#[serial]
fn explicit_env_file_must_exist() {
    let _env = CleanEnv::new();
    let err = load_env_file(Some(Path::new("/nonexistent/agent.env"))).unwrap_err();
    assert!(matches!(err, ConfigError::EnvFile { .. }));
}

#[test]
#[serial]
fn secrets_never_appear_in_debug_output() {
    let _env = CleanEnv::new();
    let (_dir, path) = write_env(COMPLETE_ENV);
    load_env_file(Some(&path)).unwrap();

    let settings = load_settings(&ProcessEnv, RuntimeMode::Dev).unwrap();
    let rendered = format!("{settings:?}");
    assert!(!rendered.contains("sk-test"));
    assert!(!rendered.contains("jfrog-token"));
}
