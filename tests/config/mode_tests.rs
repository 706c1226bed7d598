// Dev and executable mode must produce the same agent from the same values.
//
// Executable mode receives its configuration as an injected options map; dev
// mode reads the same values from the environment after .env is merged.
// Apart from the mode itself and the max-token default, the resulting
// settings are identical.

use jfrog_coral_core::config::{OptionsMap, RuntimeMode, ServerTransport, load_settings};
use jfrog_coral_core::constants as keys;
use jfrog_coral_core::runtime::detect_mode;

fn injected_options() -> OptionsMap {
    OptionsMap::new()
        .with(keys::MODEL_API_KEY, "sk-test")
        .with(keys::MODEL_NAME, "gpt-4.1")
        .with(keys::MODEL_PROVIDER, "openai")
        .with(keys::JFROG_ACCESS_TOKEN, "jfrog-token")
        .with(keys::JFROG_URL, "https://example.jfrog.io")
        .with(keys::CORAL_SSE_URL, "http://coral:5555/sse/v1/app/privkey/session1")
        .with(keys::CORAL_AGENT_ID, "jfrog_agent")
}

#[test]
fn orchestrator_runtime_selects_executable_mode() {
    let options = injected_options().with(keys::ORCHESTRATION_RUNTIME, "executable");
    assert_eq!(detect_mode(&options), RuntimeMode::Executable);
    assert_eq!(detect_mode(&injected_options()), RuntimeMode::Dev);
}

#[test]
fn dev_and_executable_settings_are_equivalent() {
    let options = injected_options().with(keys::MODEL_MAX_TOKENS, "6000");

    let dev = load_settings(&options, RuntimeMode::Dev).unwrap();
    let executable = load_settings(&options, RuntimeMode::Executable).unwrap();

    assert_eq!(dev.model, executable.model);
    assert_eq!(dev.jfrog, executable.jfrog);
    assert_eq!(dev.coral, executable.coral);
    assert_eq!(dev.servers(), executable.servers());
}

#[test]
fn max_token_default_depends_on_mode() {
    let dev = load_settings(&injected_options(), RuntimeMode::Dev).unwrap();
    let executable = load_settings(&injected_options(), RuntimeMode::Executable).unwrap();
    assert_eq!(dev.model.max_tokens, 4000);
    assert_eq!(executable.model.max_tokens, 8000);
}

#[test]
fn coral_url_carries_agent_identity() {
    let settings = load_settings(&injected_options(), RuntimeMode::Executable).unwrap();
    let url = settings.coral.connection_url();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs[0], ("agentId".to_string(), "jfrog_agent".to_string()));
    assert_eq!(pairs[1].0, "agentDescription");
}

#[test]
fn jfrog_server_receives_credentials_as_environment() {
    let settings = load_settings(&injected_options(), RuntimeMode::Executable).unwrap();
    let server = settings.jfrog_server();
    let ServerTransport::Stdio { command, args, env, .. } = server.transport else {
        panic!("jfrog server must use stdio");
    };
    assert_eq!(command.to_string_lossy(), "npm");
    assert_eq!(args, vec!["exec", "-y", "github:jfrog/mcp-jfrog"]);
    assert_eq!(env.get(keys::JFROG_ACCESS_TOKEN).map(String::as_str), Some("jfrog-token"));
    assert_eq!(env.get(keys::JFROG_URL).map(String::as_str), Some("https://example.jfrog.io"));
}
