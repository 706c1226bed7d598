// Orchestrator descriptor tests - coral-agent.toml must declare every key the
// agent requires, so executable mode never starts with a missing option.

use jfrog_coral_core::constants::{API_KEY, REQUIRED_KEYS};
use std::fs;
use std::path::Path;

fn manifest() -> toml::Table {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("coral-agent.toml");
    let raw = fs::read_to_string(&path).expect("coral-agent.toml exists");
    raw.parse::<toml::Table>().expect("coral-agent.toml parses")
}

#[test]
fn declares_every_required_option() {
    let manifest = manifest();
    let options = manifest
        .get("options")
        .and_then(toml::Value::as_table)
        .expect("options table");

    for key in REQUIRED_KEYS {
        assert!(options.contains_key(*key), "coral-agent.toml is missing option {key}");
    }
    assert!(
        !options.contains_key(API_KEY),
        "the legacy alias should not be advertised"
    );
}

#[test]
fn executable_runtime_points_at_the_agent_binary() {
    let manifest = manifest();
    let path = manifest
        .get("runtimes")
        .and_then(|runtimes| runtimes.get("executable"))
        .and_then(|executable| executable.get("path"))
        .and_then(toml::Value::as_str)
        .expect("runtimes.executable.path");
    assert!(path.ends_with("jfrog-coral-agent"));
}

#[test]
fn agent_section_names_the_agent() {
    let manifest = manifest();
    let agent = manifest.get("agent").expect("agent table");
    assert_eq!(agent.get("name").and_then(toml::Value::as_str), Some("jfrog"));
    assert!(agent.get("description").and_then(toml::Value::as_str).is_some());
}
