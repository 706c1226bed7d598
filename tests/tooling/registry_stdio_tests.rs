// Tool registry tests against a scripted stdio MCP server.
//
// The server is a small `sh` loop that answers initialize, tools/list and
// tools/call with canned JSON-RPC frames.

#![cfg(unix)]

use jfrog_coral_core::config::{ServerConfig, ServerTransport};
use jfrog_coral_core::tooling::{
    LOCAL_SERVER_NAME, LocalToolSet, ToolCatalogue, ToolInvokeError, ToolRegistry,
    ToolServerInterface,
};
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

const FAKE_JFROG_SERVER: &str = r##"
while IFS= read -r line; do
  id=$(printf '%s' "$line" | sed -n 's/.*"id":"\([^"]*\)".*/\1/p')
  case "$line" in
    *'"method":"initialize"'*)
      printf '{"jsonrpc":"2.0","id":"%s","result":{"protocolVersion":"2025-06-18","capabilities":{"tools":{}},"serverInfo":{"name":"fake-jfrog","version":"1.0.0"},"instructions":"Use exact repository keys."}}\n' "$id"
      ;;
    *'"method":"tools/list"'*)
      printf '{"jsonrpc":"2.0","id":"%s","result":{"tools":[{"name":"jfrog_list_repositories","description":"List repositories","inputSchema":{"type":"object","properties":{"type":{"type":"string"}}}},{"name":"jfrog_set_folder_property","inputSchema":{"type":"object","properties":{"props":{"$ref":"#/definitions/Props"}}}}]}}\n' "$id"
      ;;
    *'"method":"tools/call"'*)
      printf '{"jsonrpc":"2.0","id":"%s","result":{"content":[{"type":"text","text":"3 repositories"}],"isError":false}}\n' "$id"
      ;;
  esac
done
"##;

fn fake_server(name: &str, script: &str) -> ServerConfig {
    ServerConfig {
        name: name.to_string(),
        transport: ServerTransport::Stdio {
            command: PathBuf::from("sh"),
            args: vec!["-c".to_string(), script.to_string()],
            env: HashMap::new(),
        },
        timeout: Duration::from_secs(10),
    }
}

#[tokio::test]
async fn connects_lists_and_calls_tools_over_stdio() {
    let registry = ToolRegistry::connect(&[fake_server("jfrog", FAKE_JFROG_SERVER)])
        .await
        .expect("fake server connects");
    assert!(registry.is_connected("jfrog"));

    let tools = registry.list_tools("jfrog").await.unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(
        registry.server_instructions("jfrog").await.as_deref(),
        Some("Use exact repository keys.")
    );

    let result = registry
        .invoke_tool("jfrog", "jfrog_list_repositories", json!({"type": "local"}))
        .await
        .unwrap();
    assert_eq!(result["content"][0]["text"], "3 repositories");

    registry.shutdown().await;
    assert!(!registry.is_connected("jfrog"));
}

#[tokio::test]
async fn catalogue_excludes_tools_with_schema_references() {
    let registry = ToolRegistry::connect(&[fake_server("jfrog", FAKE_JFROG_SERVER)])
        .await
        .unwrap()
        .with_local_tools(LocalToolSet::standard());

    let catalogue = ToolCatalogue::discover(&registry, &["jfrog", LOCAL_SERVER_NAME])
        .await
        .unwrap();

    assert_eq!(
        catalogue.names(),
        vec![
            "jfrog_list_repositories",
            "build_project",
            "upload_to_jfrog",
            "jfrog_scan_project"
        ]
    );
    assert_eq!(catalogue.rejected.len(), 1);
    assert_eq!(catalogue.rejected[0].name, "jfrog_set_folder_property");
    registry.shutdown().await;
}

#[tokio::test]
async fn unknown_server_is_not_configured() {
    let registry = ToolRegistry::connect(&[]).await.unwrap();
    let err = registry
        .invoke_tool("jfrog", "jfrog_list_repositories", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolInvokeError::NotConfigured { .. }));
}

#[tokio::test]
async fn missing_server_binary_is_fatal() {
    let config = ServerConfig {
        name: "jfrog".to_string(),
        transport: ServerTransport::Stdio {
            command: PathBuf::from("/nonexistent/mcp-jfrog"),
            args: Vec::new(),
            env: HashMap::new(),
        },
        timeout: Duration::from_secs(1),
    };
    let err = ToolRegistry::connect(&[config]).await.err().expect("spawn fails");
    assert!(matches!(err, ToolInvokeError::Spawn { .. }));
    assert!(err.is_connectivity());
}

#[tokio::test]
async fn server_exiting_during_handshake_is_fatal() {
    let err = ToolRegistry::connect(&[fake_server("jfrog", "exit 0")])
        .await
        .err()
        .expect("handshake fails");
    assert!(matches!(
        err,
        ToolInvokeError::Terminated { .. }
            | ToolInvokeError::Transport { .. }
            | ToolInvokeError::Timeout { .. }
    ));
}
