// End-to-end contract tests: a Coral mention goes through the agent loop,
// reaches the JFrog tool server, and the answer is posted back to the sender.
//
// The model is scripted and both MCP servers are in-process stand-ins, so the
// tests pin down the exact tool traffic an instruction produces.

use async_trait::async_trait;
use jfrog_coral_core::agent::Agent;
use jfrog_coral_core::client::{ChatClient, ChatParameters};
use jfrog_coral_core::coral::{CoralSession, SEND_MESSAGE, WAIT_FOR_MENTIONS};
use jfrog_coral_core::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use jfrog_coral_core::tooling::{ServerToolInfo, ToolBinding, ToolInvokeError, ToolServerInterface};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Coral and JFrog behind one bridge, recording every call.
struct FakeServers {
    mention: Mutex<Option<Value>>,
    jfrog_result: Value,
    calls: Mutex<Vec<(String, String, Value)>>,
}

impl FakeServers {
    fn new(instruction: &str, jfrog_result: Value) -> Self {
        let messages = json!({
            "messages": [{"threadId": "thread-1", "senderId": "planner_agent", "content": instruction}]
        });
        Self {
            mention: Mutex::new(Some(json!({
                "content": [{"type": "text", "text": messages.to_string()}]
            }))),
            jfrog_result,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls_to(&self, server: &str) -> Vec<(String, Value)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _, _)| called == server)
            .map(|(_, tool, args)| (tool.clone(), args.clone()))
            .collect()
    }
}

#[async_trait]
impl ToolServerInterface for FakeServers {
    async fn invoke_tool(
        &self,
        server: &str,
        tool: &str,
        arguments: Value,
    ) -> Result<Value, ToolInvokeError> {
        self.calls
            .lock()
            .unwrap()
            .push((server.to_string(), tool.to_string(), arguments));
        match (server, tool) {
            ("coral", WAIT_FOR_MENTIONS) => Ok(self
                .mention
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| json!({"content": []}))),
            ("coral", SEND_MESSAGE) => Ok(json!({"content": [{"type": "text", "text": "ok"}]})),
            ("jfrog", _) => Ok(self.jfrog_result.clone()),
            _ => Err(ToolInvokeError::NotConfigured {
                server: server.to_string(),
            }),
        }
    }

    async fn list_tools(&self, _server: &str) -> Result<Vec<ServerToolInfo>, ToolInvokeError> {
        Ok(Vec::new())
    }

    async fn server_instructions(&self, _server: &str) -> Option<String> {
        None
    }
}

struct ScriptedModel {
    replies: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().rev().map(|reply| reply.to_string()).collect()),
        }
    }
}

#[async_trait]
impl ModelProvider for ScriptedModel {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| ModelError::invalid_response("scripted", "script exhausted"))?;
        Ok(ModelResponse::new(reply, request.session_id))
    }
}

fn jfrog_tools() -> Vec<ToolBinding> {
    vec![
        ToolBinding {
            name: "jfrog_create_local_repository".into(),
            description: Some("Create a new local repository in Artifactory".into()),
            server: "jfrog".into(),
            input_schema: Some(json!({
                "type": "object",
                "properties": {
                    "key": {"type": "string"},
                    "rclass": {"type": "string", "enum": ["local"]},
                    "packageType": {"type": "string"}
                },
                "required": ["key", "packageType"]
            })),
        },
        ToolBinding {
            name: "jfrog_list_repositories".into(),
            description: Some("List repositories".into()),
            server: "jfrog".into(),
            input_schema: Some(json!({"type": "object"})),
        },
    ]
}

fn session(servers: Arc<FakeServers>, replies: &[&str]) -> CoralSession<ScriptedModel> {
    let client = Arc::new(ChatClient::new(
        ScriptedModel::new(replies),
        ChatParameters {
            model: "gpt-4.1".into(),
            temperature: 0.3,
            max_tokens: 8000,
        },
    ));
    let agent = Agent::new(client, jfrog_tools(), servers.clone());
    CoralSession::new(servers, agent)
}

#[tokio::test]
async fn maven_repository_instruction_makes_one_matching_call() {
    let servers = Arc::new(FakeServers::new(
        "Create a local maven repository with key my-maven-local",
        json!({"content": [{"type": "text", "text": "Repository created"}], "isError": false}),
    ));
    let session = session(
        servers.clone(),
        &[
            r#"{"action":"call_tool","tool":"jfrog_create_local_repository","input":{"key":"my-maven-local","rclass":"local","packageType":"maven"}}"#,
            r#"{"action":"final","response":"Created local maven repository my-maven-local."}"#,
        ],
    );

    assert_eq!(session.poll_once().await.unwrap(), 1);

    let jfrog_calls = servers.calls_to("jfrog");
    assert_eq!(jfrog_calls.len(), 1);
    assert_eq!(jfrog_calls[0].0, "jfrog_create_local_repository");
    assert_eq!(
        jfrog_calls[0].1,
        json!({"key": "my-maven-local", "rclass": "local", "packageType": "maven"})
    );

    let coral_calls = servers.calls_to("coral");
    assert_eq!(coral_calls[0], (WAIT_FOR_MENTIONS.to_string(), json!({"timeoutMs": 30000})));
    assert_eq!(
        coral_calls[1],
        (
            SEND_MESSAGE.to_string(),
            json!({
                "threadId": "thread-1",
                "content": "Created local maven repository my-maven-local.",
                "mentions": ["planner_agent"]
            })
        )
    );
}

#[tokio::test]
async fn forbidden_tool_call_is_reported_back_to_the_sender() {
    let servers = Arc::new(FakeServers::new(
        "List all repositories",
        json!({"content": [{"type": "text", "text": "Error: 403 Forbidden"}], "isError": true}),
    ));
    let session = session(
        servers.clone(),
        &[
            r#"{"action":"call_tool","tool":"jfrog_list_repositories","input":{}}"#,
            r#"{"action":"final","response":"I could not list repositories: the access token lacks permission (403 Forbidden)."}"#,
        ],
    );

    session.poll_once().await.expect("a 403 does not end the session");

    let coral_calls = servers.calls_to("coral");
    let reply = &coral_calls[1].1;
    assert_eq!(reply["threadId"], "thread-1");
    assert!(reply["content"].as_str().unwrap().contains("403"));
}

#[tokio::test]
async fn model_failure_still_answers_the_thread() {
    let servers = Arc::new(FakeServers::new(
        "List all repositories",
        json!({"content": []}),
    ));
    let session = session(servers.clone(), &[]);

    session.poll_once().await.unwrap();

    let coral_calls = servers.calls_to("coral");
    assert_eq!(coral_calls.len(), 2);
    let reply = coral_calls[1].1["content"].as_str().unwrap().to_string();
    assert!(reply.starts_with("error:"));
    assert!(servers.calls_to("jfrog").is_empty());
}
