use super::{CommandRunner, LocalTool, ToolOutcome, file_name, list_files, parse_arguments};
use crate::application::tooling::interface::ServerToolInfo;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct UploadArgs {
    project_path: String,
    target_file_path: String,
    repository: String,
}

/// Repository path for `filename` under the target directory, with or
/// without a trailing slash on the directory.
pub fn upload_target(repository: &str, target_dir: &str, filename: &str) -> String {
    if target_dir.ends_with('/') {
        format!("{repository}/{target_dir}{filename}")
    } else {
        format!("{repository}/{target_dir}/{filename}")
    }
}

/// Uploads every file in `dist/` with `jf rt u`.
pub struct UploadToJfrogTool;

#[async_trait]
impl LocalTool for UploadToJfrogTool {
    fn info(&self) -> ServerToolInfo {
        ServerToolInfo {
            name: "upload_to_jfrog".to_string(),
            description: Some(
                "Uploads built artifacts from a project's dist/ folder to JFrog Artifactory using the JFrog CLI"
                    .to_string(),
            ),
            input_schema: Some(json!({
                "type": "object",
                "properties": {
                    "project_path": {
                        "type": "string",
                        "description": "Path to the project directory containing built artifacts in dist/ folder"
                    },
                    "target_file_path": {
                        "type": "string",
                        "description": "Target directory path in the JFrog repository (e.g. 'python-packages/' or 'python-packages'). The filename is taken from the built artifact."
                    },
                    "repository": {
                        "type": "string",
                        "description": "JFrog repository name"
                    }
                },
                "required": ["project_path", "target_file_path", "repository"]
            })),
        }
    }

    async fn call(&self, runner: &dyn CommandRunner, arguments: Value) -> ToolOutcome {
        let args: UploadArgs = match parse_arguments("upload_to_jfrog", arguments) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        upload(runner, &args).await
    }
}

async fn upload(runner: &dyn CommandRunner, args: &UploadArgs) -> ToolOutcome {
    let project = Path::new(&args.project_path);
    if !project.is_dir() {
        return ToolOutcome::failed(format!("Directory does not exist: {}", project.display()));
    }
    let dist = project.join("dist");
    if !dist.exists() {
        return ToolOutcome::failed(format!("No dist directory found at {}", dist.display()));
    }
    let artifacts = match list_files(&dist) {
        Ok(files) => files,
        Err(err) => return ToolOutcome::failed(format!("Error occurred during upload: {err}")),
    };
    if artifacts.is_empty() {
        return ToolOutcome::failed(format!("No build artifacts found in {}", dist.display()));
    }

    let mut uploaded = Vec::new();
    let mut failures = Vec::new();
    for artifact in &artifacts {
        let target = upload_target(&args.repository, &args.target_file_path, &file_name(artifact));
        let source = artifact.display().to_string();
        info!(source = source.as_str(), target = target.as_str(), "Uploading artifact");

        let command = vec!["rt".to_string(), "u".to_string(), source.clone(), target.clone()];
        match runner.run("jf", &command, Some(project)).await {
            Ok(output) if output.success => {
                uploaded.push(format!("Successfully uploaded {source} to {target}"));
            }
            Ok(output) => {
                let mut message = format!("Upload failed for {source}: {}", output.stderr);
                if !output.stdout.is_empty() {
                    message.push_str(&format!("\nStdout: {}", output.stdout));
                }
                failures.push(message);
            }
            Err(err) => failures.push(format!("Upload failed for {source}: {err}")),
        }
    }

    if !failures.is_empty() {
        ToolOutcome::failed(failures.join("\n"))
    } else {
        ToolOutcome::ok(uploaded.join("\n"))
    }
}
