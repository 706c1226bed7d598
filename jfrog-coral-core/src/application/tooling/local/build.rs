use super::{CommandRunner, LocalTool, ToolOutcome, file_name, list_files, parse_arguments};
use crate::application::tooling::interface::ServerToolInfo;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct BuildArgs {
    project_path: String,
    #[serde(default = "default_build_required")]
    build_required: bool,
}

fn default_build_required() -> bool {
    true
}

/// Builds a Python project with `uv build` and lists what landed in `dist/`.
pub struct BuildProjectTool;

#[async_trait]
impl LocalTool for BuildProjectTool {
    fn info(&self) -> ServerToolInfo {
        ServerToolInfo {
            name: "build_project".to_string(),
            description: Some(
                "Builds a Python project using uv and lists the artifacts in its dist/ folder"
                    .to_string(),
            ),
            input_schema: Some(json!({
                "type": "object",
                "properties": {
                    "project_path": {
                        "type": "string",
                        "description": "Path to the project directory containing pyproject.toml or setup.py"
                    },
                    "build_required": {
                        "type": "boolean",
                        "description": "Whether to build the project",
                        "default": true
                    }
                },
                "required": ["project_path"]
            })),
        }
    }

    async fn call(&self, runner: &dyn CommandRunner, arguments: Value) -> ToolOutcome {
        let args: BuildArgs = match parse_arguments("build_project", arguments) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        build(runner, Path::new(&args.project_path), args.build_required).await
    }
}

async fn build(runner: &dyn CommandRunner, project: &Path, build_required: bool) -> ToolOutcome {
    let shown = project.display();
    if !project.is_dir() {
        return ToolOutcome::failed(format!("Directory does not exist: {shown}"));
    }
    if !project.join("pyproject.toml").exists() && !project.join("setup.py").exists() {
        return ToolOutcome::failed(format!("No pyproject.toml or setup.py found in {shown}"));
    }

    if build_required {
        info!(project = %shown, "Building project");
        let args = vec!["build".to_string(), project.display().to_string()];
        match runner.run("uv", &args, Some(project)).await {
            Ok(output) if output.success => info!("Build completed successfully"),
            Ok(output) => return ToolOutcome::failed(format!("Build failed: {}", output.stderr)),
            Err(err) => {
                return ToolOutcome::failed(format!("Error occurred during build: {err}"));
            }
        }
    } else {
        info!("Build skipped as build_required=false");
    }

    let dist = project.join("dist");
    if !dist.exists() {
        return ToolOutcome::failed(format!("No dist directory found at {}", dist.display()));
    }
    let artifacts = match list_files(&dist) {
        Ok(files) => files,
        Err(err) => return ToolOutcome::failed(format!("Error occurred during build: {err}")),
    };
    if artifacts.is_empty() {
        return ToolOutcome::failed(format!("No build artifacts found in {}", dist.display()));
    }

    let listing: Vec<String> = artifacts
        .iter()
        .map(|path| format!("  - {}", file_name(path)))
        .collect();
    ToolOutcome::ok(format!(
        "Project built successfully. Build artifacts found in {}:\n{}",
        dist.display(),
        listing.join("\n")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tooling::local::CommandOutput;
    use crate::application::tooling::local::testing::ScriptedRunner;
    use std::fs;

    #[tokio::test]
    async fn missing_directory_is_reported() {
        let runner = ScriptedRunner::default();
        let outcome = BuildProjectTool
            .call(&runner, json!({"project_path": "/definitely/not/here"}))
            .await;
        assert!(outcome.is_error);
        assert!(outcome.text.starts_with("Directory does not exist"));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn project_without_manifest_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::default();
        let outcome = BuildProjectTool
            .call(&runner, json!({"project_path": dir.path()}))
            .await;
        assert!(outcome.is_error);
        assert!(outcome.text.contains("No pyproject.toml or setup.py"));
    }

    #[tokio::test]
    async fn successful_build_lists_dist_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pyproject.toml"), "[project]\nname = \"demo\"\n").unwrap();
        fs::create_dir(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/demo-0.1.0.tar.gz"), b"").unwrap();
        fs::write(dir.path().join("dist/demo-0.1.0-py3-none-any.whl"), b"").unwrap();

        let runner = ScriptedRunner::default();
        let outcome = BuildProjectTool
            .call(&runner, json!({"project_path": dir.path()}))
            .await;

        assert!(!outcome.is_error, "{}", outcome.text);
        assert!(outcome.text.contains("  - demo-0.1.0-py3-none-any.whl"));
        assert!(outcome.text.contains("  - demo-0.1.0.tar.gz"));
        assert_eq!(runner.calls()[0][..2], ["uv".to_string(), "build".to_string()]);
    }

    #[tokio::test]
    async fn build_failure_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("setup.py"), "").unwrap();
        let runner = ScriptedRunner::answering(vec![CommandOutput::failure("no backend")]);
        let outcome = BuildProjectTool
            .call(&runner, json!({"project_path": dir.path()}))
            .await;
        assert!(outcome.is_error);
        assert_eq!(outcome.text, "Build failed: no backend");
    }

    #[tokio::test]
    async fn skipping_the_build_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("setup.py"), "").unwrap();
        let runner = ScriptedRunner::default();
        let outcome = BuildProjectTool
            .call(
                &runner,
                json!({"project_path": dir.path(), "build_required": false}),
            )
            .await;
        assert!(outcome.is_error);
        assert!(outcome.text.starts_with("No dist directory found"));
        assert!(runner.calls().is_empty());
    }
}
