use super::{CommandRunner, LocalTool, ToolOutcome, file_name, list_files, parse_arguments};
use crate::application::tooling::interface::ServerToolInfo;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::info;

const BUILD_DIRS: [&str; 5] = ["dist", "build", "target", "out", "bin"];
const ARTIFACT_EXTENSIONS: [&str; 10] = [
    ".tar.gz", ".whl", ".egg", ".jar", ".war", ".ear", ".zip", ".rpm", ".deb", ".msi",
];

#[derive(Debug, Deserialize)]
struct ScanArgs {
    project_directory: String,
}

/// Build artifacts with a known package extension found directly inside the
/// project's usual output directories.
pub fn collect_artifacts(project: &Path) -> Vec<PathBuf> {
    let mut artifacts = Vec::new();
    for dir in BUILD_DIRS {
        let path = project.join(dir);
        if !path.is_dir() {
            continue;
        }
        let Ok(files) = list_files(&path) else {
            continue;
        };
        for file in files {
            let name = file_name(&file);
            if ARTIFACT_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
                info!(dir, artifact = name.as_str(), "Found build artifact");
                artifacts.push(file);
            }
        }
    }
    artifacts
}

/// Scans build artifacts with `jf scan` for vulnerabilities and license issues.
pub struct JfrogScanTool;

#[async_trait]
impl LocalTool for JfrogScanTool {
    fn info(&self) -> ServerToolInfo {
        ServerToolInfo {
            name: "jfrog_scan_project".to_string(),
            description: Some(
                "Scans build artifacts in a project directory with the JFrog CLI for vulnerabilities and license compliance"
                    .to_string(),
            ),
            input_schema: Some(json!({
                "type": "object",
                "properties": {
                    "project_directory": {
                        "type": "string",
                        "description": "Path to the project directory to scan"
                    }
                },
                "required": ["project_directory"]
            })),
        }
    }

    async fn call(&self, runner: &dyn CommandRunner, arguments: Value) -> ToolOutcome {
        let args: ScanArgs = match parse_arguments("jfrog_scan_project", arguments) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        scan(runner, Path::new(&args.project_directory)).await
    }
}

async fn scan(runner: &dyn CommandRunner, project: &Path) -> ToolOutcome {
    if !project.is_dir() {
        return ToolOutcome::failed(format!("Directory does not exist: {}", project.display()));
    }

    let version = runner.run("jf", &["--version".to_string()], None).await;
    if !matches!(version, Ok(ref output) if output.success) {
        return ToolOutcome::failed("JFrog CLI (jf) is not installed or not available in PATH");
    }
    let config = runner
        .run("jf", &["config".to_string(), "show".to_string()], None)
        .await;
    if !matches!(config, Ok(ref output) if output.success) {
        return ToolOutcome::failed("JFrog CLI is not configured. Please run 'jf config' first");
    }

    let artifacts = collect_artifacts(project);
    if artifacts.is_empty() {
        return ToolOutcome::ok(format!(
            "No build artifacts found in common build directories ({}) for {}. No scanning performed.",
            BUILD_DIRS.join(", "),
            project.display()
        ));
    }

    let mut results = Vec::with_capacity(artifacts.len());
    for artifact in &artifacts {
        let name = file_name(artifact);
        info!(artifact = name.as_str(), "Scanning build artifact");
        let args = vec!["scan".to_string(), artifact.display().to_string()];
        let result = match runner.run("jf", &args, artifact.parent()).await {
            Ok(output) if output.success => {
                let report = output.stdout.trim();
                if report.is_empty() {
                    format!("Scan completed for {name} (no issues found)")
                } else {
                    format!("Scan results for {name}:\n{report}")
                }
            }
            Ok(output) => format!("Scan failed for {name}: {}", output.stderr),
            Err(err) => format!("Scan failed for {name}: {err}"),
        };
        results.push(result);
    }

    ToolOutcome::ok(format!(
        "JFrog scan completed for build artifacts:\n\n{}",
        results.join("\n\n")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tooling::local::CommandOutput;
    use crate::application::tooling::local::testing::ScriptedRunner;
    use std::fs;

    #[test]
    fn collects_only_known_artifacts_from_build_dirs() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["dist", "target", "src"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
        }
        fs::write(dir.path().join("dist/app-1.0.tar.gz"), b"").unwrap();
        fs::write(dir.path().join("dist/README.md"), b"").unwrap();
        fs::write(dir.path().join("target/app.jar"), b"").unwrap();
        fs::write(dir.path().join("src/other.zip"), b"").unwrap();

        let names: Vec<String> = collect_artifacts(dir.path())
            .iter()
            .map(|path| file_name(path))
            .collect();
        assert_eq!(names, vec!["app-1.0.tar.gz", "app.jar"]);
    }

    #[tokio::test]
    async fn missing_cli_stops_the_scan() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::answering(vec![CommandOutput::failure("not found")]);
        let outcome = JfrogScanTool
            .call(&runner, json!({"project_directory": dir.path()}))
            .await;
        assert!(outcome.is_error);
        assert_eq!(
            outcome.text,
            "JFrog CLI (jf) is not installed or not available in PATH"
        );
    }

    #[tokio::test]
    async fn no_artifacts_means_no_scan() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::default();
        let outcome = JfrogScanTool
            .call(&runner, json!({"project_directory": dir.path()}))
            .await;
        assert!(!outcome.is_error);
        assert!(outcome.text.contains("No scanning performed"));
        assert_eq!(runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn scans_each_artifact_and_reports_results() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/app.whl"), b"").unwrap();

        let runner = ScriptedRunner::answering(vec![
            CommandOutput::success("jf version 2.60.0"),
            CommandOutput::success("Server ID: default"),
            CommandOutput::success("1 critical vulnerability"),
        ]);
        let outcome = JfrogScanTool
            .call(&runner, json!({"project_directory": dir.path()}))
            .await;

        assert!(!outcome.is_error);
        assert!(outcome.text.contains("Scan results for app.whl:\n1 critical vulnerability"));
        let calls = runner.calls();
        assert_eq!(calls[2][..2], ["jf".to_string(), "scan".to_string()]);
    }
}
