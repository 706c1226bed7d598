use std::fmt;

/// How the process was launched. Decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    /// Standalone run; configuration comes from a local `.env` plus the environment.
    Dev,
    /// Launched by the Coral orchestrator, which injects configuration.
    Executable,
}

impl RuntimeMode {
    /// Interprets a `CORAL_ORCHESTRATION_RUNTIME` value.
    pub fn from_runtime_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("executable") | Some("docker") => RuntimeMode::Executable,
            _ => RuntimeMode::Dev,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeMode::Dev => "devmode",
            RuntimeMode::Executable => "executable",
        }
    }

    pub fn reads_env_file(self) -> bool {
        matches!(self, RuntimeMode::Dev)
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executable_and_docker_select_executable_mode() {
        assert_eq!(
            RuntimeMode::from_runtime_value(Some("executable")),
            RuntimeMode::Executable
        );
        assert_eq!(
            RuntimeMode::from_runtime_value(Some(" Docker ")),
            RuntimeMode::Executable
        );
    }

    #[test]
    fn anything_else_is_dev_mode() {
        assert_eq!(RuntimeMode::from_runtime_value(None), RuntimeMode::Dev);
        assert_eq!(RuntimeMode::from_runtime_value(Some("devmode")), RuntimeMode::Dev);
        assert_eq!(RuntimeMode::from_runtime_value(Some("")), RuntimeMode::Dev);
    }
}
