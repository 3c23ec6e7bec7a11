//! Server control through external commands.

use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio::time;

use crate::config::ServerConfig;
use crate::server::ServerController;

/// Why an external command did not produce a usable result.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("no command configured")]
    Empty,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },
}

/// Run `argv` to completion, killing it if the deadline passes.
pub async fn run_command(argv: &[String], timeout: Duration) -> Result<Output, CommandError> {
    let (program, args) = argv.split_first().ok_or(CommandError::Empty)?;

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    match time::timeout(timeout, child).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(CommandError::Spawn {
            program: program.clone(),
            source,
        }),
        Err(_) => Err(CommandError::Timeout {
            program: program.clone(),
            timeout,
        }),
    }
}

fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
        (true, true) => format!("exited with {}", output.status),
        (false, true) => stdout.trim_end().to_owned(),
        (true, false) => stderr.trim_end().to_owned(),
        (false, false) => format!("{}\n{}", stdout.trim_end(), stderr.trim_end()),
    }
}

/// Controller backed by the commands in `[server]`.
#[derive(Debug, Clone)]
pub struct CommandController {
    config: ServerConfig,
}

impl CommandController {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    async fn run_action(&self, label: &str, argv: &[String]) -> Result<(), String> {
        match run_command(argv, self.config.timeout()).await {
            Ok(output) if output.status.success() => {
                tracing::info!(action = label, "Server {} succeeded", label);
                Ok(())
            }
            Ok(output) => {
                let detail = combined_output(&output);
                tracing::error!(
                    action = label,
                    status = %output.status,
                    "Server {} failed:\n{}",
                    label,
                    detail
                );
                Err(detail)
            }
            Err(e) => {
                tracing::error!(action = label, error = %e, "Server {} failed", label);
                Err(e.to_string())
            }
        }
    }
}

impl ServerController for CommandController {
    async fn validate(&self) -> Result<String, String> {
        let output = run_command(&self.config.test_command, self.config.timeout())
            .await
            .map_err(|e| e.to_string())?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(combined_output(&output))
        }
    }

    async fn reload(&self) -> Result<(), String> {
        self.run_action("reload", &self.config.reload_command).await
    }

    async fn restart(&self) -> Result<(), String> {
        self.run_action("restart", &self.config.restart_command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn controller(test: &[&str], reload: &[&str], timeout_secs: u64) -> CommandController {
        CommandController::new(ServerConfig {
            test_command: argv(test),
            reload_command: argv(reload),
            restart_command: argv(&["true"]),
            timeout_secs,
            ..ServerConfig::default()
        })
    }

    #[tokio::test]
    async fn test_validate_success_carries_stdout() {
        let c = controller(&["sh", "-c", "echo syntax is ok"], &["true"], 5);
        assert_eq!(c.validate().await.unwrap(), "syntax is ok\n");
    }

    #[tokio::test]
    async fn test_validate_failure_combines_streams() {
        let c = controller(&["sh", "-c", "echo out; echo err >&2; exit 1"], &["true"], 5);
        assert_eq!(c.validate().await.unwrap_err(), "out\nerr");
    }

    #[tokio::test]
    async fn test_timeout_is_an_error() {
        let c = controller(&["sleep", "5"], &["true"], 1);
        let err = c.validate().await.unwrap_err();
        assert!(err.contains("did not finish"), "{err}");
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let c = controller(&["true"], &["/nonexistent/site-sync-reload"], 5);
        let err = c.reload().await.unwrap_err();
        assert!(err.starts_with("failed to start"), "{err}");
    }

    #[tokio::test]
    async fn test_empty_command() {
        let err = run_command(&[], Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, CommandError::Empty));
    }
}
