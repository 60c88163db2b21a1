use crate::config::DatabaseConfig;
use crate::domain::ports::CommandRunner;
use crate::utils::error::{AuditError, Result};
use tokio::process::Command;

/// Runs queries through `psql` on the database host over `ssh`, one process per query.
#[derive(Debug, Clone)]
pub struct SshCommandRunner {
    config: DatabaseConfig,
}

impl SshCommandRunner {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// The command line executed by the remote shell.
    pub fn remote_command(&self, sql: &str) -> String {
        format!(
            "PGPASSWORD={} psql -h {} -U {} -d {} -t -c {}",
            shell_quote(&self.config.db_password),
            shell_quote(&self.config.db_host),
            shell_quote(&self.config.db_user),
            shell_quote(&self.config.db_name),
            shell_quote(sql)
        )
    }

    pub fn ssh_args(&self, sql: &str) -> Vec<String> {
        vec![
            "-i".to_string(),
            self.config.identity_file.clone(),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            format!("{}@{}", self.config.ssh_user, self.config.ssh_host),
            self.remote_command(sql),
        ]
    }
}

/// Single-quotes a value for a POSIX shell.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[async_trait::async_trait]
impl CommandRunner for SshCommandRunner {
    async fn run_query(&self, sql: &str) -> Result<String> {
        tracing::debug!(
            "Running on {}@{}: {}",
            self.config.ssh_user,
            self.config.ssh_host,
            sql
        );

        let output = Command::new("ssh").args(self.ssh_args(sql)).output().await?;

        if !output.status.success() {
            return Err(AuditError::CommandError {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
