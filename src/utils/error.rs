use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {endpoint}")]
    StatusError { endpoint: String, status: u16 },

    #[error("Malformed response from {source_name}: {message}")]
    MalformedResponseError { source_name: String, message: String },

    #[error("Query '{query}' returned a non-numeric value: '{output}'")]
    NonNumericScalarError { query: String, output: String },

    #[error("Remote command failed ({status}): {stderr}")]
    CommandError { status: String, stderr: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// Where a failure came from, independent of the concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Status,
    MalformedResponse,
    NonNumericScalar,
    RemoteCommand,
    Configuration,
}

impl AuditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuditError::TransportError(e) if e.is_decode() => ErrorKind::MalformedResponse,
            AuditError::TransportError(_) => ErrorKind::Transport,
            AuditError::StatusError { .. } => ErrorKind::Status,
            AuditError::MalformedResponseError { .. } | AuditError::SerializationError(_) => {
                ErrorKind::MalformedResponse
            }
            AuditError::NonNumericScalarError { .. } => ErrorKind::NonNumericScalar,
            AuditError::CommandError { .. } | AuditError::IoError(_) => ErrorKind::RemoteCommand,
            AuditError::ConfigValidationError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::MissingConfigError { .. } => ErrorKind::Configuration,
        }
    }

    pub fn is_config_error(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// One-line message printed inline in the console report.
    pub fn user_friendly_message(&self) -> String {
        match self {
            AuditError::TransportError(e) if e.is_connect() => {
                format!("could not connect: {}", e)
            }
            AuditError::StatusError { status, .. } => format!("status {}", status),
            AuditError::CommandError { stderr, .. } if stderr.trim().is_empty() => {
                self.to_string().trim_end_matches(": ").to_string()
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Transport => "Check network connectivity to the endpoint",
            ErrorKind::Status => "Check the endpoint URL and the credential headers",
            ErrorKind::MalformedResponse => "The upstream response shape changed; inspect it with --verbose",
            ErrorKind::NonNumericScalar => "Check the table and column names in [database]",
            ErrorKind::RemoteCommand => "Check the ssh identity file, host and database password",
            ErrorKind::Configuration => "Fix the configuration file and run again",
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_maps_taxonomy() {
        let status = AuditError::StatusError {
            endpoint: "https://example.com".to_string(),
            status: 503,
        };
        assert_eq!(status.kind(), ErrorKind::Status);
        assert_eq!(status.user_friendly_message(), "status 503");

        let scalar = AuditError::NonNumericScalarError {
            query: "SELECT 1".to_string(),
            output: "oops".to_string(),
        };
        assert_eq!(scalar.kind(), ErrorKind::NonNumericScalar);

        let missing = AuditError::MissingConfigError {
            field: "inventory.access_code".to_string(),
        };
        assert!(missing.is_config_error());
    }

    #[test]
    fn test_command_error_without_stderr() {
        let err = AuditError::CommandError {
            status: "exit status: 255".to_string(),
            stderr: String::new(),
        };
        assert_eq!(err.kind(), ErrorKind::RemoteCommand);
        assert_eq!(
            err.user_friendly_message(),
            "Remote command failed (exit status: 255)"
        );
    }
}
