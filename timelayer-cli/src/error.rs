//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent
//! formatting and appropriate exit codes.

use std::fmt;
use std::process;

use timelayer::cipher::CipherError;
use timelayer::pipeline::PipelineError;
use timelayer::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Failed to load decoding key material
    KeyLoad(CipherError),
    /// Failed to create the HTTP client
    HttpClient(ProviderError),
    /// Failed to create the Tokio runtime
    RuntimeCreation(String),
    /// Pipeline run failed
    Pipeline(PipelineError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::KeyLoad(_) => {
                eprintln!();
                eprintln!("The decoding key is the dbRoot blob captured alongside the");
                eprintln!("archive's HTTP traffic. Point --key-file at it.");
            }
            CliError::Pipeline(PipelineError::Fetch(_)) => {
                eprintln!();
                eprintln!("The archive endpoint rejected a tile request. Check that the");
                eprintln!("--db-version and --time-code values match captured traffic.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::KeyLoad(e) => write!(f, "Failed to load key material: {}", e),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::RuntimeCreation(msg) => {
                write!(f, "Failed to create Tokio runtime: {}", msg)
            }
            CliError::Pipeline(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::KeyLoad(e) => Some(e),
            CliError::HttpClient(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            CliError::LoggingInit(_) | CliError::RuntimeCreation(_) => None,
        }
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_display() {
        let err = CliError::LoggingInit("no permission".to_string());
        assert!(err.to_string().contains("Failed to initialize logging"));
        assert!(err.to_string().contains("no permission"));
    }

    #[test]
    fn test_pipeline_error_conversion() {
        let err: CliError = PipelineError::TaskJoin("panic".to_string()).into();
        assert!(matches!(err, CliError::Pipeline(_)));
    }
}
