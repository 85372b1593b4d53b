//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use ocean_kube::env::{ENV_ACCOUNT, ENV_CLUSTER_IDENTIFIER, ENV_TOKEN};
use ocean_core::{Credentials, Resolvable};
use ocean_kube::{ErrorKind, ResolveError};
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Cluster config or credentials could not be resolved
    #[error("Resolution failed: {message}")]
    #[diagnostic(code(ocean::cli::resolve))]
    Resolve {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Override document could not be decoded or rendered
    #[error("Values error: {message}")]
    #[diagnostic(code(ocean::cli::values))]
    Values { message: String },

    /// Chart installer failure
    #[error("{message}")]
    #[diagnostic(code(ocean::cli::installer))]
    Installer { message: String },

    /// Invalid settings or arguments
    #[error("{message}")]
    #[diagnostic(code(ocean::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(ocean::cli::io))]
    Io { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Resolve { .. } => exit_codes::RESOLVE_ERROR,
            CliError::Values { .. } => exit_codes::VALUES_ERROR,
            CliError::Installer { .. } => exit_codes::INSTALLER_ERROR,
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
        }
    }

    /// Create a values error
    pub fn values(message: impl Into<String>) -> Self {
        Self::Values {
            message: message.into(),
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

fn resolve_help(err: &ResolveError) -> String {
    let credentials = match err {
        ResolveError::ObjectStore { kind, .. } => *kind == "Secret",
        other => other.domain() == Some(Credentials::KIND),
    };
    if credentials {
        format!(
            "Set {} and {}, or check the controller Secret in the cluster",
            ENV_TOKEN, ENV_ACCOUNT
        )
    } else {
        format!(
            "Set {}, or check the controller ConfigMap in the cluster",
            ENV_CLUSTER_IDENTIFIER
        )
    }
}

impl From<ResolveError> for CliError {
    fn from(err: ResolveError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound
            | ErrorKind::NoValidSource
            | ErrorKind::Chain
            | ErrorKind::ObjectStore
            | ErrorKind::Source => CliError::Resolve {
                help: Some(resolve_help(&err)),
                message,
            },
            ErrorKind::Incomplete => CliError::Resolve {
                message,
                help: Some(format!(
                    "Pass the missing values with --set or -f, or set {}, {} and {}",
                    ENV_CLUSTER_IDENTIFIER, ENV_TOKEN, ENV_ACCOUNT
                )),
            },
            ErrorKind::Decode | ErrorKind::Serialize => CliError::Values { message },
            ErrorKind::Installer => CliError::Installer { message },
            ErrorKind::InvalidConfig => CliError::Config {
                message,
                help: None,
            },
            ErrorKind::Io => CliError::Io { message },
        }
    }
}

impl From<ocean_core::CoreError> for CliError {
    fn from(err: ocean_core::CoreError) -> Self {
        match err {
            ocean_core::CoreError::Io(io) => io.into(),
            ocean_core::CoreError::Values { message } => CliError::values(message),
            other => CliError::values(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
