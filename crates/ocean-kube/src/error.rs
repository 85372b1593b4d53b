//! Error types for ocean-kube

use thiserror::Error;

/// Result type for ocean-kube operations
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors returned by the object store
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The requested object does not exist
    #[error("object not found")]
    NotFound,

    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[source] kube::Error),

    /// Store could not serve the request
    #[error("{0}")]
    Unavailable(String),
}

impl From<kube::Error> for StoreError {
    fn from(e: kube::Error) -> Self {
        match e {
            kube::Error::Api(resp) if resp.code == 404 => StoreError::NotFound,
            other => StoreError::Api(other),
        }
    }
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// Closed set of error categories, checkable without matching on payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    NoValidSource,
    Chain,
    Incomplete,
    ObjectStore,
    Decode,
    Serialize,
    Installer,
    InvalidConfig,
    Source,
    Io,
}

/// Errors that can occur while resolving settings or building chart values
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// A source holds no usable material
    #[error("{what} not found in {origin}")]
    NotFound { what: &'static str, origin: String },

    /// Every source in a chain came back empty without reporting a failure
    #[error("no valid source in chain")]
    NoValidSource { what: &'static str },

    /// Every source in a chain came back empty; one entry per failing source
    #[error("{}", join_lines(.errors))]
    Chain {
        what: &'static str,
        errors: Vec<ResolveError>,
    },

    /// Final values document still lacks required leaves
    #[error("incomplete {chart} values: missing {}", .missing.join(", "))]
    Incomplete {
        chart: &'static str,
        missing: Vec<&'static str>,
    },

    /// Object store failure other than not-found
    #[error("failed to get {kind} {namespace}/{name}: {source}")]
    ObjectStore {
        kind: &'static str,
        namespace: String,
        name: String,
        #[source]
        source: StoreError,
    },

    /// Malformed values document
    #[error("failed to decode values: {0}")]
    Decode(String),

    /// Values document could not be rendered
    #[error("failed to serialize values: {0}")]
    Serialize(String),

    /// Chart installer failure
    #[error("installer '{installer}' failed to {action} release '{release}': {message}")]
    Installer {
        installer: String,
        action: &'static str,
        release: String,
        message: String,
    },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure reported by a custom source
    #[error("{0}")]
    Source(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_lines(errors: &[ResolveError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl ResolveError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::NotFound { .. } => ErrorKind::NotFound,
            ResolveError::NoValidSource { .. } => ErrorKind::NoValidSource,
            ResolveError::Chain { .. } => ErrorKind::Chain,
            ResolveError::Incomplete { .. } => ErrorKind::Incomplete,
            ResolveError::ObjectStore { .. } => ErrorKind::ObjectStore,
            ResolveError::Decode(_) => ErrorKind::Decode,
            ResolveError::Serialize(_) => ErrorKind::Serialize,
            ResolveError::Installer { .. } => ErrorKind::Installer,
            ResolveError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            ResolveError::Source(_) => ErrorKind::Source,
            ResolveError::Io(_) => ErrorKind::Io,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_no_valid_source(&self) -> bool {
        self.kind() == ErrorKind::NoValidSource
    }

    /// Errors collected from a chain, or this error alone
    pub fn causes(&self) -> Vec<&ResolveError> {
        match self {
            ResolveError::Chain { errors, .. } => errors.iter().collect(),
            other => vec![other],
        }
    }

    /// Kind of value that failed to resolve (`Resolvable::KIND`), when known
    pub fn domain(&self) -> Option<&'static str> {
        match self {
            ResolveError::NotFound { what, .. }
            | ResolveError::NoValidSource { what }
            | ResolveError::Chain { what, .. } => Some(what),
            _ => None,
        }
    }

    pub(crate) fn not_found<V: ocean_core::Resolvable>(origin: impl Into<String>) -> Self {
        ResolveError::NotFound {
            what: V::KIND,
            origin: origin.into(),
        }
    }
}

impl From<ocean_core::CoreError> for ResolveError {
    fn from(e: ocean_core::CoreError) -> Self {
        match e {
            ocean_core::CoreError::Io(io) => ResolveError::Io(io),
            other => ResolveError::Decode(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_message_joins_in_order() {
        let err = ResolveError::Chain {
            what: "credentials",
            errors: vec![
                ResolveError::Source("e1".to_string()),
                ResolveError::Source("e2".to_string()),
            ],
        };

        assert_eq!(err.to_string(), "e1\ne2");
        assert_eq!(err.kind(), ErrorKind::Chain);
        assert_eq!(err.causes().len(), 2);
    }

    #[test]
    fn test_kind_helpers() {
        let err = ResolveError::not_found::<ocean_core::Credentials>("environment");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "credentials not found in environment");
        assert_eq!(err.domain(), Some("credentials"));

        let empty = ResolveError::NoValidSource {
            what: "cluster config",
        };
        assert!(empty.is_no_valid_source());
        assert!(!empty.is_not_found());
        assert_eq!(empty.domain(), Some("cluster config"));
        assert_eq!(ResolveError::Source("x".to_string()).domain(), None);
    }

    #[test]
    fn test_incomplete_names_missing_leaves() {
        let err = ResolveError::Incomplete {
            chart: "ocean-controller",
            missing: vec!["spotinst.token", "spotinst.account"],
        };

        assert_eq!(err.kind(), ErrorKind::Incomplete);
        assert_eq!(
            err.to_string(),
            "incomplete ocean-controller values: missing spotinst.token, spotinst.account"
        );
    }

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(kube::error::ErrorResponse {
            status: "Failure".to_string(),
            message: "secrets \"controller\" is forbidden".to_string(),
            reason: "Forbidden".to_string(),
            code,
        })
    }

    #[test]
    fn test_kube_not_found_maps_to_not_found() {
        let err = StoreError::from(api_error(404));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_other_kube_errors_are_kept() {
        let err = StoreError::from(api_error(403));

        assert!(!err.is_not_found());
        assert!(matches!(&err, StoreError::Api(kube::Error::Api(resp)) if resp.code == 403));
        assert!(err.to_string().starts_with("Kubernetes API error:"));
    }

    #[test]
    fn test_object_store_error_context() {
        let err = ResolveError::ObjectStore {
            kind: "ConfigMap",
            namespace: "kube-system".to_string(),
            name: "cfg".to_string(),
            source: StoreError::Unavailable("connection refused".to_string()),
        };

        assert_eq!(
            err.to_string(),
            "failed to get ConfigMap kube-system/cfg: connection refused"
        );
        assert_eq!(err.kind(), ErrorKind::ObjectStore);
    }
}
