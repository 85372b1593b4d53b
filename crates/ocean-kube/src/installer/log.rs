//! Installer output logging
//!
//! Every logger accepts output lines. A logger can also expose a verbosity
//! level through `as_verbose`; installers check for it before enabling
//! extra output from the tools they drive.

/// Sink for installer output
pub trait InstallLog: Send + Sync {
    /// Record one line of output
    fn line(&self, message: &str);

    /// Verbosity capability, when this logger has one
    fn as_verbose(&self) -> Option<&dyn VerboseLog> {
        None
    }
}

/// Optional verbosity capability of an `InstallLog`
pub trait VerboseLog {
    /// 0 is quiet, higher is chattier
    fn verbosity(&self) -> u8;
}

/// Forwards installer output to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog {
    verbosity: u8,
}

impl TracingLog {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }
}

impl InstallLog for TracingLog {
    fn line(&self, message: &str) {
        tracing::info!(target: "ocean::installer", "{}", message);
    }

    fn as_verbose(&self) -> Option<&dyn VerboseLog> {
        Some(self)
    }
}

impl VerboseLog for TracingLog {
    fn verbosity(&self) -> u8 {
        self.verbosity
    }
}
