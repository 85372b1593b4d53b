//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Resolution error - cluster config or credentials could not be resolved
pub const RESOLVE_ERROR: i32 = 2;

/// Values error - override document could not be decoded or rendered
pub const VALUES_ERROR: i32 = 3;

/// Installer error - the chart installer reported a failure
pub const INSTALLER_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Config error - invalid settings or arguments (following sysexits.h convention)
pub const CONFIG_ERROR: i32 = 78;
