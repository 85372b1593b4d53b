//! Ocean Core - Core types for resolving cluster settings and building chart values
//!
//! This crate provides the plain data the rest of Ocean works with:
//! - `ClusterConfig` / `Credentials`: resolved fields with left-biased merge
//! - `Values`: untyped chart values document with deep merge support
//! - `ControllerValues` / `OperatorValues`: typed schemas per chart family

pub mod charts;
pub mod error;
pub mod value;
pub mod values;

pub use charts::{BootstrapValues, ChartValues, ControllerValues, OperatorValues, SpotinstValues};
pub use error::{CoreError, Result};
pub use value::{ClusterConfig, Credentials, Resolvable};
pub use values::{Values, parse_set_values};
