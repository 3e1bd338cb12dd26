//! Tracing/logging setup shared by the stockledger binaries.

pub mod logging;

pub use logging::{LogFormat, ParseLogFormatError, init, init_from_env};
