//! Logging setup.
//!
//! The crate logs through the `log` facade only; binaries pick the backend.
//! [`init_logging`] installs `env_logger` for the sandbox and tools.

mod init;

pub use init::{LoggingConfig, init_logging};
