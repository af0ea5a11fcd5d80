// # -----------------------------
// # crates/common/src/lib.rs
// # -----------------------------
pub mod config;

pub use config::{ConfigError, LoggingConfig, ShellConfig};
pub use quantum_lifecycle as lifecycle;
