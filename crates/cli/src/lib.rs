// # -----------------------------
// # crates/cli/src/lib.rs
// # -----------------------------
//! Headless driver for the workspace lifecycle orchestrator: loads scenario
//! files and replays their navigation steps.

pub mod scenario;
pub mod simulate;
