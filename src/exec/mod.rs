// src/exec/mod.rs

//! Process execution layer.
//!
//! This module actually runs submitted commands with
//! `tokio::process::Command` and reports each exit back to the runtime as a
//! `RuntimeEvent::ProcessExited`.
//!
//! - [`launcher`] provides the `ProcessLauncher` trait and the production
//!   `ShellLauncher`; tests swap in a fake launcher that never spawns.
//! - [`process`] runs a single child process to completion.

pub mod launcher;
pub mod process;

pub use launcher::{ProcessLauncher, ShellLauncher};
pub use process::run_process;
