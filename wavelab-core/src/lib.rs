//! This library implements the core of the experiment harness.
//!
//! The programming interface is centered around the [`Registry`]
//! structure, which holds the full table of runnable experiment
//! configurations. A registry is assembled once at startup, optionally
//! extended from a toml manifest, and afterwards only read through
//! [`Registry::resolve`]. A resolved [`ConfigurationEntry`] is rendered
//! into an argument vector by the [`command`] module and handed to the
//! dispatcher in [`exec`], which spawns the external simulator under the
//! entry's [`ExecutionMode`].
//!
//! # Execution contracts
//!
//! Two contracts are supported. `Checked` waits for the child process,
//! captures its exit status and measures wall-clock duration.
//! `FireAndForget` returns as soon as the spawn call completes; the
//! child's lifetime is independent of the harness from then on.
//!
//! # Using the library
//!
//! To use `wavelab-core` in your Rust project add the following to your
//! `Cargo.toml`:
//!
//! ```toml
//! wavelab-core = "0.1.0"
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use wavelab_core::{exec, Registry, DEFAULT_SIM_PROGRAM};
//!
//! pub fn main() {
//!     let registry = Registry::builtin();
//!     let entry = registry.resolve(0).unwrap();
//!     let result = exec::run(entry, DEFAULT_SIM_PROGRAM).unwrap();
//!     println!("took {:?} ms", result.duration_millis);
//! }
//! ```
//!
//! [`Registry`]: registry/struct.Registry.html
//! [`Registry::resolve`]: registry/struct.Registry.html#method.resolve
//! [`ConfigurationEntry`]: registry/struct.ConfigurationEntry.html
//! [`ExecutionMode`]: registry/enum.ExecutionMode.html

#![allow(unused)]

#[macro_use]
extern crate serde;
#[macro_use]
extern crate log;

// reexports
pub use command::CommandLine;
pub use error::{Error, Result};
pub use exec::ExecutionResult;
pub use params::{GuardInterval, ParameterSet};
pub use registry::{ConfigurationEntry, ExecutionMode, Registry};

pub mod command;
pub mod error;
pub mod exec;
pub mod params;
pub mod registry;

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

/// Simulator executable invoked when no override is given. The simulator
/// is consumed purely as an executable name plus an argument vector.
pub const DEFAULT_SIM_PROGRAM: &str = "./build/scratch/quick-vht-wifi";

/// Default name of the experiment manifest file.
pub const MANIFEST_FILE: &str = "experiments.toml";
