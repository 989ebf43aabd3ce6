//! Runtime for the production-line calculator.
//!
//! This crate wires the pure calculation core to loaded data and to a chat
//! transport. Consumers build a [`Runtime`], then feed inbound messages to
//! its [`Dispatcher`] and deliver replies through a [`ReplySink`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the builder and the assembled runtime
//! - [`api`] exposes the types downstream transports interact with
//! - [`registry`] holds the per-scope sides and their atomic reload
//! - [`commands`] parses and dispatches chat commands
//! - [`script`] provides the RON-backed bonus evaluator
pub mod api;
pub mod commands;
pub mod config;
pub mod registry;
pub mod runtime;
pub mod script;

pub use api::{BufferedSink, ReplySink, Result, RuntimeError};
pub use commands::{Command, Dispatcher, HelpTopic};
pub use config::RuntimeConfig;
pub use registry::{DEFAULT_SIDE_NAME, Registry, ReloadSummary, Side, SideMap};
pub use runtime::{Runtime, RuntimeBuilder};
pub use script::FormulaEvaluator;
