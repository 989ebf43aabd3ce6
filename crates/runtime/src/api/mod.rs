//! Public runtime API surface.
//!
//! Types a transport needs to talk to the runtime: the error type and the
//! reply sink it implements.

pub mod errors;
pub mod sink;

pub use errors::{Result, RuntimeError};
pub use sink::{BufferedSink, ReplySink};
