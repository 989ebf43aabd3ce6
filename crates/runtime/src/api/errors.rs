//! Unified error type surfaced by the runtime API.
//!
//! Calculation failures are normally turned into replies by the dispatcher;
//! the variants here cover what a transport has to handle itself.

use thiserror::Error;

use calc_core::CalcError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error("calculation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("failed to deliver reply to {scope}: {message}")]
    Sink { scope: String, message: String },

    #[error("initial data load failed")]
    InitialLoad(#[source] CalcError),
}
