//! Error taxonomy for calculation requests.
//!
//! Every variant aborts the whole request that produced it. None of them is
//! retried here; retry policy, if any, belongs to the transport layer.

use thiserror::Error;

/// Failures raised while resolving, aggregating, or scaling a request.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CalcError {
    #[error("unknown part ID: {0}")]
    PartNotFound(String),

    #[error("unknown bonus ID: {0}")]
    BonusNotFound(String),

    #[error("unknown spire ID: {0}")]
    SpireNotFound(String),

    #[error("invalid count: {0:?}")]
    InvalidCount(String),

    #[error("invalid COWS literal: {0:?}")]
    InvalidCowsLiteral(String),

    /// An enabled spire no longer resolves (stale list after a reload).
    #[error("invalid spire list: {0} is enabled but not defined")]
    InvalidSpireList(String),

    #[error("composition cycle through part {0}")]
    CompositionCycle(String),

    #[error("configuration load failed: {0}")]
    ConfigLoad(String),

    #[error("bonus script {bonus} failed: {message}")]
    BonusScript { bonus: String, message: String },
}

impl CalcError {
    /// Stable identifier for the variant, used in logs and tests.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::PartNotFound(_) => "part_not_found",
            Self::BonusNotFound(_) => "bonus_not_found",
            Self::SpireNotFound(_) => "spire_not_found",
            Self::InvalidCount(_) => "invalid_count",
            Self::InvalidCowsLiteral(_) => "invalid_cows_literal",
            Self::InvalidSpireList(_) => "invalid_spire_list",
            Self::CompositionCycle(_) => "composition_cycle",
            Self::ConfigLoad(_) => "config_load",
            Self::BonusScript { .. } => "bonus_script",
        }
    }
}

pub type Result<T> = core::result::Result<T, CalcError>;
