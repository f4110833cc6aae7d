// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types shared by the ruler, its transactions and the tool

use thiserror::Error;

/// Failure reported by a broadcast channel while opening a transaction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ChannelError(pub String);

/// Errors raised by the measuring core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulerError {
    /// The caller used a ruler or transaction in a state that does not
    /// allow the operation (before it opened, or after it finished).
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// Label placement was asked for with no point at all.
    #[error("degenerate geometry: no points to place the label on")]
    DegenerateGeometry,

    /// The broadcast channel refused to open a transaction.
    #[error("broadcast channel unavailable: {0}")]
    ChannelUnavailable(#[from] ChannelError),

    /// A grid configuration was rejected.
    #[error("invalid grid config: {0}")]
    InvalidConfig(String),
}

impl RulerError {
    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionViolation(message.into())
    }
}

/// Result alias used across the crate
pub type Result<T, E = RulerError> = std::result::Result<T, E>;
