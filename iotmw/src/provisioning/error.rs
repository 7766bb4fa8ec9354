// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! This module provides the error definitions for the device provisioning client.

use super::transport::TransportError;
use thiserror::Error;

/// Errors that can be returned by the provisioning client and its helpers.
#[derive(Error, Debug)]
pub enum Error {
    /// Error coming from the serde_json crate, which can happen when a registration response is not
    /// well-formed JSON or a custom registration payload is invalid.
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// The symmetric key used for SAS token generation is not valid base64.
    #[error(transparent)]
    Base64DecodeError(#[from] base64::DecodeError),

    /// A value written into or read back from the client buffer is not valid UTF-8.
    #[error(transparent)]
    Utf8Error(#[from] std::str::Utf8Error),

    /// Error reported by the MQTT transport.
    #[error(transparent)]
    TransportError(#[from] TransportError),

    /// Errors raised directly by the provisioning client.
    #[error(transparent)]
    ProvisioningError(#[from] ProvisioningErrorKind),
}

impl Error {
    /// Collapses the error onto the client's result taxonomy. Errors re-badged from other crates are
    /// reported as `Failed`.
    pub fn kind(&self) -> ProvisioningErrorKind {
        match self {
            Error::ProvisioningError(kind) => *kind,
            _ => ProvisioningErrorKind::Failed,
        }
    }
}

/// Result kinds of the provisioning client. These are also the values stored and replayed by a completed
/// registration workflow.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningErrorKind {
    #[error("A required argument is empty.")]
    InvalidArgument,

    #[error("A value does not fit in the buffer reserved for it.")]
    OutOfMemory,

    #[error("The operation is not valid in the current workflow state.")]
    InvalidState,

    #[error("The SAS token could not be generated.")]
    TokenGenerationFailed,

    #[error("The MQTT connection to the provisioning endpoint failed.")]
    ConnectFailed,

    #[error("Subscribing to the registration response topic failed.")]
    SubscribeFailed,

    #[error("Publishing the registration request failed.")]
    PublishFailed,

    #[error("The MQTT process loop failed.")]
    ProcessLoopFailed,

    #[error("The registration response has an empty topic or payload.")]
    InvalidResponse,

    #[error("The provisioning service rejected the registration.")]
    ServerError,

    #[error("The operation failed.")]
    Failed,
}
