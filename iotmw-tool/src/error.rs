// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Error definitions/handling.

use thiserror::Error;

/// Errors in iotmw-tool
#[derive(Error, Debug)]
pub enum Error {
    /// Error emanating from standard I/O, such as an unreadable manifest file.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Errors coming from manifest authentication, due to the JWS being malformed or not matching the
    /// manifest in some way.
    #[error(transparent)]
    #[cfg(feature = "authenticate")]
    JwsError(#[from] iotmw::jws::error::Error),

    /// Errors relating to provisioning credentials, such as an invalid symmetric key.
    #[error(transparent)]
    #[cfg(feature = "sas-token")]
    ProvisioningError(#[from] iotmw::provisioning::error::Error),

    /// Error emanating from the iotmw-tool itself.
    #[error(transparent)]
    ToolError(#[from] ToolErrorKind),
}

/// Errors originating in the iotmw-tool itself.
#[derive(Error, Debug)]
pub enum ToolErrorKind {
    /// There is some missing configuration for a command, such as a required environment variable or
    /// command-line option.
    #[error("Missing configuration")]
    MissingConfiguration,

    /// The requested token lifetime puts its expiry beyond the representable dates.
    #[error("Token expiry out of range")]
    InvalidExpiry,
}

/// A Result type with the Err variant set as a ToolError
pub type Result<T> = std::result::Result<T, Error>;
