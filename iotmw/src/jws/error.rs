// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! This module provides the error definitions for failures that can occur while authenticating an
//! update manifest against its JSON Web Signature.

use thiserror::Error;

/// Errors that can be returned from manifest authentication.
#[derive(Error, Debug)]
pub enum Error {
    /// Error coming from the serde_json crate, which can happen when one of the decoded JWS or JWK
    /// documents is not well-formed JSON.
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// A JWS segment, a key component or the attested digest is not valid base64.
    #[error(transparent)]
    Base64DecodeError(#[from] base64::DecodeError),

    /// The RSA crate refused to construct a public key from the given modulus and exponent.
    #[error(transparent)]
    RsaError(#[from] rsa::errors::Error),

    /// This kind of error represents a structural or cryptographic failure detected by the
    /// authentication pipeline itself.
    #[error(transparent)]
    JwsError(#[from] JwsErrorKind),
}

/// Failures raised directly by the jws module, as opposed to errors re-badged from the JSON, base64
/// and RSA crates.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwsErrorKind {
    #[error("The scratch buffer is smaller than the minimum required size.")]
    OutOfMemory,

    #[error("A decoded value does not fit in the scratch region reserved for it.")]
    InsufficientSpace,

    #[error("The JWS does not consist of exactly three non-empty '.'-separated segments.")]
    MalformedJws,

    #[error("The required JSON field `{0}` is missing.")]
    MissingField(&'static str),

    #[error("The JSON field `{0}` does not hold a string.")]
    WrongTokenType(&'static str),

    #[error("No root key matches the key id of the signing key.")]
    RootKeyNotFound,

    #[error("The signing key algorithm is not RS256.")]
    UnsupportedAlgorithm,

    #[error("The RSA modulus is larger than 3072 bits.")]
    KeyTooLarge,

    #[error("The signature length does not match the RSA modulus size.")]
    InvalidSignatureLength,

    #[error("The recovered signature block is not a PKCS#1 v1.5 encoded SHA-256 digest.")]
    InvalidPadding,

    #[error("The signature does not match the signed content.")]
    SignatureMismatch,

    #[error("The attested manifest digest is not 32 bytes long.")]
    InvalidDigestLength,

    #[error("The SHA-256 of the manifest does not match the attested digest.")]
    DigestMismatch,
}
