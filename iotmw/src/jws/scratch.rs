// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Scratch memory for manifest authentication.
//!
//! The caller provides one contiguous buffer and no other memory is allocated for decoded values.
//! The buffer is split once into persistent regions, which hold values that must survive the whole
//! authentication, and a reusable region. Each verification phase borrows the reusable region through a
//! [Carver], which hands out disjoint sub-slices in order. Because a carver mutably borrows the reusable
//! region, nothing carved in one phase can be used once the next phase has started.

use super::error::JwsErrorKind;
use super::{Result, JWK_PAYLOAD_SIZE, JWS_HEADER_SIZE, SCRATCH_BUFFER_SIZE};
use log::error;

/// Regions that live for the whole authentication.
#[derive(Debug)]
pub struct Persistent<'a> {
    /// Decoded outer JWS header. The signing key JWS is read from here.
    pub jws_header: &'a mut [u8],

    /// Decoded signing key payload. The signing key modulus and exponent are read from here.
    pub jwk_payload: &'a mut [u8],
}

/// The region shared by the verification phases.
#[derive(Debug)]
pub struct Reusable<'a> {
    region: &'a mut [u8],
}

impl<'a> Reusable<'a> {
    /// Starts a new phase. Everything carved from a previous phase is overwritten from here on.
    pub fn phase(&mut self) -> Carver<'_> {
        Carver {
            rest: &mut *self.region,
        }
    }
}

/// Hands out consecutive, non-overlapping slices of the reusable region for a single phase.
#[derive(Debug)]
pub struct Carver<'p> {
    rest: &'p mut [u8],
}

impl<'p> Carver<'p> {
    /// Takes the next `len` bytes of the phase.
    pub fn carve(&mut self, len: usize) -> Result<&'p mut [u8]> {
        if self.rest.len() < len {
            error!(
                "Scratch phase needs {} more bytes but only {} remain",
                len,
                self.rest.len()
            );
            return Err(JwsErrorKind::OutOfMemory.into());
        }

        let rest = std::mem::take(&mut self.rest);
        let (region, rest) = rest.split_at_mut(len);
        self.rest = rest;
        Ok(region)
    }
}

/// Splits the caller's buffer into its persistent and reusable parts.
///
/// Fails with `OutOfMemory` before touching the buffer if it is smaller than [SCRATCH_BUFFER_SIZE].
pub fn split(buffer: &mut [u8]) -> Result<(Persistent<'_>, Reusable<'_>)> {
    if buffer.len() < SCRATCH_BUFFER_SIZE {
        error!(
            "Scratch buffer of {} bytes is smaller than the required {} bytes",
            buffer.len(),
            SCRATCH_BUFFER_SIZE
        );
        return Err(JwsErrorKind::OutOfMemory.into());
    }

    let (jws_header, rest) = buffer.split_at_mut(JWS_HEADER_SIZE);
    let (jwk_payload, region) = rest.split_at_mut(JWK_PAYLOAD_SIZE);

    Ok((
        Persistent {
            jws_header,
            jwk_payload,
        },
        Reusable { region },
    ))
}
