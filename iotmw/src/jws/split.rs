// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

use super::error::JwsErrorKind;
use super::Result;
use log::error;

/// The three segments of a compact JWS serialisation, each still base64url encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactJws<'a> {
    pub header: &'a [u8],
    pub payload: &'a [u8],
    pub signature: &'a [u8],

    /// `header.payload`, which is the exact input the signature covers.
    pub signed_content: &'a [u8],
}

impl<'a> CompactJws<'a> {
    /// Splits `header.payload.signature`. Any other number of dots, or an empty segment, is malformed.
    pub fn split(jws: &'a [u8]) -> Result<CompactJws<'a>> {
        let mut dots = jws
            .iter()
            .enumerate()
            .filter(|&(_, &byte)| byte == b'.')
            .map(|(index, _)| index);

        let (first, second) = match (dots.next(), dots.next(), dots.next()) {
            (Some(first), Some(second), None) => (first, second),
            _ => {
                error!("JWS is not made of three '.'-separated segments");
                return Err(JwsErrorKind::MalformedJws.into());
            }
        };

        let compact = CompactJws {
            header: &jws[..first],
            payload: &jws[first + 1..second],
            signature: &jws[second + 1..],
            signed_content: &jws[..second],
        };

        if compact.header.is_empty() || compact.payload.is_empty() || compact.signature.is_empty() {
            error!("JWS has an empty segment");
            return Err(JwsErrorKind::MalformedJws.into());
        }

        Ok(compact)
    }
}
