// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Bounded base64 decoding into caller-provided regions.
//!
//! JWS segments use the URL-safe alphabet without padding, while the JWK key components and the attested
//! manifest digest use the standard alphabet. Both decoders compute the exact decoded length first and
//! refuse to write when the destination region is too small.

use super::error::JwsErrorKind;
use super::Result;
use log::error;

/// Returns the number of bytes `input` decodes to. Up to two trailing `=` characters are ignored.
pub fn decoded_length(input: &[u8]) -> Result<usize> {
    let padding = input
        .iter()
        .rev()
        .take(2)
        .take_while(|&&byte| byte == b'=')
        .count();
    let encoded = input.len() - padding;
    let tail = match encoded % 4 {
        0 => 0,
        2 => 1,
        3 => 2,
        _ => return Err(base64::DecodeError::InvalidLength.into()),
    };

    Ok(encoded / 4 * 3 + tail)
}

/// Decodes a base64url segment into `output`, returning the decoded prefix of `output`.
pub fn decode_base64url<'b>(input: &[u8], output: &'b mut [u8]) -> Result<&'b [u8]> {
    decode_into(input, base64::URL_SAFE_NO_PAD, output)
}

/// Decodes standard base64 into `output`, returning the decoded prefix of `output`.
pub fn decode_base64<'b>(input: &[u8], output: &'b mut [u8]) -> Result<&'b [u8]> {
    decode_into(input, base64::STANDARD, output)
}

fn decode_into<'b>(input: &[u8], config: base64::Config, output: &'b mut [u8]) -> Result<&'b [u8]> {
    let required = decoded_length(input)?;
    if required > output.len() {
        error!(
            "Decoded value needs {} bytes but its region only holds {}",
            required,
            output.len()
        );
        return Err(JwsErrorKind::InsufficientSpace.into());
    }

    let written = base64::decode_config_slice(input, config, &mut output[..required])?;
    Ok(&output[..written])
}
