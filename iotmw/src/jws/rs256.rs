// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! RSASSA-PKCS1-v1_5 signature verification with SHA-256 (the JWS `RS256` algorithm).
//!
//! The signature is raised to the public exponent and the recovered block is written into the caller's
//! scratch region, together with the SHA-256 of the signed content, so the comparison works entirely
//! inside memory the caller accounted for.

use super::error::JwsErrorKind;
use super::{Result, PKCS7_PAYLOAD_OFFSET, RSA3072_SIZE, SHA256_SIZE, SHA_CALCULATION_SCRATCH_SIZE};
use log::error;
use rsa::{BigUint, PublicKeyParts, RsaPublicKey};
use sha2::{Digest, Sha256};

/// DER encoding of the DigestInfo prefix for a SHA-256 digest.
const SHA256_DIGEST_INFO_PREFIX: [u8; PKCS7_PAYLOAD_OFFSET] = [
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01, 0x05,
    0x00, 0x04, 0x20,
];

/// Minimum number of 0xff filler bytes in a type 1 encryption block.
const MIN_FILLER_LENGTH: usize = 8;

/// Verifies `signature` over `message` with the RSA public key (`modulus`, `exponent`).
///
/// `scratch` must hold at least [SHA_CALCULATION_SCRATCH_SIZE] bytes. Its first [RSA3072_SIZE] bytes
/// receive the recovered signature block and the following [SHA256_SIZE] bytes the message digest.
pub fn verify_rs256(
    message: &[u8],
    signature: &[u8],
    modulus: &[u8],
    exponent: &[u8],
    scratch: &mut [u8],
) -> Result<()> {
    if scratch.len() < SHA_CALCULATION_SCRATCH_SIZE {
        error!(
            "RS256 scratch region of {} bytes is smaller than {}",
            scratch.len(),
            SHA_CALCULATION_SCRATCH_SIZE
        );
        return Err(JwsErrorKind::InsufficientSpace.into());
    }

    let key = RsaPublicKey::new(
        BigUint::from_bytes_be(modulus),
        BigUint::from_bytes_be(exponent),
    )?;

    let key_size = key.size();
    if key_size > RSA3072_SIZE {
        error!("RSA key of {} bytes exceeds the supported size", key_size);
        return Err(JwsErrorKind::KeyTooLarge.into());
    }

    if signature.len() != key_size {
        error!(
            "Signature is {} bytes but the key modulus is {} bytes",
            signature.len(),
            key_size
        );
        return Err(JwsErrorKind::InvalidSignatureLength.into());
    }

    let signature = BigUint::from_bytes_be(signature);
    if &signature >= key.n() {
        error!("Signature representative is out of range for the key");
        return Err(JwsErrorKind::SignatureMismatch.into());
    }

    let recovered = signature.modpow(key.e(), key.n()).to_bytes_be();
    let (block, digest) = scratch.split_at_mut(RSA3072_SIZE);
    let block = &mut block[..key_size];
    let digest = &mut digest[..SHA256_SIZE];

    let leading = key_size
        .checked_sub(recovered.len())
        .ok_or(JwsErrorKind::InvalidPadding)?;
    for byte in block[..leading].iter_mut() {
        *byte = 0;
    }
    block[leading..].copy_from_slice(&recovered);
    digest.copy_from_slice(&Sha256::digest(message));

    let digest_info = strip_padding(block)?;
    if digest_info.len() != PKCS7_PAYLOAD_OFFSET + SHA256_SIZE
        || digest_info[..PKCS7_PAYLOAD_OFFSET] != SHA256_DIGEST_INFO_PREFIX
    {
        error!("Recovered signature block does not carry a SHA-256 DigestInfo");
        return Err(JwsErrorKind::InvalidPadding.into());
    }

    // Both digests are public, so the comparison need not be constant time.
    if digest_info[PKCS7_PAYLOAD_OFFSET..] != digest[..] {
        error!("Signature digest does not match the signed content");
        return Err(JwsErrorKind::SignatureMismatch.into());
    }

    Ok(())
}

/// Strips `00 01 ff..ff 00` from an encryption block and returns what follows.
fn strip_padding(block: &[u8]) -> Result<&[u8]> {
    if block.len() < 2 || block[0] != 0x00 || block[1] != 0x01 {
        error!("Recovered signature block has an invalid header");
        return Err(JwsErrorKind::InvalidPadding.into());
    }

    let filler = block[2..].iter().take_while(|&&byte| byte == 0xff).count();
    let separator = 2 + filler;
    if filler < MIN_FILLER_LENGTH || block.get(separator) != Some(&0x00) {
        error!("Recovered signature block has invalid filler");
        return Err(JwsErrorKind::InvalidPadding.into());
    }

    Ok(&block[separator + 1..])
}
