// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Authentication of update manifests signed with a JSON Web Signature.
//!
//! An update manifest is delivered together with a compact JWS. The JWS payload attests the SHA-256 of the
//! manifest, and the JWS header carries the signing key as an embedded JWS of its own (`sjwk`) whose
//! signature chains to one of a fixed set of root keys:
//!
//! ```text
//!   root key --signs--> signing key (sjwk) --signs--> {"sha256": ...} --attests--> manifest
//! ```
//!
//! [authenticate_manifest] checks every link of that chain. It performs no heap allocation for decoded
//! values: everything is decoded into a caller-supplied scratch buffer of at least [SCRATCH_BUFFER_SIZE]
//! bytes, see the [scratch] module for how the buffer is shared between verification phases.

pub mod codec;
pub mod error;
pub mod fields;
pub mod root_keys;
pub mod rs256;
pub mod scratch;
pub mod split;

use error::{Error, JwsErrorKind};
use log::{debug, error};
use scratch::Reusable;
use sha2::{Digest, Sha256};
use split::CompactJws;
use std::borrow::Cow;

pub use root_keys::ADU_ROOT_KEYS;

pub type Result<T> = std::result::Result<T, Error>;

/// Size in bytes of a 3072-bit RSA modulus.
pub const RSA3072_SIZE: usize = 384;
/// Size in bytes of a SHA-256 digest.
pub const SHA256_SIZE: usize = 32;
/// Offset of the digest within a SHA-256 DigestInfo.
pub const PKCS7_PAYLOAD_OFFSET: usize = 19;

pub const JWS_HEADER_SIZE: usize = 1400;
pub const JWS_PAYLOAD_SIZE: usize = 60;
pub const JWK_HEADER_SIZE: usize = 48;
pub const JWK_PAYLOAD_SIZE: usize = 700;
pub const SIGNATURE_SIZE: usize = 400;
pub const SIGNING_KEY_E_SIZE: usize = 10;
pub const SIGNING_KEY_N_SIZE: usize = RSA3072_SIZE;
pub const SHA_CALCULATION_SCRATCH_SIZE: usize = RSA3072_SIZE + SHA256_SIZE;

/// Minimum size of the scratch buffer passed to [authenticate_manifest].
///
/// The JWS payload, one signature slot and one SHA-256 slot are not counted, because they reuse the
/// memory released after the signing key has been verified.
pub const SCRATCH_BUFFER_SIZE: usize = JWS_HEADER_SIZE
    + JWK_HEADER_SIZE
    + JWK_PAYLOAD_SIZE
    + SIGNATURE_SIZE
    + SIGNING_KEY_N_SIZE
    + SIGNING_KEY_E_SIZE
    + SHA_CALCULATION_SCRATCH_SIZE;

const RS256: &str = "RS256";

/// An RSA public key trusted to sign manifest signing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootKey<'a> {
    /// Key id, compared byte for byte against the `kid` of the signing key's JWS header.
    pub id: &'a str,
    /// Big-endian modulus.
    pub modulus: &'a [u8],
    /// Big-endian public exponent.
    pub exponent: &'a [u8],
}

/// Base64 encoded modulus and exponent of a signing key that has been verified against a root key.
struct SigningKey<'a> {
    modulus: Cow<'a, str>,
    exponent: Cow<'a, str>,
}

/// Authenticates `manifest` against the compact JWS `jws`.
///
/// Succeeds only if the signing key embedded in the JWS header is signed by one of `root_keys`, the JWS
/// itself is signed by that signing key, and the JWS payload attests the SHA-256 of `manifest`. The
/// `scratch` buffer must be at least [SCRATCH_BUFFER_SIZE] bytes, otherwise `OutOfMemory` is returned
/// before any work is done.
pub fn authenticate_manifest(
    manifest: &[u8],
    jws: &[u8],
    root_keys: &[RootKey],
    scratch: &mut [u8],
) -> Result<()> {
    let (persistent, mut reusable) = scratch::split(scratch)?;

    let outer = CompactJws::split(jws)?;
    let header = codec::decode_base64url(outer.header, persistent.jws_header)
        .map_err(failed("decoding the JWS header"))?;
    let sjwk = fields::find_string(header, "sjwk")?;

    let signing_key = verify_signing_key(
        sjwk.as_bytes(),
        persistent.jwk_payload,
        root_keys,
        &mut reusable,
    )?;

    {
        let mut phase = reusable.phase();
        let signature = codec::decode_base64url(outer.signature, phase.carve(SIGNATURE_SIZE)?)
            .map_err(failed("decoding the JWS signature"))?;
        let modulus = codec::decode_base64(
            signing_key.modulus.as_bytes(),
            phase.carve(SIGNING_KEY_N_SIZE)?,
        )
        .map_err(failed("decoding the signing key modulus"))?;
        let exponent = codec::decode_base64(
            signing_key.exponent.as_bytes(),
            phase.carve(SIGNING_KEY_E_SIZE)?,
        )
        .map_err(failed("decoding the signing key exponent"))?;

        rs256::verify_rs256(
            outer.signed_content,
            signature,
            modulus,
            exponent,
            phase.carve(SHA_CALCULATION_SCRATCH_SIZE)?,
        )
        .map_err(failed("verifying the manifest signature"))?;
    }

    let mut phase = reusable.phase();
    let payload = codec::decode_base64url(outer.payload, phase.carve(JWS_PAYLOAD_SIZE)?)
        .map_err(failed("decoding the JWS payload"))?;
    let encoded_digest = fields::find_string(payload, "sha256")?;
    let attested = codec::decode_base64(encoded_digest.as_bytes(), phase.carve(SHA256_SIZE)?)
        .map_err(failed("decoding the attested manifest digest"))?;
    if attested.len() != SHA256_SIZE {
        error!("Attested manifest digest is {} bytes", attested.len());
        return Err(JwsErrorKind::InvalidDigestLength.into());
    }

    let calculated = phase.carve(SHA256_SIZE)?;
    calculated.copy_from_slice(&Sha256::digest(manifest));
    // The attested digest is public, so the comparison need not be constant time.
    if attested != &calculated[..] {
        error!("Manifest digest does not match the digest attested by the JWS");
        return Err(JwsErrorKind::DigestMismatch.into());
    }

    debug!("Manifest authenticated");
    Ok(())
}

/// Verifies the embedded signing key JWS against the root keys and returns the signing key.
///
/// The decoded JWK payload is kept in `jwk_payload`, since the returned key borrows from it. Everything
/// else lives in one phase of the reusable region.
fn verify_signing_key<'k>(
    sjwk: &[u8],
    jwk_payload: &'k mut [u8],
    root_keys: &[RootKey],
    reusable: &mut Reusable,
) -> Result<SigningKey<'k>> {
    let jwk = CompactJws::split(sjwk)?;
    let mut phase = reusable.phase();

    let header = codec::decode_base64url(jwk.header, phase.carve(JWK_HEADER_SIZE)?)
        .map_err(failed("decoding the signing key header"))?;
    let payload = codec::decode_base64url(jwk.payload, jwk_payload)
        .map_err(failed("decoding the signing key payload"))?;
    let signature = codec::decode_base64url(jwk.signature, phase.carve(SIGNATURE_SIZE)?)
        .map_err(failed("decoding the signing key signature"))?;

    let kid = fields::find_string(header, "kid")?;
    let root_key = root_keys
        .iter()
        .find(|key| key.id.as_bytes() == kid.as_bytes())
        .ok_or_else(|| {
            error!("Signing key is signed by unknown root key {}", kid);
            Error::from(JwsErrorKind::RootKeyNotFound)
        })?;

    rs256::verify_rs256(
        jwk.signed_content,
        signature,
        root_key.modulus,
        root_key.exponent,
        phase.carve(SHA_CALCULATION_SCRATCH_SIZE)?,
    )
    .map_err(failed("verifying the signing key against its root key"))?;

    let modulus = fields::find_string(payload, "n")?;
    let exponent = fields::find_string(payload, "e")?;
    let alg = fields::find_string(payload, "alg")?;
    if alg != RS256 {
        error!("Signing key algorithm {} is not supported", alg);
        return Err(JwsErrorKind::UnsupportedAlgorithm.into());
    }

    debug!("Signing key verified with root key {}", root_key.id);
    Ok(SigningKey { modulus, exponent })
}

fn failed(step: &'static str) -> impl Fn(Error) -> Error {
    move |e| {
        error!("Failed {}: {}", step, e);
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use rsa::hash::Hash;
    use rsa::{PaddingScheme, PublicKeyParts, RsaPrivateKey};

    const VALID_MANIFEST: &str = concat!(
        r#"{"manifestVersion":"4","updateId":{"provider":"ESPRESSIF","name":"ESP32-Azure-IoT-Kit","ve"#,
        r#"rsion":"1.1"},"compatibility":[{"deviceManufacturer":"ESPRESSIF","deviceModel":"ESP32-Azur"#,
        r#"e-IoT-Kit"}],"instructions":{"steps":[{"handler":"microsoft/swupdate:1","files":["fc355847"#,
        r#"7982e3235"],"handlerProperties":{"installedCriteria":"1.0"}}]},"files":{"fc3558477982e3235"#,
        r#"":{"fileName":"azure_iot_freertos_esp32.bin","sizeInBytes":866128,"hashes":{"sha256":"exKJ"#,
        r#"AqfEo69Ok6C6SWy9+Hhp051JbRsXsnMjGSbbJ6o="}}},"createdDateTime":"2022-06-03T00:20:33.842112"#,
        r#"2Z"}"#,
    );

    const VALID_MANIFEST_JWS: &str = concat!(
        "eyJhbGciOiJSUzI1NiIsInNqd2siOiJleUpoYkdjaU9pSlNVekkxTmlJc0ltdHBaQ0k2SWtGRVZTNHlNREEzTURJdV",
        "VpSjkuZXlKcmRIa2lPaUpTVTBFaUxDSnVJam9pYkV4bWMwdHZPRmwwWW1Oak1sRXpUalV3VlhSTVNXWlhVVXhXVTBG",
        "RlltTm9LMFl2WTJVM1V6Rlpja3BvV0U5VGNucFRaa051VEhCVmFYRlFWSGMwZWxndmRHbEJja0ZGZFhrM1JFRmxWVz",
        "VGU0VWamVEZE9hM2QzZVRVdk9IcExaV3AyWTBWWWNFRktMMlV6UWt0SE5FVTBiMjVtU0ZGRmNFOXplSGRQUzBWbFJ6",
        "QkhkamwzVjB3emVsUmpUblprUzFoUFJGaEdNMVZRWlVveGIwZGlVRkZ0Y3pKNmJVTktlRUppZEZOSldVbDBiWFpwWT",
        "NneVpXdGtWbnBYUm5jdmRrdFVUblZMYXpob2NVczNTRkptYWs5VlMzVkxXSGxqSzNsSVVVa3dZVVpDY2pKNmEyc3pl",
        "R2d4ZEVWUFN6azRWMHBtZUdKamFsQnpSRTgyWjNwWmVtdFlla05OZW1Fd1R6QkhhV0pDWjB4QlZGUTVUV1k0V1ZCd1",
        "dVY3lhblpQWVVSVmIwTlJiakpWWTFWU1RtUnNPR2hLWW5scWJscHZNa3B5SzFVNE5IbDFjVTlyTjBZMFdubFRiMEoy",
        "TkdKWVNrZ3lXbEpTV2tab0wzVlRiSE5XT1hkU2JWbG9XWEoyT1RGRVdtbHhhemhJVWpaRVUyeHVabTVsZFRJNFJsUm",
        "9SVzF0YjNOVlRUTnJNbGxNYzBKak5FSnZkWEIwTTNsaFNEaFpia3BVTnpSMU16TjFlakU1TDAxNlZIVnFTMmMzVkdG",
        "cE1USXJXR0owYmxwRU9XcFVSMkY1U25Sc2FFWmxWeXRJUXpVM1FYUkJSbHBvY1ZsM2VVZHJXQ3M0TTBGaFVGaGFOR0",
        "V4VHpoMU1qTk9WVWQxTWtGd04yOU5NVTR3ZVVKS0swbHNUM29pTENKbElqb2lRVkZCUWlJc0ltRnNaeUk2SWxKVE1q",
        "VTJJaXdpYTJsa0lqb2lRVVJWTGpJeE1EWXdPUzVTTGxNaWZRLlJLS2VBZE02dGFjdWZpSVU3eTV2S3dsNFpQLURMNn",
        "EteHlrTndEdkljZFpIaTBIa2RIZ1V2WnoyZzZCTmpLS21WTU92dXp6TjhEczhybXo1dnMwT1RJN2tYUG1YeDZFLUYy",
        "UXVoUXNxT3J5LS1aN2J3TW5LYTNkZk1sbkthWU9PdURtV252RWMyR0hWdVVTSzREbmw0TE9vTTQxOVlMNThWTDAtSE",
        "thU18xYmNOUDhXYjVZR08xZXh1RmpiVGtIZkNIU0duVThJeUFjczlGTjhUT3JETHZpVEtwcWtvM3RiSUwxZE1TN3Nh",
        "LWJkZExUVWp6TnVLTmFpNnpIWTdSanZGbjhjUDN6R2xjQnN1aVQ0XzVVaDZ0M05rZW1UdV9tZjdtZUFLLTBTMTAzMF",
        "pSNnNTR281azgtTE1sX0ZaUmh4djNFZFNtR2RBUTNlMDVMRzNnVVAyNzhTQWVzWHhNQUlHWmcxUFE3aEpoZGZHdmVG",
        "anJNdkdTSVFEM09wRnEtZHREcEFXbUo2Zm5sZFA1UWxYek5tQkJTMlZRQUtXZU9BYjh0Yjl5aVhsemhtT1dLRjF4Sz",
        "lseHpYUG9GNmllOFRUWlJ4T0hxTjNiSkVISkVoQmVLclh6YkViV2tFNm4zTEoxbkd5M1htUlVFcER0Umdpa0tBUzZy",
        "bFhFT0VneXNjIn0.eyJzaGEyNTYiOiJMeTlqT1hHc1ZvQ1daM0N1dFhsWWNXQ2VYY2V3YkR4Ri9GbjVqM2srSW1ZPS",
        "J9.Wq4UoXt4dGay_P8uy7jrxM8Iip3KCXkGZvQwnu83704CzDogfVqX4GegT68s47veOi3x2Gf5rjX7vOMzVf9Ck0y",
        "lGCfon-vit938hO9MNYM7siA5htYHzotdECD1LfI_BjlLxkwXt0OyLC1PJvMw9N870pb51NtTon0OmaQslEyf6ih6D",
        "rEvsNUnyjRcrzSWlIyRo18kqlzeetARTYE7qGQr7oZPh0RWXVP5b5XR3wbJ_IeZ6i85YmjFpbRGJaSPCuzpa7XKvvF",
        "zB5rB5lGmbkWsOMyLbVzUriW87BzbB06g-wzs1S-z07s-ZGjTbFdrXrGjkKtv3TaDirjTqHhhJyI2cVLBctr4Wv4XI",
        "TPyZeJt2KcIQZup-KfCRNbM3c3_PXPgvJtOg5BhmUrUKGMqFTl84EIB44B1QqKmuiTdH3bNQxPKBecpCk-O9g03pB-",
        "fk1D_3sL1ju364STs87s77DfGK9e0oHbHgfzp4EdgrwRQBvTCWWKG3iT6ByfSH4N0",
    );

    // Same as VALID_MANIFEST_JWS with the first three characters of the sha256 value altered.
    const WRONG_SHA_MANIFEST_JWS: &str = concat!(
        "eyJhbGciOiJSUzI1NiIsInNqd2siOiJleUpoYkdjaU9pSlNVekkxTmlJc0ltdHBaQ0k2SWtGRVZTNHlNREEzTURJdV",
        "VpSjkuZXlKcmRIa2lPaUpTVTBFaUxDSnVJam9pYkV4bWMwdHZPRmwwWW1Oak1sRXpUalV3VlhSTVNXWlhVVXhXVTBG",
        "RlltTm9LMFl2WTJVM1V6Rlpja3BvV0U5VGNucFRaa051VEhCVmFYRlFWSGMwZWxndmRHbEJja0ZGZFhrM1JFRmxWVz",
        "VGU0VWamVEZE9hM2QzZVRVdk9IcExaV3AyWTBWWWNFRktMMlV6UWt0SE5FVTBiMjVtU0ZGRmNFOXplSGRQUzBWbFJ6",
        "QkhkamwzVjB3emVsUmpUblprUzFoUFJGaEdNMVZRWlVveGIwZGlVRkZ0Y3pKNmJVTktlRUppZEZOSldVbDBiWFpwWT",
        "NneVpXdGtWbnBYUm5jdmRrdFVUblZMYXpob2NVczNTRkptYWs5VlMzVkxXSGxqSzNsSVVVa3dZVVpDY2pKNmEyc3pl",
        "R2d4ZEVWUFN6azRWMHBtZUdKamFsQnpSRTgyWjNwWmVtdFlla05OZW1Fd1R6QkhhV0pDWjB4QlZGUTVUV1k0V1ZCd1",
        "dVY3lhblpQWVVSVmIwTlJiakpWWTFWU1RtUnNPR2hLWW5scWJscHZNa3B5SzFVNE5IbDFjVTlyTjBZMFdubFRiMEoy",
        "TkdKWVNrZ3lXbEpTV2tab0wzVlRiSE5XT1hkU2JWbG9XWEoyT1RGRVdtbHhhemhJVWpaRVUyeHVabTVsZFRJNFJsUm",
        "9SVzF0YjNOVlRUTnJNbGxNYzBKak5FSnZkWEIwTTNsaFNEaFpia3BVTnpSMU16TjFlakU1TDAxNlZIVnFTMmMzVkdG",
        "cE1USXJXR0owYmxwRU9XcFVSMkY1U25Sc2FFWmxWeXRJUXpVM1FYUkJSbHBvY1ZsM2VVZHJXQ3M0TTBGaFVGaGFOR0",
        "V4VHpoMU1qTk9WVWQxTWtGd04yOU5NVTR3ZVVKS0swbHNUM29pTENKbElqb2lRVkZCUWlJc0ltRnNaeUk2SWxKVE1q",
        "VTJJaXdpYTJsa0lqb2lRVVJWTGpJeE1EWXdPUzVTTGxNaWZRLlJLS2VBZE02dGFjdWZpSVU3eTV2S3dsNFpQLURMNn",
        "EteHlrTndEdkljZFpIaTBIa2RIZ1V2WnoyZzZCTmpLS21WTU92dXp6TjhEczhybXo1dnMwT1RJN2tYUG1YeDZFLUYy",
        "UXVoUXNxT3J5LS1aN2J3TW5LYTNkZk1sbkthWU9PdURtV252RWMyR0hWdVVTSzREbmw0TE9vTTQxOVlMNThWTDAtSE",
        "thU18xYmNOUDhXYjVZR08xZXh1RmpiVGtIZkNIU0duVThJeUFjczlGTjhUT3JETHZpVEtwcWtvM3RiSUwxZE1TN3Nh",
        "LWJkZExUVWp6TnVLTmFpNnpIWTdSanZGbjhjUDN6R2xjQnN1aVQ0XzVVaDZ0M05rZW1UdV9tZjdtZUFLLTBTMTAzMF",
        "pSNnNTR281azgtTE1sX0ZaUmh4djNFZFNtR2RBUTNlMDVMRzNnVVAyNzhTQWVzWHhNQUlHWmcxUFE3aEpoZGZHdmVG",
        "anJNdkdTSVFEM09wRnEtZHREcEFXbUo2Zm5sZFA1UWxYek5tQkJTMlZRQUtXZU9BYjh0Yjl5aVhsemhtT1dLRjF4Sz",
        "lseHpYUG9GNmllOFRUWlJ4T0hxTjNiSkVISkVoQmVLclh6YkViV2tFNm4zTEoxbkd5M1htUlVFcER0Umdpa0tBUzZy",
        "bFhFT0VneXNjIn0.eyJzaGEyNTYiOmFiY2pPWEdzVm9DV1ozQ3V0WGxZY1dDZVhjZXdiRHhGL0ZuNWozaytJbVk9In",
        "0.Wq4UoXt4dGay_P8uy7jrxM8Iip3KCXkGZvQwnu83704CzDogfVqX4GegT68s47veOi3x2Gf5rjX7vOMzVf9Ck0yl",
        "GCfon-vit938hO9MNYM7siA5htYHzotdECD1LfI_BjlLxkwXt0OyLC1PJvMw9N870pb51NtTon0OmaQslEyf6ih6Dr",
        "EvsNUnyjRcrzSWlIyRo18kqlzeetARTYE7qGQr7oZPh0RWXVP5b5XR3wbJ_IeZ6i85YmjFpbRGJaSPCuzpa7XKvvFz",
        "B5rB5lGmbkWsOMyLbVzUriW87BzbB06g-wzs1S-z07s-ZGjTbFdrXrGjkKtv3TaDirjTqHhhJyI2cVLBctr4Wv4XIT",
        "PyZeJt2KcIQZup-KfCRNbM3c3_PXPgvJtOg5BhmUrUKGMqFTl84EIB44B1QqKmuiTdH3bNQxPKBecpCk-O9g03pB-f",
        "k1D_3sL1ju364STs87s77DfGK9e0oHbHgfzp4EdgrwRQBvTCWWKG3iT6ByfSH4N0",
    );

    const TEST_ROOT_KEY_ID: &str = "TEST.ROOT";

    fn expect_kind(result: Result<()>, expected: JwsErrorKind) {
        match result {
            Err(Error::JwsError(kind)) => assert_eq!(expected, kind),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    fn authenticate(manifest: &[u8], jws: &[u8], root_keys: &[RootKey]) -> Result<()> {
        let mut scratch = vec![0u8; SCRATCH_BUFFER_SIZE];
        authenticate_manifest(manifest, jws, root_keys, &mut scratch)
    }

    fn sign_compact(key: &RsaPrivateKey, header: &str, payload: &str) -> String {
        let signed_content = format!(
            "{}.{}",
            base64::encode_config(header, base64::URL_SAFE_NO_PAD),
            base64::encode_config(payload, base64::URL_SAFE_NO_PAD)
        );
        let digest = Sha256::digest(signed_content.as_bytes());
        let signature = key
            .sign(
                PaddingScheme::new_pkcs1v15_sign(Some(Hash::SHA2_256)),
                &digest,
            )
            .unwrap();

        format!(
            "{}.{}",
            signed_content,
            base64::encode_config(signature, base64::URL_SAFE_NO_PAD)
        )
    }

    /// A root key and a signing key, both small enough to generate quickly.
    struct TestChain {
        root: RsaPrivateKey,
        signing: RsaPrivateKey,
        root_modulus: Vec<u8>,
        root_exponent: Vec<u8>,
    }

    impl TestChain {
        fn new() -> TestChain {
            let root = RsaPrivateKey::new(&mut OsRng, 1024).unwrap();
            let signing = RsaPrivateKey::new(&mut OsRng, 1024).unwrap();
            let root_modulus = root.n().to_bytes_be();
            let root_exponent = root.e().to_bytes_be();
            TestChain {
                root,
                signing,
                root_modulus,
                root_exponent,
            }
        }

        fn root_key(&self) -> RootKey<'_> {
            RootKey {
                id: TEST_ROOT_KEY_ID,
                modulus: &self.root_modulus,
                exponent: &self.root_exponent,
            }
        }

        fn sjwk(&self, alg: &str) -> String {
            let header = format!(r#"{{"alg":"RS256","kid":"{}"}}"#, TEST_ROOT_KEY_ID);
            let payload = format!(
                r#"{{"kty":"RSA","n":"{}","e":"{}","alg":"{}","kid":"TEST.SIGNING"}}"#,
                base64::encode(self.signing.n().to_bytes_be()),
                base64::encode(self.signing.e().to_bytes_be()),
                alg
            );
            sign_compact(&self.root, &header, &payload)
        }

        fn manifest_jws(&self, alg: &str, payload: &str) -> String {
            let header = format!(r#"{{"alg":"RS256","sjwk":"{}"}}"#, self.sjwk(alg));
            sign_compact(&self.signing, &header, payload)
        }

        fn attest(&self, manifest: &[u8]) -> String {
            let payload = format!(
                r#"{{"sha256":"{}"}}"#,
                base64::encode(Sha256::digest(manifest))
            );
            self.manifest_jws(RS256, &payload)
        }
    }

    #[test]
    fn scratch_size_matches_region_budget() {
        assert_eq!(3358, SCRATCH_BUFFER_SIZE);
    }

    #[test]
    fn valid_manifest_authenticates() {
        authenticate(
            VALID_MANIFEST.as_bytes(),
            VALID_MANIFEST_JWS.as_bytes(),
            &ADU_ROOT_KEYS,
        )
        .unwrap();
    }

    #[test]
    fn root_keys_are_searched_by_id() {
        let reversed = [ADU_ROOT_KEYS[1], ADU_ROOT_KEYS[0]];
        authenticate(
            VALID_MANIFEST.as_bytes(),
            VALID_MANIFEST_JWS.as_bytes(),
            &reversed,
        )
        .unwrap();
    }

    #[test]
    fn valid_manifest_with_exact_scratch_size() {
        let mut scratch = vec![0u8; SCRATCH_BUFFER_SIZE];
        authenticate_manifest(
            VALID_MANIFEST.as_bytes(),
            VALID_MANIFEST_JWS.as_bytes(),
            &ADU_ROOT_KEYS,
            &mut scratch,
        )
        .unwrap();

        let mut scratch = vec![0u8; SCRATCH_BUFFER_SIZE - 1];
        expect_kind(
            authenticate_manifest(
                VALID_MANIFEST.as_bytes(),
                VALID_MANIFEST_JWS.as_bytes(),
                &ADU_ROOT_KEYS,
                &mut scratch,
            ),
            JwsErrorKind::OutOfMemory,
        );
    }

    #[test]
    fn altered_manifest_is_rejected() {
        let invalid = VALID_MANIFEST.replace(r#""manifestVersion":"4""#, r#""manifestVersion":"5""#);
        assert_ne!(VALID_MANIFEST, invalid);
        expect_kind(
            authenticate(
                invalid.as_bytes(),
                VALID_MANIFEST_JWS.as_bytes(),
                &ADU_ROOT_KEYS,
            ),
            JwsErrorKind::DigestMismatch,
        );
    }

    #[test]
    fn altered_payload_is_rejected() {
        expect_kind(
            authenticate(
                VALID_MANIFEST.as_bytes(),
                WRONG_SHA_MANIFEST_JWS.as_bytes(),
                &ADU_ROOT_KEYS,
            ),
            JwsErrorKind::SignatureMismatch,
        );
    }

    #[test]
    fn unknown_root_key_is_rejected() {
        expect_kind(
            authenticate(
                VALID_MANIFEST.as_bytes(),
                VALID_MANIFEST_JWS.as_bytes(),
                &[root_keys::ADU_ROOT_KEY_200703],
            ),
            JwsErrorKind::RootKeyNotFound,
        );
        expect_kind(
            authenticate(VALID_MANIFEST.as_bytes(), VALID_MANIFEST_JWS.as_bytes(), &[]),
            JwsErrorKind::RootKeyNotFound,
        );
    }

    #[test]
    fn root_key_with_matching_id_but_wrong_modulus_is_rejected() {
        let impostor = RootKey {
            id: "ADU.200702.R",
            ..root_keys::ADU_ROOT_KEY_200703
        };
        match authenticate(
            VALID_MANIFEST.as_bytes(),
            VALID_MANIFEST_JWS.as_bytes(),
            &[impostor],
        ) {
            Err(Error::JwsError(JwsErrorKind::InvalidPadding))
            | Err(Error::JwsError(JwsErrorKind::SignatureMismatch)) => (),
            _ => panic!("Unexpected error type."),
        }
    }

    #[test]
    fn extra_segment_is_rejected() {
        let jws = format!("{}.AAAA", VALID_MANIFEST_JWS);
        expect_kind(
            authenticate(VALID_MANIFEST.as_bytes(), jws.as_bytes(), &ADU_ROOT_KEYS),
            JwsErrorKind::MalformedJws,
        );
        expect_kind(
            authenticate(VALID_MANIFEST.as_bytes(), b"abc.def", &ADU_ROOT_KEYS),
            JwsErrorKind::MalformedJws,
        );
    }

    #[test]
    fn synthetic_chain_authenticates() {
        let chain = TestChain::new();
        let jws = chain.attest(VALID_MANIFEST.as_bytes());
        authenticate(VALID_MANIFEST.as_bytes(), jws.as_bytes(), &[chain.root_key()]).unwrap();

        let keys = [ADU_ROOT_KEYS[0], chain.root_key(), ADU_ROOT_KEYS[1]];
        authenticate(VALID_MANIFEST.as_bytes(), jws.as_bytes(), &keys).unwrap();
    }

    #[test]
    fn unsupported_signing_algorithm_is_rejected() {
        let chain = TestChain::new();
        let payload = format!(
            r#"{{"sha256":"{}"}}"#,
            base64::encode(Sha256::digest(VALID_MANIFEST.as_bytes()))
        );
        let jws = chain.manifest_jws("RS384", &payload);
        expect_kind(
            authenticate(VALID_MANIFEST.as_bytes(), jws.as_bytes(), &[chain.root_key()]),
            JwsErrorKind::UnsupportedAlgorithm,
        );

        let jws = chain.manifest_jws("rs256", &payload);
        expect_kind(
            authenticate(VALID_MANIFEST.as_bytes(), jws.as_bytes(), &[chain.root_key()]),
            JwsErrorKind::UnsupportedAlgorithm,
        );
    }

    #[test]
    fn signed_digest_mismatch_is_rejected() {
        let chain = TestChain::new();
        let jws = chain.attest(b"some other manifest");
        expect_kind(
            authenticate(VALID_MANIFEST.as_bytes(), jws.as_bytes(), &[chain.root_key()]),
            JwsErrorKind::DigestMismatch,
        );
    }

    #[test]
    fn short_digest_is_rejected() {
        let chain = TestChain::new();
        let payload = format!(r#"{{"sha256":"{}"}}"#, base64::encode(&[0u8; 31][..]));
        let jws = chain.manifest_jws(RS256, &payload);
        expect_kind(
            authenticate(VALID_MANIFEST.as_bytes(), jws.as_bytes(), &[chain.root_key()]),
            JwsErrorKind::InvalidDigestLength,
        );
    }

    #[test]
    fn missing_digest_is_rejected() {
        let chain = TestChain::new();
        let jws = chain.manifest_jws(RS256, r#"{"sha1":"AAAA"}"#);
        expect_kind(
            authenticate(VALID_MANIFEST.as_bytes(), jws.as_bytes(), &[chain.root_key()]),
            JwsErrorKind::MissingField("sha256"),
        );
    }

    #[test]
    fn missing_signing_key_is_rejected() {
        let chain = TestChain::new();
        let jws = sign_compact(&chain.signing, r#"{"alg":"RS256"}"#, r#"{"sha256":"AAAA"}"#);
        expect_kind(
            authenticate(VALID_MANIFEST.as_bytes(), jws.as_bytes(), &[chain.root_key()]),
            JwsErrorKind::MissingField("sjwk"),
        );
    }

    #[test]
    fn signing_key_not_signed_by_root_is_rejected() {
        let chain = TestChain::new();
        let impostor = TestChain::new();
        let jws = impostor.attest(VALID_MANIFEST.as_bytes());
        match authenticate(VALID_MANIFEST.as_bytes(), jws.as_bytes(), &[chain.root_key()]) {
            Err(Error::JwsError(JwsErrorKind::InvalidPadding))
            | Err(Error::JwsError(JwsErrorKind::SignatureMismatch)) => (),
            _ => panic!("Unexpected error type."),
        }
    }

    #[test]
    fn oversized_header_is_rejected() {
        let chain = TestChain::new();
        let padding = "x".repeat(JWS_HEADER_SIZE);
        let header = format!(
            r#"{{"alg":"RS256","pad":"{}","sjwk":"{}"}}"#,
            padding,
            chain.sjwk(RS256)
        );
        let jws = sign_compact(&chain.signing, &header, r#"{"sha256":"AAAA"}"#);
        expect_kind(
            authenticate(VALID_MANIFEST.as_bytes(), jws.as_bytes(), &[chain.root_key()]),
            JwsErrorKind::InsufficientSpace,
        );
    }
}
