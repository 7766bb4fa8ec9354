// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Shared access signature (SAS) tokens for symmetric key attestation.
//!
//! The device proves possession of its symmetric key by presenting, as its MQTT password, an HMAC-SHA256
//! over the registration resource and an expiry time. The HMAC itself is computed by the caller through
//! [HmacFunction], so the crate does not pick a cryptography backend for it.

use super::error::ProvisioningErrorKind;
use super::protocol::{write_into, UrlEncoded};
use super::{Result, PASSWORD_MAX};
use log::error;

/// Computes HMAC-SHA256.
pub trait HmacFunction {
    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>>;
}

impl<F> HmacFunction for F
where
    F: Fn(&[u8], &[u8]) -> Result<Vec<u8>>,
{
    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        self(key, data)
    }
}

/// A device symmetric key together with the HMAC implementation used to sign with it.
pub struct SymmetricKey<'a> {
    key: Vec<u8>,
    hmac: Box<dyn HmacFunction + 'a>,
}

impl<'a> SymmetricKey<'a> {
    /// Wraps the base64 encoded symmetric key as it appears in the provisioning enrollment.
    pub fn new<H: HmacFunction + 'a>(encoded_key: &[u8], hmac: H) -> Result<SymmetricKey<'a>> {
        if encoded_key.is_empty() {
            error!("Symmetric key is empty");
            return Err(ProvisioningErrorKind::InvalidArgument.into());
        }

        Ok(SymmetricKey {
            key: base64::decode(encoded_key)?,
            hmac: Box::new(hmac),
        })
    }

    /// Writes the SAS token for `registration_id` in `id_scope`, valid until `expiry` (seconds since the
    /// Unix epoch), into `buffer`.
    pub fn write_password(
        &self,
        buffer: &mut [u8],
        id_scope: &str,
        registration_id: &str,
        expiry: u64,
    ) -> Result<usize> {
        let resource = format!(
            "{}%2Fregistrations%2F{}",
            UrlEncoded(id_scope),
            UrlEncoded(registration_id)
        );
        let signed = format!("{}\n{}", resource, expiry);
        let signature = base64::encode(self.hmac.hmac_sha256(&self.key, signed.as_bytes())?);

        write_into(
            buffer,
            format_args!(
                "SharedAccessSignature sr={}&sig={}&se={}",
                resource,
                UrlEncoded(&signature),
                expiry
            ),
        )
    }

    /// Returns the SAS token as a string, for callers that do not manage their own buffer.
    pub fn password(&self, id_scope: &str, registration_id: &str, expiry: u64) -> Result<String> {
        let mut buffer = [0u8; PASSWORD_MAX];
        let len = self.write_password(&mut buffer, id_scope, registration_id, expiry)?;
        Ok(std::str::from_utf8(&buffer[..len])?.to_owned())
    }
}

impl std::fmt::Debug for SymmetricKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey").finish()
    }
}
