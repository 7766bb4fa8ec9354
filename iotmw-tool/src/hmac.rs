// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! HMAC-SHA256 for SAS token generation, backed by `ring`.

use iotmw::provisioning::sas::HmacFunction;
use iotmw::provisioning::Result;
use ring::hmac;

/// [HmacFunction] implemented with `ring`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingHmac;

impl HmacFunction for RingHmac {
    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        let key = hmac::Key::new(hmac::HMAC_SHA256, key);
        Ok(hmac::sign(&key, data).as_ref().to_vec())
    }
}
