// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Authenticates an update manifest against the compact JWS that signs it.

use crate::error::Result;

use iotmw::jws::{authenticate_manifest, ADU_ROOT_KEYS, SCRATCH_BUFFER_SIZE};
use log::info;

use std::path::PathBuf;
use structopt::StructOpt;

/// Models the options required by the authenticate command.
#[derive(Debug, StructOpt)]
pub struct Authenticate {
    /// The manifest file, exactly as it was hashed by the update service.
    #[structopt(short = "m", long = "manifest", parse(from_os_str))]
    manifest: PathBuf,

    /// The file holding the compact JWS (`header.payload.signature`) that signs the manifest.
    #[structopt(short = "j", long = "jws", parse(from_os_str))]
    jws: PathBuf,
}

impl Authenticate {
    /// Reads both files and authenticates the manifest with the built-in root keys.
    pub fn run(&self) -> Result<()> {
        let manifest = std::fs::read(&self.manifest)?;
        let jws = std::fs::read(&self.jws)?;

        let mut scratch = [0u8; SCRATCH_BUFFER_SIZE];
        authenticate_manifest(&manifest, trim_line_end(&jws), &ADU_ROOT_KEYS, &mut scratch)?;

        info!("Manifest {} is authentic", self.manifest.display());
        Ok(())
    }
}

/// JWS files written by editors usually end with a newline, which is not part of the token.
fn trim_line_end(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |last| last + 1);
    &bytes[..end]
}
