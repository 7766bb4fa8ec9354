// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Subcommand implementations.

#[cfg(feature = "authenticate")]
mod authenticate;

#[cfg(feature = "sas-token")]
mod sas_token;

use crate::error::Result;

#[cfg(feature = "authenticate")]
pub use crate::subcommands::authenticate::Authenticate;

#[cfg(feature = "sas-token")]
pub use crate::subcommands::sas_token::SasToken;

use structopt::StructOpt;

/// Command-line interface to iotmw-tool operations.
#[derive(Debug, StructOpt)]
pub enum Subcommand {
    /// Authenticates an update manifest against its signed JWS using the built-in root keys.
    #[cfg(feature = "authenticate")]
    Authenticate(Authenticate),

    /// Prints the MQTT username and SAS token a device would present to the provisioning service
    /// when authenticating with a symmetric key.
    #[cfg(feature = "sas-token")]
    SasToken(SasToken),
}

impl Subcommand {
    /// Runs the command.
    pub fn run(&self) -> Result<()> {
        match &self {
            #[cfg(feature = "authenticate")]
            Subcommand::Authenticate(cmd) => cmd.run(),
            #[cfg(feature = "sas-token")]
            Subcommand::SasToken(cmd) => cmd.run(),
            #[cfg(not(any(feature = "authenticate", feature = "sas-token")))]
            _ => Ok(()),
        }
    }
}
