// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Generates the MQTT credentials a device presents to the provisioning service when it
//! authenticates with a symmetric key.

use crate::error::{Result, ToolErrorKind};
use crate::hmac::RingHmac;
use crate::util::{
    get_config_from_command_or_env, ID_SCOPE_ENV, REGISTRATION_ID_ENV, SYMMETRIC_KEY_ENV,
};

use chrono::{DateTime, TimeZone, Utc};
use iotmw::provisioning::protocol::write_user_name;
use iotmw::provisioning::sas::SymmetricKey;
use iotmw::provisioning::transport::{Clock, SystemClock};
use iotmw::provisioning::{DEFAULT_TOKEN_TIMEOUT_SECONDS, USERNAME_MAX};
use log::{error, warn};

use std::convert::TryFrom;

use structopt::StructOpt;

/// Models the options required by the sas-token command.
#[derive(Debug, StructOpt)]
pub struct SasToken {
    /// The ID scope of the provisioning service instance. If this option is not specified, then it
    /// will be obtained from the `IOTMW_ID_SCOPE` environment variable instead.
    #[structopt(short = "s", long = "id-scope")]
    id_scope: Option<String>,

    /// The registration ID of the device. If this option is not specified, then it will be obtained
    /// from the `IOTMW_REGISTRATION_ID` environment variable instead.
    #[structopt(short = "r", long = "registration-id")]
    registration_id: Option<String>,

    /// The base64 encoded symmetric key of the device enrollment. If this option is not specified,
    /// then it will be obtained from the `IOTMW_SYMMETRIC_KEY` environment variable instead.
    #[structopt(short = "k", long = "symmetric-key")]
    symmetric_key: Option<String>,

    /// Lifetime of the token, in seconds from now.
    #[structopt(short = "e", long = "expiry-seconds", default_value = "3600")]
    expiry_seconds: u64,

    /// The client version reported in the username.
    #[structopt(short = "u", long = "user-agent", default_value = "")]
    user_agent: String,
}

/// MQTT credentials of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl SasToken {
    /// Builds the credentials for a token expiring at `expiry`, in seconds since the Unix epoch.
    pub fn credentials(&self, expiry: u64) -> Result<Credentials> {
        let id_scope = get_config_from_command_or_env(&self.id_scope, ID_SCOPE_ENV, "ID scope")?;
        let registration_id = get_config_from_command_or_env(
            &self.registration_id,
            REGISTRATION_ID_ENV,
            "registration ID",
        )?;
        let symmetric_key = get_config_from_command_or_env(
            &self.symmetric_key,
            SYMMETRIC_KEY_ENV,
            "symmetric key",
        )?;

        let mut buffer = [0u8; USERNAME_MAX];
        let len = write_user_name(&mut buffer, &id_scope, &registration_id, &self.user_agent)?;
        let username = String::from_utf8_lossy(&buffer[..len]).into_owned();

        let key = SymmetricKey::new(symmetric_key.as_bytes(), RingHmac)?;
        let password = key.password(&id_scope, &registration_id, expiry)?;

        Ok(Credentials { username, password })
    }

    /// Prints the username and the SAS token, valid for the requested number of seconds.
    pub fn run(&self) -> Result<()> {
        if self.expiry_seconds > DEFAULT_TOKEN_TIMEOUT_SECONDS {
            warn!(
                "Devices renew their tokens after {} seconds; this token lives longer",
                DEFAULT_TOKEN_TIMEOUT_SECONDS
            );
        }

        let (expiry, expires_at) = expiry_time(SystemClock.now_secs(), self.expiry_seconds)?;
        let credentials = self.credentials(expiry)?;

        println!("Username: {}", credentials.username);
        println!("Password: {}", credentials.password);
        println!("Expires:  {}", expires_at.to_rfc3339());

        Ok(())
    }
}

/// Token expiry `lifetime` seconds after `now`, both as seconds since the Unix epoch and as a date.
fn expiry_time(now: u64, lifetime: u64) -> Result<(u64, DateTime<Utc>)> {
    let expiry = now.checked_add(lifetime);
    let expires_at = expiry
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

    match (expiry, expires_at) {
        (Some(expiry), Some(expires_at)) => Ok((expiry, expires_at)),
        _ => {
            error!("A token lifetime of {} seconds is out of range", lifetime);
            Err(ToolErrorKind::InvalidExpiry.into())
        }
    }
}
