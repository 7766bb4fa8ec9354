// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! General-purpose utilities used throughout the iotmw-tool crate.

use crate::error::{Error, Result, ToolErrorKind};
use log::error;

/// Environment variable holding the provisioning ID scope.
pub const ID_SCOPE_ENV: &str = "IOTMW_ID_SCOPE";

/// Environment variable holding the device registration ID.
pub const REGISTRATION_ID_ENV: &str = "IOTMW_REGISTRATION_ID";

/// Environment variable holding the base64 encoded device symmetric key.
pub const SYMMETRIC_KEY_ENV: &str = "IOTMW_SYMMETRIC_KEY";

/// Utility to get a string value either from a command-line option or a named environment variable.
pub fn get_config_from_command_or_env(
    config_option: &Option<String>,
    env_var_name: &str,
    purpose: &str,
) -> Result<String> {
    if let Some(option) = config_option {
        return Ok(option.clone());
    }

    // The option isn't on the command-line, so examine the environment variable instead
    std::env::var(env_var_name).map_err(|_| {
        error!(
            "No {} specified. Please specify on the command-line or by setting the `{}` environment variable.",
            purpose, env_var_name
        );
        Error::ToolError(ToolErrorKind::MissingConfiguration)
    })
}
