// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Library side of iotmw-tool, holding the command-line interface and its subcommands.

pub mod cli;
pub mod common;
pub mod error;
#[cfg(feature = "sas-token")]
pub mod hmac;
pub mod subcommands;
pub mod util;
