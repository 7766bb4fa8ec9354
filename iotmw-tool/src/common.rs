// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Project metadata shown by the command-line interface.

pub const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");
pub const PROJECT_DESC: &str = "Command-line front end to the iotmw device middleware";
pub const PROJECT_AUTHOR: &str = "Contributors to the Confidential Packaging project";
pub const PROJECT_VERSION: &str = env!("CARGO_PKG_VERSION");
