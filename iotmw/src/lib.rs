// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! The iotmw crate contains the device-side middleware needed to bring an IoT device online: registering
//! it with the device provisioning service over MQTT, and authenticating signed update manifests.

#[cfg(feature = "jws")]
pub mod jws;

#[cfg(feature = "provisioning")]
pub mod provisioning;
