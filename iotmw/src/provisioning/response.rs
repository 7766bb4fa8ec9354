// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Parsing of registration responses.

use super::error::ProvisioningErrorKind;
use super::protocol::ResponseTopic;
use super::Result;
use log::error;
use serde::Deserialize;

/// Status of a registration operation as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Unassigned,
    Assigning,
    Assigned,
    Failed,
    Disabled,
}

impl OperationStatus {
    fn from_service(status: &str) -> Option<OperationStatus> {
        match status {
            "unassigned" => Some(OperationStatus::Unassigned),
            "assigning" => Some(OperationStatus::Assigning),
            "assigned" => Some(OperationStatus::Assigned),
            "failed" => Some(OperationStatus::Failed),
            "disabled" => Some(OperationStatus::Disabled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationState {
    pub assigned_hub: String,
    pub device_id: String,

    /// Service specific error code, for example 400207. Zero when the service reported none.
    pub extended_error_code: u32,
    pub error_message: String,
    pub error_tracking_id: String,
}

/// A parsed registration response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationResponse {
    pub status: u16,

    /// Identifier used to query the status of a pending operation. Empty for error responses.
    pub operation_id: String,
    pub operation_status: OperationStatus,
    pub retry_after: u32,
    pub registration_state: RegistrationState,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseDocument {
    operation_id: Option<String>,
    status: Option<String>,
    registration_state: Option<RegistrationStateDocument>,

    // Present on error responses, which carry no operation.
    error_code: Option<u32>,
    tracking_id: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationStateDocument {
    assigned_hub: Option<String>,
    device_id: Option<String>,
    error_code: Option<u32>,
    error_message: Option<String>,
}

impl RegistrationResponse {
    /// Parses a response from its already parsed topic and its JSON payload.
    ///
    /// Responses with an HTTP-like status of 300 or more, and payloads that only carry a top-level
    /// `errorCode`, are reported as a `failed` operation.
    pub fn parse(topic: &ResponseTopic, payload: &[u8]) -> Result<RegistrationResponse> {
        let document: ResponseDocument = serde_json::from_slice(payload)?;

        let operation = match (document.operation_id, document.status) {
            (Some(operation_id), Some(status)) if topic.status < 300 => Some((operation_id, status)),
            _ => None,
        };

        if let Some((operation_id, status)) = operation {
            let operation_status = OperationStatus::from_service(&status).ok_or_else(|| {
                error!("Registration response has unknown status {}", status);
                ProvisioningErrorKind::Failed
            })?;

            let registration_state = document
                .registration_state
                .map(|state| RegistrationState {
                    assigned_hub: state.assigned_hub.unwrap_or_default(),
                    device_id: state.device_id.unwrap_or_default(),
                    extended_error_code: state.error_code.unwrap_or_default(),
                    error_message: state.error_message.unwrap_or_default(),
                    error_tracking_id: String::new(),
                })
                .unwrap_or_default();

            return Ok(RegistrationResponse {
                status: topic.status,
                operation_id,
                operation_status,
                retry_after: topic.retry_after,
                registration_state,
            });
        }

        if topic.status < 300 && document.error_code.is_none() {
            error!("Registration response carries neither an operation nor an error");
            return Err(ProvisioningErrorKind::Failed.into());
        }

        Ok(RegistrationResponse {
            status: topic.status,
            operation_id: String::new(),
            operation_status: OperationStatus::Failed,
            retry_after: topic.retry_after,
            registration_state: RegistrationState {
                extended_error_code: document.error_code.unwrap_or_default(),
                error_message: document.message.unwrap_or_default(),
                error_tracking_id: document.tracking_id.unwrap_or_default(),
                ..RegistrationState::default()
            },
        })
    }
}
