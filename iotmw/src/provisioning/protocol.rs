// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! MQTT topics, credentials and request payloads of the device provisioning service.
//!
//! Writers format directly into a caller-provided slice and return the number of bytes written. A value
//! that does not fit is reported as `OutOfMemory` and leaves the slice contents unspecified.

use super::error::{Error, ProvisioningErrorKind};
use super::{Result, API_VERSION};
use log::error;
use serde::Serialize;
use serde_json::value::RawValue;
use std::fmt;
use std::io::{Cursor, Write};

/// Topic filter covering every registration response.
pub const REGISTER_SUBSCRIBE_TOPIC: &str = "$dps/registrations/res/#";

/// Prefix shared by all registration response topics.
pub const RESPONSE_TOPIC_PREFIX: &str = "$dps/registrations/res/";

const REGISTER_PUBLISH_TOPIC: &str = "$dps/registrations/PUT/iotdps-register/?$rid=1";
const QUERY_PUBLISH_TOPIC: &str = "$dps/registrations/GET/iotdps-get-operationstatus/?$rid=1";

const REQUEST_ID_PARAMETER: &str = "$rid";
const RETRY_AFTER_PARAMETER: &str = "retry-after";

/// Percent-encodes everything but the RFC 3986 unreserved characters.
#[derive(Debug, Clone, Copy)]
pub struct UrlEncoded<'a>(pub &'a str);

impl fmt::Display for UrlEncoded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    write!(f, "{}", byte as char)?
                }
                _ => write!(f, "%{:02X}", byte)?,
            }
        }
        Ok(())
    }
}

/// Formats `args` into `buffer`, failing with `OutOfMemory` if the result does not fit.
pub fn write_into(buffer: &mut [u8], args: fmt::Arguments<'_>) -> Result<usize> {
    let mut cursor = Cursor::new(buffer);
    if cursor.write_fmt(args).is_err() {
        return Err(ProvisioningErrorKind::OutOfMemory.into());
    }
    Ok(cursor.position() as usize)
}

/// Writes the MQTT username the service expects for `registration_id` in `id_scope`.
pub fn write_user_name(
    buffer: &mut [u8],
    id_scope: &str,
    registration_id: &str,
    user_agent: &str,
) -> Result<usize> {
    write_into(
        buffer,
        format_args!(
            "{}/registrations/{}/api-version={}&ClientVersion={}",
            id_scope,
            registration_id,
            API_VERSION,
            UrlEncoded(user_agent)
        ),
    )
}

/// Writes the topic of the initial registration request.
pub fn write_register_topic(buffer: &mut [u8]) -> Result<usize> {
    write_into(buffer, format_args!("{}", REGISTER_PUBLISH_TOPIC))
}

/// Writes the topic of an operation status query.
pub fn write_query_topic(buffer: &mut [u8], operation_id: &str) -> Result<usize> {
    write_into(
        buffer,
        format_args!("{}&operationId={}", QUERY_PUBLISH_TOPIC, operation_id),
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationRequest<'a> {
    registration_id: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a RawValue>,
}

/// Writes the JSON body of a registration request, embedding `custom_payload` verbatim when given.
///
/// The custom payload must be a single JSON value.
pub fn write_request_payload(
    buffer: &mut [u8],
    registration_id: &str,
    custom_payload: Option<&[u8]>,
) -> Result<usize> {
    let payload = match custom_payload {
        Some(custom) => Some(serde_json::from_slice::<&RawValue>(custom).map_err(|e| {
            error!("Custom registration payload is not valid JSON: {}", e);
            Error::from(e)
        })?),
        None => None,
    };

    let request = RegistrationRequest {
        registration_id,
        payload,
    };

    let mut cursor = Cursor::new(buffer);
    if serde_json::to_writer(&mut cursor, &request).is_err() {
        error!("Registration request does not fit in {} bytes", cursor.get_ref().len());
        return Err(ProvisioningErrorKind::OutOfMemory.into());
    }
    Ok(cursor.position() as usize)
}

/// Parameters carried in the topic of a registration response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseTopic {
    pub status: u16,
    pub request_id: u32,

    /// Seconds the service asks the device to wait before polling again. Zero when absent.
    pub retry_after: u32,
}

/// Parses `$dps/registrations/res/{status}/?$rid={n}[&retry-after={s}]`.
///
/// Returns `Ok(None)` for topics that are not registration responses.
pub fn parse_response_topic(topic: &str) -> Result<Option<ResponseTopic>> {
    let rest = match topic.strip_prefix(RESPONSE_TOPIC_PREFIX) {
        Some(rest) => rest,
        None => return Ok(None),
    };

    let (status, query) = match rest.find("/?") {
        Some(index) => (&rest[..index], &rest[index + 2..]),
        None => {
            error!("Response topic {} has no query string", topic);
            return Err(ProvisioningErrorKind::Failed.into());
        }
    };

    let status = status.parse::<u16>().map_err(|_| {
        error!("Response topic {} has an invalid status", topic);
        Error::from(ProvisioningErrorKind::Failed)
    })?;

    let mut request_id = None;
    let mut retry_after = 0;
    for parameter in query.split('&') {
        let mut pair = parameter.splitn(2, '=');
        let name = pair.next().unwrap_or_default();
        let value = pair.next().unwrap_or_default();
        match name {
            REQUEST_ID_PARAMETER => request_id = Some(parse_parameter(topic, name, value)?),
            RETRY_AFTER_PARAMETER => retry_after = parse_parameter(topic, name, value)?,
            _ => (),
        }
    }

    let request_id = request_id.ok_or_else(|| {
        error!("Response topic {} has no request id", topic);
        Error::from(ProvisioningErrorKind::Failed)
    })?;

    Ok(Some(ResponseTopic {
        status,
        request_id,
        retry_after,
    }))
}

fn parse_parameter(topic: &str, name: &str, value: &str) -> Result<u32> {
    value.parse::<u32>().map_err(|_| {
        error!("Response topic {} has an invalid {} value", topic, name);
        Error::from(ProvisioningErrorKind::Failed)
    })
}
