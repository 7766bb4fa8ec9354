// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Device provisioning over MQTT.
//!
//! A [ProvisioningClient] registers a device with the device provisioning service and learns which IoT hub
//! the device was assigned to. Registration is a small workflow: connect, subscribe to the response
//! topic, publish a registration request, then poll the operation status until the service reports a
//! final result. The workflow never blocks for longer than the timeout given to
//! [ProvisioningClient::register], so a caller typically calls it in a loop:
//!
//! ```ignore
//! let mut buffer = [0u8; MINIMUM_BUFFER_SIZE];
//! let mut client = ProvisioningClient::new(
//!     "global.azure-devices-provisioning.net",
//!     id_scope,
//!     registration_id,
//!     None,
//!     &mut buffer,
//!     SystemClock,
//!     transport,
//! )?;
//! client.set_symmetric_key(symmetric_key, hmac)?;
//!
//! while client.register(Duration::from_secs(1))? == RegistrationStatus::Pending {}
//! ```
//!
//! The network session itself is provided by the caller through the [transport::MqttTransport] trait.

pub mod error;
pub mod protocol;
pub mod response;
pub mod sas;
pub mod transport;

use error::{Error, ProvisioningErrorKind};
use log::{debug, error, info, warn};
use response::{OperationStatus, RegistrationResponse};
use sas::{HmacFunction, SymmetricKey};
use std::time::Duration;
use transport::{Clock, ConnectInfo, MqttEvent, MqttTransport, PublishMessage, QoS};

pub type Result<T> = std::result::Result<T, Error>;

/// Service API version announced in the MQTT username.
pub const API_VERSION: &str = "2019-03-31";

pub const USERNAME_MAX: usize = 256;
pub const PASSWORD_MAX: usize = 256;
pub const TOPIC_MAX: usize = 128;
pub const REQUEST_PAYLOAD_MAX: usize = 512;

/// Largest registration response, topic and payload together, the client accepts.
pub const RESPONSE_MAX: usize = TOPIC_MAX + REQUEST_PAYLOAD_MAX;

pub const KEEP_ALIVE_TIMEOUT_SECONDS: u64 = 60;
pub const CONNACK_RECV_TIMEOUT: Duration = Duration::from_millis(1000);
pub const PROCESS_LOOP_TIMEOUT: Duration = Duration::from_millis(500);

/// Lifetime of generated SAS tokens.
pub const DEFAULT_TOKEN_TIMEOUT_SECONDS: u64 = 3600;

/// Wait before polling again when the service did not send a `retry-after`.
pub const POLLING_INTERVAL_SECONDS: u64 = 3;

const fn max(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}

/// Smallest working buffer accepted by [ProvisioningClient::new]. The buffer holds the MQTT credentials
/// while connecting and the request topic and payload while publishing.
pub const MINIMUM_BUFFER_SIZE: usize =
    max(USERNAME_MAX + PASSWORD_MAX, TOPIC_MAX + REQUEST_PAYLOAD_MAX);

/// Optional settings of a [ProvisioningClient].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisioningClientOptions {
    /// Reported to the service as `ClientVersion`.
    pub user_agent: String,
}

/// Non-error outcome of a [ProvisioningClient::register] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    /// The workflow has not finished. Call `register` again.
    Pending,

    /// The device has been assigned to a hub. See [ProvisioningClient::get_device_and_hub].
    Assigned,
}

/// Steps of the registration workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Init,
    Connect,
    Subscribe,
    Subscribing,
    Request,
    Requesting,
    Response,
    Waiting,
    Complete,
}

/// Outcome of a workflow action, which drives the state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionResult {
    Success,
    Pending,
    Failed(ProvisioningErrorKind),
}

impl From<std::result::Result<(), ProvisioningErrorKind>> for ActionResult {
    fn from(result: std::result::Result<(), ProvisioningErrorKind>) -> Self {
        match result {
            Ok(()) => ActionResult::Success,
            Err(kind) => ActionResult::Failed(kind),
        }
    }
}

impl WorkflowState {
    fn next(self, result: ActionResult) -> WorkflowState {
        let succeeded = result == ActionResult::Success;
        match self {
            WorkflowState::Init if succeeded => WorkflowState::Connect,
            WorkflowState::Connect if succeeded => WorkflowState::Subscribe,
            WorkflowState::Subscribe if succeeded => WorkflowState::Subscribing,
            WorkflowState::Subscribing if succeeded => WorkflowState::Request,
            WorkflowState::Request if succeeded => WorkflowState::Requesting,
            WorkflowState::Requesting if succeeded => WorkflowState::Response,
            WorkflowState::Response if result == ActionResult::Pending => WorkflowState::Waiting,
            WorkflowState::Waiting if succeeded => WorkflowState::Request,
            WorkflowState::Init
            | WorkflowState::Connect
            | WorkflowState::Subscribe
            | WorkflowState::Subscribing
            | WorkflowState::Request
            | WorkflowState::Requesting
            | WorkflowState::Response
            | WorkflowState::Waiting
            | WorkflowState::Complete => WorkflowState::Complete,
        }
    }
}

/// Registers a device with the device provisioning service.
///
/// The client borrows a working buffer of at least [MINIMUM_BUFFER_SIZE] bytes for its MQTT credentials
/// and requests, and owns its clock and transport.
pub struct ProvisioningClient<'a, T: MqttTransport, C: Clock> {
    endpoint: String,
    id_scope: String,
    registration_id: String,
    user_agent: String,
    symmetric_key: Option<SymmetricKey<'a>>,
    registration_payload: Option<Vec<u8>>,
    buffer: &'a mut [u8],
    clock: C,
    transport: T,

    state: WorkflowState,
    last_result: ActionResult,

    /// The most recent response topic and payload, waiting to be parsed.
    last_message: Option<PublishMessage>,

    /// The most recent parsed response.
    response: Option<RegistrationResponse>,

    /// When in `Waiting`, the time after which the operation status is queried.
    retry_deadline: u64,
}

impl<'a, T: MqttTransport, C: Clock> ProvisioningClient<'a, T, C> {
    /// Creates a client for `registration_id` in `id_scope` at the provisioning `endpoint`.
    ///
    /// Fails with `InvalidArgument` when a string argument is empty and with `OutOfMemory` when `buffer`
    /// is smaller than [MINIMUM_BUFFER_SIZE].
    pub fn new(
        endpoint: &str,
        id_scope: &str,
        registration_id: &str,
        options: Option<ProvisioningClientOptions>,
        buffer: &'a mut [u8],
        clock: C,
        transport: T,
    ) -> Result<Self> {
        if endpoint.is_empty() || id_scope.is_empty() || registration_id.is_empty() {
            error!("Provisioning client needs an endpoint, an ID scope and a registration ID");
            return Err(ProvisioningErrorKind::InvalidArgument.into());
        }

        if buffer.len() < MINIMUM_BUFFER_SIZE {
            error!(
                "Provisioning buffer of {} bytes is smaller than the required {} bytes",
                buffer.len(),
                MINIMUM_BUFFER_SIZE
            );
            return Err(ProvisioningErrorKind::OutOfMemory.into());
        }

        Ok(ProvisioningClient {
            endpoint: endpoint.to_owned(),
            id_scope: id_scope.to_owned(),
            registration_id: registration_id.to_owned(),
            user_agent: options.unwrap_or_default().user_agent,
            symmetric_key: None,
            registration_payload: None,
            buffer,
            clock,
            transport,
            state: WorkflowState::Init,
            last_result: ActionResult::Pending,
            last_message: None,
            response: None,
            retry_deadline: 0,
        })
    }

    /// Authenticates the device with a SAS token derived from its base64 encoded symmetric key.
    pub fn set_symmetric_key<H: HmacFunction + 'a>(&mut self, key: &[u8], hmac: H) -> Result<()> {
        self.symmetric_key = Some(SymmetricKey::new(key, hmac)?);
        Ok(())
    }

    /// Attaches a custom JSON value to the registration request. Only allowed before the first call to
    /// [register](Self::register). The value is validated when the request is published.
    pub fn set_registration_payload(&mut self, payload: &[u8]) -> Result<()> {
        if payload.is_empty() {
            error!("Registration payload is empty");
            return Err(ProvisioningErrorKind::InvalidArgument.into());
        }

        if self.state != WorkflowState::Init {
            warn!("Registration payload set after registration started");
            return Err(ProvisioningErrorKind::InvalidState.into());
        }

        self.registration_payload = Some(payload.to_vec());
        Ok(())
    }

    /// Advances the registration workflow for at most `timeout`.
    ///
    /// Returns `Pending` while the workflow is still running. Once it has completed, every call returns
    /// the same final result without touching the network.
    pub fn register(&mut self, timeout: Duration) -> Result<RegistrationStatus> {
        if self.state == WorkflowState::Init {
            self.update_state(ActionResult::Success);
        }

        let mut remaining = timeout;
        while self.state != WorkflowState::Complete {
            let wait = remaining.min(PROCESS_LOOP_TIMEOUT);
            remaining -= wait;

            self.trigger_action();
            if self.state == WorkflowState::Complete {
                break;
            }

            match self.transport.process_loop(wait) {
                Ok(events) => {
                    for event in events {
                        self.handle_event(event);
                    }
                }
                Err(e) => {
                    error!("MQTT process loop failed: {}", e);
                    self.update_state(ActionResult::Failed(ProvisioningErrorKind::ProcessLoopFailed));
                }
            }

            if remaining == Duration::from_millis(0) {
                break;
            }
        }

        if self.state != WorkflowState::Complete {
            return Ok(RegistrationStatus::Pending);
        }

        match self.last_result {
            ActionResult::Success => Ok(RegistrationStatus::Assigned),
            ActionResult::Failed(kind) => Err(kind.into()),
            ActionResult::Pending => Err(ProvisioningErrorKind::Failed.into()),
        }
    }

    /// Copies the assigned hub hostname and the device id into the given buffers and returns their
    /// lengths. Only valid once [register](Self::register) has returned `Assigned`.
    pub fn get_device_and_hub(
        &self,
        hostname: &mut [u8],
        device_id: &mut [u8],
    ) -> Result<(usize, usize)> {
        if self.state != WorkflowState::Complete {
            error!("Device and hub requested before registration completed");
            return Err(ProvisioningErrorKind::Failed.into());
        }

        if let ActionResult::Failed(kind) = self.last_result {
            error!("Device and hub requested after registration failed");
            return Err(kind.into());
        }

        let state = match &self.response {
            Some(response) => &response.registration_state,
            None => return Err(ProvisioningErrorKind::Failed.into()),
        };

        let hub = state.assigned_hub.as_bytes();
        let device = state.device_id.as_bytes();
        if hostname.len() < hub.len() || device_id.len() < device.len() {
            error!("Buffers are too small for the assigned hub and device id");
            return Err(ProvisioningErrorKind::Failed.into());
        }

        hostname[..hub.len()].copy_from_slice(hub);
        device_id[..device.len()].copy_from_slice(device);
        Ok((hub.len(), device.len()))
    }

    /// The service specific error code of a completed registration, or 0 if the service reported none.
    pub fn get_extended_code(&self) -> Result<u32> {
        if self.state != WorkflowState::Complete {
            error!("Extended code requested before registration completed");
            return Err(ProvisioningErrorKind::Failed.into());
        }

        Ok(self
            .response
            .as_ref()
            .map(|response| response.registration_state.extended_error_code)
            .unwrap_or(0))
    }

    /// The parsed response the workflow last acted on.
    pub fn last_response(&self) -> Option<&RegistrationResponse> {
        self.response.as_ref()
    }

    /// Releases the buffered, not yet parsed response. The parsed response is kept, so a workflow in
    /// progress keeps polling the same operation. Calling it more than once has no further effect.
    pub fn deinit(&mut self) {
        if self.last_message.take().is_some() {
            debug!("Released the buffered registration response");
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn update_state(&mut self, result: ActionResult) {
        let previous = self.state;
        self.last_result = result;
        self.state = previous.next(result);
        debug!(
            "Provisioning state {:?} -> {:?} ({:?})",
            previous, self.state, result
        );
    }

    fn trigger_action(&mut self) {
        let result = match self.state {
            WorkflowState::Connect => Some(self.connect().into()),
            WorkflowState::Subscribe => Some(self.subscribe().into()),
            WorkflowState::Request => Some(self.request().into()),
            WorkflowState::Response => self.parse_response(),
            WorkflowState::Waiting => self.check_retry_deadline(),
            WorkflowState::Init
            | WorkflowState::Subscribing
            | WorkflowState::Requesting
            | WorkflowState::Complete => None,
        };

        if let Some(result) = result {
            self.update_state(result);
        }
    }

    fn connect(&mut self) -> std::result::Result<(), ProvisioningErrorKind> {
        let (username_region, password_region) = self.buffer.split_at_mut(USERNAME_MAX);

        let username_len = protocol::write_user_name(
            username_region,
            &self.id_scope,
            &self.registration_id,
            &self.user_agent,
        )
        .map_err(|e| {
            error!("Failed to build the MQTT username: {}", e);
            e.kind()
        })?;

        let password_len = match &self.symmetric_key {
            Some(key) => {
                let expiry = self.clock.now_secs() + DEFAULT_TOKEN_TIMEOUT_SECONDS;
                let len = key
                    .write_password(
                        &mut password_region[..PASSWORD_MAX],
                        &self.id_scope,
                        &self.registration_id,
                        expiry,
                    )
                    .map_err(|e| {
                        error!("Failed to generate the SAS token: {}", e);
                        ProvisioningErrorKind::TokenGenerationFailed
                    })?;
                Some(len)
            }
            None => None,
        };

        let username = utf8(&username_region[..username_len])?;
        let password = match password_len {
            Some(len) => Some(utf8(&password_region[..len])?),
            None => None,
        };

        let info = ConnectInfo {
            client_id: &self.registration_id,
            username,
            password,
            clean_session: true,
            keep_alive: Duration::from_secs(KEEP_ALIVE_TIMEOUT_SECONDS),
            connack_timeout: CONNACK_RECV_TIMEOUT,
        };

        self.transport.connect(&info).map_err(|e| {
            error!("Failed to connect to {}: {}", self.endpoint, e);
            ProvisioningErrorKind::ConnectFailed
        })?;

        info!("Connected to provisioning endpoint {}", self.endpoint);
        Ok(())
    }

    fn subscribe(&mut self) -> std::result::Result<(), ProvisioningErrorKind> {
        let packet_id = self
            .transport
            .subscribe(protocol::REGISTER_SUBSCRIBE_TOPIC, QoS::AtMostOnce)
            .map_err(|e| {
                error!("Failed to subscribe to the registration responses: {}", e);
                ProvisioningErrorKind::SubscribeFailed
            })?;

        debug!("Subscribe sent with packet id {}", packet_id);
        Ok(())
    }

    fn request(&mut self) -> std::result::Result<(), ProvisioningErrorKind> {
        let (topic_region, payload_region) = self.buffer.split_at_mut(TOPIC_MAX);

        let topic_len = match &self.response {
            None => protocol::write_register_topic(topic_region),
            Some(response) => protocol::write_query_topic(topic_region, &response.operation_id),
        }
        .map_err(|e| {
            error!("Failed to build the request topic: {}", e);
            ProvisioningErrorKind::Failed
        })?;

        let payload_len = protocol::write_request_payload(
            &mut payload_region[..REQUEST_PAYLOAD_MAX],
            &self.registration_id,
            self.registration_payload.as_deref(),
        )
        .map_err(|e| {
            error!("Failed to build the request payload: {}", e);
            ProvisioningErrorKind::Failed
        })?;

        let topic = utf8(&topic_region[..topic_len])?;
        self.transport
            .publish(topic, &payload_region[..payload_len], QoS::AtMostOnce)
            .map_err(|e| {
                error!("Failed to publish the registration request: {}", e);
                ProvisioningErrorKind::PublishFailed
            })
    }

    fn parse_response(&mut self) -> Option<ActionResult> {
        let message = match self.last_message.take() {
            Some(message) if !message.topic.is_empty() && !message.payload.is_empty() => message,
            _ => {
                error!("Invalid registration response");
                return Some(ActionResult::Failed(ProvisioningErrorKind::InvalidResponse));
            }
        };

        let topic = match protocol::parse_response_topic(&message.topic) {
            Ok(Some(topic)) => topic,
            Ok(None) => {
                info!("Ignoring message on topic {}", message.topic);
                self.last_message = Some(message);
                return None;
            }
            Err(e) => return Some(ActionResult::Failed(e.kind())),
        };

        debug!(
            "Response {} to request {} with retry-after {}",
            topic.status, topic.request_id, topic.retry_after
        );
        let response = match RegistrationResponse::parse(&topic, &message.payload) {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to parse the registration response: {}", e);
                return Some(ActionResult::Failed(ProvisioningErrorKind::Failed));
            }
        };

        let result = match response.operation_status {
            OperationStatus::Assigned => {
                info!(
                    "Device {} assigned to {}",
                    response.registration_state.device_id, response.registration_state.assigned_hub
                );
                ActionResult::Success
            }
            OperationStatus::Failed => {
                error!(
                    "Registration failed with error {}: TrackingID: [{}] \"{}\"",
                    response.registration_state.extended_error_code,
                    response.registration_state.error_tracking_id,
                    response.registration_state.error_message
                );
                ActionResult::Failed(ProvisioningErrorKind::ServerError)
            }
            OperationStatus::Disabled => {
                error!("Registration failed: the device is disabled");
                ActionResult::Failed(ProvisioningErrorKind::ServerError)
            }
            OperationStatus::Unassigned | OperationStatus::Assigning => {
                let wait = match response.retry_after {
                    0 => POLLING_INTERVAL_SECONDS,
                    seconds => u64::from(seconds),
                };
                self.retry_deadline = self.clock.now_secs() + wait;
                debug!("Registration pending, polling again in {}s", wait);
                ActionResult::Pending
            }
        };

        self.response = Some(response);
        Some(result)
    }

    fn check_retry_deadline(&mut self) -> Option<ActionResult> {
        if self.clock.now_secs() > self.retry_deadline {
            self.retry_deadline = 0;
            Some(ActionResult::Success)
        } else {
            None
        }
    }

    fn handle_event(&mut self, event: MqttEvent) {
        match event {
            MqttEvent::SubAck { packet_id } => {
                if self.state == WorkflowState::Subscribing {
                    self.update_state(ActionResult::Success);
                } else {
                    warn!(
                        "Ignoring SUBACK {} in state {:?}",
                        packet_id, self.state
                    );
                }
            }
            MqttEvent::Publish(message) => self.receive_response(message),
            MqttEvent::Other { packet_type } => {
                debug!("Ignoring MQTT packet of type {:#x}", packet_type)
            }
        }
    }

    fn receive_response(&mut self, message: PublishMessage) {
        if !message.topic.starts_with(protocol::RESPONSE_TOPIC_PREFIX) {
            info!("Ignoring message on topic {}", message.topic);
            return;
        }

        if self.state != WorkflowState::Requesting && self.state != WorkflowState::Response {
            warn!("Ignoring registration response in state {:?}", self.state);
            return;
        }

        if message.topic.len() + message.payload.len() > RESPONSE_MAX {
            error!(
                "Registration response of {} bytes exceeds {} bytes",
                message.topic.len() + message.payload.len(),
                RESPONSE_MAX
            );
            self.last_message = None;
            self.update_state(ActionResult::Failed(ProvisioningErrorKind::OutOfMemory));
            return;
        }

        if self.last_message.replace(message).is_some() {
            debug!("Replaced the buffered registration response");
        }

        if self.state == WorkflowState::Requesting {
            self.update_state(ActionResult::Success);
        }
    }
}

fn utf8(bytes: &[u8]) -> std::result::Result<&str, ProvisioningErrorKind> {
    std::str::from_utf8(bytes).map_err(|e| {
        error!("Buffer does not hold valid UTF-8: {}", e);
        ProvisioningErrorKind::Failed
    })
}
