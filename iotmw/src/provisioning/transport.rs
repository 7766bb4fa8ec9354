// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! The MQTT and clock capabilities consumed by the provisioning client.
//!
//! The client does not own a network stack. It drives an implementation of [MqttTransport], which is
//! expected to keep the MQTT session and to report the packets it received during each
//! [MqttTransport::process_loop] call as a list of [MqttEvent]s. This keeps the client free of callbacks:
//! events are applied synchronously, inside the `register` call that ran the loop.

use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// MQTT quality of service levels used by the client. Provisioning only ever uses QoS 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QoS {
    AtMostOnce,
}

/// Parameters of the MQTT CONNECT packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectInfo<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub password: Option<&'a str>,
    pub clean_session: bool,
    pub keep_alive: Duration,

    /// How long the transport may wait for the CONNACK.
    pub connack_timeout: Duration,
}

/// An incoming PUBLISH. Topic and payload are owned, so the client can buffer the message after the
/// transport has reused its network buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Packets received while running the process loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MqttEvent {
    SubAck { packet_id: u16 },
    Publish(PublishMessage),

    /// Any other packet. Only logged by the client.
    Other { packet_type: u8 },
}

/// Failures reported by an [MqttTransport].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("The broker refused the connection.")]
    ConnectionRefused,

    #[error("The MQTT session is not connected.")]
    NotConnected,

    #[error("Sending to the broker failed.")]
    SendFailed,

    #[error("Receiving from the broker failed.")]
    ReceiveFailed,

    #[error("The broker did not answer in time.")]
    Timeout,
}

/// A synchronous MQTT client session.
pub trait MqttTransport {
    /// Opens the session. Returns once the CONNACK has been received or `connack_timeout` has elapsed.
    fn connect(&mut self, info: &ConnectInfo<'_>) -> Result<(), TransportError>;

    /// Sends a SUBSCRIBE for `topic_filter` and returns its packet id. The SUBACK is reported later as an
    /// [MqttEvent::SubAck].
    fn subscribe(&mut self, topic_filter: &str, qos: QoS) -> Result<u16, TransportError>;

    fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS) -> Result<(), TransportError>;

    /// Sends and receives pending packets for at most `timeout`, and returns what was received.
    fn process_loop(&mut self, timeout: Duration) -> Result<Vec<MqttEvent>, TransportError>;
}

impl<T: MqttTransport + ?Sized> MqttTransport for &mut T {
    fn connect(&mut self, info: &ConnectInfo<'_>) -> Result<(), TransportError> {
        (**self).connect(info)
    }

    fn subscribe(&mut self, topic_filter: &str, qos: QoS) -> Result<u16, TransportError> {
        (**self).subscribe(topic_filter, qos)
    }

    fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS) -> Result<(), TransportError> {
        (**self).publish(topic, payload, qos)
    }

    fn process_loop(&mut self, timeout: Duration) -> Result<Vec<MqttEvent>, TransportError> {
        (**self).process_loop(timeout)
    }
}

/// Source of the current time, in seconds.
pub trait Clock {
    fn now_secs(&self) -> u64;
}

/// Wall-clock time since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }
}

impl<F: Fn() -> u64> Clock for F {
    fn now_secs(&self) -> u64 {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_epoch() {
        // 2021-01-01T00:00:00Z
        assert!(SystemClock.now_secs() > 1_609_459_200);
    }

    #[test]
    fn closures_are_clocks() {
        let clock = || 42;
        assert_eq!(42, clock.now_secs());
    }
}
