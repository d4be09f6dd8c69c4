use std::num::NonZeroU16;

use bytes::Bytes;
use bytestring::ByteString;
use serde::{Deserialize, Serialize};

use crate::types::QoS;

/// Transport-neutral command, produced by the framing layer before any
/// protocol-specific interpretation. The same shape carries handler
/// responses back to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Envelope {
    pub header: FrameHeader,
    pub payload: Payload,
}

impl Envelope {
    pub fn new(header: FrameHeader, payload: Payload) -> Self {
        Envelope { header, payload }
    }
}

/// Flat protocol header carried by every envelope.
///
/// The first five fields are always set; the rest are only meaningful for
/// the message type the code declares and stay `None` otherwise.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FrameHeader {
    /// MQTT control-packet type code.
    pub message_type: u8,
    pub dup: bool,
    pub qos_level: u8,
    pub retain: bool,
    pub remaining_length: u32,

    // CONNECT
    pub protocol_name: Option<Bytes>,
    pub protocol_level: Option<u8>,
    pub has_username: Option<bool>,
    pub has_password: Option<bool>,
    pub will_retain: Option<bool>,
    pub will_qos: Option<u8>,
    pub will_flag: Option<bool>,
    pub clean_session: Option<bool>,
    /// a time interval measured in seconds.
    pub keep_alive: Option<u16>,

    // PUBLISH
    pub topic_name: Option<Bytes>,
    pub packet_id: Option<NonZeroU16>,

    // SUBSCRIBE and the acknowledgment family
    pub message_id: Option<NonZeroU16>,
}

impl FrameHeader {
    pub fn new(message_type: u8, dup: bool, qos_level: u8, retain: bool, remaining_length: u32) -> Self {
        FrameHeader { message_type, dup, qos_level, retain, remaining_length, ..Default::default() }
    }
}

/// Opaque payload variant; its shape must agree with the header's type code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Payload {
    Connect(ConnectPayload),
    Bytes(Bytes),
    Subscribe(SubscribePayload),
    None,
}

/// CONNECT packet payload, passed through to the handler unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectPayload {
    /// identifies the Client to the Server.
    pub client_id: ByteString,
    pub will_topic: Option<ByteString>,
    pub will_message: Option<Bytes>,
    pub username: Option<ByteString>,
    pub password: Option<Bytes>,
}

/// SUBSCRIBE packet payload.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubscribePayload {
    /// the list of Topic Filters and QoS to which the Client wants to
    /// subscribe, in client order.
    pub topic_filters: Vec<(ByteString, QoS)>,
}
