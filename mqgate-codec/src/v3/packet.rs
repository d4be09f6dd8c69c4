use std::fmt;
use std::num::NonZeroU16;

use bytes::Bytes;
use bytestring::ByteString;
use serde::{Deserialize, Serialize};

use crate::envelope::{ConnectPayload, SubscribePayload};
use crate::types::{FixedHeader, PacketType, Protocol, QoS};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// CONNECT variable header
pub struct ConnectHeader {
    pub protocol_name: ByteString,
    /// mqtt protocol level
    pub protocol_level: Protocol,
    pub has_username: bool,
    pub has_password: bool,
    /// the Will Message is to be Retained when it is published.
    pub will_retain: bool,
    /// the QoS level to be used when publishing the Will Message.
    pub will_qos: QoS,
    pub will_flag: bool,
    /// the handling of the Session state.
    pub clean_session: bool,
    /// a time interval measured in seconds.
    pub keep_alive: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Client request to connect to Server
pub struct ConnectPacket {
    pub fixed: FixedHeader,
    pub variable: ConnectHeader,
    pub payload: ConnectPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// PUBLISH variable header
pub struct PublishHeader {
    /// the information channel to which payload data is published.
    pub topic: ByteString,
    /// only present where the QoS level is 1 or 2.
    pub packet_id: Option<NonZeroU16>,
}

#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Publish message
pub struct PublishPacket {
    pub fixed: FixedHeader,
    pub variable: PublishHeader,
    /// the Application Message that is being published, byte-identical to
    /// what the transport delivered.
    pub payload: Bytes,
}

impl fmt::Debug for PublishPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishPacket")
            .field("fixed", &self.fixed)
            .field("variable", &self.variable)
            .field("payload", &"<REDACTED>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
/// Message-id variable header used by SUBSCRIBE
pub struct MessageIdHeader {
    pub message_id: NonZeroU16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Client subscribe request
pub struct SubscribePacket {
    pub fixed: FixedHeader,
    pub variable: MessageIdHeader,
    pub payload: SubscribePayload,
}

/// Inbound MQTT Control Packets
///
/// One variant per inbound type; a value's variant always matches its
/// fixed header's type tag (the translator is the only construction path
/// from untyped input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Client request to connect to Server
    Connect(Box<ConnectPacket>),
    /// Publish message
    Publish(PublishPacket),
    /// Client subscribe request
    Subscribe(SubscribePacket),
    /// Unsubscribe request
    Unsubscribe(FixedHeader),
    /// Publish acknowledgment
    PublishAck(FixedHeader),
    /// Publish received (assured delivery part 1)
    PublishReceived(FixedHeader),
    /// Publish release (assured delivery part 2)
    PublishRelease(FixedHeader),
    /// Publish complete (assured delivery part 3)
    PublishComplete(FixedHeader),
    /// PING request
    PingRequest(FixedHeader),
    /// Client is disconnecting
    Disconnect(FixedHeader),
}

impl Packet {
    #[inline]
    pub fn packet_type(&self) -> PacketType {
        match self {
            Packet::Connect(_) => PacketType::Connect,
            Packet::Publish(_) => PacketType::Publish,
            Packet::Subscribe(_) => PacketType::Subscribe,
            Packet::Unsubscribe(_) => PacketType::Unsubscribe,
            Packet::PublishAck(_) => PacketType::PublishAck,
            Packet::PublishReceived(_) => PacketType::PublishReceived,
            Packet::PublishRelease(_) => PacketType::PublishRelease,
            Packet::PublishComplete(_) => PacketType::PublishComplete,
            Packet::PingRequest(_) => PacketType::PingRequest,
            Packet::Disconnect(_) => PacketType::Disconnect,
        }
    }

    #[inline]
    pub fn fixed_header(&self) -> &FixedHeader {
        match self {
            Packet::Connect(p) => &p.fixed,
            Packet::Publish(p) => &p.fixed,
            Packet::Subscribe(p) => &p.fixed,
            Packet::Unsubscribe(fixed)
            | Packet::PublishAck(fixed)
            | Packet::PublishReceived(fixed)
            | Packet::PublishRelease(fixed)
            | Packet::PublishComplete(fixed)
            | Packet::PingRequest(fixed)
            | Packet::Disconnect(fixed) => fixed,
        }
    }
}

impl From<ConnectPacket> for Packet {
    fn from(val: ConnectPacket) -> Packet {
        Packet::Connect(Box::new(val))
    }
}

impl From<PublishPacket> for Packet {
    fn from(val: PublishPacket) -> Packet {
        Packet::Publish(val)
    }
}

impl From<SubscribePacket> for Packet {
    fn from(val: SubscribePacket) -> Packet {
        Packet::Subscribe(val)
    }
}
