use bytes::Bytes;
use bytestring::ByteString;

use crate::envelope::{Envelope, FrameHeader, Payload};
use crate::error::DecodeError;
use crate::types::{FixedHeader, PacketType, Protocol, QoS};
use crate::v3::packet::{
    ConnectHeader, ConnectPacket, MessageIdHeader, Packet, PublishHeader, PublishPacket, SubscribePacket,
};

#[derive(Debug, Clone, Default)]
/// Rebuilds typed v3 control packets from transport envelopes.
pub struct Translator {
    max_size: u32,
}

impl Translator {
    /// Create `Translator` instance
    pub fn new(max_packet_size: u32) -> Self {
        Translator { max_size: max_packet_size }
    }

    /// Set max inbound frame size.
    ///
    /// If max size is set to `0`, size is unlimited.
    /// By default max size is set to `0`
    pub fn set_max_size(&mut self, size: u32) {
        self.max_size = size;
    }

    /// Reinterprets `envelope` as the control packet its header declares.
    ///
    /// Checks are structural only: the type code must be one of the ten
    /// inbound types, the header fields that type requires must be present
    /// and the payload variant must agree with the type. Semantic admission
    /// (protocol level window, topic grammar, QoS policy) stays with the
    /// handlers.
    pub fn translate(&self, envelope: &Envelope) -> Result<Packet, DecodeError> {
        let header = &envelope.header;
        let packet_type = PacketType::try_from(header.message_type)?;
        ensure!(
            self.max_size == 0 || header.remaining_length <= self.max_size,
            DecodeError::MaxSizeExceeded
        );
        let fixed = fixed_header(packet_type, header)?;
        match packet_type {
            PacketType::Connect => translate_connect(fixed, envelope),
            PacketType::Publish => translate_publish(fixed, envelope),
            PacketType::Subscribe => translate_subscribe(fixed, envelope),
            // For the remaining types the fixed header alone is sufficient;
            // any message id is read from the envelope by the handler side.
            PacketType::Unsubscribe => Ok(Packet::Unsubscribe(fixed)),
            PacketType::PublishAck => Ok(Packet::PublishAck(fixed)),
            PacketType::PublishReceived => Ok(Packet::PublishReceived(fixed)),
            PacketType::PublishRelease => Ok(Packet::PublishRelease(fixed)),
            PacketType::PublishComplete => Ok(Packet::PublishComplete(fixed)),
            PacketType::PingRequest => Ok(Packet::PingRequest(fixed)),
            PacketType::Disconnect => Ok(Packet::Disconnect(fixed)),
        }
    }
}

fn fixed_header(packet_type: PacketType, header: &FrameHeader) -> Result<FixedHeader, DecodeError> {
    Ok(FixedHeader {
        packet_type,
        dup: header.dup,
        qos: QoS::try_from(header.qos_level)?,
        retain: header.retain,
        remaining_length: header.remaining_length,
    })
}

fn translate_connect(fixed: FixedHeader, envelope: &Envelope) -> Result<Packet, DecodeError> {
    let header = &envelope.header;
    let variable = ConnectHeader {
        protocol_name: decode_text(header.protocol_name.as_ref())?,
        protocol_level: Protocol(header.protocol_level.ok_or(DecodeError::MalformedPacket)?),
        has_username: header.has_username.ok_or(DecodeError::MalformedPacket)?,
        has_password: header.has_password.ok_or(DecodeError::MalformedPacket)?,
        will_retain: header.will_retain.ok_or(DecodeError::MalformedPacket)?,
        will_qos: QoS::try_from(header.will_qos.ok_or(DecodeError::MalformedPacket)?)?,
        will_flag: header.will_flag.ok_or(DecodeError::MalformedPacket)?,
        clean_session: header.clean_session.ok_or(DecodeError::MalformedPacket)?,
        keep_alive: header.keep_alive.ok_or(DecodeError::MalformedPacket)?,
    };
    let payload = match &envelope.payload {
        Payload::Connect(p) => p.clone(),
        _ => return Err(DecodeError::PayloadMismatch),
    };
    Ok(Packet::Connect(Box::new(ConnectPacket { fixed, variable, payload })))
}

fn translate_publish(fixed: FixedHeader, envelope: &Envelope) -> Result<Packet, DecodeError> {
    let header = &envelope.header;
    let packet_id = header.packet_id;
    if matches!(fixed.qos, QoS::AtLeastOnce | QoS::ExactlyOnce) && packet_id.is_none() {
        return Err(DecodeError::PacketIdRequired);
    }
    let variable = PublishHeader { topic: decode_text(header.topic_name.as_ref())?, packet_id };
    let payload = match &envelope.payload {
        Payload::Bytes(b) => b.clone(),
        _ => return Err(DecodeError::PayloadMismatch),
    };
    Ok(Packet::Publish(PublishPacket { fixed, variable, payload }))
}

fn translate_subscribe(fixed: FixedHeader, envelope: &Envelope) -> Result<Packet, DecodeError> {
    let message_id = envelope.header.message_id.ok_or(DecodeError::PacketIdRequired)?;
    let payload = match &envelope.payload {
        Payload::Subscribe(p) => p.clone(),
        _ => return Err(DecodeError::PayloadMismatch),
    };
    Ok(Packet::Subscribe(SubscribePacket { fixed, variable: MessageIdHeader { message_id }, payload }))
}

fn decode_text(src: Option<&Bytes>) -> Result<ByteString, DecodeError> {
    let src = src.ok_or(DecodeError::MalformedPacket)?;
    ByteString::try_from(src.clone()).map_err(|_| DecodeError::Utf8Error)
}
