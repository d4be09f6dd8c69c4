//! MQTT v3.1/v3.1.1 typed packet model and envelope translation

mod packet;
mod translate;

pub use self::packet::{
    ConnectHeader, ConnectPacket, MessageIdHeader, Packet, PublishHeader, PublishPacket, SubscribePacket,
};
pub use self::translate::Translator;
pub use crate::types::{FixedHeader, PacketType, QoS};
