use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

pub const MQTT_LEVEL_31: u8 = 3;
pub const MQTT_LEVEL_311: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Protocol(pub u8);

impl Protocol {
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Protocol(MQTT_LEVEL_311) => "MQTT",
            Protocol(MQTT_LEVEL_31) => "MQIsdp",
            Protocol(_) => "MQTT",
        }
    }

    #[inline]
    pub fn level(self) -> u8 {
        self.0
    }

    /// Whether this level falls inside the v3.1..v3.1.1 window accepted at
    /// connection establishment. Consulted by the CONNECT handler; the
    /// translator itself never enforces it.
    #[inline]
    pub fn is_supported(self) -> bool {
        (MQTT_LEVEL_31..=MQTT_LEVEL_311).contains(&self.0)
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Protocol(MQTT_LEVEL_311)
    }
}

prim_enum! {
    /// Quality of Service
    #[derive(serde::Serialize, serde::Deserialize, PartialOrd, Ord, Hash, Default)]
    pub enum QoS {
        /// At most once delivery
        #[default]
        AtMostOnce = 0,
        /// At least once delivery, acknowledged by a PUBACK packet
        AtLeastOnce = 1,
        /// Exactly once delivery
        ExactlyOnce = 2
    }
}

impl QoS {
    #[inline]
    pub fn value(&self) -> u8 {
        match self {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
            QoS::ExactlyOnce => 2,
        }
    }
}

impl From<QoS> for u8 {
    fn from(v: QoS) -> Self {
        v.value()
    }
}

/// The ten inbound MQTT control-packet types routed by this core,
/// discriminants being the protocol type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PacketType {
    Connect = 1,
    Publish = 3,
    PublishAck = 4,
    PublishReceived = 5,
    PublishRelease = 6,
    PublishComplete = 7,
    Subscribe = 8,
    Unsubscribe = 10,
    PingRequest = 12,
    Disconnect = 14,
}

impl PacketType {
    pub const ALL: [PacketType; 10] = [
        PacketType::Connect,
        PacketType::Publish,
        PacketType::PublishAck,
        PacketType::PublishReceived,
        PacketType::PublishRelease,
        PacketType::PublishComplete,
        PacketType::Subscribe,
        PacketType::Unsubscribe,
        PacketType::PingRequest,
        PacketType::Disconnect,
    ];

    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for PacketType {
    type Error = DecodeError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(PacketType::Connect),
            3 => Ok(PacketType::Publish),
            4 => Ok(PacketType::PublishAck),
            5 => Ok(PacketType::PublishReceived),
            6 => Ok(PacketType::PublishRelease),
            7 => Ok(PacketType::PublishComplete),
            8 => Ok(PacketType::Subscribe),
            10 => Ok(PacketType::Unsubscribe),
            12 => Ok(PacketType::PingRequest),
            14 => Ok(PacketType::Disconnect),
            _ => Err(DecodeError::UnsupportedPacketType),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
/// The fields present on every control packet.
pub struct FixedHeader {
    pub packet_type: PacketType,
    /// this might be re-delivery of an earlier attempt to send the packet.
    pub dup: bool,
    pub qos: QoS,
    pub retain: bool,
    /// the number of bytes remaining within the current packet,
    /// including data in the variable header and the payload.
    pub remaining_length: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_type_codes() {
        for typ in PacketType::ALL {
            assert_eq!(PacketType::try_from(typ.value()).unwrap(), typ);
        }
        // CONNACK, SUBACK etc. are outbound only
        for code in [0u8, 2, 9, 11, 13, 15, 200] {
            assert!(matches!(PacketType::try_from(code), Err(DecodeError::UnsupportedPacketType)));
        }
    }

    #[test]
    fn test_qos() {
        assert_eq!(QoS::try_from(1).unwrap(), QoS::AtLeastOnce);
        assert!(matches!(QoS::try_from(3), Err(DecodeError::MalformedPacket)));
        assert_eq!(u8::from(QoS::ExactlyOnce), 2);
    }

    #[test]
    fn test_protocol_window() {
        assert!(Protocol(MQTT_LEVEL_31).is_supported());
        assert!(Protocol(MQTT_LEVEL_311).is_supported());
        assert!(!Protocol(5).is_supported());
        assert_eq!(Protocol(MQTT_LEVEL_31).name(), "MQIsdp");
        assert_eq!(Protocol::default().name(), "MQTT");
    }
}
