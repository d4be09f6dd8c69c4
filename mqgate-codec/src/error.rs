/// Errors raised while reinterpreting a transport envelope as a typed
/// control packet.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The declared message-type code is not one of the ten inbound types.
    #[error("Unsupported packet type")]
    UnsupportedPacketType,
    /// A header field required by the declared type is absent or invalid.
    #[error("Malformed packet")]
    MalformedPacket,
    /// The payload variant does not agree with the declared packet type.
    #[error("Payload does not match packet type")]
    PayloadMismatch,
    #[error("Packet id is required")]
    PacketIdRequired,
    #[error("utf8 error")]
    Utf8Error,
    #[error("Max size exceeded")]
    MaxSizeExceeded,
}
