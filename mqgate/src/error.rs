use mqgate_codec::error::DecodeError;
use mqgate_codec::types::PacketType;

/// Registry construction failure.
///
/// Completeness over the ten inbound packet types is a startup invariant;
/// surfacing the gap here keeps it out of the per-request path entirely.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("No handler registered for packet type {0:?}")]
    Unregistered(PacketType),
}

/// Errors surfaced by [`crate::dispatch::Dispatcher`] processing.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The envelope could not be reinterpreted as a control packet.
    /// Scoped to the single offending request.
    #[error("Decoding error: {0:?}")]
    Decode(#[from] DecodeError),
    /// A known packet type with no registered handler. A configuration
    /// defect, fatal and non-retriable, never a per-request condition.
    #[error("No handler registered for packet type {0:?}")]
    HandlerUnregistered(PacketType),
    /// Handler failure, forwarded unchanged.
    #[error("Handler error: {0}")]
    Handler(crate::Error),
}
