use std::sync::Arc;

use ahash::HashMap;
use async_trait::async_trait;

use crate::codec::envelope::Envelope;
use crate::codec::types::PacketType;
use crate::codec::v3::Packet;
use crate::error::RegistryError;
use crate::types::ConnectionRef;
use crate::Result;

/// Per-packet-type business logic, implemented outside this core.
///
/// `handle` receives the reconstructed packet and the originating
/// connection; it may suspend or block, that is its own contract. A
/// returned `None` means the packet needs no reply. Failures propagate to
/// the transport unchanged.
#[async_trait]
pub trait MessageHandler: Sync + Send {
    async fn handle(&self, packet: Packet, conn: ConnectionRef) -> Result<Option<Envelope>>;
}

/// Immutable packet-type to handler mapping.
///
/// Built once at startup through [`HandlerRegistry::builder`] and shared
/// read-only across all in-flight requests, so lookups need no locking.
pub struct HandlerRegistry {
    handlers: HashMap<PacketType, Arc<dyn MessageHandler>>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder { handlers: HashMap::default() }
    }

    // Skips the completeness check so the fatal lookup-miss path stays
    // exercisable from tests.
    pub(crate) fn unchecked(handlers: HashMap<PacketType, Arc<dyn MessageHandler>>) -> Self {
        HandlerRegistry { handlers }
    }

    /// Total for a registry that passed [`HandlerRegistryBuilder::build`].
    #[inline]
    pub fn lookup(&self, packet_type: PacketType) -> Option<&Arc<dyn MessageHandler>> {
        self.handlers.get(&packet_type)
    }
}

/// Construction-time registration surface; the registry never changes once
/// built.
pub struct HandlerRegistryBuilder {
    handlers: HashMap<PacketType, Arc<dyn MessageHandler>>,
}

impl HandlerRegistryBuilder {
    pub fn register<H>(self, packet_type: PacketType, handler: H) -> Self
    where
        H: MessageHandler + 'static,
    {
        self.register_arc(packet_type, Arc::new(handler))
    }

    pub fn register_arc(mut self, packet_type: PacketType, handler: Arc<dyn MessageHandler>) -> Self {
        log::debug!("register message handler, packet type: {:?}", packet_type);
        self.handlers.insert(packet_type, handler);
        self
    }

    /// Fails fast if any of the ten inbound packet types has no handler.
    pub fn build(self) -> Result<HandlerRegistry, RegistryError> {
        for packet_type in PacketType::ALL {
            if !self.handlers.contains_key(&packet_type) {
                return Err(RegistryError::Unregistered(packet_type));
            }
        }
        Ok(HandlerRegistry { handlers: self.handlers })
    }
}
