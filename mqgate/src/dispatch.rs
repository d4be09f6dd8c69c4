use std::sync::Arc;

use async_trait::async_trait;

use crate::codec::envelope::Envelope;
use crate::codec::v3::Translator;
use crate::error::DispatchError;
use crate::handler::HandlerRegistry;
use crate::types::ConnectionRef;

/// The request seam the transport drives.
///
/// `reject_request` is the admission override point for an external
/// load-shedding collaborator; implementations here never shed load.
#[async_trait]
pub trait RequestProcessor: Sync + Send {
    async fn process(
        &self,
        conn: ConnectionRef,
        envelope: Envelope,
    ) -> Result<Option<Envelope>, DispatchError>;

    fn reject_request(&self) -> bool {
        false
    }
}

/// Routes deframed envelopes to the handler registered for their packet
/// type: translate, look up, invoke, forward the response unchanged.
///
/// Owns no per-request state; the registry is read-only after construction,
/// so concurrent `process` calls never contend and a failure in one request
/// cannot touch another.
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    translator: Translator,
}

impl Dispatcher {
    pub fn new(registry: HandlerRegistry) -> Self {
        Dispatcher { registry: Arc::new(registry), translator: Translator::default() }
    }

    /// Upper bound on the declared remaining length, `0` = unlimited.
    pub fn max_packet_size(mut self, size: u32) -> Self {
        self.translator.set_max_size(size);
        self
    }
}

#[async_trait]
impl RequestProcessor for Dispatcher {
    async fn process(
        &self,
        conn: ConnectionRef,
        envelope: Envelope,
    ) -> Result<Option<Envelope>, DispatchError> {
        let packet = self.translator.translate(&envelope).map_err(|e| {
            log::warn!(
                "{} drop frame, message type: {}, reason: {:?}",
                conn,
                envelope.header.message_type,
                e
            );
            e
        })?;
        let packet_type = packet.packet_type();
        let handler = self.registry.lookup(packet_type).ok_or_else(|| {
            log::error!("{} no handler registered, packet type: {:?}", conn, packet_type);
            DispatchError::HandlerUnregistered(packet_type)
        })?;
        log::debug!("{} dispatch, packet type: {:?}", conn, packet_type);
        handler.handle(packet, conn).await.map_err(DispatchError::Handler)
    }
}
