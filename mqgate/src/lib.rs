#![deny(unsafe_code)]

//! MQTT frame reconstruction and handler routing core.
//!
//! A transport deframes the wire and hands over a generic
//! [`codec::envelope::Envelope`]; this crate rebuilds the typed control
//! packet and invokes the handler registered for that packet type,
//! forwarding whatever response the handler produces. Handlers carry the
//! per-type business logic and are supplied by the embedding server.
//!
//! # Overall Example
//! ```rust
//! use async_trait::async_trait;
//! use mqgate::codec::envelope::{Envelope, FrameHeader, Payload};
//! use mqgate::codec::types::PacketType;
//! use mqgate::codec::v3::Packet;
//! use mqgate::dispatch::{Dispatcher, RequestProcessor};
//! use mqgate::handler::{HandlerRegistry, MessageHandler};
//! use mqgate::types::ConnectionRef;
//!
//! struct Noop;
//!
//! #[async_trait]
//! impl MessageHandler for Noop {
//!     async fn handle(&self, _packet: Packet, _conn: ConnectionRef) -> mqgate::Result<Option<Envelope>> {
//!         Ok(None)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> mqgate::Result<()> {
//!     let mut builder = HandlerRegistry::builder();
//!     for packet_type in PacketType::ALL {
//!         builder = builder.register(packet_type, Noop);
//!     }
//!     let dispatcher = Dispatcher::new(builder.build()?);
//!
//!     let conn = ConnectionRef::new(1, None, None);
//!     let ping = Envelope::new(
//!         FrameHeader::new(PacketType::PingRequest.value(), false, 0, false, 0),
//!         Payload::None,
//!     );
//!     let response = dispatcher.process(conn, ping).await?;
//!     assert!(response.is_none());
//!     Ok(())
//! }
//! ```

pub mod dispatch; // Envelope-to-handler orchestration
pub mod error; // Registry and dispatch error types
pub mod handler; // Handler capability and registry
pub mod types; // Connection identity

pub use dispatch::{Dispatcher, RequestProcessor};
pub use error::{DispatchError, RegistryError};
pub use handler::{HandlerRegistry, MessageHandler};

/// External Crate Re-exports
pub use mqgate_codec as codec; // MQTT packet model and translation

pub type Error = anyhow::Error;
pub type Result<T, E = Error> = anyhow::Result<T, E>;
