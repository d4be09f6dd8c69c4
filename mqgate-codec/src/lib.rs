#![deny(unsafe_code)]

//! MQTT v3.1/v3.1.1 control-packet model and envelope translation
//!
//! The transport layer deframes the wire and hands over a generic
//! [`envelope::Envelope`]: a flat protocol header plus an opaque payload.
//! This crate turns that envelope into one of the ten strongly typed
//! inbound [`v3::Packet`] shapes, rejecting unknown type codes and payload
//! variants that do not agree with the declared type.
//!
//! ## Components:
//! - `v3::Translator`: per-type header reconstruction, structural checks only
//! - `v3::Packet`: tagged representation of the ten inbound control packets
//! - `envelope`: the transport-neutral command shape (requests and replies)
//! - Error handling with a dedicated [`error::DecodeError`] type
//!
//! No network I/O, no connection state and no payload-content validation
//! happen here; those belong to the transport and the per-type handlers.

#[macro_use]
mod utils;

/// Error types for translation failures
pub mod error;

/// Transport-neutral command shapes
pub mod envelope;

/// Shared types and constants for MQTT protocol
pub mod types;

/// MQTT v3.1/v3.1.1 protocol implementation
pub mod v3;
