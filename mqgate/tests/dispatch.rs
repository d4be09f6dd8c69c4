use std::num::NonZeroU16;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;

use mqgate::codec::envelope::{ConnectPayload, Envelope, FrameHeader, Payload, SubscribePayload};
use mqgate::codec::types::{PacketType, QoS, MQTT_LEVEL_311};
use mqgate::codec::v3::Packet;
use mqgate::dispatch::{Dispatcher, RequestProcessor};
use mqgate::handler::{HandlerRegistry, MessageHandler};
use mqgate::types::ConnectionRef;
use mqgate::DispatchError;

fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        simple_logger::SimpleLogger::new().with_level(log::LevelFilter::Debug).init().unwrap();
    });
}

/// Records every invocation and the packets it saw.
struct StubHandler {
    expected: PacketType,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<Packet>>>,
}

#[async_trait]
impl MessageHandler for StubHandler {
    async fn handle(&self, packet: Packet, _conn: ConnectionRef) -> mqgate::Result<Option<Envelope>> {
        assert_eq!(packet.packet_type(), self.expected);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(packet);
        Ok(None)
    }
}

struct Stubs {
    dispatcher: Dispatcher,
    calls: Vec<(PacketType, Arc<AtomicUsize>)>,
    seen: Vec<(PacketType, Arc<Mutex<Vec<Packet>>>)>,
}

fn stub_dispatcher() -> Stubs {
    let mut builder = HandlerRegistry::builder();
    let mut calls = Vec::new();
    let mut seen = Vec::new();
    for packet_type in PacketType::ALL {
        let c = Arc::new(AtomicUsize::new(0));
        let s = Arc::new(Mutex::new(Vec::new()));
        builder = builder
            .register(packet_type, StubHandler { expected: packet_type, calls: c.clone(), seen: s.clone() });
        calls.push((packet_type, c));
        seen.push((packet_type, s));
    }
    Stubs { dispatcher: Dispatcher::new(builder.build().unwrap()), calls, seen }
}

fn conn() -> ConnectionRef {
    ConnectionRef::new(1, None, Some(([127, 0, 0, 1], 45000).into()))
}

fn connect_envelope() -> Envelope {
    let header = FrameHeader {
        protocol_name: Some(Bytes::from_static(b"MQTT")),
        protocol_level: Some(MQTT_LEVEL_311),
        has_username: Some(false),
        has_password: Some(false),
        will_retain: Some(false),
        will_qos: Some(0),
        will_flag: Some(false),
        clean_session: Some(true),
        keep_alive: Some(30),
        ..FrameHeader::new(PacketType::Connect.value(), false, 0, false, 24)
    };
    Envelope::new(header, Payload::Connect(ConnectPayload { client_id: "c1".into(), ..Default::default() }))
}

fn publish_envelope(topic: &'static [u8], packet_id: u16, body: &'static [u8]) -> Envelope {
    let header = FrameHeader {
        topic_name: Some(Bytes::from_static(topic)),
        packet_id: NonZeroU16::new(packet_id),
        ..FrameHeader::new(PacketType::Publish.value(), false, 1, false, 12)
    };
    Envelope::new(header, Payload::Bytes(Bytes::from_static(body)))
}

fn subscribe_envelope(message_id: u16, filters: Vec<(&'static str, QoS)>) -> Envelope {
    let header = FrameHeader {
        message_id: NonZeroU16::new(message_id),
        ..FrameHeader::new(PacketType::Subscribe.value(), false, 1, false, 9)
    };
    let payload =
        SubscribePayload { topic_filters: filters.into_iter().map(|(f, q)| (f.into(), q)).collect() };
    Envelope::new(header, Payload::Subscribe(payload))
}

fn envelope_for(packet_type: PacketType) -> Envelope {
    match packet_type {
        PacketType::Connect => connect_envelope(),
        PacketType::Publish => publish_envelope(b"a/b", 7, b"hello"),
        PacketType::Subscribe => subscribe_envelope(42, vec![("a/+", QoS::AtMostOnce)]),
        _ => {
            let mut header = FrameHeader::new(packet_type.value(), false, 0, false, 2);
            header.message_id = NonZeroU16::new(3);
            Envelope::new(header, Payload::None)
        }
    }
}

#[tokio::test]
async fn test_routes_every_type_to_its_own_handler() {
    init();
    let stubs = stub_dispatcher();

    for packet_type in PacketType::ALL {
        let res = stubs.dispatcher.process(conn(), envelope_for(packet_type)).await.unwrap();
        assert!(res.is_none());
    }

    // each handler saw exactly one call, and each stub asserted the shape
    // of what it received
    for (packet_type, calls) in &stubs.calls {
        assert_eq!(calls.load(Ordering::SeqCst), 1, "handler for {packet_type:?}");
    }
}

#[tokio::test]
async fn test_decode_failure_never_reaches_handlers() {
    init();
    let stubs = stub_dispatcher();

    let unknown = Envelope::new(FrameHeader::new(0, false, 0, false, 0), Payload::None);
    let res = stubs.dispatcher.process(conn(), unknown).await;
    assert!(matches!(res, Err(DispatchError::Decode(_))));

    // SUBSCRIBE envelope carrying the wrong payload variant
    let mut mismatched = subscribe_envelope(42, vec![("a/+", QoS::AtMostOnce)]);
    mismatched.payload = Payload::Bytes(Bytes::from_static(b"nope"));
    let res = stubs.dispatcher.process(conn(), mismatched).await;
    assert!(matches!(res, Err(DispatchError::Decode(_))));

    for (_, calls) in &stubs.calls {
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

struct EchoPing;

#[async_trait]
impl MessageHandler for EchoPing {
    async fn handle(&self, packet: Packet, _conn: ConnectionRef) -> mqgate::Result<Option<Envelope>> {
        // PINGRESP back to the transport
        assert!(matches!(packet, Packet::PingRequest(_)));
        Ok(Some(Envelope::new(FrameHeader::new(13, false, 0, false, 0), Payload::None)))
    }
}

struct Failing;

#[async_trait]
impl MessageHandler for Failing {
    async fn handle(&self, _packet: Packet, _conn: ConnectionRef) -> mqgate::Result<Option<Envelope>> {
        Err(anyhow!("backing store unavailable"))
    }
}

struct Noop;

#[async_trait]
impl MessageHandler for Noop {
    async fn handle(&self, _packet: Packet, _conn: ConnectionRef) -> mqgate::Result<Option<Envelope>> {
        Ok(None)
    }
}

fn dispatcher_with<H>(packet_type: PacketType, handler: H) -> Dispatcher
where
    H: MessageHandler + 'static,
{
    let mut builder = HandlerRegistry::builder().register(packet_type, handler);
    for other in PacketType::ALL {
        if other != packet_type {
            builder = builder.register(other, Noop);
        }
    }
    Dispatcher::new(builder.build().unwrap())
}

#[tokio::test]
async fn test_response_is_forwarded_unchanged() {
    init();
    let dispatcher = dispatcher_with(PacketType::PingRequest, EchoPing);
    let res =
        dispatcher.process(conn(), envelope_for(PacketType::PingRequest)).await.unwrap().expect("a reply");
    assert_eq!(res.header.message_type, 13);
    assert_eq!(res.payload, Payload::None);
}

#[tokio::test]
async fn test_handler_error_propagates_unchanged() {
    init();
    let dispatcher = dispatcher_with(PacketType::Disconnect, Failing);
    let res = dispatcher.process(conn(), envelope_for(PacketType::Disconnect)).await;
    match res {
        Err(DispatchError::Handler(e)) => assert_eq!(e.to_string(), "backing store unavailable"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_do_not_cross_contaminate() {
    init();
    let stubs = Arc::new(stub_dispatcher());

    let mut tasks = Vec::new();
    for i in 0..50u16 {
        let stubs = stubs.clone();
        tasks.push(tokio::spawn(async move {
            let publish = publish_envelope(b"a/b", 7, b"payload-a");
            let subscribe = subscribe_envelope(42, vec![("a/+", QoS::AtMostOnce), ("b/#", QoS::AtLeastOnce)]);
            let (r1, r2) = futures::future::join(
                stubs.dispatcher.process(ConnectionRef::new(u64::from(i) * 2, None, None), publish),
                stubs.dispatcher.process(ConnectionRef::new(u64::from(i) * 2 + 1, None, None), subscribe),
            )
            .await;
            r1.unwrap();
            r2.unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for (packet_type, calls) in &stubs.calls {
        let expected = match packet_type {
            PacketType::Publish | PacketType::Subscribe => 50,
            _ => 0,
        };
        assert_eq!(calls.load(Ordering::SeqCst), expected, "handler for {packet_type:?}");
    }

    // every publish arrived intact, no subscribe data leaked in
    for (packet_type, seen) in &stubs.seen {
        let seen = seen.lock().unwrap();
        match packet_type {
            PacketType::Publish => {
                for packet in seen.iter() {
                    let p = if let Packet::Publish(p) = packet { p } else { panic!() };
                    assert_eq!(p.variable.topic, "a/b");
                    assert_eq!(p.variable.packet_id, NonZeroU16::new(7));
                    assert_eq!(p.payload, Bytes::from_static(b"payload-a"));
                }
            }
            PacketType::Subscribe => {
                for packet in seen.iter() {
                    let s = if let Packet::Subscribe(s) = packet { s } else { panic!() };
                    assert_eq!(s.variable.message_id, NonZeroU16::new(42).unwrap());
                    assert_eq!(s.payload.topic_filters.len(), 2);
                    assert_eq!(s.payload.topic_filters[0].0, "a/+");
                    assert_eq!(s.payload.topic_filters[1].0, "b/#");
                }
            }
            _ => assert!(seen.is_empty()),
        }
    }
}
