//! Property-based tests for the codec: round-trip, prober/parser agreement,
//! incremental delivery, and purity. Uses proptest to cover many inputs per
//! opcode rather than a handful of hand-picked examples.

use bytes::BytesMut;
use proptest::prelude::*;
use survival_proto_lib::buffer::ByteBuffer;
use survival_proto_lib::codec::item_stack::ItemStack;
use survival_proto_lib::codec::metadata::{Metadata, MetadataEntry, MetadataValue};
use survival_proto_lib::packet::{Body, Direction, Opcode, Packet};
use survival_proto_lib::prober::{self, ProbeResult};
use survival_proto_lib::{parser, serializer};

fn arbitrary_chat() -> impl Strategy<Value = Packet> {
    "[ -~]{0,64}".prop_map(|message| Packet::new(Direction::Request, Opcode::Chat, Body::Chat { message }))
}

fn arbitrary_keep_alive() -> impl Strategy<Value = Packet> {
    any::<i32>().prop_map(|id| Packet::new(Direction::Response, Opcode::KeepAlive, Body::KeepAlive { id }))
}

fn arbitrary_item_stack() -> impl Strategy<Value = ItemStack> {
    prop_oneof![
        Just(ItemStack::Empty),
        (any::<i16>(), any::<i8>(), any::<i16>()).prop_filter_map(
            "item_id must not collide with the empty sentinel",
            |(item_id, count, uses)| {
                if item_id == -1 {
                    None
                } else {
                    Some(ItemStack::Present { item_id, count, uses })
                }
            }
        ),
    ]
}

fn arbitrary_block_placement() -> impl Strategy<Value = Packet> {
    (any::<i32>(), any::<i8>(), any::<i32>(), any::<i8>(), arbitrary_item_stack()).prop_map(
        |(x, y, z, direction, item)| {
            Packet::new(Direction::Request, Opcode::BlockPlacement, Body::BlockPlacement { x, y, z, direction, item })
        },
    )
}

fn arbitrary_metadata_entry() -> impl Strategy<Value = MetadataEntry> {
    (
        0u8..32,
        prop_oneof![
            any::<i8>().prop_map(MetadataValue::Byte),
            any::<i16>().prop_map(MetadataValue::Short),
            any::<i32>().prop_map(MetadataValue::Int),
            any::<f32>().prop_map(MetadataValue::Float),
            "[ -~]{0,16}".prop_map(MetadataValue::String),
        ],
    )
        .prop_map(|(key, value)| MetadataEntry { key, value })
}

fn arbitrary_metadata() -> impl Strategy<Value = Metadata> {
    prop::collection::vec(arbitrary_metadata_entry(), 0..6)
}

fn arbitrary_entity_metadata() -> impl Strategy<Value = Packet> {
    (any::<i32>(), arbitrary_metadata()).prop_map(|(entity_id, metadata)| {
        Packet::new(Direction::Response, Opcode::EntityMetadata, Body::EntityMetadata { entity_id, metadata })
    })
}

fn arbitrary_multi_block_change() -> impl Strategy<Value = Packet> {
    (any::<i32>(), any::<i32>(), prop::collection::vec((any::<i16>(), any::<i8>(), any::<i8>()), 0..8))
        .prop_map(|(chunk_x, chunk_z, changes)| {
            Packet::new(
                Direction::Response,
                Opcode::MultiBlockChange,
                Body::MultiBlockChange { chunk_x, chunk_z, changes },
            )
        })
}

fn arbitrary_window_items() -> impl Strategy<Value = Packet> {
    (any::<i8>(), prop::collection::vec(arbitrary_item_stack(), 0..8)).prop_map(|(window_id, items)| {
        Packet::new(Direction::Response, Opcode::WindowItems, Body::WindowItems { window_id, items })
    })
}

fn arbitrary_explosion() -> impl Strategy<Value = Packet> {
    (
        any::<f64>(),
        any::<f64>(),
        any::<f64>(),
        any::<f32>(),
        prop::collection::vec((any::<i8>(), any::<i8>(), any::<i8>()), 0..8),
    )
        .prop_map(|(x, y, z, radius, records)| {
            Packet::new(Direction::Response, Opcode::Explosion, Body::Explosion { x, y, z, radius, records })
        })
}

fn arbitrary_spawn_object() -> impl Strategy<Value = Packet> {
    (
        any::<i32>(),
        any::<i8>(),
        any::<i32>(),
        any::<i32>(),
        any::<i32>(),
        prop::option::of((any::<i16>(), any::<i16>(), any::<i16>())),
    )
        .prop_map(|(entity_id, object_type, x, y, z, throw_velocity)| {
            Packet::new(
                Direction::Response,
                Opcode::SpawnObject,
                Body::SpawnObject { entity_id, object_type, x, y, z, throw_velocity },
            )
        })
}

fn arbitrary_update_sign() -> impl Strategy<Value = Packet> {
    (
        any::<i32>(),
        any::<i16>(),
        any::<i32>(),
        "[ -~]{0,16}",
        "[ -~]{0,16}",
        "[ -~]{0,16}",
        "[ -~]{0,16}",
    )
        .prop_map(|(x, y, z, line1, line2, line3, line4)| {
            Packet::new(
                Direction::Request,
                Opcode::UpdateSign,
                Body::UpdateSign { x, y, z, line1, line2, line3, line4 },
            )
        })
}

fn arbitrary_packet() -> impl Strategy<Value = Packet> {
    prop_oneof![
        arbitrary_keep_alive(),
        arbitrary_chat(),
        arbitrary_block_placement(),
        arbitrary_entity_metadata(),
        arbitrary_multi_block_change(),
        arbitrary_window_items(),
        arbitrary_explosion(),
        arbitrary_spawn_object(),
        arbitrary_update_sign(),
    ]
}

proptest! {
    /// Property 1: serialize then parse returns the original packet.
    #[test]
    fn round_trip_is_identity(packet in arbitrary_packet()) {
        let mut out = BytesMut::new();
        serializer::serialize(&packet, &mut out).unwrap();

        let mut buf = ByteBuffer::new();
        buf.append(&out);
        let parsed = parser::parse(&mut buf, packet.direction).unwrap();

        prop_assert_eq!(parsed.body, packet.body);
        prop_assert_eq!(buf.len(), 0, "parser must consume the whole encoded packet");
    }

    /// Property 2: the prober's declared length always equals the number of
    /// bytes the parser actually consumes.
    #[test]
    fn prober_and_parser_agree_on_length(packet in arbitrary_packet()) {
        let mut out = BytesMut::new();
        serializer::serialize(&packet, &mut out).unwrap();

        let mut buf = ByteBuffer::new();
        buf.append(&out);
        let declared = match prober::probe(&buf) {
            ProbeResult::Complete(n) => n,
            other => panic!("expected Complete, got {other:?}"),
        };
        prop_assert_eq!(declared, out.len());

        parser::parse(&mut buf, packet.direction).unwrap();
        prop_assert_eq!(buf.len(), out.len() - declared);
    }

    /// Property 3: feeding the encoded bytes one at a time never yields
    /// `Complete` early, and yields exactly `Complete` once all bytes have
    /// arrived.
    #[test]
    fn incremental_delivery_only_completes_once_whole(packet in arbitrary_packet()) {
        let mut out = BytesMut::new();
        serializer::serialize(&packet, &mut out).unwrap();

        let mut buf = ByteBuffer::new();
        for (i, byte) in out.iter().enumerate() {
            buf.append(std::slice::from_ref(byte));
            let result = prober::probe(&buf);
            if i + 1 < out.len() {
                prop_assert_eq!(result, ProbeResult::NeedMore);
            } else {
                prop_assert_eq!(result, ProbeResult::Complete(out.len()));
            }
        }
    }

    /// Property 4: probing never consumes bytes from the buffer.
    #[test]
    fn probing_is_pure(packet in arbitrary_packet()) {
        let mut out = BytesMut::new();
        serializer::serialize(&packet, &mut out).unwrap();

        let mut buf = ByteBuffer::new();
        buf.append(&out);
        let before = buf.len();
        let _ = prober::probe(&buf);
        let _ = prober::probe(&buf);
        prop_assert_eq!(buf.len(), before);
    }

    /// Property 5: an item stack's sentinel rule is exactly `item_id == -1`.
    #[test]
    fn item_stack_sentinel_round_trips(item in arbitrary_item_stack()) {
        let mut out = BytesMut::new();
        item.serialize(&mut out);

        let expected_len = match item {
            ItemStack::Empty => 2,
            ItemStack::Present { .. } => 5,
        };
        prop_assert_eq!(out.len(), expected_len);

        let mut buf = ByteBuffer::new();
        buf.append(&out);
        prop_assert_eq!(ItemStack::parse(&mut buf), item);
    }

    /// Property 6: an entity-metadata stream always ends at its terminator
    /// byte, regardless of entry contents.
    #[test]
    fn metadata_stream_always_terminates(metadata in arbitrary_metadata()) {
        let mut out = BytesMut::new();
        survival_proto_lib::codec::metadata::serialize(&metadata, &mut out);
        prop_assert_eq!(*out.last().unwrap(), survival_proto_lib::codec::metadata::TERMINATOR);

        let mut buf = ByteBuffer::new();
        buf.append(&out);
        prop_assert_eq!(survival_proto_lib::codec::metadata::parse(&mut buf).unwrap(), metadata);
    }
}

/// Property 7: the same opcode byte can parse to different shapes depending
/// on which direction it's read in (`Login` is the only opcode where R/S
/// field *sets* genuinely differ).
#[test]
fn login_parses_differently_by_direction() {
    let request = Packet::new(
        Direction::Request,
        Opcode::Login,
        Body::LoginRequest {
            version: 14,
            username: "Notch".to_string(),
            unused_long: 0,
            unused_int: 0,
            unused_bytes: [0, 0, 0, 0],
        },
    );
    let mut out = BytesMut::new();
    serializer::serialize(&request, &mut out).unwrap();
    let mut buf = ByteBuffer::new();
    buf.append(&out);
    let parsed = parser::parse(&mut buf, Direction::Request).unwrap();
    assert!(matches!(parsed.body, Body::LoginRequest { .. }));

    let response = Packet::new(
        Direction::Response,
        Opcode::Login,
        Body::LoginResponse {
            entity_id: 1,
            unused_string: String::new(),
            map_seed: 0,
            mode: 0,
            dimension: 0,
            unused_byte: 0,
            world_height: 128,
            max_players: 8,
        },
    );
    let mut out = BytesMut::new();
    serializer::serialize(&response, &mut out).unwrap();
    let mut buf = ByteBuffer::new();
    buf.append(&out);
    let parsed = parser::parse(&mut buf, Direction::Response).unwrap();
    assert!(matches!(parsed.body, Body::LoginResponse { .. }));
}
