use bytes::{BufMut, BytesMut};

use crate::codec::metadata;
use crate::error::{ProxyError, Result};
use crate::packet::{Body, Direction, Opcode, Packet};

/// Inverse of [`crate::parser::parse`]: writes the opcode byte followed by
/// the body's fields in exactly the wire order `(direction, opcode)` calls
/// for. Field order is fixed by the protocol, not by declaration order in
/// [`Body`].
pub fn serialize(packet: &Packet, out: &mut BytesMut) -> Result<()> {
    out.put_u8(packet.opcode.into());

    match (packet.opcode, packet.direction, &packet.body) {
        (Opcode::KeepAlive, Direction::Request | Direction::Response, Body::KeepAlive { id }) => {
            out.put_i32(*id);
        }
        (
            Opcode::Login,
            Direction::Request,
            Body::LoginRequest { version, username, unused_long, unused_int, unused_bytes },
        ) => {
            out.put_i32(*version);
            crate::codec::string::encode_utf16be(username, out);
            out.put_i64(*unused_long);
            out.put_i32(*unused_int);
            for b in unused_bytes {
                out.put_i8(*b);
            }
        }
        (
            Opcode::Login,
            Direction::Response,
            Body::LoginResponse {
                entity_id,
                unused_string,
                map_seed,
                mode,
                dimension,
                unused_byte,
                world_height,
                max_players,
            },
        ) => {
            out.put_i32(*entity_id);
            crate::codec::string::encode_utf16be(unused_string, out);
            out.put_i64(*map_seed);
            out.put_i32(*mode);
            out.put_i8(*dimension);
            out.put_i8(*unused_byte);
            out.put_u8(*world_height);
            out.put_u8(*max_players);
        }
        (Opcode::Handshake, Direction::Request | Direction::Response, Body::Handshake { value }) => {
            crate::codec::string::encode_utf16be(value, out);
        }
        (Opcode::Chat, Direction::Request | Direction::Response, Body::Chat { message }) => {
            crate::codec::string::encode_utf16be(message, out);
        }
        (Opcode::TimeUpdate, Direction::Response, Body::TimeUpdate { time }) => out.put_i64(*time),
        (
            Opcode::EntityEquipment,
            Direction::Response,
            Body::EntityEquipment { entity_id, slot, item_id, damage },
        ) => {
            out.put_i32(*entity_id);
            out.put_i16(*slot);
            out.put_i16(*item_id);
            out.put_i16(*damage);
        }
        (Opcode::SpawnPosition, Direction::Response, Body::SpawnPosition { x, y, z }) => {
            out.put_i32(*x);
            out.put_i32(*y);
            out.put_i32(*z);
        }
        (Opcode::UseEntity, Direction::Request, Body::UseEntity { user, target, left_click }) => {
            out.put_i32(*user);
            out.put_i32(*target);
            out.put_u8(*left_click as u8);
        }
        (
            Opcode::UpdateHealth,
            Direction::Response,
            Body::UpdateHealth { health, food, food_saturation },
        ) => {
            out.put_i16(*health);
            out.put_i16(*food);
            out.put_f32(*food_saturation);
        }
        (
            Opcode::Respawn,
            Direction::Request | Direction::Response,
            Body::Respawn { dimension, difficulty, mode, world_height, map_seed },
        ) => {
            out.put_i8(*dimension);
            out.put_i8(*difficulty);
            out.put_i8(*mode);
            out.put_i16(*world_height);
            out.put_i64(*map_seed);
        }
        (Opcode::OnGround, Direction::Request, Body::OnGround { on_ground }) => {
            out.put_u8(*on_ground as u8);
        }
        (
            Opcode::PlayerPosition,
            Direction::Request,
            Body::PlayerPosition { x, y, stance, z, on_ground },
        ) => {
            out.put_f64(*x);
            out.put_f64(*y);
            out.put_f64(*stance);
            out.put_f64(*z);
            out.put_u8(*on_ground as u8);
        }
        (Opcode::PlayerLook, Direction::Request, Body::PlayerLook { yaw, pitch, on_ground }) => {
            out.put_f32(*yaw);
            out.put_f32(*pitch);
            out.put_u8(*on_ground as u8);
        }
        (
            Opcode::PlayerMoveLook,
            Direction::Request,
            Body::PlayerMoveLook { x, y, stance, z, yaw, pitch, on_ground },
        ) => {
            out.put_f64(*x);
            out.put_f64(*y);
            out.put_f64(*stance);
            out.put_f64(*z);
            out.put_f32(*yaw);
            out.put_f32(*pitch);
            out.put_u8(*on_ground as u8);
        }
        (
            Opcode::PlayerMoveLook,
            Direction::Response,
            Body::PlayerMoveLook { x, y, stance, z, yaw, pitch, on_ground },
        ) => {
            out.put_f64(*x);
            out.put_f64(*stance);
            out.put_f64(*y);
            out.put_f64(*z);
            out.put_f32(*yaw);
            out.put_f32(*pitch);
            out.put_u8(*on_ground as u8);
        }
        (
            Opcode::PlayerDigging,
            Direction::Request,
            Body::PlayerDigging { status, x, y, z, face },
        ) => {
            out.put_i8(*status);
            out.put_i32(*x);
            out.put_i8(*y);
            out.put_i32(*z);
            out.put_i8(*face);
        }
        (
            Opcode::BlockPlacement,
            Direction::Request,
            Body::BlockPlacement { x, y, z, direction, item },
        ) => {
            out.put_i32(*x);
            out.put_i8(*y);
            out.put_i32(*z);
            out.put_i8(*direction);
            item.serialize(out);
        }
        (Opcode::HoldChange, Direction::Request, Body::HoldChange { slot }) => out.put_i16(*slot),
        (
            Opcode::Animation,
            Direction::Request | Direction::Response,
            Body::Animation { entity_id, animation },
        ) => {
            out.put_i32(*entity_id);
            out.put_i8(*animation);
        }
        (Opcode::EntityAction, Direction::Request, Body::EntityAction { entity_id, action }) => {
            out.put_i32(*entity_id);
            out.put_i8(*action);
        }
        (
            Opcode::NamedEntitySpawn,
            Direction::Response,
            Body::NamedEntitySpawn { entity_id, name, x, y, z, rotation, pitch, current_item },
        ) => {
            out.put_i32(*entity_id);
            crate::codec::string::encode_utf16be(name, out);
            out.put_i32(*x);
            out.put_i32(*y);
            out.put_i32(*z);
            out.put_i8(*rotation);
            out.put_i8(*pitch);
            out.put_i16(*current_item);
        }
        (
            Opcode::PickupSpawn,
            Direction::Response,
            Body::PickupSpawn { entity_id, item, x, y, z, rotation, pitch, roll },
        ) => {
            out.put_i32(*entity_id);
            item.serialize(out);
            out.put_i32(*x);
            out.put_i32(*y);
            out.put_i32(*z);
            out.put_i8(*rotation);
            out.put_i8(*pitch);
            out.put_i8(*roll);
        }
        (
            Opcode::CollectItem,
            Direction::Response,
            Body::CollectItem { collected_entity_id, collector_entity_id },
        ) => {
            out.put_i32(*collected_entity_id);
            out.put_i32(*collector_entity_id);
        }
        (
            Opcode::SpawnObject,
            Direction::Response,
            Body::SpawnObject { entity_id, object_type, x, y, z, throw_velocity },
        ) => {
            out.put_i32(*entity_id);
            out.put_i8(*object_type);
            out.put_i32(*x);
            out.put_i32(*y);
            out.put_i32(*z);
            match throw_velocity {
                Some((vx, vy, vz)) => {
                    out.put_i32(1);
                    out.put_i16(*vx);
                    out.put_i16(*vy);
                    out.put_i16(*vz);
                }
                None => out.put_i32(0),
            }
        }
        (
            Opcode::SpawnMob,
            Direction::Response,
            Body::SpawnMob { entity_id, mob_type, x, y, z, yaw, pitch, metadata: md },
        ) => {
            out.put_i32(*entity_id);
            out.put_i8(*mob_type);
            out.put_i32(*x);
            out.put_i32(*y);
            out.put_i32(*z);
            out.put_i8(*yaw);
            out.put_i8(*pitch);
            metadata::serialize(md, out);
        }
        (
            Opcode::Painting,
            Direction::Response,
            Body::Painting { entity_id, title, x, y, z, direction },
        ) => {
            out.put_i32(*entity_id);
            crate::codec::string::encode_utf16be(title, out);
            out.put_i32(*x);
            out.put_i32(*y);
            out.put_i32(*z);
            out.put_i32(*direction);
        }
        (
            Opcode::ExperienceOrb,
            Direction::Response,
            Body::ExperienceOrb { entity_id, x, y, z, count },
        ) => {
            out.put_i32(*entity_id);
            out.put_i32(*x);
            out.put_i32(*y);
            out.put_i32(*z);
            out.put_i16(*count);
        }
        (
            Opcode::EntityVelocity,
            Direction::Response,
            Body::EntityVelocity { entity_id, vx, vy, vz },
        ) => {
            out.put_i32(*entity_id);
            out.put_i16(*vx);
            out.put_i16(*vy);
            out.put_i16(*vz);
        }
        (Opcode::EntityDestroy, Direction::Response, Body::EntityDestroy { entity_id }) => {
            out.put_i32(*entity_id);
        }
        (Opcode::EntityCreate, Direction::Response, Body::EntityCreate { entity_id }) => {
            out.put_i32(*entity_id);
        }
        (
            Opcode::EntityRelativeMove,
            Direction::Response,
            Body::EntityRelativeMove { entity_id, dx, dy, dz },
        ) => {
            out.put_i32(*entity_id);
            out.put_i8(*dx);
            out.put_i8(*dy);
            out.put_i8(*dz);
        }
        (Opcode::EntityLook, Direction::Response, Body::EntityLook { entity_id, yaw, pitch }) => {
            out.put_i32(*entity_id);
            out.put_i8(*yaw);
            out.put_i8(*pitch);
        }
        (
            Opcode::EntityLookMove,
            Direction::Response,
            Body::EntityLookMove { entity_id, dx, dy, dz, yaw, pitch },
        ) => {
            out.put_i32(*entity_id);
            out.put_i8(*dx);
            out.put_i8(*dy);
            out.put_i8(*dz);
            out.put_i8(*yaw);
            out.put_i8(*pitch);
        }
        (
            Opcode::EntityTeleport,
            Direction::Response,
            Body::EntityTeleport { entity_id, x, y, z, yaw, pitch },
        ) => {
            out.put_i32(*entity_id);
            out.put_i32(*x);
            out.put_i32(*y);
            out.put_i32(*z);
            out.put_i8(*yaw);
            out.put_i8(*pitch);
        }
        (Opcode::EntityStatus, Direction::Response, Body::EntityStatus { entity_id, status }) => {
            out.put_i32(*entity_id);
            out.put_i8(*status);
        }
        (
            Opcode::EntityAttach,
            Direction::Response,
            Body::EntityAttach { entity_id, vehicle_id },
        ) => {
            out.put_i32(*entity_id);
            out.put_i32(*vehicle_id);
        }
        (
            Opcode::EntityMetadata,
            Direction::Request | Direction::Response,
            Body::EntityMetadata { entity_id, metadata: md },
        ) => {
            out.put_i32(*entity_id);
            metadata::serialize(md, out);
        }
        (
            Opcode::EntityEffect,
            Direction::Request | Direction::Response,
            Body::EntityEffect { entity_id, effect, amplifier, duration },
        ) => {
            out.put_i32(*entity_id);
            out.put_i8(*effect);
            out.put_i8(*amplifier);
            out.put_i16(*duration);
        }
        (
            Opcode::RemoveEntityEffect,
            Direction::Request | Direction::Response,
            Body::RemoveEntityEffect { entity_id, effect },
        ) => {
            out.put_i32(*entity_id);
            out.put_i8(*effect);
        }
        (
            Opcode::Experience,
            Direction::Response,
            Body::Experience { experience_bar, level, total_experience },
        ) => {
            out.put_i8(*experience_bar);
            out.put_i8(*level);
            out.put_i16(*total_experience);
        }
        (Opcode::PreChunk, Direction::Response, Body::PreChunk { x, z, load }) => {
            out.put_i32(*x);
            out.put_i32(*z);
            out.put_u8(*load as u8);
        }
        (
            Opcode::MapChunk,
            Direction::Response,
            Body::MapChunk { x, y, z, size_x, size_y, size_z, data },
        ) => {
            out.put_i32(*x);
            out.put_i16(*y);
            out.put_i32(*z);
            out.put_i8(*size_x);
            out.put_i8(*size_y);
            out.put_i8(*size_z);
            out.put_i32(data.len() as i32);
            out.put_slice(data);
        }
        (
            Opcode::MultiBlockChange,
            Direction::Response,
            Body::MultiBlockChange { chunk_x, chunk_z, changes },
        ) => {
            out.put_i32(*chunk_x);
            out.put_i32(*chunk_z);
            out.put_u16(changes.len() as u16);
            for (coord, block_type, metadata) in changes {
                out.put_i16(*coord);
                out.put_i8(*block_type);
                out.put_i8(*metadata);
            }
        }
        (
            Opcode::BlockChange,
            Direction::Response,
            Body::BlockChange { x, y, z, block_type, block_metadata },
        ) => {
            out.put_i32(*x);
            out.put_i8(*y);
            out.put_i32(*z);
            out.put_i8(*block_type);
            out.put_i8(*block_metadata);
        }
        (
            Opcode::BlockAction,
            Direction::Response,
            Body::BlockAction { x, y, z, byte1, byte2 },
        ) => {
            out.put_i32(*x);
            out.put_i16(*y);
            out.put_i32(*z);
            out.put_i8(*byte1);
            out.put_i8(*byte2);
        }
        (
            Opcode::Explosion,
            Direction::Response,
            Body::Explosion { x, y, z, radius, records },
        ) => {
            out.put_f64(*x);
            out.put_f64(*y);
            out.put_f64(*z);
            out.put_f32(*radius);
            out.put_i32(records.len() as i32);
            for (dx, dy, dz) in records {
                out.put_i8(*dx);
                out.put_i8(*dy);
                out.put_i8(*dz);
            }
        }
        (
            Opcode::SoundEffect,
            Direction::Response,
            Body::SoundEffect { effect_id, x, y, z, data },
        ) => {
            out.put_i32(*effect_id);
            out.put_i32(*x);
            out.put_i8(*y);
            out.put_i32(*z);
            out.put_i32(*data);
        }
        (Opcode::State, Direction::Response, Body::State { reason, game_mode }) => {
            out.put_i8(*reason);
            out.put_i8(*game_mode);
        }
        (
            Opcode::Thunderbolt,
            Direction::Response,
            Body::Thunderbolt { entity_id, unknown, x, y, z },
        ) => {
            out.put_i32(*entity_id);
            out.put_u8(*unknown as u8);
            out.put_i32(*x);
            out.put_i32(*y);
            out.put_i32(*z);
        }
        (
            Opcode::OpenWindow,
            Direction::Response,
            Body::OpenWindow { window_id, inventory_type, title, slot_count },
        ) => {
            out.put_i8(*window_id);
            out.put_i8(*inventory_type);
            crate::codec::string::encode_utf16be(title, out);
            out.put_i8(*slot_count);
        }
        (
            Opcode::CloseWindow,
            Direction::Request | Direction::Response,
            Body::CloseWindow { window_id },
        ) => out.put_i8(*window_id),
        (
            Opcode::WindowClick,
            Direction::Request,
            Body::WindowClick { window_id, slot, right_click, action_number, shift, clicked_item },
        ) => {
            out.put_i8(*window_id);
            out.put_i16(*slot);
            out.put_u8(*right_click as u8);
            out.put_i16(*action_number);
            out.put_u8(*shift as u8);
            clicked_item.serialize(out);
        }
        (Opcode::SetSlot, Direction::Response, Body::SetSlot { window_id, slot, item }) => {
            out.put_i8(*window_id);
            out.put_i16(*slot);
            item.serialize(out);
        }
        (Opcode::WindowItems, Direction::Response, Body::WindowItems { window_id, items }) => {
            out.put_i8(*window_id);
            out.put_i16(items.len() as i16);
            for item in items {
                item.serialize(out);
            }
        }
        (
            Opcode::UpdateProgressBar,
            Direction::Response,
            Body::UpdateProgressBar { window_id, progress_bar, value },
        ) => {
            out.put_i8(*window_id);
            out.put_i16(*progress_bar);
            out.put_i16(*value);
        }
        (
            Opcode::Transaction,
            Direction::Request | Direction::Response,
            Body::Transaction { window_id, action_number, accepted },
        ) => {
            out.put_i8(*window_id);
            out.put_i16(*action_number);
            out.put_u8(*accepted as u8);
        }
        (
            Opcode::CreativeInventoryAction,
            Direction::Request | Direction::Response,
            Body::CreativeInventoryAction { slot, item_id, quantity, damage },
        ) => {
            out.put_i16(*slot);
            out.put_i16(*item_id);
            out.put_i16(*quantity);
            out.put_i16(*damage);
        }
        (
            Opcode::UpdateSign,
            Direction::Request | Direction::Response,
            Body::UpdateSign { x, y, z, line1, line2, line3, line4 },
        ) => {
            out.put_i32(*x);
            out.put_i16(*y);
            out.put_i32(*z);
            crate::codec::string::encode_utf16be(line1, out);
            crate::codec::string::encode_utf16be(line2, out);
            crate::codec::string::encode_utf16be(line3, out);
            crate::codec::string::encode_utf16be(line4, out);
        }
        (Opcode::ItemData, Direction::Response, Body::ItemData { item_type, item_id, text }) => {
            // corrected wire shape: two i16 fields, then a u8 length, then
            // the raw text bytes (not the source's malformed format string).
            out.put_i16(*item_type);
            out.put_i16(*item_id);
            out.put_u8(text.len() as u8);
            out.put_slice(text);
        }
        (
            Opcode::IncrementStatistic,
            Direction::Request,
            Body::IncrementStatistic { statistic_id, amount },
        ) => {
            out.put_i32(*statistic_id);
            out.put_i8(*amount);
        }
        (
            Opcode::PlayerListItem,
            Direction::Response,
            Body::PlayerListItem { player_name, online, ping },
        ) => {
            crate::codec::string::encode_utf16be(player_name, out);
            out.put_u8(*online as u8);
            out.put_i16(*ping);
        }
        (Opcode::ListPing, Direction::Request, Body::ListPing) => {}
        (
            Opcode::Disconnect,
            Direction::Request | Direction::Response | Direction::Ping,
            Body::Disconnect { message },
        ) => {
            crate::codec::string::encode_utf16be(message, out);
        }
        (opcode, direction, _) => {
            return Err(ProxyError::UnsupportedOpcodeForDirection { opcode: opcode.into(), direction })
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::item_stack::ItemStack;

    #[test]
    fn keep_alive_round_trips() {
        let pkt = Packet::new(Direction::Request, Opcode::KeepAlive, Body::KeepAlive { id: 42 });
        let mut out = BytesMut::new();
        serialize(&pkt, &mut out).unwrap();
        assert_eq!(&out[..], &[0x00, 0x00, 0x00, 0x00, 0x2A]);
    }

    #[test]
    fn block_placement_round_trips_through_parser() {
        let pkt = Packet::new(
            Direction::Request,
            Opcode::BlockPlacement,
            Body::BlockPlacement {
                x: 1,
                y: 64,
                z: -1,
                direction: 1,
                item: ItemStack::Present { item_id: 1, count: 1, uses: 0 },
            },
        );
        let mut out = BytesMut::new();
        serialize(&pkt, &mut out).unwrap();

        let mut buf = crate::buffer::ByteBuffer::new();
        buf.append(&out);
        let parsed = crate::parser::parse(&mut buf, Direction::Request).unwrap();
        assert_eq!(parsed.body, pkt.body);
    }

    #[test]
    fn item_data_uses_corrected_layout_not_the_source_format_string() {
        let pkt = Packet::new(
            Direction::Response,
            Opcode::ItemData,
            Body::ItemData { item_type: 1, item_id: 2, text: vec![0xAA, 0xBB] },
        );
        let mut out = BytesMut::new();
        serialize(&pkt, &mut out).unwrap();
        // opcode(1) + item_type(2) + item_id(2) + len(1) + text(2) = 8
        assert_eq!(out.len(), 8);
        assert_eq!(&out[out.len() - 2..], &[0xAA, 0xBB]);
    }

    #[test]
    fn disconnect_serializes_on_all_three_directions() {
        for direction in [Direction::Request, Direction::Response, Direction::Ping] {
            let pkt = Packet::new(
                direction,
                Opcode::Disconnect,
                Body::Disconnect { message: "bye".to_string() },
            );
            let mut out = BytesMut::new();
            serialize(&pkt, &mut out).unwrap();
            assert!(!out.is_empty());
        }
    }
}
