use crate::buffer::ByteBuffer;
use crate::codec::{item_stack, metadata};
use crate::error::{ProxyError, Result};
use crate::packet::{Body, Direction, Opcode, Packet};

/// Consumes exactly one packet. Precondition: `prober::probe(buf) ==
/// Complete(n)` was just observed on this same buffer; violating it is a
/// bug, not a protocol error, and will panic via the underlying buffer's
/// own underrun behavior.
///
/// `direction` is fixed by which session half is calling: `Request` on
/// the downstream-inbound side, `Response` on the upstream-inbound side.
/// `Ping` is never passed here; it is only ever produced synthetically by
/// the proxy session.
pub fn parse(buf: &mut ByteBuffer, direction: Direction) -> Result<Packet> {
    debug_assert_ne!(direction, Direction::Ping, "parse() never serves the Ping direction");

    let opcode_byte = buf.take_u8();
    let opcode = Opcode::try_from(opcode_byte)
        .map_err(|_| ProxyError::Malformed(format!("unknown opcode {opcode_byte:#04x}")))?;

    let body = match (opcode, direction) {
        (Opcode::KeepAlive, Direction::Request | Direction::Response) => {
            Body::KeepAlive { id: buf.take_i32_be() }
        }
        (Opcode::Login, Direction::Request) => Body::LoginRequest {
            version: buf.take_i32_be(),
            username: buf.take_utf16be_string(),
            unused_long: buf.take_i64_be(),
            unused_int: buf.take_i32_be(),
            unused_bytes: [buf.take_i8(), buf.take_i8(), buf.take_i8(), buf.take_i8()],
        },
        (Opcode::Login, Direction::Response) => Body::LoginResponse {
            entity_id: buf.take_i32_be(),
            unused_string: buf.take_utf16be_string(),
            map_seed: buf.take_i64_be(),
            mode: buf.take_i32_be(),
            dimension: buf.take_i8(),
            unused_byte: buf.take_i8(),
            world_height: buf.take_u8(),
            max_players: buf.take_u8(),
        },
        (Opcode::Handshake, Direction::Request | Direction::Response) => {
            Body::Handshake { value: buf.take_utf16be_string() }
        }
        (Opcode::Chat, Direction::Request | Direction::Response) => {
            Body::Chat { message: buf.take_utf16be_string() }
        }
        (Opcode::TimeUpdate, Direction::Response) => Body::TimeUpdate { time: buf.take_i64_be() },
        (Opcode::EntityEquipment, Direction::Response) => Body::EntityEquipment {
            entity_id: buf.take_i32_be(),
            slot: buf.take_i16_be(),
            item_id: buf.take_i16_be(),
            damage: buf.take_i16_be(),
        },
        (Opcode::SpawnPosition, Direction::Response) => Body::SpawnPosition {
            x: buf.take_i32_be(),
            y: buf.take_i32_be(),
            z: buf.take_i32_be(),
        },
        (Opcode::UseEntity, Direction::Request) => Body::UseEntity {
            user: buf.take_i32_be(),
            target: buf.take_i32_be(),
            left_click: buf.take_bool(),
        },
        (Opcode::UpdateHealth, Direction::Response) => Body::UpdateHealth {
            health: buf.take_i16_be(),
            food: buf.take_i16_be(),
            food_saturation: buf.take_f32_be(),
        },
        (Opcode::Respawn, Direction::Request | Direction::Response) => Body::Respawn {
            dimension: buf.take_i8(),
            difficulty: buf.take_i8(),
            mode: buf.take_i8(),
            world_height: buf.take_i16_be(),
            map_seed: buf.take_i64_be(),
        },
        (Opcode::OnGround, Direction::Request) => Body::OnGround { on_ground: buf.take_bool() },
        (Opcode::PlayerPosition, Direction::Request) => Body::PlayerPosition {
            x: buf.take_f64_be(),
            y: buf.take_f64_be(),
            stance: buf.take_f64_be(),
            z: buf.take_f64_be(),
            on_ground: buf.take_bool(),
        },
        (Opcode::PlayerLook, Direction::Request) => Body::PlayerLook {
            yaw: buf.take_f32_be(),
            pitch: buf.take_f32_be(),
            on_ground: buf.take_bool(),
        },
        (Opcode::PlayerMoveLook, Direction::Request) => {
            // wire order for a request is x, y, stance, z
            let x = buf.take_f64_be();
            let y = buf.take_f64_be();
            let stance = buf.take_f64_be();
            let z = buf.take_f64_be();
            Body::PlayerMoveLook {
                x,
                y,
                stance,
                z,
                yaw: buf.take_f32_be(),
                pitch: buf.take_f32_be(),
                on_ground: buf.take_bool(),
            }
        }
        (Opcode::PlayerMoveLook, Direction::Response) => {
            // wire order for a response is x, stance, y, z
            let x = buf.take_f64_be();
            let stance = buf.take_f64_be();
            let y = buf.take_f64_be();
            let z = buf.take_f64_be();
            Body::PlayerMoveLook {
                x,
                y,
                stance,
                z,
                yaw: buf.take_f32_be(),
                pitch: buf.take_f32_be(),
                on_ground: buf.take_bool(),
            }
        }
        (Opcode::PlayerDigging, Direction::Request) => Body::PlayerDigging {
            status: buf.take_i8(),
            x: buf.take_i32_be(),
            y: buf.take_i8(),
            z: buf.take_i32_be(),
            face: buf.take_i8(),
        },
        (Opcode::BlockPlacement, Direction::Request) => Body::BlockPlacement {
            x: buf.take_i32_be(),
            y: buf.take_i8(),
            z: buf.take_i32_be(),
            direction: buf.take_i8(),
            item: item_stack::ItemStack::parse(buf),
        },
        (Opcode::HoldChange, Direction::Request) => Body::HoldChange { slot: buf.take_i16_be() },
        (Opcode::Animation, Direction::Request | Direction::Response) => {
            Body::Animation { entity_id: buf.take_i32_be(), animation: buf.take_i8() }
        }
        (Opcode::EntityAction, Direction::Request) => {
            Body::EntityAction { entity_id: buf.take_i32_be(), action: buf.take_i8() }
        }
        (Opcode::NamedEntitySpawn, Direction::Response) => Body::NamedEntitySpawn {
            entity_id: buf.take_i32_be(),
            name: buf.take_utf16be_string(),
            x: buf.take_i32_be(),
            y: buf.take_i32_be(),
            z: buf.take_i32_be(),
            rotation: buf.take_i8(),
            pitch: buf.take_i8(),
            current_item: buf.take_i16_be(),
        },
        (Opcode::PickupSpawn, Direction::Response) => Body::PickupSpawn {
            entity_id: buf.take_i32_be(),
            item: item_stack::PickupItem::parse(buf),
            x: buf.take_i32_be(),
            y: buf.take_i32_be(),
            z: buf.take_i32_be(),
            rotation: buf.take_i8(),
            pitch: buf.take_i8(),
            roll: buf.take_i8(),
        },
        (Opcode::CollectItem, Direction::Response) => Body::CollectItem {
            collected_entity_id: buf.take_i32_be(),
            collector_entity_id: buf.take_i32_be(),
        },
        (Opcode::SpawnObject, Direction::Response) => {
            let entity_id = buf.take_i32_be();
            let object_type = buf.take_i8();
            let x = buf.take_i32_be();
            let y = buf.take_i32_be();
            let z = buf.take_i32_be();
            let flag = buf.take_i32_be();
            // correct behavior per the wire contract: flag > 0 implies
            // three trailing i16 fields follow.
            let throw_velocity = if flag > 0 {
                Some((buf.take_i16_be(), buf.take_i16_be(), buf.take_i16_be()))
            } else {
                None
            };
            Body::SpawnObject { entity_id, object_type, x, y, z, throw_velocity }
        }
        (Opcode::SpawnMob, Direction::Response) => Body::SpawnMob {
            entity_id: buf.take_i32_be(),
            mob_type: buf.take_i8(),
            x: buf.take_i32_be(),
            y: buf.take_i32_be(),
            z: buf.take_i32_be(),
            yaw: buf.take_i8(),
            pitch: buf.take_i8(),
            metadata: metadata::parse(buf)?,
        },
        (Opcode::Painting, Direction::Response) => Body::Painting {
            entity_id: buf.take_i32_be(),
            title: buf.take_utf16be_string(),
            x: buf.take_i32_be(),
            y: buf.take_i32_be(),
            z: buf.take_i32_be(),
            direction: buf.take_i32_be(),
        },
        (Opcode::ExperienceOrb, Direction::Response) => Body::ExperienceOrb {
            entity_id: buf.take_i32_be(),
            x: buf.take_i32_be(),
            y: buf.take_i32_be(),
            z: buf.take_i32_be(),
            count: buf.take_i16_be(),
        },
        (Opcode::EntityVelocity, Direction::Response) => Body::EntityVelocity {
            entity_id: buf.take_i32_be(),
            vx: buf.take_i16_be(),
            vy: buf.take_i16_be(),
            vz: buf.take_i16_be(),
        },
        (Opcode::EntityDestroy, Direction::Response) => {
            Body::EntityDestroy { entity_id: buf.take_i32_be() }
        }
        (Opcode::EntityCreate, Direction::Response) => {
            Body::EntityCreate { entity_id: buf.take_i32_be() }
        }
        (Opcode::EntityRelativeMove, Direction::Response) => Body::EntityRelativeMove {
            entity_id: buf.take_i32_be(),
            dx: buf.take_i8(),
            dy: buf.take_i8(),
            dz: buf.take_i8(),
        },
        (Opcode::EntityLook, Direction::Response) => {
            Body::EntityLook { entity_id: buf.take_i32_be(), yaw: buf.take_i8(), pitch: buf.take_i8() }
        }
        (Opcode::EntityLookMove, Direction::Response) => Body::EntityLookMove {
            entity_id: buf.take_i32_be(),
            dx: buf.take_i8(),
            dy: buf.take_i8(),
            dz: buf.take_i8(),
            yaw: buf.take_i8(),
            pitch: buf.take_i8(),
        },
        (Opcode::EntityTeleport, Direction::Response) => Body::EntityTeleport {
            entity_id: buf.take_i32_be(),
            x: buf.take_i32_be(),
            y: buf.take_i32_be(),
            z: buf.take_i32_be(),
            yaw: buf.take_i8(),
            pitch: buf.take_i8(),
        },
        (Opcode::EntityStatus, Direction::Response) => {
            Body::EntityStatus { entity_id: buf.take_i32_be(), status: buf.take_i8() }
        }
        (Opcode::EntityAttach, Direction::Response) => {
            Body::EntityAttach { entity_id: buf.take_i32_be(), vehicle_id: buf.take_i32_be() }
        }
        (Opcode::EntityMetadata, Direction::Request | Direction::Response) => {
            Body::EntityMetadata { entity_id: buf.take_i32_be(), metadata: metadata::parse(buf)? }
        }
        (Opcode::EntityEffect, Direction::Request | Direction::Response) => Body::EntityEffect {
            entity_id: buf.take_i32_be(),
            effect: buf.take_i8(),
            amplifier: buf.take_i8(),
            duration: buf.take_i16_be(),
        },
        (Opcode::RemoveEntityEffect, Direction::Request | Direction::Response) => {
            Body::RemoveEntityEffect { entity_id: buf.take_i32_be(), effect: buf.take_i8() }
        }
        (Opcode::Experience, Direction::Response) => Body::Experience {
            experience_bar: buf.take_i8(),
            level: buf.take_i8(),
            total_experience: buf.take_i16_be(),
        },
        (Opcode::PreChunk, Direction::Response) => {
            Body::PreChunk { x: buf.take_i32_be(), z: buf.take_i32_be(), load: buf.take_bool() }
        }
        (Opcode::MapChunk, Direction::Response) => {
            let x = buf.take_i32_be();
            let y = buf.take_i16_be();
            let z = buf.take_i32_be();
            let size_x = buf.take_i8();
            let size_y = buf.take_i8();
            let size_z = buf.take_i8();
            let length = buf.take_i32_be();
            let data = buf.take_bytes_vec(length as usize);
            Body::MapChunk { x, y, z, size_x, size_y, size_z, data }
        }
        (Opcode::MultiBlockChange, Direction::Response) => {
            let chunk_x = buf.take_i32_be();
            let chunk_z = buf.take_i32_be();
            let count = buf.take_u16_be();
            let changes = (0..count)
                .map(|_| (buf.take_i16_be(), buf.take_i8(), buf.take_i8()))
                .collect();
            Body::MultiBlockChange { chunk_x, chunk_z, changes }
        }
        (Opcode::BlockChange, Direction::Response) => Body::BlockChange {
            x: buf.take_i32_be(),
            y: buf.take_i8(),
            z: buf.take_i32_be(),
            block_type: buf.take_i8(),
            block_metadata: buf.take_i8(),
        },
        (Opcode::BlockAction, Direction::Response) => Body::BlockAction {
            x: buf.take_i32_be(),
            y: buf.take_i16_be(),
            z: buf.take_i32_be(),
            byte1: buf.take_i8(),
            byte2: buf.take_i8(),
        },
        (Opcode::Explosion, Direction::Response) => {
            let x = buf.take_f64_be();
            let y = buf.take_f64_be();
            let z = buf.take_f64_be();
            let radius = buf.take_f32_be();
            let count = buf.take_i32_be();
            let records =
                (0..count).map(|_| (buf.take_i8(), buf.take_i8(), buf.take_i8())).collect();
            Body::Explosion { x, y, z, radius, records }
        }
        (Opcode::SoundEffect, Direction::Response) => Body::SoundEffect {
            effect_id: buf.take_i32_be(),
            x: buf.take_i32_be(),
            y: buf.take_i8(),
            z: buf.take_i32_be(),
            data: buf.take_i32_be(),
        },
        (Opcode::State, Direction::Response) => {
            Body::State { reason: buf.take_i8(), game_mode: buf.take_i8() }
        }
        (Opcode::Thunderbolt, Direction::Response) => Body::Thunderbolt {
            entity_id: buf.take_i32_be(),
            unknown: buf.take_bool(),
            x: buf.take_i32_be(),
            y: buf.take_i32_be(),
            z: buf.take_i32_be(),
        },
        (Opcode::OpenWindow, Direction::Response) => Body::OpenWindow {
            window_id: buf.take_i8(),
            inventory_type: buf.take_i8(),
            title: buf.take_utf16be_string(),
            slot_count: buf.take_i8(),
        },
        (Opcode::CloseWindow, Direction::Request | Direction::Response) => {
            Body::CloseWindow { window_id: buf.take_i8() }
        }
        (Opcode::WindowClick, Direction::Request) => Body::WindowClick {
            window_id: buf.take_i8(),
            slot: buf.take_i16_be(),
            right_click: buf.take_bool(),
            action_number: buf.take_i16_be(),
            shift: buf.take_bool(),
            clicked_item: item_stack::ItemStack::parse(buf),
        },
        (Opcode::SetSlot, Direction::Response) => Body::SetSlot {
            window_id: buf.take_i8(),
            slot: buf.take_i16_be(),
            item: item_stack::ItemStack::parse(buf),
        },
        (Opcode::WindowItems, Direction::Response) => {
            let window_id = buf.take_i8();
            let count = buf.take_i16_be();
            let items = (0..count).map(|_| item_stack::ItemStack::parse(buf)).collect();
            Body::WindowItems { window_id, items }
        }
        (Opcode::UpdateProgressBar, Direction::Response) => Body::UpdateProgressBar {
            window_id: buf.take_i8(),
            progress_bar: buf.take_i16_be(),
            value: buf.take_i16_be(),
        },
        (Opcode::Transaction, Direction::Request | Direction::Response) => Body::Transaction {
            window_id: buf.take_i8(),
            action_number: buf.take_i16_be(),
            accepted: buf.take_bool(),
        },
        (Opcode::CreativeInventoryAction, Direction::Request | Direction::Response) => {
            Body::CreativeInventoryAction {
                slot: buf.take_i16_be(),
                item_id: buf.take_i16_be(),
                quantity: buf.take_i16_be(),
                damage: buf.take_i16_be(),
            }
        }
        (Opcode::UpdateSign, Direction::Request | Direction::Response) => Body::UpdateSign {
            x: buf.take_i32_be(),
            y: buf.take_i16_be(),
            z: buf.take_i32_be(),
            line1: buf.take_utf16be_string(),
            line2: buf.take_utf16be_string(),
            line3: buf.take_utf16be_string(),
            line4: buf.take_utf16be_string(),
        },
        (Opcode::ItemData, Direction::Response) => {
            let item_type = buf.take_i16_be();
            let item_id = buf.take_i16_be();
            let text_len = buf.take_u8();
            let text = buf.take_bytes_vec(text_len as usize);
            Body::ItemData { item_type, item_id, text }
        }
        (Opcode::IncrementStatistic, Direction::Request) => Body::IncrementStatistic {
            statistic_id: buf.take_i32_be(),
            amount: buf.take_i8(),
        },
        (Opcode::PlayerListItem, Direction::Response) => Body::PlayerListItem {
            player_name: buf.take_utf16be_string(),
            online: buf.take_bool(),
            ping: buf.take_i16_be(),
        },
        (Opcode::ListPing, Direction::Request) => Body::ListPing,
        (Opcode::Disconnect, Direction::Request | Direction::Response | Direction::Ping) => {
            Body::Disconnect { message: buf.take_utf16be_string() }
        }
        (opcode, direction) => {
            return Err(ProxyError::UnsupportedOpcodeForDirection { opcode: opcode.into(), direction })
        }
    };

    Ok(Packet::new(direction, opcode, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf_from(bytes: &[u8]) -> ByteBuffer {
        let mut b = ByteBuffer::new();
        b.append(bytes);
        b
    }

    #[test]
    fn s1_keep_alive_request() {
        let mut buf = buf_from(&[0x00, 0x00, 0x00, 0x00, 0x01]);
        let pkt = parse(&mut buf, Direction::Request).unwrap();
        assert_eq!(pkt.body, Body::KeepAlive { id: 1 });
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn s2_handshake_username() {
        let mut buf = buf_from(&[0x02, 0x00, 0x02, 0x00, 0x41, 0x00, 0x42]);
        let pkt = parse(&mut buf, Direction::Request).unwrap();
        assert_eq!(pkt.body, Body::Handshake { value: "AB".to_string() });
    }

    #[test]
    fn player_move_look_reorders_by_direction() {
        // x=1.0, y=2.0, stance=3.0, z=4.0, yaw=0, pitch=0, on_ground=true
        let mut req = ByteBuffer::new();
        req.append(&[0x0D]);
        req.append(&1f64.to_be_bytes());
        req.append(&2f64.to_be_bytes());
        req.append(&3f64.to_be_bytes());
        req.append(&4f64.to_be_bytes());
        req.append(&0f32.to_be_bytes());
        req.append(&0f32.to_be_bytes());
        req.append(&[1]);
        let pkt = parse(&mut req, Direction::Request).unwrap();
        assert_eq!(
            pkt.body,
            Body::PlayerMoveLook { x: 1.0, y: 2.0, stance: 3.0, z: 4.0, yaw: 0.0, pitch: 0.0, on_ground: true }
        );
    }

    #[test]
    fn spawn_object_reads_velocity_only_when_flag_positive() {
        let mut buf = ByteBuffer::new();
        buf.append(&[0x17]);
        buf.append(&1i32.to_be_bytes()); // entity_id
        buf.append(&[7]); // object_type
        buf.append(&0i32.to_be_bytes());
        buf.append(&0i32.to_be_bytes());
        buf.append(&0i32.to_be_bytes());
        buf.append(&5i32.to_be_bytes()); // flag > 0
        buf.append(&1i16.to_be_bytes());
        buf.append(&2i16.to_be_bytes());
        buf.append(&3i16.to_be_bytes());
        let pkt = parse(&mut buf, Direction::Response).unwrap();
        assert_eq!(
            pkt.body,
            Body::SpawnObject {
                entity_id: 1,
                object_type: 7,
                x: 0,
                y: 0,
                z: 0,
                throw_velocity: Some((1, 2, 3))
            }
        );
    }

    #[test]
    fn unsupported_direction_is_rejected() {
        // PlayerDigging is Request-only
        let mut buf = buf_from(&[0x0E, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let err = parse(&mut buf, Direction::Response).unwrap_err();
        assert!(matches!(err, ProxyError::UnsupportedOpcodeForDirection { .. }));
    }
}
