use crate::buffer::ByteBuffer;
use crate::codec::metadata;
use crate::codec::item_stack::ItemStack;
use crate::packet::Opcode;

/// Outcome of probing the leading packet in a buffer, without consuming
/// anything. `Complete(n)` is the total byte length of that packet,
/// opcode byte included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    Complete(usize),
    NeedMore,
    Malformed,
}

/// `base` is the fixed-size portion after the opcode byte for opcodes with
/// no variable content; returns the outcome directly.
fn fixed(buf: &ByteBuffer, base: usize) -> ProbeResult {
    complete_if_present(buf, 1 + base)
}

fn complete_if_present(buf: &ByteBuffer, total: usize) -> ProbeResult {
    if buf.len() >= total {
        ProbeResult::Complete(total)
    } else {
        ProbeResult::NeedMore
    }
}

/// Peeks a big-endian `u16` string length at `offset` and returns the
/// string's total wire size (`2 + 2k`), or `None` if the length prefix
/// itself isn't fully buffered yet.
fn string_extent(buf: &ByteBuffer, offset: usize) -> Option<usize> {
    buf.peek_u16_be(offset).map(|k| 2 + 2 * (k as usize))
}

/// Walks an entity-metadata stream starting at `start` (absolute offset,
/// opcode byte included in that offset space). Returns the number of
/// bytes the stream occupies, terminator included.
fn metadata_extent(buf: &ByteBuffer, start: usize) -> ProbeResult {
    let mut variable = 0usize;
    loop {
        let tag = match buf.peek_u8(start + variable) {
            Some(b) => b,
            None => return ProbeResult::NeedMore,
        };
        if tag == metadata::TERMINATOR {
            return ProbeResult::Complete(variable + 1);
        }
        let entry_payload = match tag >> 5 {
            0 => 1,
            1 => 2,
            2 => 4,
            3 => 4,
            4 => match string_extent(buf, start + variable + 1) {
                Some(n) => n,
                None => return ProbeResult::NeedMore,
            },
            5 => 5,
            6 => 12,
            _ => return ProbeResult::Malformed,
        };
        variable += 1 + entry_payload;
    }
}

/// Probe the leading packet in `buf`. Pure: calling this twice on an
/// unmodified buffer returns the same result, and it never consumes.
pub fn probe(buf: &ByteBuffer) -> ProbeResult {
    let opcode_byte = match buf.peek_u8(0) {
        Some(b) => b,
        None => return ProbeResult::NeedMore,
    };

    let opcode = match Opcode::try_from(opcode_byte) {
        Ok(op) => op,
        Err(_) => return ProbeResult::Malformed,
    };

    match opcode {
        Opcode::KeepAlive => fixed(buf, 4),
        Opcode::Login => match string_extent(buf, 5) {
            Some(s) => complete_if_present(buf, 1 + 4 + s + 16),
            None => ProbeResult::NeedMore,
        },
        Opcode::Handshake | Opcode::Chat => match string_extent(buf, 1) {
            Some(s) => complete_if_present(buf, 1 + s),
            None => ProbeResult::NeedMore,
        },
        Opcode::TimeUpdate => fixed(buf, 8),
        Opcode::EntityEquipment => fixed(buf, 10),
        Opcode::SpawnPosition => fixed(buf, 12),
        Opcode::UseEntity => fixed(buf, 9),
        Opcode::UpdateHealth => fixed(buf, 8),
        Opcode::Respawn => fixed(buf, 13),
        Opcode::OnGround => fixed(buf, 1),
        Opcode::PlayerPosition => fixed(buf, 33),
        Opcode::PlayerLook => fixed(buf, 9),
        Opcode::PlayerMoveLook => fixed(buf, 41),
        Opcode::PlayerDigging => fixed(buf, 11),
        Opcode::BlockPlacement => {
            // after opcode: i32,i8,i32,i8 = 10 bytes, then item_id:i16
            let item_offset = 1 + 10;
            match buf.peek_i16_be(item_offset) {
                Some(id) => complete_if_present(buf, 1 + 10 + 2 + ItemStack::extra_len(id)),
                None => ProbeResult::NeedMore,
            }
        }
        Opcode::HoldChange => fixed(buf, 2),
        Opcode::Animation => fixed(buf, 5),
        Opcode::EntityAction => fixed(buf, 5),
        Opcode::NamedEntitySpawn => match string_extent(buf, 5) {
            Some(s) => complete_if_present(buf, 1 + 4 + s + 12 + 1 + 1 + 2),
            None => ProbeResult::NeedMore,
        },
        Opcode::PickupSpawn => fixed(buf, 24),
        Opcode::CollectItem => fixed(buf, 8),
        Opcode::SpawnObject => {
            // i32,i8,3xi32 = 17, then i32 flag
            let flag_offset = 1 + 17;
            match buf.peek_i32_be(flag_offset) {
                Some(flag) => {
                    let extra = if flag > 0 { 6 } else { 0 };
                    complete_if_present(buf, 1 + 17 + 4 + extra)
                }
                None => ProbeResult::NeedMore,
            }
        }
        Opcode::SpawnMob => metadata_extent(buf, 1 + 19).map_complete(|n| 19 + n, buf),
        Opcode::Painting => match string_extent(buf, 5) {
            Some(s) => complete_if_present(buf, 1 + 4 + s + 12 + 4),
            None => ProbeResult::NeedMore,
        },
        Opcode::ExperienceOrb => fixed(buf, 18),
        Opcode::EntityVelocity => fixed(buf, 10),
        Opcode::EntityDestroy => fixed(buf, 4),
        Opcode::EntityCreate => fixed(buf, 4),
        Opcode::EntityRelativeMove => fixed(buf, 7),
        Opcode::EntityLook => fixed(buf, 6),
        Opcode::EntityLookMove => fixed(buf, 9),
        Opcode::EntityTeleport => fixed(buf, 18),
        Opcode::EntityStatus => fixed(buf, 5),
        Opcode::EntityAttach => fixed(buf, 8),
        Opcode::EntityMetadata => metadata_extent(buf, 1 + 4).map_complete(|n| 4 + n, buf),
        Opcode::EntityEffect => fixed(buf, 8),
        Opcode::RemoveEntityEffect => fixed(buf, 5),
        Opcode::Experience => fixed(buf, 4),
        Opcode::PreChunk => fixed(buf, 9),
        Opcode::MapChunk => {
            let len_offset = 1 + 4 + 2 + 4 + 3;
            match buf.peek_i32_be(len_offset) {
                Some(length) if length >= 0 => {
                    complete_if_present(buf, 1 + 17 + length as usize)
                }
                Some(_) => ProbeResult::Malformed,
                None => ProbeResult::NeedMore,
            }
        }
        Opcode::MultiBlockChange => {
            let count_offset = 1 + 4 + 4;
            match buf.peek_u16_be(count_offset) {
                Some(count) => complete_if_present(buf, 1 + 10 + count as usize * 4),
                None => ProbeResult::NeedMore,
            }
        }
        Opcode::BlockChange => fixed(buf, 11),
        Opcode::BlockAction => fixed(buf, 12),
        Opcode::Explosion => {
            let count_offset = 1 + 24 + 4;
            match buf.peek_i32_be(count_offset) {
                Some(count) if count >= 0 => {
                    complete_if_present(buf, 1 + 32 + count as usize * 3)
                }
                Some(_) => ProbeResult::Malformed,
                None => ProbeResult::NeedMore,
            }
        }
        Opcode::SoundEffect => fixed(buf, 17),
        Opcode::State => fixed(buf, 2),
        Opcode::Thunderbolt => fixed(buf, 17),
        Opcode::OpenWindow => match string_extent(buf, 3) {
            Some(s) => complete_if_present(buf, 1 + 2 + s + 1),
            None => ProbeResult::NeedMore,
        },
        Opcode::CloseWindow => fixed(buf, 1),
        Opcode::WindowClick => {
            let item_offset = 1 + 7;
            match buf.peek_i16_be(item_offset) {
                Some(id) => complete_if_present(buf, 1 + 7 + 2 + ItemStack::extra_len(id)),
                None => ProbeResult::NeedMore,
            }
        }
        Opcode::SetSlot => {
            let item_offset = 1 + 3;
            match buf.peek_i16_be(item_offset) {
                Some(id) => complete_if_present(buf, 1 + 3 + 2 + ItemStack::extra_len(id)),
                None => ProbeResult::NeedMore,
            }
        }
        Opcode::WindowItems => probe_window_items(buf),
        Opcode::UpdateProgressBar => fixed(buf, 5),
        Opcode::Transaction => fixed(buf, 4),
        Opcode::CreativeInventoryAction => fixed(buf, 8),
        Opcode::UpdateSign => probe_update_sign(buf),
        Opcode::ItemData => {
            let len_offset = 1 + 4;
            match buf.peek_u8(len_offset) {
                Some(text_len) => complete_if_present(buf, 1 + 4 + 1 + text_len as usize),
                None => ProbeResult::NeedMore,
            }
        }
        Opcode::IncrementStatistic => fixed(buf, 5),
        Opcode::PlayerListItem => match string_extent(buf, 1) {
            Some(s) => complete_if_present(buf, 1 + s + 1 + 2),
            None => ProbeResult::NeedMore,
        },
        Opcode::ListPing => fixed(buf, 0),
        Opcode::Disconnect => match string_extent(buf, 1) {
            Some(s) => complete_if_present(buf, 1 + s),
            None => ProbeResult::NeedMore,
        },
    }
}

fn probe_window_items(buf: &ByteBuffer) -> ProbeResult {
    // window_id:i8, count:i16 are fixed; base excluding the array is 3.
    let count = match buf.peek_u16_be(1 + 1) {
        Some(c) => c,
        None => return ProbeResult::NeedMore,
    };
    let entries_offset = 1 + 3;
    let mut variable = 0usize;
    for _ in 0..count {
        let id = match buf.peek_i16_be(entries_offset + variable) {
            Some(id) => id,
            None => return ProbeResult::NeedMore,
        };
        variable += 2 + ItemStack::extra_len(id);
    }
    complete_if_present(buf, entries_offset + variable)
}

fn probe_update_sign(buf: &ByteBuffer) -> ProbeResult {
    // (x:i32, y:i16, z:i32) = 10 fixed, then 4 sequential strings.
    let mut offset = 1 + 10;
    for _ in 0..4 {
        match string_extent(buf, offset) {
            Some(extent) => offset += extent,
            None => return ProbeResult::NeedMore,
        }
    }
    complete_if_present(buf, offset)
}

impl ProbeResult {
    /// Remaps a metadata-stream-relative `Complete(n)` into a
    /// whole-packet `Complete`, given the fixed prefix length before the
    /// stream started. Leaves `NeedMore`/`Malformed` untouched.
    fn map_complete(self, to_total: impl FnOnce(usize) -> usize, buf: &ByteBuffer) -> ProbeResult {
        match self {
            ProbeResult::Complete(stream_len) => complete_if_present(buf, 1 + to_total(stream_len)),
            other => other,
        }
    }
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
    fn s1_keep_alive() {
        let buf = buf_from(&[0x00, 0x00, 0x00, 0x00, 0x01]);
        assert_eq!(probe(&buf), ProbeResult::Complete(5));
    }

    #[test]
    fn s2_handshake() {
        let buf = buf_from(&[0x02, 0x00, 0x02, 0x00, 0x41, 0x00, 0x42]);
        assert_eq!(probe(&buf), ProbeResult::Complete(7));
    }

    #[test]
    fn s3_block_placement_empty_hand() {
        let buf = buf_from(&[
            0x0F, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF,
        ]);
        assert_eq!(probe(&buf), ProbeResult::Complete(13));
    }

    #[test]
    fn s4_block_placement_stone_in_hand() {
        let buf = buf_from(&[
            0x0F, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
            0x00, 0x00,
        ]);
        assert_eq!(probe(&buf), ProbeResult::Complete(16));
    }

    #[test]
    fn s5_list_ping_alone() {
        let buf = buf_from(&[0xFE]);
        assert_eq!(probe(&buf), ProbeResult::Complete(1));
    }

    #[test]
    fn s6_partial_then_complete_chat() {
        let mut buf = buf_from(&[0x03, 0x00, 0x05, 0x00, 0x48]);
        assert_eq!(probe(&buf), ProbeResult::NeedMore);
        buf.append(&[0x00, 0x45, 0x00, 0x4C, 0x00, 0x4C, 0x00, 0x4F]);
        assert_eq!(probe(&buf), ProbeResult::Complete(13));
    }

    #[test]
    fn s7_malformed_entity_metadata() {
        let buf = buf_from(&[0x28, 0x00, 0x00, 0x00, 0x01, 0xE0, 0x7F]);
        assert_eq!(probe(&buf), ProbeResult::Malformed);
    }

    #[test]
    fn unknown_opcode_is_malformed() {
        let buf = buf_from(&[0x11]);
        assert_eq!(probe(&buf), ProbeResult::Malformed);
    }

    #[test]
    fn purity_does_not_consume() {
        let buf = buf_from(&[0x00, 0x00, 0x00, 0x00, 0x01]);
        assert_eq!(probe(&buf), probe(&buf));
        assert_eq!(buf.len(), 5);
    }
}
