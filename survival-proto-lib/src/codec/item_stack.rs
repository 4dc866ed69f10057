use bytes::BufMut;

use crate::buffer::ByteBuffer;

/// `item_id = -1` means "empty slot" and suppresses the trailing `count`
/// and `uses` fields everywhere an item stack appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStack {
    Empty,
    Present { item_id: i16, count: i8, uses: i16 },
}

const EMPTY_SENTINEL: i16 = -1;

impl ItemStack {
    /// Number of additional bytes the prober must account for at the
    /// current offset, given the `item_id` short already peeked there.
    pub fn extra_len(item_id: i16) -> usize {
        if item_id == EMPTY_SENTINEL {
            0
        } else {
            3
        }
    }

    /// Precondition: caller has already confirmed the full stack is
    /// present via the prober.
    pub fn parse(buf: &mut ByteBuffer) -> ItemStack {
        let item_id = buf.take_i16_be();
        if item_id == EMPTY_SENTINEL {
            ItemStack::Empty
        } else {
            let count = buf.take_i8();
            let uses = buf.take_i16_be();
            ItemStack::Present { item_id, count, uses }
        }
    }

    pub fn serialize(&self, out: &mut bytes::BytesMut) {
        match self {
            ItemStack::Empty => out.put_i16(EMPTY_SENTINEL),
            ItemStack::Present { item_id, count, uses } => {
                out.put_i16(*item_id);
                out.put_i8(*count);
                out.put_i16(*uses);
            }
        }
    }
}

/// The "pickup spawn" item shape: always present, no empty-slot sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupItem {
    pub item_id: i16,
    pub count: i8,
    pub damage: i16,
}

impl PickupItem {
    pub fn parse(buf: &mut ByteBuffer) -> PickupItem {
        PickupItem { item_id: buf.take_i16_be(), count: buf.take_i8(), damage: buf.take_i16_be() }
    }

    pub fn serialize(&self, out: &mut bytes::BytesMut) {
        out.put_i16(self.item_id);
        out.put_i8(self.count);
        out.put_i16(self.damage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sentinel_round_trips_to_two_bytes() {
        let mut out = bytes::BytesMut::new();
        ItemStack::Empty.serialize(&mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(&out[..], &[0xFF, 0xFF]);
    }

    #[test]
    fn present_stack_round_trips_to_five_bytes() {
        let stack = ItemStack::Present { item_id: 1, count: 1, uses: 0 };
        let mut out = bytes::BytesMut::new();
        stack.serialize(&mut out);
        assert_eq!(out.len(), 5);

        let mut buf = ByteBuffer::new();
        buf.append(&out);
        assert_eq!(ItemStack::parse(&mut buf), stack);
    }

    #[test]
    fn extra_len_matches_sentinel_rule() {
        assert_eq!(ItemStack::extra_len(-1), 0);
        assert_eq!(ItemStack::extra_len(0), 3);
        assert_eq!(ItemStack::extra_len(256), 3);
    }
}
