use bytes::{Buf, BufMut, BytesMut};

use crate::codec::string;

/// Append-only write side, consume-from-front read side, peek by absolute
/// offset. All multi-byte numerics are big-endian.
///
/// `take_*` methods assume the caller has already verified enough bytes are
/// present (normally via a prior `probe`); they panic on underrun rather
/// than silently corrupting the stream, the same contract `bytes::Buf`
/// itself gives.
#[derive(Debug, Default)]
pub struct ByteBuffer {
    inner: BytesMut,
}

impl ByteBuffer {
    pub fn new() -> Self {
        ByteBuffer { inner: BytesMut::new() }
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.inner.put_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// View `n` bytes starting at absolute offset `offset` without
    /// consuming. Returns `None` if that range runs past `len()`.
    pub fn peek_at(&self, offset: usize, n: usize) -> Option<&[u8]> {
        let end = offset.checked_add(n)?;
        if end > self.inner.len() {
            None
        } else {
            Some(&self.inner[offset..end])
        }
    }

    pub fn peek_u8(&self, offset: usize) -> Option<u8> {
        self.peek_at(offset, 1).map(|s| s[0])
    }

    pub fn peek_i16_be(&self, offset: usize) -> Option<i16> {
        self.peek_at(offset, 2).map(|s| i16::from_be_bytes([s[0], s[1]]))
    }

    pub fn peek_u16_be(&self, offset: usize) -> Option<u16> {
        self.peek_at(offset, 2).map(|s| u16::from_be_bytes([s[0], s[1]]))
    }

    pub fn peek_i32_be(&self, offset: usize) -> Option<i32> {
        self.peek_at(offset, 4).map(|s| i32::from_be_bytes([s[0], s[1], s[2], s[3]]))
    }

    /// Consume and discard `n` leading bytes. Caller must ensure `len() >= n`.
    pub fn take(&mut self, n: usize) -> BytesMut {
        self.inner.split_to(n)
    }

    pub fn take_u8(&mut self) -> u8 {
        self.inner.get_u8()
    }

    pub fn take_i8(&mut self) -> i8 {
        self.inner.get_i8()
    }

    pub fn take_bool(&mut self) -> bool {
        self.inner.get_u8() != 0
    }

    pub fn take_i16_be(&mut self) -> i16 {
        self.inner.get_i16()
    }

    pub fn take_u16_be(&mut self) -> u16 {
        self.inner.get_u16()
    }

    pub fn take_i32_be(&mut self) -> i32 {
        self.inner.get_i32()
    }

    pub fn take_i64_be(&mut self) -> i64 {
        self.inner.get_i64()
    }

    pub fn take_f32_be(&mut self) -> f32 {
        self.inner.get_f32()
    }

    pub fn take_f64_be(&mut self) -> f64 {
        self.inner.get_f64()
    }

    /// Reads a `u16` length `k`, then `2k` bytes decoded as UTF-16BE.
    pub fn take_utf16be_string(&mut self) -> String {
        let units = self.take_u16_be() as usize;
        let raw = self.take(units * 2);
        string::decode_utf16be(&raw)
    }

    pub fn take_bytes_vec(&mut self, n: usize) -> Vec<u8> {
        self.take(n).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_consume() {
        let mut buf = ByteBuffer::new();
        buf.append(&[1, 2, 3, 4]);
        assert_eq!(buf.peek_u8(0), Some(1));
        assert_eq!(buf.peek_u8(0), Some(1));
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn peek_out_of_range_is_none() {
        let mut buf = ByteBuffer::new();
        buf.append(&[1, 2]);
        assert_eq!(buf.peek_at(1, 2), None);
        assert_eq!(buf.peek_at(2, 1), None);
    }

    #[test]
    fn take_consumes_from_front() {
        let mut buf = ByteBuffer::new();
        buf.append(&[0, 0, 0, 7]);
        assert_eq!(buf.take_i32_be(), 7);
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn take_utf16be_round_trips_ascii() {
        let mut buf = ByteBuffer::new();
        // "AB" -> length=2, then 0x00,0x41, 0x00,0x42
        buf.append(&[0x00, 0x02, 0x00, 0x41, 0x00, 0x42]);
        assert_eq!(buf.take_utf16be_string(), "AB");
    }
}
