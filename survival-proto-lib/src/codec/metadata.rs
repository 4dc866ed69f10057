use bytes::BufMut;

use crate::buffer::ByteBuffer;
use crate::codec::string;
use crate::error::{ProxyError, Result};

pub const TERMINATOR: u8 = 0x7F;

#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Float(f32),
    String(String),
    ItemStackTriple(i16, i8, i16),
    PositionTriple(i32, i32, i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataEntry {
    pub key: u8,
    pub value: MetadataValue,
}

pub type Metadata = Vec<MetadataEntry>;

/// Tag byte's high 3 bits, which select the value's wire shape. Any other
/// value is `Malformed`.
fn type_code(tag: u8) -> u8 {
    tag >> 5
}

fn key_bits(tag: u8) -> u8 {
    tag & 0x1F
}

/// Precondition: the caller already confirmed (via the prober) that a
/// complete, `TERMINATOR`-closed stream is present.
pub fn parse(buf: &mut ByteBuffer) -> Result<Metadata> {
    let mut entries = Vec::new();
    loop {
        let tag = buf.take_u8();
        if tag == TERMINATOR {
            return Ok(entries);
        }
        let key = key_bits(tag);
        let value = match type_code(tag) {
            0 => MetadataValue::Byte(buf.take_i8()),
            1 => MetadataValue::Short(buf.take_i16_be()),
            2 => MetadataValue::Int(buf.take_i32_be()),
            3 => MetadataValue::Float(buf.take_f32_be()),
            4 => MetadataValue::String(buf.take_utf16be_string()),
            5 => MetadataValue::ItemStackTriple(buf.take_i16_be(), buf.take_i8(), buf.take_i16_be()),
            6 => MetadataValue::PositionTriple(buf.take_i32_be(), buf.take_i32_be(), buf.take_i32_be()),
            other => {
                return Err(ProxyError::Malformed(format!("unknown metadata type tag {other}")))
            }
        };
        entries.push(MetadataEntry { key, value });
    }
}

pub fn serialize(metadata: &Metadata, out: &mut bytes::BytesMut) {
    for entry in metadata {
        let (type_bits, _) = match &entry.value {
            MetadataValue::Byte(_) => (0u8, ()),
            MetadataValue::Short(_) => (1u8, ()),
            MetadataValue::Int(_) => (2u8, ()),
            MetadataValue::Float(_) => (3u8, ()),
            MetadataValue::String(_) => (4u8, ()),
            MetadataValue::ItemStackTriple(..) => (5u8, ()),
            MetadataValue::PositionTriple(..) => (6u8, ()),
        };
        out.put_u8((type_bits << 5) | (entry.key & 0x1F));
        match &entry.value {
            MetadataValue::Byte(v) => out.put_i8(*v),
            MetadataValue::Short(v) => out.put_i16(*v),
            MetadataValue::Int(v) => out.put_i32(*v),
            MetadataValue::Float(v) => out.put_f32(*v),
            MetadataValue::String(v) => string::encode_utf16be(v, out),
            MetadataValue::ItemStackTriple(a, b, c) => {
                out.put_i16(*a);
                out.put_i8(*b);
                out.put_i16(*c);
            }
            MetadataValue::PositionTriple(a, b, c) => {
                out.put_i32(*a);
                out.put_i32(*b);
                out.put_i32(*c);
            }
        }
    }
    out.put_u8(TERMINATOR);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_mixed_entries() {
        let metadata = vec![
            MetadataEntry { key: 0, value: MetadataValue::Byte(5) },
            MetadataEntry { key: 1, value: MetadataValue::String("hi".to_string()) },
        ];
        let mut out = bytes::BytesMut::new();
        serialize(&metadata, &mut out);

        let mut buf = ByteBuffer::new();
        buf.append(&out);
        assert_eq!(parse(&mut buf).unwrap(), metadata);
    }

    #[test]
    fn unknown_type_tag_is_malformed() {
        let mut buf = ByteBuffer::new();
        // type_code = 0b111 = 7, never assigned
        buf.append(&[0xE0, TERMINATOR]);
        assert!(parse(&mut buf).is_err());
    }

    #[test]
    fn empty_stream_is_just_terminator() {
        let mut buf = ByteBuffer::new();
        buf.append(&[TERMINATOR]);
        assert_eq!(parse(&mut buf).unwrap(), Vec::new());
    }
}
