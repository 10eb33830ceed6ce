//! AMF0 marker bytes, one per [`crate::Value`] variant on the wire (§3/§6).

pub const NUMBER: u8 = 0x00;
pub const BOOLEAN: u8 = 0x01;
pub const STRING: u8 = 0x02;
pub const OBJECT: u8 = 0x03;
pub const MOVIE_CLIP: u8 = 0x04;
pub const NULL: u8 = 0x05;
pub const UNDEFINED: u8 = 0x06;
pub const REFERENCE: u8 = 0x07;
pub const MIXED_ARRAY: u8 = 0x08;
pub const OBJECT_TERM: u8 = 0x09;
pub const STRICT_ARRAY: u8 = 0x0a;
pub const DATE: u8 = 0x0b;
pub const LONG_STRING: u8 = 0x0c;
pub const UNSUPPORTED: u8 = 0x0d;
pub const RECORDSET: u8 = 0x0e;
pub const XML_DOCUMENT: u8 = 0x0f;
pub const TYPED_OBJECT: u8 = 0x10;
pub const AVMPLUS_OBJECT: u8 = 0x11;

/// Every marker AMF0 itself defines, in wire order. Used by `read_type` to
/// validate a peeked byte without having to enumerate a match arm twice.
pub const ALL: &[u8] = &[
    NUMBER, BOOLEAN, STRING, OBJECT, MOVIE_CLIP, NULL, UNDEFINED, REFERENCE, MIXED_ARRAY,
    OBJECT_TERM, STRICT_ARRAY, DATE, LONG_STRING, UNSUPPORTED, RECORDSET, XML_DOCUMENT,
    TYPED_OBJECT, AVMPLUS_OBJECT,
];

pub fn is_known(marker: u8) -> bool {
    ALL.contains(&marker)
}
