//! Thin AMF3 passthrough layer (§4.5).
//!
//! AMF0 reserves marker 0x11 to hand a value off to AMF3 entirely — a
//! different, denser wire format with its own marker table, string/object
//! reference tables, and traits mechanism. Building out a full AMF3 type
//! system is explicitly out of scope for this crate (§1); what lives here is
//! the seam a full implementation would plug into, sharing the same
//! [`crate::utils::ByteStream`], [`crate::value::Value`], and
//! [`crate::registry::ClassRegistry`] the AMF0 side uses.
//!
//! For now, an AMF3 value is captured as the opaque remainder of the stream
//! ([`Value::SwitchAmf3`]) rather than decoded into its own variants. A
//! caller that needs real AMF3 support should decode `SwitchAmf3`'s payload
//! with a dedicated AMF3 parser built against these same abstractions.
//!
//! Because [`read_element`] has no length prefix of its own to bound itself
//! with — it consumes whatever is left of the stream — a `SwitchAmf3` value
//! is only meaningful as the sole top-level value of an encode/decode
//! session. [`crate::amf0::Encoder`] refuses to write one nested inside an
//! Object/Array/MixedArray/TypedObject body, and [`crate::amf0::Parser`]
//! refuses to read one there, rather than silently swallowing whatever bytes
//! follow it.

use crate::error::Result;
use crate::utils::ByteStream;
use crate::value::Value;

/// AMF3 marker bytes, listed for documentation — this layer doesn't dispatch
/// on them, since it treats the whole payload as opaque.
pub mod markers {
    pub const UNDEFINED: u8 = 0x00;
    pub const NULL: u8 = 0x01;
    pub const FALSE: u8 = 0x02;
    pub const TRUE: u8 = 0x03;
    pub const INTEGER: u8 = 0x04;
    pub const DOUBLE: u8 = 0x05;
    pub const STRING: u8 = 0x06;
    pub const XML_DOC: u8 = 0x07;
    pub const DATE: u8 = 0x08;
    pub const ARRAY: u8 = 0x09;
    pub const OBJECT: u8 = 0x0a;
    pub const XML: u8 = 0x0b;
    pub const BYTE_ARRAY: u8 = 0x0c;
}

/// Called by the AMF0 parser after it has already consumed the 0x11 marker.
/// Reads whatever remains of the stream as an opaque AMF3 payload.
pub fn read_element(stream: &mut ByteStream) -> Result<Value> {
    let remaining = stream.remaining();
    let bytes = stream.read_bytes(remaining)?;
    Ok(Value::SwitchAmf3(bytes))
}

/// Mirror of [`read_element`] for the encoder: writes the 0x11 marker
/// followed by the opaque bytes verbatim, so a value captured by
/// `read_element` round-trips byte-for-byte.
pub fn write_opaque(stream: &mut ByteStream, bytes: &[u8]) -> Result<()> {
    stream.write_u8(crate::amf0::markers::AVMPLUS_OBJECT)?;
    stream.write_bytes(bytes)
}
