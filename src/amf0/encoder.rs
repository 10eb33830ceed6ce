use std::collections::HashMap;

use crate::amf0::markers;
use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::registry::ClassRegistry;
use crate::utils::ByteStream;
use crate::value::{ObjectRef, Value};

/// Translates host [`Value`]s into a well-formed AMF0 byte stream.
///
/// An `Encoder` owns exactly one output [`ByteStream`] and one reference
/// table, both created with it and both scoped to a single top-level encode
/// session (§4.3). Reuse an encoder across independent top-level values only
/// if you want their reference tables to share slots — most callers want a
/// fresh `Encoder` per [`Self::write_element`] call, which is what
/// [`crate::encode`] does.
pub struct Encoder {
    output: ByteStream,
    references: HashMap<usize, u16>,
    next_slot: u32,
    registry: ClassRegistry,
    config: CodecConfig,
    /// How many container bodies (Object/Array/MixedArray/TypedObject) are
    /// currently being written. `write_element` refuses a `SwitchAmf3` value
    /// at any depth greater than zero — see the comment on that match arm.
    depth: u32,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder::with_registry_and_config(ClassRegistry::new(), CodecConfig::default())
    }

    pub fn with_registry(registry: ClassRegistry) -> Self {
        Encoder::with_registry_and_config(registry, CodecConfig::default())
    }

    pub fn with_registry_and_config(registry: ClassRegistry, config: CodecConfig) -> Self {
        Encoder {
            output: ByteStream::with_capacity(256),
            references: HashMap::new(),
            next_slot: 0,
            registry,
            config,
            depth: 0,
        }
    }

    /// Emit the complete marker-prefixed encoding of one top-level value;
    /// nested values are emitted inline as part of the same call.
    pub fn write_element(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Number(n) => self.write_number(*n),
            Value::Boolean(b) => self.write_boolean(*b),
            Value::String(s) => self.write_string(s),
            Value::Object(obj) => self.write_referenceable(value, markers::OBJECT, |enc| enc.write_object_body(obj)),
            Value::MovieClip => self.output.write_u8(markers::MOVIE_CLIP),
            Value::Null => self.output.write_u8(markers::NULL),
            Value::Undefined => self.output.write_u8(markers::UNDEFINED),
            Value::MixedArray(obj) => {
                self.write_referenceable(value, markers::MIXED_ARRAY, |enc| {
                    let len = obj.borrow().len() as u32;
                    enc.output.write_u32(len)?;
                    enc.write_object_body(obj)
                })
            }
            Value::Array(arr) => self.write_referenceable(value, markers::STRICT_ARRAY, |enc| {
                let items = arr.borrow().clone();
                enc.output.write_u32(items.len() as u32)?;
                for item in &items {
                    enc.write_nested_element(item)?;
                }
                Ok(())
            }),
            Value::Date { millis, tz_offset_min } => self.write_date(*millis, *tz_offset_min),
            Value::LongString(s) => self.write_long_string(s),
            Value::Unsupported => self.output.write_u8(markers::UNSUPPORTED),
            Value::RecordSet => self.output.write_u8(markers::RECORDSET),
            Value::Xml(doc) => self.write_xml(doc),
            Value::TypedObject(alias, obj) => {
                self.write_referenceable(value, markers::TYPED_OBJECT, |enc| enc.write_typed_object_body(alias, obj))
            }
            // `amf3::read_element` recovers an AMF3 payload by consuming
            // whatever is left of the *entire* stream — it has no length
            // prefix of its own, because a real AMF0 stream hands the rest
            // of the connection over to an AMF3 parser rather than bounding
            // it. That's only safe when the SwitchAmf3 value is the sole
            // top-level value being written; nested inside an Object/Array/
            // MixedArray/TypedObject body, it would swallow every sibling
            // and terminator written after it. Reject that case at encode
            // time rather than producing bytes nothing can parse back.
            Value::SwitchAmf3(bytes) => {
                if self.depth > 0 {
                    return Err(Error::unrepresentable(
                        "Value::SwitchAmf3 can only be encoded as a top-level value, not nested inside a container",
                    ));
                }
                crate::amf3::write_opaque(&mut self.output, bytes)
            }
        }
    }

    /// Writes `value` as an element nested inside a container body, tracking
    /// nesting depth so [`Self::write_element`] can refuse a nested
    /// `SwitchAmf3`.
    fn write_nested_element(&mut self, value: &Value) -> Result<()> {
        self.depth += 1;
        let result = self.write_element(value);
        self.depth -= 1;
        result
    }

    fn write_number(&mut self, value: f64) -> Result<()> {
        self.output.write_u8(markers::NUMBER)?;
        self.output.write_double(value)?;
        Ok(())
    }

    fn write_boolean(&mut self, value: bool) -> Result<()> {
        self.output.write_u8(markers::BOOLEAN)?;
        self.output.write_u8(if value { 1 } else { 0 })?;
        Ok(())
    }

    /// Strings under 2^16 bytes use the short form; §3's invariant that
    /// longer strings become `LongString` is enforced by callers building a
    /// `Value` (`Value::string` never promotes a `String` automatically —
    /// that choice belongs to whoever constructs the value), so this just
    /// writes the marker the `Value` already picked.
    fn write_string(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        if bytes.len() >= 1 << 16 {
            return Err(Error::unrepresentable(format!(
                "String of {} bytes must be encoded as Value::LongString",
                bytes.len()
            )));
        }
        self.output.write_u8(markers::STRING)?;
        self.output.write_u16(bytes.len() as u16)?;
        self.output.write_bytes(bytes)?;
        Ok(())
    }

    fn write_long_string(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        self.output.write_u8(markers::LONG_STRING)?;
        self.output.write_u32(bytes.len() as u32)?;
        self.output.write_bytes(bytes)?;
        Ok(())
    }

    /// Writes a 16-bit-length-prefixed string with no leading type marker —
    /// the form object keys use, distinct from `write_string`'s full
    /// `Value::String` encoding.
    fn write_key(&mut self, key: &str) -> Result<()> {
        let bytes = key.as_bytes();
        self.output.write_u16(bytes.len() as u16)?;
        self.output.write_bytes(bytes)?;
        Ok(())
    }

    fn write_object_body(&mut self, obj: &ObjectRef) -> Result<()> {
        let entries = obj.borrow().iter().cloned().collect::<Vec<_>>();
        for (key, value) in &entries {
            self.write_key(key)?;
            self.write_nested_element(value)?;
        }
        self.output.write_u16(0)?;
        self.output.write_u8(markers::OBJECT_TERM)?;
        Ok(())
    }

    fn write_typed_object_body(&mut self, alias: &str, obj: &ObjectRef) -> Result<()> {
        let descriptor = self.registry.lookup_by_alias(alias);
        self.write_key(alias)?;

        if let Some(hooks) = descriptor.as_ref().and_then(|d| d.hooks.as_ref()) {
            return (hooks.write_external)(obj, &mut self.output);
        }

        self.write_object_body(obj)
    }

    fn write_date(&mut self, millis: f64, tz_offset_min: i16) -> Result<()> {
        self.output.write_u8(markers::DATE)?;
        self.output.write_double(millis)?;
        self.output.write_i16(tz_offset_min)?;
        Ok(())
    }

    fn write_xml(&mut self, doc: &str) -> Result<()> {
        let bytes = doc.as_bytes();
        self.output.write_u8(markers::XML_DOCUMENT)?;
        self.output.write_u32(bytes.len() as u32)?;
        self.output.write_bytes(bytes)?;
        Ok(())
    }

    /// Checks the reference table by identity before emitting a compound
    /// value's body (§4.3). On a hit, emits `Reference` and returns without
    /// calling `write_body`; on a miss, allocates the next slot and emits
    /// the marker plus body via `write_body`.
    fn write_referenceable(
        &mut self,
        value: &Value,
        marker: u8,
        write_body: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        let identity = value.identity().expect("write_referenceable called with a scalar Value");

        if let Some(&slot) = self.references.get(&identity) {
            self.output.write_u8(markers::REFERENCE)?;
            self.output.write_u16(slot)?;
            return Ok(());
        }

        if self.next_slot > self.config.max_references as u32 {
            log::warn!("reference table exhausted after {} slots", self.next_slot);
            return Err(Error::OutOfReferenceSlots);
        }

        let slot = self.next_slot as u16;
        if slot != 0 && slot % 4096 == 0 {
            log::trace!("encoder reference table has grown to {slot} slots");
        }
        self.references.insert(identity, slot);
        self.next_slot += 1;

        self.output.write_u8(marker)?;
        write_body(self)
    }

    /// The bytes written so far, without consuming the encoder.
    pub fn bytes(&self) -> Vec<u8> {
        self.output.getvalue()
    }

    /// Consume the encoder and take its output buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.output.getvalue()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}
