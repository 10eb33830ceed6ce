use crate::amf0::markers;
use crate::amf3;
use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::registry::ClassRegistry;
use crate::utils::ByteStream;
use crate::value::{new_array_ref, new_object_ref, ObjectRef, Value};

/// Reconstructs host [`Value`]s from an AMF0 byte stream.
///
/// A `Parser` borrows the input [`ByteStream`] and owns one reference table
/// for the duration of a top-level read (§4.4). The table grows as compound
/// values are encountered and is discarded with the parser.
pub struct Parser<'a> {
    input: &'a mut ByteStream,
    references: Vec<Value>,
    registry: ClassRegistry,
    config: CodecConfig,
    /// How many container bodies (Object/Array/MixedArray/TypedObject) are
    /// currently being read. Mirrors the encoder's `depth` field: the AMF3
    /// switch marker is only meaningful when it is the sole top-level value,
    /// since its body has no length prefix of its own (see `amf3::read_element`).
    depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a mut ByteStream) -> Self {
        Parser::with_registry_and_config(input, ClassRegistry::new(), CodecConfig::default())
    }

    pub fn with_registry(input: &'a mut ByteStream, registry: ClassRegistry) -> Self {
        Parser::with_registry_and_config(input, registry, CodecConfig::default())
    }

    pub fn with_registry_and_config(
        input: &'a mut ByteStream,
        registry: ClassRegistry,
        config: CodecConfig,
    ) -> Self {
        Parser { input, references: Vec::new(), registry, config, depth: 0 }
    }

    pub fn has_remaining(&self) -> bool {
        self.input.remaining() > 0
    }

    /// Peek the next marker and validate it names a known AMF0 type, without
    /// consuming it. Does not dereference into AMF3 for 0x11 — that marker
    /// is "known" here, dispatch happens in [`Self::read_element`].
    pub fn read_type(&mut self) -> Result<u8> {
        let marker = self.input.peek_u8()?;
        if !markers::is_known(marker) {
            log::debug!("read_type rejected unknown AMF0 marker: 0x{marker:02x}");
            return Err(Error::parse(format!("unknown AMF0 marker: 0x{marker:02x}")));
        }
        Ok(marker)
    }

    /// Read one marker byte and the value it introduces.
    pub fn read_element(&mut self) -> Result<Value> {
        let marker = self.input.read_u8()?;
        match marker {
            markers::NUMBER => self.read_number(),
            markers::BOOLEAN => self.read_boolean(),
            markers::STRING => self.read_string(),
            markers::OBJECT => self.read_object(),
            markers::MOVIE_CLIP => Ok(Value::MovieClip),
            markers::NULL => Ok(Value::Null),
            markers::UNDEFINED => Ok(Value::Undefined),
            markers::REFERENCE => self.read_reference(),
            markers::MIXED_ARRAY => self.read_mixed_array(),
            markers::OBJECT_TERM => Err(Error::malformed_object("unexpected object terminator at top level")),
            markers::STRICT_ARRAY => self.read_strict_array(),
            markers::DATE => self.read_date(),
            markers::LONG_STRING => self.read_long_string(),
            markers::UNSUPPORTED => Ok(Value::Unsupported),
            markers::RECORDSET => Ok(Value::RecordSet),
            markers::XML_DOCUMENT => self.read_xml(),
            markers::TYPED_OBJECT => self.read_typed_object(),
            markers::AVMPLUS_OBJECT => {
                // `amf3::read_element` consumes the rest of the stream as one
                // opaque blob, which is only correct when this marker is the
                // sole top-level value being read — nested inside a
                // container body it would swallow every sibling and
                // terminator that follows. The encoder never produces that
                // shape (see `Encoder::write_element`'s `SwitchAmf3` arm), so
                // seeing it here means the input is malformed.
                if self.depth > 0 {
                    log::debug!("rejected nested AMF3 switch marker at offset {}", self.input.tell());
                    return Err(Error::malformed_object(
                        "AMF3 switch marker (0x11) cannot appear nested inside a container body",
                    ));
                }
                log::trace!("switching to AMF3 passthrough at offset {}", self.input.tell());
                amf3::read_element(self.input)
            }
            other => {
                log::debug!("read_element hit unknown AMF0 marker: 0x{other:02x}");
                Err(Error::parse(format!("unknown AMF0 marker: 0x{other:02x}")))
            }
        }
    }

    /// Reads an element nested inside a container body, tracking nesting
    /// depth so a nested AMF3 switch marker is rejected rather than
    /// mis-parsed (see the comment on `read_element`'s `AVMPLUS_OBJECT` arm).
    fn read_nested_element(&mut self) -> Result<Value> {
        self.depth += 1;
        let result = self.read_element();
        self.depth -= 1;
        result
    }

    fn read_number(&mut self) -> Result<Value> {
        Ok(Value::Number(self.input.read_double()?))
    }

    fn read_boolean(&mut self) -> Result<Value> {
        Ok(Value::Boolean(self.input.read_u8()? != 0))
    }

    fn read_string(&mut self) -> Result<Value> {
        let len = self.input.read_u16()? as usize;
        Ok(Value::String(self.input.read_utf8(len)?))
    }

    fn read_long_string(&mut self) -> Result<Value> {
        let len = self.input.read_u32()? as usize;
        Ok(Value::LongString(self.input.read_utf8(len)?))
    }

    fn read_xml(&mut self) -> Result<Value> {
        let len = self.input.read_u32()? as usize;
        Ok(Value::Xml(self.input.read_utf8(len)?))
    }

    fn read_date(&mut self) -> Result<Value> {
        let millis = self.input.read_double()?;
        let tz_offset_min = self.input.read_i16()?;
        Ok(Value::Date { millis, tz_offset_min })
    }

    fn read_reference(&mut self) -> Result<Value> {
        let index = self.input.read_u16()?;
        self.references
            .get(index as usize)
            .cloned()
            .ok_or(Error::IndexOutOfRange(index))
    }

    /// Reserve the next reference slot for a compound value *before* its
    /// body is read, so back-references inside the body resolve to the same
    /// identity (this is what makes cyclic graphs parseable).
    fn reserve_slot(&mut self, placeholder: Value) -> Result<()> {
        // Mirrors the encoder's `write_referenceable` boundary exactly: a
        // session holds `max_references + 1` slots (0..=max_references), so
        // the default `u16::MAX` allows the spec's 2^16 objects per session.
        if self.references.len() > self.config.max_references as usize {
            log::warn!("reference table exhausted after {} slots", self.references.len());
            return Err(Error::OutOfReferenceSlots);
        }
        self.references.push(placeholder);
        Ok(())
    }

    /// Reads `{key, value}*` pairs until the zero-length-key + `ObjectTerm`
    /// sentinel, inserting each pair into `obj` in the order read.
    fn read_object_body_into(&mut self, obj: &ObjectRef) -> Result<()> {
        loop {
            let key_len = self.input.read_u16()? as usize;
            if key_len == 0 {
                let terminator = self.input.read_u8()?;
                if terminator != markers::OBJECT_TERM {
                    return Err(Error::malformed_object(format!(
                        "expected object terminator 0x09, found 0x{terminator:02x}"
                    )));
                }
                return Ok(());
            }

            let key = self.input.read_utf8(key_len)?;
            let value = self.read_nested_element()?;
            obj.borrow_mut().insert(key, value);
        }
    }

    fn read_object(&mut self) -> Result<Value> {
        let obj = new_object_ref();
        self.reserve_slot(Value::Object(obj.clone()))?;
        self.read_object_body_into(&obj)?;
        Ok(Value::Object(obj))
    }

    fn read_mixed_array(&mut self) -> Result<Value> {
        let _declared_len = self.input.read_u32()?;
        let obj = new_object_ref();
        self.reserve_slot(Value::MixedArray(obj.clone()))?;
        self.read_object_body_into(&obj)?;
        Ok(Value::MixedArray(obj))
    }

    fn read_strict_array(&mut self) -> Result<Value> {
        let count = self.input.read_u32()? as usize;
        let arr = new_array_ref();
        self.reserve_slot(Value::Array(arr.clone()))?;
        for _ in 0..count {
            let item = self.read_nested_element()?;
            arr.borrow_mut().push(item);
        }
        Ok(Value::Array(arr))
    }

    fn read_typed_object(&mut self) -> Result<Value> {
        let alias_len = self.input.read_u16()? as usize;
        let alias = self.input.read_utf8(alias_len)?;

        let descriptor = self.registry.lookup_by_alias(&alias);
        if descriptor.is_none() {
            if self.config.strict_aliases {
                return Err(Error::unresolved_alias(alias));
            }
            log::warn!("no class descriptor for alias '{alias}', falling back to an anonymous object");
        }

        let obj = descriptor.as_ref().map(|d| d.construct()).unwrap_or_else(new_object_ref);
        self.reserve_slot(Value::TypedObject(alias.clone(), obj.clone()))?;

        if let Some(hooks) = descriptor.as_ref().and_then(|d| d.hooks.as_ref()) {
            (hooks.read_external)(&obj, self.input)?;
        } else {
            self.read_object_body_into(&obj)?;
        }

        Ok(Value::TypedObject(alias, obj))
    }
}
