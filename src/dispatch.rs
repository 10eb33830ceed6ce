//! The host-facing convenience API (§6): wraps an [`Encoder`]/[`Parser`]
//! pair around a single [`Value`], and is where AMF0 vs. AMF3 selection
//! ultimately happens (the AMF0 [`Parser`] itself does the marker dispatch —
//! see its `read_element` — so these functions are a thin, ergonomic shell
//! around it rather than a second layer of marker matching).

use crate::amf0::{Encoder, Parser};
use crate::config::CodecConfig;
use crate::error::Result;
use crate::registry::ClassRegistry;
use crate::utils::ByteStream;
use crate::value::Value;

/// Encode `value` with a fresh [`ClassRegistry`] and default [`CodecConfig`].
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    encode_with(value, &ClassRegistry::new(), &CodecConfig::default())
}

/// Encode `value`, consulting `registry` for `TypedObject` externalization
/// hooks and honoring `config`'s policy knobs.
pub fn encode_with(value: &Value, registry: &ClassRegistry, config: &CodecConfig) -> Result<Vec<u8>> {
    let mut encoder = Encoder::with_registry_and_config(registry.clone(), config.clone());
    encoder.write_element(value)?;
    Ok(encoder.into_bytes())
}

/// Decode one top-level value from `bytes` with a fresh [`ClassRegistry`]
/// and default [`CodecConfig`].
pub fn decode(bytes: &[u8]) -> Result<Value> {
    decode_with(bytes, &ClassRegistry::new(), &CodecConfig::default())
}

/// Decode one top-level value from `bytes`, resolving `TypedObject` aliases
/// through `registry` and honoring `config`'s policy knobs.
pub fn decode_with(bytes: &[u8], registry: &ClassRegistry, config: &CodecConfig) -> Result<Value> {
    let mut stream = ByteStream::new(bytes.to_vec());
    let mut parser = Parser::with_registry_and_config(&mut stream, registry.clone(), config.clone());
    parser.read_element()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let value = Value::object([
            ("name".to_string(), Value::string("widget")),
            ("count".to_string(), Value::Number(3.0)),
        ]);

        let bytes = encode(&value).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_amf3_marker_delegates() {
        let value = Value::SwitchAmf3(vec![0x04, 0x2a]);
        let bytes = encode(&value).unwrap();
        assert_eq!(bytes[0], 0x11);

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, value);
    }
}
