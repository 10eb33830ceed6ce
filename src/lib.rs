//! A codec for the Action Message Format (AMF0), the compact binary
//! serialization Flash-era clients and application servers used to exchange
//! typed values.
//!
//! The crate is organized leaves-first:
//!
//! - [`utils::ByteStream`] — the buffered, big-endian byte primitives
//!   everything else is built on.
//! - [`value::Value`] — the closed sum type standing in for every AMF0
//!   payload a host program can produce or receive.
//! - [`registry::ClassRegistry`] — the alias ↔ local-type mapping consulted
//!   while encoding/decoding `TypedObject`s.
//! - [`amf0::Encoder`] / [`amf0::Parser`] — the wire-level codec.
//! - [`amf3`] — the marker-dispatch seam for AMF3, scoped to opaque
//!   passthrough.
//!
//! Most callers just want [`encode`]/[`decode`]; reach for [`amf0::Encoder`]/
//! [`amf0::Parser`] directly when a session needs to share one
//! [`registry::ClassRegistry`] or non-default [`config::CodecConfig`] across
//! several top-level values.

mod amf3;
mod config;
mod dispatch;
mod error;
mod registry;
mod utils;
mod value;

pub mod amf0;

pub use config::{CodecConfig, CodecConfigBuilder};
pub use dispatch::{decode, decode_with, encode, encode_with};
pub use error::{Error, Result};
pub use registry::{ClassDescriptor, ClassRegistry, ExternalizationHooks};
pub use utils::ByteStream;
pub use value::{new_array_ref, new_object_ref, ArrayRef, ObjectRef, PropertyList, Value};
