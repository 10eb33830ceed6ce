use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};
use crate::utils::ByteStream;
use crate::value::{new_object_ref, ObjectRef};

/// The read/write hooks an externalizable class attaches to its descriptor.
///
/// When both are present the object's body is opaque to the codec: the
/// encoder hands `write_external` the object's property list and copies
/// whatever bytes it wrote; the parser hands `read_external` a freshly
/// allocated, empty property list and trusts the hook to populate it by
/// consuming exactly the body bytes. Neither hook touches the surrounding
/// marker/alias framing — only the body between them.
#[derive(Clone)]
pub struct ExternalizationHooks {
    pub read_external: Arc<dyn Fn(&ObjectRef, &mut ByteStream) -> Result<()> + Send + Sync>,
    pub write_external: Arc<dyn Fn(&ObjectRef, &mut ByteStream) -> Result<()> + Send + Sync>,
}

/// A local type descriptor bound to a remote class alias.
///
/// `T` in [`ClassRegistry::register`] is a Rust type used purely as a lookup
/// tag — the codec has no reflection over arbitrary host structs, so the
/// descriptor's actual payload is the `constructor` closure that produces a
/// fresh [`ObjectRef`] and the optional externalization hooks.
#[derive(Clone)]
pub struct ClassDescriptor {
    pub alias: String,
    type_id: TypeId,
    constructor: Arc<dyn Fn() -> ObjectRef + Send + Sync>,
    pub hooks: Option<ExternalizationHooks>,
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("alias", &self.alias)
            .field("externalizable", &self.hooks.is_some())
            .finish()
    }
}

impl ClassDescriptor {
    /// Allocate a new, empty instance of the class this descriptor names.
    pub fn construct(&self) -> ObjectRef {
        (self.constructor)()
    }

    pub fn is_externalizable(&self) -> bool {
        self.hooks.is_some()
    }
}

#[derive(Default)]
struct Inner {
    by_alias: HashMap<String, ClassDescriptor>,
    by_type: HashMap<TypeId, String>,
}

/// Process-wide mapping between remote class aliases and local type
/// descriptors.
///
/// Many-reader/one-writer by design (§5): an application registers its
/// classes at startup, then every concurrent encode/parse only ever reads.
/// This is a handle around `Arc<RwLock<..>>` rather than a global — clone it
/// freely, every clone sees the same underlying table, and nothing here
/// needs `lazy_static`/`OnceLock` machinery because the caller owns exactly
/// as many registries as it wants. Lookups never block on I/O; the lock is
/// held only for the HashMap access.
#[derive(Clone, Default)]
pub struct ClassRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        ClassRegistry::default()
    }

    /// Register `T` under `alias`, with a constructor for fresh instances
    /// and optional externalization hooks. Idempotent for a repeat
    /// registration of the same `(type, alias)` pair; fails with
    /// `AliasConflict` if the alias is already bound to a different type.
    pub fn register<T: 'static>(
        &self,
        alias: impl Into<String>,
        constructor: impl Fn() -> ObjectRef + Send + Sync + 'static,
        hooks: Option<ExternalizationHooks>,
    ) -> Result<()> {
        let alias = alias.into();
        let type_id = TypeId::of::<T>();
        let mut inner = self.inner.write().expect("class registry lock poisoned");

        if let Some(existing) = inner.by_alias.get(&alias) {
            if existing.type_id != type_id {
                log::warn!("class alias '{alias}' already registered to a different type");
                return Err(Error::alias_conflict(alias));
            }
            return Ok(());
        }

        let descriptor = ClassDescriptor {
            alias: alias.clone(),
            type_id,
            constructor: Arc::new(constructor),
            hooks,
        };

        inner.by_alias.insert(alias.clone(), descriptor);
        inner.by_type.insert(type_id, alias);
        Ok(())
    }

    /// Convenience over [`register`](Self::register) for plain classes with
    /// no externalization and a default-empty constructor.
    pub fn register_plain<T: 'static>(&self, alias: impl Into<String>) -> Result<()> {
        self.register::<T>(alias, new_object_ref, None)
    }

    pub fn lookup_by_alias(&self, alias: &str) -> Option<ClassDescriptor> {
        self.inner.read().expect("class registry lock poisoned").by_alias.get(alias).cloned()
    }

    pub fn lookup_by_type<T: 'static>(&self) -> Option<ClassDescriptor> {
        let inner = self.inner.read().expect("class registry lock poisoned");
        let alias = inner.by_type.get(&TypeId::of::<T>())?;
        inner.by_alias.get(alias).cloned()
    }

    pub fn unregister(&self, alias: &str) {
        let mut inner = self.inner.write().expect("class registry lock poisoned");
        if let Some(descriptor) = inner.by_alias.remove(alias) {
            inner.by_type.remove(&descriptor.type_id);
        }
    }
}
