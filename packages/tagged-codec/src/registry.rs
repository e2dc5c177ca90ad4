//! Type registry
//!
//! Maps stable type identifiers to reconstruction builders. Decoding only
//! ever builds types found here, so a registry scoped to a handful of types
//! doubles as an allow-list for input that is not fully trusted.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

use crate::builtins;
use crate::error::{CodecError, CodecResult};
use crate::reflect::{Object, Record, Reflect, TextForm, TypeKind};
use crate::value::{FieldArgs, Fields};

/// Reconstruction function of a registered type
#[derive(Clone, Copy)]
pub enum Builder {
    /// Keyword construction from decoded fields
    Record(fn(FieldArgs) -> CodecResult<Box<dyn Reflect>>),
    /// Empty instance plus attribute assignment
    Object(fn(Fields) -> CodecResult<Box<dyn Reflect>>),
    /// Parse of the canonical string form
    Text(fn(&str) -> CodecResult<Box<dyn Reflect>>),
}

impl Builder {
    pub fn kind(&self) -> TypeKind {
        match self {
            Builder::Record(_) => TypeKind::Record,
            Builder::Object(_) => TypeKind::Object,
            Builder::Text(_) => TypeKind::Text,
        }
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builder::{:?}", self.kind())
    }
}

/// Registered type
#[derive(Debug, Clone, Copy)]
pub struct TypeEntry {
    pub type_path: &'static str,
    pub builder: Builder,
}

impl TypeEntry {
    pub fn kind(&self) -> TypeKind {
        self.builder.kind()
    }
}

fn build_record<T: Record>(args: FieldArgs) -> CodecResult<Box<dyn Reflect>> {
    Ok(Box::new(T::from_fields(args)?))
}

fn build_object<T: Object>(fields: Fields) -> CodecResult<Box<dyn Reflect>> {
    let mut instance = T::default();
    for (name, value) in fields {
        instance.set_attribute(&name, value)?;
    }
    Ok(Box::new(instance))
}

fn build_text<T: TextForm>(text: &str) -> CodecResult<Box<dyn Reflect>> {
    Ok(Box::new(T::parse_text(text)?))
}

/// Strip a `<class '…'>` or `<enum '…'>` wrapper from a type identifier
///
/// Older payloads carry the host language's repr of a type rather than a
/// bare path. Anything else is returned trimmed and unchanged.
pub fn normalize_type_path(raw: &str) -> &str {
    let trimmed = raw.trim();
    for prefix in ["<class '", "<enum '"] {
        if let Some(inner) = trimmed
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix("'>"))
        {
            return inner.trim();
        }
    }
    trimmed
}

/// Identifier → builder table
pub struct TypeRegistry {
    entries: HashMap<&'static str, TypeEntry>,
    aliases: HashMap<String, &'static str>,
}

impl TypeRegistry {
    /// Registry with the builtin opaque-string types installed
    pub fn new() -> Self {
        let mut registry = Self::empty();
        builtins::install(&mut registry);
        registry
    }

    /// Registry with nothing installed
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn register_record<T: Record>(&mut self) -> &mut Self {
        self.insert(T::TYPE_PATH, Builder::Record(build_record::<T>))
    }

    pub fn register_object<T: Object>(&mut self) -> &mut Self {
        self.insert(T::TYPE_PATH, Builder::Object(build_object::<T>))
    }

    pub fn register_text<T: TextForm>(&mut self) -> &mut Self {
        self.insert(T::TYPE_PATH, Builder::Text(build_text::<T>))
    }

    fn insert(&mut self, type_path: &'static str, builder: Builder) -> &mut Self {
        let replaced = self
            .entries
            .insert(type_path, TypeEntry { type_path, builder })
            .is_some();
        debug!(type_path, kind = %builder.kind(), replaced, "registered type");
        self
    }

    /// Resolve `alias` to the registered type `target`
    pub fn alias(&mut self, alias: impl Into<String>, target: &'static str) -> &mut Self {
        self.aliases.insert(alias.into(), target);
        self
    }

    /// Exact lookup by canonical identifier
    pub fn get(&self, type_path: &str) -> Option<&TypeEntry> {
        self.entries.get(type_path)
    }

    pub fn contains(&self, type_path: &str) -> bool {
        self.lookup(normalize_type_path(type_path)).is_some()
    }

    /// Resolve a wire identifier, accepting repr wrappers and aliases
    pub fn resolve(&self, type_path: &str) -> CodecResult<&TypeEntry> {
        let normalized = normalize_type_path(type_path);
        match self.lookup(normalized) {
            Some(entry) => {
                trace!(requested = type_path, resolved = entry.type_path, "resolved type");
                Ok(entry)
            },
            None => Err(CodecError::type_resolution(normalized)),
        }
    }

    fn lookup(&self, type_path: &str) -> Option<&TypeEntry> {
        self.entries.get(type_path).or_else(|| {
            self.aliases
                .get(type_path)
                .and_then(|target| self.entries.get(target))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical identifiers, sorted
    pub fn type_paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<_> = self.entries.keys().copied().collect();
        paths.sort_unstable();
        paths
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.type_paths())
            .field("aliases", &self.aliases.len())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Process-wide registry
// ═══════════════════════════════════════════════════════════════════════════

lazy_static! {
    /// Registry used by the free `encode`/`decode` functions
    ///
    /// Hosts register their types under the write lock before decoding; the
    /// codec itself only ever takes the read lock.
    static ref GLOBAL_REGISTRY: RwLock<TypeRegistry> = RwLock::new(TypeRegistry::new());
}

/// Shared read access to the process-wide registry
pub fn global() -> RwLockReadGuard<'static, TypeRegistry> {
    GLOBAL_REGISTRY.read()
}

/// Exclusive access for registration
///
/// Do not call while holding a guard from [`global`] on the same thread.
pub fn global_mut() -> RwLockWriteGuard<'static, TypeRegistry> {
    GLOBAL_REGISTRY.write()
}
