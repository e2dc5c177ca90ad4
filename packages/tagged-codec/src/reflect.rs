//! Introspection and reconstruction traits
//!
//! Encoding only needs the object-safe [`Reflect`] view of a value. Decoding
//! needs to build a concrete type from a resolved identifier, which is what
//! the static [`Record`], [`Object`] and [`TextForm`] traits provide; the
//! registry stores one builder per registered type.
//!
//! # Kinds of composite
//!
//! - **Record**: fixed, declared field set. Rebuilt by keyword construction
//!   (`Record::from_fields`), tagged with `"$dataclass": true`.
//! - **Object**: general attribute bag. Rebuilt by creating an empty instance
//!   (`Default`) and assigning every decoded attribute (`set_attribute`).
//! - **Text**: no reflectable fields. Stored as its canonical string form and
//!   rebuilt with `TextForm::parse_text`.
//!
//! # Hierarchies
//!
//! A "derived" type is its own registered type whose attribute set includes
//! the attributes of the type it extends (usually by holding it as a field and
//! delegating). Type identity therefore survives the round-trip: a derived
//! instance decodes as the derived type, never as its base.

use std::any::Any;
use std::fmt;

use crate::error::CodecResult;
use crate::value::{FieldArgs, Fields, Value};

/// Introspected contents of a composite value
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Fixed field set, rebuilt by keyword construction
    Record(Fields),
    /// Complete attribute set, rebuilt by assignment onto an empty instance
    Attributes(Fields),
    /// Canonical string form
    Text(String),
    /// Nothing that could be reconstructed (runtime handles, type tokens)
    Opaque,
}

impl Shape {
    /// Kind this shape encodes as, `None` for [`Shape::Opaque`]
    pub fn kind(&self) -> Option<TypeKind> {
        match self {
            Shape::Record(_) => Some(TypeKind::Record),
            Shape::Attributes(_) => Some(TypeKind::Object),
            Shape::Text(_) => Some(TypeKind::Text),
            Shape::Opaque => None,
        }
    }
}

/// Reconstruction path of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Record,
    Object,
    Text,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Record => "record",
            TypeKind::Object => "object",
            TypeKind::Text => "text",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Object-safe view
// ═══════════════════════════════════════════════════════════════════════════

/// Dynamic helpers for boxed composites
///
/// Implemented automatically for every `Reflect + Clone + PartialEq` type.
pub trait DynReflect: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn clone_boxed(&self) -> Box<dyn Reflect>;

    /// Equal dynamic type and equal state
    fn eq_dyn(&self, other: &dyn Reflect) -> bool;
}

impl<T> DynReflect for T
where
    T: Reflect + Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_boxed(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn Reflect) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }
}

/// Introspection capability of a composite value
///
/// `type_path` must be stable across versions for anything that gets
/// persisted, and must not collide with another registered type.
///
/// Field names `$type`, `$data` and `$dataclass` are reserved by the wire
/// format and must not be used by implementors.
pub trait Reflect: DynReflect {
    /// Canonical type identifier, e.g. `compiler_config::CompilerConfig`
    fn type_path(&self) -> &'static str;

    /// Current contents
    fn shape(&self) -> Shape;
}

// ═══════════════════════════════════════════════════════════════════════════
// Reconstruction
// ═══════════════════════════════════════════════════════════════════════════

/// Structured record rebuilt from keyword arguments
pub trait Record: Reflect + Sized {
    const TYPE_PATH: &'static str;

    fn from_fields(args: FieldArgs) -> CodecResult<Self>;
}

/// General object rebuilt attribute by attribute onto an empty instance
pub trait Object: Reflect + Default {
    const TYPE_PATH: &'static str;

    /// Assign one decoded attribute
    ///
    /// Unknown names should fail with [`CodecError::unknown_field`].
    ///
    /// [`CodecError::unknown_field`]: crate::CodecError::unknown_field
    fn set_attribute(&mut self, name: &str, value: Value) -> CodecResult<()>;
}

/// Opaque type carried as its canonical string form
pub trait TextForm: Reflect + Sized {
    const TYPE_PATH: &'static str;

    fn parse_text(text: &str) -> CodecResult<Self>;
}
