//! tagged-codec - Type-tagged JSON serialization
//!
//! Converts in-memory values into JSON and back while keeping the runtime
//! type of every composite. Composites are written as tagged nodes carrying a
//! `$type` identifier; decoding resolves the identifier in a [`TypeRegistry`]
//! and rebuilds the exact type.
//!
//! ## Value universe
//!
//! - Primitives, sequences and insertion-ordered mappings map onto plain JSON
//! - [`Record`] types: fixed field set, rebuilt by keyword construction
//! - [`Object`] types: attribute bag, rebuilt on an empty instance
//! - [`TextForm`] types: opaque values carried as a canonical string
//!   (`num_complex::Complex64` is built in)
//!
//! Anything else (runtime handles, unregistered types, non-finite floats)
//! fails the whole encode with [`ErrorKind::ValueKind`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tagged_codec::{Codec, TypeRegistry, Value};
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_record::<MyRecord>();
//!
//! let codec = Codec::new(&registry);
//! let text = codec.encode(&Value::object(my_record))?;
//! let back: MyRecord = codec.decode_object(&text)?;
//! ```

pub mod builtins;
pub mod codec;
pub mod error;
pub mod reflect;
pub mod registry;
pub mod value;

pub use codec::{
    decode, decode_object, encode, parse_json, with_stack, Codec, CodecOptions, DATACLASS_KEY,
    DATA_KEY, TYPE_KEY,
};
pub use error::{CodecError, CodecResult, ErrorKind};
pub use reflect::{DynReflect, Object, Record, Reflect, Shape, TextForm, TypeKind};
pub use registry::{normalize_type_path, Builder, TypeEntry, TypeRegistry};
pub use value::{FieldArgs, Fields, FromValue, Value, ValueMismatch};
