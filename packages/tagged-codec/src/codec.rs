//! Encode/decode engine
//!
//! Composite values are written as tagged nodes:
//!
//! ```text
//! {"$type": "<identifier>", "$dataclass": true, "$data": {...}}   record
//! {"$type": "<identifier>", "$data": {...}}                       object
//! {"$type": "<identifier>", "$data": "<canonical string>"}        text
//! ```
//!
//! Everything else maps onto plain JSON. Encoding fails as a whole on the
//! first value that could not be rebuilt on decode; no partial output is
//! produced.
//!
//! Nesting is unbounded: every recursive step runs under [`with_stack`],
//! which moves onto a fresh stack segment when the current one runs low.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use tracing::debug;

use crate::error::{CodecError, CodecResult};
use crate::reflect::{Reflect, Shape};
use crate::registry::{self, Builder, TypeRegistry};
use crate::value::{FieldArgs, Fields, Value};

pub const TYPE_KEY: &str = "$type";
pub const DATA_KEY: &str = "$data";
pub const DATACLASS_KEY: &str = "$dataclass";

/// Codec behaviour knobs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Indented output
    pub pretty: bool,
    /// Maximum nesting depth for both directions; unbounded when `None`
    pub max_depth: Option<usize>,
}

impl CodecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Headroom left before switching stacks
const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each new stack segment
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Run one recursive step, growing the stack first if it is nearly used up
pub fn with_stack<R>(step: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, step)
}

/// Parse JSON text with serde_json's recursion limit disabled
pub fn parse_json(text: &str) -> CodecResult<JsonValue> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = JsonValue::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Render a JSON tree of any depth
fn write_json(json: &JsonValue, pretty: bool) -> CodecResult<String> {
    let mut out = Vec::new();
    if pretty {
        let mut serializer = serde_json::Serializer::pretty(&mut out);
        json.serialize(serde_stacker::Serializer::new(&mut serializer))?;
    } else {
        let mut serializer = serde_json::Serializer::new(&mut out);
        json.serialize(serde_stacker::Serializer::new(&mut serializer))?;
    }
    String::from_utf8(out).map_err(|err| CodecError::value_kind("str", err.to_string()))
}

/// Codec bound to a registry
#[derive(Debug, Clone)]
pub struct Codec<'r> {
    registry: &'r TypeRegistry,
    options: CodecOptions,
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            options: CodecOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Encode
    // ═══════════════════════════════════════════════════════════════════════

    /// Encode to JSON text
    pub fn encode(&self, value: &Value) -> CodecResult<String> {
        let json = self.encode_value(value)?;
        let text = write_json(&json, self.options.pretty)?;
        debug!(root = value.type_name(), bytes = text.len(), "encoded value");
        Ok(text)
    }

    /// Encode to a JSON tree
    pub fn encode_value(&self, value: &Value) -> CodecResult<JsonValue> {
        self.encode_node(value, 0)
    }

    fn encode_node(&self, value: &Value, depth: usize) -> CodecResult<JsonValue> {
        with_stack(|| self.encode_step(value, depth))
    }

    fn encode_step(&self, value: &Value, depth: usize) -> CodecResult<JsonValue> {
        if self.too_deep(depth) {
            return Err(CodecError::value_kind(
                value.type_name(),
                "nesting exceeds the configured maximum depth",
            ));
        }

        Ok(match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::from(*i),
            Value::UInt(u) => JsonValue::from(*u),
            Value::Float(f) => Number::from_f64(*f).map(JsonValue::Number).ok_or_else(|| {
                CodecError::value_kind("float", format!("non-finite float {}", f))
            })?,
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::List(items) => JsonValue::Array(
                items
                    .iter()
                    .map(|item| self.encode_node(item, depth + 1))
                    .collect::<CodecResult<_>>()?,
            ),
            Value::Map(fields) => JsonValue::Object(self.encode_fields(fields, depth)?),
            Value::Object(object) => self.encode_object(&**object, depth)?,
        })
    }

    fn encode_fields(&self, fields: &Fields, depth: usize) -> CodecResult<JsonMap<String, JsonValue>> {
        fields
            .iter()
            .map(|(name, value)| Ok((name.clone(), self.encode_node(value, depth + 1)?)))
            .collect()
    }

    fn encode_object(&self, object: &dyn Reflect, depth: usize) -> CodecResult<JsonValue> {
        let type_path = object.type_path();
        let entry = self.registry.get(type_path).ok_or_else(|| {
            CodecError::value_kind(type_path, "type is not registered for decoding")
        })?;
        let registered = entry.kind();

        let mut node = JsonMap::new();
        node.insert(TYPE_KEY.to_string(), JsonValue::String(type_path.to_string()));

        let shape = object.shape();
        let shape_kind = shape.kind().ok_or_else(|| {
            CodecError::value_kind(type_path, "value has no reconstructable state")
        })?;
        if shape_kind != registered {
            return Err(CodecError::value_kind(
                type_path,
                format!("{} value is registered as {}", shape_kind, registered),
            ));
        }

        match shape {
            Shape::Record(fields) => {
                node.insert(DATACLASS_KEY.to_string(), JsonValue::Bool(true));
                node.insert(
                    DATA_KEY.to_string(),
                    JsonValue::Object(self.encode_fields(&fields, depth)?),
                );
            },
            Shape::Attributes(fields) => {
                node.insert(
                    DATA_KEY.to_string(),
                    JsonValue::Object(self.encode_fields(&fields, depth)?),
                );
            },
            Shape::Text(text) => {
                node.insert(DATA_KEY.to_string(), JsonValue::String(text));
            },
            Shape::Opaque => {
                return Err(CodecError::value_kind(type_path, "value has no reconstructable state"));
            },
        }

        Ok(JsonValue::Object(node))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Decode
    // ═══════════════════════════════════════════════════════════════════════

    /// Decode JSON text
    pub fn decode(&self, text: &str) -> CodecResult<Value> {
        let value = self.decode_value(parse_json(text)?)?;
        debug!(root = value.type_name(), bytes = text.len(), "decoded value");
        Ok(value)
    }

    /// Decode text whose root is a composite of type `T`
    pub fn decode_object<T: Reflect>(&self, text: &str) -> CodecResult<T> {
        self.decode(text)?
            .into_object::<T>()
            .map_err(|err| CodecError::malformed(format!("unexpected root value: {}", err)))
    }

    /// Decode an already parsed JSON tree
    pub fn decode_value(&self, json: JsonValue) -> CodecResult<Value> {
        self.decode_node(json, 0)
    }

    fn decode_node(&self, json: JsonValue, depth: usize) -> CodecResult<Value> {
        with_stack(|| self.decode_step(json, depth))
    }

    fn decode_step(&self, json: JsonValue, depth: usize) -> CodecResult<Value> {
        if self.too_deep(depth) {
            return Err(CodecError::malformed(
                "nesting exceeds the configured maximum depth",
            ));
        }

        Ok(match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(u)) => Value::UInt(u),
                (None, None) => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::Str(s),
            JsonValue::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| self.decode_node(item, depth + 1))
                    .collect::<CodecResult<_>>()?,
            ),
            JsonValue::Object(map) if map.contains_key(TYPE_KEY) => {
                Value::Object(self.decode_tagged(map, depth)?)
            },
            JsonValue::Object(map) => Value::Map(self.decode_fields(map, depth)?),
        })
    }

    fn decode_fields(&self, map: JsonMap<String, JsonValue>, depth: usize) -> CodecResult<Fields> {
        map.into_iter()
            .map(|(name, value)| Ok((name, self.decode_node(value, depth + 1)?)))
            .collect()
    }

    fn decode_tagged(
        &self,
        mut map: JsonMap<String, JsonValue>,
        depth: usize,
    ) -> CodecResult<Box<dyn Reflect>> {
        let type_path = match map.remove(TYPE_KEY) {
            Some(JsonValue::String(type_path)) => type_path,
            other => {
                return Err(CodecError::malformed(format!(
                    "'{}' must be a string, found {}",
                    TYPE_KEY,
                    json_kind(other.as_ref())
                )))
            },
        };
        let entry = self.registry.resolve(&type_path)?;

        let dataclass = match map.remove(DATACLASS_KEY) {
            None | Some(JsonValue::Null) => false,
            Some(JsonValue::Bool(flag)) => flag,
            Some(other) => {
                return Err(CodecError::malformed(format!(
                    "'{}' of '{}' must be a boolean, found {}",
                    DATACLASS_KEY,
                    type_path,
                    json_kind(Some(&other))
                )))
            },
        };
        let data = map.remove(DATA_KEY).ok_or_else(|| {
            CodecError::malformed(format!("tagged node '{}' has no '{}'", type_path, DATA_KEY))
        })?;
        if let Some(extra) = map.keys().next() {
            return Err(CodecError::malformed(format!(
                "unexpected key '{}' in tagged node '{}'",
                extra, type_path
            )));
        }

        match (entry.builder, data) {
            (Builder::Record(build), JsonValue::Object(fields)) => {
                build(FieldArgs::new(entry.type_path, self.decode_fields(fields, depth)?))
            },
            (Builder::Object(build), JsonValue::Object(fields)) if !dataclass => {
                build(self.decode_fields(fields, depth)?)
            },
            (Builder::Text(parse), JsonValue::String(text)) if !dataclass => parse(&text),
            (builder, data) => Err(CodecError::malformed(format!(
                "'{}' is registered as {} but the node carries {}{}",
                entry.type_path,
                builder.kind(),
                if dataclass { "a dataclass " } else { "" },
                json_kind(Some(&data))
            ))),
        }
    }

    fn too_deep(&self, depth: usize) -> bool {
        self.options.max_depth.map_or(false, |max| depth > max)
    }
}

fn json_kind(json: Option<&JsonValue>) -> &'static str {
    match json {
        None => "nothing",
        Some(JsonValue::Null) => "null",
        Some(JsonValue::Bool(_)) => "a boolean",
        Some(JsonValue::Number(_)) => "a number",
        Some(JsonValue::String(_)) => "a string",
        Some(JsonValue::Array(_)) => "an array",
        Some(JsonValue::Object(_)) => "an object",
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Global registry shortcuts
// ═══════════════════════════════════════════════════════════════════════════

/// Encode with the process-wide registry
pub fn encode(value: &Value) -> CodecResult<String> {
    let registry = registry::global();
    Codec::new(&registry).encode(value)
}

/// Decode with the process-wide registry
pub fn decode(text: &str) -> CodecResult<Value> {
    let registry = registry::global();
    Codec::new(&registry).decode(text)
}

/// Decode a composite of type `T` with the process-wide registry
pub fn decode_object<T: Reflect>(text: &str) -> CodecResult<T> {
    let registry = registry::global();
    Codec::new(&registry).decode_object(text)
}
