//! Backward compatibility for older configuration layouts
//!
//! Serialized configurations from earlier releases differ from the current
//! schema in identifier spelling and in the shape of a few fields. The shim
//! rewrites a parsed tree into the current layout before the codec sees it;
//! encoding always emits the current layout.
//!
//! | Generation | Signature                                          |
//! |------------|----------------------------------------------------|
//! | `QatV1`    | root type in the `qat.` namespace, or an integer `optimizations` bitmask |
//! | `V01`      | `results_format` stored as a `[format, transforms]` pair |
//! | `V02`      | `repetition_time` instead of `repetition_period`   |
//! | `Current`  | none of the above                                  |
//!
//! The shim never invents a type. Identifiers outside the legacy
//! configuration namespaces are left alone, so an unknown type still fails
//! resolution in the codec.

use std::fmt;

use serde_json::{Map as JsonMap, Value as JsonValue};
use tagged_codec::{normalize_type_path, Object, DATA_KEY, TYPE_KEY};
use tracing::{debug, info};

use crate::compiler_config::CompilerConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::metrics::MetricsType;
use crate::optimizations::{Qasm2Optimizations, QiskitOptimizations};
use crate::results_format::QuantumResultsFormat;

/// Namespace of every configuration type
pub const CONFIG_NAMESPACE: &str = "compiler_config::";

/// Module paths configuration types were published under previously
pub const LEGACY_NAMESPACES: &[&str] = &[
    "qat.purr.compiler.config.",
    "compiler_config.config.",
    "scc.compiler.config.",
];

const REPEATS: &str = "repeats";
const REPETITION_PERIOD: &str = "repetition_period";
const REPETITION_TIME: &str = "repetition_time";
const RESULTS_FORMAT: &str = "results_format";
const METRICS: &str = "metrics";
const OPTIMIZATIONS: &str = "optimizations";

const CONFIG_KEYS: &[&str] = &[
    REPEATS,
    REPETITION_PERIOD,
    REPETITION_TIME,
    RESULTS_FORMAT,
    METRICS,
    OPTIMIZATIONS,
];

/// Layout generation of a serialized configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaGeneration {
    QatV1,
    V01,
    V02,
    Current,
}

impl SchemaGeneration {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaGeneration::QatV1 => "v1",
            SchemaGeneration::V01 => "v01",
            SchemaGeneration::V02 => "v02",
            SchemaGeneration::Current => "current",
        }
    }

    pub fn is_legacy(&self) -> bool {
        !matches!(self, SchemaGeneration::Current)
    }
}

impl fmt::Display for SchemaGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map a legacy identifier onto the current namespace
///
/// Repr wrappers are stripped. Identifiers outside the legacy namespaces are
/// returned without the wrapper but otherwise unchanged.
pub fn translate_type_path(raw: &str) -> String {
    let path = normalize_type_path(raw);
    LEGACY_NAMESPACES
        .iter()
        .find_map(|namespace| path.strip_prefix(*namespace))
        .filter(|name| !name.is_empty() && !name.contains('.'))
        .map(|name| format!("{}{}", CONFIG_NAMESPACE, name))
        .unwrap_or_else(|| path.to_string())
}

/// Fields of the configuration record, tagged or not
fn config_fields(tree: &JsonValue) -> Option<&JsonMap<String, JsonValue>> {
    let root = tree.as_object()?;
    match root.get(TYPE_KEY) {
        Some(_) => root.get(DATA_KEY)?.as_object(),
        None => Some(root),
    }
}

/// Identify the layout generation of a parsed configuration
pub fn detect(tree: &JsonValue) -> SchemaGeneration {
    let root_type = tree
        .as_object()
        .and_then(|root| root.get(TYPE_KEY))
        .and_then(JsonValue::as_str)
        .map(normalize_type_path);
    if root_type.map_or(false, |path| path.starts_with("qat.")) {
        return SchemaGeneration::QatV1;
    }

    let Some(fields) = config_fields(tree) else {
        return SchemaGeneration::Current;
    };
    if fields.get(OPTIMIZATIONS).map_or(false, JsonValue::is_number) {
        SchemaGeneration::QatV1
    } else if fields.get(RESULTS_FORMAT).map_or(false, JsonValue::is_array) {
        SchemaGeneration::V01
    } else if fields.contains_key(REPETITION_TIME) {
        SchemaGeneration::V02
    } else {
        SchemaGeneration::Current
    }
}

/// Rewrite a parsed configuration of any supported generation into the
/// current layout
pub fn normalize(tree: JsonValue) -> ConfigResult<JsonValue> {
    let generation = detect(&tree);

    let mut root = match tree {
        JsonValue::Object(root) => root,
        other => {
            return Err(ConfigError::schema_shape(format!(
                "root must be a JSON object, found {}",
                json_kind(&other)
            )))
        },
    };

    let fields = match root.remove(TYPE_KEY) {
        Some(JsonValue::String(type_path)) => {
            let translated = translate_type_path(&type_path);
            if translated != CompilerConfig::TYPE_PATH {
                // Not a configuration; let the codec decide what it is
                root.insert(TYPE_KEY.to_string(), JsonValue::String(translated));
                let mut other = JsonValue::Object(root);
                rewrite_identifiers(&mut other);
                return Ok(other);
            }
            let data = match root.remove(DATA_KEY) {
                Some(JsonValue::Object(data)) => data,
                Some(other) => {
                    return Err(ConfigError::schema_shape(format!(
                        "'{}' of the configuration must be an object, found {}",
                        DATA_KEY,
                        json_kind(&other)
                    )))
                },
                None => {
                    return Err(ConfigError::schema_shape(format!(
                        "configuration has no '{}'",
                        DATA_KEY
                    )))
                },
            };
            if let Some(extra) = root.keys().next() {
                return Err(ConfigError::schema_shape(format!(
                    "unexpected key '{}' beside the configuration payload",
                    extra
                )));
            }
            data
        },
        Some(other) => {
            return Err(ConfigError::schema_shape(format!(
                "'{}' must be a string, found {}",
                TYPE_KEY,
                json_kind(&other)
            )))
        },
        None => root,
    };

    if generation.is_legacy() {
        info!(%generation, "normalizing legacy compiler config");
    }

    let mut fields = normalize_fields(fields)?;
    for value in fields.values_mut() {
        rewrite_identifiers(value);
    }
    debug!(%generation, keys = fields.len(), "normalized compiler config");
    Ok(tagged(CompilerConfig::TYPE_PATH, JsonValue::Object(fields)))
}

fn normalize_fields(mut fields: JsonMap<String, JsonValue>) -> ConfigResult<JsonMap<String, JsonValue>> {
    if let Some(unknown) = fields.keys().find(|key| !CONFIG_KEYS.contains(&key.as_str())) {
        return Err(ConfigError::schema_shape(format!(
            "unknown configuration key '{}'",
            unknown
        )));
    }

    if let Some(period) = fields.remove(REPETITION_TIME) {
        if fields.contains_key(REPETITION_PERIOD) {
            return Err(ConfigError::schema_shape(format!(
                "both '{}' and '{}' are present",
                REPETITION_TIME, REPETITION_PERIOD
            )));
        }
        fields.insert(REPETITION_PERIOD.to_string(), period);
    }

    let results_format = normalize_results_format(fields.remove(RESULTS_FORMAT))?;
    fields.insert(RESULTS_FORMAT.to_string(), results_format);

    if fields.get(METRICS).map_or(true, JsonValue::is_null) {
        fields.insert(METRICS.to_string(), JsonValue::from(MetricsType::DEFAULT.bits()));
    }

    if let Some(optimizations) = fields.remove(OPTIMIZATIONS) {
        fields.insert(OPTIMIZATIONS.to_string(), normalize_optimizations(optimizations)?);
    }

    Ok(fields)
}

fn normalize_results_format(value: Option<JsonValue>) -> ConfigResult<JsonValue> {
    let default = QuantumResultsFormat::default();
    let (format, transforms) = match value {
        None | Some(JsonValue::Null) => (
            JsonValue::from(default.format.bits()),
            JsonValue::from(default.transforms.bits()),
        ),
        Some(JsonValue::Array(pair)) => {
            let [format, transforms]: [JsonValue; 2] = pair.try_into().map_err(|pair: Vec<_>| {
                ConfigError::schema_shape(format!(
                    "'{}' pair must have 2 elements, found {}",
                    RESULTS_FORMAT,
                    pair.len()
                ))
            })?;
            (format, transforms)
        },
        Some(JsonValue::Object(map)) if map.contains_key(TYPE_KEY) => {
            return Ok(JsonValue::Object(map));
        },
        Some(JsonValue::Object(mut map)) => {
            let format = map
                .remove("format")
                .unwrap_or_else(|| JsonValue::from(default.format.bits()));
            let transforms = map
                .remove("transforms")
                .unwrap_or_else(|| JsonValue::from(default.transforms.bits()));
            if let Some(extra) = map.keys().next() {
                return Err(ConfigError::schema_shape(format!(
                    "unknown '{}' key '{}'",
                    RESULTS_FORMAT, extra
                )));
            }
            (format, transforms)
        },
        Some(other) => {
            return Err(ConfigError::schema_shape(format!(
                "'{}' must be an object or a [format, transforms] pair, found {}",
                RESULTS_FORMAT,
                json_kind(&other)
            )))
        },
    };

    let mut data = JsonMap::new();
    data.insert("format".to_string(), format);
    data.insert("transforms".to_string(), transforms);
    Ok(tagged(
        <QuantumResultsFormat as Object>::TYPE_PATH,
        JsonValue::Object(data),
    ))
}

fn normalize_optimizations(value: JsonValue) -> ConfigResult<JsonValue> {
    match value {
        JsonValue::Number(bits) => {
            let bits = bits.as_u64().ok_or_else(|| {
                ConfigError::schema_shape(format!(
                    "'{}' bitmask must be a non-negative integer, found {}",
                    OPTIMIZATIONS, bits
                ))
            })?;
            let mut data = JsonMap::new();
            data.insert("tket_optimizations".to_string(), JsonValue::from(bits));
            data.insert(
                "qiskit_optimizations".to_string(),
                JsonValue::from(QiskitOptimizations::EMPTY.bits()),
            );
            Ok(tagged(
                <Qasm2Optimizations as Object>::TYPE_PATH,
                JsonValue::Object(data),
            ))
        },
        JsonValue::Null | JsonValue::Object(_) => Ok(value),
        other => Err(ConfigError::schema_shape(format!(
            "'{}' must be a tagged variant or a bitmask, found {}",
            OPTIMIZATIONS,
            json_kind(&other)
        ))),
    }
}

/// Translate every `$type` identifier in `tree`
fn rewrite_identifiers(tree: &mut JsonValue) {
    tagged_codec::with_stack(|| rewrite_step(tree))
}

fn rewrite_step(tree: &mut JsonValue) {
    match tree {
        JsonValue::Array(items) => items.iter_mut().for_each(rewrite_identifiers),
        JsonValue::Object(map) => {
            if let Some(JsonValue::String(type_path)) = map.get_mut(TYPE_KEY) {
                *type_path = translate_type_path(type_path);
            }
            map.values_mut().for_each(rewrite_identifiers);
        },
        _ => {},
    }
}

fn tagged(type_path: &str, data: JsonValue) -> JsonValue {
    let mut node = JsonMap::new();
    node.insert(TYPE_KEY.to_string(), JsonValue::String(type_path.to_string()));
    node.insert(DATA_KEY.to_string(), data);
    JsonValue::Object(node)
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
