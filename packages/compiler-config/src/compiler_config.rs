//! Compiler configuration root

use std::sync::Once;

use tagged_codec::{
    registry, Codec, CodecError, CodecOptions, CodecResult, Fields, Object, Reflect, Shape,
    TypeRegistry, Value,
};
use tracing::debug;

use crate::compat;
use crate::error::{ConfigError, ConfigResult};
use crate::metrics::MetricsType;
use crate::optimizations::{self, OptimizationConfig};
use crate::results_format::QuantumResultsFormat;

/// Settings that shape a single compilation
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerConfig {
    /// Shots per program; `None` defers to the backend
    pub repeats: Option<u64>,
    /// Time between shots; `None` defers to the backend
    pub repetition_period: Option<f64>,
    pub results_format: QuantumResultsFormat,
    pub metrics: MetricsType,
    pub optimizations: Option<Box<dyn OptimizationConfig>>,
}

impl CompilerConfig {
    pub const TYPE_PATH: &'static str = "compiler_config::CompilerConfig";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repeats(mut self, repeats: u64) -> Self {
        self.repeats = Some(repeats);
        self
    }

    pub fn with_repetition_period(mut self, period: f64) -> Self {
        self.repetition_period = Some(period);
        self
    }

    pub fn with_results_format(mut self, results_format: QuantumResultsFormat) -> Self {
        self.results_format = results_format;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsType) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_optimizations<T: OptimizationConfig>(mut self, optimizations: T) -> Self {
        self.optimizations = Some(Box::new(optimizations));
        self
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Serialization
    // ═══════════════════════════════════════════════════════════════════════

    /// Serialize in the current schema using the process-wide registry
    pub fn to_json(&self) -> ConfigResult<String> {
        ensure_registered();
        let registry = registry::global();
        self.to_json_with(&registry)
    }

    /// Indented variant of [`CompilerConfig::to_json`]
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        ensure_registered();
        let registry = registry::global();
        self.encode(&registry, CodecOptions::new().with_pretty(true))
    }

    /// Serialize using `registry` to decide which types are allowed
    pub fn to_json_with(&self, registry: &TypeRegistry) -> ConfigResult<String> {
        self.encode(registry, CodecOptions::default())
    }

    fn encode(&self, registry: &TypeRegistry, options: CodecOptions) -> ConfigResult<String> {
        let text = Codec::new(registry)
            .with_options(options)
            .encode(&Value::object(self.clone()))?;
        debug!(bytes = text.len(), "serialized compiler config");
        Ok(text)
    }

    /// Deserialize any supported schema generation using the process-wide
    /// registry
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        ensure_registered();
        let registry = registry::global();
        Self::from_json_with(text, &registry)
    }

    /// Deserialize, resolving types only through `registry`
    pub fn from_json_with(text: &str, registry: &TypeRegistry) -> ConfigResult<Self> {
        let tree = compat::normalize(tagged_codec::parse_json(text)?)?;
        let decoded = Codec::new(registry).decode_value(tree)?;
        let found = decoded.type_name();
        decoded
            .into_object::<Self>()
            .map_err(|_| ConfigError::unexpected_root(Self::TYPE_PATH, found))
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            repeats: None,
            repetition_period: None,
            results_format: QuantumResultsFormat::default(),
            metrics: MetricsType::default(),
            optimizations: None,
        }
    }
}

impl Reflect for CompilerConfig {
    fn type_path(&self) -> &'static str {
        Self::TYPE_PATH
    }

    fn shape(&self) -> Shape {
        let mut fields = Fields::new();
        fields.insert("repeats".to_string(), self.repeats.into());
        fields.insert("repetition_period".to_string(), self.repetition_period.into());
        fields.insert("results_format".to_string(), Value::object(self.results_format));
        fields.insert("metrics".to_string(), self.metrics.into());
        fields.insert(
            "optimizations".to_string(),
            self.optimizations
                .as_ref()
                .map_or(Value::Null, |config| Value::Object(config.as_reflect().clone_boxed())),
        );
        Shape::Attributes(fields)
    }
}

impl Object for CompilerConfig {
    const TYPE_PATH: &'static str = CompilerConfig::TYPE_PATH;

    fn set_attribute(&mut self, name: &str, value: Value) -> CodecResult<()> {
        match name {
            "repeats" => self.repeats = value.into_field(Self::TYPE_PATH, name)?,
            "repetition_period" => self.repetition_period = value.into_field(Self::TYPE_PATH, name)?,
            "results_format" => {
                self.results_format = value
                    .into_object::<QuantumResultsFormat>()
                    .map_err(|err| CodecError::field(Self::TYPE_PATH, name, err))?
            },
            "metrics" => self.metrics = value.into_field(Self::TYPE_PATH, name)?,
            "optimizations" => self.optimizations = decode_optimizations(name, value)?,
            _ => return Err(CodecError::unknown_field(Self::TYPE_PATH, name)),
        }
        Ok(())
    }
}

fn decode_optimizations(
    field: &str,
    value: Value,
) -> CodecResult<Option<Box<dyn OptimizationConfig>>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(object) => optimizations::downcast_optimization(object)
            .map(Some)
            .map_err(|object| {
                CodecError::field(
                    CompilerConfig::TYPE_PATH,
                    field,
                    format!("'{}' is not an optimization config", object.type_path()),
                )
            }),
        other => Err(CodecError::field(
            CompilerConfig::TYPE_PATH,
            field,
            format!("expected an optimization config, found {}", other.type_name()),
        )),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Registration
// ═══════════════════════════════════════════════════════════════════════════

/// Install every configuration type into `registry`
///
/// Includes optimization variants added through
/// [`register_optimization`](crate::register_optimization).
pub fn register_types(registry: &mut TypeRegistry) {
    registry
        .register_object::<CompilerConfig>()
        .register_object::<QuantumResultsFormat>();
    optimizations::install_variants(registry);
}

/// Install the configuration types into the process-wide registry once
pub fn ensure_registered() {
    static REGISTER: Once = Once::new();
    REGISTER.call_once(|| register_types(&mut registry::global_mut()));
}
