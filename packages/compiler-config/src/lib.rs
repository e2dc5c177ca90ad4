//! compiler-config - Compiler configuration root
//!
//! [`CompilerConfig`] holds the per-compilation settings: repeat count,
//! repetition period, results format, metrics selection and an optional
//! optimization variant. It persists through `tagged-codec`, so the exact
//! runtime type of every field survives a save/load cycle.
//!
//! ## Schema generations
//!
//! [`CompilerConfig::from_json`] accepts the current layout and the three
//! earlier ones (see [`compat`]). [`CompilerConfig::to_json`] always writes
//! the current layout.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use compiler_config::{CompilerConfig, MetricsType, Qasm2Optimizations};
//!
//! let config = CompilerConfig::new()
//!     .with_repeats(1000)
//!     .with_metrics(MetricsType::OPTIMIZED_INSTRUCTION_COUNT)
//!     .with_optimizations(Qasm2Optimizations::default());
//!
//! let text = config.to_json()?;
//! assert_eq!(CompilerConfig::from_json(&text)?, config);
//! ```

#[macro_use]
mod macros;

pub mod compat;
pub mod compiler_config;
pub mod error;
pub mod metrics;
pub mod optimizations;
pub mod results_format;

pub use compat::SchemaGeneration;
pub use compiler_config::{ensure_registered, register_types, CompilerConfig};
pub use error::{ConfigError, ConfigResult};
pub use metrics::MetricsType;
pub use optimizations::{
    register_optimization, registered_optimizations, OptimizationConfig, PassFlag,
    Qasm2Optimizations, Qasm3Optimizations, Qiskit, QiskitOptimizations, Tket, TketOptimizations,
};
pub use results_format::{InlineResultsProcessing, QuantumResultsFormat, ResultsFormatting};
