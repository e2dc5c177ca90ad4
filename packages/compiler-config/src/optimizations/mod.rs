//! Optimization configuration hierarchy
//!
//! Every optimization variant is its own attribute object implementing
//! [`OptimizationConfig`]. The set is open: a new variant implements the
//! trait plus [`Object`] and is added with [`register_optimization`], after
//! which it round-trips through [`CompilerConfig`] like the built-in ones.
//!
//! [`CompilerConfig`]: crate::CompilerConfig

pub mod flags;
pub mod variants;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use tagged_codec::{registry, Object, Reflect, TypeRegistry};
use tracing::debug;

pub use flags::{PassFlag, QiskitOptimizations, TketOptimizations};
pub use variants::{Qasm2Optimizations, Qasm3Optimizations, Qiskit, Tket};

/// Schema version carried by the built-in variants
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// A selection of optimization passes
pub trait OptimizationConfig: Reflect + DynOptimizationConfig {
    /// Whether `flag` is fully part of this selection
    fn contains(&self, flag: PassFlag) -> bool;

    /// Layout version of this variant's attributes
    fn schema_version(&self) -> u32 {
        CURRENT_SCHEMA_VERSION
    }
}

/// Dynamic helpers, implemented for every `OptimizationConfig + Clone`
pub trait DynOptimizationConfig {
    fn as_reflect(&self) -> &dyn Reflect;

    fn clone_config(&self) -> Box<dyn OptimizationConfig>;
}

impl<T> DynOptimizationConfig for T
where
    T: OptimizationConfig + Clone,
{
    fn as_reflect(&self) -> &dyn Reflect {
        self
    }

    fn clone_config(&self) -> Box<dyn OptimizationConfig> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn OptimizationConfig> {
    fn clone(&self) -> Self {
        self.clone_config()
    }
}

impl PartialEq for dyn OptimizationConfig {
    fn eq(&self, other: &Self) -> bool {
        self.as_reflect().eq_dyn(other.as_reflect())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Variant table
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy)]
struct VariantEntry {
    type_path: &'static str,
    cast: fn(Box<dyn Reflect>) -> Option<Box<dyn OptimizationConfig>>,
    default: fn() -> Box<dyn OptimizationConfig>,
    install: fn(&mut TypeRegistry),
}

impl VariantEntry {
    fn of<T: OptimizationConfig + Object>() -> Self {
        Self {
            type_path: <T as Object>::TYPE_PATH,
            cast: cast_variant::<T>,
            default: default_variant::<T>,
            install: install_variant::<T>,
        }
    }
}

fn cast_variant<T: OptimizationConfig>(object: Box<dyn Reflect>) -> Option<Box<dyn OptimizationConfig>> {
    object
        .into_any()
        .downcast::<T>()
        .ok()
        .map(|config| config as Box<dyn OptimizationConfig>)
}

fn default_variant<T: OptimizationConfig + Object>() -> Box<dyn OptimizationConfig> {
    Box::new(T::default())
}

fn install_variant<T: OptimizationConfig + Object>(registry: &mut TypeRegistry) {
    registry.register_object::<T>();
}

lazy_static! {
    /// Known optimization variants, in registration order
    static ref VARIANTS: RwLock<Vec<VariantEntry>> = RwLock::new(vec![
        VariantEntry::of::<Tket>(),
        VariantEntry::of::<Qiskit>(),
        VariantEntry::of::<Qasm2Optimizations>(),
        VariantEntry::of::<Qasm3Optimizations>(),
    ]);
}

/// Add an optimization variant
///
/// The variant becomes decodable through the process-wide codec registry and
/// is installed by every later [`register_types`](crate::register_types) call.
/// It is listed by [`registered_optimizations`] only once it can be encoded.
pub fn register_optimization<T: OptimizationConfig + Object>() {
    let entry = VariantEntry::of::<T>();
    (entry.install)(&mut registry::global_mut());
    {
        let mut variants = VARIANTS.write();
        variants.retain(|known| known.type_path != entry.type_path);
        variants.push(entry);
    }
    debug!(type_path = entry.type_path, "registered optimization variant");
}

/// Default instance of every registered variant
pub fn registered_optimizations() -> Vec<Box<dyn OptimizationConfig>> {
    VARIANTS.read().iter().map(|entry| (entry.default)()).collect()
}

/// Whether `type_path` names a registered variant
pub fn is_optimization(type_path: &str) -> bool {
    VARIANTS.read().iter().any(|entry| entry.type_path == type_path)
}

pub(crate) fn install_variants(registry: &mut TypeRegistry) {
    for entry in VARIANTS.read().iter() {
        (entry.install)(registry);
    }
}

/// View a decoded composite as an optimization variant
///
/// Hands the object back when its type is not a registered variant.
pub(crate) fn downcast_optimization(
    object: Box<dyn Reflect>,
) -> Result<Box<dyn OptimizationConfig>, Box<dyn Reflect>> {
    let type_path = object.type_path();
    let cast = VARIANTS
        .read()
        .iter()
        .find(|entry| entry.type_path == type_path)
        .map(|entry| entry.cast);
    match cast {
        Some(cast) => {
            let fallback = object.clone_boxed();
            cast(object).ok_or(fallback)
        },
        None => Err(object),
    }
}
