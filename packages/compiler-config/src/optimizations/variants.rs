//! Built-in optimization variants

use tagged_codec::{CodecError, CodecResult, Fields, Object, Reflect, Shape, Value};
use tracing::warn;

use super::flags::{PassFlag, QiskitOptimizations, TketOptimizations};
use super::OptimizationConfig;

const TKET_FIELD: &str = "tket_optimizations";
const QISKIT_FIELD: &str = "qiskit_optimizations";

/// Warn once per construction when `flags` selects a deprecated pass
fn warn_deprecated(type_path: &'static str, flags: TketOptimizations) {
    let deprecated = flags.deprecated_passes();
    if !deprecated.is_empty() {
        warn!(
            target: "compiler_config::deprecation",
            type_path,
            passes = %deprecated.join("|"),
            "deprecated optimization pass selected; it will be removed in a future release"
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tket
// ═══════════════════════════════════════════════════════════════════════════

/// Passes for the tket backend only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tket {
    pub tket_optimizations: TketOptimizations,
}

impl Tket {
    pub fn new(tket_optimizations: TketOptimizations) -> Self {
        warn_deprecated(<Self as Object>::TYPE_PATH, tket_optimizations);
        Self { tket_optimizations }
    }

    pub fn disable() -> Self {
        Self::new(TketOptimizations::EMPTY)
    }

    pub fn minimum() -> Self {
        Self::new(TketOptimizations::DEFAULT_MAPPING_PASS)
    }

    pub fn default_passes() -> Self {
        Self::new(TketOptimizations::ONE)
    }
}

impl Default for Tket {
    fn default() -> Self {
        Self {
            tket_optimizations: TketOptimizations::ONE,
        }
    }
}

impl Reflect for Tket {
    fn type_path(&self) -> &'static str {
        <Self as Object>::TYPE_PATH
    }

    fn shape(&self) -> Shape {
        let mut fields = Fields::new();
        fields.insert(TKET_FIELD.to_string(), self.tket_optimizations.into());
        Shape::Attributes(fields)
    }
}

impl Object for Tket {
    const TYPE_PATH: &'static str = "compiler_config::Tket";

    fn set_attribute(&mut self, name: &str, value: Value) -> CodecResult<()> {
        match name {
            TKET_FIELD => self.tket_optimizations = value.into_field(Self::TYPE_PATH, name)?,
            _ => return Err(CodecError::unknown_field(Self::TYPE_PATH, name)),
        }
        Ok(())
    }
}

impl OptimizationConfig for Tket {
    fn contains(&self, flag: PassFlag) -> bool {
        match flag {
            PassFlag::Tket(flags) => self.tket_optimizations.contains(flags),
            PassFlag::Qiskit(_) => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Qiskit
// ═══════════════════════════════════════════════════════════════════════════

/// Passes for the qiskit backend only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Qiskit {
    pub qiskit_optimizations: QiskitOptimizations,
}

impl Qiskit {
    pub fn new(qiskit_optimizations: QiskitOptimizations) -> Self {
        Self { qiskit_optimizations }
    }

    pub fn disable() -> Self {
        Self::new(QiskitOptimizations::EMPTY)
    }

    pub fn minimum() -> Self {
        Self::new(QiskitOptimizations::EMPTY)
    }

    pub fn default_passes() -> Self {
        Self::new(QiskitOptimizations::EMPTY)
    }
}

impl Default for Qiskit {
    fn default() -> Self {
        Self::default_passes()
    }
}

impl Reflect for Qiskit {
    fn type_path(&self) -> &'static str {
        <Self as Object>::TYPE_PATH
    }

    fn shape(&self) -> Shape {
        let mut fields = Fields::new();
        fields.insert(QISKIT_FIELD.to_string(), self.qiskit_optimizations.into());
        Shape::Attributes(fields)
    }
}

impl Object for Qiskit {
    const TYPE_PATH: &'static str = "compiler_config::Qiskit";

    fn set_attribute(&mut self, name: &str, value: Value) -> CodecResult<()> {
        match name {
            QISKIT_FIELD => self.qiskit_optimizations = value.into_field(Self::TYPE_PATH, name)?,
            _ => return Err(CodecError::unknown_field(Self::TYPE_PATH, name)),
        }
        Ok(())
    }
}

impl OptimizationConfig for Qiskit {
    fn contains(&self, flag: PassFlag) -> bool {
        match flag {
            PassFlag::Tket(_) => false,
            PassFlag::Qiskit(flags) => self.qiskit_optimizations.contains(flags),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Source-language variants
// ═══════════════════════════════════════════════════════════════════════════

/// Variant selecting passes for both backends
macro_rules! combined_variant {
    ($(#[$meta:meta])* $name:ident => $type_path:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            pub tket_optimizations: TketOptimizations,
            pub qiskit_optimizations: QiskitOptimizations,
        }

        impl $name {
            pub fn new(
                tket_optimizations: TketOptimizations,
                qiskit_optimizations: QiskitOptimizations,
            ) -> Self {
                warn_deprecated($type_path, tket_optimizations);
                Self {
                    tket_optimizations,
                    qiskit_optimizations,
                }
            }

            pub fn disable() -> Self {
                Self::new(TketOptimizations::EMPTY, QiskitOptimizations::EMPTY)
            }

            pub fn minimum() -> Self {
                Self::new(TketOptimizations::DEFAULT_MAPPING_PASS, QiskitOptimizations::EMPTY)
            }

            pub fn default_passes() -> Self {
                Self::new(TketOptimizations::TWO, QiskitOptimizations::EMPTY)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    tket_optimizations: TketOptimizations::TWO,
                    qiskit_optimizations: QiskitOptimizations::EMPTY,
                }
            }
        }

        impl Reflect for $name {
            fn type_path(&self) -> &'static str {
                $type_path
            }

            fn shape(&self) -> Shape {
                let mut fields = Fields::new();
                fields.insert(TKET_FIELD.to_string(), self.tket_optimizations.into());
                fields.insert(QISKIT_FIELD.to_string(), self.qiskit_optimizations.into());
                Shape::Attributes(fields)
            }
        }

        impl Object for $name {
            const TYPE_PATH: &'static str = $type_path;

            fn set_attribute(&mut self, name: &str, value: Value) -> CodecResult<()> {
                match name {
                    TKET_FIELD => {
                        self.tket_optimizations = value.into_field(Self::TYPE_PATH, name)?
                    },
                    QISKIT_FIELD => {
                        self.qiskit_optimizations = value.into_field(Self::TYPE_PATH, name)?
                    },
                    _ => return Err(CodecError::unknown_field(Self::TYPE_PATH, name)),
                }
                Ok(())
            }
        }

        impl OptimizationConfig for $name {
            fn contains(&self, flag: PassFlag) -> bool {
                match flag {
                    PassFlag::Tket(flags) => self.tket_optimizations.contains(flags),
                    PassFlag::Qiskit(flags) => self.qiskit_optimizations.contains(flags),
                }
            }
        }
    };
}

combined_variant! {
    /// Passes applied to OpenQASM 2 programs
    Qasm2Optimizations => "compiler_config::Qasm2Optimizations"
}

combined_variant! {
    /// Passes applied to OpenQASM 3 programs
    Qasm3Optimizations => "compiler_config::Qasm3Optimizations"
}
