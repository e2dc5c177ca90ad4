//! Optimization pass selections

use std::fmt;

flag_set! {
    /// Passes run by the tket backend
    pub struct TketOptimizations {
        const EMPTY = 1 << 0 => "Empty";
        const DEFAULT_MAPPING_PASS = 1 << 1 => "DefaultMappingPass";
        const FULL_PEEPHOLE_OPTIMISE = 1 << 2 => "FullPeepholeOptimise";
        const CONTEXT_SIMP = 1 << 3 => "ContextSimp";
        const DIRECTIONAL_CX_GATES = 1 << 4 => "DirectionalCXGates";
        const CLIFFORD_SIMP = 1 << 5 => "CliffordSimp";
        const DECOMPOSE_ARBITRARILY_CONTROLLED_GATES = 1 << 6 => "DecomposeArbitrarilyControlledGates";
        const EULER_ANGLE_REDUCTION = 1 << 7 => "EulerAngleReduction";
        /// Deprecated, retained so older selections still load
        const GLOBALISE_PHASED_X = 1 << 8 => "GlobalisePhasedX";
        const GUIDED_PAULI_SIMP = 1 << 9 => "GuidedPauliSimp";
        const KAK_DECOMPOSITION = 1 << 10 => "KAKDecomposition";
        const OPTIMISE_PHASE_GADGETS = 1 << 11 => "OptimisePhaseGadgets";
        const PAULI_SIMP = 1 << 12 => "PauliSimp";
        const PAULI_SQUASH = 1 << 13 => "PauliSquash";
        const PEEPHOLE_OPTIMISE_2Q = 1 << 14 => "PeepholeOptimise2Q";
        const REMOVE_DISCARDED = 1 << 15 => "RemoveDiscarded";
        const REMOVE_BARRIERS = 1 << 16 => "RemoveBarriers";
        const REMOVE_REDUNDANCIES = 1 << 17 => "RemoveRedundancies";
        const THREE_QUBIT_SQUASH = 1 << 18 => "ThreeQubitSquash";
        const SIMPLIFY_MEASURED = 1 << 19 => "SimplifyMeasured";
        const ONE = Self::DEFAULT_MAPPING_PASS.0 | Self::DIRECTIONAL_CX_GATES.0 => "One";
        const TWO = Self::ONE.0 | Self::FULL_PEEPHOLE_OPTIMISE.0 | Self::CONTEXT_SIMP.0 => "Two";
    }
}

impl TketOptimizations {
    /// Passes kept only for compatibility
    pub const DEPRECATED: Self = Self::GLOBALISE_PHASED_X;

    /// Names of the deprecated passes in this selection
    pub fn deprecated_passes(&self) -> Vec<&'static str> {
        self.intersection(Self::DEPRECATED)
            .iter()
            .map(|(label, _)| label)
            .collect()
    }
}

flag_set! {
    /// Passes run by the qiskit backend
    pub struct QiskitOptimizations {
        const EMPTY = 1 << 0 => "Empty";
    }
}

/// A single pass selection from any backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassFlag {
    Tket(TketOptimizations),
    Qiskit(QiskitOptimizations),
}

impl From<TketOptimizations> for PassFlag {
    fn from(flags: TketOptimizations) -> Self {
        PassFlag::Tket(flags)
    }
}

impl From<QiskitOptimizations> for PassFlag {
    fn from(flags: QiskitOptimizations) -> Self {
        PassFlag::Qiskit(flags)
    }
}

impl fmt::Display for PassFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassFlag::Tket(flags) => fmt::Display::fmt(flags, f),
            PassFlag::Qiskit(flags) => fmt::Display::fmt(flags, f),
        }
    }
}
