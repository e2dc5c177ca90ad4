//! Shared helpers for compiler-config integration tests
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use compiler_config::{
    OptimizationConfig, Qasm2Optimizations, Qasm3Optimizations, QiskitOptimizations,
    TketOptimizations,
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Schema generations with checked-in samples, newest first
pub const SUPPORTED_CONFIG_VERSIONS: &[&str] = &["v02", "v01", "v1"];

pub fn fixture_path(file_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(file_name)
}

pub fn fixture(file_name: &str) -> String {
    let path = fixture_path(file_name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("cannot read fixture {}: {}", path.display(), err))
}

/// Flags of a variant that selects passes for both backends
pub fn combined_flags(
    config: &dyn OptimizationConfig,
) -> Option<(TketOptimizations, QiskitOptimizations)> {
    let any = config.as_reflect().as_any();
    if let Some(opt) = any.downcast_ref::<Qasm2Optimizations>() {
        return Some((opt.tket_optimizations, opt.qiskit_optimizations));
    }
    any.downcast_ref::<Qasm3Optimizations>()
        .map(|opt| (opt.tket_optimizations, opt.qiskit_optimizations))
}

// ═══════════════════════════════════════════════════════════════════════════
// Warning capture
// ═══════════════════════════════════════════════════════════════════════════

/// Records the target of every WARN event
#[derive(Clone, Default)]
pub struct WarningCollector {
    targets: Arc<Mutex<Vec<String>>>,
}

impl WarningCollector {
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.targets.lock().len()
    }
}

impl<S: Subscriber> Layer<S> for WarningCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.targets.lock().push(event.metadata().target().to_string());
        }
    }
}

/// Run `f` with a thread-local subscriber and return the WARN targets it
/// produced
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let collector = WarningCollector::default();
    let subscriber = tracing_subscriber::registry().with(collector.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, collector.targets())
}
