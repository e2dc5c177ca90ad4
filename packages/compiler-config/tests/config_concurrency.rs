//! Concurrent save/load against the process-wide registry
//!
//! Encode and decode only take read locks, so independent calls proceed in
//! parallel while a host registers a new variant.

use std::sync::{Arc, Barrier};
use std::thread;

use compiler_config::{
    register_optimization, registered_optimizations, CompilerConfig, MetricsType, OptimizationConfig,
    PassFlag, Qasm3Optimizations, QiskitOptimizations, TketOptimizations,
};
use pretty_assertions::assert_eq;
use tagged_codec::{CodecError, CodecResult, Fields, Reflect, Shape, Value};

/// Variant registered while other threads are saving and loading
#[derive(Debug, Clone, Default, PartialEq)]
struct LateVariant {
    passes: i64,
}

impl Reflect for LateVariant {
    fn type_path(&self) -> &'static str {
        <Self as tagged_codec::Object>::TYPE_PATH
    }

    fn shape(&self) -> Shape {
        let mut fields = Fields::new();
        fields.insert("passes".into(), self.passes.into());
        Shape::Attributes(fields)
    }
}

impl tagged_codec::Object for LateVariant {
    const TYPE_PATH: &'static str = "concurrency_tests::LateVariant";

    fn set_attribute(&mut self, name: &str, value: Value) -> CodecResult<()> {
        match name {
            "passes" => self.passes = value.into_field(Self::TYPE_PATH, name)?,
            _ => return Err(CodecError::unknown_field(Self::TYPE_PATH, name)),
        }
        Ok(())
    }
}

impl OptimizationConfig for LateVariant {
    fn contains(&self, _flag: PassFlag) -> bool {
        self.passes > 0
    }
}

fn sample(i: u64) -> CompilerConfig {
    CompilerConfig::new()
        .with_repeats(i)
        .with_metrics(MetricsType::MEMBERS[i as usize % MetricsType::MEMBERS.len()].1)
        .with_optimizations(Qasm3Optimizations::new(
            TketOptimizations::TWO,
            QiskitOptimizations::EMPTY,
        ))
}

#[test]
fn stress_concurrent_roundtrip_with_registration() {
    const THREADS: usize = 16;
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    let workers: Vec<_> = (0..THREADS as u64)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for round in 0..50 {
                    let first = sample(i * 100 + round);
                    let text = first.to_json().unwrap();
                    assert_eq!(CompilerConfig::from_json(&text).unwrap(), first);
                }
            })
        })
        .collect();

    let registrar = {
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            register_optimization::<LateVariant>();
        })
    };

    registrar.join().unwrap();
    for worker in workers {
        worker.join().unwrap();
    }

    let first = CompilerConfig::new().with_optimizations(LateVariant { passes: 2 });
    let text = first.to_json().unwrap();
    assert_eq!(CompilerConfig::from_json(&text).unwrap(), first);
}

#[test]
fn stress_listed_variants_are_always_encodable() {
    const READERS: usize = 8;
    let barrier = Arc::new(Barrier::new(READERS + 1));

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..50 {
                    for variant in registered_optimizations() {
                        let type_path = variant.type_path();
                        let mut config = CompilerConfig::new();
                        config.optimizations = Some(variant);
                        let text = config
                            .to_json()
                            .unwrap_or_else(|err| panic!("{} not encodable: {}", type_path, err));
                        assert_eq!(CompilerConfig::from_json(&text).unwrap(), config);
                    }
                }
            })
        })
        .collect();

    barrier.wait();
    register_optimization::<LateVariant>();

    for reader in readers {
        reader.join().unwrap();
    }
    assert!(registered_optimizations()
        .iter()
        .any(|variant| variant.type_path() == "concurrency_tests::LateVariant"));
}
