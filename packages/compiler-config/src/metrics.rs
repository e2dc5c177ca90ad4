//! Compilation metrics selection

flag_set! {
    /// Metrics to collect while compiling
    pub struct MetricsType {
        const EMPTY = 1 << 0 => "Empty";
        const OPTIMIZED_CIRCUIT = 1 << 1 => "OptimizedCircuit";
        const OPTIMIZED_INSTRUCTION_COUNT = 1 << 2 => "OptimizedInstructionCount";
        const DEFAULT = Self::OPTIMIZED_CIRCUIT.0 | Self::OPTIMIZED_INSTRUCTION_COUNT.0 => "Default";
    }
}

impl Default for MetricsType {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagged_codec::{FromValue, Value};

    #[test]
    fn test_member_values() {
        assert_eq!(MetricsType::EMPTY.bits(), 1);
        assert_eq!(MetricsType::OPTIMIZED_CIRCUIT.bits(), 2);
        assert_eq!(MetricsType::OPTIMIZED_INSTRUCTION_COUNT.bits(), 4);
        assert_eq!(MetricsType::DEFAULT.bits(), 6);
        assert_eq!(MetricsType::ALL.bits(), 7);
        assert_eq!(MetricsType::default(), MetricsType::DEFAULT);
    }

    #[test]
    fn test_membership() {
        assert!(MetricsType::DEFAULT.contains(MetricsType::OPTIMIZED_CIRCUIT));
        assert!(MetricsType::DEFAULT.contains(MetricsType::OPTIMIZED_INSTRUCTION_COUNT));
        assert!(!MetricsType::DEFAULT.contains(MetricsType::EMPTY));
        assert_eq!(
            MetricsType::OPTIMIZED_CIRCUIT | MetricsType::OPTIMIZED_INSTRUCTION_COUNT,
            MetricsType::DEFAULT
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(
            MetricsType::from_name("OptimizedInstructionCount"),
            Some(MetricsType::OPTIMIZED_INSTRUCTION_COUNT)
        );
        assert_eq!(
            MetricsType::from_name("MetricsType.Default"),
            Some(MetricsType::DEFAULT)
        );
        assert_eq!(
            MetricsType::from_name("OptimizedCircuit|OptimizedInstructionCount"),
            Some(MetricsType::DEFAULT)
        );
        assert_eq!(MetricsType::from_name("Nope"), None);
        assert_eq!(MetricsType::DEFAULT.to_string(), "MetricsType.Default");
        assert_eq!(
            (MetricsType::EMPTY | MetricsType::OPTIMIZED_CIRCUIT).to_string(),
            "MetricsType.Empty|OptimizedCircuit"
        );
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(MetricsType::DEFAULT), Value::Int(6));
        assert_eq!(MetricsType::from_value(Value::Int(4)), Ok(MetricsType::OPTIMIZED_INSTRUCTION_COUNT));
        assert_eq!(
            MetricsType::from_value(Value::Str("MetricsType.OptimizedCircuit".into())),
            Ok(MetricsType::OPTIMIZED_CIRCUIT)
        );
        assert!(MetricsType::from_value(Value::Int(8)).is_err());
        assert!(MetricsType::from_value(Value::Int(-1)).is_err());
        assert!(MetricsType::from_value(Value::Bool(true)).is_err());
    }

    #[test]
    fn test_serde_as_integer() {
        assert_eq!(serde_json::to_string(&MetricsType::DEFAULT).unwrap(), "6");
        let parsed: MetricsType = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, MetricsType::OPTIMIZED_CIRCUIT);
        assert!(serde_json::from_str::<MetricsType>("64").is_err());
    }
}
