//! Results format selection
//!
//! A [`QuantumResultsFormat`] pairs how raw results are processed inline
//! ([`InlineResultsProcessing`]) with how they are shaped on return
//! ([`ResultsFormatting`]).

use tagged_codec::{CodecError, CodecResult, Fields, Object, Reflect, Shape, Value};

flag_set! {
    /// Inline processing applied to raw results
    pub struct InlineResultsProcessing {
        const RAW = 1 << 0 => "Raw";
        const BINARY = 1 << 1 => "Binary";
        const NUMPY_ARRAYS = 1 << 2 => "NumpyArrays";
        const EXPERIMENT = Self::RAW.0 | Self::NUMPY_ARRAYS.0 => "Experiment";
        const PROGRAM = Self::BINARY.0 => "Program";
    }
}

flag_set! {
    /// Shape of returned results
    pub struct ResultsFormatting {
        const DYNAMIC_STRUCTURE_RETURN = 1 << 0 => "DynamicStructureReturn";
        const BINARY_COUNT = 1 << 1 => "BinaryCount";
        const SQUASH_BINARY_RESULT_ARRAYS = 1 << 2 => "SquashBinaryResultArrays";
    }
}

/// Inline processing plus return formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantumResultsFormat {
    pub format: InlineResultsProcessing,
    pub transforms: ResultsFormatting,
}

impl QuantumResultsFormat {
    pub const TYPE_PATH: &'static str = "compiler_config::QuantumResultsFormat";

    pub fn new(format: InlineResultsProcessing, transforms: ResultsFormatting) -> Self {
        Self { format, transforms }
    }

    /// Unprocessed results
    pub fn raw() -> Self {
        Self::default().with_format(InlineResultsProcessing::RAW)
    }

    /// Results collapsed to binary values
    pub fn binary() -> Self {
        Self::default().with_format(InlineResultsProcessing::BINARY)
    }

    /// Raw results returned as counts of binary outcomes
    pub fn binary_count() -> Self {
        Self::new(
            InlineResultsProcessing::RAW,
            ResultsFormatting::BINARY_COUNT | ResultsFormatting::DYNAMIC_STRUCTURE_RETURN,
        )
    }

    pub fn with_format(mut self, format: InlineResultsProcessing) -> Self {
        self.format = format;
        self
    }

    pub fn with_transforms(mut self, transforms: ResultsFormatting) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn has_format(&self, format: InlineResultsProcessing) -> bool {
        self.format.contains(format)
    }

    pub fn has_transform(&self, transform: ResultsFormatting) -> bool {
        self.transforms.contains(transform)
    }
}

impl Default for QuantumResultsFormat {
    fn default() -> Self {
        Self::new(
            InlineResultsProcessing::PROGRAM,
            ResultsFormatting::DYNAMIC_STRUCTURE_RETURN,
        )
    }
}

impl Reflect for QuantumResultsFormat {
    fn type_path(&self) -> &'static str {
        Self::TYPE_PATH
    }

    fn shape(&self) -> Shape {
        let mut fields = Fields::new();
        fields.insert("format".to_string(), self.format.into());
        fields.insert("transforms".to_string(), self.transforms.into());
        Shape::Attributes(fields)
    }
}

impl Object for QuantumResultsFormat {
    const TYPE_PATH: &'static str = QuantumResultsFormat::TYPE_PATH;

    fn set_attribute(&mut self, name: &str, value: Value) -> CodecResult<()> {
        match name {
            "format" => self.format = value.into_field(Self::TYPE_PATH, name)?,
            "transforms" => self.transforms = value.into_field(Self::TYPE_PATH, name)?,
            _ => return Err(CodecError::unknown_field(Self::TYPE_PATH, name)),
        }
        Ok(())
    }
}
