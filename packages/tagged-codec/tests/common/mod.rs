//! Shared fake types for tagged-codec integration tests
#![allow(dead_code)]

use std::sync::Once;

use tagged_codec::{
    registry, CodecError, CodecResult, FieldArgs, Fields, Object, Record, Reflect, Shape,
    TypeRegistry, Value,
};

// ═══════════════════════════════════════════════════════════════════════════
// Records
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct FakeDataClass {
    pub field1: i64,
    pub field2: String,
    pub field3: Fields,
    pub field4: String,
}

impl FakeDataClass {
    pub fn new(field1: i64, field2: &str, field3: Fields) -> Self {
        Self {
            field1,
            field2: field2.to_string(),
            field3,
            field4: "Default".to_string(),
        }
    }

    pub fn as_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("field1".into(), self.field1.into());
        fields.insert("field2".into(), self.field2.clone().into());
        fields.insert("field3".into(), Value::Map(self.field3.clone()));
        fields.insert("field4".into(), self.field4.clone().into());
        fields
    }
}

impl Reflect for FakeDataClass {
    fn type_path(&self) -> &'static str {
        <Self as Record>::TYPE_PATH
    }

    fn shape(&self) -> Shape {
        Shape::Record(self.as_fields())
    }
}

impl Record for FakeDataClass {
    const TYPE_PATH: &'static str = "codec_tests::FakeDataClass";

    fn from_fields(mut args: FieldArgs) -> CodecResult<Self> {
        let value = Self {
            field1: args.require("field1")?,
            field2: args.require("field2")?,
            field3: args.require("field3")?,
            field4: args.or("field4", "Default".to_string())?,
        };
        args.finish()?;
        Ok(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FakeDataClassWithCustomClass {
    pub field1: i64,
    pub field2: String,
    pub field3: FakeClass,
}

impl Reflect for FakeDataClassWithCustomClass {
    fn type_path(&self) -> &'static str {
        <Self as Record>::TYPE_PATH
    }

    fn shape(&self) -> Shape {
        let mut fields = Fields::new();
        fields.insert("field1".into(), self.field1.into());
        fields.insert("field2".into(), self.field2.clone().into());
        fields.insert("field3".into(), Value::object(self.field3.clone()));
        Shape::Record(fields)
    }
}

impl Record for FakeDataClassWithCustomClass {
    const TYPE_PATH: &'static str = "codec_tests::FakeDataClassWithCustomClass";

    fn from_fields(mut args: FieldArgs) -> CodecResult<Self> {
        let value = Self {
            field1: args.require("field1")?,
            field2: args.require("field2")?,
            field3: args.object("field3")?,
        };
        args.finish()?;
        Ok(value)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Attribute objects
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakeClass {
    pub field1: String,
    pub field2: bool,
}

impl FakeClass {
    pub fn new(name: &str) -> Self {
        Self {
            field1: name.to_string(),
            field2: true,
        }
    }

    pub fn as_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("field1".into(), self.field1.clone().into());
        fields.insert("field2".into(), self.field2.into());
        fields
    }
}

impl Reflect for FakeClass {
    fn type_path(&self) -> &'static str {
        <Self as Object>::TYPE_PATH
    }

    fn shape(&self) -> Shape {
        Shape::Attributes(self.as_fields())
    }
}

impl Object for FakeClass {
    const TYPE_PATH: &'static str = "codec_tests::FakeClass";

    fn set_attribute(&mut self, name: &str, value: Value) -> CodecResult<()> {
        match name {
            "field1" => self.field1 = value.into_field(Self::TYPE_PATH, name)?,
            "field2" => self.field2 = value.into_field(Self::TYPE_PATH, name)?,
            _ => return Err(CodecError::unknown_field(Self::TYPE_PATH, name)),
        }
        Ok(())
    }
}

/// Extends [`FakeClass`] with one more attribute
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakeDerivedClass {
    pub base: FakeClass,
    pub field3: i64,
}

impl FakeDerivedClass {
    pub fn new(value: i64) -> Self {
        Self {
            base: FakeClass::new("DerivedClass"),
            field3: value,
        }
    }

    pub fn as_fields(&self) -> Fields {
        let mut fields = self.base.as_fields();
        fields.insert("field3".into(), self.field3.into());
        fields
    }
}

impl Reflect for FakeDerivedClass {
    fn type_path(&self) -> &'static str {
        <Self as Object>::TYPE_PATH
    }

    fn shape(&self) -> Shape {
        Shape::Attributes(self.as_fields())
    }
}

impl Object for FakeDerivedClass {
    const TYPE_PATH: &'static str = "codec_tests::FakeDerivedClass";

    fn set_attribute(&mut self, name: &str, value: Value) -> CodecResult<()> {
        match name {
            "field3" => self.field3 = value.into_field(Self::TYPE_PATH, name)?,
            _ => self.base.set_attribute(name, value)?,
        }
        Ok(())
    }
}

/// Type declared inside another namespace
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakeNestedClass {
    pub field1: String,
}

impl Reflect for FakeNestedClass {
    fn type_path(&self) -> &'static str {
        <Self as Object>::TYPE_PATH
    }

    fn shape(&self) -> Shape {
        let mut fields = Fields::new();
        fields.insert("field1".into(), self.field1.clone().into());
        Shape::Attributes(fields)
    }
}

impl Object for FakeNestedClass {
    const TYPE_PATH: &'static str = "codec_tests::TestGetType::FakeNestedClass";

    fn set_attribute(&mut self, name: &str, value: Value) -> CodecResult<()> {
        match name {
            "field1" => self.field1 = value.into_field(Self::TYPE_PATH, name)?,
            _ => return Err(CodecError::unknown_field(Self::TYPE_PATH, name)),
        }
        Ok(())
    }
}

/// Attribute object nobody registers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unregistered {
    pub field1: i64,
}

impl Reflect for Unregistered {
    fn type_path(&self) -> &'static str {
        "codec_tests::Unregistered"
    }

    fn shape(&self) -> Shape {
        let mut fields = Fields::new();
        fields.insert("field1".into(), self.field1.into());
        Shape::Attributes(fields)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Values with no reconstructable state
// ═══════════════════════════════════════════════════════════════════════════

/// Stands in for a live resource such as a module loader
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderHandle {
    pub id: u32,
}

impl Reflect for LoaderHandle {
    fn type_path(&self) -> &'static str {
        "codec_tests::LoaderHandle"
    }

    fn shape(&self) -> Shape {
        Shape::Opaque
    }
}

/// A bare type used as a value
#[derive(Debug, Clone, PartialEq)]
pub struct TypeToken(pub &'static str);

impl Reflect for TypeToken {
    fn type_path(&self) -> &'static str {
        "codec_tests::TypeToken"
    }

    fn shape(&self) -> Shape {
        Shape::Opaque
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Registries
// ═══════════════════════════════════════════════════════════════════════════

pub fn register_fakes(registry: &mut TypeRegistry) {
    registry
        .register_record::<FakeDataClass>()
        .register_record::<FakeDataClassWithCustomClass>()
        .register_object::<FakeClass>()
        .register_object::<FakeDerivedClass>()
        .register_object::<FakeNestedClass>();
}

/// Builtins plus every fake type
pub fn fake_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    register_fakes(&mut registry);
    registry
}

/// Install the fakes into the process-wide registry once
pub fn install_global() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| register_fakes(&mut registry::global_mut()));
}

pub fn sample_dict() -> Fields {
    let mut fields = Fields::new();
    fields.insert("key1".into(), "data1".into());
    fields.insert("key2".into(), "data2".into());
    fields
}
