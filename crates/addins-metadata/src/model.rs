//! Plain data records describing a module's static metadata.

use crate::runtime::RuntimeIdentifier;
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The small part of a module needed to classify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleHeader {
    /// Logical module name; two paths with the same name are the same module
    pub name: String,
    /// Declared module version
    pub version: Version,
    /// Runtime the module was built for, when it can be determined
    pub target_runtime: Option<RuntimeIdentifier>,
}

/// Everything the engine reads from a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    pub header: ModuleHeader,
    /// Module-level attributes
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Declared types, in declaration order
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

impl ModuleMetadata {
    /// Find a declared type by full name
    pub fn find_type(&self, full_name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.full_name == full_name)
    }

    /// Module-level attributes of the given attribute type
    pub fn attributes_named<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Attribute> {
        self.attributes.iter().filter(move |a| a.type_name == type_name)
    }
}

/// A declared type and its relationships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Namespace-qualified name, e.g. `Vendor.Reporting.XmlReporter`
    pub full_name: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Directly implemented interfaces, in declaration order
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Direct base type, if any
    #[serde(default)]
    pub base_type: Option<String>,
}

impl TypeDefinition {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            attributes: Vec::new(),
            interfaces: Vec::new(),
            base_type: None,
        }
    }

    /// Simple name: the last dot-separated segment of the full name
    pub fn name(&self) -> &str {
        simple_name(&self.full_name)
    }

    /// First attribute of the given attribute type
    pub fn attribute(&self, type_name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.type_name == type_name)
    }

    /// All attributes of the given attribute type
    pub fn attributes_named<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Attribute> {
        self.attributes.iter().filter(move |a| a.type_name == type_name)
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }
}

/// Last dot-separated segment of a type name.
pub fn simple_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}

/// An attribute instance: positional and named arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Full name of the attribute type
    pub type_name: String,
    /// Positional constructor arguments
    #[serde(default)]
    pub args: Vec<AttributeValue>,
    /// Named arguments
    #[serde(default)]
    pub named: BTreeMap<String, AttributeValue>,
}

impl Attribute {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            args: Vec::new(),
            named: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, value: impl Into<AttributeValue>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    /// Positional argument as a string
    pub fn arg_str(&self, index: usize) -> Option<&str> {
        self.args.get(index).and_then(AttributeValue::as_str)
    }

    /// Named argument as a string
    pub fn named_str(&self, name: &str) -> Option<&str> {
        self.named.get(name).and_then(AttributeValue::as_str)
    }

    /// Named argument as a bool
    pub fn named_bool(&self, name: &str) -> Option<bool> {
        self.named.get(name).and_then(AttributeValue::as_bool)
    }
}

/// Attribute argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("Vendor.Reporting.XmlReporter"), "XmlReporter");
        assert_eq!(simple_name("Plain"), "Plain");
        assert_eq!(TypeDefinition::new("A.B.IDriver").name(), "IDriver");
    }

    #[test]
    fn test_attribute_arguments_from_json() {
        let json = r#"{
            "type_name": "Addins.ExtensionAttribute",
            "args": ["first", 2, true],
            "named": { "Path": "/Addins/Drivers", "Enabled": false }
        }"#;
        let attr: Attribute = serde_json::from_str(json).unwrap();
        assert_eq!(attr.arg_str(0), Some("first"));
        assert_eq!(attr.args[1], AttributeValue::Int(2));
        assert_eq!(attr.arg_str(2), None);
        assert_eq!(attr.named_str("Path"), Some("/Addins/Drivers"));
        assert_eq!(attr.named_bool("Enabled"), Some(false));
        assert_eq!(attr.named_bool("Path"), None);
    }

    #[test]
    fn test_attributes_named_keeps_duplicates() {
        let ty = TypeDefinition::new("Vendor.Ext")
            .with_attribute(Attribute::new("P").with_arg("k").with_arg("1"))
            .with_attribute(Attribute::new("Other"))
            .with_attribute(Attribute::new("P").with_arg("k").with_arg("2"));
        assert_eq!(ty.attributes_named("P").count(), 2);
        assert_eq!(ty.attribute("P").and_then(|a| a.arg_str(1)), Some("1"));
    }
}
