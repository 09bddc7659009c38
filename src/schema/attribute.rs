//! Attribute definitions and schemas

use crate::error::{KolosalError, Result};
use serde::{Deserialize, Serialize};

/// Ordered set of distinct legal values for a nominal attribute.
///
/// Values keep the order in which they were first seen. That order is the
/// index space a classifier predicts in, so it never changes once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominalDomain {
    values: Vec<String>,
}

impl NominalDomain {
    /// Resolve the distinct values of `values`, first appearance first
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Self {
        let mut distinct: Vec<String> = Vec::new();
        for value in values {
            let value = value.as_ref();
            if !distinct.iter().any(|v| v == value) {
                distinct.push(value.to_string());
            }
        }
        Self { values: distinct }
    }

    /// Number of legal values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of `value` in the domain
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    /// Value stored at `index`
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// A named dataset column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    /// Continuous attribute
    Numeric { name: String },
    /// Attribute restricted to a finite domain of labels
    Nominal { name: String, domain: NominalDomain },
}

impl Attribute {
    pub fn numeric(name: impl Into<String>) -> Self {
        Attribute::Numeric { name: name.into() }
    }

    pub fn nominal(name: impl Into<String>, domain: NominalDomain) -> Self {
        Attribute::Nominal {
            name: name.into(),
            domain,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Attribute::Numeric { name } | Attribute::Nominal { name, .. } => name,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Attribute::Numeric { .. })
    }

    pub fn is_nominal(&self) -> bool {
        matches!(self, Attribute::Nominal { .. })
    }

    /// Domain of a nominal attribute, `None` for numeric ones
    pub fn domain(&self) -> Option<&NominalDomain> {
        match self {
            Attribute::Numeric { .. } => None,
            Attribute::Nominal { domain, .. } => Some(domain),
        }
    }
}

/// Immutable, ordered attribute layout shared by a training dataset and its
/// prediction row. The class (target) attribute is always the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSchema {
    attributes: Vec<Attribute>,
    class_index: usize,
}

impl AttributeSchema {
    pub(crate) fn new(attributes: Vec<Attribute>) -> Result<Self> {
        if attributes.is_empty() {
            return Err(KolosalError::ConfigError(
                "schema needs at least one attribute".to_string(),
            ));
        }
        let class_index = attributes.len() - 1;
        Ok(Self {
            attributes,
            class_index,
        })
    }

    /// Number of attributes, features plus target
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Number of feature attributes
    pub fn n_features(&self) -> usize {
        self.class_index
    }

    /// Index of the target attribute
    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Feature attributes in declaration order
    pub fn features(&self) -> &[Attribute] {
        &self.attributes[..self.class_index]
    }

    pub fn class_attribute(&self) -> &Attribute {
        &self.attributes[self.class_index]
    }

    /// Domain of the target when it is nominal
    pub fn class_domain(&self) -> Option<&NominalDomain> {
        self.class_attribute().domain()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name() == name)
    }

    /// Relation name used for the training dataset
    pub fn training_relation(&self) -> String {
        format!("{}Training", self.class_attribute().name())
    }

    /// Relation name used for the prediction row
    pub fn testing_relation(&self) -> String {
        format!("{}Testing", self.class_attribute().name())
    }
}
