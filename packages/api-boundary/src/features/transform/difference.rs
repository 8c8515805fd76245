//! Differences reported by the diffing engine

use std::fmt;

/// Engine difference codes the transforms react to
pub mod codes {
    pub const FIELD_REMOVED: &str = "java.field.removed";
    pub const FIELD_TYPE_CHANGED: &str = "java.field.typeChanged";
    pub const METHOD_REMOVED: &str = "java.method.removed";
    pub const METHOD_ADDED: &str = "java.method.added";
    pub const METHOD_NUMBER_OF_PARAMETERS_CHANGED: &str = "java.method.numberOfParametersChanged";
    pub const METHOD_PARAMETER_TYPE_CHANGED: &str = "java.method.parameterTypeChanged";
    pub const METHOD_RETURN_TYPE_CHANGED: &str = "java.method.returnTypeChanged";
    pub const METHOD_ADDED_TO_INTERFACE: &str = "java.method.addedToInterface";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    pub code: String,
    pub description: String,
}

impl Difference {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}
