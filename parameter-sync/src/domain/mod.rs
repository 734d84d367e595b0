use std::{fmt, str::FromStr};

use serde_derive::{Deserialize, Serialize};

const MAX_NAME_LENGTH: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParameterName(String);

impl ParameterName {
    pub fn new(name: impl Into<String>) -> Result<Self, ParameterError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ParameterError::MissingName);
        }
        if name.len() > MAX_NAME_LENGTH || name.chars().any(char::is_whitespace) {
            return Err(ParameterError::InvalidName(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final non-empty `/`-delimited segment, or the whole name when it has none.
    pub fn last_segment(&self) -> &str {
        self.0
            .split('/')
            .filter(|segment| !segment.is_empty())
            .next_back()
            .unwrap_or(&self.0)
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ParameterName {
    type Error = ParameterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParameterName> for String {
    fn from(name: ParameterName) -> Self {
        name.0
    }
}

impl FromStr for ParameterName {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Plain,
    List,
    Secret,
}

impl ParameterType {
    /// Name used by the remote service.
    pub fn as_remote_str(&self) -> &'static str {
        match self {
            Self::Plain => "String",
            Self::List => "StringList",
            Self::Secret => "SecureString",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_remote_str())
    }
}

impl FromStr for ParameterType {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" | "plain" => Ok(Self::Plain),
            "stringlist" | "list" => Ok(Self::List),
            "securestring" | "secret" => Ok(Self::Secret),
            _ => Err(ParameterError::UnknownType(s.to_string())),
        }
    }
}

pub fn default_description(name: &ParameterName) -> String {
    format!("Parameter for the key {}", name.last_segment())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    name: ParameterName,
    value: String,
    parameter_type: ParameterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Parameter {
    pub fn name(&self) -> &ParameterName {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn parameter_type(&self) -> ParameterType {
        self.parameter_type
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Listing entry as returned by one page of the remote listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMetadata {
    pub name: ParameterName,
    pub parameter_type: ParameterType,
    pub description: Option<String>,
}

impl ParameterMetadata {
    pub fn from_parameter(parameter: &Parameter) -> Self {
        Self {
            name: parameter.name.clone(),
            parameter_type: parameter.parameter_type,
            description: parameter.description.clone(),
        }
    }
}

/// Enumerated entry. `value` is only set when values were requested and the
/// fetch succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    pub name: ParameterName,
    pub parameter_type: ParameterType,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ParameterDescriptor {
    pub fn from_metadata(metadata: ParameterMetadata, value: Option<String>) -> Self {
        let description = metadata
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| default_description(&metadata.name));
        Self {
            name: metadata.name,
            parameter_type: metadata.parameter_type,
            description,
            value,
        }
    }

    /// Full parameter, if the value was resolved.
    pub fn to_parameter(&self) -> Option<Parameter> {
        let value = self.value.clone().filter(|v| !v.is_empty())?;
        Some(Parameter {
            name: self.name.clone(),
            value,
            parameter_type: self.parameter_type,
            description: Some(self.description.clone()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParameterPage {
    pub parameters: Vec<ParameterMetadata>,
    pub next_cursor: Option<PageCursor>,
}

pub struct ParameterBuilder {
    name: Option<String>,
    value: Option<String>,
    parameter_type: Option<ParameterType>,
    description: Option<String>,
}

impl ParameterBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            value: None,
            parameter_type: None,
            description: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn parameter_type(mut self, parameter_type: ParameterType) -> Self {
        self.parameter_type = Some(parameter_type);
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn build(self) -> Result<Parameter, ParameterError> {
        let name = ParameterName::new(self.name.ok_or(ParameterError::MissingName)?)?;
        let value = self.value.ok_or(ParameterError::MissingValue)?;
        if value.is_empty() {
            return Err(ParameterError::MissingValue);
        }
        Ok(Parameter {
            name,
            value,
            parameter_type: self.parameter_type.ok_or(ParameterError::MissingType)?,
            description: self.description.filter(|d| !d.is_empty()),
        })
    }
}

impl Default for ParameterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    MissingName,
    MissingValue,
    MissingType,
    InvalidName(String),
    UnknownType(String),
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "Parameter name is required"),
            Self::MissingValue => write!(f, "Parameter value is required"),
            Self::MissingType => write!(f, "Parameter type is required"),
            Self::InvalidName(name) => write!(f, "Invalid parameter name: '{}'", name),
            Self::UnknownType(t) => write!(
                f,
                "Unknown parameter type '{}'. Expected one of: String, StringList, SecureString",
                t
            ),
        }
    }
}

impl std::error::Error for ParameterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_creation() {
        let parameter = ParameterBuilder::new()
            .name("/app/db/password")
            .value("hunter2")
            .parameter_type(ParameterType::Secret)
            .build()
            .unwrap();

        assert_eq!(parameter.name().as_str(), "/app/db/password");
        assert_eq!(parameter.parameter_type(), ParameterType::Secret);
        assert_eq!(parameter.description(), None);
    }

    #[test]
    fn test_builder_missing_fields() {
        let result = ParameterBuilder::new().name("/app/db/password").build();
        assert_eq!(result.unwrap_err(), ParameterError::MissingValue);

        let result = ParameterBuilder::new()
            .name("/app/db/password")
            .value("x")
            .build();
        assert_eq!(result.unwrap_err(), ParameterError::MissingType);
    }

    #[test]
    fn test_builder_rejects_empty_value() {
        let result = ParameterBuilder::new()
            .name("/app/key")
            .value("")
            .parameter_type(ParameterType::Plain)
            .build();
        assert_eq!(result.unwrap_err(), ParameterError::MissingValue);
    }

    #[test]
    fn test_name_validation() {
        assert_eq!(ParameterName::new("").unwrap_err(), ParameterError::MissingName);
        assert!(matches!(
            ParameterName::new("/with space"),
            Err(ParameterError::InvalidName(_))
        ));
        assert!(ParameterName::new("plain-name").is_ok());
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(ParameterName::new("/a/b/c").unwrap().last_segment(), "c");
        assert_eq!(ParameterName::new("/a/b/").unwrap().last_segment(), "b");
        assert_eq!(ParameterName::new("flat").unwrap().last_segment(), "flat");
        assert_eq!(ParameterName::new("/").unwrap().last_segment(), "/");
    }

    #[test]
    fn test_parameter_type_parsing() {
        assert_eq!("String".parse::<ParameterType>().unwrap(), ParameterType::Plain);
        assert_eq!("stringlist".parse::<ParameterType>().unwrap(), ParameterType::List);
        assert_eq!("SecureString".parse::<ParameterType>().unwrap(), ParameterType::Secret);
        assert_eq!("secret".parse::<ParameterType>().unwrap(), ParameterType::Secret);
        assert_eq!(
            "Binary".parse::<ParameterType>().unwrap_err(),
            ParameterError::UnknownType("Binary".to_string())
        );
    }

    #[test]
    fn test_descriptor_synthesizes_description() {
        let metadata = ParameterMetadata {
            name: ParameterName::new("/service/api_key").unwrap(),
            parameter_type: ParameterType::Secret,
            description: None,
        };

        let descriptor = ParameterDescriptor::from_metadata(metadata, None);
        assert_eq!(descriptor.description, "Parameter for the key api_key");
        assert!(descriptor.to_parameter().is_none());
    }

    #[test]
    fn test_descriptor_keeps_remote_description() {
        let metadata = ParameterMetadata {
            name: ParameterName::new("/service/url").unwrap(),
            parameter_type: ParameterType::Plain,
            description: Some("Service URL".to_string()),
        };

        let descriptor =
            ParameterDescriptor::from_metadata(metadata, Some("https://x".to_string()));
        let parameter = descriptor.to_parameter().unwrap();
        assert_eq!(parameter.description(), Some("Service URL"));
        assert_eq!(parameter.value(), "https://x");
    }

    #[test]
    fn test_name_deserialization_validates() {
        let name: ParameterName = serde_json::from_str(r#""/a/b""#).unwrap();
        assert_eq!(name.as_str(), "/a/b");
        assert!(serde_json::from_str::<ParameterName>(r#""""#).is_err());
    }
}
