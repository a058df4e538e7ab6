//! Compiler option map and its typed accessors.
//!
//! Keys and values follow the Eclipse preference format
//! (`org.eclipse.jdt.core.compiler.*`), stored as plain strings in insertion order.

use crate::error::{ConversionError, Result};
use indexmap::IndexMap;
use jdt_bridge_api::{ApiLevel, ProblemId, Severity};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SOURCE: &str = "org.eclipse.jdt.core.compiler.source";
pub const COMPLIANCE: &str = "org.eclipse.jdt.core.compiler.compliance";
pub const ENABLE_PREVIEW: &str = "org.eclipse.jdt.core.compiler.problem.enablePreviewFeatures";
const PROBLEM_PREFIX: &str = "org.eclipse.jdt.core.compiler.problem.";

/// Java language release, as the number after `1.` for old spellings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JavaVersion(pub u32);

impl JavaVersion {
    pub const LATEST: JavaVersion = JavaVersion(21);

    /// Accepts `1.8`, `8`, `17`, ...; anything else is `None`.
    pub fn parse(value: &str) -> Option<JavaVersion> {
        let value = value.trim();
        let major = value.strip_prefix("1.").unwrap_or(value);
        let number: u32 = major.parse().ok()?;
        match number {
            1..=21 => Some(JavaVersion(number)),
            _ => None,
        }
    }
}

impl std::fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 < 9 {
            write!(f, "1.{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Irritant option suffix and the severity used when the option is absent.
fn irritant(id: ProblemId) -> Option<(&'static str, Severity)> {
    let entry = match id {
        ProblemId::RAW_TYPE_REFERENCE => ("rawTypeReference", Severity::Warning),
        ProblemId::UNSAFE_RAW_METHOD_INVOCATION => ("uncheckedTypeOperation", Severity::Warning),
        ProblemId::MISSING_SERIAL_VERSION => ("missingSerialVersion", Severity::Warning),
        ProblemId::UNNECESSARY_CAST => ("unnecessaryTypeCheck", Severity::Ignore),
        ProblemId::EMPTY_CONTROL_FLOW_STATEMENT => ("emptyStatement", Severity::Ignore),
        ProblemId::SHOULD_IMPLEMENT_HASHCODE => ("missingHashCodeMethod", Severity::Ignore),
        ProblemId::TYPE_MISSING_DEPRECATED_ANNOTATION
        | ProblemId::FIELD_MISSING_DEPRECATED_ANNOTATION
        | ProblemId::METHOD_MISSING_DEPRECATED_ANNOTATION => {
            ("missingDeprecatedAnnotation", Severity::Ignore)
        }
        ProblemId::NON_SERIALIZABLE_INSTANCE_FIELD => {
            ("nonSerializableInstanceField", Severity::Ignore)
        }
        ProblemId::JAVADOC_MISSING_PARAM_TAG
        | ProblemId::JAVADOC_MISSING_RETURN_TAG
        | ProblemId::JAVADOC_MISSING_THROWS_TAG => ("missingJavadocTags", Severity::Ignore),
        other if other.is_javadoc() => ("invalidJavadoc", Severity::Ignore),
        _ => return None,
    };
    Some(entry)
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct CompilerOptions {
    values: IndexMap<String, String>,
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses the `key=value` lines of an Eclipse `.prefs` file.
    pub fn from_prefs_str(text: &str) -> Result<Self> {
        let mut options = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConversionError::InvalidOption {
                    key: line.to_string(),
                    value: String::new(),
                });
            };
            options.set(key.trim(), value.trim());
        }
        Ok(options)
    }

    pub fn from_prefs_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_prefs_str(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn source_version(&self) -> JavaVersion {
        self.get(SOURCE)
            .and_then(JavaVersion::parse)
            .unwrap_or(JavaVersion::LATEST)
    }

    pub fn compliance(&self) -> JavaVersion {
        self.get(COMPLIANCE)
            .and_then(JavaVersion::parse)
            .unwrap_or_else(|| self.source_version())
    }

    pub fn preview_enabled(&self) -> bool {
        self.get(ENABLE_PREVIEW) == Some("enabled")
    }

    /// Configured severity of the irritant behind `id`, or `None` when the
    /// problem has no irritant.
    pub fn irritant_severity(&self, id: ProblemId) -> Option<Severity> {
        let (suffix, default) = irritant(id)?;
        let key = format!("{PROBLEM_PREFIX}{suffix}");
        match self.get(&key) {
            None => Some(default),
            Some(value) => match Severity::parse(value) {
                Some(severity) => Some(severity),
                None => {
                    tracing::warn!("Ignoring invalid severity {}={}", key, value);
                    Some(default)
                }
            },
        }
    }
}

/// Validates an API level ordinal taken from user input.
pub fn api_level(ordinal: u32) -> Result<ApiLevel> {
    Ok(ApiLevel::from_ordinal(ordinal)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_spellings() {
        assert_eq!(JavaVersion::parse("1.8"), Some(JavaVersion(8)));
        assert_eq!(JavaVersion::parse("17"), Some(JavaVersion(17)));
        assert_eq!(JavaVersion::parse("banana"), None);
        assert_eq!(JavaVersion(8).to_string(), "1.8");
        assert_eq!(JavaVersion(21).to_string(), "21");
    }

    #[test]
    fn test_compliance_falls_back_to_source() {
        let options = CompilerOptions::new().with(SOURCE, "11");
        assert_eq!(options.compliance(), JavaVersion(11));
        assert_eq!(CompilerOptions::new().source_version(), JavaVersion::LATEST);
    }

    #[test]
    fn test_irritant_defaults_and_overrides() {
        let options = CompilerOptions::new().with(
            "org.eclipse.jdt.core.compiler.problem.rawTypeReference",
            "error",
        );
        assert_eq!(
            options.irritant_severity(ProblemId::RAW_TYPE_REFERENCE),
            Some(Severity::Error)
        );
        assert_eq!(
            options.irritant_severity(ProblemId::UNNECESSARY_CAST),
            Some(Severity::Ignore)
        );
        assert_eq!(options.irritant_severity(ProblemId::UNDEFINED_TYPE), None);
    }

    #[test]
    fn test_malformed_prefs_line_is_rejected() {
        assert!(CompilerOptions::from_prefs_str("no separator here").is_err());
    }
}
