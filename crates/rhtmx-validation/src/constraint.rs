//! Constraint names, message keys and per-constraint outcomes

use crate::patterns::TypeKind;
use crate::value::OptionValue;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Name of a constraint, built-in or registered by the host
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintName {
    Required,
    Min,
    Max,
    MinLength,
    MaxLength,
    Range,
    RangeLength,
    NotBlank,
    NotNull,
    Regexp,
    Type,
    Custom(String),
}

impl ConstraintName {
    /// Built-in constraints in registry order
    pub const BUILTIN: [ConstraintName; 11] = [
        ConstraintName::Required,
        ConstraintName::Min,
        ConstraintName::Max,
        ConstraintName::MinLength,
        ConstraintName::MaxLength,
        ConstraintName::Range,
        ConstraintName::RangeLength,
        ConstraintName::NotBlank,
        ConstraintName::NotNull,
        ConstraintName::Regexp,
        ConstraintName::Type,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ConstraintName::Required => "required",
            ConstraintName::Min => "min",
            ConstraintName::Max => "max",
            ConstraintName::MinLength => "minlength",
            ConstraintName::MaxLength => "maxlength",
            ConstraintName::Range => "range",
            ConstraintName::RangeLength => "rangelength",
            ConstraintName::NotBlank => "notblank",
            ConstraintName::NotNull => "notnull",
            ConstraintName::Regexp => "regexp",
            ConstraintName::Type => "type",
            ConstraintName::Custom(name) => name.as_str(),
        }
    }

    /// Resolve a name; anything that is not built-in is a custom constraint
    pub fn parse(name: &str) -> Self {
        Self::BUILTIN
            .iter()
            .find(|builtin| builtin.as_str() == name)
            .cloned()
            .unwrap_or_else(|| ConstraintName::Custom(name.to_string()))
    }

    /// Presence constraints stay applicable to empty values
    pub fn is_presence(&self) -> bool {
        matches!(
            self,
            ConstraintName::Required | ConstraintName::NotBlank | ConstraintName::NotNull
        )
    }
}

impl fmt::Display for ConstraintName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed key into the message catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKey {
    Required,
    NotNull,
    NotBlank,
    Min,
    Max,
    Range,
    MinLength,
    MaxLength,
    RangeLength,
    Regexp,
    Type(TypeKind),
    Custom(String),
}

impl MessageKey {
    /// Dotted catalog path, e.g. `type.email`
    pub fn dotted(&self) -> Cow<'_, str> {
        match self {
            MessageKey::Required => Cow::Borrowed("required"),
            MessageKey::NotNull => Cow::Borrowed("notnull"),
            MessageKey::NotBlank => Cow::Borrowed("notblank"),
            MessageKey::Min => Cow::Borrowed("min"),
            MessageKey::Max => Cow::Borrowed("max"),
            MessageKey::Range => Cow::Borrowed("range"),
            MessageKey::MinLength => Cow::Borrowed("minlength"),
            MessageKey::MaxLength => Cow::Borrowed("maxlength"),
            MessageKey::RangeLength => Cow::Borrowed("rangelength"),
            MessageKey::Regexp => Cow::Borrowed("regexp"),
            MessageKey::Type(kind) => Cow::Owned(format!("type.{}", kind.as_str())),
            MessageKey::Custom(key) => Cow::Borrowed(key.as_str()),
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

/// Placeholder values for a message template
pub type Params = BTreeMap<String, OptionValue>;

/// Result of one constraint against one value
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub constraint: ConstraintName,
    pub valid: bool,
    pub message_key: MessageKey,
    pub params: Params,
}

impl Outcome {
    pub fn new(constraint: ConstraintName, valid: bool, message_key: MessageKey) -> Self {
        Self {
            constraint,
            valid,
            message_key,
            params: Params::new(),
        }
    }

    pub fn with_param(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }
}
