// File: src/field.rs
// Purpose: Field adapter contract and an in-memory field backed by attributes

use crate::value::{OptionMap, OptionValue};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Option names the engine reads or writes
pub mod keys {
    pub const REQUIRED: &str = "required";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const MIN_LENGTH: &str = "minlength";
    pub const MAX_LENGTH: &str = "maxlength";
    pub const RANGE: &str = "range";
    pub const RANGE_LENGTH: &str = "rangelength";
    pub const NOT_BLANK: &str = "notblank";
    pub const NOT_NULL: &str = "notnull";
    pub const REGEXP: &str = "regexp";
    pub const REGEXP_FLAG: &str = "regexp-flag";
    pub const TYPE: &str = "type";
    pub const PATTERN: &str = "pattern";
    pub const TRIGGER: &str = "trigger";
    pub const VALIDATORS: &str = "validators";
    pub const VALIDATED_ONCE: &str = "validated-once";
    pub const VALIDATION_MIN_LENGTH: &str = "validation-minlength";
    pub const VALIDATE_AFTER: &str = "validate-after";
    pub const ERROR_MESSAGE: &str = "error-message";
    pub const ERROR_CONTAINER_ID: &str = "error-container-id";
}

/// Stable identity of a field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// View over a field's configuration and current value
///
/// The engine only reads a field through a shared borrow while constraints
/// are detected and evaluated, so configuration cannot change mid-pass.
/// Writes (`set_option`) happen after the pass, from plugin hooks.
pub trait FieldAdapter {
    /// Identity of the underlying element
    fn id(&self) -> &FieldId;

    /// Decoded option value, falling back to engine-wide defaults
    fn option(&self, name: &str) -> Option<OptionValue>;

    /// Persist an option for later reads
    fn set_option(&mut self, name: &str, value: OptionValue);

    /// Current value as validators see it
    fn value(&self) -> String;

    /// Native attribute value (`required`, `min`, `max`, `pattern`, `type`, ...)
    fn attribute(&self, name: &str) -> Option<String>;

    /// Whether the field is a selection control (select, radio, checkbox)
    fn is_selection(&self) -> bool;

    /// Whether a boolean attribute is present
    fn has_flag(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Native type, overridden by a declared `type` option
    fn declared_type(&self) -> Option<String> {
        self.option(keys::TYPE)
            .map(|v| v.to_string())
            .or_else(|| self.attribute(keys::TYPE))
    }

    /// Event types listed in the `trigger` option
    fn declared_triggers(&self) -> BTreeSet<String> {
        self.option(keys::TRIGGER)
            .map(|v| v.to_string().split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Declared triggers merged with the always-on ones
    fn triggers(&self, manual_trigger: &str) -> BTreeSet<String> {
        let mut triggers = self.declared_triggers();
        triggers.insert("keyup".to_string());
        if self.is_selection() {
            triggers.insert("change".to_string());
        }
        triggers.insert(manual_trigger.to_string());
        triggers
    }

    /// Whether the field has completed at least one validation pass
    fn validated_once(&self) -> bool {
        self.option(keys::VALIDATED_ONCE)
            .map(|v| v.to_bool())
            .unwrap_or(false)
    }
}

/// Resolves a target name to the field it belongs to
pub trait FieldLookup {
    fn find_field(&self, target: &str) -> Option<&dyn FieldAdapter>;
}

/// Lookup that never finds anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFields;

impl FieldLookup for NoFields {
    fn find_field(&self, _target: &str) -> Option<&dyn FieldAdapter> {
        None
    }
}

impl FieldLookup for HashMap<String, FieldAttrs> {
    fn find_field(&self, target: &str) -> Option<&dyn FieldAdapter> {
        self.get(target).map(|f| f as &dyn FieldAdapter)
    }
}

/// In-memory field: native HTML attributes plus declared options
///
/// # Example
///
/// ```
/// use rhtmx_validation::FieldAttrs;
///
/// let field = FieldAttrs::new("age")
///     .attr("type", "number")
///     .attr("min", "18")
///     .data("max", "120")
///     .with_value("42");
/// ```
#[derive(Debug, Clone)]
pub struct FieldAttrs {
    id: FieldId,
    tag: String,
    /// HTML5 native attributes (e.g., "required", "min", "type")
    pub html5_attrs: BTreeMap<String, String>,
    /// Declared validation options
    pub options: OptionMap,
    defaults: OptionMap,
    value: String,
}

impl FieldAttrs {
    /// Create an `<input>` field with no attributes
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: FieldId::new(id),
            tag: "input".to_string(),
            html5_attrs: BTreeMap::new(),
            options: OptionMap::new(),
            defaults: OptionMap::new(),
            value: String::new(),
        }
    }

    /// Create a `<select>` field
    pub fn select(id: impl Into<String>) -> Self {
        Self {
            tag: "select".to_string(),
            ..Self::new(id)
        }
    }

    /// Set a native attribute; boolean attributes use an empty value
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.html5_attrs.insert(name.to_string(), value.to_string());
        self
    }

    /// Declare an option from its raw attribute text
    pub fn data(mut self, name: &str, raw: &str) -> Self {
        self.options.insert(name.to_string(), OptionValue::decode(raw));
        self
    }

    /// Declare an already-typed option
    pub fn option_value(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.options.insert(name.to_string(), value.into());
        self
    }

    /// Engine-wide option defaults used when the field has no override
    pub fn with_defaults(mut self, defaults: &OptionMap) -> Self {
        self.defaults = defaults.clone();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl FieldAdapter for FieldAttrs {
    fn id(&self) -> &FieldId {
        &self.id
    }

    fn option(&self, name: &str) -> Option<OptionValue> {
        self.options
            .get(name)
            .or_else(|| self.defaults.get(name))
            .cloned()
    }

    fn set_option(&mut self, name: &str, value: OptionValue) {
        self.options.insert(name.to_string(), value);
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.html5_attrs.get(name).cloned()
    }

    fn is_selection(&self) -> bool {
        self.tag == "select"
            || matches!(
                self.html5_attrs.get(keys::TYPE).map(String::as_str),
                Some("radio") | Some("checkbox")
            )
    }
}
