//! Message catalog and placeholder formatting
//!
//! Templates live in a nested catalog addressed by dotted keys
//! (`type.email` is the `email` entry of the `type` group) and use
//! `{name}` placeholders filled from an outcome's params.

use crate::constraint::{MessageKey, Outcome, Params};
use crate::error::{Result, ValidationError};
use crate::field::{keys, FieldAdapter};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A template, or a group of nested entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogEntry {
    Text(String),
    Group(BTreeMap<String, CatalogEntry>),
}

/// Nested message templates
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageCatalog {
    root: BTreeMap<String, CatalogEntry>,
}

const ENGLISH: &[(&str, &str)] = &[
    ("default", "This value seems to be invalid."),
    ("required", "This value is required."),
    ("notnull", "This value should not be null."),
    ("notblank", "This value should not be blank."),
    ("min", "This value should be greater than or equal to {min}."),
    ("max", "This value should be lower than or equal to {max}."),
    ("range", "This value should be between {min} and {max}."),
    (
        "minlength",
        "This value is too short. It should have {min} characters or more.",
    ),
    (
        "maxlength",
        "This value is too long. It should have {max} characters or less.",
    ),
    (
        "rangelength",
        "This value length is invalid. It should be between {min} and {max} characters long.",
    ),
    ("regexp", "This value seems to be invalid."),
    ("type.alphanum", "This value should be alphanumeric."),
    ("type.dateIso", "This value should be a valid date (YYYY-MM-DD)."),
    ("type.digits", "This value should be digits."),
    ("type.email", "This value should be a valid email."),
    ("type.number", "This value should be a valid number."),
    ("type.phone", "This value should be a valid phone number."),
    ("type.url", "This value should be a valid url."),
    ("type.urlstrict", "This value should be a valid url."),
];

impl MessageCatalog {
    /// Catalog with no entries
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in English templates for every built-in message key
    pub fn english() -> Self {
        let mut catalog = Self::empty();
        for (key, template) in ENGLISH {
            catalog.insert(key, template);
        }
        catalog
    }

    /// Insert a template under a dotted key, creating groups as needed
    pub fn insert(&mut self, dotted: &str, template: &str) {
        let mut segments: Vec<&str> = dotted.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut group = &mut self.root;
        for segment in segments {
            let entry = group
                .entry(segment.to_string())
                .or_insert_with(|| CatalogEntry::Group(BTreeMap::new()));
            if let CatalogEntry::Text(_) = entry {
                *entry = CatalogEntry::Group(BTreeMap::new());
            }
            let CatalogEntry::Group(children) = entry else {
                return;
            };
            group = children;
        }

        group.insert(last.to_string(), CatalogEntry::Text(template.to_string()));
    }

    /// Deep-merge entries over this catalog; later entries win
    pub fn merge(&mut self, entries: &BTreeMap<String, CatalogEntry>) {
        for (path, template) in flatten(entries) {
            self.insert(&path, &template);
        }
    }

    /// Template under a dotted key
    pub fn lookup(&self, dotted: &str) -> Result<&str> {
        let mut group = &self.root;
        let mut segments = dotted.split('.').peekable();

        while let Some(segment) = segments.next() {
            match (group.get(segment), segments.peek()) {
                (Some(CatalogEntry::Text(template)), None) => return Ok(template.as_str()),
                (Some(CatalogEntry::Group(children)), Some(_)) => group = children,
                _ => break,
            }
        }

        Err(ValidationError::MissingMessage(dotted.to_string()))
    }

    /// Render the template for a key with its params
    pub fn render(&self, key: &MessageKey, params: &Params) -> Result<String> {
        Ok(format(self.lookup(&key.dotted())?, params))
    }
}

fn flatten(entries: &BTreeMap<String, CatalogEntry>) -> Vec<(String, String)> {
    let mut flat = Vec::new();
    for (key, entry) in entries {
        match entry {
            CatalogEntry::Text(template) => flat.push((key.clone(), template.clone())),
            CatalogEntry::Group(children) => {
                for (path, template) in flatten(children) {
                    flat.push((format!("{}.{}", key, path), template));
                }
            }
        }
    }
    flat
}

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());

/// Substitute `{name}` placeholders from params
///
/// Placeholder names are matched literally. All placeholders are replaced in
/// one scan, so substituted text is never rescanned; placeholders with no
/// param are left as they are.
pub fn format(template: &str, params: &Params) -> String {
    if params.is_empty() {
        return template.to_string();
    }

    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| {
            params
                .get(&caps[1])
                .map(|value| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Message rendering for one field, honoring its message overrides
///
/// `<constraint>-message` overrides one constraint, `error-message` every
/// constraint on the field. Overrides are templates too.
pub struct FieldMessages<'a> {
    catalog: &'a MessageCatalog,
    field: &'a dyn FieldAdapter,
}

impl<'a> FieldMessages<'a> {
    pub fn new(catalog: &'a MessageCatalog, field: &'a dyn FieldAdapter) -> Self {
        Self { catalog, field }
    }

    pub fn render(&self, outcome: &Outcome) -> Result<String> {
        let own_key = format!("{}-message", outcome.constraint);
        let custom = self
            .field
            .option(&own_key)
            .or_else(|| self.field.option(keys::ERROR_MESSAGE));

        match custom {
            Some(template) => Ok(format(&template.to_string(), &outcome.params)),
            None => self.catalog.render(&outcome.message_key, &outcome.params),
        }
    }
}
