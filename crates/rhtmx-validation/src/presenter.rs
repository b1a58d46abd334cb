//! Presentation contract and error container identifiers
//!
//! The engine never renders anything itself. It hands
//! [`Instruction`](crate::Instruction)s to a [`Presenter`]; every presenter
//! operation must be idempotent.

use crate::aggregator::FieldState;
use crate::constraint::ConstraintName;
use crate::field::{keys, FieldAdapter, FieldId};
use crate::value::OptionValue;
use std::collections::{HashMap, HashSet};

/// Receives error state changes for fields
pub trait Presenter {
    /// Show an error for a constraint, replacing any previous message
    fn add_error(&mut self, field: &FieldId, constraint: &ConstraintName, message: &str);

    /// Drop the error for a constraint; no-op when absent
    fn remove_error(&mut self, field: &FieldId, constraint: &ConstraintName);

    fn remove_all_errors(&mut self, field: &FieldId);

    fn set_field_state(&mut self, field: &FieldId, state: FieldState);
}

/// Errors and state shown for one field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBoard {
    errors: Vec<(ConstraintName, String)>,
    state: Option<FieldState>,
}

impl FieldBoard {
    /// Displayed `(constraint, message)` pairs, in insertion order
    pub fn errors(&self) -> &[(ConstraintName, String)] {
        &self.errors
    }

    pub fn state(&self) -> Option<FieldState> {
        self.state
    }
}

/// In-memory presenter keeping what would be on screen
#[derive(Debug, Default)]
pub struct ErrorBoard {
    fields: HashMap<FieldId, FieldBoard>,
}

impl ErrorBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: &FieldId) -> Option<&FieldBoard> {
        self.fields.get(field)
    }

    /// Messages currently shown for a field
    pub fn messages(&self, field: &FieldId) -> Vec<&str> {
        self.fields
            .get(field)
            .map(|board| board.errors.iter().map(|(_, m)| m.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn state(&self, field: &FieldId) -> Option<FieldState> {
        self.fields.get(field).and_then(|board| board.state)
    }

    pub fn has_errors(&self, field: &FieldId) -> bool {
        self.fields
            .get(field)
            .map_or(false, |board| !board.errors.is_empty())
    }
}

impl Presenter for ErrorBoard {
    fn add_error(&mut self, field: &FieldId, constraint: &ConstraintName, message: &str) {
        let board = self.fields.entry(field.clone()).or_default();
        match board.errors.iter_mut().find(|(name, _)| name == constraint) {
            Some(entry) => entry.1 = message.to_string(),
            None => board
                .errors
                .push((constraint.clone(), message.to_string())),
        }
    }

    fn remove_error(&mut self, field: &FieldId, constraint: &ConstraintName) {
        if let Some(board) = self.fields.get_mut(field) {
            board.errors.retain(|(name, _)| name != constraint);
        }
    }

    fn remove_all_errors(&mut self, field: &FieldId) {
        if let Some(board) = self.fields.get_mut(field) {
            board.errors.clear();
        }
    }

    fn set_field_state(&mut self, field: &FieldId, state: FieldState) {
        self.fields.entry(field.clone()).or_default().state = Some(state);
    }
}

/// Source of fresh identifiers
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Deterministic identifiers: `<prefix>1`, `<prefix>2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Random v4 UUID identifiers
#[derive(Debug, Clone)]
pub struct UuidIds {
    prefix: String,
}

impl UuidIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl IdSource for UuidIds {
    fn next_id(&mut self) -> String {
        format!("{}{}", self.prefix, uuid::Uuid::new_v4().simple())
    }
}

/// Get-or-create error container identifiers, one per field
///
/// An identifier is assigned at most once per field and never handed to two
/// fields. It is also written to the field's `error-container-id` option.
#[derive(Debug)]
pub struct ContainerIds<S: IdSource> {
    source: S,
    assigned: HashMap<FieldId, String>,
    issued: HashSet<String>,
}

impl<S: IdSource> ContainerIds<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            assigned: HashMap::new(),
            issued: HashSet::new(),
        }
    }

    /// Identifier already assigned to a field
    pub fn get(&self, field: &FieldId) -> Option<&str> {
        self.assigned.get(field).map(String::as_str)
    }

    pub fn get_or_create(&mut self, field: &mut dyn FieldAdapter) -> String {
        if let Some(id) = self.assigned.get(field.id()) {
            return id.clone();
        }

        // A field may bring its own identifier, unless another field holds it
        let declared = field
            .option(keys::ERROR_CONTAINER_ID)
            .map(|v| v.to_string())
            .filter(|id| !id.is_empty() && !self.issued.contains(id));

        let id = match declared {
            Some(id) => id,
            None => loop {
                let candidate = self.source.next_id();
                if !self.issued.contains(&candidate) {
                    break candidate;
                }
            },
        };

        self.issued.insert(id.clone());
        self.assigned.insert(field.id().clone(), id.clone());
        field.set_option(keys::ERROR_CONTAINER_ID, OptionValue::Text(id.clone()));
        id
    }
}
