// File: src/pipeline.rs
// Purpose: Ordering and execution of applicable validators

use crate::constraint::{ConstraintName, Outcome};
use crate::registry::{Applicable, Validator};

/// Outcomes of one pipeline run, in execution order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationPass {
    outcomes: Vec<Outcome>,
}

impl ValidationPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// Outcome for a constraint, if it ran
    pub fn get(&self, name: &ConstraintName) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| &o.constraint == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter()
    }

    /// Constraint names in pass order
    pub fn names(&self) -> Vec<&str> {
        self.outcomes.iter().map(|o| o.constraint.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcomes with `valid == false`
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.valid)
    }
}

impl<'a> IntoIterator for &'a ValidationPass {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

/// Ordered validators for one field
pub struct ValidatorPipeline {
    validators: Applicable,
}

impl ValidatorPipeline {
    /// Order applicable validators
    ///
    /// With a declared order (whitespace-separated names) only constraints
    /// that are both declared and applicable run, in declared order. Without
    /// one, registry order is kept.
    pub fn new(applicable: Applicable, declared_order: Option<&str>) -> Self {
        let Some(order) = declared_order else {
            return Self {
                validators: applicable,
            };
        };

        let mut remaining: Vec<Option<(ConstraintName, Validator)>> =
            applicable.into_iter().map(Some).collect();
        let mut validators = Applicable::new();

        for declared in order.split_whitespace() {
            let slot = remaining.iter_mut().find(|slot| {
                slot.as_ref()
                    .map_or(false, |(name, _)| name.as_str() == declared)
            });

            match slot.and_then(Option::take) {
                Some(entry) => validators.push(entry),
                None => tracing::debug!(
                    constraint = declared,
                    "declared validator is not applicable, skipping"
                ),
            }
        }

        Self { validators }
    }

    /// Constraint names in execution order
    pub fn names(&self) -> Vec<&str> {
        self.validators.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Evaluate every validator against the value
    ///
    /// Does not stop at the first failure; every applicable constraint
    /// contributes an outcome.
    pub fn run(&self, value: &str) -> ValidationPass {
        let mut pass = ValidationPass::new();
        for (name, validator) in &self.validators {
            let outcome = validator(value);
            tracing::trace!(constraint = %name, valid = outcome.valid, "validator executed");
            pass.push(outcome);
        }
        pass
    }
}
