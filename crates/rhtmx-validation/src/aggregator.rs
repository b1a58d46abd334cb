//! Folding a validation pass into a verdict and presentation instructions

use crate::constraint::ConstraintName;
use crate::error::Result;
use crate::field::FieldId;
use crate::messages::FieldMessages;
use crate::pipeline::ValidationPass;
use crate::presenter::Presenter;
use std::fmt;

/// Pass-level result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No constraint applied, or the attempt was vetoed
    Unknown,
    Valid,
    Invalid,
}

impl Verdict {
    /// `Invalid` if any outcome failed, `Valid` otherwise, `Unknown` when empty
    pub fn of(pass: &ValidationPass) -> Self {
        if pass.is_empty() {
            Verdict::Unknown
        } else if pass.failures().next().is_some() {
            Verdict::Invalid
        } else {
            Verdict::Valid
        }
    }

    /// `None` when there is no verdict
    pub fn is_valid(&self) -> Option<bool> {
        match self {
            Verdict::Unknown => None,
            Verdict::Valid => Some(true),
            Verdict::Invalid => Some(false),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Unknown => f.write_str("unknown"),
            Verdict::Valid => f.write_str("valid"),
            Verdict::Invalid => f.write_str("invalid"),
        }
    }
}

/// Visual state of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Success,
    Error,
}

/// One change for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    AddError {
        constraint: ConstraintName,
        message: String,
    },
    RemoveError {
        constraint: ConstraintName,
    },
    RemoveAllErrors,
    SetFieldState(FieldState),
}

impl Instruction {
    pub fn apply(&self, presenter: &mut dyn Presenter, field: &FieldId) {
        match self {
            Instruction::AddError {
                constraint,
                message,
            } => presenter.add_error(field, constraint, message),
            Instruction::RemoveError { constraint } => presenter.remove_error(field, constraint),
            Instruction::RemoveAllErrors => presenter.remove_all_errors(field),
            Instruction::SetFieldState(state) => presenter.set_field_state(field, *state),
        }
    }
}

/// Verdict plus the instructions that present it
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub verdict: Verdict,
    pub instructions: Vec<Instruction>,
}

/// Turn a pass into error add/remove instructions and a verdict
///
/// Outcomes are visited in pass order. A valid pass ends by clearing every
/// error and marking success; an invalid one marks the field as errored
/// without touching the errors added above. An empty pass yields nothing.
pub fn aggregate(pass: &ValidationPass, messages: &FieldMessages<'_>) -> Result<Aggregation> {
    let verdict = Verdict::of(pass);
    if verdict == Verdict::Unknown {
        return Ok(Aggregation {
            verdict,
            instructions: Vec::new(),
        });
    }

    let mut instructions = Vec::with_capacity(pass.len() + 2);
    for outcome in pass {
        if outcome.valid {
            instructions.push(Instruction::RemoveError {
                constraint: outcome.constraint.clone(),
            });
        } else {
            instructions.push(Instruction::AddError {
                constraint: outcome.constraint.clone(),
                message: messages.render(outcome)?,
            });
        }
    }

    match verdict {
        Verdict::Valid => {
            instructions.push(Instruction::RemoveAllErrors);
            instructions.push(Instruction::SetFieldState(FieldState::Success));
        }
        Verdict::Invalid => instructions.push(Instruction::SetFieldState(FieldState::Error)),
        Verdict::Unknown => {}
    }

    Ok(Aggregation {
        verdict,
        instructions,
    })
}
