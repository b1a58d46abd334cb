//! Plugin hooks around a validation attempt
//!
//! Plugins are built per field for each attempt. `before_validate` hooks run
//! in registration order and the first veto abandons the attempt before any
//! constraint is evaluated. `after_validate` hooks observe a completed pass
//! and cannot change it.

use crate::config::EngineConfig;
use crate::error::{Result, ValidationError};
use crate::field::{keys, FieldAdapter, FieldLookup};
use crate::pipeline::ValidationPass;
use crate::value::OptionValue;
use std::collections::BTreeSet;

/// Event types that fire on every keystroke or selection change
const RAPID_FIRE: [&str; 2] = ["keyup", "change"];

/// The interaction that triggered a validation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationEvent {
    event_type: String,
}

impl ValidationEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }
}

/// What a `before_validate` hook decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResult {
    Proceed,
    Veto,
}

/// Decision of the whole chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainDecision {
    Proceed,
    Vetoed { plugin: &'static str },
}

/// Everything a `before_validate` hook may look at
pub struct HookContext<'a> {
    pub event: &'a ValidationEvent,
    pub field: &'a dyn FieldAdapter,
    pub lookup: &'a dyn FieldLookup,
    pub manual_trigger: &'a str,
}

impl HookContext<'_> {
    fn is_manual(&self) -> bool {
        self.event.event_type() == self.manual_trigger
    }
}

/// A before/after hook pair attached to one field
pub trait Plugin {
    fn name(&self) -> &'static str;

    fn before_validate(&self, _ctx: &HookContext<'_>) -> HookResult {
        HookResult::Proceed
    }

    fn after_validate(&self, _field: &mut dyn FieldAdapter, _pass: &ValidationPass) {}
}

/// Builds a plugin for a field, or declines
pub type PluginFactory = Box<dyn Fn(&dyn FieldAdapter, &EngineConfig) -> Option<Box<dyn Plugin>>>;

/// Only proceed for events in the field's trigger set
pub struct Triggers {
    triggers: BTreeSet<String>,
}

impl Triggers {
    pub fn for_field(field: &dyn FieldAdapter, config: &EngineConfig) -> Self {
        Self {
            triggers: field.triggers(&config.manual_trigger),
        }
    }
}

impl Plugin for Triggers {
    fn name(&self) -> &'static str {
        "triggers"
    }

    fn before_validate(&self, ctx: &HookContext<'_>) -> HookResult {
        if self.triggers.contains(ctx.event.event_type()) {
            HookResult::Proceed
        } else {
            HookResult::Veto
        }
    }
}

/// Hold back keyup/change validation until the field has been validated once
///
/// Events the field declares as triggers are never delayed.
pub struct DelayedValidation {
    declared: BTreeSet<String>,
}

impl DelayedValidation {
    pub fn for_field(field: &dyn FieldAdapter) -> Self {
        Self {
            declared: field.declared_triggers(),
        }
    }
}

impl Plugin for DelayedValidation {
    fn name(&self) -> &'static str {
        "delayed-validation"
    }

    fn before_validate(&self, ctx: &HookContext<'_>) -> HookResult {
        let event = ctx.event.event_type();
        if ctx.field.validated_once() || ctx.is_manual() || self.declared.contains(event) {
            return HookResult::Proceed;
        }

        if RAPID_FIRE.contains(&event) {
            HookResult::Veto
        } else {
            HookResult::Proceed
        }
    }

    fn after_validate(&self, field: &mut dyn FieldAdapter, _pass: &ValidationPass) {
        field.set_option(keys::VALIDATED_ONCE, OptionValue::Bool(true));
    }
}

/// Wait for a minimum value length before the first pass
///
/// Not built for selection fields. The manual trigger is never held back.
pub struct ValidationMinLength {
    min: usize,
}

impl ValidationMinLength {
    pub fn for_field(field: &dyn FieldAdapter, config: &EngineConfig) -> Result<Option<Self>> {
        if field.is_selection() {
            return Ok(None);
        }

        let min = match field.option(keys::VALIDATION_MIN_LENGTH) {
            Some(value) => value
                .as_number()
                .filter(|n| *n >= 0.0 && n.fract() == 0.0)
                .map(|n| n as usize)
                .ok_or_else(|| {
                    ValidationError::invalid_option(
                        keys::VALIDATION_MIN_LENGTH,
                        format!("`{}` is not a length", value),
                    )
                })?,
            None => config.validation_minlength,
        };

        Ok(Some(Self { min }))
    }
}

impl Plugin for ValidationMinLength {
    fn name(&self) -> &'static str {
        "validation-min-length"
    }

    fn before_validate(&self, ctx: &HookContext<'_>) -> HookResult {
        if ctx.field.validated_once() || ctx.is_manual() {
            return HookResult::Proceed;
        }

        if ctx.field.value().chars().count() < self.min {
            HookResult::Veto
        } else {
            HookResult::Proceed
        }
    }
}

/// Wait until another field has completed a pass
pub struct ValidateAfter {
    target: String,
}

impl ValidateAfter {
    pub fn for_field(field: &dyn FieldAdapter) -> Option<Self> {
        field.option(keys::VALIDATE_AFTER).map(|target| Self {
            target: target.to_string(),
        })
    }
}

impl Plugin for ValidateAfter {
    fn name(&self) -> &'static str {
        "validate-after"
    }

    fn before_validate(&self, ctx: &HookContext<'_>) -> HookResult {
        match ctx.lookup.find_field(&self.target) {
            Some(other) if other.validated_once() => HookResult::Proceed,
            Some(_) => HookResult::Veto,
            None => {
                tracing::debug!(
                    field = %ctx.field.id(),
                    target = %self.target,
                    "validate-after target not found"
                );
                HookResult::Veto
            }
        }
    }
}

/// Plugins attached to one field, in registration order
#[derive(Default)]
pub struct PluginHookChain {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginHookChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in plugins for a field, followed by host plugins
    ///
    /// Fails when a plugin option on the field is malformed.
    pub fn for_field(
        field: &dyn FieldAdapter,
        config: &EngineConfig,
        extra: &[PluginFactory],
    ) -> Result<Self> {
        let mut chain = Self::new();
        chain.push(Box::new(Triggers::for_field(field, config)));
        chain.push(Box::new(DelayedValidation::for_field(field)));
        if let Some(plugin) = ValidationMinLength::for_field(field, config)? {
            chain.push(Box::new(plugin));
        }
        if let Some(plugin) = ValidateAfter::for_field(field) {
            chain.push(Box::new(plugin));
        }
        for factory in extra {
            if let Some(plugin) = factory(field, config) {
                chain.push(plugin);
            }
        }
        Ok(chain)
    }

    pub fn push(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run `before_validate` hooks until the first veto
    pub fn before_validate(&self, ctx: &HookContext<'_>) -> ChainDecision {
        for plugin in &self.plugins {
            if plugin.before_validate(ctx) == HookResult::Veto {
                return ChainDecision::Vetoed {
                    plugin: plugin.name(),
                };
            }
        }
        ChainDecision::Proceed
    }

    /// Run every `after_validate` hook
    pub fn after_validate(&self, field: &mut dyn FieldAdapter, pass: &ValidationPass) {
        for plugin in &self.plugins {
            plugin.after_validate(field, pass);
        }
    }
}
