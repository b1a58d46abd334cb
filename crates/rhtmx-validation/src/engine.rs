//! Validation engine entry point
//!
//! One call runs `before_validate` hooks, detects and evaluates constraints,
//! aggregates the pass and then runs `after_validate` hooks, all to
//! completion. A configuration error stops the call before any hook has
//! written to the field.

use crate::aggregator::{aggregate, Instruction, Verdict};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::field::{keys, FieldAdapter, FieldAttrs, FieldLookup};
use crate::messages::{FieldMessages, MessageCatalog};
use crate::pipeline::{ValidationPass, ValidatorPipeline};
use crate::plugins::{ChainDecision, HookContext, PluginFactory, PluginHookChain, ValidationEvent};
use crate::presenter::{ContainerIds, Presenter, UuidIds};
use crate::registry::ConstraintRegistry;

/// What one validation attempt produced
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub verdict: Verdict,
    /// Plugin that abandoned the attempt, if any
    pub vetoed_by: Option<&'static str>,
    pub pass: ValidationPass,
    pub instructions: Vec<Instruction>,
}

impl ValidationReport {
    fn vetoed(plugin: &'static str) -> Self {
        Self {
            verdict: Verdict::Unknown,
            vetoed_by: Some(plugin),
            pass: ValidationPass::new(),
            instructions: Vec::new(),
        }
    }

    /// `None` when the attempt was vetoed or nothing applied
    pub fn is_valid(&self) -> Option<bool> {
        self.verdict.is_valid()
    }

    pub fn is_vetoed(&self) -> bool {
        self.vetoed_by.is_some()
    }
}

/// Attribute-driven field validator
pub struct Engine {
    config: EngineConfig,
    registry: ConstraintRegistry,
    catalog: MessageCatalog,
    plugins: Vec<PluginFactory>,
    container_ids: ContainerIds<UuidIds>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let registry = ConstraintRegistry::builtin(config.strict_empty_values);
        let catalog = config.catalog();
        let container_ids = ContainerIds::new(UuidIds::new(config.container_id_prefix.clone()));
        Self {
            config,
            registry,
            catalog,
            plugins: Vec::new(),
            container_ids,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register custom constraints here
    pub fn registry_mut(&mut self) -> &mut ConstraintRegistry {
        &mut self.registry
    }

    pub fn catalog_mut(&mut self) -> &mut MessageCatalog {
        &mut self.catalog
    }

    /// Attach a plugin built for every field after the built-in ones
    pub fn add_plugin(&mut self, factory: PluginFactory) {
        self.plugins.push(factory);
    }

    /// The explicit manual-trigger event
    pub fn manual_event(&self) -> ValidationEvent {
        ValidationEvent::new(self.config.manual_trigger.clone())
    }

    /// Error container identifier for a field, assigned on first request
    pub fn error_container_id(&mut self, field: &mut dyn FieldAdapter) -> String {
        self.container_ids.get_or_create(field)
    }

    /// In-memory field carrying the engine-wide option defaults
    pub fn field(&self, id: impl Into<String>) -> FieldAttrs {
        FieldAttrs::new(id).with_defaults(&self.config.defaults)
    }

    /// Validate a field in response to an event
    ///
    /// Configuration errors propagate; failed constraints do not, they are
    /// part of the report.
    pub fn validate(
        &self,
        field: &mut dyn FieldAdapter,
        event: &ValidationEvent,
        lookup: &dyn FieldLookup,
    ) -> Result<ValidationReport> {
        let chain = PluginHookChain::for_field(&*field, &self.config, &self.plugins)
            .map_err(|e| {
                tracing::warn!(field = %field.id(), "Invalid field declaration: {}", e);
                e
            })?;

        let decision = chain.before_validate(&HookContext {
            event,
            field: &*field,
            lookup,
            manual_trigger: &self.config.manual_trigger,
        });
        if let ChainDecision::Vetoed { plugin } = decision {
            tracing::debug!(
                field = %field.id(),
                event = event.event_type(),
                plugin,
                "validation vetoed"
            );
            return Ok(ValidationReport::vetoed(plugin));
        }

        let value = field.value();
        let applicable = self.registry.detect(&*field).map_err(|e| {
            tracing::warn!(field = %field.id(), "Invalid field declaration: {}", e);
            e
        })?;
        let order = field.option(keys::VALIDATORS).map(|v| v.to_string());
        let pass = ValidatorPipeline::new(applicable, order.as_deref()).run(&value);

        // Messages render before the field is marked validated
        let aggregation = aggregate(&pass, &FieldMessages::new(&self.catalog, &*field))?;
        chain.after_validate(field, &pass);

        tracing::debug!(
            field = %field.id(),
            event = event.event_type(),
            verdict = %aggregation.verdict,
            outcomes = pass.len(),
            "validation pass complete"
        );

        Ok(ValidationReport {
            verdict: aggregation.verdict,
            vetoed_by: None,
            pass,
            instructions: aggregation.instructions,
        })
    }

    /// Validate, then hand the resulting instructions to a presenter
    pub fn validate_and_present(
        &self,
        field: &mut dyn FieldAdapter,
        event: &ValidationEvent,
        lookup: &dyn FieldLookup,
        presenter: &mut dyn Presenter,
    ) -> Result<ValidationReport> {
        let report = self.validate(field, event, lookup)?;
        for instruction in &report.instructions {
            instruction.apply(presenter, field.id());
        }
        Ok(report)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::FieldState;
    use crate::constraint::{ConstraintName, MessageKey, Outcome};
    use crate::error::ValidationError;
    use crate::field::NoFields;
    use crate::registry::Validator;

    #[test]
    fn test_no_constraints_no_verdict() {
        let engine = Engine::default();
        let mut field = engine.field("name").with_value("anything");
        let report = engine
            .validate(&mut field, &engine.manual_event(), &NoFields)
            .unwrap();
        assert_eq!(report.verdict, Verdict::Unknown);
        assert_eq!(report.is_valid(), None);
        assert!(!report.is_vetoed());
        assert!(report.instructions.is_empty());
    }

    #[test]
    fn test_veto_skips_pipeline() {
        let engine = Engine::default();
        let mut field = engine.field("name").attr("required", "");
        let report = engine
            .validate(&mut field, &ValidationEvent::new("keyup"), &NoFields)
            .unwrap();
        assert_eq!(report.vetoed_by, Some("delayed-validation"));
        assert!(report.pass.is_empty());
        assert!(!field.validated_once());
    }

    #[test]
    fn test_completed_pass_marks_validated_once() {
        let engine = Engine::default();
        let mut field = engine.field("name").attr("required", "");
        let report = engine
            .validate(&mut field, &engine.manual_event(), &NoFields)
            .unwrap();
        assert_eq!(report.verdict, Verdict::Invalid);
        assert_eq!(
            report.instructions.last(),
            Some(&Instruction::SetFieldState(FieldState::Error))
        );
        assert!(field.validated_once());
    }

    #[test]
    fn test_defaults_reach_fields() {
        let config = EngineConfig::from_toml_str(
            r#"
            [defaults]
            trigger = "focusout"
            "#,
        )
        .unwrap();
        let engine = Engine::new(config);
        let mut field = engine.field("name").attr("required", "").with_value("hello");
        let report = engine
            .validate(&mut field, &ValidationEvent::new("focusout"), &NoFields)
            .unwrap();
        assert_eq!(report.verdict, Verdict::Valid);
    }

    #[test]
    fn test_missing_message_leaves_field_unvalidated() {
        let mut engine = Engine::default();
        engine.registry_mut().register(
            ConstraintName::Custom("never".to_string()),
            Box::new(|_: &dyn FieldAdapter| -> Result<Option<Validator>> {
                Ok(Some(Box::new(|_: &str| {
                    Outcome::new(
                        ConstraintName::Custom("never".to_string()),
                        false,
                        MessageKey::Custom("never".to_string()),
                    )
                })))
            }),
        );
        let mut field = engine.field("name").with_value("hello");

        let err = engine
            .validate(&mut field, &engine.manual_event(), &NoFields)
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingMessage(ref k) if k == "never"));
        assert!(!field.validated_once());
    }

    #[test]
    fn test_malformed_plugin_option_propagates() {
        let engine = Engine::default();
        let mut field = engine
            .field("name")
            .attr("required", "")
            .data("validation-minlength", "short")
            .with_value("hello");
        assert!(engine
            .validate(&mut field, &engine.manual_event(), &NoFields)
            .is_err());
        assert!(!field.validated_once());
    }

    #[test]
    fn test_error_container_ids_use_configured_prefix() {
        let config = EngineConfig::from_toml_str(r#"container_id_prefix = "errs-""#).unwrap();
        let mut engine = Engine::new(config);
        let mut email = engine.field("email");
        let mut name = engine.field("name");

        let id = engine.error_container_id(&mut email);
        assert!(id.starts_with("errs-"));
        assert_eq!(engine.error_container_id(&mut email), id);
        assert_ne!(engine.error_container_id(&mut name), id);
    }

    #[test]
    fn test_configuration_error_propagates() {
        let engine = Engine::default();
        let mut field = engine.field("name").data("type", "colour").with_value("red");
        assert!(engine
            .validate(&mut field, &engine.manual_event(), &NoFields)
            .is_err());
        assert!(!field.validated_once());
    }
}
