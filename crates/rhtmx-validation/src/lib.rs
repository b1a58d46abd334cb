//! RHTMX Field Validation
//!
//! Attribute-driven validation engine for interactive form fields. Given a
//! field's native attributes and declared options, the engine decides which
//! constraints apply, evaluates them against the current value and produces
//! an ordered pass plus add/remove error instructions for the presentation
//! layer.
//!
//! ## Example
//!
//! ```rust
//! use rhtmx_validation::{Engine, ErrorBoard, FieldAdapter, NoFields, Verdict};
//!
//! let engine = Engine::default();
//! let mut field = engine
//!     .field("age")
//!     .attr("required", "")
//!     .data("range", "[18, 120]")
//!     .with_value("12");
//!
//! let mut board = ErrorBoard::new();
//! let report = engine
//!     .validate_and_present(&mut field, &engine.manual_event(), &NoFields, &mut board)
//!     .unwrap();
//!
//! assert_eq!(report.verdict, Verdict::Invalid);
//! assert_eq!(
//!     board.messages(field.id()),
//!     vec!["This value should be between 18 and 120."]
//! );
//! ```

pub mod aggregator;
pub mod config;
pub mod constraint;
pub mod engine;
pub mod error;
pub mod field;
pub mod messages;
pub mod patterns;
pub mod pipeline;
pub mod plugins;
pub mod presenter;
pub mod registry;
pub mod value;

pub use aggregator::{aggregate, Aggregation, FieldState, Instruction, Verdict};
pub use config::EngineConfig;
pub use constraint::{ConstraintName, MessageKey, Outcome, Params};
pub use engine::{Engine, ValidationReport};
pub use error::{Result, ValidationError};
pub use field::{FieldAdapter, FieldAttrs, FieldId, FieldLookup, NoFields};
pub use messages::{format, CatalogEntry, FieldMessages, MessageCatalog};
pub use patterns::TypeKind;
pub use pipeline::{ValidationPass, ValidatorPipeline};
pub use plugins::{
    ChainDecision, HookContext, HookResult, Plugin, PluginFactory, PluginHookChain,
    ValidationEvent,
};
pub use presenter::{ContainerIds, ErrorBoard, IdSource, Presenter, SequentialIds, UuidIds};
pub use registry::{ConstraintRegistry, Detector, Validator};
pub use value::{OptionMap, OptionValue};
