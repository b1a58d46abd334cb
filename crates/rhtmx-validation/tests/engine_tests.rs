//! Integration tests for rhtmx-validation
//!
//! Drives the engine through its public API the way a page would: fields
//! built from attributes, events delivered one at a time, errors rendered
//! into an in-memory board.

use pretty_assertions::assert_eq;
use rhtmx_validation::*;
use rstest::rstest;
use std::collections::HashMap;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn keyup() -> ValidationEvent {
    ValidationEvent::new("keyup")
}

#[test]
fn test_field_without_constraints_has_no_verdict() {
    init_tracing();
    let engine = Engine::default();
    let mut board = ErrorBoard::new();
    let mut field = engine.field("nickname").with_value("zed");

    let report = engine
        .validate_and_present(&mut field, &engine.manual_event(), &NoFields, &mut board)
        .unwrap();

    assert_eq!(report.verdict, Verdict::Unknown);
    assert_eq!(report.is_valid(), None);
    assert!(report.instructions.is_empty());
    assert!(board.field(field.id()).is_none());
}

#[test]
fn test_validating_twice_yields_identical_pass() {
    let engine = Engine::default();
    let mut field = engine
        .field("age")
        .attr("type", "number")
        .data("min", "18")
        .data("max", "99")
        .with_value("120");

    let first = engine
        .validate(&mut field, &engine.manual_event(), &NoFields)
        .unwrap();
    let second = engine
        .validate(&mut field, &engine.manual_event(), &NoFields)
        .unwrap();

    assert_eq!(first.pass, second.pass);
    assert_eq!(first.instructions, second.instructions);
    assert_eq!(first.verdict, Verdict::Invalid);
}

#[test]
fn test_declared_order_drives_error_order() {
    let engine = Engine::default();
    let mut board = ErrorBoard::new();
    let mut field = engine
        .field("qty")
        .data("min", "10")
        .data("max", "5")
        .data("validators", "max min")
        .with_value("7");

    let report = engine
        .validate_and_present(&mut field, &engine.manual_event(), &NoFields, &mut board)
        .unwrap();

    assert_eq!(report.pass.names(), vec!["max", "min"]);
    assert_eq!(
        board.messages(field.id()),
        vec![
            "This value should be lower than or equal to 5.",
            "This value should be greater than or equal to 10.",
        ]
    );
}

#[rstest]
#[case("email", "not-an-email", false)]
#[case("email", "a@b.co", true)]
#[case("url", "example.com", true)]
#[case("urlstrict", "example.com", false)]
#[case("digits", "12a", false)]
#[case("dateIso", "2024-06-30", true)]
#[case("alphanum", "a b", false)]
#[case("phone", "+1 555 123 4567", true)]
#[case("number", "-3.25", true)]
fn test_type_constraint(#[case] kind: &str, #[case] value: &str, #[case] valid: bool) {
    let engine = Engine::default();
    let mut field = engine.field("f").data("type", kind).with_value(value);

    let report = engine
        .validate(&mut field, &engine.manual_event(), &NoFields)
        .unwrap();
    let outcome = report.pass.get(&ConstraintName::Type).unwrap();

    assert_eq!(outcome.valid, valid);
    assert_eq!(outcome.message_key.dotted(), format!("type.{}", kind));
}

#[rstest]
#[case("15", true)]
#[case("10", true)]
#[case("20", true)]
#[case("21", false)]
#[case("9.5", false)]
fn test_range_constraint(#[case] value: &str, #[case] valid: bool) {
    let engine = Engine::default();
    let mut field = engine.field("score").data("range", "[10, 20]").with_value(value);

    let report = engine
        .validate(&mut field, &engine.manual_event(), &NoFields)
        .unwrap();
    let outcome = report.pass.get(&ConstraintName::Range).unwrap();

    assert_eq!(outcome.valid, valid);
    assert_eq!(outcome.params.get("min"), Some(&OptionValue::Number(10.0)));
    assert_eq!(outcome.params.get("max"), Some(&OptionValue::Number(20.0)));
}

#[test]
fn test_delayed_validation_lifecycle() {
    init_tracing();
    let engine = Engine::default();
    let mut board = ErrorBoard::new();
    let mut field = engine.field("email").attr("type", "email").with_value("bob@");

    // first keystroke on a fresh field is held back
    let report = engine
        .validate_and_present(&mut field, &keyup(), &NoFields, &mut board)
        .unwrap();
    assert_eq!(report.vetoed_by, Some("delayed-validation"));
    assert_eq!(report.is_valid(), None);
    assert!(board.field(field.id()).is_none());

    // the manual trigger always proceeds
    let report = engine
        .validate_and_present(&mut field, &engine.manual_event(), &NoFields, &mut board)
        .unwrap();
    assert_eq!(report.verdict, Verdict::Invalid);
    assert_eq!(board.state(field.id()), Some(FieldState::Error));
    assert_eq!(
        board.messages(field.id()),
        vec!["This value should be a valid email."]
    );

    // later keystrokes validate live
    field.set_value("bob@example.com");
    let report = engine
        .validate_and_present(&mut field, &keyup(), &NoFields, &mut board)
        .unwrap();
    assert_eq!(report.verdict, Verdict::Valid);
    assert_eq!(board.state(field.id()), Some(FieldState::Success));
    assert!(!board.has_errors(field.id()));
}

#[test]
fn test_errors_resolve_individually() {
    let engine = Engine::default();
    let mut board = ErrorBoard::new();
    let mut field = engine
        .field("username")
        .data("minlength", "4")
        .data("type", "alphanum")
        .with_value("a b");

    engine
        .validate_and_present(&mut field, &engine.manual_event(), &NoFields, &mut board)
        .unwrap();
    assert_eq!(board.messages(field.id()).len(), 2);

    field.set_value("a bcd");
    let report = engine
        .validate_and_present(&mut field, &engine.manual_event(), &NoFields, &mut board)
        .unwrap();
    assert_eq!(report.verdict, Verdict::Invalid);
    assert_eq!(
        board.messages(field.id()),
        vec!["This value should be alphanumeric."]
    );
}

#[test]
fn test_empty_optional_field_is_not_flagged() {
    let engine = Engine::default();
    let mut field = engine.field("site").attr("type", "url");

    let report = engine
        .validate(&mut field, &engine.manual_event(), &NoFields)
        .unwrap();
    assert_eq!(report.verdict, Verdict::Unknown);

    let mut required = engine.field("site").attr("type", "url").attr("required", "");
    let report = engine
        .validate(&mut required, &engine.manual_event(), &NoFields)
        .unwrap();
    assert_eq!(report.pass.names(), vec!["required"]);
    assert_eq!(report.verdict, Verdict::Invalid);
}

#[test]
fn test_strict_empty_values_flags_empty_typed_field() {
    let config = EngineConfig::from_toml_str("strict_empty_values = true").unwrap();
    let engine = Engine::new(config);
    let mut field = engine.field("site").attr("type", "url");

    let report = engine
        .validate(&mut field, &engine.manual_event(), &NoFields)
        .unwrap();
    assert_eq!(report.verdict, Verdict::Invalid);
}

#[test]
fn test_validate_after_other_field() {
    let engine = Engine::default();
    let mut form: HashMap<String, FieldAttrs> = HashMap::new();
    form.insert(
        "password".to_string(),
        engine.field("password").attr("required", "").with_value("hunter22"),
    );
    let mut confirm = engine
        .field("confirm")
        .data("validate-after", "password")
        .attr("required", "")
        .with_value("hunter22");

    let report = engine
        .validate(&mut confirm, &engine.manual_event(), &form)
        .unwrap();
    assert_eq!(report.vetoed_by, Some("validate-after"));

    if let Some(password) = form.get_mut("password") {
        engine
            .validate(password, &engine.manual_event(), &NoFields)
            .unwrap();
    }
    let report = engine
        .validate(&mut confirm, &engine.manual_event(), &form)
        .unwrap();
    assert_eq!(report.verdict, Verdict::Valid);
}

#[test]
fn test_configuration_error_is_isolated_to_its_field() {
    let engine = Engine::default();
    let mut broken = engine.field("code").data("regexp", "([a-z]").with_value("abc");
    let mut healthy = engine.field("name").attr("required", "").with_value("abc");

    let err = engine
        .validate(&mut broken, &engine.manual_event(), &NoFields)
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidPattern { .. }));

    let report = engine
        .validate(&mut healthy, &engine.manual_event(), &NoFields)
        .unwrap();
    assert_eq!(report.verdict, Verdict::Valid);
}

#[test]
fn test_custom_constraint_with_catalog_entry() {
    let mut engine = Engine::default();
    engine.registry_mut().register(
        ConstraintName::Custom("equalto".to_string()),
        Box::new(|field: &dyn FieldAdapter| -> Result<Option<Validator>> {
            let Some(expected) = field.option("equalto") else {
                return Ok(None);
            };
            let expected = expected.to_string();
            Ok(Some(Box::new(move |value: &str| {
                Outcome::new(
                    ConstraintName::Custom("equalto".to_string()),
                    value == expected,
                    MessageKey::Custom("custom.equalto".to_string()),
                )
                .with_param("expected", expected.as_str())
            })))
        }),
    );
    engine
        .catalog_mut()
        .insert("custom.equalto", "This value should be {expected}.");

    let mut board = ErrorBoard::new();
    let mut field = engine.field("answer").data("equalto", "yes").with_value("no");
    engine
        .validate_and_present(&mut field, &engine.manual_event(), &NoFields, &mut board)
        .unwrap();

    assert_eq!(board.messages(field.id()), vec!["This value should be yes."]);
}

#[test]
fn test_config_messages_and_field_overrides() {
    let config = EngineConfig::from_toml_str(
        r#"
        [messages]
        required = "Please fill in {field}."
        "#,
    )
    .unwrap();
    let engine = Engine::new(config);
    let mut board = ErrorBoard::new();

    let mut plain = engine.field("a").attr("required", "");
    engine
        .validate_and_present(&mut plain, &engine.manual_event(), &NoFields, &mut board)
        .unwrap();
    assert_eq!(board.messages(plain.id()), vec!["Please fill in {field}."]);

    let mut overridden = engine
        .field("b")
        .attr("required", "")
        .data("required-message", "We need this one.");
    engine
        .validate_and_present(&mut overridden, &engine.manual_event(), &NoFields, &mut board)
        .unwrap();
    assert_eq!(board.messages(overridden.id()), vec!["We need this one."]);
}

#[test]
fn test_container_ids_across_fields() {
    let mut engine = Engine::default();
    let mut email = engine.field("email");
    let mut name = engine.field("name").data("error-container-id", "name-errors");

    let email_id = engine.error_container_id(&mut email);
    assert!(email_id.starts_with("rhtmx-errors-"));
    assert_eq!(engine.error_container_id(&mut email), email_id);
    assert_eq!(
        email.option("error-container-id"),
        Some(OptionValue::Text(email_id.clone()))
    );
    assert_eq!(engine.error_container_id(&mut name), "name-errors");
}

#[test]
fn test_sequential_container_ids() {
    let engine = Engine::default();
    let mut ids = ContainerIds::new(SequentialIds::new(engine.config().container_id_prefix.clone()));
    let mut email = engine.field("email");
    let mut name = engine.field("name");

    let email_id = ids.get_or_create(&mut email);
    assert_eq!(email_id, "rhtmx-errors-1");
    assert_ne!(ids.get_or_create(&mut name), email_id);
}

#[test]
fn test_selection_change_lifecycle() {
    init_tracing();
    let engine = Engine::default();
    let mut board = ErrorBoard::new();
    let change = ValidationEvent::new("change");
    let mut country = FieldAttrs::select("country")
        .with_defaults(&engine.config().defaults)
        .attr("required", "");

    // a fresh selection waits for its first pass
    let report = engine
        .validate_and_present(&mut country, &change, &NoFields, &mut board)
        .unwrap();
    assert_eq!(report.vetoed_by, Some("delayed-validation"));
    assert!(!country.validated_once());

    let report = engine
        .validate_and_present(&mut country, &engine.manual_event(), &NoFields, &mut board)
        .unwrap();
    assert_eq!(report.verdict, Verdict::Invalid);

    // afterwards every change validates, with no minimum length
    country.set_value("f");
    let report = engine
        .validate_and_present(&mut country, &change, &NoFields, &mut board)
        .unwrap();
    assert_eq!(report.verdict, Verdict::Valid);
    assert_eq!(board.state(country.id()), Some(FieldState::Success));
}

#[test]
fn test_change_on_text_input_is_not_a_trigger() {
    let engine = Engine::default();
    let mut name = engine.field("name").attr("required", "").with_value("hello");
    engine
        .validate(&mut name, &engine.manual_event(), &NoFields)
        .unwrap();

    let report = engine
        .validate(&mut name, &ValidationEvent::new("change"), &NoFields)
        .unwrap();
    assert_eq!(report.vetoed_by, Some("triggers"));

    let mut declared = engine
        .field("name")
        .attr("required", "")
        .data("trigger", "change")
        .with_value("hello");
    let report = engine
        .validate(&mut declared, &ValidationEvent::new("change"), &NoFields)
        .unwrap();
    assert_eq!(report.verdict, Verdict::Valid);
}

#[test]
fn test_regexp_matches_declared_text() {
    let engine = Engine::default();
    let mut field = engine.field("code").data("regexp", "007").with_value("7");

    let report = engine
        .validate(&mut field, &engine.manual_event(), &NoFields)
        .unwrap();
    let outcome = report.pass.get(&ConstraintName::Regexp).unwrap();
    assert!(!outcome.valid);
    assert_eq!(outcome.params.get("pattern"), Some(&OptionValue::from("007")));
}

#[test]
fn test_whitespace_does_not_satisfy_required() {
    let engine = Engine::default();
    let mut field = engine.field("name").attr("required", "").with_value("   ");

    let report = engine
        .validate(&mut field, &engine.manual_event(), &NoFields)
        .unwrap();
    assert_eq!(report.verdict, Verdict::Invalid);
}
