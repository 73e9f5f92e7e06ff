//! Tests for the Field reference validatable and its built-in rules.

use std::sync::Arc;

use formwork::prelude::*;
use log::LevelFilter;
use simplelog::{Config, SimpleLogger};

fn init_logger() {
    let _ = SimpleLogger::init(LevelFilter::Trace, Config::default());
}

#[test]
fn test_rule_less_field_is_always_valid() {
    let field = Field::new("anything".to_string());

    assert!(matches!(field.validate(), Validation::Ready(true)));
    assert!(!field.has_error());

    field.set("something else".to_string());
    assert_eq!(field.value(), "something else");
    assert!(matches!(field.validate(), Validation::Ready(true)));
}

#[tokio::test]
async fn test_rule_less_field_in_form() {
    let form = Form::new();
    form.bind(Arc::new(Field::new(true)));
    form.bind(Arc::new(Field::new(Some(3usize))));

    assert!(form.validate().await.is_valid());
}

#[test]
fn test_required_rejects_blank() {
    let field = Field::builder(String::new())
        .required("Name is required")
        .build();

    assert!(matches!(field.validate(), Validation::Ready(false)));
    assert_eq!(field.error().as_deref(), Some("Name is required"));

    field.set("   ".to_string());
    assert!(matches!(field.validate(), Validation::Ready(false)));

    field.set("Ada".to_string());
    assert!(matches!(field.validate(), Validation::Ready(true)));
    assert!(!field.has_error());
}

#[test]
fn test_length_rules_count_characters() {
    let field = Field::builder(String::new())
        .min_length(3, "too short")
        .max_length(5, "too long")
        .build();

    field.set("héllo".to_string());
    assert!(matches!(field.validate(), Validation::Ready(true)));

    field.set("hé".to_string());
    assert!(matches!(field.validate(), Validation::Ready(false)));
    assert_eq!(field.error().as_deref(), Some("too short"));

    field.set("toolong".to_string());
    assert!(matches!(field.validate(), Validation::Ready(false)));
    assert_eq!(field.error().as_deref(), Some("too long"));
}

#[test]
fn test_pattern_rule() {
    let field = Field::builder("abc123".to_string())
        .pattern(r"^[a-z]+$", "lowercase only")
        .build();

    assert!(matches!(field.validate(), Validation::Ready(false)));

    field.set("abc".to_string());
    assert!(matches!(field.validate(), Validation::Ready(true)));
}

#[test]
fn test_email_rule_passes_empty() {
    let field = Field::builder(String::new())
        .email("invalid email")
        .build();

    // Empty is valid; required() covers non-empty.
    assert!(matches!(field.validate(), Validation::Ready(true)));

    field.set("not-an-email".to_string());
    assert!(matches!(field.validate(), Validation::Ready(false)));

    field.set("ada@example.com".to_string());
    assert!(matches!(field.validate(), Validation::Ready(true)));
}

#[test]
fn test_equals_rule() {
    let field = Field::builder("hunter2".to_string())
        .equals("hunter2".to_string(), "passwords must match")
        .build();
    assert!(matches!(field.validate(), Validation::Ready(true)));

    field.set("hunter3".to_string());
    assert!(matches!(field.validate(), Validation::Ready(false)));
}

#[test]
fn test_checkbox_rules() {
    let field = Field::builder(false).checked("must accept terms").build();
    assert!(matches!(field.validate(), Validation::Ready(false)));

    field.set(true);
    assert!(matches!(field.validate(), Validation::Ready(true)));
}

#[test]
fn test_selected_rule() {
    let field: Field<Option<usize>> =
        Field::builder(None).selected("pick an option").build();
    assert!(matches!(field.validate(), Validation::Ready(false)));

    field.set(Some(2));
    assert!(matches!(field.validate(), Validation::Ready(true)));
}

#[test]
fn test_reset_validation_clears_error() {
    let field = Field::builder(String::new()).required("required").build();

    assert!(matches!(field.validate(), Validation::Ready(false)));
    assert!(field.has_error());

    field.reset_validation();
    assert!(!field.has_error());

    // Idempotent.
    field.reset_validation();
    assert!(!field.has_error());
}

#[test]
fn test_async_rules_defer() {
    let field = Field::builder("taken".to_string())
        .rule_async(|_name| async move { false }, "name already taken")
        .build();

    assert!(field.validate().is_pending());
}

#[tokio::test]
async fn test_field_in_form_end_to_end() {
    init_logger();

    let form = Form::new();
    let mut rx = form.subscribe();

    let name = Field::builder(String::new())
        .required("Name is required")
        .build();
    let email = Field::builder("ada@example.com".to_string())
        .email("invalid email")
        .rule_async(|_addr| async move { true }, "address not deliverable")
        .build();

    let name_id = form.bind(Arc::new(name.clone()));
    form.bind(Arc::new(email.clone()));

    let result = form.validate().await;
    assert_eq!(result, FormValidation::Invalid(name_id));
    assert_eq!(name.error().as_deref(), Some("Name is required"));
    assert!(!email.has_error());

    // Error focus lands on the offending field.
    assert!(name.take_focus_request());
    assert!(!email.take_focus_request());

    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    assert!(matches!(events[..], [FormEvent::ValidationError(id)] if id == name_id));

    name.set("Ada".to_string());
    assert!(form.validate().await.is_valid());
    assert!(!name.has_error());
}

#[tokio::test]
async fn test_failing_async_rule_sets_error() {
    let form = Form::new();
    let username = Field::builder("admin".to_string())
        .rule_async(|name| async move { name != "admin" }, "name already taken")
        .build();
    let id = form.bind(Arc::new(username.clone()));

    assert_eq!(form.validate().await, FormValidation::Invalid(id));
    assert_eq!(username.error().as_deref(), Some("name already taken"));
}
