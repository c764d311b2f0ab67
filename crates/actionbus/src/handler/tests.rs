//! Unit tests for handlers and the handler catalogue.

use std::sync::{Arc, Mutex};

use super::*;
use crate::name::{ActionName, CategoryName};
use crate::resolver::ActionId;
use crate::value::Value;

fn sample_event() -> ActionEvent {
    ActionEvent::new(
        ActionId::from_raw(1),
        ActionName::new("ExampleAction").expect("action name"),
        CategoryName::new("ScriptCategory").expect("category name"),
        vec![Value::from("foo"), Value::from(2), Value::from(-65536)],
    )
}

#[test]
fn closures_are_handlers() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler = move |event: &ActionEvent| -> Result<(), HandlerError> {
        sink.lock()
            .expect("lock")
            .push(event.name().as_str().to_owned());
        Ok(())
    };

    handler.handle(&sample_event()).expect("handle");
    assert_eq!(*seen.lock().expect("lock"), vec!["ExampleAction"]);
}

#[test]
fn log_handler_accepts_any_payload() {
    assert!(LogHandler.handle(&sample_event()).is_ok());
}

#[test]
fn builtin_catalogue_contains_log_handler() {
    let catalog = HandlerCatalog::with_builtins();
    assert!(catalog.contains(LOG_HANDLER));
    assert_eq!(catalog.names().collect::<Vec<_>>(), vec![LOG_HANDLER]);
}

#[test]
fn insert_replaces_existing_handler() {
    let mut catalog = HandlerCatalog::new();
    let first: Arc<dyn Handler> = Arc::new(LogHandler);
    assert!(catalog.insert("custom", first).is_none());
    let second: Arc<dyn Handler> =
        Arc::new(|_: &ActionEvent| -> Result<(), HandlerError> { Ok(()) });
    assert!(catalog.insert("custom", second).is_some());
    assert!(catalog.get("custom").is_some());
}

#[test]
fn handler_error_keeps_message() {
    let error = HandlerError::new("boom");
    assert_eq!(error.message(), "boom");
    assert_eq!(error.to_string(), "boom");
}

#[test]
fn catalogue_debug_lists_names() {
    let rendered = format!("{:?}", HandlerCatalog::with_builtins());
    assert!(rendered.contains("log"), "unexpected debug output: {rendered}");
}
