//! Crate-level integration and BDD tests.

use std::sync::{Arc, Mutex};

use crate::bootstrap::run_init;
use crate::event::ActionEvent;
use crate::handler::{Handler, HandlerCatalog, HandlerError};
use crate::manifest::{Manifest, ManifestBootstrap};
use crate::registry::ActionRegistry;
use crate::value::Value;


/// Deliveries observed by [`recorder`], as `(handler label, action, payload)`.
pub(crate) type Deliveries = Arc<Mutex<Vec<(String, String, Vec<Value>)>>>;

/// Builds a handler that appends every delivery to `log` under `label`.
pub(crate) fn recorder(log: &Deliveries, label: &str) -> Arc<dyn Handler> {
    let sink = Arc::clone(log);
    let tag = label.to_owned();
    Arc::new(move |event: &ActionEvent| -> Result<(), HandlerError> {
        sink.lock().expect("lock").push((
            tag.clone(),
            event.name().as_str().to_owned(),
            event.data().to_vec(),
        ));
        Ok(())
    })
}

#[test]
fn example_manifest_drives_named_handler_end_to_end() {
    let log: Deliveries = Arc::default();
    let mut catalog = HandlerCatalog::with_builtins();
    catalog.insert("record", recorder(&log, "record"));

    let manifest = Manifest::from_yaml_str(
        "assignments:\n  - action: ExampleAction\n    category: ScriptCategory\n\
         subscriptions:\n  - category: ScriptCategory\n    handler: log\n  - category: ScriptCategory\n    handler: record\n\
         posts:\n  - action: ExampleAction\n    data: [foo, 2, -65536]\n",
    )
    .expect("parse");
    let mut registry = ActionRegistry::new();

    assert!(run_init(
        &ManifestBootstrap::new(manifest, catalog),
        &mut registry
    ));

    let deliveries = log.lock().expect("lock").clone();
    assert_eq!(
        deliveries,
        vec![(
            "record".to_owned(),
            "ExampleAction".to_owned(),
            vec![Value::from("foo"), Value::from(2), Value::from(-65536)],
        )]
    );
}
