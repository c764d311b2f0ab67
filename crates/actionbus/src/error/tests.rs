//! Unit tests for registry and bootstrap error types.

use std::sync::Arc;

use camino::Utf8PathBuf;
use rstest::rstest;

use super::*;

#[test]
fn invalid_name_message_includes_kind_and_value() {
    let error = ActionError::InvalidName {
        kind: NameKind::Category,
        value: "   ".into(),
    };
    let message = error.to_string();
    assert!(
        message.contains("category"),
        "expected kind in message: {message}"
    );
    assert!(
        message.contains("must not be empty"),
        "expected reason in message: {message}"
    );
}

#[test]
fn unknown_subscription_message_includes_id() {
    let error = ActionError::UnknownSubscription {
        id: SubscriptionId::from_raw(42),
    };
    assert!(error.to_string().contains("42"));
}

#[rstest]
#[case::unknown_handler(
    BootstrapError::UnknownHandler {
        category: "ScriptCategory".into(),
        handler: "missing".into(),
    },
    "missing"
)]
#[case::unrecognized_post(
    BootstrapError::UnrecognizedPost {
        action: "Ghost".into(),
    },
    "Ghost"
)]
#[case::handler_failures(
    BootstrapError::HandlerFailures {
        action: "ExampleAction".into(),
        count: 3,
    },
    "3 handler(s)"
)]
#[case::parse(
    BootstrapError::ParseManifest {
        message: "unexpected key".into(),
    },
    "unexpected key"
)]
fn bootstrap_error_message_includes_detail(
    #[case] error: BootstrapError,
    #[case] expected: &str,
) {
    let message = error.to_string();
    assert!(
        message.contains(expected),
        "expected '{expected}' in message: {message}"
    );
}

#[test]
fn read_manifest_error_exposes_source() {
    let error = BootstrapError::ReadManifest {
        path: Utf8PathBuf::from("/missing/bootstrap.yaml"),
        source: Arc::new(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        )),
    };
    assert!(error.to_string().contains("/missing/bootstrap.yaml"));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn registration_error_converts_from_action_error() {
    let error: BootstrapError = ActionError::InvalidName {
        kind: NameKind::Action,
        value: String::new(),
    }
    .into();
    assert!(matches!(error, BootstrapError::Registration(_)));
}

#[test]
fn name_kind_displays_lowercase() {
    assert_eq!(NameKind::Action.to_string(), "action");
    assert_eq!(NameKind::Category.as_str(), "category");
}
