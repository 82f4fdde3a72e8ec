// tests/intake_test.rs
use std::cell::Cell;

use pkg_publish::intake::{
    ApplicationRecord, ApplicationStore, FormKind, InMemoryStore, IntakeHandler, IntakeRequest,
    IdGenerator, NoopNotifier, Notifier, NotifyError, StoreError, UuidGenerator,
};
use serde_json::Value;

struct FixedIds(&'static str);

impl IdGenerator for FixedIds {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

struct FailingNotifier {
    calls: Cell<usize>,
}

impl Notifier for FailingNotifier {
    fn notify(&self, _record: &ApplicationRecord) -> Result<(), NotifyError> {
        self.calls.set(self.calls.get() + 1);
        Err(NotifyError("mailbox unreachable".to_string()))
    }
}

struct BrokenStore;

impl ApplicationStore for BrokenStore {
    fn insert_if_absent(&self, _record: ApplicationRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    fn get(&self, _id: &str) -> Option<ApplicationRecord> {
        None
    }
}

const COMMUNITY_BODY: &str = r#"{
    "name": "Dana Levi",
    "email": "dana@example.org",
    "github": "danalevi",
    "project_idea": "A CLI for release automation"
}"#;

fn body_json(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[test]
fn test_options_returns_cors_preflight() {
    let handler = IntakeHandler::new(FormKind::Community, InMemoryStore::new(), NoopNotifier, UuidGenerator);
    let response = handler.handle(&IntakeRequest::options());

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "");
    assert_eq!(response.header("access-control-allow-origin"), Some("*"));
    assert_eq!(response.header("Access-Control-Allow-Methods"), Some("POST, OPTIONS"));
}

#[test]
fn test_valid_submission_is_stored_and_acknowledged() {
    let handler = IntakeHandler::new(FormKind::Community, InMemoryStore::new(), NoopNotifier, FixedIds("app-1"));
    let response = handler.handle(&IntakeRequest::post(COMMUNITY_BODY));

    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    let body = body_json(&response.body);
    assert_eq!(body["message"], "Application received");
    assert_eq!(body["id"], "app-1");

    let record = handler.store().get("app-1").unwrap();
    assert_eq!(record.status, "pending");
    assert_eq!(record.kind, FormKind::Community);
    assert_eq!(record.field("github"), Some("danalevi"));
    assert_eq!(record.field("language"), Some("not specified"));
}

#[test]
fn test_missing_email_names_the_field() {
    let handler = IntakeHandler::new(FormKind::Community, InMemoryStore::new(), NoopNotifier, UuidGenerator);
    let response = handler.handle(&IntakeRequest::post(
        r#"{"name": "Dana", "github": "dana", "project_idea": "x"}"#,
    ));

    assert_eq!(response.status, 400);
    let error = body_json(&response.body)["error"].as_str().unwrap().to_string();
    assert!(error.contains("email"), "got: {}", error);
    assert!(!error.contains("github"));
    assert!(handler.store().is_empty());
}

#[test]
fn test_malformed_input_is_rejected() {
    let handler = IntakeHandler::new(FormKind::Contact, InMemoryStore::new(), NoopNotifier, UuidGenerator);

    let cases = [
        ("not json", "Invalid JSON body"),
        (r#"{"name": "Dana", "email": "dana@", "phone": "0501234567"}"#, "Invalid email address"),
        (r#"{"name": "Dana", "email": "d@x.io", "phone": "12345"}"#, "Invalid phone number"),
    ];
    for (body, expected) in cases {
        let response = handler.handle(&IntakeRequest::post(body));
        assert_eq!(response.status, 400, "body: {}", body);
        assert_eq!(body_json(&response.body)["error"], expected);
    }

    let missing_body = handler.handle(&IntakeRequest {
        method: "POST".to_string(),
        body: None,
    });
    assert_eq!(missing_body.status, 400);
    assert!(handler.store().is_empty());
}

#[test]
fn test_restricted_form_validates_national_id() {
    let handler = IntakeHandler::new(FormKind::Restricted, InMemoryStore::new(), NoopNotifier, FixedIds("r-1"));

    let bad = handler.handle(&IntakeRequest::post(
        r#"{"name": "Dana", "email": "d@x.io", "phone": "050-123-4567", "israeli_id": "12ab", "role": "dev"}"#,
    ));
    assert_eq!(bad.status, 400);
    assert_eq!(body_json(&bad.body)["error"], "Invalid Israeli ID");

    let good = handler.handle(&IntakeRequest::post(
        r#"{"name": "Dana", "email": "d@x.io", "phone": "050-123-4567", "israeli_id": "123456782", "role": "dev"}"#,
    ));
    assert_eq!(good.status, 200);
    assert_eq!(handler.store().get("r-1").unwrap().field("phone"), Some("0501234567"));
}

#[test]
fn test_id_collision_never_overwrites() {
    let handler = IntakeHandler::new(FormKind::Community, InMemoryStore::new(), NoopNotifier, FixedIds("dup"));
    assert_eq!(handler.handle(&IntakeRequest::post(COMMUNITY_BODY)).status, 200);

    let second = handler.handle(&IntakeRequest::post(
        r#"{"name": "Someone Else", "email": "else@example.org", "github": "else", "project_idea": "y"}"#,
    ));

    assert_eq!(second.status, 500);
    assert_eq!(body_json(&second.body)["error"], "Internal server error");
    assert_eq!(handler.store().len(), 1);
    assert_eq!(handler.store().get("dup").unwrap().field("name"), Some("Dana Levi"));
}

#[test]
fn test_storage_failure_is_internal_error() {
    let handler = IntakeHandler::new(FormKind::Community, BrokenStore, NoopNotifier, UuidGenerator);
    let response = handler.handle(&IntakeRequest::post(COMMUNITY_BODY));
    assert_eq!(response.status, 500);
}

#[test]
fn test_notification_failure_is_swallowed() {
    let notifier = FailingNotifier { calls: Cell::new(0) };
    let handler = IntakeHandler::new(FormKind::Community, InMemoryStore::new(), notifier, FixedIds("n-1"));

    let response = handler.handle(&IntakeRequest::post(COMMUNITY_BODY));

    assert_eq!(response.status, 200);
    assert!(handler.store().get("n-1").is_some());
}

#[test]
fn test_other_methods_are_not_allowed() {
    let handler = IntakeHandler::new(FormKind::Contact, InMemoryStore::new(), NoopNotifier, UuidGenerator);
    let response = handler.handle(&IntakeRequest {
        method: "GET".to_string(),
        body: None,
    });
    assert_eq!(response.status, 405);
    assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
}
