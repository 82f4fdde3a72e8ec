//! HTTP form intake: validate a JSON submission, store it once, notify an operator.
//!
//! Transport-agnostic; callers map their HTTP framework's request onto
//! [`IntakeRequest`] and send back the [`IntakeResponse`].

pub mod form;
pub mod handler;
pub mod notify;
pub mod store;

pub use form::{validate, ApplicationRecord, FormKind, ValidationError};
pub use handler::IntakeHandler;
pub use notify::{IdGenerator, NoopNotifier, Notifier, NotifyError, UuidGenerator};
pub use store::{ApplicationStore, InMemoryStore, StoreError};

/// Headers sent with every response
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeRequest {
    pub method: String,
    pub body: Option<String>,
}

impl IntakeRequest {
    pub fn post(body: impl Into<String>) -> Self {
        IntakeRequest {
            method: "POST".to_string(),
            body: Some(body.into()),
        }
    }

    pub fn options() -> Self {
        IntakeRequest {
            method: "OPTIONS".to_string(),
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl IntakeResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        IntakeResponse {
            status,
            headers: CORS_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
