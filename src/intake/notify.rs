use thiserror::Error;
use uuid::Uuid;

use crate::intake::form::ApplicationRecord;

#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Best-effort message to an operator mailbox after a submission is stored
pub trait Notifier {
    fn notify(&self, record: &ApplicationRecord) -> Result<(), NotifyError>;
}

/// Notifier used when no mailbox is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, record: &ApplicationRecord) -> Result<(), NotifyError> {
        tracing::debug!(id = %record.id, body = %notification_text(record), "notifications disabled");
        Ok(())
    }
}

/// Source of record identifiers
pub trait IdGenerator {
    fn generate(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Plain-text notification body for a record
pub fn notification_text(record: &ApplicationRecord) -> String {
    let mut lines = vec![format!("New {} submission", record.kind), String::new()];
    for (key, value) in &record.fields {
        if !value.is_empty() {
            lines.push(format!("{}: {}", key, value));
        }
    }
    lines.push(String::new());
    lines.push(format!("Application id: {}", record.id));
    lines.push(format!("Submitted: {}", record.submitted_at.to_rfc3339()));
    lines.join("\n")
}
