use serde_json::json;
use tracing::{error, info, warn};

use crate::intake::form::{validate, ApplicationRecord, FormKind};
use crate::intake::notify::{IdGenerator, Notifier};
use crate::intake::store::ApplicationStore;
use crate::intake::{IntakeRequest, IntakeResponse};

/// Request handler for one form kind
pub struct IntakeHandler<S: ApplicationStore, N: Notifier, I: IdGenerator> {
    kind: FormKind,
    store: S,
    notifier: N,
    ids: I,
}

impl<S: ApplicationStore, N: Notifier, I: IdGenerator> IntakeHandler<S, N, I> {
    pub fn new(kind: FormKind, store: S, notifier: N, ids: I) -> Self {
        IntakeHandler {
            kind,
            store,
            notifier,
            ids,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn handle(&self, request: &IntakeRequest) -> IntakeResponse {
        match request.method.to_ascii_uppercase().as_str() {
            "OPTIONS" => return IntakeResponse::new(200, ""),
            "POST" => {}
            other => {
                return IntakeResponse::json(405, &json!({ "error": format!("Method {} not allowed", other) }))
            }
        }

        let fields = match validate(self.kind, request.body.as_deref().unwrap_or("")) {
            Ok(fields) => fields,
            Err(e) => {
                info!(kind = %self.kind, reason = %e, "rejected submission");
                return IntakeResponse::json(400, &json!({ "error": e.to_string() }));
            }
        };

        let record = ApplicationRecord::new(self.ids.generate(), self.kind, fields);
        let id = record.id.clone();
        if let Err(e) = self.store.insert_if_absent(record.clone()) {
            error!(kind = %self.kind, id = %id, error = %e, "failed to store submission");
            return IntakeResponse::json(500, &json!({ "error": "Internal server error" }));
        }

        if let Err(e) = self.notifier.notify(&record) {
            warn!(id = %id, error = %e, "notification failed");
        }

        info!(kind = %self.kind, id = %id, "stored submission");
        IntakeResponse::json(200, &json!({ "message": "Application received", "id": id }))
    }
}
