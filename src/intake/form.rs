use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Form variants accepted by the intake endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    /// Community membership application
    Community,
    Contact,
    /// Restricted program; requires national id and role
    Restricted,
}

impl FormKind {
    pub fn name(&self) -> &'static str {
        match self {
            FormKind::Community => "community",
            FormKind::Contact => "contact",
            FormKind::Restricted => "restricted",
        }
    }

    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            FormKind::Community => &["name", "email", "github", "project_idea"],
            FormKind::Contact => &["name", "email", "phone"],
            FormKind::Restricted => &["name", "email", "phone", "israeli_id", "role"],
        }
    }

    /// Optional fields kept on the record, with the value stored when absent
    fn optional_fields(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            FormKind::Community => &[
                ("language", "not specified"),
                ("aws_experience", "not specified"),
                ("organization", ""),
            ],
            FormKind::Contact => &[("message", "")],
            FormKind::Restricted => &[("organization", "")],
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "community" => Ok(FormKind::Community),
            "contact" => Ok(FormKind::Contact),
            "restricted" => Ok(FormKind::Restricted),
            _ => Err(format!("unknown form kind '{}'", s)),
        }
    }
}

/// Why a submission was rejected; the message is returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid JSON body")]
    InvalidJson,

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid phone number")]
    InvalidPhone,

    #[error("Invalid Israeli ID")]
    InvalidIsraeliId,
}

/// Validate a JSON body for `kind` and return the fields to store
pub fn validate(kind: FormKind, body: &str) -> Result<BTreeMap<String, String>, ValidationError> {
    let object = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => object,
        _ => return Err(ValidationError::InvalidJson),
    };

    let missing: Vec<String> = kind
        .required_fields()
        .iter()
        .filter(|field| string_field(&object, field).is_none())
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let mut fields = BTreeMap::new();
    for field in kind.required_fields() {
        if let Some(value) = string_field(&object, field) {
            fields.insert(field.to_string(), value.to_string());
        }
    }

    if !is_valid_email(&fields["email"]) {
        return Err(ValidationError::InvalidEmail);
    }
    if let Some(phone) = fields.get_mut("phone") {
        *phone = normalize_phone(phone).ok_or(ValidationError::InvalidPhone)?;
    }
    if let Some(id) = fields.get("israeli_id") {
        if !is_valid_israeli_id(id) {
            return Err(ValidationError::InvalidIsraeliId);
        }
    }

    for (field, default) in kind.optional_fields() {
        let value = string_field(&object, field).unwrap_or(default);
        fields.insert(field.to_string(), value.to_string());
    }
    Ok(fields)
}

fn string_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn is_valid_email(email: &str) -> bool {
    if let Ok(re) = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$") {
        return re.is_match(email);
    }
    false
}

/// Local mobile format: 8-10 digits starting with 0, spaces and dashes ignored.
/// Returns the digits only.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| *c != ' ' && *c != '-').collect();
    if let Ok(re) = Regex::new(r"^0\d{7,9}$") {
        if re.is_match(&digits) {
            return Some(digits);
        }
    }
    None
}

pub fn is_valid_israeli_id(id: &str) -> bool {
    if let Ok(re) = Regex::new(r"^\d{5,9}$") {
        return re.is_match(id);
    }
    false
}

/// A stored submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub kind: FormKind,
    pub fields: BTreeMap<String, String>,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn new(id: String, kind: FormKind, fields: BTreeMap<String, String>) -> Self {
        ApplicationRecord {
            id,
            kind,
            fields,
            status: "pending".to_string(),
            submitted_at: Utc::now(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}
