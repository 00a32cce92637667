//! Request schemas.
//!
//! A [`Schema`] is a closed list of [`FieldSpec`]s. Validation rejects
//! unknown keys, enforces required fields, coerces numeric and boolean
//! strings (query parameters arrive as text) and checks bounds. The output
//! is a [`FieldMap`] in the caller's key order, ready for the SQL builders.

pub mod companies;
pub mod jobs;
pub mod users;

use serde_json::{Number, Value};
use thiserror::Error;

use crate::sql::FieldMap;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn field(name: &str, problem: impl std::fmt::Display) -> Self {
        Self(format!("\"{}\" {}", name, problem))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Uri,
    Integer,
    Number,
    Boolean,
}

/// One allowed field. `min`/`max` bound the character count of text kinds
/// and the value of numeric kinds. Integers are always bounded to the
/// `INTEGER` column range.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub lowercase: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldSpec {
    const fn of(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false, lowercase: false, min: None, max: None }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::of(name, FieldKind::Text)
    }

    pub const fn email(name: &'static str) -> Self {
        Self::of(name, FieldKind::Email)
    }

    pub const fn uri(name: &'static str) -> Self {
        Self::of(name, FieldKind::Uri)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::of(name, FieldKind::Integer)
    }

    pub const fn number(name: &'static str) -> Self {
        Self::of(name, FieldKind::Number)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::of(name, FieldKind::Boolean)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Text must not contain uppercase characters.
    pub const fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    pub const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub const fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Checks a single value, returning it in its canonical JSON type.
    pub fn check(&self, value: &Value) -> Result<Value, ValidationError> {
        match self.kind {
            FieldKind::Text | FieldKind::Email | FieldKind::Uri => self.check_text(value),
            FieldKind::Integer | FieldKind::Number => self.check_number(value),
            FieldKind::Boolean => self.check_boolean(value),
        }
    }

    fn check_text(&self, value: &Value) -> Result<Value, ValidationError> {
        let s = value
            .as_str()
            .ok_or_else(|| ValidationError::field(self.name, "must be a string"))?;
        if s.is_empty() {
            return Err(ValidationError::field(self.name, "is not allowed to be empty"));
        }

        let len = s.chars().count() as f64;
        if let Some(min) = self.min {
            if len < min {
                return Err(ValidationError::field(
                    self.name,
                    format!("length must be at least {} characters long", min),
                ));
            }
        }
        if let Some(max) = self.max {
            if len > max {
                return Err(ValidationError::field(
                    self.name,
                    format!("length must be less than or equal to {} characters long", max),
                ));
            }
        }

        if self.lowercase && s.chars().any(char::is_uppercase) {
            return Err(ValidationError::field(self.name, "must only contain lowercase characters"));
        }

        match self.kind {
            FieldKind::Email if !is_valid_email(s) => {
                Err(ValidationError::field(self.name, "must be a valid email"))
            }
            FieldKind::Uri if url::Url::parse(s).is_err() => {
                Err(ValidationError::field(self.name, "must be a valid uri"))
            }
            _ => Ok(Value::String(s.to_string())),
        }
    }

    fn check_number(&self, value: &Value) -> Result<Value, ValidationError> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|_| !s.trim().is_empty()),
            _ => None,
        }
        .filter(|n| n.is_finite())
        .ok_or_else(|| ValidationError::field(self.name, "must be a number"))?;

        if self.kind == FieldKind::Integer && n.fract() != 0.0 {
            return Err(ValidationError::field(self.name, "must be an integer"));
        }
        if let Some(min) = self.min {
            if n < min {
                return Err(ValidationError::field(
                    self.name,
                    format!("must be greater than or equal to {}", min),
                ));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Err(ValidationError::field(
                    self.name,
                    format!("must be less than or equal to {}", max),
                ));
            }
        }

        if self.kind == FieldKind::Integer {
            if n > f64::from(i32::MAX) {
                return Err(ValidationError::field(
                    self.name,
                    format!("must be less than or equal to {}", i32::MAX),
                ));
            }
            if n < f64::from(i32::MIN) {
                return Err(ValidationError::field(
                    self.name,
                    format!("must be greater than or equal to {}", i32::MIN),
                ));
            }
            return Ok(Value::from(n as i64));
        }
        Number::from_f64(n)
            .map(Value::Number)
            .ok_or_else(|| ValidationError::field(self.name, "must be a number"))
    }

    fn check_boolean(&self, value: &Value) -> Result<Value, ValidationError> {
        match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(ValidationError::field(self.name, "must be a boolean")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    fields: &'static [FieldSpec],
}

impl Schema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates a JSON object, preserving the input's key order.
    pub fn validate(&self, input: &FieldMap) -> Result<FieldMap, ValidationError> {
        let mut validated = FieldMap::new();
        for (key, value) in input {
            let spec = self
                .field(key)
                .ok_or_else(|| ValidationError::field(key, "is not allowed"))?;
            validated.insert(key.clone(), spec.check(value)?);
        }

        if let Some(missing) = self
            .fields
            .iter()
            .find(|f| f.required && !validated.contains_key(f.name))
        {
            return Err(ValidationError::field(missing.name, "is required"));
        }

        Ok(validated)
    }

    /// Validates query-string pairs. A repeated key keeps its first position
    /// and its last value.
    pub fn validate_query(&self, pairs: &[(String, String)]) -> Result<FieldMap, ValidationError> {
        let mut input = FieldMap::new();
        for (key, value) in pairs {
            input.insert(key.clone(), Value::String(value.clone()));
        }
        self.validate(&input)
    }

    /// Validates an arbitrary JSON body, which must be an object.
    pub fn validate_body(&self, body: &Value) -> Result<FieldMap, ValidationError> {
        match body {
            Value::Object(map) => self.validate(map),
            _ => Err(ValidationError("\"value\" must be of type object".to_string())),
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let (local, domain) = match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => (local, domain),
        _ => return false,
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
