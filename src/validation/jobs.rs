use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::{FieldSpec, Schema, ValidationError};
use crate::sql::{FieldMap, FieldType, FieldTypeHints};

pub const JOB_FILTERS: Schema = Schema::new(&[
    FieldSpec::text("title"),
    FieldSpec::integer("minSalary").min(0.0),
    FieldSpec::text("hasEquity"),
]);

/// `hasEquity` is declared as text but is rewritten into a numeric
/// comparison value before it reaches the query builder.
pub const JOB_FILTER_HINTS: FieldTypeHints = FieldTypeHints::new(&[
    ("title", FieldType::Text),
    ("minSalary", FieldType::Integer),
    ("hasEquity", FieldType::Flag),
]);

pub const NEW_JOB: Schema = Schema::new(&[
    FieldSpec::text("title").required(),
    FieldSpec::integer("salary").min(0.0),
    FieldSpec::number("equity").min(0.0).max(1.0),
    FieldSpec::text("companyHandle").required(),
]);

pub const JOB_UPDATE: Schema = Schema::new(&[
    FieldSpec::text("title"),
    FieldSpec::integer("salary").min(0.0),
    FieldSpec::number("equity").min(0.0).max(1.0),
]);

const JOB_ID: FieldSpec = FieldSpec::integer("id").min(0.0);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl NewJob {
    pub fn from_body(body: &Value) -> Result<Self, ValidationError> {
        let fields = NEW_JOB.validate_body(body)?;
        serde_json::from_value(Value::Object(fields)).map_err(|e| ValidationError(e.to_string()))
    }
}

/// Validates `GET /jobs` query parameters.
pub fn job_filters(pairs: &[(String, String)]) -> Result<FieldMap, ValidationError> {
    JOB_FILTERS.validate_query(pairs)
}

pub fn job_update(body: &Value) -> Result<FieldMap, ValidationError> {
    JOB_UPDATE.validate_body(body)
}

/// Validates a `:id` path segment.
pub fn job_id(raw: &str) -> Result<i64, ValidationError> {
    JOB_ID
        .check(&Value::String(raw.to_string()))?
        .as_i64()
        .ok_or_else(|| ValidationError("\"id\" must be a number".to_string()))
}
