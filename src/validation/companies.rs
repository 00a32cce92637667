use serde::Deserialize;
use serde_json::Value;

use super::{FieldSpec, Schema, ValidationError};
use crate::sql::{FieldMap, FieldType, FieldTypeHints};

pub const COMPANY_FILTERS: Schema = Schema::new(&[
    FieldSpec::integer("minEmployees"),
    FieldSpec::integer("maxEmployees"),
    FieldSpec::text("name"),
]);

pub const COMPANY_FILTER_HINTS: FieldTypeHints = FieldTypeHints::new(&[
    ("minEmployees", FieldType::Integer),
    ("maxEmployees", FieldType::Integer),
    ("name", FieldType::Text),
]);

pub const NEW_COMPANY: Schema = Schema::new(&[
    FieldSpec::text("name").min(1.0).max(30.0).required(),
    FieldSpec::text("handle").min(1.0).max(10.0).lowercase().required(),
    FieldSpec::text("description").required(),
    FieldSpec::integer("numEmployees").min(0.0),
    FieldSpec::uri("logoUrl"),
]);

pub const COMPANY_UPDATE: Schema = Schema::new(&[
    FieldSpec::text("name").min(1.0).max(30.0),
    FieldSpec::text("description"),
    FieldSpec::integer("numEmployees").min(0.0),
    FieldSpec::uri("logoUrl"),
]);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn from_body(body: &Value) -> Result<Self, ValidationError> {
        let fields = NEW_COMPANY.validate_body(body)?;
        serde_json::from_value(Value::Object(fields)).map_err(|e| ValidationError(e.to_string()))
    }
}

/// Validates `GET /companies` query parameters.
pub fn company_filters(pairs: &[(String, String)]) -> Result<FieldMap, ValidationError> {
    let filters = COMPANY_FILTERS.validate_query(pairs)?;

    let min = filters.get("minEmployees").and_then(Value::as_i64);
    let max = filters.get("maxEmployees").and_then(Value::as_i64);
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ValidationError(
                "minEmployees cannot be greater than maxEmployees".to_string(),
            ));
        }
    }

    Ok(filters)
}

pub fn company_update(body: &Value) -> Result<FieldMap, ValidationError> {
    COMPANY_UPDATE.validate_body(body)
}
