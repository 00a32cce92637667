use serde_json::Value;

use super::error::SqlBuildError;
use super::types::{ColumnMap, FieldMap, SqlClause};

/// Builds the `SET` list of an `UPDATE` statement from a partial payload.
///
/// `{firstName: "Aliya", age: 32}` with `firstName -> first_name` becomes
/// `"first_name"=$1, "age"=$2` bound to `["Aliya", 32]`.
pub struct PartialUpdate {
    param_values: Vec<Value>,
    assignments: Vec<String>,
}

impl PartialUpdate {
    fn new() -> Self {
        Self { param_values: vec![], assignments: vec![] }
    }

    pub fn build(data: &FieldMap, columns: &ColumnMap) -> Result<SqlClause, SqlBuildError> {
        if data.is_empty() {
            return Err(SqlBuildError::NoData);
        }

        let mut update = Self::new();
        for (field, value) in data {
            let column = columns.resolve(field);
            let placeholder = update.param(value.clone());
            update.assignments.push(format!("\"{}\"={}", column, placeholder));
        }

        Ok(SqlClause { clause: update.assignments.join(", "), params: update.param_values })
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}
