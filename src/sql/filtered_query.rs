use serde_json::Value;

use super::types::{ColumnMap, FieldMap, FieldType, FieldTypeHints, SqlClause};

/// Builds a `WHERE` clause from a validated set of filters.
///
/// Each filter name translates to a column-plus-operator fragment, e.g.
/// `minEmployees -> num_employees>=`, and is AND-ed with the others.
/// Text-typed filters are bound as `%value%` substring patterns; every other
/// filter is bound as-is.
///
/// An empty filter set produces a bare `WHERE `. Callers check for emptiness
/// first and run their unfiltered listing instead.
pub struct FilteredQuery {
    param_values: Vec<Value>,
    conditions: Vec<String>,
}

impl FilteredQuery {
    fn new() -> Self {
        Self { param_values: vec![], conditions: vec![] }
    }

    pub fn build(filters: &FieldMap, columns: &ColumnMap, hints: &FieldTypeHints) -> SqlClause {
        let mut query = Self::new();
        for (name, value) in filters {
            let fragment = columns.resolve(name);
            let bound = Self::bind_value(hints.get(name), value);
            let placeholder = query.param(bound);
            query.conditions.push(format!("{}{}", fragment, placeholder));
        }

        SqlClause {
            clause: format!("WHERE {}", query.conditions.join(" AND ")),
            params: query.param_values,
        }
    }

    fn bind_value(field_type: Option<FieldType>, value: &Value) -> Value {
        match field_type {
            Some(FieldType::Text) => match value {
                Value::String(s) => Value::String(format!("%{}%", s)),
                other => Value::String(format!("%{}%", other)),
            },
            Some(FieldType::Integer) | Some(FieldType::Flag) | None => value.clone(),
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}
