use serde_json::{Map, Value};

/// Ordered mapping of API field name to value. Key order is the order the
/// placeholders are numbered in.
pub type FieldMap = Map<String, Value>;

/// Closed translation table from API field names to physical SQL fragments.
///
/// For updates the fragment is a bare column name (`numEmployees` ->
/// `num_employees`). For filters it is a column plus comparison operator
/// (`minEmployees` -> `num_employees>=`). Names missing from the table
/// translate to themselves.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap(&'static [(&'static str, &'static str)]);

impl ColumnMap {
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self(pairs)
    }

    pub const fn identity() -> Self {
        Self(&[])
    }

    pub fn resolve<'a>(&self, name: &'a str) -> &'a str {
        self.0
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, column)| *column)
            .unwrap_or(name)
    }
}

/// Declared type of a filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Free text, matched as a substring with `LIKE`/`ILIKE`.
    Text,
    /// Numeric, bound as-is for range comparison.
    Integer,
    /// Flag-style filter rewritten by the caller into a comparison value;
    /// bound as-is even though it arrives as a string.
    Flag,
}

/// Per-field type metadata for a filter set.
#[derive(Debug, Clone, Copy)]
pub struct FieldTypeHints(&'static [(&'static str, FieldType)]);

impl FieldTypeHints {
    pub const fn new(hints: &'static [(&'static str, FieldType)]) -> Self {
        Self(hints)
    }

    pub fn get(&self, name: &str) -> Option<FieldType> {
        self.0
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, field_type)| *field_type)
    }
}

/// A clause fragment with positional placeholders and the values bound to
/// them. `params[i]` is bound to `$(i + 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlClause {
    pub clause: String,
    pub params: Vec<Value>,
}

impl SqlClause {
    /// Appends a parameter after the clause's own and returns its placeholder.
    pub fn push_param(&mut self, value: impl Into<Value>) -> String {
        self.params.push(value.into());
        format!("${}", self.params.len())
    }
}
