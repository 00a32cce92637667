use serde_json::Value;
use sqlx::{postgres::PgArguments, query::QueryAs, Postgres};

/// Binds builder parameters in order, `params[i]` to `$(i + 1)`.
pub fn bind_params_as<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    params: &[Value],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for v in params {
        q = match v {
            Value::Null => q.bind(None::<String>),
            Value::Bool(b) => q.bind(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    q.bind(i)
                } else if let Some(f) = n.as_f64() {
                    q.bind(f)
                } else {
                    q.bind(n.to_string())
                }
            }
            Value::String(s) => q.bind(s.clone()),
            Value::Array(_) | Value::Object(_) => q.bind(sqlx::types::Json(v.clone())),
        };
    }
    q
}
