use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, PgPool};

use super::company::Company;
use crate::database::bind_params_as;
use crate::error::ApiError;
use crate::sql::{ColumnMap, FieldMap, FilteredQuery, PartialUpdate};
use crate::validation::jobs::{NewJob, JOB_FILTER_HINTS};

/// Job fields already match their column names.
pub const JOB_COLUMNS: ColumnMap = ColumnMap::identity();

/// API filter -> column and operator for `GET /jobs`.
pub const JOB_FILTER_COLUMNS: ColumnMap = ColumnMap::new(&[
    ("title", "title ILIKE "),
    ("minSalary", "salary>="),
    ("hasEquity", "equity>"),
]);

const JOB_FIELDS: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// A job with its owning company embedded under `company` in place of
/// the bare `companyHandle`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company: Company,
}

/// Rewrites `hasEquity` into something the query builder can bind:
/// `"true"` becomes `equity > 0`; any other value drops the filter.
pub fn prepare_filters(filters: FieldMap) -> FieldMap {
    filters
        .into_iter()
        .filter_map(|(key, value)| {
            if key != "hasEquity" {
                return Some((key, value));
            }
            match value.as_str() {
                Some("true") => Some((key, Value::from(0))),
                _ => None,
            }
        })
        .collect()
}

impl Job {
    /// Fails with 404 if the company does not exist.
    pub async fn create(pool: &PgPool, data: NewJob) -> Result<Job, ApiError> {
        let company = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.company_handle)
            .fetch_optional(pool)
            .await?;
        if company.is_none() {
            return Err(ApiError::not_found(format!("No company: {}", data.company_handle)));
        }

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            JOB_FIELDS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(data.title)
            .bind(data.salary)
            .bind(data.equity)
            .bind(data.company_handle)
            .fetch_one(pool)
            .await?;

        Ok(job)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Job>, ApiError> {
        let sql = format!("SELECT {} FROM jobs ORDER BY title", JOB_FIELDS);
        Ok(sqlx::query_as::<_, Job>(&sql).fetch_all(pool).await?)
    }

    /// Jobs matching validated filters. `hasEquity` is rewritten first; if
    /// no filter survives, everything is listed.
    pub async fn find_by_filters(pool: &PgPool, filters: FieldMap) -> Result<Vec<Job>, ApiError> {
        let filters = prepare_filters(filters);
        if filters.is_empty() {
            return Self::find_all(pool).await;
        }

        let where_clause = FilteredQuery::build(&filters, &JOB_FILTER_COLUMNS, &JOB_FILTER_HINTS);
        let sql = format!("SELECT {} FROM jobs {} ORDER BY title", JOB_FIELDS, where_clause.clause);
        tracing::debug!(%sql, "filtering jobs");

        let jobs = bind_params_as(sqlx::query_as::<_, Job>(&sql), &where_clause.params)
            .fetch_all(pool)
            .await?;
        Ok(jobs)
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<JobDetail, ApiError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_FIELDS);
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No job: {}", id)))?;

        let company = sqlx::query_as::<_, Company>(
            "SELECT handle, name, description, num_employees, logo_url
             FROM companies WHERE handle = $1",
        )
        .bind(&job.company_handle)
        .fetch_one(pool)
        .await?;

        Ok(JobDetail {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
        })
    }

    pub async fn update(pool: &PgPool, id: i64, data: &FieldMap) -> Result<Job, ApiError> {
        let mut set = PartialUpdate::build(data, &JOB_COLUMNS)?;
        let id_idx = set.push_param(id);

        let sql = format!("UPDATE jobs SET {} WHERE id = {} RETURNING {}", set.clause, id_idx, JOB_FIELDS);
        bind_params_as(sqlx::query_as::<_, Job>(&sql), &set.params)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No job: {}", id)))
    }

    pub async fn remove(pool: &PgPool, id: i64) -> Result<(), ApiError> {
        sqlx::query_scalar::<_, i32>("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(format!("No job: {}", id)))
    }
}
