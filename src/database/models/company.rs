use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::bind_params_as;
use crate::error::ApiError;
use crate::sql::{ColumnMap, FieldMap, FilteredQuery, PartialUpdate};
use crate::validation::companies::{NewCompany, COMPANY_FILTER_HINTS};

/// API field -> column for `PATCH /companies/:handle`.
pub const COMPANY_COLUMNS: ColumnMap =
    ColumnMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

/// API filter -> column and operator for `GET /companies`.
pub const COMPANY_FILTER_COLUMNS: ColumnMap = ColumnMap::new(&[
    ("name", "name ILIKE "),
    ("minEmployees", "num_employees>="),
    ("maxEmployees", "num_employees<="),
]);

const COMPANY_FIELDS: &str = "handle, name, description, num_employees, logo_url";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A job as listed under its company.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

impl Company {
    /// Fails with 400 if the handle or the name is taken.
    pub async fn create(pool: &PgPool, data: NewCompany) -> Result<Company, ApiError> {
        let duplicate = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.handle)
            .fetch_optional(pool)
            .await?;
        if duplicate.is_some() {
            return Err(ApiError::bad_request(format!("Duplicate company: {}", data.handle)));
        }
        Self::ensure_name_free(pool, &data.name, None).await?;

        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            COMPANY_FIELDS
        );
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(data.handle)
            .bind(data.name)
            .bind(data.description)
            .bind(data.num_employees)
            .bind(data.logo_url)
            .fetch_one(pool)
            .await?;

        Ok(company)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Company>, ApiError> {
        let sql = format!("SELECT {} FROM companies ORDER BY name", COMPANY_FIELDS);
        Ok(sqlx::query_as::<_, Company>(&sql).fetch_all(pool).await?)
    }

    /// Companies matching validated filters, e.g.
    /// `{name: "wel", minEmployees: 2}`. An empty set lists everything.
    pub async fn find_by_filters(pool: &PgPool, filters: &FieldMap) -> Result<Vec<Company>, ApiError> {
        if filters.is_empty() {
            return Self::find_all(pool).await;
        }

        let where_clause = FilteredQuery::build(filters, &COMPANY_FILTER_COLUMNS, &COMPANY_FILTER_HINTS);
        let sql = format!(
            "SELECT {} FROM companies {} ORDER BY name",
            COMPANY_FIELDS, where_clause.clause
        );
        tracing::debug!(%sql, "filtering companies");

        let companies = bind_params_as(sqlx::query_as::<_, Company>(&sql), &where_clause.params)
            .fetch_all(pool)
            .await?;
        Ok(companies)
    }

    pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, ApiError> {
        let sql = format!("SELECT {} FROM companies WHERE handle = $1", COMPANY_FIELDS);
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No company: {}", handle)))?;

        let jobs = sqlx::query_as::<_, CompanyJob>(
            "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
        )
        .bind(handle)
        .fetch_all(pool)
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Partial update; only the provided fields change.
    pub async fn update(pool: &PgPool, handle: &str, data: &FieldMap) -> Result<Company, ApiError> {
        if let Some(name) = data.get("name").and_then(|name| name.as_str()) {
            Self::ensure_name_free(pool, name, Some(handle)).await?;
        }

        let mut set = PartialUpdate::build(data, &COMPANY_COLUMNS)?;
        let handle_idx = set.push_param(handle);

        let sql = format!(
            "UPDATE companies SET {} WHERE handle = {} RETURNING {}",
            set.clause, handle_idx, COMPANY_FIELDS
        );
        bind_params_as(sqlx::query_as::<_, Company>(&sql), &set.params)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No company: {}", handle)))
    }

    /// Company names are unique; `except` skips the company being renamed.
    async fn ensure_name_free(pool: &PgPool, name: &str, except: Option<&str>) -> Result<(), ApiError> {
        let taken = sqlx::query_scalar::<_, String>(
            "SELECT handle FROM companies WHERE name = $1 AND handle IS DISTINCT FROM $2",
        )
        .bind(name)
        .bind(except)
        .fetch_optional(pool)
        .await?;
        match taken {
            Some(_) => Err(ApiError::bad_request(format!("Duplicate company name: {}", name))),
            None => Ok(()),
        }
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), ApiError> {
        sqlx::query_scalar::<_, String>("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(format!("No company: {}", handle)))
    }
}
