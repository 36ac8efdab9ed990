//! Repository for the `companies` table.

use slate_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, CreateCompany};

/// Column list for companies queries.
const COLUMNS: &str = "id, name, is_active, created_at";

/// Directory of companies the tracker produces content for.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Register a company, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let is_active = input.is_active.unwrap_or(true);
        let query = format!(
            "INSERT INTO companies (name, is_active)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a company by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active companies, ordered by name. This is the input set
    /// for bulk generation.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM companies
             WHERE is_active = TRUE
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }
}
