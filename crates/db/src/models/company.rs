//! Company directory model.

use serde::{Deserialize, Serialize};
use slate_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `companies` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for registering a company in the directory.
#[derive(Debug, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub is_active: Option<bool>,
}
