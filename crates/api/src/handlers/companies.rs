//! Handlers for the company directory boundary.
//!
//! The tracker consumes the directory (bulk generation iterates active
//! companies); only the minimal surface needed to feed it is exposed.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use slate_db::models::company::CreateCompany;
use slate_db::repositories::CompanyRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /companies
///
/// List active companies, ordered by name.
pub async fn list_companies(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let companies = CompanyRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: companies }))
}

/// POST /companies
///
/// Register a company in the directory.
pub async fn create_company(
    State(state): State<AppState>,
    Json(input): Json<CreateCompany>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Field 'name' must not be empty".to_string(),
        ));
    }

    let company = CompanyRepo::create(&state.pool, &input).await?;

    tracing::info!(company_id = company.id, name = %company.name, "Company registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: company })))
}
