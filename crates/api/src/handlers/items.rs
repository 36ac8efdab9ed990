//! Handlers for production items.
//!
//! Every mutation is a single-field command: independent actors own
//! different stages of the same item and edit them through separate
//! requests, so no endpoint ever requires the full item payload.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use slate_core::error::CoreError;
use slate_core::generation;
use slate_core::item::{validate_text, InitialDates, ProductionItem, TextField};
use slate_core::period::{self, PeriodKey};
use slate_core::types::DbId;
use slate_db::models::item::{CreateItem, GenerateDefaults, ItemPatch};
use slate_db::repositories::{CompanyRepo, ItemRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the period listing.
#[derive(Debug, serde::Deserialize)]
pub struct PeriodParams {
    pub year: i32,
    pub month: i32,
}

/// Query parameters for the week-grouped view.
#[derive(Debug, serde::Deserialize)]
pub struct WeeksParams {
    pub year: i32,
    pub month: i32,
    /// Include empty week buckets up to the highest occupied week.
    /// The default display omits them.
    pub include_empty: Option<bool>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /items?year=&month=
///
/// List all items for a period, ordered by week, company name, then
/// creation order.
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<impl IntoResponse> {
    period::validate_month(params.month)?;

    let items = ItemRepo::list_for_period(&state.pool, params.year, params.month).await?;

    Ok(Json(DataResponse { data: items }))
}

/// GET /items/weeks?year=&month=&include_empty=
///
/// The weekly review view: items partitioned into week buckets.
pub async fn list_weeks(
    State(state): State<AppState>,
    Query(params): Query<WeeksParams>,
) -> AppResult<impl IntoResponse> {
    period::validate_month(params.month)?;

    let items = ItemRepo::list_for_period(&state.pool, params.year, params.month).await?;
    let mut grouped = period::group_by_week(items, |item| item.week);
    if params.include_empty.unwrap_or(false) {
        period::fill_empty_weeks(&mut grouped);
    }

    Ok(Json(DataResponse { data: grouped }))
}

/// GET /items/{id}
///
/// Get a single item with its three stage sub-objects.
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProductionItem",
            id,
        }))?;

    Ok(Json(DataResponse { data: item }))
}

/// POST /items
///
/// Create an item with explicit fields. All three stages start pending.
pub async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<CreateItem>,
) -> AppResult<impl IntoResponse> {
    // Unknown company ids are caller errors, not FK violations.
    CompanyRepo::find_by_id(&state.pool, input.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id: input.company_id,
        }))?;

    let mut item = ProductionItem::new(
        &input.title,
        input.company_id,
        PeriodKey {
            year: input.year,
            month: input.month,
            week: input.week,
        },
        InitialDates {
            recording: input.recording_date,
            editing: input.editing_date,
            delivery: input.delivery_date,
        },
    )?;
    if let Some(ref strategy) = input.strategy {
        item.apply_text_update(TextField::Strategy, strategy)?;
    }
    if let Some(ref script) = input.script {
        item.apply_text_update(TextField::Script, script)?;
    }
    if let Some(ref comment) = input.comment {
        item.apply_text_update(TextField::Comment, comment)?;
    }

    let created = ItemRepo::create(&state.pool, &item).await?;

    tracing::info!(
        item_id = created.id,
        company_id = created.company_id,
        year = created.year,
        month = created.month,
        "Production item created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PATCH /items/{id}
///
/// Apply one single-field update: either `{stage, field, value}` for a
/// stage field or `{field, value}` for an item-level text field.
/// Unknown (stage, field) combinations are rejected at deserialization.
pub async fn patch_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<ItemPatch>,
) -> AppResult<impl IntoResponse> {
    let item = match patch {
        ItemPatch::Stage(stage_patch) => {
            let item =
                ItemRepo::apply_stage_update(&state.pool, id, stage_patch.stage, &stage_patch.update)
                    .await?;
            tracing::info!(item_id = id, stage = %stage_patch.stage, "Stage field updated");
            item
        }
        ItemPatch::Text(text_patch) => {
            let value = validate_text(text_patch.field, &text_patch.value)?;
            let item = ItemRepo::update_text_field(&state.pool, id, text_patch.field, &value)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "ProductionItem",
                    id,
                }))?;
            tracing::info!(item_id = id, field = text_patch.field.as_str(), "Text field updated");
            item
        }
    };

    Ok(Json(DataResponse { data: item }))
}

/// POST /items/generate
///
/// Create default items for every active company not yet covered in
/// the target month. Idempotent: a second identical call returns an
/// empty list.
pub async fn generate_defaults(
    State(state): State<AppState>,
    Json(input): Json<GenerateDefaults>,
) -> AppResult<impl IntoResponse> {
    period::validate_month(input.month)?;
    let anchor = match input.anchor_date {
        Some(anchor) => anchor,
        None => generation::default_anchor(input.year, input.month)?,
    };

    let companies = CompanyRepo::list_active(&state.pool).await?;
    let created =
        ItemRepo::generate_defaults(&state.pool, input.year, input.month, anchor, &companies)
            .await?;

    tracing::info!(
        year = input.year,
        month = input.month,
        companies = companies.len(),
        created = created.len(),
        "Bulk generation finished"
    );

    Ok(Json(DataResponse { data: created }))
}
