//! Production item row models, wire DTOs, and the serialized aggregate.

use serde::{Deserialize, Serialize};
use slate_core::error::CoreError;
use slate_core::item::TextField;
use slate_core::stage::{RescheduleRecord, StageKind, StageState, StageUpdate};
use slate_core::types::{DbId, ScheduleDate, Timestamp};
use sqlx::FromRow;

/// A row from `production_items` joined with the company name.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub id: DbId,
    pub title: String,
    pub company_id: DbId,
    pub company_name: String,
    pub year: i32,
    pub month: i32,
    pub week: i32,
    pub strategy: String,
    pub script: String,
    pub comment: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `item_stages` table.
#[derive(Debug, Clone, FromRow)]
pub struct StageRow {
    pub id: DbId,
    pub item_id: DbId,
    pub stage: String,
    pub status: String,
    pub assignee_id: Option<DbId>,
    pub original_date: ScheduleDate,
    pub reschedule_date: Option<ScheduleDate>,
    pub reschedule_reason: Option<String>,
    pub updated_at: Timestamp,
}

impl StageRow {
    /// Reconstruct the domain value object from the persisted row.
    pub fn to_state(&self) -> Result<StageState, CoreError> {
        let kind = StageKind::parse(&self.stage).ok_or_else(|| {
            CoreError::Internal(format!("Unknown stage kind in database: {}", self.stage))
        })?;
        let reschedule = match (self.reschedule_date, &self.reschedule_reason) {
            (Some(new_date), Some(reason)) => Some(RescheduleRecord {
                new_date,
                reason: reason.clone(),
            }),
            _ => None,
        };
        Ok(StageState::from_parts(
            kind,
            self.status.clone(),
            self.assignee_id,
            self.original_date,
            reschedule,
        ))
    }
}

/// Serialized view of one stage inside an item response.
#[derive(Debug, Clone, Serialize)]
pub struct StageView {
    pub status: String,
    pub assignee: Option<DbId>,
    pub original_date: ScheduleDate,
    pub reschedule: Option<RescheduleRecord>,
}

impl From<StageRow> for StageView {
    fn from(row: StageRow) -> Self {
        let reschedule = match (row.reschedule_date, row.reschedule_reason) {
            (Some(new_date), Some(reason)) => Some(RescheduleRecord { new_date, reason }),
            _ => None,
        };
        Self {
            status: row.status,
            assignee: row.assignee_id,
            original_date: row.original_date,
            reschedule,
        }
    }
}

/// The full item as served over the API: item-level fields plus the
/// three stage sub-objects.
#[derive(Debug, Clone, Serialize)]
pub struct ItemWithStages {
    pub id: DbId,
    pub title: String,
    pub company_id: DbId,
    pub company_name: String,
    pub year: i32,
    pub month: i32,
    pub week: i32,
    pub strategy: String,
    pub script: String,
    pub comment: String,
    pub recording: StageView,
    pub editing: StageView,
    pub delivery: StageView,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an item via `POST /items`.
#[derive(Debug, Deserialize)]
pub struct CreateItem {
    pub title: String,
    pub company_id: DbId,
    pub year: i32,
    pub month: i32,
    pub week: i32,
    pub strategy: Option<String>,
    pub script: Option<String>,
    pub comment: Option<String>,
    pub recording_date: ScheduleDate,
    pub editing_date: ScheduleDate,
    pub delivery_date: ScheduleDate,
}

/// DTO for `POST /items/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateDefaults {
    pub year: i32,
    pub month: i32,
    /// Original date for every stage of every generated item.
    /// Defaults to the first day of the target month.
    pub anchor_date: Option<ScheduleDate>,
}

/// Single-field body for `PATCH /items/{id}`.
///
/// Either a stage-scoped command (`{stage, field, value}`) or an
/// item-level text edit (`{field, value}`). Anything else fails to
/// deserialize, so unknown (stage, field) combinations are rejected at
/// the API edge.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ItemPatch {
    Stage(StagePatch),
    Text(TextPatch),
}

/// A single-field update addressed to one stage of the item.
#[derive(Debug, Deserialize)]
pub struct StagePatch {
    pub stage: StageKind,
    #[serde(flatten)]
    pub update: StageUpdate,
}

/// A single item-level free-text edit. Unknown keys are rejected so a
/// stage-scoped payload with a bad field never falls through to here.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextPatch {
    pub field: TextField,
    pub value: String,
}
