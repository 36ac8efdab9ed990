//! Repository for production items and their stage rows.
//!
//! This is the persistence side of the tracker: create, period
//! listing, the coverage predicate used by bulk generation, and the
//! single-field partial updates that let independent actors edit
//! different stages of the same item concurrently.

use slate_core::error::CoreError;
use slate_core::generation;
use slate_core::item::{ProductionItem, TextField};
use slate_core::stage::{StageKind, StageUpdate};
use slate_core::types::{DbId, ScheduleDate};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::StoreError;
use crate::models::company::Company;
use crate::models::item::{ItemRow, ItemWithStages, StageRow, StageView};

/// Column list for item queries (joined with the company name).
const ITEM_COLUMNS: &str = "i.id, i.title, i.company_id, c.name AS company_name, \
    i.year, i.month, i.week, i.strategy, i.script, i.comment, i.created_at, i.updated_at";

/// Column list for stage queries.
const STAGE_COLUMNS: &str = "id, item_id, stage, status, assignee_id, original_date, \
    reschedule_date, reschedule_reason, updated_at";

/// Persistence operations for production items.
pub struct ItemRepo;

impl ItemRepo {
    /// Persist a validated item aggregate: the item row plus its three
    /// stage rows, in one transaction.
    pub async fn create(pool: &PgPool, item: &ProductionItem) -> Result<ItemWithStages, StoreError> {
        let mut tx = pool.begin().await?;
        let id = insert_item(&mut tx, item).await?;
        tx.commit().await?;

        Self::find_by_id(pool, id).await?.ok_or_else(|| {
            StoreError::Core(CoreError::Internal(format!(
                "Item {id} vanished immediately after creation"
            )))
        })
    }

    /// Load one item with its three stage sub-objects.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ItemWithStages>, StoreError> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM production_items i
             JOIN companies c ON c.id = i.company_id
             WHERE i.id = $1"
        );
        let Some(item) = sqlx::query_as::<_, ItemRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let stages = fetch_stage_rows(pool, &[id]).await?;
        Ok(Some(assemble(item, stages)?))
    }

    /// List all items for a (year, month), ordered by week ascending,
    /// then company name, then creation order.
    pub async fn list_for_period(
        pool: &PgPool,
        year: i32,
        month: i32,
    ) -> Result<Vec<ItemWithStages>, StoreError> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM production_items i
             JOIN companies c ON c.id = i.company_id
             WHERE i.year = $1 AND i.month = $2
             ORDER BY i.week ASC, c.name ASC, i.id ASC"
        );
        let items = sqlx::query_as::<_, ItemRow>(&query)
            .bind(year)
            .bind(month)
            .fetch_all(pool)
            .await?;

        assemble_all(pool, items).await
    }

    /// Whether at least one item already covers the company in the
    /// given month. This is the sole predicate bulk generation
    /// consults: coverage is per company per month, not per week.
    ///
    /// Generic over the executor so the generator can evaluate it
    /// inside its lock-holding transaction.
    pub async fn exists_for_period<'e, E>(
        executor: E,
        company_id: DbId,
        year: i32,
        month: i32,
    ) -> Result<bool, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM production_items
                WHERE company_id = $1 AND year = $2 AND month = $3
            )",
        )
        .bind(company_id)
        .bind(year)
        .bind(month)
        .fetch_one(executor)
        .await
    }

    /// Apply one single-field command to one stage of one item.
    ///
    /// Loads the stage sub-record, dispatches through the domain value
    /// object (which enforces the stage rules), and persists only the
    /// columns the command touches. Different stages of the same item
    /// live in different rows, so concurrent edits to them never block
    /// or clobber one another; colliding writes to the same field
    /// resolve last-write-wins at the database.
    pub async fn apply_stage_update(
        pool: &PgPool,
        item_id: DbId,
        kind: StageKind,
        update: &StageUpdate,
    ) -> Result<ItemWithStages, StoreError> {
        let query = format!(
            "SELECT {STAGE_COLUMNS} FROM item_stages
             WHERE item_id = $1 AND stage = $2"
        );
        let row = sqlx::query_as::<_, StageRow>(&query)
            .bind(item_id)
            .bind(kind.as_str())
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ProductionItem",
                id: item_id,
            })?;

        let mut state = row.to_state()?;
        state.apply(update)?;

        match update {
            StageUpdate::Status(_) => {
                sqlx::query(
                    "UPDATE item_stages SET status = $2, updated_at = NOW() WHERE id = $1",
                )
                .bind(row.id)
                .bind(state.status())
                .execute(pool)
                .await?;
            }
            StageUpdate::Assignee(_) => {
                sqlx::query(
                    "UPDATE item_stages SET assignee_id = $2, updated_at = NOW() WHERE id = $1",
                )
                .bind(row.id)
                .bind(state.assignee())
                .execute(pool)
                .await?;
            }
            StageUpdate::Reschedule(_) => {
                let reschedule = state.reschedule().ok_or_else(|| {
                    CoreError::Internal("Reschedule dispatch left no record".to_string())
                })?;
                sqlx::query(
                    "UPDATE item_stages
                     SET reschedule_date = $2, reschedule_reason = $3, updated_at = NOW()
                     WHERE id = $1",
                )
                .bind(row.id)
                .bind(reschedule.new_date)
                .bind(&reschedule.reason)
                .execute(pool)
                .await?;
            }
        }

        tracing::info!(
            item_id,
            stage = %kind,
            "Applied stage update"
        );

        Self::find_by_id(pool, item_id).await?.ok_or_else(|| {
            StoreError::Core(CoreError::NotFound {
                entity: "ProductionItem",
                id: item_id,
            })
        })
    }

    /// Update one item-level free-text field. The value is expected to
    /// be validated (the API edge runs it through the domain rules).
    pub async fn update_text_field(
        pool: &PgPool,
        item_id: DbId,
        field: TextField,
        value: &str,
    ) -> Result<Option<ItemWithStages>, StoreError> {
        // Closed field set; the column name never comes from input.
        let column = match field {
            TextField::Title => "title",
            TextField::Strategy => "strategy",
            TextField::Script => "script",
            TextField::Comment => "comment",
        };
        let query = format!(
            "UPDATE production_items SET {column} = $2, updated_at = NOW() WHERE id = $1"
        );
        let result = sqlx::query(&query)
            .bind(item_id)
            .bind(value)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, item_id).await
    }

    /// Create default items for every given company not yet covered in
    /// (year, month). Already-covered companies are silently skipped;
    /// a second identical invocation creates nothing.
    ///
    /// Each company runs in its own transaction holding an advisory
    /// lock keyed on (company, year, month), so two concurrent
    /// generator runs cannot both pass the existence check and
    /// double-create.
    pub async fn generate_defaults(
        pool: &PgPool,
        year: i32,
        month: i32,
        anchor: ScheduleDate,
        companies: &[Company],
    ) -> Result<Vec<ItemWithStages>, StoreError> {
        let mut created_ids = Vec::new();

        for company in companies {
            let mut tx = pool.begin().await?;

            sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
                .bind(format!("item_generation:{}:{year}:{month}", company.id))
                .execute(&mut *tx)
                .await?;

            let exists = Self::exists_for_period(&mut *tx, company.id, year, month).await?;

            if exists {
                // Dropping the transaction rolls back and releases the lock.
                continue;
            }

            let item = generation::default_item(company.id, &company.name, year, month, anchor)?;
            let id = insert_item(&mut tx, &item).await?;
            tx.commit().await?;

            tracing::info!(
                company_id = company.id,
                item_id = id,
                year,
                month,
                "Generated default production item"
            );
            created_ids.push(id);
        }

        if created_ids.is_empty() {
            return Ok(Vec::new());
        }
        Self::fetch_by_ids(pool, &created_ids).await
    }

    /// Load several items by ID, ordered by creation.
    async fn fetch_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<ItemWithStages>, StoreError> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM production_items i
             JOIN companies c ON c.id = i.company_id
             WHERE i.id = ANY($1)
             ORDER BY i.id ASC"
        );
        let items = sqlx::query_as::<_, ItemRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await?;

        assemble_all(pool, items).await
    }
}

/// Insert the item row and its three stage rows inside `tx`.
async fn insert_item(
    tx: &mut Transaction<'_, Postgres>,
    item: &ProductionItem,
) -> Result<DbId, sqlx::Error> {
    let period = item.period();
    let id: DbId = sqlx::query_scalar(
        "INSERT INTO production_items
            (title, company_id, year, month, week, strategy, script, comment)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING id",
    )
    .bind(item.title())
    .bind(item.company_id())
    .bind(period.year)
    .bind(period.month)
    .bind(period.week)
    .bind(item.strategy())
    .bind(item.script())
    .bind(item.comment())
    .fetch_one(&mut **tx)
    .await?;

    for kind in StageKind::ALL {
        let stage = item.stage(kind);
        let (reschedule_date, reschedule_reason) = match stage.reschedule() {
            Some(r) => (Some(r.new_date), Some(r.reason.as_str())),
            None => (None, None),
        };
        sqlx::query(
            "INSERT INTO item_stages
                (item_id, stage, status, assignee_id, original_date,
                 reschedule_date, reschedule_reason)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(kind.as_str())
        .bind(stage.status())
        .bind(stage.assignee())
        .bind(stage.original_date())
        .bind(reschedule_date)
        .bind(reschedule_reason)
        .execute(&mut **tx)
        .await?;
    }

    Ok(id)
}

/// Fetch the stage rows for a set of items.
async fn fetch_stage_rows(pool: &PgPool, item_ids: &[DbId]) -> Result<Vec<StageRow>, sqlx::Error> {
    let query = format!(
        "SELECT {STAGE_COLUMNS} FROM item_stages
         WHERE item_id = ANY($1)
         ORDER BY item_id ASC"
    );
    sqlx::query_as::<_, StageRow>(&query)
        .bind(item_ids)
        .fetch_all(pool)
        .await
}

/// Attach stage rows to their items, preserving item order.
async fn assemble_all(
    pool: &PgPool,
    items: Vec<ItemRow>,
) -> Result<Vec<ItemWithStages>, StoreError> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<DbId> = items.iter().map(|i| i.id).collect();
    let mut stage_rows = fetch_stage_rows(pool, &ids).await?;

    let mut result = Vec::with_capacity(items.len());
    for item in items {
        let (mine, rest): (Vec<StageRow>, Vec<StageRow>) =
            stage_rows.into_iter().partition(|s| s.item_id == item.id);
        stage_rows = rest;
        result.push(assemble(item, mine)?);
    }
    Ok(result)
}

/// Build the serialized aggregate from an item row and its stage rows.
fn assemble(item: ItemRow, stage_rows: Vec<StageRow>) -> Result<ItemWithStages, CoreError> {
    let mut recording = None;
    let mut editing = None;
    let mut delivery = None;

    for row in stage_rows {
        match StageKind::parse(&row.stage) {
            Some(StageKind::Recording) => recording = Some(StageView::from(row)),
            Some(StageKind::Editing) => editing = Some(StageView::from(row)),
            Some(StageKind::Delivery) => delivery = Some(StageView::from(row)),
            None => {
                return Err(CoreError::Internal(format!(
                    "Unknown stage kind in database: {}",
                    row.stage
                )))
            }
        }
    }

    let missing = |stage: &'static str| {
        CoreError::Internal(format!("Item {} is missing its {stage} stage row", item.id))
    };

    Ok(ItemWithStages {
        id: item.id,
        title: item.title,
        company_id: item.company_id,
        company_name: item.company_name,
        year: item.year,
        month: item.month,
        week: item.week,
        strategy: item.strategy,
        script: item.script,
        comment: item.comment,
        recording: recording.ok_or_else(|| missing("recording"))?,
        editing: editing.ok_or_else(|| missing("editing"))?,
        delivery: delivery.ok_or_else(|| missing("delivery"))?,
        created_at: item.created_at,
        updated_at: item.updated_at,
    })
}
