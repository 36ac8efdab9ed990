//! The production item aggregate.
//!
//! One item tracks a single piece of commissioned content for a company
//! through its three stages. Mutation happens exclusively through
//! single-field updates scoped to one stage (or one item-level text
//! field) so that independent actors editing different stages never
//! need the full item payload.

use serde::Deserialize;

use crate::error::CoreError;
use crate::period::PeriodKey;
use crate::stage::{StageKind, StageState, StageUpdate};
use crate::types::{DbId, ScheduleDate};

/// Maximum length of the item-level free-text fields.
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Item-level free-text fields addressable by a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Title,
    Strategy,
    Script,
    Comment,
}

impl TextField {
    pub fn as_str(self) -> &'static str {
        match self {
            TextField::Title => "title",
            TextField::Strategy => "strategy",
            TextField::Script => "script",
            TextField::Comment => "comment",
        }
    }
}

/// The original scheduled date for each stage, supplied at creation.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InitialDates {
    pub recording: ScheduleDate,
    pub editing: ScheduleDate,
    pub delivery: ScheduleDate,
}

impl InitialDates {
    /// The same anchor date for every stage (bulk-generation default).
    pub fn uniform(anchor: ScheduleDate) -> Self {
        Self {
            recording: anchor,
            editing: anchor,
            delivery: anchor,
        }
    }

    fn for_stage(&self, kind: StageKind) -> ScheduleDate {
        match kind {
            StageKind::Recording => self.recording,
            StageKind::Editing => self.editing,
            StageKind::Delivery => self.delivery,
        }
    }
}

/// A production item with its three stage states.
#[derive(Debug, Clone)]
pub struct ProductionItem {
    title: String,
    company_id: DbId,
    period: PeriodKey,
    strategy: String,
    script: String,
    comment: String,
    recording: StageState,
    editing: StageState,
    delivery: StageState,
}

impl ProductionItem {
    /// Create a new item with all three stages pending and unassigned.
    /// Validates the title and the period key.
    pub fn new(
        title: &str,
        company_id: DbId,
        period: PeriodKey,
        dates: InitialDates,
    ) -> Result<Self, CoreError> {
        let title = validate_title(title)?;
        period.validate()?;
        Ok(Self {
            title,
            company_id,
            period,
            strategy: String::new(),
            script: String::new(),
            comment: String::new(),
            recording: StageState::new(StageKind::Recording, dates.for_stage(StageKind::Recording)),
            editing: StageState::new(StageKind::Editing, dates.for_stage(StageKind::Editing)),
            delivery: StageState::new(StageKind::Delivery, dates.for_stage(StageKind::Delivery)),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn company_id(&self) -> DbId {
        self.company_id
    }

    pub fn period(&self) -> PeriodKey {
        self.period
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn stage(&self, kind: StageKind) -> &StageState {
        match kind {
            StageKind::Recording => &self.recording,
            StageKind::Editing => &self.editing,
            StageKind::Delivery => &self.delivery,
        }
    }

    fn stage_mut(&mut self, kind: StageKind) -> &mut StageState {
        match kind {
            StageKind::Recording => &mut self.recording,
            StageKind::Editing => &mut self.editing,
            StageKind::Delivery => &mut self.delivery,
        }
    }

    /// The single mutation entry point for stage fields: dispatch one
    /// command to the named stage, leaving the other stages untouched.
    pub fn apply_stage_update(
        &mut self,
        kind: StageKind,
        update: &StageUpdate,
    ) -> Result<(), CoreError> {
        self.stage_mut(kind).apply(update)
    }

    /// Update one item-level free-text field. The title stays
    /// non-empty; the other fields are unconstrained free text.
    pub fn apply_text_update(&mut self, field: TextField, value: &str) -> Result<(), CoreError> {
        let value = validate_text(field, value)?;
        match field {
            TextField::Title => self.title = value,
            TextField::Strategy => self.strategy = value,
            TextField::Script => self.script = value,
            TextField::Comment => self.comment = value,
        }
        Ok(())
    }
}

/// Validate and normalize an item title: trimmed, non-empty, bounded.
pub fn validate_title(title: &str) -> Result<String, CoreError> {
    validate_text(TextField::Title, title)
}

/// Validate a free-text field value. Only the title must be non-empty.
pub fn validate_text(field: TextField, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if field == TextField::Title && trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Field 'title' must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_TEXT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Field '{}' exceeds maximum length of {MAX_TEXT_LENGTH} characters",
            field.as_str()
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{ReschedulePayload, STATUS_IN_REVIEW, STATUS_PENDING};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(year: i32, month: i32, week: i32) -> PeriodKey {
        PeriodKey { year, month, week }
    }

    fn new_item() -> ProductionItem {
        ProductionItem::new(
            "Acme March teaser",
            1,
            period(2025, 3, 2),
            InitialDates::uniform(date(2025, 3, 10)),
        )
        .unwrap()
    }

    #[test]
    fn new_item_has_all_stages_pending() {
        let item = new_item();
        for kind in StageKind::ALL {
            assert_eq!(item.stage(kind).status(), STATUS_PENDING);
            assert_eq!(item.stage(kind).assignee(), None);
        }
    }

    #[test]
    fn empty_title_rejected() {
        let result = ProductionItem::new(
            "   ",
            1,
            period(2025, 3, 1),
            InitialDates::uniform(date(2025, 3, 1)),
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("'title'"));
    }

    #[test]
    fn month_out_of_range_rejected() {
        let result = ProductionItem::new(
            "Acme",
            1,
            period(2025, 13, 1),
            InitialDates::uniform(date(2025, 3, 1)),
        );
        assert!(result.is_err());
    }

    #[test]
    fn stage_update_touches_only_the_named_stage() {
        let mut item = new_item();
        item.apply_stage_update(
            StageKind::Editing,
            &StageUpdate::Status(STATUS_IN_REVIEW.to_string()),
        )
        .unwrap();

        assert_eq!(item.stage(StageKind::Editing).status(), STATUS_IN_REVIEW);
        assert_eq!(item.stage(StageKind::Recording).status(), STATUS_PENDING);
        assert_eq!(item.stage(StageKind::Delivery).status(), STATUS_PENDING);
    }

    #[test]
    fn incomplete_reschedule_surfaces_from_dispatch() {
        let mut item = new_item();
        let err = item
            .apply_stage_update(
                StageKind::Recording,
                &StageUpdate::Reschedule(ReschedulePayload {
                    new_date: Some(date(2025, 3, 20)),
                    reason: None,
                }),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::IncompleteReschedule));
    }

    #[test]
    fn text_update_replaces_single_field() {
        let mut item = new_item();
        item.apply_text_update(TextField::Strategy, "unboxing angle").unwrap();
        assert_eq!(item.strategy(), "unboxing angle");
        assert_eq!(item.script(), "");
    }

    #[test]
    fn title_update_rejects_empty() {
        let mut item = new_item();
        assert!(item.apply_text_update(TextField::Title, "").is_err());
        assert_eq!(item.title(), "Acme March teaser");
    }

    #[test]
    fn oversized_text_rejected() {
        let mut item = new_item();
        let long = "a".repeat(MAX_TEXT_LENGTH + 1);
        let err = item.apply_text_update(TextField::Comment, &long).unwrap_err();
        assert!(err.to_string().contains("'comment'"));
    }
}
