//! Defaults for idempotent bulk generation.
//!
//! Bulk generation creates one default item per active company for a
//! target (year, month), skipping companies already covered in that
//! month. The anchor date is a policy parameter; when the caller
//! supplies none, the first day of the target month is used.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::item::{InitialDates, ProductionItem};
use crate::period::{validate_month, PeriodKey};
use crate::types::{DbId, ScheduleDate};

/// Week bucket assigned to generated items. Coverage is judged per
/// company per month, so the week is just a display default.
pub const DEFAULT_WEEK: i32 = 1;

/// Deterministic title for a generated item.
pub fn default_title(company_name: &str, year: i32, month: i32) -> String {
    format!("{company_name} {year}-{month:02}")
}

/// The fallback anchor date: the first day of the target month.
pub fn default_anchor(year: i32, month: i32) -> Result<ScheduleDate, CoreError> {
    validate_month(month)?;
    NaiveDate::from_ymd_opt(year, month as u32, 1).ok_or_else(|| {
        CoreError::Validation(format!("Field 'year'/'month' out of range: {year}-{month}"))
    })
}

/// Build the default item for one company: deterministic title, all
/// stages pending and unassigned, every stage scheduled for `anchor`.
pub fn default_item(
    company_id: DbId,
    company_name: &str,
    year: i32,
    month: i32,
    anchor: ScheduleDate,
) -> Result<ProductionItem, CoreError> {
    ProductionItem::new(
        &default_title(company_name, year, month),
        company_id,
        PeriodKey {
            year,
            month,
            week: DEFAULT_WEEK,
        },
        InitialDates::uniform(anchor),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{StageKind, STATUS_PENDING};

    #[test]
    fn title_is_deterministic() {
        assert_eq!(default_title("Acme", 2025, 4), "Acme 2025-04");
        assert_eq!(default_title("Acme", 2025, 4), default_title("Acme", 2025, 4));
    }

    #[test]
    fn anchor_is_first_of_month() {
        let anchor = default_anchor(2025, 4).unwrap();
        assert_eq!(anchor, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    }

    #[test]
    fn anchor_rejects_bad_month() {
        assert!(default_anchor(2025, 0).is_err());
        assert!(default_anchor(2025, 13).is_err());
    }

    #[test]
    fn default_item_is_pending_everywhere() {
        let anchor = default_anchor(2025, 4).unwrap();
        let item = default_item(7, "Acme", 2025, 4, anchor).unwrap();

        assert_eq!(item.title(), "Acme 2025-04");
        assert_eq!(item.period().week, DEFAULT_WEEK);
        for kind in StageKind::ALL {
            let stage = item.stage(kind);
            assert_eq!(stage.status(), STATUS_PENDING);
            assert_eq!(stage.assignee(), None);
            assert_eq!(stage.original_date(), anchor);
            assert!(stage.reschedule().is_none());
        }
    }
}
