//! Period keys and the weekly grouping used by the review view.
//!
//! A period is a caller-supplied (year, month, week) grouping key. The
//! core never derives "now" or does calendar arithmetic; week numbers
//! are opaque positive integers chosen by the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The (year, month, week) grouping key of a production item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodKey {
    pub year: i32,
    pub month: i32,
    pub week: i32,
}

impl PeriodKey {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_month(self.month)?;
        validate_week(self.week)
    }
}

/// Months are 1-12.
pub fn validate_month(month: i32) -> Result<(), CoreError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Field 'month' must be between 1 and 12, got {month}"
        )))
    }
}

/// Week numbers are positive, caller-supplied, not calendar-derived.
pub fn validate_week(week: i32) -> Result<(), CoreError> {
    if week >= 1 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Field 'week' must be a positive integer, got {week}"
        )))
    }
}

/// Partition an already-ordered item list into week buckets, keyed
/// ascending. Every input item lands in exactly one bucket and the
/// relative order within a bucket is preserved, so the union of all
/// buckets equals the input.
pub fn group_by_week<T>(items: Vec<T>, week_of: impl Fn(&T) -> i32) -> BTreeMap<i32, Vec<T>> {
    let mut grouped: BTreeMap<i32, Vec<T>> = BTreeMap::new();
    for item in items {
        grouped.entry(week_of(&item)).or_default().push(item);
    }
    grouped
}

/// Insert empty buckets for weeks 1 through the highest occupied week.
/// The default display omits empty weeks; callers opt in explicitly.
pub fn fill_empty_weeks<T>(grouped: &mut BTreeMap<i32, Vec<T>>) {
    let Some(max_week) = grouped.keys().next_back().copied() else {
        return;
    };
    for week in 1..=max_week {
        grouped.entry(week).or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn month_error_names_the_field() {
        let err = validate_month(13).unwrap_err();
        assert!(err.to_string().contains("'month'"));
    }

    #[test]
    fn week_must_be_positive() {
        assert!(validate_week(1).is_ok());
        assert!(validate_week(0).is_err());
        assert!(validate_week(-3).is_err());
    }

    #[test]
    fn grouping_partitions_every_item_exactly_once() {
        let items = vec![(1, "a"), (2, "b"), (1, "c"), (4, "d")];
        let grouped = group_by_week(items.clone(), |(w, _)| *w);

        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total, items.len());
        assert_eq!(grouped[&1], vec![(1, "a"), (1, "c")]);
        assert_eq!(grouped[&2], vec![(2, "b")]);
        assert_eq!(grouped[&4], vec![(4, "d")]);
    }

    #[test]
    fn grouping_keys_are_ascending() {
        let grouped = group_by_week(vec![(3, ()), (1, ()), (2, ())], |(w, _)| *w);
        let weeks: Vec<i32> = grouped.keys().copied().collect();
        assert_eq!(weeks, vec![1, 2, 3]);
    }

    #[test]
    fn empty_weeks_omitted_by_default() {
        let grouped = group_by_week(vec![(1, ()), (4, ())], |(w, _)| *w);
        assert!(!grouped.contains_key(&2));
        assert!(!grouped.contains_key(&3));
    }

    #[test]
    fn fill_adds_gaps_up_to_highest_week() {
        let mut grouped = group_by_week(vec![(1, ()), (4, ())], |(w, _)| *w);
        fill_empty_weeks(&mut grouped);
        assert_eq!(grouped.len(), 4);
        assert!(grouped[&2].is_empty());
        assert!(grouped[&3].is_empty());
    }

    #[test]
    fn fill_on_empty_map_is_noop() {
        let mut grouped: BTreeMap<i32, Vec<()>> = BTreeMap::new();
        fill_empty_weeks(&mut grouped);
        assert!(grouped.is_empty());
    }
}
