//! Stage vocabulary and the per-stage schedule state.
//!
//! A production item is tracked through three independent stages, each
//! with its own closed status set, its own (optional) assignee, and its
//! own schedule. The original scheduled date is set once at creation
//! and never mutated; a later date change is recorded as a reschedule
//! (new date + reason) layered on top of it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, ScheduleDate};

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Work on the stage has not started (default for new items).
pub const STATUS_PENDING: &str = "pending";

/// The edit is awaiting review. Only valid for the editing stage.
pub const STATUS_IN_REVIEW: &str = "in_review";

/// The stage is done.
pub const STATUS_COMPLETED: &str = "completed";

// ---------------------------------------------------------------------------
// Stage kinds
// ---------------------------------------------------------------------------

/// The three independently tracked phases of a production item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Recording,
    Editing,
    Delivery,
}

impl StageKind {
    /// All stage kinds in tracking order.
    pub const ALL: [StageKind; 3] = [
        StageKind::Recording,
        StageKind::Editing,
        StageKind::Delivery,
    ];

    /// The snake_case name used in the database and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Recording => "recording",
            StageKind::Editing => "editing",
            StageKind::Delivery => "delivery",
        }
    }

    /// Resolve a stored stage name back to its kind.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "recording" => Some(StageKind::Recording),
            "editing" => Some(StageKind::Editing),
            "delivery" => Some(StageKind::Delivery),
            _ => None,
        }
    }

    /// The closed status set for this stage. Status changes are
    /// free-form within the set; no progression order is enforced.
    pub fn valid_statuses(self) -> &'static [&'static str] {
        match self {
            StageKind::Recording => &[STATUS_PENDING, STATUS_COMPLETED],
            StageKind::Editing => &[STATUS_PENDING, STATUS_IN_REVIEW, STATUS_COMPLETED],
            StageKind::Delivery => &[STATUS_PENDING, STATUS_COMPLETED],
        }
    }

    /// Whether the stage carries an assignee. Delivery does not.
    pub fn is_assignable(self) -> bool {
        !matches!(self, StageKind::Delivery)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Reschedule record
// ---------------------------------------------------------------------------

/// A recorded schedule override: the replacement date and why.
///
/// Created and replaced only as a pair. There is no operation to clear
/// a reschedule once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RescheduleRecord {
    pub new_date: ScheduleDate,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Single-field stage commands
// ---------------------------------------------------------------------------

/// One validated single-field mutation of a stage.
///
/// This is the closed command vocabulary for `PATCH /items/{id}`:
/// unknown (stage, field) combinations fail to deserialize at the API
/// edge instead of surfacing deep inside business logic.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum StageUpdate {
    /// Replace the stage status (validated against the stage's set).
    Status(String),
    /// Assign or clear the responsible actor.
    Assignee(Option<DbId>),
    /// Set or overwrite the reschedule pair.
    Reschedule(ReschedulePayload),
}

/// Wire payload for a reschedule command. Both halves are optional at
/// the edge so an incomplete pair can be reported as a domain error
/// rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ReschedulePayload {
    pub new_date: Option<ScheduleDate>,
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Stage state
// ---------------------------------------------------------------------------

/// The tracked state of one stage of one production item.
///
/// Fields are private: every mutation goes through a setter that
/// enforces the stage rules, and `original_date` has no setter at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageState {
    kind: StageKind,
    status: String,
    assignee: Option<DbId>,
    original_date: ScheduleDate,
    reschedule: Option<RescheduleRecord>,
}

impl StageState {
    /// A fresh stage: pending, unassigned, scheduled for `original_date`.
    pub fn new(kind: StageKind, original_date: ScheduleDate) -> Self {
        Self {
            kind,
            status: STATUS_PENDING.to_string(),
            assignee: None,
            original_date,
            reschedule: None,
        }
    }

    /// Reconstruct persisted state without re-validating. Used by the
    /// repository layer when loading a stage row from the database.
    pub fn from_parts(
        kind: StageKind,
        status: String,
        assignee: Option<DbId>,
        original_date: ScheduleDate,
        reschedule: Option<RescheduleRecord>,
    ) -> Self {
        Self {
            kind,
            status,
            assignee,
            original_date,
            reschedule,
        }
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn assignee(&self) -> Option<DbId> {
        self.assignee
    }

    pub fn original_date(&self) -> ScheduleDate {
        self.original_date
    }

    pub fn reschedule(&self) -> Option<&RescheduleRecord> {
        self.reschedule.as_ref()
    }

    /// Replace the status. Fails if `value` is outside this stage's
    /// closed set; has no other side effect (moving editing straight
    /// from pending to completed is legal).
    pub fn set_status(&mut self, value: &str) -> Result<(), CoreError> {
        if !self.kind.valid_statuses().contains(&value) {
            return Err(CoreError::InvalidStatus {
                stage: self.kind,
                value: value.to_string(),
            });
        }
        self.status = value.to_string();
        Ok(())
    }

    /// Assign or clear the responsible actor. Delivery takes none, so
    /// any call on a delivery stage fails, including clearing.
    pub fn set_assignee(&mut self, actor: Option<DbId>) -> Result<(), CoreError> {
        if !self.kind.is_assignable() {
            return Err(CoreError::NotAssignable { stage: self.kind });
        }
        self.assignee = actor;
        Ok(())
    }

    /// Set or overwrite the reschedule pair. Both halves must be
    /// supplied and the reason must be non-blank; on failure the prior
    /// pair (if any) is left untouched. `original_date` is never
    /// modified.
    pub fn set_reschedule(
        &mut self,
        new_date: Option<ScheduleDate>,
        reason: Option<&str>,
    ) -> Result<(), CoreError> {
        let (Some(new_date), Some(reason)) = (new_date, reason) else {
            return Err(CoreError::IncompleteReschedule);
        };
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CoreError::IncompleteReschedule);
        }
        self.reschedule = Some(RescheduleRecord {
            new_date,
            reason: reason.to_string(),
        });
        Ok(())
    }

    /// Dispatch a single-field command to the matching setter.
    pub fn apply(&mut self, update: &StageUpdate) -> Result<(), CoreError> {
        match update {
            StageUpdate::Status(value) => self.set_status(value),
            StageUpdate::Assignee(actor) => self.set_assignee(*actor),
            StageUpdate::Reschedule(payload) => {
                self.set_reschedule(payload.new_date, payload.reason.as_deref())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
