use crate::stage::StageKind;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid status '{value}' for field 'status' of the {stage} stage")]
    InvalidStatus { stage: StageKind, value: String },

    #[error("The {stage} stage does not take an assignee")]
    NotAssignable { stage: StageKind },

    #[error("Reschedule requires both a new date and a reason")]
    IncompleteReschedule,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
