use slate_core::error::CoreError;

/// Error type for repository operations that run domain logic inside
/// the load-modify-write cycle.
///
/// Domain errors (bad status value, incomplete reschedule, missing
/// item) are caller input errors and surface unchanged; database
/// errors are transport failures. Neither is retried here.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
