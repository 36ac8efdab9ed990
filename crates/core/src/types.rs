/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Schedule dates carry no time-of-day component.
pub type ScheduleDate = chrono::NaiveDate;
