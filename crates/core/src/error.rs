use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unparseable time of day: {0:?}")]
    BadTime(String),
    #[error("invalid time range: start of day {start} is not before end of day {end}")]
    InvalidTimeRange { start: String, end: String },
    #[error("slot duration must be positive, got {0} minutes")]
    SlotDuration(i64),
    #[error("time grid has no days")]
    NoDays,
    #[error("time range {start}..{end} holds no complete slot")]
    EmptyGrid { start: String, end: String },
    #[error("invalid parameters: {0}")]
    Params(String),
}
