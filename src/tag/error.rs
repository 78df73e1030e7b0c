use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TagError {
    #[error("tier `{0}` not found")]
    TierNotFound(String),

    #[error("cell is not a member of the given tier")]
    CellNotFound,

    #[error("invalid time point `{0}`")]
    InvalidTimepoint(String),

    #[error("event is missing its `{0}` attribute")]
    MissingAttribute(&'static str),

    #[error("cell span ends at T{end} before it starts at T{start}")]
    InvertedSpan { start: u32, end: u32 },
}
