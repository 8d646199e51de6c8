use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("deck source unreachable: {0}")]
    Unreachable(String),
    #[error("deck source answered with status {0}")]
    Status(u16),
    #[error("malformed deck payload: {0}")]
    Malformed(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("deck load failed: {0}")]
    LoadFailed(String),
    #[error("deck not loaded")]
    NotLoaded,
    #[error("deck is empty")]
    EmptyDeck,
    #[error("all {capacity} slots are filled")]
    SlotsFull { capacity: usize },
    #[error("card {0} already occupies a slot")]
    AlreadySeated(u32),
    #[error("slot index {0} out of range")]
    SlotOutOfRange(usize),
}

impl From<SourceError> for DrawError {
    fn from(value: SourceError) -> Self {
        Self::LoadFailed(value.to_string())
    }
}
