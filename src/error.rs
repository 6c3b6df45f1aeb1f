use thiserror::Error;

pub type Result<T> = std::result::Result<T, ItineraryError>;

#[derive(Debug, Error)]
pub enum ItineraryError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Itinerary not found: {0}")]
    ItineraryNotFound(String),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid target index: {0}")]
    InvalidIndex(i64),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid identifier: {0:?}")]
    InvalidId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage not initialized. Call initialize() first.")]
    NotInitialized,
}

impl ItineraryError {
    /// True for the family of errors raised when an unknown id is referenced
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ItemNotFound(_) | Self::BoardNotFound(_) | Self::ItineraryNotFound(_)
        )
    }

    /// True for range errors: inverted dates, misaligned boards, negative indices
    pub fn is_invalid_range(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateRange { .. } | Self::InvalidRange(_) | Self::InvalidIndex(_)
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<toml::de::Error> for ItineraryError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_families() {
        assert!(ItineraryError::ItemNotFound("x".into()).is_not_found());
        assert!(ItineraryError::BoardNotFound("x".into()).is_not_found());
        assert!(!ItineraryError::Conflict("x".into()).is_not_found());

        assert!(ItineraryError::InvalidIndex(-1).is_invalid_range());
        assert!(ItineraryError::InvalidDateRange {
            start: "2025-01-02".into(),
            end: "2025-01-01".into()
        }
        .is_invalid_range());
        assert!(ItineraryError::Conflict("dup".into()).is_conflict());
    }

    #[test]
    fn test_error_messages() {
        let err = ItineraryError::ItemNotFound("item-1".into());
        assert_eq!(err.to_string(), "Item not found: item-1");

        let err = ItineraryError::InvalidIndex(-3);
        assert_eq!(err.to_string(), "Invalid target index: -3");
    }
}
