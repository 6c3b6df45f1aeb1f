use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::error::ItineraryError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            const PREFIX: &'static str = $prefix;

            /// Generates a fresh, globally unique id
            pub fn generate() -> Self {
                Self(format!("{}-{}", Self::PREFIX, Uuid::new_v4()))
            }

            /// Returns the string representation
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ItineraryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() || s.chars().any(char::is_whitespace) {
                    return Err(ItineraryError::InvalidId(s.to_string()));
                }
                Ok(Self(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a trip (e.g., `trip-6f1c...`)
    ItineraryId,
    "trip"
);

string_id!(
    /// Identifier of a single day board
    BoardId,
    "day"
);

string_id!(
    /// Identifier of a place or activity on a board
    ItemId,
    "item"
);
