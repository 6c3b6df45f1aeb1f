use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ids::{BoardId, ItemId};

/// One calendar day of a trip: an ordered list of item ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub date: NaiveDate,
    pub items: Vec<ItemId>,
}

impl Board {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: BoardId::generate(),
            date,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of an item within this board, if present
    pub fn position_of(&self, item_id: &ItemId) -> Option<usize> {
        self.items.iter().position(|id| id == item_id)
    }
}
