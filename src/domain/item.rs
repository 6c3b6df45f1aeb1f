use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::ids::{BoardId, ItemId};

/// What kind of stop an item represents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Place,
    Activity,
    Meal,
    Transport,
    Lodging,
    Other,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Place => write!(f, "Place"),
            Self::Activity => write!(f, "Activity"),
            Self::Meal => write!(f, "Meal"),
            Self::Transport => write!(f, "Transport"),
            Self::Lodging => write!(f, "Lodging"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A schedulable entry owned by exactly one board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub board_id: BoardId,
    /// Dense order key within the owning board, starting at 0
    pub position: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub(crate) fn from_new(id: ItemId, new: NewItem, board_id: BoardId, position: u32) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: new.title.trim().to_string(),
            kind: new.kind,
            notes: new.notes,
            board_id,
            position,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Input for creating an item on a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    /// Caller-chosen id; a fresh one is generated when absent
    pub id: Option<ItemId>,
    pub title: String,
    pub kind: ItemKind,
    pub notes: Option<String>,
}

impl NewItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            kind: ItemKind::default(),
            notes: None,
        }
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
