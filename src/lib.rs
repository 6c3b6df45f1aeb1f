//! # Itinerary Core
//!
//! Domain model and drag-reorder engine for day-by-day trip itineraries.
//!
//! A trip is an [`Itinerary`] holding one [`Board`] per calendar day, each
//! an ordered list of [`Item`]s. Items are reordered within and across days
//! by the engine in [`domain::reorder`]; an [`ItinerarySession`] owns the
//! committed state for a view, turns drag gestures into moves and hands
//! committed snapshots to an optional background autosave. Rendering and
//! transport stay with the caller.

pub mod autosave;
pub mod config;
pub mod domain;
pub mod error;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use autosave::{spawn_autosave, AutosaveHandle};
pub use config::{AutosaveConfig, ItineraryConfig, PlannerConfig, SessionConfig};
pub use domain::{
    board::Board,
    ids::{BoardId, ItemId, ItineraryId},
    item::{Item, ItemKind, NewItem},
    itinerary::{BoardRemoval, Itinerary},
    reorder::{MoveOutcome, MovePlan, Slot},
};
pub use error::{ItineraryError, Result};
pub use session::{DropOutcome, DropTarget, ItinerarySession};
pub use storage::{FileStorage, Storage};
