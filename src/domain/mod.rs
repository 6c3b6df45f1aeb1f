pub mod board;
pub mod ids;
pub mod item;
pub mod itinerary;
pub mod reorder;
pub mod sorting;

pub use board::Board;
pub use ids::{BoardId, ItemId, ItineraryId};
pub use item::{Item, ItemKind, NewItem};
pub use itinerary::{BoardRemoval, Itinerary};
pub use reorder::{MoveOutcome, MovePlan, Slot};
pub use sorting::{sort_itineraries, SortField, SortOrder};
