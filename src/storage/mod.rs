use crate::{
    domain::{Itinerary, ItineraryId},
    error::Result,
};
use async_trait::async_trait;

pub mod file_storage;

pub use file_storage::FileStorage;

/// Storage trait for persisting itinerary snapshots
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Saves a full itinerary snapshot, replacing any previous one with the same id
    async fn save_itinerary(&self, itinerary: &Itinerary) -> Result<()>;

    /// Loads and validates an itinerary by ID
    async fn load_itinerary(&self, id: &ItineraryId) -> Result<Itinerary>;

    /// Lists all itinerary IDs
    async fn list_itinerary_ids(&self) -> Result<Vec<ItineraryId>>;

    /// Returns itineraries whose name, item titles or item notes contain the
    /// query (case-insensitive)
    async fn search_itineraries(&self, query: &str) -> Result<Vec<Itinerary>>;

    /// Deletes an itinerary
    async fn delete_itinerary(&self, id: &ItineraryId) -> Result<()>;

    /// Checks if the storage is initialized
    async fn is_initialized(&self) -> bool;
}
