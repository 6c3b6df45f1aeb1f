use crate::{
    config::PlannerConfig,
    domain::{Itinerary, ItineraryId},
    error::{ItineraryError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};
use tokio::fs;
use tracing::debug;

/// File-based storage implementation: one JSON document per trip
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const DATA_DIR: &'static str = ".itinerary";
    const TRIPS_DIR: &'static str = "trips";
    const CONFIG_FILE: &'static str = "config.toml";

    /// Creates a new FileStorage instance under the given root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().join(Self::DATA_DIR),
        }
    }

    fn trips_dir(&self) -> PathBuf {
        self.root_path.join(Self::TRIPS_DIR)
    }

    fn config_file(&self) -> PathBuf {
        self.root_path.join(Self::CONFIG_FILE)
    }

    fn trip_file(&self, id: &ItineraryId) -> PathBuf {
        self.trips_dir().join(format!("{}.json", id.as_str()))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Reads `config.toml` from the data directory, falling back to defaults
    /// when the file does not exist
    pub async fn load_config(&self) -> Result<PlannerConfig> {
        let path = self.config_file();
        if !path.exists() {
            return Ok(PlannerConfig::default());
        }

        let contents = fs::read_to_string(&path).await?;
        PlannerConfig::from_toml_str(&contents)
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;
        self.ensure_directory_exists(&self.trips_dir()).await?;

        let gitignore_path = self.root_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "# Partial writes\n*.tmp\n").await?;
        }

        Ok(())
    }

    async fn save_itinerary(&self, itinerary: &Itinerary) -> Result<()> {
        self.ensure_directory_exists(&self.trips_dir()).await?;

        let json = serde_json::to_string_pretty(itinerary)?;
        let file_path = self.trip_file(itinerary.id());
        let tmp_path = file_path.with_extension("json.tmp");

        // Readers never see a half-written snapshot.
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &file_path).await?;

        debug!(itinerary_id = %itinerary.id(), version = itinerary.version(), "saved itinerary");
        Ok(())
    }

    async fn load_itinerary(&self, id: &ItineraryId) -> Result<Itinerary> {
        let file_path = self.trip_file(id);

        if !file_path.exists() {
            return Err(ItineraryError::ItineraryNotFound(id.to_string()));
        }

        let contents = fs::read_to_string(&file_path).await?;
        let itinerary: Itinerary = serde_json::from_str(&contents)?;
        itinerary.validate()?;

        Ok(itinerary)
    }

    async fn list_itinerary_ids(&self) -> Result<Vec<ItineraryId>> {
        let trips_dir = self.trips_dir();

        if !trips_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&trips_dir).await?;
        let mut ids: Vec<ItineraryId> = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if let Ok(id) = ItineraryId::from_str(stem) {
                        ids.push(id);
                    }
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    async fn search_itineraries(&self, query: &str) -> Result<Vec<Itinerary>> {
        let ids = self.list_itinerary_ids().await?;
        let query_lower = query.to_lowercase();
        let mut matching = Vec::new();

        for id in ids {
            let itinerary = self.load_itinerary(&id).await?;

            let name_matches = itinerary.name().to_lowercase().contains(&query_lower);

            let item_matches = itinerary.items().any(|item| {
                item.title.to_lowercase().contains(&query_lower)
                    || item
                        .notes
                        .as_ref()
                        .map(|n| n.to_lowercase().contains(&query_lower))
                        .unwrap_or(false)
            });

            if name_matches || item_matches {
                matching.push(itinerary);
            }
        }

        Ok(matching)
    }

    async fn delete_itinerary(&self, id: &ItineraryId) -> Result<()> {
        let file_path = self.trip_file(id);

        if !file_path.exists() {
            return Err(ItineraryError::ItineraryNotFound(id.to_string()));
        }

        fs::remove_file(file_path).await?;
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.trips_dir().exists()
    }
}
