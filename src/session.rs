//! The single owner of an itinerary's committed state.
//!
//! A view holds one `ItinerarySession`, reads immutable snapshots from it and
//! routes every edit and drag gesture through it. Each mutating call works on
//! a private copy and swaps it in only when the whole operation succeeded, so
//! a snapshot handed out earlier is never observed half-updated.

use std::mem;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::autosave::{AutosaveHandle, SnapshotSender};
use crate::config::{PlannerConfig, SessionConfig};
use crate::domain::{
    reorder::{self, MoveOutcome},
    Board, BoardId, BoardRemoval, Item, ItemId, ItemKind, Itinerary, NewItem,
};
use crate::error::{ItineraryError, Result};

/// Where the pointer would drop the dragged item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub board_id: BoardId,
    /// Raw index reported by the view; negative values are rejected
    pub index: i64,
}

impl DropTarget {
    pub fn new(board_id: BoardId, index: i64) -> Self {
        Self { board_id, index }
    }

    fn slot_index(&self) -> Result<usize> {
        usize::try_from(self.index).map_err(|_| ItineraryError::InvalidIndex(self.index))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No valid target was hovered; nothing was committed
    Cancelled,
    Committed(MoveOutcome),
}

#[derive(Debug, Clone, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        item_id: ItemId,
        hover: Option<DropTarget>,
    },
}

pub struct ItinerarySession {
    current: Arc<Itinerary>,
    drag: DragState,
    config: SessionConfig,
    board_removal: BoardRemoval,
    saver: Option<SnapshotSender>,
    saved: Option<watch::Receiver<u64>>,
    /// Newest version known to match what storage holds
    synced_version: u64,
}

impl ItinerarySession {
    /// Wraps an itinerary, treating its current version as already persisted
    pub fn new(mut itinerary: Itinerary, config: &PlannerConfig) -> Self {
        itinerary.set_config(config.itinerary.clone());
        let synced_version = itinerary.version();
        Self {
            current: Arc::new(itinerary),
            drag: DragState::Idle,
            config: config.session.clone(),
            board_removal: config.itinerary.board_removal,
            saver: None,
            saved: None,
            synced_version,
        }
    }

    /// Sends every future commit to the autosave task
    pub fn with_autosave(mut self, autosave: &AutosaveHandle) -> Self {
        self.saver = Some(autosave.sender());
        self.saved = Some(autosave.subscribe());
        self
    }

    /// The committed state. Holding the `Arc` keeps that version alive
    /// regardless of later commits.
    pub fn snapshot(&self) -> Arc<Itinerary> {
        Arc::clone(&self.current)
    }

    pub fn version(&self) -> u64 {
        self.current.version()
    }

    /// Newest committed version acknowledged by storage
    pub fn synced_version(&self) -> u64 {
        let acknowledged = self.saved.as_ref().map(|rx| *rx.borrow()).unwrap_or(0);
        self.synced_version.max(acknowledged)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.version() > self.synced_version()
    }

    /// Records that a collaborator persisted `version` outside the autosave task
    pub fn mark_synced(&mut self, version: u64) {
        self.synced_version = self.synced_version.max(version);
    }

    pub fn add_item(&mut self, board_id: &BoardId, new: NewItem) -> Result<ItemId> {
        self.commit("add_item", |it| it.add_item(board_id, new))
    }

    pub fn remove_item(&mut self, item_id: &ItemId) -> Result<Item> {
        self.commit("remove_item", |it| it.remove_item(item_id))
    }

    pub fn move_item(
        &mut self,
        item_id: &ItemId,
        target_board: &BoardId,
        target_index: usize,
    ) -> Result<MoveOutcome> {
        self.commit("move_item", |it| {
            it.move_item(item_id, target_board, target_index)
        })
    }

    pub fn rename_item(&mut self, item_id: &ItemId, title: impl Into<String>) -> Result<()> {
        self.commit("rename_item", |it| it.rename_item(item_id, title))
    }

    pub fn set_item_notes(&mut self, item_id: &ItemId, notes: Option<String>) -> Result<()> {
        self.commit("set_item_notes", |it| it.set_item_notes(item_id, notes))
    }

    pub fn set_item_kind(&mut self, item_id: &ItemId, kind: ItemKind) -> Result<()> {
        self.commit("set_item_kind", |it| it.set_item_kind(item_id, kind))
    }

    pub fn add_board(&mut self, date: NaiveDate) -> Result<BoardId> {
        self.commit("add_board", |it| it.add_board(date))
    }

    /// Removes an edge day using the configured removal policy
    pub fn remove_board(&mut self, board_id: &BoardId) -> Result<Board> {
        let policy = self.board_removal;
        self.commit("remove_board", |it| it.remove_board(board_id, policy))
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<()> {
        let policy = self.board_removal;
        self.commit("set_date_range", |it| it.set_date_range(start, end, policy))
    }

    /// Picks up an item. A drag already in progress is abandoned.
    pub fn drag_start(&mut self, item_id: &ItemId) -> Result<()> {
        if self.current.item(item_id).is_none() {
            return Err(ItineraryError::ItemNotFound(item_id.to_string()));
        }
        if let DragState::Dragging { item_id: previous, .. } = &self.drag {
            debug!(item_id = %previous, "abandoned unfinished drag");
        }
        self.drag = DragState::Dragging {
            item_id: item_id.clone(),
            hover: None,
        };
        Ok(())
    }

    /// Updates the hovered target and returns the order the hovered board
    /// would show. Never touches committed state.
    ///
    /// An invalid target clears the hover, so releasing there cancels.
    pub fn drag_over(&mut self, target: Option<DropTarget>) -> Result<Option<Vec<ItemId>>> {
        let DragState::Dragging { item_id, hover } = &mut self.drag else {
            return Ok(None);
        };
        *hover = None;

        let Some(target) = target else {
            return Ok(None);
        };
        let preview = reorder::preview(
            &self.current,
            item_id,
            &target.board_id,
            target.slot_index()?,
        )?;
        *hover = Some(target);
        Ok(Some(preview))
    }

    /// Drops the dragged item on the hovered target, committing one move.
    ///
    /// Without a hovered target the gesture is cancelled and the committed
    /// state is left exactly as it was. On error the drag is also over and
    /// the item snaps back to its committed slot.
    pub fn drag_end(&mut self) -> Result<DropOutcome> {
        let DragState::Dragging { item_id, hover } = mem::take(&mut self.drag) else {
            return Ok(DropOutcome::Cancelled);
        };
        let Some(target) = hover else {
            debug!(item_id = %item_id, "drag released outside any board");
            return Ok(DropOutcome::Cancelled);
        };

        let index = target.slot_index()?;
        match self.move_item(&item_id, &target.board_id, index) {
            Ok(outcome) => Ok(DropOutcome::Committed(outcome)),
            Err(err) => {
                warn!(item_id = %item_id, error = %err, "drop rejected, item snaps back");
                Err(err)
            }
        }
    }

    pub fn drag_cancel(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn dragged_item(&self) -> Option<&ItemId> {
        match &self.drag {
            DragState::Dragging { item_id, .. } => Some(item_id),
            DragState::Idle => None,
        }
    }

    pub fn hovered_target(&self) -> Option<&DropTarget> {
        match &self.drag {
            DragState::Dragging { hover, .. } => hover.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Adopts a snapshot loaded from the backend.
    ///
    /// Refuses, with `Conflict`, a snapshot of another trip, an inconsistent
    /// snapshot, one older than the version storage already acknowledged, or
    /// one that differs from local commits storage has not yet acknowledged.
    /// Nothing is merged.
    pub fn reconcile(&mut self, mut loaded: Itinerary) -> Result<()> {
        if loaded.id() != self.current.id() {
            return Err(ItineraryError::Conflict(format!(
                "loaded itinerary {} does not match open itinerary {}",
                loaded.id(),
                self.current.id()
            )));
        }
        loaded.validate()?;
        loaded.set_config(self.current.config().clone());

        let synced = self.synced_version();
        if loaded.version() < synced {
            warn!(
                itinerary_id = %loaded.id(),
                synced_version = synced,
                loaded_version = loaded.version(),
                "refusing stale itinerary snapshot"
            );
            return Err(ItineraryError::Conflict(format!(
                "loaded version {} is older than saved version {}",
                loaded.version(),
                synced
            )));
        }

        if loaded == *self.current {
            self.mark_synced(loaded.version());
            return Ok(());
        }
        if self.has_unsaved_changes() {
            warn!(
                itinerary_id = %loaded.id(),
                local_version = self.version(),
                loaded_version = loaded.version(),
                "refusing to overwrite unsaved local edits"
            );
            return Err(ItineraryError::Conflict(format!(
                "local version {} has unsaved edits; loaded version {} differs",
                self.version(),
                loaded.version()
            )));
        }

        if let Some(item_id) = self.dragged_item() {
            if loaded.item(item_id).is_none() {
                self.drag = DragState::Idle;
            }
        }

        info!(
            itinerary_id = %loaded.id(),
            version = loaded.version(),
            "adopted itinerary from storage"
        );
        self.synced_version = loaded.version();
        self.current = Arc::new(loaded);
        Ok(())
    }

    /// Runs `op` on a copy of the committed state and swaps the copy in when
    /// it succeeds and changed something
    fn commit<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut Itinerary) -> Result<T>,
    ) -> Result<T> {
        let mut next = Itinerary::clone(&self.current);
        let output = f(&mut next)?;

        if next.version() != self.current.version() {
            self.current = Arc::new(next);
            info!(
                op,
                itinerary_id = %self.current.id(),
                version = self.current.version(),
                "committed itinerary change"
            );
            self.request_save();
        }
        Ok(output)
    }

    fn request_save(&self) {
        if !self.config.autosave {
            return;
        }
        if let Some(saver) = &self.saver {
            if saver.send(self.snapshot()).is_err() {
                warn!(itinerary_id = %self.current.id(), "autosave task is gone; snapshot not queued");
            }
        }
    }
}
