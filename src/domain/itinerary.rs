use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::mem;
use tracing::debug;

use crate::config::ItineraryConfig;
use crate::domain::{
    board::Board,
    ids::{BoardId, ItemId, ItineraryId},
    item::{Item, ItemKind, NewItem},
    reorder::{self, MoveOutcome},
};
use crate::error::{ItineraryError, Result};

/// What happens to the items of a board that is removed from the trip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardRemoval {
    /// Move the items onto the adjacent surviving day
    #[default]
    Reassign,
    /// Delete the items together with the board
    Cascade,
}

/// A trip: one board per calendar day between `start_date` and `end_date`.
///
/// Invariants held after every mutation:
/// - every item belongs to exactly one board, and the board lists it exactly once
/// - item positions within a board are `0..len` in list order
/// - `boards[i].date == start_date + i` and the last board is `end_date`
/// - no board id or item id appears twice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    id: ItineraryId,
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    pub(crate) boards: Vec<Board>,
    pub(crate) items: BTreeMap<ItemId, Item>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    config: ItineraryConfig,
}

impl Itinerary {
    /// Creates a trip with one empty board per day of the range
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::with_config(name, start, end, ItineraryConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        config: ItineraryConfig,
    ) -> Result<Self> {
        check_range(start, end, &config)?;

        let boards = start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(Board::new)
            .collect();
        let now = Utc::now();

        Ok(Self {
            id: ItineraryId::generate(),
            name: name.into(),
            start_date: start,
            end_date: end,
            boards,
            items: BTreeMap::new(),
            version: 0,
            created_at: now,
            updated_at: now,
            config,
        })
    }

    pub fn id(&self) -> &ItineraryId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Monotonic counter bumped once per committed mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn config(&self) -> &ItineraryConfig {
        &self.config
    }

    /// Replaces the range limits; snapshots loaded from storage start with defaults
    pub fn set_config(&mut self, config: ItineraryConfig) {
        self.config = config;
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board(&self, id: &BoardId) -> Option<&Board> {
        self.boards.iter().find(|board| &board.id == id)
    }

    pub fn board_for_date(&self, date: NaiveDate) -> Option<&Board> {
        let offset = usize::try_from(date.signed_duration_since(self.start_date).num_days()).ok()?;
        self.boards.get(offset)
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Items of a board in display order
    pub fn items_in(&self, board_id: &BoardId) -> Result<Vec<&Item>> {
        let board = self
            .board(board_id)
            .ok_or_else(|| ItineraryError::BoardNotFound(board_id.to_string()))?;
        Ok(board
            .items
            .iter()
            .filter_map(|id| self.items.get(id))
            .collect())
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn day_count(&self) -> usize {
        self.boards.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Renames the trip
    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.name {
            self.name = name;
            self.commit();
        }
    }

    /// Appends an item at the end of the given board
    pub fn add_item(&mut self, board_id: &BoardId, new: NewItem) -> Result<ItemId> {
        let board_idx = self.board_index(board_id)?;
        if new.title.trim().is_empty() {
            return Err(ItineraryError::InvalidInput(
                "item title must not be empty".to_string(),
            ));
        }

        let id = match &new.id {
            Some(id) if self.items.contains_key(id) => {
                return Err(ItineraryError::Conflict(format!(
                    "item id {} already exists",
                    id
                )));
            }
            Some(id) => id.clone(),
            None => ItemId::generate(),
        };

        let board = &mut self.boards[board_idx];
        let position = to_position(board.items.len());
        board.items.push(id.clone());
        self.items.insert(
            id.clone(),
            Item::from_new(id.clone(), new, board_id.clone(), position),
        );
        self.commit();

        debug!(item_id = %id, board_id = %board_id, position, "added item");
        Ok(id)
    }

    /// Removes an item and closes the gap it leaves in its board
    pub fn remove_item(&mut self, item_id: &ItemId) -> Result<Item> {
        let (board_idx, index) = self.locate(item_id)?;
        let item = self
            .items
            .remove(item_id)
            .ok_or_else(|| ItineraryError::ItemNotFound(item_id.to_string()))?;

        self.boards[board_idx].items.remove(index);
        self.renumber(board_idx);
        self.commit();

        debug!(item_id = %item_id, board_id = %item.board_id, "removed item");
        Ok(item)
    }

    /// Moves an item to `target_index` of `target_board`.
    ///
    /// The index is the final position after the move and is clamped to the
    /// end of the board. Moving an item onto its current slot is a no-op and
    /// does not bump the version.
    pub fn move_item(
        &mut self,
        item_id: &ItemId,
        target_board: &BoardId,
        target_index: usize,
    ) -> Result<MoveOutcome> {
        let outcome = reorder::plan_move(self, item_id, target_board, target_index)?;
        if let MoveOutcome::Moved(plan) = &outcome {
            reorder::apply_plan(self, plan)?;
            self.commit();
            debug!(
                item_id = %item_id,
                from_board = %plan.from.board_id,
                from_index = plan.from.index,
                to_board = %plan.to.board_id,
                to_index = plan.to.index,
                "moved item"
            );
        }
        Ok(outcome)
    }

    pub fn rename_item(&mut self, item_id: &ItemId, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ItineraryError::InvalidInput(
                "item title must not be empty".to_string(),
            ));
        }
        self.edit_item(item_id, |item| {
            replace_if_changed(&mut item.title, title.trim().to_string())
        })
    }

    pub fn set_item_notes(&mut self, item_id: &ItemId, notes: Option<String>) -> Result<()> {
        self.edit_item(item_id, |item| replace_if_changed(&mut item.notes, notes))
    }

    pub fn set_item_kind(&mut self, item_id: &ItemId, kind: ItemKind) -> Result<()> {
        self.edit_item(item_id, |item| replace_if_changed(&mut item.kind, kind))
    }

    /// Returns the board for `date`, extending the trip with empty days when
    /// the date lies outside the current range
    pub fn add_board(&mut self, date: NaiveDate) -> Result<BoardId> {
        if let Some(board) = self.board_for_date(date) {
            return Ok(board.id.clone());
        }

        let (start, end) = if date < self.start_date {
            (date, self.end_date)
        } else {
            (self.start_date, date)
        };
        check_range(start, end, &self.config)?;

        self.extend_to(start, end);
        self.commit();

        let board_id = self
            .board_for_date(date)
            .map(|board| board.id.clone())
            .ok_or_else(|| ItineraryError::InvalidRange(format!("no board for {}", date)))?;
        debug!(board_id = %board_id, %date, days = self.boards.len(), "extended itinerary");
        Ok(board_id)
    }

    /// Removes the first or last day of the trip and returns it.
    ///
    /// Interior days cannot be removed without breaking date alignment.
    pub fn remove_board(&mut self, board_id: &BoardId, policy: BoardRemoval) -> Result<Board> {
        let idx = self.board_index(board_id)?;
        if self.boards.len() == 1 {
            return Err(ItineraryError::InvalidRange(
                "cannot remove the only day of an itinerary".to_string(),
            ));
        }
        if idx != 0 && idx != self.boards.len() - 1 {
            return Err(ItineraryError::InvalidRange(format!(
                "day {} is inside the trip; only the first or last day can be removed",
                self.boards[idx].date
            )));
        }

        let removed = self.pop_edge(idx, policy);
        self.commit();

        debug!(board_id = %board_id, ?policy, items = removed.items.len(), "removed board");
        Ok(removed)
    }

    /// Changes the trip's date range. Days inside both ranges keep their
    /// boards, new days start empty, and items on trimmed days follow `policy`:
    /// those from before `start` go to the front of the first day, those from
    /// after `end` to the back of the last day.
    pub fn set_date_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        policy: BoardRemoval,
    ) -> Result<()> {
        check_range(start, end, &self.config)?;
        if start == self.start_date && end == self.end_date {
            return Ok(());
        }

        let mut trimmed_front = Vec::new();
        let mut kept = Vec::new();
        let mut trimmed_back = Vec::new();
        for board in mem::take(&mut self.boards) {
            if board.date < start {
                trimmed_front.extend(board.items);
            } else if board.date > end {
                trimmed_back.extend(board.items);
            } else {
                kept.push(board);
            }
        }

        let mut kept = kept.into_iter().peekable();
        self.boards = start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|day| {
                kept.next_if(|board| board.date == day)
                    .unwrap_or_else(|| Board::new(day))
            })
            .collect();
        self.start_date = start;
        self.end_date = end;

        match policy {
            BoardRemoval::Reassign => {
                let last = self.boards.len() - 1;
                self.boards[0].items.splice(0..0, trimmed_front);
                self.boards[last].items.extend(trimmed_back);
                self.renumber(0);
                self.renumber(last);
            }
            BoardRemoval::Cascade => {
                for item_id in trimmed_front.iter().chain(&trimmed_back) {
                    self.items.remove(item_id);
                }
            }
        }
        self.commit();

        debug!(%start, %end, ?policy, "changed date range");
        Ok(())
    }

    /// Checks every structural invariant.
    ///
    /// Duplicate or dangling ids yield `Conflict`; misaligned dates and
    /// positions yield `InvalidRange`.
    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(ItineraryError::InvalidDateRange {
                start: self.start_date.to_string(),
                end: self.end_date.to_string(),
            });
        }

        let expected_days = day_span(self.start_date, self.end_date);
        if self.boards.len() as i64 != expected_days {
            return Err(ItineraryError::InvalidRange(format!(
                "{} boards for a {}-day range",
                self.boards.len(),
                expected_days
            )));
        }

        let mut board_ids = HashSet::new();
        let mut placed = HashSet::new();

        for (board, day) in self.boards.iter().zip(self.start_date.iter_days()) {
            if board.date != day {
                return Err(ItineraryError::InvalidRange(format!(
                    "board {} is dated {} but expected {}",
                    board.id, board.date, day
                )));
            }
            if !board_ids.insert(&board.id) {
                return Err(ItineraryError::Conflict(format!(
                    "duplicate board id {}",
                    board.id
                )));
            }

            for (index, item_id) in board.items.iter().enumerate() {
                if !placed.insert(item_id) {
                    return Err(ItineraryError::Conflict(format!(
                        "duplicate item id {}",
                        item_id
                    )));
                }
                let item = self.items.get(item_id).ok_or_else(|| {
                    ItineraryError::Conflict(format!(
                        "board {} references unknown item {}",
                        board.id, item_id
                    ))
                })?;
                if item.board_id != board.id || item.position as usize != index {
                    return Err(ItineraryError::InvalidRange(format!(
                        "item {} is recorded at {}#{} but listed at {}#{}",
                        item_id, item.board_id, item.position, board.id, index
                    )));
                }
            }
        }

        if placed.len() != self.items.len() {
            return Err(ItineraryError::Conflict(format!(
                "{} items are not on any board",
                self.items.len() - placed.len()
            )));
        }

        Ok(())
    }

    pub(crate) fn board_index(&self, id: &BoardId) -> Result<usize> {
        self.boards
            .iter()
            .position(|board| &board.id == id)
            .ok_or_else(|| ItineraryError::BoardNotFound(id.to_string()))
    }

    /// Board index and list index of an item
    pub(crate) fn locate(&self, item_id: &ItemId) -> Result<(usize, usize)> {
        let item = self
            .items
            .get(item_id)
            .ok_or_else(|| ItineraryError::ItemNotFound(item_id.to_string()))?;
        let board_idx = self.board_index(&item.board_id)?;
        let index = self.boards[board_idx]
            .position_of(item_id)
            .ok_or_else(|| ItineraryError::ItemNotFound(item_id.to_string()))?;
        Ok((board_idx, index))
    }

    /// Rewrites positions and back-references of a board's items to match list order
    pub(crate) fn renumber(&mut self, board_idx: usize) {
        let board = &self.boards[board_idx];
        for (index, item_id) in board.items.iter().enumerate() {
            if let Some(item) = self.items.get_mut(item_id) {
                item.board_id = board.id.clone();
                item.position = to_position(index);
            }
        }
    }

    /// Applies `edit`, which reports whether it changed anything; unchanged
    /// items keep their timestamp and the version stays put
    fn edit_item(&mut self, item_id: &ItemId, edit: impl FnOnce(&mut Item) -> bool) -> Result<()> {
        let item = self
            .items
            .get_mut(item_id)
            .ok_or_else(|| ItineraryError::ItemNotFound(item_id.to_string()))?;
        if edit(item) {
            item.touch();
            self.commit();
        }
        Ok(())
    }

    /// Adds empty boards so the trip covers `start..=end`. Never shrinks.
    fn extend_to(&mut self, start: NaiveDate, end: NaiveDate) {
        if start < self.start_date {
            let current_start = self.start_date;
            let front: Vec<Board> = start
                .iter_days()
                .take_while(|day| *day < current_start)
                .map(Board::new)
                .collect();
            self.boards.splice(0..0, front);
            self.start_date = start;
        }
        if end > self.end_date {
            let back = self
                .end_date
                .iter_days()
                .skip(1)
                .take_while(|day| *day <= end)
                .map(Board::new);
            self.boards.extend(back);
            self.end_date = end;
        }
    }

    /// Removes the board at `idx` (first or last, with at least one other
    /// board remaining) and hands its items to the neighbour or drops them.
    fn pop_edge(&mut self, idx: usize, policy: BoardRemoval) -> Board {
        let removed = self.boards.remove(idx);
        let neighbour = if idx == 0 { 0 } else { self.boards.len() - 1 };

        match policy {
            BoardRemoval::Reassign => {
                let target = &mut self.boards[neighbour].items;
                if idx == 0 {
                    // Earlier day: its items come before the new first day's items.
                    target.splice(0..0, removed.items.iter().cloned());
                } else {
                    target.extend(removed.items.iter().cloned());
                }
                self.renumber(neighbour);
            }
            BoardRemoval::Cascade => {
                for item_id in &removed.items {
                    self.items.remove(item_id);
                }
            }
        }

        if let (Some(first), Some(last)) = (self.boards.first(), self.boards.last()) {
            self.start_date = first.date;
            self.end_date = last.date;
        }
        removed
    }

    fn commit(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

/// Inclusive number of days from `start` to `end`
fn day_span(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days() + 1
}

fn check_range(start: NaiveDate, end: NaiveDate, config: &ItineraryConfig) -> Result<()> {
    if start > end {
        return Err(ItineraryError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    let days = day_span(start, end);
    if days > i64::from(config.max_days) {
        return Err(ItineraryError::InvalidRange(format!(
            "{} days exceeds the maximum of {}",
            days, config.max_days
        )));
    }
    Ok(())
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn to_position(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn trip(days: u32) -> Itinerary {
        Itinerary::new("Paris", date(1), date(days)).unwrap()
    }

    fn titles(itinerary: &Itinerary, board_idx: usize) -> Vec<String> {
        let board_id = itinerary.boards()[board_idx].id.clone();
        itinerary
            .items_in(&board_id)
            .unwrap()
            .into_iter()
            .map(|item| item.title.clone())
            .collect()
    }

    #[test]
    fn test_itinerary_creation() {
        let itinerary = trip(3);

        assert_eq!(itinerary.day_count(), 3);
        assert_eq!(itinerary.boards()[0].date, date(1));
        assert_eq!(itinerary.boards()[2].date, date(3));
        assert_eq!(itinerary.version(), 0);
        itinerary.validate().unwrap();
    }

    #[test]
    fn test_single_day_itinerary() {
        let itinerary = Itinerary::new("Day trip", date(5), date(5)).unwrap();
        assert_eq!(itinerary.day_count(), 1);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = Itinerary::new("Backwards", date(3), date(1)).unwrap_err();
        assert!(matches!(err, ItineraryError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_range_longer_than_limit_is_rejected() {
        let config = ItineraryConfig {
            max_days: 2,
            ..ItineraryConfig::default()
        };
        let err = Itinerary::with_config("Long", date(1), date(3), config).unwrap_err();
        assert!(matches!(err, ItineraryError::InvalidRange(_)));
    }

    #[test]
    fn test_add_item_appends_with_dense_positions() {
        let mut itinerary = trip(2);
        let day0 = itinerary.boards()[0].id.clone();

        let a = itinerary.add_item(&day0, NewItem::new("A")).unwrap();
        let b = itinerary.add_item(&day0, NewItem::new("B")).unwrap();

        assert_eq!(itinerary.item(&a).unwrap().position, 0);
        assert_eq!(itinerary.item(&b).unwrap().position, 1);
        assert_eq!(itinerary.version(), 2);
        itinerary.validate().unwrap();
    }

    #[test]
    fn test_add_item_unknown_board() {
        let mut itinerary = trip(1);
        let err = itinerary
            .add_item(&BoardId::generate(), NewItem::new("A"))
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(itinerary.version(), 0);
    }

    #[test]
    fn test_add_item_rejects_duplicate_id_and_blank_title() {
        let mut itinerary = trip(1);
        let day0 = itinerary.boards()[0].id.clone();
        let id = ItemId::from_str("louvre").unwrap();

        itinerary
            .add_item(&day0, NewItem::new("Louvre").with_id(id.clone()))
            .unwrap();
        let err = itinerary
            .add_item(&day0, NewItem::new("Again").with_id(id))
            .unwrap_err();
        assert!(err.is_conflict());

        let err = itinerary.add_item(&day0, NewItem::new("   ")).unwrap_err();
        assert!(matches!(err, ItineraryError::InvalidInput(_)));
        assert_eq!(itinerary.item_count(), 1);
    }

    #[test]
    fn test_remove_item_recompacts_positions() {
        let mut itinerary = trip(1);
        let day0 = itinerary.boards()[0].id.clone();
        let _a = itinerary.add_item(&day0, NewItem::new("A")).unwrap();
        let b = itinerary.add_item(&day0, NewItem::new("B")).unwrap();
        let c = itinerary.add_item(&day0, NewItem::new("C")).unwrap();

        let removed = itinerary.remove_item(&b).unwrap();

        assert_eq!(removed.title, "B");
        assert_eq!(titles(&itinerary, 0), vec!["A", "C"]);
        assert_eq!(itinerary.item(&c).unwrap().position, 1);
        itinerary.validate().unwrap();
    }

    #[test]
    fn test_remove_unknown_item() {
        let mut itinerary = trip(1);
        let err = itinerary.remove_item(&ItemId::generate()).unwrap_err();
        assert!(matches!(err, ItineraryError::ItemNotFound(_)));
    }

    #[test]
    fn test_item_edits() {
        let mut itinerary = trip(1);
        let day0 = itinerary.boards()[0].id.clone();
        let id = itinerary.add_item(&day0, NewItem::new("Lunch")).unwrap();

        itinerary.rename_item(&id, "Long lunch").unwrap();
        itinerary.set_item_kind(&id, ItemKind::Meal).unwrap();
        itinerary
            .set_item_notes(&id, Some("Reservation at 1pm".to_string()))
            .unwrap();

        let item = itinerary.item(&id).unwrap();
        assert_eq!(item.title, "Long lunch");
        assert_eq!(item.kind, ItemKind::Meal);
        assert_eq!(item.notes.as_deref(), Some("Reservation at 1pm"));
        assert_eq!(item.position, 0);

        assert!(itinerary.rename_item(&id, "").is_err());
        assert!(itinerary
            .rename_item(&ItemId::generate(), "x")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_unchanged_item_edits_keep_version() {
        let mut itinerary = trip(1);
        let day0 = itinerary.boards()[0].id.clone();
        let id = itinerary
            .add_item(&day0, NewItem::new("X").with_notes("n"))
            .unwrap();
        let before = itinerary.clone();

        itinerary.rename_item(&id, "X").unwrap();
        itinerary.rename_item(&id, "  X ").unwrap();
        itinerary.set_item_kind(&id, ItemKind::Place).unwrap();
        itinerary
            .set_item_notes(&id, Some("n".to_string()))
            .unwrap();

        assert_eq!(itinerary, before);
        assert_eq!(itinerary.version(), 1);

        itinerary.set_item_notes(&id, None).unwrap();
        assert_eq!(itinerary.version(), 2);
    }

    #[test]
    fn test_add_board_inside_range_returns_existing() {
        let mut itinerary = trip(3);
        let existing = itinerary.boards()[1].id.clone();

        let id = itinerary.add_board(date(2)).unwrap();

        assert_eq!(id, existing);
        assert_eq!(itinerary.version(), 0);
    }

    #[test]
    fn test_add_board_extends_range_with_intermediate_days() {
        let mut itinerary = Itinerary::new("Rome", date(10), date(11)).unwrap();

        let later = itinerary.add_board(date(14)).unwrap();
        assert_eq!(itinerary.day_count(), 5);
        assert_eq!(itinerary.end_date(), date(14));
        assert_eq!(itinerary.boards()[4].id, later);

        let earlier = itinerary.add_board(date(8)).unwrap();
        assert_eq!(itinerary.day_count(), 7);
        assert_eq!(itinerary.start_date(), date(8));
        assert_eq!(itinerary.boards()[0].id, earlier);
        itinerary.validate().unwrap();
    }

    #[test]
    fn test_add_board_respects_limit() {
        let config = ItineraryConfig {
            max_days: 3,
            ..ItineraryConfig::default()
        };
        let mut itinerary = Itinerary::with_config("Short", date(1), date(2), config).unwrap();

        assert!(itinerary.add_board(date(3)).is_ok());
        let err = itinerary.add_board(date(4)).unwrap_err();
        assert!(err.is_invalid_range());
        assert_eq!(itinerary.day_count(), 3);
    }

    #[test]
    fn test_remove_last_board_reassigns_items() {
        let mut itinerary = trip(2);
        let day0 = itinerary.boards()[0].id.clone();
        let day1 = itinerary.boards()[1].id.clone();
        itinerary.add_item(&day0, NewItem::new("A")).unwrap();
        itinerary.add_item(&day1, NewItem::new("B")).unwrap();

        let removed = itinerary.remove_board(&day1, BoardRemoval::Reassign).unwrap();

        assert_eq!(removed.id, day1);
        assert_eq!(itinerary.day_count(), 1);
        assert_eq!(itinerary.end_date(), date(1));
        assert_eq!(titles(&itinerary, 0), vec!["A", "B"]);
        itinerary.validate().unwrap();
    }

    #[test]
    fn test_remove_first_board_prepends_items() {
        let mut itinerary = trip(2);
        let day0 = itinerary.boards()[0].id.clone();
        let day1 = itinerary.boards()[1].id.clone();
        itinerary.add_item(&day0, NewItem::new("A")).unwrap();
        itinerary.add_item(&day1, NewItem::new("B")).unwrap();

        itinerary.remove_board(&day0, BoardRemoval::Reassign).unwrap();

        assert_eq!(itinerary.start_date(), date(2));
        assert_eq!(titles(&itinerary, 0), vec!["A", "B"]);
        itinerary.validate().unwrap();
    }

    #[test]
    fn test_remove_board_cascade_deletes_items() {
        let mut itinerary = trip(2);
        let day1 = itinerary.boards()[1].id.clone();
        itinerary.add_item(&day1, NewItem::new("B")).unwrap();

        itinerary.remove_board(&day1, BoardRemoval::Cascade).unwrap();

        assert_eq!(itinerary.item_count(), 0);
        itinerary.validate().unwrap();
    }

    #[test]
    fn test_remove_interior_or_only_board_fails() {
        let mut itinerary = trip(3);
        let middle = itinerary.boards()[1].id.clone();
        let err = itinerary
            .remove_board(&middle, BoardRemoval::Reassign)
            .unwrap_err();
        assert!(err.is_invalid_range());
        assert_eq!(itinerary.day_count(), 3);

        let mut single = trip(1);
        let only = single.boards()[0].id.clone();
        assert!(single.remove_board(&only, BoardRemoval::Cascade).is_err());
    }

    #[test]
    fn test_set_date_range_shrinks_and_grows() {
        let mut itinerary = trip(4);
        let day3 = itinerary.boards()[3].id.clone();
        itinerary.add_item(&day3, NewItem::new("Late")).unwrap();

        itinerary
            .set_date_range(date(2), date(3), BoardRemoval::Reassign)
            .unwrap();
        assert_eq!(itinerary.day_count(), 2);
        assert_eq!(titles(&itinerary, 1), vec!["Late"]);

        itinerary
            .set_date_range(date(1), date(5), BoardRemoval::Reassign)
            .unwrap();
        assert_eq!(itinerary.day_count(), 5);
        itinerary.validate().unwrap();
    }

    #[test]
    fn test_set_date_range_disjoint_reassigns_everything() {
        let mut itinerary = trip(2);
        let day0 = itinerary.boards()[0].id.clone();
        itinerary.add_item(&day0, NewItem::new("A")).unwrap();

        itinerary
            .set_date_range(date(10), date(11), BoardRemoval::Reassign)
            .unwrap();

        assert_eq!(itinerary.start_date(), date(10));
        assert_eq!(itinerary.item_count(), 1);
        assert_eq!(titles(&itinerary, 0), vec!["A"]);
        itinerary.validate().unwrap();
    }

    #[test]
    fn test_set_date_range_far_disjoint_range() {
        let mut itinerary = trip(1);
        let day0 = itinerary.boards()[0].id.clone();
        itinerary.add_item(&day0, NewItem::new("A")).unwrap();
        let far = NaiveDate::from_ymd_opt(2225, 6, 1).unwrap();

        itinerary
            .set_date_range(far, far, BoardRemoval::Reassign)
            .unwrap();

        assert_eq!(itinerary.day_count(), 1);
        assert_eq!(itinerary.boards()[0].date, far);
        assert_eq!(titles(&itinerary, 0), vec!["A"]);
        itinerary.validate().unwrap();
    }

    #[test]
    fn test_set_date_range_keeps_overlapping_boards() {
        let mut itinerary = trip(4);
        let day1 = itinerary.boards()[1].id.clone();
        let day0 = itinerary.boards()[0].id.clone();
        let day3 = itinerary.boards()[3].id.clone();
        itinerary.add_item(&day0, NewItem::new("Early")).unwrap();
        itinerary.add_item(&day1, NewItem::new("Middle")).unwrap();
        itinerary.add_item(&day3, NewItem::new("Late")).unwrap();

        itinerary
            .set_date_range(date(2), date(2), BoardRemoval::Reassign)
            .unwrap();

        assert_eq!(itinerary.boards()[0].id, day1);
        assert_eq!(titles(&itinerary, 0), vec!["Early", "Middle", "Late"]);
        itinerary.validate().unwrap();
    }

    #[test]
    fn test_set_date_range_cascade_drops_trimmed_items() {
        let mut itinerary = trip(3);
        let day0 = itinerary.boards()[0].id.clone();
        let day1 = itinerary.boards()[1].id.clone();
        itinerary.add_item(&day0, NewItem::new("Gone")).unwrap();
        let kept = itinerary.add_item(&day1, NewItem::new("Kept")).unwrap();

        itinerary
            .set_date_range(date(2), date(6), BoardRemoval::Cascade)
            .unwrap();

        assert_eq!(itinerary.item_count(), 1);
        assert_eq!(itinerary.item(&kept).unwrap().position, 0);
        assert_eq!(itinerary.day_count(), 5);
        itinerary.validate().unwrap();
    }

    #[test]
    fn test_set_date_range_invalid_leaves_state() {
        let mut itinerary = trip(2);
        let before = itinerary.clone();

        assert!(itinerary
            .set_date_range(date(3), date(1), BoardRemoval::Reassign)
            .is_err());
        assert_eq!(itinerary, before);
    }

    #[test]
    fn test_board_for_date() {
        let itinerary = trip(3);
        assert_eq!(itinerary.board_for_date(date(2)).unwrap().date, date(2));
        assert!(itinerary.board_for_date(date(4)).is_none());
        assert!(itinerary
            .board_for_date(NaiveDate::from_ymd_opt(2025, 5, 31).unwrap())
            .is_none());
    }

    #[test]
    fn test_validate_detects_duplicate_item() {
        let mut itinerary = trip(2);
        let day0 = itinerary.boards()[0].id.clone();
        let a = itinerary.add_item(&day0, NewItem::new("A")).unwrap();
        itinerary.boards[1].items.push(a);

        let err = itinerary.validate().unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_validate_detects_position_gap() {
        let mut itinerary = trip(1);
        let day0 = itinerary.boards()[0].id.clone();
        let a = itinerary.add_item(&day0, NewItem::new("A")).unwrap();
        itinerary.items.get_mut(&a).unwrap().position = 4;

        let err = itinerary.validate().unwrap_err();
        assert!(err.is_invalid_range());
    }

    #[test]
    fn test_serialization_roundtrip_preserves_structure() {
        let mut itinerary = trip(2);
        let day1 = itinerary.boards()[1].id.clone();
        itinerary.add_item(&day1, NewItem::new("Eiffel Tower")).unwrap();

        let json = serde_json::to_string(&itinerary).unwrap();
        assert!(!json.contains("max_days"));

        let loaded: Itinerary = serde_json::from_str(&json).unwrap();
        loaded.validate().unwrap();
        assert_eq!(loaded, itinerary);
    }
}
