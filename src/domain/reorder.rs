//! Drag-reorder engine.
//!
//! A move is computed in two phases: [`plan_move`] resolves ids, clamps the
//! destination and detects no-ops without touching the itinerary; only a
//! successful plan is then applied. An error therefore never leaves a
//! half-moved item behind.
//!
//! Destination indices are *final* indices: moving `A` to index 2 in
//! `[A, B, C]` yields `[B, C, A]`. The item is taken out first, and the
//! index is clamped against the board as it is after removal, so dropping
//! past the last item appends.

use serde::{Deserialize, Serialize};

use crate::domain::{
    ids::{BoardId, ItemId},
    itinerary::Itinerary,
};
use crate::error::{ItineraryError, Result};

/// A place on a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub board_id: BoardId,
    pub index: usize,
}

/// A resolved move: where the item is and where it will end up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePlan {
    pub item_id: ItemId,
    pub from: Slot,
    pub to: Slot,
}

impl MovePlan {
    pub fn is_within_board(&self) -> bool {
        self.from.board_id == self.to.board_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The item already sits at the requested slot
    Unchanged,
    Moved(MovePlan),
}

impl MoveOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Computes the effect of moving `item_id` to `target_index` of `target_board`
pub fn plan_move(
    itinerary: &Itinerary,
    item_id: &ItemId,
    target_board: &BoardId,
    target_index: usize,
) -> Result<MoveOutcome> {
    let (from_board, from_index) = itinerary.locate(item_id)?;
    let to_board = itinerary.board_index(target_board)?;

    if from_board == to_board && from_index == target_index {
        return Ok(MoveOutcome::Unchanged);
    }

    let board_len = itinerary.boards[to_board].len();
    let capacity = if from_board == to_board {
        board_len - 1
    } else {
        board_len
    };
    let to_index = target_index.min(capacity);

    if from_board == to_board && from_index == to_index {
        return Ok(MoveOutcome::Unchanged);
    }

    Ok(MoveOutcome::Moved(MovePlan {
        item_id: item_id.clone(),
        from: Slot {
            board_id: itinerary.boards[from_board].id.clone(),
            index: from_index,
        },
        to: Slot {
            board_id: target_board.clone(),
            index: to_index,
        },
    }))
}

/// Applies a plan computed against the current state of `itinerary`
pub(crate) fn apply_plan(itinerary: &mut Itinerary, plan: &MovePlan) -> Result<()> {
    let from_board = itinerary.board_index(&plan.from.board_id)?;
    let to_board = itinerary.board_index(&plan.to.board_id)?;

    let source = &mut itinerary.boards[from_board].items;
    if source.get(plan.from.index) != Some(&plan.item_id) {
        return Err(ItineraryError::Conflict(format!(
            "stale move plan for item {}",
            plan.item_id
        )));
    }
    let item_id = source.remove(plan.from.index);

    let target = &mut itinerary.boards[to_board].items;
    let index = plan.to.index.min(target.len());
    target.insert(index, item_id);

    itinerary.renumber(from_board);
    if to_board != from_board {
        itinerary.renumber(to_board);
    }
    if let Some(item) = itinerary.items.get_mut(&plan.item_id) {
        item.touch();
    }
    Ok(())
}

/// The order `target_board` would show if the item were dropped at
/// `target_index`, for transient drag-over feedback
pub fn preview(
    itinerary: &Itinerary,
    item_id: &ItemId,
    target_board: &BoardId,
    target_index: usize,
) -> Result<Vec<ItemId>> {
    let board = itinerary
        .board(target_board)
        .ok_or_else(|| ItineraryError::BoardNotFound(target_board.to_string()))?;
    let mut order = board.items.clone();

    if let MoveOutcome::Moved(plan) = plan_move(itinerary, item_id, target_board, target_index)? {
        if plan.is_within_board() {
            order.remove(plan.from.index);
        }
        order.insert(plan.to.index, plan.item_id);
    }
    Ok(order)
}
