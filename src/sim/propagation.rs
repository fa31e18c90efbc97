//! Authoritative overflow propagation
//!
//! Each step is a simultaneous update. [`plan_step`] reads the current board
//! and computes every write the step will make; [`StepPlan::apply`] then
//! commits them at once. Nothing in the read phase sees a half-updated grid,
//! so the outcome does not depend on scan order beyond the explicit
//! row-major tie-breaks below.
//!
//! Rules for one step:
//! - every cell with `charge >= threshold` overflows
//! - each overflowing cell gives +1 to every in-bounds neighbor; a touched
//!   cell takes the owner of the first overflowing cell (row-major) touching it
//! - an overflowing cell next to another overflowing cell ends at charge 1,
//!   owned by its partner's pre-step owner (the last partner in row-major
//!   order when there are several)
//! - every other overflowing cell is emptied

use std::collections::{BTreeMap, BTreeSet};

use super::board::{Board, Cell, Player, Pos};
use super::snapshot::{Snapshot, SnapshotSink};
use crate::error::{Error, Result};

/// Writes computed for one propagation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    /// Cells that overflowed, row-major
    pub overflowing: Vec<Pos>,
    /// New contents of every cell the step changes, row-major
    pub writes: Vec<(Pos, Cell)>,
}

impl StepPlan {
    pub fn apply(&self, board: &mut Board) {
        for &(pos, cell) in &self.writes {
            board.set_cell(pos, cell);
        }
    }
}

/// Cells at or above their threshold, row-major
pub fn overflowing_cells(board: &Board) -> Vec<Pos> {
    board
        .positions()
        .filter(|&pos| board.is_overflowing(pos))
        .collect()
}

/// Compute the next step without touching the board. `None` when stable.
pub fn plan_step(board: &Board) -> Option<StepPlan> {
    let overflowing = overflowing_cells(board);
    if overflowing.is_empty() {
        return None;
    }
    let firing: BTreeSet<Pos> = overflowing.iter().copied().collect();

    // (owner of first toucher, number of touches)
    let mut touched: BTreeMap<Pos, (Player, u32)> = BTreeMap::new();
    for &src in &overflowing {
        // Overflowing cells always hold at least one unit
        let Some(owner) = board.owner(src) else { continue };
        for n in board.neighbors(src) {
            touched
                .entry(n)
                .and_modify(|(_, count)| *count += 1)
                .or_insert((owner, 1));
        }
    }

    let mut writes: BTreeMap<Pos, Cell> = BTreeMap::new();
    for (pos, (owner, count)) in touched {
        if !firing.contains(&pos) {
            writes.insert(pos, Cell::owned(owner, board.charge(pos) + count));
        }
    }
    for &pos in &overflowing {
        let partner = board.neighbors(pos).filter(|n| firing.contains(n)).max();
        let cell = match partner.and_then(|p| board.owner(p)) {
            Some(owner) => Cell::owned(owner, 1),
            None => Cell::Empty,
        };
        writes.insert(pos, cell);
    }

    Some(StepPlan {
        overflowing,
        writes: writes.into_iter().collect(),
    })
}

/// Maximum number of steps before propagation is declared runaway
pub fn step_limit(board: &Board) -> usize {
    board.cell_count().pow(2).max(16)
}

/// Run overflow steps until the board is stable or one player owns every
/// charged cell. Records a snapshot per step and returns the step count.
///
/// The single-owner stop only applies between steps: the step triggered by
/// the move itself always runs.
pub fn apply_overflow<S>(board: &mut Board, sink: &mut S) -> Result<usize>
where
    S: SnapshotSink + ?Sized,
{
    let limit = step_limit(board);
    let mut steps = 0;

    loop {
        if steps > 0 && board.single_owner().is_some() {
            break;
        }
        let Some(plan) = plan_step(board) else {
            break;
        };
        if steps == limit {
            log::error!("Propagation exceeded {limit} steps on a {}x{} board", board.rows(), board.cols());
            return Err(Error::PropagationRunaway { steps, limit });
        }

        plan.apply(board);
        steps += 1;
        log::trace!("Overflow step {steps}: {} cells fired", plan.overflowing.len());
        sink.record(Snapshot::new(board));
    }

    Ok(steps)
}
