//! Shared proptest strategies

use proptest::prelude::*;

use super::board::Board;

/// Boards from 2x2 to 4x4 with signed charges in `-max_charge..=max_charge`
pub(crate) fn board_strategy(max_charge: i32) -> impl Strategy<Value = Board> {
    (2usize..=4, 2usize..=4).prop_flat_map(move |(rows, cols)| {
        prop::collection::vec(-max_charge..=max_charge, rows * cols).prop_map(move |values| {
            let grid: Vec<Vec<i32>> = values.chunks(cols).map(<[i32]>::to_vec).collect();
            Board::from_rows(&grid).expect("strategy produces rectangular grids")
        })
    })
}
