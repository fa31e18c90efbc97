//! Board state
//!
//! The grid of owned charges. Ownership is an explicit tri-state per cell
//! (empty, player one, player two) paired with a magnitude, so nothing here
//! infers ownership from the sign of an integer. The signed encoding
//! (`0` empty, `+v` player one, `-v` player two) is only used at the edges:
//! construction from literal grids, serialization and display.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Orthogonal neighbor offsets in visiting order: up, down, left, right
const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Largest charge the signed encoding can carry
pub const MAX_CHARGE: u32 = i32::MAX as u32;

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Owns positive charges
    One,
    /// Owns negative charges
    Two,
}

impl Player {
    /// Sign of this player's charges in the signed encoding
    pub fn sign(self) -> i32 {
        match self {
            Player::One => 1,
            Player::Two => -1,
        }
    }

    /// Owner implied by a signed value (`None` for zero)
    pub fn from_sign(value: i32) -> Option<Self> {
        match value.signum() {
            1 => Some(Player::One),
            -1 => Some(Player::Two),
            _ => None,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Zero-based seat index (player one = 0)
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.index() + 1)
    }
}

/// Grid coordinate (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True if the two positions share an edge
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Contents of a single cell
///
/// An owned cell always carries a charge of at least one; use
/// [`Cell::owned`] to build cells so a zero charge collapses to `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Owned { player: Player, charge: u32 },
}

impl Cell {
    pub fn owned(player: Player, charge: u32) -> Self {
        if charge == 0 {
            Cell::Empty
        } else {
            Cell::Owned { player, charge }
        }
    }

    pub fn from_signed(value: i32) -> Self {
        match Player::from_sign(value) {
            Some(player) => Cell::owned(player, value.unsigned_abs()),
            None => Cell::Empty,
        }
    }

    pub fn to_signed(self) -> i32 {
        match self {
            Cell::Empty => 0,
            Cell::Owned { player, charge } => player.sign() * charge.min(MAX_CHARGE) as i32,
        }
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Owned { player, .. } => Some(player),
        }
    }

    pub fn charge(self) -> u32 {
        match self {
            Cell::Empty => 0,
            Cell::Owned { charge, .. } => charge,
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Rectangular grid of cells, stored row-major
///
/// Serialized as the signed-integer grid (`Vec<Vec<i32>>`), which is also the
/// format renderers consume.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i32>>", into = "Vec<Vec<i32>>")]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board. Needs at least two cells so every cell has a
    /// neighbor to overflow into.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || rows * cols < 2 {
            return Err(Error::InvalidBoard(format!(
                "{rows}x{cols} grid needs at least two cells"
            )));
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        })
    }

    /// Opening position: one charge for player one in the top-left corner and
    /// one for player two in the bottom-right corner. Needs at least 2x2: on a
    /// single row or column the corner threshold is 1 and both opening pieces
    /// would already be overflowing.
    pub fn starting(rows: usize, cols: usize) -> Result<Self> {
        if rows < 2 || cols < 2 {
            return Err(Error::InvalidBoard(format!(
                "{rows}x{cols} opening position needs at least 2x2"
            )));
        }
        let mut board = Self::new(rows, cols)?;
        board.set_cell(Pos::new(0, 0), Cell::owned(Player::One, 1));
        board.set_cell(Pos::new(rows - 1, cols - 1), Cell::owned(Player::Two, 1));
        Ok(board)
    }

    /// Build a board from the signed encoding
    pub fn from_rows(grid: &[Vec<i32>]) -> Result<Self> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if let Some((i, row)) = grid.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(Error::InvalidBoard(format!(
                "row {i} has {} columns, expected {cols}",
                row.len()
            )));
        }
        if grid.iter().flatten().any(|&v| v == i32::MIN) {
            return Err(Error::InvalidBoard(format!(
                "charge magnitude exceeds {MAX_CHARGE}"
            )));
        }
        let mut board = Self::new(rows, cols)?;
        for (cell, &value) in board.cells.iter_mut().zip(grid.iter().flatten()) {
            *cell = Cell::from_signed(value);
        }
        Ok(board)
    }

    /// Signed encoding of the grid
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.to_signed()).collect())
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    fn index(&self, pos: Pos) -> usize {
        pos.row * self.cols + pos.col
    }

    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.in_bounds(pos).then(|| self.cells[self.index(pos)])
    }

    /// Cell at `pos`. Panics if `pos` is out of bounds.
    pub fn cell(&self, pos: Pos) -> Cell {
        assert!(self.in_bounds(pos), "{pos} outside {}x{} board", self.rows, self.cols);
        self.cells[self.index(pos)]
    }

    /// Overwrite the cell at `pos`. Panics if `pos` is out of bounds.
    pub fn set_cell(&mut self, pos: Pos, cell: Cell) {
        assert!(self.in_bounds(pos), "{pos} outside {}x{} board", self.rows, self.cols);
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    pub fn charge(&self, pos: Pos) -> u32 {
        self.cell(pos).charge()
    }

    pub fn owner(&self, pos: Pos) -> Option<Player> {
        self.cell(pos).owner()
    }

    /// In-bounds orthogonal neighbors, visited up, down, left, right
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + use<> {
        let (rows, cols) = (self.rows, self.cols);
        NEIGHBOR_OFFSETS.into_iter().filter_map(move |(dr, dc)| {
            let row = pos.row.checked_add_signed(dr)?;
            let col = pos.col.checked_add_signed(dc)?;
            (row < rows && col < cols).then_some(Pos::new(row, col))
        })
    }

    /// Overflow threshold: the number of in-bounds neighbors
    /// (4 interior, 3 edge, 2 corner)
    pub fn threshold(&self, pos: Pos) -> u32 {
        self.neighbors(pos).count() as u32
    }

    pub fn is_overflowing(&self, pos: Pos) -> bool {
        self.charge(pos) >= self.threshold(pos)
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let cols = self.cols;
        (0..self.cells.len()).map(move |i| Pos::new(i / cols, i % cols))
    }

    /// `(position, cell)` pairs in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.positions().zip(self.cells.iter().copied())
    }

    /// A move is legal on an empty cell or one the player already owns
    pub fn is_legal_move(&self, pos: Pos, player: Player) -> bool {
        match self.get(pos) {
            Some(cell) => cell.owner() != Some(player.opponent()),
            None => false,
        }
    }

    /// Legal moves for `player` in row-major order
    pub fn legal_moves(&self, player: Player) -> impl Iterator<Item = Pos> + '_ {
        self.iter()
            .filter(move |(_, cell)| cell.owner() != Some(player.opponent()))
            .map(|(pos, _)| pos)
    }

    /// Drop one piece for `player` on `pos`
    pub fn place(&mut self, pos: Pos, player: Player) -> Result<()> {
        if !self.is_legal_move(pos, player) {
            return Err(Error::InvalidMove { pos, player });
        }
        self.add_charge(pos, player);
        Ok(())
    }

    /// Add one unit of charge and hand the cell to `player`
    pub(crate) fn add_charge(&mut self, pos: Pos, player: Player) {
        let charge = self.charge(pos) + 1;
        self.set_cell(pos, Cell::owned(player, charge));
    }

    pub fn count_owned(&self, player: Player) -> usize {
        self.cells.iter().filter(|c| c.owner() == Some(player)).count()
    }

    /// The player owning every nonzero cell, if there is exactly one
    pub fn single_owner(&self) -> Option<Player> {
        let mut owners = self.cells.iter().filter_map(|c| c.owner());
        let first = owners.next()?;
        owners.all(|p| p == first).then_some(first)
    }

    /// True when no cell holds a charge
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

impl TryFrom<Vec<Vec<i32>>> for Board {
    type Error = Error;

    fn try_from(grid: Vec<Vec<i32>>) -> Result<Self> {
        Self::from_rows(&grid)
    }
}

impl From<Board> for Vec<Vec<i32>> {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            let line: Vec<String> = row.iter().map(|c| format!("{:>3}", c.to_signed())).collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}
