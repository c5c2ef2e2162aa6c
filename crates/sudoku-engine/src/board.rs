use crate::stream::{CellView, Snapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (row, col) coordinate on the 9x9 grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index in 0..81
    pub fn index(self) -> usize {
        self.row * 9 + self.col
    }

    pub fn from_index(index: usize) -> Self {
        Self {
            row: index / 9,
            col: index % 9,
        }
    }

    /// Index of the containing 3x3 box, 0..9 in row-major box order
    pub fn box_index(self) -> usize {
        (self.row / 3) * 3 + self.col / 3
    }
}

/// All positions of a row, left to right
pub fn row_positions(row: usize) -> [Position; 9] {
    std::array::from_fn(|col| Position::new(row, col))
}

/// All positions of a column, top to bottom
pub fn col_positions(col: usize) -> [Position; 9] {
    std::array::from_fn(|row| Position::new(row, col))
}

/// All positions of a 3x3 box, row-major within the box
pub fn box_positions(box_index: usize) -> [Position; 9] {
    let base_row = (box_index / 3) * 3;
    let base_col = (box_index % 3) * 3;
    std::array::from_fn(|i| Position::new(base_row + i / 3, base_col + i % 3))
}

/// Bits 1..=9 set, bit 0 unused
const ALL_DIGITS: u16 = 0b11_1111_1110;

/// The digits 1-9 still legal for a cell, as a bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CandidateSet(u16);

impl CandidateSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The shared "every digit open" starting set
    pub const fn full() -> Self {
        Self(ALL_DIGITS)
    }

    pub fn contains(self, digit: u8) -> bool {
        debug_assert!((1..=9).contains(&digit));
        self.0 & (1 << digit) != 0
    }

    pub fn insert(&mut self, digit: u8) {
        debug_assert!((1..=9).contains(&digit));
        self.0 |= 1 << digit;
    }

    pub fn remove(&mut self, digit: u8) {
        debug_assert!((1..=9).contains(&digit));
        self.0 &= !(1 << digit);
    }

    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The sole member, if exactly one digit remains
    pub fn single_value(self) -> Option<u8> {
        if self.0.count_ones() == 1 {
            Some(self.0.trailing_zeros() as u8)
        } else {
            None
        }
    }

    /// The smallest member, if any
    pub fn lowest(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }

    /// Members in ascending order
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=9).filter(move |&digit| self.contains(digit))
    }
}

/// One square of the grid: its digit (0 = empty), the digits still open
/// for it, and whether the digit came from a guess rather than a deduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Cell {
    value: u8,
    candidates: CandidateSet,
    uncertain: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            value: 0,
            candidates: CandidateSet::full(),
            uncertain: false,
        }
    }
}

/// The 9x9 grid with per-cell candidate tracking and a filled-cell counter.
///
/// Peer relations (row, column, box) are derived from coordinates, never
/// stored. All value changes flow through [`Board::assign`]; speculative
/// search branches work on independent `Clone`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; 9]; 9],
    filled: usize,
}

impl Board {
    /// An all-free board with every candidate open
    pub fn empty() -> Self {
        Self {
            cells: [[Cell::default(); 9]; 9],
            filled: 0,
        }
    }

    /// Build a board from 81 row-major digits, 0 meaning blank
    pub fn from_givens(givens: &[u8; 81]) -> Self {
        let mut board = Self::empty();
        for (index, &digit) in givens.iter().enumerate() {
            if digit != 0 {
                board.assign(Position::from_index(index), digit, false);
            }
        }
        board
    }

    fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.row][pos.col]
    }

    pub fn value(&self, pos: Position) -> u8 {
        self.cell(pos).value
    }

    pub fn is_free(&self, pos: Position) -> bool {
        self.cell(pos).value == 0
    }

    pub fn is_uncertain(&self, pos: Position) -> bool {
        self.cell(pos).uncertain
    }

    pub fn candidates(&self, pos: Position) -> CandidateSet {
        self.cell(pos).candidates
    }

    pub fn candidate_count(&self, pos: Position) -> usize {
        self.cell(pos).candidates.count()
    }

    /// Count of assigned cells, 0..=81
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn is_complete(&self) -> bool {
        self.filled == 81
    }

    /// All positions in row-major order
    pub fn positions() -> impl Iterator<Item = Position> {
        (0..81).map(Position::from_index)
    }

    /// Place `digit` in a free cell: the cell's own candidates close, the
    /// filled counter advances, and the digit leaves the candidate set of
    /// every peer in the cell's row, column and box.
    ///
    /// Performs no contradiction checking; a peer ending up with no
    /// candidates is for the caller to detect.
    pub fn assign(&mut self, pos: Position, digit: u8, uncertain: bool) {
        debug_assert!((1..=9).contains(&digit));
        debug_assert!(self.is_free(pos));

        let cell = &mut self.cells[pos.row][pos.col];
        cell.value = digit;
        cell.candidates = CandidateSet::empty();
        cell.uncertain = uncertain;
        self.filled += 1;

        for p in row_positions(pos.row)
            .into_iter()
            .chain(col_positions(pos.col))
            .chain(box_positions(pos.box_index()))
        {
            self.cells[p.row][p.col].candidates.remove(digit);
        }
    }

    /// Permanently rule a digit out of a free cell (the search engine's
    /// elimination-by-exhausted-trial step)
    pub fn eliminate_candidate(&mut self, pos: Position, digit: u8) {
        debug_assert!(self.is_free(pos));
        self.cells[pos.row][pos.col].candidates.remove(digit);
    }

    /// First free cell with no candidates left, scanning row-major.
    /// Such a cell means the board cannot be completed.
    pub fn first_contradiction(&self) -> Option<Position> {
        Self::positions().find(|&pos| self.is_free(pos) && self.candidates(pos).is_empty())
    }

    fn unit_has_no_duplicates(&self, unit: &[Position; 9]) -> bool {
        let mut seen = CandidateSet::empty();
        for &pos in unit {
            let value = self.value(pos);
            if value != 0 {
                if seen.contains(value) {
                    return false;
                }
                seen.insert(value);
            }
        }
        true
    }

    /// True when some row, column or box already holds a digit twice.
    /// Only assigned cells can conflict; candidate tracking prevents the
    /// solver from ever creating one, so a conflict means bad givens.
    pub fn has_conflict(&self) -> bool {
        !(0..9).all(|i| {
            self.unit_has_no_duplicates(&row_positions(i))
                && self.unit_has_no_duplicates(&col_positions(i))
                && self.unit_has_no_duplicates(&box_positions(i))
        })
    }

    /// True when all 81 cells are assigned and every unit holds nine
    /// distinct digits
    pub fn is_valid_solution(&self) -> bool {
        self.is_complete() && !self.has_conflict()
    }

    /// The full grid as `(value, uncertain)` pairs for observers
    pub fn snapshot(&self) -> Snapshot {
        std::array::from_fn(|row| {
            std::array::from_fn(|col| {
                let cell = &self.cells[row][col];
                CellView {
                    value: cell.value,
                    uncertain: cell.uncertain,
                }
            })
        })
    }

    /// Compact 81-character row-major form, 0 for blanks
    pub fn to_line(&self) -> String {
        Self::positions()
            .map(|pos| (b'0' + self.value(pos)) as char)
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..9 {
            if row % 3 == 0 {
                writeln!(f, "-------------------------")?;
            }
            for col in 0..9 {
                if col % 3 == 0 {
                    write!(f, "| ")?;
                }
                match self.cells[row][col].value {
                    0 => write!(f, ". ")?,
                    value => write!(f, "{value} ")?,
                }
            }
            writeln!(f, "|")?;
        }
        write!(f, "-------------------------")
    }
}
