use crate::board::{box_positions, col_positions, row_positions, Board, Position};
use crate::stream::StateSink;

/// Terminal result of a solve: whether the board reached 81 filled cells,
/// and how many times the guess engine had to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveReport {
    pub solved: bool,
    pub guesses: usize,
}

/// What one guess invocation did to the real board
enum GuessStep {
    /// A free cell has no candidates left; the board cannot be completed
    Contradiction,
    /// The trial solved; its digit is now assigned on the real board
    Committed,
    /// The trial failed; its digit is gone from the real cell's candidates
    Eliminated,
}

/// Sudoku solver: deterministic constraint propagation with a
/// guess-and-backtrack fallback when propagation stalls.
///
/// Propagation applies four tests per free cell in fixed priority (naked
/// single, then hidden single in row, column and box) over repeated
/// row-major sweeps. A sweep with no assignment is a stall; the guess
/// engine then tries one candidate of one low-branching cell on a cloned
/// board and either commits the digit or eliminates it.
#[derive(Debug, Default)]
pub struct Solver;

impl Solver {
    pub fn new() -> Self {
        Self
    }

    /// Solve in place, returning the success flag and guess count.
    /// On failure the board is left in its best-effort partial state.
    pub fn solve(&self, board: &mut Board) -> SolveReport {
        self.solve_inner(board, None)
    }

    /// Solve in place, pushing a snapshot to `sink` after every
    /// assignment made on this board. Speculative trial boards never
    /// reach the sink.
    pub fn solve_streaming(&self, board: &mut Board, sink: &dyn StateSink) -> SolveReport {
        self.solve_inner(board, Some(sink))
    }

    fn solve_inner(&self, board: &mut Board, sink: Option<&dyn StateSink>) -> SolveReport {
        let mut guesses = 0;
        let solved = self.run(board, sink, &mut guesses);
        SolveReport { solved, guesses }
    }

    /// The full propagation/search loop. Also the entry point for
    /// speculative clones, which pass no sink.
    fn run(&self, board: &mut Board, sink: Option<&dyn StateSink>, guesses: &mut usize) -> bool {
        // Givens are assigned without validation, so a duplicated given
        // is only caught here. Clones always start conflict-free.
        if board.has_conflict() {
            return false;
        }

        loop {
            while !board.is_complete() {
                if !self.sweep(board, sink) {
                    break;
                }
            }
            if board.is_complete() {
                return true;
            }

            *guesses += 1;
            match self.guess(board, sink, guesses) {
                GuessStep::Contradiction => return false,
                // Either way the candidate state changed; propagate again
                GuessStep::Committed | GuessStep::Eliminated => {}
            }
        }
    }

    // ==================== Propagation ====================

    /// One row-major pass over all 81 cells, assigning every forced digit
    /// found. Later cells in the same pass see the updated candidates of
    /// earlier assignments. Returns whether anything was assigned.
    fn sweep(&self, board: &mut Board, sink: Option<&dyn StateSink>) -> bool {
        let mut assigned = false;
        for pos in Board::positions() {
            if board.is_free(pos) {
                if let Some(digit) = self.forced_digit(board, pos) {
                    Self::assign_and_emit(board, sink, pos, digit);
                    assigned = true;
                }
            }
        }
        assigned
    }

    /// The four deduction tests in fixed priority, stopping at the first
    /// hit: naked single, then hidden single in row, column and box
    fn forced_digit(&self, board: &Board, pos: Position) -> Option<u8> {
        if let Some(digit) = board.candidates(pos).single_value() {
            return Some(digit);
        }
        self.hidden_single(board, pos, &row_positions(pos.row))
            .or_else(|| self.hidden_single(board, pos, &col_positions(pos.col)))
            .or_else(|| self.hidden_single(board, pos, &box_positions(pos.box_index())))
    }

    /// A digit of this cell's candidates that no other cell of the unit
    /// can still take
    fn hidden_single(&self, board: &Board, pos: Position, unit: &[Position; 9]) -> Option<u8> {
        board.candidates(pos).iter().find(|&digit| {
            unit.iter()
                .all(|&p| p == pos || !board.candidates(p).contains(digit))
        })
    }

    fn assign_and_emit(board: &mut Board, sink: Option<&dyn StateSink>, pos: Position, digit: u8) {
        board.assign(pos, digit, false);
        if let Some(sink) = sink {
            sink.push(board.snapshot());
        }
    }

    // ==================== Guess / backtrack ====================

    /// Invoked only after a stall with the board incomplete. Tries exactly
    /// one candidate of one cell, then yields back to the outer loop.
    fn guess(
        &self,
        board: &mut Board,
        sink: Option<&dyn StateSink>,
        guesses: &mut usize,
    ) -> GuessStep {
        if board.first_contradiction().is_some() {
            return GuessStep::Contradiction;
        }

        // A stalled board has no naked singles left, so after a clean
        // contradiction scan every free cell holds 2..=9 candidates and
        // the selection below cannot miss.
        let (pos, digit) = match Self::select_cell(board) {
            Some(pos) => match board.candidates(pos).lowest() {
                Some(digit) => (pos, digit),
                None => return GuessStep::Contradiction,
            },
            None => return GuessStep::Contradiction,
        };

        let mut trial = board.clone();
        trial.assign(pos, digit, true);

        if self.run(&mut trial, None, guesses) {
            // The trial proved the digit; on the real board it is a
            // certainty, and the outer loop re-derives the rest.
            Self::assign_and_emit(board, sink, pos, digit);
            GuessStep::Committed
        } else {
            board.eliminate_candidate(pos, digit);
            // The elimination may have newly determined this cell
            if let Some(forced) = self.forced_digit(board, pos) {
                Self::assign_and_emit(board, sink, pos, forced);
            }
            GuessStep::Eliminated
        }
    }

    /// First free cell with the fewest candidates: ascending count 2..=9,
    /// row-major order within each count
    fn select_cell(board: &Board) -> Option<Position> {
        for count in 2..=9 {
            for pos in Board::positions() {
                if board.is_free(pos) && board.candidate_count(pos) == count {
                    return Some(pos);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_board;
    use crate::stream::{Snapshot, StateSink};
    use std::sync::Mutex;

    const EASY_PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    const EASY_SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";
    // Expert-grade puzzle; singles alone stall on it
    const HARD_PUZZLE: &str =
        "000704005020010070000080002090006250600070008053200010400090000030060090200301000";

    /// Test observer recording every frame it is handed
    #[derive(Default)]
    struct RecordingSink {
        frames: Mutex<Vec<Snapshot>>,
    }

    impl StateSink for RecordingSink {
        fn push(&self, snapshot: Snapshot) {
            self.frames.lock().unwrap().push(snapshot);
        }
    }

    #[test]
    fn solves_the_canonical_puzzle() {
        let mut board = parse_board(EASY_PUZZLE).unwrap();
        let report = Solver::new().solve(&mut board);

        assert!(report.solved);
        assert!(board.is_valid_solution());
        assert_eq!(board.to_line(), EASY_SOLUTION);
    }

    #[test]
    fn resolving_a_solved_board_is_a_no_op() {
        let mut board = parse_board(EASY_SOLUTION).unwrap();
        let sink = RecordingSink::default();
        let report = Solver::new().solve_streaming(&mut board, &sink);

        assert!(report.solved);
        assert_eq!(report.guesses, 0);
        assert!(sink.frames.lock().unwrap().is_empty());
        assert_eq!(board.to_line(), EASY_SOLUTION);
    }

    #[test]
    fn propagation_only_puzzle_never_invokes_the_guess_engine() {
        // A handful of blanks, each the only one in its row: naked
        // singles all the way down
        let mut line: Vec<u8> = EASY_SOLUTION.bytes().collect();
        for index in [0, 13, 26, 38, 78] {
            line[index] = b'0';
        }
        let text = String::from_utf8(line).unwrap();

        let mut board = parse_board(&text).unwrap();
        let report = Solver::new().solve(&mut board);

        assert!(report.solved);
        assert_eq!(report.guesses, 0);
        assert_eq!(board.to_line(), EASY_SOLUTION);
    }

    #[test]
    fn single_guess_resolves_a_deadly_rectangle() {
        // Blank four cells holding 1/3 across two rows, two columns and
        // two boxes of the solved grid. Every one of the four then has
        // candidates {1, 3} and no single fires anywhere, so the first
        // stall is immediate; one committed guess cascades to the end.
        let mut line: Vec<u8> = EASY_SOLUTION.bytes().collect();
        for index in [32, 35, 41, 44] {
            line[index] = b'0';
        }
        let text = String::from_utf8(line).unwrap();

        let mut board = parse_board(&text).unwrap();
        let report = Solver::new().solve(&mut board);

        assert!(report.solved);
        assert_eq!(report.guesses, 1);
        assert!(board.is_valid_solution());
        // First row-major rectangle cell, lowest candidate first: the
        // guess lands on 1 at (3, 5), which is the canonical completion
        assert_eq!(board.to_line(), EASY_SOLUTION);
    }

    #[test]
    fn hard_puzzle_requires_and_survives_guessing() {
        let mut board = parse_board(HARD_PUZZLE).unwrap();
        let report = Solver::new().solve(&mut board);

        assert!(report.solved);
        assert!(report.guesses > 0);
        assert!(board.is_valid_solution());
    }

    #[test]
    fn duplicated_given_fails_without_looping() {
        let mut line = EASY_PUZZLE.to_string();
        // second 5 into row 0
        line.replace_range(1..2, "5");
        let mut board = parse_board(&line).unwrap();
        let report = Solver::new().solve(&mut board);

        assert!(!report.solved);
    }

    #[test]
    fn sparse_duplicated_given_also_fails() {
        let mut text = String::from("5,5,0,0,0,0,0,0,0\n");
        for _ in 0..8 {
            text.push_str("0,0,0,0,0,0,0,0,0\n");
        }
        let mut board = parse_board(&text).unwrap();
        assert!(!Solver::new().solve(&mut board).solved);
    }

    #[test]
    fn empty_candidate_cell_reports_contradiction() {
        // Row 0 holds 1-8 and column 8 already has a 9 further down, so
        // (0, 8) is free with no candidates at all. No duplicates exist,
        // so only the contradiction scan can catch this.
        let mut givens = [0u8; 81];
        for (col, given) in givens.iter_mut().enumerate().take(8) {
            *given = col as u8 + 1;
        }
        givens[80] = 9;
        let mut board = crate::board::Board::from_givens(&givens);
        assert!(board.first_contradiction().is_some());

        let report = Solver::new().solve(&mut board);
        assert!(!report.solved);
    }

    #[test]
    fn streams_one_snapshot_per_assignment_in_order() {
        let mut board = parse_board(EASY_PUZZLE).unwrap();
        let initially_filled = board.filled();
        let sink = RecordingSink::default();
        let report = Solver::new().solve_streaming(&mut board, &sink);

        assert!(report.solved);
        let frames = sink.frames.lock().unwrap();
        assert_eq!(frames.len(), 81 - initially_filled);

        // Filled-cell count grows by exactly one per frame
        let mut expected = initially_filled;
        for frame in frames.iter() {
            expected += 1;
            let filled = frame
                .iter()
                .flatten()
                .filter(|view| view.value != 0)
                .count();
            assert_eq!(filled, expected);
        }

        // The last frame is the terminal board
        let last = frames.last().unwrap();
        assert_eq!(*last, board.snapshot());
    }

    #[test]
    fn outer_stream_never_carries_uncertain_cells() {
        // Even on a guess-heavy solve, speculative boards stay invisible
        // and commits arrive as certainties
        let mut board = parse_board(HARD_PUZZLE).unwrap();
        let sink = RecordingSink::default();
        let report = Solver::new().solve_streaming(&mut board, &sink);

        assert!(report.solved);
        assert!(report.guesses > 0);
        for frame in sink.frames.lock().unwrap().iter() {
            assert!(frame.iter().flatten().all(|view| !view.uncertain));
        }
    }

    #[test]
    fn partial_board_is_kept_on_failure() {
        let mut line = EASY_PUZZLE.to_string();
        line.replace_range(1..2, "5");
        let mut board = parse_board(&line).unwrap();
        let before = board.filled();
        let report = Solver::new().solve(&mut board);

        assert!(!report.solved);
        assert!(board.filled() >= before);
        assert!(!board.is_complete());
    }

    #[test]
    fn solved_boards_hold_nine_distinct_digits_per_unit() {
        for puzzle in [EASY_PUZZLE, HARD_PUZZLE] {
            let mut board = parse_board(puzzle).unwrap();
            assert!(Solver::new().solve(&mut board).solved);
            assert!(board.is_valid_solution());
        }
    }
}
