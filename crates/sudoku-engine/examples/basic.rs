//! Basic example of using the Sudoku engine

use sudoku_engine::{parse_board, Solver};

fn main() {
    let puzzle_string =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    let mut board = match parse_board(puzzle_string) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Bad puzzle: {e}");
            return;
        }
    };

    println!("Puzzle ({} givens):", board.filled());
    println!("{board}\n");

    println!("Solving...\n");
    let report = Solver::new().solve(&mut board);

    if report.solved {
        println!("Solution (after {} guesses):", report.guesses);
        println!("{board}");
    } else {
        println!("No solution found; best effort:");
        println!("{board}");
    }
}
