mod fetcher;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use std::{fs, process};
use sudoku_engine::{parse_board, Board, Snapshot, SolveReport, Solver};

#[derive(Debug, Parser)]
#[command(
    name = "sudoku-solver",
    version,
    about = "Solve 9x9 Sudoku puzzles with constraint propagation and backtracking"
)]
struct Args {
    /// Puzzle as 81 row-major digits, 0 for blanks
    puzzle: Option<String>,

    /// Read the puzzle from a file (cells separated by commas, newlines or spaces)
    #[arg(long, conflicts_with = "puzzle")]
    file: Option<PathBuf>,

    /// Fetch a puzzle from sudoku.com: easy, medium, hard or expert
    #[arg(long, conflicts_with_all = ["puzzle", "file"])]
    fetch: Option<String>,

    /// Watch the board fill in live
    #[arg(long)]
    live: bool,

    /// Milliseconds to hold each live frame
    #[arg(long, default_value_t = 40)]
    delay: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let text = if let Some(puzzle) = args.puzzle {
        puzzle
    } else if let Some(path) = args.file {
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?
    } else if let Some(tag) = args.fetch {
        let difficulty: fetcher::Difficulty = tag.parse()?;
        fetcher::fetch_puzzle(difficulty)?
    } else {
        bail!("no puzzle: pass 81 digits, --file <path> or --fetch <difficulty>");
    };

    let board = parse_board(&text)?;

    let (board, report) = if args.live {
        solve_live(board, Duration::from_millis(args.delay))?
    } else {
        println!("{board}\n");
        let mut board = board;
        let report = Solver::new().solve(&mut board);
        (board, report)
    };

    println!("{board}");
    if report.solved {
        println!("Solved ({} guesses)", report.guesses);
        Ok(())
    } else {
        eprintln!("No solution found; the grid above is best effort");
        process::exit(1);
    }
}

/// Solve on a worker thread while this one draws every snapshot arriving
/// over a rendezvous channel, holding each frame briefly so the
/// progression is visible
fn solve_live(board: Board, delay: Duration) -> Result<(Board, SolveReport)> {
    let initial = board.snapshot();
    let (tx, rx) = mpsc::sync_channel::<Snapshot>(0);

    let solver = thread::spawn(move || {
        let mut board = board;
        let report = Solver::new().solve_streaming(&mut board, &tx);
        (board, report)
    });

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
    let drawn = draw_frames(&mut stdout, initial, &rx, delay);
    // If drawing aborted mid-stream the solver is still blocked on the
    // rendezvous send; hanging up the receiver lets it run to the end
    drop(rx);
    execute!(stdout, Show, LeaveAlternateScreen)?;

    let (board, report) = solver
        .join()
        .map_err(|_| anyhow::anyhow!("solver thread panicked"))?;
    drawn?;
    Ok((board, report))
}

fn draw_frames(
    stdout: &mut io::Stdout,
    initial: Snapshot,
    rx: &mpsc::Receiver<Snapshot>,
    delay: Duration,
) -> Result<()> {
    render::draw_snapshot(stdout, &initial)?;
    stdout.flush()?;

    // The channel closes when the solver thread finishes
    while let Ok(frame) = rx.recv() {
        render::draw_snapshot(stdout, &frame)?;
        stdout.flush()?;
        thread::sleep(delay);
    }

    // Hold the terminal board a moment before leaving the alternate screen
    thread::sleep(Duration::from_millis(600));
    Ok(())
}
