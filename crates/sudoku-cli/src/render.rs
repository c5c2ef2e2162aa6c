//! Drawing snapshot frames to the terminal.

use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io;
use sudoku_engine::Snapshot;

/// Redraw one frame at the top-left of the screen. Frames are a fixed
/// 13x25 block, so drawing over the previous one needs no clearing.
pub fn draw_snapshot(stdout: &mut io::Stdout, frame: &Snapshot) -> io::Result<()> {
    let mut y = 0u16;
    for row in 0..9 {
        if row % 3 == 0 {
            execute!(stdout, MoveTo(0, y), Print("-------------------------"))?;
            y += 1;
        }
        execute!(stdout, MoveTo(0, y))?;
        for col in 0..9 {
            if col % 3 == 0 {
                execute!(stdout, Print("| "))?;
            }
            let view = frame[row][col];
            match view.value {
                0 => execute!(
                    stdout,
                    SetForegroundColor(Color::DarkGrey),
                    Print(". "),
                    ResetColor
                )?,
                value if view.uncertain => execute!(
                    stdout,
                    SetForegroundColor(Color::Yellow),
                    Print(format!("{value} ")),
                    ResetColor
                )?,
                value => execute!(stdout, Print(format!("{value} ")))?,
            }
        }
        execute!(stdout, Print("|"))?;
        y += 1;
    }
    execute!(stdout, MoveTo(0, y), Print("-------------------------"))?;

    let filled = frame.iter().flatten().filter(|view| view.value != 0).count();
    execute!(stdout, MoveTo(0, y + 2), Print(format!("filled {filled:>2}/81")))?;
    Ok(())
}
