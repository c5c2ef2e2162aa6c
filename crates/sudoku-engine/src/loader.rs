//! Turning raw puzzle text into an initial [`Board`].
//!
//! Accepts cells separated by commas, newlines or other whitespace, as
//! well as the wire form used by puzzle services: one unbroken run of 81
//! digits. 0 means blank.

use crate::board::Board;
use thiserror::Error;

/// Why raw puzzle text could not become a board
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected 81 cells, found {0}")]
    WrongCellCount(usize),
    #[error("cell {index} is not a number: {token:?}")]
    InvalidToken { index: usize, token: String },
    #[error("cell {index} is outside 0-9: {value}")]
    OutOfRange { index: usize, value: i64 },
}

/// Parse raw text into a board of givens.
///
/// Duplicated givens are not rejected here; they surface as a failed
/// solve. The loader's contract is shape only: 81 numeric cells, each
/// within 0..=9.
pub fn parse_board(text: &str) -> Result<Board, ParseError> {
    let tokens: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect();

    let mut givens = [0u8; 81];

    // Wire form: a single 81-digit run, one cell per character
    if tokens.len() == 1 && tokens[0].len() == 81 && tokens[0].bytes().all(|b| b.is_ascii_digit())
    {
        for (index, byte) in tokens[0].bytes().enumerate() {
            givens[index] = byte - b'0';
        }
        return Ok(Board::from_givens(&givens));
    }

    if tokens.len() != 81 {
        return Err(ParseError::WrongCellCount(tokens.len()));
    }

    for (index, token) in tokens.iter().enumerate() {
        let value: i64 = token.parse().map_err(|_| ParseError::InvalidToken {
            index,
            token: (*token).to_string(),
        })?;
        if !(0..=9).contains(&value) {
            return Err(ParseError::OutOfRange { index, value });
        }
        givens[index] = value as u8;
    }

    Ok(Board::from_givens(&givens))
}
