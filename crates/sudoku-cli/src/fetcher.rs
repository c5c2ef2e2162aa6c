//! Fetching fresh puzzles from sudoku.com by difficulty tag.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const LEVEL_ENDPOINT: &str = "https://sudoku.com/api/getLevel/";

/// Difficulty tags the puzzle service understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn all_levels() -> &'static [Difficulty] {
        &[
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
        ]
    }

    fn tag(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Difficulty {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(FetchError::InvalidDifficulty(s.to_string())),
        }
    }
}

/// Why no puzzle came back
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unknown difficulty {0:?}: expected easy, medium, hard or expert")]
    InvalidDifficulty(String),
    #[error("puzzle service request failed: {0}")]
    Network(#[source] Box<ureq::Error>),
    #[error("puzzle service sent a malformed response: {0}")]
    Decode(String),
}

/// The service wraps the board in a "desc" array whose first element is
/// the 81-character puzzle string
#[derive(Debug, Deserialize)]
struct LevelResponse {
    desc: Vec<serde_json::Value>,
}

impl LevelResponse {
    fn board(&self) -> Result<&str, FetchError> {
        self.desc
            .first()
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| FetchError::Decode("desc[0] missing or not a string".to_string()))
    }
}

/// Ask sudoku.com for a puzzle of the given difficulty, returning its
/// raw 81-character text
pub fn fetch_puzzle(difficulty: Difficulty) -> Result<String, FetchError> {
    let url = format!("{LEVEL_ENDPOINT}{difficulty}");
    let response = ureq::get(&url)
        .call()
        .map_err(|e| FetchError::Network(Box::new(e)))?;
    let body: LevelResponse = response
        .into_json()
        .map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(body.board()?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("Expert".parse::<Difficulty>().unwrap(), Difficulty::Expert);
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        let err = "impossible".parse::<Difficulty>().unwrap_err();
        assert!(matches!(err, FetchError::InvalidDifficulty(tag) if tag == "impossible"));
    }

    #[test]
    fn display_matches_the_service_tags() {
        let tags: Vec<String> = Difficulty::all_levels()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(tags, ["easy", "medium", "hard", "expert"]);
    }

    #[test]
    fn decodes_the_service_body() {
        let body = r#"{"desc": ["530070000600195000098000060800060003400803001700020006060000280000419005000080079", 3, null, 1, false]}"#;
        let response: LevelResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.board().unwrap().len(), 81);
    }

    #[test]
    fn missing_board_in_body_is_a_decode_error() {
        let response: LevelResponse = serde_json::from_str(r#"{"desc": []}"#).unwrap();
        assert!(matches!(response.board(), Err(FetchError::Decode(_))));

        let response: LevelResponse = serde_json::from_str(r#"{"desc": [42]}"#).unwrap();
        assert!(matches!(response.board(), Err(FetchError::Decode(_))));
    }

    // Talks to sudoku.com; run with --ignored when online
    #[test]
    #[ignore]
    fn fetches_a_hard_puzzle_from_the_live_service() {
        let raw = fetch_puzzle(Difficulty::Hard).unwrap();
        assert_eq!(raw.len(), 81);
        assert!(raw.bytes().all(|b| b.is_ascii_digit()));
    }
}
