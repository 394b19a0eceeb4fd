use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors produced when parsing a square label.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    #[error("malformed square label {0:?}")]
    BadLabel(String),
}

/// One of the 64 board cells, addressed by file (a..h) and rank (1..8).
///
/// Stored as zero-based indices: file 0 is 'a', rank 0 is rank "1".
/// Serialized as the canonical label, e.g. `"e2"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Build a square from zero-based file and rank indices.
    ///
    /// Returns `None` if either index is outside `0..=7`.
    pub fn new(file: u8, rank: u8) -> Option<Square> {
        if file > 7 || rank > 7 {
            return None;
        }
        Some(Square { file, rank })
    }

    /// Zero-based file index (0 = 'a').
    #[inline]
    pub fn file(self) -> u8 {
        self.file
    }

    /// Zero-based rank index (0 = rank "1").
    #[inline]
    pub fn rank(self) -> u8 {
        self.rank
    }

    /// File letter of the label, 'a'..='h'.
    #[inline]
    pub fn file_letter(self) -> char {
        (b'a' + self.file) as char
    }

    /// Rank number of the label, 1..=8.
    #[inline]
    pub fn rank_number(self) -> u8 {
        self.rank + 1
    }

    /// Infallible constructor for indices already clamped to `0..=7`.
    pub(crate) fn new_clamped(file: u8, rank: u8) -> Square {
        Square {
            file: file.min(7),
            rank: rank.min(7),
        }
    }

    /// Manhattan distance to another square, in squares.
    pub fn manhattan(self, other: Square) -> u8 {
        self.file.abs_diff(other.file) + self.rank.abs_diff(other.rank)
    }

    /// All 64 squares, rank-major from a1 to h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square { file, rank }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_letter(), self.rank_number())
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || SquareError::BadLabel(s.to_string());
        let mut chars = s.chars();
        let (file_ch, rank_ch) = match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => (f, r),
            _ => return Err(bad()),
        };
        if !file_ch.is_ascii_lowercase() || !rank_ch.is_ascii_digit() {
            return Err(bad());
        }
        let file = file_ch as u8 - b'a';
        let rank_number = rank_ch as u8 - b'0';
        if rank_number == 0 {
            return Err(bad());
        }
        Square::new(file, rank_number - 1).ok_or_else(bad)
    }
}

impl TryFrom<String> for Square {
    type Error = SquareError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(square: Square) -> String {
        square.to_string()
    }
}
