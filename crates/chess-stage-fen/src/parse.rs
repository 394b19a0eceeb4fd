use chess_stage_core::{Piece, Square};

use crate::TargetPosition;

/// Full FEN record of the standard initial position; only the placement
/// field is consumed by [`parse_placement`].
pub const STARTING_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors produced when decoding a placement field.
///
/// `row` is the zero-based rank-row index within the field, row 0 describing
/// rank 8.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("empty notation string")]
    Empty,
    #[error("expected 8 rank rows, got {got}")]
    BadRowCount { got: usize },
    #[error("row {row} describes more than 8 files")]
    RowOverflow { row: usize },
    #[error("row {row} describes only {filled} files")]
    RowUnderflow { row: usize, filled: u8 },
    #[error("row {row} contains invalid character {ch:?}")]
    BadChar { row: usize, ch: char },
}

/// Decode the piece-placement field of a notation string.
///
/// Only the first whitespace-delimited token is consumed; suffix fields are
/// ignored. Each of the 8 '/'-separated rows must describe exactly 8 files:
/// a digit `1..=8` advances the file cursor over empty squares, any other
/// character must be one of the 12 piece codes.
pub fn parse_placement(notation: &str) -> Result<TargetPosition, FenError> {
    let field = notation.split_whitespace().next().ok_or(FenError::Empty)?;

    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::BadRowCount { got: rows.len() });
    }

    let mut placements = Vec::with_capacity(32);
    for (row, row_text) in rows.iter().enumerate() {
        // Row 0 describes rank 8, row 7 rank 1.
        let rank = 7 - row as u8;
        let mut file: u8 = 0;
        for ch in row_text.chars() {
            if let Some(digit) = ch.to_digit(10) {
                if digit == 0 {
                    return Err(FenError::BadChar { row, ch });
                }
                file = file.saturating_add(digit as u8);
                if file > 8 {
                    return Err(FenError::RowOverflow { row });
                }
            } else {
                let piece = Piece::from_char(ch).ok_or(FenError::BadChar { row, ch })?;
                let square = Square::new(file, rank).ok_or(FenError::RowOverflow { row })?;
                placements.push((square, piece));
                file += 1;
            }
        }
        if file != 8 {
            return Err(FenError::RowUnderflow { row, filled: file });
        }
    }

    Ok(TargetPosition::from_scan(placements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_stage_core::{Color, PieceKind};

    fn sq(label: &str) -> Square {
        label.parse().unwrap()
    }

    fn pc(code: char) -> Piece {
        Piece::from_char(code).unwrap()
    }

    #[test]
    fn starting_position_has_32_entries() {
        let target = parse_placement(STARTING_POSITION).unwrap();
        assert_eq!(target.len(), 32);
    }

    #[test]
    fn starting_position_back_ranks() {
        let target = parse_placement(STARTING_POSITION).unwrap();
        for (file, code) in "rnbqkbnr".chars().enumerate() {
            let black_home = Square::new(file as u8, 7).unwrap();
            let white_home = Square::new(file as u8, 0).unwrap();
            assert_eq!(target.get(black_home), Some(pc(code)));
            assert_eq!(target.get(white_home), Some(pc(code.to_ascii_uppercase())));
        }
        for file in 0..8u8 {
            assert_eq!(target.get(Square::new(file, 6).unwrap()), Some(pc('p')));
            assert_eq!(target.get(Square::new(file, 1).unwrap()), Some(pc('P')));
        }
    }

    #[test]
    fn scan_order_runs_rank_8_to_rank_1() {
        let target = parse_placement(STARTING_POSITION).unwrap();
        let first = target.placements().first().copied().unwrap();
        let last = target.placements().last().copied().unwrap();
        assert_eq!(first.0, sq("a8"));
        assert_eq!(last.0, sq("h1"));
    }

    #[test]
    fn digits_advance_the_file_cursor() {
        let target = parse_placement("8/8/8/3q4/8/8/8/8").unwrap();
        assert_eq!(target.len(), 1);
        assert_eq!(target.get(sq("d5")), Some(pc('q')));
    }

    #[test]
    fn suffix_fields_are_ignored() {
        let bare = parse_placement("8/8/8/8/4K3/8/8/8").unwrap();
        let full = parse_placement("8/8/8/8/4K3/8/8/8 b - - 12 34").unwrap();
        assert_eq!(bare, full);
    }

    #[test]
    fn empty_board_parses_to_no_placements() {
        let target = parse_placement("8/8/8/8/8/8/8/8").unwrap();
        assert!(target.is_empty());
    }

    #[test]
    fn count_of_tallies_piece_codes() {
        let target = parse_placement(STARTING_POSITION).unwrap();
        assert_eq!(target.count_of(pc('P')), 8);
        assert_eq!(target.count_of(pc('q')), 1);
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse_placement(""), Err(FenError::Empty));
        assert_eq!(parse_placement("   "), Err(FenError::Empty));
    }

    #[test]
    fn rejects_wrong_row_count() {
        assert_eq!(
            parse_placement("8/8/8/8"),
            Err(FenError::BadRowCount { got: 4 })
        );
    }

    #[test]
    fn rejects_row_overflow() {
        // 4 + 5 empty squares overflow the row.
        assert_eq!(
            parse_placement("45/8/8/8/8/8/8/8"),
            Err(FenError::RowOverflow { row: 0 })
        );
        // A ninth piece in a row does too.
        assert_eq!(
            parse_placement("8/ppppppppp/8/8/8/8/8/8"),
            Err(FenError::RowOverflow { row: 1 })
        );
    }

    #[test]
    fn rejects_row_underflow() {
        assert_eq!(
            parse_placement("p6/8/8/8/8/8/8/8"),
            Err(FenError::RowUnderflow { row: 0, filled: 7 })
        );
    }

    #[test]
    fn rejects_invalid_characters() {
        assert_eq!(
            parse_placement("8/8/8/3x4/8/8/8/8"),
            Err(FenError::BadChar { row: 3, ch: 'x' })
        );
        assert_eq!(
            parse_placement("08/8/8/8/8/8/8/8"),
            Err(FenError::BadChar { row: 0, ch: '0' })
        );
    }

    #[test]
    fn serde_round_trip() {
        let target = parse_placement("8/8/8/3q4/8/8/8/8").unwrap();
        let json = serde_json::to_string(&target).unwrap();
        let back: TargetPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, target);
    }

    #[test]
    fn piece_kinds_decode_with_color() {
        let target = parse_placement("8/8/8/8/8/8/8/3QK3").unwrap();
        let queen = target.get(sq("d1")).unwrap();
        assert_eq!(queen.color, Color::White);
        assert_eq!(queen.kind, PieceKind::Queen);
    }
}
