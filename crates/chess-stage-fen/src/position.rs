use serde::{Deserialize, Serialize};

use chess_stage_core::{Piece, Square};

/// A decoded piece placement: which piece the requested position puts on
/// which square.
///
/// Entries are kept in parser scan order, rank 8 down to rank 1 and file 'a'
/// to 'h' within a rank. The assignment resolver consumes that order, so it
/// is part of the contract, not an accident of storage. Squares are unique
/// by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetPosition {
    placements: Vec<(Square, Piece)>,
}

impl TargetPosition {
    pub(crate) fn from_scan(placements: Vec<(Square, Piece)>) -> TargetPosition {
        TargetPosition { placements }
    }

    /// Placements in scan order.
    #[inline]
    pub fn placements(&self) -> &[(Square, Piece)] {
        &self.placements
    }

    /// Number of occupied squares.
    #[inline]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Piece required on `square`, if any.
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.placements
            .iter()
            .find(|(s, _)| *s == square)
            .map(|(_, piece)| *piece)
    }

    /// How many squares require `piece`.
    pub fn count_of(&self, piece: Piece) -> usize {
        self.placements.iter().filter(|(_, p)| *p == piece).count()
    }
}

impl<'a> IntoIterator for &'a TargetPosition {
    type Item = &'a (Square, Piece);
    type IntoIter = std::slice::Iter<'a, (Square, Piece)>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}
