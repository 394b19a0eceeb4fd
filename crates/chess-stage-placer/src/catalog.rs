use log::debug;
use serde::{Deserialize, Serialize};

use chess_stage_core::{BoardGeometry, Color, Piece, PieceKind, Square};

use crate::scene::{SceneConfig, SceneHost};

/// Literal mesh names of the white pawns in the scene file.
pub const WHITE_PAWN_NAMES: [&str; 8] = ["B", "C", "D", "E", "F", "G", "H", "A(texture)"];

/// Literal mesh names of the black pawns in the scene file.
pub const BLACK_PAWN_NAMES: [&str; 8] = [
    "B.001",
    "C.001",
    "D.001",
    "E.001",
    "F.001",
    "G.001",
    "H.001",
    "A(textures)",
];

/// Ordered substring rules for the non-pawn kinds, evaluated against the
/// lowercased object name. The scene labels its bishops "bitshop", so both
/// spellings match.
const KIND_RULES: [(&[&str], PieceKind); 5] = [
    (&["rook"], PieceKind::Rook),
    (&["knight"], PieceKind::Knight),
    (&["bitshop", "bishop"], PieceKind::Bishop),
    (&["queen"], PieceKind::Queen),
    (&["king"], PieceKind::King),
];

/// Classify a scene object name into a piece code.
///
/// Pawns are matched by their literal mesh names. The remaining kinds match
/// by case-insensitive substring in a fixed rule order, with "white" in the
/// name selecting the white piece and anything else the black one. Names
/// matching no rule are not pieces.
pub fn classify(name: &str) -> Option<Piece> {
    if WHITE_PAWN_NAMES.contains(&name) {
        return Some(Piece::new(Color::White, PieceKind::Pawn));
    }
    if BLACK_PAWN_NAMES.contains(&name) {
        return Some(Piece::new(Color::Black, PieceKind::Pawn));
    }

    let lowered = name.to_lowercase();
    for (needles, kind) in KIND_RULES {
        if needles.iter().any(|needle| lowered.contains(needle)) {
            let color = if lowered.contains("white") {
                Color::White
            } else {
                Color::Black
            };
            return Some(Piece::new(color, kind));
        }
    }
    None
}

/// A physical piece instance present in the scene at catalog time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceInstance {
    /// Scene object name; unique and stable within one snapshot.
    pub id: String,
    pub piece: Piece,
    /// Square the instance stood on when the catalog was taken. Consumed
    /// only by the displacement strategy.
    pub origin: Square,
    /// World z at catalog time; pooled placement keeps it so each piece
    /// model sits at its own height.
    pub base_height: f64,
}

/// The set of piece instances detected in one scene snapshot.
///
/// Instance order is the host's enumeration order and is the deterministic
/// candidate order for tie-breaking in the displacement strategy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    instances: Vec<PieceInstance>,
}

impl Catalog {
    /// Detect and classify piece instances from the scene.
    ///
    /// Reference objects (surface, frame) and unclassifiable names are
    /// skipped. Each instance records the square under its current position
    /// as its origin.
    pub fn detect<S: SceneHost + ?Sized>(
        scene: &S,
        geometry: &BoardGeometry,
        config: &SceneConfig,
    ) -> Catalog {
        let mut instances = Vec::new();
        for name in scene.object_names() {
            if config.is_reference_object(&name) {
                continue;
            }
            let Some(piece) = classify(&name) else {
                continue;
            };
            let Some(pos) = scene.position(&name) else {
                continue;
            };
            instances.push(PieceInstance {
                id: name,
                piece,
                origin: geometry.square_at(&pos),
                base_height: pos.z,
            });
        }
        debug!("cataloged {} piece instances", instances.len());
        Catalog { instances }
    }

    /// Build a catalog from precomputed instances, preserving their order.
    pub fn from_instances(instances: Vec<PieceInstance>) -> Catalog {
        Catalog { instances }
    }

    /// Instances in catalog order.
    #[inline]
    pub fn instances(&self) -> &[PieceInstance] {
        &self.instances
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of cataloged instances of `piece`.
    pub fn count_of(&self, piece: Piece) -> usize {
        self.instances.iter().filter(|i| i.piece == piece).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(code: char) -> Piece {
        Piece::from_char(code).unwrap()
    }

    #[test]
    fn pawn_lists_are_exact_matches() {
        assert_eq!(classify("B"), Some(piece('P')));
        assert_eq!(classify("A(texture)"), Some(piece('P')));
        assert_eq!(classify("B.001"), Some(piece('p')));
        assert_eq!(classify("A(textures)"), Some(piece('p')));
        // Substring variants of the literal names do not match.
        assert_eq!(classify("B.002"), None);
        assert_eq!(classify("b"), None);
    }

    #[test]
    fn substring_rules_classify_major_pieces() {
        assert_eq!(classify("white rook"), Some(piece('R')));
        assert_eq!(classify("Rook.001"), Some(piece('r')));
        assert_eq!(classify("White Knight"), Some(piece('N')));
        assert_eq!(classify("knight black"), Some(piece('n')));
        assert_eq!(classify("queen white"), Some(piece('Q')));
        assert_eq!(classify("Queen"), Some(piece('q')));
        assert_eq!(classify("WHITE KING"), Some(piece('K')));
        assert_eq!(classify("king.001"), Some(piece('k')));
    }

    #[test]
    fn bishop_matches_scene_misspelling() {
        assert_eq!(classify("white bitshop"), Some(piece('B')));
        assert_eq!(classify("bitshop.002"), Some(piece('b')));
        assert_eq!(classify("bishop white"), Some(piece('B')));
    }

    #[test]
    fn rule_order_is_fixed() {
        // "rook" wins over "knight" because its rule comes first.
        assert_eq!(classify("rook knight"), Some(piece('r')));
    }

    #[test]
    fn non_piece_names_are_excluded() {
        for name in ["Black & white", "Outer frame", "Camera", "Sun", "Cube"] {
            assert_eq!(classify(name), None, "classified {name:?}");
        }
    }
}
