use chess::{Color, Piece};

use super::{ByColor, REFERENCE_CENTER};
use crate::board::{coords, square_at, Position};

/// Orthogonal neighbours of the king: left, right, down, up.
const SHIELD_OFFSETS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KingSafety {
    /// 1 while the side may still castle on either wing. A king that has
    /// already castled reads 0 here, same as one that lost its rights.
    pub castling_rights_remaining: ByColor<u8>,
    /// Pawns of either colour orthogonally adjacent to the king.
    pub pawn_shield: ByColor<u32>,
}

pub fn pawn_shield(position: &Position, color: Color) -> u32 {
    let (file, rank) = coords(position.king_square(color));
    SHIELD_OFFSETS
        .iter()
        .filter_map(|&(df, dr)| square_at(file + df, rank + dr))
        .filter(|&square| matches!(position.piece_at(square), Some((Piece::Pawn, _))))
        .count() as u32
}

pub fn king_safety(position: &Position) -> KingSafety {
    KingSafety {
        castling_rights_remaining: ByColor::from_fn(|color| {
            u8::from(position.has_castling_rights(color))
        }),
        pawn_shield: ByColor::from_fn(|color| pawn_shield(position, color)),
    }
}

/// Manhattan distance from each king to d4, an endgame activity proxy.
pub fn king_center_distance(position: &Position) -> ByColor<u32> {
    let (center_file, center_rank) = REFERENCE_CENTER;
    ByColor::from_fn(|color| {
        let (file, rank) = coords(position.king_square(color));
        ((file - center_file).abs() + (rank - center_rank).abs()) as u32
    })
}
