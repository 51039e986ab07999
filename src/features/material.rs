use chess::{Color, Piece, ALL_PIECES};

use super::{center_squares, ByColor};
use crate::board::Position;

const PAWN_VALUE: f32 = 1.0;
const KNIGHT_VALUE: f32 = 3.0;
const BISHOP_VALUE: f32 = 3.0;
const ROOK_VALUE: f32 = 5.0;
const QUEEN_VALUE: f32 = 9.0;
const KING_VALUE: f32 = 0.0; // King's value isn't used in material counting

/// Added per bishop when a side holds exactly two and the centre is pawn-free.
const BISHOP_PAIR_BONUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialFeatures {
    pub material: ByColor<f32>,
    /// White minus black.
    pub imbalance: f32,
    /// 1 when knight or bishop counts differ between the sides.
    pub minor_piece_imbalance: u8,
}

pub fn piece_value(piece: Piece) -> f32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => KING_VALUE,
    }
}

/// No pawn of either colour on d4, e4, d5 or e5.
pub fn is_center_open(position: &Position) -> bool {
    center_squares()
        .into_iter()
        .all(|square| !matches!(position.piece_at(square), Some((Piece::Pawn, _))))
}

pub fn material_sum(position: &Position, color: Color) -> f32 {
    let mut material: f32 = ALL_PIECES
        .iter()
        .map(|&piece| position.pieces_of(piece, color).popcnt() as f32 * piece_value(piece))
        .sum();

    let bishops = position.pieces_of(Piece::Bishop, color).popcnt();
    if bishops == 2 && is_center_open(position) {
        material += BISHOP_PAIR_BONUS * bishops as f32;
    }

    material
}

pub fn minor_piece_imbalance(position: &Position) -> u8 {
    let count = |piece, color| position.pieces_of(piece, color).popcnt() as i32;
    let knights = (count(Piece::Knight, Color::White) - count(Piece::Knight, Color::Black)).abs();
    let bishops = (count(Piece::Bishop, Color::White) - count(Piece::Bishop, Color::Black)).abs();
    u8::from(knights + bishops > 0)
}

pub fn material(position: &Position) -> MaterialFeatures {
    let material = ByColor::from_fn(|color| material_sum(position, color));
    MaterialFeatures {
        imbalance: material.white - material.black,
        material,
        minor_piece_imbalance: minor_piece_imbalance(position),
    }
}
