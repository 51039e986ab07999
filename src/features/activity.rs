//! Move-list and attack-map driven features.
//!
//! Mobility and activity read the shared legal-move list of the position, so
//! only the side to move contributes; the other side reports 0.

use chess::{BitBoard, ChessMove, Color, Piece, Square, ALL_COLORS};

use super::ByColor;
use crate::board::Position;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Threats {
    /// Non-pawn pieces (king included) attacked by the opponent.
    pub attacked: ByColor<u32>,
    /// Non-pawn pieces not covered by any friendly unit.
    pub hanging: ByColor<u32>,
}

fn non_pawn_pieces(position: &Position, color: Color) -> BitBoard {
    position.color_combined(color) & !position.pieces_of(Piece::Pawn, color)
}

fn mover(position: &Position, mv: &ChessMove) -> Option<(Piece, Color)> {
    position.piece_at(mv.get_source())
}

/// Non-pawn legal moves, split by the colour of the moving piece.
pub fn piece_mobility(position: &Position, moves: &[ChessMove]) -> ByColor<u32> {
    let mut mobility = ByColor::default();
    for mv in moves {
        if let Some((piece, color)) = mover(position, mv) {
            if piece != Piece::Pawn {
                *mobility.get_mut(color) += 1;
            }
        }
    }
    mobility
}

/// Distinct non-pawn pieces with at least one legal move onto a square the
/// opponent attacks.
pub fn piece_activity(position: &Position, moves: &[ChessMove]) -> ByColor<u32> {
    ByColor::from_fn(|color| {
        non_pawn_pieces(position, color)
            .filter(|&square: &Square| {
                moves.iter().any(|mv| {
                    mv.get_source() == square && position.is_attacked_by(!color, mv.get_dest())
                })
            })
            .count() as u32
    })
}

/// Protective relationships: for every non-pawn piece, the friendly pieces
/// standing on squares it reaches. A legal-move list never contains these
/// "moves" onto friendly squares, so the count comes from the attack sets
/// the move generator is built on, for both colours.
pub fn piece_coordination(position: &Position) -> ByColor<u32> {
    ByColor::from_fn(|color| {
        let friends = position.color_combined(color);
        non_pawn_pieces(position, color)
            .map(|square| (position.reach(square) & friends).popcnt())
            .sum()
    })
}

pub fn threats(position: &Position) -> Threats {
    let mut threats = Threats::default();
    for color in ALL_COLORS {
        for square in non_pawn_pieces(position, color) {
            if position.is_attacked_by(!color, square) {
                *threats.attacked.get_mut(color) += 1;
            }
            if !position.is_attacked_by(color, square) {
                *threats.hanging.get_mut(color) += 1;
            }
        }
    }
    threats
}
