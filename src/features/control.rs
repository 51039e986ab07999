use chess::{Color, Piece};

use super::{center_squares, ByColor};
use crate::board::{square_at, Position};

/// Central squares (d4, e4, d5, e5) attacked by `acting`.
pub fn center_control(position: &Position, acting: Color) -> u32 {
    center_squares()
        .into_iter()
        .filter(|&square| position.is_attacked_by(acting, square))
        .count() as u32
}

/// Files with nothing on ranks 2 through 7. Back-rank pieces don't close a file.
pub fn open_files(position: &Position) -> u32 {
    (0..8)
        .filter(|&file| {
            (1..7).all(|rank| {
                square_at(file, rank).map_or(true, |square| position.piece_at(square).is_none())
            })
        })
        .count() as u32
}

fn file_has_pawn(position: &Position, file: i8, color: Color) -> bool {
    (0..8).any(|rank| {
        square_at(file, rank)
            .map_or(false, |square| position.piece_at(square) == Some((Piece::Pawn, color)))
    })
}

/// Per colour, files holding an enemy pawn but none of its own.
pub fn semi_open_files(position: &Position) -> ByColor<u32> {
    ByColor::from_fn(|color| {
        (0..8)
            .filter(|&file| {
                file_has_pawn(position, file, !color) && !file_has_pawn(position, file, color)
            })
            .count() as u32
    })
}

/// Net attacked squares in the opponent's half: +1 for each square `acting`
/// attacks, -1 for each the opponent attacks. White looks at ranks 5-8,
/// Black at ranks 1-4.
pub fn space_advantage(position: &Position, acting: Color) -> i32 {
    let ranks = match acting {
        Color::White => 4..8,
        Color::Black => 0..4,
    };
    let mut space = 0;
    for rank in ranks {
        for file in 0..8 {
            let Some(square) = square_at(file, rank) else {
                continue;
            };
            if position.is_attacked_by(acting, square) {
                space += 1;
            }
            if position.is_attacked_by(!acting, square) {
                space -= 1;
            }
        }
    }
    space
}
