use chess::{Color, Piece};

use super::pawns::is_passed;
use super::ByColor;
use crate::board::{coords, square_at, Position};

/// d3, e3, d6, e6 as (file, rank). The same set is used for both colours.
const OUTPOSTS: [(i8, i8); 4] = [(3, 2), (4, 2), (3, 5), (4, 5)];

/// Rank index of the row adjacent to black's back rank.
const SEVENTH_RANK: i8 = 6;

pub fn bishop_pair(position: &Position) -> ByColor<u8> {
    ByColor::from_fn(|color| u8::from(position.pieces_of(Piece::Bishop, color).popcnt() == 2))
}

pub fn knight_outposts(position: &Position, acting: Color) -> u32 {
    OUTPOSTS
        .iter()
        .filter_map(|&(file, rank)| square_at(file, rank))
        .filter(|&square| position.piece_at(square) == Some((Piece::Knight, acting)))
        .count() as u32
}

/// White rooks on the seventh rank. Black rooks on the second rank are not counted.
pub fn white_rooks_on_seventh(position: &Position) -> u32 {
    position
        .pieces_of(Piece::Rook, Color::White)
        .filter(|&square| coords(square).1 == SEVENTH_RANK)
        .count() as u32
}

/// White pawns on the kingside (files e-h), black pawns on the queenside (files a-d).
pub fn pawn_majority(position: &Position) -> ByColor<u32> {
    let on_wing = |color: Color, kingside: bool| {
        position
            .pieces_of(Piece::Pawn, color)
            .filter(|&square| (coords(square).0 >= 4) == kingside)
            .count() as u32
    };
    ByColor {
        white: on_wing(Color::White, true),
        black: on_wing(Color::Black, false),
    }
}

/// Sum over the acting side's passed pawns of ranks travelled from the
/// starting rank (0 on the start rank, 5 on the rank before promotion).
pub fn passed_pawn_advancement(position: &Position, acting: Color) -> u32 {
    position
        .pieces_of(Piece::Pawn, acting)
        .filter(|&square| is_passed(position, square, acting))
        .map(|square| {
            let rank = coords(square).1;
            let advanced = match acting {
                Color::White => rank - 1,
                Color::Black => 6 - rank,
            };
            advanced.max(0) as u32
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position() {
        let position = Position::new();
        assert_eq!(bishop_pair(&position), ByColor { white: 1, black: 1 });
        assert_eq!(knight_outposts(&position, Color::White), 0);
        assert_eq!(white_rooks_on_seventh(&position), 0);
        assert_eq!(pawn_majority(&position), ByColor { white: 4, black: 4 });
        assert_eq!(passed_pawn_advancement(&position, Color::White), 0);
        assert_eq!(passed_pawn_advancement(&position, Color::Black), 0);
    }

    #[test]
    fn test_bishop_pair_needs_exactly_two() {
        let position = Position::from_fen("2b1kb2/8/8/8/8/8/8/1BB1KB2 w - - 0 1").unwrap();
        assert_eq!(bishop_pair(&position), ByColor { white: 0, black: 1 });
    }

    #[test]
    fn test_knight_outposts_follow_acting_colour() {
        let position = Position::from_fen("4k3/8/3nN3/8/8/3N4/8/4K3 w - - 0 1").unwrap();
        assert_eq!(knight_outposts(&position, Color::White), 2);
        assert_eq!(knight_outposts(&position, Color::Black), 1);
    }

    #[test]
    fn test_rooks_on_seventh_is_white_only() {
        let sevenths = Position::from_fen("4k3/R6R/8/8/8/8/r7/4K3 w - - 0 1").unwrap();
        assert_eq!(white_rooks_on_seventh(&sevenths), 2);

        let back_rank = Position::from_fen("R7/4k3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(white_rooks_on_seventh(&back_rank), 0);
    }

    #[test]
    fn test_pawn_majority_wings() {
        let position = Position::from_fen("4k3/pppp3p/8/8/8/8/P3PPP1/4K3 w - - 0 1").unwrap();
        assert_eq!(pawn_majority(&position), ByColor { white: 3, black: 4 });
    }

    #[test]
    fn test_passed_pawn_advancement() {
        let position = Position::from_fen("4k3/8/8/4P3/8/7p/P7/4K3 w - - 0 1").unwrap();
        // e5 is three ranks up, a2 hasn't moved; h3 is four ranks down for black
        assert_eq!(passed_pawn_advancement(&position, Color::White), 3);
        assert_eq!(passed_pawn_advancement(&position, Color::Black), 4);
    }
}
