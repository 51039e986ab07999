//! Per-pawn structure predicates.
//!
//! Each predicate looks at one pawn in isolation, so a pawn may carry several
//! tags at once (an isolated passer, a doubled and backward pawn, ...). Files
//! or ranks that fall off the board are simply empty.

use chess::{Color, Piece, Square};

use super::ByColor;
use crate::board::{coords, square_at, Position};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PawnCounts {
    pub isolated: u32,
    pub doubled: u32,
    pub backward: u32,
    pub passed: u32,
    pub connected: u32,
}

/// Rank step toward promotion.
pub fn forward(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

fn has_pawn(position: &Position, color: Color, file: i8, rank: i8) -> bool {
    square_at(file, rank)
        .map_or(false, |square| position.piece_at(square) == Some((Piece::Pawn, color)))
}

/// No friendly pawn on either neighbouring file.
pub fn is_isolated(position: &Position, square: Square, color: Color) -> bool {
    let (file, _) = coords(square);
    ![file - 1, file + 1]
        .into_iter()
        .any(|f| (0..8).any(|r| has_pawn(position, color, f, r)))
}

/// Another friendly pawn shares the file.
pub fn is_doubled(position: &Position, square: Square, color: Color) -> bool {
    let (file, rank) = coords(square);
    (0..8)
        .filter(|&r| r != rank)
        .any(|r| has_pawn(position, color, file, r))
}

/// No friendly pawn diagonally one step behind on a neighbouring file.
pub fn is_backward(position: &Position, square: Square, color: Color) -> bool {
    let (file, rank) = coords(square);
    let behind = rank - forward(color);
    ![file - 1, file + 1]
        .into_iter()
        .any(|f| has_pawn(position, color, f, behind))
}

/// No enemy pawn ahead on the same or a neighbouring file.
pub fn is_passed(position: &Position, square: Square, color: Color) -> bool {
    let (file, rank) = coords(square);
    let ahead: Vec<i8> = match color {
        Color::White => (rank + 1..8).collect(),
        Color::Black => (0..rank).collect(),
    };
    !(file - 1..=file + 1).any(|f| ahead.iter().any(|&r| has_pawn(position, !color, f, r)))
}

/// A friendly pawn on a neighbouring file within one rank.
pub fn is_connected(position: &Position, square: Square, color: Color) -> bool {
    let (file, rank) = coords(square);
    [file - 1, file + 1]
        .into_iter()
        .any(|f| (rank - 1..=rank + 1).any(|r| has_pawn(position, color, f, r)))
}

pub fn pawn_counts(position: &Position, color: Color) -> PawnCounts {
    let mut counts = PawnCounts::default();
    for square in position.pieces_of(Piece::Pawn, color) {
        counts.isolated += u32::from(is_isolated(position, square, color));
        counts.doubled += u32::from(is_doubled(position, square, color));
        counts.backward += u32::from(is_backward(position, square, color));
        counts.passed += u32::from(is_passed(position, square, color));
        counts.connected += u32::from(is_connected(position, square, color));
    }
    counts
}

pub fn pawn_structure(position: &Position) -> ByColor<PawnCounts> {
    ByColor::from_fn(|color| pawn_counts(position, color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn sq(name: &str) -> Square {
        Square::from_str(name).unwrap()
    }

    #[test]
    fn test_start_position() {
        let expected = PawnCounts {
            isolated: 0,
            doubled: 0,
            // nothing stands on the first rank behind them
            backward: 8,
            passed: 0,
            connected: 8,
        };
        let structure = pawn_structure(&Position::new());
        assert_eq!(structure.white, expected);
        assert_eq!(structure.black, expected);
    }

    #[test]
    fn test_passed_pawn_flips_when_blocker_added() {
        let free = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(is_passed(&free, sq("e2"), Color::White));

        let blocked = Position::from_fen("4k3/8/8/4p3/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(!is_passed(&blocked, sq("e2"), Color::White));

        let guarded = Position::from_fen("4k3/3p4/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(!is_passed(&guarded, sq("e2"), Color::White));
    }

    #[test]
    fn test_enemy_pawn_behind_does_not_stop_passer() {
        let position = Position::from_fen("4k3/8/8/4P3/3p4/8/8/4K3 w - - 0 1").unwrap();
        assert!(is_passed(&position, sq("e5"), Color::White));
        // black d4 runs toward rank 1 with nothing in front of it
        assert!(is_passed(&position, sq("d4"), Color::Black));
    }

    #[test]
    fn test_edge_file_pawns() {
        let position = Position::from_fen("4k3/8/8/8/8/8/P6P/4K3 w - - 0 1").unwrap();
        let counts = pawn_counts(&position, Color::White);
        assert_eq!(counts.isolated, 2);
        assert_eq!(counts.passed, 2);
        assert_eq!(counts.connected, 0);
    }

    #[test]
    fn test_doubled_and_isolated_together() {
        let position = Position::from_fen("4k3/8/8/8/8/4P3/4P3/K7 w - - 0 1").unwrap();
        let counts = pawn_counts(&position, Color::White);
        assert_eq!(counts.isolated, 2);
        assert_eq!(counts.doubled, 2);
    }

    #[test]
    fn test_neighbour_file_removes_isolation_but_not_doubling() {
        let position = Position::from_fen("4k3/8/8/8/3P4/4P3/4P3/K7 w - - 0 1").unwrap();
        assert!(!is_isolated(&position, sq("e2"), Color::White));
        assert!(is_doubled(&position, sq("e2"), Color::White));
        assert!(!is_doubled(&position, sq("d4"), Color::White));
        assert!(!is_isolated(&position, sq("d4"), Color::White));
    }

    #[test]
    fn test_backward_and_connected_follow_direction() {
        let position =
            Position::from_fen("4k3/8/4p3/3p4/3P4/4P3/8/4K3 w - - 0 1").unwrap();

        assert!(!is_backward(&position, sq("d4"), Color::White));
        assert!(is_backward(&position, sq("e3"), Color::White));
        assert!(!is_backward(&position, sq("d5"), Color::Black));
        assert!(is_backward(&position, sq("e6"), Color::Black));

        let structure = pawn_structure(&position);
        assert_eq!(
            structure.white,
            PawnCounts {
                isolated: 0,
                doubled: 0,
                backward: 1,
                passed: 0,
                connected: 2,
            }
        );
        assert_eq!(structure.black, structure.white);
    }
}
