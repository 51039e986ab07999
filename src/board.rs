use chess::{
    get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves,
    BitBoard, Board as ChessBoard, CastleRights, ChessMove, Color, File, MoveGen, Piece, Rank,
    Square, EMPTY,
};
use std::fmt;
use std::str::FromStr;

use crate::error::{DatasetError, Result};

/// Read-only query facade over a `chess::Board`, plus the move counters the
/// board itself does not keep.
///
/// Squares are indexed rank-major: a1 = 0, h1 = 7, a8 = 56. Hypothetical
/// moves never touch the receiver; `with_move` hands back a disposable copy.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Position {
    inner: ChessBoard,
    halfmove_clock: u32,
    fullmove_number: u32,
}

/// Bounds-checked square lookup from signed file/rank coordinates.
///
/// Returns `None` for anything off the board, so neighbour arithmetic on the
/// a- and h-files can never wrap onto the opposite edge.
pub fn square_at(file: i8, rank: i8) -> Option<Square> {
    if !(0..8).contains(&file) || !(0..8).contains(&rank) {
        return None;
    }
    Some(Square::make_square(
        Rank::from_index(rank as usize),
        File::from_index(file as usize),
    ))
}

/// File and rank of a square as signed coordinates.
pub fn coords(square: Square) -> (i8, i8) {
    (
        square.get_file().to_index() as i8,
        square.get_rank().to_index() as i8,
    )
}

fn piece_char(piece: Piece, color: Color) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

fn piece_from_letter(letter: char) -> Option<Piece> {
    match letter {
        'N' => Some(Piece::Knight),
        'B' => Some(Piece::Bishop),
        'R' => Some(Piece::Rook),
        'Q' => Some(Piece::Queen),
        'K' => Some(Piece::King),
        _ => None,
    }
}

/// A SAN token broken into the parts a legal move is matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SanPattern {
    Castle { kingside: bool },
    Normal {
        piece: Piece,
        from_file: Option<i8>,
        from_rank: Option<i8>,
        to: Square,
        promotion: Option<Piece>,
    },
}

impl SanPattern {
    fn parse(san: &str) -> Option<Self> {
        let san = san.trim_end_matches(['+', '#', '!', '?']);
        match san {
            "O-O" | "0-0" => return Some(SanPattern::Castle { kingside: true }),
            "O-O-O" | "0-0-0" => return Some(SanPattern::Castle { kingside: false }),
            _ => {}
        }

        let mut chars: Vec<char> = san.chars().filter(|&c| c != 'x' && c != '-').collect();

        // "e8=Q" and "e8Q" both promote
        let mut promotion = None;
        if let Some(&last) = chars.last() {
            if let Some(piece) = piece_from_letter(last) {
                if chars.len() >= 3 {
                    promotion = Some(piece);
                    chars.pop();
                    if chars.last() == Some(&'=') {
                        chars.pop();
                    }
                }
            }
        }

        let piece = match chars.first().copied().and_then(piece_from_letter) {
            Some(piece) => {
                chars.remove(0);
                piece
            }
            None => Piece::Pawn,
        };

        if chars.len() < 2 {
            return None;
        }
        let dest: String = chars[chars.len() - 2..].iter().collect();
        let to = Square::from_str(&dest).ok()?;

        let mut from_file = None;
        let mut from_rank = None;
        for &c in &chars[..chars.len() - 2] {
            match c {
                'a'..='h' => from_file = Some((c as u8 - b'a') as i8),
                '1'..='8' => from_rank = Some((c as u8 - b'1') as i8),
                _ => return None,
            }
        }

        if promotion.is_some() && piece != Piece::Pawn {
            return None;
        }

        Some(SanPattern::Normal {
            piece,
            from_file,
            from_rank,
            to,
            promotion,
        })
    }
}

impl Position {
    pub fn new() -> Self {
        Self {
            inner: ChessBoard::default(),
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Parse a FEN. Missing move counters default to `0 1`.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let invalid = |reason: String| DatasetError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };
        let inner = ChessBoard::from_str(fen).map_err(|e| invalid(e.to_string()))?;

        let mut fields = fen.split_whitespace().skip(4);
        let halfmove_clock = match fields.next() {
            Some(text) => text
                .parse()
                .map_err(|_| invalid(format!("bad halfmove clock '{text}'")))?,
            None => 0,
        };
        let fullmove_number = match fields.next() {
            Some(text) => text
                .parse()
                .map_err(|_| invalid(format!("bad fullmove number '{text}'")))?,
            None => 1,
        };

        Ok(Self {
            inner,
            halfmove_clock,
            fullmove_number,
        })
    }

    pub fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        let piece = self.inner.piece_on(square)?;
        let color = self.inner.color_on(square)?;
        Some((piece, color))
    }

    pub fn pieces_of(&self, piece: Piece, color: Color) -> BitBoard {
        *self.inner.pieces(piece) & *self.inner.color_combined(color)
    }

    pub fn occupied(&self) -> BitBoard {
        *self.inner.combined()
    }

    pub fn color_combined(&self, color: Color) -> BitBoard {
        *self.inner.color_combined(color)
    }

    /// Legal moves for the side to move, in generator order.
    pub fn legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.inner).collect()
    }

    pub fn legal(&self, mv: ChessMove) -> bool {
        self.inner.legal(mv)
    }

    /// Pieces of `color` that attack `square`, whether or not anything stands on it.
    pub fn attackers(&self, color: Color, square: Square) -> BitBoard {
        let board = &self.inner;
        let occupied = *board.combined();
        let queens = *board.pieces(Piece::Queen);
        let straight = *board.pieces(Piece::Rook) | queens;
        let diagonal = *board.pieces(Piece::Bishop) | queens;

        let attackers = (get_knight_moves(square) & *board.pieces(Piece::Knight))
            | (get_king_moves(square) & *board.pieces(Piece::King))
            | (get_rook_moves(square, occupied) & straight)
            | (get_bishop_moves(square, occupied) & diagonal)
            // a pawn of the other colour on `square` would hit exactly the
            // squares our pawns attack it from
            | get_pawn_attacks(square, !color, *board.pieces(Piece::Pawn));

        attackers & *board.color_combined(color)
    }

    pub fn is_attacked_by(&self, color: Color, square: Square) -> bool {
        self.attackers(color, square) != EMPTY
    }

    /// Squares the piece on `square` reaches under the current occupancy,
    /// friendly-occupied squares included.
    pub fn reach(&self, square: Square) -> BitBoard {
        let Some((piece, color)) = self.piece_at(square) else {
            return EMPTY;
        };
        let occupied = self.occupied();
        match piece {
            Piece::Pawn => get_pawn_attacks(square, color, !EMPTY),
            Piece::Knight => get_knight_moves(square),
            Piece::Bishop => get_bishop_moves(square, occupied),
            Piece::Rook => get_rook_moves(square, occupied),
            Piece::Queen => get_rook_moves(square, occupied) | get_bishop_moves(square, occupied),
            Piece::King => get_king_moves(square),
        }
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.inner.king_square(color)
    }

    /// True while `color` keeps kingside or queenside castling rights.
    /// This says nothing about whether the king has already castled.
    pub fn has_castling_rights(&self, color: Color) -> bool {
        self.inner.castle_rights(color) != CastleRights::NoRights
    }

    pub fn side_to_move(&self) -> Color {
        self.inner.side_to_move()
    }

    pub fn is_check(&self) -> bool {
        self.inner.checkers().popcnt() > 0
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Disposable copy with `mv` applied. The receiver is left untouched.
    pub fn with_move(&self, mv: ChessMove) -> Self {
        let pawn_move = matches!(self.piece_at(mv.get_source()), Some((Piece::Pawn, _)));
        let capture = self.piece_at(mv.get_dest()).is_some();
        Self {
            inner: self.inner.make_move_new(mv),
            halfmove_clock: if pawn_move || capture {
                0
            } else {
                self.halfmove_clock + 1
            },
            fullmove_number: match self.side_to_move() {
                Color::White => self.fullmove_number,
                Color::Black => self.fullmove_number + 1,
            },
        }
    }

    /// Resolve a SAN token against the legal moves of this position.
    /// Ambiguous or unmatched tokens give `None`.
    pub fn parse_san(&self, san: &str) -> Option<ChessMove> {
        let pattern = SanPattern::parse(san)?;
        let king = self.king_square(self.side_to_move());

        let mut matches = self.legal_moves().into_iter().filter(|mv| match pattern {
            SanPattern::Castle { kingside } => {
                let (from_file, _) = coords(mv.get_source());
                let (to_file, _) = coords(mv.get_dest());
                mv.get_source() == king
                    && to_file - from_file == if kingside { 2 } else { -2 }
            }
            SanPattern::Normal {
                piece,
                from_file,
                from_rank,
                to,
                promotion,
            } => {
                let (file, rank) = coords(mv.get_source());
                mv.get_dest() == to
                    && mv.get_promotion() == promotion
                    && self.piece_at(mv.get_source()).map(|(p, _)| p) == Some(piece)
                    && from_file.map_or(true, |f| f == file)
                    && from_rank.map_or(true, |r| r == rank)
            }
        });

        let mv = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(mv),
        }
    }

    /// Standard FEN. The en-passant field names the target square behind the
    /// pawn that just made a double step, and only when a capture there is
    /// possible.
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match square_at(file, rank).and_then(|square| self.piece_at(square)) {
                    Some((piece, color)) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece_char(piece, color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move() {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        for color in [Color::White, Color::Black] {
            let rights = self.inner.castle_rights(color);
            if rights.has_kingside() {
                castling.push(piece_char(Piece::King, color));
            }
            if rights.has_queenside() {
                castling.push(piece_char(Piece::Queen, color));
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        // the board stores the square of the capturable pawn
        let en_passant = self
            .inner
            .en_passant()
            .and_then(|pawn| {
                let (file, rank) = coords(pawn);
                let step = match self.side_to_move() {
                    Color::White => 1,
                    Color::Black => -1,
                };
                square_at(file, rank + step)
            })
            .map_or_else(|| "-".to_string(), |square| square.to_string());

        format!(
            "{placement} {side} {castling} {en_passant} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_str(name).unwrap()
    }

    #[test]
    fn test_fen_parsing() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let position = Position::from_fen(fen).unwrap();
        assert_eq!(position.to_fen(), fen);
        assert_eq!(position, Position::new());
    }

    #[test]
    fn test_invalid_fen_is_rejected() {
        let err = Position::from_fen("not a fen").unwrap_err();
        assert!(matches!(err, DatasetError::InvalidFen { .. }));
    }

    #[test]
    fn test_square_indexing_is_rank_major() {
        assert_eq!(sq("a1").to_index(), 0);
        assert_eq!(sq("h1").to_index(), 7);
        assert_eq!(sq("a2").to_index(), 8);
        assert_eq!(sq("h8").to_index(), 63);
        assert_eq!(square_at(4, 3), Some(sq("e4")));
        assert_eq!(coords(sq("e4")), (4, 3));
    }

    #[test]
    fn test_square_at_rejects_off_board() {
        assert_eq!(square_at(-1, 0), None);
        assert_eq!(square_at(8, 4), None);
        assert_eq!(square_at(3, -1), None);
        assert_eq!(square_at(3, 8), None);
    }

    #[test]
    fn test_attack_queries_in_start_position() {
        let position = Position::new();
        assert!(position.is_attacked_by(Color::White, sq("e3")));
        assert!(position.is_attacked_by(Color::White, sq("f3")));
        assert!(!position.is_attacked_by(Color::White, sq("e4")));
        assert!(position.is_attacked_by(Color::Black, sq("f6")));
        assert!(!position.is_attacked_by(Color::Black, sq("e5")));
        assert_eq!(position.attackers(Color::White, sq("b3")).popcnt(), 2);
        assert_eq!(position.attackers(Color::White, sq("c3")).popcnt(), 3);
    }

    #[test]
    fn test_sliders_are_blocked() {
        let position = Position::from_fen("4k3/8/8/8/8/8/4P3/4RK2 w - - 0 1").unwrap();
        assert!(position.is_attacked_by(Color::White, sq("e2")));
        assert!(!position.is_attacked_by(Color::White, sq("e5")));
        assert_eq!(position.reach(sq("e1")).popcnt(), 6);
    }

    #[test]
    fn test_castling_rights_and_kings() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w K - 0 1").unwrap();
        assert!(position.has_castling_rights(Color::White));
        assert!(!position.has_castling_rights(Color::Black));
        assert_eq!(position.king_square(Color::White), sq("e1"));
        assert_eq!(position.king_square(Color::Black), sq("e8"));
    }

    #[test]
    fn test_with_move_leaves_receiver_untouched() {
        let position = Position::new();
        let mv = ChessMove::new(sq("e2"), sq("e4"), None);
        assert!(position.legal(mv));
        let next = position.with_move(mv);
        assert_eq!(position, Position::new());
        assert_eq!(next.piece_at(sq("e4")), Some((Piece::Pawn, Color::White)));
        assert_eq!(next.side_to_move(), Color::Black);
    }

    #[test]
    fn test_parse_san() {
        let position = Position::new();
        let mv = position.parse_san("Nf3").unwrap();
        assert_eq!(mv, ChessMove::new(sq("g1"), sq("f3"), None));
        assert!(position.parse_san("Ke2").is_none());
        assert!(position.parse_san("e5").is_none());
        assert!(position.parse_san("").is_none());
    }

    #[test]
    fn test_parse_san_promotion() {
        let position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            position.parse_san("a8=Q"),
            Some(ChessMove::new(sq("a7"), sq("a8"), Some(Piece::Queen)))
        );
        assert_eq!(
            position.parse_san("a8N+"),
            Some(ChessMove::new(sq("a7"), sq("a8"), Some(Piece::Knight)))
        );
        // a pawn reaching the last rank must say what it becomes
        assert!(position.parse_san("a8").is_none());
    }

    #[test]
    fn test_parse_san_en_passant() {
        let position =
            Position::from_fen("rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
                .unwrap();
        assert_eq!(
            position.parse_san("exd6"),
            Some(ChessMove::new(sq("e5"), sq("d6"), None))
        );
    }

    #[test]
    fn test_parse_san_castling_and_disambiguation() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(
            position.parse_san("O-O"),
            Some(ChessMove::new(sq("e1"), sq("g1"), None))
        );
        assert_eq!(
            position.parse_san("O-O-O"),
            Some(ChessMove::new(sq("e1"), sq("c1"), None))
        );
        // both rooks reach d1
        assert!(position.parse_san("Rd1").is_none());
        assert_eq!(
            position.parse_san("Rad1"),
            Some(ChessMove::new(sq("a1"), sq("d1"), None))
        );
    }

    #[test]
    fn test_fen_after_double_push_round_trips() {
        let mut position = Position::new();
        for san in ["e4", "a6", "e5", "d5"] {
            let mv = position.parse_san(san).unwrap();
            position = position.with_move(mv);
        }
        let fen = position.to_fen();
        assert_eq!(
            fen,
            "rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"
        );
        assert_eq!(Position::from_fen(&fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn test_move_counters() {
        let mut position = Position::new();
        for san in ["Nf3", "Nf6", "Ng1"] {
            let mv = position.parse_san(san).unwrap();
            position = position.with_move(mv);
        }
        assert_eq!(position.halfmove_clock(), 3);
        assert_eq!(position.fullmove_number(), 2);

        let position = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 12 40").unwrap();
        assert_eq!(position.to_fen(), "4k3/8/8/8/8/8/4P3/4K3 b - - 12 40");
    }
}
