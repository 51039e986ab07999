use chess::{ChessMove, Color};

use crate::board::Position;
use crate::error::{DatasetError, Result};

/// One game as read from PGN: the tags we use and the mainline in SAN.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    /// Starting position from a `FEN` tag, if the game doesn't start from the initial setup.
    pub fen: Option<String>,
    pub sans: Vec<String>,
}

impl GameRecord {
    /// White's name up to the first comma ("Carlsen, Magnus" -> "Carlsen").
    pub fn white_player_name(&self) -> &str {
        self.white.split(',').next().unwrap_or_default()
    }

    /// White if `player` is the white player, Black otherwise.
    pub fn acting_color(&self, player: &str) -> Color {
        if self.white_player_name() == player {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn start_position(&self) -> Result<Position> {
        match &self.fen {
            Some(fen) => Position::from_fen(fen),
            None => Ok(Position::new()),
        }
    }
}

/// Replays a game one SAN move at a time.
pub struct Game {
    position: Position,
    move_history: Vec<ChessMove>,
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Position::new())
    }

    pub fn from_position(position: Position) -> Self {
        Self {
            position,
            move_history: Vec::new(),
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn ply(&self) -> usize {
        self.move_history.len()
    }

    /// Resolve `san` in the current position without playing it.
    pub fn resolve(&self, san: &str) -> Result<ChessMove> {
        self.position
            .parse_san(san)
            .ok_or_else(|| DatasetError::IllegalMove {
                san: san.to_string(),
                ply: self.ply(),
                fen: self.position.to_fen(),
            })
    }

    pub fn play(&mut self, mv: ChessMove) {
        self.position = self.position.with_move(mv);
        self.move_history.push(mv);
    }

    pub fn push_san(&mut self, san: &str) -> Result<ChessMove> {
        let mv = self.resolve(san)?;
        self.play(mv);
        Ok(mv)
    }

    pub fn move_history(&self) -> &[ChessMove] {
        &self.move_history
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_player_name_strips_first_name() {
        let record = GameRecord {
            white: "Carlsen, Magnus".to_string(),
            black: "Nakamura, Hikaru".to_string(),
            ..GameRecord::default()
        };
        assert_eq!(record.white_player_name(), "Carlsen");
        assert_eq!(record.acting_color("Carlsen"), Color::White);
        assert_eq!(record.acting_color("Nakamura"), Color::Black);
    }

    #[test]
    fn test_unknown_player_counts_as_black() {
        let record = GameRecord {
            white: "Anand".to_string(),
            ..GameRecord::default()
        };
        assert_eq!(record.acting_color("Someone"), Color::Black);
    }

    #[test]
    fn test_push_san() {
        let mut game = Game::new();
        game.push_san("e4").unwrap();
        game.push_san("e5").unwrap();
        game.push_san("Nf3").unwrap();
        assert_eq!(game.ply(), 3);
        assert_eq!(game.position().side_to_move(), Color::Black);
        assert_eq!(game.move_history()[2].to_string(), "g1f3");
    }

    #[test]
    fn test_illegal_san_reports_ply() {
        let mut game = Game::new();
        game.push_san("e4").unwrap();
        let err = game.push_san("e4").unwrap_err();
        match err {
            DatasetError::IllegalMove { san, ply, .. } => {
                assert_eq!(san, "e4");
                assert_eq!(ply, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(game.ply(), 1);
    }

    #[test]
    fn test_push_san_promotion() {
        let position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut game = Game::from_position(position);
        let mv = game.push_san("a8=Q+").unwrap();
        assert_eq!(mv.to_string(), "a7a8q");
        assert_eq!(game.position().fullmove_number(), 1);
        game.push_san("Kd7").unwrap();
        assert_eq!(game.position().fullmove_number(), 2);
        assert_eq!(game.position().halfmove_clock(), 1);
    }

    #[test]
    fn test_start_position_from_fen_tag() {
        let record = GameRecord {
            fen: Some("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1".to_string()),
            ..GameRecord::default()
        };
        let position = record.start_position().unwrap();
        assert_eq!(position.legal_moves().len(), 6);
    }
}
