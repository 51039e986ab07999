//! Positional feature evaluators.
//!
//! Every evaluator is a pure function of a [`Position`], plus the acting
//! colour or the shared legal-move list where it needs them. [`EvalContext`]
//! generates the move list once per position and [`extract_features`] runs
//! every evaluator into one fixed-shape [`FeatureRecord`].
//!
//! Precondition: each position holds exactly one king per colour.

pub mod activity;
pub mod control;
pub mod king;
pub mod material;
pub mod patterns;
pub mod pawns;
pub mod record;

use chess::{ChessMove, Color, Square};
use serde::Serialize;

use crate::board::{square_at, Position};

pub use record::FeatureRecord;

/// d4, e4, d5, e5 as (file, rank).
const CENTER: [(i8, i8); 4] = [(3, 3), (4, 3), (3, 4), (4, 4)];

/// d4, the square king distances are measured to.
pub(crate) const REFERENCE_CENTER: (i8, i8) = (3, 3);

pub(crate) fn center_squares() -> Vec<Square> {
    CENTER
        .iter()
        .filter_map(|&(file, rank)| square_at(file, rank))
        .collect()
}

/// A value per colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ByColor<T> {
    pub white: T,
    pub black: T,
}

impl<T> ByColor<T> {
    pub fn from_fn(mut f: impl FnMut(Color) -> T) -> Self {
        let white = f(Color::White);
        let black = f(Color::Black);
        Self { white, black }
    }

    pub fn get(&self, color: Color) -> &T {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn get_mut(&mut self, color: Color) -> &mut T {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

/// One position prepared for evaluation: the snapshot, its legal moves and
/// the colour of the player the dataset is built for.
#[derive(Debug, Clone)]
pub struct EvalContext {
    position: Position,
    legal_moves: Vec<ChessMove>,
    acting: Color,
}

impl EvalContext {
    pub fn new(position: Position, acting: Color) -> Self {
        Self {
            legal_moves: position.legal_moves(),
            position,
            acting,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn legal_moves(&self) -> &[ChessMove] {
        &self.legal_moves
    }

    pub fn acting(&self) -> Color {
        self.acting
    }
}

/// Run every evaluator once over the context.
pub fn extract_features(ctx: &EvalContext) -> FeatureRecord {
    let position = ctx.position();
    let moves = ctx.legal_moves();
    let acting = ctx.acting();

    let material = material::material(position);
    let safety = king::king_safety(position);
    let pawns = pawns::pawn_structure(position);
    let semi_open = control::semi_open_files(position);
    let mobility = activity::piece_mobility(position, moves);
    let piece_activity = activity::piece_activity(position, moves);
    let coordination = activity::piece_coordination(position);
    let threats = activity::threats(position);
    let king_distance = king::king_center_distance(position);
    let bishop_pair = patterns::bishop_pair(position);
    let majority = patterns::pawn_majority(position);

    FeatureRecord {
        white_material: material.material.white,
        black_material: material.material.black,
        material_imbalance: material.imbalance,
        minor_piece_imbalance: material.minor_piece_imbalance,

        white_castling_rights_remaining: safety.castling_rights_remaining.white,
        black_castling_rights_remaining: safety.castling_rights_remaining.black,
        white_king_pawn_shield: safety.pawn_shield.white,
        black_king_pawn_shield: safety.pawn_shield.black,

        white_isolated_pawns: pawns.white.isolated,
        white_doubled_pawns: pawns.white.doubled,
        white_backward_pawns: pawns.white.backward,
        white_passed_pawns: pawns.white.passed,
        white_connected_pawns: pawns.white.connected,
        black_isolated_pawns: pawns.black.isolated,
        black_doubled_pawns: pawns.black.doubled,
        black_backward_pawns: pawns.black.backward,
        black_passed_pawns: pawns.black.passed,
        black_connected_pawns: pawns.black.connected,

        center_control: control::center_control(position, acting),
        open_files: control::open_files(position),
        white_semi_open_files: semi_open.white,
        black_semi_open_files: semi_open.black,
        space_advantage: control::space_advantage(position, acting),

        white_piece_mobility: mobility.white,
        black_piece_mobility: mobility.black,
        white_piece_activity: piece_activity.white,
        black_piece_activity: piece_activity.black,
        white_coordination: coordination.white,
        black_coordination: coordination.black,
        white_attacked_pieces: threats.attacked.white,
        white_hanging_pieces: threats.hanging.white,
        black_attacked_pieces: threats.attacked.black,
        black_hanging_pieces: threats.hanging.black,
        white_king_center_distance: king_distance.white,
        black_king_center_distance: king_distance.black,

        white_bishop_pair: bishop_pair.white,
        black_bishop_pair: bishop_pair.black,
        knight_outposts: patterns::knight_outposts(position, acting),
        white_rooks_on_seventh: patterns::white_rooks_on_seventh(position),
        white_pawn_majority: majority.white,
        black_pawn_majority: majority.black,
        passed_pawn_advancement: patterns::passed_pawn_advancement(position, acting),
    }
}
