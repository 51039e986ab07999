//! Position enumeration and candidate-move labelling.
//!
//! For every position past the opening prefix the feature record is computed
//! once, then each legal move becomes one row labelled 1 if it is the move the
//! game actually continued with.

use chess::{ChessMove, Color, Piece};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

use crate::board::Position;
use crate::config::ExtractConfig;
use crate::error::{DatasetError, Result};
use crate::features::{extract_features, EvalContext, FeatureRecord};
use crate::game::{Game, GameRecord};
use crate::output::RowSink;

/// Games handed to the worker pool at a time; rows are written in input order.
const GAMES_PER_BATCH: usize = 64;

/// One (position, candidate move) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRow {
    pub is_white_player: u8,
    pub position_fen: String,
    /// Candidate in UCI notation.
    #[serde(rename = "move")]
    pub mv: String,
    #[serde(flatten)]
    pub features: FeatureRecord,
    /// Candidate descriptors, present only when enabled in the config.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_is_capture: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_gives_check: Option<u8>,
    pub label: u8,
}

impl CandidateRow {
    /// Header for rows built with or without candidate descriptors.
    pub fn columns(descriptors: bool) -> Vec<&'static str> {
        let mut columns = vec!["is_white_player", "position_fen", "move"];
        columns.extend_from_slice(FeatureRecord::COLUMNS);
        if descriptors {
            columns.extend_from_slice(&["move_is_capture", "move_gives_check"]);
        }
        columns.push("label");
        columns
    }

    pub fn values(&self) -> Vec<String> {
        let mut values = vec![
            self.is_white_player.to_string(),
            self.position_fen.clone(),
            self.mv.clone(),
        ];
        values.extend(self.features.values());
        values.extend(self.move_is_capture.map(|v| v.to_string()));
        values.extend(self.move_gives_check.map(|v| v.to_string()));
        values.push(self.label.to_string());
        values
    }
}

/// Rows of one game, plus the reason it stopped early, if it did.
#[derive(Debug, Default)]
pub struct GameRows {
    pub rows: Vec<CandidateRow>,
    pub positions: usize,
    pub error: Option<DatasetError>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub games: usize,
    pub skipped_games: usize,
    pub positions: usize,
    pub rows: usize,
}

fn is_capture(position: &Position, mv: ChessMove) -> bool {
    if position.piece_at(mv.get_dest()).is_some() {
        return true;
    }
    // en passant: a pawn changing file onto an empty square
    matches!(position.piece_at(mv.get_source()), Some((Piece::Pawn, _)))
        && mv.get_source().get_file() != mv.get_dest().get_file()
}

/// One row per legal move of `ctx`. The features always describe the
/// position before the move. With `descriptors` set, each candidate is also
/// tried on a throwaway copy of the board to fill the capture and check
/// columns.
pub fn candidate_rows(
    ctx: &EvalContext,
    played: ChessMove,
    descriptors: bool,
) -> Vec<CandidateRow> {
    let position = ctx.position();
    let features = extract_features(ctx);
    let fen = position.to_fen();
    let is_white_player = u8::from(ctx.acting() == Color::White);

    ctx.legal_moves()
        .iter()
        .map(|&mv| CandidateRow {
            is_white_player,
            position_fen: fen.clone(),
            mv: mv.to_string(),
            features,
            move_is_capture: descriptors.then(|| u8::from(is_capture(position, mv))),
            move_gives_check: descriptors.then(|| u8::from(position.with_move(mv).is_check())),
            label: u8::from(mv == played),
        })
        .collect()
}

pub struct DatasetBuilder {
    config: ExtractConfig,
    player: String,
}

impl DatasetBuilder {
    pub fn new(config: ExtractConfig, player: impl Into<String>) -> Self {
        Self {
            config,
            player: player.into(),
        }
    }

    /// Walk one game and collect its rows. An unresolvable move ends the
    /// game; rows already produced for the legal prefix are kept.
    pub fn game_rows(&self, record: &GameRecord) -> GameRows {
        let mut out = GameRows::default();
        let acting = record.acting_color(&self.player);

        let mut game = match record.start_position() {
            Ok(position) => Game::from_position(position),
            Err(e) => {
                out.error = Some(e);
                return out;
            }
        };

        for san in &record.sans {
            let played = match game.resolve(san) {
                Ok(mv) => mv,
                Err(e) => {
                    out.error = Some(e);
                    break;
                }
            };

            let past_opening = game.ply() >= self.config.opening_plies;
            let players_turn =
                !self.config.player_moves_only || game.position().side_to_move() == acting;
            if past_opening && players_turn {
                let ctx = EvalContext::new(*game.position(), acting);
                let descriptors = self.config.candidate_descriptors;
                out.rows.extend(candidate_rows(&ctx, played, descriptors));
                out.positions += 1;
            }

            game.play(played);
        }

        out
    }

    /// Process every game and stream the rows into `sink` in input order.
    pub fn build<I, S>(&self, games: I, sink: &mut S) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<GameRecord>>,
        S: RowSink,
    {
        self.config.validate()?;
        let pool = match self.config.threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| DatasetError::Config(e.to_string()))?,
            ),
            None => None,
        };

        let started = Instant::now();
        let mut summary = RunSummary::default();
        let mut batch = Vec::with_capacity(GAMES_PER_BATCH);

        info!(
            "Extracting features for player '{}' (skipping {} opening plies)",
            self.player, self.config.opening_plies
        );
        sink.begin(&CandidateRow::columns(self.config.candidate_descriptors))?;

        for game in games {
            batch.push(game?);
            if batch.len() == GAMES_PER_BATCH {
                self.flush(&mut batch, pool.as_ref(), sink, &mut summary)?;
            }
        }
        self.flush(&mut batch, pool.as_ref(), sink, &mut summary)?;
        sink.finish()?;

        info!(
            "Finished: {} games ({} skipped), {} positions, {} rows in {:.2?}",
            summary.games,
            summary.skipped_games,
            summary.positions,
            summary.rows,
            started.elapsed()
        );
        Ok(summary)
    }

    fn flush<S: RowSink>(
        &self,
        batch: &mut Vec<GameRecord>,
        pool: Option<&rayon::ThreadPool>,
        sink: &mut S,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let work = || -> Vec<GameRows> {
            batch.par_iter().map(|game| self.game_rows(game)).collect()
        };
        let results = match pool {
            Some(pool) => pool.install(work),
            None => work(),
        };

        for (game, result) in batch.iter().zip(results) {
            summary.games += 1;
            if let Some(e) = &result.error {
                warn!(
                    "Game {} ({} vs {}) stopped early: {}",
                    summary.games, game.white, game.black, e
                );
                summary.skipped_games += 1;
            }
            debug!(
                "Game {}: {} positions, {} rows",
                summary.games,
                result.positions,
                result.rows.len()
            );
            for row in &result.rows {
                sink.write_row(row)?;
            }
            summary.positions += result.positions;
            summary.rows += result.rows.len();
        }

        batch.clear();
        Ok(())
    }
}
