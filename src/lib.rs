//! Positional feature extraction for chess move-prediction datasets.
//!
//! Games are read from PGN, replayed with the `chess` crate, and every
//! position past the opening is described by a fixed set of positional
//! features. Each legal move in that position becomes one labelled row.

pub mod board;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod game;
pub mod output;
pub mod pgn;

pub use board::Position;
pub use config::{ExtractConfig, OutputFormat};
pub use dataset::{candidate_rows, CandidateRow, DatasetBuilder, RunSummary};
pub use error::{DatasetError, Result};
pub use features::{extract_features, EvalContext, FeatureRecord};
pub use game::{Game, GameRecord};
pub use output::{sink_for, CsvSink, JsonlSink, RowSink};
pub use pgn::{open_pgn, read_games};
