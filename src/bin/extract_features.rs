use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rival_features::{open_pgn, sink_for, DatasetBuilder, ExtractConfig, OutputFormat};

#[derive(Parser, Debug)]
#[command(about = "Build a move-prediction dataset from a player's PGN games", author, version)]
struct Args {
    /// PGN file with the player's games (`.pgn` or `.pgn.gz`)
    #[arg(value_name = "PGN")]
    input: PathBuf,

    /// Where to write the dataset
    #[arg(short, long, value_name = "FILE", default_value = "features.csv")]
    output: PathBuf,

    /// JSON config file; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Player the dataset is built for (defaults to the PGN file stem)
    #[arg(long)]
    player: Option<String>,

    /// Half-moves played through before rows are emitted
    #[arg(long)]
    opening_plies: Option<usize>,

    /// Only emit positions where the player is on move
    #[arg(long)]
    player_moves_only: bool,

    /// Worker threads for feature extraction
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Add move_is_capture and move_gives_check columns
    #[arg(long)]
    candidate_descriptors: bool,
}

impl Args {
    fn into_config(self) -> Result<(ExtractConfig, PathBuf, PathBuf)> {
        let mut config = match &self.config {
            Some(path) => ExtractConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ExtractConfig::default(),
        };

        if let Some(player) = self.player {
            config.player_name = Some(player);
        }
        if let Some(plies) = self.opening_plies {
            config.opening_plies = plies;
        }
        if self.player_moves_only {
            config.player_moves_only = true;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.candidate_descriptors {
            config.candidate_descriptors = true;
        }
        config.validate()?;

        Ok((config, self.input, self.output))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config, input, output) = Args::parse().into_config()?;
    let player = config.resolve_player_name(&input);

    let games = open_pgn(&input).with_context(|| format!("Failed to open {}", input.display()))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut sink = sink_for(config.format, BufWriter::new(file));

    let summary = DatasetBuilder::new(config, player)
        .build(games, &mut sink)
        .with_context(|| format!("Failed to extract features from {}", input.display()))?;

    info!(
        "Wrote {} rows from {} positions to {}",
        summary.rows,
        summary.positions,
        output.display()
    );
    Ok(())
}
