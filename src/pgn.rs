//! PGN input. Only the mainline is kept; variations are skipped.

use flate2::read::MultiGzDecoder;
use pgn_reader::{BufferedReader, RawHeader, SanPlus, Skip, Visitor};
use std::fs::File;
use std::io::{BufReader, Read};
use std::mem;
use std::path::Path;

use crate::error::Result;
use crate::game::GameRecord;

#[derive(Default)]
struct GameCollector {
    game: GameRecord,
}

impl Visitor for GameCollector {
    type Result = GameRecord;

    fn begin_game(&mut self) {
        self.game = GameRecord::default();
    }

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        let value = value.decode_utf8_lossy().into_owned();
        match key {
            b"White" => self.game.white = value,
            b"Black" => self.game.black = value,
            b"FEN" => self.game.fen = Some(value),
            _ => {}
        }
    }

    fn san(&mut self, san_plus: SanPlus) {
        // check suffixes are dropped; the board works them out itself
        self.game.sans.push(san_plus.san.to_string());
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn end_game(&mut self) -> Self::Result {
        mem::take(&mut self.game)
    }
}

/// Streaming iterator over the games of a PGN source.
pub struct PgnGames<R: Read> {
    reader: BufferedReader<R>,
    collector: GameCollector,
}

impl<R: Read> Iterator for PgnGames<R> {
    type Item = Result<GameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_game(&mut self.collector) {
            Ok(Some(game)) => Some(Ok(game)),
            Ok(None) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

pub fn read_games<R: Read>(reader: R) -> PgnGames<R> {
    PgnGames {
        reader: BufferedReader::new(reader),
        collector: GameCollector::default(),
    }
}

/// Open a PGN file, transparently decompressing `*.gz`.
pub fn open_pgn<P: AsRef<Path>>(path: P) -> Result<PgnGames<Box<dyn Read + Send>>> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path)?);
    let reader: Box<dyn Read + Send> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => Box::new(MultiGzDecoder::new(file)),
        _ => Box::new(file),
    };
    Ok(read_games(reader))
}
