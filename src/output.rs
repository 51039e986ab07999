//! Row sinks: where candidate rows end up.

use std::io::Write;

use crate::config::OutputFormat;
use crate::dataset::CandidateRow;
use crate::error::Result;

/// Destination for dataset rows. `begin` is called once with the column
/// names before the first row and `finish` once after the last.
pub trait RowSink {
    fn begin(&mut self, _columns: &[&str]) -> Result<()> {
        Ok(())
    }

    fn write_row(&mut self, row: &CandidateRow) -> Result<()>;

    fn finish(&mut self) -> Result<()>;
}

impl<S: RowSink + ?Sized> RowSink for Box<S> {
    fn begin(&mut self, columns: &[&str]) -> Result<()> {
        (**self).begin(columns)
    }

    fn write_row(&mut self, row: &CandidateRow) -> Result<()> {
        (**self).write_row(row)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Comma-separated rows under a single header line.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(inner),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn begin(&mut self, columns: &[&str]) -> Result<()> {
        self.writer.write_record(columns)?;
        Ok(())
    }

    fn write_row(&mut self, row: &CandidateRow) -> Result<()> {
        self.writer.write_record(row.values())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// One JSON object per line, keyed by column name.
pub struct JsonlSink<W: Write> {
    inner: W,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> RowSink for JsonlSink<W> {
    fn write_row(&mut self, row: &CandidateRow) -> Result<()> {
        serde_json::to_writer(&mut self.inner, row)?;
        self.inner.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Sink for `format` writing into `inner`.
pub fn sink_for<W: Write + 'static>(format: OutputFormat, inner: W) -> Box<dyn RowSink> {
    match format {
        OutputFormat::Csv => Box::new(CsvSink::new(inner)),
        OutputFormat::Jsonl => Box::new(JsonlSink::new(inner)),
    }
}
