use std::fs::File;
use std::io;
use std::path::Path;

use csv::{Terminator, Writer, WriterBuilder};

use crate::error::GenError;
use crate::transaction::TransactionRecord;

/// Header row written ahead of the records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// `type,client,tx,amount` with `\n` line endings
    #[default]
    Normalized,
    /// The header of the historical fixtures, padded field names and
    /// `\r\n` line endings included
    Legacy,
}

impl HeaderStyle {
    #[must_use]
    pub fn header(self) -> [&'static str; 4] {
        match self {
            HeaderStyle::Normalized => ["type", "client", "tx", "amount"],
            HeaderStyle::Legacy => ["type", "client", "tx ", " amount"],
        }
    }

    fn terminator(self) -> Terminator {
        match self {
            HeaderStyle::Normalized => Terminator::Any(b'\n'),
            HeaderStyle::Legacy => Terminator::CRLF,
        }
    }

    fn builder(self) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder.has_headers(false).terminator(self.terminator());
        builder
    }
}

/// CSV sink for generated records. The header is written on construction,
/// so even an empty run produces a valid file.
#[derive(Debug)]
pub struct RecordWriter<W: io::Write> {
    writer: Writer<W>,
    rows: u64,
}

impl<W: io::Write> RecordWriter<W> {
    /// # Errors
    /// Errors when the header cannot be written.
    pub fn new(writer: W, style: HeaderStyle) -> Result<Self, GenError> {
        RecordWriter::from_csv(style.builder().from_writer(writer), style)
    }

    fn from_csv(mut writer: Writer<W>, style: HeaderStyle) -> Result<Self, GenError> {
        writer.write_record(style.header())?;
        Ok(RecordWriter { writer, rows: 0 })
    }

    /// # Errors
    /// Errors when the underlying writer fails.
    pub fn write(&mut self, record: &TransactionRecord) -> Result<(), GenError> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    #[must_use]
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flushes buffered rows and returns how many records were written.
    ///
    /// # Errors
    /// Errors when the final flush fails.
    pub fn finish(mut self) -> Result<u64, GenError> {
        self.writer.flush()?;
        Ok(self.rows)
    }
}

impl RecordWriter<File> {
    /// Creates the file at `path`, replacing any previous content.
    ///
    /// # Errors
    /// Errors when the file cannot be created or the header cannot be written.
    pub fn create<P: AsRef<Path>>(path: P, style: HeaderStyle) -> Result<Self, GenError> {
        RecordWriter::from_csv(style.builder().from_path(path)?, style)
    }
}

/// Writes the header and every record to `writer`.
///
/// # Errors
/// Errors when the underlying writer fails.
pub fn write_records<W: io::Write>(
    writer: W,
    records: &[TransactionRecord],
    style: HeaderStyle,
) -> Result<u64, GenError> {
    let mut writer = RecordWriter::new(writer, style)?;
    for record in records {
        writer.write(record)?;
    }
    writer.finish()
}

/// Writes the header and every record to a file, overwriting it if it exists.
///
/// # Errors
/// Errors when the file cannot be created or written.
pub fn write_to_path<P: AsRef<Path>>(
    path: P,
    records: &[TransactionRecord],
    style: HeaderStyle,
) -> Result<u64, GenError> {
    let mut writer = RecordWriter::create(path, style)?;
    for record in records {
        writer.write(record)?;
    }
    writer.finish()
}
