//! CSV export of decoded channels

use crate::core::Channel;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CsvError>;

/// Write the header and one row per channel, empty slots included
///
/// Returns the number of data rows written.
pub fn write_csv<W: Write>(mut writer: W, channels: &[Channel], precision: usize) -> Result<usize> {
    writeln!(writer, "{}", Channel::CSV_HEADER.join(","))?;

    for channel in channels {
        let row: Vec<String> = channel
            .to_csv(precision)
            .iter()
            .map(|cell| escape_field(cell))
            .collect();
        writeln!(writer, "{}", row.join(","))?;
    }

    writer.flush()?;
    Ok(channels.len())
}

/// Export channels to a CSV file
pub fn export_csv(
    filename: impl AsRef<Path>,
    channels: &[Channel],
    precision: usize,
) -> Result<usize> {
    let file = File::create(filename)?;
    write_csv(BufWriter::new(file), channels, precision)
}

/// Quote a field when it contains a delimiter, quote or line break (RFC 4180)
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
