//! Loading simulation output from CSV files.

use crate::error::LoadError;
use crate::sample::{Column, SimulationSamples};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// One data row. Fields are bound by position, never by header name.
#[derive(Debug, Deserialize)]
struct Row {
    t: f64,
    queue_length: f64,
    active: f64,
    arrived: f64,
    handled: f64,
    completed: f64,
    timed_out: f64,
    rejected: f64,
    avg_latency: f64,
    slowdown: f64,
    drop_p: f64,
}

impl Row {
    fn into_values(self) -> [f64; Column::COUNT] {
        [
            self.t,
            self.queue_length,
            self.active,
            self.arrived,
            self.handled,
            self.completed,
            self.timed_out,
            self.rejected,
            self.avg_latency,
            self.slowdown,
            self.drop_p,
        ]
    }
}

/// Load samples from a simulation CSV file
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<SimulationSamples, LoadError> {
    let path = path.as_ref();
    log::info!("Loading samples from: {}", path.display());

    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let samples = parse_samples(file)?;
    log::debug!("Loaded {} rows from {}", samples.len(), path.display());
    Ok(samples)
}

/// Parse samples from any CSV source.
///
/// The first line is the header and is skipped whatever it contains; the
/// rest is read as data, with `#` comment lines and blank lines ignored.
pub fn parse_samples<R: Read>(reader: R) -> Result<SimulationSamples, LoadError> {
    let mut input = BufReader::new(reader);
    let mut header = Vec::new();
    input
        .read_until(b'\n', &mut header)
        .map_err(LoadError::Header)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(input);

    let mut samples = SimulationSamples::new();
    for result in reader.records() {
        let record = result?;
        // positions restart after the header line
        let line = record.position().map(|p| p.line() + 1).unwrap_or(0);

        if record.len() != Column::COUNT {
            return Err(LoadError::FieldCount {
                line,
                found: record.len(),
            });
        }

        let row: Row = record
            .deserialize(None)
            .map_err(|e| non_numeric_field(&record, line).unwrap_or(LoadError::Csv(e)))?;
        samples.push_row(row.into_values());
    }

    Ok(samples)
}

/// Locate the first field that does not parse as a number
fn non_numeric_field(record: &StringRecord, line: u64) -> Option<LoadError> {
    record
        .iter()
        .zip(Column::ALL)
        .find(|(value, _)| value.parse::<f64>().is_err())
        .map(|(value, column)| LoadError::NotNumeric {
            line,
            column: column.name(),
            value: value.to_string(),
        })
}
