use crate::errors::{FormatError, ReportError, ResourceError};
use csv::{StringRecord, Trim};
use log::debug;
use serde::Deserialize;
use std::fs::File;
use std::io;
use std::path::Path;

/// Columns every input file must name in its header row.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Month", "Revenue", "Expenses", "Profit"];

/// A single reporting period exactly as it appeared in the input file.
///
/// Values are kept as the raw (trimmed) cell text. Turning them into numbers
/// is the analyzer's job, see [`crate::analyzer::Period`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Record {
    /// The 1-based line of the input file this record was read from.
    #[serde(skip)]
    pub line: u64,

    #[serde(rename = "Month")]
    pub month: String,

    #[serde(rename = "Revenue")]
    pub revenue: String,

    #[serde(rename = "Expenses")]
    pub expenses: String,

    #[serde(rename = "Profit")]
    pub profit: String,
}

/// Reads every record from the CSV file located at `path`, preserving input
/// order.
pub fn load_records(path: &Path) -> Result<Vec<Record>, ReportError> {
    let file = File::open(path).map_err(|source| ResourceError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;

    read_records(file, path)
}

/// Reads records from any reader. `source` is only used to label errors.
///
/// The first line must be a header naming at least [`REQUIRED_COLUMNS`]; any
/// additional columns are ignored. Every data row must have exactly as many
/// cells as the header.
pub fn read_records<R: io::Read>(rdr: R, source: &Path) -> Result<Vec<Record>, ReportError> {
    // Note: the csv library handles setting up an io::BufReader so we don't
    // need to do that here.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(rdr);

    let headers = reader
        .headers()
        .map_err(|err| classify_csv_error(err, source))?
        .clone();
    check_headers(&headers)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|err| classify_csv_error(err, source))?;
        let line = row.position().map_or(0, |pos| pos.line());

        let mut record: Record = row
            .deserialize(Some(&headers))
            .map_err(FormatError::Malformed)?;
        record.line = line;
        records.push(record);
    }

    debug!("read {} records from {}", records.len(), source.display());
    Ok(records)
}

fn check_headers(headers: &StringRecord) -> Result<(), FormatError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|name| name == column) {
            return Err(FormatError::MissingColumn(column.to_string()));
        }
    }

    Ok(())
}

/// Sorts a csv error into the resource or format side of the taxonomy.
fn classify_csv_error(err: csv::Error, source: &Path) -> ReportError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return FormatError::RowLength {
            line: pos.as_ref().map_or(0, |pos| pos.line()),
            expected: *expected_len,
            found: *len,
        }
        .into();
    }

    if err.is_io_error() {
        return ResourceError::ReadRecords {
            path: source.to_path_buf(),
            source: err,
        }
        .into();
    }

    FormatError::Malformed(err).into()
}
