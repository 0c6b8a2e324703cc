use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures to read the input file or to persist the finished report.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("unable to read input file {}: {source}", .path.display())]
    ReadInput { path: PathBuf, source: io::Error },

    #[error("failed reading records from {}: {source}", .path.display())]
    ReadRecords { path: PathBuf, source: csv::Error },

    #[error("unable to create output directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("unable to write report to {}: {source}", .path.display())]
    WriteOutput { path: PathBuf, source: io::Error },
}

/// The input does not have the shape of a financial data file.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("input header is missing the required column {0:?}")]
    MissingColumn(String),

    #[error("row on line {line} has {found} columns but the header names {expected}")]
    RowLength { line: u64, expected: u64, found: u64 },

    #[error("malformed csv input: {0}")]
    Malformed(csv::Error),

    #[error("{column} value {value:?} on line {line} is not a number")]
    NotANumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("revenue for {month:?} is zero, profit margin is undefined")]
    ZeroRevenue { month: String },

    #[error("{column} values exceed the supported decimal range")]
    OutOfRange { column: &'static str },
}

#[derive(Debug, Error, PartialEq)]
#[error("input contains no data rows, nothing to summarize")]
pub struct EmptyInputError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode page content: {0}")]
    EncodeContent(lopdf::Error),

    #[error("failed to serialize pdf document: {0}")]
    Serialize(#[from] io::Error),
}

/// Top level error surfaced by every stage of the pipeline.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    EmptyInput(#[from] EmptyInputError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::EncodeContent(err)
    }
}
